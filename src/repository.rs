use std::{path::Path, sync::Arc};

use async_trait::async_trait;
use serde::Deserialize;
use thiserror::Error;

use crate::models::City;

/// Sample data compiled into the binary, used when no seed file is configured.
const EMBEDDED_CITIES: &str = include_str!("../data/cities.json");

/// RepositoryError
///
/// Raised while loading the seed data. Lookups themselves cannot fail.
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("failed to read city seed file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("city seed data is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// CityRepository
///
/// Read contract for the visited-city list. Handlers and views only see this
/// trait, so tests can swap the seeded store for a fixed list.
#[async_trait]
pub trait CityRepository: Send + Sync {
    // Every city, in seed order.
    async fn list_cities(&self) -> Vec<City>;
    async fn get_city(&self, id: &str) -> Option<City>;
}

/// CityRepositoryState
///
/// The shared handle stored in the application state.
pub type CityRepositoryState = Arc<dyn CityRepository>;

/// The seed file is accepted either as `{"cities": [...]}` or as a bare array.
#[derive(Deserialize)]
#[serde(untagged)]
enum SeedFile {
    Wrapped { cities: Vec<City> },
    Bare(Vec<City>),
}

/// InMemoryCityRepository
///
/// Fixed list of cities held in memory for the lifetime of the process.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCityRepository {
    cities: Vec<City>,
}

impl InMemoryCityRepository {
    pub fn new(cities: Vec<City>) -> Self {
        Self { cities }
    }

    /// embedded
    ///
    /// Loads the sample data bundled with the crate.
    pub fn embedded() -> Result<Self, RepositoryError> {
        Self::from_json(EMBEDDED_CITIES)
    }

    pub fn from_json(raw: &str) -> Result<Self, RepositoryError> {
        let cities = match serde_json::from_str::<SeedFile>(raw)? {
            SeedFile::Wrapped { cities } | SeedFile::Bare(cities) => cities,
        };
        Ok(Self::new(cities))
    }

    /// load
    ///
    /// Reads a seed file from disk.
    pub async fn load(path: &Path) -> Result<Self, RepositoryError> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| RepositoryError::Io {
                path: path.display().to_string(),
                source,
            })?;
        let repo = Self::from_json(&raw)?;

        tracing::info!(path = %path.display(), count = repo.cities.len(), "Loaded city seed file");
        Ok(repo)
    }
}

#[async_trait]
impl CityRepository for InMemoryCityRepository {
    async fn list_cities(&self) -> Vec<City> {
        self.cities.clone()
    }

    async fn get_city(&self, id: &str) -> Option<City> {
        self.cities.iter().find(|city| city.id == id).cloned()
    }
}
