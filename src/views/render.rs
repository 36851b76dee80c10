use serde::Serialize;
use tera::{Context, Tera};

use super::{
    ViewError, ViewId,
    loader::{BASE_TEMPLATE, PAGE_NAV_TEMPLATE},
};
use crate::{
    cities::{derive_countries, format_date_long, format_date_short},
    models::City,
};

const SPINNER: &str = "spinner_full_page.html";

/// CityItem
///
/// Row of the city list.
#[derive(Debug, Serialize)]
struct CityItem<'a> {
    id: &'a str,
    city_name: &'a str,
    emoji: &'a str,
    date: String,
}

/// CityDetail
#[derive(Debug, Serialize)]
struct CityDetail<'a> {
    city_name: &'a str,
    emoji: &'a str,
    date: String,
    notes: &'a str,
}

/// OutletData
///
/// Everything a child view may need. Built per render by the shell.
#[derive(Debug, Default)]
pub struct OutletData<'a> {
    pub cities: &'a [City],
    // The `:id` parameter of `cities/:id`, when present.
    pub city_id: Option<&'a str>,
}

/// Partials
///
/// Eagerly compiled templates: the child views rendered into the app layout
/// outlet and the full-page spinner shown while a page module loads.
pub struct Partials {
    tera: Tera,
}

impl Partials {
    pub fn new() -> Result<Self, ViewError> {
        let mut tera = Tera::default();
        tera.add_raw_templates(vec![
            ("base.html", BASE_TEMPLATE),
            ("page_nav.html", PAGE_NAV_TEMPLATE),
            (SPINNER, include_str!("../../templates/spinner_full_page.html")),
            ("city_list.html", include_str!("../../templates/partials/city_list.html")),
            ("city.html", include_str!("../../templates/partials/city.html")),
            ("country_list.html", include_str!("../../templates/partials/country_list.html")),
            ("form.html", include_str!("../../templates/partials/form.html")),
        ])?;
        Ok(Self { tera })
    }

    /// The placeholder rendered for the whole duration of a page module load.
    pub fn spinner(&self) -> Result<String, ViewError> {
        Ok(self.tera.render(SPINNER, &Context::new())?)
    }

    /// render_outlet
    ///
    /// Renders one child view. Countries are derived here, at the point of use,
    /// on every call.
    pub fn render_outlet(&self, view: ViewId, data: &OutletData<'_>) -> Result<String, ViewError> {
        let mut context = Context::new();

        match view {
            ViewId::CityList => {
                let items: Vec<CityItem<'_>> = data
                    .cities
                    .iter()
                    .map(|city| CityItem {
                        id: &city.id,
                        city_name: &city.city_name,
                        emoji: &city.emoji,
                        date: format_date_short(&city.date),
                    })
                    .collect();
                context.insert("cities", &items);
            }
            ViewId::City => {
                let detail = data
                    .city_id
                    .and_then(|id| data.cities.iter().find(|city| city.id == id))
                    .map(|city| CityDetail {
                        city_name: &city.city_name,
                        emoji: &city.emoji,
                        date: format_date_long(&city.date),
                        notes: &city.notes,
                    });
                context.insert("city", &detail);
                context.insert("city_id", data.city_id.unwrap_or_default());
            }
            ViewId::CountryList => {
                context.insert("countries", &derive_countries(data.cities));
            }
            ViewId::Form => {}
            other => return Err(ViewError::NotAPartial(other)),
        }

        Ok(self.tera.render(&view.template_name(), &context)?)
    }
}
