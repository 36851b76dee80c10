use std::collections::BTreeMap;

/// Params
///
/// Values captured by `:name` segments, keyed by parameter name.
pub type Params = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Static(String),
    Param(String),
}

/// PathPattern
///
/// A route path such as `/app`, `cities` or `cities/:id`, split into segments.
/// Leading, trailing and repeated slashes carry no meaning, so `/` is the empty
/// pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPattern {
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn parse(raw: &str) -> Self {
        let segments = split_path(raw)
            .into_iter()
            .map(|segment| match segment.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Static(segment.to_string()),
            })
            .collect();

        Self { segments }
    }

    /// Number of URL segments this pattern consumes.
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// match_prefix
    ///
    /// Matches the pattern against the leading segments of a path. Returns the
    /// captured parameters; the caller continues with the segments after `len()`.
    pub fn match_prefix(&self, path: &[&str]) -> Option<Params> {
        if path.len() < self.segments.len() {
            return None;
        }

        let mut params = Params::new();
        for (segment, actual) in self.segments.iter().zip(path) {
            match segment {
                Segment::Static(expected) if expected == actual => {}
                Segment::Static(_) => return None,
                Segment::Param(name) => {
                    params.insert(name.clone(), (*actual).to_string());
                }
            }
        }
        Some(params)
    }

    /// match_exact
    ///
    /// Like `match_prefix`, but every segment of the path must be consumed.
    pub fn match_exact(&self, path: &[&str]) -> Option<Params> {
        if path.len() != self.segments.len() {
            return None;
        }
        self.match_prefix(path)
    }
}

/// split_path
///
/// Splits a URL path into its non-empty segments.
pub fn split_path(path: &str) -> Vec<&str> {
    path.split('/').filter(|segment| !segment.is_empty()).collect()
}
