use std::fmt;

use serde::{Deserialize, Serialize};

/// Set of records whose positions must stay contiguous and unique:
/// every row of one resource, optionally narrowed to one locale.
#[derive(Clone, Debug, Hash, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scope {
    pub resource: String,
    pub locale: Option<String>,
}

impl Scope {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            locale: None,
        }
    }

    pub fn with_locale(mut self, locale: Option<String>) -> Self {
        self.locale = locale.filter(|l| !l.is_empty());
        self
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.locale {
            Some(locale) => write!(f, "{}[{}]", self.resource, locale),
            None => f.write_str(&self.resource),
        }
    }
}
