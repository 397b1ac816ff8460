use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::{error::Error, position::SortDirection};

/// Per-resource sorting settings, fixed at startup.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ResourceConfig {
    pub name: String,
    #[serde(default)]
    pub direction: SortDirection,
}

#[derive(Clone, Debug, Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, ResourceConfig>,
}

impl ResourceRegistry {
    pub fn new(configs: impl IntoIterator<Item = ResourceConfig>) -> Result<Self, Error> {
        let mut resources = HashMap::new();

        for config in configs {
            if config.name.is_empty() || config.name.contains('/') {
                return Err(Error::Config(format!(
                    "invalid resource name '{}'",
                    config.name
                )));
            }

            if resources.contains_key(&config.name) {
                return Err(Error::Config(format!(
                    "resource '{}' is configured twice",
                    config.name
                )));
            }

            resources.insert(config.name.clone(), config);
        }

        Ok(Self { resources })
    }

    pub fn get(&self, name: &str) -> Result<&ResourceConfig, Error> {
        self.resources.get(name).ok_or_else(|| Error::NotFound {
            resource_type: "Resource".into(),
            resource_id: name.to_string(),
        })
    }

    pub fn len(&self) -> usize {
        self.resources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.resources.is_empty()
    }
}
