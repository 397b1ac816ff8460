use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

// It is used by strum to convert the enum to a string
// but the compiler complains that it is unused
#[allow(unused_imports)]
use std::str::FromStr;

/// Order in which a resource stores its `position` column.
///
/// `Descending` resources store the lowest position for the
/// item displayed last, so display positions have to be
/// translated before they reach the store.
#[derive(
    Clone, Debug, Copy, Default, PartialEq, Eq, Serialize, Deserialize, EnumString, Display,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn is_descending(self) -> bool {
        self == SortDirection::Descending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_ascending() {
        assert_eq!(SortDirection::default(), SortDirection::Ascending);
    }

    #[test]
    fn test_from_str() {
        assert_eq!(
            SortDirection::from_str("descending").unwrap(),
            SortDirection::Descending
        );
        assert_eq!(
            SortDirection::from_str("Ascending").unwrap(),
            SortDirection::Ascending
        );
        assert!(SortDirection::from_str("sideways").is_err());
    }

    #[test]
    fn test_to_string() {
        assert_eq!(SortDirection::Descending.to_string(), "descending");
    }
}
