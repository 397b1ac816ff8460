use super::SortDirection;
use crate::error::Error;

/// Converts between the position a user sees (always 1..=count,
/// top to bottom) and the raw value kept in the `position` column.
///
/// `count` is the highest stored position of the scope at the time
/// the translator is built. Build a new translator for every logical
/// operation, the count changes with every insert.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PositionTranslator {
    direction: SortDirection,
    count: i32,
}

impl PositionTranslator {
    pub fn new(direction: SortDirection, count: i32) -> Self {
        Self { direction, count }
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn to_stored(&self, display: i32) -> i32 {
        match self.direction {
            SortDirection::Ascending => display,
            SortDirection::Descending => self.count - display + 1,
        }
    }

    /// Same as [`PositionTranslator::to_stored`] but rejects display
    /// positions outside `1..=count` before translating them.
    pub fn checked_to_stored(&self, display: i32) -> Result<i32, Error> {
        if !(1..=self.count).contains(&display) {
            return Err(Error::InvalidInput(format!(
                "target position {display} is outside 1..={}",
                self.count
            )));
        }
        Ok(self.to_stored(display))
    }

    pub fn to_display(&self, stored: i32) -> i32 {
        match self.direction {
            SortDirection::Ascending => stored,
            SortDirection::Descending => self.count - stored + 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ascending_is_identity() {
        let t = PositionTranslator::new(SortDirection::Ascending, 5);
        assert_eq!(t.to_stored(2), 2);
        assert_eq!(t.to_display(5), 5);
    }

    #[test]
    fn test_descending_reverses() {
        let t = PositionTranslator::new(SortDirection::Descending, 5);
        assert_eq!(t.to_stored(2), 4);
        assert_eq!(t.to_stored(1), 5);
        assert_eq!(t.to_display(5), 1);
        assert_eq!(t.to_display(1), 5);
    }

    #[test]
    fn test_checked_rejects_out_of_range_display() {
        let t = PositionTranslator::new(SortDirection::Descending, 5);
        assert_eq!(t.checked_to_stored(2).unwrap(), 4);
        assert!(t.checked_to_stored(10).unwrap_err().is_validation());
        assert!(t.checked_to_stored(0).unwrap_err().is_validation());
    }

    #[test]
    fn test_round_trip_both_directions() {
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            for count in 1..=12 {
                let t = PositionTranslator::new(direction, count);
                for p in 1..=count {
                    assert_eq!(t.to_display(t.to_stored(p)), p, "{direction} count={count}");
                    assert_eq!(t.to_stored(t.to_display(p)), p, "{direction} count={count}");
                }
            }
        }
    }
}
