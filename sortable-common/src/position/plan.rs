use super::{PositionTranslator, SortDirection};
use crate::{error::Error, record::Sortable};

/// Block of stored positions that slides by one slot when a record
/// jumps over it. Bounds are inclusive.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Shift {
    pub lower: i32,
    pub upper: i32,
    pub delta: i32,
}

impl Shift {
    pub fn contains(&self, position: i32) -> bool {
        (self.lower..=self.upper).contains(&position)
    }
}

/// A validated move of one record inside a scope of `count` records.
///
/// Every backend runs the same plan: the records covered by
/// [`MovePlan::shift`] move one slot towards the vacated position and
/// the moved record takes `to`. Together these keep the scope dense.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MovePlan {
    from: i32,
    to: i32,
    count: i32,
}

impl MovePlan {
    pub fn new(from: i32, to: i32, count: i32) -> Result<Self, Error> {
        if count < 1 {
            return Err(Error::InvalidInput(
                "cannot move a record in an empty scope".into(),
            ));
        }

        if !(1..=count).contains(&from) {
            return Err(Error::Internal(format!(
                "stored position {from} is outside 1..={count}, the scope needs reindexing"
            )));
        }

        if !(1..=count).contains(&to) {
            return Err(Error::InvalidInput(format!(
                "target position {to} is outside 1..={count}"
            )));
        }

        Ok(Self { from, to, count })
    }

    /// Plans moving `record_id` to the display position `display_to`
    /// within the snapshot `records` of one scope.
    ///
    /// The snapshot must cover the whole scope and must stay locked until
    /// the plan is written back. Returns the translator built from the
    /// snapshot so the caller can report the display position afterwards.
    pub fn for_display_target<R: Sortable>(
        records: &[R],
        record_id: i64,
        display_to: i32,
        direction: SortDirection,
    ) -> Result<(Self, PositionTranslator), Error> {
        let current = records
            .iter()
            .find(|r| r.record_id() == record_id)
            .ok_or_else(|| Error::record_not_found(record_id))?;

        let count = records.iter().map(Sortable::position).max().unwrap_or(0);
        let translator = PositionTranslator::new(direction, count);
        let to = translator.checked_to_stored(display_to)?;

        Ok((Self::new(current.position(), to, count)?, translator))
    }

    pub fn from(&self) -> i32 {
        self.from
    }

    pub fn to(&self) -> i32 {
        self.to
    }

    pub fn count(&self) -> i32 {
        self.count
    }

    pub fn is_noop(&self) -> bool {
        self.from == self.to
    }

    pub fn shift(&self) -> Option<Shift> {
        if self.from < self.to {
            Some(Shift {
                lower: self.from + 1,
                upper: self.to,
                delta: -1,
            })
        } else if self.to < self.from {
            Some(Shift {
                lower: self.to,
                upper: self.from - 1,
                delta: 1,
            })
        } else {
            None
        }
    }

    /// New stored position of a record that is *not* the one being moved.
    pub fn apply(&self, position: i32) -> i32 {
        match self.shift() {
            Some(shift) if shift.contains(position) => position + shift.delta,
            _ => position,
        }
    }

    /// Number of other records the plan touches.
    pub fn shifted(&self) -> u64 {
        u64::from((self.to - self.from).unsigned_abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Applies a plan to `positions[i]`, `moved` being the index of the moved record.
    fn run(positions: &mut [i32], moved: usize, to: i32) {
        let count = positions.iter().copied().max().unwrap_or(0);
        let plan = MovePlan::new(positions[moved], to, count).unwrap();
        for (i, p) in positions.iter_mut().enumerate() {
            *p = if i == moved { plan.to() } else { plan.apply(*p) };
        }
    }

    fn assert_dense(positions: &[i32]) {
        let mut sorted = positions.to_vec();
        sorted.sort_unstable();
        let expected: Vec<i32> = (1..=positions.len() as i32).collect();
        assert_eq!(sorted, expected);
    }

    #[test]
    fn test_move_up_shifts_block_down() {
        // records a..e at 1..5, move d (4) to 1
        let mut positions = vec![1, 2, 3, 4, 5];
        run(&mut positions, 3, 1);
        assert_eq!(positions, vec![2, 3, 4, 1, 5]);
    }

    #[test]
    fn test_move_down_shifts_block_up() {
        let mut positions = vec![1, 2, 3, 4, 5];
        run(&mut positions, 1, 4);
        assert_eq!(positions, vec![1, 4, 2, 3, 5]);
    }

    #[test]
    fn test_same_position_is_noop() {
        let plan = MovePlan::new(3, 3, 5).unwrap();
        assert!(plan.is_noop());
        assert_eq!(plan.shift(), None);
        assert_eq!(plan.shifted(), 0);
        for p in 1..=5 {
            assert_eq!(plan.apply(p), p);
        }
    }

    #[test]
    fn test_first_to_last_and_back() {
        let mut positions = vec![1, 2, 3, 4, 5, 6];
        run(&mut positions, 0, 6);
        assert_eq!(positions, vec![6, 1, 2, 3, 4, 5]);

        run(&mut positions, 0, 1);
        assert_eq!(positions, vec![1, 2, 3, 4, 5, 6]);

        let plan = MovePlan::new(1, 6, 6).unwrap();
        assert_eq!(plan.shifted(), 5);
        assert_eq!(
            plan.shift(),
            Some(Shift {
                lower: 2,
                upper: 6,
                delta: -1
            })
        );
    }

    struct Row(i64, i32);

    impl Sortable for Row {
        fn record_id(&self) -> i64 {
            self.0
        }

        fn position(&self) -> i32 {
            self.1
        }
    }

    #[test]
    fn test_display_target_descending() {
        let rows: Vec<Row> = (1..=5).map(|p| Row(100 + i64::from(p), p)).collect();
        // displayed top to bottom as 105, 104, 103, 102, 101
        let (plan, translator) =
            MovePlan::for_display_target(&rows, 101, 2, SortDirection::Descending).unwrap();
        assert_eq!(plan.from(), 1);
        assert_eq!(plan.to(), 4);
        assert_eq!(translator.to_display(plan.to()), 2);
    }

    #[test]
    fn test_display_target_missing_record() {
        let rows = vec![Row(1, 1), Row(2, 2)];
        let err = MovePlan::for_display_target(&rows, 3, 1, SortDirection::Ascending).unwrap_err();
        assert!(matches!(err, Error::NotFound { .. }));
    }

    #[test]
    fn test_display_target_out_of_range() {
        let rows: Vec<Row> = (1..=5).map(|p| Row(i64::from(p), p)).collect();
        for direction in [SortDirection::Ascending, SortDirection::Descending] {
            let err = MovePlan::for_display_target(&rows, 2, 10, direction).unwrap_err();
            assert!(err.is_validation());
        }
    }

    #[test]
    fn test_out_of_range_target() {
        let err = MovePlan::new(2, 10, 5).unwrap_err();
        assert!(err.is_validation(), "{err}");
        assert!(MovePlan::new(2, 0, 5).unwrap_err().is_validation());
        assert!(MovePlan::new(1, 1, 0).unwrap_err().is_validation());
    }

    #[test]
    fn test_corrupt_current_position_is_not_a_validation_error() {
        let err = MovePlan::new(9, 1, 5).unwrap_err();
        assert!(matches!(err, Error::Internal(_)));
    }

    #[test]
    fn test_sequence_of_moves_stays_dense() {
        let mut positions: Vec<i32> = (1..=9).collect();
        // deterministic walk over (record, target) pairs
        let mut seed: u32 = 17;
        for _ in 0..200 {
            seed = seed.wrapping_mul(1_103_515_245).wrapping_add(12_345);
            let moved = (seed >> 8) as usize % positions.len();
            let to = ((seed >> 16) % positions.len() as u32) as i32 + 1;
            run(&mut positions, moved, to);
            assert_dense(&positions);
            assert_eq!(positions[moved], to);
        }
    }
}
