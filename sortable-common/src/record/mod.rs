mod scope;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub use scope::Scope;

/// Capability of an entity that can be ordered by a stored position.
pub trait Sortable {
    fn record_id(&self) -> i64;

    fn position(&self) -> i32;
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SortableRecord {
    pub id: i64,
    pub scope: Scope,
    pub label: String,
    pub position: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Sortable for SortableRecord {
    fn record_id(&self) -> i64 {
        self.id
    }

    fn position(&self) -> i32 {
        self.position
    }
}

/// A user's request to move a record, expressed in display terms.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveRequest {
    pub record_id: i64,
    pub to: i32,
}

/// Result of a committed move.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct MoveOutcome {
    /// The moved record, carrying its new stored position.
    pub record: SortableRecord,
    pub previous_position: i32,
    /// Highest stored position of the scope while the move ran.
    pub count: i32,
    /// Number of other records that slid by one slot.
    pub shifted: u64,
    /// Position of the record as the user sees it after the move.
    pub display_position: i32,
}
