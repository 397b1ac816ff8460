use async_trait::async_trait;

use crate::{
    error::Error,
    position::SortDirection,
    record::{MoveOutcome, MoveRequest, Scope, SortableRecord},
};

use super::base::BaseDbTrait;

#[async_trait]
pub trait PositionDbTrait: BaseDbTrait {
    /// Creates a record at the end of `scope`
    /// ---
    /// The record gets `max_position + 1`, read while
    /// the scope is locked.
    async fn create_record(&self, scope: &Scope, label: String) -> Result<SortableRecord, Error>;

    /// Moves a record to a new display position
    /// ---
    /// Locks the scope, translates `request.to` with the
    /// scope's current count and `direction`, shifts the
    /// intervening records and stores the new position,
    /// all in one transaction.
    /// Fails with a validation error if the record is not
    /// in `scope` or the target is out of range; nothing
    /// is written in that case.
    async fn move_record(
        &self,
        scope: &Scope,
        request: MoveRequest,
        direction: SortDirection,
    ) -> Result<MoveOutcome, Error>;
}
