use async_trait::async_trait;

use crate::{
    error::Error,
    record::{Scope, SortableRecord},
};

use super::base::BaseDbTrait;

#[async_trait]
pub trait ScopeDbTrait: BaseDbTrait {
    /// Gets a record by `record_id`
    /// ---
    /// Returns `None` if the record does not exist
    /// or belongs to another scope.
    async fn get_record(
        &self,
        scope: &Scope,
        record_id: i64,
    ) -> Result<Option<SortableRecord>, Error>;

    /// Lists every record of `scope` ordered by stored position
    /// ---
    async fn list_records(&self, scope: &Scope) -> Result<Vec<SortableRecord>, Error>;

    /// Highest stored position of `scope`
    /// ---
    /// `0` for an empty scope. The value is stale as soon as
    /// it is returned, so never keep it past one request.
    async fn max_position(&self, scope: &Scope) -> Result<i32, Error>;
}
