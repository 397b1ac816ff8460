use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::{
    error::Error,
    position::{PositionTranslator, SortDirection},
    record::{MoveOutcome, MoveRequest, Scope, Sortable, SortableRecord},
    state::DatabaseTrait,
};

/// A record together with the position the user sees for it.
#[derive(Clone, Debug, Serialize)]
pub struct DisplayedRecord {
    #[serde(flatten)]
    pub record: SortableRecord,
    pub display_position: i32,
}

/// One rendering pass over a scope.
///
/// `count` was read once for the whole pass and is what every
/// `display_position` was computed from.
#[derive(Clone, Debug, Serialize)]
pub struct RenderedScope {
    pub count: i32,
    pub records: Vec<DisplayedRecord>,
}

/// Moves records inside their scope and renders scopes in display order.
#[derive(Debug, Clone)]
pub struct PositionReindexer {
    db: Arc<dyn DatabaseTrait>,
}

impl PositionReindexer {
    pub fn new(db: Arc<dyn DatabaseTrait>) -> Self {
        Self { db }
    }

    pub fn db(&self) -> &Arc<dyn DatabaseTrait> {
        &self.db
    }

    /// Display position of `record` in a scope whose highest stored
    /// position is `count`.
    pub fn display_position<R: Sortable>(record: &R, count: i32, direction: SortDirection) -> i32 {
        PositionTranslator::new(direction, count).to_display(record.position())
    }

    pub async fn create(&self, scope: &Scope, label: String) -> Result<SortableRecord, Error> {
        let record = self.db.create_record(scope, label).await?;

        debug!(
            scope = %scope,
            record_id = record.id,
            position = record.position,
            "Appended record"
        );

        Ok(record)
    }

    pub async fn move_to(
        &self,
        scope: &Scope,
        request: MoveRequest,
        direction: SortDirection,
    ) -> Result<MoveOutcome, Error> {
        match self.db.move_record(scope, request, direction).await {
            Ok(outcome) => {
                info!(
                    scope = %scope,
                    record_id = request.record_id,
                    from = outcome.previous_position,
                    to = outcome.record.position,
                    shifted = outcome.shifted,
                    "Moved record"
                );
                Ok(outcome)
            }
            Err(e) if e.is_validation() => {
                warn!(
                    scope = %scope,
                    record_id = request.record_id,
                    to = request.to,
                    "Rejected move: {e}"
                );
                Err(e)
            }
            Err(e) => {
                error!(
                    scope = %scope,
                    record_id = request.record_id,
                    to = request.to,
                    "Move failed in storage: {e}"
                );
                Err(e)
            }
        }
    }

    /// Lists `scope` in display order, top row first.
    pub async fn render_scope(
        &self,
        scope: &Scope,
        direction: SortDirection,
    ) -> Result<RenderedScope, Error> {
        let records = self.db.list_records(scope).await?;

        // The listing is already a consistent snapshot of the scope,
        // so its highest position is the count for this pass.
        let count = records.iter().map(|r| r.position).max().unwrap_or(0);
        let translator = PositionTranslator::new(direction, count);

        let mut records: Vec<DisplayedRecord> = records
            .into_iter()
            .map(|record| DisplayedRecord {
                display_position: translator.to_display(record.position),
                record,
            })
            .collect();
        records.sort_by_key(|r| (r.display_position, r.record.id));

        Ok(RenderedScope { count, records })
    }
}
