use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::Mutex;

use crate::{
    error::Error,
    position::{MovePlan, SortDirection},
    record::{MoveOutcome, MoveRequest, Scope, SortableRecord},
};

use super::{BaseDbTrait, DatabaseTrait, PositionDbTrait, ScopeDbTrait};

/// Process-local store.
///
/// Every operation holds one lock for its whole duration, which
/// gives moves the same all-or-nothing visibility a transaction
/// with a locked scope gives them in PostgreSQL.
#[derive(Debug, Default)]
pub struct MemoryStateDb {
    state: Mutex<MemoryState>,
}

#[derive(Debug, Default)]
struct MemoryState {
    last_id: i64,
    scopes: HashMap<Scope, Vec<SortableRecord>>,
}

impl MemoryStateDb {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BaseDbTrait for MemoryStateDb {
    async fn ping(&self) -> Result<(), Error> {
        Ok(())
    }
}

#[async_trait]
impl ScopeDbTrait for MemoryStateDb {
    async fn get_record(
        &self,
        scope: &Scope,
        record_id: i64,
    ) -> Result<Option<SortableRecord>, Error> {
        let state = self.state.lock().await;

        Ok(state
            .scopes
            .get(scope)
            .and_then(|records| records.iter().find(|r| r.id == record_id))
            .cloned())
    }

    async fn list_records(&self, scope: &Scope) -> Result<Vec<SortableRecord>, Error> {
        let state = self.state.lock().await;

        let mut records = state.scopes.get(scope).cloned().unwrap_or_default();
        records.sort_by_key(|r| (r.position, r.id));

        Ok(records)
    }

    async fn max_position(&self, scope: &Scope) -> Result<i32, Error> {
        let state = self.state.lock().await;

        Ok(state
            .scopes
            .get(scope)
            .and_then(|records| records.iter().map(|r| r.position).max())
            .unwrap_or(0))
    }
}

#[async_trait]
impl PositionDbTrait for MemoryStateDb {
    async fn create_record(&self, scope: &Scope, label: String) -> Result<SortableRecord, Error> {
        let mut state = self.state.lock().await;

        state.last_id += 1;
        let id = state.last_id;

        let records = state.scopes.entry(scope.clone()).or_default();
        let position = records.iter().map(|r| r.position).max().unwrap_or(0) + 1;
        let now = Utc::now();

        let record = SortableRecord {
            id,
            scope: scope.clone(),
            label,
            position,
            created_at: now,
            updated_at: now,
        };
        records.push(record.clone());

        Ok(record)
    }

    async fn move_record(
        &self,
        scope: &Scope,
        request: MoveRequest,
        direction: SortDirection,
    ) -> Result<MoveOutcome, Error> {
        let mut state = self.state.lock().await;

        let records = state
            .scopes
            .get_mut(scope)
            .ok_or_else(|| Error::record_not_found(request.record_id))?;

        let (plan, translator) = MovePlan::for_display_target(
            records.as_slice(),
            request.record_id,
            request.to,
            direction,
        )?;

        let now = Utc::now();
        let mut moved = None;

        for record in records.iter_mut() {
            let position = if record.id == request.record_id {
                plan.to()
            } else {
                plan.apply(record.position)
            };

            if position != record.position {
                record.position = position;
                record.updated_at = now;
            }

            if record.id == request.record_id {
                moved = Some(record.clone());
            }
        }

        let record = moved.ok_or_else(|| Error::record_not_found(request.record_id))?;

        Ok(MoveOutcome {
            display_position: translator.to_display(record.position),
            previous_position: plan.from(),
            count: plan.count(),
            shifted: plan.shifted(),
            record,
        })
    }
}

impl DatabaseTrait for MemoryStateDb {}
