use axum::{
    Form,
    extract::{
        Path, Query, State,
        rejection::{FormRejection, QueryRejection},
    },
};
use serde::Deserialize;
use sortable_common::{
    error::Error,
    record::{MoveOutcome, MoveRequest},
};
use tracing::{error, warn};

use super::{ScopeQuery, resolve};
use crate::{error::UpdatePositionRejected, server::ContextData};

#[derive(Debug, Deserialize)]
pub struct UpdatePositionForm {
    pub to: Option<String>,
}

/// `POST /{resource}/{id}/sorting/update_position`
///
/// Answers with the record's display position after the move.
pub async fn update_position(
    State(ctx): State<ContextData>,
    Path((resource, record_id)): Path<(String, String)>,
    query: Result<Query<ScopeQuery>, QueryRejection>,
    form: Result<Form<UpdatePositionForm>, FormRejection>,
) -> Result<String, UpdatePositionRejected> {
    match apply_move(&ctx, &resource, &record_id, query, form).await {
        Ok(outcome) => Ok(outcome.display_position.to_string()),
        Err(e) if e.is_validation() => {
            warn!(
                resource = %resource,
                record_id = %record_id,
                "Position update rejected: {e}"
            );
            Err(UpdatePositionRejected)
        }
        Err(e) => {
            error!(
                resource = %resource,
                record_id = %record_id,
                "Position update failed: {e}"
            );
            Err(UpdatePositionRejected)
        }
    }
}

async fn apply_move(
    ctx: &ContextData,
    resource: &str,
    record_id: &str,
    query: Result<Query<ScopeQuery>, QueryRejection>,
    form: Result<Form<UpdatePositionForm>, FormRejection>,
) -> Result<MoveOutcome, Error> {
    let Query(query) = query.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let (config, scope) = resolve(ctx, resource, query.locale)?;

    let record_id: i64 = record_id
        .parse()
        .map_err(|_| Error::InvalidInput(format!("invalid record id '{record_id}'")))?;

    let Form(form) = form.map_err(|e| Error::InvalidInput(e.body_text()))?;
    let raw_to = form.to.unwrap_or_default();
    let to: i32 = raw_to
        .trim()
        .parse()
        .map_err(|_| Error::InvalidInput(format!("invalid target position '{raw_to}'")))?;

    ctx.reindexer
        .move_to(&scope, MoveRequest { record_id, to }, config.direction)
        .await
}
