use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use sortable_common::{position::SortDirection, record::SortableRecord};

use super::resolve;
use crate::{error::ApiError, field::render_position_field, server::ContextData};

#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub locale: Option<String>,
    /// Any non-empty value switches the listing into sorting mode.
    pub sorting: Option<String>,
}

impl ScopeQuery {
    pub fn sorting_mode(&self) -> bool {
        self.sorting.as_deref().is_some_and(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordRow {
    pub id: i64,
    pub label: String,
    pub position: i32,
    pub display_position: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position_field: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RecordList {
    pub resource: String,
    pub locale: Option<String>,
    pub direction: SortDirection,
    pub count: i32,
    pub records: Vec<RecordRow>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecord {
    pub label: String,
    #[serde(default)]
    pub locale: Option<String>,
}

/// `GET /{resource}`: rows in display order.
pub async fn list_records(
    State(ctx): State<ContextData>,
    Path(resource): Path<String>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<RecordList>, ApiError> {
    let sorting_mode = query.sorting_mode();
    let (config, scope) = resolve(&ctx, &resource, query.locale)?;

    let rendered = ctx.reindexer.render_scope(&scope, config.direction).await?;
    let collection_path = ctx.collection_path(&config.name);

    let records = rendered
        .records
        .into_iter()
        .map(|row| RecordRow {
            position_field: sorting_mode.then(|| {
                render_position_field(&collection_path, row.record.id, row.display_position)
            }),
            id: row.record.id,
            label: row.record.label,
            position: row.record.position,
            display_position: row.display_position,
        })
        .collect();

    Ok(Json(RecordList {
        resource: config.name.clone(),
        locale: scope.locale,
        direction: config.direction,
        count: rendered.count,
        records,
    }))
}

/// `POST /{resource}`: appends a record to its scope.
pub async fn create_record(
    State(ctx): State<ContextData>,
    Path(resource): Path<String>,
    Json(body): Json<CreateRecord>,
) -> Result<(StatusCode, Json<SortableRecord>), ApiError> {
    let (_, scope) = resolve(&ctx, &resource, body.locale)?;

    let record = ctx.reindexer.create(&scope, body.label).await?;

    Ok((StatusCode::CREATED, Json(record)))
}
