use crate::entities::sortable_records;
use sortable_common::{
    error::Error,
    record::{Scope, SortableRecord},
};
use sea_orm::{ColumnTrait, Condition, DbErr};

pub(crate) fn db_error_to_domain(e: DbErr) -> Error {
    Error::Database(e.to_string())
}

pub(crate) fn record_to_domain(model: sortable_records::Model) -> SortableRecord {
    SortableRecord {
        id: model.id,
        scope: Scope {
            resource: model.resource,
            locale: model.locale,
        },
        label: model.label,
        position: model.position,
        created_at: model.created_at.into(),
        updated_at: model.updated_at.into(),
    }
}

/// Filter selecting every row of `scope`.
/// A missing locale matches `locale IS NULL` only.
pub(crate) fn scope_condition(scope: &Scope) -> Condition {
    let locale = match &scope.locale {
        Some(locale) => sortable_records::Column::Locale.eq(locale.as_str()),
        None => sortable_records::Column::Locale.is_null(),
    };

    Condition::all()
        .add(sortable_records::Column::Resource.eq(scope.resource.as_str()))
        .add(locale)
}
