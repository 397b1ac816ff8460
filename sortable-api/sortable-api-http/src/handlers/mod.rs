mod position;
mod records;

pub use position::{UpdatePositionForm, update_position};
pub use records::{CreateRecord, RecordList, RecordRow, ScopeQuery, create_record, list_records};

use sortable_common::{error::Error, record::Scope, resource::ResourceConfig};

use crate::server::ContextData;

/// Resolves the resource named in the path and the scope the request targets.
fn resolve<'a>(
    ctx: &'a ContextData,
    resource: &str,
    locale: Option<String>,
) -> Result<(&'a ResourceConfig, Scope), Error> {
    let config = ctx.resources.get(resource)?;
    let scope = Scope::new(config.name.clone()).with_locale(locale);

    Ok((config, scope))
}
