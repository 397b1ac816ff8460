use async_trait::async_trait;
use sea_orm::{EntityTrait, QueryFilter, QueryOrder};
use sortable_common::{
    error::Error,
    record::{Scope, SortableRecord},
    state::ScopeDbTrait,
};

use crate::{
    db::PostgresStateDb,
    entities::sortable_records,
    mapping::{db_error_to_domain, record_to_domain, scope_condition},
};

#[async_trait]
impl ScopeDbTrait for PostgresStateDb {
    async fn get_record(
        &self,
        scope: &Scope,
        record_id: i64,
    ) -> Result<Option<SortableRecord>, Error> {
        let maybe_model = sortable_records::Entity::find_by_id(record_id)
            .filter(scope_condition(scope))
            .one(&self.conn)
            .await
            .map_err(db_error_to_domain)?;

        Ok(maybe_model.map(record_to_domain))
    }

    async fn list_records(&self, scope: &Scope) -> Result<Vec<SortableRecord>, Error> {
        let models = sortable_records::Entity::find()
            .filter(scope_condition(scope))
            .order_by_asc(sortable_records::Column::Position)
            .order_by_asc(sortable_records::Column::Id)
            .all(&self.conn)
            .await
            .map_err(db_error_to_domain)?;

        Ok(models.into_iter().map(record_to_domain).collect())
    }

    async fn max_position(&self, scope: &Scope) -> Result<i32, Error> {
        let last = sortable_records::Entity::find()
            .filter(scope_condition(scope))
            .order_by_desc(sortable_records::Column::Position)
            .one(&self.conn)
            .await
            .map_err(db_error_to_domain)?;

        Ok(last.map(|m| m.position).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use sortable_common::state::PositionDbTrait;

    use super::*;
    use crate::trait_impl::test_util::memory_db;

    #[tokio::test]
    async fn test_scopes_are_isolated_by_locale() {
        let db = memory_db().await;
        let plain = Scope::new("products");
        let german = Scope::new("products").with_locale(Some("de".into()));

        let a = db.create_record(&plain, "a".into()).await.unwrap();
        db.create_record(&plain, "b".into()).await.unwrap();
        let de = db.create_record(&german, "a-de".into()).await.unwrap();

        assert_eq!(db.max_position(&plain).await.unwrap(), 2);
        assert_eq!(db.max_position(&german).await.unwrap(), 1);
        assert_eq!(de.position, 1);

        assert!(db.get_record(&german, a.id).await.unwrap().is_none());
        let found = db.get_record(&plain, a.id).await.unwrap().unwrap();
        assert_eq!(found.label, "a");
        assert_eq!(found.scope, plain);

        let labels: Vec<String> = db
            .list_records(&plain)
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.label)
            .collect();
        assert_eq!(labels, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn test_empty_scope() {
        let db = memory_db().await;
        let scope = Scope::new("nothing");

        assert_eq!(db.max_position(&scope).await.unwrap(), 0);
        assert!(db.list_records(&scope).await.unwrap().is_empty());
    }
}
