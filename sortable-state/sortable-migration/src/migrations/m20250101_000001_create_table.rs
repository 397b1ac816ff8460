use sea_orm_migration::{prelude::*, sea_orm::DbBackend};

use crate::db_entities::SortableRecord;

const IDX_SORTABLE_RECORDS_SCOPE_POSITION: &str = "idx_sortable_records_scope_position";
const IDX_SORTABLE_RECORDS_UPDATED_AT: &str = "idx_sortable_records_updated_at";

const IDX_NAMES: &[&str] = &[
    IDX_SORTABLE_RECORDS_SCOPE_POSITION,
    IDX_SORTABLE_RECORDS_UPDATED_AT,
];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db_backend = manager.get_database_backend();

        // SQLite only auto-increments `INTEGER PRIMARY KEY`, which is 64 bit there anyway
        let mut id_col = ColumnDef::new(SortableRecord::Id);
        if db_backend == DbBackend::Sqlite {
            id_col.integer();
        } else {
            id_col.big_integer();
        }

        manager
            .create_table(
                Table::create()
                    .table(SortableRecord::Table)
                    .if_not_exists()
                    .col(id_col.not_null().auto_increment().primary_key())
                    .col(ColumnDef::new(SortableRecord::Resource).text().not_null())
                    .col(ColumnDef::new(SortableRecord::Locale).text()) // Nullable
                    .col(ColumnDef::new(SortableRecord::Label).text().not_null())
                    .col(
                        ColumnDef::new(SortableRecord::Position)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(SortableRecord::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(SortableRecord::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Not unique: a shift rewrites a block of positions in one statement
        // and a per-row uniqueness check would fail halfway through it.
        manager
            .create_index(
                Index::create()
                    .name(IDX_SORTABLE_RECORDS_SCOPE_POSITION)
                    .table(SortableRecord::Table)
                    .col(SortableRecord::Resource)
                    .col(SortableRecord::Locale)
                    .col(SortableRecord::Position)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(IDX_SORTABLE_RECORDS_UPDATED_AT)
                    .table(SortableRecord::Table)
                    .col(SortableRecord::UpdatedAt)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for idx_name in IDX_NAMES {
            manager
                .drop_index(
                    Index::drop()
                        .name(*idx_name)
                        .table(SortableRecord::Table)
                        .to_owned(),
                )
                .await?;
        }

        manager
            .drop_table(
                Table::drop()
                    .table(SortableRecord::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;

        Ok(())
    }
}
