use sea_orm_migration::prelude::*;

#[derive(Iden)]
#[iden = "sortable_records"]
pub enum SortableRecord {
    Table,
    #[iden = "id"]
    Id,
    #[iden = "resource"]
    Resource,
    #[iden = "locale"]
    Locale,
    #[iden = "label"]
    Label,
    #[iden = "position"]
    Position,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}
