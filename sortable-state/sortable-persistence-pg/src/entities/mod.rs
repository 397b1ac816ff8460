pub mod sortable_records;
