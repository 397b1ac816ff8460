mod sortable_record;

pub use sortable_record::*;
