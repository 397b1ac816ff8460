pub mod error;
pub mod position;
pub mod record;
pub mod reindexer;
pub mod resource;
pub mod state;
