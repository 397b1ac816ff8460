pub mod error;
pub mod field;
pub mod handlers;
pub mod server;
