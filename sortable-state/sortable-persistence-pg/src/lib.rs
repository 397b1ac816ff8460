pub mod db;
mod entities;
mod mapping;
mod trait_impl;

pub use db::PostgresStateDb;
