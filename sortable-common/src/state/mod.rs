mod base;
mod memory;
mod position;
mod scope;

pub use base::BaseDbTrait;
pub use memory::MemoryStateDb;
pub use position::PositionDbTrait;
pub use scope::ScopeDbTrait;

/// Combined trait for all database operations
/// Should be used through dyn dispatch at the top level
/// to pass the complete database interface
pub trait DatabaseTrait: ScopeDbTrait + PositionDbTrait {}
