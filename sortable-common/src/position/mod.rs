mod direction;
mod plan;
mod translator;

pub use direction::SortDirection;
pub use plan::{MovePlan, Shift};
pub use translator::PositionTranslator;
