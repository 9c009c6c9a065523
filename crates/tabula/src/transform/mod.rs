//! Transformations that derive new tables: filter, sort, convert.

mod engine;
mod operations;

pub use engine::{Conversion, Transformer};
pub use operations::{FilterOperator, FilterSpec};
