//! Read-only inspection: sampling, structure and column statistics.

mod inspector;
mod statistics;

pub use inspector::{Analysis, ColumnSummary, Inspector, Sample};
pub use statistics::{ColumnStatistics, NumericStatistics};
