//! Table model: ordered, typed columns of equal length.

mod column;
#[allow(clippy::module_inception)]
mod table;
mod types;
mod value;

pub use column::Column;
pub use table::{Row, Table};
pub use types::ColumnType;
pub use value::{parse_boolean, parse_date, parse_float, parse_integer, Value};
