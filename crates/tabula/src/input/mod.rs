//! Input decoding and table loading.

mod loader;
mod raw;

pub use loader::Loader;
pub use raw::RawTable;
