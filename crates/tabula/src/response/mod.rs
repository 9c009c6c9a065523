//! Structured responses: the result envelope and per-tool payloads.

mod payload;
mod result;

pub use payload::{
    AnalyzeResponse, AnalyzedColumn, ColumnInfo, ColumnStatsResponse, ConvertResponse,
    FilterResponse, FormatsResponse, LoadResponse, SampleResponse, SortResponse,
};
pub use result::{ErrorPayload, OperationResult};
