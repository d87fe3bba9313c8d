//! Data loading and shaping
//!
//! The path from a resource body to chart-ready series:
//!
//! - `csv_parser`: delimited text to a [`ParsedTable`](crate::types::ParsedTable)
//!   of typed cells
//! - `validator`: one record to a [`Row`](crate::types::Row) or a [`Rejection`]
//! - `loader`: fetch + parse + validate, producing a
//!   [`FilteredDataset`](crate::types::FilteredDataset)
//! - `chart_engine`: grouping into [`Series`](crate::types::Series) with
//!   per-category styling
//!
//! ## Error Handling
//!
//! Loads return `LoadResult<T>`. A load fails with
//! - `LoadError::Network` when the fetch status is not 2xx
//! - `LoadError::Parse` when the body cannot be parsed (see [`DataError`])
//!
//! Individually invalid rows never fail a load; they are dropped.

mod chart_engine;
mod csv_parser;
mod error;
mod loader;
mod validator;

pub use chart_engine::*;
pub use csv_parser::*;
pub use error::*;
pub use loader::*;
pub use validator::*;
