// src/process/mod.rs
//
// RawTable → typed batch → CanonicalTable.

pub mod convert;
pub mod date_parser;
pub mod raw_table;
pub mod sanitize;
pub mod utils;

pub use convert::to_typed_batch;
pub use date_parser::DateParser;
pub use raw_table::RawTable;
pub use sanitize::sanitize;
