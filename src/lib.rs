pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod load;
pub mod pipeline;
pub mod process;
pub mod schema;
pub mod table;
pub mod views;

#[cfg(test)]
pub(crate) mod test_support;

pub use error::{DashboardError, Result};
pub use filter::{DateRange, FilterOptions, FilterSelection};
pub use pipeline::{EmptyResultWarning, Pipeline, Session, Snapshot, ValidationResult};
pub use schema::CanonicalColumn;
pub use table::CanonicalTable;
