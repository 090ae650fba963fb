use arrow::{
    array::{ArrayRef, Date32Builder, Float64Builder, Int64Builder, StringBuilder},
    record_batch::RecordBatch,
};
use std::sync::Arc;
use tracing::debug;

use crate::error::{DashboardError, Result, SchemaValidationError};
use crate::process::{date_parser, date_parser::DateParser, utils, RawTable};
use crate::schema::{unchecked_schema, CanonicalColumn, ColumnKind, NormalizedSchema};

/// Apply the rename/drop decisions in `schema` to `raw` and type every
/// canonical column. Unparseable Order Dates become null here; removing
/// those rows is `sanitize`'s job.
pub fn to_typed_batch(
    raw: &RawTable,
    schema: &NormalizedSchema,
    dates: &DateParser,
) -> Result<RecordBatch> {
    let mut sources = Vec::with_capacity(CanonicalColumn::ALL.len());
    for col in CanonicalColumn::ALL {
        match schema.source_index(col) {
            Some(idx) => sources.push(idx),
            None => {
                return Err(SchemaValidationError {
                    missing: schema.missing.iter().copied().collect(),
                }
                .into())
            }
        }
    }

    let extras = schema.extras();
    if !extras.is_empty() {
        debug!(?extras, "ignoring non-canonical columns");
    }

    let n = raw.num_rows();
    let cell = |row: &Vec<String>, idx: usize| row.get(idx).and_then(|s| utils::non_empty(s));

    let mut out: Vec<ArrayRef> = Vec::with_capacity(sources.len());
    for (col, idx) in CanonicalColumn::ALL.iter().zip(sources) {
        let array: ArrayRef = match col.kind() {
            ColumnKind::Date => {
                let mut b = Date32Builder::with_capacity(n);
                for row in &raw.rows {
                    let parsed = cell(row, idx).and_then(|s| dates.parse(&s));
                    b.append_option(parsed.map(date_parser::to_epoch_days));
                }
                Arc::new(b.finish())
            }
            ColumnKind::Categorical => {
                let mut b = StringBuilder::with_capacity(n, n * 8);
                for row in &raw.rows {
                    b.append_option(cell(row, idx));
                }
                Arc::new(b.finish())
            }
            ColumnKind::Numeric => {
                let mut b = Float64Builder::with_capacity(n);
                for row in &raw.rows {
                    b.append_option(cell(row, idx).and_then(|s| utils::parse_number(&s)));
                }
                Arc::new(b.finish())
            }
            ColumnKind::Integer => {
                let mut b = Int64Builder::with_capacity(n);
                for row in &raw.rows {
                    b.append_option(cell(row, idx).and_then(|s| utils::parse_integer(&s)));
                }
                Arc::new(b.finish())
            }
        };
        out.push(array);
    }

    RecordBatch::try_new(unchecked_schema(), out).map_err(DashboardError::from)
}
