use arrow::{
    array::{Array, AsArray, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray},
    compute::{filter_record_batch, max, min},
    datatypes::{Date32Type, Float64Type, Int64Type},
    record_batch::RecordBatch,
};
use chrono::NaiveDate;

use crate::error::{DashboardError, Result};
use crate::process::date_parser::from_epoch_days;
use crate::schema::{canonical_schema, CanonicalColumn, ColumnKind};

/// A sales table with exactly the ten canonical columns, typed, and no row
/// lacking an Order Date.
///
/// Every constructor checks that layout, so the typed accessors below can
/// rely on it. Values are immutable: filtering returns a new table.
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalTable {
    batch: RecordBatch,
}

impl CanonicalTable {
    pub fn empty() -> Self {
        Self {
            batch: RecordBatch::new_empty(canonical_schema()),
        }
    }

    /// Accept `batch` if its columns line up with the canonical schema by
    /// name and type, and Order Date has no nulls.
    pub fn try_from_batch(batch: RecordBatch) -> Result<Self> {
        let expected = canonical_schema();
        let schema = batch.schema();
        if schema.fields().len() != expected.fields().len() {
            return Err(DashboardError::InvalidTable(format!(
                "expected {} columns, found {}",
                expected.fields().len(),
                schema.fields().len()
            )));
        }
        for (have, want) in schema.fields().iter().zip(expected.fields()) {
            if have.name() != want.name() || have.data_type() != want.data_type() {
                return Err(DashboardError::InvalidTable(format!(
                    "column `{}` ({}) where `{}` ({}) was expected",
                    have.name(),
                    have.data_type(),
                    want.name(),
                    want.data_type()
                )));
            }
        }
        let dates = batch.column(CanonicalColumn::OrderDate.index());
        if dates.null_count() > 0 {
            return Err(DashboardError::InvalidTable(format!(
                "{} rows have no Order Date",
                dates.null_count()
            )));
        }
        let batch = RecordBatch::try_new(expected, batch.columns().to_vec())?;
        Ok(Self { batch })
    }

    pub fn batch(&self) -> &RecordBatch {
        &self.batch
    }

    pub fn into_batch(self) -> RecordBatch {
        self.batch
    }

    pub fn num_rows(&self) -> usize {
        self.batch.num_rows()
    }

    pub fn is_empty(&self) -> bool {
        self.batch.num_rows() == 0
    }

    pub fn order_dates(&self) -> &Date32Array {
        self.batch
            .column(CanonicalColumn::OrderDate.index())
            .as_primitive::<Date32Type>()
    }

    /// Order Date of `row`. Panics if `row` is out of bounds.
    pub fn order_date(&self, row: usize) -> NaiveDate {
        from_epoch_days(self.order_dates().value(row)).unwrap_or_default()
    }

    /// Text column accessor for one of the categorical columns.
    pub fn strings(&self, col: CanonicalColumn) -> &StringArray {
        debug_assert_eq!(col.kind(), ColumnKind::Categorical);
        self.batch.column(col.index()).as_string::<i32>()
    }

    /// Category value of `row` in `col`, `None` when the cell was empty.
    pub fn text(&self, col: CanonicalColumn, row: usize) -> Option<&str> {
        let arr = self.strings(col);
        arr.is_valid(row).then(|| arr.value(row))
    }

    pub fn sales(&self) -> &Float64Array {
        self.numbers(CanonicalColumn::Sales)
    }

    pub fn profit(&self) -> &Float64Array {
        self.numbers(CanonicalColumn::Profit)
    }

    pub fn quantity(&self) -> &Int64Array {
        self.batch
            .column(CanonicalColumn::Quantity.index())
            .as_primitive::<Int64Type>()
    }

    fn numbers(&self, col: CanonicalColumn) -> &Float64Array {
        self.batch.column(col.index()).as_primitive::<Float64Type>()
    }

    /// Earliest and latest Order Date, `None` for an empty table.
    pub fn date_bounds(&self) -> Option<(NaiveDate, NaiveDate)> {
        let dates = self.order_dates();
        let lo = from_epoch_days(min(dates)?)?;
        let hi = from_epoch_days(max(dates)?)?;
        Some((lo, hi))
    }

    /// Rows where `mask` is true. The mask must have one slot per row.
    pub fn filter(&self, mask: &BooleanArray) -> Result<Self> {
        let batch = filter_record_batch(&self.batch, mask)?;
        Ok(Self { batch })
    }
}

impl Default for CanonicalTable {
    fn default() -> Self {
        Self::empty()
    }
}
