use arrow::{
    compute::{filter_record_batch, is_not_null},
    record_batch::RecordBatch,
};
use tracing::debug;

use crate::error::Result;
use crate::schema::CanonicalColumn;
use crate::table::CanonicalTable;

/// Drop every row whose Order Date failed to parse. There is no
/// partial-acceptance mode; losing every row yields an empty table.
pub fn sanitize(batch: RecordBatch) -> Result<CanonicalTable> {
    let before = batch.num_rows();
    let keep = is_not_null(batch.column(CanonicalColumn::OrderDate.index()))?;
    let kept = filter_record_batch(&batch, &keep)?;

    let dropped = before - kept.num_rows();
    if dropped > 0 {
        debug!(dropped, kept = kept.num_rows(), "dropped rows with unparseable Order Date");
    }

    CanonicalTable::try_from_batch(kept)
}
