use arrow::array::BooleanArray;
use chrono::NaiveDate;
use tracing::debug;

use super::DateRange;
use crate::error::Result;
use crate::process::date_parser::to_epoch_days;
use crate::table::CanonicalTable;

/// Keep rows with `start <= Order Date <= end`. An inverted range is not an
/// error; it simply keeps nothing.
pub fn select_range(
    table: &CanonicalTable,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<CanonicalTable> {
    let range = DateRange::new(start, end);
    if range.is_inverted() {
        debug!(%start, %end, "inverted date range selects no rows");
        return Ok(CanonicalTable::empty());
    }

    let (lo, hi) = (to_epoch_days(start), to_epoch_days(end));
    let mask: BooleanArray = table
        .order_dates()
        .values()
        .iter()
        .map(|d| Some(lo <= *d && *d <= hi))
        .collect();
    table.filter(&mask)
}

/// `select_range` over the selection's range, or the whole table when no
/// explicit range was chosen.
pub fn select_optional_range(
    table: &CanonicalTable,
    range: Option<DateRange>,
) -> Result<CanonicalTable> {
    match range {
        Some(r) => select_range(table, r.start, r.end),
        None => Ok(table.clone()),
    }
}
