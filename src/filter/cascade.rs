//! Region → State → City cascade.
//!
//! Each level is a set of accepted values; an empty set accepts every row.
//! Options for a level are drawn from the rows accepted by the levels above
//! it, and the final table is the conjunction of all three levels.

use arrow::array::{Array, BooleanArray, StringArray};
use std::collections::{BTreeSet, HashSet};
use tracing::debug;

use super::{FilterOptions, FilterSelection};
use crate::error::Result;
use crate::schema::CanonicalColumn;
use crate::table::CanonicalTable;

/// A null cell passes only an unrestricted level.
fn level_accepts(selected: &BTreeSet<String>, values: &StringArray, row: usize) -> bool {
    selected.is_empty() || (values.is_valid(row) && selected.contains(values.value(row)))
}

/// Distinct non-null values of `values` over the rows where `keep` holds.
fn distinct_where(values: &StringArray, keep: impl Fn(usize) -> bool) -> Vec<String> {
    let mut seen: HashSet<&str> = HashSet::new();
    let mut out = Vec::new();
    for row in 0..values.len() {
        if !keep(row) || values.is_null(row) {
            continue;
        }
        let v = values.value(row);
        if seen.insert(v) {
            out.push(v.to_string());
        }
    }
    out
}

/// Options offered at each level given the current selection.
///
/// Region options come from the whole table, State options from rows passing
/// the Region level, City options from rows passing both Region and State.
pub fn derive_options(table: &CanonicalTable, selection: &FilterSelection) -> FilterOptions {
    let regions = table.strings(CanonicalColumn::Region);
    let states = table.strings(CanonicalColumn::State);
    let cities = table.strings(CanonicalColumn::City);

    let in_region = |row: usize| level_accepts(&selection.regions, regions, row);
    let in_state = |row: usize| in_region(row) && level_accepts(&selection.states, states, row);

    FilterOptions {
        regions: distinct_where(regions, |_| true),
        states: distinct_where(states, &in_region),
        cities: distinct_where(cities, &in_state),
    }
}

/// Rows accepted by every level at once.
pub fn selection_mask(table: &CanonicalTable, selection: &FilterSelection) -> BooleanArray {
    let regions = table.strings(CanonicalColumn::Region);
    let states = table.strings(CanonicalColumn::State);
    let cities = table.strings(CanonicalColumn::City);

    (0..table.num_rows())
        .map(|row| {
            Some(
                level_accepts(&selection.regions, regions, row)
                    && level_accepts(&selection.states, states, row)
                    && level_accepts(&selection.cities, cities, row),
            )
        })
        .collect()
}

/// Restrict `table` to the rows matching the selection's categorical levels.
/// The date range is applied separately by `select_range`.
pub fn apply_filter(table: &CanonicalTable, selection: &FilterSelection) -> Result<CanonicalTable> {
    if selection.is_unrestricted() {
        return Ok(table.clone());
    }
    let filtered = table.filter(&selection_mask(table, selection))?;
    debug!(
        before = table.num_rows(),
        after = filtered.num_rows(),
        regions = selection.regions.len(),
        states = selection.states.len(),
        cities = selection.cities.len(),
        "applied category filter"
    );
    Ok(filtered)
}
