// src/filter/mod.rs

pub mod cascade;
pub mod range;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::table::CanonicalTable;

pub use cascade::{apply_filter, derive_options};
pub use range::select_range;

/// Inclusive Order Date interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    /// The span from the table's first to last Order Date.
    pub fn covering(table: &CanonicalTable) -> Option<Self> {
        table
            .date_bounds()
            .map(|(start, end)| Self { start, end })
    }

    /// `start > end`: matches nothing.
    pub fn is_inverted(&self) -> bool {
        self.start > self.end
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// What the user has picked. An empty set at a level means "everything".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSelection {
    pub regions: BTreeSet<String>,
    pub states: BTreeSet<String>,
    pub cities: BTreeSet<String>,
    /// `None` means the table's own min..=max Order Date.
    pub range: Option<DateRange>,
}

impl FilterSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_regions<I: IntoIterator<Item = S>, S: Into<String>>(mut self, regions: I) -> Self {
        self.regions.extend(regions.into_iter().map(Into::into));
        self
    }

    pub fn with_states<I: IntoIterator<Item = S>, S: Into<String>>(mut self, states: I) -> Self {
        self.states.extend(states.into_iter().map(Into::into));
        self
    }

    pub fn with_cities<I: IntoIterator<Item = S>, S: Into<String>>(mut self, cities: I) -> Self {
        self.cities.extend(cities.into_iter().map(Into::into));
        self
    }

    pub fn with_range(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.range = Some(DateRange::new(start, end));
        self
    }

    /// True when no categorical level restricts anything.
    pub fn is_unrestricted(&self) -> bool {
        self.regions.is_empty() && self.states.is_empty() && self.cities.is_empty()
    }
}

/// Choices offered at each level of the Region → State → City cascade,
/// in first-encountered order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub states: Vec<String>,
    pub cities: Vec<String>,
}
