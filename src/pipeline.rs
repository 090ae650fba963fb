//! One upload → one `Session`; every user interaction → one `Snapshot`.
//!
//! Each stage returns a new value (RawTable → CanonicalTable → FilteredTable
//! → views); nothing is mutated in place, and a refresh always recomputes
//! from the session's table.

use serde::Serialize;
use tracing::{info, warn};

use crate::config::DashboardConfig;
use crate::error::{DashboardError, Result, SchemaValidationError};
use crate::filter::{
    apply_filter, derive_options, range::select_optional_range, DateRange, FilterOptions,
    FilterSelection,
};
use crate::process::{sanitize, to_typed_batch, DateParser, RawTable};
use crate::schema::{CanonicalColumn, Normalizer};
use crate::table::CanonicalTable;
use crate::views::{self, Views};

/// Outcome of schema validation, surfaced to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationResult {
    Valid(CanonicalTable),
    Missing(Vec<CanonicalColumn>),
}

/// Informational: the selection left no rows. Views are empty, not failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EmptyResultWarning {
    /// The chosen start date is after the end date.
    InvertedRange,
    /// Range and category levels are valid but no row satisfies them all.
    NoMatchingRows,
}

/// Normalizer and date parser for turning uploads into canonical tables.
#[derive(Debug, Clone)]
pub struct Pipeline {
    normalizer: Normalizer,
    dates: DateParser,
    preview_rows: usize,
}

impl Default for Pipeline {
    fn default() -> Self {
        Self::new(Normalizer::default(), DateParser::default())
    }
}

impl Pipeline {
    pub fn new(normalizer: Normalizer, dates: DateParser) -> Self {
        Self {
            normalizer,
            dates,
            preview_rows: DashboardConfig::default().preview_rows,
        }
    }

    pub fn from_config(cfg: &DashboardConfig) -> Self {
        Self {
            normalizer: cfg.normalizer(),
            dates: cfg.date_parser(),
            preview_rows: cfg.preview_rows,
        }
    }

    /// Normalize, type and sanitize `raw`. A missing required column is a
    /// `Missing` result; other failures are errors.
    #[tracing::instrument(level = "info", skip_all, fields(rows = raw.num_rows()))]
    pub fn validate(&self, raw: &RawTable) -> Result<ValidationResult> {
        let schema = self.normalizer.normalize(&raw.headers);
        if !schema.is_complete() {
            let missing: Vec<CanonicalColumn> = schema.missing.iter().copied().collect();
            warn!(?missing, "upload is missing required columns");
            return Ok(ValidationResult::Missing(missing));
        }

        let batch = to_typed_batch(raw, &schema, &self.dates)?;
        let table = sanitize(batch)?;
        info!(
            kept = table.num_rows(),
            dropped = raw.num_rows() - table.num_rows(),
            "validated upload"
        );
        Ok(ValidationResult::Valid(table))
    }

    /// `validate`, treating missing columns as the terminal
    /// `SchemaValidation` error.
    pub fn ingest(&self, raw: &RawTable) -> Result<Session> {
        match self.validate(raw)? {
            ValidationResult::Valid(table) => Ok(Session {
                table,
                preview_rows: self.preview_rows,
            }),
            ValidationResult::Missing(missing) => {
                Err(DashboardError::SchemaValidation(SchemaValidationError { missing }))
            }
        }
    }
}

/// Owns the canonical table of one upload.
#[derive(Debug, Clone)]
pub struct Session {
    table: CanonicalTable,
    preview_rows: usize,
}

impl Session {
    pub fn new(table: CanonicalTable) -> Self {
        Self {
            table,
            preview_rows: DashboardConfig::default().preview_rows,
        }
    }

    pub fn table(&self) -> &CanonicalTable {
        &self.table
    }

    /// Min..=max Order Date of the upload: the date pickers' defaults.
    pub fn default_range(&self) -> Option<DateRange> {
        DateRange::covering(&self.table)
    }

    /// Recompute everything for `selection`.
    ///
    /// Category options and the preview come from the range-clipped table,
    /// so only places with orders in the chosen period are offered. Every
    /// other view reads the fully filtered table.
    #[tracing::instrument(level = "debug", skip_all)]
    pub fn refresh(&self, selection: &FilterSelection) -> Result<Snapshot> {
        let range = selection.range.or_else(|| self.default_range());
        let in_range = select_optional_range(&self.table, selection.range)?;
        let options = derive_options(&in_range, selection);
        let filtered = apply_filter(&in_range, selection)?;
        let views = Views {
            preview: views::preview(&in_range, self.preview_rows),
            ..Views::compute(&filtered, 0)
        };

        let warning = if !filtered.is_empty() {
            None
        } else if range.map_or(false, |r| r.is_inverted()) {
            Some(EmptyResultWarning::InvertedRange)
        } else {
            Some(EmptyResultWarning::NoMatchingRows)
        };
        if let Some(w) = warning {
            warn!(?w, "selection produced no data");
        }

        Ok(Snapshot {
            range,
            options,
            in_range,
            filtered,
            views,
            warning,
        })
    }
}

/// Everything the dashboard shows after one interaction.
#[derive(Debug, Clone)]
pub struct Snapshot {
    /// The range actually applied (explicit, or the table's own bounds).
    pub range: Option<DateRange>,
    pub options: FilterOptions,
    /// The upload clipped to `range`, before the category levels.
    pub in_range: CanonicalTable,
    pub filtered: CanonicalTable,
    pub views: Views,
    pub warning: Option<EmptyResultWarning>,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.filtered.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{init_test_logging, raw_table, superstore, HEADERS};
    use chrono::NaiveDate;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn missing_profit_halts_the_pipeline() -> anyhow::Result<()> {
        init_test_logging();
        let mut raw = raw_table(&[(
            "2016-01-01", "East", "Ohio", "Akron", "A", "X", "1", "1", "1", "Consumer",
        )]);
        let profit = HEADERS.iter().position(|h| *h == "profit").unwrap();
        raw.headers[profit] = "margin_pct".into();

        let result = Pipeline::default().validate(&raw)?;
        assert_eq!(result, ValidationResult::Missing(vec![CanonicalColumn::Profit]));

        let err = Pipeline::default().ingest(&raw).unwrap_err();
        assert_eq!(err.to_string(), "missing required columns: Profit");
        Ok(())
    }

    #[test]
    fn refresh_without_selection_shows_everything() -> anyhow::Result<()> {
        let session = Session::new(superstore());
        let snap = session.refresh(&FilterSelection::default())?;
        assert_eq!(snap.filtered.num_rows(), 12);
        assert_eq!(snap.range, session.default_range());
        assert_eq!(snap.warning, None);
        assert_eq!(snap.views.preview.len(), 5);
        assert_eq!(snap.options.states.len(), 4);
        Ok(())
    }

    #[test]
    fn range_then_cascade() -> anyhow::Result<()> {
        let session = Session::new(superstore());
        let sel = FilterSelection::new()
            .with_regions(["West"])
            .with_range(ymd(2017, 1, 1), ymd(2017, 12, 31));
        let snap = session.refresh(&sel)?;

        assert_eq!(snap.filtered.num_rows(), 2);
        // Washington has no 2017 orders, so it is not offered.
        assert_eq!(snap.options.states, vec!["California"]);
        assert_eq!(snap.options.cities, vec!["Los Angeles", "San Francisco"]);
        let total: f64 = snap.views.region_totals.iter().map(|g| g.sales).sum();
        assert_eq!(total, 315.0);
        Ok(())
    }

    #[test]
    fn inverted_range_is_an_empty_snapshot() -> anyhow::Result<()> {
        let session = Session::new(superstore());
        let sel = FilterSelection::new().with_range(ymd(2017, 1, 1), ymd(2016, 1, 1));
        let snap = session.refresh(&sel)?;
        assert!(snap.is_empty());
        assert_eq!(snap.warning, Some(EmptyResultWarning::InvertedRange));
        assert!(snap.views.category_totals.is_empty());
        assert!(snap.views.monthly_series.is_empty());
        Ok(())
    }

    #[test]
    fn conflicting_levels_are_no_data() -> anyhow::Result<()> {
        let session = Session::new(superstore());
        let sel = FilterSelection::new()
            .with_regions(["East"])
            .with_cities(["Seattle"]);
        let snap = session.refresh(&sel)?;
        assert_eq!(snap.warning, Some(EmptyResultWarning::NoMatchingRows));
        assert_eq!(
            Views {
                preview: Vec::new(),
                ..snap.views.clone()
            },
            Views::default()
        );
        // The summary table still lists the range-clipped rows.
        assert_eq!(snap.views.preview.len(), 5);
        Ok(())
    }

    #[test]
    fn preview_ignores_category_levels() -> anyhow::Result<()> {
        let session = Session::new(superstore());
        let snap = session.refresh(&FilterSelection::new().with_regions(["West"]))?;
        assert_eq!(snap.views.preview[0].city.as_deref(), Some("New York City"));
        assert_eq!(snap.in_range.num_rows(), 12);
        assert_eq!(snap.filtered.num_rows(), 6);

        let sel = FilterSelection::new()
            .with_regions(["West"])
            .with_range(ymd(2017, 1, 1), ymd(2017, 12, 31));
        let snap = session.refresh(&sel)?;
        assert_eq!(snap.in_range.num_rows(), 4);
        assert_eq!(snap.views.preview.len(), 4);
        assert_eq!(snap.views.preview[0].region.as_deref(), Some("East"));
        Ok(())
    }

    #[test]
    #[rustfmt::skip]
    fn config_drives_pipeline() -> anyhow::Result<()> {
        let cfg = DashboardConfig::from_yaml_str(
            "preview_rows: 2\ndate_formats: [\"%d.%m.%Y\"]\nsynonyms:\n  Fecha: Order Date\n",
        )?;
        let mut raw = raw_table(&[
            ("05.01.2016", "East", "Ohio", "Akron", "A", "X", "1", "1", "1", "Consumer"),
            ("2016-01-06", "East", "Ohio", "Akron", "A", "X", "1", "1", "1", "Consumer"),
            ("07.01.2016", "East", "Ohio", "Akron", "A", "X", "1", "1", "1", "Consumer"),
            ("08.01.2016", "East", "Ohio", "Akron", "A", "X", "1", "1", "1", "Consumer"),
        ]);
        raw.headers[0] = "FECHA".into();

        let session = Pipeline::from_config(&cfg).ingest(&raw)?;
        assert_eq!(session.table().num_rows(), 3);
        let snap = session.refresh(&FilterSelection::default())?;
        assert_eq!(snap.views.preview.len(), 2);
        Ok(())
    }
}
