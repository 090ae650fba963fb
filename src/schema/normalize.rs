use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::debug;

use super::synonyms::{canonical_token, strip_encoding_artifacts, SynonymTable};
use super::types::CanonicalColumn;
use crate::error::SchemaValidationError;

/// Where a source column ends up after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTarget {
    Canonical(CanonicalColumn),
    /// No synonym matched; kept under its original name but unused downstream.
    Extra(String),
    /// An earlier column already claimed this name.
    Dropped(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMapping {
    pub source_index: usize,
    pub source: String,
    pub target: ColumnTarget,
}

/// Result of mapping a header row onto the canonical schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedSchema {
    /// One entry per source column, in source order.
    pub columns: Vec<ColumnMapping>,
    /// Required columns no source column maps to, in canonical order.
    pub missing: BTreeSet<CanonicalColumn>,
}

impl NormalizedSchema {
    /// Raw name → canonical column for every retained canonical mapping.
    pub fn rename_map(&self) -> HashMap<&str, CanonicalColumn> {
        self.columns
            .iter()
            .filter_map(|m| match m.target {
                ColumnTarget::Canonical(col) => Some((m.source.as_str(), col)),
                _ => None,
            })
            .collect()
    }

    /// Index of the source column that provides `col`.
    pub fn source_index(&self, col: CanonicalColumn) -> Option<usize> {
        self.columns
            .iter()
            .find(|m| m.target == ColumnTarget::Canonical(col))
            .map(|m| m.source_index)
    }

    /// Names of columns passed through without a canonical match.
    pub fn extras(&self) -> Vec<&str> {
        self.columns
            .iter()
            .filter_map(|m| match &m.target {
                ColumnTarget::Extra(name) => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }

    /// Fail with the exact missing list when any required column is absent.
    pub fn validate(self) -> Result<Self, SchemaValidationError> {
        if self.missing.is_empty() {
            Ok(self)
        } else {
            Err(SchemaValidationError {
                missing: self.missing.into_iter().collect(),
            })
        }
    }
}

/// Maps untrusted header names onto canonical columns using a fixed synonym
/// table supplied at construction.
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    synonyms: SynonymTable,
}

impl Normalizer {
    pub fn new(synonyms: SynonymTable) -> Self {
        Self { synonyms }
    }

    pub fn synonyms(&self) -> &SynonymTable {
        &self.synonyms
    }

    pub fn normalize<S: AsRef<str>>(&self, raw_names: &[S]) -> NormalizedSchema {
        let mut claimed: HashSet<CanonicalColumn> = HashSet::new();
        let mut extra_names: HashSet<String> = HashSet::new();
        let mut columns = Vec::with_capacity(raw_names.len());

        for (idx, raw) in raw_names.iter().enumerate() {
            let raw = raw.as_ref();
            let target = match self.synonyms.get(&canonical_token(raw)) {
                Some(col) if claimed.insert(col) => ColumnTarget::Canonical(col),
                Some(col) => {
                    debug!(column = raw, canonical = %col, "dropping duplicate source column");
                    ColumnTarget::Dropped(col.name().to_string())
                }
                None => {
                    let name = strip_encoding_artifacts(raw).to_string();
                    if extra_names.insert(name.clone()) {
                        ColumnTarget::Extra(name)
                    } else {
                        debug!(column = raw, "dropping duplicate extra column");
                        ColumnTarget::Dropped(name)
                    }
                }
            };
            columns.push(ColumnMapping {
                source_index: idx,
                source: raw.to_string(),
                target,
            });
        }

        let missing = CanonicalColumn::ALL
            .iter()
            .copied()
            .filter(|c| !claimed.contains(c))
            .collect();

        NormalizedSchema { columns, missing }
    }
}
