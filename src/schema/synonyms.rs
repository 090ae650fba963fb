//! Static lookup of header spellings onto canonical columns.
//!
//! Keys are canonical tokens (see [`canonical_token`]), so one entry such as
//! `order_date` already covers "Order Date", "order-date", "ORDER.DATE" and
//! " order_date ".

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

use super::types::CanonicalColumn;

/// Prefixes left behind by byte-order marks: the raw code point, its
/// ISO-8859-1 reading and the result of decoding that reading a second time.
const BOM_ARTIFACTS: [&str; 3] = ["\u{feff}", "ï»¿", "Ã¯Â»Â¿"];

static SEPARATORS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\s._\-]+").unwrap());

const DEFAULT_SYNONYMS: &[(&str, CanonicalColumn)] = &[
    ("order_date", CanonicalColumn::OrderDate),
    ("orderdate", CanonicalColumn::OrderDate),
    ("order_dt", CanonicalColumn::OrderDate),
    ("date", CanonicalColumn::OrderDate),
    ("purchase_date", CanonicalColumn::OrderDate),
    ("transaction_date", CanonicalColumn::OrderDate),
    ("region", CanonicalColumn::Region),
    ("market", CanonicalColumn::Region),
    ("sales_region", CanonicalColumn::Region),
    ("state", CanonicalColumn::State),
    ("province", CanonicalColumn::State),
    ("state_province", CanonicalColumn::State),
    ("state_or_province", CanonicalColumn::State),
    ("city", CanonicalColumn::City),
    ("town", CanonicalColumn::City),
    ("customer_city", CanonicalColumn::City),
    ("category", CanonicalColumn::Category),
    ("product_category", CanonicalColumn::Category),
    ("sub_category", CanonicalColumn::SubCategory),
    ("subcategory", CanonicalColumn::SubCategory),
    ("sub_category_name", CanonicalColumn::SubCategory),
    ("product_sub_category", CanonicalColumn::SubCategory),
    ("product_subcategory", CanonicalColumn::SubCategory),
    ("sales", CanonicalColumn::Sales),
    ("revenue", CanonicalColumn::Sales),
    ("sales_amount", CanonicalColumn::Sales),
    ("total_sales", CanonicalColumn::Sales),
    ("profit", CanonicalColumn::Profit),
    ("net_profit", CanonicalColumn::Profit),
    ("profit_amount", CanonicalColumn::Profit),
    ("quantity", CanonicalColumn::Quantity),
    ("qty", CanonicalColumn::Quantity),
    ("units", CanonicalColumn::Quantity),
    ("quantity_ordered", CanonicalColumn::Quantity),
    ("segment", CanonicalColumn::Segment),
    ("customer_segment", CanonicalColumn::Segment),
    ("market_segment", CanonicalColumn::Segment),
];

/// Remove any leading byte-order-mark remnants.
pub fn strip_encoding_artifacts(raw: &str) -> &str {
    let mut s = raw;
    loop {
        match BOM_ARTIFACTS.iter().find(|p| s.starts_with(*p)) {
            Some(prefix) => s = &s[prefix.len()..],
            None => return s,
        }
    }
}

/// Trim, lower-case and collapse runs of whitespace, `.`, `-` and `_` into a
/// single `_`.
pub fn canonical_token(raw: &str) -> String {
    let cleaned = strip_encoding_artifacts(raw).trim().to_lowercase();
    SEPARATORS
        .replace_all(&cleaned, "_")
        .trim_matches('_')
        .to_string()
}

/// Immutable token → canonical column mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynonymTable {
    entries: HashMap<String, CanonicalColumn>,
}

impl SynonymTable {
    /// A table with no entries at all; nothing will map.
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Build from arbitrary spellings. Each key is canonicalized, so callers
    /// may pass either tokens or display-style names.
    pub fn from_entries<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, CanonicalColumn)>,
        S: AsRef<str>,
    {
        Self::empty().with_entries(entries)
    }

    /// Copy of this table with `entries` added; later entries override.
    pub fn with_entries<I, S>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (S, CanonicalColumn)>,
        S: AsRef<str>,
    {
        for (spelling, col) in entries {
            self.entries.insert(canonical_token(spelling.as_ref()), col);
        }
        self
    }

    /// Look up an already canonicalized token.
    pub fn get(&self, token: &str) -> Option<CanonicalColumn> {
        self.entries.get(token).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for SynonymTable {
    fn default() -> Self {
        Self::from_entries(DEFAULT_SYNONYMS.iter().copied())
    }
}
