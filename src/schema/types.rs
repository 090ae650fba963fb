// src/schema/types.rs

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a canonical column's cells are typed once the table is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnKind {
    Date,
    Categorical,
    Numeric,
    Integer,
}

/// One of the ten fields every sales table must provide.
///
/// Declaration order is the column order of a `CanonicalTable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CanonicalColumn {
    #[serde(rename = "Order Date")]
    OrderDate,
    Region,
    State,
    City,
    Category,
    #[serde(rename = "Sub-Category")]
    SubCategory,
    Sales,
    Profit,
    Quantity,
    Segment,
}

impl CanonicalColumn {
    pub const ALL: [CanonicalColumn; 10] = [
        CanonicalColumn::OrderDate,
        CanonicalColumn::Region,
        CanonicalColumn::State,
        CanonicalColumn::City,
        CanonicalColumn::Category,
        CanonicalColumn::SubCategory,
        CanonicalColumn::Sales,
        CanonicalColumn::Profit,
        CanonicalColumn::Quantity,
        CanonicalColumn::Segment,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CanonicalColumn::OrderDate => "Order Date",
            CanonicalColumn::Region => "Region",
            CanonicalColumn::State => "State",
            CanonicalColumn::City => "City",
            CanonicalColumn::Category => "Category",
            CanonicalColumn::SubCategory => "Sub-Category",
            CanonicalColumn::Sales => "Sales",
            CanonicalColumn::Profit => "Profit",
            CanonicalColumn::Quantity => "Quantity",
            CanonicalColumn::Segment => "Segment",
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            CanonicalColumn::OrderDate => ColumnKind::Date,
            CanonicalColumn::Sales | CanonicalColumn::Profit => ColumnKind::Numeric,
            CanonicalColumn::Quantity => ColumnKind::Integer,
            _ => ColumnKind::Categorical,
        }
    }

    /// Position of this column inside a `CanonicalTable` batch.
    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|c| c.name() == name)
    }
}

impl fmt::Display for CanonicalColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
