// src/schema/arrow.rs

use arrow::datatypes::{DataType, Field as ArrowField, Schema as ArrowSchema};
use once_cell::sync::Lazy;
use std::sync::Arc;

use super::types::{CanonicalColumn, ColumnKind};

static CANONICAL_SCHEMA: Lazy<Arc<ArrowSchema>> = Lazy::new(|| {
    let fields: Vec<ArrowField> = CanonicalColumn::ALL
        .iter()
        .map(|col| {
            // Order Date is the only column rows are dropped for, so it is never null.
            let nullable = *col != CanonicalColumn::OrderDate;
            ArrowField::new(col.name(), map_to_arrow_type(col.kind()), nullable)
        })
        .collect();
    Arc::new(ArrowSchema::new(fields))
});

/// Map a canonical column kind to its Arrow storage type.
///
/// - Date        → Date32 (days since epoch, time-of-day dropped)
/// - Categorical → Utf8
/// - Numeric     → Float64
/// - Integer     → Int64
pub fn map_to_arrow_type(kind: ColumnKind) -> DataType {
    match kind {
        ColumnKind::Date => DataType::Date32,
        ColumnKind::Categorical => DataType::Utf8,
        ColumnKind::Numeric => DataType::Float64,
        ColumnKind::Integer => DataType::Int64,
    }
}

/// The schema shared by every `CanonicalTable`.
pub fn canonical_schema() -> Arc<ArrowSchema> {
    Arc::clone(&CANONICAL_SCHEMA)
}

/// Same fields as `canonical_schema`, but Order Date is nullable: this is
/// the shape produced before unparseable dates are removed.
pub fn unchecked_schema() -> Arc<ArrowSchema> {
    let fields: Vec<ArrowField> = CANONICAL_SCHEMA
        .fields()
        .iter()
        .map(|f| f.as_ref().clone().with_nullable(true))
        .collect();
    Arc::new(ArrowSchema::new(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_ten_typed_fields() {
        let schema = canonical_schema();
        assert_eq!(schema.fields().len(), 10);
        assert_eq!(schema.field(0).name(), "Order Date");
        assert_eq!(schema.field(0).data_type(), &DataType::Date32);
        assert!(!schema.field(0).is_nullable());
        assert_eq!(schema.field(6).data_type(), &DataType::Float64);
        assert_eq!(schema.field(8).data_type(), &DataType::Int64);
        assert!(unchecked_schema().field(0).is_nullable());
    }
}
