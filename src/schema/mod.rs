pub mod arrow;
pub mod normalize;
pub mod synonyms;
pub mod types;

pub use arrow::{canonical_schema, map_to_arrow_type, unchecked_schema};
pub use normalize::{ColumnMapping, ColumnTarget, NormalizedSchema, Normalizer};
pub use synonyms::{canonical_token, SynonymTable};
pub use types::{CanonicalColumn, ColumnKind};
