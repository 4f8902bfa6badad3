// Domain data shapes shared across layers

pub mod codes;
pub mod field;
pub mod record;

pub use codes::{CodeTable, BINARY_CODES, TEST_RESULT_CODES};
pub use field::{Field, FieldKind, FieldSpec, Imputation, FIELD_COUNT, FIELD_SPECS};
pub use record::{CanonicalRecord, CanonicalValue, RawSurveyRow};
