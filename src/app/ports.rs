use crate::domain::{CanonicalRecord, RawSurveyRow};
use crate::error::Result;

/// Supplies raw survey rows already projected onto the fixed schema.
/// Implementations validate the column set before yielding any row.
pub trait SurveySource {
    fn describe(&self) -> String;
    fn read_rows(&mut self) -> Result<Vec<RawSurveyRow>>;
}

/// Receives the complete canonical dataset in one call
pub trait CanonicalSink {
    fn describe(&self) -> String;
    fn write_all(&mut self, records: &[CanonicalRecord]) -> Result<()>;
}
