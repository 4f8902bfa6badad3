/// Labels and defaults shared across the pipeline.
/// Survey labels stay in Portuguese because downstream consumers group on them.

// Binary yes/no labels
pub const LABEL_YES: &str = "Sim";
pub const LABEL_NO: &str = "Não";

// Test result labels
pub const LABEL_POSITIVE: &str = "Positivo";
pub const LABEL_NEGATIVE: &str = "Negativo";
pub const LABEL_INCONCLUSIVE: &str = "Indeterminado";
pub const LABEL_NO_TEST: &str = "Sem Teste";

/// Code substituted for a missing answer in fields whose absence means "no"
pub const CODE_NO: i64 = 2;

/// Raw code for "yes" in survey instrument answers that are not recoded
pub const CODE_YES: i64 = 1;

/// Field separator for both raw and canonical files
pub const DELIMITER: u8 = b',';

/// Key used in value counts for absent values
pub const MISSING_KEY: &str = "(missing)";

// Summary defaults
pub const TOP_ESTADOS: usize = 15;
pub const AGE_HISTOGRAM_BINS: usize = 20;

/// Default number of sample issues kept in a quality report
pub const DEFAULT_MAX_SAMPLES: usize = 20;
