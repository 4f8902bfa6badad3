use serde::Serialize;
use tracing::debug;

use crate::config::{PipelineConfig, UnmappedPolicy};
use crate::domain::codes::{parse_code, CodeTable};
use crate::domain::{
    CanonicalRecord, CanonicalValue, Field, FieldSpec, Imputation, RawSurveyRow, FIELD_COUNT,
};
use crate::error::{NormalizeError, Result};

/// How a single cell reached its canonical value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RecodeOutcome {
    /// A raw code found in the field's table
    Mapped,
    /// The cell already held one of the field's labels
    AlreadyLabeled,
    /// Absent value replaced by the field's default code
    Imputed,
    /// Absent or unrecognized value replaced by the field's fallback label
    Fallback,
    /// Present value outside the field's table, carried through unchanged
    Unmapped,
    /// Absent value in a field without an imputation rule
    Missing,
    /// Passthrough field with a present value
    PassedThrough,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recoded {
    pub value: CanonicalValue,
    pub outcome: RecodeOutcome,
}

impl Recoded {
    fn new(value: CanonicalValue, outcome: RecodeOutcome) -> Self {
        Self { value, outcome }
    }
}

/// A canonical record together with the per-field recoding outcomes
#[derive(Debug, Clone)]
pub struct NormalizedRow {
    pub record: CanonicalRecord,
    pub outcomes: [RecodeOutcome; FIELD_COUNT],
}

impl NormalizedRow {
    pub fn outcome(&self, field: Field) -> RecodeOutcome {
        self.outcomes[field.index()]
    }
}

/// Trait for turning projected raw rows into canonical records
pub trait Normalizer {
    /// `row_number` is the 1-based data row, used in error messages
    fn normalize(&self, row_number: usize, row: &RawSurveyRow) -> Result<NormalizedRow>;
}

/// Normalizer driven by the fixed field table
pub struct SurveyNormalizer {
    policies: [UnmappedPolicy; FIELD_COUNT],
}

impl SurveyNormalizer {
    /// Every field passes unmapped values through
    pub fn new() -> Self {
        Self {
            policies: [UnmappedPolicy::PassThrough; FIELD_COUNT],
        }
    }

    pub fn from_config(config: &PipelineConfig) -> Self {
        let mut policies = [UnmappedPolicy::PassThrough; FIELD_COUNT];
        for field in Field::ALL {
            policies[field.index()] = config.policy_for(field);
        }
        Self { policies }
    }

    pub fn policy_for(&self, field: Field) -> UnmappedPolicy {
        self.policies[field.index()]
    }
}

impl Default for SurveyNormalizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Normalizer for SurveyNormalizer {
    fn normalize(&self, row_number: usize, row: &RawSurveyRow) -> Result<NormalizedRow> {
        let mut record = CanonicalRecord::default();
        let mut outcomes = [RecodeOutcome::Missing; FIELD_COUNT];

        for field in Field::ALL {
            let raw = row.get(field);
            let recoded = recode(field.spec(), raw);

            if recoded.outcome == RecodeOutcome::Unmapped {
                debug!(field = %field, row = row_number, value = ?raw, "unmapped value");
                if self.policy_for(field) == UnmappedPolicy::Reject {
                    return Err(NormalizeError::UnmappedValue {
                        field: field.canonical_name(),
                        row: row_number,
                        value: raw.unwrap_or_default().to_string(),
                    });
                }
            }

            outcomes[field.index()] = recoded.outcome;
            record.set(field, recoded.value);
        }

        Ok(NormalizedRow { record, outcomes })
    }
}

/// Apply a field's imputation and recoding rules to one raw cell.
///
/// Recoding is defined over raw numeric codes only: a cell that already holds
/// one of the field's labels is returned as that label.
pub fn recode(spec: &FieldSpec, raw: Option<&str>) -> Recoded {
    let Some(table) = spec.kind.code_table() else {
        return match raw {
            Some(text) => Recoded::new(
                CanonicalValue::Text(text.to_string()),
                RecodeOutcome::PassedThrough,
            ),
            None => Recoded::new(CanonicalValue::Missing, RecodeOutcome::Missing),
        };
    };

    match (spec.imputation, raw) {
        (Imputation::FallbackLabel(fallback), raw) => {
            let recoded = raw.map(|text| lookup(table, text));
            match recoded {
                Some(r) if r.outcome != RecodeOutcome::Unmapped => r,
                Some(_) if raw == Some(fallback) => {
                    Recoded::new(CanonicalValue::Label(fallback), RecodeOutcome::AlreadyLabeled)
                }
                _ => Recoded::new(CanonicalValue::Label(fallback), RecodeOutcome::Fallback),
            }
        }
        (Imputation::DefaultCode(code), None) => match table.label(code) {
            Some(label) => Recoded::new(CanonicalValue::Label(label), RecodeOutcome::Imputed),
            None => Recoded::new(
                CanonicalValue::Text(code.to_string()),
                RecodeOutcome::Unmapped,
            ),
        },
        (Imputation::None, None) => Recoded::new(CanonicalValue::Missing, RecodeOutcome::Missing),
        (_, Some(text)) => lookup(table, text),
    }
}

fn lookup(table: &CodeTable, text: &str) -> Recoded {
    if let Some(label) = parse_code(text).and_then(|code| table.label(code)) {
        Recoded::new(CanonicalValue::Label(label), RecodeOutcome::Mapped)
    } else if let Some(label) = table.existing_label(text) {
        Recoded::new(CanonicalValue::Label(label), RecodeOutcome::AlreadyLabeled)
    } else {
        Recoded::new(CanonicalValue::Text(text.to_string()), RecodeOutcome::Unmapped)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label(value: &'static str) -> CanonicalValue {
        CanonicalValue::Label(value)
    }

    fn text(value: &str) -> CanonicalValue {
        CanonicalValue::Text(value.to_string())
    }

    #[test]
    fn test_binary_codes_are_labeled() {
        let spec = Field::SintomaFebre.spec();
        assert_eq!(recode(spec, Some("1")).value, label("Sim"));
        assert_eq!(recode(spec, Some("2")).value, label("Não"));
        assert_eq!(recode(spec, Some("2.0")).outcome, RecodeOutcome::Mapped);
    }

    #[test]
    fn test_absent_answer_imputed_as_no() {
        for field in [Field::ProcurouAtendimento, Field::FezTeste, Field::TrabalhoRemoto] {
            let recoded = recode(field.spec(), None);
            assert_eq!(recoded.value, label("Não"), "{field}");
            assert_eq!(recoded.outcome, RecodeOutcome::Imputed);
        }
    }

    #[test]
    fn test_absent_symptom_stays_missing() {
        let recoded = recode(Field::SintomaTosse.spec(), None);
        assert_eq!(recoded.value, CanonicalValue::Missing);
        assert_eq!(recoded.outcome, RecodeOutcome::Missing);
    }

    #[test]
    fn test_unmapped_binary_value_passes_through() {
        let recoded = recode(Field::SintomaCabeca.spec(), Some("9"));
        assert_eq!(recoded.value, text("9"));
        assert_eq!(recoded.outcome, RecodeOutcome::Unmapped);
    }

    #[test]
    fn test_test_result_codes_and_fallback() {
        let spec = Field::ResultadoTeste.spec();
        assert_eq!(recode(spec, Some("48")).value, label("Positivo"));
        assert_eq!(recode(spec, Some("12")).value, label("Negativo"));
        assert_eq!(recode(spec, Some("36")).value, label("Indeterminado"));
        for raw in [None, Some("1"), Some("99"), Some("abc")] {
            let recoded = recode(spec, raw);
            assert_eq!(recoded.value, label("Sem Teste"), "{raw:?}");
            assert_eq!(recoded.outcome, RecodeOutcome::Fallback);
        }
    }

    #[test]
    fn test_recoding_labels_is_idempotent() {
        for field in Field::ALL {
            let spec = field.spec();
            let Some(table) = spec.kind.code_table() else { continue };
            for existing in table.labels() {
                let recoded = recode(spec, Some(existing));
                assert_eq!(recoded.value, label(existing));
                assert_eq!(recoded.outcome, RecodeOutcome::AlreadyLabeled);
            }
        }
        let recoded = recode(Field::ResultadoTeste.spec(), Some("Sem Teste"));
        assert_eq!(recoded.outcome, RecodeOutcome::AlreadyLabeled);
    }

    #[test]
    fn test_passthrough_keeps_original_text() {
        assert_eq!(recode(Field::Idade.spec(), Some("34.0")).value, text("34.0"));
        assert_eq!(recode(Field::RecebeuAuxilio.spec(), Some("2")).value, text("2"));
        assert_eq!(
            recode(Field::RendimentoEfetivo.spec(), None).value,
            CanonicalValue::Missing
        );
    }

    #[test]
    fn test_respondent_scenario() {
        let row = RawSurveyRow::default()
            .with(Field::Estado, "SP")
            .with(Field::Sexo, "1")
            .with(Field::Idade, "34")
            .with(Field::SintomaFebre, "1")
            .with(Field::FezTeste, "2")
            .with(Field::ResultadoTeste, "48")
            .with(Field::TrabalhouSemana, "1")
            .with(Field::RecebeuAuxilio, "2");

        let normalized = SurveyNormalizer::new().normalize(1, &row).unwrap();
        let record = &normalized.record;
        assert_eq!(record.text(Field::Estado), Some("SP"));
        assert_eq!(record.text(Field::Sexo), Some("1"));
        assert_eq!(record.text(Field::Idade), Some("34"));
        assert_eq!(record.text(Field::SintomaFebre), Some("Sim"));
        assert_eq!(record.text(Field::ProcurouAtendimento), Some("Não"));
        assert_eq!(record.text(Field::FezTeste), Some("Não"));
        assert_eq!(record.text(Field::ResultadoTeste), Some("Positivo"));
        assert_eq!(record.text(Field::TrabalhouSemana), Some("1"));
        assert_eq!(record.text(Field::RecebeuAuxilio), Some("2"));
        assert_eq!(record.text(Field::TrabalhoRemoto), Some("Não"));
        assert_eq!(normalized.outcome(Field::TrabalhoRemoto), RecodeOutcome::Imputed);
        assert_eq!(normalized.outcome(Field::SintomaTosse), RecodeOutcome::Missing);
    }

    #[test]
    fn test_reject_policy_aborts_on_unmapped_value() {
        let config = PipelineConfig::from_toml_str(
            r#"
            [recoding.overrides]
            sintoma_febre = "reject"
            "#,
        )
        .unwrap();
        let normalizer = SurveyNormalizer::from_config(&config);

        let row = RawSurveyRow::default().with(Field::SintomaFebre, "7");
        let err = normalizer.normalize(3, &row).unwrap_err();
        match err {
            NormalizeError::UnmappedValue { field, row, value } => {
                assert_eq!(field, "sintoma_febre");
                assert_eq!(row, 3);
                assert_eq!(value, "7");
            }
            other => panic!("unexpected error: {other}"),
        }

        // Other fields still pass through
        let row = RawSurveyRow::default().with(Field::SintomaTosse, "7");
        assert!(normalizer.normalize(1, &row).is_ok());
    }
}
