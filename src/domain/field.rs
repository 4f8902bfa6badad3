use std::fmt;

use serde::{Serialize, Serializer};

use super::codes::{CodeTable, BINARY_CODES, TEST_RESULT_CODES};
use crate::constants::{CODE_NO, LABEL_NO_TEST};

pub const FIELD_COUNT: usize = 20;

/// The fields of interest, in output column order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Field {
    Estado,
    Sexo,
    Idade,
    SintomaFebre,
    SintomaTosse,
    SintomaGarganta,
    SintomaFaltaAr,
    SintomaCabeca,
    SintomaPeito,
    SintomaNausea,
    SintomaDiarreia,
    SintomaOlfatoPaladar,
    ProcurouAtendimento,
    FezTeste,
    ResultadoTeste,
    TrabalhouSemana,
    RendimentoHabitual,
    RendimentoEfetivo,
    RecebeuAuxilio,
    TrabalhoRemoto,
}

impl Field {
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Estado,
        Field::Sexo,
        Field::Idade,
        Field::SintomaFebre,
        Field::SintomaTosse,
        Field::SintomaGarganta,
        Field::SintomaFaltaAr,
        Field::SintomaCabeca,
        Field::SintomaPeito,
        Field::SintomaNausea,
        Field::SintomaDiarreia,
        Field::SintomaOlfatoPaladar,
        Field::ProcurouAtendimento,
        Field::FezTeste,
        Field::ResultadoTeste,
        Field::TrabalhouSemana,
        Field::RendimentoHabitual,
        Field::RendimentoEfetivo,
        Field::RecebeuAuxilio,
        Field::TrabalhoRemoto,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn spec(self) -> &'static FieldSpec {
        &FIELD_SPECS[self.index()]
    }

    pub fn source_key(self) -> &'static str {
        self.spec().source_key
    }

    pub fn canonical_name(self) -> &'static str {
        self.spec().canonical_name
    }

    pub fn from_canonical_name(name: &str) -> Option<Field> {
        FIELD_SPECS
            .iter()
            .find(|spec| spec.canonical_name == name)
            .map(|spec| spec.field)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.canonical_name())
    }
}

/// Serialized by canonical name
impl Serialize for Field {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.canonical_name())
    }
}

/// How a field's raw value becomes its canonical value
#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// 1 = Sim, 2 = Não
    BinaryYesNo,
    /// Small integer codes recoded through a dedicated table
    CodedEnum(&'static CodeTable),
    PassthroughNumeric,
    PassthroughCategorical,
}

impl FieldKind {
    pub fn code_table(&self) -> Option<&'static CodeTable> {
        match self {
            FieldKind::BinaryYesNo => Some(&BINARY_CODES),
            FieldKind::CodedEnum(table) => Some(*table),
            FieldKind::PassthroughNumeric | FieldKind::PassthroughCategorical => None,
        }
    }

    pub fn is_binary(&self) -> bool {
        matches!(self, FieldKind::BinaryYesNo)
    }

    pub fn name(&self) -> &'static str {
        match self {
            FieldKind::BinaryYesNo => "binary-yes-no",
            FieldKind::CodedEnum(_) => "coded-enum",
            FieldKind::PassthroughNumeric => "passthrough-numeric",
            FieldKind::PassthroughCategorical => "passthrough-categorical",
        }
    }
}

/// What to do when a field's raw value is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Imputation {
    /// Missing stays missing
    None,
    /// Substitute this code before recoding
    DefaultCode(i64),
    /// Emit this label for absent and unrecognized codes alike
    FallbackLabel(&'static str),
}

impl fmt::Display for Imputation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Imputation::None => f.write_str("none"),
            Imputation::DefaultCode(code) => write!(f, "absent => code {code}"),
            Imputation::FallbackLabel(label) => write!(f, "absent/unmapped => \"{label}\""),
        }
    }
}

#[derive(Debug)]
pub struct FieldSpec {
    pub field: Field,
    pub source_key: &'static str,
    pub canonical_name: &'static str,
    pub kind: FieldKind,
    pub imputation: Imputation,
}

const fn spec(
    field: Field,
    source_key: &'static str,
    canonical_name: &'static str,
    kind: FieldKind,
    imputation: Imputation,
) -> FieldSpec {
    FieldSpec {
        field,
        source_key,
        canonical_name,
        kind,
        imputation,
    }
}

use FieldKind::{BinaryYesNo, PassthroughCategorical, PassthroughNumeric};

/// The fixed schema: one entry per `Field`, indexed by `Field::index`.
pub static FIELD_SPECS: [FieldSpec; FIELD_COUNT] = [
    spec(Field::Estado, "UF", "estado", PassthroughCategorical, Imputation::None),
    spec(Field::Sexo, "A001", "sexo", PassthroughCategorical, Imputation::None),
    spec(Field::Idade, "A003", "idade", PassthroughNumeric, Imputation::None),
    spec(Field::SintomaFebre, "B0011", "sintoma_febre", BinaryYesNo, Imputation::None),
    spec(Field::SintomaTosse, "B0012", "sintoma_tosse", BinaryYesNo, Imputation::None),
    spec(Field::SintomaGarganta, "B0013", "sintoma_garganta", BinaryYesNo, Imputation::None),
    spec(Field::SintomaFaltaAr, "B0014", "sintoma_falta_ar", BinaryYesNo, Imputation::None),
    spec(Field::SintomaCabeca, "B0015", "sintoma_cabeca", BinaryYesNo, Imputation::None),
    spec(Field::SintomaPeito, "B0016", "sintoma_peito", BinaryYesNo, Imputation::None),
    spec(Field::SintomaNausea, "B0017", "sintoma_nausea", BinaryYesNo, Imputation::None),
    spec(Field::SintomaDiarreia, "B0018", "sintoma_diarreia", BinaryYesNo, Imputation::None),
    spec(
        Field::SintomaOlfatoPaladar,
        "B0019",
        "sintoma_olfato_paladar",
        BinaryYesNo,
        Imputation::None,
    ),
    spec(
        Field::ProcurouAtendimento,
        "B002",
        "procurou_atendimento",
        BinaryYesNo,
        Imputation::DefaultCode(CODE_NO),
    ),
    spec(Field::FezTeste, "C007", "fez_teste", BinaryYesNo, Imputation::DefaultCode(CODE_NO)),
    spec(
        Field::ResultadoTeste,
        "C008",
        "resultado_teste",
        FieldKind::CodedEnum(&TEST_RESULT_CODES),
        Imputation::FallbackLabel(LABEL_NO_TEST),
    ),
    spec(Field::TrabalhouSemana, "D0011", "trabalhou_semana", PassthroughCategorical, Imputation::None),
    spec(Field::RendimentoHabitual, "D0021", "rendimento_habitual", PassthroughNumeric, Imputation::None),
    spec(Field::RendimentoEfetivo, "D0031", "rendimento_efetivo", PassthroughNumeric, Imputation::None),
    spec(Field::RecebeuAuxilio, "F001", "recebeu_auxilio", PassthroughCategorical, Imputation::None),
    spec(
        Field::TrabalhoRemoto,
        "F006",
        "trabalho_remoto",
        BinaryYesNo,
        Imputation::DefaultCode(CODE_NO),
    ),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_specs_are_indexed_by_field() {
        for (i, spec) in FIELD_SPECS.iter().enumerate() {
            assert_eq!(spec.field.index(), i, "spec for {} out of place", spec.canonical_name);
            assert_eq!(Field::ALL[i], spec.field);
        }
    }

    #[test]
    fn test_names_and_keys_are_unique() {
        let names: HashSet<_> = FIELD_SPECS.iter().map(|s| s.canonical_name).collect();
        let keys: HashSet<_> = FIELD_SPECS.iter().map(|s| s.source_key).collect();
        assert_eq!(names.len(), FIELD_COUNT);
        assert_eq!(keys.len(), FIELD_COUNT);
    }

    #[test]
    fn test_binary_set_matches_cleaning_rules() {
        let binary: Vec<_> = Field::ALL
            .iter()
            .filter(|f| f.spec().kind.is_binary())
            .map(|f| f.canonical_name())
            .collect();
        assert_eq!(binary.len(), 12);
        assert!(binary.contains(&"trabalho_remoto"));
        assert!(!binary.contains(&"trabalhou_semana"));
        assert!(!binary.contains(&"recebeu_auxilio"));
    }

    #[test]
    fn test_imputation_rules() {
        let imputed: Vec<_> = Field::ALL
            .iter()
            .filter(|f| matches!(f.spec().imputation, Imputation::DefaultCode(2)))
            .copied()
            .collect();
        assert_eq!(
            imputed,
            vec![Field::ProcurouAtendimento, Field::FezTeste, Field::TrabalhoRemoto]
        );
        assert_eq!(
            Field::ResultadoTeste.spec().imputation,
            Imputation::FallbackLabel("Sem Teste")
        );
    }

    #[test]
    fn test_lookup_by_canonical_name() {
        assert_eq!(Field::from_canonical_name("fez_teste"), Some(Field::FezTeste));
        assert_eq!(Field::from_canonical_name("C007"), None);
        assert_eq!(Field::FezTeste.source_key(), "C007");
    }
}
