use super::codes::parse_code;
use super::field::{Field, FIELD_COUNT};
use crate::constants::{CODE_YES, LABEL_YES};

/// One respondent's answers as coded by the survey instrument, projected onto
/// the fixed schema. Cells are trimmed; blank cells are absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawSurveyRow {
    cells: [Option<String>; FIELD_COUNT],
}

impl RawSurveyRow {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.cells[field.index()].as_deref()
    }

    pub fn set(&mut self, field: Field, value: &str) {
        self.cells[field.index()] = clean_cell(value);
    }

    /// Builder-style setter
    pub fn with(mut self, field: Field, value: &str) -> Self {
        self.set(field, value);
        self
    }
}

fn clean_cell(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// A canonical output cell
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CanonicalValue {
    /// A label from the field's fixed label set
    Label(&'static str),
    /// Original text carried through unchanged
    Text(String),
    #[default]
    Missing,
}

impl CanonicalValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            CanonicalValue::Label(label) => Some(*label),
            CanonicalValue::Text(text) => Some(text.as_str()),
            CanonicalValue::Missing => None,
        }
    }
}

/// One row of the canonical dataset
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalRecord {
    values: [CanonicalValue; FIELD_COUNT],
}

impl CanonicalRecord {
    pub fn get(&self, field: Field) -> &CanonicalValue {
        &self.values[field.index()]
    }

    pub fn set(&mut self, field: Field, value: CanonicalValue) {
        self.values[field.index()] = value;
    }

    pub fn text(&self, field: Field) -> Option<&str> {
        self.get(field).as_str()
    }

    /// True for the "Sim" label, or raw code 1 in fields left uncoded
    pub fn is_yes(&self, field: Field) -> bool {
        match self.text(field) {
            Some(LABEL_YES) => true,
            Some(other) => parse_code(other) == Some(CODE_YES),
            None => false,
        }
    }

    /// Cells in output column order; absent values render as empty strings
    pub fn cells(&self) -> impl Iterator<Item = &str> + '_ {
        self.values.iter().map(|v| v.as_str().unwrap_or(""))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_cells_are_absent() {
        let row = RawSurveyRow::default()
            .with(Field::Estado, " SP ")
            .with(Field::Idade, "   ");
        assert_eq!(row.get(Field::Estado), Some("SP"));
        assert_eq!(row.get(Field::Idade), None);
        assert_eq!(row.get(Field::Sexo), None);
    }

    #[test]
    fn test_is_yes_accepts_label_and_code() {
        let mut record = CanonicalRecord::default();
        record.set(Field::SintomaFebre, CanonicalValue::Label("Sim"));
        record.set(Field::RecebeuAuxilio, CanonicalValue::Text("1".to_string()));
        record.set(Field::SintomaTosse, CanonicalValue::Label("Não"));
        assert!(record.is_yes(Field::SintomaFebre));
        assert!(record.is_yes(Field::RecebeuAuxilio));
        assert!(!record.is_yes(Field::SintomaTosse));
        assert!(!record.is_yes(Field::Sexo));
    }

    #[test]
    fn test_cells_render_missing_as_empty() {
        let mut record = CanonicalRecord::default();
        record.set(Field::Estado, CanonicalValue::Text("RJ".to_string()));
        let cells: Vec<&str> = record.cells().collect();
        assert_eq!(cells.len(), FIELD_COUNT);
        assert_eq!(cells[0], "RJ");
        assert!(cells[1..].iter().all(|c| c.is_empty()));
    }
}
