use crate::constants::{
    LABEL_INCONCLUSIVE, LABEL_NEGATIVE, LABEL_NO, LABEL_POSITIVE, LABEL_YES,
};

/// Fixed mapping from survey answer codes to human-readable labels
#[derive(Debug)]
pub struct CodeTable {
    pub name: &'static str,
    pub entries: &'static [(i64, &'static str)],
}

impl CodeTable {
    /// Label for a raw code, if the table defines one
    pub fn label(&self, code: i64) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map(|(_, label)| *label)
    }

    /// Returns the table's own label when `text` already is one
    pub fn existing_label(&self, text: &str) -> Option<&'static str> {
        self.entries
            .iter()
            .find(|(_, label)| *label == text)
            .map(|(_, label)| *label)
    }

    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|(_, label)| *label)
    }
}

/// 1 = Sim, 2 = Não
pub static BINARY_CODES: CodeTable = CodeTable {
    name: "binary",
    entries: &[(1, LABEL_YES), (2, LABEL_NO)],
};

/// COVID-19 test outcome codes
pub static TEST_RESULT_CODES: CodeTable = CodeTable {
    name: "test_result",
    entries: &[
        (48, LABEL_POSITIVE),
        (12, LABEL_NEGATIVE),
        (36, LABEL_INCONCLUSIVE),
    ],
};

/// Interpret a raw cell as a numeric answer code.
///
/// Integers and floats without a fractional part are accepted, so an export
/// that wrote `2.0` still yields code 2.
pub fn parse_code(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(code) = text.parse::<i64>() {
        return Some(code);
    }
    match text.parse::<f64>() {
        Ok(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < i64::MAX as f64 => Some(v as i64),
        _ => None,
    }
}
