// Descriptive statistics over the canonical dataset

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::constants::{AGE_HISTOGRAM_BINS, LABEL_YES, MISSING_KEY, TOP_ESTADOS};
use crate::domain::{CanonicalRecord, Field};

/// Symptoms that mark a respondent as symptomatic for care-seeking analysis
const KEY_SYMPTOMS: [Field; 4] = [
    Field::SintomaFebre,
    Field::SintomaTosse,
    Field::SintomaFaltaAr,
    Field::SintomaOlfatoPaladar,
];

/// Exact-match filters; `None` keeps every value
#[derive(Debug, Clone, Default)]
pub struct SummaryFilter {
    pub estado: Option<String>,
    pub sexo: Option<String>,
}

impl SummaryFilter {
    pub fn matches(&self, record: &CanonicalRecord) -> bool {
        let keep = |wanted: &Option<String>, field: Field| match wanted {
            Some(w) => record.text(field) == Some(w.as_str()),
            None => true,
        };
        keep(&self.estado, Field::Estado) && keep(&self.sexo, Field::Sexo)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValueCount {
    pub value: String,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeBin {
    pub lower: f64,
    pub upper: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AgeDistribution {
    pub count: usize,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub bins: Vec<AgeBin>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveySummary {
    pub respondents: usize,
    /// Share of respondents reporting fever, in percent
    pub fever_pct: Option<f64>,
    /// Share of respondents whose household received emergency aid, in percent
    pub emergency_aid_pct: Option<f64>,
    pub top_estados: Vec<ValueCount>,
    pub sexo: Vec<ValueCount>,
    pub trabalhou_semana: Vec<ValueCount>,
    pub resultado_teste: Vec<ValueCount>,
    pub idade: Option<AgeDistribution>,
    /// `procurou_atendimento` among respondents with a key symptom
    pub care_seeking_symptomatic: Vec<ValueCount>,
}

pub fn summarize(records: &[CanonicalRecord], filter: &SummaryFilter) -> SurveySummary {
    let selected: Vec<&CanonicalRecord> = records.iter().filter(|r| filter.matches(r)).collect();
    let respondents = selected.len();

    let share = |field: Field| {
        if respondents == 0 {
            return None;
        }
        let yes = selected.iter().filter(|r| r.is_yes(field)).count();
        Some(yes as f64 * 100.0 / respondents as f64)
    };
    let counts = |field: Field| value_counts(selected.iter().map(|r| r.text(field)));

    let mut top_estados = counts(Field::Estado);
    top_estados.truncate(TOP_ESTADOS);

    let symptomatic = selected
        .iter()
        .filter(|r| KEY_SYMPTOMS.iter().any(|f| r.text(*f) == Some(LABEL_YES)));

    SurveySummary {
        respondents,
        fever_pct: share(Field::SintomaFebre),
        emergency_aid_pct: share(Field::RecebeuAuxilio),
        top_estados,
        sexo: counts(Field::Sexo),
        trabalhou_semana: counts(Field::TrabalhouSemana),
        resultado_teste: counts(Field::ResultadoTeste),
        idade: age_distribution(selected.iter().filter_map(|r| r.text(Field::Idade))),
        care_seeking_symptomatic: value_counts(
            symptomatic.map(|r| r.text(Field::ProcurouAtendimento)),
        ),
    }
}

/// Counts by value, most frequent first; ties keep ascending value order
fn value_counts<'a>(values: impl Iterator<Item = Option<&'a str>>) -> Vec<ValueCount> {
    let mut tally: BTreeMap<&str, usize> = BTreeMap::new();
    for value in values {
        *tally.entry(value.unwrap_or(MISSING_KEY)).or_default() += 1;
    }
    let mut counts: Vec<ValueCount> = tally
        .into_iter()
        .map(|(value, count)| ValueCount {
            value: value.to_string(),
            count,
        })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count));
    counts
}

fn age_distribution<'a>(values: impl Iterator<Item = &'a str>) -> Option<AgeDistribution> {
    let ages: Vec<f64> = values
        .filter_map(|v| v.trim().parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .collect();
    if ages.is_empty() {
        return None;
    }

    let min = ages.iter().copied().fold(f64::INFINITY, f64::min);
    let max = ages.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let mean = ages.iter().sum::<f64>() / ages.len() as f64;

    let bins = if min == max {
        vec![AgeBin {
            lower: min,
            upper: max,
            count: ages.len(),
        }]
    } else {
        let width = (max - min) / AGE_HISTOGRAM_BINS as f64;
        let mut bins: Vec<AgeBin> = (0..AGE_HISTOGRAM_BINS)
            .map(|i| AgeBin {
                lower: min + i as f64 * width,
                upper: if i + 1 == AGE_HISTOGRAM_BINS {
                    max
                } else {
                    min + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();
        for age in &ages {
            // Last bin is closed on the right
            let idx = (((age - min) / width).floor() as usize).min(AGE_HISTOGRAM_BINS - 1);
            bins[idx].count += 1;
        }
        bins
    };

    Some(AgeDistribution {
        count: ages.len(),
        min,
        max,
        mean,
        bins,
    })
}

fn fmt_pct(value: Option<f64>) -> String {
    value.map_or_else(|| "n/a".to_string(), |v| format!("{v:.1}%"))
}

fn fmt_counts(f: &mut fmt::Formatter<'_>, title: &str, counts: &[ValueCount]) -> fmt::Result {
    writeln!(f, "{title}:")?;
    if counts.is_empty() {
        writeln!(f, "   (none)")?;
    }
    for c in counts {
        writeln!(f, "   {:<24} {}", c.value, c.count)?;
    }
    Ok(())
}

impl fmt::Display for SurveySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Respondents: {}", self.respondents)?;
        writeln!(f, "% Febre (Sim): {}", fmt_pct(self.fever_pct))?;
        writeln!(f, "% Auxílio (Sim): {}", fmt_pct(self.emergency_aid_pct))?;
        fmt_counts(f, "Respondents by estado (top 15)", &self.top_estados)?;
        fmt_counts(f, "Sexo", &self.sexo)?;
        fmt_counts(f, "Trabalhou na semana", &self.trabalhou_semana)?;
        fmt_counts(f, "Resultado do teste", &self.resultado_teste)?;
        fmt_counts(
            f,
            "Procurou atendimento (symptomatic)",
            &self.care_seeking_symptomatic,
        )?;
        match &self.idade {
            Some(age) => {
                writeln!(
                    f,
                    "Idade: n={} min={} max={} mean={:.1}",
                    age.count, age.min, age.max, age.mean
                )?;
                for bin in age.bins.iter().filter(|b| b.count > 0) {
                    writeln!(f, "   [{:>6.1}, {:>6.1}] {}", bin.lower, bin.upper, bin.count)?;
                }
            }
            None => writeln!(f, "Idade: n/a")?,
        }
        Ok(())
    }
}
