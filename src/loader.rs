use std::collections::HashSet;
use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use crate::models::{AptisScoreSet, EnhancedStudent, RawGradeSet, SkillScore};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid student JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid student CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("cannot infer input format for {}; pass --format json|csv", .0.display())]
    UnknownFormat(PathBuf),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Json,
    Csv,
}

impl InputFormat {
    pub fn from_path(path: &Path) -> Option<Self> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        match extension.as_str() {
            "json" => Some(InputFormat::Json),
            "csv" => Some(InputFormat::Csv),
            _ => None,
        }
    }
}

impl FromStr for InputFormat {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.to_ascii_lowercase().as_str() {
            "json" => Ok(InputFormat::Json),
            "csv" => Ok(InputFormat::Csv),
            other => Err(format!("unknown input format: {other}")),
        }
    }
}

/// Flat CSV layout, one student per row.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CsvRow {
    nava_id: String,
    full_name: String,
    company: String,
    tech_group: String,
    #[serde(default)]
    track_name: Option<String>,
    #[serde(default)]
    nava001: Option<String>,
    #[serde(default)]
    nava002: Option<String>,
    #[serde(default)]
    nava003: Option<String>,
    #[serde(default)]
    nava004: Option<String>,
    #[serde(default)]
    nava005: Option<String>,
    #[serde(default)]
    nava006: Option<String>,
    #[serde(default)]
    nava007: Option<String>,
    #[serde(default)]
    nava008: Option<String>,
    #[serde(default)]
    english_unit1: Option<f64>,
    #[serde(default)]
    english_unit2: Option<f64>,
    #[serde(default)]
    english_final_grade: Option<String>,
    #[serde(default)]
    aptis_overall: Option<f64>,
    #[serde(default)]
    aptis_cefr: Option<String>,
    #[serde(default)]
    grammar_score: Option<f64>,
    #[serde(default)]
    grammar_cefr: Option<String>,
    #[serde(default)]
    listening_score: Option<f64>,
    #[serde(default)]
    listening_cefr: Option<String>,
    #[serde(default)]
    reading_score: Option<f64>,
    #[serde(default)]
    reading_cefr: Option<String>,
    #[serde(default)]
    speaking_score: Option<f64>,
    #[serde(default)]
    speaking_cefr: Option<String>,
    #[serde(default)]
    writing_score: Option<f64>,
    #[serde(default)]
    writing_cefr: Option<String>,
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|text| !text.trim().is_empty())
}

/// `NaN` and `inf` cells parse as floats; treat them as missing scores.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|score| score.is_finite())
}

impl From<CsvRow> for EnhancedStudent {
    fn from(row: CsvRow) -> Self {
        let skill = |score: Option<f64>, cefr: Option<String>| SkillScore {
            score: finite(score),
            cefr: non_blank(cefr),
        };
        let aptis = AptisScoreSet {
            overall: finite(row.aptis_overall),
            cefr: non_blank(row.aptis_cefr),
            grammar: skill(row.grammar_score, row.grammar_cefr),
            listening: skill(row.listening_score, row.listening_cefr),
            reading: skill(row.reading_score, row.reading_cefr),
            speaking: skill(row.speaking_score, row.speaking_cefr),
            writing: skill(row.writing_score, row.writing_cefr),
        };

        EnhancedStudent {
            nava_id: row.nava_id,
            full_name: row.full_name,
            company: row.company,
            tech_group: row.tech_group,
            track_name: row.track_name.unwrap_or_default(),
            grades: RawGradeSet {
                nava001: non_blank(row.nava001),
                nava002: non_blank(row.nava002),
                nava003: non_blank(row.nava003),
                nava004: non_blank(row.nava004),
                nava005: non_blank(row.nava005),
                nava006: non_blank(row.nava006),
                nava007: non_blank(row.nava007),
                nava008: non_blank(row.nava008),
                english_unit1: finite(row.english_unit1),
                english_unit2: finite(row.english_unit2),
                english_final_grade: non_blank(row.english_final_grade),
            },
            aptis: (aptis != AptisScoreSet::default()).then_some(aptis),
        }
    }
}

pub fn parse_json(text: &str) -> Result<Vec<EnhancedStudent>, LoadError> {
    Ok(serde_json::from_str(text)?)
}

pub fn read_csv<R: Read>(reader: R) -> Result<Vec<EnhancedStudent>, LoadError> {
    let mut reader = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let mut students = Vec::new();
    for result in reader.deserialize::<CsvRow>() {
        students.push(result?.into());
    }
    Ok(students)
}

/// Reads a student list, inferring the format from the extension when
/// `format` is `None`. Roster anomalies are logged, not rejected.
pub fn load_students(
    path: &Path,
    format: Option<InputFormat>,
) -> Result<Vec<EnhancedStudent>, LoadError> {
    let format = format
        .or_else(|| InputFormat::from_path(path))
        .ok_or_else(|| LoadError::UnknownFormat(path.to_path_buf()))?;
    let io_error = |source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    };

    let students = match format {
        InputFormat::Json => parse_json(&std::fs::read_to_string(path).map_err(io_error)?)?,
        InputFormat::Csv => read_csv(std::fs::File::open(path).map_err(io_error)?)?,
    };

    log::debug!("loaded {} students from {}", students.len(), path.display());
    for issue in roster_issues(&students) {
        log::warn!("{issue}");
    }

    Ok(students)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterIssue {
    DuplicateId(String),
    EmptyGroup(String),
}

impl fmt::Display for RosterIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RosterIssue::DuplicateId(id) => write!(f, "duplicate student id {id}"),
            RosterIssue::EmptyGroup(id) => write!(f, "student {id} has an empty tech group"),
        }
    }
}

pub fn roster_issues(students: &[EnhancedStudent]) -> Vec<RosterIssue> {
    let mut seen = HashSet::new();
    let mut issues = Vec::new();

    for student in students {
        if !seen.insert(student.nava_id.as_str()) {
            issues.push(RosterIssue::DuplicateId(student.nava_id.clone()));
        }
        if student.tech_group.trim().is_empty() {
            issues.push(RosterIssue::EmptyGroup(student.nava_id.clone()));
        }
    }

    issues
}
