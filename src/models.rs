use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Technical unit codes, in the order they appear on a transcript.
pub const TECHNICAL_UNITS: [&str; 8] = [
    "nava001", "nava002", "nava003", "nava004", "nava005", "nava006", "nava007", "nava008",
];

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RawGradeSet {
    pub nava001: Option<String>,
    pub nava002: Option<String>,
    pub nava003: Option<String>,
    pub nava004: Option<String>,
    pub nava005: Option<String>,
    pub nava006: Option<String>,
    pub nava007: Option<String>,
    pub nava008: Option<String>,
    pub english_unit1: Option<f64>,
    pub english_unit2: Option<f64>,
    pub english_final_grade: Option<String>,
}

impl RawGradeSet {
    /// Letter grade per technical unit, paired with the unit code.
    pub fn technical_grades(&self) -> [(&'static str, Option<&str>); 8] {
        let slots = [
            &self.nava001,
            &self.nava002,
            &self.nava003,
            &self.nava004,
            &self.nava005,
            &self.nava006,
            &self.nava007,
            &self.nava008,
        ];
        let mut grades = [("", None); 8];
        for (index, slot) in slots.into_iter().enumerate() {
            grades[index] = (TECHNICAL_UNITS[index], slot.as_deref());
        }
        grades
    }

    pub fn english_scores(&self) -> [Option<f64>; 2] {
        [self.english_unit1, self.english_unit2]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SkillScore {
    pub score: Option<f64>,
    pub cefr: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AptisScoreSet {
    pub overall: Option<f64>,
    pub cefr: Option<String>,
    pub grammar: SkillScore,
    pub listening: SkillScore,
    pub reading: SkillScore,
    pub speaking: SkillScore,
    pub writing: SkillScore,
}

impl AptisScoreSet {
    pub fn skills(&self) -> [(&'static str, &SkillScore); 5] {
        [
            ("grammar", &self.grammar),
            ("listening", &self.listening),
            ("reading", &self.reading),
            ("speaking", &self.speaking),
            ("writing", &self.writing),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnhancedStudent {
    pub nava_id: String,
    pub full_name: String,
    pub company: String,
    pub tech_group: String,
    #[serde(default)]
    pub track_name: String,
    #[serde(default)]
    pub grades: RawGradeSet,
    #[serde(default)]
    pub aptis: Option<AptisScoreSet>,
}

impl EnhancedStudent {
    pub fn aptis_overall(&self) -> Option<f64> {
        self.aptis
            .as_ref()
            .and_then(|aptis| aptis.overall)
            .filter(|score| score.is_finite())
    }

    pub fn cefr_band(&self) -> Option<&str> {
        self.aptis.as_ref().and_then(|aptis| aptis.cefr.as_deref())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PerformanceSegment {
    #[serde(rename = "High Achievers")]
    HighAchievers,
    #[serde(rename = "Technically Strong")]
    TechnicallyStrong,
    #[serde(rename = "Linguistically Strong")]
    LinguisticallyStrong,
    #[serde(rename = "Standard")]
    Standard,
    #[serde(rename = "Needs Support")]
    NeedsSupport,
}

impl PerformanceSegment {
    pub const ALL: [PerformanceSegment; 5] = [
        PerformanceSegment::HighAchievers,
        PerformanceSegment::TechnicallyStrong,
        PerformanceSegment::LinguisticallyStrong,
        PerformanceSegment::Standard,
        PerformanceSegment::NeedsSupport,
    ];

    pub fn label(self) -> &'static str {
        match self {
            PerformanceSegment::HighAchievers => "High Achievers",
            PerformanceSegment::TechnicallyStrong => "Technically Strong",
            PerformanceSegment::LinguisticallyStrong => "Linguistically Strong",
            PerformanceSegment::Standard => "Standard",
            PerformanceSegment::NeedsSupport => "Needs Support",
        }
    }
}

impl fmt::Display for PerformanceSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PerformanceSegment {
    type Err = String;

    /// Accepts the display label or a slug ("needs-support", "high_achievers").
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let wanted: String = value
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();

        PerformanceSegment::ALL
            .into_iter()
            .find(|segment| {
                let label: String = segment
                    .label()
                    .chars()
                    .filter(|c| c.is_ascii_alphanumeric())
                    .map(|c| c.to_ascii_lowercase())
                    .collect();
                label == wanted
            })
            .ok_or_else(|| format!("unknown performance segment: {value}"))
    }
}

/// Population means of the three headline metrics. A value of 0 means the
/// population had no data for that metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkAverages {
    pub gpa: f64,
    pub nava: f64,
    pub aptis: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StudentBenchmark {
    pub academy: BenchmarkAverages,
    pub group: BenchmarkAverages,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CohortBenchmarks {
    pub academy: BenchmarkAverages,
    pub groups: BTreeMap<String, BenchmarkAverages>,
}

/// Output of the per-student pass, before benchmarks are known.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoredStudent {
    #[serde(flatten)]
    pub student: EnhancedStudent,
    pub nava_average_score: Option<f64>,
    pub gpa: Option<f64>,
    pub uc_count: u32,
    pub distinction_count: u32,
    pub english_average: Option<f64>,
    pub combined_english_average: Option<f64>,
    pub performance_segment: PerformanceSegment,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalyzedStudent {
    #[serde(flatten)]
    pub scored: ScoredStudent,
    pub benchmark: StudentBenchmark,
}

impl AnalyzedStudent {
    pub fn id(&self) -> &str {
        &self.scored.student.nava_id
    }

    pub fn name(&self) -> &str {
        &self.scored.student.full_name
    }

    pub fn segment(&self) -> PerformanceSegment {
        self.scored.performance_segment
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OverallStats {
    pub student_count: usize,
    pub avg_nava: f64,
    pub avg_aptis: f64,
    pub total_uc_count: u32,
    pub avg_distinctions: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompanyStats {
    pub company: String,
    pub student_count: usize,
    pub avg_nava: f64,
    pub avg_aptis: f64,
    pub avg_gpa: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupStats {
    pub group: String,
    pub student_count: usize,
    pub avg_nava: f64,
    pub avg_aptis: f64,
    pub avg_gpa: f64,
    pub uc_count: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnitMetric {
    pub unit: String,
    pub average: f64,
    pub uc_rate: f64,
    pub graded_count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SegmentCount {
    pub segment: PerformanceSegment,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSlice {
    pub name: String,
    pub value: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub aptis: f64,
    pub nava: f64,
    pub name: String,
    pub id: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnitGradeDistribution {
    pub unit: String,
    pub distinction: usize,
    pub merit: usize,
    pub pass: usize,
    pub unclassified: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AggregateViews {
    pub overall: OverallStats,
    pub companies: Vec<CompanyStats>,
    pub groups: Vec<GroupStats>,
    pub unit_metrics: Vec<UnitMetric>,
    pub segment_counts: Vec<SegmentCount>,
    pub segment_chart: Vec<ChartSlice>,
    pub scatter: Vec<ScatterPoint>,
    pub unit_distribution: Vec<UnitGradeDistribution>,
    pub grade_distribution: Vec<ChartSlice>,
}
