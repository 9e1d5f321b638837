use serde::Serialize;

use crate::grades::grade_to_detail_score;
use crate::models::{AnalyzedStudent, BenchmarkAverages, PerformanceSegment};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnitPoint {
    pub unit: String,
    pub grade: Option<String>,
    pub score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillPoint {
    pub skill: String,
    pub score: Option<f64>,
    pub cefr: Option<String>,
}

/// Student value minus benchmark value, per metric.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct BenchmarkDelta {
    pub gpa: Option<f64>,
    pub nava: Option<f64>,
    pub aptis: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentProfile {
    pub id: String,
    pub name: String,
    pub company: String,
    pub group: String,
    pub track: String,
    pub segment: PerformanceSegment,
    pub units: Vec<UnitPoint>,
    pub english_average: Option<f64>,
    pub english_final_grade: Option<String>,
    pub aptis_overall: Option<f64>,
    pub aptis_cefr: Option<String>,
    pub skills: Vec<SkillPoint>,
    pub vs_academy: BenchmarkDelta,
    pub vs_group: BenchmarkDelta,
}

fn delta(value: Option<f64>, baseline: f64) -> Option<f64> {
    // A zero baseline means the population had no data.
    if baseline == 0.0 {
        return None;
    }
    value.map(|value| value - baseline)
}

pub fn benchmark_delta(
    student: &AnalyzedStudent,
    baseline: &BenchmarkAverages,
) -> BenchmarkDelta {
    BenchmarkDelta {
        gpa: delta(student.scored.gpa, baseline.gpa),
        nava: delta(student.scored.nava_average_score, baseline.nava),
        aptis: delta(student.scored.student.aptis_overall(), baseline.aptis),
    }
}

pub fn student_profile(student: &AnalyzedStudent) -> StudentProfile {
    let record = &student.scored.student;

    let units: Vec<UnitPoint> = record
        .grades
        .technical_grades()
        .into_iter()
        .map(|(unit, letter)| UnitPoint {
            unit: unit.to_string(),
            grade: letter.map(str::to_string),
            score: grade_to_detail_score(letter),
        })
        .collect();

    let skills: Vec<SkillPoint> = record
        .aptis
        .as_ref()
        .map(|aptis| {
            aptis
                .skills()
                .into_iter()
                .map(|(skill, result)| SkillPoint {
                    skill: skill.to_string(),
                    score: result.score,
                    cefr: result.cefr.clone(),
                })
                .collect()
        })
        .unwrap_or_default();

    StudentProfile {
        id: record.nava_id.clone(),
        name: record.full_name.clone(),
        company: record.company.clone(),
        group: record.tech_group.clone(),
        track: record.track_name.clone(),
        segment: student.segment(),
        units,
        english_average: student.scored.english_average,
        english_final_grade: record.grades.english_final_grade.clone(),
        aptis_overall: record.aptis_overall(),
        aptis_cefr: record.cefr_band().map(str::to_string),
        skills,
        vs_academy: benchmark_delta(student, &student.benchmark.academy),
        vs_group: benchmark_delta(student, &student.benchmark.group),
    }
}
