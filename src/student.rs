use crate::grades::{
    english_grade_to_gpa, grade_from_average, grade_to_score, is_no_data_marker,
    nava_grade_to_gpa, NavaGrade,
};
use crate::models::{EnhancedStudent, ScoredStudent};
use crate::risk::classify_segment;
use crate::stats::mean;

pub const ENGLISH_WEIGHT: f64 = 0.4;
pub const APTIS_WEIGHT: f64 = 0.6;

pub fn combined_english_average(
    english_average: Option<f64>,
    aptis_overall: Option<f64>,
) -> Option<f64> {
    match (english_average, aptis_overall) {
        (Some(english), Some(aptis)) => Some(english * ENGLISH_WEIGHT + aptis * APTIS_WEIGHT),
        _ => None,
    }
}

/// Derives the per-student metrics. The returned record carries a copy of
/// the grades whose final English grade is recomputed from the unit scores.
pub fn score_student(student: &EnhancedStudent) -> ScoredStudent {
    let english_scores: Vec<f64> = student
        .grades
        .english_scores()
        .into_iter()
        .flatten()
        .collect();
    let english_average = mean(&english_scores);
    let english_final_grade = grade_from_average(english_average);

    let mut technical_scores = Vec::with_capacity(8);
    let mut gpa_points = Vec::with_capacity(9);
    let mut uc_count = 0u32;
    let mut distinction_count = 0u32;

    for (unit, letter) in student.grades.technical_grades() {
        if let Some(score) = grade_to_score(letter) {
            technical_scores.push(score);
        }
        if let Some(points) = nava_grade_to_gpa(letter) {
            gpa_points.push(points);
        }
        match NavaGrade::parse(letter) {
            Some(NavaGrade::Unsatisfactory) => uc_count += 1,
            Some(NavaGrade::Distinction) => distinction_count += 1,
            Some(_) => {}
            None => {
                if let Some(code) = letter.filter(|code| !is_no_data_marker(code)) {
                    log::debug!(
                        "{}: unrecognised grade {:?} for {}, treated as no data",
                        student.nava_id,
                        code,
                        unit
                    );
                }
            }
        }
    }

    if let Some(points) = english_grade_to_gpa(english_final_grade) {
        gpa_points.push(points);
    }

    let nava_average_score = mean(&technical_scores);
    let gpa = mean(&gpa_points);
    let performance_segment = classify_segment(nava_average_score, uc_count, student.cefr_band());

    let mut derived = student.clone();
    derived.grades.english_final_grade = english_final_grade.map(str::to_string);

    ScoredStudent {
        combined_english_average: combined_english_average(english_average, student.aptis_overall()),
        student: derived,
        nava_average_score,
        gpa,
        uc_count,
        distinction_count,
        english_average,
        performance_segment,
    }
}

pub fn score_students(students: &[EnhancedStudent]) -> Vec<ScoredStudent> {
    students.iter().map(score_student).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::{AptisScoreSet, PerformanceSegment, RawGradeSet};

    pub(crate) fn sample_student(id: &str, group: &str) -> EnhancedStudent {
        EnhancedStudent {
            nava_id: id.to_string(),
            full_name: format!("Student {id}"),
            company: "Acme".to_string(),
            tech_group: group.to_string(),
            track_name: "Electrical".to_string(),
            grades: RawGradeSet::default(),
            aptis: None,
        }
    }

    pub(crate) fn with_aptis(
        mut student: EnhancedStudent,
        overall: f64,
        cefr: &str,
    ) -> EnhancedStudent {
        student.aptis = Some(AptisScoreSet {
            overall: Some(overall),
            cefr: Some(cefr.to_string()),
            ..AptisScoreSet::default()
        });
        student
    }

    #[test]
    fn end_to_end_scenario_student() {
        let mut student = with_aptis(sample_student("N-001", "G1"), 70.0, "B1");
        student.grades.nava001 = Some("D".to_string());
        student.grades.nava002 = Some("M".to_string());
        student.grades.english_unit1 = Some(80.0);

        let scored = score_student(&student);

        assert_eq!(scored.nava_average_score, Some(75.0));
        assert_eq!(scored.uc_count, 0);
        assert_eq!(scored.distinction_count, 1);
        assert_eq!(scored.english_average, Some(80.0));
        assert_eq!(scored.student.grades.english_final_grade.as_deref(), Some("B"));
        // (4.0 + 3.0 + 3.0) / 3 across technical units and English.
        assert_eq!(scored.gpa, Some(10.0 / 3.0));
        assert_eq!(scored.combined_english_average, Some(80.0 * 0.4 + 70.0 * 0.6));
        assert_eq!(scored.performance_segment, PerformanceSegment::HighAchievers);
    }

    #[test]
    fn stored_final_english_grade_is_overridden() {
        let mut student = sample_student("N-002", "G1");
        student.grades.english_final_grade = Some("A+".to_string());
        student.grades.english_unit1 = Some(62.0);
        student.grades.english_unit2 = Some(68.0);

        let scored = score_student(&student);

        assert_eq!(scored.english_average, Some(65.0));
        assert_eq!(scored.student.grades.english_final_grade.as_deref(), Some("D+"));
        assert_eq!(student.grades.english_final_grade.as_deref(), Some("A+"));
    }

    #[test]
    fn missing_english_clears_final_grade() {
        let mut student = sample_student("N-003", "G1");
        student.grades.english_final_grade = Some("B".to_string());
        student.grades.nava001 = Some("P".to_string());

        let scored = score_student(&student);

        assert_eq!(scored.english_average, None);
        assert_eq!(scored.student.grades.english_final_grade, None);
        assert_eq!(scored.gpa, Some(2.0));
    }

    #[test]
    fn averages_use_different_populations() {
        let mut student = sample_student("N-004", "G1");
        student.grades.nava001 = Some("P".to_string());
        student.grades.english_unit1 = Some(96.0);

        let scored = score_student(&student);

        assert_eq!(scored.nava_average_score, Some(60.0));
        assert_eq!(scored.gpa, Some((2.0 + 4.0) / 2.0));
    }

    #[test]
    fn unsatisfactory_codes_are_counted() {
        let mut student = sample_student("N-005", "G1");
        student.grades.nava001 = Some("UC".to_string());
        student.grades.nava002 = Some("f".to_string());
        student.grades.nava003 = Some("UA".to_string());
        student.grades.nava004 = Some("D".to_string());
        student.grades.nava005 = Some("#N/A".to_string());
        student.grades.nava006 = Some("??".to_string());

        let scored = score_student(&student);

        assert_eq!(scored.uc_count, 3);
        assert_eq!(scored.distinction_count, 1);
        assert_eq!(scored.nava_average_score, Some(20.0));
        assert_eq!(scored.performance_segment, PerformanceSegment::NeedsSupport);
    }

    #[test]
    fn no_grades_yields_nulls_and_support() {
        let scored = score_student(&sample_student("N-006", "G1"));

        assert_eq!(scored.nava_average_score, None);
        assert_eq!(scored.gpa, None);
        assert_eq!(scored.combined_english_average, None);
        assert_eq!(scored.performance_segment, PerformanceSegment::NeedsSupport);
    }

    #[test]
    fn combined_language_needs_both_operands() {
        assert_eq!(combined_english_average(Some(80.0), None), None);
        assert_eq!(combined_english_average(None, Some(70.0)), None);
        assert_eq!(combined_english_average(Some(50.0), Some(100.0)), Some(80.0));
    }
}
