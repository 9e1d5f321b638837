use serde::Serialize;

use crate::aggregate::build_views;
use crate::benchmark::{attach_benchmarks, compute_benchmarks};
use crate::models::{AggregateViews, AnalyzedStudent, CohortBenchmarks, EnhancedStudent};
use crate::student::score_students;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CohortAnalysis {
    pub students: Vec<AnalyzedStudent>,
    pub benchmarks: CohortBenchmarks,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EngineOutput {
    pub students: Vec<AnalyzedStudent>,
    pub benchmarks: CohortBenchmarks,
    pub views: AggregateViews,
}

/// Per-student pass, benchmark pass and benchmark attachment.
pub fn analyze_cohort(students: &[EnhancedStudent]) -> CohortAnalysis {
    let scored = score_students(students);
    let benchmarks = compute_benchmarks(&scored);
    log::debug!(
        "scored {} students across {} groups",
        scored.len(),
        benchmarks.groups.len()
    );

    CohortAnalysis {
        students: attach_benchmarks(scored, &benchmarks),
        benchmarks,
    }
}

pub fn run(students: &[EnhancedStudent]) -> EngineOutput {
    let CohortAnalysis {
        students,
        benchmarks,
    } = analyze_cohort(students);
    let views = build_views(&students);

    EngineOutput {
        students,
        benchmarks,
        views,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PerformanceSegment;
    use crate::student::tests::{sample_student, with_aptis};
    use pretty_assertions::assert_eq;

    fn cohort() -> Vec<EnhancedStudent> {
        let mut first = with_aptis(sample_student("N-001", "G1"), 70.0, "B1");
        first.grades.nava001 = Some("D".to_string());
        first.grades.nava002 = Some("M".to_string());
        first.grades.english_unit1 = Some(80.0);

        let mut second = with_aptis(sample_student("N-002", "G2"), 40.0, "A2");
        second.company = "Globex".to_string();
        second.grades.nava001 = Some("P".to_string());
        second.grades.nava002 = Some("UC".to_string());

        vec![first, second]
    }

    #[test]
    fn pipeline_is_idempotent() {
        let input = cohort();
        assert_eq!(run(&input), run(&input));
    }

    #[test]
    fn analysis_keeps_input_order_and_benchmarks() {
        let analysis = analyze_cohort(&cohort());

        assert_eq!(analysis.students[0].id(), "N-001");
        assert_eq!(analysis.students[0].segment(), PerformanceSegment::HighAchievers);
        assert_eq!(analysis.students[1].segment(), PerformanceSegment::NeedsSupport);
        assert_eq!(analysis.benchmarks.academy.aptis, 55.0);
        assert_eq!(analysis.students[1].benchmark.group.nava, 30.0);
        assert_eq!(analysis.students[0].benchmark.academy, analysis.benchmarks.academy);
    }

    #[test]
    fn run_aggregates_the_full_list() {
        let output = run(&cohort());

        assert_eq!(output.views.overall.student_count, 2);
        assert_eq!(output.views.companies.len(), 2);
        assert_eq!(output.views.scatter.len(), 2);
    }

    #[test]
    fn analysed_students_serialize_flat() {
        let output = run(&cohort());
        let value = serde_json::to_value(&output.students[0]).expect("serialize");

        assert_eq!(value["navaId"], "N-001");
        assert_eq!(value["navaAverageScore"], 75.0);
        assert_eq!(value["performanceSegment"], "High Achievers");
        assert_eq!(value["grades"]["englishFinalGrade"], "B");
        assert!(value["benchmark"]["academy"]["gpa"].is_number());
    }
}
