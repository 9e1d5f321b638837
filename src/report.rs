use std::fmt::Write;

use chrono::NaiveDate;

use crate::models::{AggregateViews, AnalyzedStudent, PerformanceSegment, SegmentCount};

/// Segments with at least one student, largest first.
pub fn segment_mix(views: &AggregateViews) -> Vec<SegmentCount> {
    let mut mix: Vec<SegmentCount> = views
        .segment_counts
        .iter()
        .filter(|entry| entry.count > 0)
        .cloned()
        .collect();
    mix.sort_by(|a, b| b.count.cmp(&a.count));
    mix
}

/// Students in the Needs Support segment, weakest technical average first.
/// Students with no technical average at all lead the list.
pub fn students_needing_support(students: &[AnalyzedStudent]) -> Vec<&AnalyzedStudent> {
    let mut flagged: Vec<&AnalyzedStudent> = students
        .iter()
        .filter(|s| s.segment() == PerformanceSegment::NeedsSupport)
        .collect();
    flagged.sort_by(|a, b| {
        match (a.scored.nava_average_score, b.scored.nava_average_score) {
            (None, None) => std::cmp::Ordering::Equal,
            (None, Some(_)) => std::cmp::Ordering::Less,
            (Some(_), None) => std::cmp::Ordering::Greater,
            (Some(x), Some(y)) => x.partial_cmp(&y).unwrap_or(std::cmp::Ordering::Equal),
        }
    });
    flagged
}

fn score_or_dash(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{v:.1}"))
}

pub fn build_report(
    scope: Option<&str>,
    generated_on: NaiveDate,
    students: &[AnalyzedStudent],
    views: &AggregateViews,
    support_limit: usize,
) -> String {
    let mut output = String::new();
    let scope_label = scope.unwrap_or("the full cohort");

    let _ = writeln!(output, "# Cohort Performance Report");
    let _ = writeln!(output, "Generated on {} for {}", generated_on, scope_label);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Overview");

    let overall = &views.overall;
    if overall.student_count == 0 {
        let _ = writeln!(output, "No students match this selection.");
        return output;
    }

    let _ = writeln!(output, "- Students: {}", overall.student_count);
    let _ = writeln!(output, "- Average technical score: {:.1}", overall.avg_nava);
    let _ = writeln!(output, "- Average Aptis score: {:.1}", overall.avg_aptis);
    let _ = writeln!(output, "- Unclassified units: {}", overall.total_uc_count);
    let _ = writeln!(
        output,
        "- Distinctions per student: {:.2}",
        overall.avg_distinctions
    );

    let _ = writeln!(output);
    let _ = writeln!(output, "## Segment Mix");
    for entry in segment_mix(views) {
        let _ = writeln!(output, "- {}: {} students", entry.segment, entry.count);
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Most Challenging Units");
    for unit in &views.unit_metrics {
        let _ = writeln!(
            output,
            "- {}: average {:.1}, {:.1}% unclassified across {} grades",
            unit.unit, unit.average, unit.uc_rate, unit.graded_count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Companies");
    let _ = writeln!(output, "| Company | Students | Technical | Aptis | GPA |");
    let _ = writeln!(output, "|---|---|---|---|---|");
    for company in &views.companies {
        let _ = writeln!(
            output,
            "| {} | {} | {:.1} | {:.1} | {:.2} |",
            company.company,
            company.student_count,
            company.avg_nava,
            company.avg_aptis,
            company.avg_gpa
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Groups");
    let _ = writeln!(output, "| Group | Students | Technical | Aptis | GPA | UC |");
    let _ = writeln!(output, "|---|---|---|---|---|---|");
    for group in &views.groups {
        let _ = writeln!(
            output,
            "| {} | {} | {:.1} | {:.1} | {:.2} | {} |",
            group.group,
            group.student_count,
            group.avg_nava,
            group.avg_aptis,
            group.avg_gpa,
            group.uc_count
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Grade Distribution");
    for slice in &views.grade_distribution {
        let _ = writeln!(output, "- {}: {}", slice.name, slice.value);
    }

    let flagged = students_needing_support(students);
    let _ = writeln!(output);
    let _ = writeln!(output, "## Students Needing Support");

    if flagged.is_empty() {
        let _ = writeln!(output, "No students flagged in this selection.");
    } else {
        for student in flagged.iter().take(support_limit) {
            let _ = writeln!(
                output,
                "- {} ({}, {}) technical {} with {} unclassified units",
                student.name(),
                student.id(),
                student.scored.student.tech_group,
                score_or_dash(student.scored.nava_average_score),
                student.scored.uc_count
            );
        }
        if flagged.len() > support_limit {
            let _ = writeln!(output, "- ...and {} more", flagged.len() - support_limit);
        }
    }

    output
}
