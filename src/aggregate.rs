use std::collections::BTreeMap;

use crate::benchmark::population_averages;
use crate::grades::{grade_to_score, NavaGrade};
use crate::models::{
    AggregateViews, AnalyzedStudent, ChartSlice, CompanyStats, GroupStats, OverallStats,
    PerformanceSegment, ScatterPoint, SegmentCount, UnitGradeDistribution, UnitMetric,
    TECHNICAL_UNITS,
};
use crate::stats::{mean_or_zero, percentage};

/// Builds every cohort view over `students`, which may already be filtered.
pub fn build_views(students: &[AnalyzedStudent]) -> AggregateViews {
    let segment_counts = segment_counts(students);
    let segment_chart: Vec<ChartSlice> = segment_counts
        .iter()
        .filter(|entry| entry.count > 0)
        .map(|entry| ChartSlice {
            name: entry.segment.label().to_string(),
            value: entry.count,
        })
        .collect();
    let unit_distribution = unit_distribution(students);
    let grade_distribution = overall_distribution(&unit_distribution);

    log::debug!("building cohort views over {} students", students.len());

    AggregateViews {
        overall: overall_stats(students),
        companies: company_stats(students),
        groups: group_stats(students),
        unit_metrics: unit_metrics(students),
        segment_counts,
        segment_chart,
        scatter: scatter_points(students),
        unit_distribution,
        grade_distribution,
    }
}

pub fn overall_stats(students: &[AnalyzedStudent]) -> OverallStats {
    let averages = population_averages(students.iter().map(|s| &s.scored));
    let total_uc_count = students.iter().map(|s| s.scored.uc_count).sum();
    let distinctions: u32 = students.iter().map(|s| s.scored.distinction_count).sum();
    let avg_distinctions = if students.is_empty() {
        0.0
    } else {
        distinctions as f64 / students.len() as f64
    };

    OverallStats {
        student_count: students.len(),
        avg_nava: averages.nava,
        avg_aptis: averages.aptis,
        total_uc_count,
        avg_distinctions,
    }
}

fn partition_by<'a, F>(
    students: &'a [AnalyzedStudent],
    key: F,
) -> BTreeMap<&'a str, Vec<&'a AnalyzedStudent>>
where
    F: Fn(&'a AnalyzedStudent) -> &'a str,
{
    let mut map: BTreeMap<&str, Vec<&AnalyzedStudent>> = BTreeMap::new();
    for student in students {
        map.entry(key(student)).or_default().push(student);
    }
    map
}

pub fn company_stats(students: &[AnalyzedStudent]) -> Vec<CompanyStats> {
    partition_by(students, |s| s.scored.student.company.as_str())
        .into_iter()
        .map(|(company, members)| {
            let averages = population_averages(members.iter().map(|s| &s.scored));
            CompanyStats {
                company: company.to_string(),
                student_count: members.len(),
                avg_nava: averages.nava,
                avg_aptis: averages.aptis,
                avg_gpa: averages.gpa,
            }
        })
        .collect()
}

/// Per-group averages, ordered by group name.
pub fn group_stats(students: &[AnalyzedStudent]) -> Vec<GroupStats> {
    partition_by(students, |s| s.scored.student.tech_group.as_str())
        .into_iter()
        .map(|(group, members)| {
            let averages = population_averages(members.iter().map(|s| &s.scored));
            GroupStats {
                group: group.to_string(),
                student_count: members.len(),
                avg_nava: averages.nava,
                avg_aptis: averages.aptis,
                avg_gpa: averages.gpa,
                uc_count: members.iter().map(|s| s.scored.uc_count).sum(),
            }
        })
        .collect()
}

/// Graded units only, hardest first.
pub fn unit_metrics(students: &[AnalyzedStudent]) -> Vec<UnitMetric> {
    let mut metrics: Vec<UnitMetric> = TECHNICAL_UNITS
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let mut scores = Vec::new();
            let mut uc = 0usize;
            for student in students {
                let letter = student.scored.student.grades.technical_grades()[index].1;
                if let Some(score) = grade_to_score(letter) {
                    scores.push(score);
                }
                if NavaGrade::parse(letter) == Some(NavaGrade::Unsatisfactory) {
                    uc += 1;
                }
            }
            UnitMetric {
                unit: unit.to_string(),
                average: mean_or_zero(&scores),
                uc_rate: percentage(uc, scores.len()),
                graded_count: scores.len(),
            }
        })
        .filter(|metric| metric.graded_count > 0)
        .collect();

    hardest_first(&mut metrics);
    metrics
}

pub fn hardest_first(metrics: &mut [UnitMetric]) {
    metrics.sort_by(|a, b| a.average.total_cmp(&b.average));
}

pub fn segment_counts(students: &[AnalyzedStudent]) -> Vec<SegmentCount> {
    PerformanceSegment::ALL
        .into_iter()
        .map(|segment| SegmentCount {
            segment,
            count: students.iter().filter(|s| s.segment() == segment).count(),
        })
        .collect()
}

pub fn scatter_points(students: &[AnalyzedStudent]) -> Vec<ScatterPoint> {
    students
        .iter()
        .filter_map(|s| {
            let aptis = s.scored.student.aptis_overall()?;
            let nava = s.scored.nava_average_score?;
            Some(ScatterPoint {
                aptis,
                nava,
                name: s.name().to_string(),
                id: s.id().to_string(),
            })
        })
        .collect()
}

pub fn unit_distribution(students: &[AnalyzedStudent]) -> Vec<UnitGradeDistribution> {
    TECHNICAL_UNITS
        .iter()
        .enumerate()
        .map(|(index, unit)| {
            let mut distribution = UnitGradeDistribution {
                unit: unit.to_string(),
                ..UnitGradeDistribution::default()
            };
            for student in students {
                let letter = student.scored.student.grades.technical_grades()[index].1;
                match NavaGrade::parse(letter) {
                    Some(NavaGrade::Distinction) => distribution.distinction += 1,
                    Some(NavaGrade::Merit) => distribution.merit += 1,
                    Some(NavaGrade::Pass) => distribution.pass += 1,
                    Some(NavaGrade::Unsatisfactory) => distribution.unclassified += 1,
                    None => {}
                }
            }
            distribution
        })
        .collect()
}

/// Totals across units, always in Distinction, Merit, Pass, Unclassified order.
pub fn overall_distribution(units: &[UnitGradeDistribution]) -> Vec<ChartSlice> {
    let totals: [(NavaGrade, usize); 4] = [
        (NavaGrade::Distinction, units.iter().map(|u| u.distinction).sum()),
        (NavaGrade::Merit, units.iter().map(|u| u.merit).sum()),
        (NavaGrade::Pass, units.iter().map(|u| u.pass).sum()),
        (NavaGrade::Unsatisfactory, units.iter().map(|u| u.unclassified).sum()),
    ];

    totals
        .into_iter()
        .map(|(grade, value)| ChartSlice {
            name: grade.label().to_string(),
            value,
        })
        .collect()
}
