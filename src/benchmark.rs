use std::collections::BTreeMap;

use crate::models::{
    AnalyzedStudent, BenchmarkAverages, CohortBenchmarks, ScoredStudent, StudentBenchmark,
};
use crate::stats::mean_or_zero;

/// Mean gpa, technical score and Aptis overall, each over the students that
/// have a value for it.
pub fn population_averages<'a, I>(students: I) -> BenchmarkAverages
where
    I: IntoIterator<Item = &'a ScoredStudent>,
{
    let mut gpa = Vec::new();
    let mut nava = Vec::new();
    let mut aptis = Vec::new();

    for student in students {
        gpa.extend(student.gpa);
        nava.extend(student.nava_average_score);
        aptis.extend(student.student.aptis_overall());
    }

    BenchmarkAverages {
        gpa: mean_or_zero(&gpa),
        nava: mean_or_zero(&nava),
        aptis: mean_or_zero(&aptis),
    }
}

pub fn compute_benchmarks(students: &[ScoredStudent]) -> CohortBenchmarks {
    let mut partitions: BTreeMap<&str, Vec<&ScoredStudent>> = BTreeMap::new();
    for student in students {
        partitions
            .entry(student.student.tech_group.as_str())
            .or_default()
            .push(student);
    }

    let groups = partitions
        .into_iter()
        .map(|(group, members)| (group.to_string(), population_averages(members)))
        .collect();

    CohortBenchmarks {
        academy: population_averages(students),
        groups,
    }
}

pub fn attach_benchmarks(
    students: Vec<ScoredStudent>,
    benchmarks: &CohortBenchmarks,
) -> Vec<AnalyzedStudent> {
    students
        .into_iter()
        .map(|scored| {
            let group = match benchmarks.groups.get(&scored.student.tech_group) {
                Some(averages) => *averages,
                None => {
                    log::warn!(
                        "{}: no benchmark for group {:?}",
                        scored.student.nava_id,
                        scored.student.tech_group
                    );
                    BenchmarkAverages::default()
                }
            };
            AnalyzedStudent {
                scored,
                benchmark: StudentBenchmark {
                    academy: benchmarks.academy,
                    group,
                },
            }
        })
        .collect()
}
