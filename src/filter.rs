use crate::models::{AnalyzedStudent, PerformanceSegment};

/// Consumer-side selection applied to analysed students before building
/// views. Benchmarks are left untouched, so they stay cohort-wide.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudentFilter {
    pub company: Option<String>,
    pub group: Option<String>,
    pub segment: Option<PerformanceSegment>,
    pub search: Option<String>,
}

impl StudentFilter {
    pub fn is_empty(&self) -> bool {
        self.company.is_none()
            && self.group.is_none()
            && self.segment.is_none()
            && self.search.is_none()
    }

    pub fn matches(&self, student: &AnalyzedStudent) -> bool {
        let record = &student.scored.student;

        if let Some(company) = &self.company {
            if !record.company.eq_ignore_ascii_case(company) {
                return false;
            }
        }
        if let Some(group) = &self.group {
            if !record.tech_group.eq_ignore_ascii_case(group) {
                return false;
            }
        }
        if let Some(segment) = self.segment {
            if student.segment() != segment {
                return false;
            }
        }
        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            if !record.full_name.to_lowercase().contains(&needle)
                && !record.nava_id.to_lowercase().contains(&needle)
            {
                return false;
            }
        }
        true
    }

    pub fn apply(&self, students: &[AnalyzedStudent]) -> Vec<AnalyzedStudent> {
        students
            .iter()
            .filter(|student| self.matches(student))
            .cloned()
            .collect()
    }

    /// Short human label for report headers, `None` when nothing is selected.
    pub fn describe(&self) -> Option<String> {
        let mut parts = Vec::new();
        if let Some(company) = &self.company {
            parts.push(format!("company {company}"));
        }
        if let Some(group) = &self.group {
            parts.push(format!("group {group}"));
        }
        if let Some(segment) = self.segment {
            parts.push(format!("segment {segment}"));
        }
        if let Some(search) = &self.search {
            parts.push(format!("search \"{search}\""));
        }
        if parts.is_empty() {
            None
        } else {
            Some(parts.join(", "))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::analyze_cohort;
    use crate::student::tests::sample_student;

    fn analysed() -> Vec<AnalyzedStudent> {
        let mut avery = sample_student("N-100", "Electrical A");
        avery.full_name = "Avery Lee".to_string();
        avery.grades.nava001 = Some("D".to_string());
        let mut jules = sample_student("N-200", "Mechanical B");
        jules.full_name = "Jules Moreno".to_string();
        jules.company = "Globex".to_string();
        analyze_cohort(&[avery, jules]).students
    }

    #[test]
    fn empty_filter_keeps_everyone() {
        let filter = StudentFilter::default();
        assert!(filter.is_empty());
        assert_eq!(filter.apply(&analysed()).len(), 2);
        assert_eq!(filter.describe(), None);
    }

    #[test]
    fn company_and_group_match_case_insensitively() {
        let students = analysed();
        let by_company = StudentFilter {
            company: Some("globex".to_string()),
            ..StudentFilter::default()
        };
        let by_group = StudentFilter {
            group: Some("ELECTRICAL A".to_string()),
            ..StudentFilter::default()
        };

        assert!(!by_company.is_empty());
        assert_eq!(by_company.apply(&students)[0].id(), "N-200");
        assert_eq!(by_group.apply(&students)[0].id(), "N-100");
    }

    #[test]
    fn search_checks_name_and_id() {
        let students = analysed();
        let by_name = StudentFilter {
            search: Some("avery".to_string()),
            ..StudentFilter::default()
        };
        let by_id = StudentFilter {
            search: Some("n-2".to_string()),
            ..StudentFilter::default()
        };

        assert_eq!(by_name.apply(&students).len(), 1);
        assert_eq!(by_id.apply(&students)[0].name(), "Jules Moreno");
    }

    #[test]
    fn filtering_keeps_cohort_benchmarks() {
        let students = analysed();
        let filter = StudentFilter {
            segment: Some(PerformanceSegment::TechnicallyStrong),
            ..StudentFilter::default()
        };

        let selected = filter.apply(&students);

        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].benchmark.academy.nava, 80.0);
        assert_eq!(
            filter.describe().as_deref(),
            Some("segment Technically Strong")
        );
    }
}
