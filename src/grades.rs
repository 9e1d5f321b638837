#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavaGrade {
    Distinction,
    Merit,
    Pass,
    /// UC, F and UA all count as unsatisfactory.
    Unsatisfactory,
}

impl NavaGrade {
    pub fn parse(letter: Option<&str>) -> Option<Self> {
        match normalize(letter?).as_str() {
            "D" => Some(NavaGrade::Distinction),
            "M" => Some(NavaGrade::Merit),
            "P" => Some(NavaGrade::Pass),
            "UC" | "F" | "UA" => Some(NavaGrade::Unsatisfactory),
            _ => None,
        }
    }

    /// Score used for cohort statistics.
    pub fn score(self) -> f64 {
        match self {
            NavaGrade::Distinction => 80.0,
            NavaGrade::Merit => 70.0,
            NavaGrade::Pass => 60.0,
            NavaGrade::Unsatisfactory => 0.0,
        }
    }

    /// Score used when plotting a single student's units.
    pub fn detail_score(self) -> f64 {
        match self {
            NavaGrade::Distinction => 85.0,
            NavaGrade::Merit => 75.0,
            NavaGrade::Pass => 65.0,
            NavaGrade::Unsatisfactory => 40.0,
        }
    }

    pub fn gpa_points(self) -> f64 {
        match self {
            NavaGrade::Distinction => 4.0,
            NavaGrade::Merit => 3.0,
            NavaGrade::Pass => 2.0,
            NavaGrade::Unsatisfactory => 0.0,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NavaGrade::Distinction => "Distinction",
            NavaGrade::Merit => "Merit",
            NavaGrade::Pass => "Pass",
            NavaGrade::Unsatisfactory => "Unclassified",
        }
    }
}

/// Lower bounds (inclusive) for the English letter grade, highest first.
const ENGLISH_GRADE_THRESHOLDS: [(f64, &str); 8] = [
    (95.0, "A+"),
    (90.0, "A"),
    (85.0, "B+"),
    (80.0, "B"),
    (75.0, "C+"),
    (70.0, "C"),
    (65.0, "D+"),
    (60.0, "D"),
];

fn normalize(letter: &str) -> String {
    letter.trim().to_ascii_uppercase()
}

/// Explicit "no grade recorded" markers, as opposed to unknown codes.
pub fn is_no_data_marker(letter: &str) -> bool {
    matches!(normalize(letter).as_str(), "" | "NA" | "#N/A")
}

pub fn grade_to_score(letter: Option<&str>) -> Option<f64> {
    NavaGrade::parse(letter).map(NavaGrade::score)
}

pub fn grade_to_detail_score(letter: Option<&str>) -> Option<f64> {
    NavaGrade::parse(letter).map(NavaGrade::detail_score)
}

pub fn nava_grade_to_gpa(letter: Option<&str>) -> Option<f64> {
    NavaGrade::parse(letter).map(NavaGrade::gpa_points)
}

pub fn english_grade_to_gpa(letter: Option<&str>) -> Option<f64> {
    match normalize(letter?).as_str() {
        "A+" | "A" => Some(4.0),
        "B+" => Some(3.5),
        "B" => Some(3.0),
        "C+" => Some(2.5),
        "C" => Some(2.0),
        "D+" => Some(1.5),
        "D" => Some(1.0),
        "F" => Some(0.0),
        _ => None,
    }
}

pub fn grade_from_average(average: Option<f64>) -> Option<&'static str> {
    let average = average?;
    let grade = ENGLISH_GRADE_THRESHOLDS
        .iter()
        .find(|(floor, _)| average >= *floor)
        .map(|(_, grade)| *grade)
        .unwrap_or("F");
    Some(grade)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn score_tables_match_fixed_constants() {
        let cases = [
            ("D", 80.0, 4.0),
            ("M", 70.0, 3.0),
            ("P", 60.0, 2.0),
            ("UC", 0.0, 0.0),
            ("F", 0.0, 0.0),
            ("UA", 0.0, 0.0),
        ];
        for (letter, score, gpa) in cases {
            assert_eq!(grade_to_score(Some(letter)), Some(score), "{letter}");
            assert_eq!(nava_grade_to_gpa(Some(letter)), Some(gpa), "{letter}");
        }
    }

    #[test]
    fn no_data_and_unknown_codes_map_to_none() {
        for letter in [None, Some("NA"), Some("#N/A"), Some("X"), Some(""), Some("A")] {
            assert_eq!(grade_to_score(letter), None);
            assert_eq!(grade_to_detail_score(letter), None);
            assert_eq!(nava_grade_to_gpa(letter), None);
        }
    }

    #[test]
    fn letters_are_case_insensitive() {
        assert_eq!(grade_to_score(Some("d")), Some(80.0));
        assert_eq!(nava_grade_to_gpa(Some(" uc ")), Some(0.0));
        assert_eq!(english_grade_to_gpa(Some("b+")), Some(3.5));
    }

    #[test]
    fn detail_scale_is_distinct_from_statistics_scale() {
        assert_eq!(grade_to_detail_score(Some("D")), Some(85.0));
        assert_eq!(grade_to_detail_score(Some("M")), Some(75.0));
        assert_eq!(grade_to_detail_score(Some("P")), Some(65.0));
        assert_eq!(grade_to_detail_score(Some("UA")), Some(40.0));
    }

    #[test]
    fn english_gpa_table() {
        let cases = [
            ("A+", 4.0),
            ("A", 4.0),
            ("B+", 3.5),
            ("B", 3.0),
            ("C+", 2.5),
            ("C", 2.0),
            ("D+", 1.5),
            ("D", 1.0),
            ("F", 0.0),
        ];
        for (letter, gpa) in cases {
            assert_eq!(english_grade_to_gpa(Some(letter)), Some(gpa), "{letter}");
        }
        assert_eq!(english_grade_to_gpa(Some("M")), None);
        assert_eq!(english_grade_to_gpa(None), None);
    }

    #[test]
    fn average_thresholds_are_inclusive_lower_bounds() {
        assert_eq!(grade_from_average(Some(95.0)), Some("A+"));
        assert_eq!(grade_from_average(Some(94.999)), Some("A"));
        assert_eq!(grade_from_average(Some(90.0)), Some("A"));
        assert_eq!(grade_from_average(Some(85.0)), Some("B+"));
        assert_eq!(grade_from_average(Some(80.0)), Some("B"));
        assert_eq!(grade_from_average(Some(75.0)), Some("C+"));
        assert_eq!(grade_from_average(Some(70.0)), Some("C"));
        assert_eq!(grade_from_average(Some(65.0)), Some("D+"));
        assert_eq!(grade_from_average(Some(60.0)), Some("D"));
        assert_eq!(grade_from_average(Some(59.999)), Some("F"));
        assert_eq!(grade_from_average(Some(0.0)), Some("F"));
        assert_eq!(grade_from_average(None), None);
    }

    #[test]
    fn no_data_markers() {
        assert!(is_no_data_marker("NA"));
        assert!(is_no_data_marker("#n/a"));
        assert!(!is_no_data_marker("Z"));
    }

    fn rank(grade: &str) -> usize {
        ["F", "D", "D+", "C", "C+", "B", "B+", "A", "A+"]
            .iter()
            .position(|g| *g == grade)
            .unwrap_or(usize::MAX)
    }

    proptest! {
        #[test]
        fn average_grade_is_monotonic(a in 0.0f64..120.0, b in 0.0f64..120.0) {
            let (low, high) = if a <= b { (a, b) } else { (b, a) };
            let low_grade = grade_from_average(Some(low)).unwrap_or("F");
            let high_grade = grade_from_average(Some(high)).unwrap_or("F");
            prop_assert!(rank(low_grade) <= rank(high_grade));
        }
    }
}
