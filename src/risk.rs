use crate::models::PerformanceSegment;

/// Technical average below this is a risk on its own.
pub const RISK_SCORE_FLOOR: f64 = 60.0;
/// Technical average at or above this counts as strong.
pub const HIGH_TECH_SCORE: f64 = 75.0;

/// CEFR B and C bands count as strong English; A bands and no test do not.
pub fn is_high_english(cefr_band: Option<&str>) -> bool {
    match cefr_band.and_then(|band| band.trim().chars().next()) {
        Some(level) => matches!(level.to_ascii_uppercase(), 'B' | 'C'),
        None => false,
    }
}

/// Priority-ordered classification: any risk marker wins over strengths.
pub fn classify_segment(
    nava_average_score: Option<f64>,
    uc_count: u32,
    cefr_band: Option<&str>,
) -> PerformanceSegment {
    let Some(average) = nava_average_score else {
        return PerformanceSegment::NeedsSupport;
    };

    if average < RISK_SCORE_FLOOR || uc_count > 0 {
        return PerformanceSegment::NeedsSupport;
    }

    let high_tech = average >= HIGH_TECH_SCORE;
    let high_english = is_high_english(cefr_band);

    match (high_tech, high_english) {
        (true, true) => PerformanceSegment::HighAchievers,
        (true, false) => PerformanceSegment::TechnicallyStrong,
        (false, true) => PerformanceSegment::LinguisticallyStrong,
        (false, false) => PerformanceSegment::Standard,
    }
}
