pub mod aggregate;
pub mod benchmark;
pub mod engine;
pub mod filter;
pub mod grades;
pub mod loader;
pub mod models;
pub mod profile;
pub mod report;
pub mod risk;
pub mod stats;
pub mod student;

pub use engine::{analyze_cohort, run, CohortAnalysis, EngineOutput};
pub use filter::StudentFilter;
pub use models::{
    AggregateViews, AnalyzedStudent, AptisScoreSet, BenchmarkAverages, EnhancedStudent,
    PerformanceSegment, RawGradeSet,
};
