use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use cohort_analytics::aggregate::build_views;
use cohort_analytics::loader::{load_students, InputFormat};
use cohort_analytics::profile::student_profile;
use cohort_analytics::report;
use cohort_analytics::{
    analyze_cohort, CohortAnalysis, EngineOutput, PerformanceSegment, StudentFilter,
};

#[derive(Parser)]
#[command(name = "cohort-analytics")]
#[command(about = "Performance analytics for vocational-training cohorts", long_about = None)]
struct Cli {
    /// Log pipeline stages (overrides RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct InputArgs {
    /// Student list as a JSON array or flat CSV
    #[arg(long, env = "COHORT_ANALYTICS_INPUT")]
    input: PathBuf,
    /// Input format; inferred from the file extension when omitted
    #[arg(long)]
    format: Option<InputFormat>,
}

#[derive(Args)]
struct FilterArgs {
    #[arg(long)]
    company: Option<String>,
    #[arg(long)]
    group: Option<String>,
    /// Segment label or slug, e.g. needs-support
    #[arg(long)]
    segment: Option<PerformanceSegment>,
    /// Case-insensitive match on name or id
    #[arg(long)]
    search: Option<String>,
}

impl From<FilterArgs> for StudentFilter {
    fn from(args: FilterArgs) -> Self {
        StudentFilter {
            company: args.company,
            group: args.group,
            segment: args.segment,
            search: args.search,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print headline cohort metrics
    Summary {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
        #[arg(long, default_value_t = 10)]
        support_limit: usize,
    },
    /// Print one student's detail profile as JSON
    Student {
        #[command(flatten)]
        input: InputArgs,
        #[arg(long)]
        id: String,
    },
    /// Write analysed students, benchmarks and views as JSON
    Export {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        filter: FilterArgs,
        /// Destination file; stdout when omitted
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

fn init_logging(verbose: bool) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.init();
}

fn load(input: &InputArgs) -> anyhow::Result<CohortAnalysis> {
    let students = load_students(&input.input, input.format)
        .with_context(|| format!("failed to load students from {}", input.input.display()))?;
    Ok(analyze_cohort(&students))
}

/// Filters after analysis so benchmarks stay cohort-wide.
fn select(
    input: &InputArgs,
    filter: FilterArgs,
) -> anyhow::Result<(StudentFilter, EngineOutput)> {
    let analysis = load(input)?;
    let filter = StudentFilter::from(filter);
    let total = analysis.students.len();
    let students = if filter.is_empty() {
        analysis.students
    } else {
        filter.apply(&analysis.students)
    };
    log::debug!("{} of {} students selected", students.len(), total);
    let views = build_views(&students);

    Ok((
        filter,
        EngineOutput {
            students,
            benchmarks: analysis.benchmarks,
            views,
        },
    ))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Commands::Summary { input, filter } => {
            let (_, output) = select(&input, filter)?;
            let overall = &output.views.overall;

            if overall.student_count == 0 {
                println!("No students match this selection.");
                return Ok(());
            }

            println!(
                "{} students, technical avg {:.1}, Aptis avg {:.1}, {} unclassified units",
                overall.student_count, overall.avg_nava, overall.avg_aptis, overall.total_uc_count
            );
            println!("Segments:");
            for entry in report::segment_mix(&output.views) {
                println!("- {}: {}", entry.segment, entry.count);
            }
            println!("Hardest units:");
            for unit in output.views.unit_metrics.iter().take(3) {
                println!(
                    "- {} average {:.1} ({:.1}% unclassified)",
                    unit.unit, unit.average, unit.uc_rate
                );
            }
        }
        Commands::Report {
            input,
            filter,
            out,
            support_limit,
        } => {
            let (filter, output) = select(&input, filter)?;
            let scope = filter.describe();
            let report = report::build_report(
                scope.as_deref(),
                chrono::Local::now().date_naive(),
                &output.students,
                &output.views,
                support_limit,
            );
            std::fs::write(&out, report)
                .with_context(|| format!("failed to write {}", out.display()))?;
            println!("Report written to {}.", out.display());
        }
        Commands::Student { input, id } => {
            let analysis = load(&input)?;
            let student = analysis
                .students
                .iter()
                .find(|s| s.id() == id)
                .with_context(|| format!("no student with id {id}"))?;
            let profile = student_profile(student);
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Commands::Export { input, filter, out } => {
            let (_, output) = select(&input, filter)?;
            let json = serde_json::to_string_pretty(&output)?;
            match out {
                Some(path) => {
                    std::fs::write(&path, json)
                        .with_context(|| format!("failed to write {}", path.display()))?;
                    println!(
                        "Exported {} students to {}.",
                        output.students.len(),
                        path.display()
                    );
                }
                None => println!("{json}"),
            }
        }
    }

    Ok(())
}
