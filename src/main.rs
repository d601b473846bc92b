use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use scholarship_cleaner::app::ports::RecordSource;
use scholarship_cleaner::app::{CleanUseCase, OverviewUseCase, RunReport};
use scholarship_cleaner::config::{Config, DEFAULT_CONFIG_PATH};
use scholarship_cleaner::constants::SAMPLE_OUTPUT_FILENAME;
use scholarship_cleaner::error::Result as PipelineResult;
use scholarship_cleaner::infra::{DataFormat, FileRecordSink, FileRecordSource, LoadedRecordSource};
use scholarship_cleaner::logging;
use scholarship_cleaner::observability;
use scholarship_cleaner::pipeline::processing::overview::DatasetOverview;
use scholarship_cleaner::pipeline::{clean_scholarship_text, CleaningOptions};
use scholarship_cleaner::types::ScholarshipTable;
use scholarship_cleaner::workspace::Workspace;

#[derive(Parser)]
#[command(name = "scholarship_cleaner")]
#[command(about = "Scholarship dataset text cleaning and deduplication")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the config file
    #[arg(long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Workspace root (overrides config and environment)
    #[arg(long, global = true)]
    workspace: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clean, deduplicate and save the raw scholarship dataset
    Clean {
        /// Input file; searched for in the workspace when omitted
        #[arg(long)]
        input: Option<PathBuf>,
        /// Output file; defaults to Data/<output.filename> in the workspace
        #[arg(long)]
        output: Option<PathBuf>,
        /// Output format; inferred from the output file name when omitted
        #[arg(long, value_enum)]
        format: Option<DataFormat>,
        /// Skip building the combined raw text
        #[arg(long)]
        no_combine: bool,
        /// Skip text cleaning
        #[arg(long)]
        no_clean: bool,
        /// Keep records with repeated cleaned text
        #[arg(long)]
        no_dedupe: bool,
        /// Do not assign scholarship ids
        #[arg(long)]
        no_id: bool,
        /// Write Prometheus metrics for this run to a file
        #[arg(long)]
        metrics_out: Option<PathBuf>,
    },
    /// Print a profile of a scholarship dataset
    Overview {
        /// Input file; searched for in the workspace when omitted
        #[arg(long)]
        input: Option<PathBuf>,
    },
    /// Clean a single text read from a file or stdin
    Text {
        /// File to read; stdin when omitted
        file: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    dotenv::dotenv().ok();
    logging::init_logging();

    let cli = Cli::parse();
    let mut config = Config::load(&cli.config)
        .with_context(|| format!("Failed to load config from {}", cli.config.display()))?;
    if let Some(root) = cli.workspace {
        config.workspace.root = root;
    }

    match cli.command {
        Commands::Clean {
            input,
            output,
            format,
            no_combine,
            no_clean,
            no_dedupe,
            no_id,
            metrics_out,
        } => {
            println!("🧹 Cleaning scholarship dataset...");
            if metrics_out.is_some() {
                observability::init_metrics();
            }

            let options = CleaningOptions {
                combine_text: config.cleaning.combine_text && !no_combine,
                apply_text_cleaning: config.cleaning.apply_text_cleaning && !no_clean,
                deduplicate_on_cleaned_text: config.cleaning.deduplicate_on_cleaned_text && !no_dedupe,
                assign_id: config.cleaning.assign_id && !no_id,
            };

            let report = match run_clean(&config, input, output, format, options) {
                Ok(report) => report,
                Err(e) => {
                    error!("Cleaning run failed: {:#}", e);
                    println!("❌ Cleaning run failed: {:#}", e);
                    std::process::exit(1);
                }
            };
            print_run_report(&report);

            if let Some(path) = metrics_out {
                let rendered = observability::render_metrics().unwrap_or_default();
                fs::write(&path, rendered)
                    .with_context(|| format!("Failed to write metrics to {}", path.display()))?;
                println!("   Metrics: {}", path.display());
            }
            println!("✅ Cleaning completed successfully");
        }
        Commands::Overview { input } => {
            println!("🔎 Profiling scholarship dataset...");
            let source = locate_source(input, &config.workspace(), Workspace::load_analysis_data)?;
            let overview = OverviewUseCase::new(source).run()?;
            print_overview(&overview);
        }
        Commands::Text { file } => {
            let text = match file {
                Some(path) => fs::read_to_string(&path)
                    .with_context(|| format!("Failed to read {}", path.display()))?,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("Failed to read stdin")?;
                    buf
                }
            };
            println!("{}", clean_scholarship_text(&text));
        }
    }
    Ok(())
}

/// Explicit input file, or the first workspace candidate that loads
fn locate_source(
    input: Option<PathBuf>,
    workspace: &Workspace,
    discover: fn(&Workspace) -> PipelineResult<(PathBuf, ScholarshipTable)>,
) -> Result<Box<dyn RecordSource>> {
    match input {
        Some(path) => Ok(Box::new(FileRecordSource::new(path))),
        None => {
            let (path, table) = discover(workspace).with_context(|| {
                format!("No scholarship data found under {}", workspace.root().display())
            })?;
            info!("Using {}", path.display());
            Ok(Box::new(LoadedRecordSource::new(path, table)))
        }
    }
}

fn run_clean(
    config: &Config,
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    format: Option<DataFormat>,
    options: CleaningOptions,
) -> Result<RunReport> {
    let workspace = config.workspace();
    let source = locate_source(input, &workspace, Workspace::load_raw_data)?;

    let (output_path, sample_path, inferred) = match output {
        Some(path) => {
            let sample = sibling(&path, SAMPLE_OUTPUT_FILENAME);
            let inferred = DataFormat::from_path(&path);
            (path, sample, inferred)
        }
        None => (
            workspace.output_path(&config.output.filename),
            workspace.sample_path(),
            config.output_format(),
        ),
    };
    let format = match format {
        Some(f) => f,
        None => inferred?,
    };

    let mut sink = FileRecordSink::new(&output_path, format);
    if config.output.write_sample {
        sink = sink.with_sample(sample_path, config.output.sample_size);
    }

    let report = CleanUseCase::new(source, Box::new(sink), options).run()?;
    Ok(report)
}

fn sibling(path: &Path, filename: &str) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(filename),
        None => PathBuf::from(filename),
    }
}

fn print_run_report(report: &RunReport) {
    let cleaning = &report.cleaning;
    println!("\n📊 Cleaning Results (run {}):", report.run_id);
    println!("   Input: {}", report.source);
    println!("   Rows in: {}", cleaning.input_rows);
    println!("   Rows out: {}", cleaning.output_rows);
    println!("   Duplicates removed: {}", cleaning.duplicates_removed);
    println!("   Columns added: {}", cleaning.columns_added);
    match cleaning.text_source {
        Some(source) => println!("   Text source: {}", source),
        None => println!("   Text source: none"),
    }
    if let Some(avg) = cleaning.avg_cleaned_length {
        println!("   Avg cleaned length: {:.1} chars", avg);
    }
    for step in &cleaning.steps {
        println!("   - {}", step);
    }
    println!("\n💾 Saved {} records to {}", report.saved.records, report.saved.path.display());
    println!("   Format: {}", report.saved.format);
    println!("   Size: {} bytes", report.saved.bytes);
    println!("   SHA-256: {}", report.saved.sha256);
    if let Some(sample) = &report.saved.sample_path {
        println!("   Sample: {}", sample.display());
    }
    let elapsed = report.finished_at - report.started_at;
    println!("   Took: {} ms", elapsed.num_milliseconds());
}

fn print_overview(overview: &DatasetOverview) {
    println!("\n📊 Dataset Overview:");
    println!("   Total scholarships: {}", overview.total_rows);
    if let Some(n) = overview.unique_providers {
        println!("   Unique providers: {}", n);
    }
    if let Some(n) = overview.unique_countries {
        println!("   Unique countries: {}", n);
    }
    if let Some(n) = overview.unique_programs {
        println!("   Unique programs: {}", n);
    }
    println!("   Duplicate rows: {}", overview.duplicate_rows);

    println!("\n📋 Columns:");
    for column in &overview.columns {
        println!(
            "   {:<28} non-null {:>6}  null {:>6}  distinct {:>6}",
            column.name, column.non_null, column.nulls, column.distinct
        );
    }

    if !overview.missing.is_empty() {
        println!("\n⚠️  Missing values:");
        for missing in &overview.missing {
            println!("   {}: {} ({:.2}%)", missing.column, missing.count, missing.percent);
        }
    }

    for (title, values) in [
        ("Top programs", &overview.top_programs),
        ("Top providers", &overview.top_providers),
        ("Top countries", &overview.top_countries),
    ] {
        if values.is_empty() {
            continue;
        }
        println!("\n🏆 {}:", title);
        for entry in values {
            println!("   {:>5}  {}", entry.count, entry.value);
        }
    }

    if let Some(stats) = &overview.eligibility_length {
        println!("\n📝 Eligibility text length:");
        println!("   Mean: {:.2} chars", stats.mean_chars);
        println!("   Median: {:.2} chars", stats.median_chars);
        println!("   Max: {} chars", stats.max_chars);
        println!("   Mean words: {:.2}", stats.mean_words);
    }
    if let Some(n) = overview.missing_eligibility {
        println!("   Missing eligibility: {}", n);
    }

    if !overview.deadline_timeline.is_empty() {
        println!("\n📅 Deadlines by month:");
        for month in &overview.deadline_timeline {
            println!("   {}  {}", month.month, month.count);
        }
    }
    if overview.unparsed_deadlines > 0 {
        println!("   Unparsed deadlines: {}", overview.unparsed_deadlines);
    }
}
