use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use perfverdict_app::{
    CompareRequest, CompareUseCase, MetadataRequest, MetadataUseCase, ReportRequest,
    ReportUseCase, StatisticsRequest, StatisticsUseCase, SummaryRequest, SummaryUseCase,
    TestrunRequest, TestrunUseCase,
};
use perfverdict_config::{
    load_config, resolve_metadata_config, resolve_report_config, resolve_testrun_config,
};
use perfverdict_domain::AggregateOptions;
use perfverdict_ingest::{TableFormat, parse_report, read_table};
use perfverdict_render::OutputFormat;
use perfverdict_types::{BenchmarkStatistics, MetadataConfig, SampleTable};
use serde_json::{Map, Value as Json};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

#[derive(Debug, Parser)]
#[command(
    name = "perfverdict",
    version,
    about = "Compare BASE and TEST benchmark runs and classify every case"
)]
struct Cli {
    /// Log debug events to stderr (overridden by RUST_LOG)
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    /// Log line format
    #[arg(long, global = true, value_enum, default_value_t = LogFormat::Text)]
    log_format: LogFormat,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compare two sample tables and emit the per-case report.
    Report {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        test: PathBuf,

        /// csv, jsonl or md
        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: OutputFormat,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Also write the full-precision report as JSON
        #[arg(long)]
        json: Option<PathBuf>,
    },

    /// Compute benchmark statistics (JSON) from a rendered report.
    Statistics {
        #[arg(long)]
        report: PathBuf,

        /// Supplies primary metrics and the unresolved-case policy
        #[arg(long)]
        config: Option<PathBuf>,

        /// BASE samples, counted into case_num_base
        #[arg(long)]
        base: Option<PathBuf>,

        /// TEST samples, counted into case_num_test
        #[arg(long)]
        test: Option<PathBuf>,

        /// Primary metric. Repeatable; overrides the config.
        #[arg(long = "primary-metric")]
        primary_metric: Vec<String>,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Pretty-print JSON
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },

    /// Render the NAME/VALUE summary from benchmark statistics.
    Summary {
        #[arg(long)]
        statistics: PathBuf,

        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: OutputFormat,

        /// Text for an absent overall performance
        #[arg(long, default_value = "")]
        fillna: String,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Report, statistics and summary in one pass. Exits 2 on FAIL.
    Compare {
        #[arg(long)]
        config: PathBuf,

        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        test: PathBuf,

        #[arg(long)]
        out_dir: PathBuf,

        /// Primary metric. Repeatable; overrides the config.
        #[arg(long = "primary-metric")]
        primary_metric: Vec<String>,

        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: OutputFormat,
    },

    /// Build a sample table from a testrun datastore.
    Testrun {
        #[arg(long)]
        config: PathBuf,

        /// JSON array with one object per iteration
        #[arg(long)]
        datastore: PathBuf,

        /// JSON object read by `metadata` columns
        #[arg(long)]
        metadata: Option<PathBuf>,

        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: OutputFormat,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Compare BASE and TEST run metadata side by side.
    Metadata {
        #[arg(long)]
        base: PathBuf,

        #[arg(long)]
        test: PathBuf,

        #[arg(long)]
        config: Option<PathBuf>,

        #[arg(long, default_value = "csv", value_parser = parse_format)]
        format: OutputFormat,

        /// Output path (default: stdout)
        #[arg(long)]
        out: Option<PathBuf>,
    },
}

const REPORT_STEM: &str = "benchmark_report";
const STATISTICS_FILE: &str = "benchmark_statistics.json";
const SUMMARY_STEM: &str = "benchmark_summary";

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_format);

    match real_main(cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("{err:#}");
            ExitCode::from(1)
        }
    }
}

fn init_logging(verbose: bool, format: LogFormat) {
    let level = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    match format {
        LogFormat::Json => subscriber.json().init(),
        LogFormat::Text => subscriber.init(),
    }
}

fn real_main(cli: Cli) -> anyhow::Result<ExitCode> {
    match cli.cmd {
        Command::Report {
            config,
            base,
            test,
            format,
            out,
            json,
        } => {
            let config = resolve_report_config(&load_config(&config)?)
                .with_context(|| format!("invalid config {}", config.display()))?;

            let outcome = ReportUseCase::execute(ReportRequest {
                base: read_sample_table("BASE", &base)?,
                test: read_sample_table("TEST", &test)?,
                config,
            })?;

            if let Some(path) = json {
                write_json(&path, &outcome.report, true)?;
            }
            emit(out.as_deref(), &outcome.table.write(format)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Statistics {
            report,
            config,
            base,
            test,
            primary_metric,
            out,
            pretty,
        } => {
            let mut options = AggregateOptions {
                primary_metrics: primary_metric,
                ..Default::default()
            };
            if let Some(path) = config {
                let cfg = resolve_report_config(&load_config(&path)?)
                    .with_context(|| format!("invalid config {}", path.display()))?;
                if options.primary_metrics.is_empty() {
                    options.primary_metrics = cfg.options.primary_metrics;
                }
                options.unresolved_case = cfg.options.unresolved_case;
            }
            options.case_num_base = base
                .map(|p| read_sample_table("BASE", &p).map(|t| t.len()))
                .transpose()?;
            options.case_num_test = test
                .map(|p| read_sample_table("TEST", &p).map(|t| t.len()))
                .transpose()?;

            let table = read_sample_table("REPORT", &report)?;
            let report = parse_report(&table)
                .with_context(|| format!("parse report {}", report.display()))?;

            let stats = StatisticsUseCase::execute(StatisticsRequest { report, options })?;

            let text = if pretty {
                serde_json::to_string_pretty(&stats)?
            } else {
                serde_json::to_string(&stats)?
            };
            emit(out.as_deref(), &format!("{text}\n"))?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Summary {
            statistics,
            format,
            fillna,
            out,
        } => {
            let statistics: BenchmarkStatistics = read_json(&statistics)?;
            let table = SummaryUseCase::execute(SummaryRequest { statistics, fillna });
            emit(out.as_deref(), &table.write(format)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Compare {
            config,
            base,
            test,
            out_dir,
            primary_metric,
            format,
        } => {
            let config = resolve_report_config(&load_config(&config)?)
                .with_context(|| format!("invalid config {}", config.display()))?;

            let outcome = CompareUseCase::execute(CompareRequest {
                base: read_sample_table("BASE", &base)?,
                test: read_sample_table("TEST", &test)?,
                config,
                primary_metrics: primary_metric,
            })?;

            fs::create_dir_all(&out_dir)
                .with_context(|| format!("create dir {}", out_dir.display()))?;
            let ext = format.extension();
            atomic_write(
                &out_dir.join(format!("{REPORT_STEM}.{ext}")),
                outcome.report.table.write(format)?.as_bytes(),
            )?;
            write_json(&out_dir.join(STATISTICS_FILE), &outcome.statistics, true)?;
            atomic_write(
                &out_dir.join(format!("{SUMMARY_STEM}.{ext}")),
                outcome.summary.write(format)?.as_bytes(),
            )?;

            info!(
                result = %outcome.statistics.benchmark_result,
                dir = %out_dir.display(),
                "comparison written"
            );
            println!(
                "{}: {} of {} cases failed",
                outcome.statistics.benchmark_result,
                outcome.statistics.failed_case_num,
                outcome.statistics.total_case_num
            );

            if outcome.failed() {
                Ok(ExitCode::from(2))
            } else {
                Ok(ExitCode::SUCCESS)
            }
        }

        Command::Testrun {
            config,
            datastore,
            metadata,
            format,
            out,
        } => {
            let config = resolve_testrun_config(&load_config(&config)?)
                .with_context(|| format!("invalid config {}", config.display()))?;
            let metadata = match metadata {
                Some(path) => read_json_object(&path)?,
                None => Map::new(),
            };

            let outcome = TestrunUseCase::execute(TestrunRequest {
                datastore: read_json(&datastore)?,
                metadata,
                config,
            })?;

            emit(out.as_deref(), &outcome.rendered.write(format)?)?;
            Ok(ExitCode::SUCCESS)
        }

        Command::Metadata {
            base,
            test,
            config,
            format,
            out,
        } => {
            let (config, fillna) = match config {
                Some(path) => {
                    let file = load_config(&path)?;
                    let config = resolve_metadata_config(&file)
                        .with_context(|| format!("invalid config {}", path.display()))?;
                    (config, file.defaults.fillna.unwrap_or_default())
                }
                None => (MetadataConfig::default(), String::new()),
            };

            let outcome = MetadataUseCase::execute(MetadataRequest {
                base: read_json_object(&base)?,
                test: read_json_object(&test)?,
                config,
                fillna,
            });

            emit(out.as_deref(), &outcome.rendered.write(format)?)?;
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn parse_format(s: &str) -> Result<OutputFormat, String> {
    OutputFormat::parse(s).ok_or_else(|| format!("unknown format {s:?} (expected csv|jsonl|md)"))
}

fn read_sample_table(name: &str, path: &Path) -> anyhow::Result<SampleTable> {
    let text = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let table = read_table(name, &text, TableFormat::from_path(path))
        .with_context(|| format!("parse {} table {}", name, path.display()))?;
    Ok(table)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let bytes = fs::read(path).with_context(|| format!("read {}", path.display()))?;
    let v =
        serde_json::from_slice(&bytes).with_context(|| format!("parse json {}", path.display()))?;
    Ok(v)
}

fn read_json_object(path: &Path) -> anyhow::Result<Map<String, Json>> {
    match read_json::<Json>(path)? {
        Json::Object(m) => Ok(m),
        _ => anyhow::bail!("{} must hold a JSON object", path.display()),
    }
}

fn emit(out: Option<&Path>, text: &str) -> anyhow::Result<()> {
    match out {
        Some(path) => {
            create_parent(path)?;
            atomic_write(path, text.as_bytes())
        }
        None => {
            print!("{text}");
            Ok(())
        }
    }
}

fn write_json<T: serde::Serialize>(path: &Path, value: &T, pretty: bool) -> anyhow::Result<()> {
    create_parent(path)?;

    let mut bytes = if pretty {
        serde_json::to_vec_pretty(value)?
    } else {
        serde_json::to_vec(value)?
    };
    bytes.push(b'\n');

    atomic_write(path, &bytes)
}

fn create_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .with_context(|| format!("create dir {}", parent.display()))?;
        }
    }
    Ok(())
}

fn atomic_write(path: &Path, bytes: &[u8]) -> anyhow::Result<()> {
    use std::io::Write;

    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let tmp = parent.join(format!(".{}.tmp", uuid::Uuid::new_v4()));

    {
        let mut f =
            fs::File::create(&tmp).with_context(|| format!("create temp {}", tmp.display()))?;
        f.write_all(bytes)
            .with_context(|| format!("write temp {}", tmp.display()))?;
        f.sync_all().ok();
    }

    fs::rename(&tmp, path)
        .with_context(|| format!("rename {} -> {}", tmp.display(), path.display()))?;
    Ok(())
}
