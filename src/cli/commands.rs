use std::io::{self, Write};
use std::path::PathBuf;
use clap::error::ErrorKind;
use clap::{ArgAction, Parser};
use log::debug;
use crate::cli::error::{usage_error, user_error};
use crate::config::PipelineConfig;
use crate::pipeline::{json_report, run_pipeline, write_text_report, PipelineReport};
use crate::scheduler::{DryRunScheduler, SlurmScheduler};
use anyhow::{Context, Result};

#[derive(Parser, Debug)]
#[command(name = "halo-pipeline")]
#[command(about = "Submit the halo membership/properties pipeline as four chained Slurm array jobs")]
#[command(version = env!("CARGO_PKG_VERSION"))]
pub struct Cli {
    /// Run identifier (e.g., "L1000N1800/HYDRO_FIDUCIAL")
    pub run: String,
    /// Snapshot range in scheduler array syntax (e.g., "0-77")
    #[arg(allow_hyphen_values = true)]
    pub range: String,
    /// Configuration file (default: <work-dir>/.halo-pipeline/rc if present)
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Pipeline directory (default: current directory)
    #[arg(long)]
    pub work_dir: Option<PathBuf>,
    /// Directory holding one template directory per box size
    #[arg(long)]
    pub templates_root: Option<PathBuf>,
    /// Directory for job logs (created if missing)
    #[arg(long)]
    pub log_dir: Option<PathBuf>,
    /// Print the sbatch commands instead of submitting
    #[arg(long)]
    pub dry_run: bool,
    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
    /// More log output (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

pub fn run() -> Result<()> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => match e.kind() {
            ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => {
                e.print()?;
                return Ok(());
            }
            _ => usage_error(&e.render().to_string()),
        },
    };

    init_logging(cli.verbose);
    handle_submit(cli)
}

/// Log to stderr. RUST_LOG wins over -v when set.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .target(env_logger::Target::Stderr)
        .try_init();
}

/// Build the configuration from the rc file and command line flags
pub fn build_config(cli: &Cli) -> Result<PipelineConfig> {
    let work_dir = match &cli.work_dir {
        Some(dir) => {
            if !dir.is_dir() {
                user_error(&format!("Working directory not found: {}", dir.display()));
            }
            dir.clone()
        }
        None => std::env::current_dir().context("Failed to determine current directory")?,
    };

    let mut config = PipelineConfig::load(work_dir, cli.config.as_deref())?;
    if let Some(root) = &cli.templates_root {
        config.templates_root = config.resolve(root);
    }
    if let Some(log_dir) = &cli.log_dir {
        config.log_dir = config.resolve(log_dir);
    }
    config.dry_run = cli.dry_run;
    debug!("Configuration: {:?}", config);
    Ok(config)
}

fn handle_submit(cli: Cli) -> Result<()> {
    let config = build_config(&cli)?;

    let (report, dry_run_commands) = if config.dry_run {
        let mut scheduler = DryRunScheduler::from_config(&config);
        let report = run_pipeline(&config, &cli.run, &cli.range, &mut scheduler);
        (report, Some(scheduler.commands().to_vec()))
    } else {
        let mut scheduler = SlurmScheduler::from_config(&config);
        (run_pipeline(&config, &cli.run, &cli.range, &mut scheduler), None)
    };

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let written = write_report(&report, dry_run_commands.as_deref(), cli.json, &mut out);
    settle(report, written)
}

/// Text or JSON report on `out`
fn write_report(
    report: &PipelineReport,
    dry_run_commands: Option<&[String]>,
    json: bool,
    out: &mut dyn Write,
) -> Result<()> {
    if json {
        let json = serde_json::to_string_pretty(&json_report(report, dry_run_commands))
            .context("Failed to serialize report")?;
        writeln!(out, "{}", json)?;
    } else {
        print_text(report, dry_run_commands.unwrap_or_default(), out)?;
    }
    out.flush()?;
    Ok(())
}

/// Pipeline failure outranks a failure to write the report
fn settle(report: PipelineReport, written: Result<()>) -> Result<()> {
    report.into_result()?;
    written
}

fn print_text(report: &PipelineReport, dry_run_commands: &[String], out: &mut dyn Write) -> Result<()> {
    // Nothing worth reporting if we never reached the scheduler
    if !report.is_complete() && report.submitted.is_empty() {
        return Ok(());
    }

    write_text_report(report, out)?;
    if !dry_run_commands.is_empty() {
        writeln!(out, "Dry run, nothing submitted. Would run:")?;
        for command in dry_run_commands {
            writeln!(out, "  {}", command)?;
        }
    }
    Ok(())
}
