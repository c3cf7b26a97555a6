use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use log::info;
#[cfg(not(feature = "tracing"))]
use log::LevelFilter;

use ptv_targets::detect::{detect_targets_with_stats, load_gray};
use ptv_targets::io::{write_targets, DetectConfig, DetectionReport};

#[derive(Parser, Debug)]
#[command(name = "ptv-targets", version, about = "Particle image target recognition")]
struct Cli {
    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Emit JSON tracing events instead of plain log lines.
    #[cfg(feature = "tracing")]
    #[arg(long, global = true)]
    trace_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Detect targets in one image.
    Detect(DetectArgs),
    /// Write a config file with default detection parameters.
    InitConfig {
        /// Output path for the JSON config.
        path: PathBuf,
    },
}

#[derive(Args, Debug)]
struct DetectArgs {
    /// Input image; overrides `image_path` from the config.
    image: Option<PathBuf>,
    /// JSON config (see `init-config`).
    #[arg(short, long)]
    config: Option<PathBuf>,
    /// JSON report output; overrides `report_path` from the config.
    #[arg(short, long)]
    report: Option<PathBuf>,
    /// Legacy target file output; overrides `targets_path` from the config.
    #[arg(short, long)]
    targets: Option<PathBuf>,
    /// Override the grey-value threshold.
    #[arg(long)]
    threshold: Option<u32>,
    /// Print the targets as JSON to stdout instead of writing a report.
    #[arg(long)]
    stdout: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&cli)?;

    match cli.command {
        Command::Detect(args) => run_detect(args),
        Command::InitConfig { path } => {
            DetectConfig::default().write_json(&path)?;
            println!("wrote default config to {}", path.display());
            Ok(())
        }
    }
}

#[cfg(feature = "tracing")]
fn init_logging(cli: &Cli) -> Result<(), log::SetLoggerError> {
    ptv_targets::core::init_tracing(cli.trace_json);
    if cli.verbose > 0 {
        log::warn!("-v is ignored with tracing enabled; set RUST_LOG instead");
    }
    Ok(())
}

#[cfg(not(feature = "tracing"))]
fn init_logging(cli: &Cli) -> Result<(), log::SetLoggerError> {
    let level = match cli.verbose {
        0 => LevelFilter::Info,
        1 => LevelFilter::Debug,
        _ => LevelFilter::Trace,
    };
    ptv_targets::core::init_with_level(level)
}

fn run_detect(args: DetectArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = match &args.config {
        Some(path) => DetectConfig::load_json(path)?,
        None => DetectConfig::default(),
    };
    if let Some(threshold) = args.threshold {
        cfg.detection.threshold = threshold;
    }

    let image_path = args
        .image
        .or_else(|| cfg.image_path.as_ref().map(PathBuf::from))
        .ok_or("no input image given (argument or `image_path` in config)")?;

    let img = load_gray(&image_path)?;
    let (targets, stats) = detect_targets_with_stats(&img, &cfg.detection)?;
    info!(
        "{}: {} targets ({} seeds)",
        image_path.display(),
        targets.len(),
        stats.seeds
    );

    let targets_path = args
        .targets
        .or_else(|| cfg.targets_path.as_ref().map(PathBuf::from));
    if let Some(path) = &targets_path {
        write_targets(path, &targets)?;
        info!("wrote target file {}", path.display());
    }

    let report = DetectionReport {
        image_path: image_path.to_string_lossy().into_owned(),
        width: img.width() as usize,
        height: img.height() as usize,
        config: cfg.detection.clone(),
        stats,
        targets,
    };

    if args.stdout {
        println!("{}", serde_json::to_string_pretty(&report.targets)?);
        return Ok(());
    }

    let report_path = args.report.unwrap_or_else(|| cfg.report_path());
    report.write_json(&report_path)?;
    println!("wrote detection report to {}", report_path.display());
    Ok(())
}
