//! CLI definition, tracing setup, and the build command.

use std::path::PathBuf;
use std::time::Duration;

use basin_core::pipeline::{self, BuildReport, ProgressReporter};
use basin_core::sink::{ArticleSink, DirectorySink, TempFileSink};
use basin_shared::{AppConfig, BuildConfig, load_config, load_config_from};
use clap::Parser;
use color_eyre::eyre::{Result, WrapErr};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// Utility that converts a recipes database into basin manifest.
#[derive(Parser)]
#[command(name = "basin-recipes", version, long_about = None)]
pub(crate) struct Cli {
    /// Input data directory (holds data/, images/ and thumbnails/).
    pub data_dir: PathBuf,

    /// Path of the manifest to write.
    pub manifest: PathBuf,

    /// Write article bodies to this directory with stable names instead of
    /// temporary files.
    #[arg(long, value_name = "DIR")]
    pub articles_dir: Option<PathBuf>,

    /// Config file (defaults to ~/.basin-recipes/basin-recipes.toml).
    #[arg(long, value_name = "FILE", env = "BASIN_RECIPES_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log format: text (default) or json.
    #[arg(long, default_value = "text")]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "basin=info",
        1 => "basin=debug",
        _ => "basin=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .with_target(false)
                .init();
        }
        LogFormat::Json => {
            fmt()
                .json()
                .with_env_filter(env_filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
}

// ---------------------------------------------------------------------------
// Command
// ---------------------------------------------------------------------------

/// Build the manifest described by the CLI arguments.
pub(crate) fn run(cli: Cli) -> Result<()> {
    let app = match &cli.config {
        Some(path) => load_config_from(path)?,
        None => load_config()?,
    };

    let config = BuildConfig::new(&app, &cli.data_dir, &cli.manifest)
        .wrap_err_with(|| format!("invalid data directory '{}'", cli.data_dir.display()))?;

    let mut sink: Box<dyn ArticleSink> = match &cli.articles_dir {
        Some(dir) => Box::new(DirectorySink::new(dir)?),
        None => Box::new(TempFileSink::new()),
    };

    info!(
        data_dir = %config.data_dir.display(),
        manifest = %config.manifest_path.display(),
        "building manifest"
    );

    let reporter = CliProgress::new();
    let report = pipeline::run(&config, sink.as_mut(), &reporter);
    reporter.finish();
    let report = report?;

    print_summary(&app, &report);
    Ok(())
}

fn print_summary(app: &AppConfig, report: &BuildReport) {
    println!();
    println!("  Manifest written: {}", report.manifest_path.display());
    println!("  Articles:   {}", report.articles);
    println!("  Images:     {}", report.images);
    println!("  Categories: {}", report.categories);
    println!("  Chefs:      {}", report.chefs);
    if report.dangling > 0 {
        println!("  Dangling:   {} (strict mode off)", report.dangling);
    } else if app.manifest.strict_references {
        println!("  References: all resolved (strict)");
    }
    println!("  Time:       {:.1}s", report.elapsed.as_secs_f64());
    println!();
}

// ---------------------------------------------------------------------------
// CLI progress reporter
// ---------------------------------------------------------------------------

/// CLI progress reporter using an indicatif spinner.
struct CliProgress {
    spinner: ProgressBar,
}

impl CliProgress {
    fn new() -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner())
                .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
        );
        spinner.enable_steady_tick(Duration::from_millis(80));
        Self { spinner }
    }

    fn finish(&self) {
        if !self.spinner.is_finished() {
            self.spinner.finish_and_clear();
        }
    }
}

impl ProgressReporter for CliProgress {
    fn phase(&self, name: &str) {
        self.spinner.set_message(name.to_string());
    }

    fn done(&self, _report: &BuildReport) {
        self.spinner.finish_and_clear();
    }
}
