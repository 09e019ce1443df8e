use crate::{
    bundle::BundleSet,
    check::check_document,
    config::Config,
    report::{Extension, StatusReport},
    util::{ensure_dir, read_input},
};
use anyhow::{anyhow, Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

/// A report that keeps unknown top-level fields as they came in.
type OpenReport = StatusReport<Map<String, Value>>;

#[derive(Parser, Debug)]
#[command(name = "status-report")]
#[command(about = "Normalize, check and translate JSON status reports")]
pub struct Args {
    #[command(subcommand)]
    pub cmd: Command,

    /// Path to config TOML. If omitted, uses ./status-report.toml if present.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Override log level (trace/debug/info/warn/error).
    #[arg(long)]
    pub log_level: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a status document and print it in canonical form.
    Normalize {
        /// Input JSON file, `-` for stdin.
        #[arg(long)]
        input: PathBuf,
    },
    /// Translate messages of a status document through a locale bundle.
    Translate {
        #[arg(long)]
        input: PathBuf,
        /// Locale to translate to; defaults to translation.default_locale.
        #[arg(long)]
        locale: Option<String>,
        /// Directory of `<locale>.toml` bundles; defaults to translation.bundle_dir.
        #[arg(long)]
        bundle_dir: Option<PathBuf>,
    },
    /// Validate a status document and print a report about it.
    Check {
        #[arg(long)]
        input: PathBuf,
    },
}

pub fn dispatch(args: Args) -> Result<()> {
    let cfg = match resolve_config_path(args.config.as_deref()) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    let _guard = init_logging(&args, &cfg)?;

    match &args.cmd {
        Command::Normalize { input } => normalize(&cfg, input),
        Command::Translate {
            input,
            locale,
            bundle_dir,
        } => translate(&cfg, input, locale.as_deref(), bundle_dir.as_deref()),
        Command::Check { input } => check(&cfg, input),
    }
}

fn resolve_config_path(user: Option<&Path>) -> Option<PathBuf> {
    if let Some(p) = user {
        return Some(p.to_path_buf());
    }
    ["status-report.toml", "status-report.example.toml"]
        .into_iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

fn init_logging(args: &Args, cfg: &Config) -> Result<Option<WorkerGuard>> {
    let level = args
        .log_level
        .as_deref()
        .unwrap_or(cfg.logging.level.as_str());

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries the JSON result, so console logs go to stderr
    let console_layer = if cfg.logging.json {
        tracing_subscriber::fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    } else {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true)
            .boxed()
    };

    let (file_layer, guard) = if cfg.logging.write_to_file && !cfg.logging.file_path.is_empty() {
        let path = Path::new(&cfg.logging.file_path);
        let parent = path.parent().unwrap_or_else(|| Path::new("."));
        ensure_dir(parent)?;
        let file = std::fs::File::create(path)
            .with_context(|| format!("create log file: {}", path.display()))?;
        let (non_blocking, guard) = tracing_appender::non_blocking(file);
        let layer = tracing_subscriber::fmt::layer()
            .with_writer(non_blocking)
            .with_ansi(false)
            .with_target(true)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer)
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(guard)
}

fn normalize(cfg: &Config, input: &Path) -> Result<()> {
    let raw = read_input(input)?;
    let report = OpenReport::from_json_str(&raw)
        .with_context(|| format!("decoding status: {}", input.display()))?;
    debug!(
        "decoded status={} messages={}",
        report.status(),
        report.messages().len()
    );
    print_report(cfg, &report)
}

fn translate(
    cfg: &Config,
    input: &Path,
    locale: Option<&str>,
    bundle_dir: Option<&Path>,
) -> Result<()> {
    let locale = locale.unwrap_or(cfg.translation.default_locale.as_str());
    let dir = bundle_dir
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&cfg.translation.bundle_dir));

    let bundles = BundleSet::load_dir(&dir, &cfg.translation.default_locale)
        .with_context(|| format!("loading bundles: {}", dir.display()))?;
    let bundle = bundles.for_locale(locale);
    if bundle.is_empty() {
        warn!("no bundle for locale {locale} in {}; messages stay as they are", dir.display());
    }
    info!("translate input={} locale={locale}", input.display());

    let raw = read_input(input)?;
    let report: OpenReport = crate::translate::translate_json(&raw, &bundle)
        .with_context(|| format!("decoding status: {}", input.display()))?;
    print_report(cfg, &report)
}

fn check(cfg: &Config, input: &Path) -> Result<()> {
    let raw = read_input(input)?;
    let summary = check_document(&raw, &input.display().to_string());
    print_report(cfg, &summary)
}

fn print_report<X: Extension>(cfg: &Config, report: &StatusReport<X>) -> Result<()> {
    let out = if cfg.output.pretty {
        report.to_json_pretty()?
    } else {
        report.to_json_string()?
    };
    println!("{out}");
    Ok(())
}
