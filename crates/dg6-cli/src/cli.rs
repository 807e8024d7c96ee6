//! CLI argument definitions.

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use clap::{ColorChoice, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{InfoLevel, Verbosity};
use colorchoice_clap::Color;
use tracing::level_filters::LevelFilter;

use dg6_cli::config_io::DEFAULT_CONFIG_FILE;
use dg6_cli::logging::{LogConfig, LogFormat};

#[derive(Parser)]
#[command(
    name = "dg6",
    version,
    about = "Ingest DataGuide 6 exports into analysis-ready tables",
    long_about = "Ingest DataGuide 6 CSV exports into analysis-ready tables.\n\n\
                  Detects the export layout, reshapes it into one row per entity and date,\n\
                  normalizes monetary units and writes CSV or Parquet tables with a _meta\n\
                  lineage table."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for debug, -vv for trace, -q for warnings only).
    #[command(flatten)]
    pub verbosity: Verbosity<InfoLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,

    /// Load layout definitions from this directory instead of the built-in set.
    #[arg(long = "layouts-dir", value_name = "DIR", global = true)]
    pub layouts_dir: Option<PathBuf>,
}

impl Cli {
    /// Logging settings implied by the flags.
    ///
    /// `--log-level` beats `-v`/`-q`, and either one disables `RUST_LOG`.
    pub fn log_config(&self) -> LogConfig {
        let level_filter = self
            .log_level
            .map_or_else(|| self.verbosity.tracing_level_filter(), LevelFilter::from);
        let with_ansi = match self.color.color {
            ColorChoice::Always => true,
            ColorChoice::Never => false,
            ColorChoice::Auto => self.log_file.is_none() && io::stderr().is_terminal(),
        };
        LogConfig {
            level_filter,
            use_env_filter: !(self.verbosity.is_present() || self.log_level.is_some()),
            with_ansi,
            format: self.log_format.into(),
            log_file: self.log_file.clone(),
            ..LogConfig::default()
        }
    }
}

#[derive(Subcommand)]
pub enum Command {
    /// Detect the layout of a source file and print its metadata.
    Detect(DetectArgs),

    /// List registered layouts in detection order.
    Layouts,

    /// First run: generate a config for a source file and build outputs.
    Init(InitArgs),

    /// Rebuild outputs from an existing config.
    Ingest(IngestArgs),

    /// Build outputs for a source file unless they already exist.
    Open(OpenArgs),
}

#[derive(Parser)]
pub struct DetectArgs {
    /// DataGuide 6 export file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
}

#[derive(Parser)]
pub struct InitArgs {
    /// DataGuide 6 export file.
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,

    /// Output directory recorded in the config (default: outputs/).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Where to write the generated config.
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Only write the config; do not build outputs.
    #[arg(long = "no-run")]
    pub no_run: bool,
}

#[derive(Parser)]
pub struct IngestArgs {
    /// Config file written by `init`.
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,
}

#[derive(Parser)]
pub struct OpenArgs {
    /// DataGuide 6 export file, or a config file to load.
    #[arg(value_name = "PATH")]
    pub path: PathBuf,

    /// Output directory (default: outputs/).
    #[arg(long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<String>,

    /// Config path (default: <output-dir>.toml).
    #[arg(long = "config", value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Only write the config; do not build outputs.
    #[arg(long = "no-run")]
    pub no_run: bool,

    /// Rebuild even when outputs already exist.
    #[arg(long = "force")]
    pub force: bool,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

impl From<LogLevelArg> for LevelFilter {
    fn from(level: LogLevelArg) -> Self {
        match level {
            LogLevelArg::Error => Self::ERROR,
            LogLevelArg::Warn => Self::WARN,
            LogLevelArg::Info => Self::INFO,
            LogLevelArg::Debug => Self::DEBUG,
            LogLevelArg::Trace => Self::TRACE,
        }
    }
}

impl From<LogFormatArg> for LogFormat {
    fn from(format: LogFormatArg) -> Self {
        match format {
            LogFormatArg::Pretty => Self::Pretty,
            LogFormatArg::Compact => Self::Compact,
            LogFormatArg::Json => Self::Json,
        }
    }
}
