//! Adlens: text, colour and layout extraction for advertising creatives.
//!
//! Adlens reads flat raster images and layered PSD documents and reports,
//! for each file, the copy it carries (headline, body, call to action), its
//! colour scheme and how its content is laid out. Both kinds of input end up
//! in the same [`model::ExtractionResult`] shape.
//!
//! # Modules
//!
//! - [`coordinator`]: routes an upload to the raster and PSD pipelines
//! - [`pipeline`]: per-format extraction
//! - [`vision`]: vision-service client and detection categorization
//! - [`psd`]: document parsing and the layer-tree walker
//! - [`color`]: palette quantization and contrast
//! - [`model`]: the output records
//! - [`intake`]: upload validation
//! - [`error`]: error types and caller-facing error codes

pub mod color;
pub mod config;
pub mod coordinator;
pub mod error;
pub mod geometry;
pub mod inspect;
pub mod intake;
pub mod model;
pub mod pipeline;
pub mod psd;
pub mod report;
pub mod telemetry;
pub mod vision;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use url::Url;

pub use config::AnalyzerConfig;
pub use coordinator::Coordinator;
pub use error::AdlensError;

use psd::PsdParser;
use report::OutputFormat;

/// The adlens CLI application.
#[derive(Parser)]
#[command(name = "adlens")]
#[command(version, author, about)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Extract text, colour and layout from images and PSD documents.
    Analyse(AnalyseArgs),
    /// Show the layer tree and copy of a PSD document.
    Inspect(InspectArgs),
    /// Compute the contrast ratio between two hex colors.
    Contrast(ContrastArgs),
}

/// Arguments for the analyse subcommand.
#[derive(clap::Args)]
struct AnalyseArgs {
    /// Files or directories to analyse. Directories are searched recursively.
    #[arg(required = true)]
    paths: Vec<PathBuf>,

    /// Output format for the response.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    output: OutputFormat,

    /// YAML config file; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Base URL of the vision service.
    #[arg(long, env = "ADLENS_VISION_ENDPOINT")]
    vision_endpoint: Option<Url>,

    /// Bearer token for the vision service.
    #[arg(long, env = "ADLENS_VISION_API_KEY", hide_env_values = true)]
    vision_api_key: Option<String>,

    /// Timeout for each vision call, in seconds.
    #[arg(long, env = "ADLENS_VISION_TIMEOUT_SECS")]
    vision_timeout_secs: Option<u64>,

    /// Largest accepted file, in bytes.
    #[arg(long, env = "ADLENS_MAX_FILE_SIZE")]
    max_file_size: Option<u64>,

    /// Files analysed at once per pipeline.
    #[arg(long)]
    concurrency: Option<usize>,

    /// Include debug details in error bodies.
    #[arg(long, env = "ADLENS_DEV_MODE")]
    dev_mode: bool,
}

/// Arguments for the inspect subcommand.
#[derive(clap::Args)]
struct InspectArgs {
    /// Binary PSD or exported layer-tree JSON.
    input: PathBuf,

    /// Maximum layer-tree lines to print.
    #[arg(long, default_value_t = 200)]
    max_tree_lines: usize,
}

/// Arguments for the contrast subcommand.
#[derive(clap::Args)]
struct ContrastArgs {
    /// Background color, e.g. '#ffffff'.
    background: String,
    /// Foreground color, e.g. '#000000'.
    foreground: String,
}

/// Run the adlens CLI.
///
/// This is the main entry point for the CLI, called from `main.rs`.
pub fn run() -> Result<(), AdlensError> {
    let cli = Cli::parse();

    match cli.command {
        Some(command) => {
            telemetry::init_tracing()?;
            match command {
                Commands::Analyse(args) => run_analyse(args),
                Commands::Inspect(args) => run_inspect(args),
                Commands::Contrast(args) => run_contrast(args),
            }
        }
        None => {
            println!("adlens {}", env!("CARGO_PKG_VERSION"));
            println!();
            println!("Text, colour and layout extraction for advertising creatives.");
            println!();
            println!("Run 'adlens --help' for usage information.");
            Ok(())
        }
    }
}

impl AnalyseArgs {
    /// Layers flags over the config file over the defaults.
    fn to_config(&self) -> Result<AnalyzerConfig, AdlensError> {
        let mut config = match &self.config {
            Some(path) => AnalyzerConfig::from_yaml_file(path)?,
            None => AnalyzerConfig::default(),
        };

        if let Some(endpoint) = &self.vision_endpoint {
            config.vision.endpoint = Some(endpoint.clone());
        }
        if let Some(key) = &self.vision_api_key {
            config.vision.api_key = Some(key.clone());
        }
        if let Some(secs) = self.vision_timeout_secs {
            config.vision.timeout_secs = secs;
        }
        if let Some(size) = self.max_file_size {
            config.max_file_size = size;
        }
        if let Some(concurrency) = self.concurrency {
            config.concurrency = concurrency;
        }
        config.dev_mode |= self.dev_mode;

        config.validate()?;
        Ok(config)
    }
}

/// Execute the analyse subcommand.
fn run_analyse(args: AnalyseArgs) -> Result<(), AdlensError> {
    let config = args.to_config()?;
    let files = intake::collect_sources(&args.paths)?;
    intake::validate_upload(&files, &intake::IntakeLimits::from(&config))?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let batches = runtime.block_on(async {
        let coordinator = Coordinator::from_config(&config)?;
        Ok::<_, AdlensError>(coordinator.analyse(&files).await)
    })?;

    println!("{}", report::render(&batches, args.output)?);
    Ok(())
}

/// Execute the inspect subcommand.
fn run_inspect(args: InspectArgs) -> Result<(), AdlensError> {
    let bytes = std::fs::read(&args.input).map_err(|source| AdlensError::FileRead {
        path: args.input.clone(),
        source,
    })?;
    let document = psd::AutoPsdParser.parse(&args.input, &bytes)?;

    let opts = inspect::InspectOptions {
        max_tree_lines: args.max_tree_lines,
        ..Default::default()
    };
    print!("{}", inspect::inspect_document(&document, &opts));
    Ok(())
}

/// Execute the contrast subcommand.
fn run_contrast(args: ContrastArgs) -> Result<(), AdlensError> {
    let ratio = color::contrast_ratio(&args.background, &args.foreground)?;
    println!("{ratio:.2}:1");
    Ok(())
}
