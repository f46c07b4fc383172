//! CLI entry point for pydantic-mermaid.
//!
//! This binary scans a package of Pydantic models and publishes them as a
//! Mermaid class diagram, either as a standalone `.mmd` file or inside the
//! project README.
//!
//! # Usage
//!
//! ```bash
//! pydantic-mermaid [OPTIONS] <COMMAND>
//!
//! # Write data_archive_models.mmd
//! pydantic-mermaid generate --src src/data_archive
//!
//! # Refresh the diagram section of README.md
//! pydantic-mermaid update-readme
//!
//! # Dump the catalog and statistics as JSON
//! pydantic-mermaid report --format json --output models.json
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::fs;
use std::io::Write;

use camino::{Utf8Path, Utf8PathBuf};
use clap::{Parser, Subcommand, ValueEnum};
use color_eyre::eyre::{WrapErr, eyre};
use pm_core::{Config, ModelCatalog, RelationMatch, RelationshipEdge};
use pm_diagram::{DocumentSplicer, RenderOptions, infer_relationships, render_class_diagram};
use pm_py_parser::ModelMatcher;
use pm_scanner::{ScanResult, ScanStats, Scanner};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Renders Pydantic models as a Mermaid class diagram.
///
/// Reads Python sources without importing them, finds classes that directly
/// extend `BaseModel`, and draws their fields and containment relationships.
#[derive(Parser)]
#[command(name = "pydantic-mermaid", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// JSON configuration file.
    ///
    /// Keys that are absent keep their defaults.
    #[arg(short, long, global = true, env = "PM_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Directory containing the model sources.
    ///
    /// Defaults to `src/data_archive` if not specified.
    #[arg(short, long, global = true, env = "PM_SRC")]
    src: Option<Utf8PathBuf>,

    /// How field types are matched against model names.
    #[arg(long, global = true, value_enum, env = "PM_RELATION_MATCH")]
    relation_match: Option<RelationMode>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Write the diagram to a standalone Mermaid file.
    Generate {
        /// Output file (defaults to `data_archive_models.mmd`).
        #[arg(short, long, env = "PM_OUTPUT")]
        output: Option<Utf8PathBuf>,
    },

    /// Replace the diagram section of a Markdown document.
    UpdateReadme {
        /// Document to update (defaults to `README.md`).
        #[arg(short, long, env = "PM_README")]
        readme: Option<Utf8PathBuf>,
    },

    /// Print the extracted catalog.
    Report {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

/// Report output format.
#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// Catalog, edges, and statistics as JSON.
    Json,
    /// The Mermaid diagram.
    Mermaid,
}

/// Relationship matching mode.
#[derive(Clone, Copy, ValueEnum)]
enum RelationMode {
    /// Any occurrence of the model name in the type.
    Substring,
    /// Occurrences bounded by non-identifier characters.
    Identifier,
}

impl From<RelationMode> for RelationMatch {
    fn from(mode: RelationMode) -> Self {
        match mode {
            RelationMode::Substring => Self::Substring,
            RelationMode::Identifier => Self::Identifier,
        }
    }
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(level)
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the optional config file and CLI overrides.
///
/// # Errors
///
/// Returns an error if the config file cannot be loaded or the merged
/// configuration is invalid.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::from_json_file(path)
            .wrap_err_with(|| format!("Failed to load configuration from {path}"))?,
        None => Config::default(),
    };

    if let Some(src) = &cli.src {
        config.scan.source_dir.clone_from(src);
    }
    if let Some(mode) = cli.relation_match {
        config.render.relation_match = mode.into();
    }

    config.validate()?;
    Ok(config)
}

/// Scans the configured source directory.
///
/// A missing source directory is fatal here, before any output is written.
///
/// # Errors
///
/// Returns an error if the source directory is missing or cannot be walked.
fn scan(config: &Config) -> color_eyre::Result<ScanResult> {
    let matcher = ModelMatcher::from_extract_config(&config.extract);
    let scanner = Scanner::with_matcher(config.scan.clone(), matcher)
        .map_err(|e| eyre!("Cannot scan {}: {e}", config.scan.source_dir))?;

    let result = scanner.scan()?;
    info!(
        files = result.stats.files,
        models = result.catalog.len(),
        "Found models"
    );
    report_errors(&result)?;
    Ok(result)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Writes the diagram to a standalone file, overwriting it.
///
/// # Errors
///
/// Returns an error if scanning or writing fails.
fn run_generate(config: &Config, output: Option<Utf8PathBuf>) -> color_eyre::Result<()> {
    let output = output.unwrap_or_else(|| config.render.output_path.clone());
    info!(src = %config.scan.source_dir, output = %output, "Generating diagram");

    let result = scan(config)?;
    let diagram = render_class_diagram(&result.catalog, &RenderOptions::from(&config.render));

    write_output(&output, &diagram)?;
    info!(path = %output, "Diagram written");
    Ok(())
}

/// Splices the diagram into the documentation file.
///
/// # Errors
///
/// Returns an error if scanning fails or the document is missing or
/// cannot be written.
fn run_update_readme(config: &Config, readme: Option<Utf8PathBuf>) -> color_eyre::Result<()> {
    let readme = readme.unwrap_or_else(|| config.readme.path.clone());
    info!(src = %config.scan.source_dir, readme = %readme, "Updating document");

    let result = scan(config)?;
    let diagram = render_class_diagram(&result.catalog, &RenderOptions::from(&config.render));

    let splicer = DocumentSplicer::from_config(&config.readme);
    let outcome = splicer.update_document(&readme, &diagram)?;
    info!(path = %readme, outcome = ?outcome, "Document processed");
    Ok(())
}

/// Generates a report in the requested format.
///
/// # Errors
///
/// Returns an error if scanning, serialization, or writing fails.
fn run_report(
    config: &Config,
    format: ReportFormat,
    output: Option<Utf8PathBuf>,
) -> color_eyre::Result<()> {
    info!(src = %config.scan.source_dir, "Generating report");

    let result = scan(config)?;
    let options = RenderOptions::from(&config.render);

    let content = match format {
        ReportFormat::Json => generate_json_report(&result, &options)?,
        ReportFormat::Mermaid => render_class_diagram(&result.catalog, &options),
    };

    if let Some(output_path) = output {
        write_output(&output_path, &content)?;
        info!(path = %output_path, "Report written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{content}")?;
    }

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Writes `content` to `path` in a single call.
fn write_output(path: &Utf8Path, content: &str) -> color_eyre::Result<()> {
    fs::write(path, content).wrap_err_with(|| format!("Failed to write {path}"))
}

/// Lists files that contributed no models because of an error.
fn report_errors(result: &ScanResult) -> color_eyre::Result<()> {
    if result.errors.is_empty() {
        return Ok(());
    }

    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    writeln!(handle, "Skipped files ({}):", result.errors.len())?;
    for (path, error) in &result.errors {
        writeln!(handle, "  {path} - {error}")?;
    }
    Ok(())
}

/// Generates a JSON report.
fn generate_json_report(result: &ScanResult, options: &RenderOptions) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct FileError {
        path: String,
        error: String,
    }

    #[derive(serde::Serialize)]
    struct Report<'a> {
        stats: &'a ScanStats,
        models: &'a ModelCatalog,
        relationships: Vec<RelationshipEdge>,
        errors: Vec<FileError>,
    }

    let report = Report {
        stats: &result.stats,
        models: &result.catalog,
        relationships: infer_relationships(&result.catalog, options.relation_match),
        errors: result
            .errors
            .iter()
            .map(|(path, error)| FileError {
                path: path.to_string(),
                error: error.to_string(),
            })
            .collect(),
    };

    serde_json::to_string_pretty(&report)
        .map_err(|e| eyre!("Failed to serialize JSON: {}", e))
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Merge configuration
    let config = build_config(&cli)?;

    // 5. Route to appropriate command
    match &cli.command {
        Commands::Generate { output } => run_generate(&config, output.clone()),
        Commands::UpdateReadme { readme } => run_update_readme(&config, readme.clone()),
        Commands::Report { format, output } => run_report(&config, *format, output.clone()),
    }
}
