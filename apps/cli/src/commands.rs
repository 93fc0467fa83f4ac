//! CLI command definitions, routing, and tracing setup.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, eyre};
use cratemaker_core::SystemClock;
use cratemaker_core::linker::{LinkConfig, LinkResult, ProgressReporter, link_notebooks};
use cratemaker_core::metadata::extract_to_file;
use cratemaker_core::project::{ProjectCrateOptions, create_project_crate};
use cratemaker_shared::{AppConfig, init_config, load_config};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

// ---------------------------------------------------------------------------
// CLI structure
// ---------------------------------------------------------------------------

/// cratemaker: RO-Crate metadata for project templates and notebooks.
#[derive(Parser)]
#[command(
    name = "cratemaker",
    version,
    about = "Generate and embed RO-Crate metadata for project templates and Jupyter notebooks.",
    long_about = None,
)]
pub(crate) struct Cli {
    /// Log format: text (default) or json.
    #[arg(long, default_value = "text", global = true)]
    pub log_format: LogFormat,

    /// Verbosity level (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

/// Log output format.
#[derive(Clone, Debug, clap::ValueEnum)]
pub(crate) enum LogFormat {
    Text,
    Json,
}

/// Top-level CLI subcommands.
#[derive(Subcommand)]
pub(crate) enum Command {
    /// Extract project metadata from a template config into metadata.json.
    Extract {
        /// Template config file (defaults to cookiecutter.json).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Output file (defaults to metadata.json).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Write a project-level ro-crate-metadata.json from a template config.
    Create {
        /// Template config file (defaults to cookiecutter.json).
        #[arg(short, long)]
        input: Option<PathBuf>,

        /// Directory that receives ro-crate-metadata.json.
        #[arg(short = 'd', long, default_value = ".")]
        out_dir: PathBuf,

        /// Repository identifier, e.g. owner/name.
        #[arg(short, long, env = "GITHUB_REPOSITORY")]
        repository: Option<String>,
    },

    /// Embed a crate in every notebook of a directory and link them into a
    /// parent crate.
    Link {
        /// The directory to act on.
        directory: PathBuf,

        /// A metadata.json file with default author information.
        #[arg(short, long)]
        metadata: Option<PathBuf>,
    },

    /// Configuration management.
    Config {
        /// Config subcommand.
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config subcommands.
#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Initialize config file with defaults.
    Init,
    /// Show resolved configuration.
    Show,
}

// ---------------------------------------------------------------------------
// Tracing setup
// ---------------------------------------------------------------------------

/// Initialize tracing based on CLI flags.
pub(crate) fn init_tracing(cli: &Cli) {
    use tracing_subscriber::{EnvFilter, fmt};

    let filter = match cli.verbose {
        0 => "cratemaker=info",
        1 => "cratemaker=debug",
        _ => "cratemaker=trace",
    };

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    match cli.log_format {
        LogFormat::Text => {
            fmt()
                .with_env_filter(env_filter)
                .with_target(false)
                .with_writer(std::io::stderr)
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
// Command dispatch
// ---------------------------------------------------------------------------

/// Run the CLI command.
pub(crate) fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Extract { input, output } => cmd_extract(input, output),
        Command::Create {
            input,
            out_dir,
            repository,
        } => cmd_create(input, &out_dir, repository.as_deref()),
        Command::Link {
            directory,
            metadata,
        } => cmd_link(directory, metadata),
        Command::Config { action } => match action {
            ConfigAction::Init => cmd_config_init(),
            ConfigAction::Show => cmd_config_show(),
        },
    }
}

// ---------------------------------------------------------------------------
// Command handlers
// ---------------------------------------------------------------------------

fn cmd_extract(input: Option<PathBuf>, output: Option<PathBuf>) -> Result<()> {
    let config = load_config()?;
    let input = input.unwrap_or_else(|| PathBuf::from(&config.defaults.input_file));
    let output = output.unwrap_or_else(|| PathBuf::from(&config.defaults.metadata_file));

    info!(input = %input.display(), output = %output.display(), "extracting metadata");
    let metadata = extract_to_file(&input, &output)?;

    println!("Wrote {} field(s) to {}", metadata.len(), output.display());
    Ok(())
}

fn cmd_create(input: Option<PathBuf>, out_dir: &Path, repository: Option<&str>) -> Result<()> {
    let config = load_config()?;
    let input = input.unwrap_or_else(|| PathBuf::from(&config.defaults.input_file));

    let options = project_options(&config, repository)?;

    info!(
        input = %input.display(),
        out_dir = %out_dir.display(),
        repository = repository.unwrap_or("-"),
        "creating project crate"
    );
    let path = create_project_crate(&input, out_dir, &options, &SystemClock)?;

    println!("Crate written to {}", path.display());
    Ok(())
}

/// A blank repository identifier counts as no repository.
fn project_options(config: &AppConfig, repository: Option<&str>) -> Result<ProjectCrateOptions> {
    let repository_url = repository
        .filter(|repo| !repo.trim().is_empty())
        .map(|repo| config.repository.repository_url(repo))
        .transpose()?;

    Ok(ProjectCrateOptions {
        repository_url,
        version: config.defaults.crate_version.clone(),
    })
}

fn cmd_link(directory: PathBuf, metadata: Option<PathBuf>) -> Result<()> {
    if !directory.is_dir() {
        return Err(eyre!("'{}' is not a directory", directory.display()));
    }

    let config = load_config()?;
    let link_config = LinkConfig {
        dir: directory,
        metadata_file: metadata,
        metadata_key: config.notebooks.metadata_key.clone(),
    };

    info!(
        dir = %link_config.dir.display(),
        key = %link_config.metadata_key,
        "linking notebook crates"
    );

    let reporter = CliProgress::new();
    let result = link_notebooks(&link_config, &SystemClock, &reporter)?;

    println!();
    println!("  Notebooks: {}", result.notebooks.len());
    println!("  Entities:  {}", result.entity_count);
    println!("  Crate:     {}", result.crate_path.display());
    println!("  Time:      {:.1}s", result.elapsed.as_secs_f64());
    println!();

    Ok(())
}

fn cmd_config_init() -> Result<()> {
    let path = init_config()?;
    println!("Config initialized at: {}", path.display());
    Ok(())
}

fn cmd_config_show() -> Result<()> {
    let config: AppConfig = load_config()?;
    let toml_str = toml::to_string_pretty(&config)?;
    println!("{toml_str}");
    Ok(())
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
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        Self { spinner }
    }
}

impl ProgressReporter for CliProgress {
    fn notebook(&self, path: &Path, current: usize, total: usize) {
        self.spinner.set_message(format!("Embedding [{current}/{total}] {}", path.display()));
    }

    fn done(&self, _result: &LinkResult) {
        self.spinner.finish_and_clear();
    }
}
