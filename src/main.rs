use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use clap_mangen::Man;
use std::io;
use std::path::PathBuf;
use tracing::{debug, error, info};

use mixin::cli::inspect;
use mixin::config::{Config, OutputFormat, DEFAULT_TIME_FORMAT, SUPPORTED_TIME_FORMATS};
use mixin::symbols::*;

#[derive(Parser)]
#[command(name = "mixin")]
#[command(about = "Inspect composite objects built from member documents")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Args {
    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose logging (overrides config file)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Generate shell completions for the specified shell
    #[arg(long, value_enum)]
    completions: Option<Shell>,

    /// Generate man page
    #[arg(long)]
    man: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Parser)]
enum Commands {
    /// Build a mixin from a member document and print its structured export
    Export {
        /// TOML member document
        document: PathBuf,

        /// Output format (overrides config file)
        #[arg(short, long, value_enum)]
        format: Option<OutputFormat>,

        /// Registered types to reify after the document's own list (comma-separated)
        #[arg(short, long, value_delimiter = ',')]
        reify: Vec<String>,
    },
    /// List every member name the mixin resolves, one per line
    Names {
        /// TOML member document
        document: PathBuf,
    },
    /// List registered backing types and their properties
    Types,
    /// Print the JSON schema of the configuration file
    Schema,
}

fn create_subscriber(
    verbose: bool,
    time_format: &str,
) -> Result<Box<dyn tracing::Subscriber + Send + Sync>> {
    let level = if verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };

    // Only the static layouts are accepted so the parsed description can live in the timer
    let format = SUPPORTED_TIME_FORMATS
        .iter()
        .copied()
        .find(|supported| *supported == time_format)
        .unwrap_or(DEFAULT_TIME_FORMAT);
    let format_desc =
        time::format_description::parse(format).context("Failed to parse log time format")?;

    Ok(Box::new(
        tracing_subscriber::fmt()
            .with_max_level(level)
            .with_writer(io::stderr)
            .with_timer(tracing_subscriber::fmt::time::LocalTime::new(format_desc))
            .finish(),
    ))
}

fn run_command(command: Commands, config: &Config) -> Result<String> {
    match command {
        Commands::Export {
            document,
            format,
            reify,
        } => {
            debug!("Exporting {}", document.display());
            inspect::render_export(&document, format, &reify, config)
        }
        Commands::Names { document } => inspect::render_names(&document, config),
        Commands::Types => inspect::render_types(),
        Commands::Schema => inspect::render_schema(),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Handle --completions flag early
    if let Some(shell) = args.completions {
        let mut app = Args::command();
        generate(shell, &mut app, "mixin", &mut io::stdout());
        return Ok(());
    }

    // Handle --man flag early
    if args.man {
        let app = Args::command();
        let man = Man::new(app);
        man.render(&mut io::stdout())?;
        return Ok(());
    }

    // Load configuration
    let config = if let Some(config_path) = &args.config {
        Config::load_from_file(config_path)?
    } else {
        Config::load()?
    };

    // Determine verbose setting
    let verbose = args.verbose || config.is_verbose_default();

    // Initialize logging
    let subscriber = create_subscriber(verbose, &config.get_time_format())?;
    tracing::subscriber::set_global_default(subscriber)
        .context("Failed to set default subscriber")?;

    if let Some(config_path) = &args.config {
        info!(
            "{SYMBOL_INDICATOR_INFO} Using custom config file: {}",
            config_path.display()
        );
    }

    let Some(command) = args.command else {
        Args::command().print_help()?;
        return Ok(());
    };

    match run_command(command, &config) {
        Ok(output) => {
            if output.ends_with('\n') {
                print!("{output}");
            } else {
                println!("{output}");
            }
            Ok(())
        }
        Err(e) => {
            error!("{SYMBOL_INDICATOR_ERROR} {e:#}");
            std::process::exit(1);
        }
    }
}
