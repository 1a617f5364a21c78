use std::path::{Path, PathBuf};
use std::process;

use clap::{Parser, Subcommand};
use serde::Serialize;
use shatter_campaign::{CampaignLoader, FileSystemProvider, LoadReport, LoaderConfig};
use shatter_core::{ConsoleSource, FileSource, Term};
use tracing_subscriber::EnvFilter;

/// Config file picked up from the working directory when `--config` is absent.
const DEFAULT_CONFIG: &str = "shatter.toml";

/// Starshatter definition-file toolkit.
#[derive(Parser)]
#[command(name = "shatter", version, about = "Starshatter definition-file toolkit")]
struct Cli {
    /// Log filter (e.g. `warn`, `shatter_campaign=debug`); overrides RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Print single-line JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a definition file and print its terms as JSON
    Parse {
        /// Path to the .def file
        file: PathBuf,
    },

    /// Read terms from standard input and echo each as JSON
    Repl,

    /// Load one campaign directory and print the campaign as JSON
    Campaign {
        /// Campaign directory (holding campaign.def)
        dir: PathBuf,
        /// Loader configuration (TOML)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Load every configured campaign
    Load {
        /// Loader configuration (TOML); defaults to ./shatter.toml if present
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    match cli.command {
        Commands::Parse { file } => cmd_parse(&file, cli.compact),
        Commands::Repl => cmd_repl(cli.compact),
        Commands::Campaign { dir, config } => cmd_campaign(&dir, config.as_deref(), cli.compact),
        Commands::Load { config } => cmd_load(config.as_deref(), cli.compact),
    }
}

fn init_logging(level: Option<&str>) {
    let filter = match level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn fail(msg: impl std::fmt::Display) -> ! {
    eprintln!("error: {}", msg);
    process::exit(1);
}

fn to_json<T: Serialize>(value: &T, compact: bool) -> String {
    let text = if compact {
        serde_json::to_string(value)
    } else {
        serde_json::to_string_pretty(value)
    };
    text.unwrap_or_else(|e| format!("serialization error: {}", e))
}

fn cmd_parse(file: &Path, compact: bool) {
    if !file.is_file() {
        fail(format_args!("could not read '{}'", file.display()));
    }
    let mut parser = shatter_core::Parser::new(FileSource::new(file));
    let mut terms: Vec<Term> = Vec::new();
    let result = loop {
        match parser.parse_term() {
            Ok(Some(term)) => terms.push(term),
            Ok(None) => break Ok(()),
            Err(e) => break Err(e),
        }
    };
    println!("{}", to_json(&terms, compact));
    if let Err(e) = result {
        fail(e);
    }
}

fn cmd_repl(compact: bool) {
    let mut console = ConsoleSource::stdio();
    loop {
        // A parse error finishes a parser; start a fresh one on the same
        // console so the session continues with the next line.
        {
            let mut parser = shatter_core::Parser::new(&mut console);
            loop {
                match parser.parse_term() {
                    Ok(Some(term)) => println!("{}", to_json(&term, compact)),
                    Ok(None) => return,
                    Err(e) => {
                        eprintln!("error: {}", e);
                        break;
                    }
                }
            }
        }
        if console.is_closed() {
            return;
        }
    }
}

fn read_config(path: Option<&Path>) -> LoaderConfig {
    let result = match path {
        Some(path) => LoaderConfig::from_path(path),
        None if Path::new(DEFAULT_CONFIG).is_file() => {
            tracing::debug!("using config '{}'", DEFAULT_CONFIG);
            LoaderConfig::from_path(Path::new(DEFAULT_CONFIG))
        }
        None => Ok(LoaderConfig::default()),
    };
    result.unwrap_or_else(|e| fail(e))
}

fn print_issues(report: &LoadReport) {
    for issue in &report.issues {
        eprintln!("issue: {}", issue);
    }
}

fn cmd_campaign(dir: &Path, config: Option<&Path>, compact: bool) {
    if !dir.is_dir() {
        fail(format_args!("'{}' is not a directory", dir.display()));
    }
    let loader = CampaignLoader::new(FileSystemProvider, read_config(config));
    let report = loader.load_campaign(dir);
    print_issues(&report);
    println!("{}", to_json(&report.campaign, compact));
}

fn cmd_load(config: Option<&Path>, compact: bool) {
    let loader = CampaignLoader::new(FileSystemProvider, read_config(config));
    tracing::info!(
        "loading {} campaigns from '{}'",
        loader.config().campaigns.len(),
        loader.config().campaigns_dir.display()
    );
    let reports = loader.load_all();
    for report in &reports {
        print_issues(report);
    }
    let campaigns: Vec<_> = reports.iter().map(|r| &r.campaign).collect();
    println!("{}", to_json(&campaigns, compact));
}
