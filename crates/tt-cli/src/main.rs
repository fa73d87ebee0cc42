//! TabTally CLI
//!
//! CLI tool for converting filter lists and exercising the background core
//! outside the browser.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use tt_core::{Capability, Config};

mod replay;

#[derive(Parser)]
#[command(name = "tt-cli")]
#[command(about = "TabTally filter list converter and tools")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert an EasyList-style filter list into a declarative ruleset
    Convert {
        /// Input filter list file
        #[arg(short, long)]
        input: PathBuf,

        /// Output ruleset file
        #[arg(short, long, default_value = "rules.json")]
        output: PathBuf,
    },

    /// Check URLs against the ad heuristic
    Classify {
        /// URLs to classify
        #[arg(short, long, required = true)]
        url: Vec<String>,

        /// Config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Replay a JSON trace of host events through the background
    Replay {
        /// Trace file: a JSON array of host events
        #[arg(short, long)]
        trace: PathBuf,

        /// Config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Override the configured capability (cancel | declarative)
        #[arg(long)]
        capability: Option<Capability>,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level)).init();

    let result = match cli.command {
        Commands::Convert { input, output } => cmd_convert(&input, &output),
        Commands::Classify { url, config } => cmd_classify(&url, config.as_deref()),
        Commands::Replay {
            trace,
            config,
            capability,
        } => load_config(config.as_deref()).and_then(|mut config| {
            if let Some(capability) = capability {
                config.capability = capability;
            }
            replay::run_replay(&trace, &config)
        }),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

fn load_config(path: Option<&Path>) -> Result<Config, String> {
    match path {
        Some(path) => Config::load(path).map_err(|e| e.to_string()),
        None => Ok(Config::default()),
    }
}

fn cmd_convert(input: &Path, output: &Path) -> Result<(), String> {
    let stats = tt_rules::convert_file(input, output).map_err(|e| e.to_string())?;

    println!("Converted {} rules to {}", stats.rules, output.display());
    println!("  Lines:    {}", stats.lines);
    println!("  Skipped:  {}", stats.skipped);

    Ok(())
}

fn cmd_classify(urls: &[String], config: Option<&Path>) -> Result<(), String> {
    let heuristic = load_config(config)?.heuristic();

    for url in urls {
        match heuristic.matching_pattern(url) {
            Some(pattern) => println!("block  {}  (matched '{}')", url, pattern),
            None => println!("allow  {}", url),
        }
    }

    Ok(())
}
