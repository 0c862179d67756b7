//! verstore - command-line entry point.

use std::io::IsTerminal;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use verstore::store::{Repl, ReplConfig, Store, StoreConfig};

/// An in-memory versioned file store.
#[derive(Debug, Parser)]
#[command(name = "verstore", version, about)]
struct Cli {
    /// Run a command and exit (may be repeated)
    #[arg(short = 'e', long = "execute", value_name = "COMMAND")]
    execute: Vec<String>,

    /// Print results as JSON lines
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Do not print the banner
    #[arg(long)]
    no_banner: bool,

    /// Prompt shown before each command
    #[arg(long)]
    prompt: Option<String>,

    /// Leave RECENT_FILES unchanged on ROLLBACK
    #[arg(long)]
    rollback_keeps_recency: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = StoreConfig::new()
        .rollback_touches_recency(!cli.rollback_keeps_recency)
        .verbose(cli.verbose > 0);
    let store = Store::with_config(config);

    if !cli.execute.is_empty() {
        return execute_commands(&store, &cli.execute, cli.json);
    }

    let interactive = std::io::stdin().is_terminal();
    let repl_config = ReplConfig {
        prompt: match cli.prompt {
            Some(prompt) => prompt,
            None if interactive => ReplConfig::default().prompt,
            None => String::new(),
        },
        banner: interactive && !cli.no_banner,
        json: cli.json,
        ..Default::default()
    };

    let mut repl = Repl::with_config(store, repl_config);
    match repl.run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(verbose: u8) {
    let filter = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Run each `-e` command in order; the first failure ends the run.
fn execute_commands(store: &Store, commands: &[String], json: bool) -> ExitCode {
    for command in commands {
        match store.execute(command) {
            Ok(output) => {
                if json {
                    match serde_json::to_string(&output) {
                        Ok(line) => println!("{}", line),
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            return ExitCode::FAILURE;
                        }
                    }
                } else {
                    println!("{}", output);
                }
                if output.is_exit() {
                    break;
                }
            }
            Err(e) => {
                eprintln!("Error: {}", e);
                return ExitCode::FAILURE;
            }
        }
    }
    ExitCode::SUCCESS
}
