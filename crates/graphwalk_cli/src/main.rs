//! `graphwalk`: run and trace graph searches from the terminal.
//!
//! Examples:
//!   graphwalk cities
//!   graphwalk search "Miami, FL" "Seattle, WA" --algorithm bfs --trace
//!   graphwalk compare "Boston, MA" "Los Angeles, CA"
//!   graphwalk export map.gwi
//!   graphwalk --graph map.json search a b --json

mod cli;
mod commands;
mod config;
mod error;

use std::io::{self, Write};
use std::process;

use tracing::error;

use cli::{CommandLine, Commands};
use config::Config;
use error::CliError;

fn main() {
    let args = CommandLine::parse_args();

    // Logging depends on the config, so config errors are printed directly.
    let cfg = match Config::resolve(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("graphwalk: {e}");
            process::exit(2);
        }
    };
    let level = match cfg.level(args.verbose) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("graphwalk: {e}");
            process::exit(2);
        }
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(io::stderr)
        .init();

    if let Err(e) = run(args, &cfg) {
        error!("{e}");
        process::exit(1);
    }
}

fn run(args: CommandLine, cfg: &Config) -> Result<(), CliError> {
    let graph_path = args.graph.as_deref().or(cfg.graph.as_deref());
    let graph = commands::load_graph(graph_path)?;

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match args.command {
        Commands::Cities => commands::cities(&graph, &mut out)?,
        Commands::Search {
            from,
            to,
            algorithm,
            trace,
            json,
        } => commands::search(
            &graph,
            algorithm.unwrap_or(cfg.algorithm),
            &from,
            &to,
            trace,
            json,
            &mut out,
        )?,
        Commands::Compare { from, to } => commands::compare(&graph, &from, &to, &mut out)?,
        Commands::Export { path, format } => commands::export(&graph, &path, format, &mut out)?,
    }

    out.flush()?;
    Ok(())
}
