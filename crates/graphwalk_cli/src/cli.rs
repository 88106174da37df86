use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use graphwalk::search::Algorithm;

#[derive(Parser, Debug)]
#[command(name = "graphwalk", version)]
#[command(about = "Step through graph searches on a map of cities.")]
pub struct CommandLine {
    /// Graph to load (.json document or .gwi image); defaults to the built-in US map
    #[arg(long, global = true)]
    pub graph: Option<PathBuf>,

    /// Config file; defaults to graphwalk/graphwalk.json in the user config directory
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// More logging: -v for debug, -vv for trace
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List cities with their coordinates and number of connections
    #[command(alias = "c")]
    Cities,
    /// Search for a route between two cities
    #[command(alias = "s")]
    Search {
        from: String,
        to: String,
        /// bfs, dfs or dijkstra; defaults to the config file's choice
        #[arg(short, long)]
        algorithm: Option<Algorithm>,
        /// Print every half-step of the search
        #[arg(long)]
        trace: bool,
        /// Print the result as JSON
        #[arg(long, conflicts_with = "trace")]
        json: bool,
    },
    /// Run every algorithm between two cities and compare them
    Compare { from: String, to: String },
    /// Write the loaded graph to a file
    Export {
        path: PathBuf,
        /// Output format; guessed from the extension when omitted
        #[arg(long, value_enum)]
        format: Option<Format>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    /// JSON graph document
    Json,
    /// Compressed binary graph image
    Image,
}

impl Format {
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "json" => Some(Format::Json),
            "gwi" => Some(Format::Image),
            _ => None,
        }
    }
}

impl CommandLine {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn command_line_is_well_formed() {
        CommandLine::command().debug_assert();
    }

    #[test]
    fn parses_search_with_global_flags() {
        let cli = CommandLine::try_parse_from([
            "graphwalk",
            "search",
            "Miami, FL",
            "Seattle, WA",
            "-a",
            "bfs",
            "--trace",
            "-vv",
            "--graph",
            "map.json",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.graph.as_deref(), Some(Path::new("map.json")));
        match cli.command {
            Commands::Search {
                from,
                to,
                algorithm,
                trace,
                json,
            } => {
                assert_eq!(from, "Miami, FL");
                assert_eq!(to, "Seattle, WA");
                assert_eq!(algorithm, Some(Algorithm::BreadthFirst));
                assert!(trace);
                assert!(!json);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn trace_and_json_cannot_be_combined() {
        let err = CommandLine::try_parse_from(["graphwalk", "search", "a", "b", "--trace", "--json"])
            .unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ArgumentConflict);
        assert!(CommandLine::try_parse_from(["graphwalk", "search", "a", "b", "--json"]).is_ok());
    }

    #[test]
    fn rejects_unknown_algorithm() {
        let res = CommandLine::try_parse_from(["graphwalk", "search", "a", "b", "-a", "astar"]);
        assert!(res.is_err());
    }

    #[test]
    fn format_follows_extension() {
        assert_eq!(Format::from_path(Path::new("a.json")), Some(Format::Json));
        assert_eq!(Format::from_path(Path::new("a.GWI")), Some(Format::Image));
        assert_eq!(Format::from_path(Path::new("a.txt")), None);
        assert_eq!(Format::from_path(Path::new("noext")), None);
    }
}
