//! User configuration (`graphwalk.json`).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use graphwalk::search::Algorithm;
use serde::{Deserialize, Serialize};
use tracing::level_filters::LevelFilter;

use crate::error::CliError;

pub const CONFIG_FILE: &str = "graphwalk.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Graph loaded when `--graph` is not given.
    pub graph: Option<PathBuf>,
    /// Algorithm used when `search` gets no `--algorithm`.
    pub algorithm: Algorithm,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            graph: None,
            algorithm: Algorithm::ShortestPath,
            log_level: "info".to_string(),
        }
    }
}

/// `<config dir>/graphwalk/graphwalk.json`, if the platform has a config dir.
pub fn default_config_file() -> Option<PathBuf> {
    dirs::config_dir().map(|base| base.join("graphwalk").join(CONFIG_FILE))
}

impl Config {
    /// Reads `path`. A missing file yields the defaults; anything unreadable
    /// or malformed is an error.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(CliError::File {
                    path: path.to_owned(),
                    source,
                })
            }
        };
        serde_json::from_str(&text).map_err(|source| CliError::Config {
            path: path.to_owned(),
            source,
        })
    }

    /// `--config` when given, otherwise the platform default.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, CliError> {
        match explicit {
            Some(path) => Self::load(path),
            None => match default_config_file() {
                Some(path) => Self::load(&path),
                None => Ok(Self::default()),
            },
        }
    }

    /// Log level after applying `-v` flags on top of the configured level.
    pub fn level(&self, verbose: u8) -> Result<LevelFilter, CliError> {
        match verbose {
            0 => self
                .log_level
                .parse::<LevelFilter>()
                .map_err(|_| CliError::LogLevel(self.log_level.clone())),
            1 => Ok(LevelFilter::DEBUG),
            _ => Ok(LevelFilter::TRACE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn missing_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(&dir.path().join(CONFIG_FILE)).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.level(0).unwrap(), LevelFilter::INFO);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "algorithm": "bfs", "log_level": "warn" }}"#).unwrap();

        let cfg = Config::load(file.path()).unwrap();
        assert_eq!(cfg.algorithm, Algorithm::BreadthFirst);
        assert_eq!(cfg.graph, None);
        assert_eq!(cfg.level(0).unwrap(), LevelFilter::WARN);
        assert_eq!(cfg.level(1).unwrap(), LevelFilter::DEBUG);
        assert_eq!(cfg.level(3).unwrap(), LevelFilter::TRACE);
    }

    #[test]
    fn malformed_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ algorithm = bfs").unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(CliError::Config { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "algorithm": "astar" }}"#).unwrap();
        assert!(matches!(
            Config::load(file.path()),
            Err(CliError::Config { .. })
        ));
    }

    #[test]
    fn bad_log_level_is_reported() {
        let cfg = Config {
            log_level: "loud".to_string(),
            ..Config::default()
        };
        assert!(matches!(cfg.level(0), Err(CliError::LogLevel(l)) if l == "loud"));
    }
}
