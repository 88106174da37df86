use std::io;
use std::path::PathBuf;

use graphwalk::graph::GraphError;
use graphwalk::storage::StorageError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Graph(#[from] GraphError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("{}: {source}", .path.display())]
    File {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("config {}: {source}", .path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("unknown log level {0:?} (expected error, warn, info, debug or trace)")]
    LogLevel(String),
    #[error("can't tell the format of {}; pass --format or use a .json/.gwi extension", .0.display())]
    UnknownFormat(PathBuf),
    #[error("json: {0}")]
    Json(#[from] serde_json::Error),
    #[error("output: {0}")]
    Output(#[from] io::Error),
}
