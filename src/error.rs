use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Everything that can stop a cleaning run.
#[derive(Error, Debug)]
pub enum CleanerError {
    /// The query path does not name a directory.
    #[error("query {} is not a directory", .0.display())]
    InvalidInputDirectory(PathBuf),

    /// An input file could not be opened, decoded or tokenized.
    #[error("cannot read records from {}: {source}", path.display())]
    RecordFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The cleaned FASTA could not be created or written.
    #[error("cannot write {}: {source}", path.display())]
    OutputWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output directory {}: {source}", path.display())]
    OutputDirectory {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("a worker thread panicked while cleaning files")]
    WorkerPanicked,
}

pub type Result<T> = std::result::Result<T, CleanerError>;
