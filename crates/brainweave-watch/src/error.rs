use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("filesystem watcher error: {0}")]
    Notify(#[from] notify::Error),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("scheduler event channel closed")]
    ChannelClosed,
}

pub type Result<T> = std::result::Result<T, Error>;
