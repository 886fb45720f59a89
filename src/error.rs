use std::io;
use std::path::PathBuf;

/// Everything that can stop a counting run. All of them are fatal: the
/// pipeline never reports a partial total.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Chunk count was zero, negative or not a number.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// The byte source could not be opened or sized.
    #[error("{}: {}", .path.display(), crate::common::io_error_msg(.source))]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chunk read returned fewer bytes than its span requires.
    #[error("short read on chunk {index}: expected {expected} bytes, got {actual}")]
    ShortRead {
        index: usize,
        expected: u64,
        actual: u64,
    },

    #[error("read error: {}", crate::common::io_error_msg(.0))]
    Io(#[from] io::Error),

    /// The result channel closed before every chunk reported.
    #[error("only {received} of {expected} chunk results arrived")]
    Incomplete { expected: usize, received: usize },
}

pub type Result<T> = std::result::Result<T, Error>;
