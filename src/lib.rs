/// Use mimalloc as the global allocator for all binaries.
/// Chunk buffers are large, short-lived and freed from worker threads,
/// which mimalloc's thread-local caching handles well.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

pub mod common;
pub mod error;
pub mod tally;

pub use error::{Error, Result};
