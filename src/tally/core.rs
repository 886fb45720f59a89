use std::io::Read;
use std::path::Path;

use tracing::debug;

use super::aggregate::Aggregator;
use super::partition::{Partitioner, RemainderPolicy, check_chunk_count};
use super::scan::{LineRule, Tally, scan};
use crate::common::io::open_source;
use crate::error::Result;

/// Knobs for a counting run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScanOptions {
    pub line_rule: LineRule,
    pub remainder: RemainderPolicy,
}

/// Count a sequential byte source of `file_size` bytes split into
/// `num_chunks` chunks.
///
/// Chunks are read one after the other from `reader`; each one is handed to
/// its own rayon task as soon as it is materialized, so scanning overlaps
/// with reading the rest of the source. Tallies come back through an
/// unbounded channel, so workers never block on send, and are summed in
/// completion order. At most `MAX_CHUNKS` chunks are accepted.
///
/// A read failure aborts the run before collection starts; tasks already in
/// flight finish and their results are discarded. Must not be called from
/// inside a rayon worker: the collecting thread blocks.
pub fn count_reader<R: Read>(
    reader: R,
    file_size: u64,
    num_chunks: usize,
    options: &ScanOptions,
) -> Result<Tally> {
    let partitioner = Partitioner::new(reader, file_size, num_chunks, options.remainder)?;
    let (tx, rx) = crossbeam_channel::unbounded::<Tally>();
    let rule = options.line_rule;

    for chunk in partitioner {
        let chunk = chunk?;
        debug!(
            index = chunk.index,
            offset = chunk.offset,
            len = chunk.data.len(),
            "dispatching chunk"
        );
        let tx = tx.clone();
        rayon::spawn(move || {
            let tally = scan(&chunk.data, rule);
            // Only fails when the run already aborted and dropped the receiver.
            let _ = tx.send(tally);
        });
    }
    drop(tx);

    let total = Aggregator::new(num_chunks).collect(&rx)?;
    debug!(?total, num_chunks, "all chunks reported");
    Ok(total)
}

/// Count an in-memory buffer as if it were a file of `data.len()` bytes.
pub fn count_bytes(data: &[u8], num_chunks: usize, options: &ScanOptions) -> Result<Tally> {
    count_reader(data, data.len() as u64, num_chunks, options)
}

/// Open `path`, size it, and count it in `num_chunks` chunks.
/// The chunk count is checked before the file is touched.
pub fn count_file(path: &Path, num_chunks: usize, options: &ScanOptions) -> Result<Tally> {
    check_chunk_count(num_chunks)?;
    let (file, file_size) = open_source(path)?;
    debug!(path = %path.display(), file_size, num_chunks, "opened source");
    count_reader(file, file_size, num_chunks, options)
}
