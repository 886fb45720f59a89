use std::fmt;
use std::io::Read;
use std::str::FromStr;

use crate::common::io::read_full;
use crate::error::{Error, Result};

/// What happens to the `file_size % num_chunks` bytes that do not fit into
/// `num_chunks` equal chunks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RemainderPolicy {
    /// Append the remainder to the final chunk so every byte is scanned.
    #[default]
    Last,
    /// Never read the remainder; it is excluded from all counts.
    Drop,
}

impl FromStr for RemainderPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "last" => Ok(RemainderPolicy::Last),
            "drop" => Ok(RemainderPolicy::Drop),
            _ => Err(format!(
                "invalid remainder policy '{}' (expected 'last' or 'drop')",
                s
            )),
        }
    }
}

impl fmt::Display for RemainderPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            RemainderPolicy::Last => "last",
            RemainderPolicy::Drop => "drop",
        })
    }
}

/// Byte range of one chunk within the source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpan {
    pub index: usize,
    pub offset: u64,
    pub len: u64,
}

impl ChunkSpan {
    #[inline]
    pub fn end(&self) -> u64 {
        self.offset + self.len
    }
}

/// A materialized chunk. The buffer is owned so it can move into a worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub index: usize,
    pub offset: u64,
    pub data: Vec<u8>,
}

/// Parse a user-supplied chunk count. Rejects anything that is not a
/// positive integer.
pub fn parse_chunk_count(s: &str) -> Result<usize> {
    let s = s.trim();
    let n: i64 = s
        .parse()
        .map_err(|_| Error::InvalidArgument(format!("invalid number of chunks: '{}'", s)))?;
    if n <= 0 {
        return Err(Error::InvalidArgument(format!(
            "number of chunks must be positive, got {}",
            n
        )));
    }
    let n = usize::try_from(n)
        .map_err(|_| Error::InvalidArgument(format!("number of chunks too large: {}", n)))?;
    check_chunk_count(n)?;
    Ok(n)
}

/// Largest accepted chunk count. Every chunk costs a task and a result
/// message, so counts beyond this are rejected instead of exhausting memory.
pub const MAX_CHUNKS: usize = 1 << 20;

#[inline]
pub(crate) fn check_chunk_count(num_chunks: usize) -> Result<()> {
    if num_chunks == 0 {
        return Err(Error::InvalidArgument(
            "number of chunks must be positive, got 0".to_string(),
        ));
    }
    if num_chunks > MAX_CHUNKS {
        return Err(Error::InvalidArgument(format!(
            "number of chunks must be at most {}, got {}",
            MAX_CHUNKS, num_chunks
        )));
    }
    Ok(())
}

/// Equal-division layout of a source; spans are computed on demand.
#[derive(Debug, Clone, Copy)]
struct Layout {
    num_chunks: usize,
    chunk_size: u64,
    remainder: u64,
    policy: RemainderPolicy,
}

impl Layout {
    fn new(file_size: u64, num_chunks: usize, policy: RemainderPolicy) -> Result<Self> {
        check_chunk_count(num_chunks)?;
        let n = num_chunks as u64;
        Ok(Layout {
            num_chunks,
            chunk_size: file_size / n,
            remainder: file_size % n,
            policy,
        })
    }

    fn span(&self, index: usize) -> ChunkSpan {
        let extra = match self.policy {
            RemainderPolicy::Last if index + 1 == self.num_chunks => self.remainder,
            _ => 0,
        };
        ChunkSpan {
            index,
            offset: index as u64 * self.chunk_size,
            len: self.chunk_size + extra,
        }
    }
}

/// Compute `num_chunks` contiguous spans of `file_size / num_chunks` bytes.
/// The leftover bytes go to the last span or are left out, per `policy`.
pub fn plan(
    file_size: u64,
    num_chunks: usize,
    policy: RemainderPolicy,
) -> Result<Vec<ChunkSpan>> {
    let layout = Layout::new(file_size, num_chunks, policy)?;
    Ok((0..num_chunks).map(|index| layout.span(index)).collect())
}

/// Cuts a sequential byte stream into chunks, in issuing order.
///
/// The partitioner owns the read cursor; chunks are copied out one after the
/// other, so reads never overlap. The first failed read ends the iteration.
pub struct Partitioner<R> {
    reader: R,
    layout: Layout,
    next_index: usize,
    position: u64,
    failed: bool,
}

impl<R: Read> Partitioner<R> {
    pub fn new(
        reader: R,
        file_size: u64,
        num_chunks: usize,
        policy: RemainderPolicy,
    ) -> Result<Self> {
        Ok(Partitioner {
            reader,
            layout: Layout::new(file_size, num_chunks, policy)?,
            next_index: 0,
            position: 0,
            failed: false,
        })
    }

    /// Chunks not yet issued.
    pub fn remaining(&self) -> usize {
        if self.failed {
            0
        } else {
            self.layout.num_chunks - self.next_index
        }
    }

    /// Bytes consumed from the reader so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    fn read_chunk(&mut self, span: ChunkSpan) -> Result<Chunk> {
        debug_assert_eq!(span.offset, self.position);
        let len = usize::try_from(span.len).map_err(|_| {
            Error::InvalidArgument(format!("chunk of {} bytes does not fit in memory", span.len))
        })?;
        let mut data = vec![0u8; len];
        let n = read_full(&mut self.reader, &mut data)?;
        if n != len {
            return Err(Error::ShortRead {
                index: span.index,
                expected: span.len,
                actual: n as u64,
            });
        }
        self.position = span.end();
        Ok(Chunk {
            index: span.index,
            offset: span.offset,
            data,
        })
    }
}

impl<R: Read> Iterator for Partitioner<R> {
    type Item = Result<Chunk>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        if self.next_index == self.layout.num_chunks {
            return None;
        }
        let span = self.layout.span(self.next_index);
        self.next_index += 1;
        let chunk = self.read_chunk(span);
        self.failed = chunk.is_err();
        Some(chunk)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, Some(self.remaining()))
    }
}
