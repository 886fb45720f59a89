mod aggregate;
mod core;
mod partition;
mod scan;


pub use self::aggregate::{Aggregator, aggregate};
pub use self::core::{ScanOptions, count_bytes, count_file, count_reader};
pub use self::partition::{
    Chunk, ChunkSpan, MAX_CHUNKS, Partitioner, RemainderPolicy, parse_chunk_count, plan,
};
pub use self::scan::{LineRule, Tally, is_punctuation, is_vowel, scan};
