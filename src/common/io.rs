use std::fs::{self, File};
use std::io::{self, Read};
use std::path::Path;

#[cfg(target_os = "linux")]
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{Error, Result};

/// Track whether O_NOATIME is supported to avoid repeated failed open() attempts.
/// After the first EPERM, we never try O_NOATIME again.
#[cfg(target_os = "linux")]
static NOATIME_SUPPORTED: AtomicBool = AtomicBool::new(true);

/// Open a file with O_NOATIME on Linux to avoid atime inode writes.
#[cfg(target_os = "linux")]
fn open_noatime(path: &Path) -> io::Result<File> {
    use std::os::unix::fs::OpenOptionsExt;
    if NOATIME_SUPPORTED.load(Ordering::Relaxed) {
        match fs::OpenOptions::new()
            .read(true)
            .custom_flags(libc::O_NOATIME)
            .open(path)
        {
            Ok(f) => return Ok(f),
            Err(ref e) if e.raw_os_error() == Some(libc::EPERM) => {
                // O_NOATIME requires file ownership or CAP_FOWNER
                NOATIME_SUPPORTED.store(false, Ordering::Relaxed);
            }
            Err(e) => return Err(e),
        }
    }
    File::open(path)
}

#[cfg(not(target_os = "linux"))]
fn open_noatime(path: &Path) -> io::Result<File> {
    File::open(path)
}

/// Open the byte source and report its total length.
/// Uses fstat on the already-open fd so the size matches the file we read.
/// Any failure here is `SourceUnavailable`: nothing has been dispatched yet.
pub fn open_source(path: &Path) -> Result<(File, u64)> {
    let unavailable = |source: io::Error| Error::SourceUnavailable {
        path: path.to_path_buf(),
        source,
    };
    let file = open_noatime(path).map_err(unavailable)?;
    let metadata = file.metadata().map_err(unavailable)?;
    if metadata.is_dir() {
        return Err(unavailable(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Is a directory",
        )));
    }
    Ok((file, metadata.len()))
}

/// Read as many bytes as possible into buf, retrying on partial reads.
/// Returns fewer than `buf.len()` bytes only at end of stream.
/// Fast path: regular file reads usually return the full buffer on the first call.
#[inline]
pub fn read_full(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut total = 0;
    while total < buf.len() {
        match reader.read(&mut buf[total..]) {
            Ok(0) => break,
            Ok(n) => total += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(total)
}
