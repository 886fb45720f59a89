pub mod io;
pub mod logging;

/// Program name used as the prefix of every diagnostic line.
pub const TOOL_NAME: &str = "ftally";

/// Reset SIGPIPE to default behavior (SIG_DFL).
/// Rust sets SIGPIPE to SIG_IGN by default, so `ftally file 4 | head -1`
/// would otherwise report a broken pipe instead of exiting quietly.
/// This must be called at the start of main().
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// Format an IO error message without the "(os error N)" suffix.
/// Prints e.g. "No such file or directory" where Rust's Display impl
/// would add " (os error 2)".
pub fn io_error_msg(e: &std::io::Error) -> String {
    match e.raw_os_error() {
        Some(raw) => {
            let msg = std::io::Error::from_raw_os_error(raw).to_string();
            msg.replace(&format!(" (os error {})", raw), "")
        }
        None => e.to_string(),
    }
}
