pub mod io;
pub mod rng;

/// Name used as the prefix of diagnostics: `feol` reports as `eol`.
#[inline]
pub fn tool_name(binary_name: &str) -> &str {
    binary_name.strip_prefix('f').unwrap_or(binary_name)
}

/// Let a closed stdout pipe end the process quietly, as the C tools do.
#[inline]
pub fn reset_sigpipe() {
    #[cfg(unix)]
    unsafe {
        libc::signal(libc::SIGPIPE, libc::SIG_DFL);
    }
}

/// The strerror text of an io error, without the `(os error N)` tail.
pub fn io_error_msg(e: &std::io::Error) -> String {
    let msg = e.to_string();
    match e.raw_os_error() {
        Some(raw) => {
            let tail = format!(" (os error {raw})");
            msg.strip_suffix(tail.as_str()).unwrap_or(&msg).to_string()
        }
        None => msg,
    }
}
