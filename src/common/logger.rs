//! Structured logging with visual box-drawing output.
//!
//! Every lifecycle transition of the splash overlay is reported through these
//! macros so a terminal preview reads as one continuous block:
//!
//! ```text
//! ┏ lottie-splash v0.3.0 ━━╸
//! ┃
//! ┣ Showing splash overlay (cycle 1)
//! ┃   Animation: assets/splash.json (local, cached)
//! ┃   Frame: 216x384 at (432, 768)
//! ┣[DEBUG] lottieAnimationStart delivered to 2 subscribers
//! ╹
//! ```
//!
//! The logger can be disabled at runtime for quiet operation in tests, can
//! prefix every line with a wall-clock timestamp, and can be redirected to a
//! file through a background writer thread.

use std::io::Write;
use std::sync::OnceLock;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Sender, channel};

static LOGGING_ENABLED: AtomicBool = AtomicBool::new(true);

static TIMESTAMPS_ENABLED: AtomicBool = AtomicBool::new(false);

// Channel for routing output to a file when --log is active
static LOG_CHANNEL: OnceLock<Option<Sender<LogMessage>>> = OnceLock::new();

enum LogMessage {
    Formatted(String),
    Shutdown,
}

/// Main logging interface.
///
/// ## Logging Conventions
///
/// - **`log_block_start!`**: opens a new conceptual block (a show-cycle, a config
///   load). Prints an empty pipe `┃` then `┣ message`.
/// - **`log_decorated!`**: continuation line inside a block, `┣ message`.
/// - **`log_indented!`**: nested detail under the previous line, `┃   message`.
/// - **`log_pipe!`**: a single empty `┃` line for spacing before a semantic
///   message. Not for use at the end of a block.
/// - **`log_version!`** / **`log_end!`**: startup header and final marker.
/// - **`log_info!`, `log_warning!`, `log_error!`, `log_debug!`**:
///   semantic messages with a colored `[LEVEL]` tag.
pub struct Log;

impl Log {
    /// Enable or disable logging globally.
    pub fn set_enabled(enabled: bool) {
        LOGGING_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Check if logging is currently enabled.
    pub fn is_enabled() -> bool {
        LOGGING_ENABLED.load(Ordering::SeqCst)
    }

    /// Prefix every line with the local wall-clock time.
    pub fn set_timestamps(enabled: bool) {
        TIMESTAMPS_ENABLED.store(enabled, Ordering::SeqCst);
    }

    /// Start file logging to the specified path.
    ///
    /// Output is stripped of ANSI color codes and written by a dedicated
    /// thread. Logging returns to stdout once the returned guard is dropped.
    pub fn start_file_logging(file_path: String) -> anyhow::Result<LoggerGuard> {
        let (tx, rx) = channel();

        LOG_CHANNEL
            .set(Some(tx.clone()))
            .map_err(|_| anyhow::anyhow!("Logger channel already initialized"))?;

        let handle = std::thread::spawn(move || {
            let mut file = std::fs::File::create(&file_path)?;

            loop {
                match rx.recv() {
                    Ok(LogMessage::Formatted(text)) => {
                        file.write_all(text.as_bytes())?;
                    }
                    Ok(LogMessage::Shutdown) | Err(_) => {
                        file.flush()?;
                        break;
                    }
                }
            }

            Ok::<(), anyhow::Error>(())
        });

        Ok(LoggerGuard {
            tx,
            handle: Some(handle),
        })
    }

    /// Timestamp prefix for the current line, empty unless timestamps are on.
    pub fn get_timestamp_prefix() -> String {
        if TIMESTAMPS_ENABLED.load(Ordering::SeqCst) {
            format!("[{}] ", chrono::Local::now().format("%H:%M:%S%.3f"))
        } else {
            String::new()
        }
    }
}

/// Guard for file logging that flushes and joins the writer thread on drop.
pub struct LoggerGuard {
    tx: Sender<LogMessage>,
    handle: Option<std::thread::JoinHandle<anyhow::Result<()>>>,
}

impl Drop for LoggerGuard {
    fn drop(&mut self) {
        let _ = self.tx.send(LogMessage::Shutdown);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Remove `ESC [ ... m` color sequences.
fn strip_ansi_codes(text: &str) -> String {
    let mut result = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch == '\x1b' && chars.peek() == Some(&'[') {
            chars.next();
            for ch in chars.by_ref() {
                if ch == 'm' {
                    break;
                }
            }
        } else {
            result.push(ch);
        }
    }

    result
}

/// Route a fully formatted line to the file sink or stdout (used by the macros).
pub fn write_output(text: &str) {
    if let Some(Some(tx)) = LOG_CHANNEL.get() {
        let _ = tx.send(LogMessage::Formatted(strip_ansi_codes(text)));
    } else {
        print!("{text}");
        let _ = std::io::stdout().flush();
    }
}

/// Shared body of every line macro: `$layout` receives the timestamp prefix
/// and the rendered message.
#[doc(hidden)]
#[macro_export]
macro_rules! __log_line {
    ($layout:expr, $message:expr) => {{
        use $crate::common::logger::Log;
        if Log::is_enabled() {
            let prefix = Log::get_timestamp_prefix();
            let layout: fn(&str, &str) -> String = $layout;
            $crate::common::logger::write_output(&layout(&prefix, &$message));
        }
    }};
}

/// Log a decorated message, typically inside an existing block.
#[macro_export]
macro_rules! log_decorated {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┣ {m}\n"), format!("{}", $expr))
    };
}

/// Log an indented detail line.
#[macro_export]
macro_rules! log_indented {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃   {m}\n"), format!("{}", $expr))
    };
}

/// Log a visual pipe separator for vertical spacing.
#[macro_export]
macro_rules! log_pipe {
    () => {
        $crate::__log_line!(|p, _m| format!("{p}┃\n"), String::new())
    };
}

/// Log a block start message.
#[macro_export]
macro_rules! log_block_start {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), format!($fmt $($arg)*))
    };
    ($expr:expr) => {
        $crate::__log_line!(|p, m| format!("{p}┃\n{p}┣ {m}\n"), format!("{}", $expr))
    };
}

/// Log the application version header.
#[macro_export]
macro_rules! log_version {
    () => {
        $crate::__log_line!(
            |p, m| format!("{p}┏ lottie-splash v{m} ━━╸\n"),
            String::from(env!("CARGO_PKG_VERSION"))
        )
    };
}

/// Log the final termination marker.
#[macro_export]
macro_rules! log_end {
    () => {
        $crate::__log_line!(|p, _m| format!("{p}╹\n"), String::new())
    };
}

/// Log a warning with pipe prefix and yellow tag.
#[macro_export]
macro_rules! log_warning {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"),
            format!($fmt $($arg)*)
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[33mWARNING\x1b[0m] {m}\n"),
            format!("{}", $expr)
        )
    };
}

/// Log an error with pipe prefix and red tag.
#[macro_export]
macro_rules! log_error {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"),
            format!($fmt $($arg)*)
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[31mERROR\x1b[0m] {m}\n"),
            format!("{}", $expr)
        )
    };
}

/// Log an error that terminates the current flow, closing the block.
#[macro_export]
macro_rules! log_error_exit {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            |p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"),
            format!($fmt $($arg)*)
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            |p, m| format!("{p}┃\n{p}┗[\x1b[31mERROR\x1b[0m] {m}\n"),
            format!("{}", $expr)
        )
    };
}

/// Log an informational message with green tag.
#[macro_export]
macro_rules! log_info {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"),
            format!($fmt $($arg)*)
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[32mINFO\x1b[0m] {m}\n"),
            format!("{}", $expr)
        )
    };
}

/// Log a debug/operational message with green tag.
#[macro_export]
macro_rules! log_debug {
    ($fmt:literal $($arg:tt)*) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"),
            format!($fmt $($arg)*)
        )
    };
    ($expr:expr) => {
        $crate::__log_line!(
            |p, m| format!("{p}┣[\x1b[32mDEBUG\x1b[0m] {m}\n"),
            format!("{}", $expr)
        )
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_ansi_codes_removes_color_sequences() {
        let colored = "┣[\x1b[33mWARNING\x1b[0m] fade skipped\n";
        assert_eq!(strip_ansi_codes(colored), "┣[WARNING] fade skipped\n");
    }

    #[test]
    fn test_strip_ansi_codes_keeps_lone_escape() {
        assert_eq!(strip_ansi_codes("a\x1bb"), "a\x1bb");
    }

    #[test]
    fn test_timestamp_prefix_empty_by_default() {
        Log::set_timestamps(false);
        assert!(Log::get_timestamp_prefix().is_empty());
    }
}
