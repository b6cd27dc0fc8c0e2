//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` / `debug_do!` for output gated on `--verbose`
//! - `WatchStatus` for one-line rebuild status in serve mode
//!
//! # Example
//!
//! ```ignore
//! log!("build"; "scanned {} documents", count);
//! debug!("scan"; "skipping {}", path.display());
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    io::{Write, stdout},
    sync::atomic::{AtomicBool, Ordering},
};

/// Global verbose flag (set by --verbose CLI argument)
static VERBOSE: AtomicBool = AtomicBool::new(false);

/// Set verbose mode globally
pub fn set_verbose(v: bool) {
    VERBOSE.store(v, Ordering::SeqCst);
}

/// Check if verbose mode is enabled
pub fn is_verbose() -> bool {
    VERBOSE.load(Ordering::SeqCst)
}

// ============================================================================
// Log Macro
// ============================================================================

/// Log a message with a colored module prefix
///
/// # Usage
/// ```ignore
/// log!("module"; "message with {} formatting", args);
/// ```
#[macro_export]
macro_rules! log {
    ($module:expr; $($arg:tt)*) => {{
        $crate::logger::log($module, &format!($($arg)*))
    }};
}

/// Log a debug message (only shown when --verbose is enabled)
///
/// # Usage
/// ```ignore
/// debug!("module"; "debug info: {}", value);
/// ```
#[macro_export]
macro_rules! debug {
    ($module:expr; $($arg:tt)*) => {{
        if $crate::logger::is_verbose() {
            $crate::logger::log($module, &format!($($arg)*))
        }
    }};
}

/// Execute code only when --verbose is enabled
///
/// Use this to avoid computing expensive debug data when not needed.
#[macro_export]
macro_rules! debug_do {
    ($($body:tt)*) => {{
        if $crate::logger::is_verbose() {
            $($body)*
        }
    }};
}

// ============================================================================
// Helper Functions
// ============================================================================

/// Apply `style` when color is enabled (`--color`, otherwise TTY detection).
pub fn paint(text: impl std::fmt::Display, style: Style) -> String {
    text.if_supports_color(Stream::Stdout, |t| t.style(style))
        .to_string()
}

/// Log a message with a colored module prefix
#[inline]
pub fn log(module: &str, message: &str) {
    let module_lower = module.to_ascii_lowercase();
    let prefix = colorize_prefix(module, &module_lower);

    let mut stdout = stdout().lock();
    writeln!(stdout, "{prefix} {message}").ok();
    stdout.flush().ok();
}

/// Apply color to a module prefix based on module type
#[inline]
fn colorize_prefix(module: &str, module_lower: &str) -> String {
    let prefix = format!("[{module}]");
    match module_lower {
        "serve" => paint(prefix, Style::new().bright_blue().bold()),
        "watch" => paint(prefix, Style::new().bright_green().bold()),
        "error" => paint(prefix, Style::new().bright_red().bold()),
        "warning" => paint(prefix, Style::new().yellow().bold()),
        _ => paint(prefix, Style::new().bright_yellow().bold()),
    }
}

// ============================================================================
// Watch Status
// ============================================================================

/// Get current time formatted as HH:MM:SS (UTC)
fn now() -> String {
    use std::time::SystemTime;
    let secs = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);
    let hours = (secs / 3600) % 24;
    let minutes = (secs / 60) % 60;
    let seconds = secs % 60;
    format!("{hours:02}:{minutes:02}:{seconds:02}")
}

/// Timestamped status lines for watch mode.
///
/// ```ignore
/// WatchStatus::success("routes rebuilt (42 routes, 3 redirects)");
/// WatchStatus::unchanged("routes unchanged");
/// WatchStatus::error("rebuild failed", &err.to_string());
/// ```
pub struct WatchStatus;

impl WatchStatus {
    /// Display success message (✓ prefix, green).
    pub fn success(message: &str) {
        Self::display(&paint("✓", Style::new().green()), message);
    }

    /// Display unchanged message (dimmed, no symbol).
    pub fn unchanged(message: &str) {
        Self::display("", &paint(message, Style::new().dimmed()));
    }

    /// Display error message (✗ prefix, red) with optional detail.
    pub fn error(summary: &str, detail: &str) {
        let message = if detail.is_empty() {
            summary.to_string()
        } else {
            format!("{summary}\n{detail}")
        };
        Self::display(&paint("✗", Style::new().red()), &message);
    }

    fn display(symbol: &str, message: &str) {
        let mut stdout = stdout().lock();
        let timestamp = paint(format!("[{}]", now()), Style::new().dimmed());
        let line = if symbol.is_empty() {
            format!("{timestamp} {message}")
        } else {
            format!("{timestamp} {symbol} {message}")
        };
        writeln!(stdout, "{line}").ok();
        stdout.flush().ok();
    }
}
