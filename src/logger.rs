//! Logging utilities with colored output.
//!
//! This module provides:
//! - `log!` macro for formatted terminal output with colored prefixes
//! - `debug!` macro, only printed with `--verbose`
//! - `status_success` / `status_error` for the final deploy banner
//!
//! # Example
//!
//! ```ignore
//! log!("git"; "commit {}", id);
//! debug!("exec"; "running `{}`", cmd);
//! status_success("deployed to https://user.github.io/site/");
//! ```

use owo_colors::{OwoColorize, Stream, Style};
use std::{
    fmt,
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

// ============================================================================
// Helper Functions
// ============================================================================

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
    let style = match module_lower {
        "deploy" => Style::new().bright_blue(),
        "git" => Style::new().bright_green(),
        "error" => Style::new().bright_red(),
        _ => Style::new().bright_yellow(),
    };
    paint(format!("[{module}]"), Stream::Stdout, style.bold())
}

/// Style `text` only when `stream` supports color.
///
/// Goes through `if_supports_color`, so `--color` (`owo_colors::set_override`)
/// and pipe detection both apply.
pub fn paint<T: fmt::Display>(text: T, stream: Stream, style: Style) -> String {
    text.if_supports_color(stream, |t| t.style(style)).to_string()
}

// ============================================================================
// Status banners
// ============================================================================

/// Display success message (✓ prefix, green).
pub fn status_success(message: &str) {
    display(&paint("✓", Stream::Stdout, Style::new().green()), message);
}

/// Display error message (✗ prefix, red) with optional detail.
pub fn status_error(summary: &str, detail: &str) {
    display(&paint("✗", Stream::Stdout, Style::new().red()), &join_detail(summary, detail));
}

/// Display warning message (⚠ prefix, yellow).
pub fn status_warning(detail: &str) {
    display(&paint("⚠", Stream::Stdout, Style::new().yellow()), detail);
}

fn display(symbol: &str, message: &str) {
    let mut stdout = stdout().lock();
    writeln!(stdout, "{symbol} {message}").ok();
    stdout.flush().ok();
}

/// Append an indented detail block below a summary line.
fn join_detail(summary: &str, detail: &str) -> String {
    if detail.is_empty() {
        return summary.to_string();
    }
    let indented: Vec<_> = detail.lines().map(|line| format!("  {line}")).collect();
    format!("{summary}\n{}", indented.join("\n"))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_detail_empty() {
        assert_eq!(join_detail("push failed", ""), "push failed");
    }

    #[test]
    fn test_join_detail_indents_every_line() {
        let message = join_detail("push failed", "fatal: no remote\nhint: add one");
        assert_eq!(message, "push failed\n  fatal: no remote\n  hint: add one");
        assert_eq!(message.matches('\n').count() + 1, 3);
    }

    #[test]
    fn test_prefix_contains_module_name() {
        owo_colors::set_override(false);
        assert_eq!(colorize_prefix("git", "git"), "[git]");
        assert_eq!(colorize_prefix("Deploy", "deploy"), "[Deploy]");
    }

    #[test]
    fn test_paint_honors_color_override() {
        owo_colors::set_override(false);
        let plain = paint("✓", Stream::Stdout, Style::new().green());
        assert_eq!(plain, "✓");
        assert!(!plain.contains('\u{1b}'));
    }

    #[test]
    fn test_verbose_toggle() {
        set_verbose(true);
        assert!(is_verbose());
        set_verbose(false);
        assert!(!is_verbose());
    }
}
