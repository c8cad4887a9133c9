// src/utils/log.rs

//! Console output helpers with server-style formatting.
//!
//! Diagnostic messages go through the `log` facade. These helpers cover the
//! operator-facing output: run headers, summaries and the in-place progress
//! line.

use std::io::Write;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;

/// Whether console output is suppressed
static QUIET: AtomicBool = AtomicBool::new(false);

/// Whether the last line printed was an unterminated progress line
static PROGRESS_OPEN: AtomicBool = AtomicBool::new(false);

/// Suppress or enable console output.
pub fn set_quiet(quiet: bool) {
    QUIET.store(quiet, Ordering::Relaxed);
}

fn enabled() -> bool {
    !QUIET.load(Ordering::Relaxed)
}

/// Terminate a pending progress line so the next output starts clean.
fn close_progress() {
    if PROGRESS_OPEN.swap(false, Ordering::Relaxed) {
        println!();
    }
}

/// Format a line with timestamp and tag
fn format_line(tag: &str, message: &str) -> String {
    let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
    format!("[{}] [{}] {}", timestamp, tag, message)
}

/// Print a success message
pub fn success(message: &str) {
    if enabled() {
        close_progress();
        println!("{}", format_line("INFO", &format!("✓ {}", message)));
    }
}

/// Rewrite the current console line with a progress message
pub fn progress(message: &str) {
    if enabled() {
        print!(
            "\r[{}] [PROG] {}            ",
            Local::now().format("%H:%M:%S"),
            message
        );
        let _ = std::io::stdout().flush();
        PROGRESS_OPEN.store(true, Ordering::Relaxed);
    }
}

/// Print a header
pub fn header(title: &str) {
    if enabled() {
        close_progress();
        let border = "═".repeat(60);
        println!("{}", format_line("INFO", &border));
        println!("{}", format_line("INFO", &format!("  {}", title)));
        println!("{}", format_line("INFO", &border));
    }
}

/// Print a sub-item (indented)
pub fn sub_item(message: &str) {
    if enabled() {
        close_progress();
        println!("{}", format_line("INFO", &format!("    {}", message)));
    }
}

/// Print a summary section
pub fn summary(title: &str, items: &[(&str, String)]) {
    if enabled() {
        close_progress();
        println!();
        println!("{}", format_line("SUMMARY", title));
        for (key, value) in items {
            println!("{}", format_line("SUMMARY", &format!("    {}: {}", key, value)));
        }
    }
}
