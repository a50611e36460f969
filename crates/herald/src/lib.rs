//! ## Features
//!
//! - Prefixed, colored messages on stderr (info, warn, error, success, debug)
//! - Multi-line message support with the prefix repeated on every line
//! - Banners for section headers and the save confirmation toast
//! - `tracing` subscriber setup shared by every margo binary
//!
//! Command output that is meant to be piped (tables, ids, URLs) goes to stdout
//! through `println!`; everything in this crate writes to stderr.

use chrono::Local;
use colored::*;
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

/// Environment variable read by [`init_tracing`].
pub const LOG_ENV: &str = "MARGO_LOG";

/// Install the global tracing subscriber.
///
/// `MARGO_LOG` wins when set; otherwise the level is `debug` for verbose runs
/// and `warn` for everything else. Calling this twice is harmless.
pub fn init_tracing(verbose: bool) {
  let fallback = if verbose { "debug" } else { "warn" };
  let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

  let _ = tracing_subscriber::registry()
    .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
    .with(filter)
    .try_init();
}

/// Write each line of a message to stderr
pub fn log(message: &str) {
  for line in message.lines() {
    eprintln!("{line}");
  }
}

fn format_prefix(color: Color, prefix: &str) -> String {
  format!("[{}]{:<width$}", prefix.color(color).bold(), "", width = 7 - prefix.len() - 2)
}

fn prefixed(color: Color, prefix: &str, message: &str) {
  let prefix = format_prefix(color, prefix);
  for line in message.lines() {
    log(&format!("{prefix} {line}"));
  }
}

/// A run of `char` repeated `length` times
pub fn banner_line(length: usize, char: char) -> String {
  char.to_string().repeat(length)
}

/// Render a message between two banner lines
pub fn as_banner<F>(log_fn: F, message: &str, width: Option<usize>, border_char: Option<char>)
where
  F: Fn(&str),
{
  let width = width.unwrap_or(50);
  let banner = banner_line(width, border_char.unwrap_or('='));

  log_fn(&banner);
  log_fn(message);
  log_fn(&banner);
}

pub fn info(message: &str) {
  prefixed(Color::Blue, "info", message);
}

pub fn warn(message: &str) {
  prefixed(Color::Yellow, "warn", message);
}

pub fn error(message: &str) {
  prefixed(Color::Red, "error", message);
}

pub fn debug(message: &str) {
  prefixed(Color::Magenta, "debug", message);
}

pub fn success(message: &str) {
  prefixed(Color::Green, "sccs", message);
}

/// Section header, e.g. the title above the dashboard table
pub fn announce(message: &str) {
  as_banner(|msg| log(&msg.blue().bold().to_string()), message, Some(50), Some('-'));
}

/// Build the one-line confirmation shown after a successful save.
pub fn toast_line(message: &str) -> String {
  let timestamp = Local::now().format("%H:%M:%S").to_string();
  format!("[{}] {} {}", timestamp.cyan(), "✓".green().bold(), message)
}

/// Informational confirmation, framed so it stands out from the table below it
pub fn toast(message: &str) {
  let line = toast_line(message);
  as_banner(log, &line, Some(40), Some('~'));
}
