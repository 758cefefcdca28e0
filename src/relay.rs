//! Translates raw engine output lines into log entries and progress
//! updates for the UI, and defines the event type workers send back.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::Regex;
use tokio::sync::mpsc::UnboundedSender;

static ANSI_ESCAPE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\x1B(?:[@-Z\\-_]|\[[0-?]*[ -/]*[@-~])").unwrap());

static PERCENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(\d+(?:\.\d+)?)\s*%").unwrap());

/// Severity of a single engine output line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Debug,
    Info,
    Warning,
    Error,
}

/// Message sent from a download worker back to the UI thread.
#[derive(Debug, Clone)]
pub enum WorkerEvent {
    /// A line for the log pane, already formatted for display.
    Log(String),
    /// Progress fraction between 0.0 and 1.0.
    Progress(f32),
    /// The download finished successfully.
    Finished,
    /// The download ended with an error message.
    Failed(String),
}

pub type EventSender = UnboundedSender<WorkerEvent>;

/// Removes terminal color and cursor control sequences.
pub fn strip_ansi(line: &str) -> Cow<'_, str> {
    ANSI_ESCAPE.replace_all(line, "")
}

/// Formats a line for the log pane, or None when it should be dropped.
///
/// Debug lines never surface. Info lines surface unless they are the
/// per-chunk download ticker, which would flood the pane. Warnings and
/// errors get a visible prefix.
pub fn display_line(severity: Severity, raw: &str) -> Option<String> {
    let clean = strip_ansi(raw);
    match severity {
        Severity::Debug => None,
        Severity::Info => {
            if clean.starts_with("[download] ") {
                None
            } else {
                Some(clean.into_owned())
            }
        }
        Severity::Warning => Some(format!("[WARN] {clean}")),
        Severity::Error => Some(format!("[ERROR] {clean}")),
    }
}

/// Extracts a percentage from a progress line. Lines without a readable
/// percentage are ignored rather than treated as an error.
pub fn parse_percent(line: &str) -> Option<f32> {
    let clean = strip_ansi(line);
    let captures = PERCENT.captures(&clean)?;
    let value: f32 = captures.get(1)?.as_str().parse().ok()?;
    if (0.0..=100.0).contains(&value) {
        Some(value)
    } else {
        None
    }
}

/// Splits a stderr line into its severity and the message body.
/// The engine prefixes its own diagnostics with "ERROR:" or "WARNING:".
pub fn classify_stderr(line: &str) -> (Severity, &str) {
    if let Some(rest) = line.strip_prefix("ERROR:") {
        (Severity::Error, rest.trim_start())
    } else if let Some(rest) = line.strip_prefix("WARNING:") {
        (Severity::Warning, rest.trim_start())
    } else {
        (Severity::Warning, line)
    }
}
