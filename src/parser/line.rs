//! Line segmentation: timestamp prefix, severity marker, payload
//!
//! A line is decodable only if it starts with a millisecond-precision
//! timestamp and carries one of the three severity tokens as a
//! comma-delimited field. Everything after the severity field, rejoined
//! with commas, is the payload handed to the category dispatcher.

use chrono::{Duration, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

static TIMESTAMP_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}\.\d{3})").unwrap());

const FORMAT_MILLIS: &str = "%Y-%m-%d %H:%M:%S%.3f";
const FORMAT_SECONDS: &str = "%Y-%m-%d %H:%M:%S";

/// Line severity marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    pub fn is_error(&self) -> bool {
        matches!(self, Severity::Warning | Severity::Critical)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Info => "INFO",
            Severity::Warning => "WARNING",
            Severity::Critical => "CRITICAL",
        }
    }
}

/// Parse a timestamp string and apply the configured offset.
///
/// Millisecond precision is tried first, then whole seconds. An
/// unparseable timestamp yields `None` and the line is skipped; no
/// wall-clock fallback is ever substituted.
pub fn parse_timestamp(ts: &str, offset: Duration) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(ts, FORMAT_MILLIS)
        .or_else(|_| NaiveDateTime::parse_from_str(ts, FORMAT_SECONDS))
        .ok()
        .map(|parsed| parsed + offset)
}

/// One segmented log line
#[derive(Debug, Clone, PartialEq)]
pub struct SegmentedLine {
    pub timestamp: NaiveDateTime,
    pub severity: Severity,
    pub payload: String,
}

/// Split one raw line into timestamp, severity, and payload.
///
/// Returns `None` for lines without a timestamp prefix, without a
/// severity token, or with an empty payload; such lines never enter the
/// decodable set.
pub fn segment_line(line: &str, offset: Duration) -> Option<SegmentedLine> {
    let m = TIMESTAMP_RE.captures(line)?;
    let ts_str = m.get(1)?.as_str();
    let timestamp = parse_timestamp(ts_str, offset)?;

    let rest = line[m.get(0)?.end()..].trim();
    let parts: Vec<&str> = rest.split(',').collect();

    for (i, part) in parts.iter().enumerate() {
        let field = part.trim();
        if !["INFO", "WARNING", "CRITICAL"].iter().any(|t| field.contains(t)) {
            continue;
        }
        // Priority when one field carries several tokens
        let severity = if field.contains("WARNING") {
            Severity::Warning
        } else if field.contains("CRITICAL") {
            Severity::Critical
        } else {
            Severity::Info
        };
        let payload = if i + 1 < parts.len() {
            parts[i + 1..].join(",").trim().to_string()
        } else {
            String::new()
        };
        if payload.is_empty() {
            return None;
        }
        return Some(SegmentedLine {
            timestamp,
            severity,
            payload,
        });
    }

    None
}
