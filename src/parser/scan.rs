//! Line-scanning driver
//!
//! Reads a controller log line by line, segments each line, routes the
//! payload through the dispatch table, and maintains the derived error
//! stream. A line that fails to decode never aborts the scan; it is
//! reported and skipped.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use anyhow::Result;
use chrono::Duration;

use crate::error::AglogError;
use crate::parser::dispatch::{dispatch, Outcome};
use crate::parser::line::segment_line;
use crate::types::records::OtherRecord;
use crate::types::store::LogData;

/// Substrings that mark an otherwise-unclassified payload as an error
const ERROR_KEYWORDS: &[&str] = &[
    "error",
    "warning",
    "exception",
    "failed",
    "failure",
    "fault",
    "critical",
    "timeout",
    "crash",
    "abort",
    "denied",
    "refuse",
    "invalid",
    "corrupt",
    "missing",
    "not found",
    "unable",
    "disconnect",
    "lost",
    "broken",
    "malfunction",
    "alert",
    "emergency",
    "panic",
    "fatal",
    "severe",
    "bad",
    "wrong",
];

/// Case-insensitive keyword scan over one payload
pub fn is_error_message(payload: &str) -> bool {
    let lower = payload.to_ascii_lowercase();
    ERROR_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Decode settings
#[derive(Debug, Clone)]
pub struct DecodeOptions {
    /// Added to every parsed timestamp (controller clocks run UTC,
    /// operations read IST)
    pub timestamp_offset: Duration,
    pub debug: bool,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        DecodeOptions {
            timestamp_offset: Duration::hours(5) + Duration::minutes(30),
            debug: false,
        }
    }
}

/// Parse a signed `HH:MM` offset string, e.g. `+05:30` or `-01:00`
pub fn parse_offset(text: &str) -> Result<Duration, AglogError> {
    let trimmed = text.trim();
    let (negative, body) = match trimmed.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };

    let invalid = || AglogError::InvalidOffset(text.to_string());
    let (hours_str, minutes_str) = body.split_once(':').ok_or_else(invalid)?;
    let hours: i64 = hours_str.parse().map_err(|_| invalid())?;
    let minutes: i64 = minutes_str.parse().map_err(|_| invalid())?;
    if !(0..=59).contains(&minutes) {
        return Err(invalid());
    }

    let offset = Duration::hours(hours) + Duration::minutes(minutes);
    Ok(if negative { -offset } else { offset })
}

/// Decode every line from a buffered reader
pub fn decode_reader<R: BufRead>(reader: R, options: &DecodeOptions) -> Result<LogData> {
    let mut data = LogData::new();

    for (index, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                eprintln!("Warning: unreadable line {}: {}", index + 1, e);
                continue;
            }
        };
        scan_line(&mut data, &line, index + 1, options);
    }

    Ok(data)
}

/// Decode one log file
pub fn decode_file<P: AsRef<Path>>(path: P, options: &DecodeOptions) -> Result<LogData> {
    let file = File::open(path.as_ref())?;
    decode_reader(BufReader::new(file), options)
}

/// Decode in-memory log text
pub fn decode_str(text: &str, options: &DecodeOptions) -> Result<LogData> {
    decode_reader(text.as_bytes(), options)
}

fn scan_line(data: &mut LogData, line: &str, line_number: usize, options: &DecodeOptions) {
    let segmented = match segment_line(line, options.timestamp_offset) {
        Some(seg) => seg,
        None => {
            if options.debug && !line.trim().is_empty() {
                eprintln!("Skipping unparseable line {}: {}", line_number, line);
            }
            return;
        }
    };

    // WARNING/CRITICAL lines always enter the error stream, whatever
    // category they decode into
    let mut error_added = false;
    if segmented.severity.is_error() {
        data.push_error(Some(segmented.timestamp), segmented.payload.clone());
        error_added = true;
    }

    match dispatch(data, segmented.timestamp, &segmented.payload) {
        Some(Ok(Outcome::Flagged(content))) => {
            if !error_added {
                data.push_error(Some(segmented.timestamp), content);
            }
        }
        Some(Ok(Outcome::Recorded)) | Some(Ok(Outcome::Skipped)) => {}
        Some(Err(e)) => {
            eprintln!("Error parsing line {}: {}", line_number, line);
            eprintln!("Error: {}", e);
        }
        None => {
            // Catch-all: keep the payload, then keyword-scan it
            data.other.push(OtherRecord {
                timestamp: segmented.timestamp,
                log_content: segmented.payload.clone(),
            });
            if !error_added && is_error_message(&segmented.payload) {
                data.push_error(Some(segmented.timestamp), segmented.payload);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_offset_forms() {
        assert_eq!(parse_offset("05:30").unwrap(), Duration::minutes(330));
        assert_eq!(parse_offset("+05:30").unwrap(), Duration::minutes(330));
        assert_eq!(parse_offset("-01:00").unwrap(), Duration::minutes(-60));
        assert_eq!(parse_offset("00:00").unwrap(), Duration::zero());
        assert!(parse_offset("0530").is_err());
        assert!(parse_offset("05:99").is_err());
        assert!(parse_offset("abc:00").is_err());
    }

    #[test]
    fn test_keyword_scan_case_insensitive() {
        assert!(is_error_message("Motor FAILED to arm"));
        assert!(is_error_message("connection Lost"));
        assert!(!is_error_message("all systems nominal"));
    }

    #[test]
    fn test_unmatched_line_becomes_other() {
        let text = "2024-01-01 10:00:00.000, INFO, FOO_BAR, something benign\n";
        let data = decode_str(text, &DecodeOptions::default()).unwrap();
        assert_eq!(data.other.len(), 1);
        assert!(data.errors.is_empty());
        assert_eq!(data.other[0].log_content, "FOO_BAR, something benign");
    }

    #[test]
    fn test_warning_line_recorded_and_flagged_once() {
        let text = "2024-01-01 10:00:00.000, WARNING, CC_PARAMETER, SPRAY_RATE, 5.0\n";
        let data = decode_str(text, &DecodeOptions::default()).unwrap();
        assert_eq!(data.cc_parameter.len(), 1);
        // Synthetic header (2 rows) plus exactly one entry
        assert_eq!(data.errors.len(), 3);
        assert_eq!(data.errors[2].log_content, "CC_PARAMETER, SPRAY_RATE, 5.0");
    }

    #[test]
    fn test_keyword_hit_in_catchall() {
        let text = "2024-01-01 10:00:00.000, INFO, RADAR, sensor timeout detected\n";
        let data = decode_str(text, &DecodeOptions::default()).unwrap();
        assert_eq!(data.other.len(), 1);
        assert_eq!(data.errors.len(), 3);
    }

    #[test]
    fn test_lines_without_timestamp_ignored() {
        let text = "no timestamp here\n\n2024-01-01 10:00:00.000, INFO, CPU, CPU usage: 5.0%\n";
        let data = decode_str(text, &DecodeOptions::default()).unwrap();
        assert_eq!(data.cpu.len(), 1);
        assert!(data.other.is_empty());
    }
}
