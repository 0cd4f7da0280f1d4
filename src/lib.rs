//! Agricultural drone controller log decoder
//!
//! A Rust library for decoding the line-oriented text logs written by an
//! agricultural drone's companion computer. Each log line carries a
//! timestamp, a severity token, and a tagged payload; the decoder routes
//! payloads into typed per-category record collections and derives a
//! consolidated error stream from severities, decoder flags, and a
//! keyword scan over unclassified lines.
//!
//! # Features
//!
//! - **`csv`** (default): Enable per-category CSV export
//! - **`cli`** (default): Build the command-line interface binary
//! - **`serde`**: Enable serialization/deserialization of record types
//!
//! # Quick Start
//!
//! Decode a log file and inspect the results:
//! ```rust,no_run
//! use aglog_parser::{decode_file, DecodeOptions};
//!
//! let data = decode_file("flight.log", &DecodeOptions::default()).unwrap();
//! println!("Decoded {} records", data.total_records());
//! for (category, count) in data.summary() {
//!     println!("  {}: {}", category, count);
//! }
//! ```
//!
//! Export every category to CSV:
//! ```rust,no_run
//! use aglog_parser::{decode_file, export_to_csv, DecodeOptions};
//! use std::path::Path;
//!
//! let input = Path::new("flight.log");
//! let data = decode_file(input, &DecodeOptions::default()).unwrap();
//! for path in export_to_csv(&data, input, None).unwrap() {
//!     println!("Wrote {}", path.display());
//! }
//! ```
//!
//! # Public API
//!
//! ## Decoding Functions
//! - [`decode_file`] - Decode a log file from disk
//! - [`decode_str`] - Decode in-memory log text
//! - [`decode_reader`] - Decode from any buffered reader
//! - [`parse_offset`] - Parse a signed `HH:MM` timestamp offset
//!
//! ## Data Types
//! - [`LogData`] - All decoded records, one collection per category
//! - [`DecodeOptions`] - Timestamp offset and diagnostics settings
//! - [`Table`] - One category finalized into columns and rows
//! - [`Category`] - The category tags in output order

pub mod coerce;
pub mod error;
#[cfg(feature = "csv")]
pub mod export;
pub mod parser;
pub mod types;

#[allow(ambiguous_glob_reexports)]
pub use coerce::*;
#[allow(ambiguous_glob_reexports)]
pub use error::*;
#[cfg(feature = "csv")]
#[allow(ambiguous_glob_reexports)]
pub use export::*;
#[allow(ambiguous_glob_reexports)]
pub use parser::*;
#[allow(ambiguous_glob_reexports)]
pub use types::*;

// Re-export Result type for convenience
pub use anyhow::Result;
