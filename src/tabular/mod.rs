//! Tab-delimited record files: the interchange format every job reads and
//! writes.
//!
//! The parser and writer are intentionally asymmetric. Parsing is quote-aware
//! and lossless (quoted fields may carry literal tabs and line breaks); the
//! writer never quotes and scrubs delimiter characters out of values instead,
//! so downstream consumers that just split on tabs can read the output
//! directly.

pub mod parser;
pub mod writer;

pub use parser::{parse_file, parse_str, RowView, Table};
pub use writer::{write_records, Row, WriteOutcome};
