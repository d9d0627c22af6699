use crate::error::Result;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// One output record as ordered `(column, value)` pairs. Pair order is what
/// makes the "columns default to the first record's keys" contract
/// deterministic.
pub type Row = Vec<(String, String)>;

/// What a write call actually did. An empty record collection is a valid
/// no-op, not an error; callers must treat the absent file as an empty
/// result.
#[derive(Debug, Clone)]
pub struct WriteOutcome {
    pub path: PathBuf,
    pub records_written: usize,
    pub skipped_empty: bool,
}

/// Serialize keyed records to a tab-delimited file, creating parent
/// directories as needed.
///
/// Column order is the explicit list if given, else the key order of the
/// first record. Values are never quoted: tabs and line feeds become a
/// single space and carriage returns are deleted, trading round-trip
/// fidelity for output any tab-splitting consumer can read. A value written
/// here and re-parsed may therefore differ from the original.
pub fn write_records<P: AsRef<Path>>(
    path: P,
    records: &[Row],
    columns: Option<&[String]>,
) -> Result<WriteOutcome> {
    let path = path.as_ref();

    if records.is_empty() {
        debug!("no records for {}; skipping file creation", path.display());
        return Ok(WriteOutcome {
            path: path.to_path_buf(),
            records_written: 0,
            skipped_empty: true,
        });
    }

    let columns: Vec<String> = match columns {
        Some(cols) => cols.to_vec(),
        None => records[0].iter().map(|(k, _)| k.clone()).collect(),
    };

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|c| sanitize(c))
            .collect::<Vec<_>>()
            .join("\t"),
    );
    out.push('\n');
    for record in records {
        let line = columns
            .iter()
            .map(|col| sanitize(field_value(record, col)))
            .collect::<Vec<_>>()
            .join("\t");
        out.push_str(&line);
        out.push('\n');
    }

    fs::write(path, out)?;
    info!("wrote {} records to {}", records.len(), path.display());
    Ok(WriteOutcome {
        path: path.to_path_buf(),
        records_written: records.len(),
        skipped_empty: false,
    })
}

fn field_value<'a>(record: &'a Row, column: &str) -> &'a str {
    record
        .iter()
        .find(|(k, _)| k == column)
        .map(|(_, v)| v.as_str())
        .unwrap_or("")
}

fn sanitize(value: &str) -> String {
    value
        .chars()
        .filter(|c| *c != '\r')
        .map(|c| if c == '\t' || c == '\n' { ' ' } else { c })
        .collect()
}
