use crate::error::{EtlError, Result};
use std::fs;
use std::path::Path;
use tracing::{debug, warn};

const BOM: char = '\u{feff}';

/// A fully parsed tab-delimited document. Every row has exactly as many
/// fields as the header.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|h| h == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Iterate rows as views addressable by header-declared column name.
    pub fn records(&self) -> impl Iterator<Item = RowView<'_>> {
        self.rows.iter().map(move |fields| RowView {
            header: &self.header,
            fields,
        })
    }
}

/// A single row bound to its table's header.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    header: &'a [String],
    fields: &'a [String],
}

impl<'a> RowView<'a> {
    /// Field value for a named column, or the empty string when the column
    /// is not declared in the header.
    pub fn get(&self, column: &str) -> &'a str {
        self.header
            .iter()
            .position(|h| h == column)
            .map(|i| self.fields[i].as_str())
            .unwrap_or("")
    }

    pub fn fields(&self) -> &'a [String] {
        self.fields
    }
}

/// Read and parse a tab-delimited record file. A missing path is the
/// distinct `SourceNotFound` error; malformed content never fails.
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Table> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(EtlError::SourceNotFound(path.to_path_buf()));
    }
    let bytes = fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    let table = parse_str(&text);
    debug!(
        "parsed {}: {} columns, {} rows",
        path.display(),
        table.header.len(),
        table.rows.len()
    );
    Ok(table)
}

/// Parse tab-delimited text into a header and rows.
///
/// Fields may be wrapped in one layer of double quotes; `""` inside a quoted
/// field is one literal quote, and literal tabs and line breaks inside an
/// open quote do not terminate the field or the row. Source files are not
/// always well-formed, so nothing here rejects: a document ending inside an
/// open quote flushes the partial field, short rows are padded to the header
/// width, and long rows are truncated to it.
pub fn parse_str(text: &str) -> Table {
    let text = text.strip_prefix(BOM).unwrap_or(text);
    let lines = split_logical_lines(text);
    let mut lines = lines.into_iter();

    let header: Vec<String> = match lines.next() {
        Some(line) => split_fields(&line).iter().map(|f| clean_header_field(f)).collect(),
        None => return Table::default(),
    };

    let mut rows = Vec::new();
    for line in lines {
        let mut fields: Vec<String> = split_fields(&line)
            .iter()
            .map(|f| clean_data_field(f))
            .collect();
        if fields.len() != header.len() {
            debug!(
                "row width {} != header width {}; adjusting",
                fields.len(),
                header.len()
            );
            fields.resize(header.len(), String::new());
        }
        rows.push(fields);
    }

    Table { header, rows }
}

/// Pass 1: split raw text into logical lines, treating CR/LF as a terminator
/// only outside an open quote. Wholly blank physical lines are dropped.
fn split_logical_lines(text: &str) -> Vec<String> {
    let chars: Vec<char> = text.chars().collect();
    let mut lines = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                // Lookahead distinguishes a doubled-quote escape from a
                // closing quote followed by the next field's opening quote.
                if in_quotes && chars.get(i + 1) == Some(&'"') {
                    buf.push_str("\"\"");
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
                buf.push('"');
            }
            '\r' | '\n' => {
                if in_quotes {
                    buf.push(c);
                } else {
                    if c == '\r' && chars.get(i + 1) == Some(&'\n') {
                        i += 1;
                    }
                    flush_line(&mut lines, &mut buf);
                }
            }
            _ => buf.push(c),
        }
        i += 1;
    }

    if in_quotes {
        warn!("document ended inside an open quoted field; keeping partial content");
    }
    flush_line(&mut lines, &mut buf);
    lines
}

fn flush_line(lines: &mut Vec<String>, buf: &mut String) {
    if buf.trim().is_empty() {
        buf.clear();
    } else {
        lines.push(std::mem::take(buf));
    }
}

/// Pass 2: the same state machine over one logical line, splitting on tab.
fn split_fields(line: &str) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    let mut fields = Vec::new();
    let mut buf = String::new();
    let mut in_quotes = false;

    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        match c {
            '"' => {
                if in_quotes && chars.get(i + 1) == Some(&'"') {
                    buf.push_str("\"\"");
                    i += 2;
                    continue;
                }
                in_quotes = !in_quotes;
                buf.push('"');
            }
            '\t' if !in_quotes => fields.push(std::mem::take(&mut buf)),
            _ => buf.push(c),
        }
        i += 1;
    }
    fields.push(buf);
    fields
}

/// Header fields are trimmed, unwrapped of however many quote layers they
/// carry, and stripped of embedded BOM bytes.
fn clean_header_field(field: &str) -> String {
    let mut s: String = field.chars().filter(|c| *c != BOM).collect();
    loop {
        let trimmed = s.trim();
        if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
            s = trimmed[1..trimmed.len() - 1].to_string();
        } else {
            return trimmed.to_string();
        }
    }
}

/// Data fields are trimmed, then unwrapped of exactly one quoting layer with
/// `""` collapsed to a literal quote.
fn clean_data_field(field: &str) -> String {
    let trimmed = field.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('"') && trimmed.ends_with('"') {
        trimmed[1..trimmed.len() - 1].replace("\"\"", "\"")
    } else {
        trimmed.to_string()
    }
}
