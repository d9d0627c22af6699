//! Domain transforms: one module per source dataset.
//!
//! Each transform owns locating its raw input under the data root, mapping
//! source columns into the canonical record shapes, deduplicating by natural
//! key, and writing its output files. The shared codec layer (`tabular`,
//! `normalize`, `scheme`, `records`) does everything else.

use crate::error::EtlError;
use crate::tabular::Table;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};

pub mod industry;
pub mod industry_occupation;
pub mod occupation;
pub mod tariff;
pub mod vocabulary;

pub use industry::IndustryTransform;
pub use industry_occupation::IndustryOccupationTransform;
pub use occupation::OccupationTransform;
pub use tariff::TariffTransform;
pub use vocabulary::VocabularyTransform;

/// Directories a job reads from and writes under.
#[derive(Debug, Clone)]
pub struct JobContext {
    pub data_root: PathBuf,
    pub output_root: PathBuf,
}

impl JobContext {
    pub fn new(data_root: impl Into<PathBuf>, output_root: impl Into<PathBuf>) -> Self {
        Self {
            data_root: data_root.into(),
            output_root: output_root.into(),
        }
    }

    /// Output path for a file under an authority namespace directory.
    pub fn output_path(&self, ns: &str, file: &str) -> PathBuf {
        self.output_root.join(ns).join(file)
    }
}

/// Summary of one completed job.
#[derive(Debug, Clone, Serialize)]
pub struct JobReport {
    pub job: String,
    pub rows_read: usize,
    pub entities_written: usize,
    pub relationships_written: usize,
    pub outputs: Vec<String>,
}

impl JobReport {
    pub fn new(job: &str) -> Self {
        Self {
            job: job.to_string(),
            rows_read: 0,
            entities_written: 0,
            relationships_written: 0,
            outputs: Vec::new(),
        }
    }

    /// Record a write outcome; skipped-empty writes contribute no output
    /// path (the absent file is a valid empty result).
    pub fn add_output(&mut self, outcome: &crate::tabular::WriteOutcome) {
        if !outcome.skipped_empty {
            self.outputs.push(outcome.path.display().to_string());
        }
    }
}

/// Core trait every source dataset's transform implements.
pub trait Transform {
    /// Job name used by the CLI filter and the registry.
    fn name(&self) -> &'static str;

    /// Source file this job reads, relative to the data root.
    fn source_file(&self) -> &'static str;

    /// Read the source, map it, and write output files.
    fn run(&self, ctx: &JobContext) -> anyhow::Result<JobReport>;
}

/// Registry of transforms keyed by job name.
pub struct TransformRegistry {
    transforms: HashMap<&'static str, Box<dyn Transform>>,
}

impl TransformRegistry {
    /// Create a registry with all built-in transforms installed.
    pub fn new() -> Self {
        let mut registry = Self {
            transforms: HashMap::new(),
        };
        registry.register(Box::new(IndustryTransform::new()));
        registry.register(Box::new(OccupationTransform::new()));
        registry.register(Box::new(TariffTransform::new()));
        registry.register(Box::new(IndustryOccupationTransform::new()));
        registry.register(Box::new(VocabularyTransform::new()));
        registry
    }

    pub fn register(&mut self, transform: Box<dyn Transform>) {
        self.transforms.insert(transform.name(), transform);
    }

    pub fn get(&self, name: &str) -> Option<&dyn Transform> {
        self.transforms.get(name).map(|t| t.as_ref())
    }

    pub fn job_names(&self) -> Vec<&'static str> {
        self.transforms.keys().copied().collect()
    }
}

impl Default for TransformRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Write an entity file and its hierarchy file under the namespace
/// directory, filling in the report's counters.
pub(crate) fn write_graph(
    ctx: &JobContext,
    ns: &str,
    entity_file: &str,
    entities: &[crate::records::StandardRecord],
    edge_file: &str,
    edges: &[crate::records::RelationshipRecord],
    report: &mut JobReport,
) -> crate::error::Result<()> {
    use crate::records::StandardRecord;
    use crate::tabular::{write_records, Row};

    let rows: Vec<Row> = entities.iter().map(StandardRecord::to_row).collect();
    let outcome = write_records(
        ctx.output_path(ns, entity_file),
        &rows,
        Some(&StandardRecord::columns()),
    )?;
    report.entities_written = outcome.records_written;
    report.add_output(&outcome);

    let columns = edges.first().map(|e| e.columns());
    let rows: Vec<Row> = edges.iter().map(|e| e.to_row()).collect();
    let outcome = write_records(ctx.output_path(ns, edge_file), &rows, columns.as_deref())?;
    report.relationships_written = outcome.records_written;
    report.add_output(&outcome);
    Ok(())
}

/// Presence check for the columns a transform maps from.
pub(crate) fn require_columns(
    table: &Table,
    source: &Path,
    columns: &[&str],
) -> Result<(), EtlError> {
    for column in columns {
        if !table.has_column(column) {
            return Err(EtlError::MissingColumn {
                column: column.to_string(),
                dataset: source.display().to_string(),
            });
        }
    }
    Ok(())
}
