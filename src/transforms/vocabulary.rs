use super::{require_columns, write_graph, JobContext, JobReport, Transform};
use crate::constants::{CHILD_OF, VOCABULARY_JOB, VOCABULARY_NS};
use crate::normalize::Normalizer;
use crate::records::{KeyedSet, RelationshipRecord, StandardRecord};
use crate::tabular::parse_file;
use tracing::info;

/// Web vocabulary types. Unlike the coded schemes, hierarchy comes from an
/// explicit parent column and records have no scheme-native code, so
/// deduplication and edge endpoints are keyed by canonical id.
pub struct VocabularyTransform {
    normalizer: Normalizer,
}

impl VocabularyTransform {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::default(),
        }
    }
}

impl Default for VocabularyTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for VocabularyTransform {
    fn name(&self) -> &'static str {
        VOCABULARY_JOB
    }

    fn source_file(&self) -> &'static str {
        "vocabulary/schema_types.tsv"
    }

    fn run(&self, ctx: &JobContext) -> anyhow::Result<JobReport> {
        let source = ctx.data_root.join(self.source_file());
        let table = parse_file(&source)?;
        require_columns(&table, &source, &["Label", "SubTypeOf"])?;

        let mut entities: KeyedSet<StandardRecord> = KeyedSet::new();
        let mut edges: KeyedSet<RelationshipRecord> = KeyedSet::new();

        for rec in table.records() {
            let name = rec.get("Label").to_string();
            if name.is_empty() {
                continue;
            }
            let record = StandardRecord {
                ns: VOCABULARY_NS.to_string(),
                entity_type: "schema_type".to_string(),
                id: self.normalizer.normalize(&name),
                name,
                description: rec.get("Comment").to_string(),
                code: String::new(),
            };
            let id = record.id.clone();
            entities.insert(record.name_key(), record);

            let parent_label = rec.get("SubTypeOf");
            if parent_label.is_empty() {
                continue;
            }
            let edge = RelationshipRecord::by_id(
                VOCABULARY_NS,
                "schema_type",
                &id,
                VOCABULARY_NS,
                "schema_type",
                &self.normalizer.normalize(parent_label),
                CHILD_OF,
            );
            edges.insert(edge.key(), edge);
        }

        let mut report = JobReport::new(self.name());
        report.rows_read = table.len();
        write_graph(
            ctx,
            VOCABULARY_NS,
            "schema_types.tsv",
            &entities.into_vec(),
            "schema_type_hierarchy.tsv",
            &edges.into_vec(),
            &mut report,
        )?;

        info!(
            "vocabulary: {} rows -> {} types, {} subtype edges",
            report.rows_read, report.entities_written, report.relationships_written
        );
        Ok(report)
    }
}
