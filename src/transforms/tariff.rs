use super::{require_columns, write_graph, JobContext, JobReport, Transform};
use crate::constants::{CHILD_OF, TARIFF_JOB, TARIFF_NS};
use crate::normalize::Normalizer;
use crate::records::{KeyedSet, RelationshipRecord, StandardRecord};
use crate::scheme::{CodeScheme, UNKNOWN_LEVEL};
use crate::tabular::parse_file;
use tracing::info;

/// Tariff schedule line items (HTS-style codes, two digits per level).
///
/// Source numbers carry dot separators (`0101.21.00.10`) which are stripped
/// before hierarchy derivation. Descriptions repeat across chapters, so
/// deduplication is by code+name rather than code alone.
pub struct TariffTransform {
    normalizer: Normalizer,
    scheme: CodeScheme,
}

impl TariffTransform {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::default(),
            scheme: CodeScheme::tariff(),
        }
    }
}

impl Default for TariffTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for TariffTransform {
    fn name(&self) -> &'static str {
        TARIFF_JOB
    }

    fn source_file(&self) -> &'static str {
        "tariff/hts_items.tsv"
    }

    fn run(&self, ctx: &JobContext) -> anyhow::Result<JobReport> {
        let source = ctx.data_root.join(self.source_file());
        let table = parse_file(&source)?;
        require_columns(&table, &source, &["HTS Number", "Description"])?;

        let mut entities: KeyedSet<StandardRecord> = KeyedSet::new();
        let mut edges: KeyedSet<RelationshipRecord> = KeyedSet::new();

        for rec in table.records() {
            let code = rec.get("HTS Number").replace('.', "");
            if code.is_empty() {
                continue;
            }
            let name = rec.get("Description").to_string();
            let record = StandardRecord {
                ns: TARIFF_NS.to_string(),
                entity_type: "tariff_item".to_string(),
                id: self.normalizer.normalize(&name),
                name,
                description: String::new(),
                code: code.clone(),
            };
            let key = record.code_name_key();
            entities.insert(key, record);

            if self.scheme.level(&code) == UNKNOWN_LEVEL {
                continue;
            }
            if let Some(parent) = self.scheme.parent(&code) {
                let edge = RelationshipRecord::by_code(
                    TARIFF_NS,
                    "tariff_item",
                    &code,
                    TARIFF_NS,
                    "tariff_item",
                    &parent,
                    CHILD_OF,
                );
                edges.insert(edge.key(), edge);
            }
        }

        let mut report = JobReport::new(self.name());
        report.rows_read = table.len();
        write_graph(
            ctx,
            TARIFF_NS,
            "tariff_items.tsv",
            &entities.into_vec(),
            "tariff_hierarchy.tsv",
            &edges.into_vec(),
            &mut report,
        )?;

        info!(
            "tariff: {} rows -> {} entities, {} hierarchy edges",
            report.rows_read, report.entities_written, report.relationships_written
        );
        Ok(report)
    }
}
