use super::{require_columns, write_graph, JobContext, JobReport, Transform};
use crate::constants::{INDUSTRY_JOB, INDUSTRY_NS};
use crate::normalize::Normalizer;
use crate::records::{map_code_entities, CodeEntity};
use crate::scheme::CodeScheme;
use crate::tabular::parse_file;
use tracing::info;

/// Industry classification codes (2–6 digit NAICS-style hierarchy).
pub struct IndustryTransform {
    normalizer: Normalizer,
    scheme: CodeScheme,
}

impl IndustryTransform {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::default(),
            scheme: CodeScheme::industry(),
        }
    }
}

impl Default for IndustryTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for IndustryTransform {
    fn name(&self) -> &'static str {
        INDUSTRY_JOB
    }

    fn source_file(&self) -> &'static str {
        "industry/naics_codes.tsv"
    }

    fn run(&self, ctx: &JobContext) -> anyhow::Result<JobReport> {
        let source = ctx.data_root.join(self.source_file());
        let table = parse_file(&source)?;
        require_columns(&table, &source, &["Code", "Title"])?;

        let entries: Vec<CodeEntity> = table
            .records()
            .map(|rec| CodeEntity {
                code: rec.get("Code").to_string(),
                name: rec.get("Title").to_string(),
                description: rec.get("Description").to_string(),
            })
            .collect();

        let (entities, edges) = map_code_entities(
            &entries,
            INDUSTRY_NS,
            "industry",
            &self.normalizer,
            &self.scheme,
        );

        let mut report = JobReport::new(self.name());
        report.rows_read = table.len();
        write_graph(
            ctx,
            INDUSTRY_NS,
            "industries.tsv",
            &entities,
            "industry_hierarchy.tsv",
            &edges,
            &mut report,
        )?;

        info!(
            "industry: {} rows -> {} entities, {} hierarchy edges",
            report.rows_read, report.entities_written, report.relationships_written
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tabular::parse_file as reparse;
    use std::fs;

    #[test]
    fn builds_entities_and_hierarchy_from_source() {
        let dir = tempfile::tempdir().unwrap();
        let data_root = dir.path().join("data");
        fs::create_dir_all(data_root.join("industry")).unwrap();
        fs::write(
            data_root.join("industry/naics_codes.tsv"),
            "Code\tTitle\tDescription\n\
             11\tAgriculture\tFarms and such\n\
             111\tCrop Production\t\"Growing crops,\tincluding grains\"\n\
             111\tCrop Production\tduplicate row\n",
        )
        .unwrap();

        let ctx = JobContext::new(&data_root, dir.path().join("out"));
        let report = IndustryTransform::new().run(&ctx).unwrap();

        assert_eq!(report.rows_read, 3);
        assert_eq!(report.entities_written, 2);
        assert_eq!(report.relationships_written, 1);

        let entities = reparse(ctx.output_path(INDUSTRY_NS, "industries.tsv")).unwrap();
        assert_eq!(entities.header[2], "id");
        let ids: Vec<&str> = entities.records().map(|r| r.get("id")).collect();
        assert_eq!(ids, vec!["Agriculture", "Crop_Production"]);
        // The quoted embedded tab was parsed losslessly, then scrubbed to a
        // space on the way out.
        let descriptions: Vec<&str> = entities.records().map(|r| r.get("description")).collect();
        assert_eq!(descriptions[1], "Growing crops, including grains");

        let edges = reparse(ctx.output_path(INDUSTRY_NS, "industry_hierarchy.tsv")).unwrap();
        assert_eq!(edges.rows.len(), 1);
        let edge = edges.records().next().unwrap();
        assert_eq!(edge.get("fromCode"), "111");
        assert_eq!(edge.get("toCode"), "11");
        assert_eq!(edge.get("relationshipType"), "child_of");
    }

    #[test]
    fn missing_title_column_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let data_root = dir.path().join("data");
        fs::create_dir_all(data_root.join("industry")).unwrap();
        fs::write(data_root.join("industry/naics_codes.tsv"), "Code\n11\n").unwrap();

        let ctx = JobContext::new(&data_root, dir.path().join("out"));
        let err = IndustryTransform::new().run(&ctx).unwrap_err();
        assert!(err.to_string().contains("Title"));
    }
}
