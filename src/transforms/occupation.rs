use super::{require_columns, write_graph, JobContext, JobReport, Transform};
use crate::constants::{OCCUPATION_JOB, OCCUPATION_NS};
use crate::normalize::Normalizer;
use crate::records::{map_code_entities, CodeEntity};
use crate::scheme::CodeScheme;
use crate::tabular::parse_file;
use tracing::info;

/// Occupational taxonomy codes (`NN-NNNN` SOC-style, tiered by trailing
/// zero-run).
pub struct OccupationTransform {
    normalizer: Normalizer,
    scheme: CodeScheme,
}

impl OccupationTransform {
    pub fn new() -> Self {
        Self {
            normalizer: Normalizer::default(),
            scheme: CodeScheme::occupation(),
        }
    }
}

impl Default for OccupationTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for OccupationTransform {
    fn name(&self) -> &'static str {
        OCCUPATION_JOB
    }

    fn source_file(&self) -> &'static str {
        "occupation/soc_codes.tsv"
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
                description: rec.get("Definition").to_string(),
            })
            .collect();

        let (entities, edges) = map_code_entities(
            &entries,
            OCCUPATION_NS,
            "occupation",
            &self.normalizer,
            &self.scheme,
        );

        let mut report = JobReport::new(self.name());
        report.rows_read = table.len();
        write_graph(
            ctx,
            OCCUPATION_NS,
            "occupations.tsv",
            &entities,
            "occupation_hierarchy.tsv",
            &edges,
            &mut report,
        )?;

        info!(
            "occupation: {} rows -> {} entities, {} hierarchy edges",
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
    fn detailed_codes_parent_to_minor_groups() {
        let dir = tempfile::tempdir().unwrap();
        let data_root = dir.path().join("data");
        fs::create_dir_all(data_root.join("occupation")).unwrap();
        fs::write(
            data_root.join("occupation/soc_codes.tsv"),
            "Code\tTitle\tDefinition\n\
             15-0000\tComputer and Mathematical Occupations\t\n\
             15-1200\tComputer Occupations\t\n\
             15-1252\tSoftware Developers\tDevelop software applications\n",
        )
        .unwrap();

        let ctx = JobContext::new(&data_root, dir.path().join("out"));
        let report = OccupationTransform::new().run(&ctx).unwrap();

        assert_eq!(report.entities_written, 3);
        assert_eq!(report.relationships_written, 2);

        let edges = reparse(ctx.output_path(OCCUPATION_NS, "occupation_hierarchy.tsv")).unwrap();
        let pairs: Vec<(String, String)> = edges
            .records()
            .map(|r| (r.get("fromCode").to_string(), r.get("toCode").to_string()))
            .collect();
        assert!(pairs.contains(&("15-1200".to_string(), "15-0000".to_string())));
        assert!(pairs.contains(&("15-1252".to_string(), "15-1200".to_string())));
    }
}
