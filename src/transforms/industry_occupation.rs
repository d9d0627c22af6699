use super::{require_columns, JobContext, JobReport, Transform};
use crate::constants::{EMPLOYED_IN, INDUSTRY_NS, INDUSTRY_OCCUPATION_JOB, OCCUPATION_NS};
use crate::records::{KeyedSet, RelationshipRecord};
use crate::tabular::{parse_file, write_records, Row};
use tracing::{info, warn};

/// Industry/occupation employment matrix: one `employed_in` edge per
/// occupation-industry pair, carrying the employment share as an extra
/// `percent` column.
pub struct IndustryOccupationTransform;

impl IndustryOccupationTransform {
    pub fn new() -> Self {
        Self
    }
}

impl Default for IndustryOccupationTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl Transform for IndustryOccupationTransform {
    fn name(&self) -> &'static str {
        INDUSTRY_OCCUPATION_JOB
    }

    fn source_file(&self) -> &'static str {
        "matrix/industry_occupation_matrix.tsv"
    }

    fn run(&self, ctx: &JobContext) -> anyhow::Result<JobReport> {
        let source = ctx.data_root.join(self.source_file());
        let table = parse_file(&source)?;
        require_columns(
            &table,
            &source,
            &["Occupation Code", "Industry Code", "Percent"],
        )?;

        let mut edges: KeyedSet<RelationshipRecord> = KeyedSet::new();
        let mut incomplete = 0usize;
        for rec in table.records() {
            let occupation = rec.get("Occupation Code");
            let industry = rec.get("Industry Code");
            if occupation.is_empty() || industry.is_empty() {
                incomplete += 1;
                continue;
            }
            let edge = RelationshipRecord::by_code(
                OCCUPATION_NS,
                "occupation",
                occupation,
                INDUSTRY_NS,
                "industry",
                industry,
                EMPLOYED_IN,
            )
            .with_extra("percent", rec.get("Percent"));
            edges.insert(edge.key(), edge);
        }
        if incomplete > 0 {
            warn!("matrix: {} rows missing one of the code columns", incomplete);
        }

        let mut report = JobReport::new(self.name());
        report.rows_read = table.len();

        let edges = edges.into_vec();
        let columns = edges.first().map(|e| e.columns());
        let rows: Vec<Row> = edges.iter().map(|e| e.to_row()).collect();
        let outcome = write_records(
            ctx.output_path(OCCUPATION_NS, "industry_occupation.tsv"),
            &rows,
            columns.as_deref(),
        )?;
        report.relationships_written = outcome.records_written;
        report.add_output(&outcome);

        info!(
            "industry_occupation: {} rows -> {} matrix edges",
            report.rows_read, report.relationships_written
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
    fn emits_code_keyed_edges_with_percent_column() {
        let dir = tempfile::tempdir().unwrap();
        let data_root = dir.path().join("data");
        fs::create_dir_all(data_root.join("matrix")).unwrap();
        fs::write(
            data_root.join("matrix/industry_occupation_matrix.tsv"),
            "Occupation Code\tIndustry Code\tPercent\n\
             15-1252\t5112\t34.6\n\
             15-1252\t5415\t21.2\n\
             \t5415\t1.0\n\
             15-1252\t5112\t34.6\n",
        )
        .unwrap();

        let ctx = JobContext::new(&data_root, dir.path().join("out"));
        let report = IndustryOccupationTransform::new().run(&ctx).unwrap();

        assert_eq!(report.rows_read, 4);
        assert_eq!(report.relationships_written, 2);
        assert_eq!(report.entities_written, 0);

        let edges = reparse(ctx.output_path(OCCUPATION_NS, "industry_occupation.tsv")).unwrap();
        assert_eq!(
            edges.header,
            vec![
                "fromNs",
                "fromType",
                "fromCode",
                "toNs",
                "toType",
                "toCode",
                "relationshipType",
                "percent"
            ]
        );
        let edge = edges.records().next().unwrap();
        assert_eq!(edge.get("fromCode"), "15-1252");
        assert_eq!(edge.get("toCode"), "5112");
        assert_eq!(edge.get("relationshipType"), "employed_in");
        assert_eq!(edge.get("percent"), "34.6");
    }

    #[test]
    fn empty_matrix_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let data_root = dir.path().join("data");
        fs::create_dir_all(data_root.join("matrix")).unwrap();
        fs::write(
            data_root.join("matrix/industry_occupation_matrix.tsv"),
            "Occupation Code\tIndustry Code\tPercent\n",
        )
        .unwrap();

        let ctx = JobContext::new(&data_root, dir.path().join("out"));
        let report = IndustryOccupationTransform::new().run(&ctx).unwrap();
        assert_eq!(report.relationships_written, 0);
        assert!(report.outputs.is_empty());
        assert!(!ctx.output_path(OCCUPATION_NS, "industry_occupation.tsv").exists());
    }
}
