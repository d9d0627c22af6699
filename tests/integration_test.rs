use refgraph::constants::{INDUSTRY_NS, OCCUPATION_NS};
use refgraph::pipeline::run_jobs;
use refgraph::tabular::parse_file;
use refgraph::transforms::{JobContext, TransformRegistry};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_industry_fixture(data_root: &Path) {
    fs::create_dir_all(data_root.join("industry")).unwrap();
    fs::write(
        data_root.join("industry/naics_codes.tsv"),
        "\u{feff}Code\tTitle\tDescription\n\
         11\tAgriculture\t\"Farming,\nforestry and fishing\"\n\
         111\tCrop Production\tGrowing crops\n\
         \n\
         111\tCrop Production\tduplicate\n",
    )
    .unwrap();
}

#[test]
fn industry_job_end_to_end() {
    let temp = tempdir().unwrap();
    let data_root = temp.path().join("data");
    let output_root = temp.path().join("output");
    write_industry_fixture(&data_root);

    let registry = TransformRegistry::new();
    let ctx = JobContext::new(&data_root, &output_root);
    let batch = run_jobs(&registry, &["industry".to_string()], &ctx).unwrap();

    assert!(!batch.failed());
    assert_eq!(batch.reports.len(), 1);
    let report = &batch.reports[0];
    // BOM, quoted embedded newline, blank line, and the duplicate row are
    // all absorbed before anything is written.
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.entities_written, 2);
    assert_eq!(report.relationships_written, 1);

    let entities = parse_file(output_root.join(INDUSTRY_NS).join("industries.tsv")).unwrap();
    assert_eq!(
        entities.header,
        vec!["ns", "type", "id", "name", "description", "code"]
    );
    let first = entities.records().next().unwrap();
    assert_eq!(first.get("ns"), "census.gov");
    assert_eq!(first.get("id"), "Agriculture");
    // The embedded newline was scrubbed to a space by the quote-free writer.
    assert_eq!(first.get("description"), "Farming, forestry and fishing");

    let edges = parse_file(output_root.join(INDUSTRY_NS).join("industry_hierarchy.tsv")).unwrap();
    let edge = edges.records().next().unwrap();
    assert_eq!(edge.get("fromCode"), "111");
    assert_eq!(edge.get("toCode"), "11");
    assert_eq!(edge.get("relationshipType"), "child_of");
}

#[test]
fn failing_job_does_not_abort_siblings() {
    let temp = tempdir().unwrap();
    let data_root = temp.path().join("data");
    let output_root = temp.path().join("output");
    write_industry_fixture(&data_root);
    // No occupation source file on disk.

    let registry = TransformRegistry::new();
    let ctx = JobContext::new(&data_root, &output_root);
    let batch = run_jobs(
        &registry,
        &["occupation".to_string(), "industry".to_string()],
        &ctx,
    )
    .unwrap();

    assert!(batch.failed());
    assert_eq!(batch.failures.len(), 1);
    assert_eq!(batch.failures[0].job, "occupation");
    assert!(batch.failures[0].error.contains("not found"));
    // The industry job still ran to completion.
    assert_eq!(batch.reports.len(), 1);
    assert!(output_root.join(INDUSTRY_NS).join("industries.tsv").exists());
    assert!(!output_root.join(OCCUPATION_NS).join("occupations.tsv").exists());
}

#[test]
fn unknown_job_is_reported_not_fatal() {
    let temp = tempdir().unwrap();
    let data_root = temp.path().join("data");
    let output_root = temp.path().join("output");
    write_industry_fixture(&data_root);

    let registry = TransformRegistry::new();
    let ctx = JobContext::new(&data_root, &output_root);
    let batch = run_jobs(
        &registry,
        &["industry".to_string(), "bogus".to_string()],
        &ctx,
    )
    .unwrap();

    assert_eq!(batch.reports.len(), 1);
    assert_eq!(batch.failures.len(), 1);
    assert!(batch.failures[0].error.contains("unknown job name"));
}

#[test]
fn batch_report_is_persisted_as_json() {
    let temp = tempdir().unwrap();
    let data_root = temp.path().join("data");
    let output_root = temp.path().join("output");
    write_industry_fixture(&data_root);

    let registry = TransformRegistry::new();
    let ctx = JobContext::new(&data_root, &output_root);
    run_jobs(&registry, &["industry".to_string()], &ctx).unwrap();

    let report_path = output_root.join("run_report.json");
    assert!(report_path.exists());
    let value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&report_path).unwrap()).unwrap();
    assert_eq!(value["reports"][0]["job"], "industry");
    assert_eq!(value["reports"][0]["entities_written"], 2);
    assert!(value["failures"].as_array().unwrap().is_empty());
}

#[test]
fn rerun_regenerates_outputs_wholesale() {
    let temp = tempdir().unwrap();
    let data_root = temp.path().join("data");
    let output_root = temp.path().join("output");
    write_industry_fixture(&data_root);

    let registry = TransformRegistry::new();
    let ctx = JobContext::new(&data_root, &output_root);
    run_jobs(&registry, &["industry".to_string()], &ctx).unwrap();

    // Shrink the source and re-run: the output reflects only the new data.
    fs::write(
        data_root.join("industry/naics_codes.tsv"),
        "Code\tTitle\tDescription\n11\tAgriculture\t\n",
    )
    .unwrap();
    run_jobs(&registry, &["industry".to_string()], &ctx).unwrap();

    let entities = parse_file(output_root.join(INDUSTRY_NS).join("industries.tsv")).unwrap();
    assert_eq!(entities.rows.len(), 1);
}
