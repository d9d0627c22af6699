use crate::error::{EtlError, Result};
use crate::transforms::{JobContext, JobReport, TransformRegistry};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use tracing::{error, info};

/// One job's failure, kept alongside the successes in the batch report.
#[derive(Debug, Clone, Serialize)]
pub struct JobFailure {
    pub job: String,
    pub error: String,
}

/// Result of a complete batch run.
#[derive(Debug, Serialize)]
pub struct BatchReport {
    pub started_at: DateTime<Utc>,
    pub duration_seconds: f64,
    pub reports: Vec<JobReport>,
    pub failures: Vec<JobFailure>,
}

impl BatchReport {
    pub fn failed(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Run a single named job. Unknown names and missing source files are
/// per-job errors; they never touch sibling jobs.
pub fn run_job(registry: &TransformRegistry, name: &str, ctx: &JobContext) -> Result<JobReport> {
    let transform = registry.get(name).ok_or_else(|| EtlError::Job {
        job: name.to_string(),
        message: "unknown job name".to_string(),
    })?;

    let source = ctx.data_root.join(transform.source_file());
    if !source.exists() {
        return Err(EtlError::SourceNotFound(source));
    }

    info!("starting job {}", name);
    transform.run(ctx).map_err(|e| EtlError::Job {
        job: name.to_string(),
        message: e.to_string(),
    })
}

/// Run each named job independently. A failing job is counted and logged
/// but never aborts its siblings; previously written outputs are left as-is.
/// The batch report is persisted as pretty JSON under the output root.
pub fn run_jobs(registry: &TransformRegistry, names: &[String], ctx: &JobContext) -> Result<BatchReport> {
    let started_at = Utc::now();
    let t_batch = std::time::Instant::now();

    let mut reports = Vec::new();
    let mut failures = Vec::new();

    for name in names {
        match run_job(registry, name, ctx) {
            Ok(report) => {
                info!(
                    "job {} finished: {} entities, {} relationships",
                    name, report.entities_written, report.relationships_written
                );
                reports.push(report);
            }
            Err(e) => {
                error!("job {} failed: {}", name, e);
                failures.push(JobFailure {
                    job: name.clone(),
                    error: e.to_string(),
                });
            }
        }
    }

    let report = BatchReport {
        started_at,
        duration_seconds: t_batch.elapsed().as_secs_f64(),
        reports,
        failures,
    };
    persist_report(&report, ctx)?;
    Ok(report)
}

/// Persist the batch report to `run_report.json` under the output root.
fn persist_report(report: &BatchReport, ctx: &JobContext) -> Result<()> {
    fs::create_dir_all(&ctx.output_root)?;
    let path = ctx.output_root.join("run_report.json");
    let json = serde_json::to_string_pretty(report)?;
    fs::write(&path, json)?;
    info!("batch report written to {}", path.display());
    Ok(())
}
