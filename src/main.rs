use clap::{Parser, Subcommand};
use refgraph::pipeline::run_jobs;
use refgraph::transforms::{JobContext, TransformRegistry};
use refgraph::{constants, logging, Config};
use std::path::PathBuf;
use tracing::warn;

#[derive(Parser)]
#[command(name = "refgraph")]
#[command(about = "Converts reference classification datasets into a tab-delimited entity graph")]
#[command(version = "0.1.0")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run conversion jobs
    Run {
        /// Specific jobs to run (comma-separated). See `list` for the available jobs
        #[arg(long)]
        jobs: Option<String>,
        /// Run every registered job
        #[arg(long)]
        all: bool,
        /// Override the source data directory
        #[arg(long)]
        data_root: Option<PathBuf>,
        /// Override the output directory
        #[arg(long)]
        output_root: Option<PathBuf>,
    },
    /// List the available jobs and their source files
    List,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init_logging();

    let cli = Cli::parse();
    let registry = TransformRegistry::new();

    match cli.command {
        Commands::Run {
            jobs,
            all,
            data_root,
            output_root,
        } => {
            let mut config = Config::load()?;
            if let Some(root) = data_root {
                config.data_root = root;
            }
            if let Some(root) = output_root {
                config.output_root = root;
            }

            let job_names: Vec<String> = if all {
                constants::supported_jobs().iter().map(|j| j.to_string()).collect()
            } else if let Some(list) = jobs {
                list.split(',').map(|s| s.trim().to_string()).collect()
            } else {
                eprintln!("Nothing to do: pass --jobs <a,b,...> or --all");
                std::process::exit(2);
            };

            println!("🔄 Running {} job(s)...", job_names.len());
            let ctx = JobContext::new(config.data_root, config.output_root);
            let batch = run_jobs(&registry, &job_names, &ctx)?;

            for report in &batch.reports {
                println!(
                    "📊 {}: {} rows read, {} entities, {} relationships",
                    report.job, report.rows_read, report.entities_written, report.relationships_written
                );
                for output in &report.outputs {
                    println!("   wrote {}", output);
                }
            }
            if batch.failed() {
                warn!("{} job(s) failed", batch.failures.len());
                println!("\n⚠️  Failures:");
                for failure in &batch.failures {
                    println!("   - {}: {}", failure.job, failure.error);
                }
                std::process::exit(1);
            }
            println!("✅ Batch completed in {:.2}s", batch.duration_seconds);
        }
        Commands::List => {
            println!("Available jobs:");
            for name in constants::supported_jobs() {
                if let Some(transform) = registry.get(name) {
                    println!("  {:<22} reads {}", name, transform.source_file());
                }
            }
        }
    }
    Ok(())
}
