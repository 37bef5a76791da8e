use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;
use wta_stats::cli::Cli;
use wta_stats::config::ReportConfig;
use wta_stats::html_output::{HtmlReport, ReportContent};
use wta_stats::job_arrival::{self, IMAGE_EXTENSION};
use wta_stats::trace_loader;

/// Initialize tracing subscriber for debug output
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::DEBUG.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    }
}

/// Merge the optional config file with command-line overrides
fn resolve_config(args: &Cli) -> Result<ReportConfig> {
    let mut config = match &args.config {
        Some(path) => ReportConfig::from_file(path)?,
        None => ReportConfig::default(),
    };

    if let Some(trace) = &args.trace {
        config.trace = Some(trace.clone());
    }
    if let Some(workload) = &args.workload {
        config.workload_name = Some(workload.clone());
    }
    if let Some(output) = &args.output {
        config.output_folder = output.clone();
    }
    if args.html {
        config.html_report = true;
    }
    if args.no_html {
        config.html_report = false;
    }

    Ok(config)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    let config = resolve_config(&args)?;

    let Some(trace) = &config.trace else {
        anyhow::bail!("Must specify a trace file with --trace or in the config file");
    };
    let Some(workload) = config.workload_name.as_deref() else {
        anyhow::bail!("Must specify a workload name with --workload or in the config file");
    };
    if workload.is_empty() {
        anyhow::bail!("Workload name must not be empty");
    }

    let records = trace_loader::load_arrivals(trace)?;

    let output = job_arrival::generate(&records, workload, &config.output_folder)
        .context("Failed to generate job arrival graph")?;
    let image = output.1.clone();

    println!(
        "{}",
        config
            .output_folder
            .join(format!("{}.{}", image, IMAGE_EXTENSION))
            .display()
    );

    if config.html_report {
        let mut report = HtmlReport::new(workload);
        report.add_section("Job arrivals", ReportContent::from(output));
        let path = report.write_to(&config.output_folder)?;
        println!("{}", path.display());
    }

    Ok(())
}
