//! CLI argument parsing for wta-stats

use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "wta-stats")]
#[command(version)]
#[command(about = "Job arrival graphs for workflow trace archives", long_about = None)]
pub struct Cli {
    /// TOML report configuration; flags override its values
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Trace file with job records (JSON array or JSON lines with ts_submit)
    #[arg(short, long, value_name = "FILE")]
    pub trace: Option<PathBuf>,

    /// Workload name used in output file names
    #[arg(short, long, value_name = "NAME")]
    pub workload: Option<String>,

    /// Existing directory receiving the graph
    #[arg(short, long, value_name = "DIR")]
    pub output: Option<PathBuf>,

    /// Also write an HTML report embedding the graph
    #[arg(long)]
    pub html: bool,

    /// Skip the HTML report even if the configuration enables it
    #[arg(long, conflicts_with = "html")]
    pub no_html: bool,

    /// Enable debug tracing output on stderr
    #[arg(long)]
    pub debug: bool,
}
