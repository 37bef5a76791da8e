//! wta-stats - Workload trace statistics
//!
//! This library buckets job arrivals of a workload trace at second, minute,
//! hour and day granularity and renders them as a 2x2 arrival graph. It also
//! describes the task-state record schema used for resource-usage samples.

pub mod arrival;
pub mod canvas;
pub mod cli;
pub mod config;
pub mod granularity;
pub mod html_output;
pub mod job_arrival;
pub mod task_state;
pub mod trace_loader;
