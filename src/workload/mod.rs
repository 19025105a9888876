// src/workload/mod.rs

pub mod service;
pub mod types;

pub use service::WorkloadService;
pub use types::{DashboardMetrics, UserWorkload};
