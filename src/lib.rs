//! Checks that every top-level dataset of a workload profile file is long
//! enough along its first axis.

pub mod check;
pub mod config;
pub mod data;
pub mod error;
pub mod report;

pub use check::{CheckOptions, Verdict, check_container, run};
pub use config::CheckConfig;
pub use error::CheckError;
pub use report::{CheckReport, ReportFormat};
