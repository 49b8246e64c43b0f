pub mod config;
pub mod error;
pub mod reporting;
pub mod review;
pub mod telemetry;
