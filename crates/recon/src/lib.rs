//! `resift-recon` — report-vs-dump reconciliation engine.
//!
//! Pure engine crate: receives pre-loaded datasets, returns the cleaned
//! dump plus counters. No CLI or IO dependencies.

pub mod config;
pub mod engine;
pub mod error;
pub mod model;

pub use config::ReconConfig;
pub use engine::reconcile;
pub use error::ReconError;
pub use model::{Dataset, Diagnostic, ReconResult};
