//! Intake and evaluation of membership applications for a curated creative community.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
