//! Stylesheet generation and post-processing.

pub mod generator;
pub mod optimizer;

pub use generator::generate;
pub use optimizer::{
    deduplicate, minify, optimize, validate, OptimizationReport, ValidationIssue,
};
