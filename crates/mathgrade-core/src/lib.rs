//! mathgrade-core: scoring and feedback for math assessments.
//!
//! This crate grades a learner's batch of attempt records, aggregates the
//! results per topic, and turns them into feedback text and a remediation
//! plan. Everything is synchronous and pure; see [`engine::generate_report`].

pub mod engine;
pub mod error;
pub mod evaluator;
pub mod factor_tree;
pub mod feedback;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod plan;
pub mod report;
pub mod results;
pub mod scalar;
pub mod statistics;
pub mod table;
pub mod traits;

pub use engine::{generate_report, generate_report_from_value};
pub use report::Report;
