#![forbid(unsafe_code)]
//! iquery-exec: the pipeline orchestrator and its terminal operations.
//!
//! `Pipeline` owns a source and one instance of each stage, and composes them
//! in the fixed order filter → sort → interval → project on every build.

pub mod metrics;
pub mod pipeline;

pub use pipeline::Pipeline;
