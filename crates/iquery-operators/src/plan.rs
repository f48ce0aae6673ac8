//! Stage planning surface: `StagePlan`.
//!
//! A snapshot of what a stage would do if the pipeline were built now. Used by
//! `Pipeline::explain` and the CLI.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StagePlan {
    pub stage: &'static str,

    /// Registered operations (predicates, comparators, window, projector).
    pub registered: usize,

    /// The stage returns its input unchanged.
    pub passthrough: bool,

    /// The stage buffers the whole upstream sequence.
    pub materializes: bool,
}
