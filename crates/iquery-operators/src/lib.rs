#![forbid(unsafe_code)]
//! iquery-operators: the four pipeline stages.
//!
//! Every stage owns a small registry and exposes `apply(sequence) -> sequence`.
//! Filtering, windowing and projection wrap the input in lazy adapters; sorting
//! is the one stage that buffers its whole input before yielding anything.

pub mod callable;
pub mod plan;
pub mod registry;
pub mod traits;

pub mod filter;
pub mod interval;
pub mod project;
pub mod sort;

pub use callable::{Comparator, Predicate, Projector};
pub use filter::FilterStage;
pub use interval::IntervalStage;
pub use plan::StagePlan;
pub use project::ProjectStage;
pub use registry::Registry;
pub use sort::SortStage;
pub use traits::Stage;
