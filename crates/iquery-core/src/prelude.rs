//! Convenient re-exports for downstream crates.

pub use crate::config::{PipelineConfig, StatePolicy};
pub use crate::cursor::Cursor;
pub use crate::error::{QueryError, Result};
pub use crate::interval::Interval;
pub use crate::nested::Nested;
pub use crate::sequence::{Factory, Key, Keyed, Sequence, SinglePass, Source};
