#![forbid(unsafe_code)]
//! iquery-core: shared vocabulary for the query pipeline.
//!
//! - `Sequence`/`Source`: the keyed, lazy, forward-only sequence every stage
//!   consumes and produces, and the capability that yields one.
//! - `Interval`: validated offset/limit pair.
//! - `Cursor`: read-only position snapshot handed to user callables.
//! - `PipelineConfig`: serde-friendly configuration (state policy, window).
//!
//! No stage logic lives here; see `iquery-operators` and `iquery-exec`.

pub mod config;
pub mod cursor;
pub mod error;
pub mod interval;
pub mod nested;
pub mod prelude;
pub mod sequence;

pub use config::{PipelineConfig, StatePolicy};
pub use cursor::Cursor;
pub use error::{QueryError, Result};
pub use interval::Interval;
pub use nested::Nested;
pub use sequence::{Factory, Key, Keyed, Sequence, SinglePass, Source};
