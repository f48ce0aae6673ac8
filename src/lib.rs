#![forbid(unsafe_code)]
//! iquery: lazy, SQL-flavoured queries over keyed sequences.
//!
//! ```
//! use iquery::prelude::*;
//!
//! let mut q = Pipeline::new(vec!["john", "jane", "foo", "bar"]);
//! q.add_filter(Predicate::from_value(|s: &&str| s.contains('o')))
//!     .add_sort_by(Comparator::natural());
//! assert_eq!(q.fetch_all(), vec!["foo", "john"]);
//! ```

pub use iquery_core as core;
pub use iquery_exec as exec;
pub use iquery_operators as operators;

pub use iquery_core::{
    Cursor, Factory, Interval, Key, Keyed, Nested, PipelineConfig, QueryError, Result, Sequence,
    SinglePass, Source, StatePolicy,
};
pub use iquery_exec::Pipeline;
pub use iquery_operators::{Comparator, Predicate, Projector, StagePlan};

pub mod prelude {
    pub use iquery_core::prelude::*;
    pub use iquery_exec::Pipeline;
    pub use iquery_operators::{Comparator, Predicate, Projector};
}
