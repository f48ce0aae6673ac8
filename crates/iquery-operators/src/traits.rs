//! Stage trait + common interface.
//!
//! The pipeline calls `apply(...)` on each stage in a fixed order
//! (filter, sort, interval, project) and uses `plan()` for introspection.

use iquery_core::sequence::Sequence;

use crate::plan::StagePlan;

/// Trait that all pipeline stages implement.
///
/// Invariants:
/// - `apply` never pulls from its input unless the stage materializes
///   (`materializes() == true`), and then only once the output is pulled.
/// - A passthrough stage returns its input unchanged.
pub trait Stage<In> {
    type Out;

    /// Human-readable stage name (stable).
    fn name(&self) -> &'static str;

    /// Number of registered operations (predicates, comparators, ...).
    fn registered(&self) -> usize;

    /// True when `apply` would hand the input back untouched.
    fn is_passthrough(&self) -> bool;

    /// True when the stage buffers its whole input before yielding.
    fn materializes(&self) -> bool {
        false
    }

    /// Reset the stage to its empty state.
    fn clear(&mut self);

    /// Wrap `input` in this stage's adapter.
    fn apply<'a>(&self, input: Sequence<'a, In>) -> Sequence<'a, Self::Out>
    where
        In: 'a,
        Self::Out: 'a;

    fn plan(&self) -> StagePlan {
        StagePlan {
            stage: self.name(),
            registered: self.registered(),
            passthrough: self.is_passthrough(),
            materializes: self.materializes() && !self.is_passthrough(),
        }
    }
}
