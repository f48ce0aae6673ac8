//! Position snapshot passed to predicates, projectors and `each` callbacks.

/// Where a callable is being invoked from.
///
/// A stage hands a fresh `Cursor` to every call. `position` counts the
/// elements the stage has pulled from upstream before the current one, so it
/// differs from the element key once an upstream stage has reordered or
/// dropped elements. `depth` is 0 for top-level elements and grows by one per
/// nesting level inside a recursive filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    stage: &'static str,
    position: usize,
    depth: usize,
}

impl Cursor {
    pub const fn new(stage: &'static str, position: usize, depth: usize) -> Self {
        Self {
            stage,
            position,
            depth,
        }
    }

    /// Name of the stage invoking the callable (`"filter"`, `"project"`, ...).
    pub const fn stage(&self) -> &'static str {
        self.stage
    }

    pub const fn position(&self) -> usize {
        self.position
    }

    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Same stage and position, one level deeper.
    pub const fn descend(self, position: usize) -> Self {
        Self {
            stage: self.stage,
            position,
            depth: self.depth + 1,
        }
    }
}
