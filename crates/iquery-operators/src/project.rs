//! SELECT: element projection.

use iquery_core::cursor::Cursor;
use iquery_core::sequence::Sequence;

use crate::callable::Projector;
use crate::traits::Stage;

const STAGE: &str = "project";

/// Holds at most one projector from `T` to `U`.
///
/// Without a projector, elements go through `Into<U>`, which is the identity
/// when `U == T`.
#[derive(Debug)]
pub struct ProjectStage<T, U = T> {
    projector: Option<Projector<T, U>>,
}

impl<T, U> Default for ProjectStage<T, U> {
    fn default() -> Self {
        Self { projector: None }
    }
}

impl<T, U> ProjectStage<T, U> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the projector; `None` clears it.
    pub fn set(&mut self, projector: Option<Projector<T, U>>) -> &mut Self {
        self.projector = projector;
        self
    }

    pub fn get(&self) -> Option<&Projector<T, U>> {
        self.projector.as_ref()
    }

    pub fn clear(&mut self) -> &mut Self {
        self.projector = None;
        self
    }

    pub fn is_set(&self) -> bool {
        self.projector.is_some()
    }

    /// Lazily map every element; keys are preserved.
    pub fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, U>
    where
        T: Into<U> + 'a,
        U: 'a,
    {
        let Some(projector) = self.projector.clone() else {
            return Box::new(input.map(|(key, value)| (key, value.into())));
        };

        #[cfg(feature = "tracing")]
        tracing::trace!(stage = STAGE, "apply");

        Box::new(input.enumerate().map(move |(position, (key, value))| {
            let cursor = Cursor::new(STAGE, position, 0);
            (key, projector.project(value, key, &cursor))
        }))
    }
}

impl<T: Into<U>, U> Stage<T> for ProjectStage<T, U> {
    type Out = U;

    fn name(&self) -> &'static str {
        STAGE
    }

    fn registered(&self) -> usize {
        usize::from(self.is_set())
    }

    fn is_passthrough(&self) -> bool {
        !self.is_set()
    }

    fn clear(&mut self) {
        ProjectStage::clear(self);
    }

    fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, U>
    where
        T: 'a,
        Self::Out: 'a,
    {
        ProjectStage::apply(self, input)
    }
}
