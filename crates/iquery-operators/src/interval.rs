//! LIMIT/OFFSET windowing.

use iquery_core::error::Result;
use iquery_core::interval::Interval;
use iquery_core::sequence::Sequence;

use crate::traits::Stage;

const STAGE: &str = "interval";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalStage {
    window: Interval,
}

impl IntervalStage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_window(window: Interval) -> Self {
        Self { window }
    }

    /// Replace the offset. Fails with `InvalidArgument` when `offset < 0`.
    pub fn set_offset(&mut self, offset: i64) -> Result<&mut Self> {
        self.window = self.window.with_offset(Interval::checked_offset(offset)?);
        Ok(self)
    }

    /// Replace the limit; `-1` means unbounded. Fails with `InvalidArgument`
    /// when `limit < -1`.
    pub fn set_limit(&mut self, limit: i64) -> Result<&mut Self> {
        self.window = self.window.with_limit(Interval::checked_limit(limit)?);
        Ok(self)
    }

    pub fn offset(&self) -> usize {
        self.window.offset()
    }

    pub fn limit(&self) -> Option<usize> {
        self.window.limit()
    }

    pub fn window(&self) -> Interval {
        self.window
    }

    /// Back to `{offset: 0, limit: -1}`.
    pub fn reset(&mut self) -> &mut Self {
        self.window = Interval::UNBOUNDED;
        self
    }

    pub fn apply<'a, T: 'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, T> {
        window(input, self.window)
    }
}

/// Skip `offset` elements, then yield at most `limit`. Too-short input yields
/// an empty sequence.
pub fn window<'a, T: 'a>(input: Sequence<'a, T>, window: Interval) -> Sequence<'a, T> {
    if window.is_unbounded() {
        return input;
    }

    #[cfg(feature = "tracing")]
    tracing::trace!(
        stage = STAGE,
        offset = window.offset(),
        limit = ?window.limit(),
        "apply"
    );

    let skipped = input.skip(window.offset());
    match window.limit() {
        Some(limit) => Box::new(skipped.take(limit)),
        None => Box::new(skipped),
    }
}

/// Element-agnostic: the same window applies to any element type.
impl<T> Stage<T> for IntervalStage {
    type Out = T;

    fn name(&self) -> &'static str {
        STAGE
    }

    fn registered(&self) -> usize {
        usize::from(!self.window.is_unbounded())
    }

    fn is_passthrough(&self) -> bool {
        self.window.is_unbounded()
    }

    fn clear(&mut self) {
        self.reset();
    }

    fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, T>
    where
        T: 'a,
        Self::Out: 'a,
    {
        window(input, self.window)
    }
}
