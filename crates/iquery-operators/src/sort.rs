//! ORDER BY: stable multi-key sort.
//!
//! Comparators form a tie-break chain: the first one is consulted for every
//! pair, the next one only when all earlier ones answered `Equal`.
//!
//! Performance contract: a sort stage with at least one comparator drains the
//! *entire* upstream sequence (everything the filters let through) into a
//! buffer on the first pull, before the window or the projector see a single
//! element. An empty sort stage keeps the pipeline fully lazy.

use std::cmp::Ordering;

use iquery_core::sequence::{Key, Sequence};

use crate::callable::Comparator;
use crate::registry::Registry;
use crate::traits::Stage;

const STAGE: &str = "sort";

#[derive(Debug)]
pub struct SortStage<T> {
    comparators: Registry<Comparator<T>>,
}

impl<T> Default for SortStage<T> {
    fn default() -> Self {
        Self {
            comparators: Registry::new(),
        }
    }
}

impl<T> SortStage<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a comparator to the tie-break chain.
    pub fn add(&mut self, comparator: Comparator<T>) -> &mut Self {
        self.comparators.push(comparator);
        self
    }

    #[deprecated(note = "use `add`; `set_sort_by` appends like `add` does")]
    pub fn set_sort_by(&mut self, comparator: Comparator<T>) -> &mut Self {
        self.add(comparator)
    }

    /// Remove the first registration of `comparator`, if any.
    pub fn remove(&mut self, comparator: &Comparator<T>) -> &mut Self {
        self.comparators.remove_first(comparator);
        self
    }

    pub fn has(&self, comparator: &Comparator<T>) -> bool {
        self.comparators.contains(comparator)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.comparators.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.comparators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.comparators.is_empty()
    }

    /// Sort `input` by the tie-break chain. Returns `input` untouched when no
    /// comparator is registered.
    ///
    /// Elements keep the keys they had upstream.
    pub fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, T>
    where
        T: 'a,
    {
        if self.comparators.is_empty() {
            return input;
        }
        Box::new(Sorted {
            pending: Some(input),
            comparators: self.comparators.as_slice().to_vec(),
            buffer: Vec::new().into_iter(),
        })
    }
}

impl<T> Stage<T> for SortStage<T> {
    type Out = T;

    fn name(&self) -> &'static str {
        STAGE
    }

    fn registered(&self) -> usize {
        self.len()
    }

    fn is_passthrough(&self) -> bool {
        self.is_empty()
    }

    fn materializes(&self) -> bool {
        true
    }

    fn clear(&mut self) {
        SortStage::clear(self);
    }

    fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, T>
    where
        T: 'a,
        Self::Out: 'a,
    {
        SortStage::apply(self, input)
    }
}

/// Consult `comparators` in order until one returns a non-`Equal` verdict.
pub fn tie_break<T>(comparators: &[Comparator<T>], a: &T, b: &T) -> Ordering {
    comparators
        .iter()
        .map(|c| c.compare(a, b))
        .find(|ord| ord.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Drain `input` into a buffer sorted by the tie-break chain.
///
/// `sort_by` is a stable merge sort, so elements the whole chain deems equal
/// keep their relative input order.
pub fn sort_buffer<T>(
    input: impl Iterator<Item = (Key, T)>,
    comparators: &[Comparator<T>],
) -> Vec<(Key, T)> {
    let mut buffer: Vec<(Key, T)> = input.collect();
    buffer.sort_by(|(_, a), (_, b)| tie_break(comparators, a, b));
    buffer
}

struct Sorted<'a, T> {
    pending: Option<Sequence<'a, T>>,
    comparators: Vec<Comparator<T>>,
    buffer: std::vec::IntoIter<(Key, T)>,
}

impl<T> Iterator for Sorted<'_, T> {
    type Item = (Key, T);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(input) = self.pending.take() {
            let sorted = sort_buffer(input, &self.comparators);
            #[cfg(feature = "tracing")]
            tracing::trace!(
                stage = STAGE,
                rows = sorted.len(),
                comparators = self.comparators.len(),
                "materialized"
            );
            self.buffer = sorted.into_iter();
        }
        self.buffer.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.pending {
            Some(input) => input.size_hint(),
            None => self.buffer.size_hint(),
        }
    }
}
