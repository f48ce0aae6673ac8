//! WHERE: ordered predicate filtering.
//!
//! Each registered predicate becomes one lazy adapter around the sequence, so
//! registering `p1` then `p2` behaves as `p1 && p2`. An entry registered as
//! recursive also prunes the children of every accepted element with the same
//! predicate, descending through `Nested`.

use std::fmt;

use iquery_core::cursor::Cursor;
use iquery_core::nested::Nested;
use iquery_core::sequence::{Key, Sequence};

use crate::callable::Predicate;
use crate::registry::Registry;
use crate::traits::Stage;

const STAGE: &str = "filter";

/// Descent strategy, fixed when the entry is registered.
enum Mode<T> {
    Standard,
    /// Prunes the children of an accepted element. Monomorphized at
    /// registration time, where `T: Nested` is known.
    Recursive(fn(&mut T, &Predicate<T>, &Cursor)),
}

struct FilterEntry<T> {
    predicate: Predicate<T>,
    mode: Mode<T>,
}

impl<T> FilterEntry<T> {
    fn standard(predicate: Predicate<T>) -> Self {
        Self {
            predicate,
            mode: Mode::Standard,
        }
    }

    fn recursive(predicate: Predicate<T>) -> Self
    where
        T: Nested,
    {
        Self {
            predicate,
            mode: Mode::Recursive(prune::<T>),
        }
    }

    fn is_recursive(&self) -> bool {
        matches!(self.mode, Mode::Recursive(_))
    }
}

impl<T> Clone for FilterEntry<T> {
    fn clone(&self) -> Self {
        let mode = match self.mode {
            Mode::Standard => Mode::Standard,
            Mode::Recursive(descend) => Mode::Recursive(descend),
        };
        Self {
            predicate: self.predicate.clone(),
            mode,
        }
    }
}

/// Identity is the `(mode, predicate)` pair.
impl<T> PartialEq for FilterEntry<T> {
    fn eq(&self, other: &Self) -> bool {
        self.is_recursive() == other.is_recursive() && self.predicate.same(&other.predicate)
    }
}

impl<T> fmt::Debug for FilterEntry<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilterEntry")
            .field("predicate", &self.predicate)
            .field("recursive", &self.is_recursive())
            .finish()
    }
}

fn prune<T: Nested>(node: &mut T, predicate: &Predicate<T>, parent: &Cursor) {
    let Some(children) = node.children_mut() else {
        return;
    };
    let pending = std::mem::take(children);
    for (key, mut child) in pending.into_iter().enumerate() {
        let cursor = parent.descend(key);
        if predicate.test(&child, key, &cursor) {
            prune(&mut child, predicate, &cursor);
            children.push(child);
        }
    }
}

#[derive(Debug)]
pub struct FilterStage<T> {
    entries: Registry<FilterEntry<T>>,
}

impl<T> Default for FilterStage<T> {
    fn default() -> Self {
        Self {
            entries: Registry::new(),
        }
    }
}

impl<T> FilterStage<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a predicate. The same predicate may be registered more than once.
    pub fn add(&mut self, predicate: Predicate<T>) -> &mut Self {
        self.entries.push(FilterEntry::standard(predicate));
        self
    }

    #[deprecated(note = "use `add`; `set_filter` appends like `add` does")]
    pub fn set_filter(&mut self, predicate: Predicate<T>) -> &mut Self {
        self.add(predicate)
    }

    /// Remove the first standard registration of `predicate`, if any.
    pub fn remove(&mut self, predicate: &Predicate<T>) -> &mut Self {
        self.entries
            .remove_first(&FilterEntry::standard(predicate.clone()));
        self
    }

    pub fn has(&self, predicate: &Predicate<T>) -> bool {
        self.entries
            .contains(&FilterEntry::standard(predicate.clone()))
    }

    pub fn clear(&mut self) -> &mut Self {
        self.entries.clear();
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Wrap `input` in one lazy filtering adapter per registered predicate.
    pub fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, T>
    where
        T: 'a,
    {
        #[cfg(feature = "tracing")]
        tracing::trace!(stage = STAGE, predicates = self.entries.len(), "apply");

        self.entries.iter().fold(input, |seq, entry| -> Sequence<'a, T> {
            Box::new(Filtered {
                input: seq,
                entry: entry.clone(),
                pulled: 0,
            })
        })
    }
}

impl<T: Nested> FilterStage<T> {
    /// Append a predicate that also prunes nested children.
    pub fn add_recursive(&mut self, predicate: Predicate<T>) -> &mut Self {
        self.entries.push(FilterEntry::recursive(predicate));
        self
    }

    /// Remove the first recursive registration of `predicate`, if any.
    pub fn remove_recursive(&mut self, predicate: &Predicate<T>) -> &mut Self {
        self.entries
            .remove_first(&FilterEntry::recursive(predicate.clone()));
        self
    }

    pub fn has_recursive(&self, predicate: &Predicate<T>) -> bool {
        self.entries
            .contains(&FilterEntry::recursive(predicate.clone()))
    }
}

impl<T> Stage<T> for FilterStage<T> {
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

    fn clear(&mut self) {
        FilterStage::clear(self);
    }

    fn apply<'a>(&self, input: Sequence<'a, T>) -> Sequence<'a, T>
    where
        T: 'a,
        Self::Out: 'a,
    {
        FilterStage::apply(self, input)
    }
}

struct Filtered<'a, T> {
    input: Sequence<'a, T>,
    entry: FilterEntry<T>,
    pulled: usize,
}

impl<T> Iterator for Filtered<'_, T> {
    type Item = (Key, T);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let (key, mut value) = self.input.next()?;
            let cursor = Cursor::new(STAGE, self.pulled, 0);
            self.pulled += 1;

            if !self.entry.predicate.test(&value, key, &cursor) {
                continue;
            }
            if let Mode::Recursive(descend) = self.entry.mode {
                descend(&mut value, &self.entry.predicate, &cursor);
            }
            return Some((key, value));
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (0, self.input.size_hint().1)
    }
}
