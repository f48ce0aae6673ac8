//! Keyed lazy sequences and the sources that produce them.
//!
//! A `Sequence` is the only currency between stages: a boxed forward-only
//! iterator of `(key, element)` pairs. Keys are positional (`0..n`) unless the
//! source supplies its own, and stages carry them through unchanged.
//!
//! A `Source` is borrowed, never owned: the pipeline asks it for a fresh
//! sequence on every build. Whether a second request restarts from the
//! beginning is the source's own contract (see `SinglePass`).

use std::marker::PhantomData;

/// Positional key attached to every element.
pub type Key = usize;

/// Lazy, forward-only keyed sequence.
pub type Sequence<'a, T> = Box<dyn Iterator<Item = (Key, T)> + 'a>;

/// Capability to produce a lazy keyed sequence.
pub trait Source {
    type Item;

    /// Produce the sequence for one pipeline build.
    fn sequence(&mut self) -> Sequence<'_, Self::Item>;
}

/// Restartable source: yields clones of the buffered elements on every build.
impl<T: Clone> Source for Vec<T> {
    type Item = T;

    fn sequence(&mut self) -> Sequence<'_, T> {
        Box::new(self.iter().cloned().enumerate())
    }
}

/// Restartable source borrowing its elements.
impl<'s, T> Source for &'s [T] {
    type Item = &'s T;

    fn sequence(&mut self) -> Sequence<'_, &'s T> {
        let slice: &'s [T] = *self;
        Box::new(slice.iter().enumerate())
    }
}

/// Restartable source backed by a factory closure, keyed `0..n`.
pub struct Factory<'s, F> {
    make: F,
    _borrow: PhantomData<&'s ()>,
}

impl<'s, F> Factory<'s, F> {
    pub fn new(make: F) -> Self {
        Self {
            make,
            _borrow: PhantomData,
        }
    }
}

impl<'s, F, I> Source for Factory<'s, F>
where
    F: FnMut() -> I,
    I: IntoIterator,
    I::IntoIter: 's,
{
    type Item = I::Item;

    fn sequence(&mut self) -> Sequence<'_, I::Item> {
        Box::new((self.make)().into_iter().enumerate())
    }
}

/// Restartable source whose factory supplies its own keys.
pub struct Keyed<'s, F> {
    make: F,
    _borrow: PhantomData<&'s ()>,
}

impl<'s, F> Keyed<'s, F> {
    pub fn new(make: F) -> Self {
        Self {
            make,
            _borrow: PhantomData,
        }
    }
}

impl<'s, F, I, T> Source for Keyed<'s, F>
where
    F: FnMut() -> I,
    I: IntoIterator<Item = (Key, T)>,
    I::IntoIter: 's,
{
    type Item = T;

    fn sequence(&mut self) -> Sequence<'_, T> {
        Box::new((self.make)().into_iter())
    }
}

/// Single-pass source over an already-open iterator.
///
/// The first build drains the iterator; every later build sees an empty
/// sequence.
pub struct SinglePass<I> {
    iter: Option<I>,
}

impl<I: Iterator> SinglePass<I> {
    pub fn new(iter: I) -> Self {
        Self { iter: Some(iter) }
    }

    pub fn is_spent(&self) -> bool {
        self.iter.is_none()
    }
}

impl<I: Iterator> Source for SinglePass<I> {
    type Item = I::Item;

    fn sequence(&mut self) -> Sequence<'_, I::Item> {
        match self.iter.take() {
            Some(iter) => Box::new(iter.enumerate()),
            None => Box::new(std::iter::empty()),
        }
    }
}
