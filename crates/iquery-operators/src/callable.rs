//! Shared callable handles with identity semantics.
//!
//! Closures have no meaningful equality, so each handle wraps its callable in
//! an `Rc` and compares by pointer: clones of one handle are the same
//! registration target, two handles built from identical closures are not.

use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;

use iquery_core::cursor::Cursor;
use iquery_core::sequence::Key;

/// `(element, key, cursor) -> keep?`
pub struct Predicate<T>(Rc<dyn Fn(&T, Key, &Cursor) -> bool>);

impl<T> Predicate<T> {
    pub fn new(f: impl Fn(&T, Key, &Cursor) -> bool + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Predicate that only looks at the element.
    pub fn from_value(f: impl Fn(&T) -> bool + 'static) -> Self
    where
        T: 'static,
    {
        Self::new(move |value, _, _| f(value))
    }

    pub fn test(&self, value: &T, key: Key, cursor: &Cursor) -> bool {
        (self.0)(value, key, cursor)
    }

    /// Reference identity.
    pub fn same(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

/// `(a, b) -> Ordering`
pub struct Comparator<T>(Rc<dyn Fn(&T, &T) -> Ordering>);

impl<T> Comparator<T> {
    pub fn new(f: impl Fn(&T, &T) -> Ordering + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Compare by a derived key.
    pub fn by_key<K: Ord + 'static>(f: impl Fn(&T) -> K + 'static) -> Self
    where
        T: 'static,
    {
        Self::new(move |a, b| f(a).cmp(&f(b)))
    }

    /// The element type's own ordering.
    pub fn natural() -> Self
    where
        T: Ord + 'static,
    {
        Self::new(|a: &T, b: &T| a.cmp(b))
    }

    /// A new comparator with the opposite verdicts. It has its own identity.
    pub fn reversed(&self) -> Self
    where
        T: 'static,
    {
        let inner = Rc::clone(&self.0);
        Self::new(move |a, b| inner(a, b).reverse())
    }

    pub fn compare(&self, a: &T, b: &T) -> Ordering {
        (self.0)(a, b)
    }

    pub fn same(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

/// `(element, key, cursor) -> new element`
pub struct Projector<T, U>(Rc<dyn Fn(T, Key, &Cursor) -> U>);

impl<T, U> Projector<T, U> {
    pub fn new(f: impl Fn(T, Key, &Cursor) -> U + 'static) -> Self {
        Self(Rc::new(f))
    }

    pub fn from_value(f: impl Fn(T) -> U + 'static) -> Self
    where
        T: 'static,
        U: 'static,
    {
        Self::new(move |value, _, _| f(value))
    }

    pub fn project(&self, value: T, key: Key, cursor: &Cursor) -> U {
        (self.0)(value, key, cursor)
    }

    pub fn same(&self, other: &Self) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }
}

macro_rules! handle_impls {
    ($name:ident < $($p:ident),+ >) => {
        impl<$($p),+> Clone for $name<$($p),+> {
            fn clone(&self) -> Self {
                Self(Rc::clone(&self.0))
            }
        }

        impl<$($p),+> PartialEq for $name<$($p),+> {
            fn eq(&self, other: &Self) -> bool {
                self.same(other)
            }
        }

        impl<$($p),+> Eq for $name<$($p),+> {}

        impl<$($p),+> fmt::Debug for $name<$($p),+> {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({:p})", stringify!($name), Rc::as_ptr(&self.0) as *const ())
            }
        }
    };
}

handle_impls!(Predicate<T>);
handle_impls!(Comparator<T>);
handle_impls!(Projector<T, U>);
