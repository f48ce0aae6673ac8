/// Capability of elements that carry a child sequence of their own kind.
///
/// Recursive filters use it to prune children with the same predicate.
/// Returning `None` marks a leaf; the element is then filtered like any other.
pub trait Nested: Sized {
    fn children_mut(&mut self) -> Option<&mut Vec<Self>>;
}
