/// Behavior shared by groups and tasks, so sibling-level algorithms
/// (reorder, re-densify) work on either list.
pub trait Node: Clone {
    fn id(&self) -> &str;
    fn order(&self) -> usize;
    fn set_order(&mut self, order: usize);
    fn set_open(&mut self, is_open: bool);
    fn rename(&mut self, name: String);
}

/// Rewrite every sibling's `order` to its index.
pub fn renumber<T: Node>(siblings: &mut [T]) {
    for (i, node) in siblings.iter_mut().enumerate() {
        node.set_order(i);
    }
}

/// Whether `order` values are exactly `0..n` in sequence.
pub fn is_dense<T: Node>(siblings: &[T]) -> bool {
    siblings.iter().enumerate().all(|(i, n)| n.order() == i)
}
