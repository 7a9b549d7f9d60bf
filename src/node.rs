//! Tree nodes and the list surgery the heap is built from.
//!
//! Every node sits in exactly one circular doubly-linked sibling cycle: the
//! root list, or the child list of its parent. A parent points at one
//! arbitrary member of its child cycle. All links are raw pointers owned by
//! the heap that allocated the node.

use std::{fmt, hash, marker::PhantomData, ptr::NonNull};

use crate::bounds::fibonacci;

/// A pointer to a node
pub(crate) type Link<K, V> = NonNull<Node<K, V>>;

// A node in the heap
#[derive(Debug)]
pub(crate) struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) degree: usize,
    pub(crate) marked: bool,
    pub(crate) parent: Option<Link<K, V>>,
    pub(crate) child: Option<Link<K, V>>,
    pub(crate) left: Link<K, V>,
    pub(crate) right: Link<K, V>,
}

impl<K, V> Node<K, V> {
    /// Allocates an unmarked, childless node that forms a cycle of its own
    pub(crate) fn alloc(key: K, value: V) -> Link<K, V> {
        let node = NonNull::from(Box::leak(Box::new(Node {
            key,
            value,
            degree: 0,
            marked: false,
            parent: None,
            child: None,
            left: NonNull::dangling(),
            right: NonNull::dangling(),
        })));
        make_singleton(node);
        node
    }

    /// Reclaims a node created by [`Node::alloc`].
    ///
    /// The node must no longer be reachable from any heap.
    pub(crate) fn free(node: Link<K, V>) -> Node<K, V> {
        unsafe { *Box::from_raw(node.as_ptr()) }
    }
}

/// Points both sibling links of `node` back at itself
pub(crate) fn make_singleton<K, V>(node: Link<K, V>) {
    unsafe {
        (*node.as_ptr()).left = node;
        (*node.as_ptr()).right = node;
    }
}

/// Joins the cycle holding `other` into the cycle holding `this`, right after
/// `this`. Four pointers change, whatever the cycle lengths.
pub(crate) fn splice<K, V>(this: Link<K, V>, other: Link<K, V>) {
    unsafe {
        let this_right = (*this.as_ptr()).right;
        let other_left = (*other.as_ptr()).left;
        (*this.as_ptr()).right = other;
        (*other.as_ptr()).left = this;
        (*other_left.as_ptr()).right = this_right;
        (*this_right.as_ptr()).left = other_left;
    }
}

/// Takes `node` out of its cycle and leaves it as a singleton
pub(crate) fn unlink<K, V>(node: Link<K, V>) {
    unsafe {
        let left = (*node.as_ptr()).left;
        let right = (*node.as_ptr()).right;
        (*left.as_ptr()).right = right;
        (*right.as_ptr()).left = left;
    }
    make_singleton(node);
}

/// Makes the singleton `child` a child of `parent`. The child loses its mark.
pub(crate) fn add_child<K, V>(parent: Link<K, V>, child: Link<K, V>) {
    unsafe {
        match (*parent.as_ptr()).child {
            Some(first) => splice(first, child),
            None => {
                make_singleton(child);
                (*parent.as_ptr()).child = Some(child);
            }
        }
        (*child.as_ptr()).parent = Some(parent);
        (*child.as_ptr()).marked = false;
        (*parent.as_ptr()).degree += 1;
    }
}

/// Detaches `child` from `parent`, leaving it as a parentless singleton.
/// The mark is left for the caller to settle.
pub(crate) fn remove_child<K, V>(parent: Link<K, V>, child: Link<K, V>) {
    unsafe {
        debug_assert_eq!((*child.as_ptr()).parent, Some(parent), "not a child of this parent");
        if (*parent.as_ptr()).child == Some(child) {
            let next = (*child.as_ptr()).right;
            (*parent.as_ptr()).child = (next != child).then_some(next);
        }
        unlink(child);
        (*child.as_ptr()).parent = None;
        (*parent.as_ptr()).degree -= 1;
    }
}

// An iterator walking a sibling cycle once, starting anywhere in it
#[derive(Debug)]
pub(crate) struct Cycle<K, V> {
    start: Option<Link<K, V>>,
    curr: Option<Link<K, V>>,
}

impl<K, V> Cycle<K, V> {
    pub(crate) fn new(start: Option<Link<K, V>>) -> Self {
        Cycle { start, curr: start }
    }
}

impl<K, V> Iterator for Cycle<K, V> {
    type Item = Link<K, V>;

    fn next(&mut self) -> Option<Self::Item> {
        let curr = self.curr?;
        let next = unsafe { (*curr.as_ptr()).right };
        self.curr = (Some(next) != self.start).then_some(next);
        Some(curr)
    }
}

/// The direct children of `node`, in child-cycle order
pub(crate) fn children<K, V>(node: Link<K, V>) -> Cycle<K, V> {
    Cycle::new(unsafe { (*node.as_ptr()).child })
}

/// Number of nodes in the subtree rooted at `node`, walked with an explicit stack
pub(crate) fn subtree_size<K, V>(node: Link<K, V>) -> usize {
    let mut stack = vec![node];
    let mut size = 0;
    while let Some(node) = stack.pop() {
        size += 1;
        stack.extend(children(node));
    }
    size
}

/// Largest degree of any node in the subtree rooted at `node`
pub(crate) fn max_degree_in_subtree<K, V>(node: Link<K, V>) -> usize {
    let mut stack = vec![node];
    let mut max_degree = 0;
    while let Some(node) = stack.pop() {
        max_degree = max_degree.max(unsafe { (*node.as_ptr()).degree });
        stack.extend(children(node));
    }
    max_degree
}

/// A handle to a node, returned by [`FibHeap::insert`](crate::heap::FibHeap::insert).
///
/// A handle stays valid while its node is in the heap, including across
/// merges and while the node moves between the root list and child lists.
/// It must be dropped once the node has been extracted: using it afterwards,
/// or with a heap that does not hold its node, is a contract violation.
pub struct NodeHandle<K, V> {
    pub(crate) node: Link<K, V>,
}

impl<K, V> NodeHandle<K, V> {
    pub(crate) fn new(node: Link<K, V>) -> Self {
        NodeHandle { node }
    }
}

impl<K, V> Clone for NodeHandle<K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeHandle<K, V> {}

impl<K, V> PartialEq for NodeHandle<K, V> {
    fn eq(&self, other: &Self) -> bool {
        self.node == other.node
    }
}

impl<K, V> Eq for NodeHandle<K, V> {}

impl<K, V> hash::Hash for NodeHandle<K, V> {
    fn hash<H: hash::Hasher>(&self, state: &mut H) {
        self.node.hash(state);
    }
}

impl<K, V> fmt::Debug for NodeHandle<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeHandle").field(&self.node).finish()
    }
}

/// A read-only view of a node, borrowed from its heap
pub struct NodeRef<'a, K, V> {
    node: Link<K, V>,
    _heap: PhantomData<&'a Node<K, V>>,
}

impl<'a, K, V> NodeRef<'a, K, V> {
    pub(crate) fn new(node: Link<K, V>) -> Self {
        NodeRef {
            node,
            _heap: PhantomData,
        }
    }

    fn get(&self) -> &'a Node<K, V> {
        unsafe { &*self.node.as_ptr() }
    }

    /// The handle naming this node
    pub fn handle(&self) -> NodeHandle<K, V> {
        NodeHandle::new(self.node)
    }

    pub fn key(&self) -> &'a K {
        &self.get().key
    }

    pub fn value(&self) -> &'a V {
        &self.get().value
    }

    /// Number of direct children
    pub fn degree(&self) -> usize {
        self.get().degree
    }

    /// Whether the node has lost a child since it last became a child itself
    pub fn is_marked(&self) -> bool {
        self.get().marked
    }

    pub fn is_root(&self) -> bool {
        self.get().parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.get().child.is_none()
    }

    pub fn parent(&self) -> Option<NodeRef<'a, K, V>> {
        self.get().parent.map(NodeRef::new)
    }

    /// The direct children, walked once around the child cycle
    pub fn children(&self) -> impl Iterator<Item = NodeRef<'a, K, V>> + use<'a, K, V> {
        children(self.node).map(NodeRef::new)
    }

    pub(crate) fn left(&self) -> NodeRef<'a, K, V> {
        NodeRef::new(self.get().left)
    }

    pub(crate) fn right(&self) -> NodeRef<'a, K, V> {
        NodeRef::new(self.get().right)
    }

    /// This node followed by the rest of its sibling cycle
    pub fn siblings(&self) -> impl Iterator<Item = NodeRef<'a, K, V>> + use<'a, K, V> {
        Cycle::new(Some(self.node)).map(NodeRef::new)
    }

    pub fn subtree_size(&self) -> usize {
        subtree_size(self.node)
    }

    pub fn max_degree_in_subtree(&self) -> usize {
        max_degree_in_subtree(self.node)
    }

    /// Whether the subtree holds at least `F(degree + 2)` nodes
    pub fn satisfies_degree_bound(&self) -> bool {
        let min_size = fibonacci(self.degree() as u32 + 2);
        self.subtree_size() as u128 >= min_size
    }
}

impl<K, V> Clone for NodeRef<'_, K, V> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<K, V> Copy for NodeRef<'_, K, V> {}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRef")
            .field("key", self.key())
            .field("value", self.value())
            .field("degree", &self.degree())
            .field("marked", &self.is_marked())
            .finish()
    }
}

impl<K: fmt::Display, V> fmt::Display for NodeRef<'_, K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = if self.is_marked() { "*" } else { "" };
        write!(f, "Node({}{mark}, degree={})", self.key(), self.degree())
    }
}
