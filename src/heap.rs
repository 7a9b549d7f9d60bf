use std::marker::PhantomData;

use tracing::{debug, trace};

use crate::{
    bounds::max_degree_bound,
    error::HeapError,
    node::{self, Cycle, Link, Node, NodeHandle, NodeRef},
};

/// A Fibonacci heap implementing a min priority queue
///
/// Insert, find-min, merge and decrease-key run in O(1) amortized time,
/// delete-min and delete in O(log n) amortized time.
///
/// # Example
///
/// ```rust
/// use fibheap::FibHeap;
///
/// let mut heap = FibHeap::new();
/// let five = heap.insert(5, "five");
/// heap.insert(3, "three");
/// heap.decrease_key(&five, 1).unwrap();
/// assert_eq!(heap.find_min(), Some((&1, &"five")));
/// assert_eq!(heap.delete_min(), Some((1, "five")));
/// ```
#[derive(Debug)]
pub struct FibHeap<K, V> {
    /// A pointer to the root with the smallest key
    min: Option<Link<K, V>>,

    /// The number of nodes in the heap
    num_nodes: usize,

    /// The number of trees in the root list
    num_trees: usize,

    /// The number of marked nodes
    num_marked: usize,

    _owns: PhantomData<Box<Node<K, V>>>,
}

impl<K: Ord, V> FibHeap<K, V> {
    /// Create an empty heap
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear the heap, deallocating all the previous nodes
    pub fn clear(&mut self) {
        std::mem::swap(self, &mut Self::new());
    }

    /// Check if the heap is empty
    pub fn is_empty(&self) -> bool {
        self.num_nodes == 0
    }

    /// Return the number of nodes in the heap
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Return the number of trees in the root list
    pub fn num_trees(&self) -> usize {
        self.num_trees
    }

    /// Return the number of marked nodes
    pub fn num_marked(&self) -> usize {
        self.num_marked
    }

    /// The potential `trees + 2 * marked` used in the amortized analysis
    pub fn potential(&self) -> usize {
        self.num_trees + 2 * self.num_marked
    }

    /// Return a reference to the minimum element, if it exists
    pub fn find_min(&self) -> Option<(&K, &V)> {
        self.min
            .map(|min| unsafe { (&(*min.as_ptr()).key, &(*min.as_ptr()).value) })
    }

    /// Return a handle to the minimum element, if it exists
    pub fn min_handle(&self) -> Option<NodeHandle<K, V>> {
        self.min.map(NodeHandle::new)
    }

    /// A read-only view of the node behind `handle`
    pub fn node(&self, handle: &NodeHandle<K, V>) -> NodeRef<'_, K, V> {
        NodeRef::new(handle.node)
    }

    /// The current key of the node behind `handle`
    pub fn key(&self, handle: &NodeHandle<K, V>) -> &K {
        unsafe { &(*handle.node.as_ptr()).key }
    }

    /// The payload of the node behind `handle`
    pub fn value(&self, handle: &NodeHandle<K, V>) -> &V {
        unsafe { &(*handle.node.as_ptr()).value }
    }

    /// The payload of the node behind `handle`, mutably. Keys stay put.
    pub fn value_mut(&mut self, handle: &NodeHandle<K, V>) -> &mut V {
        unsafe { &mut (*handle.node.as_ptr()).value }
    }

    /// Iterate over the roots of the forest, starting from the minimum
    pub fn roots(&self) -> impl Iterator<Item = NodeRef<'_, K, V>> + '_ {
        Cycle::new(self.min).map(NodeRef::new)
    }

    /// Merge two heaps into a new one
    ///
    /// The root lists are spliced together, so handles from either heap
    /// stay valid in the result.
    pub fn merge(mut self, mut other: Self) -> Self {
        let min = match (self.min.take(), other.min.take()) {
            (Some(this_min), Some(other_min)) => {
                node::splice(this_min, other_min);
                let other_smaller =
                    unsafe { (*other_min.as_ptr()).key < (*this_min.as_ptr()).key };
                Some(if other_smaller { other_min } else { this_min })
            }
            (min, None) | (None, min) => min,
        };
        let merged = Self {
            min,
            num_nodes: self.num_nodes + other.num_nodes,
            num_trees: self.num_trees + other.num_trees,
            num_marked: self.num_marked + other.num_marked,
            _owns: PhantomData,
        };
        debug!(
            len = merged.num_nodes,
            trees = merged.num_trees,
            "merged heaps"
        );
        merged
    }

    /// Insert a new element in the heap, returning a handle to it
    pub fn insert(&mut self, key: K, value: V) -> NodeHandle<K, V> {
        let node = Node::alloc(key, value);
        self.add_root(node);
        self.num_nodes += 1;
        self.num_trees += 1;
        NodeHandle::new(node)
    }

    /// Delete and return the minimum element, if it exists
    pub fn delete_min(&mut self) -> Option<(K, V)> {
        let min = self.min?;
        Some(self.extract_root(min))
    }

    /// Lower the key of the node behind `handle` to `new_key`
    ///
    /// Fails without touching the heap if `new_key` is greater than the
    /// current key. An equal key is accepted.
    pub fn decrease_key(&mut self, handle: &NodeHandle<K, V>, new_key: K) -> Result<(), HeapError> {
        let node = handle.node;
        unsafe {
            if new_key > (*node.as_ptr()).key {
                return Err(HeapError::KeyIncreased);
            }
            (*node.as_ptr()).key = new_key;

            if let Some(parent) = (*node.as_ptr()).parent {
                if (*node.as_ptr()).key < (*parent.as_ptr()).key {
                    self.cut(node, parent);
                    self.cascading_cut(parent);
                }
            }
            if let Some(min) = self.min {
                if (*node.as_ptr()).key < (*min.as_ptr()).key {
                    self.min = Some(node);
                }
            }
        }
        Ok(())
    }

    /// Remove the node behind `handle`, returning its key and payload
    ///
    /// Behaves as lowering the key below every other key and then deleting
    /// the minimum.
    pub fn delete(&mut self, handle: NodeHandle<K, V>) -> (K, V) {
        let node = handle.node;
        if let Some(parent) = unsafe { (*node.as_ptr()).parent } {
            self.cut(node, parent);
            self.cascading_cut(parent);
        }
        debug!(len = self.num_nodes, "deleting node");
        self.extract_root(node)
    }

    /// Splices the singleton `node` into the root list, keeping `min` current
    fn add_root(&mut self, node: Link<K, V>) {
        match self.min {
            None => self.min = Some(node),
            Some(min) => unsafe {
                node::splice((*min.as_ptr()).left, node);
                if (*node.as_ptr()).key < (*min.as_ptr()).key {
                    self.min = Some(node);
                }
            },
        }
    }

    /// Removes the root `root` from the heap, promoting its children and
    /// consolidating what is left
    fn extract_root(&mut self, root: Link<K, V>) -> (K, V) {
        unsafe {
            if let Some(first) = (*root.as_ptr()).child.take() {
                let mut promoted = 0;
                for child in Cycle::new(Some(first)) {
                    (*child.as_ptr()).parent = None;
                    if (*child.as_ptr()).marked {
                        (*child.as_ptr()).marked = false;
                        self.num_marked -= 1;
                    }
                    promoted += 1;
                }
                node::splice(root, first);
                (*root.as_ptr()).degree = 0;
                self.num_trees += promoted;
            }

            let next = (*root.as_ptr()).right;
            node::unlink(root);
            self.num_trees -= 1;
            self.num_nodes -= 1;

            if self.num_nodes == 0 {
                self.min = None;
                self.num_trees = 0;
            } else {
                self.min = Some(next);
                self.consolidate();
            }
        }
        let node = Node::free(root);
        (node.key, node.value)
    }

    /// Links roots of equal degree until every root has a distinct degree,
    /// then rebuilds the root list and finds the minimum
    fn consolidate(&mut self) {
        let roots: Vec<Link<K, V>> = Cycle::new(self.min).collect();
        let mut by_degree: Vec<Option<Link<K, V>>> =
            vec![None; max_degree_bound(self.num_nodes) + 2];
        trace!(roots = roots.len(), len = self.num_nodes, "consolidating");

        for root in roots {
            let mut tree = root;
            let mut degree = unsafe { (*tree.as_ptr()).degree };
            loop {
                if degree >= by_degree.len() {
                    by_degree.resize(degree + 1, None);
                }
                let Some(other) = by_degree[degree].take() else {
                    break;
                };
                // the tree already in the table wins ties
                let (winner, loser) = if unsafe { (*tree.as_ptr()).key < (*other.as_ptr()).key } {
                    (tree, other)
                } else {
                    (other, tree)
                };
                node::unlink(loser);
                node::add_child(winner, loser);
                self.num_trees -= 1;
                tree = winner;
                degree += 1;
            }
            by_degree[degree] = Some(tree);
        }

        self.min = None;
        self.num_trees = 0;
        for root in by_degree.into_iter().flatten() {
            node::make_singleton(root);
            self.add_root(root);
            self.num_trees += 1;
        }
        trace!(trees = self.num_trees, "consolidated");
    }

    /// Moves `child` out of `parent` and into the root list, unmarked
    fn cut(&mut self, child: Link<K, V>, parent: Link<K, V>) {
        node::remove_child(parent, child);
        unsafe {
            if (*child.as_ptr()).marked {
                (*child.as_ptr()).marked = false;
                self.num_marked -= 1;
            }
        }
        self.add_root(child);
        self.num_trees += 1;
        trace!(trees = self.num_trees, "cut node to root list");
    }

    /// Walks up from `node`, which just lost a child: an unmarked node is
    /// marked and the walk stops, a marked one is cut and the walk goes on
    fn cascading_cut(&mut self, mut node: Link<K, V>) {
        while let Some(parent) = unsafe { (*node.as_ptr()).parent } {
            unsafe {
                if !(*node.as_ptr()).marked {
                    (*node.as_ptr()).marked = true;
                    self.num_marked += 1;
                    return;
                }
            }
            self.cut(node, parent);
            node = parent;
        }
    }
}

impl<K, V> Default for FibHeap<K, V> {
    fn default() -> Self {
        Self {
            min: None,
            num_nodes: 0,
            num_trees: 0,
            num_marked: 0,
            _owns: PhantomData,
        }
    }
}

impl<K, V> Drop for FibHeap<K, V> {
    fn drop(&mut self) {
        let mut stack: Vec<Link<K, V>> = Cycle::new(self.min.take()).collect();
        while let Some(node) = stack.pop() {
            stack.extend(node::children(node));
            drop(Node::free(node));
        }
    }
}

impl<K: Ord, V> Extend<(K, V)> for FibHeap<K, V> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.insert(key, value);
        }
    }
}

impl<K: Ord, V> FromIterator<(K, V)> for FibHeap<K, V> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
