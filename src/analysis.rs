//! Verification and amortized-analysis tooling.
//!
//! Nothing here is used by the heap operations themselves. Every check walks
//! the whole forest and recomputes what the heap tracks incrementally, so it
//! costs O(n).

use thiserror::Error;

use crate::{
    bounds::max_degree_bound,
    heap::FibHeap,
    node::NodeRef,
};

/// A structural invariant found broken by [`verify_structure`]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("sibling links are not mutual inverses")]
    BrokenCycle,

    #[error("node's parent link does not point at the node holding it")]
    WrongParent,

    #[error("degree {recorded} recorded but {actual} children found")]
    WrongDegree { recorded: usize, actual: usize },

    #[error("a child's key is smaller than its parent's")]
    HeapOrder,

    #[error("a root is marked")]
    MarkedRoot,

    #[error("minimum pointer does not name a smallest root")]
    WrongMinimum,

    #[error("subtree of degree {degree} holds only {size} nodes")]
    DegreeBound { degree: usize, size: usize },

    #[error("{counter} is {recorded} but {actual} were counted")]
    CounterDrift {
        counter: &'static str,
        recorded: usize,
        actual: usize,
    },
}

/// Counters recomputed by traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StructureReport {
    pub nodes: usize,
    pub trees: usize,
    pub marked: usize,
    pub max_degree: usize,
}

impl StructureReport {
    /// `trees + 2 * marked`, recomputed
    pub fn potential(&self) -> usize {
        self.trees + 2 * self.marked
    }
}

/// Walks the whole heap and checks every structural invariant, returning
/// the recomputed counters when all of them hold.
pub fn verify_structure<K: Ord, V>(
    heap: &FibHeap<K, V>,
) -> Result<StructureReport, InvariantViolation> {
    let mut report = StructureReport::default();

    let roots: Vec<_> = heap.roots().collect();
    check_cycle(&roots)?;
    for root in &roots {
        if !root.is_root() {
            return Err(InvariantViolation::WrongParent);
        }
        if root.is_marked() {
            return Err(InvariantViolation::MarkedRoot);
        }
    }
    if let Some(min) = heap.min_handle() {
        let min_key = heap.key(&min);
        let min_is_root = roots.iter().any(|root| root.handle() == min);
        if !min_is_root || roots.iter().any(|root| root.key() < min_key) {
            return Err(InvariantViolation::WrongMinimum);
        }
    }
    report.trees = roots.len();

    let mut stack = roots;
    while let Some(node) = stack.pop() {
        report.nodes += 1;
        report.marked += node.is_marked() as usize;
        report.max_degree = report.max_degree.max(node.degree());

        let children: Vec<_> = node.children().collect();
        if children.len() != node.degree() {
            return Err(InvariantViolation::WrongDegree {
                recorded: node.degree(),
                actual: children.len(),
            });
        }
        check_cycle(&children)?;
        for child in &children {
            if child.parent().map(|p| p.handle()) != Some(node.handle()) {
                return Err(InvariantViolation::WrongParent);
            }
            if child.key() < node.key() {
                return Err(InvariantViolation::HeapOrder);
            }
        }
        if !node.satisfies_degree_bound() {
            return Err(InvariantViolation::DegreeBound {
                degree: node.degree(),
                size: node.subtree_size(),
            });
        }
        stack.extend(children);
    }

    check_counter("len", heap.len(), report.nodes)?;
    check_counter("num_trees", heap.num_trees(), report.trees)?;
    check_counter("num_marked", heap.num_marked(), report.marked)?;
    Ok(report)
}

fn check_cycle<K, V>(members: &[NodeRef<'_, K, V>]) -> Result<(), InvariantViolation> {
    for node in members {
        if node.right().left().handle() != node.handle()
            || node.left().right().handle() != node.handle()
        {
            return Err(InvariantViolation::BrokenCycle);
        }
    }
    Ok(())
}

fn check_counter(
    counter: &'static str,
    recorded: usize,
    actual: usize,
) -> Result<(), InvariantViolation> {
    if recorded == actual {
        Ok(())
    } else {
        Err(InvariantViolation::CounterDrift {
            counter,
            recorded,
            actual,
        })
    }
}

/// Whether every subtree of degree `d` holds at least `F(d + 2)` nodes
pub fn verify_fibonacci_property<K: Ord, V>(heap: &FibHeap<K, V>) -> bool {
    let mut stack: Vec<_> = heap.roots().collect();
    while let Some(node) = stack.pop() {
        if !node.satisfies_degree_bound() {
            return false;
        }
        stack.extend(node.children());
    }
    true
}

/// Largest degree of any node in the heap
pub fn max_degree<K: Ord, V>(heap: &FibHeap<K, V>) -> usize {
    heap.roots()
        .map(|root| root.max_degree_in_subtree())
        .max()
        .unwrap_or(0)
}

/// Whether no node exceeds degree `floor(log_phi(n))`
pub fn verify_degree_bound<K: Ord, V>(heap: &FibHeap<K, V>) -> bool {
    max_degree(heap) <= max_degree_bound(heap.len())
}

/// Theoretical bounds next to what the heap currently looks like
#[derive(Debug, Clone, PartialEq)]
pub struct DegreeReport {
    pub heap_size: usize,
    pub num_trees: usize,
    pub num_marked: usize,
    pub potential: usize,
    pub theoretical_max_degree: usize,
    pub actual_max_degree: usize,
    pub degree_bound_satisfied: bool,
    pub fibonacci_property_satisfied: bool,
    /// 1 when the forest is a single tree, 0 when every node is its own tree
    pub trees_efficiency: f64,
}

/// Compares the heap against its theoretical degree bounds.
/// Returns `None` for an empty heap.
pub fn degree_report<K: Ord, V>(heap: &FibHeap<K, V>) -> Option<DegreeReport> {
    let n = heap.len();
    if n == 0 {
        return None;
    }
    let theoretical_max_degree = max_degree_bound(n);
    let actual_max_degree = max_degree(heap);
    let trees_efficiency = if n > 1 {
        1.0 - (heap.num_trees() - 1) as f64 / (n - 1) as f64
    } else {
        1.0
    };
    Some(DegreeReport {
        heap_size: n,
        num_trees: heap.num_trees(),
        num_marked: heap.num_marked(),
        potential: heap.potential(),
        theoretical_max_degree,
        actual_max_degree,
        degree_bound_satisfied: actual_max_degree <= theoretical_max_degree,
        fibonacci_property_satisfied: verify_fibonacci_property(heap),
        trees_efficiency,
    })
}

/// Heap operations, as named in potential analyses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Insert,
    FindMin,
    Merge,
    DeleteMin,
    DecreaseKey,
    Delete,
}

/// One operation's cost split into actual work and potential change
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PotentialChange {
    pub operation: Operation,
    pub actual_cost: f64,
    pub potential_before: usize,
    pub potential_after: usize,
    /// `actual_cost + (potential_after - potential_before)`
    pub amortized_cost: f64,
}

impl PotentialChange {
    pub fn delta(&self) -> i64 {
        self.potential_after as i64 - self.potential_before as i64
    }
}

/// Records the potential after each operation and derives amortized costs
#[derive(Debug, Clone, Default)]
pub struct PotentialTracker {
    history: Vec<usize>,
}

impl PotentialTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records the heap's potential after `operation` ran at `actual_cost`.
    /// The first record is measured against a potential of zero.
    pub fn record<K: Ord, V>(
        &mut self,
        heap: &FibHeap<K, V>,
        operation: Operation,
        actual_cost: f64,
    ) -> PotentialChange {
        let potential_before = self.history.last().copied().unwrap_or(0);
        let potential_after = heap.potential();
        self.history.push(potential_after);
        let delta = potential_after as f64 - potential_before as f64;
        PotentialChange {
            operation,
            actual_cost,
            potential_before,
            potential_after,
            amortized_cost: actual_cost + delta,
        }
    }

    pub fn history(&self) -> &[usize] {
        &self.history
    }
}
