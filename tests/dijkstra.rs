//! Dijkstra's shortest paths driven by decrease-key, checked against a
//! lazy-deletion `BinaryHeap` version on random graphs.

use std::{cmp::Reverse, collections::BinaryHeap};

use fibheap::{FibHeap, NodeHandle};
use rand::{Rng, SeedableRng, rngs::StdRng};

type Graph = Vec<Vec<(usize, u64)>>;

fn dijkstra_fib(graph: &Graph, source: usize) -> Vec<Option<u64>> {
    let mut dist: Vec<Option<u64>> = vec![None; graph.len()];
    let mut handles: Vec<Option<NodeHandle<u64, usize>>> = vec![None; graph.len()];
    let mut done = vec![false; graph.len()];
    let mut heap = FibHeap::new();

    dist[source] = Some(0);
    handles[source] = Some(heap.insert(0, source));

    while let Some((d, u)) = heap.delete_min() {
        handles[u] = None;
        done[u] = true;
        for &(v, w) in &graph[u] {
            if done[v] {
                continue;
            }
            let candidate = d + w;
            match (dist[v], handles[v]) {
                (Some(current), Some(handle)) if candidate < current => {
                    heap.decrease_key(&handle, candidate).unwrap();
                    dist[v] = Some(candidate);
                }
                (None, _) => {
                    handles[v] = Some(heap.insert(candidate, v));
                    dist[v] = Some(candidate);
                }
                _ => {}
            }
        }
    }
    dist
}

fn dijkstra_binary(graph: &Graph, source: usize) -> Vec<Option<u64>> {
    let mut dist: Vec<Option<u64>> = vec![None; graph.len()];
    let mut heap = BinaryHeap::new();
    dist[source] = Some(0);
    heap.push(Reverse((0u64, source)));

    while let Some(Reverse((d, u))) = heap.pop() {
        if dist[u].is_some_and(|best| d > best) {
            continue;
        }
        for &(v, w) in &graph[u] {
            let candidate = d + w;
            if dist[v].is_none_or(|best| candidate < best) {
                dist[v] = Some(candidate);
                heap.push(Reverse((candidate, v)));
            }
        }
    }
    dist
}

fn random_graph(rng: &mut StdRng, nodes: usize, edges: usize) -> Graph {
    let mut graph = vec![Vec::new(); nodes];
    for _ in 0..edges {
        let u = rng.random_range(0..nodes);
        let v = rng.random_range(0..nodes);
        graph[u].push((v, rng.random_range(1..100)));
    }
    graph
}

#[test]
fn small_graph_distances() {
    let graph: Graph = vec![
        vec![(1, 4), (2, 1)],
        vec![(3, 1)],
        vec![(1, 2), (3, 5)],
        vec![(4, 3)],
        vec![],
        vec![(0, 1)],
    ];
    let dist = dijkstra_fib(&graph, 0);
    assert_eq!(dist, vec![Some(0), Some(3), Some(1), Some(4), Some(7), None]);
}

#[test]
fn matches_binary_heap_on_random_graphs() {
    let mut rng = StdRng::seed_from_u64(42);
    for round in 0..20 {
        let nodes = 50 + round * 10;
        let graph = random_graph(&mut rng, nodes, nodes * 6);
        let source = rng.random_range(0..nodes);
        assert_eq!(
            dijkstra_fib(&graph, source),
            dijkstra_binary(&graph, source),
            "round {round}"
        );
    }
}
