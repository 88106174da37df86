use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Arc;

use super::{Algorithm, Route, Search, State, Status, Trail, Visit};
use crate::graph::{Graph, NodeId};

/// Heap entry ordered so that `BinaryHeap` pops the smallest distance first,
/// ties going to the lower node id.
#[derive(Debug, Clone, Copy)]
struct Entry(Visit);

impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .0
            .dist
            .total_cmp(&self.0.dist)
            .then_with(|| other.0.node.cmp(&self.0.node))
    }
}

/// Dijkstra's algorithm with lazy deletion: stale heap entries for nodes that
/// are already settled are discarded when popped.
#[derive(Debug)]
pub struct ShortestPath {
    graph: Arc<Graph>,
    start: NodeId,
    dest: NodeId,
    current: Option<NodeId>,
    queue: BinaryHeap<Entry>,
    trail: Trail,
    state: State,
    steps: u64,
}

impl ShortestPath {
    pub fn new(graph: Arc<Graph>, start: NodeId, dest: NodeId) -> Self {
        let mut queue = BinaryHeap::new();
        queue.push(Entry(Visit {
            node: start,
            from: None,
            dist: 0.0,
        }));

        Self {
            graph,
            start,
            dest,
            current: None,
            queue,
            trail: Trail::default(),
            state: State::Pop,
            steps: 0,
        }
    }

    fn finish(&mut self, status: Status) -> Status {
        self.state = State::Done(status);
        status
    }
}

impl Search for ShortestPath {
    fn algorithm(&self) -> Algorithm {
        Algorithm::ShortestPath
    }

    fn graph(&self) -> &Graph {
        &self.graph
    }

    fn start(&self) -> NodeId {
        self.start
    }

    fn dest(&self) -> NodeId {
        self.dest
    }

    fn current(&self) -> Option<NodeId> {
        self.current
    }

    /// Heap contents, nearest first. May include stale entries for settled
    /// nodes.
    fn frontier(&self) -> Vec<Visit> {
        let mut entries: Vec<Entry> = self.queue.iter().copied().collect();
        entries.sort_by(|a, b| b.cmp(a));
        entries.into_iter().map(|e| e.0).collect()
    }

    fn visited(&self) -> Vec<Visit> {
        self.trail.entries()
    }

    fn state(&self) -> State {
        self.state
    }

    fn steps(&self) -> u64 {
        self.steps
    }

    fn step(&mut self) -> Status {
        match self.state {
            State::Pop => {
                self.steps += 1;
                let Some(Entry(visit)) = self.queue.pop() else {
                    return self.finish(Status::NotFound);
                };

                if self.trail.contains(visit.node) {
                    return Status::Searching;
                }

                self.trail.settle(visit);
                if visit.node == self.dest {
                    return self.finish(Status::Found);
                }

                self.current = Some(visit.node);
                self.state = State::Push;
                Status::Searching
            }
            State::Push => {
                self.steps += 1;
                if let Some(current) = self.current {
                    let base = self.trail.dist(current);
                    if let Some(node) = self.graph.node(current) {
                        for (&next, &weight) in node.edges() {
                            if self.trail.contains(next) {
                                continue;
                            }
                            self.queue.push(Entry(Visit {
                                node: next,
                                from: Some(current),
                                dist: base + weight,
                            }));
                        }
                    }
                }

                self.state = State::Pop;
                Status::Searching
            }
            State::Done(status) => status,
        }
    }

    fn route(&self) -> Option<Route> {
        match self.state {
            State::Done(Status::Found) => self.trail.route(&self.graph, self.dest),
            _ => None,
        }
    }
}
