use std::sync::Arc;

use hashbrown::HashSet;

use super::{Algorithm, Route, Search, State, Status, Trail, Visit};
use crate::graph::{Graph, NodeId};

/// Depth-first search. Neighbours are pushed in ascending id order, so the
/// highest-numbered neighbour is expanded first.
#[derive(Debug)]
pub struct DepthFirstSearch {
    graph: Arc<Graph>,
    start: NodeId,
    dest: NodeId,
    current: Option<NodeId>,
    discovered: HashSet<NodeId>,
    stack: Vec<Visit>,
    trail: Trail,
    state: State,
    steps: u64,
}

impl DepthFirstSearch {
    pub fn new(graph: Arc<Graph>, start: NodeId, dest: NodeId) -> Self {
        let mut discovered = HashSet::new();
        discovered.insert(start);

        Self {
            graph,
            start,
            dest,
            current: None,
            discovered,
            stack: vec![Visit {
                node: start,
                from: None,
                dist: 0.0,
            }],
            trail: Trail::default(),
            state: State::Pop,
            steps: 0,
        }
    }

    /// The stack, bottom first.
    pub fn stack(&self) -> &[Visit] {
        &self.stack
    }

    fn finish(&mut self, status: Status) -> Status {
        self.state = State::Done(status);
        status
    }
}

impl Search for DepthFirstSearch {
    fn algorithm(&self) -> Algorithm {
        Algorithm::DepthFirst
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

    fn frontier(&self) -> Vec<Visit> {
        self.stack.clone()
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
                let Some(visit) = self.stack.pop() else {
                    return self.finish(Status::NotFound);
                };

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
                            if !self.discovered.insert(next) {
                                continue;
                            }
                            self.stack.push(Visit {
                                node: next,
                                from: Some(current),
                                dist: base + weight,
                            });
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
