//! Step-wise graph searches.
//!
//! Every search is a small state machine: a `Pop` half-step takes the next
//! frontier entry, a `Push` half-step expands the current node. Callers drive
//! it with [`Search::step`] (one half-step) or [`Search::run`].

#[path = "search/bfs.rs"]
mod bfs;
#[path = "search/dfs.rs"]
mod dfs;
#[path = "search/dijkstra.rs"]
mod dijkstra;

pub use bfs::BreadthFirstSearch;
pub use dfs::DepthFirstSearch;
pub use dijkstra::ShortestPath;

use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::graph::{Graph, NodeId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Algorithm {
    #[cfg_attr(feature = "serde", serde(rename = "bfs", alias = "breadth-first"))]
    BreadthFirst,
    #[cfg_attr(feature = "serde", serde(rename = "dfs", alias = "depth-first"))]
    DepthFirst,
    #[cfg_attr(feature = "serde", serde(rename = "dijkstra", alias = "shortest"))]
    ShortestPath,
}

impl Algorithm {
    pub const ALL: [Algorithm; 3] = [
        Algorithm::BreadthFirst,
        Algorithm::DepthFirst,
        Algorithm::ShortestPath,
    ];

    /// Short name, accepted back by `FromStr`.
    pub fn name(self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "bfs",
            Algorithm::DepthFirst => "dfs",
            Algorithm::ShortestPath => "dijkstra",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Algorithm::BreadthFirst => "Breadth-first search",
            Algorithm::DepthFirst => "Depth-first search",
            Algorithm::ShortestPath => "Shortest path (Dijkstra)",
        }
    }
}

impl Display for Algorithm {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)]
#[error("unknown search algorithm {0:?} (expected bfs, dfs or dijkstra)")]
pub struct ParseAlgorithmError(pub String);

impl FromStr for Algorithm {
    type Err = ParseAlgorithmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "bfs" | "breadth-first" | "breadth_first" => Ok(Algorithm::BreadthFirst),
            "dfs" | "depth-first" | "depth_first" => Ok(Algorithm::DepthFirst),
            "dijkstra" | "shortest" | "shortest-path" | "shortest_path" => {
                Ok(Algorithm::ShortestPath)
            }
            _ => Err(ParseAlgorithmError(s.to_owned())),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Status {
    Found,
    NotFound,
    Searching,
}

impl Display for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Status::Found => write!(f, "Found"),
            Status::NotFound => write!(f, "Not Found"),
            Status::Searching => write!(f, "Searching"),
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum State {
    Pop,
    Push,
    Done(Status),
}

impl State {
    pub fn is_done(self) -> bool {
        matches!(self, State::Done(_))
    }
}

/// A frontier or settled entry. `dist` is measured from the start along the
/// route that discovered the node.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Visit {
    pub node: NodeId,
    pub from: Option<NodeId>,
    pub dist: f64,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Stop {
    pub node: NodeId,
    pub name: String,
    pub dist: f64,
}

/// A path from start to destination, first stop at distance zero.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Route {
    pub stops: Vec<Stop>,
}

impl Route {
    pub fn stops(&self) -> &[Stop] {
        &self.stops
    }

    pub fn first(&self) -> Option<&Stop> {
        self.stops.first()
    }

    pub fn last(&self) -> Option<&Stop> {
        self.stops.last()
    }

    /// Number of edges travelled.
    pub fn hops(&self) -> usize {
        self.stops.len().saturating_sub(1)
    }

    pub fn total(&self) -> f64 {
        self.last().map_or(0.0, |s| s.dist)
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.stops.iter().any(|s| s.node == node)
    }

    /// Consecutive node pairs along the route.
    pub fn legs(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.stops.windows(2).map(|w| (w[0].node, w[1].node))
    }
}

impl Display for Route {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        for (i, stop) in self.stops.iter().enumerate() {
            if i > 0 {
                f.write_str(" -> ")?;
            }
            f.write_str(&stop.name)?;
        }
        Ok(())
    }
}

pub trait Search {
    fn algorithm(&self) -> Algorithm;
    fn graph(&self) -> &Graph;
    fn start(&self) -> NodeId;
    fn dest(&self) -> NodeId;

    /// The node most recently taken off the frontier, if any.
    fn current(&self) -> Option<NodeId>;

    /// Entries waiting to be expanded.
    fn frontier(&self) -> Vec<Visit>;

    /// Settled entries in the order they were settled.
    fn visited(&self) -> Vec<Visit>;

    fn state(&self) -> State;

    /// Half-steps taken so far, not counting steps after completion.
    fn steps(&self) -> u64;

    /// Advances one half-step.
    fn step(&mut self) -> Status;

    fn status(&self) -> Status {
        match self.state() {
            State::Done(status) => status,
            _ => Status::Searching,
        }
    }

    fn run(&mut self) -> Status {
        loop {
            match self.step() {
                Status::Searching => continue,
                done => return done,
            }
        }
    }

    /// The found route; `None` until the search is done with `Found`.
    fn route(&self) -> Option<Route>;
}

/// Settled nodes with the edge that reached them.
#[derive(Debug, Clone, Default)]
pub(crate) struct Trail {
    order: Vec<Visit>,
    index: HashMap<NodeId, usize>,
}

impl Trail {
    pub(crate) fn settle(&mut self, visit: Visit) {
        match self.index.get(&visit.node) {
            Some(&i) => self.order[i] = visit,
            None => {
                self.index.insert(visit.node, self.order.len());
                self.order.push(visit);
            }
        }
    }

    pub(crate) fn get(&self, node: NodeId) -> Option<&Visit> {
        self.index.get(&node).map(|&i| &self.order[i])
    }

    pub(crate) fn contains(&self, node: NodeId) -> bool {
        self.index.contains_key(&node)
    }

    pub(crate) fn dist(&self, node: NodeId) -> f64 {
        self.get(node).map_or(0.0, |v| v.dist)
    }

    pub(crate) fn entries(&self) -> Vec<Visit> {
        self.order.clone()
    }

    /// Walks `from` links back from `dest`.
    pub(crate) fn route(&self, graph: &Graph, dest: NodeId) -> Option<Route> {
        let mut stops = Vec::new();
        let mut cursor = Some(dest);
        while let Some(node) = cursor {
            let visit = self.get(node)?;
            stops.push(Stop {
                node,
                name: graph.name_of(node).map(str::to_owned).unwrap_or_default(),
                dist: visit.dist,
            });
            // Guard against a malformed trail looping back on itself.
            if stops.len() > self.order.len() {
                return None;
            }
            cursor = visit.from;
        }
        stops.reverse();
        Some(Route { stops })
    }
}
