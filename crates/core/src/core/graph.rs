use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use hashbrown::HashMap;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::point::Point;
use crate::search::{self, Algorithm, Route, Search};

/// Stable handle of a node within one [`Graph`].
///
/// Ids are never reused while the graph lives, so a handle that outlives its
/// node simply stops resolving.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId(pub u32);

impl NodeId {
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum GraphError {
    #[error("graph does not contain node {0:?}")]
    UnknownNode(String),
    #[error("graph already contains node {0:?}")]
    DuplicateNode(String),
    #[error("node {name:?} has a non-finite position ({row}, {col})")]
    InvalidPoint { name: String, row: f64, col: f64 },
    #[error("edge {from:?} -> {to:?} has invalid weight {weight}")]
    InvalidWeight { from: String, to: String, weight: f64 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    id: NodeId,
    name: String,
    point: Point,
    edges: BTreeMap<NodeId, f64>,
}

impl Node {
    fn new(id: NodeId, name: &str, point: Point) -> Self {
        Self {
            id,
            name: name.to_owned(),
            point,
            edges: BTreeMap::new(),
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn point(&self) -> &Point {
        &self.point
    }

    /// Outgoing edges ordered by neighbour id.
    pub fn edges(&self) -> &BTreeMap<NodeId, f64> {
        &self.edges
    }

    pub fn degree(&self) -> usize {
        self.edges.len()
    }
}

#[derive(Debug, Clone, Default)]
pub struct Graph {
    slots: Vec<Option<Node>>,
    names: HashMap<String, NodeId>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            names: HashMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.names.get(name).copied()
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    pub fn node_by_name(&self, name: &str) -> Option<&Node> {
        self.id_of(name).and_then(|id| self.node(id))
    }

    pub fn name_of(&self, id: NodeId) -> Option<&str> {
        self.node(id).map(Node::name)
    }

    /// Live nodes in id order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }

    /// Undirected view of the edges: each connected pair once, lower id first.
    ///
    /// A one-way edge is reported as well, under the same ordering.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.nodes().flat_map(move |node| {
            node.edges.iter().filter_map(move |(&other, &w)| {
                let reverse = self
                    .node(other)
                    .is_some_and(|o| o.edges.contains_key(&node.id));
                if node.id < other || !reverse {
                    let (a, b) = if node.id < other {
                        (node.id, other)
                    } else {
                        (other, node.id)
                    };
                    Some((a, b, w))
                } else {
                    None
                }
            })
        })
    }

    /// Directed edges exactly as stored.
    pub fn arcs(&self) -> impl Iterator<Item = (NodeId, NodeId, f64)> + '_ {
        self.nodes()
            .flat_map(|node| node.edges.iter().map(move |(&to, &w)| (node.id, to, w)))
    }

    pub fn add_node(&mut self, name: &str, point: Point) -> Result<NodeId, GraphError> {
        if self.names.contains_key(name) {
            return Err(GraphError::DuplicateNode(name.to_owned()));
        }
        if !point.is_finite() {
            return Err(GraphError::InvalidPoint {
                name: name.to_owned(),
                row: point.row(),
                col: point.col(),
            });
        }

        let id = NodeId(self.slots.len() as u32);
        self.slots.push(Some(Node::new(id, name, point)));
        self.names.insert(name.to_owned(), id);
        Ok(id)
    }

    pub fn remove_node(&mut self, name: &str) -> Option<Node> {
        let id = self.names.remove(name)?;
        for node in self.slots.iter_mut().flatten() {
            node.edges.remove(&id);
        }
        self.slots.get_mut(id.index()).and_then(Option::take)
    }

    /// Connects `a` and `b` in both directions, weighted by the distance
    /// between their points. Returns the weight.
    pub fn add_edge(&mut self, a: &str, b: &str) -> Result<f64, GraphError> {
        let (ia, ib, dist) = self.endpoints(a, b)?;
        self.link(ia, ib, dist);
        self.link(ib, ia, dist);
        Ok(dist)
    }

    pub fn add_directed_edge(&mut self, from: &str, to: &str) -> Result<f64, GraphError> {
        let (ia, ib, dist) = self.measured(from, to)?;
        self.link(ia, ib, dist);
        Ok(dist)
    }

    /// Like [`Graph::add_edge`] with an explicit weight instead of the
    /// point distance.
    pub fn add_weighted_edge(
        &mut self,
        a: &str,
        b: &str,
        weight: f64,
        directed: bool,
    ) -> Result<(), GraphError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(GraphError::InvalidWeight {
                from: a.to_owned(),
                to: b.to_owned(),
                weight,
            });
        }
        let (ia, ib, _) = self.endpoints(a, b)?;
        self.link(ia, ib, weight);
        if !directed {
            self.link(ib, ia, weight);
        }
        Ok(())
    }

    /// Removes the `from -> to` direction only.
    pub fn remove_edge(&mut self, from: &str, to: &str) -> Option<f64> {
        let to = self.id_of(to)?;
        let from = self.id_of(from)?;
        self.slots
            .get_mut(from.index())
            .and_then(Option::as_mut)
            .and_then(|n| n.edges.remove(&to))
    }

    pub fn depth_first_search(&self, start: &str, end: &str) -> Result<Option<Route>, GraphError> {
        self.run(Algorithm::DepthFirst, start, end)
    }

    pub fn breadth_first_search(
        &self,
        start: &str,
        end: &str,
    ) -> Result<Option<Route>, GraphError> {
        self.run(Algorithm::BreadthFirst, start, end)
    }

    pub fn shortest_path(&self, start: &str, end: &str) -> Result<Option<Route>, GraphError> {
        self.run(Algorithm::ShortestPath, start, end)
    }

    /// Runs `algorithm` to completion on a private copy of the graph.
    pub fn run(
        &self,
        algorithm: Algorithm,
        start: &str,
        end: &str,
    ) -> Result<Option<Route>, GraphError> {
        let mut search = self.search(algorithm, start, end)?;
        search.run();
        Ok(search.route())
    }

    /// A step-wise search over a snapshot of this graph.
    pub fn search(
        &self,
        algorithm: Algorithm,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn Search + Send + Sync>, GraphError> {
        Self::search_shared(Arc::new(self.clone()), algorithm, start, end)
    }

    /// A step-wise search over a shared graph.
    pub fn search_shared(
        graph: Arc<Graph>,
        algorithm: Algorithm,
        start: &str,
        end: &str,
    ) -> Result<Box<dyn Search + Send + Sync>, GraphError> {
        let start = graph
            .id_of(start)
            .ok_or_else(|| GraphError::UnknownNode(start.to_owned()))?;
        let end = graph
            .id_of(end)
            .ok_or_else(|| GraphError::UnknownNode(end.to_owned()))?;

        Ok(match algorithm {
            Algorithm::BreadthFirst => {
                Box::new(search::BreadthFirstSearch::new(graph, start, end))
            }
            Algorithm::DepthFirst => Box::new(search::DepthFirstSearch::new(graph, start, end)),
            Algorithm::ShortestPath => Box::new(search::ShortestPath::new(graph, start, end)),
        })
    }

    /// Axis-aligned bounds as `(min_row, max_row, min_col, max_col)`, or
    /// `None` for an empty graph.
    pub fn bounds(&self) -> Option<(f64, f64, f64, f64)> {
        self.nodes().fold(None, |acc, node| {
            let (r, c) = (node.point.row(), node.point.col());
            Some(match acc {
                None => (r, r, c, c),
                Some((r0, r1, c0, c1)) => (r0.min(r), r1.max(r), c0.min(c), c1.max(c)),
            })
        })
    }
}

// Private methods
impl Graph {
    fn endpoints(&self, a: &str, b: &str) -> Result<(NodeId, NodeId, f64), GraphError> {
        let na = self
            .node_by_name(a)
            .ok_or_else(|| GraphError::UnknownNode(a.to_owned()))?;
        let nb = self
            .node_by_name(b)
            .ok_or_else(|| GraphError::UnknownNode(b.to_owned()))?;
        Ok((na.id, nb.id, na.point.dist(&nb.point)))
    }

    /// Endpoints plus their point distance, which must be a finite weight.
    fn measured(&self, a: &str, b: &str) -> Result<(NodeId, NodeId, f64), GraphError> {
        let (ia, ib, dist) = self.endpoints(a, b)?;
        if !dist.is_finite() {
            return Err(GraphError::InvalidWeight {
                from: a.to_owned(),
                to: b.to_owned(),
                weight: dist,
            });
        }
        Ok((ia, ib, dist))
    }

    pub(crate) fn link(&mut self, from: NodeId, to: NodeId, dist: f64) {
        if let Some(node) = self.slots.get_mut(from.index()).and_then(Option::as_mut) {
            node.edges.insert(to, dist);
        }
    }
}
