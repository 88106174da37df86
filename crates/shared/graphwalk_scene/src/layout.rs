//! Projection of graph coordinates onto a canvas.

use std::collections::{BTreeMap, BTreeSet};

use graphwalk::graph::{Graph, NodeId};

use crate::palette::DOT_RADIUS;

/// Fraction of each canvas dimension left empty, split evenly on both sides.
pub const PADDING: f64 = 0.1;

/// A dot on the canvas, in pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct City {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl City {
    pub fn new(x: f64, y: f64, radius: f64) -> Self {
        Self { x, y, radius }
    }

    /// Hit test with one pixel of slack around the dot.
    pub fn contains(&self, x: f64, y: f64) -> bool {
        let dx = x - self.x;
        let dy = y - self.y;
        dx * dx + dy * dy < (self.radius + 1.0).powi(2)
    }
}

/// An undirected connection, lower id first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Conn(pub NodeId, pub NodeId);

impl Conn {
    pub fn new(a: NodeId, b: NodeId) -> Self {
        if a <= b {
            Conn(a, b)
        } else {
            Conn(b, a)
        }
    }

    pub fn touches(&self, node: NodeId) -> bool {
        self.0 == node || self.1 == node
    }
}

/// Places every node of `graph` on a `width` x `height` canvas.
///
/// North is up. The graph's bounding box fills the canvas minus the padding;
/// an axis with zero span collapses to the centre of the canvas.
pub fn project(graph: &Graph, width: f64, height: f64) -> (BTreeMap<NodeId, City>, BTreeSet<Conn>) {
    let mut cities = BTreeMap::new();
    let mut conns = BTreeSet::new();

    let Some((min_row, max_row, min_col, max_col)) = graph.bounds() else {
        return (cities, conns);
    };

    let pad_w = width * PADDING;
    let pad_h = height * PADDING;
    let inner_w = width - pad_w;
    let inner_h = height - pad_h;
    let span_row = max_row - min_row;
    let span_col = max_col - min_col;

    for node in graph.nodes() {
        let p = node.point();
        let y = if span_row > 0.0 {
            (max_row - p.row()) / span_row * inner_h + pad_h / 2.0
        } else {
            height / 2.0
        };
        let x = if span_col > 0.0 {
            (p.col() - min_col) / span_col * inner_w + pad_w / 2.0
        } else {
            width / 2.0
        };
        cities.insert(node.id(), City::new(x.round(), y.round(), DOT_RADIUS));
    }

    for (a, b, _) in graph.edges() {
        conns.insert(Conn::new(a, b));
    }

    (cities, conns)
}
