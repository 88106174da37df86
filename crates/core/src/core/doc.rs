//! JSON graph documents.
//!
//! ```json
//! {
//!   "nodes": [{ "name": "a", "lat": 0.0, "lon": 0.0 }, { "name": "b", "lat": 0.0, "lon": 1.0 }],
//!   "edges": [{ "from": "a", "to": "b" }]
//! }
//! ```
//!
//! An edge without `weight` is weighted by the distance between its
//! endpoints; `directed` defaults to `false`.

use serde::{Deserialize, Serialize};

use crate::graph::{Graph, GraphError};
use crate::point::Point;
use crate::storage::StorageError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct GraphDoc {
    #[serde(default)]
    pub nodes: Vec<NodeDoc>,
    #[serde(default)]
    pub edges: Vec<EdgeDoc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeDoc {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeDoc {
    pub from: String,
    pub to: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub directed: bool,
}

fn is_false(v: &bool) -> bool {
    !*v
}

impl Graph {
    /// Edges present in both directions with equal weight are written once as
    /// undirected; everything else as directed arcs.
    pub fn to_doc(&self) -> GraphDoc {
        let nodes = self
            .nodes()
            .map(|n| NodeDoc {
                name: n.name().to_owned(),
                lat: n.point().row(),
                lon: n.point().col(),
            })
            .collect();

        let mut edges = Vec::new();
        for (from, to, weight) in self.arcs() {
            let back = self.node(to).and_then(|n| n.edges().get(&from)).copied();
            let symmetric = back == Some(weight);
            if symmetric && to < from {
                continue;
            }
            let (Some(from_name), Some(to_name)) = (self.name_of(from), self.name_of(to)) else {
                continue;
            };
            let natural = self
                .node(from)
                .zip(self.node(to))
                .map(|(a, b)| a.point().dist(b.point()));
            edges.push(EdgeDoc {
                from: from_name.to_owned(),
                to: to_name.to_owned(),
                weight: if natural == Some(weight) {
                    None
                } else {
                    Some(weight)
                },
                directed: !symmetric,
            });
        }

        GraphDoc { nodes, edges }
    }

    pub fn from_doc(doc: &GraphDoc) -> Result<Self, GraphError> {
        let mut graph = Graph::with_capacity(doc.nodes.len());
        for node in &doc.nodes {
            graph.add_node(&node.name, Point::new(node.lat, node.lon))?;
        }
        for edge in &doc.edges {
            match (edge.weight, edge.directed) {
                (None, false) => {
                    graph.add_edge(&edge.from, &edge.to)?;
                }
                (None, true) => {
                    graph.add_directed_edge(&edge.from, &edge.to)?;
                }
                (Some(w), directed) => {
                    graph.add_weighted_edge(&edge.from, &edge.to, w, directed)?;
                }
            }
        }
        Ok(graph)
    }

    pub fn to_json(&self) -> Result<String, StorageError> {
        Ok(serde_json::to_string_pretty(&self.to_doc())?)
    }

    pub fn from_json(json: &str) -> Result<Self, StorageError> {
        let doc: GraphDoc = serde_json::from_str(json)?;
        Ok(Self::from_doc(&doc)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cities::us_cities;

    #[test]
    fn city_map_round_trips_through_json() {
        let g = us_cities();
        let json = g.to_json().unwrap();
        let back = Graph::from_json(&json).unwrap();
        assert_eq!(back.len(), g.len());
        assert_eq!(back.arcs().count(), g.arcs().count());
        assert_eq!(back.to_doc().edges, g.to_doc().edges);
        for (a, b) in g.nodes().zip(back.nodes()) {
            assert_eq!(a.name(), b.name());
            assert!(a.point().dist(b.point()) < 1e-9);
        }

        // Natural weights are implied, not written.
        assert!(g.to_doc().edges.iter().all(|e| e.weight.is_none() && !e.directed));
    }

    #[test]
    fn explicit_weights_and_directions_are_kept() {
        let json = r#"{
            "nodes": [
                { "name": "a", "lat": 0.0, "lon": 0.0 },
                { "name": "b", "lat": 0.0, "lon": 1.0 }
            ],
            "edges": [
                { "from": "a", "to": "b", "weight": 7.5, "directed": true }
            ]
        }"#;
        let g = Graph::from_json(json).unwrap();
        let a = g.id_of("a").unwrap();
        let b = g.id_of("b").unwrap();
        assert_eq!(g.node(a).unwrap().edges()[&b], 7.5);
        assert!(g.node(b).unwrap().edges().is_empty());

        let doc = g.to_doc();
        assert_eq!(
            doc.edges,
            vec![EdgeDoc {
                from: "a".into(),
                to: "b".into(),
                weight: Some(7.5),
                directed: true,
            }]
        );
    }

    #[test]
    fn bad_documents_are_errors() {
        assert!(matches!(
            Graph::from_json("{ not json"),
            Err(StorageError::Json(_))
        ));
        let dangling = r#"{ "nodes": [], "edges": [{ "from": "x", "to": "y" }] }"#;
        assert!(matches!(
            Graph::from_json(dangling),
            Err(StorageError::Graph(GraphError::UnknownNode(_)))
        ));
    }
}
