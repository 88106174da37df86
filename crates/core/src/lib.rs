//! # graphwalk
//!
//! Weighted graphs placed on a latitude/longitude plane, searched one
//! half-step at a time so a front-end can animate the frontier.
//!
//! ## Quick Start
//!
//! ```
//! use graphwalk::prelude::*;
//!
//! let graph = graphwalk::cities::us_cities();
//!
//! // Run to completion
//! let route = graph
//!     .shortest_path("Miami, FL", "Seattle, WA")
//!     .unwrap()
//!     .expect("the city map is connected");
//! assert_eq!(route.first().map(|s| s.name.as_str()), Some("Miami, FL"));
//!
//! // Or step through it
//! let mut search = Graph::search_shared(
//!     std::sync::Arc::new(graph),
//!     Algorithm::BreadthFirst,
//!     "Boston, MA",
//!     "Denver, CO",
//! )
//! .unwrap();
//! while let Status::Searching = search.step() {}
//! assert!(search.route().is_some());
//! ```
//!
//! ## Feature Flags
//!
//! - `serde` (default): JSON graph documents and serializable snapshots
//!
//! ## Modules
//!
//! - [`graph`]: Graph model and run-to-completion searches
//! - [`search`]: The `Search` state machine and its three implementations
//! - [`cities`]: The built-in US city map
//! - [`storage`]: Binary graph images
//! - [`doc`]: JSON graph documents (requires `serde` feature)

#[path = "core/point.rs"]
pub mod point;

#[path = "core/graph.rs"]
pub mod graph;

#[path = "core/search.rs"]
pub mod search;

#[path = "core/cities.rs"]
pub mod cities;

#[path = "core/storage.rs"]
pub mod storage;

#[cfg(feature = "serde")]
#[path = "core/doc.rs"]
pub mod doc;

/// Prelude module for convenient imports.
///
/// ```
/// use graphwalk::prelude::*;
/// ```
pub mod prelude {
    pub use crate::graph::{Graph, GraphError, Node, NodeId};
    pub use crate::point::Point;
    pub use crate::search::{Algorithm, Route, Search, State, Status, Stop, Visit};
}
