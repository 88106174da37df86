//! End-to-end checks on the built-in map: searches, images and documents.

use std::sync::Arc;

use graphwalk::cities::{us_cities, CITIES};
use graphwalk::prelude::*;

#[test]
fn bfs_has_fewest_hops_and_dijkstra_shortest_total() {
    let graph = us_cities();
    for (from, _, _) in CITIES {
        for (to, _, _) in CITIES {
            let bfs = graph.breadth_first_search(from, to).unwrap().unwrap();
            let dfs = graph.depth_first_search(from, to).unwrap().unwrap();
            let best = graph.shortest_path(from, to).unwrap().unwrap();

            assert!(bfs.hops() <= dfs.hops(), "{from} -> {to}");
            assert!(bfs.hops() <= best.hops(), "{from} -> {to}");
            assert!(best.total() <= bfs.total() + 1e-9, "{from} -> {to}");
            assert!(best.total() <= dfs.total() + 1e-9, "{from} -> {to}");
        }
    }
}

#[test]
fn routes_follow_edges_with_cumulative_distance() {
    let graph = us_cities();
    let route = graph.shortest_path("Miami, FL", "Seattle, WA").unwrap().unwrap();
    let mut total = 0.0;
    for (a, b) in route.legs() {
        let w = graph.node(a).unwrap().edges()[&b];
        total += w;
        let stop = route.stops().iter().find(|s| s.node == b).unwrap();
        assert!((stop.dist - total).abs() < 1e-9);
    }
    assert!((route.total() - total).abs() < 1e-9);
}

#[test]
fn searches_survive_an_image_round_trip() {
    let graph = us_cities();
    let bytes = graph.save_image_bytes().unwrap();
    let back = Graph::load_image_bytes(&bytes).unwrap();

    let before = graph.shortest_path("Boston, MA", "San Francisco, CA").unwrap();
    let after = back.shortest_path("Boston, MA", "San Francisco, CA").unwrap();
    assert_eq!(before, after);
}

#[test]
fn searches_survive_a_json_round_trip() {
    let graph = us_cities();
    let back = Graph::from_json(&graph.to_json().unwrap()).unwrap();
    let before = graph.breadth_first_search("Seattle, WA", "Miami, FL").unwrap().unwrap();
    let after = back.breadth_first_search("Seattle, WA", "Miami, FL").unwrap().unwrap();
    assert_eq!(
        before.stops().iter().map(|s| &s.name).collect::<Vec<_>>(),
        after.stops().iter().map(|s| &s.name).collect::<Vec<_>>()
    );
}

#[test]
fn removed_city_cuts_routes_through_it() {
    let mut graph = us_cities();
    // Miami's neighbours: New York, Atlanta, Dallas, Houston.
    for n in ["New York, NY", "Atlanta, GA", "Dallas, TX", "Houston, TX"] {
        graph.remove_edge(n, "Miami, FL");
    }
    assert_eq!(graph.shortest_path("Boston, MA", "Miami, FL").unwrap(), None);
    // Outgoing edges from Miami still exist.
    assert!(graph.shortest_path("Miami, FL", "Boston, MA").unwrap().is_some());

    let mut graph = us_cities();
    graph.remove_node("Denver, CO").unwrap();
    let route = graph.shortest_path("Seattle, WA", "Phoenix, AZ").unwrap().unwrap();
    assert!(route.stops().iter().all(|s| s.name != "Denver, CO"));
}

#[test]
fn stepping_matches_running() {
    let graph = Arc::new(us_cities());
    for algorithm in Algorithm::ALL {
        let mut stepped =
            Graph::search_shared(Arc::clone(&graph), algorithm, "Boston, MA", "Phoenix, AZ")
                .unwrap();
        let mut polls = 0;
        while stepped.step() == Status::Searching {
            polls += 1;
            assert!(polls < 1000);
        }
        // Done is absorbing.
        assert_eq!(stepped.step(), Status::Found);
        let steps = stepped.steps();
        assert_eq!(stepped.step(), Status::Found);
        assert_eq!(stepped.steps(), steps);

        let ran = graph.run(algorithm, "Boston, MA", "Phoenix, AZ").unwrap();
        assert_eq!(stepped.route(), ran);
    }
}
