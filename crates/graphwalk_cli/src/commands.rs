use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

use graphwalk::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use crate::cli::Format;
use crate::error::CliError;

/// Loads `path` by extension, or the built-in city map when `None`.
pub fn load_graph(path: Option<&Path>) -> Result<Graph, CliError> {
    let Some(path) = path else {
        let graph = graphwalk::cities::us_cities();
        debug!("using built-in map ({} cities)", graph.len());
        return Ok(graph);
    };

    let file_err = |source| CliError::File {
        path: path.to_owned(),
        source,
    };
    let graph = match Format::from_path(path) {
        Some(Format::Json) => Graph::from_json(&fs::read_to_string(path).map_err(file_err)?)?,
        Some(Format::Image) => {
            let mut r = BufReader::new(File::open(path).map_err(file_err)?);
            Graph::load_image(&mut r)?
        }
        None => return Err(CliError::UnknownFormat(path.to_owned())),
    };
    info!("loaded {} cities from {}", graph.len(), path.display());
    Ok(graph)
}

pub fn cities<W: Write>(graph: &Graph, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "{:<20} {:>9} {:>10} {:>6}", "city", "lat", "lon", "degree")?;
    for node in graph.nodes() {
        writeln!(
            out,
            "{:<20} {:>9.4} {:>10.4} {:>6}",
            node.name(),
            node.point().row(),
            node.point().col(),
            node.degree()
        )?;
    }
    Ok(())
}

#[derive(Debug, Serialize)]
struct SearchReport<'a> {
    algorithm: Algorithm,
    from: &'a str,
    to: &'a str,
    status: String,
    steps: u64,
    route: Option<Route>,
}

pub fn search<W: Write>(
    graph: &Graph,
    algorithm: Algorithm,
    from: &str,
    to: &str,
    trace: bool,
    json: bool,
    out: &mut W,
) -> Result<(), CliError> {
    let mut search = graph.search(algorithm, from, to)?;
    info!("{} from {from} to {to}", algorithm.label());

    if trace {
        writeln!(out, "{:>5}  {:<16} {:<20} frontier", "step", "state", "current")?;
        loop {
            let status = search.step();
            let current = search
                .current()
                .and_then(|id| graph.name_of(id))
                .unwrap_or("-");
            let frontier = search
                .frontier()
                .iter()
                .filter_map(|v| graph.name_of(v.node))
                .collect::<Vec<_>>()
                .join(", ");
            debug!(steps = search.steps(), ?status, current, %frontier, "step");
            writeln!(
                out,
                "{:>5}  {:<16} {:<20} {frontier}",
                search.steps(),
                format!("{:?}", search.state()),
                current
            )?;
            if status != Status::Searching {
                break;
            }
        }
    } else {
        search.run();
    }

    let route = search.route();
    if json {
        let report = SearchReport {
            algorithm,
            from,
            to,
            status: search.status().to_string(),
            steps: search.steps(),
            route,
        };
        writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        return Ok(());
    }

    match route {
        Some(route) => {
            writeln!(out, "{route}")?;
            writeln!(
                out,
                "{} hops, total {:.4}, {} steps",
                route.hops(),
                route.total(),
                search.steps()
            )?;
        }
        None => writeln!(out, "no route from {from} to {to} ({} steps)", search.steps())?,
    }
    Ok(())
}

pub fn compare<W: Write>(graph: &Graph, from: &str, to: &str, out: &mut W) -> Result<(), CliError> {
    writeln!(out, "{:<10} {:>6} {:>5} {:>10}", "algorithm", "steps", "hops", "total")?;
    for algorithm in Algorithm::ALL {
        let mut search = graph.search(algorithm, from, to)?;
        search.run();
        match search.route() {
            Some(route) => writeln!(
                out,
                "{:<10} {:>6} {:>5} {:>10.4}",
                algorithm.name(),
                search.steps(),
                route.hops(),
                route.total()
            )?,
            None => writeln!(
                out,
                "{:<10} {:>6} {:>5} {:>10}",
                algorithm.name(),
                search.steps(),
                "-",
                "no route"
            )?,
        }
    }
    Ok(())
}

pub fn export<W: Write>(
    graph: &Graph,
    path: &Path,
    format: Option<Format>,
    out: &mut W,
) -> Result<(), CliError> {
    let format = format
        .or_else(|| Format::from_path(path))
        .ok_or_else(|| CliError::UnknownFormat(path.to_owned()))?;
    let file_err = |source| CliError::File {
        path: path.to_owned(),
        source,
    };

    match format {
        Format::Json => fs::write(path, graph.to_json()?).map_err(file_err)?,
        Format::Image => {
            let mut w = BufWriter::new(File::create(path).map_err(file_err)?);
            graph.save_image(&mut w)?;
            w.flush().map_err(file_err)?;
        }
    }
    info!("exported {} cities to {}", graph.len(), path.display());
    writeln!(out, "wrote {}", path.display())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwalk::point::Point;

    fn output(f: impl FnOnce(&mut Vec<u8>) -> Result<(), CliError>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn lists_every_city() {
        let graph = graphwalk::cities::us_cities();
        let text = output(|o| cities(&graph, o));
        assert_eq!(text.lines().count(), 16);
        let denver = text.lines().find(|l| l.starts_with("Denver, CO")).unwrap();
        assert!(denver.trim_end().ends_with('6'));
    }

    #[test]
    fn search_prints_the_route() {
        let graph = graphwalk::cities::us_cities();
        let text = output(|o| {
            search(
                &graph,
                Algorithm::ShortestPath,
                "Boston, MA",
                "New York, NY",
                false,
                false,
                o,
            )
        });
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Boston, MA -> New York, NY"));
        assert!(lines.next().unwrap().starts_with("1 hops"));
    }

    #[test]
    fn trace_prints_one_row_per_step() {
        let graph = graphwalk::cities::us_cities();
        let text = output(|o| {
            search(
                &graph,
                Algorithm::BreadthFirst,
                "Boston, MA",
                "Boston, MA",
                true,
                false,
                o,
            )
        });
        // Header, the finding pop, then the route summary.
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[1].contains("Done(Found)"));
        assert_eq!(lines[2], "Boston, MA");
    }

    #[test]
    fn json_report_for_a_missing_route() {
        let mut graph = Graph::new();
        graph.add_node("a", Point::new(0.0, 0.0)).unwrap();
        graph.add_node("b", Point::new(1.0, 1.0)).unwrap();
        let text = output(|o| search(&graph, Algorithm::DepthFirst, "a", "b", false, true, o));
        let v: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(v["algorithm"], "dfs");
        assert_eq!(v["status"], "Not Found");
        assert!(v["route"].is_null());
    }

    #[test]
    fn unknown_city_is_an_error() {
        let graph = graphwalk::cities::us_cities();
        let mut buf = Vec::new();
        let err = search(
            &graph,
            Algorithm::BreadthFirst,
            "Atlantis",
            "Boston, MA",
            false,
            false,
            &mut buf,
        )
        .unwrap_err();
        assert!(matches!(err, CliError::Graph(GraphError::UnknownNode(n)) if n == "Atlantis"));
    }

    #[test]
    fn compare_lists_all_algorithms() {
        let graph = graphwalk::cities::us_cities();
        let text = output(|o| compare(&graph, "Miami, FL", "Seattle, WA", o));
        let names: Vec<_> = text
            .lines()
            .skip(1)
            .filter_map(|l| l.split_whitespace().next())
            .collect();
        assert_eq!(names, ["bfs", "dfs", "dijkstra"]);
    }

    #[test]
    fn export_and_reload_both_formats() {
        let graph = graphwalk::cities::us_cities();
        let dir = tempfile::tempdir().unwrap();

        for name in ["map.json", "map.gwi"] {
            let path = dir.path().join(name);
            output(|o| export(&graph, &path, None, o));
            let back = load_graph(Some(&path)).unwrap();
            assert_eq!(back.len(), graph.len());
            assert_eq!(back.edges().count(), graph.edges().count());
        }

        let odd = dir.path().join("map.txt");
        let mut buf = Vec::new();
        assert!(matches!(
            export(&graph, &odd, None, &mut buf),
            Err(CliError::UnknownFormat(_))
        ));
        output(|o| export(&graph, &odd, Some(Format::Json), o));
        assert!(matches!(
            load_graph(Some(&odd)),
            Err(CliError::UnknownFormat(_))
        ));
    }

    #[test]
    fn missing_graph_file_names_the_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.json");
        match load_graph(Some(&path)) {
            Err(CliError::File { path: p, .. }) => assert_eq!(p, path),
            other => panic!("unexpected {other:?}"),
        }
    }
}
