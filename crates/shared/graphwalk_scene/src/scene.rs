use std::collections::{BTreeMap, BTreeSet};

use graphwalk::graph::{Graph, NodeId};
use graphwalk::search::Search;

use crate::layout::{project, City, Conn};
use crate::palette;

/// Something a scene can be drawn onto.
pub trait Surface {
    fn clear(&mut self, width: f64, height: f64) -> Result<(), String>;
    fn line(&mut self, from: &City, to: &City, colour: &str) -> Result<(), String>;
    fn dot(&mut self, city: &City, colour: &str) -> Result<(), String>;
}

/// How a city or connection is emphasised, strongest last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Highlight {
    Plain,
    Queued,
    Searched,
    Active,
    Route,
    Hovered,
}

/// Projected cities plus the highlight state of a running search.
#[derive(Debug, Clone)]
pub struct Scene {
    width: f64,
    height: f64,
    names: BTreeMap<NodeId, String>,
    cities: BTreeMap<NodeId, City>,
    conns: BTreeSet<Conn>,
    hovered: Option<NodeId>,
    active: Option<NodeId>,
    queued: BTreeSet<NodeId>,
    searched: BTreeSet<NodeId>,
    route: Vec<NodeId>,
    dirty: bool,
}

impl Scene {
    pub fn new(graph: &Graph, width: f64, height: f64) -> Self {
        let (cities, conns) = project(graph, width, height);
        Self {
            width,
            height,
            names: graph
                .nodes()
                .map(|n| (n.id(), n.name().to_owned()))
                .collect(),
            cities,
            conns,
            hovered: None,
            active: None,
            queued: BTreeSet::new(),
            searched: BTreeSet::new(),
            route: Vec::new(),
            dirty: true,
        }
    }

    pub fn width(&self) -> f64 {
        self.width
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn cities(&self) -> &BTreeMap<NodeId, City> {
        &self.cities
    }

    pub fn conns(&self) -> &BTreeSet<Conn> {
        &self.conns
    }

    pub fn name(&self, id: NodeId) -> Option<&str> {
        self.names.get(&id).map(String::as_str)
    }

    pub fn id_of(&self, name: &str) -> Option<NodeId> {
        self.names
            .iter()
            .find_map(|(&id, n)| (n == name).then_some(id))
    }

    /// City names in alphabetical order.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.names.values().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Initial `(from, to)` choice: the first and last names alphabetically.
    pub fn default_endpoints(&self) -> Option<(&str, &str)> {
        let names = self.sorted_names();
        Some((names.first().copied()?, names.last().copied()?))
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn hovered(&self) -> Option<NodeId> {
        self.hovered
    }

    pub fn active(&self) -> Option<NodeId> {
        self.active
    }

    pub fn queued(&self) -> &BTreeSet<NodeId> {
        &self.queued
    }

    pub fn searched(&self) -> &BTreeSet<NodeId> {
        &self.searched
    }

    pub fn route(&self) -> &[NodeId] {
        &self.route
    }

    /// Re-projects `graph` onto a canvas of the new size.
    pub fn resize(&mut self, graph: &Graph, width: f64, height: f64) {
        let (cities, conns) = project(graph, width, height);
        let names: BTreeMap<NodeId, String> = graph
            .nodes()
            .map(|n| (n.id(), n.name().to_owned()))
            .collect();
        if self.width != width || self.height != height {
            self.width = width;
            self.height = height;
            self.dirty = true;
        }
        if self.names != names {
            self.names = names;
            self.dirty = true;
        }
        self.set_cities(cities);
        self.set_conns(conns);
    }

    pub fn set_cities(&mut self, cities: BTreeMap<NodeId, City>) {
        if self.cities != cities {
            self.cities = cities;
            self.dirty = true;
        }
    }

    pub fn set_conns(&mut self, conns: BTreeSet<Conn>) {
        if self.conns != conns {
            self.conns = conns;
            self.dirty = true;
        }
    }

    pub fn set_hovered(&mut self, hovered: Option<NodeId>) {
        if self.hovered != hovered {
            self.hovered = hovered;
            self.dirty = true;
        }
    }

    pub fn set_active(&mut self, active: Option<NodeId>) {
        if self.active != active {
            self.active = active;
            self.dirty = true;
        }
    }

    pub fn set_queued(&mut self, queued: BTreeSet<NodeId>) {
        if self.queued != queued {
            self.queued = queued;
            self.dirty = true;
        }
    }

    pub fn set_searched(&mut self, searched: BTreeSet<NodeId>) {
        if self.searched != searched {
            self.searched = searched;
            self.dirty = true;
        }
    }

    pub fn set_route(&mut self, route: Vec<NodeId>) {
        if self.route != route {
            self.route = route;
            self.dirty = true;
        }
    }

    /// Copies the search snapshot into the highlight state.
    pub fn sync(&mut self, search: &dyn Search) {
        self.set_active(search.current());
        self.set_queued(search.frontier().iter().map(|v| v.node).collect());
        self.set_searched(search.visited().iter().map(|v| v.node).collect());
        self.set_route(
            search
                .route()
                .map(|r| r.stops().iter().map(|s| s.node).collect())
                .unwrap_or_default(),
        );
    }

    /// Drops everything a search put on the scene. Hover is kept.
    pub fn clear_search(&mut self) {
        self.set_active(None);
        self.set_queued(BTreeSet::new());
        self.set_searched(BTreeSet::new());
        self.set_route(Vec::new());
    }

    /// First city (in id order) under the pointer.
    pub fn city_at(&self, x: f64, y: f64) -> Option<NodeId> {
        self.cities
            .iter()
            .find_map(|(&id, city)| city.contains(x, y).then_some(id))
    }

    /// `"{name} {x} {y}"` for the hover tooltip.
    pub fn tooltip(&self, id: NodeId) -> Option<String> {
        let city = self.cities.get(&id)?;
        let name = self.name(id)?;
        Some(format!("{name} {} {}", city.x, city.y))
    }

    pub fn city_highlight(&self, id: NodeId) -> Highlight {
        if self.hovered == Some(id) {
            Highlight::Hovered
        } else if self.route.contains(&id) {
            Highlight::Route
        } else if self.active == Some(id) {
            Highlight::Active
        } else if self.searched.contains(&id) {
            Highlight::Searched
        } else if self.queued.contains(&id) {
            Highlight::Queued
        } else {
            Highlight::Plain
        }
    }

    /// Route membership needs both ends adjacent on the route; every other
    /// state matches either end.
    pub fn conn_highlight(&self, conn: Conn) -> Highlight {
        let Conn(a, b) = conn;
        if self.hovered.is_some_and(|h| conn.touches(h)) {
            Highlight::Hovered
        } else if self
            .route
            .windows(2)
            .any(|leg| Conn::new(leg[0], leg[1]) == conn)
        {
            Highlight::Route
        } else if self.active.is_some_and(|n| conn.touches(n)) {
            Highlight::Active
        } else if self.searched.contains(&a) || self.searched.contains(&b) {
            Highlight::Searched
        } else if self.queued.contains(&a) || self.queued.contains(&b) {
            Highlight::Queued
        } else {
            Highlight::Plain
        }
    }

    /// Redraws if anything changed since the last successful draw. Returns
    /// whether a redraw happened.
    pub fn draw<S: Surface>(&mut self, surface: &mut S) -> Result<bool, String> {
        if !self.dirty {
            return Ok(false);
        }

        surface.clear(self.width, self.height)?;

        for &conn in &self.conns {
            let (Some(from), Some(to)) = (self.cities.get(&conn.0), self.cities.get(&conn.1))
            else {
                continue;
            };
            surface.line(from, to, palette::conn(self.conn_highlight(conn)))?;
        }

        for (&id, city) in &self.cities {
            surface.dot(city, palette::city(self.city_highlight(id)))?;
        }

        self.dirty = false;
        Ok(true)
    }
}
