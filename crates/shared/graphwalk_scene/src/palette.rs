//! Colours and sizes used when drawing a scene.

use crate::scene::Highlight;

pub const DOT_RADIUS: f64 = 5.0;

/// Milliseconds between search steps while running.
pub const DEFAULT_TICK_MS: i32 = 250;

pub const CONN_COLOR: &str = "#f33";
pub const CITY_COLOR: &str = "#000";
pub const HOVERED_CONN_COLOR: &str = "#0cf";
pub const HOVERED_CITY_COLOR: &str = "#37f";
pub const QUEUED_CONN_COLOR: &str = "#ff0";
pub const QUEUED_CITY_COLOR: &str = "#dd0";
pub const SELECTED_CONN_COLOR: &str = "#7af";
pub const SELECTED_CITY_COLOR: &str = "#37f";
pub const SEARCHED_CONN_COLOR: &str = "#3f7";
pub const SEARCHED_CITY_COLOR: &str = "#393";
pub const ROUTE_CONN_COLOR: &str = "#c6f";
pub const ROUTE_CITY_COLOR: &str = "#60c";

pub const TEXT_COLOR: &str = "#ddd";
pub const LIST_HOVER_COLOR: &str = "#09c";
pub const TOOLTIP_FONT: &str = "12px serif";

pub fn city(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::Hovered => HOVERED_CITY_COLOR,
        Highlight::Route => ROUTE_CITY_COLOR,
        Highlight::Active => SELECTED_CITY_COLOR,
        Highlight::Searched => SEARCHED_CITY_COLOR,
        Highlight::Queued => QUEUED_CITY_COLOR,
        Highlight::Plain => CITY_COLOR,
    }
}

pub fn conn(highlight: Highlight) -> &'static str {
    match highlight {
        Highlight::Hovered => HOVERED_CONN_COLOR,
        Highlight::Route => ROUTE_CONN_COLOR,
        Highlight::Active => SELECTED_CONN_COLOR,
        Highlight::Searched => SEARCHED_CONN_COLOR,
        Highlight::Queued => QUEUED_CONN_COLOR,
        Highlight::Plain => CONN_COLOR,
    }
}
