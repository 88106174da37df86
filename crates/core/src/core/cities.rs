//! The built-in map: fifteen major US cities and the connections between them.

use crate::graph::Graph;
use crate::point::Point;

/// City name with its position as packed `DDMMSS` latitude and longitude.
pub const CITIES: [(&str, i32, i32); 15] = [
    ("Boston, MA", 42_21_29, -71_03_49),
    ("New York, NY", 40_42_46, -74_00_21),
    ("Washington, DC", 38_54_17, -77_00_59),
    ("Atlanta, GA", 33_45_18, -84_23_24),
    ("Miami, FL", 25_46_31, -80_12_32),
    ("Detroit, MI", 42_19_53, -83_02_45),
    ("Chicago, IL", 41_50_13, -87_41_05),
    ("Houston, TX", 29_45_46, -95_22_59),
    ("Dallas, TX", 32_47_00, -96_48_00),
    ("Denver, CO", 39_45_43, -104_52_52),
    ("Phoenix, AZ", 33_27_00, -112_04_00),
    ("Las Vegas, NV", 36_10_30, -115_08_11),
    ("Los Angeles, CA", 34_03_00, -118_15_00),
    ("Seattle, WA", 47_36_35, -122_19_59),
    ("San Francisco, CA", 37_47_00, -122_25_00),
];

pub const CONNECTIONS: [(&str, &str); 30] = [
    ("Boston, MA", "New York, NY"),
    ("Boston, MA", "Detroit, MI"),
    ("New York, NY", "Washington, DC"),
    ("Washington, DC", "Atlanta, GA"),
    ("New York, NY", "Detroit, MI"),
    ("New York, NY", "Chicago, IL"),
    ("New York, NY", "Miami, FL"),
    ("Washington, DC", "Chicago, IL"),
    ("Atlanta, GA", "Dallas, TX"),
    ("Atlanta, GA", "Miami, FL"),
    ("Atlanta, GA", "Houston, TX"),
    ("Miami, FL", "Dallas, TX"),
    ("Miami, FL", "Houston, TX"),
    ("Detroit, MI", "Chicago, IL"),
    ("Detroit, MI", "Seattle, WA"),
    ("Chicago, IL", "Dallas, TX"),
    ("Chicago, IL", "Denver, CO"),
    ("Dallas, TX", "Houston, TX"),
    ("Dallas, TX", "Phoenix, AZ"),
    ("Denver, CO", "Phoenix, AZ"),
    ("Denver, CO", "Seattle, WA"),
    ("Denver, CO", "Las Vegas, NV"),
    ("Denver, CO", "San Francisco, CA"),
    ("Denver, CO", "Los Angeles, CA"),
    ("Las Vegas, NV", "Phoenix, AZ"),
    ("Las Vegas, NV", "Dallas, TX"),
    ("Las Vegas, NV", "Los Angeles, CA"),
    ("Phoenix, AZ", "Los Angeles, CA"),
    ("San Francisco, CA", "Seattle, WA"),
    ("San Francisco, CA", "Los Angeles, CA"),
];

pub fn us_cities() -> Graph {
    let mut graph = Graph::with_capacity(CITIES.len());

    for (name, lat, lon) in CITIES {
        graph
            .add_node(name, Point::from_dms(lat, lon))
            .expect("static city table has unique names");
    }
    for (a, b) in CONNECTIONS {
        graph
            .add_edge(a, b)
            .expect("static connection table names known cities");
    }

    graph
}
