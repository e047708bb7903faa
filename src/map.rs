//! Map hand-off for route drawing
//!
//! Turns stops and a tour into markers and line segments. Unresolved stops
//! get no marker and no segment touches them.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::models::{Coordinate, Location, Tour};

/// Center used when no stop has a position (India)
pub const DEFAULT_CENTER: Coordinate = Coordinate::new(20.5937, 78.9629);

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Marker {
    /// Stop index, `None` for the placeholder marker
    pub index: Option<usize>,
    pub label: String,
    pub coordinate: Coordinate,
    pub is_start: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Segment {
    pub from: usize,
    pub to: usize,
    pub path: [Coordinate; 2],
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RouteMap {
    pub center: Coordinate,
    pub markers: Vec<Marker>,
    pub segments: Vec<Segment>,
}

impl RouteMap {
    #[must_use]
    pub fn new(locations: &[Location], tour: &Tour) -> Self {
        let start = tour.start();
        let markers: Vec<Marker> = locations
            .iter()
            .enumerate()
            .filter_map(|(i, location)| {
                location.coordinate.map(|coordinate| Marker {
                    index: Some(i),
                    label: format!("Stop {i}: {}", location.name),
                    coordinate,
                    is_start: start == Some(i),
                })
            })
            .collect();

        let Some(center) = markers.first().map(|m| m.coordinate) else {
            return Self {
                center: DEFAULT_CENTER,
                markers: vec![Marker {
                    index: None,
                    label: "No valid points found".to_string(),
                    coordinate: DEFAULT_CENTER,
                    is_start: false,
                }],
                segments: Vec::new(),
            };
        };

        let position = |i: usize| locations.get(i).and_then(|l| l.coordinate);
        let segments = tour
            .legs()
            .filter_map(|(from, to)| {
                Some(Segment {
                    from,
                    to,
                    path: [position(from)?, position(to)?],
                })
            })
            .collect();

        Self {
            center,
            markers,
            segments,
        }
    }

    /// South-west and north-east corners around the stop markers
    #[must_use]
    pub fn bounds(&self) -> Option<(Coordinate, Coordinate)> {
        let mut stops = self.markers.iter().filter(|m| m.index.is_some());
        let first = stops.next()?.coordinate;
        Some(stops.fold((first, first), |(sw, ne), m| {
            let c = m.coordinate;
            (
                Coordinate::new(sw.latitude.min(c.latitude), sw.longitude.min(c.longitude)),
                Coordinate::new(ne.latitude.max(c.latitude), ne.longitude.max(c.longitude)),
            )
        }))
    }

    /// GeoJSON FeatureCollection of marker points and segment lines
    #[must_use]
    pub fn to_geojson(&self) -> Value {
        let points = self.markers.iter().map(|m| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "Point",
                    "coordinates": [m.coordinate.longitude, m.coordinate.latitude],
                },
                "properties": {
                    "index": m.index,
                    "label": m.label,
                    "start": m.is_start,
                },
            })
        });
        let lines = self.segments.iter().map(|s| {
            json!({
                "type": "Feature",
                "geometry": {
                    "type": "LineString",
                    "coordinates": s.path.iter()
                        .map(|c| [c.longitude, c.latitude])
                        .collect::<Vec<_>>(),
                },
                "properties": { "from": s.from, "to": s.to },
            })
        });

        json!({
            "type": "FeatureCollection",
            "features": points.chain(lines).collect::<Vec<_>>(),
        })
    }
}
