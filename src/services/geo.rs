//! Equirectangular projection of events onto a fixed-size canvas.
//!
//! North is at the top and the anti-meridian at the left edge. Events without
//! usable coordinates are not placed but are counted so views can say how
//! many were left off the map.

use serde::Serialize;

use crate::domain::models::{AlertLevel, CanvasConfig, Event};

pub const MIN_MARKER_RADIUS: f64 = 3.0;
pub const MAX_MARKER_RADIUS: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A placed event marker.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub event_id: String,
    pub title: String,
    pub point: Point,
    pub radius: f64,
    pub alert_level: AlertLevel,
    pub convergence_index: usize,
}

/// Markers plus the count of events that could not be placed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapLayer {
    pub markers: Vec<Marker>,
    pub unlocated: usize,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoProjector {
    width: f64,
    height: f64,
}

impl From<CanvasConfig> for GeoProjector {
    fn from(canvas: CanvasConfig) -> Self {
        Self::new(canvas.width, canvas.height)
    }
}

impl GeoProjector {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub const fn width(&self) -> f64 {
        self.width
    }

    pub const fn height(&self) -> f64 {
        self.height
    }

    /// `x = (lon + 180) / 360 * W`, `y = (90 - lat) / 180 * H`.
    pub fn project(&self, latitude: f64, longitude: f64) -> Point {
        Point {
            x: (longitude + 180.0) / 360.0 * self.width,
            y: (90.0 - latitude) / 180.0 * self.height,
        }
    }

    /// Project an event, or `None` when it has no usable coordinates.
    pub fn place(&self, event: &Event) -> Option<Marker> {
        let (lat, lon) = event.coordinates.filter(|(lat, lon)| is_valid(*lat, *lon))?;
        let ci = event.convergence_index();
        Some(Marker {
            event_id: event.id.clone(),
            title: event.title.clone(),
            point: self.project(lat, lon),
            radius: marker_radius(ci),
            alert_level: event.alert_level,
            convergence_index: ci,
        })
    }

    /// Place every event, counting those that cannot be placed.
    pub fn layer(&self, events: &[Event]) -> MapLayer {
        let mut markers = Vec::with_capacity(events.len());
        let mut unlocated = 0;
        for event in events {
            match self.place(event) {
                Some(marker) => markers.push(marker),
                None => unlocated += 1,
            }
        }
        MapLayer { markers, unlocated }
    }
}

/// `clamp(CI * 2, 3, 10)`.
pub fn marker_radius(convergence_index: usize) -> f64 {
    (convergence_index as f64 * 2.0).clamp(MIN_MARKER_RADIUS, MAX_MARKER_RADIUS)
}

fn is_valid(latitude: f64, longitude: f64) -> bool {
    latitude.is_finite()
        && longitude.is_finite()
        && (-90.0..=90.0).contains(&latitude)
        && (-180.0..=180.0).contains(&longitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::event::fixtures::event_with_networks;

    const W: f64 = 960.0;
    const H: f64 = 480.0;

    #[test]
    fn test_projection_landmarks() {
        let p = GeoProjector::new(W, H);
        assert_eq!(p.project(0.0, 0.0), Point { x: W / 2.0, y: H / 2.0 });
        assert_eq!(p.project(90.0, -180.0), Point { x: 0.0, y: 0.0 });
        assert_eq!(p.project(-90.0, 180.0), Point { x: W, y: H });
    }

    #[test]
    fn test_marker_radius_clamps() {
        assert!((marker_radius(1) - 3.0).abs() < f64::EPSILON);
        assert!((marker_radius(2) - 4.0).abs() < f64::EPSILON);
        assert!((marker_radius(5) - 10.0).abs() < f64::EPSILON);
        assert!((marker_radius(8) - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_layer_counts_unlocated() {
        let mut located = event_with_networks("a", &[1, 2, 3]);
        located.coordinates = Some((-3.1, -60.0));
        let missing = event_with_networks("b", &[1]);
        let mut bogus = event_with_networks("c", &[1]);
        bogus.coordinates = Some((f64::NAN, 10.0));
        let mut out_of_range = event_with_networks("d", &[1]);
        out_of_range.coordinates = Some((95.0, 10.0));

        let layer = GeoProjector::new(W, H).layer(&[located, missing, bogus, out_of_range]);
        assert_eq!(layer.markers.len(), 1);
        assert_eq!(layer.unlocated, 3);
        assert_eq!(layer.markers[0].event_id, "a");
        assert!((layer.markers[0].radius - 6.0).abs() < f64::EPSILON);
    }
}
