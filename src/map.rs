//! Map view models handed to the Leaflet front end.
//!
//! A `MapView` is rebuilt from scratch for every filtered record set; nothing
//! here keeps state between requests.

use crate::colors::ColorMap;
use crate::config::MapConfig;
use crate::types::{StampRecord, VisitRecord, Visited};
use geo::{Centroid, MultiPoint, Point};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Glyph {
    Check,
    Close,
    Star,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerIcon {
    pub glyph: Glyph,
    pub shape: &'static str,
    pub border_color: String,
    pub background_color: String,
}

impl MarkerIcon {
    fn filled(glyph: Glyph, color: &str) -> Self {
        MarkerIcon {
            glyph,
            shape: "marker",
            border_color: color.to_string(),
            background_color: color.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub latitude: f64,
    pub longitude: f64,
    pub tooltip: String,
    pub popup: String,
    pub icon: MarkerIcon,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ControlPosition {
    TopLeft,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct FullscreenControl {
    pub position: ControlPosition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    /// [latitude, longitude]
    pub center: [f64; 2],
    pub zoom: u8,
    pub height: u32,
    pub width: u32,
    pub markers: Vec<Marker>,
    pub fullscreen: FullscreenControl,
}

impl MapView {
    fn new(positions: Vec<Point<f64>>, markers: Vec<Marker>, config: &MapConfig) -> Self {
        MapView {
            center: mean_center(positions).unwrap_or(config.default_center),
            zoom: config.zoom_start,
            height: config.height,
            width: config.width,
            markers,
            fullscreen: FullscreenControl { position: ControlPosition::TopLeft },
        }
    }

    pub fn is_empty(&self) -> bool {
        self.markers.is_empty()
    }

    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self.markers.iter().map(marker_feature).collect();
        FeatureCollection {
            bbox: None,
            features,
            foreign_members: None,
        }
    }
}

/// Arithmetic mean of the positions as [latitude, longitude], or `None` when
/// there is nothing to average.
pub fn mean_center(positions: Vec<Point<f64>>) -> Option<[f64; 2]> {
    let centroid = MultiPoint::new(positions).centroid()?;
    Some([centroid.y(), centroid.x()])
}

pub fn stamp_map(stamps: &[StampRecord], region_colors: &ColorMap, config: &MapConfig) -> MapView {
    let markers = stamps
        .iter()
        .map(|stamp| {
            let color = region_colors.color_for(stamp.region.as_deref().unwrap_or_default());
            let glyph = match stamp.visited {
                Visited::Yes => Glyph::Check,
                Visited::No => Glyph::Close,
            };
            let label = match stamp.year {
                Some(year) => format!("{} ({})", stamp.name, year),
                None => stamp.name.clone(),
            };
            Marker {
                latitude: stamp.latitude,
                longitude: stamp.longitude,
                tooltip: label.clone(),
                popup: label,
                icon: MarkerIcon::filled(glyph, color),
            }
        })
        .collect();
    let positions = stamps.iter().map(StampRecord::position).collect();
    MapView::new(positions, markers, config)
}

pub fn visit_map(visits: &[VisitRecord], visit_colors: &ColorMap, config: &MapConfig) -> MapView {
    let markers = visits
        .iter()
        .map(|visit| Marker {
            latitude: visit.latitude,
            longitude: visit.longitude,
            tooltip: visit.name.clone(),
            popup: visit.name.clone(),
            icon: MarkerIcon::filled(Glyph::Star, visit_colors.color_for(visit.status.label())),
        })
        .collect();
    let positions = visits.iter().map(VisitRecord::position).collect();
    MapView::new(positions, markers, config)
}

fn marker_feature(marker: &Marker) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("tooltip".to_string(), marker.tooltip.clone().into());
    properties.insert("popup".to_string(), marker.popup.clone().into());
    properties.insert("color".to_string(), marker.icon.background_color.clone().into());
    properties.insert(
        "icon".to_string(),
        serde_json::to_value(marker.icon.glyph).unwrap_or(serde_json::Value::Null),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![marker.longitude, marker.latitude]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::park_status;

    fn stamp(name: &str, year: i32, region: &str, lat: f64, lon: f64, visited: Visited) -> StampRecord {
        StampRecord {
            name: name.to_string(),
            year: Some(year),
            region: Some(region.to_string()),
            latitude: lat,
            longitude: lon,
            visited,
        }
    }

    fn region_colors() -> ColorMap {
        [("Northeast".to_string(), "darkgreen".to_string())]
            .into_iter()
            .collect()
    }

    #[test]
    fn center_is_mean_of_coordinates() {
        let stamps = vec![
            stamp("A", 2019, "Northeast", 40.0, -70.0, Visited::Yes),
            stamp("B", 2019, "Northeast", 44.0, -80.0, Visited::No),
        ];
        let view = stamp_map(&stamps, &region_colors(), &MapConfig::default());
        assert!((view.center[0] - 42.0).abs() < 1e-9);
        assert!((view.center[1] + 75.0).abs() < 1e-9);
        assert_eq!(view.zoom, 5);
    }

    #[test]
    fn empty_selection_uses_default_center() {
        let config = MapConfig::default();
        let view = stamp_map(&[], &region_colors(), &config);
        assert!(view.is_empty());
        assert_eq!(view.center, config.default_center);
        assert!(view.center.iter().all(|c| c.is_finite()));
    }

    #[test]
    fn stamp_markers_follow_region_and_visited() {
        let stamps = vec![
            stamp("Acadia", 2019, "Northeast", 44.35, -68.21, Visited::Yes),
            stamp("Zion", 2020, "Southwest", 37.30, -113.05, Visited::No),
        ];
        let view = stamp_map(&stamps, &region_colors(), &MapConfig::default());

        assert_eq!(view.markers.len(), 2);
        assert_eq!(view.markers[0].tooltip, "Acadia (2019)");
        assert_eq!(view.markers[0].popup, "Acadia (2019)");
        assert_eq!(view.markers[0].icon.glyph, Glyph::Check);
        assert_eq!(view.markers[0].icon.background_color, "darkgreen");
        assert_eq!(view.markers[0].icon.border_color, "darkgreen");
        assert_eq!(view.markers[0].icon.shape, "marker");
        assert_eq!(view.markers[1].icon.glyph, Glyph::Close);
        assert_eq!(view.markers[1].icon.background_color, "blue");
        assert_eq!(view.fullscreen.position, ControlPosition::TopLeft);
    }

    #[test]
    fn blank_fields_fall_back_in_markers() {
        let mut acadia = stamp("Acadia", 2019, "Northeast", 44.35, -68.21, Visited::No);
        acadia.year = None;
        acadia.region = None;
        let view = stamp_map(&[acadia], &region_colors(), &MapConfig::default());
        assert_eq!(view.markers[0].tooltip, "Acadia");
        assert_eq!(view.markers[0].icon.background_color, "blue");
    }

    #[test]
    fn visit_markers_are_stars_colored_by_status() {
        let visit = VisitRecord {
            name: "Arches".to_string(),
            latitude: 38.73,
            longitude: -109.59,
            evan: true,
            kelsey: true,
            status: park_status(true, true),
        };
        let colors: ColorMap = [("Evan And Kelsey".to_string(), "gold".to_string())]
            .into_iter()
            .collect();
        let view = visit_map(&[visit], &colors, &MapConfig::default());

        assert_eq!(view.markers[0].tooltip, "Arches");
        assert_eq!(view.markers[0].icon.glyph, Glyph::Star);
        assert_eq!(view.markers[0].icon.background_color, "gold");
        assert_eq!(view.center, [38.73, -109.59]);
    }

    #[test]
    fn feature_collection_uses_lon_lat_order() {
        let stamps = vec![stamp("Acadia", 2019, "Northeast", 44.35, -68.21, Visited::Yes)];
        let view = stamp_map(&stamps, &region_colors(), &MapConfig::default());
        let collection = view.to_feature_collection();

        assert_eq!(collection.features.len(), 1);
        let feature = &collection.features[0];
        let geometry = feature.geometry.as_ref().unwrap();
        assert_eq!(geometry.value, Value::Point(vec![-68.21, 44.35]));
        let properties = feature.properties.as_ref().unwrap();
        assert_eq!(properties["icon"], "check");
        assert_eq!(properties["color"], "darkgreen");
    }

    #[test]
    fn view_serializes_control_position_lowercase() {
        let view = stamp_map(&[], &ColorMap::default(), &MapConfig::default());
        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(json["fullscreen"]["position"], "topleft");
    }
}
