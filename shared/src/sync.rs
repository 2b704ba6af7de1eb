//! Map and list projections of the report collection, plus the focus signal.

use chrono::{DateTime, Utc};
use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use serde::{Deserialize, Serialize};

use crate::report::{Report, Severity, SeverityTone};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct MapMarker {
    pub id: u64,
    pub lat: f64,
    pub lng: f64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub tone: SeverityTone,
    pub timestamp: DateTime<Utc>,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ListEntry {
    pub id: u64,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub tone: SeverityTone,
    pub coordinate_label: String,
    pub timestamp: DateTime<Utc>,
}

/// One marker per report, keyed by id. Order carries no meaning.
pub fn markers(reports: &[Report]) -> Vec<MapMarker> {
    reports
        .iter()
        .map(|r| MapMarker {
            id: r.id.value(),
            lat: r.lat,
            lng: r.lng,
            title: r.title.clone(),
            description: r.description.clone(),
            severity: r.severity,
            tone: r.severity.tone(),
            timestamp: r.timestamp,
        })
        .collect()
}

/// Newest first.
pub fn list_entries(reports: &[Report]) -> Vec<ListEntry> {
    reports
        .iter()
        .rev()
        .map(|r| ListEntry {
            id: r.id.value(),
            title: r.title.clone(),
            description: r.description.clone(),
            severity: r.severity,
            tone: r.severity.tone(),
            coordinate_label: format!("{:.4}, {:.4}", r.lat, r.lng),
            timestamp: r.timestamp,
        })
        .collect()
}

/// Markers as a GeoJSON feature collection, for map renderers that take GeoJSON layers.
pub fn markers_geojson(reports: &[Report]) -> FeatureCollection {
    let features = reports
        .iter()
        .map(|r| {
            let mut properties = JsonObject::new();
            properties.insert("title".into(), r.title.clone().into());
            properties.insert("description".into(), r.description.clone().into());
            properties.insert("severity".into(), r.severity.as_str().into());
            properties.insert("timestamp".into(), r.timestamp.to_rfc3339().into());

            Feature {
                bbox: None,
                // GeoJSON positions are [lng, lat].
                geometry: Some(Geometry::new(Value::Point(vec![r.lng, r.lat]))),
                id: Some(geojson::feature::Id::Number(r.id.value().into())),
                properties: Some(properties),
                foreign_members: None,
            }
        })
        .collect();

    FeatureCollection {
        bbox: None,
        features,
        foreign_members: None,
    }
}

/// "Recenter here now". Each emission gets a fresh sequence number, so two
/// targets with equal coordinates are still distinct events.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct FocusTarget {
    pub lat: f64,
    pub lng: f64,
    pub zoom: f64,
    pub sequence: u64,
}

#[derive(Clone, Debug, Default)]
pub struct FocusSignal {
    next_sequence: u64,
    current: Option<FocusTarget>,
}

impl FocusSignal {
    pub fn emit(&mut self, (lat, lng): (f64, f64), zoom: f64) -> FocusTarget {
        self.next_sequence += 1;
        let target = FocusTarget {
            lat,
            lng,
            zoom,
            sequence: self.next_sequence,
        };
        self.current = Some(target);
        target
    }

    pub fn current(&self) -> Option<&FocusTarget> {
        self.current.as_ref()
    }

    pub fn take(&mut self) -> Option<FocusTarget> {
        self.current.take()
    }

    /// Clears the pending target if `sequence` is the one outstanding.
    /// A stale acknowledgement leaves a newer target in place.
    pub fn acknowledge(&mut self, sequence: u64) -> bool {
        match self.current {
            Some(target) if target.sequence == sequence => {
                self.current = None;
                true
            }
            _ => false,
        }
    }
}
