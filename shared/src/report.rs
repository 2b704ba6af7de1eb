use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::{MAX_DESCRIPTION_LENGTH, MAX_TITLE_LENGTH};

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ValidationError {
    #[error("invalid coordinate: lat={0}, lng={1}")]
    InvalidCoordinate(f64, f64),
    #[error("{field} is required")]
    Missing { field: &'static str },
    #[error("{field} too long ({len} > {max})")]
    TooLong {
        field: &'static str,
        len: usize,
        max: usize,
    },
}

// --- Report id: time-derived, serialized as a JSON number ---

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct ReportId(pub u64);

impl ReportId {
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ReportId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Older stores may hold the id as a string or as a float-typed JSON number.
impl<'de> Deserialize<'de> for ReportId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct IdVisitor;

        impl de::Visitor<'_> for IdVisitor {
            type Value = ReportId;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer id as a number or string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<ReportId, E> {
                Ok(ReportId(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<ReportId, E> {
                u64::try_from(v)
                    .map(ReportId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Signed(v), &self))
            }

            #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
            fn visit_f64<E: de::Error>(self, v: f64) -> Result<ReportId, E> {
                if v.is_finite() && v >= 0.0 && v.fract() == 0.0 && v < u64::MAX as f64 {
                    Ok(ReportId(v as u64))
                } else {
                    Err(E::invalid_value(de::Unexpected::Float(v), &self))
                }
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<ReportId, E> {
                v.trim()
                    .parse::<u64>()
                    .map(ReportId)
                    .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
            }
        }

        deserializer.deserialize_any(IdVisitor)
    }
}

// --- Coordinate: validated, NaN-safe ---

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    lat: f64,
    lng: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lng: f64) -> Result<Self, ValidationError> {
        if !lat.is_finite()
            || !lng.is_finite()
            || !(-90.0..=90.0).contains(&lat)
            || !(-180.0..=180.0).contains(&lng)
        {
            return Err(ValidationError::InvalidCoordinate(lat, lng));
        }
        Ok(Self { lat, lng })
    }

    #[must_use]
    pub fn lat(&self) -> f64 {
        self.lat
    }

    #[must_use]
    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// `"41.0082, 28.9784"` style label used by the list view.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lng)
    }
}

// --- Severity ---

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    Low,
    #[default]
    Medium,
    High,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeverityTone {
    Green,
    Orange,
    Red,
}

impl Severity {
    pub const ALL: [Severity; 3] = [Severity::Low, Severity::Medium, Severity::High];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Severity::Low => "Low",
            Severity::Medium => "Medium",
            Severity::High => "High",
        }
    }

    #[must_use]
    pub const fn tone(self) -> SeverityTone {
        match self {
            Severity::Low => SeverityTone::Green,
            Severity::Medium => SeverityTone::Orange,
            Severity::High => SeverityTone::Red,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// --- Report ---

/// A recorded incident. Field names match the persisted JSON layout.
///
/// Read-only outside the crate: a report never changes after creation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Report {
    pub(crate) id: ReportId,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) severity: Severity,
    pub(crate) timestamp: DateTime<Utc>,
    pub(crate) lat: f64,
    pub(crate) lng: f64,
}

impl Report {
    pub(crate) fn from_draft(id: ReportId, draft: ReportDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            severity: draft.severity,
            timestamp: draft.timestamp,
            lat: draft.location.lat(),
            lng: draft.location.lng(),
        }
    }

    pub fn id(&self) -> ReportId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn severity(&self) -> Severity {
        self.severity
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    #[must_use]
    pub fn coordinate(&self) -> (f64, f64) {
        (self.lat, self.lng)
    }
}

/// Everything a report needs except its id.
#[derive(Clone, Debug, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub timestamp: DateTime<Utc>,
    pub location: Coordinate,
}

/// What the report form submits. `timestamp` falls back to creation time.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct FormDraft {
    pub title: String,
    pub description: String,
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub timestamp: Option<DateTime<Utc>>,
}

impl FormDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>, severity: Severity) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            timestamp: None,
        }
    }

    #[must_use]
    pub fn at_time(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(ValidationError::Missing { field: "title" });
        }
        let len = title.chars().count();
        if len > MAX_TITLE_LENGTH {
            return Err(ValidationError::TooLong {
                field: "title",
                len,
                max: MAX_TITLE_LENGTH,
            });
        }

        if self.description.trim().is_empty() {
            return Err(ValidationError::Missing {
                field: "description",
            });
        }
        let len = self.description.chars().count();
        if len > MAX_DESCRIPTION_LENGTH {
            return Err(ValidationError::TooLong {
                field: "description",
                len,
                max: MAX_DESCRIPTION_LENGTH,
            });
        }

        Ok(())
    }

    /// Merges the form with the pinned location.
    #[must_use]
    pub fn into_draft(self, location: Coordinate, now: DateTime<Utc>) -> ReportDraft {
        ReportDraft {
            title: self.title.trim().to_string(),
            description: self.description,
            severity: self.severity,
            timestamp: self.timestamp.unwrap_or(now),
            location,
        }
    }
}
