//! Core activity types for waymark.
//!
//! This module defines the fundamental data structures for representing
//! logged activities: a point on the map, a kind tag, a kind-specific
//! quantity, and the derived fields (`id`, `date`, `description`) that are
//! stamped once at construction and never recomputed.

use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;

/// English month names, indexed by zero-based month number.
/// Descriptions are not localized.
pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coords {
    /// Latitude in decimal degrees.
    pub lat: f64,
    /// Longitude in decimal degrees.
    pub lng: f64,
}

impl Coords {
    /// Create a new coordinate pair.
    #[must_use]
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Check that both components are finite and within valid bounds.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lng.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lng)
    }
}

impl std::fmt::Display for Coords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.5}, {:.5}", self.lat, self.lng)
    }
}

/// The kind of activity that was logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    /// A meal out.
    Eating,
    /// A shopping trip.
    Shopping,
}

impl ActivityKind {
    /// The capitalized label used in descriptions and list entries.
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Eating => "Eating",
            Self::Shopping => "Shopping",
        }
    }

    /// The emoji shown in marker popups and list entries.
    #[must_use]
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Eating => "🍽️",
            Self::Shopping => "🛒",
        }
    }

    /// The unit label for the kind-specific quantity.
    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            Self::Eating => "Meals",
            Self::Shopping => "Items",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Eating => write!(f, "eating"),
            Self::Shopping => write!(f, "shopping"),
        }
    }
}

impl std::str::FromStr for ActivityKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "eating" => Ok(Self::Eating),
            "shopping" => Ok(Self::Shopping),
            other => Err(Error::invalid_input(format!(
                "unknown activity kind '{other}' (expected 'eating' or 'shopping')"
            ))),
        }
    }
}

/// The kind-specific payload of an activity.
///
/// Serialized internally tagged and flattened into [`Activity`], so the
/// persisted JSON stays a flat object with a `type` discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ActivityDetails {
    /// A meal out, counted in meals.
    Eating {
        /// Number of meals.
        meals: u32,
    },
    /// A shopping trip, counted in items.
    Shopping {
        /// Number of items bought.
        items: u32,
    },
}

impl ActivityDetails {
    /// The discriminator for this payload.
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        match self {
            Self::Eating { .. } => ActivityKind::Eating,
            Self::Shopping { .. } => ActivityKind::Shopping,
        }
    }

    /// The kind-specific quantity (meals or items).
    #[must_use]
    pub fn quantity(&self) -> u32 {
        match self {
            Self::Eating { meals } => *meals,
            Self::Shopping { items } => *items,
        }
    }
}

/// Opaque activity identifier, unique within the list.
///
/// Derived from the creation time: the last ten digits of the epoch
/// millisecond timestamp. Collisions are accepted as negligible, not
/// engineered against.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ActivityId(String);

impl ActivityId {
    /// Derive an id from a creation timestamp.
    #[must_use]
    pub fn from_timestamp(at: DateTime<Utc>) -> Self {
        let ms = at.timestamp_millis().unsigned_abs();
        Self(format!("{:010}", ms % 10_000_000_000))
    }

    /// The id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ActivityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ActivityId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// One logged activity.
///
/// `id`, `date`, `coords`, and `description` are immutable after
/// construction; `description` in particular is computed once and
/// round-trips through persistence verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Activity {
    /// Unique identifier, derived from the creation time.
    pub id: ActivityId,

    /// When this activity was logged.
    pub date: DateTime<Utc>,

    /// Where this activity was logged.
    pub coords: Coords,

    /// Duration in minutes.
    pub duration: f64,

    /// Cost in currency units.
    pub cost: f64,

    /// Human-readable label, e.g. "Eating on March 5".
    pub description: String,

    /// Kind tag plus the kind-specific quantity.
    #[serde(flatten)]
    pub details: ActivityDetails,
}

impl Activity {
    /// Create a new activity stamped with the current time.
    ///
    /// `duration`, `cost`, and the quantity inside `details` must already
    /// have been validated; the model does not re-check them.
    #[must_use]
    pub fn new(details: ActivityDetails, coords: Coords, duration: f64, cost: f64) -> Self {
        Self::new_at(details, coords, duration, cost, Utc::now())
    }

    /// Create a new activity stamped with an explicit creation time.
    #[must_use]
    pub fn new_at(
        details: ActivityDetails,
        coords: Coords,
        duration: f64,
        cost: f64,
        at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: ActivityId::from_timestamp(at),
            date: at,
            coords,
            duration,
            cost,
            description: describe(details.kind(), at),
            details,
        }
    }

    /// The kind discriminator.
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.details.kind()
    }

    /// The kind-specific quantity (meals or items).
    #[must_use]
    pub fn quantity(&self) -> u32 {
        self.details.quantity()
    }

    /// The popup content: icon plus description.
    #[must_use]
    pub fn popup_content(&self) -> String {
        format!("{} {}", self.kind().icon(), self.description)
    }
}

/// Build the derived description: "{CapitalizedKind} on {MonthName} {Day}".
fn describe(kind: ActivityKind, at: DateTime<Utc>) -> String {
    let month = MONTH_NAMES[at.month0() as usize];
    format!("{} on {} {}", kind.label(), month, at.day())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn march_5() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 5, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_description_eating() {
        let act = Activity::new_at(
            ActivityDetails::Eating { meals: 2 },
            Coords::new(10.0, 20.0),
            30.0,
            15.0,
            march_5(),
        );
        assert_eq!(act.description, "Eating on March 5");
    }

    #[test]
    fn test_description_shopping() {
        let at = Utc.with_ymd_and_hms(2024, 12, 24, 9, 0, 0).unwrap();
        let act = Activity::new_at(
            ActivityDetails::Shopping { items: 7 },
            Coords::new(0.0, 0.0),
            45.0,
            120.0,
            at,
        );
        assert_eq!(act.description, "Shopping on December 24");
    }

    #[test]
    fn test_id_is_ten_digits() {
        let id = ActivityId::from_timestamp(march_5());
        assert_eq!(id.as_str().len(), 10);
        assert!(id.as_str().chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_id_stable_for_same_timestamp() {
        let a = ActivityId::from_timestamp(march_5());
        let b = ActivityId::from_timestamp(march_5());
        assert_eq!(a, b);
    }

    #[test]
    fn test_kind_label_icon_unit() {
        assert_eq!(ActivityKind::Eating.label(), "Eating");
        assert_eq!(ActivityKind::Shopping.label(), "Shopping");
        assert_eq!(ActivityKind::Eating.unit(), "Meals");
        assert_eq!(ActivityKind::Shopping.unit(), "Items");
        assert_eq!(ActivityKind::Eating.icon(), "🍽️");
        assert_eq!(ActivityKind::Shopping.icon(), "🛒");
    }

    #[test]
    fn test_kind_from_str() {
        assert_eq!("eating".parse::<ActivityKind>().unwrap(), ActivityKind::Eating);
        assert_eq!(" Shopping ".parse::<ActivityKind>().unwrap(), ActivityKind::Shopping);
        assert!("driving".parse::<ActivityKind>().is_err());
    }

    #[test]
    fn test_details_quantity() {
        assert_eq!(ActivityDetails::Eating { meals: 3 }.quantity(), 3);
        assert_eq!(ActivityDetails::Shopping { items: 9 }.quantity(), 9);
    }

    #[test]
    fn test_serialized_form_is_flat() {
        let act = Activity::new_at(
            ActivityDetails::Eating { meals: 2 },
            Coords::new(10.0, 20.0),
            30.0,
            15.0,
            march_5(),
        );
        let json = serde_json::to_value(&act).unwrap();
        assert_eq!(json["type"], "eating");
        assert_eq!(json["meals"], 2);
        assert_eq!(json["description"], "Eating on March 5");
        assert_eq!(json["coords"]["lat"], 10.0);
        // No nested "details" object in the persisted form.
        assert!(json.get("details").is_none());
    }

    #[test]
    fn test_roundtrip_preserves_all_fields() {
        let act = Activity::new_at(
            ActivityDetails::Shopping { items: 4 },
            Coords::new(-33.9, 151.2),
            20.0,
            55.5,
            march_5(),
        );
        let json = serde_json::to_string(&act).unwrap();
        let back: Activity = serde_json::from_str(&json).unwrap();
        assert_eq!(back, act);
    }

    #[test]
    fn test_popup_content() {
        let act = Activity::new_at(
            ActivityDetails::Eating { meals: 1 },
            Coords::new(1.0, 2.0),
            10.0,
            5.0,
            march_5(),
        );
        assert_eq!(act.popup_content(), "🍽️ Eating on March 5");
    }

    #[test]
    fn test_coords_validity() {
        assert!(Coords::new(45.0, -120.0).is_valid());
        assert!(!Coords::new(91.0, 0.0).is_valid());
        assert!(!Coords::new(0.0, 181.0).is_valid());
        assert!(!Coords::new(f64::NAN, 0.0).is_valid());
    }

    #[test]
    fn test_coords_display() {
        let c = Coords::new(10.123456, -20.5);
        assert_eq!(c.to_string(), "10.12346, -20.50000");
    }

    #[test]
    fn test_month_names() {
        assert_eq!(MONTH_NAMES.len(), 12);
        assert_eq!(MONTH_NAMES[0], "January");
        assert_eq!(MONTH_NAMES[2], "March");
        assert_eq!(MONTH_NAMES[11], "December");
    }
}
