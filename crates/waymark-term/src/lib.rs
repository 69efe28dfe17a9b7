//! Terminal surface backend for waymark.
//!
//! This crate supplies the concrete implementations of the core's boundary
//! traits for a plain terminal: a map surface that tracks view and marker
//! state and narrates it to stdout, a list surface that prints formatted
//! entries, a fixed-position geolocator, and an alert notifier on stderr.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod session;

use tracing::debug;

use waymark::activity::{Activity, ActivityId, ActivityKind, Coords};
use waymark::error::{Error, Result};
use waymark::surface::{Geolocator, ListSurface, MapSurface, Notifier};

/// Environment variable holding a `lat,lng` position for the session.
pub const POSITION_ENV_VAR: &str = "WAYMARK_POSITION";

/// One placed marker.
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    /// Marker coordinates.
    pub coords: Coords,
    /// Popup content (icon plus description).
    pub popup: String,
    /// Kind used for popup styling.
    pub kind: ActivityKind,
}

/// Map surface over stdout.
///
/// Holds the one live view: center, zoom, and the markers placed so far.
#[derive(Debug)]
pub struct TermMap {
    tile_url: String,
    center: Option<Coords>,
    zoom: u8,
    markers: Vec<Marker>,
}

impl TermMap {
    /// Create an uninitialized map over the given tile endpoint.
    #[must_use]
    pub fn new(tile_url: impl Into<String>) -> Self {
        Self {
            tile_url: tile_url.into(),
            center: None,
            zoom: 0,
            markers: Vec::new(),
        }
    }

    /// The markers currently on the map.
    #[must_use]
    pub fn markers(&self) -> &[Marker] {
        &self.markers
    }

    /// The current view center, if initialized.
    #[must_use]
    pub fn center(&self) -> Option<Coords> {
        self.center
    }
}

impl MapSurface for TermMap {
    fn init_view(&mut self, center: Coords, zoom: u8) -> Result<()> {
        self.center = Some(center);
        self.zoom = zoom;
        println!("🗺  Map at {center} (zoom {zoom}), tiles from {}", self.tile_url);
        Ok(())
    }

    fn is_ready(&self) -> bool {
        self.center.is_some()
    }

    fn place_marker(&mut self, coords: Coords, popup: &str, kind: ActivityKind) -> Result<()> {
        if !self.is_ready() {
            return Err(Error::MapUnavailable);
        }
        println!("📍 {popup} at {coords} [{kind}-popup]");
        self.markers.push(Marker {
            coords,
            popup: popup.to_string(),
            kind,
        });
        Ok(())
    }

    fn clear_markers(&mut self) -> Result<()> {
        debug!("Clearing {} markers", self.markers.len());
        self.markers.clear();
        Ok(())
    }

    fn recenter(&mut self, coords: Coords, zoom: u8, animate: bool) -> Result<()> {
        if !self.is_ready() {
            return Err(Error::MapUnavailable);
        }
        self.center = Some(coords);
        self.zoom = zoom;
        let how = if animate { "panning" } else { "jumping" };
        println!("🗺  {how} to {coords} (zoom {zoom})");
        Ok(())
    }
}

/// List surface over stdout, newest entry first.
#[derive(Debug, Default)]
pub struct TermList {
    entries: Vec<ActivityId>,
}

impl TermList {
    /// Create an empty list surface.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Ids of the displayed entries, newest first.
    #[must_use]
    pub fn entry_ids(&self) -> &[ActivityId] {
        &self.entries
    }
}

/// Format one list entry the way the list surface displays it.
#[must_use]
pub fn format_entry(activity: &Activity) -> String {
    format!(
        "{} {}  [id {}]\n   {} {} · ${} · {} min",
        activity.kind().icon(),
        activity.description,
        activity.id,
        activity.quantity(),
        activity.kind().unit(),
        activity.cost,
        activity.duration,
    )
}

impl ListSurface for TermList {
    fn push_entry(&mut self, activity: &Activity) {
        println!("{}", format_entry(activity));
        self.entries.insert(0, activity.id.clone());
    }

    fn remove_entry(&mut self, id: &ActivityId) {
        self.entries.retain(|entry| entry != id);
    }

    fn clear_entries(&mut self) {
        self.entries.clear();
    }
}

/// Geolocator backed by a fixed position.
///
/// Resolution order: the `WAYMARK_POSITION` environment variable
/// (`lat,lng`), then the configured fallback. With neither set, position
/// acquisition fails like a denied platform request.
#[derive(Debug)]
pub struct FixedGeolocator {
    position: Option<Coords>,
}

impl FixedGeolocator {
    /// Build from the environment, falling back to the configured position.
    #[must_use]
    pub fn from_env_or(fallback: Option<Coords>) -> Self {
        let position = std::env::var(POSITION_ENV_VAR)
            .ok()
            .and_then(|raw| parse_position(&raw))
            .or(fallback);
        Self { position }
    }

    /// Build from a known position.
    #[must_use]
    pub fn fixed(position: Coords) -> Self {
        Self {
            position: Some(position),
        }
    }
}

impl Geolocator for FixedGeolocator {
    fn current_position(&self) -> Result<Coords> {
        self.position.ok_or_else(|| {
            Error::geolocation(format!(
                "no position source; set {POSITION_ENV_VAR} or geolocation.fixed_position"
            ))
        })
    }
}

/// Parse a `lat,lng` pair.
#[must_use]
pub fn parse_position(raw: &str) -> Option<Coords> {
    let (lat, lng) = raw.split_once(',')?;
    let coords = Coords::new(lat.trim().parse().ok()?, lng.trim().parse().ok()?);
    coords.is_valid().then_some(coords)
}

/// Alert notifier over stderr.
#[derive(Debug, Default)]
pub struct TermNotifier;

impl Notifier for TermNotifier {
    fn alert(&mut self, message: &str) {
        eprintln!("⚠  {message}");
    }
}
