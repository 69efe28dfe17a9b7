//! Boundary traits for the map, list, and platform capabilities.
//!
//! The core never talks to a mapping widget, a screen, or a positioning
//! service directly. Backends implement these traits; the application
//! context drives them. This keeps the CRUD loop testable with in-memory
//! fakes and leaves tile rendering, pan/zoom, and marker primitives to the
//! supplied widget.

use crate::activity::{Activity, ActivityId, ActivityKind, Coords};
use crate::error::Result;

/// The tile endpoint the map backend is expected to render from.
pub const OSM_TILE_URL: &str = "https://{s}.tile.openstreetmap.fr/hot/{z}/{x}/{y}.png";

/// The standard zoom level for initial view and recentering.
pub const DEFAULT_ZOOM: u8 = 13;

/// The one live map view.
///
/// Markers coexist and are never deduplicated; the only way to take a
/// marker off the map is [`MapSurface::clear_markers`], which the
/// application uses to re-derive the whole view after a deletion.
pub trait MapSurface: std::fmt::Debug {
    /// Initialize the view at the given center and zoom level.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying widget cannot be brought up.
    fn init_view(&mut self, center: Coords, zoom: u8) -> Result<()>;

    /// Whether the view has been initialized.
    ///
    /// Marker placement requires a live view; callers must check this (or
    /// be prepared for an error) before placing markers.
    fn is_ready(&self) -> bool;

    /// Place a marker with a popup, styled per activity kind.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is not ready or the widget rejects
    /// the marker.
    fn place_marker(&mut self, coords: Coords, popup: &str, kind: ActivityKind) -> Result<()>;

    /// Remove all markers from the view.
    ///
    /// # Errors
    ///
    /// Returns an error if the widget fails to clear.
    fn clear_markers(&mut self) -> Result<()>;

    /// Move the view to the given coordinates.
    ///
    /// # Errors
    ///
    /// Returns an error if the view is not ready.
    fn recenter(&mut self, coords: Coords, zoom: u8, animate: bool) -> Result<()>;
}

/// The ordered visual list of activity entries.
///
/// Entries are keyed by activity id and pushed newest-first, so the most
/// recent activity appears at the top even though backing storage keeps
/// insertion order.
pub trait ListSurface: std::fmt::Debug {
    /// Show a new entry at the top of the list.
    fn push_entry(&mut self, activity: &Activity);

    /// Remove the entry with the given id, if present.
    fn remove_entry(&mut self, id: &ActivityId);

    /// Remove every entry.
    fn clear_entries(&mut self);
}

/// One-shot position acquisition.
///
/// No timeout and no retry; a denied or unavailable position is reported
/// once and the caller decides how to degrade.
pub trait Geolocator: std::fmt::Debug {
    /// Request the current position.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::Geolocation`] if the position cannot be
    /// determined.
    fn current_position(&self) -> Result<Coords>;
}

/// User-visible, alert-style notifications.
pub trait Notifier: std::fmt::Debug {
    /// Surface a message to the user.
    fn alert(&mut self, message: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tile_url_is_osm_style() {
        assert!(OSM_TILE_URL.contains("openstreetmap"));
        assert!(OSM_TILE_URL.contains("{z}"));
        assert!(OSM_TILE_URL.contains("{x}"));
        assert!(OSM_TILE_URL.contains("{y}"));
    }

    #[test]
    fn test_default_zoom() {
        assert_eq!(DEFAULT_ZOOM, 13);
    }
}
