//! The application context.
//!
//! One `App` is constructed at startup and owns the store, the form
//! controller, and the boundary surface handles. It sequences the control
//! flow the surfaces cannot know about: restore before the map exists,
//! markers only after the view is up, and a wholesale resync of both
//! surfaces after any deletion.

use tracing::{info, warn};

use crate::activity::{ActivityId, Coords};
use crate::error::{Error, Result};
use crate::form::FormController;
use crate::store::ActivityStore;
use crate::surface::{Geolocator, ListSurface, MapSurface, Notifier};

/// The single application instance: store, form, and surface handles.
#[derive(Debug)]
pub struct App {
    store: ActivityStore,
    form: FormController,
    map: Box<dyn MapSurface>,
    list: Box<dyn ListSurface>,
    geolocator: Box<dyn Geolocator>,
    notifier: Box<dyn Notifier>,
    zoom: u8,
}

impl App {
    /// Wire up an application over the given store and surfaces.
    #[must_use]
    pub fn new(
        store: ActivityStore,
        map: Box<dyn MapSurface>,
        list: Box<dyn ListSurface>,
        geolocator: Box<dyn Geolocator>,
        notifier: Box<dyn Notifier>,
        zoom: u8,
    ) -> Self {
        Self {
            store,
            form: FormController::new(),
            map,
            list,
            geolocator,
            notifier,
            zoom,
        }
    }

    /// Start the session.
    ///
    /// Restores persisted activities and renders their list entries first;
    /// markers need a live view, so they are replayed only once geolocation
    /// has succeeded and the map is initialized. A failed geolocation is
    /// reported to the user and leaves the session in list-only mode.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or the map surface fails; a denied
    /// geolocation is not an error.
    pub fn start(&mut self) -> Result<()> {
        let restored = self.store.restore()?;
        for activity in self.store.iter() {
            self.list.push_entry(activity);
        }
        if restored > 0 {
            info!("Restored {restored} activities");
        }

        match self.geolocator.current_position() {
            Ok(center) => {
                self.map.init_view(center, self.zoom)?;
                for activity in self.store.iter() {
                    self.map
                        .place_marker(activity.coords, &activity.popup_content(), activity.kind())?;
                }
                Ok(())
            }
            Err(err) => {
                warn!("Geolocation failed: {err}");
                self.notifier
                    .alert(&format!("Could not load the map: {err}"));
                Ok(())
            }
        }
    }

    /// Handle a map click: open the form at the clicked coordinates, or
    /// re-target it if it is already open.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MapUnavailable`] if no map view exists.
    pub fn click(&mut self, coords: Coords) -> Result<()> {
        if !self.map.is_ready() {
            return Err(Error::MapUnavailable);
        }
        self.form.open(coords);
        Ok(())
    }

    /// Submit the open form.
    ///
    /// On success the new activity is appended, its marker and list entry
    /// are rendered, the full list is persisted (in that order, with no
    /// rollback across the three), and the form clears and hides. A
    /// validation rejection is surfaced as a user alert and leaves the
    /// form open with its input intact.
    ///
    /// # Errors
    ///
    /// Returns an error only for storage or surface failures; invalid
    /// input is reported via the notifier and is not an error here.
    pub fn submit(&mut self) -> Result<()> {
        let draft = match self.form.submit() {
            Ok(draft) => draft,
            Err(err) if err.is_user_error() => {
                self.notifier.alert(&err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let activity = match self
            .store
            .create(draft.details, draft.coords, draft.duration, draft.cost)
        {
            Ok(activity) => activity.clone(),
            Err(err) if err.is_invalid_input() => {
                self.notifier.alert(&err.to_string());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        if self.map.is_ready() {
            self.map
                .place_marker(activity.coords, &activity.popup_content(), activity.kind())?;
        }
        self.list.push_entry(&activity);
        self.store.persist()?;
        self.form.complete();
        info!(id = %activity.id, "Logged {}", activity.description);
        Ok(())
    }

    /// Remove one activity by id and resync both surfaces.
    ///
    /// A missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or a surface fails.
    pub fn remove(&mut self, id: &ActivityId) -> Result<()> {
        if self.store.remove(id)? {
            self.resync()?;
        }
        Ok(())
    }

    /// Remove every activity and resync both surfaces. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if storage or a surface fails.
    pub fn remove_all(&mut self) -> Result<()> {
        self.store.remove_all()?;
        self.resync()
    }

    /// Move the map view to an activity's coordinates, animated.
    ///
    /// A missing id is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MapUnavailable`] if no map view exists.
    pub fn recenter_on(&mut self, id: &ActivityId) -> Result<()> {
        if !self.map.is_ready() {
            return Err(Error::MapUnavailable);
        }
        let Some(activity) = self.store.find(id) else {
            warn!(%id, "No activity with this id; not recentering");
            return Ok(());
        };
        self.map.recenter(activity.coords, self.zoom, true)
    }

    /// Re-derive the complete list and marker view from the in-memory
    /// list. This replaces the original design's full view reload as the
    /// consistency boundary after deletions.
    fn resync(&mut self) -> Result<()> {
        self.list.clear_entries();
        for activity in self.store.iter() {
            self.list.push_entry(activity);
        }
        if self.map.is_ready() {
            self.map.clear_markers()?;
            for activity in self.store.iter() {
                self.map
                    .place_marker(activity.coords, &activity.popup_content(), activity.kind())?;
            }
        }
        Ok(())
    }

    /// The activity store.
    #[must_use]
    pub fn store(&self) -> &ActivityStore {
        &self.store
    }

    /// The form controller.
    #[must_use]
    pub fn form(&self) -> &FormController {
        &self.form
    }

    /// Mutable access to the form controller, for field edits.
    pub fn form_mut(&mut self) -> &mut FormController {
        &mut self.form
    }

    /// Whether a live map view exists.
    #[must_use]
    pub fn is_map_ready(&self) -> bool {
        self.map.is_ready()
    }
}
