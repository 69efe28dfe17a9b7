//! The activity store.
//!
//! Owns the ordered in-memory activity list and its reconciliation with
//! the persistence slot. Insertion order is display order is persistence
//! order; the store is the single writer of both the list and the slot.

use tracing::{debug, info, warn};

use crate::activity::{Activity, ActivityDetails, ActivityId, Coords};
use crate::error::{Error, Result};
use crate::storage::Storage;

/// Validation failure message for non-finite or non-positive inputs.
pub const INVALID_INPUT_MESSAGE: &str = "Inputs have to be positive numbers";

/// Ordered list of activities backed by the persistence slot.
#[derive(Debug)]
pub struct ActivityStore {
    activities: Vec<Activity>,
    storage: Storage,
}

impl ActivityStore {
    /// Create a store over the given storage handle, starting empty.
    #[must_use]
    pub fn new(storage: Storage) -> Self {
        Self {
            activities: Vec::new(),
            storage,
        }
    }

    /// Validate and append a new activity.
    ///
    /// Duration, cost, and the kind-specific quantity must all be finite
    /// and strictly positive; on failure nothing is mutated. The caller is
    /// responsible for triggering [`ActivityStore::persist`] once rendering
    /// has been dispatched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidInput`] if any numeric field fails
    /// validation.
    pub fn create(
        &mut self,
        details: ActivityDetails,
        coords: Coords,
        duration: f64,
        cost: f64,
    ) -> Result<&Activity> {
        validate_inputs(duration, cost, details.quantity())?;

        let activity = Activity::new(details, coords, duration, cost);
        debug!(id = %activity.id, kind = %activity.kind(), "Created activity");
        let idx = self.activities.len();
        self.activities.push(activity);
        Ok(&self.activities[idx])
    }

    /// Write the full list to the persistence slot.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the storage write fails.
    pub fn persist(&self) -> Result<()> {
        self.storage.save(&self.activities)
    }

    /// Remove the first activity matching `id` and persist the reduced
    /// list. Removing a missing id is a no-op.
    ///
    /// Returns whether an activity was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the persistence write fails.
    pub fn remove(&mut self, id: &ActivityId) -> Result<bool> {
        let Some(pos) = self.activities.iter().position(|act| &act.id == id) else {
            warn!(%id, "No activity with this id; nothing removed");
            return Ok(false);
        };

        let removed = self.activities.remove(pos);
        info!(id = %removed.id, "Removed activity");
        self.persist()?;
        Ok(true)
    }

    /// Empty the list and clear the persistence slot. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage write fails.
    pub fn remove_all(&mut self) -> Result<()> {
        self.activities.clear();
        self.storage.clear()?;
        info!("Removed all activities");
        Ok(())
    }

    /// Replace the in-memory list wholesale from the persistence slot.
    ///
    /// A missing or malformed slot leaves the list empty. Returns the
    /// number of restored activities.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage read fails.
    pub fn restore(&mut self) -> Result<usize> {
        self.activities = self.storage.load()?;
        debug!("Restored {} activities", self.activities.len());
        Ok(self.activities.len())
    }

    /// Find an activity by id.
    #[must_use]
    pub fn find(&self, id: &ActivityId) -> Option<&Activity> {
        self.activities.iter().find(|act| &act.id == id)
    }

    /// Iterate over the activities in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Activity> {
        self.activities.iter()
    }

    /// Number of activities in the list.
    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    /// Whether the list is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    /// The underlying storage handle.
    #[must_use]
    pub fn storage(&self) -> &Storage {
        &self.storage
    }
}

impl<'a> IntoIterator for &'a ActivityStore {
    type Item = &'a Activity;
    type IntoIter = std::slice::Iter<'a, Activity>;

    fn into_iter(self) -> Self::IntoIter {
        self.activities.iter()
    }
}

/// Check that every numeric input is finite and strictly positive.
fn validate_inputs(duration: f64, cost: f64, quantity: u32) -> Result<()> {
    let finite = duration.is_finite() && cost.is_finite();
    let positive = duration > 0.0 && cost > 0.0 && quantity > 0;
    if finite && positive {
        Ok(())
    } else {
        Err(Error::invalid_input(INVALID_INPUT_MESSAGE))
    }
}
