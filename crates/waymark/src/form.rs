//! The activity input form.
//!
//! A small state machine: hidden until a map click opens it at the clicked
//! coordinates, then editing until a valid submit or a cancel hides it
//! again. A click while the form is already open re-targets the pending
//! coordinates rather than queueing a second form.
//!
//! The form only coerces raw text into numbers; the positivity rules live
//! in [`crate::store::ActivityStore::create`], so a rejected draft leaves
//! the form visible with the user's input intact for correction.

use tracing::debug;

use crate::activity::{ActivityDetails, ActivityKind, Coords};
use crate::error::{Error, Result};
use crate::store::INVALID_INPUT_MESSAGE;

/// Where the form is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormState {
    /// Not shown; map clicks open it.
    Hidden,
    /// Open, targeting the clicked coordinates.
    Editing {
        /// Coordinates the next submit will log against.
        coords: Coords,
    },
}

/// A validated-for-shape form submission, ready for the store.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActivityDraft {
    /// Kind tag plus quantity.
    pub details: ActivityDetails,
    /// Target coordinates.
    pub coords: Coords,
    /// Duration in minutes.
    pub duration: f64,
    /// Cost in currency units.
    pub cost: f64,
}

/// The form controller: state machine plus raw field values.
#[derive(Debug)]
pub struct FormController {
    state: FormState,
    kind: ActivityKind,
    cost: String,
    duration: String,
    meals: String,
    items: String,
}

impl Default for FormController {
    fn default() -> Self {
        Self::new()
    }
}

impl FormController {
    /// Create a hidden form with the eating kind pre-selected.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: FormState::Hidden,
            kind: ActivityKind::Eating,
            cost: String::new(),
            duration: String::new(),
            meals: String::new(),
            items: String::new(),
        }
    }

    /// Whether the form is currently open.
    #[must_use]
    pub fn is_open(&self) -> bool {
        matches!(self.state, FormState::Editing { .. })
    }

    /// The coordinates the next submit will target, if open.
    #[must_use]
    pub fn pending_coords(&self) -> Option<Coords> {
        match self.state {
            FormState::Editing { coords } => Some(coords),
            FormState::Hidden => None,
        }
    }

    /// Open the form at the clicked coordinates.
    ///
    /// If the form is already open this re-targets the pending insertion
    /// point; field values are kept.
    pub fn open(&mut self, coords: Coords) {
        if self.is_open() {
            debug!(%coords, "Re-targeting open form");
        } else {
            debug!(%coords, "Opening form");
        }
        self.state = FormState::Editing { coords };
    }

    /// The currently selected kind.
    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        self.kind
    }

    /// Select the activity kind, toggling which quantity field is active.
    pub fn select_kind(&mut self, kind: ActivityKind) {
        self.kind = kind;
    }

    /// Set the raw cost field.
    pub fn set_cost(&mut self, raw: &str) {
        self.cost = raw.to_string();
    }

    /// Set the raw duration field.
    pub fn set_duration(&mut self, raw: &str) {
        self.duration = raw.to_string();
    }

    /// Set the raw meals field (active when kind is eating).
    pub fn set_meals(&mut self, raw: &str) {
        self.meals = raw.to_string();
    }

    /// Set the raw items field (active when kind is shopping).
    pub fn set_items(&mut self, raw: &str) {
        self.items = raw.to_string();
    }

    /// Coerce the raw fields into a draft for the store.
    ///
    /// The form stays open and keeps its field values; call
    /// [`FormController::complete`] once the store has accepted the draft.
    ///
    /// # Errors
    ///
    /// Returns [`Error::FormNotOpen`] if the form is hidden, or
    /// [`Error::InvalidInput`] if a field does not parse as a number.
    pub fn submit(&self) -> Result<ActivityDraft> {
        let FormState::Editing { coords } = self.state else {
            return Err(Error::FormNotOpen);
        };

        let cost = parse_number(&self.cost)?;
        let duration = parse_number(&self.duration)?;
        let details = match self.kind {
            ActivityKind::Eating => ActivityDetails::Eating {
                meals: parse_count(&self.meals)?,
            },
            ActivityKind::Shopping => ActivityDetails::Shopping {
                items: parse_count(&self.items)?,
            },
        };

        Ok(ActivityDraft {
            details,
            coords,
            duration,
            cost,
        })
    }

    /// Clear every field and hide the form after an accepted submission.
    pub fn complete(&mut self) {
        self.clear_fields();
        self.state = FormState::Hidden;
        debug!("Form hidden");
    }

    /// Discard input and hide the form.
    pub fn cancel(&mut self) {
        self.clear_fields();
        self.state = FormState::Hidden;
        debug!("Form cancelled");
    }

    fn clear_fields(&mut self) {
        self.cost.clear();
        self.duration.clear();
        self.meals.clear();
        self.items.clear();
    }
}

fn parse_number(raw: &str) -> Result<f64> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_input(INVALID_INPUT_MESSAGE))
}

fn parse_count(raw: &str) -> Result<u32> {
    raw.trim()
        .parse()
        .map_err(|_| Error::invalid_input(INVALID_INPUT_MESSAGE))
}
