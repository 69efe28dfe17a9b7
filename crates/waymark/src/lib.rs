//! `waymark` - A map-based activity logger
//!
//! This library provides the core functionality for logging activities at
//! points on a map: a tagged activity model, a single-slot persistence
//! layer, the form/controller loop, and the boundary traits a map surface
//! backend must fulfill.

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

pub mod activity;
pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod form;
pub mod logging;
pub mod storage;
pub mod store;
pub mod surface;

pub use activity::{Activity, ActivityDetails, ActivityId, ActivityKind, Coords};
pub use app::App;
pub use config::Config;
pub use error::{Error, Result};
pub use form::FormController;
pub use logging::init_logging;
pub use store::ActivityStore;
pub use surface::{Geolocator, ListSurface, MapSurface, Notifier};
