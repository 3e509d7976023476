//! geopin: map markers with reverse-geocoded popups
//!
//! The interaction core behind a "where am I / what is here" map page,
//! independent of any particular map widget.
//!
//! ## Features
//!
//! - Self-location marker from a one-shot geolocation provider
//! - Click-to-place, draggable selected marker
//! - Reverse geocoding through Nominatim with last-request-wins ordering
//! - Hover/click popups rendered per marker kind
//! - Headless map widget + CLI for driving a session from a terminal
//!
//! ## Quick Start
//!
//! ```rust
//! use geopin::controller::InteractionController;
//! use geopin::coord::LonLat;
//! use geopin::geo::AddressInfo;
//! use geopin::map::headless::HeadlessMap;
//! use geopin::notify::RecordingNotifier;
//!
//! let map = HeadlessMap::new(LonLat::new(107.5763, -6.8744), 16.0, 1024, 768);
//! let mut controller = InteractionController::new(map, RecordingNotifier::new(), 16.0);
//!
//! controller.start_geolocation();
//! let lookup = controller.on_geolocation(Ok(LonLat::new(107.5763, -6.8744))).unwrap();
//! controller.on_lookup_complete(lookup, Ok(AddressInfo::resolved(lookup.at, "Bandung, Indonesia")));
//!
//! let hover = controller.map().pointer_at_lonlat(LonLat::new(107.5763, -6.8744));
//! controller.on_pointer_move(hover);
//! assert!(controller.popup().state().content.contains("Bandung, Indonesia"));
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod controller;
pub mod coord;
pub mod error;
pub mod geo;
pub mod map;
pub mod marker;
pub mod notify;
pub mod popup;
pub mod session;

// Re-export commonly used types
pub use config::Config;
pub use controller::{InteractionController, Phase};
pub use coord::{LonLat, Pixel, Projected};
pub use error::{Error, Result};
pub use geo::{AddressInfo, AddressStatus};
pub use marker::{Marker, MarkerKind, MarkerStore};
