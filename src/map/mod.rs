//! Map widget surface
//!
//! The controller never talks to a concrete map library. It drives whatever
//! implements `MapWidget`: feature add/remove, feature geometry,
//! the popup overlay, view centering, tile-layer visibility and pixel
//! hit-testing. `headless::HeadlessMap` is an in-memory implementation.

pub mod headless;

use crate::coord::{Pixel, Projected};
use serde::{Deserialize, Serialize};

/// Identity of a vector feature on the map
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct FeatureId(pub u64);

/// Icon style of a point feature
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureStyle {
    pub icon_src: String,
    pub scale: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tint: Option<String>,
}

/// Payload of a pointer event: where on screen, and where on the map
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub pixel: Pixel,
    pub coordinate: Projected,
}

/// Operations the interaction core needs from a map widget
pub trait MapWidget {
    /// Center the view and set its zoom level
    fn set_view(&mut self, center: Projected, zoom: f64);

    /// Show or hide the base tile layer
    fn set_base_layer_visible(&mut self, visible: bool);

    /// Add a point feature to the marker layer
    fn add_feature(&mut self, id: FeatureId, at: Projected, style: FeatureStyle);

    /// Remove a feature; unknown ids are ignored
    fn remove_feature(&mut self, id: FeatureId);

    /// Current geometry of a feature
    fn feature_geometry(&self, id: FeatureId) -> Option<Projected>;

    /// Move an existing feature
    fn set_feature_geometry(&mut self, id: FeatureId, at: Projected);

    /// Anchor the popup overlay; `None` hides it
    fn set_overlay_position(&mut self, anchor: Option<Projected>);

    /// Replace the popup overlay's content
    fn set_overlay_content(&mut self, html: &str);

    /// Features rendered under a screen pixel, in no particular order
    fn features_at_pixel(&self, pixel: Pixel) -> Vec<FeatureId>;
}
