//! In-memory map widget
//!
//! Keeps a viewport (center, zoom, pixel size), a registry of point features,
//! the base layer's visibility and one popup overlay. Nothing is drawn; the
//! state is there to be inspected by the CLI and by tests.

use crate::config::MapConfig;
use crate::constants::geo::{HALF_WORLD_METERS, TILE_SIZE_PX};
use crate::coord::{to_geographic, to_projected, LonLat, Pixel, Projected};
use crate::map::{FeatureId, FeatureStyle, MapWidget, PointerEvent};
use std::collections::BTreeMap;

/// A feature registered on the headless map
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessFeature {
    pub at: Projected,
    pub style: FeatureStyle,
}

/// The popup overlay
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overlay {
    pub position: Option<Projected>,
    pub content: String,
}

impl Overlay {
    pub fn is_visible(&self) -> bool {
        self.position.is_some()
    }
}

/// Map widget without a renderer
#[derive(Debug, Clone)]
pub struct HeadlessMap {
    center: Projected,
    zoom: f64,
    width: f64,
    height: f64,
    hit_tolerance_px: f64,
    base_layer_visible: bool,
    features: BTreeMap<FeatureId, HeadlessFeature>,
    overlay: Overlay,
}

impl HeadlessMap {
    /// Create a map centered on `center`
    pub fn new(center: LonLat, zoom: f64, width: u32, height: u32) -> Self {
        Self {
            center: to_projected(center),
            zoom,
            width: width as f64,
            height: height as f64,
            hit_tolerance_px: crate::config::defaults::DEFAULT_HIT_TOLERANCE_PX,
            base_layer_visible: true,
            features: BTreeMap::new(),
            overlay: Overlay::default(),
        }
    }

    /// Create a map from the `[map]` config section
    pub fn from_config(config: &MapConfig) -> Self {
        Self::new(config.center(), config.zoom, config.width, config.height)
            .with_hit_tolerance(config.hit_tolerance_px)
    }

    /// Set the pixel radius used for hit-testing
    pub fn with_hit_tolerance(mut self, px: f64) -> Self {
        self.hit_tolerance_px = px;
        self
    }

    /// Meters per pixel at the current zoom
    pub fn resolution(&self) -> f64 {
        2.0 * HALF_WORLD_METERS / (TILE_SIZE_PX * 2f64.powf(self.zoom))
    }

    /// Map coordinate under a screen pixel
    pub fn pixel_to_projected(&self, pixel: Pixel) -> Projected {
        let res = self.resolution();
        Projected::new(
            self.center.x + (pixel.x - self.width / 2.0) * res,
            self.center.y - (pixel.y - self.height / 2.0) * res,
        )
    }

    /// Screen pixel of a map coordinate
    pub fn projected_to_pixel(&self, point: Projected) -> Pixel {
        let res = self.resolution();
        Pixel::new(
            (point.x - self.center.x) / res + self.width / 2.0,
            (self.center.y - point.y) / res + self.height / 2.0,
        )
    }

    /// Build the pointer event a widget would emit at `pixel`
    pub fn pointer_at(&self, pixel: Pixel) -> PointerEvent {
        PointerEvent {
            pixel,
            coordinate: self.pixel_to_projected(pixel),
        }
    }

    /// Build the pointer event for a geographic point
    pub fn pointer_at_lonlat(&self, coords: LonLat) -> PointerEvent {
        let coordinate = to_projected(coords);
        PointerEvent {
            pixel: self.projected_to_pixel(coordinate),
            coordinate,
        }
    }

    pub fn center(&self) -> LonLat {
        to_geographic(self.center)
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn base_layer_visible(&self) -> bool {
        self.base_layer_visible
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn features(&self) -> &BTreeMap<FeatureId, HeadlessFeature> {
        &self.features
    }
}

impl MapWidget for HeadlessMap {
    fn set_view(&mut self, center: Projected, zoom: f64) {
        self.center = center;
        self.zoom = zoom;
    }

    fn set_base_layer_visible(&mut self, visible: bool) {
        self.base_layer_visible = visible;
    }

    fn add_feature(&mut self, id: FeatureId, at: Projected, style: FeatureStyle) {
        self.features.insert(id, HeadlessFeature { at, style });
    }

    fn remove_feature(&mut self, id: FeatureId) {
        self.features.remove(&id);
    }

    fn feature_geometry(&self, id: FeatureId) -> Option<Projected> {
        self.features.get(&id).map(|f| f.at)
    }

    fn set_feature_geometry(&mut self, id: FeatureId, at: Projected) {
        if let Some(feature) = self.features.get_mut(&id) {
            feature.at = at;
        }
    }

    fn set_overlay_position(&mut self, anchor: Option<Projected>) {
        self.overlay.position = anchor;
    }

    fn set_overlay_content(&mut self, html: &str) {
        self.overlay.content = html.to_string();
    }

    fn features_at_pixel(&self, pixel: Pixel) -> Vec<FeatureId> {
        self.features
            .iter()
            .filter(|(_, f)| self.projected_to_pixel(f.at).distance(pixel) <= self.hit_tolerance_px)
            .map(|(id, _)| *id)
            .collect()
    }
}
