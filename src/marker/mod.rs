//! Marker store
//!
//! Holds at most one `SelfLocation` marker and at most one `SelectedPoint`
//! marker, each mirrored as a feature on the map widget. Every position
//! change goes through the store so the map feature and the cached
//! projected position never drift from the geographic position.

use crate::constants::icon::{PIN_ICON_SCALE, PIN_ICON_SRC, SELECTED_TINT};
use crate::coord::{to_projected, LonLat, Pixel, Projected};
use crate::error::{Error, Result};
use crate::geo::AddressInfo;
use crate::map::{FeatureId, FeatureStyle, MapWidget};
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

/// Markers are identified by the map feature that renders them
pub type MarkerId = FeatureId;

/// What a marker stands for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarkerKind {
    /// The user's own position
    SelfLocation,
    /// The point the user clicked
    SelectedPoint,
}

impl MarkerKind {
    /// Icon style for this kind of marker
    pub fn style(&self) -> FeatureStyle {
        FeatureStyle {
            icon_src: PIN_ICON_SRC.to_string(),
            scale: PIN_ICON_SCALE,
            tint: match self {
                MarkerKind::SelfLocation => None,
                MarkerKind::SelectedPoint => Some(SELECTED_TINT.to_string()),
            },
        }
    }
}

impl fmt::Display for MarkerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarkerKind::SelfLocation => write!(f, "self"),
            MarkerKind::SelectedPoint => write!(f, "selected"),
        }
    }
}

/// A point of interest on the map
#[derive(Debug, Clone, PartialEq)]
pub struct Marker {
    id: MarkerId,
    kind: MarkerKind,
    position: LonLat,
    projected: Projected,
    address: AddressInfo,
}

impl Marker {
    fn new(id: MarkerId, kind: MarkerKind, position: LonLat, address: AddressInfo) -> Self {
        Self {
            id,
            kind,
            position,
            projected: to_projected(position),
            address,
        }
    }

    pub fn id(&self) -> MarkerId {
        self.id
    }

    pub fn kind(&self) -> MarkerKind {
        self.kind
    }

    pub fn position(&self) -> LonLat {
        self.position
    }

    pub fn projected(&self) -> Projected {
        self.projected
    }

    /// Address attached to this marker
    pub fn address(&self) -> &AddressInfo {
        &self.address
    }

    fn set_position(&mut self, position: LonLat) {
        self.position = position;
        self.projected = to_projected(position);
    }
}

/// Owner of the two markers
#[derive(Debug, Default)]
pub struct MarkerStore {
    next_id: u64,
    self_marker: Option<Marker>,
    selected: Option<Marker>,
}

impl MarkerStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate_id(&mut self) -> MarkerId {
        self.next_id += 1;
        FeatureId(self.next_id)
    }

    /// Create the self-location marker
    ///
    /// The self location is set once per session; a second call fails and
    /// leaves the existing marker untouched.
    pub fn set_self_location<M: MapWidget>(&mut self, map: &mut M, at: LonLat) -> Result<MarkerId> {
        at.validate()?;
        if self.self_marker.is_some() {
            return Err(Error::Marker("Self location is already set".to_string()));
        }

        let id = self.allocate_id();
        let marker = Marker::new(id, MarkerKind::SelfLocation, at, AddressInfo::pending(at));
        map.add_feature(id, marker.projected, MarkerKind::SelfLocation.style());
        debug!(id = id.0, position = %at, "self marker created");

        self.self_marker = Some(marker);
        Ok(id)
    }

    /// Replace the selected marker with a new one at `at`
    pub fn place_selected<M: MapWidget>(
        &mut self,
        map: &mut M,
        at: LonLat,
        address: AddressInfo,
    ) -> Result<MarkerId> {
        at.validate()?;
        if let Some(previous) = self.selected.take() {
            map.remove_feature(previous.id);
        }

        let id = self.allocate_id();
        let marker = Marker::new(id, MarkerKind::SelectedPoint, at, address);
        map.add_feature(id, marker.projected, MarkerKind::SelectedPoint.style());
        debug!(id = id.0, position = %at, "selected marker placed");

        self.selected = Some(marker);
        Ok(id)
    }

    /// Move the selected marker in place
    pub fn move_selected<M: MapWidget>(&mut self, map: &mut M, at: LonLat) -> Result<&Marker> {
        at.validate()?;
        let marker = self
            .selected
            .as_mut()
            .ok_or_else(|| Error::Marker("No selected marker to move".to_string()))?;

        marker.set_position(at);
        map.set_feature_geometry(marker.id, marker.projected);
        Ok(marker)
    }

    /// Attach a lookup result to the marker with the given id
    ///
    /// Returns false when that marker no longer exists.
    pub fn set_address(&mut self, id: MarkerId, address: AddressInfo) -> bool {
        match self.get_mut(id) {
            Some(marker) => {
                marker.address = address;
                true
            }
            None => false,
        }
    }

    /// Marker rendered under a screen pixel
    ///
    /// When both markers are hit, the self marker wins.
    pub fn hit_test<M: MapWidget>(&self, map: &M, pixel: Pixel) -> Option<&Marker> {
        let hits = map.features_at_pixel(pixel);
        self.iter().find(|marker| hits.contains(&marker.id))
    }

    /// Markers in hit-test order: self, then selected
    pub fn iter(&self) -> impl Iterator<Item = &Marker> {
        self.self_marker.iter().chain(self.selected.iter())
    }

    pub fn get(&self, id: MarkerId) -> Option<&Marker> {
        self.iter().find(|marker| marker.id == id)
    }

    fn get_mut(&mut self, id: MarkerId) -> Option<&mut Marker> {
        self.self_marker
            .iter_mut()
            .chain(self.selected.iter_mut())
            .find(|marker| marker.id == id)
    }

    pub fn self_marker(&self) -> Option<&Marker> {
        self.self_marker.as_ref()
    }

    pub fn selected(&self) -> Option<&Marker> {
        self.selected.as_ref()
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
