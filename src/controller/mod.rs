//! Interaction controller
//!
//! Wires pointer events, geolocation and reverse-geocode results to the
//! marker store and the popup. The controller never awaits anything itself:
//! handlers that need a lookup return a `LookupRequest`, and whoever runs the
//! lookup hands the outcome back through `on_lookup_complete`. Outcomes for
//! superseded requests are dropped.
//!
//! Phases: `Initializing -> AwaitingGps -> Ready`. Pointer, click, drag and
//! layer events are ignored until `Ready`. A failed geolocation still reaches
//! `Ready`, just without a self marker.

pub mod tracker;

use crate::coord::{to_geographic, to_projected, LonLat};
use crate::error::{Error, Result};
use crate::geo::AddressInfo;
use crate::map::{MapWidget, PointerEvent};
use crate::marker::{MarkerKind, MarkerStore};
use crate::notify::{Notification, Notifier, Severity};
use crate::popup::PopupPresenter;
use tracing::{debug, error, info, warn};
pub use tracker::{LookupRequest, RequestTracker, Ticket};

/// Controller lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Map and layers exist, no geolocation requested yet
    Initializing,
    /// Geolocation request in flight
    AwaitingGps,
    /// Interactive; `self_located` tells whether the self marker exists
    Ready { self_located: bool },
}

/// Owner of all interaction state for one map
pub struct InteractionController<M: MapWidget, N: Notifier> {
    map: M,
    notifier: N,
    markers: MarkerStore,
    popup: PopupPresenter,
    tracker: RequestTracker,
    phase: Phase,
    locate_zoom: f64,
    nav_open: bool,
}

impl<M: MapWidget, N: Notifier> InteractionController<M, N> {
    /// Create a controller; `locate_zoom` is applied when the user is found
    pub fn new(map: M, notifier: N, locate_zoom: f64) -> Self {
        Self {
            map,
            notifier,
            markers: MarkerStore::new(),
            popup: PopupPresenter::new(),
            tracker: RequestTracker::new(),
            phase: Phase::Initializing,
            locate_zoom,
            nav_open: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_ready(&self) -> bool {
        matches!(self.phase, Phase::Ready { .. })
    }

    pub fn map(&self) -> &M {
        &self.map
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn markers(&self) -> &MarkerStore {
        &self.markers
    }

    pub fn popup(&self) -> &PopupPresenter {
        &self.popup
    }

    /// Whether the navigation menu is expanded
    pub fn nav_open(&self) -> bool {
        self.nav_open
    }

    /// Move to `AwaitingGps`
    ///
    /// Returns false if geolocation was already requested.
    pub fn start_geolocation(&mut self) -> bool {
        if self.phase != Phase::Initializing {
            debug!(phase = ?self.phase, "geolocation already requested");
            return false;
        }
        self.phase = Phase::AwaitingGps;
        true
    }

    /// Apply the geolocation outcome and enter `Ready`
    ///
    /// On success the view is centered on the user, the self marker is
    /// created and a lookup for its address is returned.
    pub fn on_geolocation(&mut self, outcome: Result<LonLat>) -> Option<LookupRequest> {
        if self.phase != Phase::AwaitingGps {
            debug!(phase = ?self.phase, "ignoring unexpected geolocation result");
            return None;
        }

        match outcome.and_then(|at| self.locate(at)) {
            Ok(at) => {
                info!(position = %at, "user located");
                self.phase = Phase::Ready { self_located: true };
                Some(LookupRequest {
                    ticket: self.tracker.issue(MarkerKind::SelfLocation),
                    at,
                })
            }
            Err(e) => {
                warn!("geolocation failed: {}", e);
                self.phase = Phase::Ready { self_located: false };
                self.notifier.notify(Notification::error(
                    "Error",
                    "Failed to get your location. Make sure location access is allowed.",
                ));
                None
            }
        }
    }

    fn locate(&mut self, at: LonLat) -> Result<LonLat> {
        at.validate()
            .map_err(|e| Error::Geolocation(e.to_string()))?;
        self.markers.set_self_location(&mut self.map, at)?;
        self.map.set_view(to_projected(at), self.locate_zoom);
        Ok(at)
    }

    /// Hover: show the popup of the marker under the pointer, else hide it
    pub fn on_pointer_move(&mut self, event: PointerEvent) {
        if !self.is_ready() {
            return;
        }

        match self.markers.hit_test(&self.map, event.pixel) {
            Some(marker) => {
                self.popup
                    .show(&mut self.map, marker, marker.address().display_text());
            }
            None => self.popup.hide(&mut self.map),
        }
    }

    /// Click: request an address for the clicked point
    ///
    /// The selected marker is placed once the lookup succeeds.
    pub fn on_click(&mut self, event: PointerEvent) -> Option<LookupRequest> {
        if !self.is_ready() {
            debug!("ignoring click before ready");
            return None;
        }

        let at = to_geographic(event.coordinate);
        if let Err(e) = at.validate() {
            warn!("ignoring click: {}", e);
            return None;
        }

        let ticket = self.tracker.issue(MarkerKind::SelectedPoint);
        debug!(position = %at, generation = ticket.generation, "click lookup issued");
        Some(LookupRequest { ticket, at })
    }

    /// Drag: move the selected marker and keep the popup on it
    ///
    /// The address is not looked up again while dragging.
    pub fn on_pointer_drag(&mut self, event: PointerEvent) {
        if !self.is_ready() || self.markers.selected().is_none() {
            return;
        }

        let at = to_geographic(event.coordinate);
        match self.markers.move_selected(&mut self.map, at) {
            Ok(marker) => {
                self.popup
                    .show(&mut self.map, marker, marker.address().display_text());
            }
            Err(e) => warn!("drag ignored: {}", e),
        }
    }

    /// Apply the outcome of a lookup returned by this controller
    pub fn on_lookup_complete(&mut self, request: LookupRequest, outcome: Result<AddressInfo>) {
        if !self.tracker.is_current(&request.ticket) {
            debug!(
                kind = %request.ticket.target,
                generation = request.ticket.generation,
                "discarding superseded lookup"
            );
            return;
        }

        match request.ticket.target {
            MarkerKind::SelfLocation => self.complete_self_lookup(request, outcome),
            MarkerKind::SelectedPoint => self.complete_click_lookup(request, outcome),
        }
    }

    fn complete_self_lookup(&mut self, request: LookupRequest, outcome: Result<AddressInfo>) {
        let Some(id) = self.markers.self_marker().map(|m| m.id()) else {
            warn!("self lookup finished without a self marker");
            return;
        };

        let address = match outcome {
            Ok(address) => address,
            Err(e) => {
                error!("failed to resolve own location: {}", e);
                self.notifier.notify(Notification::error(
                    "Error",
                    "Failed to get location information.",
                ));
                AddressInfo::failed(request.at)
            }
        };
        self.markers.set_address(id, address);

        if self.popup.is_showing(id) {
            if let Some(marker) = self.markers.get(id) {
                self.popup
                    .show(&mut self.map, marker, marker.address().display_text());
            }
        }
    }

    fn complete_click_lookup(&mut self, request: LookupRequest, outcome: Result<AddressInfo>) {
        let address = match outcome {
            Ok(address) => address,
            Err(e) => {
                error!(position = %request.at, "failed to fetch address: {}", e);
                self.notifier.notify(Notification::error(
                    "Error",
                    "Failed to get the address of the selected point.",
                ));
                return;
            }
        };

        match self.markers.place_selected(&mut self.map, request.at, address) {
            Ok(id) => {
                if let Some(marker) = self.markers.get(id) {
                    self.popup
                        .show(&mut self.map, marker, marker.address().display_text());
                }
            }
            Err(e) => warn!("could not place selected marker: {}", e),
        }
    }

    /// Show or hide the base tile layer
    pub fn set_base_layer_visible(&mut self, visible: bool) {
        if !self.is_ready() {
            debug!("ignoring layer toggle before ready");
            return;
        }

        self.map.set_base_layer_visible(visible);
        let notification = if visible {
            Notification::new("Layer Shown", "The map layer has been enabled.", Severity::Success)
        } else {
            Notification::new("Layer Hidden", "The map layer has been hidden.", Severity::Info)
        };
        self.notifier.notify(notification);
    }

    /// Flip the navigation menu; returns the new state
    pub fn toggle_menu(&mut self) -> bool {
        self.nav_open = !self.nav_open;
        self.nav_open
    }

    /// Close control on the popup
    pub fn dismiss_popup(&mut self) {
        self.popup.hide(&mut self.map);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::AddressStatus;
    use crate::map::headless::HeadlessMap;
    use crate::notify::RecordingNotifier;
    use approx::assert_abs_diff_eq;

    type TestController = InteractionController<HeadlessMap, RecordingNotifier>;

    const BANDUNG: LonLat = LonLat { lon: 107.5763, lat: -6.8744 };

    fn controller() -> TestController {
        let map = HeadlessMap::new(LonLat::new(106.0, -6.0), 12.0, 1024, 768);
        InteractionController::new(map, RecordingNotifier::new(), 16.0)
    }

    /// Controller that failed geolocation, so it is ready without a self marker
    fn ready_controller() -> TestController {
        let mut c = controller();
        c.start_geolocation();
        c.on_geolocation(Err(Error::Geolocation("denied".to_string())));
        c.notifier.notifications.clear();
        c
    }

    fn event(c: &TestController, at: LonLat) -> PointerEvent {
        c.map().pointer_at_lonlat(at)
    }

    fn click(c: &mut TestController, at: LonLat) -> LookupRequest {
        let ev = event(c, at);
        c.on_click(ev).expect("click should issue a lookup")
    }

    fn resolve(request: &LookupRequest, text: &str) -> Result<AddressInfo> {
        Ok(AddressInfo::resolved(request.at, text))
    }

    #[test]
    fn test_phase_transitions() {
        let mut c = controller();
        assert_eq!(c.phase(), Phase::Initializing);
        assert!(c.start_geolocation());
        assert_eq!(c.phase(), Phase::AwaitingGps);
        assert!(!c.start_geolocation());

        c.on_geolocation(Ok(BANDUNG));
        assert_eq!(c.phase(), Phase::Ready { self_located: true });
    }

    #[test]
    fn test_geolocation_success_centers_and_creates_self_marker() {
        let mut c = controller();
        c.start_geolocation();
        let request = c.on_geolocation(Ok(BANDUNG)).unwrap();

        assert_eq!(request.ticket.target, MarkerKind::SelfLocation);
        assert_eq!(request.at, BANDUNG);
        assert_eq!(c.map().zoom(), 16.0);
        assert_abs_diff_eq!(c.map().center().lon, BANDUNG.lon, epsilon = 1e-9);
        assert_abs_diff_eq!(c.map().center().lat, BANDUNG.lat, epsilon = 1e-9);

        let own = c.markers().self_marker().unwrap();
        assert_eq!(own.position(), BANDUNG);
        assert_eq!(own.address().status, AddressStatus::Pending);
    }

    #[test]
    fn test_hover_self_shows_resolved_address() {
        let mut c = controller();
        c.start_geolocation();
        let request = c.on_geolocation(Ok(BANDUNG)).unwrap();
        c.on_lookup_complete(request, resolve(&request, "Bandung, Indonesia"));

        let ev = event(&c, BANDUNG);
        c.on_pointer_move(ev);

        let content = &c.popup().state().content;
        assert!(content.contains("Your Location"));
        assert!(content.contains("Bandung, Indonesia"));
        assert!(content.contains("107.576300, -6.874400"));
        assert!(c.map().overlay().is_visible());
    }

    #[test]
    fn test_pending_self_popup_updates_when_resolved() {
        let mut c = controller();
        c.start_geolocation();
        let request = c.on_geolocation(Ok(BANDUNG)).unwrap();

        let ev = event(&c, BANDUNG);
        c.on_pointer_move(ev);
        assert!(c.popup().state().content.contains("Looking up address"));

        c.on_lookup_complete(request, resolve(&request, "Bandung, Indonesia"));
        assert!(c.popup().state().content.contains("Bandung, Indonesia"));
        assert!(c.map().overlay().content.contains("Bandung, Indonesia"));
    }

    #[test]
    fn test_self_lookup_failure_notifies_once() {
        let mut c = controller();
        c.start_geolocation();
        let request = c.on_geolocation(Ok(BANDUNG)).unwrap();
        c.on_lookup_complete(request, Err(Error::Geocoding("timeout".to_string())));

        assert_eq!(c.notifier().with_severity(Severity::Error).len(), 1);
        let own = c.markers().self_marker().unwrap();
        assert_eq!(own.address().status, AddressStatus::Failed);
    }

    #[test]
    fn test_geolocation_failure_still_allows_clicks() {
        let mut c = controller();
        c.start_geolocation();
        let request = c.on_geolocation(Err(Error::Geolocation("denied".to_string())));

        assert!(request.is_none());
        assert_eq!(c.phase(), Phase::Ready { self_located: false });
        assert!(c.markers().self_marker().is_none());
        assert_eq!(c.notifier().notifications.len(), 1);
        assert_eq!(c.notifier().notifications[0].severity, Severity::Error);

        let at = LonLat::new(106.0, -6.0);
        let request = click(&mut c, at);
        c.on_lookup_complete(request, resolve(&request, "Somewhere"));
        assert!(c.markers().selected().is_some());
        assert_eq!(c.notifier().notifications.len(), 1);
    }

    #[test]
    fn test_late_geolocation_result_is_ignored() {
        let mut c = ready_controller();
        assert!(c.on_geolocation(Ok(BANDUNG)).is_none());
        assert!(c.markers().self_marker().is_none());
    }

    #[test]
    fn test_events_before_ready_are_ignored() {
        let mut c = controller();
        let ev = event(&c, BANDUNG);

        assert!(c.on_click(ev).is_none());
        c.on_pointer_move(ev);
        c.on_pointer_drag(ev);
        c.set_base_layer_visible(false);

        c.start_geolocation();
        c.on_pointer_move(ev);
        assert!(c.on_click(ev).is_none());

        assert!(!c.popup().state().is_visible());
        assert!(!c.map().overlay().is_visible());
        assert!(c.markers().is_empty());
        assert!(c.map().base_layer_visible());
        assert!(c.notifier().notifications.is_empty());
    }

    #[test]
    fn test_click_places_marker_and_shows_popup() {
        let mut c = ready_controller();
        let at = LonLat::new(106.0, -6.0);
        let request = click(&mut c, at);

        assert!(c.markers().selected().is_none());
        c.on_lookup_complete(request, resolve(&request, "Serang, Banten"));

        let selected = c.markers().selected().unwrap();
        assert_abs_diff_eq!(selected.position().lon, 106.0, epsilon = 1e-9);
        assert_abs_diff_eq!(selected.position().lat, -6.0, epsilon = 1e-9);
        assert!(c.popup().is_showing(selected.id()));
        assert!(c.popup().state().content.contains("Serang, Banten"));
        assert!(c.popup().state().content.contains("Selected Marker"));

        let clicked = to_projected(at);
        let anchor = c.popup().state().anchor.unwrap();
        assert_abs_diff_eq!(anchor.x, clicked.x, epsilon = 1e-6);
        assert_abs_diff_eq!(anchor.y, clicked.y, epsilon = 1e-6);
        assert_eq!(c.map().overlay().position, Some(anchor));
    }

    #[test]
    fn test_two_clicks_leave_one_marker_at_second_point() {
        let mut c = ready_controller();
        let first = LonLat::new(106.0, -6.0);
        let second = LonLat::new(106.01, -6.01);

        let a = click(&mut c, first);
        c.on_lookup_complete(a, resolve(&a, "first"));
        let b = click(&mut c, second);
        c.on_lookup_complete(b, resolve(&b, "second"));

        assert_eq!(c.markers().len(), 1);
        assert_eq!(c.map().features().len(), 1);
        let selected = c.markers().selected().unwrap();
        assert_abs_diff_eq!(selected.position().lon, 106.01, epsilon = 1e-9);
        assert_eq!(selected.address().text, "second");
    }

    #[test]
    fn test_last_request_wins_when_earlier_resolves_later() {
        let mut c = ready_controller();
        let a = click(&mut c, LonLat::new(106.0, -6.0));
        let b = click(&mut c, LonLat::new(106.01, -6.01));

        c.on_lookup_complete(b, resolve(&b, "B"));
        c.on_lookup_complete(a, resolve(&a, "A"));

        let selected = c.markers().selected().unwrap();
        assert_eq!(selected.address().text, "B");
        assert_abs_diff_eq!(selected.position().lon, 106.01, epsilon = 1e-9);
        assert!(c.popup().state().content.contains("B"));
    }

    #[test]
    fn test_superseded_request_is_dropped_even_if_first() {
        let mut c = ready_controller();
        let a = click(&mut c, LonLat::new(106.0, -6.0));
        let b = click(&mut c, LonLat::new(106.01, -6.01));

        c.on_lookup_complete(a, resolve(&a, "A"));
        assert!(c.markers().selected().is_none());

        c.on_lookup_complete(b, resolve(&b, "B"));
        assert_eq!(c.markers().selected().unwrap().address().text, "B");
    }

    #[test]
    fn test_click_geocode_failure_creates_no_marker() {
        let mut c = ready_controller();
        let request = click(&mut c, LonLat::new(106.0, -6.0));
        c.on_lookup_complete(
            request,
            Err(Error::Geocoding("Nominatim returned status: 500".to_string())),
        );

        assert!(c.markers().selected().is_none());
        assert_eq!(c.notifier().notifications.len(), 1);

        let retry = click(&mut c, LonLat::new(106.0, -6.0));
        c.on_lookup_complete(retry, resolve(&retry, "ok"));
        assert!(c.markers().selected().is_some());
    }

    #[test]
    fn test_failed_click_keeps_previous_marker() {
        let mut c = ready_controller();
        let a = click(&mut c, LonLat::new(106.0, -6.0));
        c.on_lookup_complete(a, resolve(&a, "kept"));

        let b = click(&mut c, LonLat::new(106.01, -6.01));
        c.on_lookup_complete(b, Err(Error::Geocoding("down".to_string())));

        assert_eq!(c.markers().selected().unwrap().address().text, "kept");
    }

    #[test]
    fn test_drag_moves_marker_without_new_lookup() {
        let mut c = ready_controller();
        let a = click(&mut c, LonLat::new(106.0, -6.0));
        c.on_lookup_complete(a, resolve(&a, "origin"));
        let id = c.markers().selected().unwrap().id();
        let generation = c.tracker.latest(MarkerKind::SelectedPoint);

        for step in 1..=3 {
            let to = LonLat::new(106.0 + 0.001 * step as f64, -6.0);
            let ev = event(&c, to);
            c.on_pointer_drag(ev);

            let selected = c.markers().selected().unwrap();
            assert_eq!(selected.id(), id);
            assert_abs_diff_eq!(selected.position().lon, to.lon, epsilon = 1e-9);
            assert_eq!(c.popup().state().anchor, Some(selected.projected()));
        }

        assert_eq!(c.tracker.latest(MarkerKind::SelectedPoint), generation);
        assert_eq!(c.markers().selected().unwrap().address().text, "origin");
        assert!(c.popup().state().content.contains("106.003000"));
    }

    #[test]
    fn test_drag_without_selected_is_noop() {
        let mut c = ready_controller();
        let ev = event(&c, LonLat::new(106.0, -6.0));
        c.on_pointer_drag(ev);

        assert!(c.markers().is_empty());
        assert!(!c.popup().state().is_visible());
    }

    #[test]
    fn test_hover_selected_shows_its_own_address() {
        let mut c = controller();
        c.start_geolocation();
        let own = c.on_geolocation(Ok(BANDUNG)).unwrap();
        c.on_lookup_complete(own, resolve(&own, "Bandung, Indonesia"));

        let picked = LonLat::new(107.59, -6.89);
        let request = click(&mut c, picked);
        c.on_lookup_complete(request, resolve(&request, "Cibeunying, Bandung"));

        let ev = event(&c, picked);
        c.on_pointer_move(ev);

        let content = &c.popup().state().content;
        assert!(content.contains("Selected Marker"));
        assert!(content.contains("Cibeunying, Bandung"));
        assert!(!content.contains("Bandung, Indonesia"));
    }

    #[test]
    fn test_hover_off_marker_hides_popup() {
        let mut c = ready_controller();
        let request = click(&mut c, LonLat::new(106.0, -6.0));
        c.on_lookup_complete(request, resolve(&request, "x"));
        assert!(c.popup().state().is_visible());

        let ev = event(&c, LonLat::new(106.05, -6.05));
        c.on_pointer_move(ev);
        assert!(!c.popup().state().is_visible());
        assert!(!c.map().overlay().is_visible());
    }

    #[test]
    fn test_layer_toggles_notify() {
        let mut c = ready_controller();

        c.set_base_layer_visible(false);
        assert!(!c.map().base_layer_visible());
        c.set_base_layer_visible(true);
        assert!(c.map().base_layer_visible());

        let notes = &c.notifier().notifications;
        assert_eq!(notes.len(), 2);
        assert_eq!(notes[0].severity, Severity::Info);
        assert_eq!(notes[1].severity, Severity::Success);
        assert!(c.markers().is_empty());
    }

    #[test]
    fn test_menu_and_dismiss() {
        let mut c = controller();
        assert!(c.toggle_menu());
        assert!(!c.toggle_menu());

        let mut c = ready_controller();
        let request = click(&mut c, LonLat::new(106.0, -6.0));
        c.on_lookup_complete(request, resolve(&request, "x"));
        c.dismiss_popup();
        assert!(!c.map().overlay().is_visible());
        assert!(c.markers().selected().is_some());
    }
}
