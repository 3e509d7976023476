//! Event loop around an `InteractionController`
//!
//! UI events are applied to the controller synchronously. Geolocation and
//! reverse-geocode lookups run as tokio tasks in a `JoinSet`, so new events
//! keep flowing while lookups are in flight; their outcomes are fed back in
//! completion order and the controller drops the superseded ones.

use crate::controller::{InteractionController, LookupRequest};
use crate::coord::LonLat;
use crate::error::{Error, Result};
use crate::geo::{AddressInfo, Geolocator, ReverseGeocoder};
use crate::map::{MapWidget, PointerEvent};
use crate::notify::Notifier;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::{JoinError, JoinSet};
use tracing::{debug, error};

/// Input the session reacts to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum UiEvent {
    PointerMove(PointerEvent),
    Click(PointerEvent),
    Drag(PointerEvent),
    ShowBaseLayer,
    HideBaseLayer,
    ToggleMenu,
    DismissPopup,
}

/// A finished background task
enum Completion {
    Located(Result<LonLat>),
    Lookup(LookupRequest, Result<AddressInfo>),
}

/// Drives a controller with real geolocation and geocoding backends
pub struct Session<M, N, G, L>
where
    M: MapWidget,
    N: Notifier,
{
    controller: InteractionController<M, N>,
    geocoder: Arc<G>,
    locator: Arc<L>,
    tasks: JoinSet<Completion>,
}

impl<M, N, G, L> Session<M, N, G, L>
where
    M: MapWidget,
    N: Notifier,
    G: ReverseGeocoder + 'static,
    L: Geolocator + 'static,
{
    pub fn new(controller: InteractionController<M, N>, geocoder: G, locator: L) -> Self {
        Self {
            controller,
            geocoder: Arc::new(geocoder),
            locator: Arc::new(locator),
            tasks: JoinSet::new(),
        }
    }

    pub fn controller(&self) -> &InteractionController<M, N> {
        &self.controller
    }

    pub fn into_controller(self) -> InteractionController<M, N> {
        self.controller
    }

    /// Whether any geolocation or lookup is still in flight
    pub fn has_pending(&self) -> bool {
        !self.tasks.is_empty()
    }

    /// Request the user's position
    ///
    /// The provider runs in its own task, so a panic inside it still reaches
    /// the controller as a geolocation failure.
    pub fn start(&mut self) {
        if !self.controller.start_geolocation() {
            return;
        }

        let locator = Arc::clone(&self.locator);
        self.tasks.spawn(async move {
            let outcome = match tokio::spawn(async move { locator.locate().await }).await {
                Ok(outcome) => outcome,
                Err(e) => Err(Error::Geolocation(format!("geolocation task failed: {}", e))),
            };
            Completion::Located(outcome)
        });
    }

    /// Apply one UI event
    pub fn dispatch(&mut self, event: UiEvent) {
        match event {
            UiEvent::PointerMove(ev) => self.controller.on_pointer_move(ev),
            UiEvent::Click(ev) => {
                if let Some(request) = self.controller.on_click(ev) {
                    self.spawn_lookup(request);
                }
            }
            UiEvent::Drag(ev) => self.controller.on_pointer_drag(ev),
            UiEvent::ShowBaseLayer => self.controller.set_base_layer_visible(true),
            UiEvent::HideBaseLayer => self.controller.set_base_layer_visible(false),
            UiEvent::ToggleMenu => {
                let open = self.controller.toggle_menu();
                debug!(open, "navigation menu toggled");
            }
            UiEvent::DismissPopup => self.controller.dismiss_popup(),
        }
    }

    fn spawn_lookup(&mut self, request: LookupRequest) {
        let geocoder = Arc::clone(&self.geocoder);
        self.tasks.spawn(async move {
            let outcome = geocoder.reverse_geocode(request.at).await;
            Completion::Lookup(request, outcome)
        });
    }

    fn apply(&mut self, joined: std::result::Result<Completion, JoinError>) {
        match joined {
            Ok(Completion::Located(outcome)) => {
                if let Some(request) = self.controller.on_geolocation(outcome) {
                    self.spawn_lookup(request);
                }
            }
            Ok(Completion::Lookup(request, outcome)) => {
                self.controller.on_lookup_complete(request, outcome);
            }
            Err(e) => error!("background task failed: {}", e),
        }
    }

    /// Wait for the next background task and apply it
    ///
    /// Returns false when nothing was in flight. Cancel safe.
    pub async fn next_completion(&mut self) -> bool {
        match self.tasks.join_next().await {
            Some(joined) => {
                self.apply(joined);
                true
            }
            None => false,
        }
    }

    /// Apply completions until nothing is in flight
    pub async fn settle(&mut self) {
        while self.next_completion().await {}
    }

    /// Process events until the channel closes, then drain pending work
    pub async fn run(mut self, mut events: mpsc::Receiver<UiEvent>) -> InteractionController<M, N> {
        self.start();

        loop {
            tokio::select! {
                event = events.recv() => match event {
                    Some(event) => self.dispatch(event),
                    None => break,
                },
                Some(joined) = self.tasks.join_next(), if !self.tasks.is_empty() => {
                    self.apply(joined);
                }
            }
        }

        self.settle().await;
        self.controller
    }
}
