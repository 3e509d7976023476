//! Popup presenter
//!
//! Owns the single popup overlay. Each `show` rebuilds the popup from a
//! marker and an address text; nothing is patched in place.

use crate::coord::{LonLat, Projected};
use crate::map::MapWidget;
use crate::marker::{Marker, MarkerId, MarkerKind};

/// The marker a popup is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkerRef {
    pub id: MarkerId,
    pub kind: MarkerKind,
}

/// What the popup currently shows
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PopupState {
    pub target: Option<MarkerRef>,
    pub anchor: Option<Projected>,
    pub content: String,
}

impl PopupState {
    pub fn is_visible(&self) -> bool {
        self.anchor.is_some()
    }
}

/// Renders marker popups onto the map overlay
#[derive(Debug, Default)]
pub struct PopupPresenter {
    state: PopupState,
}

impl PopupPresenter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Show the popup for `marker` with the given address text
    pub fn show<M: MapWidget>(&mut self, map: &mut M, marker: &Marker, address: &str) {
        let state = PopupState {
            target: Some(MarkerRef {
                id: marker.id(),
                kind: marker.kind(),
            }),
            anchor: Some(marker.projected()),
            content: render(marker.kind(), address, marker.position()),
        };

        if state != self.state {
            map.set_overlay_content(&state.content);
            map.set_overlay_position(state.anchor);
            self.state = state;
        }
    }

    /// Hide the popup
    pub fn hide<M: MapWidget>(&mut self, map: &mut M) {
        if self.state.is_visible() {
            map.set_overlay_position(None);
        }
        self.state = PopupState::default();
    }

    pub fn state(&self) -> &PopupState {
        &self.state
    }

    /// Whether the popup is currently attached to `id`
    pub fn is_showing(&self, id: MarkerId) -> bool {
        self.state.target.map(|t| t.id) == Some(id)
    }
}

/// Popup markup for a marker kind
pub fn render(kind: MarkerKind, address: &str, position: LonLat) -> String {
    let title = match kind {
        MarkerKind::SelfLocation => "Your Location",
        MarkerKind::SelectedPoint => "Selected Marker",
    };

    format!(
        "<div class=\"popup-content\">\
         <span class=\"close-btn\">&times;</span>\
         <h3>{}</h3>\
         <p><strong>Address:</strong> {}</p>\
         <p><strong>Coordinates:</strong> {}</p>\
         </div>",
        title,
        escape_html(address),
        position
    )
}

/// Escape text for inclusion in HTML content
fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::AddressInfo;
    use crate::map::headless::HeadlessMap;
    use crate::marker::MarkerStore;

    fn setup() -> (HeadlessMap, MarkerStore) {
        let map = HeadlessMap::new(LonLat::new(107.5763, -6.8744), 16.0, 800, 600);
        (map, MarkerStore::new())
    }

    #[test]
    fn test_render_templates_differ_by_kind() {
        let at = LonLat::new(107.57634352477324, -6.87436891415509);
        let own = render(MarkerKind::SelfLocation, "Bandung, Indonesia", at);
        let picked = render(MarkerKind::SelectedPoint, "Bandung, Indonesia", at);

        assert!(own.contains("<h3>Your Location</h3>"));
        assert!(picked.contains("<h3>Selected Marker</h3>"));
        assert!(own.contains("Bandung, Indonesia"));
        assert!(own.contains("107.576344, -6.874369"));
        assert!(own.contains("close-btn"));
    }

    #[test]
    fn test_render_escapes_address() {
        let html = render(MarkerKind::SelectedPoint, "<b>Tom & Jerry</b>", LonLat::new(0.0, 0.0));
        assert!(html.contains("&lt;b&gt;Tom &amp; Jerry&lt;/b&gt;"));
    }

    #[test]
    fn test_show_anchors_at_marker() {
        let (mut map, mut store) = setup();
        let at = LonLat::new(107.5763, -6.8744);
        let id = store.set_self_location(&mut map, at).unwrap();
        let marker = store.get(id).unwrap().clone();

        let mut presenter = PopupPresenter::new();
        presenter.show(&mut map, &marker, "Bandung");

        assert!(presenter.is_showing(id));
        assert_eq!(presenter.state().anchor, Some(marker.projected()));
        assert_eq!(map.overlay().position, Some(marker.projected()));
        assert_eq!(map.overlay().content, presenter.state().content);
    }

    #[test]
    fn test_show_is_idempotent() {
        let (mut map, mut store) = setup();
        let at = LonLat::new(107.5763, -6.8744);
        let id = store
            .place_selected(&mut map, at, AddressInfo::resolved(at, "Here"))
            .unwrap();
        let marker = store.get(id).unwrap().clone();

        let mut presenter = PopupPresenter::new();
        presenter.show(&mut map, &marker, "Here");
        let first = presenter.state().clone();
        presenter.show(&mut map, &marker, "Here");

        assert_eq!(presenter.state(), &first);
        assert_eq!(map.overlay().content, first.content);
    }

    #[test]
    fn test_hide_is_safe_when_hidden() {
        let (mut map, mut store) = setup();
        let mut presenter = PopupPresenter::new();
        presenter.hide(&mut map);
        assert!(!presenter.state().is_visible());

        let at = LonLat::new(107.5763, -6.8744);
        let id = store.set_self_location(&mut map, at).unwrap();
        let marker = store.get(id).unwrap().clone();
        presenter.show(&mut map, &marker, "x");
        presenter.hide(&mut map);
        presenter.hide(&mut map);

        assert!(!presenter.is_showing(id));
        assert!(!map.overlay().is_visible());
    }
}
