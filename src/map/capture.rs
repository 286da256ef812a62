//! Turns raw map clicks into consumed selections.

use std::sync::Arc;

use crate::geocode::ReverseGeocoder;
use crate::models::LatLng;
use crate::selection::{ResolvedSelection, SelectionState};

#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Nothing was pending; the click keeps its default map behavior.
    PassThrough,
    Resolved(ResolvedSelection),
}

pub struct MapClickCapture {
    selection: Arc<SelectionState>,
    geocoder: Arc<dyn ReverseGeocoder>,
}

impl MapClickCapture {
    pub fn new(selection: Arc<SelectionState>, geocoder: Arc<dyn ReverseGeocoder>) -> Self {
        Self {
            selection,
            geocoder,
        }
    }

    /// Handle one map click.
    ///
    /// The selection is claimed before the geocoder is awaited, so a second
    /// click during the lookup passes through.
    pub async fn on_click(&self, position: LatLng) -> ClickOutcome {
        let Some(claimed) = self.selection.claim() else {
            return ClickOutcome::PassThrough;
        };
        tracing::debug!(
            "Map click at ({}, {}) claimed selection {}",
            position.lat,
            position.lng,
            claimed.session
        );

        let metadata = self.geocoder.reverse_geocode(position).await;
        let resolved = claimed.resolve(position, metadata);
        tracing::info!("Selection {} consumed", resolved.session);
        ClickOutcome::Resolved(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use tokio::sync::Notify;

    use crate::models::{EntityDraft, EntityKind, LocationMetadata};
    use crate::notify::{messages, Snackbar};

    /// Geocoder that waits for a signal before answering.
    struct GatedGeocoder {
        gate: Notify,
    }

    #[async_trait]
    impl ReverseGeocoder for GatedGeocoder {
        async fn reverse_geocode(&self, _position: LatLng) -> LocationMetadata {
            self.gate.notified().await;
            LocationMetadata::new("Boston", "Massachusetts", "United States")
        }
    }

    fn setup() -> (Arc<SelectionState>, Arc<GatedGeocoder>, MapClickCapture) {
        let selection = Arc::new(SelectionState::new(Arc::new(Snackbar::new())));
        let geocoder = Arc::new(GatedGeocoder {
            gate: Notify::new(),
        });
        let capture = MapClickCapture::new(selection.clone(), geocoder.clone());
        (selection, geocoder, capture)
    }

    #[tokio::test]
    async fn test_click_without_selection_passes_through() {
        let (selection, _, capture) = setup();
        let outcome = capture.on_click(LatLng::new(1.0, 2.0)).await;
        assert_eq!(outcome, ClickOutcome::PassThrough);
        assert!(!selection.is_active());
    }

    #[tokio::test]
    async fn test_second_click_during_lookup_passes_through() {
        let (selection, geocoder, capture) = setup();
        let capture = Arc::new(capture);
        selection.begin_selection(
            EntityDraft::blank(EntityKind::AdoptedArea, Some("ada@example.com")),
            messages::PICK_AREA,
        );

        let first = tokio::spawn({
            let capture = capture.clone();
            async move { capture.on_click(LatLng::new(42.3601, -71.0589)).await }
        });

        // Wait until the first click has claimed the selection.
        while selection.is_active() {
            tokio::task::yield_now().await;
        }
        let second = capture.on_click(LatLng::new(0.0, 0.0)).await;
        assert_eq!(second, ClickOutcome::PassThrough);

        geocoder.gate.notify_one();
        let ClickOutcome::Resolved(resolved) = first.await.unwrap() else {
            panic!("first click should resolve");
        };
        assert_eq!(resolved.position, LatLng::new(42.3601, -71.0589));
        assert_eq!(resolved.metadata.city, "Boston");
        assert_eq!(
            resolved.draft.geometry().unwrap().coordinates,
            [-71.0589, 42.3601]
        );
    }
}
