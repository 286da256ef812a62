//! One map screen: click capture, both entity forms, markers and viewport.

use std::sync::Arc;

use crate::config::Config;
use crate::errors::AppError;
use crate::form::EntityFormController;
use crate::map::{area_markers, team_markers, ClickOutcome, MapClickCapture, MapMarker, Viewport};
use crate::api::MutationReply;
use crate::models::{AdoptedAreaPatch, EntityId, EntityKind, LatLng};
use crate::notify::{messages, Severity};
use crate::selection::{MapCursor, ResolvedSelection};
use crate::MapContext;

pub struct MapSession {
    context: MapContext,
    capture: Arc<MapClickCapture>,
    adopt_form: EntityFormController,
    team_form: EntityFormController,
    viewport: Viewport,
}

impl MapSession {
    pub fn new(context: MapContext, default_center: LatLng) -> Self {
        let capture = Arc::new(MapClickCapture::new(
            context.selection.clone(),
            context.geocoder.clone(),
        ));
        Self {
            adopt_form: EntityFormController::new(EntityKind::AdoptedArea, &context),
            team_form: EntityFormController::new(EntityKind::Team, &context),
            capture,
            viewport: Viewport::new(default_center),
            context,
        }
    }

    pub fn from_config(context: MapContext, config: &Config) -> Self {
        Self::new(context, config.default_center)
    }

    pub fn context(&self) -> &MapContext {
        &self.context
    }

    /// Click capture for front ends that dispatch clicks concurrently; pair it
    /// with [`MapSession::deliver_selection`].
    pub fn click_capture(&self) -> Arc<MapClickCapture> {
        self.capture.clone()
    }

    pub fn form(&self, kind: EntityKind) -> &EntityFormController {
        match kind {
            EntityKind::AdoptedArea => &self.adopt_form,
            EntityKind::Team => &self.team_form,
        }
    }

    pub fn form_mut(&mut self, kind: EntityKind) -> &mut EntityFormController {
        match kind {
            EntityKind::AdoptedArea => &mut self.adopt_form,
            EntityKind::Team => &mut self.team_form,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn viewport_mut(&mut self) -> &mut Viewport {
        &mut self.viewport
    }

    pub fn cursor(&self) -> MapCursor {
        self.context.selection.cursor()
    }

    /// Handle a map click and route a resolved selection to its form.
    pub async fn handle_map_click(&mut self, position: LatLng) -> ClickOutcome {
        let outcome = self.capture.on_click(position).await;
        if let ClickOutcome::Resolved(resolved) = &outcome {
            self.deliver_selection(resolved.clone());
        }
        outcome
    }

    /// Hand a resolved selection to the form that armed it.
    pub fn deliver_selection(&mut self, resolved: ResolvedSelection) -> bool {
        self.form_mut(resolved.kind).on_point_selected(resolved)
    }

    /// Re-fetch both collections.
    pub async fn refresh(&self) {
        self.context.collections.refresh_all().await;
    }

    /// Markers for everything currently cached.
    pub fn markers(&self) -> Vec<MapMarker> {
        let viewer = self.context.auth.identity().map(|identity| identity.email);
        let collections = &self.context.collections;

        let mut markers = area_markers(&collections.adopted_areas.cached(), viewer.as_deref());
        markers.extend(team_markers(&collections.teams.cached()));
        markers
    }

    pub async fn update_adopted_area(
        &self,
        id: &EntityId,
        patch: &AdoptedAreaPatch,
    ) -> Result<MutationReply, AppError> {
        let result = self
            .context
            .collections
            .adopted_areas
            .update(id, patch)
            .await;
        self.report(&result, messages::AREA_UPDATED);
        result
    }

    pub async fn delete_adopted_area(&self, id: &EntityId) -> Result<MutationReply, AppError> {
        let result = self.context.collections.adopted_areas.delete(id).await;
        self.report(&result, messages::AREA_DELETED);
        result
    }

    /// Snackbar the outcome, preferring the server's own success message.
    fn report(&self, result: &Result<MutationReply, AppError>, success: &str) {
        match result {
            Ok(reply) => self
                .context
                .notifier
                .notify(reply.message.as_deref().unwrap_or(success), Severity::Success),
            Err(e) => self
                .context
                .notifier
                .notify(&format!("Error: {}", e.message()), Severity::Error),
        }
    }
}
