//! Entity form workflow: auth gate, point pick, edit, validate, submit.
//!
//! One controller type serves every entity kind; the differences live in
//! [`FormConfig`].
//!
//! ```text
//! Idle ─start─▶ AwaitingAuth            (not signed in; prompt and stop)
//! Idle ─start─▶ AwaitingPoint ─map click─▶ Editing ─submit─▶ Submitting
//! Submitting ─ok─▶ Success              (modal closed, collection refreshed)
//! Submitting ─err─▶ Failed ─▶ Editing   (draft kept, message shown)
//! ```

mod config;

pub use config::*;

use std::fmt;
use std::sync::Arc;

use crate::api::Collections;
use crate::auth::AuthGate;
use crate::errors::{AppError, GENERIC_FAILURE};
use crate::models::{EntityDraft, EntityId, EntityKind};
use crate::notify::{messages, NotificationSink, Severity};
use crate::selection::{ResolvedSelection, SelectionState, SessionId};
use crate::MapContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormState {
    Idle,
    AwaitingAuth,
    AwaitingPoint,
    Editing,
    Submitting,
    Success,
    Failed,
}

impl fmt::Display for FormState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

pub struct EntityFormController {
    config: &'static FormConfig,
    selection: Arc<SelectionState>,
    auth: Arc<dyn AuthGate>,
    notifier: Arc<dyn NotificationSink>,
    collections: Arc<Collections>,
    state: FormState,
    armed: Option<SessionId>,
    draft: Option<EntityDraft>,
    error: Option<String>,
    modal_open: bool,
}

impl EntityFormController {
    pub fn new(kind: EntityKind, context: &MapContext) -> Self {
        Self {
            config: FormConfig::for_kind(kind),
            selection: context.selection.clone(),
            auth: context.auth.clone(),
            notifier: context.notifier.clone(),
            collections: context.collections.clone(),
            state: FormState::Idle,
            armed: None,
            draft: None,
            error: None,
            modal_open: false,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.config.kind
    }

    pub fn config(&self) -> &'static FormConfig {
        self.config
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn draft(&self) -> Option<&EntityDraft> {
        self.draft.as_ref()
    }

    /// Last user-visible failure reason, cleared on the next successful step.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_modal_open(&self) -> bool {
        self.modal_open
    }

    pub fn armed_session(&self) -> Option<SessionId> {
        self.armed
    }

    /// True when this controller is waiting for a point but another workflow
    /// has since taken over the selection.
    pub fn is_preempted(&self) -> bool {
        match (self.state, self.armed) {
            (FormState::AwaitingPoint, Some(session)) => !self.selection.is_pending_for(session),
            _ => false,
        }
    }

    fn transition(&mut self, next: FormState) {
        tracing::debug!("{} form: {} -> {}", self.config.kind, self.state, next);
        self.state = next;
    }

    /// The user asked to create a new entity.
    pub fn start(&mut self) -> FormState {
        self.draft = None;
        self.error = None;
        self.modal_open = false;

        if !self.auth.is_authenticated() {
            if let Some(session) = self.armed.take() {
                self.selection.cancel_if(session);
            }
            self.transition(FormState::AwaitingAuth);
            self.notifier.notify(messages::SIGN_IN_REQUIRED, Severity::Info);
            self.auth.prompt_auth();
            return self.state;
        }

        let email = self.auth.identity().map(|identity| identity.email);
        let seed = EntityDraft::blank(self.config.kind, email.as_deref());
        self.arm(seed);
        self.state
    }

    /// Pick a new point for the draft being edited, keeping the entered fields.
    pub fn reselect(&mut self) -> Result<(), AppError> {
        if self.state != FormState::Editing {
            return Err(AppError::InvalidState(
                "Only a draft being edited can be moved".to_string(),
            ));
        }
        let Some(seed) = self.draft.take() else {
            return Err(AppError::InvalidState("No draft is being edited".to_string()));
        };

        self.modal_open = false;
        self.error = None;
        self.arm(seed);
        Ok(())
    }

    fn arm(&mut self, seed: EntityDraft) {
        let session = self
            .selection
            .begin_selection(seed, self.config.pick_instruction);
        self.armed = Some(session);
        self.transition(FormState::AwaitingPoint);
    }

    /// Accept a consumed selection. Returns false (and changes nothing) when the
    /// selection was not armed by this controller or is no longer wanted.
    pub fn on_point_selected(&mut self, resolved: ResolvedSelection) -> bool {
        let expected = match (self.state, self.armed) {
            (FormState::AwaitingPoint, Some(session)) => session == resolved.session,
            _ => false,
        };
        if !expected || resolved.kind != self.config.kind {
            tracing::debug!(
                "{} form ignoring selection {} in state {}",
                self.config.kind,
                resolved.session,
                self.state
            );
            return false;
        }

        self.armed = None;
        self.draft = Some(resolved.draft);
        self.error = None;
        self.modal_open = true;
        self.transition(FormState::Editing);
        true
    }

    /// Edit one field of the open draft.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        if self.state != FormState::Editing {
            return Err(AppError::InvalidState(format!(
                "Cannot edit fields while {}",
                self.state
            )));
        }
        match self.config.field(name) {
            Some(field) if field.editable => {}
            Some(_) => {
                return Err(AppError::Validation(format!("{} is read-only", name)));
            }
            None => {
                return Err(AppError::Validation(format!(
                    "{} has no field {}",
                    self.config.title, name
                )));
            }
        }

        match self.draft.as_mut() {
            Some(draft) => draft.set_field(name, value),
            None => Err(AppError::InvalidState("No draft is being edited".to_string())),
        }
    }

    /// Validate and submit the draft.
    ///
    /// Validation failures never reach the backend. Any failure keeps the
    /// draft and returns the form to editing. The new id is returned when the
    /// backend reply names one.
    pub async fn submit(&mut self) -> Result<Option<EntityId>, AppError> {
        if self.state != FormState::Editing {
            return Err(AppError::InvalidState(format!(
                "Cannot submit while {}",
                self.state
            )));
        }
        let payload = match self.draft.as_ref().map(EntityDraft::to_payload) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                self.fail_locally(&e);
                return Err(e);
            }
            None => {
                return Err(AppError::InvalidState("No draft is being edited".to_string()));
            }
        };

        self.transition(FormState::Submitting);
        match self.collections.create(&payload).await {
            Ok(reply) => {
                self.transition(FormState::Success);
                self.draft = None;
                self.error = None;
                self.modal_open = false;
                let message = reply.message.as_deref().unwrap_or(self.config.success_message);
                self.notifier.notify(message, Severity::Success);
                Ok(reply.id)
            }
            Err(e) => {
                self.transition(FormState::Failed);
                let message = e.message();
                let message = if message.trim().is_empty() {
                    GENERIC_FAILURE.to_string()
                } else {
                    message
                };
                self.notifier
                    .notify(&format!("Error: {}", message), Severity::Error);
                self.error = Some(message);
                self.transition(FormState::Editing);
                Err(e)
            }
        }
    }

    fn fail_locally(&mut self, error: &AppError) {
        let message = error.message();
        tracing::info!("{} form rejected locally: {}", self.config.kind, message);
        self.notifier.notify(&message, Severity::Error);
        self.error = Some(message);
    }

    /// Close the modal or abandon a pending pick.
    pub fn close(&mut self) {
        if let Some(session) = self.armed.take() {
            self.selection.cancel_if(session);
        }
        self.draft = None;
        self.error = None;
        self.modal_open = false;
        self.transition(FormState::Idle);
    }
}
