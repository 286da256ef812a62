//! Point-picking state shared by the map view and the form controllers.
//!
//! At most one selection is pending at a time. Starting a new one replaces the
//! previous one without error. The pending intent is stored as data (which
//! kind of entity, seeded with which draft) rather than as a callback, and is
//! handed out exactly once.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::models::{EntityDraft, EntityKind, LatLng, LocationMetadata};
use crate::notify::{NotificationSink, Severity};

/// Identifies one armed selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    fn new() -> Self {
        SessionId(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// What the next map click is for.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PendingAction {
    #[default]
    None,
    AwaitingPointFor {
        session: SessionId,
        kind: EntityKind,
        seed: EntityDraft,
    },
}

impl PendingAction {
    pub fn is_none(&self) -> bool {
        matches!(self, PendingAction::None)
    }

    pub fn session(&self) -> Option<SessionId> {
        match self {
            PendingAction::None => None,
            PendingAction::AwaitingPointFor { session, .. } => Some(*session),
        }
    }
}

/// Map cursor affordance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapCursor {
    Default,
    Crosshair,
}

impl MapCursor {
    /// CSS `cursor` value for the map container.
    pub fn as_css(&self) -> &'static str {
        match self {
            MapCursor::Default => "",
            MapCursor::Crosshair => "crosshair",
        }
    }
}

/// A selection taken out of [`SelectionState`], waiting for its metadata.
#[derive(Debug, Clone, PartialEq)]
pub struct ClaimedSelection {
    pub session: SessionId,
    pub kind: EntityKind,
    pub seed: EntityDraft,
}

impl ClaimedSelection {
    /// Apply the picked point and metadata to the seed draft.
    pub fn resolve(self, position: LatLng, metadata: LocationMetadata) -> ResolvedSelection {
        let mut draft = self.seed;
        draft.apply_selection(position, &metadata);
        ResolvedSelection {
            session: self.session,
            kind: self.kind,
            position,
            metadata,
            draft,
        }
    }
}

/// A completed pick, ready to open the form.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSelection {
    pub session: SessionId,
    pub kind: EntityKind,
    pub position: LatLng,
    pub metadata: LocationMetadata,
    pub draft: EntityDraft,
}

pub struct SelectionState {
    pending: Mutex<PendingAction>,
    notifier: Arc<dyn NotificationSink>,
}

impl SelectionState {
    pub fn new(notifier: Arc<dyn NotificationSink>) -> Self {
        Self {
            pending: Mutex::new(PendingAction::None),
            notifier,
        }
    }

    /// Arm point picking for `seed`, replacing any pending selection, and show
    /// `instruction` until the pick is consumed or cancelled.
    pub fn begin_selection(&self, seed: EntityDraft, instruction: &str) -> SessionId {
        let session = SessionId::new();
        let kind = seed.kind();

        let previous = std::mem::replace(
            &mut *self.pending.lock(),
            PendingAction::AwaitingPointFor {
                session,
                kind,
                seed,
            },
        );
        if let Some(old) = previous.session() {
            tracing::info!("Selection {} preempted by {}", old, session);
        }
        tracing::info!("Selection {} armed for {}", session, kind);

        self.notifier.show_persistent(instruction, Severity::Info);
        session
    }

    /// Drop any pending selection. Safe to call repeatedly.
    pub fn cancel_selection(&self) {
        let previous = std::mem::take(&mut *self.pending.lock());
        if let Some(session) = previous.session() {
            tracing::info!("Selection {} cancelled", session);
            self.notifier.dismiss();
        }
    }

    /// Cancel only if `session` is still the pending one. Returns whether it was.
    pub fn cancel_if(&self, session: SessionId) -> bool {
        let mut pending = self.pending.lock();
        if pending.session() != Some(session) {
            return false;
        }
        *pending = PendingAction::None;
        drop(pending);

        tracing::info!("Selection {} cancelled", session);
        self.notifier.dismiss();
        true
    }

    /// Deactivate and take the pending selection, if any. Only the first caller
    /// after [`SelectionState::begin_selection`] gets it.
    pub fn claim(&self) -> Option<ClaimedSelection> {
        let previous = std::mem::take(&mut *self.pending.lock());
        match previous {
            PendingAction::None => None,
            PendingAction::AwaitingPointFor {
                session,
                kind,
                seed,
            } => {
                self.notifier.dismiss();
                Some(ClaimedSelection {
                    session,
                    kind,
                    seed,
                })
            }
        }
    }

    /// Consume the pending selection with an already-resolved point.
    /// No-op returning `None` when nothing is pending.
    pub fn consume_selection(
        &self,
        position: LatLng,
        metadata: LocationMetadata,
    ) -> Option<ResolvedSelection> {
        let resolved = self.claim()?.resolve(position, metadata);
        tracing::info!("Selection {} consumed", resolved.session);
        Some(resolved)
    }

    pub fn is_active(&self) -> bool {
        !self.pending.lock().is_none()
    }

    pub fn is_pending_for(&self, session: SessionId) -> bool {
        self.pending.lock().session() == Some(session)
    }

    /// Snapshot of the pending intent.
    pub fn pending(&self) -> PendingAction {
        self.pending.lock().clone()
    }

    pub fn cursor(&self) -> MapCursor {
        if self.is_active() {
            MapCursor::Crosshair
        } else {
            MapCursor::Default
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AdoptedAreaDraft, TeamDraft};
    use crate::notify::{messages, Snackbar};

    fn state() -> (SelectionState, Arc<Snackbar>) {
        let snackbar = Arc::new(Snackbar::new());
        (SelectionState::new(snackbar.clone()), snackbar)
    }

    fn area_seed(name: &str) -> EntityDraft {
        let mut draft = AdoptedAreaDraft::new("ada@example.com");
        draft.area_name = name.to_string();
        EntityDraft::AdoptedArea(draft)
    }

    #[test]
    fn test_begin_shows_persistent_instruction_and_crosshair() {
        let (selection, snackbar) = state();
        assert_eq!(selection.cursor(), MapCursor::Default);

        selection.begin_selection(area_seed("a"), messages::PICK_AREA);

        assert!(selection.is_active());
        assert_eq!(selection.cursor(), MapCursor::Crosshair);
        assert_eq!(selection.cursor().as_css(), "crosshair");
        let notice = snackbar.current().unwrap();
        assert!(notice.persistent);
        assert_eq!(notice.message, messages::PICK_AREA);
    }

    #[test]
    fn test_last_writer_wins() {
        let (selection, _) = state();
        let first = selection.begin_selection(area_seed("first"), messages::PICK_AREA);
        let second =
            selection.begin_selection(EntityDraft::Team(TeamDraft::new()), messages::PICK_TEAM_HQ);
        assert_ne!(first, second);
        assert!(!selection.is_pending_for(first));

        let resolved = selection
            .consume_selection(LatLng::new(1.0, 2.0), LocationMetadata::empty())
            .unwrap();
        assert_eq!(resolved.session, second);
        assert_eq!(resolved.kind, EntityKind::Team);
    }

    #[test]
    fn test_consume_when_inactive_is_noop() {
        let (selection, snackbar) = state();
        assert!(selection
            .consume_selection(LatLng::new(1.0, 2.0), LocationMetadata::empty())
            .is_none());
        assert!(selection.pending().is_none());
        assert!(snackbar.history().is_empty());
    }

    #[test]
    fn test_consume_hands_out_selection_once() {
        let (selection, snackbar) = state();
        selection.begin_selection(area_seed("pond"), messages::PICK_AREA);

        let first = selection.consume_selection(
            LatLng::new(42.3601, -71.0589),
            LocationMetadata::new("Boston", "MA", "US"),
        );
        let second = selection.consume_selection(LatLng::new(0.0, 0.0), LocationMetadata::empty());

        let first = first.unwrap();
        assert!(second.is_none());
        assert!(!selection.is_active());
        assert!(snackbar.current().is_none());
        assert_eq!(
            first.draft.geometry().unwrap().coordinates,
            [-71.0589, 42.3601]
        );
        assert_eq!(first.draft.field("area_name").as_deref(), Some("pond"));
        assert_eq!(first.draft.field("city").as_deref(), Some("Boston"));
    }

    #[test]
    fn test_concurrent_claims_yield_one_winner() {
        let (selection, _) = state();
        let selection = Arc::new(selection);
        selection.begin_selection(area_seed("race"), messages::PICK_AREA);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let selection = selection.clone();
                std::thread::spawn(move || selection.claim().is_some())
            })
            .collect();
        let winners = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|won| *won)
            .count();
        assert_eq!(winners, 1);
    }

    #[test]
    fn test_cancel_is_idempotent() {
        let (selection, snackbar) = state();
        selection.begin_selection(area_seed("a"), messages::PICK_AREA);
        selection.cancel_selection();
        selection.cancel_selection();

        assert!(!selection.is_active());
        assert!(snackbar.current().is_none());
    }

    #[test]
    fn test_cancel_if_only_touches_own_session() {
        let (selection, _) = state();
        let stale = selection.begin_selection(area_seed("a"), messages::PICK_AREA);
        let current = selection.begin_selection(area_seed("b"), messages::PICK_AREA);

        assert!(!selection.cancel_if(stale));
        assert!(selection.is_pending_for(current));
        assert!(selection.cancel_if(current));
        assert!(!selection.is_active());
    }
}
