//! Authentication capability consumed by the map workflow.
//!
//! The workflow only asks "is someone signed in", "who", and "please prompt for
//! sign-in". How requests carry the credential is decided here, not by callers.

use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::RwLock;
use reqwest::RequestBuilder;

use crate::models::EntityId;

/// Header carrying the session credential on authenticated requests.
pub const SESSION_TOKEN_HEADER: &str = "x-session-token";

/// The signed-in user as far as the client needs to know.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub email: String,
    pub user_id: Option<EntityId>,
}

/// Auth collaborator as seen by the form controllers and the HTTP client.
pub trait AuthGate: Send + Sync {
    fn is_authenticated(&self) -> bool;

    fn identity(&self) -> Option<Identity>;

    /// Ask the UI to show its sign-in prompt.
    fn prompt_auth(&self);

    /// Attach whatever credential the session uses to an outgoing request.
    fn authorize(&self, request: RequestBuilder) -> RequestBuilder;
}

#[derive(Debug, Clone)]
struct Session {
    token: Option<String>,
    identity: Identity,
}

/// Session-token backed [`AuthGate`].
#[derive(Debug, Default)]
pub struct SessionAuth {
    session: RwLock<Option<Session>>,
    prompts: AtomicUsize,
}

impl SessionAuth {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing session, e.g. one restored from configuration.
    pub fn with_session(token: Option<String>, identity: Identity) -> Self {
        let auth = Self::new();
        auth.sign_in(token, identity);
        auth
    }

    pub fn sign_in(&self, token: Option<String>, identity: Identity) {
        tracing::info!("Signed in as {}", identity.email);
        *self.session.write() = Some(Session { token, identity });
    }

    pub fn sign_out(&self) {
        if self.session.write().take().is_some() {
            tracing::info!("Signed out");
        }
    }

    /// Number of sign-in prompts requested so far.
    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl AuthGate for SessionAuth {
    fn is_authenticated(&self) -> bool {
        self.session.read().is_some()
    }

    fn identity(&self) -> Option<Identity> {
        self.session.read().as_ref().map(|s| s.identity.clone())
    }

    fn prompt_auth(&self) {
        tracing::info!("Sign-in required, prompting user");
        self.prompts.fetch_add(1, Ordering::SeqCst);
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let token = self.session.read().as_ref().and_then(|s| s.token.clone());
        match token {
            Some(token) => request.header(SESSION_TOKEN_HEADER, token),
            None => request,
        }
    }
}
