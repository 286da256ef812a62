//! Adopt-an-Area map client
//!
//! Headless core of the map front end: picking a point on the map, enriching
//! it with reverse-geocoded metadata, editing the resulting draft and
//! submitting it to the backend collections.

pub mod api;
pub mod auth;
pub mod config;
pub mod errors;
pub mod form;
pub mod geocode;
pub mod map;
pub mod models;
pub mod notify;
pub mod selection;
pub mod session;

use std::sync::Arc;

use api::{build_http_client, ApiClient, Collections};
use auth::AuthGate;
use config::Config;
use errors::AppError;
use geocode::{NominatimClient, ReverseGeocoder};
use notify::NotificationSink;
use selection::SelectionState;

pub use session::MapSession;

/// Services shared by the map view and the form controllers.
#[derive(Clone)]
pub struct MapContext {
    pub selection: Arc<SelectionState>,
    pub auth: Arc<dyn AuthGate>,
    pub notifier: Arc<dyn NotificationSink>,
    pub geocoder: Arc<dyn ReverseGeocoder>,
    pub collections: Arc<Collections>,
}

impl MapContext {
    pub fn new(
        auth: Arc<dyn AuthGate>,
        notifier: Arc<dyn NotificationSink>,
        geocoder: Arc<dyn ReverseGeocoder>,
        collections: Arc<Collections>,
    ) -> Self {
        Self {
            selection: Arc::new(SelectionState::new(notifier.clone())),
            auth,
            notifier,
            geocoder,
            collections,
        }
    }

    /// Wire the HTTP clients described by `config`.
    pub fn from_config(
        config: &Config,
        auth: Arc<dyn AuthGate>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, AppError> {
        let http = build_http_client(config)?;
        let geocoder = Arc::new(NominatimClient::new(
            http.clone(),
            config.geocode_url.clone(),
        ));
        let api = ApiClient::new(http, config.api_base_url.clone(), auth.clone());
        let collections = Arc::new(Collections::new(api));

        Ok(Self::new(auth, notifier, geocoder, collections))
    }
}
