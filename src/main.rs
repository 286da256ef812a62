//! Adopt-an-Area map client
//!
//! Loads configuration, connects to the backend and prints what the map would
//! show. Front ends embed the library; this binary is a smoke check.

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use adoptmap::auth::{Identity, SessionAuth};
use adoptmap::config::Config;
use adoptmap::models::EntityKind;
use adoptmap::notify::Snackbar;
use adoptmap::{MapContext, MapSession};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Adopt-an-Area map client");
    tracing::info!("API base URL: {}", config.api_base_url);
    tracing::info!("Geocode URL: {}", config.geocode_url);

    let auth = Arc::new(SessionAuth::new());
    match (&config.session_token, &config.user_email) {
        (Some(token), Some(email)) => auth.sign_in(
            Some(token.clone()),
            Identity {
                email: email.clone(),
                user_id: None,
            },
        ),
        (Some(_), None) | (None, Some(_)) => {
            tracing::warn!("ADOPTMAP_SESSION_TOKEN and ADOPTMAP_USER_EMAIL must be set together; continuing signed out");
        }
        (None, None) => tracing::info!("No session configured, browsing anonymously"),
    }

    let notifier = Arc::new(Snackbar::new());
    let context = MapContext::from_config(&config, auth, notifier)?;
    let session = MapSession::from_config(context, &config);

    session.refresh().await;

    let markers = session.markers();
    let areas = markers
        .iter()
        .filter(|m| m.kind == EntityKind::AdoptedArea)
        .count();
    tracing::info!(
        "Map ready: {} adopted areas, {} teams, centered on ({}, {})",
        areas,
        markers.len() - areas,
        session.viewport().center().lat,
        session.viewport().center().lng
    );

    for marker in &markers {
        println!(
            "{}\t{}\t{:.6}\t{:.6}\t{}{}",
            marker.kind,
            marker.id,
            marker.position.lat,
            marker.position.lng,
            marker.title,
            if marker.editable { "\t(yours)" } else { "" }
        );
    }

    Ok(())
}
