//! Cached CRUD client for one backend collection.
//!
//! Every successful mutation is followed by a full re-list; the cache is never
//! patched from a mutation response, whose shape varies by endpoint.

use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::RwLock;
use reqwest::Method;
use serde_json::Value;

use super::{AdoptedAreas, ApiClient, MutationReply, Resource, Teams};
use crate::errors::AppError;
use crate::models::{EntityId, EntityPayload};

pub struct EntityCollectionClient<R: Resource> {
    api: ApiClient,
    cache: RwLock<Vec<R::Record>>,
    loading: AtomicBool,
    /// Bumped per fetch so an older response cannot overwrite a newer one.
    generation: AtomicU64,
    _resource: PhantomData<R>,
}

impl<R: Resource> EntityCollectionClient<R> {
    pub fn new(api: ApiClient) -> Self {
        Self {
            api,
            cache: RwLock::new(Vec::new()),
            loading: AtomicBool::new(false),
            generation: AtomicU64::new(0),
            _resource: PhantomData,
        }
    }

    pub(super) fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Last successfully fetched collection.
    pub fn cached(&self) -> Vec<R::Record> {
        self.cache.read().clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Fetch the collection. On failure the error is logged and the previous
    /// cache is returned unchanged. Rows that do not decode are skipped.
    pub async fn list(&self) -> Vec<R::Record> {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);
        let result = self.api.get_json::<Vec<Value>>(R::LIST_PATH).await;
        if self.generation.load(Ordering::SeqCst) == generation {
            self.loading.store(false, Ordering::SeqCst);
        }

        match result {
            Ok(rows) => {
                let records = decode_rows::<R>(rows);
                tracing::debug!("Fetched {} {} records", records.len(), R::KIND);
                if self.generation.load(Ordering::SeqCst) == generation {
                    *self.cache.write() = records.clone();
                }
                records
            }
            Err(e) => {
                tracing::error!("Failed to fetch {} collection: {}", R::KIND, e);
                self.cached()
            }
        }
    }

    pub async fn create(&self, payload: &R::Payload) -> Result<MutationReply, AppError> {
        let result = self
            .api
            .send_mutation(Method::POST, R::CREATE_PATH, payload)
            .await;

        match result {
            Ok(reply) => {
                match &reply.id {
                    Some(id) => tracing::info!("Created {} {}", R::KIND, id),
                    None => tracing::info!("Created {}", R::KIND),
                }
                self.list().await;
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("Error creating {}: {}", R::KIND, e);
                Err(e)
            }
        }
    }

    pub async fn update(&self, id: &EntityId, patch: &R::Patch) -> Result<MutationReply, AppError> {
        let result = self
            .api
            .send_mutation(Method::PATCH, &R::item_path(id), patch)
            .await;

        match result {
            Ok(reply) => {
                tracing::info!("Updated {} {}", R::KIND, id);
                self.list().await;
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("Error updating {} {}: {}", R::KIND, id, e);
                Err(e)
            }
        }
    }

    pub async fn delete(&self, id: &EntityId) -> Result<MutationReply, AppError> {
        match self.api.send_bodyless(Method::DELETE, &R::item_path(id)).await {
            Ok(reply) => {
                tracing::info!("Deleted {} {}", R::KIND, id);
                self.list().await;
                Ok(reply)
            }
            Err(e) => {
                tracing::error!("Error deleting {} {}: {}", R::KIND, id, e);
                Err(e)
            }
        }
    }
}

fn decode_rows<R: Resource>(rows: Vec<Value>) -> Vec<R::Record> {
    rows.into_iter()
        .enumerate()
        .filter_map(|(index, row)| match serde_json::from_value(row) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!("Skipping malformed {} row {}: {}", R::KIND, index, e);
                None
            }
        })
        .collect()
}

/// The collections the map workflow writes to.
pub struct Collections {
    pub adopted_areas: EntityCollectionClient<AdoptedAreas>,
    pub teams: EntityCollectionClient<Teams>,
}

impl Collections {
    pub fn new(api: ApiClient) -> Self {
        Self {
            adopted_areas: EntityCollectionClient::new(api.clone()),
            teams: EntityCollectionClient::new(api),
        }
    }

    /// Create whichever entity the payload describes.
    pub async fn create(&self, payload: &EntityPayload) -> Result<MutationReply, AppError> {
        match payload {
            EntityPayload::AdoptedArea(payload) => self.adopted_areas.create(payload).await,
            EntityPayload::Team(payload) => self.teams.create(payload).await,
        }
    }

    pub async fn refresh_all(&self) {
        tokio::join!(self.adopted_areas.list(), self.teams.list());
    }
}
