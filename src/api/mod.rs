//! REST API client module.
//!
//! One [`ApiClient`] carries the base URL, timeout and credential handling;
//! each backend collection is reached through an [`EntityCollectionClient`].

mod collection;
mod teams;

pub use collection::*;

use std::sync::Arc;

use reqwest::{header, Client, Method, RequestBuilder, Response, Url};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;

use crate::auth::AuthGate;
use crate::config::Config;
use crate::errors::AppError;
use crate::models::{
    AdoptedArea, AdoptedAreaPatch, AdoptedAreaPayload, EntityId, EntityKind, Team, TeamPatch,
    TeamPayload,
};

/// Build the shared HTTP client with the configured timeout and user agent.
pub fn build_http_client(config: &Config) -> Result<Client, AppError> {
    let mut headers = header::HeaderMap::new();
    headers.insert(
        header::ACCEPT,
        header::HeaderValue::from_static("application/json"),
    );

    Client::builder()
        .timeout(config.http_timeout)
        .user_agent(config.user_agent.clone())
        .default_headers(headers)
        .build()
        .map_err(|e| AppError::Config(format!("Failed to build HTTP client: {}", e)))
}

/// HTTP transport for the backend API.
#[derive(Clone)]
pub struct ApiClient {
    http: Client,
    base_url: Url,
    auth: Arc<dyn AuthGate>,
}

impl ApiClient {
    /// `base_url` must end with `/` so relative paths join under it.
    pub fn new(http: Client, base_url: Url, auth: Arc<dyn AuthGate>) -> Self {
        Self {
            http,
            base_url,
            auth,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder, AppError> {
        let url = self
            .base_url
            .join(path)
            .map_err(|e| AppError::Config(format!("Invalid API path {:?}: {}", path, e)))?;
        Ok(self.auth.authorize(self.http.request(method, url)))
    }

    /// Send and turn non-success statuses into [`AppError`]s.
    async fn execute(&self, request: RequestBuilder) -> Result<Response, AppError> {
        let response = request.send().await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AppError::from_response(status.as_u16(), &body))
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, AppError> {
        let response = self.execute(self.request(Method::GET, path)?).await?;
        Ok(response.json().await?)
    }

    /// Send a mutation with a JSON body and read its reply.
    pub async fn send_mutation<B>(
        &self,
        method: Method,
        path: &str,
        body: &B,
    ) -> Result<MutationReply, AppError>
    where
        B: Serialize + ?Sized,
    {
        self.read_mutation(self.request(method, path)?.json(body))
            .await
    }

    /// Send a mutation without a request body and read its reply.
    pub async fn send_bodyless(
        &self,
        method: Method,
        path: &str,
    ) -> Result<MutationReply, AppError> {
        self.read_mutation(self.request(method, path)?).await
    }

    async fn read_mutation(&self, request: RequestBuilder) -> Result<MutationReply, AppError> {
        let response = self.execute(request).await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        MutationReply::parse(status, &body)
    }
}

/// What a successful mutation reply said beyond its status.
///
/// The backend answers writes with the stored record, a
/// `{"success": .., "message": ..}` envelope, or nothing at all. The status
/// decides the outcome unless the body carries `"success": false`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MutationReply {
    /// Id of the written entity, when the reply names one
    pub id: Option<EntityId>,
    /// Server-provided message for the user
    pub message: Option<String>,
}

impl MutationReply {
    pub fn parse(status: u16, body: &str) -> Result<Self, AppError> {
        let trimmed = body.trim();
        if trimmed.is_empty() {
            return Ok(Self::default());
        }
        let Ok(value) = serde_json::from_str::<Value>(trimmed) else {
            tracing::debug!("Ignoring non-JSON mutation reply ({} bytes)", trimmed.len());
            return Ok(Self::default());
        };

        if value.get("success").and_then(Value::as_bool) == Some(false) {
            return Err(AppError::from_response(status, trimmed));
        }

        let id = value
            .get("id")
            .or_else(|| value.get("data").and_then(|data| data.get("id")))
            .and_then(|id| serde_json::from_value::<EntityId>(id.clone()).ok());
        let message = value
            .get("message")
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|message| !message.is_empty())
            .map(str::to_string);

        Ok(Self { id, message })
    }
}

/// A backend resource collection.
pub trait Resource: Send + Sync + 'static {
    const KIND: EntityKind;
    /// Relative path listing the collection
    const LIST_PATH: &'static str;
    /// Relative path accepting creates
    const CREATE_PATH: &'static str;
    /// Prefix of single-item paths, followed by `{id}/`
    const ITEM_PREFIX: &'static str;

    type Payload: Serialize + Send + Sync;
    type Patch: Serialize + Send + Sync;
    type Record: DeserializeOwned + Clone + Send + Sync;


    fn item_path(id: &EntityId) -> String {
        format!("{}{}/", Self::ITEM_PREFIX, id)
    }
}

/// `adopt-area` collection; listed through the map layer endpoint.
pub struct AdoptedAreas;

impl Resource for AdoptedAreas {
    const KIND: EntityKind = EntityKind::AdoptedArea;
    const LIST_PATH: &'static str = "adopted-area-layer/";
    const CREATE_PATH: &'static str = "adopt-area/";
    const ITEM_PREFIX: &'static str = "adopt-area/";

    type Payload = AdoptedAreaPayload;
    type Patch = AdoptedAreaPatch;
    type Record = AdoptedArea;
}

pub struct Teams;

impl Resource for Teams {
    const KIND: EntityKind = EntityKind::Team;
    const LIST_PATH: &'static str = "teams/";
    const CREATE_PATH: &'static str = "teams/";
    const ITEM_PREFIX: &'static str = "teams/";

    type Payload = TeamPayload;
    type Patch = TeamPatch;
    type Record = Team;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{Identity, SessionAuth, SESSION_TOKEN_HEADER};

    #[test]
    fn test_item_paths() {
        assert_eq!(
            AdoptedAreas::item_path(&EntityId::Numeric(12)),
            "adopt-area/12/"
        );
        assert_eq!(Teams::item_path(&EntityId::from("abc")), "teams/abc/");
    }

    #[test]
    fn test_request_joins_base_and_authorizes() {
        let auth = Arc::new(SessionAuth::with_session(
            Some("tok".to_string()),
            Identity {
                email: "ada@example.com".to_string(),
                user_id: None,
            },
        ));
        let api = ApiClient::new(
            Client::new(),
            Url::parse("http://localhost:8000/api/").unwrap(),
            auth,
        );

        let request = api
            .request(Method::GET, AdoptedAreas::LIST_PATH)
            .unwrap()
            .build()
            .unwrap();
        assert_eq!(
            request.url().as_str(),
            "http://localhost:8000/api/adopted-area-layer/"
        );
        assert_eq!(request.headers()[SESSION_TOKEN_HEADER], "tok");
    }

    #[test]
    fn test_mutation_reply_shapes() {
        assert_eq!(MutationReply::parse(204, "").unwrap(), MutationReply::default());
        assert_eq!(
            MutationReply::parse(201, r#"{"id": 7, "area_name": "Pond"}"#).unwrap(),
            MutationReply {
                id: Some(EntityId::Numeric(7)),
                message: None
            }
        );
        assert_eq!(
            MutationReply::parse(201, r#"{"success": true, "message": "Area adopted"}"#).unwrap(),
            MutationReply {
                id: None,
                message: Some("Area adopted".to_string())
            }
        );
        assert_eq!(
            MutationReply::parse(200, r#"{"success": true, "data": {"id": "t-1"}}"#)
                .unwrap()
                .id,
            Some(EntityId::from("t-1"))
        );
        assert_eq!(MutationReply::parse(200, "OK").unwrap(), MutationReply::default());
    }

    #[test]
    fn test_mutation_reply_success_false_is_an_error() {
        assert_eq!(
            MutationReply::parse(200, r#"{"success": false, "message": "Area already adopted"}"#),
            Err(AppError::Server {
                status: 200,
                message: "Area already adopted".to_string()
            })
        );
    }
}
