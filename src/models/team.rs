//! Team model matching the backend `teams` resource.

use serde::{Deserialize, Serialize};

use super::{EntityId, GeoPoint, LatLng, LocationMetadata};
use crate::errors::AppError;

/// A team being edited in the create-team form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TeamDraft {
    pub name: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub headquarters: Option<GeoPoint>,
}

impl TeamDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a picked headquarters point and its metadata.
    pub fn apply_selection(&mut self, position: LatLng, metadata: &LocationMetadata) {
        self.headquarters = Some(GeoPoint::from_lat_lng(position));
        self.city = metadata.city.clone();
        self.state = metadata.state.clone();
        self.country = metadata.country.clone();
    }

    /// Validate the draft and build the request body.
    pub fn to_payload(&self) -> Result<TeamPayload, AppError> {
        let headquarters = match self.headquarters {
            Some(point) if point.is_complete() => point,
            _ => {
                return Err(AppError::Validation(
                    "Select the team headquarters on the map before submitting.".to_string(),
                ))
            }
        };

        Ok(TeamPayload {
            name: self.name.clone(),
            description: self.description.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            headquarters,
        })
    }
}

/// Request body for creating a team.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeamPayload {
    pub name: String,
    pub description: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub headquarters: GeoPoint,
}

/// A team as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Team {
    pub id: EntityId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub headquarters: Option<GeoPoint>,
    #[serde(default)]
    pub member_ids: Vec<EntityId>,
}

impl Team {
    pub fn has_member(&self, user_id: &EntityId) -> bool {
        self.member_ids.contains(user_id)
    }
}

/// Request body for partially updating a team.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TeamPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
