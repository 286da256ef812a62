//! Kind-tagged drafts so one form controller can drive every entity kind.

use super::{
    AdoptedAreaDraft, AdoptedAreaPayload, EntityKind, GeoPoint, LatLng, LocationMetadata,
    TeamDraft, TeamPayload,
};
use crate::errors::AppError;

/// An unpersisted entity being edited before submission.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityDraft {
    AdoptedArea(AdoptedAreaDraft),
    Team(TeamDraft),
}

/// A validated draft, ready to send.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPayload {
    AdoptedArea(AdoptedAreaPayload),
    Team(TeamPayload),
}

impl EntityDraft {
    /// An empty draft of `kind`. `owner_email` seeds the adopt form's owner field.
    pub fn blank(kind: EntityKind, owner_email: Option<&str>) -> Self {
        match kind {
            EntityKind::AdoptedArea => {
                EntityDraft::AdoptedArea(AdoptedAreaDraft::new(owner_email.unwrap_or_default()))
            }
            EntityKind::Team => EntityDraft::Team(TeamDraft::new()),
        }
    }

    pub fn kind(&self) -> EntityKind {
        match self {
            EntityDraft::AdoptedArea(_) => EntityKind::AdoptedArea,
            EntityDraft::Team(_) => EntityKind::Team,
        }
    }

    pub fn apply_selection(&mut self, position: LatLng, metadata: &LocationMetadata) {
        match self {
            EntityDraft::AdoptedArea(draft) => draft.apply_selection(position, metadata),
            EntityDraft::Team(draft) => draft.apply_selection(position, metadata),
        }
    }

    /// The draft's geometry, whichever field carries it.
    pub fn geometry(&self) -> Option<GeoPoint> {
        match self {
            EntityDraft::AdoptedArea(draft) => draft.location,
            EntityDraft::Team(draft) => draft.headquarters,
        }
    }

    pub fn metadata(&self) -> LocationMetadata {
        let (city, state, country) = match self {
            EntityDraft::AdoptedArea(d) => (&d.city, &d.state, &d.country),
            EntityDraft::Team(d) => (&d.city, &d.state, &d.country),
        };
        LocationMetadata::new(city.as_str(), state.as_str(), country.as_str())
    }

    /// Current value of a named field, for display.
    pub fn field(&self, name: &str) -> Option<String> {
        let value = match (self, name) {
            (EntityDraft::AdoptedArea(d), "area_name") => d.area_name.clone(),
            (EntityDraft::AdoptedArea(d), "adoptee_name") => d.adoptee_name.clone(),
            (EntityDraft::AdoptedArea(d), "adoption_type") => d.adoption_type.to_string(),
            (EntityDraft::AdoptedArea(d), "end_date") => d.end_date.clone(),
            (EntityDraft::AdoptedArea(d), "email") => d.email.clone(),
            (EntityDraft::AdoptedArea(d), "note") => d.note.clone(),
            (EntityDraft::Team(d), "name") => d.name.clone(),
            (EntityDraft::Team(d), "description") => d.description.clone(),
            (_, "city") => self.metadata().city,
            (_, "state") => self.metadata().state,
            (_, "country") => self.metadata().country,
            (_, "latitude") => self.geometry().map(|p| p.lat().to_string())?,
            (_, "longitude") => self.geometry().map(|p| p.lng().to_string())?,
            _ => return None,
        };
        Some(value)
    }

    /// Set a user-editable field. Geometry, location metadata and the owner are
    /// not editable here.
    pub fn set_field(&mut self, name: &str, value: &str) -> Result<(), AppError> {
        match (self, name) {
            (EntityDraft::AdoptedArea(d), "area_name") => d.area_name = value.to_string(),
            (EntityDraft::AdoptedArea(d), "adoptee_name") => d.adoptee_name = value.to_string(),
            (EntityDraft::AdoptedArea(d), "adoption_type") => {
                d.set_adoption_type(value.parse()?)
            }
            (EntityDraft::AdoptedArea(d), "end_date") => d.end_date = value.to_string(),
            (EntityDraft::AdoptedArea(d), "note") => d.note = value.to_string(),
            (EntityDraft::Team(d), "name") => d.name = value.to_string(),
            (EntityDraft::Team(d), "description") => d.description = value.to_string(),
            (draft, field) => {
                return Err(AppError::Validation(format!(
                    "Field {:?} cannot be edited on a {} draft",
                    field,
                    draft.kind()
                )))
            }
        }
        Ok(())
    }

    /// Run local validation and build the request body.
    pub fn to_payload(&self) -> Result<EntityPayload, AppError> {
        match self {
            EntityDraft::AdoptedArea(draft) => draft.to_payload().map(EntityPayload::AdoptedArea),
            EntityDraft::Team(draft) => draft.to_payload().map(EntityPayload::Team),
        }
    }
}
