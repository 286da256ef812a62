//! Adopted area model matching the backend `adopt-area` resource.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::{EntityId, GeoPoint, LatLng, LocationMetadata};
use crate::errors::AppError;

/// How long an adoption lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum AdoptionType {
    #[default]
    Indefinite,
    Temporary,
}

impl AdoptionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AdoptionType::Indefinite => "indefinite",
            AdoptionType::Temporary => "temporary",
        }
    }
}

impl fmt::Display for AdoptionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AdoptionType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "indefinite" => Ok(AdoptionType::Indefinite),
            "temporary" => Ok(AdoptionType::Temporary),
            other => Err(AppError::Validation(format!(
                "Unknown adoption type {:?}",
                other
            ))),
        }
    }
}

/// An adopted area being edited in the adopt form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdoptedAreaDraft {
    pub area_name: String,
    pub adoptee_name: String,
    pub adoption_type: AdoptionType,
    /// `YYYY-MM-DD`, only meaningful for temporary adoptions
    pub end_date: String,
    /// Owner of the adoption, taken from the signed-in identity
    pub email: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub note: String,
    pub location: Option<GeoPoint>,
}

impl AdoptedAreaDraft {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// Attach a picked point and its metadata.
    pub fn apply_selection(&mut self, position: LatLng, metadata: &LocationMetadata) {
        self.location = Some(GeoPoint::from_lat_lng(position));
        self.city = metadata.city.clone();
        self.state = metadata.state.clone();
        self.country = metadata.country.clone();
    }

    /// Switch adoption type; going back to indefinite drops the end date.
    pub fn set_adoption_type(&mut self, adoption_type: AdoptionType) {
        self.adoption_type = adoption_type;
        if adoption_type == AdoptionType::Indefinite {
            self.end_date.clear();
        }
    }

    /// Validate the draft and build the request body.
    pub fn to_payload(&self) -> Result<AdoptedAreaPayload, AppError> {
        let location = match self.location {
            Some(point) if point.is_complete() => point,
            _ => {
                return Err(AppError::Validation(
                    "Select a location on the map before submitting.".to_string(),
                ))
            }
        };

        let end_date = match self.adoption_type {
            AdoptionType::Indefinite => None,
            AdoptionType::Temporary => {
                let raw = self.end_date.trim();
                if raw.is_empty() {
                    return Err(AppError::Validation(
                        "An end date is required for a temporary adoption.".to_string(),
                    ));
                }
                let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                    AppError::Validation(format!("End date {:?} is not a valid date.", raw))
                })?;
                Some(date)
            }
        };

        Ok(AdoptedAreaPayload {
            area_name: self.area_name.clone(),
            adoptee_name: self.adoptee_name.clone(),
            adoption_type: self.adoption_type,
            end_date,
            email: self.email.clone(),
            city: self.city.clone(),
            state: self.state.clone(),
            country: self.country.clone(),
            note: self.note.clone(),
            location,
        })
    }
}

/// Request body for creating an adopted area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptedAreaPayload {
    pub area_name: String,
    pub adoptee_name: String,
    pub adoption_type: AdoptionType,
    pub end_date: Option<NaiveDate>,
    pub email: String,
    pub city: String,
    pub state: String,
    pub country: String,
    pub note: String,
    pub location: GeoPoint,
}

/// An adopted area as returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdoptedArea {
    pub id: EntityId,
    #[serde(default)]
    pub area_name: String,
    #[serde(default)]
    pub adoptee_name: String,
    #[serde(default)]
    pub adoption_type: AdoptionType,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub note: String,
    /// Rows without a usable point stay listed but get no marker
    #[serde(default)]
    pub location: Option<GeoPoint>,
}

impl AdoptedArea {
    /// Whether `email` identifies the adopter. Presentation hint only.
    pub fn is_owned_by(&self, email: &str) -> bool {
        !email.is_empty() && self.email.eq_ignore_ascii_case(email)
    }
}

/// Request body for partially updating an adopted area.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AdoptedAreaPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub area_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adoptee_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adoption_type: Option<AdoptionType>,
    /// `Some(None)` clears the end date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<Option<NaiveDate>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}
