//! Data models for the Adopt-an-Area client.
//!
//! Field names match the backend's JSON bodies so payloads serialize without
//! renaming.

mod adopted_area;
mod draft;
mod geometry;
mod location;
mod team;

pub use adopted_area::*;
pub use draft::*;
pub use geometry::*;
pub use location::*;
pub use team::*;

use std::fmt;

use serde::{Deserialize, Serialize};

/// Server-assigned identifier. The backend uses integers, but opaque string
/// ids are accepted as-is.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum EntityId {
    Numeric(i64),
    Opaque(String),
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityId::Numeric(id) => write!(f, "{}", id),
            EntityId::Opaque(id) => f.write_str(id),
        }
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        EntityId::Numeric(id)
    }
}

impl From<&str> for EntityId {
    fn from(id: &str) -> Self {
        EntityId::Opaque(id.to_string())
    }
}

/// The resource collections a map point can seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    AdoptedArea,
    Team,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::AdoptedArea => "adopted_area",
            EntityKind::Team => "team",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
