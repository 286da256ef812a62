//! Projection of cached collections into map markers.

use crate::models::{AdoptedArea, EntityId, EntityKind, LatLng, Team};

#[derive(Debug, Clone, PartialEq)]
pub struct MapMarker {
    pub id: EntityId,
    pub kind: EntityKind,
    pub position: LatLng,
    pub title: String,
    pub subtitle: String,
    /// Whether edit/delete affordances are shown. The backend still decides.
    pub editable: bool,
}

pub fn area_markers(areas: &[AdoptedArea], viewer_email: Option<&str>) -> Vec<MapMarker> {
    areas
        .iter()
        .filter_map(|area| {
            let location = area.location.filter(|p| p.is_complete())?;
            Some(MapMarker {
                id: area.id.clone(),
                kind: EntityKind::AdoptedArea,
                position: location.to_lat_lng(),
                title: area.area_name.clone(),
                subtitle: area.adoptee_name.clone(),
                editable: viewer_email.is_some_and(|email| area.is_owned_by(email)),
            })
        })
        .collect()
}

/// Teams without a headquarters point are left off the map.
pub fn team_markers(teams: &[Team]) -> Vec<MapMarker> {
    teams
        .iter()
        .filter_map(|team| {
            let headquarters = team.headquarters.filter(|p| p.is_complete())?;
            Some(MapMarker {
                id: team.id.clone(),
                kind: EntityKind::Team,
                position: headquarters.to_lat_lng(),
                title: team.name.clone(),
                subtitle: format!("{} members", team.member_ids.len()),
                editable: false,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(id: i64, email: &str) -> AdoptedArea {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "area_name": "Pond",
            "adoptee_name": "Ada",
            "email": email,
            "location": {"type": "Point", "coordinates": [-71.0589, 42.3601]}
        }))
        .unwrap()
    }

    #[test]
    fn test_area_markers_flag_owned_areas() {
        let areas = vec![area(1, "ada@example.com"), area(2, "bob@example.com")];

        let markers = area_markers(&areas, Some("ADA@example.com"));
        assert_eq!(markers.len(), 2);
        assert!(markers[0].editable);
        assert!(!markers[1].editable);
        assert_eq!(markers[0].position, LatLng::new(42.3601, -71.0589));

        assert!(area_markers(&areas, None).iter().all(|m| !m.editable));
    }

    #[test]
    fn test_area_markers_skip_missing_location() {
        let mut unplaced = area(3, "ada@example.com");
        unplaced.location = None;
        let areas = vec![area(1, "ada@example.com"), unplaced];

        let markers = area_markers(&areas, None);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].id, EntityId::Numeric(1));
    }

    #[test]
    fn test_team_markers_skip_missing_headquarters() {
        let teams: Vec<Team> = serde_json::from_value(serde_json::json!([
            {"id": 1, "name": "A", "member_ids": [1, 2],
             "headquarters": {"type": "Point", "coordinates": [-90.3, 38.64]}},
            {"id": 2, "name": "B"}
        ]))
        .unwrap();

        let markers = team_markers(&teams);
        assert_eq!(markers.len(), 1);
        assert_eq!(markers[0].subtitle, "2 members");
        assert_eq!(markers[0].position, LatLng::new(38.64, -90.3));
    }
}
