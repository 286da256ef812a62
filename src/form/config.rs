//! Per-kind form descriptions driving [`super::EntityFormController`].

use crate::models::EntityKind;
use crate::notify::messages;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub editable: bool,
    pub multiline: bool,
}

const fn editable(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        editable: true,
        multiline: false,
    }
}

const fn multiline(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        editable: true,
        multiline: true,
    }
}

const fn read_only(name: &'static str, label: &'static str) -> FieldSpec {
    FieldSpec {
        name,
        label,
        editable: false,
        multiline: false,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormConfig {
    pub kind: EntityKind,
    pub title: &'static str,
    pub submit_label: &'static str,
    /// Persistent notice shown while waiting for the map click
    pub pick_instruction: &'static str,
    pub success_message: &'static str,
    pub fields: &'static [FieldSpec],
}

pub const ADOPT_AREA_FORM: FormConfig = FormConfig {
    kind: EntityKind::AdoptedArea,
    title: "Adopt this Area",
    submit_label: "Submit",
    pick_instruction: messages::PICK_AREA,
    success_message: messages::AREA_ADOPTED,
    fields: &[
        editable("area_name", "Area Name"),
        editable("adoptee_name", "Adoptee Name"),
        editable("adoption_type", "Adoption Type"),
        editable("end_date", "End Date"),
        read_only("email", "Email Address"),
        read_only("city", "City"),
        read_only("state", "State"),
        read_only("country", "Country"),
        read_only("latitude", "Latitude"),
        read_only("longitude", "Longitude"),
        multiline("note", "Notes"),
    ],
};

pub const CREATE_TEAM_FORM: FormConfig = FormConfig {
    kind: EntityKind::Team,
    title: "Create a Team",
    submit_label: "Create Team",
    pick_instruction: messages::PICK_TEAM_HQ,
    success_message: messages::TEAM_CREATED,
    fields: &[
        editable("name", "Team Name"),
        multiline("description", "Team Description"),
        read_only("city", "City"),
        read_only("state", "State"),
        read_only("country", "Country"),
        read_only("latitude", "Latitude"),
        read_only("longitude", "Longitude"),
    ],
};

impl FormConfig {
    pub fn for_kind(kind: EntityKind) -> &'static FormConfig {
        match kind {
            EntityKind::AdoptedArea => &ADOPT_AREA_FORM,
            EntityKind::Team => &CREATE_TEAM_FORM,
        }
    }

    pub fn field(&self, name: &str) -> Option<&'static FieldSpec> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn editable_fields(&self) -> impl Iterator<Item = &'static FieldSpec> {
        self.fields.iter().filter(|f| f.editable)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::EntityDraft;

    #[test]
    fn test_every_field_is_known_to_the_draft() {
        for config in [&ADOPT_AREA_FORM, &CREATE_TEAM_FORM] {
            let mut draft = EntityDraft::blank(config.kind, Some("ada@example.com"));
            draft.apply_selection(
                crate::models::LatLng::new(1.0, 2.0),
                &crate::models::LocationMetadata::empty(),
            );
            for field in config.fields {
                assert!(
                    draft.field(field.name).is_some(),
                    "{} has no value for {}",
                    config.title,
                    field.name
                );
            }
        }
    }

    #[test]
    fn test_editable_fields_accept_input() {
        let mut draft = EntityDraft::blank(EntityKind::AdoptedArea, None);
        for field in ADOPT_AREA_FORM.editable_fields() {
            let value = if field.name == "adoption_type" {
                "temporary"
            } else {
                "x"
            };
            draft.set_field(field.name, value).unwrap();
        }
        assert!(ADOPT_AREA_FORM.field("email").map(|f| !f.editable).unwrap());
        assert_eq!(FormConfig::for_kind(EntityKind::Team).title, "Create a Team");
    }
}
