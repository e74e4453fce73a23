//! Shared test entity: a small room registry with every rule kind.

use crate::error::FieldError;
use crate::fields::FieldValue;
use crate::schema::{contains_ignore_case, Draft, ListFilter, RecordId, ResourceSchema, StoredResource};
use crate::validation::Rule;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{2,4}$").unwrap());

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Room {
    pub id: RecordId,
    pub name: String,
    pub code: String,
    pub seats: u32,
    #[serde(default)]
    pub building: Option<u32>,
    #[serde(default, with = "crate::fields::comma_list")]
    pub features: Vec<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct RoomDraft {
    pub name: String,
    pub code: String,
    pub seats: Option<u32>,
    pub building: Option<u32>,
    #[serde(with = "crate::fields::comma_list")]
    pub features: Vec<String>,
}

impl Draft for RoomDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "name" => Some(FieldValue::text(&self.name)),
            "code" => Some(FieldValue::text(&self.code)),
            "seats" => Some(self.seats.into()),
            "building" => Some(self.building.into()),
            "features" => Some(FieldValue::List(self.features.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "name" => self.name = value.into_text(),
            "code" => self.code = value.into_text(),
            "seats" => self.seats = value.into_number(name)?,
            "building" => self.building = value.into_number(name)?,
            "features" => self.features = value.into_list(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Rooms of one building come back as a scoped, unpaginated set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BuildingFilter {
    pub building: Option<u32>,
}

impl ListFilter for BuildingFilter {
    fn scoped_path(&self, endpoint: &str) -> Option<String> {
        self.building.map(|b| format!("{endpoint}/building/{b}"))
    }
}

impl ResourceSchema for Room {
    type Id = RecordId;
    type Draft = RoomDraft;
    type Filter = BuildingFilter;
    const LABEL: &'static str = "Room";
    const PLURAL: &'static str = "rooms";
    const ENDPOINT: &'static str = "/api/rooms";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> RoomDraft {
        RoomDraft {
            name: self.name.clone(),
            code: self.code.clone(),
            seats: Some(self.seats),
            building: self.building,
            features: self.features.clone(),
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("name", "Room name is required"),
            Rule::min_len("name", 3, "Room name must be at least 3 characters"),
            Rule::required("code", "Room code is required"),
            Rule::pattern("code", &CODE, "Room code must be 2-4 capital letters"),
            Rule::unique("code", "Room code already exists"),
            Rule::range("seats", 1.0, 500.0, "Seats must be between 1 and 500"),
        ]
    }
}

impl StoredResource for Room {
    fn from_draft(id: RecordId, draft: RoomDraft) -> Self {
        Self {
            id,
            name: draft.name,
            code: draft.code,
            seats: draft.seats.unwrap_or_default(),
            building: draft.building,
            features: draft.features,
        }
    }

    fn apply_draft(&mut self, draft: RoomDraft) {
        let id = self.id;
        *self = Self::from_draft(id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.name, term) || contains_ignore_case(&self.code, term)
    }

    fn in_scope(&self, filter: &BuildingFilter) -> bool {
        filter.building.is_none() || filter.building == self.building
    }

    fn conflict_with(&self, draft: &RoomDraft) -> Option<String> {
        self.code
            .eq_ignore_ascii_case(draft.code.trim())
            .then(|| format!("Room with code {} already exists", self.code))
    }
}

pub fn room(id: u32, code: &str) -> Room {
    Room {
        id: RecordId(id),
        name: format!("Room {id}"),
        code: code.to_string(),
        seats: 30,
        building: None,
        features: Vec::new(),
    }
}

pub fn valid_draft(code: &str) -> RoomDraft {
    RoomDraft {
        name: "Seminar".into(),
        code: code.into(),
        seats: Some(40),
        building: None,
        features: vec!["projector".into()],
    }
}
