//! Program-level entities: delivery modes, program educational objectives
//! (PEOs) and program outcomes (POs).

use super::non_blank;
use console_framework::fields::comma_list;
use console_framework::{
    contains_ignore_case, Draft, FieldError, FieldValue, ListFilter, RecordId, ResourceSchema,
    Rule, StoredResource,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static PEO_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PEO\d+$").expect("PEO number pattern"));
static PO_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PO\d+$").expect("PO code pattern"));

/// Full-time, part-time, distance... with the nominal duration in years.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgramMode {
    pub id: RecordId,
    pub mode_name: String,
    pub duration_years: u8,
    #[serde(default = "active")]
    pub is_active: bool,
}

fn active() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProgramModeDraft {
    pub mode_name: String,
    pub duration_years: Option<u8>,
    pub is_active: bool,
}

impl Default for ProgramModeDraft {
    fn default() -> Self {
        Self {
            mode_name: String::new(),
            duration_years: None,
            is_active: true,
        }
    }
}

impl ProgramModeDraft {
    pub const FIELDS: &'static [&'static str] = &["mode_name", "duration_years", "is_active"];
}

impl Draft for ProgramModeDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "mode_name" => Some(FieldValue::text(&self.mode_name)),
            "duration_years" => Some(self.duration_years.into()),
            "is_active" => Some(FieldValue::Flag(self.is_active)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "mode_name" => self.mode_name = value.into_text(),
            "duration_years" => self.duration_years = value.into_number(name)?,
            "is_active" => self.is_active = value.into_flag(name)?,
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl ResourceSchema for ProgramMode {
    type Id = RecordId;
    type Draft = ProgramModeDraft;
    type Filter = ();
    const LABEL: &'static str = "Program mode";
    const PLURAL: &'static str = "program modes";
    const ENDPOINT: &'static str = "/api/program-modes";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> ProgramModeDraft {
        ProgramModeDraft {
            mode_name: self.mode_name.clone(),
            duration_years: Some(self.duration_years),
            is_active: self.is_active,
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("mode_name", "Mode name is required"),
            Rule::unique("mode_name", "Mode name already exists"),
            Rule::required("duration_years", "Duration is required"),
            Rule::range("duration_years", 1.0, 6.0, "Duration must be between 1 and 6 years"),
        ]
    }
}

impl StoredResource for ProgramMode {
    fn from_draft(id: RecordId, draft: ProgramModeDraft) -> Self {
        Self {
            id,
            mode_name: draft.mode_name.trim().to_string(),
            duration_years: draft.duration_years.unwrap_or(1),
            is_active: draft.is_active,
        }
    }

    fn apply_draft(&mut self, draft: ProgramModeDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.mode_name, term)
    }

    fn conflict_with(&self, draft: &ProgramModeDraft) -> Option<String> {
        self.mode_name
            .eq_ignore_ascii_case(draft.mode_name.trim())
            .then(|| format!("Program mode {} already exists", self.mode_name))
    }
}

/// Program educational objective of one curriculum.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Peo {
    pub id: RecordId,
    pub curriculum_id: u32,
    pub peo_number: String,
    pub statement: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PeoDraft {
    pub curriculum_id: Option<u32>,
    pub peo_number: String,
    pub statement: String,
}

impl PeoDraft {
    pub const FIELDS: &'static [&'static str] = &["curriculum_id", "peo_number", "statement"];
}

impl Draft for PeoDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "curriculum_id" => Some(self.curriculum_id.into()),
            "peo_number" => Some(FieldValue::text(&self.peo_number)),
            "statement" => Some(FieldValue::text(&self.statement)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "curriculum_id" => self.curriculum_id = value.into_number(name)?,
            "peo_number" => self.peo_number = value.into_text(),
            "statement" => self.statement = value.into_text(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CurriculumFilter {
    pub curriculum_id: Option<u32>,
}

impl ListFilter for CurriculumFilter {
    fn scoped_path(&self, endpoint: &str) -> Option<String> {
        self.curriculum_id
            .map(|id| format!("{endpoint}/curriculum/{id}"))
    }
}

impl ResourceSchema for Peo {
    type Id = RecordId;
    type Draft = PeoDraft;
    type Filter = CurriculumFilter;
    const LABEL: &'static str = "PEO";
    const PLURAL: &'static str = "PEOs";
    const ENDPOINT: &'static str = "/api/peos";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> PeoDraft {
        PeoDraft {
            curriculum_id: Some(self.curriculum_id),
            peo_number: self.peo_number.clone(),
            statement: self.statement.clone(),
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("curriculum_id", "Please select a curriculum"),
            Rule::required("peo_number", "PEO number is required"),
            Rule::pattern("peo_number", &PEO_NUMBER, "PEO number must look like PEO1"),
            Rule::unique("peo_number", "PEO number already exists"),
            Rule::required("statement", "PEO statement is required"),
            Rule::min_len("statement", 10, "PEO statement must be at least 10 characters"),
        ]
    }

    fn save_failed_message() -> String {
        "Failed to save PEO".to_string()
    }

    fn delete_failed_message() -> String {
        "Failed to delete PEO".to_string()
    }
}

impl StoredResource for Peo {
    fn from_draft(id: RecordId, draft: PeoDraft) -> Self {
        Self {
            id,
            curriculum_id: draft.curriculum_id.unwrap_or_default(),
            peo_number: draft.peo_number.trim().to_string(),
            statement: draft.statement.trim().to_string(),
        }
    }

    fn apply_draft(&mut self, draft: PeoDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.peo_number, term) || contains_ignore_case(&self.statement, term)
    }

    fn in_scope(&self, filter: &CurriculumFilter) -> bool {
        filter.curriculum_id.map_or(true, |id| id == self.curriculum_id)
    }

    fn conflict_with(&self, draft: &PeoDraft) -> Option<String> {
        (draft.curriculum_id == Some(self.curriculum_id)
            && self.peo_number.eq_ignore_ascii_case(draft.peo_number.trim()))
        .then(|| format!("{} already exists for this curriculum", self.peo_number))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ProgramOutcome {
    pub id: RecordId,
    pub po_code: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, with = "comma_list")]
    pub knowledge_profiles: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProgramOutcomeDraft {
    pub po_code: String,
    pub title: String,
    pub description: String,
    #[serde(with = "comma_list")]
    pub knowledge_profiles: Vec<String>,
}

impl ProgramOutcomeDraft {
    pub const FIELDS: &'static [&'static str] =
        &["po_code", "title", "description", "knowledge_profiles"];
}

impl Draft for ProgramOutcomeDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "po_code" => Some(FieldValue::text(&self.po_code)),
            "title" => Some(FieldValue::text(&self.title)),
            "description" => Some(FieldValue::text(&self.description)),
            "knowledge_profiles" => Some(FieldValue::List(self.knowledge_profiles.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "po_code" => self.po_code = value.into_text(),
            "title" => self.title = value.into_text(),
            "description" => self.description = value.into_text(),
            "knowledge_profiles" => self.knowledge_profiles = value.into_list(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl ResourceSchema for ProgramOutcome {
    type Id = RecordId;
    type Draft = ProgramOutcomeDraft;
    type Filter = ();
    const LABEL: &'static str = "Program outcome";
    const PLURAL: &'static str = "program outcomes";
    const ENDPOINT: &'static str = "/api/program-outcomes";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> ProgramOutcomeDraft {
        ProgramOutcomeDraft {
            po_code: self.po_code.clone(),
            title: self.title.clone(),
            description: self.description.clone().unwrap_or_default(),
            knowledge_profiles: self.knowledge_profiles.clone(),
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("po_code", "PO code is required"),
            Rule::pattern("po_code", &PO_CODE, "PO code must look like PO1"),
            Rule::unique("po_code", "PO code already exists"),
            Rule::required("title", "PO title is required"),
            Rule::max_len("title", 200, "PO title must be at most 200 characters"),
        ]
    }
}

impl StoredResource for ProgramOutcome {
    fn from_draft(id: RecordId, draft: ProgramOutcomeDraft) -> Self {
        Self {
            id,
            po_code: draft.po_code.trim().to_string(),
            title: draft.title.trim().to_string(),
            description: non_blank(draft.description),
            knowledge_profiles: draft.knowledge_profiles,
        }
    }

    fn apply_draft(&mut self, draft: ProgramOutcomeDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.po_code, term) || contains_ignore_case(&self.title, term)
    }

    fn conflict_with(&self, draft: &ProgramOutcomeDraft) -> Option<String> {
        self.po_code
            .eq_ignore_ascii_case(draft.po_code.trim())
            .then(|| format!("{} already exists", self.po_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_framework::validation::validate;
    use console_framework::ValidationScope;

    #[test]
    fn test_duration_bounds() {
        let mut draft = ProgramModeDraft {
            mode_name: "Full Time".into(),
            ..Default::default()
        };
        draft.set_field("duration_years", FieldValue::text("7")).unwrap();
        let report = validate::<ProgramMode>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(
            report.first_message.as_deref(),
            Some("Duration must be between 1 and 6 years")
        );

        draft.set_field("duration_years", FieldValue::Number(4.0)).unwrap();
        assert!(validate::<ProgramMode>(&draft, &ValidationScope::new(&[], None)).is_valid());
    }

    #[test]
    fn test_mode_active_flag_binding() {
        let mut draft = ProgramModeDraft::default();
        assert!(draft.is_active);
        draft.set_field("is_active", FieldValue::text("off")).unwrap();
        assert!(!draft.is_active);
        assert!(draft.set_field("is_active", FieldValue::text("maybe")).is_err());
    }

    #[test]
    fn test_peo_number_format() {
        let draft = PeoDraft {
            curriculum_id: Some(2),
            peo_number: "peo-1".into(),
            statement: "Graduates will lead engineering teams".into(),
        };
        let report = validate::<Peo>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(report.first_message.as_deref(), Some("PEO number must look like PEO1"));
    }

    #[test]
    fn test_peo_conflict_is_per_curriculum() {
        let stored = Peo::from_draft(
            RecordId(1),
            PeoDraft {
                curriculum_id: Some(2),
                peo_number: "PEO1".into(),
                statement: "Graduates will lead engineering teams".into(),
            },
        );
        let mut draft = stored.to_draft();
        assert!(stored.conflict_with(&draft).is_some());
        draft.curriculum_id = Some(3);
        assert!(stored.conflict_with(&draft).is_none());
        assert_eq!(Peo::save_failed_message(), "Failed to save PEO");
    }

    #[test]
    fn test_outcome_code_pattern_and_profiles() {
        let mut draft = ProgramOutcomeDraft {
            po_code: "PO13".into(),
            title: "Engineering knowledge".into(),
            ..Default::default()
        };
        draft
            .set_field("knowledge_profiles", FieldValue::text("WK1, WK2"))
            .unwrap();
        assert_eq!(draft.knowledge_profiles, vec!["WK1", "WK2"]);
        assert!(validate::<ProgramOutcome>(&draft, &ValidationScope::new(&[], None)).is_valid());

        draft.po_code = "P13".into();
        let report = validate::<ProgramOutcome>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(report.errors["po_code"], "PO code must look like PO1");
    }
}
