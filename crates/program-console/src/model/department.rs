//! Academic departments, the root entity of the console.
//!
//! A department code is a short upper-case tag ("CSE", "MECH") that the
//! backend keeps unique across the whole collection.
use super::non_blank;
use console_framework::{
    contains_ignore_case, Draft, FieldError, FieldValue, RecordId, ResourceSchema, Rule,
    StoredResource,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static DEPARTMENT_CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2,10}$").expect("department code pattern"));

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Department {
    pub id: RecordId,
    pub department_name: String,
    pub department_code: String,
    #[serde(default)]
    pub hod_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DepartmentDraft {
    pub department_name: String,
    pub department_code: String,
    pub hod_name: String,
    pub description: String,
}

impl DepartmentDraft {
    pub const FIELDS: &'static [&'static str] =
        &["department_name", "department_code", "hod_name", "description"];

    pub fn new(name: impl Into<String>, code: impl Into<String>) -> Self {
        Self {
            department_name: name.into(),
            department_code: code.into(),
            ..Default::default()
        }
    }
}

impl Draft for DepartmentDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "department_name" => Some(FieldValue::text(&self.department_name)),
            "department_code" => Some(FieldValue::text(&self.department_code)),
            "hod_name" => Some(FieldValue::text(&self.hod_name)),
            "description" => Some(FieldValue::text(&self.description)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "department_name" => self.department_name = value.into_text(),
            "department_code" => self.department_code = value.into_text(),
            "hod_name" => self.hod_name = value.into_text(),
            "description" => self.description = value.into_text(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl ResourceSchema for Department {
    type Id = RecordId;
    type Draft = DepartmentDraft;
    type Filter = ();
    const LABEL: &'static str = "Department";
    const PLURAL: &'static str = "departments";
    const ENDPOINT: &'static str = "/api/departments";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> DepartmentDraft {
        DepartmentDraft {
            department_name: self.department_name.clone(),
            department_code: self.department_code.clone(),
            hod_name: self.hod_name.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("department_name", "Department name is required"),
            Rule::max_len(
                "department_name",
                100,
                "Department name must be at most 100 characters",
            ),
            Rule::required("department_code", "Department code is required"),
            Rule::pattern(
                "department_code",
                &DEPARTMENT_CODE,
                "Department code must be 2-10 uppercase letters",
            ),
            Rule::unique("department_code", "Department code already exists"),
        ]
    }
}

impl StoredResource for Department {
    fn from_draft(id: RecordId, draft: DepartmentDraft) -> Self {
        Self {
            id,
            department_name: draft.department_name.trim().to_string(),
            department_code: draft.department_code.trim().to_string(),
            hod_name: non_blank(draft.hod_name),
            description: non_blank(draft.description),
        }
    }

    fn apply_draft(&mut self, draft: DepartmentDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.department_name, term)
            || contains_ignore_case(&self.department_code, term)
            || self
                .hod_name
                .as_deref()
                .is_some_and(|hod| contains_ignore_case(hod, term))
    }

    fn conflict_with(&self, draft: &DepartmentDraft) -> Option<String> {
        self.department_code
            .eq_ignore_ascii_case(draft.department_code.trim())
            .then(|| format!("Department code {} is already in use", self.department_code))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_framework::validation::validate;
    use console_framework::ValidationScope;

    fn department(id: u32, code: &str) -> Department {
        Department::from_draft(RecordId(id), DepartmentDraft::new(format!("Dept {id}"), code))
    }

    #[test]
    fn test_code_rules_fire_in_order() {
        let draft = DepartmentDraft::new("Computer Science", "cse1");
        let report = validate::<Department>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(
            report.first_message.as_deref(),
            Some("Department code must be 2-10 uppercase letters")
        );

        let missing = DepartmentDraft::new("", "");
        let report = validate::<Department>(&missing, &ValidationScope::new(&[], None));
        assert_eq!(report.first_message.as_deref(), Some("Department name is required"));
        assert_eq!(report.errors["department_code"], "Department code is required");
    }

    #[test]
    fn test_code_unique_on_loaded_page() {
        let page = vec![department(1, "CSE"), department(2, "ECE")];
        let draft = DepartmentDraft::new("Electronics", "ECE");
        let report = validate::<Department>(&draft, &ValidationScope::new(&page, None));
        assert_eq!(report.first_message.as_deref(), Some("Department code already exists"));

        let report = validate::<Department>(&draft, &ValidationScope::new(&page, Some(&RecordId(2))));
        assert!(report.is_valid());
    }

    #[test]
    fn test_blank_optional_columns_are_stored_as_none() {
        let mut draft = DepartmentDraft::new(" Civil ", "CIV");
        draft.hod_name = "   ".into();
        let stored = Department::from_draft(RecordId(7), draft);
        assert_eq!(stored.department_name, "Civil");
        assert_eq!(stored.hod_name, None);
        assert_eq!(stored.to_draft().hod_name, "");
    }

    #[test]
    fn test_search_covers_hod() {
        let mut draft = DepartmentDraft::new("Physics", "PHY");
        draft.hod_name = "Dr. Raman".into();
        let stored = Department::from_draft(RecordId(1), draft);
        assert!(stored.matches_search("raman"));
        assert!(stored.matches_search("phy"));
        assert!(!stored.matches_search("chem"));
    }
}
