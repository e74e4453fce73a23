//! Learning taxonomies: domains (cognitive, affective, psychomotor) and the
//! ordered levels inside each one, with the action verbs used to phrase
//! outcomes at that level.

use super::non_blank;
use console_framework::fields::comma_list;
use console_framework::{
    contains_ignore_case, Draft, FieldError, FieldValue, ListFilter, RecordId, ResourceSchema,
    Rule, StoredResource,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxonomyDomain {
    pub id: RecordId,
    pub domain_name: String,
    #[serde(default)]
    pub domain_code: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaxonomyDomainDraft {
    pub domain_name: String,
    pub domain_code: String,
    pub description: String,
}

impl TaxonomyDomainDraft {
    pub const FIELDS: &'static [&'static str] = &["domain_name", "domain_code", "description"];
}

impl Draft for TaxonomyDomainDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "domain_name" => Some(FieldValue::text(&self.domain_name)),
            "domain_code" => Some(FieldValue::text(&self.domain_code)),
            "description" => Some(FieldValue::text(&self.description)),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "domain_name" => self.domain_name = value.into_text(),
            "domain_code" => self.domain_code = value.into_text(),
            "description" => self.description = value.into_text(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

impl ResourceSchema for TaxonomyDomain {
    type Id = RecordId;
    type Draft = TaxonomyDomainDraft;
    type Filter = ();
    const LABEL: &'static str = "Taxonomy domain";
    const PLURAL: &'static str = "taxonomy domains";
    const ENDPOINT: &'static str = "/api/taxonomy-domains";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> TaxonomyDomainDraft {
        TaxonomyDomainDraft {
            domain_name: self.domain_name.clone(),
            domain_code: self.domain_code.clone().unwrap_or_default(),
            description: self.description.clone().unwrap_or_default(),
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("domain_name", "Domain name is required"),
            Rule::unique("domain_name", "Domain name already exists"),
            Rule::max_len("domain_code", 10, "Domain code must be at most 10 characters"),
        ]
    }
}

impl StoredResource for TaxonomyDomain {
    fn from_draft(id: RecordId, draft: TaxonomyDomainDraft) -> Self {
        Self {
            id,
            domain_name: draft.domain_name.trim().to_string(),
            domain_code: non_blank(draft.domain_code),
            description: non_blank(draft.description),
        }
    }

    fn apply_draft(&mut self, draft: TaxonomyDomainDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.domain_name, term)
            || self
                .domain_code
                .as_deref()
                .is_some_and(|code| contains_ignore_case(code, term))
    }

    fn conflict_with(&self, draft: &TaxonomyDomainDraft) -> Option<String> {
        self.domain_name
            .eq_ignore_ascii_case(draft.domain_name.trim())
            .then(|| format!("Domain {} already exists", self.domain_name))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TaxonomyLevel {
    pub id: RecordId,
    pub domain_id: u32,
    pub level_number: u32,
    pub level_name: String,
    #[serde(default, with = "comma_list")]
    pub action_verbs: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TaxonomyLevelDraft {
    pub domain_id: Option<u32>,
    pub level_number: Option<u32>,
    pub level_name: String,
    #[serde(with = "comma_list")]
    pub action_verbs: Vec<String>,
}

impl TaxonomyLevelDraft {
    pub const FIELDS: &'static [&'static str] =
        &["domain_id", "level_number", "level_name", "action_verbs"];
}

impl Draft for TaxonomyLevelDraft {
    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "domain_id" => Some(self.domain_id.into()),
            "level_number" => Some(self.level_number.into()),
            "level_name" => Some(FieldValue::text(&self.level_name)),
            "action_verbs" => Some(FieldValue::List(self.action_verbs.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "domain_id" => self.domain_id = value.into_number(name)?,
            "level_number" => self.level_number = value.into_number(name)?,
            "level_name" => self.level_name = value.into_text(),
            "action_verbs" => self.action_verbs = value.into_list(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }
}

/// Levels of one domain are fetched as a scoped set, in level order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DomainFilter {
    pub domain_id: Option<u32>,
}

impl ListFilter for DomainFilter {
    fn scoped_path(&self, endpoint: &str) -> Option<String> {
        self.domain_id.map(|id| format!("{endpoint}/domain/{id}"))
    }
}

impl ResourceSchema for TaxonomyLevel {
    type Id = RecordId;
    type Draft = TaxonomyLevelDraft;
    type Filter = DomainFilter;
    const LABEL: &'static str = "Taxonomy level";
    const PLURAL: &'static str = "taxonomy levels";
    const ENDPOINT: &'static str = "/api/taxonomy-levels";

    fn id(&self) -> &RecordId {
        &self.id
    }

    fn to_draft(&self) -> TaxonomyLevelDraft {
        TaxonomyLevelDraft {
            domain_id: Some(self.domain_id),
            level_number: Some(self.level_number),
            level_name: self.level_name.clone(),
            action_verbs: self.action_verbs.clone(),
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("domain_id", "Please select a domain"),
            Rule::required("level_number", "Level number is required"),
            Rule::range("level_number", 1.0, 10.0, "Level number must be between 1 and 10"),
            Rule::required("level_name", "Level name is required"),
            Rule::required("action_verbs", "At least one action verb is required"),
        ]
    }
}

impl StoredResource for TaxonomyLevel {
    fn from_draft(id: RecordId, draft: TaxonomyLevelDraft) -> Self {
        Self {
            id,
            domain_id: draft.domain_id.unwrap_or_default(),
            level_number: draft.level_number.unwrap_or_default(),
            level_name: draft.level_name.trim().to_string(),
            action_verbs: draft.action_verbs,
        }
    }

    fn apply_draft(&mut self, draft: TaxonomyLevelDraft) {
        *self = Self::from_draft(self.id, draft);
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.level_name, term)
            || self.action_verbs.iter().any(|verb| contains_ignore_case(verb, term))
    }

    fn in_scope(&self, filter: &DomainFilter) -> bool {
        filter.domain_id.map_or(true, |id| id == self.domain_id)
    }

    fn conflict_with(&self, draft: &TaxonomyLevelDraft) -> Option<String> {
        (draft.domain_id == Some(self.domain_id) && draft.level_number == Some(self.level_number))
            .then(|| format!("Level {} already exists in this domain", self.level_number))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_framework::validation::validate;
    use console_framework::ValidationScope;

    #[test]
    fn test_domain_name_unique_ignoring_case() {
        let existing = TaxonomyDomain::from_draft(
            RecordId(1),
            TaxonomyDomainDraft {
                domain_name: "Cognitive".into(),
                ..Default::default()
            },
        );
        let draft = TaxonomyDomainDraft {
            domain_name: "cognitive ".into(),
            ..Default::default()
        };
        let report = validate::<TaxonomyDomain>(&draft, &ValidationScope::new(&[existing], None));
        assert_eq!(report.first_message.as_deref(), Some("Domain name already exists"));
    }

    #[test]
    fn test_level_verbs_bound_as_delimited_text() {
        let mut draft = TaxonomyLevelDraft::default();
        draft
            .set_field("action_verbs", FieldValue::text("define, list ,recall"))
            .unwrap();
        assert_eq!(draft.action_verbs, vec!["define", "list", "recall"]);
        assert_eq!(draft.field("action_verbs").unwrap().display(), "define,list,recall");
    }

    #[test]
    fn test_level_rules_require_domain_first() {
        let draft = TaxonomyLevelDraft {
            level_number: Some(12),
            ..Default::default()
        };
        let report = validate::<TaxonomyLevel>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(report.first_message.as_deref(), Some("Please select a domain"));
        assert_eq!(report.errors["level_number"], "Level number must be between 1 and 10");
        assert_eq!(report.errors["action_verbs"], "At least one action verb is required");
    }

    #[test]
    fn test_domain_filter_scopes_levels() {
        let filter = DomainFilter { domain_id: Some(3) };
        assert_eq!(
            filter.scoped_path(TaxonomyLevel::ENDPOINT).as_deref(),
            Some("/api/taxonomy-levels/domain/3")
        );
        assert_eq!(DomainFilter::default().scoped_path(TaxonomyLevel::ENDPOINT), None);

        let level = TaxonomyLevel::from_draft(
            RecordId(1),
            TaxonomyLevelDraft {
                domain_id: Some(3),
                level_number: Some(1),
                level_name: "Remember".into(),
                action_verbs: vec!["recall".into()],
            },
        );
        assert!(level.in_scope(&filter));
        assert!(!level.in_scope(&DomainFilter { domain_id: Some(4) }));
        assert!(level.matches_search("RECALL"));
    }
}
