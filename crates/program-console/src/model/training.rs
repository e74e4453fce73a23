//! Faculty development records: trainings attended, with an optional
//! certificate upload. Saved as multipart whenever a certificate is attached.

use super::non_blank;
use chrono::NaiveDate;
use console_framework::fields::comma_list;
use console_framework::{
    contains_ignore_case, Attachment, Draft, FieldError, FieldValue, RecordId, ResourceSchema,
    Rule, StoredResource,
};
use serde::{Deserialize, Serialize};

/// Multipart part name of the certificate file.
pub const CERTIFICATE_FIELD: &str = "certificate";

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct FacultyTraining {
    pub id: RecordId,
    pub faculty_name: String,
    pub training_title: String,
    #[serde(default)]
    pub organizer: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default, with = "comma_list")]
    pub skills: Vec<String>,
    /// Server-side path of the stored certificate, if one was uploaded.
    #[serde(default)]
    pub certificate_path: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FacultyTrainingDraft {
    pub faculty_name: String,
    pub training_title: String,
    pub organizer: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    #[serde(with = "comma_list")]
    pub skills: Vec<String>,
    #[serde(skip)]
    pub certificate: Option<Attachment>,
}

impl FacultyTrainingDraft {
    pub const FIELDS: &'static [&'static str] = &[
        "faculty_name",
        "training_title",
        "organizer",
        "start_date",
        "end_date",
        "skills",
    ];
}

fn date_value(date: Option<NaiveDate>) -> FieldValue {
    match date {
        Some(date) => FieldValue::Text(date.format(DATE_FORMAT).to_string()),
        None => FieldValue::Empty,
    }
}

fn parse_date(field: &str, value: FieldValue) -> Result<Option<NaiveDate>, FieldError> {
    if value.is_blank() {
        return Ok(None);
    }
    let text = value.into_text();
    NaiveDate::parse_from_str(text.trim(), DATE_FORMAT)
        .map(Some)
        .map_err(|e| FieldError::invalid(field, format!("{e} (expected YYYY-MM-DD)")))
}

impl Draft for FacultyTrainingDraft {
    const MULTIPART: bool = true;

    fn field(&self, name: &str) -> Option<FieldValue> {
        match name {
            "faculty_name" => Some(FieldValue::text(&self.faculty_name)),
            "training_title" => Some(FieldValue::text(&self.training_title)),
            "organizer" => Some(FieldValue::text(&self.organizer)),
            "start_date" => Some(date_value(self.start_date)),
            "end_date" => Some(date_value(self.end_date)),
            "skills" => Some(FieldValue::List(self.skills.clone())),
            _ => None,
        }
    }

    fn set_field(&mut self, name: &str, value: FieldValue) -> Result<(), FieldError> {
        match name {
            "faculty_name" => self.faculty_name = value.into_text(),
            "training_title" => self.training_title = value.into_text(),
            "organizer" => self.organizer = value.into_text(),
            "start_date" => self.start_date = parse_date(name, value)?,
            "end_date" => self.end_date = parse_date(name, value)?,
            "skills" => self.skills = value.into_list(),
            other => return Err(FieldError::UnknownField(other.to_string())),
        }
        Ok(())
    }

    fn attachment(&self) -> Option<&Attachment> {
        self.certificate.as_ref()
    }

    fn set_attachment(&mut self, attachment: Option<Attachment>) -> Result<(), FieldError> {
        self.certificate = attachment;
        Ok(())
    }
}

impl ResourceSchema for FacultyTraining {
    type Id = RecordId;
    type Draft = FacultyTrainingDraft;
    type Filter = ();
    const LABEL: &'static str = "Training";
    const PLURAL: &'static str = "trainings";
    const ENDPOINT: &'static str = "/api/faculty-trainings";

    fn id(&self) -> &RecordId {
        &self.id
    }

    /// The stored certificate is not downloaded into the form; editing
    /// without attaching a new file keeps the existing one server-side.
    fn to_draft(&self) -> FacultyTrainingDraft {
        FacultyTrainingDraft {
            faculty_name: self.faculty_name.clone(),
            training_title: self.training_title.clone(),
            organizer: self.organizer.clone().unwrap_or_default(),
            start_date: Some(self.start_date),
            end_date: Some(self.end_date),
            skills: self.skills.clone(),
            certificate: None,
        }
    }

    fn rules() -> Vec<Rule<Self>> {
        vec![
            Rule::required("faculty_name", "Faculty name is required"),
            Rule::required("training_title", "Training title is required"),
            Rule::required("start_date", "Start date is required"),
            Rule::required("end_date", "End date is required"),
            Rule::<Self>::custom(
                "end_date",
                "End date cannot be before start date",
                |draft: &FacultyTrainingDraft, _| match (draft.start_date, draft.end_date) {
                    (Some(start), Some(end)) => end >= start,
                    _ => true,
                },
            ),
        ]
    }
}

impl StoredResource for FacultyTraining {
    fn from_draft(id: RecordId, draft: FacultyTrainingDraft) -> Self {
        let start_date = draft.start_date.unwrap_or_default();
        Self {
            id,
            faculty_name: draft.faculty_name.trim().to_string(),
            training_title: draft.training_title.trim().to_string(),
            organizer: non_blank(draft.organizer),
            start_date,
            end_date: draft.end_date.unwrap_or(start_date),
            skills: draft.skills,
            certificate_path: draft
                .certificate
                .map(|file| format!("uploads/certificates/{id}-{}", file.file_name)),
        }
    }

    fn apply_draft(&mut self, draft: FacultyTrainingDraft) {
        let kept = self.certificate_path.take();
        *self = Self::from_draft(self.id, draft);
        if self.certificate_path.is_none() {
            self.certificate_path = kept;
        }
    }

    fn matches_search(&self, term: &str) -> bool {
        contains_ignore_case(&self.faculty_name, term)
            || contains_ignore_case(&self.training_title, term)
            || self
                .organizer
                .as_deref()
                .is_some_and(|organizer| contains_ignore_case(organizer, term))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use console_framework::validation::validate;
    use console_framework::ValidationScope;

    fn draft() -> FacultyTrainingDraft {
        let mut draft = FacultyTrainingDraft {
            faculty_name: "Dr. Meena".into(),
            training_title: "Outcome Based Education".into(),
            ..Default::default()
        };
        draft.set_field("start_date", FieldValue::text("2024-03-04")).unwrap();
        draft.set_field("end_date", FieldValue::text("2024-03-08")).unwrap();
        draft
    }

    #[test]
    fn test_end_before_start_is_rejected() {
        let mut draft = draft();
        assert!(validate::<FacultyTraining>(&draft, &ValidationScope::new(&[], None)).is_valid());

        draft.set_field("end_date", FieldValue::text("2024-03-01")).unwrap();
        let report = validate::<FacultyTraining>(&draft, &ValidationScope::new(&[], None));
        assert_eq!(
            report.first_message.as_deref(),
            Some("End date cannot be before start date")
        );
    }

    #[test]
    fn test_dates_round_trip_through_text_inputs() {
        let mut draft = draft();
        assert_eq!(draft.field("start_date").unwrap().display(), "2024-03-04");

        let err = draft
            .set_field("start_date", FieldValue::text("04/03/2024"))
            .unwrap_err();
        assert!(matches!(err, FieldError::InvalidValue { .. }));

        draft.set_field("start_date", FieldValue::text("")).unwrap();
        assert_eq!(draft.start_date, None);
    }

    #[test]
    fn test_certificate_is_a_file_part_not_a_field() {
        let mut draft = draft();
        assert!(<FacultyTrainingDraft as Draft>::MULTIPART);
        draft
            .set_attachment(Some(Attachment {
                field: CERTIFICATE_FIELD,
                file_name: "obe.pdf".into(),
                mime_type: Some("application/pdf".into()),
                bytes: b"%PDF".to_vec(),
            }))
            .unwrap();
        let json = serde_json::to_value(&draft).unwrap();
        assert!(json.get("certificate").is_none());
        assert_eq!(json["start_date"], "2024-03-04");
        assert_eq!(draft.attachment().map(|a| a.file_name.as_str()), Some("obe.pdf"));
    }

    #[test]
    fn test_update_without_file_keeps_stored_certificate() {
        let mut with_file = draft();
        with_file.certificate = Some(Attachment {
            field: CERTIFICATE_FIELD,
            file_name: "obe.pdf".into(),
            mime_type: None,
            bytes: Vec::new(),
        });
        let mut stored = FacultyTraining::from_draft(RecordId(5), with_file);
        assert_eq!(stored.certificate_path.as_deref(), Some("uploads/certificates/5-obe.pdf"));

        let mut edit = stored.to_draft();
        edit.organizer = "AICTE".into();
        stored.apply_draft(edit);
        assert_eq!(stored.organizer.as_deref(), Some("AICTE"));
        assert_eq!(stored.certificate_path.as_deref(), Some("uploads/certificates/5-obe.pdf"));
    }
}
