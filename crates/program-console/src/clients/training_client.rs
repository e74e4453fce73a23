//! # Training Client
//!
//! Faculty trainings carry an optional certificate file. Attaching one
//! switches the save to a multipart upload.
use crate::error::ConsoleError;
use crate::model::{FacultyTraining, FacultyTrainingDraft, CERTIFICATE_FIELD};
use async_trait::async_trait;
use console_framework::{Attachment, FrameworkError, ManagerClient, PageClient, RecordId, SubmitOutcome};
use std::path::Path;
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct TrainingClient {
    inner: ManagerClient<FacultyTraining>,
}

impl TrainingClient {
    pub fn new(inner: ManagerClient<FacultyTraining>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PageClient<FacultyTraining> for TrainingClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<FacultyTraining> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("trainings", e)
    }
}

impl TrainingClient {
    /// Attaches a certificate to the open form. The MIME type is guessed
    /// from the file extension.
    #[instrument(skip(self, bytes), fields(size = bytes.len()))]
    pub async fn attach_certificate(&self, file_name: &str, bytes: Vec<u8>) -> Result<(), ConsoleError> {
        debug!("Sending request");
        let attachment = Attachment {
            field: CERTIFICATE_FIELD,
            file_name: file_name.to_string(),
            mime_type: certificate_mime(file_name).map(str::to_string),
            bytes,
        };
        self.inner
            .attach(Some(attachment))
            .await
            .map_err(Self::map_error)
    }

    pub async fn clear_certificate(&self) -> Result<(), ConsoleError> {
        self.inner.attach(None).await.map_err(Self::map_error)
    }

    #[instrument(skip(self, draft), fields(title = %draft.training_title))]
    pub async fn create_training(&self, draft: &FacultyTrainingDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        self.open_add().await?;
        self.bind(draft).await?;
        self.submit().await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_training(&self, id: RecordId, draft: &FacultyTrainingDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        self.open_edit(id).await?;
        self.bind(draft).await?;
        self.submit().await
    }

    async fn bind(&self, draft: &FacultyTrainingDraft) -> Result<(), ConsoleError> {
        super::fill(self, draft, FacultyTrainingDraft::FIELDS).await?;
        if let Some(certificate) = &draft.certificate {
            self.attach_certificate(&certificate.file_name, certificate.bytes.clone())
                .await?;
        }
        Ok(())
    }
}

fn certificate_mime(file_name: &str) -> Option<&'static str> {
    let extension = Path::new(file_name).extension()?.to_str()?.to_ascii_lowercase();
    match extension.as_str() {
        "pdf" => Some("application/pdf"),
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::certificate_mime;

    #[test]
    fn test_certificate_mime_from_extension() {
        assert_eq!(certificate_mime("fdp.PDF"), Some("application/pdf"));
        assert_eq!(certificate_mime("scan.jpeg"), Some("image/jpeg"));
        assert_eq!(certificate_mime("notes.docx"), None);
        assert_eq!(certificate_mime("certificate"), None);
    }
}
