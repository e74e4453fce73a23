//! # Department Client
//!
//! Typed access to the departments screen.
use crate::error::ConsoleError;
use crate::model::{Department, DepartmentDraft};
use async_trait::async_trait;
use console_framework::{FrameworkError, ManagerClient, PageClient, RecordId, SubmitOutcome};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct DepartmentClient {
    inner: ManagerClient<Department>,
}

impl DepartmentClient {
    pub fn new(inner: ManagerClient<Department>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl PageClient<Department> for DepartmentClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<Department> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("departments", e)
    }
}

impl DepartmentClient {
    #[instrument(skip(self, draft), fields(code = %draft.department_code))]
    pub async fn create_department(&self, draft: &DepartmentDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::add(self, draft, DepartmentDraft::FIELDS).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_department(&self, id: RecordId, draft: &DepartmentDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::edit(self, id, draft, DepartmentDraft::FIELDS).await
    }

    /// Looks a department up by code among the loaded page.
    pub fn find_by_code(&self, code: &str) -> Option<Department> {
        self.view()
            .records
            .into_iter()
            .find(|department| department.department_code.eq_ignore_ascii_case(code))
    }
}
