//! # Program Clients
//!
//! Program modes, PEOs and program outcomes. PEOs belong to a curriculum and
//! are browsed one curriculum at a time.
use crate::error::ConsoleError;
use crate::model::{
    CurriculumFilter, Peo, PeoDraft, ProgramMode, ProgramModeDraft, ProgramOutcome, ProgramOutcomeDraft,
};
use async_trait::async_trait;
use console_framework::{FrameworkError, ManagerClient, PageClient, RecordId, SubmitOutcome};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct ProgramModeClient {
    inner: ManagerClient<ProgramMode>,
}

impl ProgramModeClient {
    pub fn new(inner: ManagerClient<ProgramMode>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(mode = %draft.mode_name))]
    pub async fn create_mode(&self, draft: &ProgramModeDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::add(self, draft, ProgramModeDraft::FIELDS).await
    }

    /// Flips `is_active` on an existing mode, leaving the other fields as stored.
    #[instrument(skip(self))]
    pub async fn set_active(&self, id: RecordId, active: bool) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        self.open_edit(id).await?;
        self.set_field("is_active", active.into()).await?;
        self.submit().await
    }
}

#[async_trait]
impl PageClient<ProgramMode> for ProgramModeClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<ProgramMode> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("program modes", e)
    }
}

#[derive(Clone)]
pub struct PeoClient {
    inner: ManagerClient<Peo>,
}

#[async_trait]
impl PageClient<Peo> for PeoClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<Peo> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("PEOs", e)
    }
}

impl PeoClient {
    pub fn new(inner: ManagerClient<Peo>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self))]
    pub async fn select_curriculum(&self, curriculum_id: Option<u32>) -> Result<(), ConsoleError> {
        debug!("Sending request");
        self.inner
            .set_filter(CurriculumFilter { curriculum_id })
            .await
            .map_err(Self::map_error)
    }

    /// Adds a PEO. A draft without a curriculum goes into the selected one.
    #[instrument(skip(self, draft), fields(peo = %draft.peo_number))]
    pub async fn create_peo(&self, draft: &PeoDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        let mut draft = draft.clone();
        if draft.curriculum_id.is_none() {
            draft.curriculum_id = self.view().filter.curriculum_id;
        }
        super::add(self, &draft, PeoDraft::FIELDS).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_peo(&self, id: RecordId, draft: &PeoDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::edit(self, id, draft, PeoDraft::FIELDS).await
    }
}

#[derive(Clone)]
pub struct ProgramOutcomeClient {
    inner: ManagerClient<ProgramOutcome>,
}

impl ProgramOutcomeClient {
    pub fn new(inner: ManagerClient<ProgramOutcome>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(code = %draft.po_code))]
    pub async fn create_outcome(&self, draft: &ProgramOutcomeDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::add(self, draft, ProgramOutcomeDraft::FIELDS).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_outcome(&self, id: RecordId, draft: &ProgramOutcomeDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::edit(self, id, draft, ProgramOutcomeDraft::FIELDS).await
    }
}

#[async_trait]
impl PageClient<ProgramOutcome> for ProgramOutcomeClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<ProgramOutcome> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("program outcomes", e)
    }
}
