//! # Taxonomy Clients
//!
//! Domains are a flat paginated list. Levels are browsed one domain at a
//! time: selecting a domain switches the screen to the scoped
//! `/domain/{id}` fetch, clearing it returns to the paginated list.
use crate::error::ConsoleError;
use crate::model::{DomainFilter, TaxonomyDomain, TaxonomyDomainDraft, TaxonomyLevel, TaxonomyLevelDraft};
use async_trait::async_trait;
use console_framework::{FrameworkError, ManagerClient, PageClient, RecordId, SubmitOutcome};
use tracing::{debug, instrument};

#[derive(Clone)]
pub struct TaxonomyDomainClient {
    inner: ManagerClient<TaxonomyDomain>,
}

impl TaxonomyDomainClient {
    pub fn new(inner: ManagerClient<TaxonomyDomain>) -> Self {
        Self { inner }
    }

    #[instrument(skip(self, draft), fields(name = %draft.domain_name))]
    pub async fn create_domain(&self, draft: &TaxonomyDomainDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::add(self, draft, TaxonomyDomainDraft::FIELDS).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_domain(&self, id: RecordId, draft: &TaxonomyDomainDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::edit(self, id, draft, TaxonomyDomainDraft::FIELDS).await
    }
}

#[async_trait]
impl PageClient<TaxonomyDomain> for TaxonomyDomainClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<TaxonomyDomain> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("taxonomy domains", e)
    }
}

#[derive(Clone)]
pub struct TaxonomyLevelClient {
    inner: ManagerClient<TaxonomyLevel>,
}

#[async_trait]
impl PageClient<TaxonomyLevel> for TaxonomyLevelClient {
    type Error = ConsoleError;

    fn manager(&self) -> &ManagerClient<TaxonomyLevel> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        ConsoleError::screen("taxonomy levels", e)
    }
}

impl TaxonomyLevelClient {
    pub fn new(inner: ManagerClient<TaxonomyLevel>) -> Self {
        Self { inner }
    }

    /// Switches the screen to one domain's levels, or back to all levels.
    #[instrument(skip(self))]
    pub async fn select_domain(&self, domain_id: Option<u32>) -> Result<(), ConsoleError> {
        debug!("Sending request");
        self.inner
            .set_filter(DomainFilter { domain_id })
            .await
            .map_err(Self::map_error)
    }

    /// Selected domain, if any.
    pub fn selected_domain(&self) -> Option<u32> {
        self.view().filter.domain_id
    }

    /// Levels of `domain_id`, ordered by level number.
    pub async fn levels_of(&self, domain_id: u32) -> Result<Vec<TaxonomyLevel>, ConsoleError> {
        self.select_domain(Some(domain_id)).await?;
        let mut levels = self.settled().await?.records;
        levels.sort_by_key(|level| level.level_number);
        Ok(levels)
    }

    /// Adds a level. A draft without a domain goes into the selected one.
    #[instrument(skip(self, draft), fields(level = ?draft.level_number))]
    pub async fn create_level(&self, draft: &TaxonomyLevelDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        let mut draft = draft.clone();
        if draft.domain_id.is_none() {
            draft.domain_id = self.selected_domain();
        }
        super::add(self, &draft, TaxonomyLevelDraft::FIELDS).await
    }

    #[instrument(skip(self, draft))]
    pub async fn update_level(&self, id: RecordId, draft: &TaxonomyLevelDraft) -> Result<SubmitOutcome, ConsoleError> {
        debug!("Sending request");
        super::edit(self, id, draft, TaxonomyLevelDraft::FIELDS).await
    }
}
