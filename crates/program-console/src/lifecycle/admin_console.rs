use crate::clients::{
    DepartmentClient, PeoClient, ProgramModeClient, ProgramOutcomeClient, TaxonomyDomainClient,
    TaxonomyLevelClient, TrainingClient,
};
use crate::config::{Backend, Settings};
use crate::error::ConsoleError;
use crate::model::{
    Department, FacultyTraining, Peo, ProgramMode, ProgramOutcome, TaxonomyDomain, TaxonomyLevel,
};
use console_framework::store::{StoreActor, StoreClient};
use console_framework::{
    HttpResourceApi, ManagerClient, ManagerOptions, ResourceApi, ResourceManager, ResourceSchema,
    StoredResource,
};
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Every screen of the program console, each running as its own manager task.
///
/// # Example
///
/// ```ignore
/// let settings = Settings::load(Path::new(CONFIG_FILE))?;
/// let console = AdminConsole::start(&settings)?;
///
/// console.departments.create_department(&DepartmentDraft::new("Civil", "CIV")).await?;
/// console.departments.settled().await?;
///
/// console.shutdown().await?;
/// ```
pub struct AdminConsole {
    pub departments: DepartmentClient,
    pub taxonomy_domains: TaxonomyDomainClient,
    pub taxonomy_levels: TaxonomyLevelClient,
    pub program_modes: ProgramModeClient,
    pub peos: PeoClient,
    pub program_outcomes: ProgramOutcomeClient,
    pub trainings: TrainingClient,

    /// Manager tasks, followed by store tasks for the in-memory backend.
    handles: Vec<JoinHandle<()>>,
}

impl AdminConsole {
    /// Starts the console on the backend named in `settings`.
    pub fn start(settings: &Settings) -> Result<Self, ConsoleError> {
        match settings.backend {
            Backend::Http => Self::connect(settings),
            Backend::Memory => Ok(Self::in_memory(settings.manager_options())),
        }
    }

    /// Runs every screen against the REST API at `settings.api_base_url`.
    /// All screens share one connection pool.
    pub fn connect(settings: &Settings) -> Result<Self, ConsoleError> {
        let http = reqwest::Client::builder()
            .timeout(settings.request_timeout())
            .build()?;
        let base = settings.api_base_url.as_str();
        let options = settings.manager_options();
        info!(backend = %Backend::Http, %base, "Starting console");

        let mut handles = Vec::new();
        let departments = launch(HttpResourceApi::<Department>::new(http.clone(), base), options, &mut handles);
        let taxonomy_domains =
            launch(HttpResourceApi::<TaxonomyDomain>::new(http.clone(), base), options, &mut handles);
        let taxonomy_levels =
            launch(HttpResourceApi::<TaxonomyLevel>::new(http.clone(), base), options, &mut handles);
        let program_modes = launch(HttpResourceApi::<ProgramMode>::new(http.clone(), base), options, &mut handles);
        let peos = launch(HttpResourceApi::<Peo>::new(http.clone(), base), options, &mut handles);
        let program_outcomes =
            launch(HttpResourceApi::<ProgramOutcome>::new(http.clone(), base), options, &mut handles);
        let trainings = launch(HttpResourceApi::<FacultyTraining>::new(http, base), options, &mut handles);

        Ok(Self {
            departments: DepartmentClient::new(departments),
            taxonomy_domains: TaxonomyDomainClient::new(taxonomy_domains),
            taxonomy_levels: TaxonomyLevelClient::new(taxonomy_levels),
            program_modes: ProgramModeClient::new(program_modes),
            peos: PeoClient::new(peos),
            program_outcomes: ProgramOutcomeClient::new(program_outcomes),
            trainings: TrainingClient::new(trainings),
            handles,
        })
    }

    /// Runs every screen against in-process store actors, starting empty.
    pub fn in_memory(options: ManagerOptions) -> Self {
        info!(backend = %Backend::Memory, "Starting console");
        let capacity = options.buffer_size;

        let mut stores = Vec::new();
        let mut handles = Vec::new();
        let departments = launch(store::<Department>(capacity, &mut stores), options, &mut handles);
        let taxonomy_domains = launch(store::<TaxonomyDomain>(capacity, &mut stores), options, &mut handles);
        let taxonomy_levels = launch(store::<TaxonomyLevel>(capacity, &mut stores), options, &mut handles);
        let program_modes = launch(store::<ProgramMode>(capacity, &mut stores), options, &mut handles);
        let peos = launch(store::<Peo>(capacity, &mut stores), options, &mut handles);
        let program_outcomes = launch(store::<ProgramOutcome>(capacity, &mut stores), options, &mut handles);
        let trainings = launch(store::<FacultyTraining>(capacity, &mut stores), options, &mut handles);
        // Stores stop after the managers that own their clients.
        handles.extend(stores);

        Self {
            departments: DepartmentClient::new(departments),
            taxonomy_domains: TaxonomyDomainClient::new(taxonomy_domains),
            taxonomy_levels: TaxonomyLevelClient::new(taxonomy_levels),
            program_modes: ProgramModeClient::new(program_modes),
            peos: PeoClient::new(peos),
            program_outcomes: ProgramOutcomeClient::new(program_outcomes),
            trainings: TrainingClient::new(trainings),
            handles,
        }
    }

    /// Drops every screen client and waits for the tasks to finish.
    ///
    /// Clones of a screen client held elsewhere keep that screen running, and
    /// this call waits for them to be dropped too.
    pub async fn shutdown(self) -> Result<(), ConsoleError> {
        info!("Shutting down console...");

        drop(self.departments);
        drop(self.taxonomy_domains);
        drop(self.taxonomy_levels);
        drop(self.program_modes);
        drop(self.peos);
        drop(self.program_outcomes);
        drop(self.trainings);

        for handle in self.handles {
            if let Err(e) = handle.await {
                error!(error = %e, "Screen task failed");
                return Err(e.into());
            }
        }

        info!("Console shutdown complete.");
        Ok(())
    }
}

/// Spawns a screen's manager and returns its client.
fn launch<R, A>(api: A, options: ManagerOptions, handles: &mut Vec<JoinHandle<()>>) -> ManagerClient<R>
where
    R: ResourceSchema,
    A: ResourceApi<R>,
{
    let (manager, client) = ResourceManager::new(api, options);
    handles.push(tokio::spawn(manager.run()));
    client
}

/// Spawns an empty in-memory store and returns its client.
fn store<R: StoredResource>(buffer_size: usize, handles: &mut Vec<JoinHandle<()>>) -> StoreClient<R> {
    let (actor, client) = StoreActor::new(buffer_size);
    handles.push(tokio::spawn(actor.run()));
    client
}
