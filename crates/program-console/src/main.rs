//! # Program Console
//!
//! Admin console for an outcome-based-education program: departments,
//! learning taxonomies, program modes, PEOs, program outcomes and faculty
//! trainings, each managed by one generic
//! [`ResourceManager`](console_framework::ResourceManager).
//!
//! - **model**: record, draft and filter types with their validation rules.
//! - **clients**: one typed client per screen.
//! - **lifecycle**: `AdminConsole` starts and stops every screen.
//! - **config**: defaults, `console.toml`, then `CONSOLE__*` variables.
//!
//! The binary walks through a short admin session. Run it with
//! `CONSOLE__BACKEND=memory` to use in-process stores instead of the REST API.

use console_framework::{Attachment, PageClient, SubmitOutcome};
use program_console::config::{Settings, CONFIG_FILE};
use program_console::error::ConsoleError;
use program_console::lifecycle::{setup_tracing, AdminConsole};
use program_console::model::{
    DepartmentDraft, FacultyTrainingDraft, CERTIFICATE_FIELD, PeoDraft, ProgramModeDraft, TaxonomyDomainDraft,
    TaxonomyLevelDraft,
};
use std::path::Path;
use tracing::{info, warn, Instrument};

#[tokio::main]
async fn main() -> Result<(), ConsoleError> {
    setup_tracing();

    let settings = Settings::load(Path::new(CONFIG_FILE))?;
    info!(backend = %settings.backend, url = %settings.api_base_url, "Loaded settings");

    let console = AdminConsole::start(&settings)?;

    async {
        for (name, code) in [("Computer Science", "CSE"), ("Mechanical Engineering", "MECH")] {
            let outcome = console
                .departments
                .create_department(&DepartmentDraft::new(name, code))
                .await?;
            report(outcome, console.departments.settled().await?.notification_text());
        }

        // Same code again: caught on the loaded page before any request is sent.
        let outcome = console
            .departments
            .create_department(&DepartmentDraft::new("Computing", "CSE"))
            .await?;
        report(outcome, console.departments.settled().await?.notification_text());
        console.departments.cancel().await?;

        console.departments.search("mech").await?;
        let view = console.departments.settled().await?;
        info!(matches = view.records.len(), total = view.pagination.total_count, "Searched departments");
        Ok::<_, ConsoleError>(())
    }
    .instrument(tracing::info_span!("departments"))
    .await?;

    async {
        let domain = TaxonomyDomainDraft {
            domain_name: "Cognitive".into(),
            domain_code: "COG".into(),
            description: "Bloom's revised taxonomy".into(),
        };
        console.taxonomy_domains.create_domain(&domain).await?;
        let domains = console.taxonomy_domains.settled().await?;
        let Some(cognitive) = domains.records.first() else {
            warn!("No taxonomy domain available, skipping levels");
            return Ok(());
        };

        console.taxonomy_levels.select_domain(Some(cognitive.id.0)).await?;
        let levels = [
            (1, "Remember", "define, list, recall"),
            (2, "Understand", "explain, classify"),
        ];
        for (number, name, verbs) in levels {
            let level = TaxonomyLevelDraft {
                domain_id: None,
                level_number: Some(number),
                level_name: name.into(),
                action_verbs: console_framework::fields::split_list(verbs),
            };
            console.taxonomy_levels.create_level(&level).await?;
            console.taxonomy_levels.settled().await?;
        }
        let levels = console.taxonomy_levels.levels_of(cognitive.id.0).await?;
        info!(domain = %cognitive.domain_name, levels = levels.len(), "Loaded taxonomy levels");
        Ok::<_, ConsoleError>(())
    }
    .instrument(tracing::info_span!("taxonomy"))
    .await?;

    async {
        let mode = ProgramModeDraft {
            mode_name: "Full Time".into(),
            duration_years: Some(4),
            is_active: true,
        };
        let outcome = console.program_modes.create_mode(&mode).await?;
        report(outcome, console.program_modes.settled().await?.notification_text());

        console.peos.select_curriculum(Some(1)).await?;
        let peo = PeoDraft {
            curriculum_id: None,
            peo_number: "PEO1".into(),
            statement: "Graduates will apply engineering fundamentals to real problems".into(),
        };
        let outcome = console.peos.create_peo(&peo).await?;
        report(outcome, console.peos.settled().await?.notification_text());
        Ok::<_, ConsoleError>(())
    }
    .instrument(tracing::info_span!("program"))
    .await?;

    async {
        let mut training = FacultyTrainingDraft {
            faculty_name: "Dr. A. Kumar".into(),
            training_title: "Outcome Based Education Workshop".into(),
            organizer: "NBA".into(),
            ..Default::default()
        };
        training.start_date = chrono::NaiveDate::from_ymd_opt(2024, 7, 1);
        training.end_date = chrono::NaiveDate::from_ymd_opt(2024, 7, 5);

        training.certificate = Some(Attachment {
            field: CERTIFICATE_FIELD,
            file_name: "obe-workshop.pdf".into(),
            mime_type: None,
            bytes: b"%PDF-1.4".to_vec(),
        });

        let outcome = console.trainings.create_training(&training).await?;
        report(outcome, console.trainings.settled().await?.notification_text());
        Ok::<_, ConsoleError>(())
    }
    .instrument(tracing::info_span!("trainings"))
    .await?;

    console.shutdown().await?;
    info!("Session complete");
    Ok(())
}

fn report(outcome: SubmitOutcome, notification: Option<&str>) {
    match outcome {
        SubmitOutcome::Sent => info!(notification = notification.unwrap_or(""), "Saved"),
        SubmitOutcome::Invalid(validation) => {
            warn!(errors = ?validation.errors, notification = notification.unwrap_or(""), "Rejected")
        }
    }
}
