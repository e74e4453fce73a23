use console_framework::{Attachment, ManagerOptions, NotificationKind, PageClient, RecordId, SubmitOutcome};
use program_console::config::{Backend, Settings};
use program_console::lifecycle::AdminConsole;
use program_console::model::{
    DepartmentDraft, FacultyTrainingDraft, PeoDraft, ProgramModeDraft, ProgramOutcomeDraft,
    TaxonomyDomainDraft, TaxonomyLevelDraft, CERTIFICATE_FIELD,
};
use std::time::Duration;

fn in_memory() -> AdminConsole {
    AdminConsole::in_memory(ManagerOptions {
        buffer_size: 8,
        search_debounce: Duration::ZERO,
    })
}

fn expect_sent(outcome: SubmitOutcome) {
    match outcome {
        SubmitOutcome::Sent => {}
        SubmitOutcome::Invalid(report) => panic!("unexpected validation failure: {report:?}"),
    }
}

fn expect_invalid(outcome: SubmitOutcome) -> String {
    match outcome {
        SubmitOutcome::Invalid(report) => report.first_message.expect("first message"),
        SubmitOutcome::Sent => panic!("expected local validation to fail"),
    }
}

#[tokio::test]
async fn test_department_create_edit_delete() {
    let console = in_memory();
    let departments = &console.departments;
    assert!(departments.settled().await.unwrap().records.is_empty());

    let outcome = departments
        .create_department(&DepartmentDraft::new("Computer Science", "CSE"))
        .await
        .unwrap();
    expect_sent(outcome);
    let view = departments.settled().await.unwrap();
    assert_eq!(view.notification_text(), Some("Department created successfully!"));
    assert_eq!(view.records.len(), 1);
    assert!(!view.is_modal_open());

    // Duplicate code on the loaded page never leaves the process.
    let outcome = departments
        .create_department(&DepartmentDraft::new("Computing", "CSE"))
        .await
        .unwrap();
    assert_eq!(expect_invalid(outcome), "Department code already exists");
    let view = departments.view();
    assert!(view.is_modal_open());
    assert_eq!(view.notification.as_ref().map(|n| n.kind), Some(NotificationKind::Error));
    departments.cancel().await.unwrap();

    let cse = departments.find_by_code("cse").expect("CSE on page");
    let mut edit = DepartmentDraft::new("Computer Science and Engineering", "CSE");
    edit.hod_name = "Dr. Iyer".into();
    expect_sent(departments.update_department(cse.id, &edit).await.unwrap());
    let view = departments.settled().await.unwrap();
    assert_eq!(view.notification_text(), Some("Department updated successfully!"));
    assert_eq!(view.records[0].hod_name.as_deref(), Some("Dr. Iyer"));
    assert_eq!(view.records[0].department_name, "Computer Science and Engineering");

    departments.request_delete(cse.id).await.unwrap();
    assert_eq!(departments.view().pending_delete, Some(cse.id));
    departments.confirm_delete().await.unwrap();
    let view = departments.settled().await.unwrap();
    assert_eq!(view.notification_text(), Some("Department deleted successfully!"));
    assert!(view.records.is_empty());
    assert_eq!(view.pending_delete, None);

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_backend_conflict_off_page_is_reported() {
    let console = in_memory();
    let departments = &console.departments;
    departments.settled().await.unwrap();
    for (name, code) in [("Computer Science", "CSE"), ("Mechanical", "MECH")] {
        expect_sent(departments.create_department(&DepartmentDraft::new(name, code)).await.unwrap());
        departments.settled().await.unwrap();
    }

    departments.search("mech").await.unwrap();
    let view = departments.settled().await.unwrap();
    assert_eq!(view.records.len(), 1);

    // CSE is not on the filtered page, so only the backend can catch it.
    expect_sent(departments.create_department(&DepartmentDraft::new("CS Again", "CSE")).await.unwrap());
    let view = departments.settled().await.unwrap();
    assert_eq!(view.notification_text(), Some("Department code CSE is already in use"));
    assert!(view.is_modal_open());
    assert_eq!(view.draft.department_name, "CS Again");

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_outcomes_paginate_ten_per_page() {
    let console = in_memory();
    let outcomes = &console.program_outcomes;
    outcomes.settled().await.unwrap();
    for n in 1..=12 {
        let draft = ProgramOutcomeDraft {
            po_code: format!("PO{n}"),
            title: format!("Outcome {n}"),
            ..Default::default()
        };
        expect_sent(outcomes.create_outcome(&draft).await.unwrap());
        outcomes.settled().await.unwrap();
    }

    let view = outcomes.view();
    assert_eq!(view.records.len(), 10);
    assert_eq!(view.pagination.total_pages, 2);
    assert_eq!(view.pagination.total_count, 12);
    assert!(view.pagination.has_next);

    assert!(outcomes.next_page().await.unwrap());
    let view = outcomes.settled().await.unwrap();
    let codes: Vec<_> = view.records.iter().map(|po| po.po_code.as_str()).collect();
    assert_eq!(codes, ["PO11", "PO12"]);
    assert!(!view.pagination.has_next);
    assert!(view.pagination.has_prev);

    assert!(!outcomes.next_page().await.unwrap());
    assert!(!outcomes.go_to(0).await.unwrap());

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_levels_are_scoped_by_selected_domain() {
    let console = in_memory();
    console.taxonomy_domains.settled().await.unwrap();
    for name in ["Cognitive", "Affective"] {
        let draft = TaxonomyDomainDraft {
            domain_name: name.into(),
            ..Default::default()
        };
        expect_sent(console.taxonomy_domains.create_domain(&draft).await.unwrap());
        console.taxonomy_domains.settled().await.unwrap();
    }

    let levels = &console.taxonomy_levels;
    levels.settled().await.unwrap();
    let entries = [(1, 2, "Understand"), (1, 1, "Remember"), (2, 1, "Receive")];
    for (domain, number, name) in entries {
        levels.select_domain(Some(domain)).await.unwrap();
        levels.settled().await.unwrap();
        let draft = TaxonomyLevelDraft {
            domain_id: None,
            level_number: Some(number),
            level_name: name.into(),
            action_verbs: vec!["identify".into()],
        };
        expect_sent(levels.create_level(&draft).await.unwrap());
        levels.settled().await.unwrap();
    }

    let cognitive = levels.levels_of(1).await.unwrap();
    let names: Vec<_> = cognitive.iter().map(|level| level.level_name.as_str()).collect();
    assert_eq!(names, ["Remember", "Understand"]);
    assert!(cognitive.iter().all(|level| level.domain_id == 1));
    assert_eq!(levels.view().pagination.total_pages, 1);

    levels.select_domain(None).await.unwrap();
    let view = levels.settled().await.unwrap();
    assert_eq!(view.records.len(), 3);
    assert_eq!(levels.selected_domain(), None);

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_training_with_certificate_and_date_order() {
    let console = in_memory();
    let trainings = &console.trainings;
    trainings.settled().await.unwrap();

    let mut draft = FacultyTrainingDraft {
        faculty_name: "Dr. Rao".into(),
        training_title: "Assessment Design".into(),
        start_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 10),
        end_date: chrono::NaiveDate::from_ymd_opt(2024, 5, 8),
        ..Default::default()
    };
    let outcome = trainings.create_training(&draft).await.unwrap();
    assert_eq!(expect_invalid(outcome), "End date cannot be before start date");
    assert!(trainings.view().field_errors.contains_key("end_date"));
    trainings.cancel().await.unwrap();

    draft.end_date = chrono::NaiveDate::from_ymd_opt(2024, 5, 12);
    draft.certificate = Some(Attachment {
        field: CERTIFICATE_FIELD,
        file_name: "fdp.pdf".into(),
        mime_type: None,
        bytes: b"%PDF".to_vec(),
    });
    expect_sent(trainings.create_training(&draft).await.unwrap());
    let view = trainings.settled().await.unwrap();
    assert_eq!(view.notification_text(), Some("Training created successfully!"));
    assert_eq!(
        view.records[0].certificate_path.as_deref(),
        Some("uploads/certificates/1-fdp.pdf")
    );

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_field_edit_clears_error_then_saves() {
    let console = in_memory();
    let modes = &console.program_modes;
    modes.settled().await.unwrap();

    let draft = ProgramModeDraft {
        mode_name: "Part Time".into(),
        duration_years: Some(9),
        is_active: true,
    };
    let outcome = modes.create_mode(&draft).await.unwrap();
    assert_eq!(expect_invalid(outcome), "Duration must be between 1 and 6 years");
    assert!(modes.view().field_errors.contains_key("duration_years"));

    modes.set_field("duration_years", "5".into()).await.unwrap();
    let view = modes.view();
    assert!(view.field_errors.is_empty());
    assert_eq!(view.notification, None);

    expect_sent(modes.submit().await.unwrap());
    let view = modes.settled().await.unwrap();
    let id = view.records[0].id;
    assert_eq!(view.records[0].duration_years, 5);

    expect_sent(modes.set_active(id, false).await.unwrap());
    let view = modes.settled().await.unwrap();
    assert!(!view.records[0].is_active);
    assert_eq!(view.notification_text(), Some("Program mode updated successfully!"));

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_start_memory_backend_from_settings() {
    let settings = Settings {
        backend: Backend::Memory,
        search_debounce_ms: 0,
        ..Settings::default()
    };
    let console = AdminConsole::start(&settings).unwrap();
    let peos = &console.peos;
    peos.settled().await.unwrap();

    peos.select_curriculum(Some(4)).await.unwrap();
    peos.settled().await.unwrap();
    let draft = PeoDraft {
        curriculum_id: None,
        peo_number: "PEO1".into(),
        statement: "Graduates will pursue lifelong learning".into(),
    };
    expect_sent(peos.create_peo(&draft).await.unwrap());
    let view = peos.settled().await.unwrap();
    assert_eq!(view.records.len(), 1);
    assert_eq!(view.records[0].curriculum_id, 4);
    assert_eq!(view.records[0].id, RecordId(1));

    let outcome = peos.create_peo(&draft).await.unwrap();
    assert_eq!(expect_invalid(outcome), "PEO number already exists");
    peos.cancel().await.unwrap();

    console.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_unreachable_api_keeps_screens_running() {
    let settings = Settings {
        api_base_url: "http://127.0.0.1:9".into(),
        backend: Backend::Http,
        request_timeout_secs: 2,
        ..Settings::default()
    };
    let console = AdminConsole::start(&settings).unwrap();

    let view = console.departments.settled().await.unwrap();
    assert_eq!(view.notification_text(), Some("Failed to fetch departments"));
    assert!(view.records.is_empty());
    assert_eq!(view.pagination.current_page, 1);

    // Still accepting actions after the failure.
    console.departments.open_add().await.unwrap();
    assert!(console.departments.view().is_modal_open());

    console.shutdown().await.unwrap();
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_back_to_back_creates_on_worker_threads() {
    for _ in 0..20 {
        let console = in_memory();
        let departments = &console.departments;
        departments.settled().await.unwrap();

        for (name, code) in [("Computer Science", "CSE"), ("Mechanical Engineering", "MECH")] {
            expect_sent(departments.create_department(&DepartmentDraft::new(name, code)).await.unwrap());
            let view = departments.settled().await.unwrap();
            assert_eq!(view.notification_text(), Some("Department created successfully!"));
            assert!(!view.is_modal_open());
        }

        let outcome = departments
            .create_department(&DepartmentDraft::new("Computing", "CSE"))
            .await
            .unwrap();
        assert_eq!(expect_invalid(outcome), "Department code already exists");
        assert_eq!(
            departments.view().notification_text(),
            Some("Department code already exists")
        );
        departments.cancel().await.unwrap();
        assert_eq!(departments.view().records.len(), 2);

        console.shutdown().await.unwrap();
    }
}
