use chrono::NaiveDate;
use fencecrew::core::{AsBuiltStep, AsBuiltWizard, JsaWizard};
use fencecrew::models::draft::FormType;
use fencecrew::models::forms::{Answer, ItemRow, PhotoSlot, PostJsaAnswers, PreJsaAnswers};
use fencecrew::models::job_status::JobStatus;
use fencecrew::storage::kv::KeyValueStore;
use fencecrew::storage::{MemoryJobRepository, MemoryStore};

mod common;
use common::{MemService, complete_as_built, mem_service, started};
use fencecrew::core::FieldService;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 17).unwrap()
}

fn open_as_built(svc: &mut MemService, id: &str) -> AsBuiltWizard {
    let job = svc.get_job(id).unwrap();
    let user = svc.current_user().unwrap();
    let truck = svc.truck_number().unwrap();
    AsBuiltWizard::open(&svc.drafts(), &job, user.as_ref(), truck.as_deref(), today()).unwrap()
}

/// Walk a wizard to the photo step with valid data on every earlier step.
fn at_photo_step(svc: &mut MemService, id: &str) -> AsBuiltWizard {
    let mut wiz = open_as_built(svc, id);
    wiz.edit(&mut svc.drafts(), |f| {
        f.header.second_crew_member = "Sam".into();
        f.header.clock_in = "07:30".into();
        f.drawing = Some("drawing.png".into());
        f.items.push(ItemRow {
            item: "Chain link".into(),
            qty: 40,
            ..ItemRow::default()
        });
    })
    .unwrap();

    wiz.next(&mut svc.drafts()).unwrap();
    wiz.next(&mut svc.drafts()).unwrap();
    assert_eq!(wiz.next(&mut svc.drafts()).unwrap(), AsBuiltStep::Photos);
    wiz
}

#[test]
fn header_is_prefilled_from_job_session_and_truck() {
    let mut svc = mem_service();
    svc.login("mike", "pw").unwrap();
    svc.start_day("T-7").unwrap();

    let wiz = open_as_built(&mut svc, "JOB-001");
    let h = &wiz.form().header;
    assert_eq!(wiz.step(), AsBuiltStep::Header);
    assert!(!wiz.restored());
    assert_eq!(h.job_name, "John Doe");
    assert_eq!(h.street_address, "123 Maple Dr, Springfield, IL");
    assert_eq!(h.foreman, "Mike Foreman");
    assert_eq!(h.truck, "T-7");
    assert_eq!(h.date, "2026-10-17");
}

#[test]
fn missing_photo_keeps_the_wizard_on_step_four() {
    let mut svc = mem_service();
    svc.login("mike", "pw").unwrap();
    let mut wiz = at_photo_step(&mut svc, "JOB-001");

    wiz.edit(&mut svc.drafts(), |f| {
        for slot in &PhotoSlot::ALL[..4] {
            f.photos.set(*slot, "img.jpg");
        }
    })
    .unwrap();

    let err = wiz.next(&mut svc.drafts()).unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("signage"));
    assert_eq!(wiz.step(), AsBuiltStep::Photos);
    assert_eq!(wiz.step().index(), 4);

    wiz.edit(&mut svc.drafts(), |f| f.photos.set(PhotoSlot::Signage, "sign.jpg"))
        .unwrap();
    assert_eq!(wiz.next(&mut svc.drafts()).unwrap(), AsBuiltStep::Checklist);
}

#[test]
fn empty_header_blocks_the_first_step() {
    let mut svc = mem_service();
    let mut wiz = open_as_built(&mut svc, "JOB-001");
    let err = wiz.next(&mut svc.drafts()).unwrap_err();
    assert!(err.to_string().contains("second crew member"));
    assert_eq!(wiz.step(), AsBuiltStep::Header);
}

#[test]
fn back_never_validates_and_stops_at_step_one() {
    let mut svc = mem_service();
    svc.login("mike", "pw").unwrap();
    let mut wiz = at_photo_step(&mut svc, "JOB-001");

    assert_eq!(wiz.back(&mut svc.drafts()).unwrap(), AsBuiltStep::Items);
    wiz.back(&mut svc.drafts()).unwrap();
    wiz.back(&mut svc.drafts()).unwrap();
    assert_eq!(wiz.back(&mut svc.drafts()).unwrap(), AsBuiltStep::Header);
}

#[test]
fn as_built_draft_resumes_at_the_saved_step() {
    let mut svc = mem_service();
    svc.login("mike", "pw").unwrap();
    let wiz = at_photo_step(&mut svc, "JOB-001");
    let form = wiz.form().clone();
    drop(wiz);

    let resumed = open_as_built(&mut svc, "JOB-001");
    assert!(resumed.restored());
    assert_eq!(resumed.step(), AsBuiltStep::Photos);
    assert_eq!(resumed.form(), &form);
}

#[test]
fn submit_off_the_last_step_is_refused() {
    let mut svc = mem_service();
    svc.login("mike", "pw").unwrap();
    started(&mut svc, "JOB-001");
    let wiz = at_photo_step(&mut svc, "JOB-001");

    assert!(wiz.submit(&mut svc).unwrap_err().is_validation());
    assert_eq!(svc.get_job("JOB-001").unwrap().status, JobStatus::InProgress);
}

#[test]
fn full_walk_submits_and_clears_the_draft() {
    let mut svc = mem_service();
    svc.login("mike", "pw").unwrap();
    started(&mut svc, "JOB-001");

    let mut wiz = open_as_built(&mut svc, "JOB-001");
    let full = complete_as_built();
    wiz.edit(&mut svc.drafts(), |f| *f = full).unwrap();
    for _ in 0..5 {
        wiz.next(&mut svc.drafts()).unwrap();
    }
    assert!(wiz.step().is_last());
    // Validating the last step does not move past it.
    assert_eq!(wiz.next(&mut svc.drafts()).unwrap(), AsBuiltStep::Signature);

    wiz.submit(&mut svc).unwrap();

    assert_eq!(svc.get_job("JOB-001").unwrap().status, JobStatus::Completed);
    assert!(
        svc.drafts()
            .load("JOB-001", FormType::AsBuilt)
            .unwrap()
            .is_none()
    );
}

#[test]
fn jsa_answers_persist_between_openings() {
    let mut svc = mem_service();

    let mut wiz = JsaWizard::<PreJsaAnswers>::open(&svc.drafts(), "JOB-002").unwrap();
    assert!(!wiz.restored());
    wiz.answer(&mut svc.drafts(), "q1", Answer::Yes).unwrap();
    wiz.answer(&mut svc.drafts(), "q2", Answer::No).unwrap();
    wiz.details(&mut svc.drafts(), "q2", "gloves missing").unwrap();
    assert!(!wiz.is_valid());

    let reopened = JsaWizard::<PreJsaAnswers>::open(&svc.drafts(), "JOB-002").unwrap();
    assert!(reopened.restored());
    assert_eq!(reopened.answers().q2.answer, Answer::No);
    assert_eq!(reopened.answers().q2.details, "gloves missing");
    assert_eq!(reopened.answers().q3.answer, Answer::Unanswered);

    // Drafts are per form: the Post-JSA for the same job starts empty.
    let post = JsaWizard::<PostJsaAnswers>::open(&svc.drafts(), "JOB-002").unwrap();
    assert!(!post.restored());
}

#[test]
fn unknown_question_is_rejected() {
    let mut svc = mem_service();
    let mut wiz = JsaWizard::<PostJsaAnswers>::open(&svc.drafts(), "JOB-001").unwrap();
    assert!(
        wiz.answer(&mut svc.drafts(), "q4", Answer::Yes)
            .unwrap_err()
            .is_validation()
    );
}

#[test]
fn jsa_submit_clears_the_draft_and_a_failed_one_keeps_it() {
    let mut svc = mem_service();
    let mut wiz = JsaWizard::<PreJsaAnswers>::open(&svc.drafts(), "JOB-001").unwrap();
    wiz.answer(&mut svc.drafts(), "q1", Answer::Yes).unwrap();

    assert!(wiz.clone().submit(&mut svc).unwrap_err().is_validation());
    assert!(
        svc.drafts()
            .load("JOB-001", FormType::PreJsa)
            .unwrap()
            .is_some()
    );

    for id in ["q2", "q3", "q4"] {
        wiz.answer(&mut svc.drafts(), id, Answer::Yes).unwrap();
    }
    wiz.submit(&mut svc).unwrap();
    assert!(
        svc.drafts()
            .load("JOB-001", FormType::PreJsa)
            .unwrap()
            .is_none()
    );
    assert!(svc.get_job("JOB-001").unwrap().has_pre_jsa());
}

#[test]
fn mobile_client_pre_jsa_draft_is_resumed() {
    let mut store = MemoryStore::new();
    store
        .set(
            "prejsa_JOB-001",
            r#"{"q1":{"answer":true,"details":""},"q2":{"answer":false,"details":"no cones"},"q3":{"answer":null,"details":""},"q4":{"answer":true,"details":""}}"#,
        )
        .unwrap();
    let mut svc = FieldService::open(MemoryJobRepository::new(), store).unwrap();

    let mut wiz = JsaWizard::<PreJsaAnswers>::open(&svc.drafts(), "JOB-001").unwrap();
    assert!(wiz.restored());
    assert_eq!(wiz.answers().q2.answer, Answer::No);
    assert_eq!(wiz.answers().q2.details, "no cones");
    assert_eq!(wiz.answers().q3.answer, Answer::Unanswered);

    // Saved back in the same bare shape.
    wiz.answer(&mut svc.drafts(), "q3", Answer::Yes).unwrap();
    let text = svc.store().get("prejsa_JOB-001").unwrap().unwrap();
    let saved: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(saved["q3"]["answer"], true);
    assert!(saved.get("formType").is_none());
}

#[test]
fn unreadable_drafts_start_over() {
    let mut store = MemoryStore::new();
    store.set("prejsa_JOB-001", r#"{"formType":"pre-jsa"}"#).unwrap();
    store.set("asbuilt_progress_JOB-002", "not json").unwrap();
    let mut svc = FieldService::open(MemoryJobRepository::new(), store).unwrap();

    let wiz = JsaWizard::<PreJsaAnswers>::open(&svc.drafts(), "JOB-001").unwrap();
    assert!(!wiz.restored());

    let wiz = open_as_built(&mut svc, "JOB-002");
    assert!(!wiz.restored());
    assert_eq!(wiz.step(), AsBuiltStep::Header);
}
