use fencecrew::core::{FieldService, JsaWizard};
use fencecrew::db::pool::DbPool;
use fencecrew::models::draft::FormType;
use fencecrew::models::forms::{Answer, PostJsaAnswers, PreJsaAnswers};
use fencecrew::models::incident::{IncidentDetails, IncidentReport, IncidentStatus};
use fencecrew::models::job_status::{HoldKind, JobStatus};
use fencecrew::storage::repository::JobRepository;
use fencecrew::storage::seed::seed_jobs;
use tempfile::TempDir;

mod common;
use common::{all_yes, complete_as_built};

fn open_db() -> (TempDir, String) {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("fencecrew.sqlite");
    let path = path.to_string_lossy().to_string();
    DbPool::open_initialized(&path).expect("init db");
    (dir, path)
}

#[test]
fn fresh_database_holds_the_seed() {
    let (_dir, path) = open_db();
    let pool = DbPool::open_initialized(&path).unwrap();
    assert_eq!(pool.repository().list_jobs().unwrap(), seed_jobs());
}

#[test]
fn job_flow_persists_across_connections() {
    let (_dir, path) = open_db();

    {
        let pool = DbPool::open_initialized(&path).unwrap();
        let mut svc = FieldService::open(pool.repository(), pool.local_store()).unwrap();
        svc.login("mike", "pw").unwrap();
        svc.start_day("T-3").unwrap();
        svc.submit_pre_jsa("JOB-002", all_yes()).unwrap();
        svc.start_job("JOB-002").unwrap();
        svc.request_hold("JOB-002", HoldKind::Help, "need a second installer")
            .unwrap();
    }

    let pool = DbPool::open_initialized(&path).unwrap();
    let svc = FieldService::open(pool.repository(), pool.local_store()).unwrap();
    let job = svc.get_job("JOB-002").unwrap();

    assert_eq!(job.status, JobStatus::HoldHelp);
    assert_eq!(job.truck_number.as_deref(), Some("T-3"));
    assert!(job.pre_jsa.is_some());
    let statuses: Vec<&str> = job.history.iter().map(|h| h.status.as_str()).collect();
    assert_eq!(statuses, vec!["safety-check", "started", "hold-help"]);
    assert_eq!(svc.require_user().unwrap().name, "Mike Foreman");
}

#[test]
fn completed_job_carries_all_forms() {
    let (_dir, path) = open_db();
    let pool = DbPool::open_initialized(&path).unwrap();
    let mut svc = FieldService::open(pool.repository(), pool.local_store()).unwrap();

    svc.submit_pre_jsa("JOB-001", all_yes()).unwrap();
    svc.start_job("JOB-001").unwrap();
    svc.submit_post_jsa("JOB-001", PostJsaAnswers::all(Answer::Yes))
        .unwrap();
    svc.submit_as_built("JOB-001", complete_as_built()).unwrap();

    let job = svc.get_job("JOB-001").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert_eq!(job.as_built.unwrap().data, complete_as_built());
    assert!(job.post_jsa.is_some());
}

#[test]
fn logout_reseeds_the_tables() {
    let (_dir, path) = open_db();
    let pool = DbPool::open_initialized(&path).unwrap();
    let mut svc = FieldService::open(pool.repository(), pool.local_store()).unwrap();

    svc.login("mike", "pw").unwrap();
    svc.submit_pre_jsa("JOB-001", all_yes()).unwrap();
    svc.start_job("JOB-001").unwrap();
    svc.logout().unwrap();

    assert_eq!(svc.list_jobs().unwrap(), seed_jobs());
    assert!(svc.current_user().unwrap().is_none());
}

#[test]
fn drafts_and_queue_live_in_local_storage() {
    let (_dir, path) = open_db();

    {
        let pool = DbPool::open_initialized(&path).unwrap();
        let mut svc = FieldService::open(pool.repository(), pool.local_store()).unwrap();
        let mut wiz = JsaWizard::<PreJsaAnswers>::open(&svc.drafts(), "JOB-001").unwrap();
        wiz.answer(&mut svc.drafts(), "q1", Answer::Yes).unwrap();

        svc.set_offline(true).unwrap();
        svc.submit_incident(IncidentReport {
            date: "2026-10-17".into(),
            details: IncidentDetails::Witness {
                witness_name: "Jane Roe".into(),
                description: "Saw the post driver tip over".into(),
            },
            signature: Some("M. Foreman".into()),
        })
        .unwrap();
    }

    let pool = DbPool::open_initialized(&path).unwrap();
    let mut svc = FieldService::open(pool.repository(), pool.local_store()).unwrap();
    assert!(svc.is_offline());
    assert_eq!(svc.queue().len(), 1);
    assert!(
        svc.drafts()
            .load("JOB-001", FormType::PreJsa)
            .unwrap()
            .is_some()
    );

    let report = svc.set_offline(false).unwrap();
    assert_eq!(report.replayed, 1);
    let incidents = svc.repo().list_incidents().unwrap();
    assert_eq!(incidents.len(), 1);
    assert_eq!(incidents[0].status, IncidentStatus::SyncedFromOffline);
}
