use fencecrew::core::service::FieldService;
use fencecrew::core::{OfflineQueue, WriteOutcome};
use fencecrew::models::draft::FormType;
use fencecrew::models::forms::{Answer, AsBuiltForm, PostJsaAnswers};
use fencecrew::models::incident::{IncidentDetails, IncidentReport, IncidentStatus, UtilityType};
use fencecrew::models::job_status::{HoldKind, JobStatus};
use fencecrew::models::queued_write::QueuedWrite;
use fencecrew::storage::repository::JobRepository;
use fencecrew::storage::{MemoryJobRepository, MemoryStore};

mod common;
use common::{all_yes, complete_as_built, mem_service, started};

fn utility_report() -> IncidentReport {
    IncidentReport {
        date: "2026-10-17".into(),
        details: IncidentDetails::Utility {
            utility_types: vec![UtilityType::Gas],
            marked: Some(true),
            photos: vec!["line.jpg".into()],
            description: "Nicked a gas line while digging post 4".into(),
        },
        signature: Some("M. Foreman".into()),
    }
}

#[test]
fn offline_pre_jsa_lands_only_after_reconnecting() {
    let mut svc = mem_service();
    svc.set_offline(true).unwrap();

    let outcome = svc.submit_pre_jsa("JOB-001", all_yes()).unwrap();
    assert_eq!(outcome, WriteOutcome::Queued { pending: 1 });
    assert!(svc.get_job("JOB-001").unwrap().pre_jsa.is_none());
    assert_eq!(svc.queue().len(), 1);

    let report = svc.set_offline(false).unwrap();
    assert_eq!(report.replayed, 1);
    assert!(report.is_clean());
    assert!(svc.get_job("JOB-001").unwrap().pre_jsa.is_some());
    assert!(svc.queue().is_empty());
}

#[test]
fn invalid_forms_are_rejected_even_offline() {
    let mut svc = mem_service();
    svc.set_offline(true).unwrap();

    let mut answers = all_yes();
    answers.q1.answer = Answer::Unanswered;
    assert!(svc.submit_pre_jsa("JOB-001", answers).unwrap_err().is_validation());
    assert!(svc.queue().is_empty());
}

#[test]
fn replay_keeps_submission_order() {
    let mut svc = mem_service();
    started(&mut svc, "JOB-001");
    svc.set_offline(true).unwrap();

    svc.submit_post_jsa("JOB-001", PostJsaAnswers::all(Answer::Yes))
        .unwrap();
    svc.submit_as_built("JOB-001", complete_as_built()).unwrap();
    svc.submit_pre_jsa("JOB-002", all_yes()).unwrap();

    let kinds: Vec<&str> = svc.queue().iter().map(QueuedWrite::kind).collect();
    assert_eq!(kinds, vec!["post-jsa", "as-built", "pre-jsa"]);
    assert_eq!(svc.get_job("JOB-001").unwrap().status, JobStatus::InProgress);

    let report = svc.set_offline(false).unwrap();
    assert_eq!(report.replayed, 3);

    let job = svc.get_job("JOB-001").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.post_jsa.is_some());
    let tail: Vec<&str> = job
        .history
        .iter()
        .rev()
        .take(2)
        .map(|h| h.status.as_str())
        .collect();
    assert_eq!(tail, vec!["completed", "post-jsa"]);
    assert!(svc.get_job("JOB-002").unwrap().has_pre_jsa());
}

#[test]
fn queued_as_built_locks_the_job_until_it_syncs() {
    let mut svc = mem_service();
    started(&mut svc, "JOB-001");
    svc.submit_post_jsa("JOB-001", PostJsaAnswers::all(Answer::Yes))
        .unwrap();
    svc.set_offline(true).unwrap();

    let outcome = svc.submit_as_built("JOB-001", complete_as_built()).unwrap();
    assert_eq!(outcome, WriteOutcome::Queued { pending: 1 });

    let job = svc.get_job("JOB-001").unwrap();
    assert!(svc.available_actions(&job).is_empty());
    assert!(
        svc.request_hold("JOB-001", HoldKind::Equip, "need auger")
            .unwrap_err()
            .is_illegal_transition()
    );
    assert!(svc.resume_job("JOB-001").unwrap_err().is_illegal_transition());
    assert!(
        svc.submit_as_built("JOB-001", complete_as_built())
            .unwrap_err()
            .is_illegal_transition()
    );
    assert_eq!(svc.get_job("JOB-001").unwrap(), job);
    assert_eq!(svc.queue().len(), 1);

    // Other jobs are not affected.
    svc.submit_pre_jsa("JOB-002", all_yes()).unwrap();
    svc.set_offline(false).unwrap();
    svc.start_job("JOB-002").unwrap();
    svc.request_hold("JOB-002", HoldKind::Help, "need a second hand")
        .unwrap();

    let job = svc.get_job("JOB-001").unwrap();
    assert_eq!(job.status, JobStatus::Completed);
    assert!(job.as_built.is_some());
}

#[test]
fn failed_as_built_replay_goes_back_to_its_draft() {
    let mut svc = mem_service();
    started(&mut svc, "JOB-001");
    svc.set_offline(true).unwrap();
    svc.submit_as_built("JOB-001", complete_as_built()).unwrap();
    svc.submit_incident(utility_report()).unwrap();

    // The job was put on hold from another device before this one reconnected.
    let store: MemoryStore = svc.store().clone();
    let mut repo: MemoryJobRepository = svc.repo().clone();
    repo.set_status("JOB-001", JobStatus::HoldEquip).unwrap();
    let mut svc = FieldService::open(repo, store).unwrap();

    let report = svc.set_offline(false).unwrap();
    assert_eq!(report.replayed, 1);
    assert_eq!(report.failed.len(), 1);
    assert_eq!(report.failed[0].kind, "as-built");
    assert_eq!(report.failed[0].job_id.as_deref(), Some("JOB-001"));
    assert!(svc.queue().is_empty());
    assert_eq!(svc.repo().list_incidents().unwrap().len(), 1);

    let job = svc.get_job("JOB-001").unwrap();
    assert_eq!(job.status, JobStatus::HoldEquip);
    assert!(job.as_built.is_none());

    let draft = svc
        .drafts()
        .load("JOB-001", FormType::AsBuilt)
        .unwrap()
        .unwrap();
    assert_eq!(draft.step, 6);
    let form: AsBuiltForm = serde_json::from_value(draft.payload).unwrap();
    assert_eq!(form, complete_as_built());

    // Once resumed the foreman can file it again.
    svc.resume_job("JOB-001").unwrap();
    svc.submit_as_built("JOB-001", form).unwrap();
    assert_eq!(svc.get_job("JOB-001").unwrap().status, JobStatus::Completed);
}

#[test]
fn as_built_for_a_closed_job_is_not_restored() {
    let mut svc = mem_service();
    started(&mut svc, "JOB-001");
    svc.set_offline(true).unwrap();
    svc.submit_as_built("JOB-001", complete_as_built()).unwrap();

    let store: MemoryStore = svc.store().clone();
    let mut repo: MemoryJobRepository = svc.repo().clone();
    repo.record_as_built("JOB-001", complete_as_built()).unwrap();
    repo.set_status("JOB-001", JobStatus::Completed).unwrap();
    let mut svc = FieldService::open(repo, store).unwrap();

    let report = svc.set_offline(false).unwrap();
    assert_eq!(report.failed.len(), 1);
    assert!(
        svc.drafts()
            .load("JOB-001", FormType::AsBuilt)
            .unwrap()
            .is_none()
    );
}

#[test]
fn incidents_record_how_they_arrived() {
    let mut svc = mem_service();
    svc.submit_incident(utility_report()).unwrap();

    svc.set_offline(true).unwrap();
    svc.submit_incident(utility_report()).unwrap();
    svc.set_offline(false).unwrap();

    let statuses: Vec<IncidentStatus> = svc
        .repo()
        .list_incidents()
        .unwrap()
        .into_iter()
        .map(|i| i.status)
        .collect();
    assert_eq!(
        statuses,
        vec![IncidentStatus::Submitted, IncidentStatus::SyncedFromOffline]
    );
}

#[test]
fn unsigned_incident_is_rejected() {
    let mut svc = mem_service();
    let mut report = utility_report();
    report.signature = None;
    assert!(svc.submit_incident(report).unwrap_err().is_validation());
    assert!(svc.repo().list_incidents().unwrap().is_empty());
}

#[test]
fn toggling_offline_twice_does_not_sync() {
    let mut svc = mem_service();
    svc.set_offline(true).unwrap();
    svc.submit_pre_jsa("JOB-001", all_yes()).unwrap();

    let report = svc.set_offline(true).unwrap();
    assert_eq!(report.replayed, 0);
    assert_eq!(svc.queue().len(), 1);
}

#[test]
fn queue_and_flag_survive_a_restart() {
    let mut svc = mem_service();
    svc.set_offline(true).unwrap();
    svc.submit_pre_jsa("JOB-001", all_yes()).unwrap();

    let store: MemoryStore = svc.store().clone();
    let repo: MemoryJobRepository = svc.repo().clone();
    let mut reopened = FieldService::open(repo, store).unwrap();
    assert!(reopened.is_offline());
    assert_eq!(reopened.queue().len(), 1);

    reopened.set_offline(false).unwrap();
    assert!(reopened.get_job("JOB-001").unwrap().has_pre_jsa());
    assert_eq!(OfflineQueue::load(reopened.store()).unwrap().len(), 0);
}
