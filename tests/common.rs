#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use fencecrew::core::FieldService;
use fencecrew::models::forms::{Answer, AsBuiltForm, ItemRow, PhotoSlot, PreJsaAnswers};
use fencecrew::storage::{MemoryJobRepository, MemoryStore};
use std::env;
use std::fs;
use std::path::PathBuf;

pub type MemService = FieldService<MemoryJobRepository, MemoryStore>;

pub fn fc() -> Command {
    cargo_bin_cmd!("fencecrew")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fencecrew.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Initialize the DB (schema + seeded schedule) and sign in.
pub fn init_and_login(db_path: &str) {
    fc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    fc().args(["--db", db_path, "login", "--user", "mike", "--password", "secret"])
        .assert()
        .success();
}

/// In-memory service over the seeded schedule.
pub fn mem_service() -> MemService {
    FieldService::open(MemoryJobRepository::new(), MemoryStore::new()).expect("open service")
}

pub fn all_yes() -> PreJsaAnswers {
    PreJsaAnswers::all(Answer::Yes)
}

/// Pre-JSA on file and job started.
pub fn started(svc: &mut MemService, id: &str) {
    svc.submit_pre_jsa(id, all_yes()).expect("pre-jsa");
    svc.start_job(id).expect("start");
}

/// An As-Built that passes every step.
pub fn complete_as_built() -> AsBuiltForm {
    let mut form = AsBuiltForm::default();
    form.header.job_name = "John Doe".into();
    form.header.street_address = "123 Maple Dr".into();
    form.header.foreman = "Mike Foreman".into();
    form.header.second_crew_member = "Sam".into();
    form.header.clock_in = "07:30".into();
    form.drawing = Some("drawing.png".into());
    form.items.push(ItemRow {
        item: "6ft cedar panel".into(),
        qty: 12,
        ..ItemRow::default()
    });
    for slot in PhotoSlot::ALL {
        form.photos.set(slot, &format!("{}.jpg", slot.as_str()));
    }
    form.signature = Some("M. Foreman".into());
    form
}
