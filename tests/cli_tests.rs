use predicates::prelude::PredicateBooleanExt;
use predicates::str::contains;
use std::fs;

mod common;
use common::{fc, init_and_login, setup_test_db, temp_out};

const ALL_YES: [&str; 8] = [
    "--set", "q1=yes", "--set", "q2=yes", "--set", "q3=yes", "--set", "q4=yes",
];

fn pre_jsa(db: &str, job: &str) {
    fc().args(["--db", db, "pre-jsa", job])
        .args(ALL_YES)
        .arg("--submit")
        .assert()
        .success()
        .stdout(contains("GPS Confirmed"))
        .stdout(contains("Pre-JSA submitted"));
}

#[test]
fn init_creates_the_seeded_schedule() {
    let db = setup_test_db("cli_init");
    init_and_login(&db);

    fc().args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("JOB-001"))
        .stdout(contains("JOB-002"))
        .stdout(contains("Scheduled"));
}

#[test]
fn field_commands_require_login() {
    let db = setup_test_db("cli_no_login");
    fc().args(["--db", &db, "--test", "init"])
        .assert()
        .success();

    fc().args(["--db", &db, "list"])
        .assert()
        .failure()
        .stderr(contains("Not logged in"));
}

#[test]
fn blank_password_is_rejected() {
    let db = setup_test_db("cli_bad_login");
    fc().args(["--db", &db, "--test", "init"])
        .assert()
        .success();

    fc().args(["--db", &db, "login", "--user", "mike", "--password", ""])
        .assert()
        .failure()
        .stderr(contains("Invalid credentials"));
}

#[test]
fn start_is_refused_before_the_pre_jsa() {
    let db = setup_test_db("cli_start_gate");
    init_and_login(&db);

    fc().args(["--db", &db, "start", "JOB-001"])
        .assert()
        .failure()
        .stderr(contains("Pre-JSA"));
}

#[test]
fn full_job_flow_through_hold_and_resume() {
    let db = setup_test_db("cli_flow");
    init_and_login(&db);

    fc().args(["--db", &db, "start-day", "--truck", "T-12"])
        .assert()
        .success()
        .stdout(contains("2 job(s) assigned"));

    pre_jsa(&db, "JOB-001");

    fc().args(["--db", &db, "start", "JOB-001"])
        .assert()
        .success()
        .stdout(contains("JOB-001 started"));

    fc().args([
        "--db", &db, "hold", "JOB-001", "--kind", "equip", "--details", "need auger",
    ])
    .assert()
    .success()
    .stdout(contains("On Hold (Equipment)"));

    fc().args(["--db", &db, "show", "JOB-001"])
        .assert()
        .success()
        .stdout(contains("need auger"))
        .stdout(contains("Resume work"));

    fc().args(["--db", &db, "resume", "JOB-001"])
        .assert()
        .success()
        .stdout(contains("In Progress"));
}

#[test]
fn hold_without_details_fails() {
    let db = setup_test_db("cli_hold_blank");
    init_and_login(&db);
    pre_jsa(&db, "JOB-001");
    fc().args(["--db", &db, "start", "JOB-001"])
        .assert()
        .success();

    fc().args(["--db", &db, "hold", "JOB-001", "--kind", "help", "--details", " "])
        .assert()
        .failure()
        .stderr(contains("Validation failed"));
}

#[test]
fn pre_jsa_draft_is_kept_between_runs() {
    let db = setup_test_db("cli_jsa_draft");
    init_and_login(&db);

    fc().args(["--db", &db, "pre-jsa", "JOB-002", "--set", "q2=no:gloves missing"])
        .assert()
        .success()
        .stdout(contains("gloves missing"));

    fc().args(["--db", &db, "pre-jsa", "JOB-002"])
        .assert()
        .success()
        .stdout(contains("Resuming saved draft"))
        .stdout(contains("gloves missing"));

    fc().args(["--db", &db, "pre-jsa", "JOB-002", "--submit"])
        .assert()
        .failure()
        .stderr(contains("q1"));
}

#[test]
fn offline_submit_is_queued_then_synced() {
    let db = setup_test_db("cli_offline");
    init_and_login(&db);

    fc().args(["--db", &db, "offline", "on"])
        .assert()
        .success()
        .stdout(contains("Offline mode on"));

    fc().args(["--db", &db, "pre-jsa", "JOB-001"])
        .args(ALL_YES)
        .arg("--submit")
        .assert()
        .success()
        .stdout(contains("will sync when back online"));

    fc().args(["--db", &db, "start", "JOB-001"])
        .assert()
        .failure();

    fc().args(["--db", &db, "offline", "off"])
        .assert()
        .success()
        .stdout(contains("1 of 1 queued write(s) synced"));

    fc().args(["--db", &db, "start", "JOB-001"])
        .assert()
        .success();
}

#[test]
fn incident_report_is_filed() {
    let db = setup_test_db("cli_incident");
    init_and_login(&db);

    fc().args([
        "--db",
        &db,
        "incident",
        "--kind",
        "witness",
        "--witness",
        "Jane Roe",
        "--description",
        "Saw the auger slip",
        "--signature",
        "M. Foreman",
    ])
    .assert()
    .success()
    .stdout(contains("Incident report submitted"));

    fc().args([
        "--db", &db, "incident", "--kind", "witness", "--witness", "Jane Roe",
    ])
    .assert()
    .failure()
    .stderr(contains("Signature required"));
}

#[test]
fn reminders_add_list_remove() {
    let db = setup_test_db("cli_remind");
    fc().args(["--db", &db, "--test", "init"])
        .assert()
        .success();

    fc().args(["--db", &db, "remind", "--note", "Order gate hinges", "--date", "2030-01-15"])
        .assert()
        .success()
        .stdout(contains("Reminder #1"));

    fc().args(["--db", &db, "remind", "--list"])
        .assert()
        .success()
        .stdout(contains("Order gate hinges").and(contains("2030-01-15")));

    fc().args(["--db", &db, "remind", "--remove", "1"])
        .assert()
        .success();

    fc().args(["--db", &db, "remind"])
        .assert()
        .success()
        .stdout(contains("No reminders"));

    fc().args(["--db", &db, "remind", "--note", "x", "--date", "15/01/2030"])
        .assert()
        .failure()
        .stderr(contains("Invalid date"));
}

#[test]
fn nav_reaches_the_destination() {
    let db = setup_test_db("cli_nav");
    init_and_login(&db);

    fc().args(["--db", &db, "nav", "JOB-002"])
        .assert()
        .success()
        .stdout(contains("Head North on Main St"))
        .stdout(contains("Take Exit 42 towards Industrial Park"))
        .stdout(contains("Destination is on your right"))
        .stdout(contains("Arrived at 777 Industrial Pkwy"));
}

#[test]
fn export_csv_and_json() {
    let db = setup_test_db("cli_export");
    init_and_login(&db);
    pre_jsa(&db, "JOB-001");

    let csv_out = temp_out("cli_export_hist", "csv");
    fc().args(["--db", &db, "export", "--format", "csv", "--file", &csv_out])
        .assert()
        .success();
    let csv = fs::read_to_string(&csv_out).expect("csv written");
    assert!(csv.contains("JOB-001"));
    assert!(csv.contains("safety-check"));

    let json_out = temp_out("cli_export_jobs", "json");
    fc().args(["--db", &db, "export", "--format", "json", "--file", &json_out])
        .assert()
        .success();
    let json: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_out).expect("json written")).unwrap();
    assert_eq!(json.as_array().map(Vec::len), Some(2));

    fc().args(["--db", &db, "export", "--file", "relative.csv"])
        .assert()
        .failure()
        .stderr(contains("must be absolute"));
}

#[test]
fn audit_log_records_commands() {
    let db = setup_test_db("cli_log");
    init_and_login(&db);

    fc().args(["--db", &db, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("init").and(contains("login")));
}

#[test]
fn logout_resets_the_schedule() {
    let db = setup_test_db("cli_logout");
    init_and_login(&db);
    pre_jsa(&db, "JOB-001");
    fc().args(["--db", &db, "start", "JOB-001"])
        .assert()
        .success();

    fc().args(["--db", &db, "logout"])
        .assert()
        .success();
    fc().args(["--db", &db, "login", "--user", "mike", "--password", "pw"])
        .assert()
        .success();

    fc().args(["--db", &db, "list"])
        .assert()
        .success()
        .stdout(contains("In Progress").not());
}
