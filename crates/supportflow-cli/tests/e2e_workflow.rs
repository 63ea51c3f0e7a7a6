//! E2E CLI workflow tests: init -> login -> create -> triage -> reply.
//!
//! Each test runs `sf` as a subprocess in an isolated temp directory.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::path::Path;
use tempfile::TempDir;

// ---------------------------------------------------------------------------
// Test Harness
// ---------------------------------------------------------------------------

/// Build a Command targeting the sf binary, rooted in `dir`.
fn sf_cmd(dir: &Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("sf"));
    cmd.current_dir(dir);
    // Suppress tracing output that goes to stderr
    cmd.env("SF_LOG", "error");
    cmd
}

/// Initialize a workspace in `dir`.
fn init_workspace(dir: &Path) {
    sf_cmd(dir).args(["init"]).assert().success();
}

/// Log in as the given email.
fn login(dir: &Path, email: &str) {
    sf_cmd(dir).args(["login", email]).assert().success();
}

/// Run a command expecting success and parse its `--json` output.
fn json_output(dir: &Path, args: &[&str]) -> Value {
    let mut full_args: Vec<&str> = args.to_vec();
    full_args.push("--json");
    let output = sf_cmd(dir)
        .args(&full_args)
        .output()
        .expect("command should not crash");
    assert!(
        output.status.success(),
        "{args:?} failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("--json should produce valid JSON")
}

/// Create a ticket via CLI, return its id.
fn create_ticket(dir: &Path, subject: &str) -> u64 {
    let json = json_output(
        dir,
        &[
            "create",
            "--subject",
            subject,
            "--requester",
            "customer@example.com",
            "--message",
            "Something is broken.",
        ],
    );
    json["ticket"]["id"].as_u64().expect("ticket id")
}

// ---------------------------------------------------------------------------
// Workspace
// ---------------------------------------------------------------------------

#[test]
fn init_seeds_the_demo_dataset() {
    let dir = TempDir::new().expect("temp dir");
    let json = {
        let output = sf_cmd(dir.path())
            .args(["init", "--json"])
            .output()
            .expect("init should not crash");
        assert!(output.status.success());
        serde_json::from_slice::<Value>(&output.stdout).expect("valid JSON")
    };
    assert_eq!(json["ok"], true);
    assert_eq!(json["users"], 3);
    assert_eq!(json["tickets"], 6);
    assert_eq!(json["articles"], 4);

    let data_dir = dir.path().join(".supportflow");
    for file in ["users.json", "tickets.json", "kb.json", "outbox.json", "notifications.json"] {
        assert!(data_dir.join(file).exists(), "missing {file}");
    }
}

#[test]
fn commands_fail_before_init() {
    let dir = TempDir::new().expect("temp dir");
    sf_cmd(dir.path())
        .args(["list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("sf init"));
}

#[test]
fn login_is_case_insensitive_and_rejects_strangers() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());

    let json = json_output(dir.path(), &["login", "AGENT@supportflow.com"]);
    assert_eq!(json["ok"], true);
    assert_eq!(json["user_id"], 2);
    assert_eq!(json["role"], "AGENT");
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));

    sf_cmd(dir.path())
        .args(["login", "stranger@example.com"])
        .assert()
        .failure();
}

// ---------------------------------------------------------------------------
// Tickets
// ---------------------------------------------------------------------------

#[test]
fn create_assigns_the_next_id_and_opens_the_ticket() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "admin@supportflow.com");

    let id = create_ticket(dir.path(), "Export hangs");
    assert_eq!(id, 107);

    let json = json_output(dir.path(), &["show", "107"]);
    assert_eq!(json["ticket"]["status"], "Open");
    assert_eq!(json["ticket"]["subject"], "Export hangs");
    assert_eq!(json["ticket"]["messages"].as_array().map(Vec::len), Some(1));
    assert_eq!(json["ticket"]["messages"][0]["fromAgent"], false);
}

#[test]
fn create_rejects_an_empty_subject() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());

    sf_cmd(dir.path())
        .args([
            "create",
            "--subject",
            "   ",
            "--requester",
            "a@b.c",
            "--message",
            "hello",
        ])
        .assert()
        .failure();

    let json = json_output(dir.path(), &["list", "--all"]);
    assert_eq!(json["total"], 6);
}

#[test]
fn list_filters_and_searches() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());

    let json = json_output(dir.path(), &["list", "--query", "403"]);
    assert_eq!(json["total"], 1);
    assert_eq!(json["tickets"][0]["id"], 102);
    assert_eq!(
        json["tickets"][0]["subject"],
        "Cannot login to Dashboard - 403 Forbidden"
    );

    let json = json_output(dir.path(), &["list", "--status", "open", "--priority", "urgent"]);
    assert_eq!(json["total"], 1);
    assert_eq!(json["tickets"][0]["id"], 101);

    let json = json_output(dir.path(), &["list"]);
    assert_eq!(json["total"], 6);
    assert_eq!(json["has_more"], false);
}

#[test]
fn reply_answers_and_logs_to_the_outbox() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "agent@supportflow.com");

    let json = json_output(
        dir.path(),
        &["reply", "102", "--message", "Your account was locked; unlocked now."],
    );
    assert_eq!(json["ok"], true);
    assert_eq!(json["status"], "Answered");
    assert_eq!(json["to_email"], "jane.doe@marketing-pro.io");

    let json = json_output(dir.path(), &["outbox"]);
    assert_eq!(json["total"], 6);

    // The reply is visible on the timeline.
    let json = json_output(dir.path(), &["show", "102"]);
    assert_eq!(json["ticket"]["messages"].as_array().map(Vec::len), Some(2));
    assert_eq!(json["ticket"]["messages"][1]["fromAgent"], true);
}

#[test]
fn reply_reopens_a_closed_ticket() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "kifayat@supportflow.com");

    // 106 is seeded Closed.
    let json = json_output(dir.path(), &["reply", "106", "--message", "Dark mode shipped!"]);
    assert_eq!(json["status"], "Answered");
}

#[test]
fn reply_templates_seed_the_body() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "agent@supportflow.com");

    json_output(
        dir.path(),
        &["reply", "102", "--template", "password-reset"],
    );
    let json = json_output(dir.path(), &["show", "102"]);
    let body = json["ticket"]["messages"][1]["body"].as_str().expect("body");
    assert!(body.contains("Forgot Password"));
}

#[test]
fn notes_stay_internal_and_do_not_answer() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "agent@supportflow.com");

    let json = json_output(
        dir.path(),
        &["note", "102", "--message", "Suspect a stale session cookie."],
    );
    assert_eq!(json["status"], "Open");
    assert_eq!(json["notes"], 1);

    let json = json_output(dir.path(), &["outbox"]);
    assert_eq!(json["total"], 5, "a note must not produce outbound mail");
}

// ---------------------------------------------------------------------------
// Triage
// ---------------------------------------------------------------------------

#[test]
fn status_and_priority_transitions_are_permissive() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());

    // Open -> Closed directly is allowed.
    let json = json_output(dir.path(), &["status", "101", "closed"]);
    assert_eq!(json["status"], "Closed");
    let json = json_output(dir.path(), &["status", "101", "open"]);
    assert_eq!(json["status"], "Open");

    let json = json_output(dir.path(), &["priority", "104", "urgent"]);
    assert_eq!(json["priority"], "Urgent");
}

#[test]
fn assignment_notifies_the_new_assignee_once() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());

    // Hand 105 (assigned to user 2) to user 3.
    let json = json_output(dir.path(), &["assign", "105", "3"]);
    assert_eq!(json["assignedId"], 3);

    // Kifayat sees the assignment notification; seed had 2 for user 3.
    login(dir.path(), "kifayat@supportflow.com");
    let json = json_output(dir.path(), &["notifications", "list"]);
    assert_eq!(json["notifications"].as_array().map(Vec::len), Some(3));
    let newest = &json["notifications"][0];
    assert_eq!(newest["ticketId"], 105);
    assert_eq!(newest["read"], false);
    assert!(newest["message"]
        .as_str()
        .expect("message")
        .contains("Ticket #105 (\"Request for custom SSO integration\")"));

    // Re-assigning the same user adds nothing.
    json_output(dir.path(), &["assign", "105", "3"]);
    let json = json_output(dir.path(), &["notifications", "list"]);
    assert_eq!(json["notifications"].as_array().map(Vec::len), Some(3));
}

#[test]
fn assigning_to_me_uses_the_session() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "admin@supportflow.com");

    let json = json_output(dir.path(), &["assign", "102", "me"]);
    assert_eq!(json["assignedId"], 1);
    assert_eq!(json["assignee"], "Alex Admin");
}

#[test]
fn delete_is_admin_only() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());

    login(dir.path(), "agent@supportflow.com");
    let output = sf_cmd(dir.path())
        .args(["delete", "106"])
        .output()
        .expect("delete should not crash");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("E1002"));

    // Nothing was deleted.
    let json = json_output(dir.path(), &["list", "--all"]);
    assert_eq!(json["total"], 6);

    login(dir.path(), "admin@supportflow.com");
    let json = json_output(dir.path(), &["delete", "106"]);
    assert_eq!(json["ok"], true);
    let json = json_output(dir.path(), &["list", "--all"]);
    assert_eq!(json["total"], 5);
}

#[test]
fn stats_reflect_the_seeded_workspace() {
    let dir = TempDir::new().expect("temp dir");
    init_workspace(dir.path());
    login(dir.path(), "agent@supportflow.com");

    let json = json_output(dir.path(), &["stats"]);
    assert_eq!(json["total"], 6);
    assert_eq!(json["open"], 3);
    assert_eq!(json["pending"], 1);
    assert_eq!(json["urgent"], 1);
    assert_eq!(json["assigned_to_me"], 3);
    assert_eq!(json["resolved"], 2);
    assert_eq!(json["resolution_rate"], 33);
}
