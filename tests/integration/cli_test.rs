use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

fn railctl() -> Command {
    #[allow(deprecated)]
    let mut cmd = Command::cargo_bin("railctl").unwrap();
    cmd.env_remove("GEMINI_API_KEY");
    cmd
}

fn init_store() -> TempDir {
    let dir = TempDir::new().unwrap();
    railctl().arg("init").current_dir(dir.path()).assert().success();
    dir
}

fn json_output(dir: &TempDir, args: &[&str]) -> Value {
    let output = railctl()
        .args(args)
        .arg("--json")
        .current_dir(dir.path())
        .output()
        .unwrap();
    assert!(output.status.success(), "{:?} failed: {}", args, String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

#[test]
fn init_creates_store_dir() {
    let dir = TempDir::new().unwrap();
    railctl()
        .arg("init")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains(".railctl"));

    assert!(dir.path().join(".railctl/decisions").is_dir());
    assert!(dir.path().join(".railctl/config.json").exists());
}

#[test]
fn init_twice_fails() {
    let dir = init_store();
    railctl().arg("init").current_dir(dir.path()).assert().failure();
}

#[test]
fn commands_outside_store_fail() {
    let dir = TempDir::new().unwrap();
    railctl()
        .arg("list")
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("railctl init"));
}

#[test]
fn list_empty_store() {
    let dir = init_store();
    railctl()
        .arg("list")
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("No decisions yet"));

    let list = json_output(&dir, &["list"]);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[test]
fn issue_composes_message_and_targets_everyone() {
    let dir = init_store();
    let decision = json_output(&dir, &["issue", "--directive", "pass", "--line", "Up Main"]);

    assert_eq!(
        decision["message"],
        "Pass the train through via Up Main Line at target stations."
    );
    assert_eq!(decision["targets"].as_array().unwrap().len(), 14);
    assert_eq!(decision["category"], "Movement");
    assert_eq!(decision["priority"], "Normal");
}

#[test]
fn issue_stable_with_consist_assigns_loop() {
    let dir = init_store();
    let decision = json_output(
        &dir,
        &[
            "issue",
            "--directive",
            "stable",
            "--loop-station",
            "Masagram",
            "--loop-id",
            "2",
            "--consist-no",
            "12345",
            "--target",
            "Masagram",
        ],
    );
    assert_eq!(decision["message"], "Stable the train at Masagram (Loop 2).");
    assert_eq!(decision["targets"], serde_json::json!(["Masagram"]));

    let grid = json_output(&dir, &["occupancy", "--search", "masa"]);
    let stations = grid.as_array().unwrap();
    assert_eq!(stations.len(), 1);
    let loop2 = &stations[0]["loops"][1];
    assert_eq!(loop2["status"], "Occupied");
    assert_eq!(loop2["train"], "12345");
}

#[test]
fn issue_rejects_station_without_loop() {
    let dir = init_store();
    railctl()
        .args(["issue", "--directive", "stable", "--loop-station", "Belmuri"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("has no loop"));
}

#[test]
fn issue_rejects_loop_station_without_numbered_loops() {
    let dir = init_store();
    railctl()
        .args([
            "issue",
            "--directive",
            "stable",
            "--loop-station",
            "Saktigarh",
            "--consist-no",
            "13024",
        ])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("Saktigarh has no numbered loop lines"));

    let list = json_output(&dir, &["list"]);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[test]
fn issue_rejects_loop_id_past_station_loops() {
    let dir = init_store();
    railctl()
        .args(["issue", "--directive", "stable", "--loop-station", "Gurap", "--loop-id", "2"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("Gurap has loops 1..=1"));
}

#[test]
fn issue_valid_for_out_of_range_is_an_error() {
    let dir = init_store();
    railctl()
        .args(["issue", "--valid-for", "9223372036854775807"])
        .current_dir(dir.path())
        .assert()
        .code(1)
        .stderr(predicates::str::contains("out of range"));

    let list = json_output(&dir, &["list"]);
    assert_eq!(list.as_array().unwrap().len(), 0);
}

#[test]
fn issue_valid_for_sets_expiry() {
    let dir = init_store();
    let decision = json_output(
        &dir,
        &["issue", "--effective-at", "2030-01-01T00:00:00Z", "--valid-for", "90"],
    );
    let expires: chrono::DateTime<chrono::Utc> =
        decision["expiresAt"].as_str().unwrap().parse().unwrap();
    assert_eq!(expires.to_rfc3339(), "2030-01-01T01:30:00+00:00");
}

#[test]
fn issue_rejects_unknown_station() {
    let dir = init_store();
    railctl()
        .args(["issue", "--target", "Howrah"])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn issue_rejects_inverted_window() {
    let dir = init_store();
    railctl()
        .args([
            "issue",
            "--effective-at",
            "2030-01-02T00:00:00Z",
            "--expires-at",
            "2030-01-01T00:00:00Z",
        ])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("expiresAt"));
}

#[test]
fn ack_by_prefix_and_show() {
    let dir = init_store();
    let decision = json_output(&dir, &["issue", "--target", "Gurap", "--target", "Belmuri"]);
    let id = decision["id"].as_str().unwrap().to_string();
    let prefix = &id[..8];

    railctl()
        .args(["ack", prefix, "--station", "Gurap"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("(1/2)"));

    let shown = json_output(&dir, &["show", prefix]);
    assert_eq!(shown["id"], id.as_str());
    assert_eq!(shown["acknowledgements"]["Gurap"]["acknowledged"], true);
    assert_eq!(shown["acknowledgements"]["Belmuri"]["acknowledged"], false);
}

#[test]
fn ack_non_target_fails() {
    let dir = init_store();
    let decision = json_output(&dir, &["issue", "--target", "Gurap"]);
    let id = decision["id"].as_str().unwrap();

    railctl()
        .args(["ack", id, "--station", "Saktigarh"])
        .current_dir(dir.path())
        .assert()
        .failure();

    let shown = json_output(&dir, &["show", id]);
    assert_eq!(shown["acknowledgements"]["Gurap"]["acknowledged"], false);
}

#[test]
fn show_unknown_id_fails() {
    let dir = init_store();
    railctl()
        .args(["show", "deadbeef"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("not found"));
}

#[test]
fn list_pending_for_station() {
    let dir = init_store();
    let first = json_output(&dir, &["issue", "--target", "Gurap", "-m", "first"]);
    json_output(&dir, &["issue", "--target", "Gurap", "-m", "second"]);
    json_output(&dir, &["issue", "--target", "Belmuri", "-m", "elsewhere"]);
    railctl()
        .args(["ack", first["id"].as_str().unwrap(), "--station", "Gurap"])
        .current_dir(dir.path())
        .assert()
        .success();

    let targeted = json_output(&dir, &["list", "--station", "Gurap"]);
    assert_eq!(targeted.as_array().unwrap().len(), 2);

    let pending = json_output(&dir, &["list", "--station", "Gurap", "--pending"]);
    let pending = pending.as_array().unwrap();
    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0]["message"], "second");
}

#[test]
fn list_is_newest_first_and_limited() {
    let dir = init_store();
    for msg in ["one", "two", "three"] {
        json_output(&dir, &["issue", "-m", msg]);
    }
    let list = json_output(&dir, &["list", "-n", "2"]);
    let list = list.as_array().unwrap();
    assert_eq!(list.len(), 2);
    assert_eq!(list[0]["message"], "three");
    assert_eq!(list[1]["message"], "two");
}

#[test]
fn list_active_skips_future_decisions() {
    let dir = init_store();
    json_output(&dir, &["issue", "-m", "later", "--effective-at", "2099-01-01T00:00:00Z"]);
    json_output(&dir, &["issue", "-m", "now"]);

    let active = json_output(&dir, &["list", "--active"]);
    let active = active.as_array().unwrap();
    assert_eq!(active.len(), 1);
    assert_eq!(active[0]["message"], "now");
}

#[test]
fn closure_blocks_line_in_status() {
    let dir = init_store();
    railctl()
        .args(["close", "--line", "Reverse", "--from", "Gurap", "--to", "Masagram"])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("Reverse closed between Gurap and Masagram"));

    let closures = json_output(&dir, &["list", "--closures"]);
    assert_eq!(closures.as_array().unwrap().len(), 1);
    assert_eq!(closures[0]["category"], "Maintenance");

    let status = json_output(&dir, &["status"]);
    assert_eq!(status["live"]["blocked"]["Reverse"], true);
    assert!(status["live"]["blocked"].get("Up Main").is_none());
}

#[test]
fn list_filters_by_category() {
    let dir = init_store();
    json_output(&dir, &["issue", "-m", "move it"]);
    json_output(&dir, &["issue", "-m", "inspect", "--category", "Safety", "--target", "Gurap"]);
    railctl()
        .args(["close", "--line", "Up Main", "--from", "Belmuri"])
        .current_dir(dir.path())
        .assert()
        .success();

    let safety = json_output(&dir, &["list", "--category", "Safety"]);
    let safety = safety.as_array().unwrap();
    assert_eq!(safety.len(), 1);
    assert_eq!(safety[0]["message"], "inspect");

    let at_gurap = json_output(&dir, &["list", "--station", "Gurap", "--category", "Movement"]);
    assert_eq!(at_gurap.as_array().unwrap().len(), 1);
    assert_eq!(at_gurap[0]["message"], "move it");

    let maintenance = json_output(&dir, &["list", "--category", "maintenance"]);
    assert_eq!(maintenance.as_array().unwrap().len(), 1);
}

#[test]
fn withdraw_removes_decision() {
    let dir = init_store();
    let decision = json_output(&dir, &["issue", "-m", "temporary"]);
    let id = decision["id"].as_str().unwrap();

    railctl()
        .args(["withdraw", id])
        .current_dir(dir.path())
        .assert()
        .success()
        .stdout(predicates::str::contains("temporary"));

    railctl()
        .args(["show", id])
        .current_dir(dir.path())
        .assert()
        .failure();
}

#[test]
fn suggest_asks_for_missing_priority() {
    let dir = init_store();
    railctl()
        .args(["suggest", "express", "for", "Masagram"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("What's the train priority?"));
}

#[test]
fn suggest_offers_loop_strategies_at_destination() {
    let dir = init_store();
    let out = json_output(&dir, &["suggest", "critical", "express", "for", "Masagram"]);

    let keys: Vec<&str> = out["alternatives"]
        .as_array()
        .unwrap()
        .iter()
        .map(|a| a["key"].as_str().unwrap())
        .collect();
    assert!(keys.contains(&"cross-Masagram"));
    assert!(keys.contains(&"overtake-Masagram"));
    assert!(out["summary"].as_str().unwrap().starts_with("Live occupancy"));
    assert!(out["applied"].is_null());
}

#[test]
fn suggest_apply_issues_decision() {
    let dir = init_store();
    let out = json_output(
        &dir,
        &[
            "suggest",
            "--priority",
            "high",
            "--destination",
            "Chandanpur",
            "--apply",
            "cross-Chandanpur",
            "--consist-no",
            "777",
        ],
    );
    assert_eq!(out["applied"]["priority"], "High");
    assert_eq!(out["applied"]["message"], "Stable the train at Chandanpur (Loop 1).");

    let list = json_output(&dir, &["list"]);
    assert_eq!(list.as_array().unwrap().len(), 1);
}

#[test]
fn plan_without_key_fails() {
    let dir = init_store();
    railctl()
        .args(["plan", "critical", "for", "Masagram"])
        .current_dir(dir.path())
        .assert()
        .failure()
        .stderr(predicates::str::contains("GEMINI_API_KEY not configured"));
}
