//! Integration tests for the Glazier CLI
//!
//! These tests exercise the CLI commands end-to-end using assert_cmd.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const STORE: &str = "shower-tickets-v1.json";

/// Helper to get a glazier command isolated from the user's config
fn glazier() -> Command {
    let mut cmd = Command::cargo_bin("glazier").unwrap();
    cmd.env_remove("GLAZIER_TECH")
        .env_remove("GLAZIER_LOOKUP_URL")
        .env_remove("GLAZIER_TOLERANCE")
        .env_remove("RUST_LOG")
        .env("XDG_CONFIG_HOME", std::env::temp_dir().join("glazier-tests-no-config"));
    cmd
}

/// Helper to create a test project in a temp directory
fn setup_test_project() -> TempDir {
    let tmp = TempDir::new().unwrap();
    glazier().current_dir(tmp.path()).arg("init").assert().success();
    tmp
}

/// Helper to create a ticket and return its numeric id
fn create_ticket(tmp: &TempDir, number: &str, customer: &str, extra: &[&str]) -> String {
    let output = glazier()
        .current_dir(tmp.path())
        .args(["ticket", "new", "--number", number, "--customer", customer])
        .args(["--door", "30", "--panel", "20", "--overall", "50"])
        .args(extra)
        .args(["--format", "id"])
        .output()
        .unwrap();
    assert!(output.status.success(), "ticket new failed: {:?}", output);
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn read_store(tmp: &TempDir) -> serde_json::Value {
    let text = fs::read_to_string(tmp.path().join(STORE)).unwrap();
    serde_json::from_str(&text).unwrap()
}

// ============================================================================
// CLI Basic Tests
// ============================================================================

#[test]
fn test_help_displays() {
    glazier()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("shower-door installation tickets"))
        .stdout(predicate::str::contains("ticket"));
}

#[test]
fn test_version_displays() {
    glazier()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("glazier"));
}

#[test]
fn test_unknown_command_fails() {
    glazier().arg("frobnicate").assert().failure();
}

#[test]
fn test_completions_bash() {
    glazier()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("glazier"));
}

// ============================================================================
// Init Tests
// ============================================================================

#[test]
fn test_init_creates_project_structure() {
    let tmp = TempDir::new().unwrap();

    glazier()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized Glazier project"));

    assert!(tmp.path().join(".glazier/config.yaml").is_file());
    let store = fs::read_to_string(tmp.path().join(STORE)).unwrap();
    assert_eq!(store.trim(), "[]");
}

#[test]
fn test_init_twice_warns() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("already exists"));
}

#[test]
fn test_init_force_keeps_tickets() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-1", "Keep Me", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["init", "--force"])
        .assert()
        .success();

    assert_eq!(read_store(&tmp).as_array().unwrap().len(), 1);
}

#[test]
fn test_commands_outside_project_fail() {
    let tmp = TempDir::new().unwrap();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not a Glazier project"));
}

// ============================================================================
// Ticket Entry Tests
// ============================================================================

#[test]
fn test_ticket_new_stores_valid_ticket() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "new", "-n", "T-100", "-c", "Ann Lee"])
        .args(["--door", "30", "--panel", "20", "--overall", "50"])
        .args(["--color", "brushed nickel", "--side", "right"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Created ticket T-100 for Ann Lee"))
        .stdout(predicate::str::contains("Measurements check out. Total = 50.000 in."));

    let store = read_store(&tmp);
    let ticket = &store[0];
    assert_eq!(ticket["ticketNumber"], "T-100");
    assert_eq!(ticket["glassColor"], "brushed nickel");
    assert_eq!(ticket["doorSide"], "right");
    assert_eq!(ticket["valid"], true);
    assert!(ticket["id"].is_i64());
}

#[test]
fn test_ticket_new_with_outages() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "new", "-n", "T-2", "-c", "Bo"])
        .args(["--door", "30", "--panel", "20", "--overall", "49 3/4"])
        .args(["--outage", "left:in:1/4"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Total = 49.750 in."));

    let store = read_store(&tmp);
    assert_eq!(store[0]["outages"][0]["direction"], "in");
    assert_eq!(store[0]["outages"][0]["value"], "1/4");
}

#[test]
fn test_ticket_new_rejects_mismatch() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "new", "-n", "T-3", "-c", "Cy"])
        .args(["--door", "30", "--panel", "20", "--overall", "51"])
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Mismatch: Door + Panel = 50.000 in, not 51.000 in.",
        ));

    assert!(read_store(&tmp).as_array().unwrap().is_empty());
}

#[test]
fn test_ticket_new_rejects_malformed_width() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "new", "-n", "T-4", "-c", "Di"])
        .args(["--door", "thirty", "--panel", "20", "--overall", "50"])
        .assert()
        .failure();

    assert!(read_store(&tmp).as_array().unwrap().is_empty());
}

#[test]
fn test_ticket_new_requires_number() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "new", "-c", "Nobody"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Ticket number is required"));
}

#[test]
fn test_ticket_new_uses_configured_tech() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .env("GLAZIER_TECH", "Alex Ortiz")
        .args(["ticket", "new", "-n", "T-5", "-c", "Ed"])
        .args(["--door", "30", "--panel", "20", "--overall", "50"])
        .assert()
        .success();

    assert_eq!(read_store(&tmp)[0]["assignedTech"], "Alex Ortiz");
}

// ============================================================================
// Ticket List / Show Tests
// ============================================================================

#[test]
fn test_ticket_list_empty_project() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No tickets found"));
}

#[test]
fn test_ticket_list_newest_first() {
    let tmp = setup_test_project();
    let first = create_ticket(&tmp, "T-10", "First", &[]);
    let second = create_ticket(&tmp, "T-11", "Second", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--format", "id"])
        .assert()
        .success()
        .stdout(format!("{}\n{}\n", second, first));
}

#[test]
fn test_ticket_list_json_and_count() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-20", "Json", &[]);
    create_ticket(&tmp, "T-21", "Count", &[]);

    let output = glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--format", "json"])
        .output()
        .unwrap();
    let list: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(list.as_array().unwrap().len(), 2);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--count"])
        .assert()
        .success()
        .stdout("2\n");
}

#[test]
fn test_ticket_list_filters() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-30", "Black Door", &["--color", "black"]);
    create_ticket(&tmp, "T-31", "Chrome Door", &["--side", "right"]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--color", "black", "--count"])
        .assert()
        .stdout("1\n");

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--side", "right", "--count"])
        .assert()
        .stdout("1\n");

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--search", "chrome door", "--format", "csv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T-31"))
        .stdout(predicate::str::contains("T-30").not());
}

#[test]
fn test_ticket_show_card() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-40", "Ann Lee", &["--tech", "Sam"]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "show", "t-40"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T-40 - Ann Lee"))
        .stdout(predicate::str::contains("Door width:   30"))
        .stdout(predicate::str::contains("Assigned to:  Sam"))
        .stdout(predicate::str::contains("Status: Measurements check out."));
}

#[test]
fn test_ticket_show_yaml_by_id() {
    let tmp = setup_test_project();
    let id = create_ticket(&tmp, "T-41", "Yaml", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "show", &id, "--format", "yaml"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ticketNumber: T-41"));
}

#[test]
fn test_ticket_show_not_found() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "show", "NOPE"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no ticket matches"));
}

// ============================================================================
// Ticket Edit Tests
// ============================================================================

#[test]
fn test_ticket_set_keeps_invalid_edits() {
    let tmp = setup_test_project();
    let id = create_ticket(&tmp, "T-50", "Edit", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "set", "T-50", "--overall", "51"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Mismatch"));

    let store = read_store(&tmp);
    assert_eq!(store[0]["overallWidth"], "51");
    assert_eq!(store[0]["valid"], false);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list", "--invalid", "--format", "id"])
        .assert()
        .stdout(format!("{}\n", id));
}

#[test]
fn test_ticket_outage_add_and_clear() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-51", "Outage", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "outage", "add", "T-51", "right", "out", "1/8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Net Outage (0.125 in)"));

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "outage", "clear", "T-51"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Measurements check out"));

    assert!(read_store(&tmp)[0]["outages"].as_array().unwrap().is_empty());
}

#[test]
fn test_ticket_edge_measurement() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-52", "Edges", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "edge", "T-52", "sill", "49 7/8"])
        .assert()
        .success();

    assert_eq!(read_store(&tmp)[0]["edgeMeasurements"]["bottom"], "49 7/8");

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "show", "T-52"])
        .assert()
        .stdout(predicate::str::contains("bottom: 49 7/8 in"));

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "edge", "T-52", "head", "abc"])
        .assert()
        .failure();
}

#[test]
fn test_ticket_delete() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-53", "Gone", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "delete", "T-53"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Deleted ticket T-53"));

    assert!(read_store(&tmp).as_array().unwrap().is_empty());
}

// ============================================================================
// Diagram Tests
// ============================================================================

#[test]
fn test_ticket_draw_to_stdout() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-60", "Drawn", &["--color", "black"]);

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "draw", "T-60"])
        .assert()
        .success()
        .stdout(predicate::str::starts_with("<svg"))
        .stdout(predicate::str::contains("#111827"))
        .stdout(predicate::str::contains("data-edge=\"bottom\""));
}

#[test]
fn test_ticket_draw_to_file() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-61", "File", &[]);
    let out = tmp.path().join("t61.svg");

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "draw", "T-61", "-o"])
        .arg(&out)
        .assert()
        .success();

    let svg = fs::read_to_string(&out).unwrap();
    assert!(svg.trim_end().ends_with("</svg>"));
}

// ============================================================================
// Tech Lookup Tests
// ============================================================================

#[test]
fn test_tech_lists_assigned_tickets() {
    let tmp = setup_test_project();
    let alex = create_ticket(&tmp, "T-70", "One", &["--tech", "Alex Ortiz"]);
    create_ticket(&tmp, "T-71", "Two", &["--tech", "Jamie"]);
    create_ticket(&tmp, "T-72", "Three", &[]);

    glazier()
        .current_dir(tmp.path())
        .args(["tech", "ALEX", "--format", "id"])
        .assert()
        .success()
        .stdout(format!("{}\n", alex));
}

#[test]
fn test_tech_defaults_to_configured_name() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-73", "Mine", &["--tech", "Jamie"]);

    glazier()
        .current_dir(tmp.path())
        .env("GLAZIER_TECH", "jamie")
        .args(["tech"])
        .assert()
        .success()
        .stdout(predicate::str::contains("T-73"));

    glazier()
        .current_dir(tmp.path())
        .args(["tech"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("No tech name given"));
}

// ============================================================================
// Check / Measure Tests
// ============================================================================

#[test]
fn test_check_valid_measurements() {
    let tmp = TempDir::new().unwrap();

    glazier()
        .current_dir(tmp.path())
        .args(["check", "--door", "30", "--panel", "20", "--overall", "50"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Measurements check out. Total = 50.000 in."));
}

#[test]
fn test_check_mismatch_fails() {
    let tmp = TempDir::new().unwrap();

    glazier()
        .current_dir(tmp.path())
        .args(["check", "--door", "30", "--panel", "20", "--overall", "51"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Mismatch"));
}

#[test]
fn test_check_json_output() {
    let tmp = TempDir::new().unwrap();

    let output = glazier()
        .current_dir(tmp.path())
        .args(["check", "--door", "30", "--panel", "20 1/4", "--overall", "50"])
        .args(["--outage", "left:in:1/4", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let check: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(check["valid"], true);
    assert_eq!(check["net_outage"], -0.25);
}

#[test]
fn test_check_tolerance_flag() {
    let tmp = TempDir::new().unwrap();

    glazier()
        .current_dir(tmp.path())
        .args(["check", "--door", "30", "--panel", "20", "--overall", "50.1"])
        .args(["--tolerance", "0.25"])
        .assert()
        .success();
}

#[test]
fn test_check_rejects_bad_tolerance() {
    let tmp = TempDir::new().unwrap();

    for bad in ["--tolerance=-0.5", "--tolerance=NaN"] {
        glazier()
            .current_dir(tmp.path())
            .args(["check", "--door", "30", "--panel", "20", "--overall", "50", bad])
            .assert()
            .failure()
            .stderr(predicate::str::contains("non-negative"));
    }
}

#[test]
fn test_measure_values() {
    glazier()
        .args(["measure", "12 3/8", "3/8", "35.75"])
        .assert()
        .success()
        .stdout(predicate::str::contains("12.375 in"))
        .stdout(predicate::str::contains("0.375 in"))
        .stdout(predicate::str::contains("35 3/4"));
}

#[test]
fn test_measure_rejects_garbage() {
    glazier()
        .args(["measure", "5/0"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("zero denominator"));
}

// ============================================================================
// Customer Lookup Tests
// ============================================================================

#[test]
fn test_customer_search_falls_back() {
    let tmp = TempDir::new().unwrap();

    glazier()
        .current_dir(tmp.path())
        .args(["customer", "search", "jordan", "--url", "http://127.0.0.1:9/customers"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Jordan Miller"))
        .stderr(predicate::str::contains("showing sample customers"));
}

#[test]
fn test_customer_search_without_endpoint_json() {
    let tmp = TempDir::new().unwrap();

    let output = glazier()
        .current_dir(tmp.path())
        .args(["customer", "search", "anyone", "--format", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let customers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(customers.as_array().unwrap().len(), 3);
}

// ============================================================================
// Validate Tests
// ============================================================================

#[test]
fn test_validate_clean_store() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-80", "Clean", &[]);

    glazier()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("passed validation"));
}

#[test]
fn test_validate_reports_schema_errors() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(STORE),
        r#"[{"id": 1, "ticketNumber": "B-1", "customerName": "Bad", "glassColor": "gold"}]"#,
    )
    .unwrap();

    glazier()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("schema error"));
}

#[test]
fn test_validate_fix_refreshes_stale_results() {
    let tmp = setup_test_project();
    fs::write(
        tmp.path().join(STORE),
        r#"[{"id": 1, "ticketNumber": "S-1", "customerName": "Stale",
             "doorWidth": "30", "panelWidth": "20", "overallWidth": "51",
             "outages": [], "valid": true}]"#,
    )
    .unwrap();

    glazier()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .failure()
        .stdout(predicate::str::contains("stored result is out of date"));

    glazier()
        .current_dir(tmp.path())
        .args(["validate", "--fix"])
        .assert()
        .success();

    let store = read_store(&tmp);
    assert_eq!(store[0]["valid"], false);
    assert_eq!(
        store[0]["validMessage"],
        "Mismatch: Door + Panel = 50.000 in, not 51.000 in."
    );

    glazier()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success();
}

#[test]
fn test_validate_accepts_browser_exported_store() {
    let tmp = setup_test_project();
    let browser_store = r#"[{"ticketNumber":"1042","customerName":"Ada","showerType":"door + panel",
        "glassColor":"chrome","doorSide":"left","doorWidth":"30","panelWidth":"20",
        "overallWidth":"51","outages":[],"id":1700000000000,"valid":false,
        "validMessage":"Mismatch: Door + Panel  = 50.000 in, not 51.000 in."}]"#;
    fs::write(tmp.path().join(STORE), browser_store).unwrap();

    glazier()
        .current_dir(tmp.path())
        .arg("validate")
        .assert()
        .success()
        .stdout(predicate::str::contains("stored result is out of date").not())
        .stdout(predicate::str::contains("passed validation"));

    glazier()
        .current_dir(tmp.path())
        .args(["validate", "--fix"])
        .assert()
        .success();
    assert_eq!(fs::read_to_string(tmp.path().join(STORE)).unwrap(), browser_store);
}

// ============================================================================
// Config / Project Flag Tests
// ============================================================================

#[test]
fn test_fresh_project_config_is_silent() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["ticket", "list"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

#[test]
fn test_config_show_defaults() {
    let tmp = setup_test_project();

    glazier()
        .current_dir(tmp.path())
        .args(["config", "show", "tolerance"])
        .assert()
        .success()
        .stdout("0.02\n");
}

#[test]
fn test_project_flag() {
    let tmp = setup_test_project();
    create_ticket(&tmp, "T-90", "Remote", &[]);
    let elsewhere = TempDir::new().unwrap();

    glazier()
        .current_dir(elsewhere.path())
        .arg("--project")
        .arg(tmp.path())
        .args(["ticket", "list", "--count"])
        .assert()
        .success()
        .stdout("1\n");
}
