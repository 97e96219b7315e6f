use assert_cmd::Command;
use std::fs;
use tempfile::tempdir;

fn schema2struct() -> Command {
    Command::cargo_bin("schema2struct").unwrap()
}

fn stdout_of(args: &[&str]) -> String {
    let output = schema2struct().args(args).assert().success().get_output().stdout.clone();
    String::from_utf8(output).unwrap()
}

#[test]
fn renders_nested_struct() {
    let out = stdout_of(&["-f", "tests/fixtures/user.json"]);
    let expected = "\
type User struct {
\tUserID int
\tProfile struct {
\t\tAvatarURL string
\t}
}
";
    assert_eq!(out, expected);
}

#[test]
fn hyper_schema_merges_definitions_and_refs() {
    let out = stdout_of(&["-f", "tests/fixtures/hyper.json"]);
    let expected = "\
type App struct {
\tCreatedAt string
\tID string
\tInstanceCount int
\tMaintenance bool
\tName string
\tOwner struct {
\t\tEmail string
\t\tID string
\t}
}
";
    assert_eq!(out, expected);
}

#[test]
fn json_format_and_out_file() {
    let dir = tempdir().unwrap();
    let out_path = dir.path().join("nested/user.json");

    schema2struct()
        .args(["-f", "tests/fixtures/user.json", "--format", "json", "-o"])
        .arg(&out_path)
        .assert()
        .success()
        .stdout("");

    let written = fs::read_to_string(&out_path).unwrap();
    let json: serde_json::Value = serde_json::from_str(&written).unwrap();
    assert_eq!(json[0]["name"], "User");
    assert_eq!(json[0]["fields"]["UserID"], "integer");
    assert_eq!(json[0]["children"][0]["name"], "Profile");
}

#[test]
fn failing_property_is_reported_and_others_still_print() {
    let assert = schema2struct()
        .args(["-f", "tests/fixtures/broken.json"])
        .assert()
        .failure();
    let output = assert.get_output();
    let stdout = String::from_utf8_lossy(&output.stdout);
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stdout.contains("type Good struct {"), "{stdout}");
    assert!(stdout.contains("APIKey string"), "{stdout}");
    assert!(!stdout.contains("Bad"), "{stdout}");
    assert!(stderr.contains("property `bad`"), "{stderr}");
    assert!(stderr.contains("#/definitions/owner"), "{stderr}");
}

#[test]
fn glob_input_covers_every_file() {
    let dir = tempdir().unwrap();
    for stem in ["user", "hyper"] {
        let schema = fs::read_to_string(format!("tests/fixtures/{stem}.json")).unwrap();
        fs::write(dir.path().join(format!("{stem}.json")), schema).unwrap();
    }
    let pattern = format!("{}/*.json", dir.path().display());
    let out = stdout_of(&["-f", pattern.as_str()]);
    let app = out.find("type App struct").unwrap();
    let user = out.find("type User struct").unwrap();
    assert!(app < user, "files are processed in sorted order");
}

#[test]
fn depth_ceiling_is_enforced_from_the_command_line() {
    schema2struct()
        .args(["-f", "tests/fixtures/user.json", "--max-depth", "1"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("recursion depth exceeds 1"));
}

#[test]
fn usage_errors() {
    schema2struct().assert().failure();
    schema2struct().args(["-f", ""]).assert().failure();
}

#[test]
fn unreadable_file_fails() {
    schema2struct()
        .args(["-f", "tests/fixtures/does-not-exist.json"])
        .assert()
        .failure()
        .stderr(predicates::str::contains("failed to read schema file"));
}
