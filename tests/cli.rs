use assert_cmd::Command;
use std::fs;
use tempfile::tempdir;

const TOWN: &str = "\
// a small town
pop 40;
house 3, 1;
workplace 5, 2;
infected 4;
employed 0.5;
end 2;
";

fn epidemic() -> Command {
    Command::cargo_bin("epidemic").unwrap()
}

#[test]
fn runs_a_community_description() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.txt");
    fs::write(&path, TOWN).unwrap();

    epidemic().arg(&path).assert().success();
}

#[test]
fn missing_file_name() {
    let output = epidemic().assert().failure().get_output().clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Missing file name argument"));
}

#[test]
fn unreadable_file() {
    let output = epidemic()
        .arg("no/such/town.txt")
        .assert()
        .failure()
        .get_output()
        .clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("Can't open file: no/such/town.txt"));
}

#[test]
fn reports_every_problem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.txt");
    fs::write(&path, "pop 40\nhouse 3, 1;\nweekends;").unwrap();

    let output = epidemic().arg(&path).assert().failure().get_output().clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    for message in [
        "invalid community description",
        "pop 40: missed semicolon",
        "unknown command: weekends",
        "median workplace size not set",
        "end time not given",
    ] {
        assert!(stderr.contains(message), "missing {message:?} in {stderr}");
    }
}

#[test]
fn lists_people_and_places() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.txt");
    fs::write(&path, TOWN).unwrap();

    let output = epidemic()
        .arg(&path)
        .arg("--list")
        .assert()
        .success()
        .get_output()
        .clone();
    let stdout = String::from_utf8(output.stdout).unwrap();
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines[0], "People");
    let places = lines.iter().position(|line| *line == "Places").unwrap();
    assert_eq!(places, 41);
    assert!(lines[1..places].iter().all(|line| line.starts_with("Person ")));
    assert!(lines[places + 1..]
        .iter()
        .all(|line| line.starts_with("Home ") || line.starts_with("Workplace ")));
}

#[test]
fn same_seed_same_listing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.txt");
    fs::write(&path, TOWN).unwrap();

    let listing = |seed: &str| {
        epidemic()
            .arg(&path)
            .args(["--list", "--random-seed", seed])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone()
    };
    assert_eq!(listing("7"), listing("7"));
    assert_ne!(listing("7"), listing("8"));
}

#[test]
fn writes_reports() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.txt");
    fs::write(&path, TOWN).unwrap();
    let output_dir = dir.path().join("out");

    epidemic()
        .arg(&path)
        .arg("--output-dir")
        .arg(&output_dir)
        .assert()
        .success();

    let people = fs::read_to_string(output_dir.join("people.csv")).unwrap();
    // Header plus one row per person.
    assert_eq!(people.lines().count(), 41);
    assert!(output_dir.join("places.csv").exists());
    assert!(output_dir.join("workplace_events.csv").exists());
}

#[test]
fn logs_workplace_activity() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("town.txt");
    fs::write(&path, TOWN.replace("employed 0.5;", "employed 1;")).unwrap();

    let output = epidemic()
        .arg(&path)
        .args(["--log-level", "info"])
        .assert()
        .success()
        .get_output()
        .clone();
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("opened at time"));
    assert!(stderr.contains("closed at time"));
}
