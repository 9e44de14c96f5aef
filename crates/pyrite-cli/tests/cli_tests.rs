use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;

fn pyrite() -> Command {
    Command::cargo_bin("pyrite").expect("binary builds")
}

#[test]
fn graph_emits_a_digraph() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("simple.py");
    fs::write(&input, "a = 1\nb = 2\n").unwrap();

    pyrite()
        .arg("graph")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::starts_with("digraph cfg {"))
        .stdout(predicate::str::contains("<start>"));
}

#[test]
fn graph_writes_to_the_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("simple.py");
    let output = dir.path().join("simple.dot");
    fs::write(&input, "a = 1\n").unwrap();

    pyrite()
        .arg("graph")
        .arg(&input)
        .arg("--output")
        .arg(&output)
        .assert()
        .success();

    let dot = fs::read_to_string(&output).unwrap();
    assert!(dot.contains("a = 1"));
}

#[test]
fn export_prints_line_flow_json() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("func.py");
    fs::write(&input, "def foo():\n    return 1\n\nfoo()\n").unwrap();

    pyrite()
        .arg("export")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"function\": \"foo\""))
        .stdout(predicate::str::contains("\"calls\""));
}

#[test]
fn export_scans_directories_for_python_files() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();
    fs::write(dir.path().join("notes.txt"), "not python\n").unwrap();

    pyrite()
        .arg("export")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("a.py"))
        .stdout(predicate::str::contains("notes.txt").not());
}

#[test]
fn dominators_lists_the_sentinels() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("simple.py");
    fs::write(&input, "a = 1\nb = 2\n").unwrap();

    pyrite()
        .arg("dominators")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("<start>"))
        .stdout(predicate::str::contains("<stop>"));
}

#[test]
fn break_outside_loop_fails_with_a_message() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("bad.py");
    fs::write(&input, "break\n").unwrap();

    pyrite()
        .arg("graph")
        .arg(&input)
        .assert()
        .failure()
        .stderr(predicate::str::contains("outside loop"));
}

#[test]
fn graph_refuses_a_directory_target() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.py"), "x = 1\n").unwrap();

    pyrite()
        .arg("graph")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a directory"));

    pyrite()
        .arg("dominators")
        .arg(dir.path())
        .assert()
        .failure()
        .stderr(predicate::str::contains("is a directory"));
}

#[test]
fn missing_input_fails() {
    pyrite()
        .arg("graph")
        .arg("no/such/file.py")
        .assert()
        .failure();
}

#[test]
fn requirements_reports_declared_ranges() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("requirements.txt");
    fs::write(&input, "# pinned\nflask==1.1.2\nrequests>=2.20,<3.0\n").unwrap();

    pyrite()
        .arg("requirements")
        .arg(&input)
        .assert()
        .success()
        .stdout(predicate::str::contains("flask"))
        .stdout(predicate::str::contains("[2.20, 3.0)"));
}
