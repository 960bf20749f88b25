use std::path::Path;

use assert_cmd::Command;
use predicates::str::contains;

/// A `klaar` invocation with settings isolated under the test directory.
fn klaar(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("klaar").unwrap();
    cmd.env("KLAAR_CONFIG_DIR", dir.join("config"));
    cmd.env("NO_COLOR", "1");
    cmd
}

/// Run `init` non-interactively so later commands have a data dir.
fn setup(dir: &Path) {
    klaar(dir)
        .arg("init")
        .arg("--data-dir")
        .arg(dir.join("data"))
        .assert()
        .success();
}

fn write_statement(dir: &Path) -> String {
    let path = dir.join("statement.pdf");
    std::fs::write(&path, b"not really a pdf").unwrap();
    path.to_string_lossy().to_string()
}

/// Three sign-offs on top of `demo` push completion from 50% to 80%.
fn save_three(dir: &Path) {
    klaar(dir)
        .args(["save", "bank", "--interest", "245", "--fees", "18"])
        .assert()
        .success();
    klaar(dir)
        .args([
            "save",
            "investments",
            "--begin-value",
            "55.000",
            "--end-value",
            "61.200",
            "--deposits",
            "4.000",
            "--dividends",
            "820",
            "--costs",
            "120",
        ])
        .assert()
        .success();
    klaar(dir)
        .args([
            "save",
            "real-estate",
            "--rent",
            "9.500",
            "--imputed-income",
            "14.238",
            "--maintenance",
            "2.100",
        ])
        .assert()
        .success();
}

#[test]
fn test_init_seeds_the_state_file() {
    let tmp = tempfile::tempdir().unwrap();
    klaar(tmp.path())
        .arg("init")
        .arg("--data-dir")
        .arg(tmp.path().join("data"))
        .assert()
        .success()
        .stdout(contains("Initialized klaar at"))
        .stdout(contains("Checklist year:"));
    assert!(tmp.path().join("data").join("klaar.json").exists());
}

#[test]
fn test_status_starts_with_everything_todo() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Completion: 0%"))
        .stdout(contains("To do"))
        .stdout(contains("Export unlocks at 80%"));
}

#[test]
fn test_attach_then_save_marks_the_category_done() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    let statement = write_statement(tmp.path());

    klaar(tmp.path())
        .args(["attach", "bank", &statement])
        .assert()
        .success()
        .stdout(contains("Attached 1 document"))
        .stdout(contains("status: Review"));

    klaar(tmp.path())
        .args(["save", "bank", "--interest", "245", "--fees", "18"])
        .assert()
        .success()
        .stdout(contains("\u{20ac} 227"))
        .stdout(contains("Marked done."));

    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Done"))
        .stdout(contains("Completion: 20%"));
}

#[test]
fn test_save_without_documents_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());

    klaar(tmp.path())
        .args(["save", "bank", "--interest", "245"])
        .assert()
        .failure()
        .stderr(contains("Attach a document"));

    // the rejected save left no trace
    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Completion: 0%"));
}

#[test]
fn test_attach_missing_file_fails() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    klaar(tmp.path())
        .args(["attach", "bank", "/definitely/not/here.pdf"])
        .assert()
        .failure();
}

#[test]
fn test_demo_fills_everything_halfway() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());

    klaar(tmp.path())
        .arg("demo")
        .assert()
        .success()
        .stdout(contains("Example data loaded"))
        .stdout(contains("Try these next"));

    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Completion: 50%"));

    // halfway is below the export gate
    klaar(tmp.path())
        .arg("export")
        .assert()
        .failure()
        .stderr(contains("Export not ready"));
}

#[test]
fn test_export_unlocks_at_eighty_percent() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    klaar(tmp.path()).arg("demo").assert().success();
    save_three(tmp.path());

    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Completion: 80%"))
        .stdout(contains("Export ready"));

    klaar(tmp.path())
        .arg("export")
        .assert()
        .success()
        .stdout(contains("Year:"))
        .stdout(contains("Box 3 result:"));
}

#[test]
fn test_export_writes_an_output_file() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    klaar(tmp.path()).arg("demo").assert().success();
    save_three(tmp.path());

    let out = tmp.path().join("summary.txt");
    klaar(tmp.path())
        .args(["export", "--output"])
        .arg(&out)
        .assert()
        .success()
        .stdout(contains("Summary written to"));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.starts_with("Year: "));
    assert!(text.contains("Box 3 result:"));
}

#[test]
fn test_later_parks_a_category() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    klaar(tmp.path()).arg("demo").assert().success();

    klaar(tmp.path())
        .args(["later", "bank"])
        .assert()
        .success()
        .stdout(contains("parked for later"))
        .stdout(contains("1 document kept"));

    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Completion: 40%"));
}

#[test]
fn test_detach_rejects_a_bad_index() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    let statement = write_statement(tmp.path());
    klaar(tmp.path())
        .args(["attach", "bank", &statement])
        .assert()
        .success();

    klaar(tmp.path())
        .args(["detach", "bank", "3"])
        .assert()
        .failure()
        .stderr(contains("No document #3"));
}

#[test]
fn test_files_lists_attachments() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());

    klaar(tmp.path())
        .arg("files")
        .assert()
        .success()
        .stdout(contains("No documents attached yet"));

    let statement = write_statement(tmp.path());
    klaar(tmp.path())
        .args(["attach", "bank", &statement])
        .assert()
        .success();

    klaar(tmp.path())
        .arg("files")
        .assert()
        .success()
        .stdout(contains("statement.pdf"));

    klaar(tmp.path())
        .args(["files", "bank"])
        .assert()
        .success()
        .stdout(contains("statement.pdf"));
}

#[test]
fn test_year_round_trips() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());

    klaar(tmp.path())
        .args(["year", "2027"])
        .assert()
        .success()
        .stdout(contains("Filing year set to 2027."));

    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Year:       2027"));

    klaar(tmp.path())
        .args(["year", "27"])
        .assert()
        .failure()
        .stderr(contains("not a year"));
}

#[test]
fn test_reset_with_force_starts_over() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());
    klaar(tmp.path()).arg("demo").assert().success();

    klaar(tmp.path())
        .args(["reset", "--force"])
        .assert()
        .success()
        .stdout(contains("Checklist reset"));

    klaar(tmp.path())
        .arg("status")
        .assert()
        .success()
        .stdout(contains("Completion: 0%"));
}

#[test]
fn test_lookup_fills_the_real_estate_figures() {
    let tmp = tempfile::tempdir().unwrap();
    setup(tmp.path());

    klaar(tmp.path())
        .args(["lookup", "--address", "Teststraat 12, Utrecht"])
        .assert()
        .success()
        .stdout(contains("Assessed value for Teststraat 12, Utrecht: \u{20ac} 425.000"))
        .stdout(contains("Imputed income: \u{20ac} 14.238"))
        .stdout(contains("status: Review"));
}
