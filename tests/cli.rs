use gritcss_css::import::{flatten, FileFetcher, ImportConfig};
use std::fs;
use std::process::Command;
use url::Url;

fn gritcss(args: &[&str]) -> (bool, String, String) {
    let output = Command::new(env!("CARGO_BIN_EXE_gritcss")).args(args).output().unwrap();

    (
        output.status.success(),
        String::from_utf8_lossy(&output.stdout).into_owned(),
        String::from_utf8_lossy(&output.stderr).into_owned(),
    )
}

#[test]
fn prints_canonical_form() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("main.css");
    fs::write(&file, "@media print { a { color: red } }").unwrap();

    let (ok, stdout, _) = gritcss(&[file.to_str().unwrap()]);

    assert!(ok);
    let location = Url::from_file_path(&file).unwrap();
    assert_eq!(stdout, format!("/* {location} */\n@media print{{a{{color:red;}}}}\n"));
}

#[test]
fn recursive_prints_imports_first() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.css"), "@import 'a.css';\nmain{}").unwrap();
    fs::write(dir.path().join("a.css"), "a{}").unwrap();

    let main = dir.path().join("main.css");
    let (ok, stdout, _) = gritcss(&["-r", main.to_str().unwrap()]);

    assert!(ok);
    let lines: Vec<_> = stdout.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].ends_with("/a.css */"));
    assert_eq!(lines[1], "a{}");
    assert!(lines[2].ends_with("/main.css */"));
    assert_eq!(lines[3], "main{}");
}

#[test]
fn recursive_reports_diagnostics_of_imported_sheets() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("main.css"), "@import 'a.css';\nmain{}").unwrap();
    fs::write(dir.path().join("a.css"), "a{} $").unwrap();

    let main = dir.path().join("main.css");
    let (ok, stdout, stderr) = gritcss(&["-r", main.to_str().unwrap()]);

    assert!(ok);
    assert!(stdout.contains("a{}\n"));
    let reported: Vec<_> = stderr.lines().filter(|l| l.contains("'$'")).collect();
    assert_eq!(reported.len(), 1);
    assert!(reported[0].contains("/a.css: "));
}

#[test]
fn failures_give_a_non_zero_exit() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("good.css");
    let bad = dir.path().join("bad.css");
    fs::write(&good, "a{}").unwrap();
    fs::write(&bad, "a{b:c").unwrap();
    let missing = dir.path().join("missing.css");

    let (ok, stdout, stderr) = gritcss(&[
        missing.to_str().unwrap(),
        bad.to_str().unwrap(),
        good.to_str().unwrap(),
    ]);

    assert!(!ok);
    assert!(stdout.ends_with("a{}\n"));
    assert!(stderr.contains("missing.css"));
    assert!(stderr.contains("bad.css"));

    let (ok, _, _) = gritcss(&["--ignore-errors", bad.to_str().unwrap()]);
    assert!(ok);
}

#[test]
fn tokens() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("t.css");
    fs::write(&file, "a{}").unwrap();

    let (ok, stdout, _) = gritcss(&["--tokens", file.to_str().unwrap()]);

    assert!(ok);
    assert_eq!(stdout.lines().count(), 3);
    assert!(stdout.starts_with("1:1: Ident 'a'"));
}

#[test]
fn files_are_decoded_with_their_charset() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("latin.css");
    fs::write(&file, b"@charset \"iso-8859-1\";a{content:\"caf\xE9\"}").unwrap();

    let sheets = flatten(&Url::from_file_path(&file).unwrap(), &FileFetcher, &ImportConfig::default()).unwrap();

    assert_eq!(sheets.len(), 1);
    assert_eq!(
        sheets[0].stylesheet.to_string(),
        "@charset \"iso-8859-1\";\na{content:\"caf\u{e9}\";}\n"
    );
}
