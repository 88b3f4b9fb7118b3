use assert_cmd::Command;
use predicates::prelude::*;

const VALID: &str = "<opml version=\"2.0\"><head><title>t</title></head>\
                     <body><outline text=\"a\" _color=\"#FF0000\" /></body></opml>";

#[test]
fn canonicalizes_stdin_to_stdout() {
    Command::cargo_bin("opml")
        .unwrap()
        .write_stdin(VALID)
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "<outline text=\"a\" _color=\"#FF0000\" />",
        ))
        .stdout(predicate::str::contains("<title>t</title>"));
}

#[test]
fn check_mode_prints_nothing() {
    Command::cargo_bin("opml")
        .unwrap()
        .arg("--check")
        .write_stdin(VALID)
        .assert()
        .success()
        .stdout(predicate::str::is_empty());
}

#[test]
fn rejects_malformed_input() {
    Command::cargo_bin("opml")
        .unwrap()
        .arg("--check")
        .write_stdin("<opml version=\"2.0\"><head>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("parsing failed"));
}

#[test]
fn rejects_non_opml_xml() {
    Command::cargo_bin("opml")
        .unwrap()
        .arg("--check")
        .write_stdin("<rss></rss>")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no OPML document"));
}

#[test]
fn writes_output_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("in.opml");
    let output = dir.path().join("out.opml");
    std::fs::write(&input, VALID).unwrap();

    Command::cargo_bin("opml")
        .unwrap()
        .arg(&input)
        .arg("-o")
        .arg(&output)
        .assert()
        .success();

    let written = std::fs::read_to_string(&output).unwrap();
    assert!(written.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
    assert!(written.ends_with("</opml>\n"));
}
