//! Sweep the fixture directories: everything under `valid/` must parse,
//! everything under `invalid/` must not

use std::fs;
use opml::parse_bytes;

#[test]
fn test_valid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let entry = entry?;
        let path = entry.path();
        let content = fs::read(&path)?;
        let result = parse_bytes(&content);
        if let Err(err) = result {
            return Err(std::io::Error::other(format!(
                "failed to parse valid file {path:?}: {err}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_invalid_fixtures() -> Result<(), Box<dyn std::error::Error>> {
    let invalid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/invalid");
    for entry in fs::read_dir(invalid_dir)? {
        let entry = entry?;
        let path = entry.path();
        let content = fs::read(&path)?;
        let result = parse_bytes(&content);
        if result.is_ok() {
            return Err(std::io::Error::other(format!(
                "should fail to parse invalid file: {path:?}"
            ))
            .into());
        }
    }
    Ok(())
}

#[test]
fn test_valid_fixtures_roundtrip() -> Result<(), Box<dyn std::error::Error>> {
    let valid_dir = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/valid");
    for entry in fs::read_dir(valid_dir)? {
        let entry = entry?;
        let path = entry.path();
        let content = fs::read(&path)?;
        let doc = parse_bytes(&content)
            .map_err(|err| std::io::Error::other(format!("{path:?}: {err}")))?;
        let rendered = opml::generate(&doc);
        let reparsed = parse_bytes(rendered.as_bytes())
            .map_err(|err| std::io::Error::other(format!("{path:?} reparse: {err}")))?;
        if reparsed != doc {
            return Err(std::io::Error::other(format!(
                "canonical output of {path:?} did not round-trip"
            ))
            .into());
        }
    }
    Ok(())
}
