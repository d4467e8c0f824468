use std::path::Path;

use feedfreeze_core::feed::{strip_signature, Feed, SIGNATURE_MARKER};

fn fixture() -> &'static Path {
    Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/app.xml"))
}

#[test]
fn load_records_path_and_parses() {
    let feed = Feed::load(fixture()).unwrap();
    assert_eq!(feed.path(), Some(fixture()));
    assert_eq!(feed.root().name, "interface");
    assert_eq!(feed.root().descendants_named("implementation").len(), 3);
}

#[test]
fn load_drops_signature_comment() {
    let feed = Feed::load(fixture()).unwrap();
    assert!(feed.document().epilog.is_empty());
}

#[test]
fn load_missing_file_fails() {
    assert!(Feed::load(Path::new("/nonexistent/feed.xml")).is_err());
}

#[test]
fn strip_signature_cuts_trailer() {
    let signed = format!("<interface/>\n{SIGNATURE_MARKER}\nAAAA\n-->\n");
    assert_eq!(strip_signature(&signed), "<interface/>\n");
    assert_eq!(strip_signature("<interface/>"), "<interface/>");
}

#[test]
fn output_has_no_blank_lines_or_signature() {
    let feed = Feed::load(fixture()).unwrap();
    let out = feed.to_output_string().unwrap();

    assert!(out.starts_with("<?xml"));
    assert!(out.ends_with("</interface>\n"), "{out}");
    assert!(!out.contains("Base64 Signature"));
    assert!(out.lines().all(|l| !l.trim().is_empty()));
    assert!(out.contains("xml-stylesheet"));
}

#[test]
fn output_reparses() {
    let feed = Feed::load(fixture()).unwrap();
    let out = feed.to_output_string().unwrap();
    let again = Feed::parse(&out).unwrap();
    assert_eq!(again.root(), feed.root());
}
