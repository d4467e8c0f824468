use std::path::Path;

use feedfreeze_core::feed::Feed;
use feedfreeze_core::prune::{
    clean_feed, isolate_implementation, resolve_implementation_id, CANONICAL_COMMAND,
};
use feedfreeze_core::xml::Element;
use feedfreeze_util::errors::FreezeError;

fn app_feed() -> Feed {
    Feed::load(Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/app.xml"
    )))
    .unwrap()
}

fn impl_ids(feed: &Feed) -> Vec<String> {
    feed.root()
        .descendants_named("implementation")
        .iter()
        .map(|i| i.attr("id").unwrap().to_string())
        .collect()
}

fn top_level(feed: &Feed) -> Vec<String> {
    feed.root().child_elements().map(|e| e.name.clone()).collect()
}

#[test]
fn isolate_keeps_only_selected_implementation() {
    let mut feed = app_feed();
    let active = isolate_implementation(&mut feed, "sha1new=bbb").unwrap();
    assert_eq!(active.attr("version"), Some("1.1"));
    assert_eq!(impl_ids(&feed), vec!["sha1new=bbb"]);
}

#[test]
fn isolate_prunes_groups_recursively() {
    let mut feed = app_feed();
    isolate_implementation(&mut feed, "sha1new=bbb").unwrap();

    // The second top-level group only held a group holding ccc.
    let groups = feed.root().descendants_named("group");
    assert_eq!(groups.len(), 2);
    assert_eq!(
        groups[0].attr("license"),
        Some("OSI Approved :: MIT License")
    );
    assert_eq!(groups[1].attr("arch"), Some("*-src"));
}

#[test]
fn isolate_removes_nested_group_left_empty() {
    let mut feed = app_feed();
    isolate_implementation(&mut feed, "sha1new=aaa").unwrap();
    let groups = feed.root().descendants_named("group");
    assert_eq!(groups.len(), 1);
    assert_eq!(impl_ids(&feed), vec!["sha1new=aaa"]);
}

#[test]
fn isolate_keeps_group_siblings_of_implementations() {
    let mut feed = app_feed();
    isolate_implementation(&mut feed, "sha1new=aaa").unwrap();
    let group = feed.root().descendants_named("group")[0];
    let names: Vec<&str> = group.child_elements().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["command", "command", "requires", "implementation"]);
}

#[test]
fn isolate_unknown_id_is_lookup_error() {
    let mut feed = app_feed();
    let err = isolate_implementation(&mut feed, "sha1new=zzz").unwrap_err();
    match err {
        FreezeError::Lookup { count, what } => {
            assert_eq!(count, 0);
            assert!(what.contains("sha1new=zzz"));
        }
        other => panic!("unexpected error: {other}"),
    }
    // nothing was removed
    assert_eq!(impl_ids(&feed).len(), 3);
}

#[test]
fn isolate_duplicate_id_is_lookup_error() {
    let mut feed = Feed::parse(
        r#"<interface>
  <group><implementation id="x" version="1"/></group>
  <group><implementation id="x" version="2"/></group>
</interface>"#,
    )
    .unwrap();
    let err = isolate_implementation(&mut feed, "x").unwrap_err();
    assert!(matches!(err, FreezeError::Lookup { count: 2, .. }), "{err}");
}

#[test]
fn isolate_returns_attachable_implementation() {
    let mut feed = app_feed();
    let active = isolate_implementation(&mut feed, "sha1new=ccc").unwrap();
    active.append_child(Element::new("requires").with_attr("interface", "http://x"));
    let ccc = feed.root().descendants_named("implementation")[0];
    assert!(ccc.child_elements().any(|e| e.name == "requires"));
}

#[test]
fn clean_keeps_allowed_top_level_elements() {
    let mut feed = app_feed();
    isolate_implementation(&mut feed, "sha1new=bbb").unwrap();
    clean_feed(&mut feed, "run");
    assert_eq!(top_level(&feed), vec!["name", "summary", "group"]);
}

#[test]
fn clean_keeps_top_level_requires_and_commands() {
    let mut feed = Feed::parse(
        r#"<interface>
  <name>x</name>
  <homepage>http://x</homepage>
  <requires interface="http://dep"/>
  <command name="run" path="x"/>
  <feed src="http://other"/>
  <implementation id="a" version="1"/>
</interface>"#,
    )
    .unwrap();
    clean_feed(&mut feed, "run");
    assert_eq!(
        top_level(&feed),
        vec!["name", "requires", "command", "implementation"]
    );
}

#[test]
fn clean_selects_and_renames_command() {
    let mut feed = app_feed();
    isolate_implementation(&mut feed, "sha1new=bbb").unwrap();
    clean_feed(&mut feed, "test");

    let commands = feed.root().descendants_named("command");
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].attr("name"), Some(CANONICAL_COMMAND));
    assert_eq!(commands[0].attr("path"), Some("test.sh"));
}

#[test]
fn clean_removes_other_commands_everywhere() {
    let mut feed = app_feed();
    clean_feed(&mut feed, "run");
    let commands = feed.root().descendants_named("command");
    assert_eq!(commands.len(), 1);
    assert_eq!(commands[0].attr("path"), Some("app.sh"));
}

#[test]
fn clean_with_unknown_command_removes_all() {
    let mut feed = app_feed();
    clean_feed(&mut feed, "nope");
    assert!(feed.root().descendants_named("command").is_empty());
}

#[test]
fn implementation_id_made_relative_for_local_feed() {
    let id = resolve_implementation_id(
        "/home/me/app",
        "/home/me/app/app.xml",
        Path::new("/home/me/app/app.xml"),
    );
    assert_eq!(id, ".");

    let id = resolve_implementation_id(
        "/home/me/app/build",
        "/home/me/app/app.xml",
        Path::new("/home/me/app/app.xml"),
    );
    assert_eq!(id, "build");
}

#[test]
fn implementation_id_untouched_for_cached_feed() {
    let id = resolve_implementation_id(
        "sha1new=abc",
        "http://example.com/app.xml",
        Path::new("/home/me/.cache/0install.net/interfaces/http%3a%2f%2fexample.com%2fapp.xml"),
    );
    assert_eq!(id, "sha1new=abc");

    let id = resolve_implementation_id(
        "/opt/app",
        "http://example.com/app.xml",
        Path::new("/cache/app.xml"),
    );
    assert_eq!(id, "/opt/app");
}
