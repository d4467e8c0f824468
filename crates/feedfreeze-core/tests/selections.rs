use feedfreeze_core::selections::Selections;
use feedfreeze_util::errors::FreezeError;

const SELECTIONS: &str = include_str!("fixtures/selections.xml");

#[test]
fn parse_fixture() {
    let sels = Selections::parse(SELECTIONS).unwrap();
    assert_eq!(sels.interface, "http://example.com/app.xml");
    assert_eq!(sels.command.as_deref(), Some("run"));
    assert_eq!(sels.iter().count(), 4);

    let libfoo = &sels.selections[1];
    assert_eq!(libfoo.version, "1.2.3");
    assert_eq!(libfoo.feed_url(), "http://example.com/libfoo.xml");
    assert_eq!(libfoo.id.as_deref(), Some("sha1new=ddd"));
}

#[test]
fn root_selection_matches_resolved_interface() {
    let sels = Selections::parse(SELECTIONS).unwrap();
    let root = sels.root_selection().unwrap();
    assert_eq!(root.id.as_deref(), Some("sha1new=bbb"));
    assert_eq!(root.version, "1.1");
}

#[test]
fn feed_url_defaults_to_interface() {
    let sels = Selections::parse(SELECTIONS).unwrap();
    let optional = &sels.selections[3];
    assert!(optional.from_feed.is_none());
    assert_eq!(optional.feed_url(), "http://example.com/optional.xml");
}

#[test]
fn distribution_packages_are_detected() {
    let sels = Selections::parse(SELECTIONS).unwrap();
    let python = &sels.selections[2];
    assert!(python.is_distribution());
    assert!(!python.is_local_feed());
    assert_eq!(python.package_name(), "python3");

    assert!(!sels.selections[1].is_distribution());
}

#[test]
fn distribution_detected_from_id_alone() {
    let sels = Selections::parse(
        r#"<selections interface="http://a">
  <selection interface="http://a" id="x" version="1"/>
  <selection interface="http://b" id="package:rpm:gcc:9" version="9"/>
</selections>"#,
    )
    .unwrap();
    let gcc = &sels.selections[1];
    assert!(gcc.is_distribution());
    assert_eq!(gcc.package_name(), "package:rpm:gcc:9");
}

#[test]
fn local_feed_detection() {
    let sels = Selections::parse(
        r#"<selections interface="/home/me/app.xml">
  <selection interface="/home/me/app.xml" id="/home/me" version="1"/>
  <selection interface="http://lib" from-feed="/home/me/lib.xml" id="/home/me/lib" version="2"/>
</selections>"#,
    )
    .unwrap();
    assert!(sels.selections[0].is_local_feed());
    assert!(sels.selections[1].is_local_feed());
    assert_eq!(sels.selections[1].feed_url(), "/home/me/lib.xml");
}

#[test]
fn missing_root_selection_is_lookup_error() {
    let sels = Selections::parse(
        r#"<selections interface="http://a">
  <selection interface="http://b" version="1"/>
</selections>"#,
    )
    .unwrap();
    let err = sels.root_selection().unwrap_err();
    assert!(matches!(err, FreezeError::Lookup { count: 0, .. }), "{err}");
}

#[test]
fn duplicate_root_selection_is_lookup_error() {
    let sels = Selections::parse(
        r#"<selections interface="http://a">
  <selection interface="http://a" version="1"/>
  <selection interface="http://a" version="2"/>
</selections>"#,
    )
    .unwrap();
    let err = sels.root_selection().unwrap_err();
    assert!(matches!(err, FreezeError::Lookup { count: 2, .. }), "{err}");
}

#[test]
fn wrong_root_element_rejected() {
    let err = Selections::parse("<interface/>").unwrap_err();
    assert!(matches!(err, FreezeError::Xml { .. }));
}

#[test]
fn missing_attributes_rejected() {
    assert!(Selections::parse("<selections/>").is_err());
    assert!(Selections::parse(
        r#"<selections interface="http://a"><selection interface="http://a"/></selections>"#
    )
    .is_err());
}

#[test]
fn non_selection_children_ignored() {
    let sels = Selections::parse(
        r#"<selections interface="http://a">
  <!-- resolver comment -->
  <selection interface="http://a" version="1"/>
  <extra/>
</selections>"#,
    )
    .unwrap();
    assert_eq!(sels.iter().count(), 1);
    assert!(sels.command.is_none());
}
