use documroller_core::{
    DocumRoller, MarkupError, Portable, PortableError, RecordService, StoreConfig,
};
use tempfile::TempDir;

fn service(dir: &TempDir, name: &str) -> RecordService {
    RecordService::new(StoreConfig::new(dir.path().join(name)))
}

fn sorted_contents(service: &RecordService, module_id: i64) -> Vec<String> {
    let mut contents: Vec<_> = service
        .objects_in_scope::<DocumRoller>(module_id)
        .unwrap()
        .into_iter()
        .map(|item| item.content)
        .collect();
    contents.sort();
    contents
}

#[test]
fn export_then_import_reproduces_worked_example() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, "portal.sqlite3");

    service.add(&DocumRoller::new(7, "A & B")).unwrap();

    let exported = service.export_module(7).unwrap();
    assert_eq!(
        exported,
        "<DocumRollers><DocumRoller><content>A &amp; B</content></DocumRoller></DocumRollers>"
    );

    service.import_module(9, &exported, "1.0", 42).unwrap();

    let imported = service.objects_in_scope::<DocumRoller>(9).unwrap();
    assert_eq!(imported.len(), 1);
    assert_eq!(imported[0].content, "A & B");
    assert_eq!(imported[0].module_id, 9);
    assert_eq!(imported[0].created_by_user, None);
}

#[test]
fn export_of_empty_module_is_empty_wrapper() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, "portal.sqlite3");

    service.add(&DocumRoller::new(1, "other module")).unwrap();

    assert_eq!(
        service.export_module(2).unwrap(),
        "<DocumRollers></DocumRollers>"
    );
}

#[test]
fn content_multiset_survives_export_import_across_stores() {
    let dir = tempfile::tempdir().unwrap();
    let source = service(&dir, "source.sqlite3");
    let target = service(&dir, "target.sqlite3");

    let contents = [
        "plain",
        "<p>markup & entities</p>",
        "quotes \" and ' apostrophes",
        "plain",
        "  padded  ",
        "",
        "unicode: héllo ✓",
    ];
    for content in contents {
        source.add(&DocumRoller::new(3, content)).unwrap();
    }

    let document = source.export_module(3).unwrap();
    target.import_module(11, &document, "01.00.00", 1).unwrap();

    assert_eq!(sorted_contents(&target, 11), sorted_contents(&source, 3));
}

#[test]
fn reimport_duplicates_records() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, "portal.sqlite3");
    let document = "<DocumRollers><DocumRoller><content>once</content></DocumRoller></DocumRollers>";

    service.import_module(4, document, "1.0", 1).unwrap();
    service.import_module(4, document, "1.0", 1).unwrap();

    assert_eq!(sorted_contents(&service, 4), vec!["once", "once"]);
}

#[test]
fn ill_formed_import_inserts_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, "portal.sqlite3");

    let missing_root = service
        .import_module(4, "<Something/>", "1.0", 1)
        .unwrap_err();
    assert!(matches!(
        missing_root,
        PortableError::Markup(MarkupError::MissingRoot)
    ));

    let broken = service
        .import_module(
            4,
            "<DocumRollers><DocumRoller><content>a</content></DocumRoller><DocumRoller>",
            "1.0",
            1,
        )
        .unwrap_err();
    assert!(matches!(broken, PortableError::Markup(MarkupError::Malformed(_))));

    assert!(service.objects_in_scope::<DocumRoller>(4).unwrap().is_empty());
}

#[test]
fn missing_content_stops_import_after_earlier_items() {
    let dir = tempfile::tempdir().unwrap();
    let service = service(&dir, "portal.sqlite3");

    let missing_content = service
        .import_module(
            5,
            "<DocumRollers><DocumRoller><content>a</content></DocumRoller><DocumRoller/><DocumRoller><content>c</content></DocumRoller></DocumRollers>",
            "1.0",
            1,
        )
        .unwrap_err();
    assert!(matches!(
        missing_content,
        PortableError::Markup(MarkupError::MissingContent { item: 1 })
    ));

    assert_eq!(sorted_contents(&service, 5), vec!["a"]);
}

#[test]
fn store_failure_surfaces_as_repo_error() {
    let dir = tempfile::tempdir().unwrap();
    let service = RecordService::new(StoreConfig::new(dir.path()));

    let err = service.export_module(1).unwrap_err();
    assert!(matches!(err, PortableError::Repo(_)));
}
