use pretty_assertions::assert_eq;
use rmap_diagnostic::ErrorCode;
use rmap_ir::{ElementKind, MapChild};

use super::*;

fn dio() -> Decl {
    Decl::named(DeclKind::Component, "DIO")
        .attr("width", "32")
        .child(Decl::named(DeclKind::Register, "CTRL"))
        .child(Decl::named(DeclKind::Register, "DATA"))
}

fn sys() -> Decl {
    Decl::named(DeclKind::MemoryMap, "SYS")
        .child(Decl::named(DeclKind::Instance, "dio0").attr("extern", "DIO"))
        .child(Decl::named(DeclKind::Instance, "dio1").attr("extern", "DIO"))
}

#[test]
fn test_maps_bind_components_declared_later() {
    let corpus = Corpus::build(&[sys(), dio()], &BuildConfig::default()).unwrap();
    assert_eq!(corpus.components().len(), 1);
    assert_eq!(corpus.memory_maps().len(), 1);
    assert_eq!(corpus.binder().len(), 1);

    let kinds: Vec<ElementKind> = corpus.roots().map(ElementRef::kind).collect();
    assert_eq!(kinds, [ElementKind::Component, ElementKind::MemoryMap]);
    assert_eq!(corpus.component("DIO").map(|c| c.size), Some(2));
    assert!(corpus.memory_map("SYS").is_some());
    assert!(corpus.memory_map("DIO").is_none());
}

#[test]
fn test_instances_share_the_component() {
    let corpus = Corpus::build(&[dio(), sys()], &BuildConfig::default()).unwrap();
    let dio = &corpus.components()[0];
    let map = corpus.memory_map("SYS").unwrap();
    for placement in map.space.items() {
        let MapChild::Instance(instance) = &placement.item else {
            panic!("expected an instance");
        };
        assert!(Arc::ptr_eq(&instance.binding, dio));
    }
    assert_eq!(Arc::strong_count(dio), 4);
}

#[test]
fn test_corpus_errors() {
    let config = BuildConfig::default();

    let err = Corpus::build(&[dio(), dio()], &config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);

    let err = Corpus::build(&[sys(), sys(), dio()], &config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);

    let err = Corpus::build(&[Decl::named(DeclKind::Register, "R")], &config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2006);
    assert_eq!(err.path().to_string(), "R");

    let err = Corpus::build(&[sys()], &config).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3001);
}

#[test]
fn test_components_and_maps_share_a_namespace() {
    let clash = Decl::named(DeclKind::MemoryMap, "DIO")
        .child(Decl::named(DeclKind::Instance, "dio0").attr("extern", "DIO"));
    let err = Corpus::build(&[dio(), clash], &BuildConfig::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2003);
    assert_eq!(err.path().to_string(), "DIO");
}

#[test]
fn test_root_error_names_the_failing_root() {
    let config = BuildConfig::default();

    let err = Corpus::build_roots(&[dio(), sys(), dio()], &config).unwrap_err();
    assert_eq!(err.index, 2);
    assert_eq!(err.error.code(), ErrorCode::E2003);

    let broken = Decl::named(DeclKind::MemoryMap, "BOARD")
        .child(Decl::named(DeclKind::Instance, "x").attr("extern", "NOPE"));
    let err = Corpus::build_roots(&[sys(), broken, dio()], &config).unwrap_err();
    assert_eq!(err.index, 1);
    assert_eq!(err.error.path().to_string(), "BOARD.x");
}

#[test]
fn test_empty_corpus() {
    let corpus = Corpus::build(&[], &BuildConfig::default()).unwrap();
    assert!(corpus.is_empty());
    assert_eq!(corpus.roots().count(), 0);
}

#[test]
fn test_corpus_is_shareable() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<Corpus>();
}
