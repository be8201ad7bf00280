//! End-to-end construction scenarios.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use pretty_assertions::assert_eq;
use rmap_build::{BuildConfig, Corpus};
use rmap_diagnostic::{Diagnostic, ErrorCode};
use rmap_ir::{ComponentChild, Decl, DeclKind, MapChild, RegisterChild};

fn component(name: &str, width: u32) -> Decl {
    Decl::named(DeclKind::Component, name).attr("width", width.to_string())
}

fn register(name: &str) -> Decl {
    Decl::named(DeclKind::Register, name)
}

fn field(name: &str) -> Decl {
    Decl::named(DeclKind::Field, name)
}

fn build(decls: &[Decl]) -> Corpus {
    Corpus::build(decls, &BuildConfig::default()).expect("corpus builds")
}

#[test]
fn auto_register_after_explicit_one() {
    let corpus = build(&[component("C", 16)
        .child(register("A").attr("offset", "0"))
        .child(register("B"))]);
    let c = corpus.component("C").unwrap();
    let offsets: Vec<(&str, u64)> = c
        .space
        .items()
        .map(|p| (p.item.as_element().name(), p.start))
        .collect();
    assert_eq!(offsets, [("A", 0), ("B", 1)]);
    assert_eq!(c.size, 2);
}

#[test]
fn register_array_of_three() {
    let corpus = build(&[component("C", 32)
        .child(register("CTRL"))
        .child(
            Decl::named(DeclKind::RegisterArray, "CH")
                .attr("count", "3")
                .child(register("VALUE")),
        )]);
    let c = corpus.component("C").unwrap();
    let array = c
        .space
        .items()
        .find_map(|p| match &p.item {
            ComponentChild::RegisterArray(a) => Some(a),
            ComponentChild::Register(_) => None,
        })
        .unwrap();
    assert_eq!(array.framesize, 1);
    assert_eq!(array.size, 3);
    assert_eq!(array.offset % 4, 0);
    assert_eq!(array.offset, 4);
}

#[test]
fn overlapping_fields_are_rejected() {
    let err = Corpus::build(
        &[component("C", 32).child(
            register("R")
                .child(field("A").attr("offset", "0").attr("size", "4"))
                .child(field("B").attr("offset", "2").attr("size", "4")),
        )],
        &BuildConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2002);
    assert_eq!(err.path().to_string(), "C.R.B");
}

#[test]
fn missing_component_is_named() {
    let err = Corpus::build(
        &[Decl::named(DeclKind::MemoryMap, "SYS")
            .child(Decl::named(DeclKind::Instance, "periph").attr("extern", "Missing"))],
        &BuildConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3001);
    let rendered = Diagnostic::from(&err).to_string();
    assert!(rendered.contains("SYS.periph"), "{rendered}");
    assert!(rendered.contains("Missing"), "{rendered}");
}

#[test]
fn field_directly_in_component_is_unresolvable() {
    let err = Corpus::build(
        &[component("C", 32).child(field("F"))],
        &BuildConfig::default(),
    )
    .unwrap_err();
    assert_eq!(err.code(), ErrorCode::E1003);
}

#[test]
fn full_peripheral() {
    let dio = component("DIO", 16)
        .attr("readOnly", "false")
        .describe("Digital I/O.")
        .child(
            register("CTRL")
                .child(field("EN"))
                .child(
                    field("MODE")
                        .attr("size", "2")
                        .child(Decl::named(DeclKind::Enum, "OFF"))
                        .child(Decl::named(DeclKind::Enum, "IN"))
                        .child(Decl::named(DeclKind::Enum, "OUT")),
                )
                .child(field("IRQ").attr("offset", "15").attr("readOnly", "1")),
        )
        .child(register("STATUS").attr("readOnly", "yes").attr("width", "8"))
        .child(
            Decl::new(DeclKind::RegisterArray)
                .attr("count", "8")
                .child(register("PIN").child(
                    Decl::new(DeclKind::FieldArray)
                        .attr("count", "4")
                        .child(field("LVL").attr("size", "4")),
                )),
        );
    let sys = Decl::named(DeclKind::MemoryMap, "SYS")
        .attr("base", "0x4000_0000")
        .child(Decl::named(DeclKind::Instance, "DIO"))
        .child(Decl::named(DeclKind::Instance, "DIO2").attr("extern", "DIO"));

    let corpus = build(&[dio, sys]);
    let dio = corpus.component("DIO").unwrap();
    // CTRL@0, STATUS@1, PIN array of 8 words aligned to 8.
    let layout: Vec<(&str, u64, u64)> = dio
        .space
        .items()
        .map(|p| (p.item.as_element().name(), p.start, p.size))
        .collect();
    assert_eq!(layout, [("CTRL", 0, 1), ("STATUS", 1, 1), ("PIN", 8, 8)]);
    assert_eq!(dio.size, 16);
    assert_eq!(dio.byte_size(), Some(32));

    let ComponentChild::Register(ctrl) = &dio.space.items().next().unwrap().item else {
        panic!("expected CTRL");
    };
    let fields: Vec<(&str, u64)> = ctrl
        .space
        .items()
        .map(|p| (p.item.as_element().name(), p.start))
        .collect();
    assert_eq!(fields, [("EN", 0), ("MODE", 1), ("IRQ", 15)]);
    let RegisterChild::Field(mode) = &ctrl.space.items().nth(1).unwrap().item else {
        panic!("expected MODE");
    };
    let values: Vec<u64> = mode.enums.iter().map(|e| e.value).collect();
    assert_eq!(values, [0, 1, 2]);

    let sys = corpus.memory_map("SYS").unwrap();
    assert_eq!(sys.base, 0x4000_0000);
    let instances: Vec<(&str, u64)> = sys
        .space
        .items()
        .map(|p| match &p.item {
            MapChild::Instance(i) => (i.extern_name.as_str(), p.start),
            MapChild::InstanceArray(_) => panic!("unexpected array"),
        })
        .collect();
    assert_eq!(instances, [("DIO", 0), ("DIO", 32)]);
    assert_eq!(sys.size, 64);
}
