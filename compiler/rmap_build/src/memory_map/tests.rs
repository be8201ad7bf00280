use std::sync::Arc;

use pretty_assertions::assert_eq;
use rmap_diagnostic::ErrorCode;

use super::*;
use crate::build_component;

/// DIO: 4 words of 32 bits (16 bytes). UART: 3 words of 8 bits (3 bytes).
fn binder() -> Binder {
    let dio = Decl::named(DeclKind::Component, "DIO")
        .attr("width", "32")
        .attr("size", "4");
    let uart = Decl::named(DeclKind::Component, "UART")
        .attr("width", "8")
        .children(["TX", "RX", "STATUS"].map(|n| Decl::named(DeclKind::Register, n)));
    let mut binder = Binder::new();
    for decl in [dio, uart] {
        binder
            .register(Arc::new(build_component(&decl).unwrap()))
            .unwrap();
    }
    binder
}

fn map() -> Decl {
    Decl::named(DeclKind::MemoryMap, "SYS")
}

fn instance(name: &str, component: &str) -> Decl {
    Decl::named(DeclKind::Instance, name).attr("extern", component)
}

fn build(decl: &Decl) -> BuildResult<MemoryMap> {
    build_memory_map(decl, &binder(), &BuildConfig::default())
}

fn layout(map: &MemoryMap) -> Vec<(String, u64, u64)> {
    map.space
        .items()
        .map(|p| {
            assert_eq!(p.start, p.item.offset(), "offset written back");
            (p.item.as_element().name().to_string(), p.start, p.size)
        })
        .collect()
}

#[test]
fn test_instances_are_aligned() {
    let decl = map()
        .child(instance("dio0", "DIO"))
        .child(instance("uart0", "UART"))
        .child(instance("dio1", "DIO"));
    let m = build(&decl).unwrap();
    assert_eq!(
        layout(&m),
        [
            ("dio0".to_string(), 0, 16),
            ("uart0".to_string(), 16, 3),
            ("dio1".to_string(), 32, 16),
        ]
    );
    assert_eq!(m.size, 48);
    assert_eq!(m.base, 0x8000_0000);
    assert_eq!(m.width, 32);
    assert_eq!(m.space.gap_count(), 1);
}

#[test]
fn test_extern_defaults_to_own_name() {
    let decl = map().child(Decl::named(DeclKind::Instance, "UART"));
    let m = build(&decl).unwrap();
    let Some(MapChild::Instance(uart)) = m.space.items().next().map(|p| &p.item) else {
        panic!("expected an instance");
    };
    assert_eq!(uart.extern_name, "UART");
    assert_eq!(uart.component().size, 3);
}

#[test]
fn test_unknown_component() {
    let decl = map().child(instance("x", "Missing"));
    let err = build(&decl).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E3001);
    assert_eq!(err.path().to_string(), "SYS.x");
    assert!(err.to_string().contains("`Missing`"));
}

#[test]
fn test_explicit_offsets_are_exact() {
    let decl = map()
        .child(instance("uart0", "UART").attr("offset", "5"))
        .child(instance("uart1", "UART"));
    let m = build(&decl).unwrap();
    assert_eq!(
        layout(&m),
        [("uart1".to_string(), 0, 3), ("uart0".to_string(), 5, 3)]
    );
    assert_eq!(m.size, 8);
}

#[test]
fn test_instance_array() {
    let decl = map().child(instance("uart0", "UART")).child(
        Decl::named(DeclKind::InstanceArray, "DIOS")
            .attr("count", "2")
            .child(instance("dio", "DIO")),
    );
    let m = build(&decl).unwrap();
    assert_eq!(
        layout(&m),
        [("uart0".to_string(), 0, 3), ("DIOS".to_string(), 32, 32)]
    );
    let Some(MapChild::InstanceArray(array)) = m.space.items().nth(1).map(|p| &p.item) else {
        panic!("expected an instance array");
    };
    assert_eq!(array.framesize, 16);
    assert_eq!(array.template().and_then(Instance::size), Some(16));
}

#[test]
fn test_config_defaults() {
    let config = BuildConfig::default()
        .with_default_base(0x4000_0000)
        .with_default_bus_width(64);
    let m = build_memory_map(&map(), &binder(), &config).unwrap();
    assert_eq!(m.base, 0x4000_0000);
    assert_eq!(m.width, 64);
    assert_eq!(m.size, 0);

    let explicit = map().attr("base", "0x1000").attr("width", "16");
    let m = build_memory_map(&explicit, &binder(), &config).unwrap();
    assert_eq!((m.base, m.width), (0x1000, 16));
}

#[test]
fn test_memory_map_errors() {
    let small = map().attr("size", "8").child(instance("dio0", "DIO"));
    assert_eq!(build(&small).unwrap_err().code(), ErrorCode::E1002);

    let register = map().child(Decl::named(DeclKind::Register, "R"));
    assert_eq!(build(&register).unwrap_err().code(), ErrorCode::E1003);

    let width = map().attr("width", "24");
    assert_eq!(build(&width).unwrap_err().code(), ErrorCode::E2001);

    let duplicate = map()
        .child(instance("a", "DIO"))
        .child(instance("a", "UART"));
    assert_eq!(build(&duplicate).unwrap_err().code(), ErrorCode::E2003);
}

#[test]
fn test_component_too_large_for_byte_addresses() {
    let big = Decl::named(DeclKind::Component, "BIG")
        .attr("width", "64")
        .attr("size", "0x4000000000000000");
    let mut binder = binder();
    binder
        .register(Arc::new(build_component(&big).unwrap()))
        .unwrap();

    let decl = map().child(instance("b", "BIG"));
    let err = build_memory_map(&decl, &binder, &BuildConfig::default()).unwrap_err();
    assert_eq!(err.code(), ErrorCode::E2005);
    assert_eq!(err.path().to_string(), "SYS.b");
}
