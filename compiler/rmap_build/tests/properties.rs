//! Property tests for component construction.
//!
//! For random mixes of registers and register arrays, with and without
//! explicit offsets, a successful build must always:
//! 1. Place children without overlap, inside the component
//! 2. Honour every explicit offset exactly
//! 3. Align automatically placed arrays to their power-of-two size
//! 4. Produce identical trees on repeated runs
//!
//! Enum auto-numbering is checked against a direct model.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

use proptest::prelude::*;
use rmap_build::build_component;
use rmap_ir::{ComponentChild, Decl, DeclKind, RegisterChild};

#[derive(Clone, Debug)]
enum Child {
    Register { offset: Option<u64> },
    Array { offset: Option<u64>, count: u64 },
}

fn child_strategy() -> impl Strategy<Value = Child> {
    prop_oneof![
        prop::option::weighted(0.3, 0..24u64).prop_map(|offset| Child::Register { offset }),
        (prop::option::weighted(0.2, 0..24u64), 1..6u64)
            .prop_map(|(offset, count)| Child::Array { offset, count }),
    ]
}

fn component_decl(children: &[Child]) -> Decl {
    let mut decl = Decl::named(DeclKind::Component, "C").attr("width", "32");
    for (i, child) in children.iter().enumerate() {
        let name = format!("R{i}");
        let (child_decl, offset) = match child {
            Child::Register { offset } => (Decl::named(DeclKind::Register, name), offset),
            Child::Array { offset, count } => (
                Decl::new(DeclKind::RegisterArray)
                    .attr("count", count.to_string())
                    .child(Decl::named(DeclKind::Register, name)),
                offset,
            ),
        };
        decl = decl.child(match offset {
            Some(offset) => child_decl.attr("offset", offset.to_string()),
            None => child_decl,
        });
    }
    decl
}

proptest! {
    #[test]
    fn placement_invariants(children in prop::collection::vec(child_strategy(), 0..12)) {
        let decl = component_decl(&children);
        let Ok(component) = build_component(&decl) else {
            // Explicit offsets may collide; that is an error, not a property failure.
            return Ok(());
        };

        let placed: Vec<_> = component.space.items().collect();
        for pair in placed.windows(2) {
            prop_assert!(pair[0].end() <= pair[1].start, "overlap: {pair:?}");
        }
        for p in &placed {
            prop_assert!(p.end() <= component.size);
            prop_assert_eq!(p.start, p.item.offset());
        }

        for (i, child) in children.iter().enumerate() {
            let name = format!("R{i}");
            let p = placed
                .iter()
                .find(|p| p.item.as_element().name() == name)
                .expect("every child is placed");
            match (child, &p.item) {
                (Child::Register { offset: Some(offset) }, ComponentChild::Register(_))
                | (Child::Array { offset: Some(offset), .. }, ComponentChild::RegisterArray(_)) => {
                    prop_assert_eq!(p.start, *offset);
                }
                (Child::Array { offset: None, count }, ComponentChild::RegisterArray(a)) => {
                    prop_assert_eq!(a.size, *count);
                    prop_assert_eq!(p.start % count.next_power_of_two(), 0);
                }
                (Child::Register { offset: None }, ComponentChild::Register(_)) => {}
                (child, item) => prop_assert!(false, "{child:?} built as {item:?}"),
            }
        }

        prop_assert_eq!(build_component(&decl).unwrap(), component);
    }

    #[test]
    fn enum_auto_numbering(values in prop::collection::vec(prop::option::of(0..200u64), 1..10)) {
        let mut field = Decl::named(DeclKind::Field, "F").attr("size", "16");
        for (i, value) in values.iter().enumerate() {
            let e = Decl::named(DeclKind::Enum, format!("E{i}"));
            field = field.child(match value {
                Some(v) => e.attr("value", v.to_string()),
                None => e,
            });
        }
        let decl = Decl::named(DeclKind::Component, "C")
            .attr("width", "16")
            .child(Decl::named(DeclKind::Register, "R").child(field));
        let component = build_component(&decl).unwrap();

        let ComponentChild::Register(register) = &component.space.items().next().unwrap().item else {
            panic!("expected a register");
        };
        let RegisterChild::Field(field) = &register.space.items().next().unwrap().item else {
            panic!("expected a field");
        };

        let mut max_seen: Option<u64> = None;
        for (e, requested) in field.enums.iter().zip(&values) {
            let expected = requested.unwrap_or_else(|| max_seen.map_or(0, |m| m + 1));
            prop_assert_eq!(e.value, expected);
            max_seen = Some(max_seen.map_or(expected, |m| m.max(expected)));
        }
    }
}
