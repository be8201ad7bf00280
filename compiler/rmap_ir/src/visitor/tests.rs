use std::sync::Arc;

use pretty_assertions::assert_eq;
use rmap_space::Space;

use super::*;
use crate::{Common, ComponentChild, Format, MapChild, RegisterChild};

fn common(path: ElementPath) -> Common {
    Common {
        name: path.leaf().to_string(),
        path,
        description: Vec::new(),
        read_only: false,
        write_only: false,
        format: Format::Bits,
    }
}

/// DIO { CTRL@0 { EN@0, MODE@1 { OFF=0, ON=1 } }, DATA@1 }
fn component() -> Component {
    let root = ElementPath::root("DIO");
    let ctrl_path = root.child("CTRL");
    let mode_path = ctrl_path.child("MODE");

    let mode = Field {
        common: common(mode_path.clone()),
        offset: 1,
        size: 1,
        enums: vec![
            Enum {
                common: common(mode_path.child("OFF")),
                value: 0,
            },
            Enum {
                common: common(mode_path.child("ON")),
                value: 1,
            },
        ],
    };
    let en = Field {
        common: common(ctrl_path.child("EN")),
        offset: 0,
        size: 1,
        enums: Vec::new(),
    };
    let mut fields = Space::default();
    fields
        .place(RegisterChild::Field(mode), Some(1), 1)
        .unwrap();
    fields.place(RegisterChild::Field(en), Some(0), 1).unwrap();
    fields.resolve_size(Some(16)).unwrap();

    let ctrl = Register {
        common: common(ctrl_path),
        offset: 0,
        width: 16,
        reset: 0,
        space: fields,
    };
    let data = Register {
        common: common(root.child("DATA")),
        offset: 1,
        width: 16,
        reset: 0,
        space: Space::default(),
    };
    let mut registers = Space::default();
    registers
        .place(ComponentChild::Register(data), Some(1), 1)
        .unwrap();
    registers
        .place(ComponentChild::Register(ctrl), Some(0), 1)
        .unwrap();
    let size = registers.resolve_size(None).unwrap();

    Component {
        common: common(root),
        width: 16,
        size,
        space: registers,
    }
}

fn memory_map(component: Arc<Component>) -> MemoryMap {
    let root = ElementPath::root("SYS");
    let instance = Instance {
        common: common(root.child("dio0")),
        offset: 0,
        extern_name: "DIO".to_string(),
        binding: component,
    };
    let size = instance.size().unwrap();
    let mut space = Space::default();
    space
        .place(MapChild::Instance(instance), Some(0), size)
        .unwrap();
    MemoryMap {
        common: common(root),
        base: 0x8000_0000,
        width: 32,
        size,
        space,
    }
}

/// Streams one line per element, recursing through every kind.
struct Names<E> {
    emitter: E,
    depth: usize,
}

impl<'tree, E: Emitter> Visitor<'tree> for Names<E> {
    type Output = ();

    fn default_visit(&mut self, element: ElementRef<'tree>) -> VisitResult<()> {
        self.emitter.emit_line(self.depth, element.name());
        self.depth += 1;
        visit_children(self, element)?;
        self.depth -= 1;
        Ok(())
    }

    fn visit_instance(&mut self, instance: &'tree Instance) -> VisitResult<()> {
        self.emitter
            .emit_line(self.depth, &format!("{} -> {}", instance.common.name, instance.extern_name));
        self.depth += 1;
        visit_binding(self, instance)?;
        self.depth -= 1;
        Ok(())
    }
}

impl<'tree> Traversal<'tree> for Names<StringEmitter> {
    type Artifact = String;

    fn begin(&mut self, root: ElementRef<'tree>) -> VisitResult<()> {
        self.emitter.emit_line(0, &format!("# {}", root.kind()));
        Ok(())
    }

    fn finish(self, (): ()) -> VisitResult<String> {
        Ok(self.emitter.output())
    }
}

/// Handles registers only.
struct RegistersOnly;

impl<'tree> Visitor<'tree> for RegistersOnly {
    type Output = usize;

    fn visit_component(&mut self, component: &'tree Component) -> VisitResult<usize> {
        Ok(visit_children(self, ElementRef::Component(component))?
            .into_iter()
            .sum())
    }

    fn visit_register(&mut self, _register: &'tree Register) -> VisitResult<usize> {
        Ok(1)
    }
}

/// Accumulates a nested summary of the tree.
#[derive(Debug, PartialEq)]
struct Node {
    name: String,
    offset: Option<u64>,
    children: Vec<Node>,
}

struct Summary;

impl<'tree> Visitor<'tree> for Summary {
    type Output = Node;

    fn default_visit(&mut self, element: ElementRef<'tree>) -> VisitResult<Node> {
        Ok(Node {
            name: element.name().to_string(),
            offset: element.offset(),
            children: visit_children(self, element)?,
        })
    }
}

impl<'tree> Traversal<'tree> for Summary {
    type Artifact = Vec<String>;

    fn finish(self, root: Node) -> VisitResult<Vec<String>> {
        fn flatten(node: &Node, out: &mut Vec<String>) {
            out.push(format!("{}@{:?}", node.name, node.offset));
            for child in &node.children {
                flatten(child, out);
            }
        }
        let mut out = Vec::new();
        flatten(&root, &mut out);
        Ok(out)
    }
}

#[test]
fn test_streaming_traversal_in_address_order() {
    let dio = component();
    let names = Names {
        emitter: StringEmitter::new(),
        depth: 0,
    };
    let text = execute(names, ElementRef::Component(&dio)).unwrap();
    assert_eq!(
        text,
        "# Component\n\
         DIO\n\
         \x20   CTRL\n\
         \x20       EN\n\
         \x20       MODE\n\
         \x20           OFF\n\
         \x20           ON\n\
         \x20   DATA\n"
    );
}

#[test]
fn test_binding_is_reached_through_visit_binding() {
    let map = memory_map(Arc::new(component()));
    let names = Names {
        emitter: StringEmitter::new(),
        depth: 0,
    };
    let text = execute(names, ElementRef::MemoryMap(&map)).unwrap();
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    assert_eq!(&lines[..4], ["# MemoryMap", "SYS", "dio0 -> DIO", "DIO"]);
}

#[test]
fn test_unhandled_kind_is_an_error() {
    let dio = component();
    let mut visitor = RegistersOnly;
    assert_eq!(visitor.visit_component(&dio).unwrap(), 2);

    let register = dio.space.items().next().unwrap();
    let ComponentChild::Register(ctrl) = &register.item else {
        panic!("expected a register");
    };
    let field = ElementRef::Field(match ctrl.space.items().next().map(|p| &p.item) {
        Some(RegisterChild::Field(f)) => f,
        other => panic!("expected a field, got {other:?}"),
    });
    let err = visit(&mut visitor, field).unwrap_err();
    match &err {
        VisitError::UnhandledElementKind { kind, path, .. } => {
            assert_eq!(*kind, ElementKind::Field);
            assert_eq!(path.to_string(), "DIO.CTRL.EN");
        }
        other => panic!("unexpected error {other:?}"),
    }
    assert!(err.to_string().contains("has no handler for Field `DIO.CTRL.EN`"));
}

#[test]
fn test_accumulating_traversal() {
    let dio = component();
    let flat = execute(Summary, ElementRef::Component(&dio)).unwrap();
    assert_eq!(
        flat,
        [
            "DIO@None",
            "CTRL@Some(0)",
            "EN@Some(0)",
            "MODE@Some(1)",
            "OFF@Some(0)",
            "ON@Some(1)",
            "DATA@Some(1)",
        ]
    );
}

#[test]
fn test_children_reversed() {
    let dio = component();
    let names: Vec<String> = visit_children_reversed(&mut Summary, ElementRef::Component(&dio))
        .unwrap()
        .into_iter()
        .map(|node| node.name)
        .collect();
    assert_eq!(names, ["DATA", "CTRL"]);
}

#[test]
fn test_emit_error_carries_path() {
    let err = VisitError::emit(&ElementPath::root("DIO"), "broken pipe");
    assert_eq!(err.path().to_string(), "DIO");
    assert_eq!(err.to_string(), "failed to emit output for `DIO`: broken pipe");
}
