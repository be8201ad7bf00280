use rmap_space::Space;

use super::*;

fn common(path: &ElementPath) -> Common {
    Common {
        name: path.leaf().to_string(),
        path: path.clone(),
        description: Vec::new(),
        read_only: false,
        write_only: false,
        format: Format::Bits,
    }
}

fn field(parent: &ElementPath, name: &str, offset: u64, size: u64) -> Field {
    Field {
        common: common(&parent.child(name)),
        offset,
        size,
        enums: Vec::new(),
    }
}

#[test]
fn test_access_from_flags() {
    let mut c = common(&ElementPath::root("X"));
    assert_eq!(c.access(), Access::ReadWrite);
    c.read_only = true;
    assert_eq!(c.access(), Access::ReadOnly);
    assert!(c.access().is_readable());
    assert!(!c.access().is_writable());
    c.read_only = false;
    c.write_only = true;
    assert_eq!(c.access(), Access::WriteOnly);
    assert!(!c.access().is_readable());
}

#[test]
fn test_description_text() {
    let mut c = common(&ElementPath::root("X"));
    c.description = vec!["First.".to_string(), "Second.".to_string()];
    assert_eq!(c.description_text(), "First.\n\nSecond.");
}

#[test]
fn test_format_parse() {
    assert_eq!(Format::parse("signed"), Some(Format::Signed));
    assert_eq!(Format::parse("bits"), Some(Format::Bits));
    assert_eq!(Format::parse("float"), None);
    assert_eq!(Format::Unsigned.to_string(), "unsigned");
}

#[test]
fn test_register_children_in_address_order() {
    let path = ElementPath::root("C").child("R");
    let mut space = Space::default();
    space
        .place(RegisterChild::Field(field(&path, "HI", 8, 8)), Some(8), 8)
        .unwrap();
    space
        .place(RegisterChild::Field(field(&path, "LO", 0, 8)), Some(0), 8)
        .unwrap();
    let register = Register {
        common: common(&path),
        offset: 0,
        width: 16,
        reset: 0,
        space,
    };

    let element = register.as_element();
    assert_eq!(element.kind(), ElementKind::Register);
    let names: Vec<&str> = element.children().into_iter().map(ElementRef::name).collect();
    assert_eq!(names, ["LO", "HI"]);
    assert!(register.has_fields());
}

#[test]
fn test_field_enums_keep_declaration_order() {
    let path = ElementPath::root("C").child("R").child("F");
    let mut f = field(&path.parent().unwrap(), "F", 0, 2);
    for (name, value) in [("B", 2), ("A", 0)] {
        f.enums.push(Enum {
            common: common(&path.child(name)),
            value,
        });
    }
    let children = ElementRef::Field(&f).children();
    let values: Vec<Option<u64>> = children.iter().map(|c| c.offset()).collect();
    assert_eq!(values, [Some(2), Some(0)]);
}

#[test]
fn test_instance_size_follows_binding() {
    let component = Arc::new(Component {
        common: common(&ElementPath::root("DIO")),
        width: 32,
        size: 4,
        space: Space::default(),
    });
    let instance = Instance {
        common: common(&ElementPath::root("MAP").child("DIO")),
        offset: 0,
        extern_name: "DIO".to_string(),
        binding: Arc::clone(&component),
    };
    assert_eq!(component.word_bytes(), 4);
    assert_eq!(instance.size(), Some(16));
    assert_eq!(instance.component().name(), "DIO");
    assert!(ElementRef::Instance(&instance).children().is_empty());
}

#[test]
fn test_byte_size_past_address_range() {
    let component = Component {
        common: common(&ElementPath::root("BIG")),
        width: 64,
        size: 0x4000_0000_0000_0000,
        space: Space::default(),
    };
    assert_eq!(component.byte_size(), None);
}

#[test]
fn test_set_offset_through_child_enum() {
    let path = ElementPath::root("C");
    let mut child = ComponentChild::Register(Register {
        common: common(&path.child("R")),
        offset: 0,
        width: 8,
        reset: 0,
        space: Space::default(),
    });
    child.set_offset(3);
    assert_eq!(child.offset(), 3);
    assert_eq!(child.as_element().offset(), Some(3));
}

#[test]
fn test_roots_have_no_offset() {
    let component = Component {
        common: common(&ElementPath::root("C")),
        width: 8,
        size: 0,
        space: Space::default(),
    };
    assert_eq!(component.as_element().offset(), None);
    assert_eq!(component.kind(), ElementKind::Component);
    assert_eq!(ElementRef::from(&component).path().to_string(), "C");
}
