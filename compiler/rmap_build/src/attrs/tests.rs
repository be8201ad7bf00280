use pretty_assertions::assert_eq;
use rmap_diagnostic::ErrorCode;
use rmap_ir::DeclKind;

use super::*;

#[test]
fn test_parse_int_prefixes() {
    assert_eq!(parse_int("42"), Some(42));
    assert_eq!(parse_int("0x8000_0000"), Some(0x8000_0000));
    assert_eq!(parse_int("0XfF"), Some(255));
    assert_eq!(parse_int("0o17"), Some(15));
    assert_eq!(parse_int("0b1010"), Some(10));
    assert_eq!(parse_int("1_000"), Some(1000));
    assert_eq!(parse_int(" 7 "), Some(7));
}

#[test]
fn test_parse_int_rejects() {
    for text in ["", "0x", "-1", "+1", "_1", "1_", "0x_1", "ten", "0b102", "1.5"] {
        assert_eq!(parse_int(text), None, "{text:?}");
    }
    assert_eq!(parse_int("18446744073709551616"), None);
}

#[test]
fn test_parse_bool() {
    for text in ["1", "true", "TRUE", "Yes"] {
        assert_eq!(parse_bool(text), Some(true), "{text:?}");
    }
    for text in ["0", "false", "False", "NO"] {
        assert_eq!(parse_bool(text), Some(false), "{text:?}");
    }
    assert_eq!(parse_bool("on"), None);
}

#[test]
fn test_unknown_attribute_rejected() {
    let decl = Decl::named(DeclKind::Field, "EN").attr("colour", "red");
    let path = ElementPath::root("EN");
    let err = Attrs::new(&decl, &path, &["offset", "size"]).err().map(|e| e.code());
    assert_eq!(err, Some(ErrorCode::E2005));
}

#[test]
fn test_typed_accessors() {
    let decl = Decl::named(DeclKind::Field, "EN")
        .attr("size", "0")
        .attr("offset", "0x3")
        .attr("readOnly", "maybe")
        .attr("format", "signed");
    let path = ElementPath::root("EN");
    let attrs = Attrs::new(&decl, &path, &["offset", "size"]).unwrap();

    assert_eq!(attrs.int("offset").unwrap(), Some(3));
    assert_eq!(attrs.int("missing").unwrap(), None);
    assert!(attrs.positive("size").is_err());
    assert!(attrs.bool("readOnly").is_err());
    assert_eq!(attrs.format().unwrap(), Some(Format::Signed));
    assert_eq!(attrs.required("name").unwrap(), "EN");
    assert_eq!(
        attrs.required("extern").err().map(|e| e.code()),
        Some(ErrorCode::E2006)
    );
}
