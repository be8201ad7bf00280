//! Inheritance of `readOnly`, `writeOnly` and `format`.
//!
//! Each node resolves these against its parent's already-resolved values
//! before its children are built, then hands its own values down.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Common, Format};

use crate::attrs::Attrs;

/// The inheritable attributes as resolved on a parent.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) struct Inherited {
    pub read_only: bool,
    pub write_only: bool,
    pub format: Format,
}

impl From<&Common> for Inherited {
    fn from(common: &Common) -> Self {
        Inherited {
            read_only: common.read_only,
            write_only: common.write_only,
            format: common.format,
        }
    }
}

/// Resolve the common record of an element.
///
/// Setting one of `readOnly`/`writeOnly` true clears the other unless it
/// is also given; giving both as true is an error.
pub(crate) fn resolve_common(
    attrs: &Attrs<'_>,
    decl_description: &[String],
    name: &str,
    parent: Inherited,
) -> BuildResult<Common> {
    let path = attrs.path();
    let (read_only, write_only) = match (attrs.bool("readOnly")?, attrs.bool("writeOnly")?) {
        (Some(true), Some(true)) => {
            return Err(BuildError::invalid_attribute(
                path,
                "writeOnly",
                "an element cannot be both readOnly and writeOnly",
            ))
        }
        (Some(read), Some(write)) => (read, write),
        (Some(true), None) => (true, false),
        (None, Some(true)) => (false, true),
        (Some(false), None) => (false, parent.write_only),
        (None, Some(false)) => (parent.read_only, false),
        (None, None) => (parent.read_only, parent.write_only),
    };
    Ok(Common {
        name: name.to_string(),
        path: path.clone(),
        description: decl_description.to_vec(),
        read_only,
        write_only,
        format: attrs.format()?.unwrap_or(parent.format),
    })
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use rmap_diagnostic::ErrorCode;
    use rmap_ir::{Decl, DeclKind, ElementPath};

    use super::*;

    fn resolve(decl: &Decl, parent: Inherited) -> BuildResult<Common> {
        let path = ElementPath::root("X");
        let attrs = Attrs::new(decl, &path, &[])?;
        resolve_common(&attrs, &decl.description, "X", parent)
    }

    #[test]
    fn test_defaults_come_from_parent() {
        let parent = Inherited {
            read_only: true,
            write_only: false,
            format: Format::Signed,
        };
        let common = resolve(&Decl::named(DeclKind::Field, "X"), parent).unwrap();
        assert!(common.read_only);
        assert!(!common.write_only);
        assert_eq!(common.format, Format::Signed);
    }

    #[test]
    fn test_explicit_write_only_overrides_inherited_read_only() {
        let parent = Inherited {
            read_only: true,
            ..Inherited::default()
        };
        let decl = Decl::named(DeclKind::Field, "X").attr("writeOnly", "yes");
        let common = resolve(&decl, parent).unwrap();
        assert!(!common.read_only);
        assert!(common.write_only);
    }

    #[test]
    fn test_both_set_is_rejected() {
        let decl = Decl::named(DeclKind::Field, "X")
            .attr("writeOnly", "1")
            .attr("readOnly", "true");
        let err = resolve(&decl, Inherited::default()).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2005);
    }

    #[test]
    fn test_bad_format() {
        let decl = Decl::named(DeclKind::Field, "X").attr("format", "float");
        assert!(resolve(&decl, Inherited::default()).is_err());
    }

    #[test]
    fn test_description_is_copied() {
        let decl = Decl::named(DeclKind::Field, "X").describe("one").describe("two");
        let common = resolve(&decl, Inherited::default()).unwrap();
        assert_eq!(common.description_text(), "one\n\ntwo");
    }
}
