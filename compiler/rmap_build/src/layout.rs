//! Placing built children into their container's space.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{
    ComponentChild, Decl, DeclKind, ElementPath, Field, Instance, MapChild, Register,
    RegisterChild,
};
use rmap_space::{Placer, Space};
use rustc_hash::FxHashSet;

/// A child whose position is written back after placement.
pub(crate) trait Positioned {
    fn set_offset(&mut self, offset: u64);

    fn path(&self) -> &ElementPath;
}

macro_rules! impl_positioned {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Positioned for $ty {
                fn set_offset(&mut self, offset: u64) {
                    self.offset = offset;
                }

                fn path(&self) -> &ElementPath {
                    &self.common.path
                }
            }
        )*
    };
}

impl_positioned!(Register, Field, Instance);

macro_rules! impl_positioned_child {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Positioned for $ty {
                fn set_offset(&mut self, offset: u64) {
                    <$ty>::set_offset(self, offset);
                }

                fn path(&self) -> &ElementPath {
                    self.as_element().path()
                }
            }
        )*
    };
}

impl_positioned_child!(ComponentChild, RegisterChild, MapChild);

/// A built child waiting to be placed.
pub(crate) struct Request<T> {
    pub item: T,
    pub path: ElementPath,
    /// Explicit offset, `None` for automatic placement.
    pub offset: Option<u64>,
    pub size: u64,
    /// Overrides the container's placer for automatic placement.
    pub placer: Option<&'static dyn Placer>,
}

impl<T> Request<T> {
    pub(crate) fn new(item: T, path: ElementPath, offset: Option<u64>, size: u64) -> Self {
        Request {
            item,
            path,
            offset,
            size,
            placer: None,
        }
    }

    #[must_use]
    pub(crate) fn with_placer(mut self, placer: &'static dyn Placer) -> Self {
        self.placer = Some(placer);
        self
    }

    pub(crate) fn map<U>(self, f: impl FnOnce(T) -> U) -> Request<U> {
        Request {
            item: f(self.item),
            path: self.path,
            offset: self.offset,
            size: self.size,
            placer: self.placer,
        }
    }
}

/// Place `requests` in source order, auto-place the rest and write the
/// resolved offsets back into the children.
pub(crate) fn lay_out<T: Positioned>(
    space: &mut Space<T>,
    container: &ElementPath,
    requests: Vec<Request<T>>,
) -> BuildResult<()> {
    let mut deferred = Vec::new();
    for Request {
        item,
        path,
        offset,
        size,
        placer,
    } in requests
    {
        let placed = match placer {
            Some(placer) => space.place_with(item, offset, size, placer),
            None => space.place(item, offset, size),
        };
        placed.map_err(|err| BuildError::placement(&path, err))?;
        if offset.is_none() {
            deferred.push(path);
        }
    }

    // Auto placement stops at the first failure, so the children placed so
    // far past the explicit ones tell which deferred child failed.
    let explicit = space.len();
    if let Err(err) = space.auto_place_remaining() {
        let failed = deferred.get(space.len() - explicit).unwrap_or(container);
        return Err(BuildError::placement(failed, err));
    }

    for (item, start, size) in space.placements_mut() {
        item.set_offset(start);
        tracing::trace!(path = %item.path(), start, size, "placed");
    }
    Ok(())
}

/// Names already used in one scope.
#[derive(Default)]
pub(crate) struct Siblings {
    names: FxHashSet<String>,
}

impl Siblings {
    pub(crate) fn insert(&mut self, path: &ElementPath) -> BuildResult<()> {
        let name = path.leaf();
        if self.names.insert(name.to_string()) {
            Ok(())
        } else {
            Err(BuildError::DuplicateName {
                path: path.clone(),
                name: name.to_string(),
            })
        }
    }
}

/// Path of a child declaration, named by its kind when it has no name.
pub(crate) fn child_path(parent: &ElementPath, decl: &Decl) -> ElementPath {
    parent.child(decl.name().unwrap_or(decl.kind.as_str()))
}

/// The error for a child that cannot appear in its container.
///
/// A child addressed in a different unit than its container cannot be
/// given an offset there; anything else is a structural error.
pub(crate) fn misplaced(container: DeclKind, container_path: &ElementPath, child: &Decl) -> BuildError {
    let path = child_path(container_path, child);
    match (container.space_unit(), child.kind.unit()) {
        (Some(outer), Some(inner)) if outer != inner => BuildError::UnresolvableOffset {
            path,
            reason: format!(
                "a {} is addressed in {inner} but a {container} is addressed in {outer}",
                child.kind
            ),
        },
        _ => BuildError::invalid_structure(
            &path,
            format!("a {} cannot appear inside a {container}", child.kind),
        ),
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use rmap_diagnostic::ErrorCode;
    use rmap_ir::{Common, Format};
    use rmap_space::{LinearPlacer, LinearResizer};

    use super::*;

    fn field_request(
        register: &ElementPath,
        name: &str,
        offset: Option<u64>,
        size: u64,
    ) -> Request<Field> {
        let path = register.child(name);
        let field = Field {
            common: Common {
                name: name.to_string(),
                path: path.clone(),
                description: Vec::new(),
                read_only: false,
                write_only: false,
                format: Format::Bits,
            },
            offset: 0,
            size,
            enums: Vec::new(),
        };
        Request::new(field, path, offset, size)
    }

    #[test]
    fn test_lay_out_writes_offsets_back() {
        let register = ElementPath::root("C").child("R");
        let mut space = Space::new(&LinearPlacer, &LinearResizer);
        let requests = vec![
            field_request(&register, "HI", Some(4), 4),
            field_request(&register, "LO", None, 4),
        ];
        lay_out(&mut space, &register, requests).unwrap();
        let offsets: Vec<(&str, u64)> = space
            .items()
            .map(|p| (p.item.common.name.as_str(), p.item.offset))
            .collect();
        assert_eq!(offsets, [("LO", 0), ("HI", 4)]);
    }

    #[test]
    fn test_auto_placement_failure_names_the_child() {
        let register = ElementPath::root("C").child("R");
        let mut space = Space::new(&LinearPlacer, &LinearResizer);
        let requests = vec![
            field_request(&register, "A", None, 4),
            field_request(&register, "TOP", Some(4), u64::MAX - 4),
            field_request(&register, "B", None, 4),
            field_request(&register, "C", None, 1),
        ];
        let err = lay_out(&mut space, &register, requests).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E1003);
        assert_eq!(err.path().to_string(), "C.R.B");
    }

    #[test]
    fn test_misplaced_field_in_component_is_unresolvable() {
        let err = misplaced(
            DeclKind::Component,
            &ElementPath::root("C"),
            &Decl::named(DeclKind::Field, "F"),
        );
        assert_eq!(err.code(), ErrorCode::E1003);
        assert_eq!(err.path().to_string(), "C.F");
    }

    #[test]
    fn test_misplaced_same_unit_is_structural() {
        let err = misplaced(
            DeclKind::RegisterArray,
            &ElementPath::root("C").child("A"),
            &Decl::named(DeclKind::RegisterArray, "B"),
        );
        assert_eq!(err.code(), ErrorCode::E2006);

        let err = misplaced(
            DeclKind::Register,
            &ElementPath::root("C").child("R"),
            &Decl::new(DeclKind::Enum),
        );
        assert_eq!(err.code(), ErrorCode::E2006);
        assert_eq!(err.path().to_string(), "C.R.enum");
    }

    #[test]
    fn test_siblings_detect_duplicates() {
        let mut siblings = Siblings::default();
        let root = ElementPath::root("C");
        siblings.insert(&root.child("A")).unwrap();
        siblings.insert(&root.child("B")).unwrap();
        let err = siblings.insert(&root.child("A")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2003);
    }
}
