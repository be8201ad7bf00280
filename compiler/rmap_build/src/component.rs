//! Components and register arrays.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Component, ComponentChild, Decl, DeclKind, ElementPath, RegisterArray};
use rmap_space::{BinaryPlacer, LinearPlacer, LinearResizer, Space};

use crate::array::{ArrayDecl, Frame};
use crate::attrs::Attrs;
use crate::inherit::{resolve_common, Inherited};
use crate::layout::{lay_out, misplaced, Request, Siblings};
use crate::register::{build_register, RegisterScope};

const COMPONENT_ATTRS: [&str; 2] = ["width", "size"];

/// Path of a root declaration of the expected kind.
pub(crate) fn root_path(decl: &Decl, kind: DeclKind) -> BuildResult<ElementPath> {
    let path = ElementPath::root(decl.name().unwrap_or(decl.kind.as_str()));
    if decl.kind != kind {
        return Err(BuildError::invalid_structure(
            &path,
            format!("expected a {kind}, found a {}", decl.kind),
        ));
    }
    Ok(path)
}

/// Validate a word or bus width: a power of two of at least 8 bits.
pub(crate) fn word_width(width: u64, path: &ElementPath) -> BuildResult<u32> {
    match u32::try_from(width) {
        Ok(bits) if bits >= 8 && bits.is_power_of_two() => Ok(bits),
        _ => Err(BuildError::InvalidWidth {
            path: path.clone(),
            width,
            reason: "must be a power of two of at least 8".to_string(),
        }),
    }
}

/// Build one component from its declaration.
///
/// Registers are one word each; register arrays are aligned to their
/// power-of-two size. An explicit `size` is validated, otherwise the
/// component ends at its last occupied word.
#[tracing::instrument(level = "debug", skip_all, fields(component = decl.name().unwrap_or("?")))]
pub fn build_component(decl: &Decl) -> BuildResult<Component> {
    let path = root_path(decl, DeclKind::Component)?;
    let attrs = Attrs::new(decl, &path, &COMPONENT_ATTRS)?;
    let name = attrs.required("name")?;
    let width = attrs
        .int("width")?
        .ok_or_else(|| {
            BuildError::invalid_structure(&path, "a component requires the `width` attribute")
        })
        .and_then(|width| word_width(width, &path))?;
    let common = resolve_common(&attrs, &decl.description, name, Inherited::default())?;
    let scope = RegisterScope {
        word_width: width,
        inherited: Inherited::from(&common),
    };

    let mut siblings = Siblings::default();
    let mut requests = Vec::with_capacity(decl.children.len());
    for child in &decl.children {
        let request = match child.kind {
            DeclKind::Register => {
                build_register(child, &path, &scope)?.map(ComponentChild::Register)
            }
            DeclKind::RegisterArray => {
                build_register_array(child, &path, &scope)?.map(ComponentChild::RegisterArray)
            }
            _ => return Err(misplaced(decl.kind, &path, child)),
        };
        siblings.insert(&request.path)?;
        requests.push(request);
    }

    let mut space = Space::new(&LinearPlacer, &LinearResizer);
    lay_out(&mut space, &path, requests)?;
    let size = space
        .resolve_size(attrs.int("size")?)
        .map_err(|err| BuildError::placement(&path, err))?;
    tracing::debug!(%path, width, size, registers = space.len(), "component built");

    Ok(Component {
        common,
        width,
        size,
        space,
    })
}

fn build_register_array(
    decl: &Decl,
    parent: &ElementPath,
    scope: &RegisterScope,
) -> BuildResult<Request<RegisterArray>> {
    let array = ArrayDecl::parse(decl, parent, DeclKind::Register)?;
    let common = array.common(scope.inherited)?;
    let inner = RegisterScope {
        word_width: scope.word_width,
        inherited: Inherited::from(&common),
    };
    let template = build_register(array.template, &array.path, &inner)?;
    let Frame {
        space,
        framesize,
        size,
    } = array.frame(template)?;

    Ok(Request::new(
        RegisterArray {
            common,
            offset: 0,
            count: array.count,
            framesize,
            size,
            space,
        },
        array.path,
        array.offset,
        size,
    )
    .with_placer(&BinaryPlacer))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
