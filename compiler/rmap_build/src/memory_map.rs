//! Memory maps and instances.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Decl, DeclKind, ElementPath, Instance, InstanceArray, MapChild, MemoryMap};
use rmap_space::{BinaryPlacer, LinearResizer, Space};

use crate::array::{ArrayDecl, Frame};
use crate::attrs::Attrs;
use crate::binder::Binder;
use crate::component::{root_path, word_width};
use crate::config::BuildConfig;
use crate::inherit::{resolve_common, Inherited};
use crate::layout::{child_path, lay_out, misplaced, Request, Siblings};

const MEMORY_MAP_ATTRS: [&str; 3] = ["base", "width", "size"];
const INSTANCE_ATTRS: [&str; 2] = ["offset", "extern"];

/// Build one memory map, binding its instances through `binder`.
///
/// Instances without an offset are aligned to their power-of-two size so
/// that address decoding is a mask. The map ends at its last occupied byte
/// unless `size` is given.
#[tracing::instrument(level = "debug", skip_all, fields(memory_map = decl.name().unwrap_or("?")))]
pub fn build_memory_map(
    decl: &Decl,
    binder: &Binder,
    config: &BuildConfig,
) -> BuildResult<MemoryMap> {
    let path = root_path(decl, DeclKind::MemoryMap)?;
    let attrs = Attrs::new(decl, &path, &MEMORY_MAP_ATTRS)?;
    let name = attrs.required("name")?;
    let base = attrs.int("base")?.unwrap_or(config.default_base);
    let width = word_width(
        attrs
            .int("width")?
            .unwrap_or(u64::from(config.default_bus_width)),
        &path,
    )?;
    let common = resolve_common(&attrs, &decl.description, name, Inherited::default())?;
    let inherited = Inherited::from(&common);

    let mut siblings = Siblings::default();
    let mut requests = Vec::with_capacity(decl.children.len());
    for child in &decl.children {
        let request = match child.kind {
            DeclKind::Instance => {
                build_instance(child, &path, inherited, binder)?.map(MapChild::Instance)
            }
            DeclKind::InstanceArray => {
                build_instance_array(child, &path, inherited, binder)?.map(MapChild::InstanceArray)
            }
            _ => return Err(misplaced(decl.kind, &path, child)),
        };
        siblings.insert(&request.path)?;
        requests.push(request);
    }

    let mut space = Space::new(&BinaryPlacer, &LinearResizer);
    lay_out(&mut space, &path, requests)?;
    let size = space
        .resolve_size(attrs.int("size")?)
        .map_err(|err| BuildError::placement(&path, err))?;
    tracing::debug!(%path, base, width, size, instances = space.len(), "memory map built");

    Ok(MemoryMap {
        common,
        base,
        width,
        size,
        space,
    })
}

fn build_instance(
    decl: &Decl,
    parent: &ElementPath,
    inherited: Inherited,
    binder: &Binder,
) -> BuildResult<Request<Instance>> {
    let path = child_path(parent, decl);
    let attrs = Attrs::new(decl, &path, &INSTANCE_ATTRS)?;
    let name = attrs.required("name")?;
    let offset = attrs.int("offset")?;
    let extern_name = attrs.string("extern").unwrap_or(name);
    let common = resolve_common(&attrs, &decl.description, name, inherited)?;
    let binding = binder.bind(&path, extern_name)?;
    let size = binding.byte_size().ok_or_else(|| {
        BuildError::invalid_attribute(
            &path,
            "extern",
            format!("component `{extern_name}` does not fit in a 64-bit byte address space"),
        )
    })?;
    tracing::trace!(%path, component = extern_name, size, "bound");

    Ok(Request::new(
        Instance {
            common,
            offset: 0,
            extern_name: extern_name.to_string(),
            binding,
        },
        path,
        offset,
        size,
    ))
}

fn build_instance_array(
    decl: &Decl,
    parent: &ElementPath,
    inherited: Inherited,
    binder: &Binder,
) -> BuildResult<Request<InstanceArray>> {
    let array = ArrayDecl::parse(decl, parent, DeclKind::Instance)?;
    let common = array.common(inherited)?;
    let template = build_instance(array.template, &array.path, Inherited::from(&common), binder)?;
    let Frame {
        space,
        framesize,
        size,
    } = array.frame(template)?;

    Ok(Request::new(
        InstanceArray {
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
    ))
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
