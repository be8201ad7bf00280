//! Registers, fields and enums.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{
    Decl, DeclKind, ElementPath, Enum, Field, FieldArray, Register, RegisterChild,
};
use rmap_space::{BinaryPlacer, LinearPlacer, LinearResizer, Space};

use crate::array::{ArrayDecl, Frame};
use crate::attrs::Attrs;
use crate::inherit::{resolve_common, Inherited};
use crate::layout::{child_path, lay_out, misplaced, Request, Siblings};

const REGISTER_ATTRS: [&str; 4] = ["offset", "size", "width", "reset"];
const FIELD_ATTRS: [&str; 2] = ["offset", "size"];
const ENUM_ATTRS: [&str; 1] = ["value"];

/// What a register inherits from its component (or register array).
#[derive(Copy, Clone, Debug)]
pub(crate) struct RegisterScope {
    /// The component's word width in bits.
    pub word_width: u32,
    pub inherited: Inherited,
}

/// Whether `value` fits in `bits` bits.
fn fits(value: u64, bits: u64) -> bool {
    bits >= 64 || value >> bits == 0
}

pub(crate) fn build_register(
    decl: &Decl,
    parent: &ElementPath,
    scope: &RegisterScope,
) -> BuildResult<Request<Register>> {
    let path = child_path(parent, decl);
    let attrs = Attrs::new(decl, &path, &REGISTER_ATTRS)?;
    let name = attrs.required("name")?;
    let offset = attrs.int("offset")?;
    if let Some(size) = attrs.int("size")? {
        if size != 1 {
            return Err(BuildError::invalid_attribute(
                &path,
                "size",
                format!("a register occupies exactly one word, not {size}"),
            ));
        }
    }
    let width = match attrs.int("width")? {
        None => scope.word_width,
        Some(width) => match u32::try_from(width) {
            Ok(width) if (1..=scope.word_width).contains(&width) => width,
            _ => {
                return Err(BuildError::InvalidWidth {
                    path,
                    width,
                    reason: format!("must be between 1 and the word width {}", scope.word_width),
                })
            }
        },
    };
    let reset = attrs.int("reset")?.unwrap_or(0);
    if !fits(reset, u64::from(width)) {
        return Err(BuildError::field_range(
            &path,
            format!("reset value {reset:#x} does not fit in {width} bits"),
        ));
    }
    let common = resolve_common(&attrs, &decl.description, name, scope.inherited)?;
    let inherited = Inherited::from(&common);

    let mut siblings = Siblings::default();
    let mut requests = Vec::with_capacity(decl.children.len());
    for child in &decl.children {
        let request = match child.kind {
            DeclKind::Field => build_field(child, &path, inherited)?.map(RegisterChild::Field),
            DeclKind::FieldArray => {
                build_field_array(child, &path, inherited)?.map(RegisterChild::FieldArray)
            }
            _ => return Err(misplaced(decl.kind, &path, child)),
        };
        siblings.insert(&request.path)?;
        requests.push(request);
    }

    let mut space = Space::new(&LinearPlacer, &LinearResizer);
    lay_out(&mut space, &path, requests).map_err(|err| match err {
        BuildError::Overlap {
            path,
            start,
            size,
            blocker_start,
            blocker_size,
        } => BuildError::field_range(
            &path,
            format!(
                "bits {start}..{} overlap bits {blocker_start}..{}",
                start + size,
                blocker_start + blocker_size
            ),
        ),
        other => other,
    })?;
    if let Some(outside) = space.items().find(|p| p.end() > u64::from(width)) {
        return Err(BuildError::field_range(
            outside.item.as_element().path(),
            format!(
                "bits {}..{} exceed the {width}-bit register",
                outside.start,
                outside.end()
            ),
        ));
    }
    space
        .resolve_size(Some(u64::from(width)))
        .map_err(|err| BuildError::placement(&path, err))?;

    Ok(Request::new(
        Register {
            common,
            offset: 0,
            width,
            reset,
            space,
        },
        path,
        offset,
        1,
    ))
}

fn build_field(
    decl: &Decl,
    parent: &ElementPath,
    inherited: Inherited,
) -> BuildResult<Request<Field>> {
    let path = child_path(parent, decl);
    let attrs = Attrs::new(decl, &path, &FIELD_ATTRS)?;
    let name = attrs.required("name")?;
    let offset = attrs.int("offset")?;
    let size = attrs.positive("size")?.unwrap_or(1);
    let common = resolve_common(&attrs, &decl.description, name, inherited)?;
    let enums = build_enums(decl, &path, size, Inherited::from(&common))?;

    Ok(Request::new(
        Field {
            common,
            offset: 0,
            size,
            enums,
        },
        path,
        offset,
        size,
    ))
}

/// Build a field's enums in declaration order, numbering the ones without
/// a value as one past the largest value seen so far.
fn build_enums(
    field: &Decl,
    field_path: &ElementPath,
    size: u64,
    inherited: Inherited,
) -> BuildResult<Vec<Enum>> {
    let mut siblings = Siblings::default();
    let mut enums = Vec::with_capacity(field.children.len());
    let mut max_seen: Option<u64> = None;

    for decl in &field.children {
        if decl.kind != DeclKind::Enum {
            return Err(misplaced(field.kind, field_path, decl));
        }
        let path = child_path(field_path, decl);
        let attrs = Attrs::new(decl, &path, &ENUM_ATTRS)?;
        let name = attrs.required("name")?;
        siblings.insert(&path)?;

        let value = match (attrs.int("value")?, max_seen) {
            (Some(value), _) => value,
            (None, None) => 0,
            (None, Some(max)) => max.checked_add(1).ok_or_else(|| {
                BuildError::field_range(&path, "no value left after the largest so far")
            })?,
        };
        if !fits(value, size) {
            return Err(BuildError::field_range(
                &path,
                format!("value {value} does not fit in the {size}-bit field"),
            ));
        }
        max_seen = Some(max_seen.map_or(value, |max| max.max(value)));

        let common = resolve_common(&attrs, &decl.description, name, inherited)?;
        enums.push(Enum { common, value });
    }
    Ok(enums)
}

fn build_field_array(
    decl: &Decl,
    parent: &ElementPath,
    inherited: Inherited,
) -> BuildResult<Request<FieldArray>> {
    let array = ArrayDecl::parse(decl, parent, DeclKind::Field)?;
    let common = array.common(inherited)?;
    let template = build_field(array.template, &array.path, Inherited::from(&common))?;
    let Frame {
        space,
        framesize,
        size,
    } = array.frame(template)?;

    Ok(Request::new(
        FieldArray {
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
