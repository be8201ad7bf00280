//! Shared handling of register, field and instance arrays.
//!
//! An array holds exactly one template child in a frame space. The frame
//! uses binary placement and resizing, so the template sits at an aligned
//! position and the frame is a power of two, unless `framesize` is given,
//! in which case it is only validated.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Common, Decl, DeclKind, ElementPath};
use rmap_space::{BinaryPlacer, BinaryResizer, Space};

use crate::attrs::Attrs;
use crate::inherit::{resolve_common, Inherited};
use crate::layout::{lay_out, misplaced, Positioned, Request};

const ARRAY_ATTRS: [&str; 4] = ["offset", "count", "framesize", "size"];

/// An array declaration with its header attributes parsed.
pub(crate) struct ArrayDecl<'d> {
    decl: &'d Decl,
    pub path: ElementPath,
    pub template: &'d Decl,
    pub offset: Option<u64>,
    pub count: u64,
    framesize: Option<u64>,
    size: Option<u64>,
}

/// The placed template and the array's resolved sizes.
pub(crate) struct Frame<T> {
    pub space: Space<T>,
    pub framesize: u64,
    pub size: u64,
}

impl<'d> ArrayDecl<'d> {
    /// Parse the header of an array whose template must be a `template_kind`.
    pub(crate) fn parse(
        decl: &'d Decl,
        parent: &ElementPath,
        template_kind: DeclKind,
    ) -> BuildResult<Self> {
        let provisional = parent.child(decl.name().unwrap_or(decl.kind.as_str()));
        let template = match decl.children.as_slice() {
            [template] => template,
            children => {
                return Err(BuildError::invalid_structure(
                    &provisional,
                    format!(
                        "an array needs exactly one {template_kind} template, found {}",
                        children.len()
                    ),
                ))
            }
        };
        if template.kind != template_kind {
            return Err(misplaced(decl.kind, &provisional, template));
        }

        let Some(name) = decl.name().or(template.name()) else {
            return Err(BuildError::invalid_structure(
                &provisional,
                "an array needs a name, either its own or its template's",
            ));
        };
        let path = parent.child(name);
        let attrs = Attrs::new(decl, &path, &ARRAY_ATTRS)?;
        let count = attrs.positive("count")?.ok_or_else(|| {
            BuildError::invalid_structure(&path, "an array requires the `count` attribute")
        })?;
        let offset = attrs.int("offset")?;
        let framesize = attrs.int("framesize")?;
        let size = attrs.int("size")?;

        Ok(ArrayDecl {
            decl,
            path,
            template,
            offset,
            count,
            framesize,
            size,
        })
    }

    pub(crate) fn common(&self, parent: Inherited) -> BuildResult<Common> {
        let attrs = Attrs::new(self.decl, &self.path, &ARRAY_ATTRS)?;
        resolve_common(&attrs, &self.decl.description, self.path.leaf(), parent)
    }

    /// Place the template in a frame and size the array.
    pub(crate) fn frame<T: Positioned>(&self, template: Request<T>) -> BuildResult<Frame<T>> {
        let mut space = Space::new(&BinaryPlacer, &BinaryResizer);
        lay_out(&mut space, &self.path, vec![template])?;
        let framesize = space
            .resolve_size(self.framesize)
            .map_err(|err| BuildError::placement(&self.path, err))?;
        let size = framesize.checked_mul(self.count).ok_or_else(|| {
            BuildError::invalid_attribute(
                &self.path,
                "count",
                format!("{} frames of {framesize} overflow the address space", self.count),
            )
        })?;
        if let Some(declared) = self.size {
            if declared != size {
                return Err(BuildError::ArraySize {
                    path: self.path.clone(),
                    declared,
                    framesize,
                    count: self.count,
                    expected: size,
                });
            }
        }
        tracing::debug!(path = %self.path, framesize, count = self.count, size, "array sized");
        Ok(Frame {
            space,
            framesize,
            size,
        })
    }
}
