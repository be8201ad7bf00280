//! Output backends.
//!
//! - [`TreeOutput`]: streaming, writes an indented outline as it visits
//! - [`ExplicitOutput`]: accumulating, rebuilds a declaration tree with
//!   every resolved attribute spelled out and serializes it as JSON

mod explicit;
mod tree;

use std::io::Write;

use rmap_ir::visitor::{execute, VisitError, VisitResult, WriteEmitter};
use rmap_ir::ElementRef;

use crate::OutputFormat;

pub use explicit::ExplicitOutput;
pub use tree::{TreeOutput, MAX_LINE_WIDTH};

/// Run the `format` backend over `root`, writing to `writer`.
///
/// # Errors
///
/// Returns the traversal's error, or an [`VisitError::Emit`] when writing
/// fails.
pub fn render<W: Write>(format: OutputFormat, root: ElementRef<'_>, writer: W) -> VisitResult<W> {
    match format {
        OutputFormat::Tree => execute(TreeOutput::new(WriteEmitter::new(writer)), root)?
            .finish()
            .map_err(|err| VisitError::emit(root.path(), err)),
        OutputFormat::Explicit => execute(ExplicitOutput::new(writer), root),
    }
}

/// The layout attributes of `element` beyond the common ones, in source
/// spelling and order.
pub(crate) fn layout_attrs(element: ElementRef<'_>) -> Vec<(&'static str, String)> {
    match element {
        ElementRef::Component(c) => vec![
            ("width", c.width.to_string()),
            ("size", c.size.to_string()),
        ],
        ElementRef::RegisterArray(a) => array_attrs(a.offset, a.count, a.framesize, a.size),
        ElementRef::Register(r) => vec![
            ("offset", r.offset.to_string()),
            ("width", r.width.to_string()),
            ("reset", format!("{:#x}", r.reset)),
        ],
        ElementRef::FieldArray(a) => array_attrs(a.offset, a.count, a.framesize, a.size),
        ElementRef::Field(f) => vec![
            ("offset", f.offset.to_string()),
            ("size", f.size.to_string()),
        ],
        ElementRef::Enum(e) => vec![("value", e.value.to_string())],
        ElementRef::MemoryMap(m) => vec![
            ("base", format!("{:#x}", m.base)),
            ("width", m.width.to_string()),
            ("size", m.size.to_string()),
        ],
        ElementRef::InstanceArray(a) => array_attrs(a.offset, a.count, a.framesize, a.size),
        ElementRef::Instance(i) => vec![
            ("offset", i.offset.to_string()),
            ("extern", i.extern_name.clone()),
        ],
    }
}

fn array_attrs(offset: u64, count: u64, framesize: u64, size: u64) -> Vec<(&'static str, String)> {
    vec![
        ("offset", offset.to_string()),
        ("count", count.to_string()),
        ("framesize", framesize.to_string()),
        ("size", size.to_string()),
    ]
}

/// ` RO`, ` WO` or nothing.
pub(crate) fn access_note(element: ElementRef<'_>) -> &'static str {
    let common = element.common();
    if common.read_only {
        " RO"
    } else if common.write_only {
        " WO"
    } else {
        ""
    }
}
