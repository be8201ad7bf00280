//! Fully-explicit declarations.
//!
//! Writes the resolved tree back out as declarations in which every
//! attribute that was inferred, inherited or defaulted is spelled out.
//! Rebuilding from the output reproduces the same layout, so it can be
//! checked in to freeze addresses that must no longer move.

use std::io::Write;

use rmap_ir::visitor::{visit_children, Traversal, VisitError, VisitResult, Visitor};
use rmap_ir::{Decl, DeclKind, ElementKind, ElementPath, ElementRef};

use super::layout_attrs;

/// Accumulating backend producing one JSON declaration per root.
pub struct ExplicitOutput<W: Write> {
    writer: W,
    root: ElementPath,
}

impl<W: Write> ExplicitOutput<W> {
    pub fn new(writer: W) -> Self {
        ExplicitOutput {
            writer,
            root: ElementPath::default(),
        }
    }
}

impl<'tree, W: Write> Visitor<'tree> for ExplicitOutput<W> {
    type Output = Decl;

    /// Every kind is handled alike: its own attributes, then its children.
    fn default_visit(&mut self, element: ElementRef<'tree>) -> VisitResult<Decl> {
        let common = element.common();
        let mut decl = Decl::named(decl_kind(element.kind()), common.name.as_str());
        for (key, value) in layout_attrs(element) {
            decl = decl.attr(key, value);
        }
        decl = decl
            .attr("readOnly", common.read_only.to_string())
            .attr("writeOnly", common.write_only.to_string())
            .attr("format", common.format.as_str());
        decl.description.clone_from(&common.description);
        decl.children = visit_children(self, element)?;
        Ok(decl)
    }
}

impl<'tree, W: Write> Traversal<'tree> for ExplicitOutput<W> {
    type Artifact = W;

    fn begin(&mut self, root: ElementRef<'tree>) -> VisitResult<()> {
        self.root = root.path().clone();
        Ok(())
    }

    fn finish(mut self, decl: Decl) -> VisitResult<W> {
        let emit_error = |err: std::io::Error| VisitError::emit(&self.root, err);
        serde_json::to_writer_pretty(&mut self.writer, &decl)
            .map_err(|err| VisitError::emit(&self.root, err))?;
        writeln!(self.writer).map_err(emit_error)?;
        self.writer.flush().map_err(emit_error)?;
        Ok(self.writer)
    }
}

fn decl_kind(kind: ElementKind) -> DeclKind {
    match kind {
        ElementKind::Component => DeclKind::Component,
        ElementKind::RegisterArray => DeclKind::RegisterArray,
        ElementKind::Register => DeclKind::Register,
        ElementKind::FieldArray => DeclKind::FieldArray,
        ElementKind::Field => DeclKind::Field,
        ElementKind::Enum => DeclKind::Enum,
        ElementKind::MemoryMap => DeclKind::MemoryMap,
        ElementKind::InstanceArray => DeclKind::InstanceArray,
        ElementKind::Instance => DeclKind::Instance,
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use std::collections::BTreeMap;
    use std::io;

    use pretty_assertions::assert_eq;
    use rmap_build::{BuildConfig, Corpus};
    use rmap_ir::visitor::execute;

    use super::*;

    fn attrs(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn render(decls: &[Decl]) -> Decl {
        let corpus = Corpus::build(decls, &BuildConfig::default()).unwrap();
        let root = corpus.roots().next().unwrap();
        let bytes = execute(ExplicitOutput::new(Vec::new()), root).unwrap();
        assert_eq!(bytes.last(), Some(&b'\n'));
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_every_attribute_is_written() {
        let decl = Decl::named(DeclKind::Component, "C")
            .attr("width", "32")
            .attr("readOnly", "1")
            .describe("Status block.")
            .child(
                Decl::named(DeclKind::Register, "STATUS").child(
                    Decl::named(DeclKind::Field, "LEVEL")
                        .attr("size", "3")
                        .attr("format", "unsigned")
                        .child(Decl::named(DeclKind::Enum, "LOW"))
                        .child(Decl::named(DeclKind::Enum, "HIGH").attr("value", "7")),
                ),
            );
        let out = render(&[decl]);

        assert_eq!(
            out.attrs,
            attrs(&[
                ("name", "C"),
                ("width", "32"),
                ("size", "1"),
                ("readOnly", "true"),
                ("writeOnly", "false"),
                ("format", "bits"),
            ])
        );
        assert_eq!(out.description, ["Status block."]);

        let register = &out.children[0];
        assert_eq!(
            register.attrs,
            attrs(&[
                ("name", "STATUS"),
                ("offset", "0"),
                ("width", "32"),
                ("reset", "0x0"),
                ("readOnly", "true"),
                ("writeOnly", "false"),
                ("format", "bits"),
            ])
        );

        let field = &register.children[0];
        assert_eq!(field.kind, DeclKind::Field);
        assert_eq!(field.get("offset"), Some("0"));
        assert_eq!(field.get("size"), Some("3"));
        assert_eq!(field.get("format"), Some("unsigned"));
        assert_eq!(field.get("readOnly"), Some("true"));

        let values: Vec<_> = field
            .children
            .iter()
            .map(|e| (e.name().unwrap(), e.get("value").unwrap()))
            .collect();
        assert_eq!(values, [("LOW", "0"), ("HIGH", "7")]);
    }

    #[test]
    fn test_array_and_instance_attributes() {
        let component = Decl::named(DeclKind::Component, "UART")
            .attr("width", "32")
            .child(
                Decl::named(DeclKind::RegisterArray, "FIFO")
                    .attr("count", "3")
                    .child(Decl::named(DeclKind::Register, "FIFO")),
            );
        let map = Decl::named(DeclKind::MemoryMap, "SOC")
            .attr("base", "0x4000_0000")
            .child(Decl::named(DeclKind::Instance, "uart0").attr("extern", "UART"));
        let corpus = Corpus::build(&[component, map], &BuildConfig::default()).unwrap();

        let uart = execute(
            ExplicitOutput::new(Vec::new()),
            ElementRef::Component(corpus.component("UART").unwrap()),
        )
        .unwrap();
        let uart: Decl = serde_json::from_slice(&uart).unwrap();
        let fifo = &uart.children[0];
        assert_eq!(fifo.get("count"), Some("3"));
        assert_eq!(fifo.get("framesize"), Some("1"));
        assert_eq!(fifo.get("size"), Some("3"));

        let soc = execute(
            ExplicitOutput::new(Vec::new()),
            ElementRef::MemoryMap(corpus.memory_map("SOC").unwrap()),
        )
        .unwrap();
        let soc: Decl = serde_json::from_slice(&soc).unwrap();
        assert_eq!(soc.get("base"), Some("0x40000000"));
        let instance = &soc.children[0];
        assert_eq!(instance.get("extern"), Some("UART"));
        assert!(instance.children.is_empty());
    }

    #[derive(Debug)]
    struct Broken;

    impl Write for Broken {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::other("disk full"))
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_an_emit_error() {
        let corpus = Corpus::build(
            &[Decl::named(DeclKind::Component, "C").attr("width", "8")],
            &BuildConfig::default(),
        )
        .unwrap();
        let err = execute(ExplicitOutput::new(Broken), corpus.roots().next().unwrap()).unwrap_err();
        assert!(matches!(err, VisitError::Emit { .. }));
        assert_eq!(err.path(), &ElementPath::root("C"));
    }
}
