//! Indented outline of the resolved tree.
//!
//! ```text
//! component DIO (size=2)
//!     Digital IO block.
//!     (0) CTRL (reset=0x0)
//!         Field MODE (offset=1,size=2)
//!             OFF = 0
//! ```
//!
//! Registers and instances lead with their offset; other kinds list their
//! layout attributes. ` RO`/` WO` marks restricted access. Descriptions are
//! wrapped one level deeper than their element.

use rmap_ir::visitor::{visit_children, Emitter, Traversal, VisitResult, Visitor};
use rmap_ir::{
    Component, ElementRef, Enum, Field, FieldArray, Format, Instance, InstanceArray, MemoryMap,
    Register, RegisterArray,
};

use super::{access_note, layout_attrs};

/// Column at which description text wraps.
pub const MAX_LINE_WIDTH: usize = 100;

const INDENT_WIDTH: usize = 4;

/// Streaming tree backend.
pub struct TreeOutput<E: Emitter> {
    emitter: E,
    level: usize,
}

impl<E: Emitter> TreeOutput<E> {
    pub fn new(emitter: E) -> Self {
        TreeOutput { emitter, level: 0 }
    }

    /// Emit `line`, then the element's description and children one level
    /// deeper.
    fn headline(&mut self, line: &str, element: ElementRef<'_>) -> VisitResult<()> {
        self.emitter.emit_line(self.level, line);
        self.level += 1;
        let width = MAX_LINE_WIDTH.saturating_sub(self.level * INDENT_WIDTH);
        for paragraph in &element.common().description {
            for text in wrap(paragraph, width) {
                self.emitter.emit_line(self.level, &text);
            }
        }
        let children = visit_children(self, element).map(drop);
        self.level -= 1;
        children
    }

    /// `{Kind} {name} ({attr}={value},...)` for kinds without a shorter form.
    fn attribute_line(&mut self, element: ElementRef<'_>) -> VisitResult<()> {
        let mut attrs: Vec<String> = layout_attrs(element)
            .into_iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect();
        let format = element.common().format;
        if format != Format::Bits {
            attrs.push(format!("format={format}"));
        }
        let line = format!(
            "{} {} ({}{})",
            element.kind(),
            element.name(),
            attrs.join(","),
            access_note(element)
        );
        self.headline(&line, element)
    }
}

impl<'tree, E: Emitter> Visitor<'tree> for TreeOutput<E> {
    type Output = ();

    fn visit_component(&mut self, component: &'tree Component) -> VisitResult<()> {
        let element = ElementRef::Component(component);
        let line = format!(
            "component {} (size={}{})",
            component.common.name,
            component.size,
            access_note(element)
        );
        self.headline(&line, element)
    }

    fn visit_register_array(&mut self, array: &'tree RegisterArray) -> VisitResult<()> {
        self.attribute_line(ElementRef::RegisterArray(array))
    }

    fn visit_register(&mut self, register: &'tree Register) -> VisitResult<()> {
        let element = ElementRef::Register(register);
        let line = format!(
            "({}) {} (reset={:#x}{})",
            register.offset,
            register.common.name,
            register.reset,
            access_note(element)
        );
        self.headline(&line, element)
    }

    fn visit_field_array(&mut self, array: &'tree FieldArray) -> VisitResult<()> {
        self.attribute_line(ElementRef::FieldArray(array))
    }

    fn visit_field(&mut self, field: &'tree Field) -> VisitResult<()> {
        self.attribute_line(ElementRef::Field(field))
    }

    fn visit_enum(&mut self, value: &'tree Enum) -> VisitResult<()> {
        let line = format!("{} = {}", value.common.name, value.value);
        self.headline(&line, ElementRef::Enum(value))
    }

    fn visit_memory_map(&mut self, map: &'tree MemoryMap) -> VisitResult<()> {
        self.attribute_line(ElementRef::MemoryMap(map))
    }

    fn visit_instance_array(&mut self, array: &'tree InstanceArray) -> VisitResult<()> {
        self.attribute_line(ElementRef::InstanceArray(array))
    }

    fn visit_instance(&mut self, instance: &'tree Instance) -> VisitResult<()> {
        let line = format!(
            "({}) {} {}",
            instance.offset, instance.extern_name, instance.common.name
        );
        self.headline(&line, ElementRef::Instance(instance))
    }
}

impl<'tree, E: Emitter> Traversal<'tree> for TreeOutput<E> {
    type Artifact = E;

    fn finish(self, (): ()) -> VisitResult<E> {
        Ok(self.emitter)
    }
}

/// Greedy word wrap. A word longer than `width` gets a line to itself.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut line = String::new();
    for word in text.split_whitespace() {
        if !line.is_empty() && line.len() + 1 + word.len() > width {
            lines.push(std::mem::take(&mut line));
        }
        if !line.is_empty() {
            line.push(' ');
        }
        line.push_str(word);
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use pretty_assertions::assert_eq;
    use rmap_build::{BuildConfig, Corpus};
    use rmap_ir::visitor::{execute, StringEmitter};
    use rmap_ir::{Decl, DeclKind};

    use super::*;

    fn dio() -> Decl {
        Decl::named(DeclKind::Component, "DIO")
            .attr("width", "16")
            .describe("Digital IO block.")
            .child(
                Decl::named(DeclKind::Register, "CTRL")
                    .child(Decl::named(DeclKind::Field, "EN"))
                    .child(
                        Decl::named(DeclKind::Field, "MODE")
                            .attr("size", "2")
                            .child(Decl::named(DeclKind::Enum, "OFF"))
                            .child(Decl::named(DeclKind::Enum, "ON")),
                    ),
            )
            .child(
                Decl::named(DeclKind::Register, "DATA")
                    .attr("readOnly", "true")
                    .attr("format", "unsigned"),
            )
    }

    fn render(root: ElementRef<'_>) -> String {
        execute(TreeOutput::new(StringEmitter::new()), root)
            .unwrap()
            .output()
    }

    #[test]
    fn test_component_tree() {
        let corpus = Corpus::build(&[dio()], &BuildConfig::default()).unwrap();
        let root = corpus.roots().next().unwrap();
        assert_eq!(
            render(root),
            "\
component DIO (size=2)
    Digital IO block.
    (0) CTRL (reset=0x0)
        Field EN (offset=0,size=1)
        Field MODE (offset=1,size=2)
            OFF = 0
            ON = 1
    (1) DATA (reset=0x0 RO)
"
        );
    }

    #[test]
    fn test_memory_map_stops_at_instances() {
        let map = Decl::named(DeclKind::MemoryMap, "SOC").child(
            Decl::named(DeclKind::Instance, "dio0")
                .attr("extern", "DIO")
                .attr("offset", "0x10"),
        );
        let corpus = Corpus::build(&[dio(), map], &BuildConfig::default()).unwrap();
        let root = ElementRef::MemoryMap(corpus.memory_map("SOC").unwrap());
        assert_eq!(
            render(root),
            "\
MemoryMap SOC (base=0x80000000,width=32,size=20)
    (16) DIO dio0
"
        );
    }

    #[test]
    fn test_attribute_line_notes_format_and_access() {
        let decl = Decl::named(DeclKind::Component, "C").attr("width", "32").child(
            Decl::named(DeclKind::Register, "R").child(
                Decl::named(DeclKind::Field, "TEMP")
                    .attr("size", "8")
                    .attr("format", "signed")
                    .attr("writeOnly", "yes"),
            ),
        );
        let corpus = Corpus::build(&[decl], &BuildConfig::default()).unwrap();
        let text = render(corpus.roots().next().unwrap());
        assert!(
            text.contains("        Field TEMP (offset=0,size=8,format=signed WO)\n"),
            "{text}"
        );
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("one two three", 7), ["one two", "three"]);
        assert_eq!(wrap("  spaced   out  ", 100), ["spaced out"]);
        assert_eq!(wrap("unbreakable", 4), ["unbreakable"]);
        assert!(wrap("", 10).is_empty());
    }

    #[test]
    fn test_long_description_wraps_at_indent() {
        let words = vec!["word"; 30].join(" ");
        let decl = Decl::named(DeclKind::Component, "C")
            .attr("width", "8")
            .describe(words);
        let corpus = Corpus::build(&[decl], &BuildConfig::default()).unwrap();
        let text = render(corpus.roots().next().unwrap());
        let lines: Vec<_> = text.lines().skip(1).collect();
        assert_eq!(lines.len(), 2);
        for line in lines {
            assert!(line.starts_with("    word"));
            assert!(line.len() <= MAX_LINE_WIDTH);
        }
    }
}
