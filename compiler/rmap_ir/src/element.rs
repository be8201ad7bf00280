//! Resolved element tree.
//!
//! Every element embeds a [`Common`] record with the attributes all kinds
//! share, already resolved against its ancestors. Containers own a
//! [`Space`] of their children; offsets recorded on children are the
//! positions the space assigned them.

use std::fmt;
use std::sync::Arc;

use rmap_space::Space;

use crate::ElementPath;

/// Interpretation of the bits of a register or field.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Default)]
pub enum Format {
    #[default]
    Bits,
    Signed,
    Unsigned,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Bits => "bits",
            Format::Signed => "signed",
            Format::Unsigned => "unsigned",
        }
    }

    /// Parse the source spelling.
    pub fn parse(s: &str) -> Option<Format> {
        match s {
            "bits" => Some(Format::Bits),
            "signed" => Some(Format::Signed),
            "unsigned" => Some(Format::Unsigned),
            _ => None,
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Bus access permitted on an element, derived from `readOnly`/`writeOnly`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum Access {
    ReadWrite,
    ReadOnly,
    WriteOnly,
}

impl Access {
    pub fn is_readable(self) -> bool {
        self != Access::WriteOnly
    }

    pub fn is_writable(self) -> bool {
        self != Access::ReadOnly
    }
}

/// Attributes shared by every element kind.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Common {
    pub name: String,
    pub path: ElementPath,
    /// Description paragraphs in source order.
    pub description: Vec<String>,
    pub read_only: bool,
    pub write_only: bool,
    pub format: Format,
}

impl Common {
    pub fn access(&self) -> Access {
        match (self.read_only, self.write_only) {
            (true, _) => Access::ReadOnly,
            (false, true) => Access::WriteOnly,
            (false, false) => Access::ReadWrite,
        }
    }

    /// All description paragraphs joined by blank lines.
    pub fn description_text(&self) -> String {
        self.description.join("\n\n")
    }
}

/// The kind of an element.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ElementKind {
    Component,
    RegisterArray,
    Register,
    FieldArray,
    Field,
    Enum,
    MemoryMap,
    InstanceArray,
    Instance,
}

impl ElementKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ElementKind::Component => "Component",
            ElementKind::RegisterArray => "RegisterArray",
            ElementKind::Register => "Register",
            ElementKind::FieldArray => "FieldArray",
            ElementKind::Field => "Field",
            ElementKind::Enum => "Enum",
            ElementKind::MemoryMap => "MemoryMap",
            ElementKind::InstanceArray => "InstanceArray",
            ElementKind::Instance => "Instance",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Uniform access to any element.
pub trait Element {
    fn common(&self) -> &Common;

    fn kind(&self) -> ElementKind;

    fn as_element(&self) -> ElementRef<'_>;

    fn name(&self) -> &str {
        &self.common().name
    }

    fn path(&self) -> &ElementPath {
        &self.common().path
    }
}

// Components and registers

/// A logic block of registers; the root of a component description.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Component {
    pub common: Common,
    /// Word width in bits, a power of two of at least 8.
    pub width: u32,
    /// Size in words.
    pub size: u64,
    pub space: Space<ComponentChild>,
}

impl Component {
    /// Bytes per word.
    pub fn word_bytes(&self) -> u64 {
        u64::from(self.width / 8)
    }

    /// Size in bytes when mapped onto a byte-addressed bus, or `None` if
    /// that does not fit in a 64-bit address.
    pub fn byte_size(&self) -> Option<u64> {
        self.size.checked_mul(self.word_bytes())
    }
}

/// A child of a [`Component`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum ComponentChild {
    Register(Register),
    RegisterArray(RegisterArray),
}

impl ComponentChild {
    /// Offset within the component, in words.
    pub fn offset(&self) -> u64 {
        match self {
            ComponentChild::Register(r) => r.offset,
            ComponentChild::RegisterArray(a) => a.offset,
        }
    }

    pub fn set_offset(&mut self, offset: u64) {
        match self {
            ComponentChild::Register(r) => r.offset = offset,
            ComponentChild::RegisterArray(a) => a.offset = offset,
        }
    }

    pub fn as_element(&self) -> ElementRef<'_> {
        match self {
            ComponentChild::Register(r) => ElementRef::Register(r),
            ComponentChild::RegisterArray(a) => ElementRef::RegisterArray(a),
        }
    }
}

/// A block of `count` identical registers.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct RegisterArray {
    pub common: Common,
    /// Offset within the component, in words.
    pub offset: u64,
    pub count: u64,
    /// Words per repetition.
    pub framesize: u64,
    /// Total size in words, `framesize * count`.
    pub size: u64,
    /// The frame, holding the single template register.
    pub space: Space<Register>,
}

impl RegisterArray {
    pub fn template(&self) -> Option<&Register> {
        self.space.items().next().map(|p| &p.item)
    }
}

/// One word of a component.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Register {
    pub common: Common,
    /// Offset within the component (or array frame), in words.
    pub offset: u64,
    /// Significant bits, at most the component's word width.
    pub width: u32,
    /// Value after reset.
    pub reset: u64,
    /// Bit layout; empty for a plain scalar register.
    pub space: Space<RegisterChild>,
}

impl Register {
    pub fn has_fields(&self) -> bool {
        !self.space.is_empty()
    }
}

/// A child of a [`Register`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum RegisterChild {
    Field(Field),
    FieldArray(FieldArray),
}

impl RegisterChild {
    /// Offset within the register, in bits.
    pub fn offset(&self) -> u64 {
        match self {
            RegisterChild::Field(f) => f.offset,
            RegisterChild::FieldArray(a) => a.offset,
        }
    }

    pub fn set_offset(&mut self, offset: u64) {
        match self {
            RegisterChild::Field(f) => f.offset = offset,
            RegisterChild::FieldArray(a) => a.offset = offset,
        }
    }

    pub fn as_element(&self) -> ElementRef<'_> {
        match self {
            RegisterChild::Field(f) => ElementRef::Field(f),
            RegisterChild::FieldArray(a) => ElementRef::FieldArray(a),
        }
    }
}

/// A block of `count` identical fields.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct FieldArray {
    pub common: Common,
    /// LSB position within the register.
    pub offset: u64,
    pub count: u64,
    /// Bits per repetition.
    pub framesize: u64,
    /// Total size in bits, `framesize * count`.
    pub size: u64,
    /// The frame, holding the single template field.
    pub space: Space<Field>,
}

impl FieldArray {
    pub fn template(&self) -> Option<&Field> {
        self.space.items().next().map(|p| &p.item)
    }
}

/// A bit field of a register.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Field {
    pub common: Common,
    /// LSB position within the register (or array frame).
    pub offset: u64,
    /// Width in bits.
    pub size: u64,
    /// Named values, in declaration order.
    pub enums: Vec<Enum>,
}

/// A named value of a field.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Enum {
    pub common: Common,
    pub value: u64,
}

// Memory maps

/// A byte-addressed bus populated with component instances.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct MemoryMap {
    pub common: Common,
    /// Byte address of offset 0.
    pub base: u64,
    /// Bus width in bits.
    pub width: u32,
    /// Size in bytes.
    pub size: u64,
    pub space: Space<MapChild>,
}

/// A child of a [`MemoryMap`].
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum MapChild {
    Instance(Instance),
    InstanceArray(InstanceArray),
}

impl MapChild {
    /// Offset from the map's base, in bytes.
    pub fn offset(&self) -> u64 {
        match self {
            MapChild::Instance(i) => i.offset,
            MapChild::InstanceArray(a) => a.offset,
        }
    }

    pub fn set_offset(&mut self, offset: u64) {
        match self {
            MapChild::Instance(i) => i.offset = offset,
            MapChild::InstanceArray(a) => a.offset = offset,
        }
    }

    pub fn as_element(&self) -> ElementRef<'_> {
        match self {
            MapChild::Instance(i) => ElementRef::Instance(i),
            MapChild::InstanceArray(a) => ElementRef::InstanceArray(a),
        }
    }
}

/// A block of `count` identical instances.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct InstanceArray {
    pub common: Common,
    /// Offset from the map's base, in bytes.
    pub offset: u64,
    pub count: u64,
    /// Bytes per repetition.
    pub framesize: u64,
    /// Total size in bytes, `framesize * count`.
    pub size: u64,
    /// The frame, holding the single template instance.
    pub space: Space<Instance>,
}

impl InstanceArray {
    pub fn template(&self) -> Option<&Instance> {
        self.space.items().next().map(|p| &p.item)
    }
}

/// A component mapped onto a memory map.
///
/// The binding is shared: many instances may map the same component, and
/// none of them owns it.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Instance {
    pub common: Common,
    /// Offset from the map's base (or array frame), in bytes.
    pub offset: u64,
    /// Name of the bound component.
    pub extern_name: String,
    pub binding: Arc<Component>,
}

impl Instance {
    pub fn component(&self) -> &Component {
        &self.binding
    }

    /// Bytes occupied on the bus, `None` past the 64-bit address range.
    pub fn size(&self) -> Option<u64> {
        self.binding.byte_size()
    }
}

// Dispatch

/// A borrowed element of any kind.
#[derive(Copy, Clone, Debug)]
pub enum ElementRef<'a> {
    Component(&'a Component),
    RegisterArray(&'a RegisterArray),
    Register(&'a Register),
    FieldArray(&'a FieldArray),
    Field(&'a Field),
    Enum(&'a Enum),
    MemoryMap(&'a MemoryMap),
    InstanceArray(&'a InstanceArray),
    Instance(&'a Instance),
}

impl<'a> ElementRef<'a> {
    pub fn kind(self) -> ElementKind {
        match self {
            ElementRef::Component(_) => ElementKind::Component,
            ElementRef::RegisterArray(_) => ElementKind::RegisterArray,
            ElementRef::Register(_) => ElementKind::Register,
            ElementRef::FieldArray(_) => ElementKind::FieldArray,
            ElementRef::Field(_) => ElementKind::Field,
            ElementRef::Enum(_) => ElementKind::Enum,
            ElementRef::MemoryMap(_) => ElementKind::MemoryMap,
            ElementRef::InstanceArray(_) => ElementKind::InstanceArray,
            ElementRef::Instance(_) => ElementKind::Instance,
        }
    }

    pub fn common(self) -> &'a Common {
        match self {
            ElementRef::Component(e) => &e.common,
            ElementRef::RegisterArray(e) => &e.common,
            ElementRef::Register(e) => &e.common,
            ElementRef::FieldArray(e) => &e.common,
            ElementRef::Field(e) => &e.common,
            ElementRef::Enum(e) => &e.common,
            ElementRef::MemoryMap(e) => &e.common,
            ElementRef::InstanceArray(e) => &e.common,
            ElementRef::Instance(e) => &e.common,
        }
    }

    pub fn name(self) -> &'a str {
        &self.common().name
    }

    pub fn path(self) -> &'a ElementPath {
        &self.common().path
    }

    /// Offset within the parent, `None` for roots. Enums report their value.
    pub fn offset(self) -> Option<u64> {
        match self {
            ElementRef::Component(_) | ElementRef::MemoryMap(_) => None,
            ElementRef::RegisterArray(e) => Some(e.offset),
            ElementRef::Register(e) => Some(e.offset),
            ElementRef::FieldArray(e) => Some(e.offset),
            ElementRef::Field(e) => Some(e.offset),
            ElementRef::Enum(e) => Some(e.value),
            ElementRef::InstanceArray(e) => Some(e.offset),
            ElementRef::Instance(e) => Some(e.offset),
        }
    }

    /// Direct children: address order for spaces, declaration order for
    /// enums. An instance's bound component is not a child.
    pub fn children(self) -> Vec<ElementRef<'a>> {
        match self {
            ElementRef::Component(c) => c.space.items().map(|p| p.item.as_element()).collect(),
            ElementRef::RegisterArray(a) => a
                .space
                .items()
                .map(|p| ElementRef::Register(&p.item))
                .collect(),
            ElementRef::Register(r) => r.space.items().map(|p| p.item.as_element()).collect(),
            ElementRef::FieldArray(a) => {
                a.space.items().map(|p| ElementRef::Field(&p.item)).collect()
            }
            ElementRef::Field(f) => f.enums.iter().map(ElementRef::Enum).collect(),
            ElementRef::MemoryMap(m) => m.space.items().map(|p| p.item.as_element()).collect(),
            ElementRef::InstanceArray(a) => a
                .space
                .items()
                .map(|p| ElementRef::Instance(&p.item))
                .collect(),
            ElementRef::Enum(_) | ElementRef::Instance(_) => Vec::new(),
        }
    }
}

macro_rules! impl_element {
    ($($ty:ident),* $(,)?) => {
        $(
            impl Element for $ty {
                fn common(&self) -> &Common {
                    &self.common
                }

                fn kind(&self) -> ElementKind {
                    ElementKind::$ty
                }

                fn as_element(&self) -> ElementRef<'_> {
                    ElementRef::$ty(self)
                }
            }

            impl<'a> From<&'a $ty> for ElementRef<'a> {
                fn from(element: &'a $ty) -> Self {
                    ElementRef::$ty(element)
                }
            }
        )*
    };
}

impl_element!(
    Component,
    RegisterArray,
    Register,
    FieldArray,
    Field,
    Enum,
    MemoryMap,
    InstanceArray,
    Instance,
);

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
