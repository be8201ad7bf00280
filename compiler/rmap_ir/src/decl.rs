//! Declarations: the input contract of the compiler.
//!
//! A source reader produces one [`Decl`] tree per source description. A
//! declaration keeps attributes exactly as written (raw strings) and children
//! in source order. Absence of an optional attribute means "determine it
//! automatically"; there is no `auto` literal.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// The kind tag of a declaration.
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum DeclKind {
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

impl DeclKind {
    pub const ALL: [DeclKind; 9] = [
        DeclKind::Component,
        DeclKind::RegisterArray,
        DeclKind::Register,
        DeclKind::FieldArray,
        DeclKind::Field,
        DeclKind::Enum,
        DeclKind::MemoryMap,
        DeclKind::InstanceArray,
        DeclKind::Instance,
    ];

    /// The tag as written in source, e.g. `registerarray`.
    pub fn as_str(self) -> &'static str {
        match self {
            DeclKind::Component => "component",
            DeclKind::RegisterArray => "registerarray",
            DeclKind::Register => "register",
            DeclKind::FieldArray => "fieldarray",
            DeclKind::Field => "field",
            DeclKind::Enum => "enum",
            DeclKind::MemoryMap => "memorymap",
            DeclKind::InstanceArray => "instancearray",
            DeclKind::Instance => "instance",
        }
    }

    /// Unit the element's `offset` is measured in, `None` for roots and enums.
    pub fn unit(self) -> Option<AddressUnit> {
        match self {
            DeclKind::RegisterArray | DeclKind::Register => Some(AddressUnit::Word),
            DeclKind::FieldArray | DeclKind::Field => Some(AddressUnit::Bit),
            DeclKind::InstanceArray | DeclKind::Instance => Some(AddressUnit::Byte),
            DeclKind::Component | DeclKind::MemoryMap | DeclKind::Enum => None,
        }
    }

    /// Unit the element's own children are addressed in, `None` when its
    /// children are not placed in a space.
    pub fn space_unit(self) -> Option<AddressUnit> {
        match self {
            DeclKind::Component | DeclKind::RegisterArray => Some(AddressUnit::Word),
            DeclKind::Register | DeclKind::FieldArray => Some(AddressUnit::Bit),
            DeclKind::MemoryMap | DeclKind::InstanceArray => Some(AddressUnit::Byte),
            DeclKind::Field | DeclKind::Enum | DeclKind::Instance => None,
        }
    }

    pub fn is_array(self) -> bool {
        matches!(
            self,
            DeclKind::RegisterArray | DeclKind::FieldArray | DeclKind::InstanceArray
        )
    }

    pub fn is_root(self) -> bool {
        matches!(self, DeclKind::Component | DeclKind::MemoryMap)
    }
}

impl fmt::Display for DeclKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DeclKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DeclKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown element kind `{s}`"))
    }
}

/// The unit a space is addressed in.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum AddressUnit {
    /// Bits of a register.
    Bit,
    /// Words of a component; a word is the component's `width` bits.
    Word,
    /// Bytes of a memory map.
    Byte,
}

impl AddressUnit {
    pub fn as_str(self) -> &'static str {
        match self {
            AddressUnit::Bit => "bits",
            AddressUnit::Word => "words",
            AddressUnit::Byte => "bytes",
        }
    }
}

impl fmt::Display for AddressUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One source declaration with its children.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Decl {
    pub kind: DeclKind,
    /// Raw attribute values, prior to validation.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "BTreeMap::is_empty")
    )]
    pub attrs: BTreeMap<String, String>,
    /// Description paragraphs in source order.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub description: Vec<String>,
    /// Child declarations in source order.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<Decl>,
}

impl Decl {
    pub fn new(kind: DeclKind) -> Self {
        Decl {
            kind,
            attrs: BTreeMap::new(),
            description: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Declaration of `kind` with a `name` attribute.
    pub fn named(kind: DeclKind, name: impl Into<String>) -> Self {
        Decl::new(kind).attr("name", name)
    }

    #[must_use]
    pub fn attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(key.into(), value.into());
        self
    }

    #[must_use]
    pub fn describe(mut self, paragraph: impl Into<String>) -> Self {
        self.description.push(paragraph.into());
        self
    }

    #[must_use]
    pub fn child(mut self, child: Decl) -> Self {
        self.children.push(child);
        self
    }

    #[must_use]
    pub fn children(mut self, children: impl IntoIterator<Item = Decl>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn name(&self) -> Option<&str> {
        self.get("name")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_round_trips_through_str() {
        for kind in DeclKind::ALL {
            assert_eq!(kind.as_str().parse::<DeclKind>(), Ok(kind));
        }
        assert_eq!("RegisterArray".parse::<DeclKind>(), Ok(DeclKind::RegisterArray));
        assert!("desc".parse::<DeclKind>().is_err());
    }

    #[test]
    fn test_units() {
        assert_eq!(DeclKind::Field.unit(), Some(AddressUnit::Bit));
        assert_eq!(DeclKind::Register.space_unit(), Some(AddressUnit::Bit));
        assert_eq!(DeclKind::Component.space_unit(), DeclKind::Register.unit());
        assert_eq!(DeclKind::MemoryMap.space_unit(), DeclKind::Instance.unit());
        assert_eq!(DeclKind::Enum.unit(), None);
    }

    #[test]
    fn test_builder() {
        let decl = Decl::named(DeclKind::Register, "CTRL")
            .attr("offset", "0x4")
            .describe("Control register.")
            .child(Decl::named(DeclKind::Field, "EN"));
        assert_eq!(decl.name(), Some("CTRL"));
        assert_eq!(decl.get("offset"), Some("0x4"));
        assert_eq!(decl.children.len(), 1);
        assert_eq!(decl.description, vec!["Control register.".to_string()]);
    }
}
