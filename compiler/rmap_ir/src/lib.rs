//! rmap IR - Register-Map Element Tree
//!
//! This crate contains the core data structures of the register-map compiler:
//! - Declarations: the order-preserving input contract ([`Decl`])
//! - Elements: the fully-resolved layout tree ([`Component`], [`MemoryMap`], ...)
//! - Paths: ancestor-qualified element names for diagnostics ([`ElementPath`])
//! - Traversal: the visitor protocol output backends are written against
//!
//! # Tree Shape
//!
//! ```text
//! Component (words)                 MemoryMap (bytes)
//! ├── Register (bits)               ├── Instance ──► Arc<Component>
//! │   ├── Field                     └── InstanceArray
//! │   │   └── Enum                      └── Instance (template)
//! │   └── FieldArray
//! │       └── Field (template)
//! └── RegisterArray
//!     └── Register (template)
//! ```
//!
//! Every container owns exactly one [`Space`](rmap_space::Space) holding its
//! children in address order. Field enums are values rather than ranges and
//! are kept in declaration order.
//!
//! # Design Philosophy
//!
//! - **Closed sum types**: element kinds are enums, matched exhaustively
//! - **Resolved attributes**: inheritance is settled at construction, so
//!   reading an attribute never walks up the tree
//! - **Immutable after build**: backends read the tree, never mutate it

mod decl;
mod element;
mod path;
pub mod visitor;

pub use decl::{AddressUnit, Decl, DeclKind};
pub use element::{
    Access, Common, Component, ComponentChild, Element, ElementKind, ElementRef, Enum, Field,
    FieldArray, Format, Instance, InstanceArray, MapChild, MemoryMap, Register, RegisterArray,
    RegisterChild,
};
pub use path::ElementPath;
