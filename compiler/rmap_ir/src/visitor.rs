//! Element Tree Visitor
//!
//! The protocol every output backend is written against.
//!
//! # Design
//!
//! A [`Visitor`] has one handler per element kind. Every handler defaults to
//! [`Visitor::default_visit`], which fails with
//! [`VisitError::UnhandledElementKind`] so that a backend which forgets an
//! element kind is caught rather than silently skipping it. Override
//! `default_visit` to make the fallback a no-op.
//!
//! Handlers do not recurse on their own. A handler that wants its children
//! calls [`visit_children`] (address order) or [`visit`] on specific nodes.
//! An instance's bound component is not a child; reach it with
//! [`visit_binding`].
//!
//! Backends come in two shapes:
//! - **Streaming**: `Output = ()`, handlers write to an [`Emitter`]
//! - **Accumulating**: handlers return nodes the caller nests, and
//!   [`Traversal::finish`] serializes the root node
//!
//! # Example
//!
//! ```text
//! struct CountFields {
//!     count: usize,
//! }
//!
//! impl<'tree> Visitor<'tree> for CountFields {
//!     type Output = ();
//!
//!     fn default_visit(&mut self, element: ElementRef<'tree>) -> VisitResult<()> {
//!         visit_children(self, element).map(drop)
//!     }
//!
//!     fn visit_field(&mut self, _field: &'tree Field) -> VisitResult<()> {
//!         self.count += 1;
//!         Ok(())
//!     }
//! }
//! ```

mod emitter;

use std::fmt;

use crate::{
    Component, ElementKind, ElementPath, ElementRef, Enum, Field, FieldArray, Instance,
    InstanceArray, MemoryMap, Register, RegisterArray,
};

pub use emitter::{Emitter, StringEmitter, WriteEmitter};

/// Errors raised during a traversal.
///
/// A traversal error is fatal to that traversal only.
#[derive(Clone, Eq, PartialEq, Debug)]
pub enum VisitError {
    /// The traversal has no handler for an element kind it encountered.
    UnhandledElementKind {
        traversal: &'static str,
        kind: ElementKind,
        path: ElementPath,
    },
    /// Writing or serializing the output failed.
    Emit { path: ElementPath, message: String },
}

impl VisitError {
    pub fn emit(path: &ElementPath, err: impl fmt::Display) -> Self {
        VisitError::Emit {
            path: path.clone(),
            message: err.to_string(),
        }
    }

    pub fn path(&self) -> &ElementPath {
        match self {
            VisitError::UnhandledElementKind { path, .. } | VisitError::Emit { path, .. } => path,
        }
    }
}

impl fmt::Display for VisitError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VisitError::UnhandledElementKind {
                traversal,
                kind,
                path,
            } => write!(f, "{traversal} has no handler for {kind} `{path}`"),
            VisitError::Emit { path, message } => {
                write!(f, "failed to emit output for `{path}`: {message}")
            }
        }
    }
}

impl std::error::Error for VisitError {}

pub type VisitResult<T> = Result<T, VisitError>;

// Visitor Trait

/// Element tree visitor.
///
/// The tree is borrowed for `'tree`; the visitor may mutate its own state
/// but never the tree.
pub trait Visitor<'tree> {
    /// What each handler produces.
    type Output;

    /// Fallback for every kind without an overridden handler.
    fn default_visit(&mut self, element: ElementRef<'tree>) -> VisitResult<Self::Output> {
        Err(VisitError::UnhandledElementKind {
            traversal: std::any::type_name::<Self>(),
            kind: element.kind(),
            path: element.path().clone(),
        })
    }

    fn visit_component(&mut self, component: &'tree Component) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::Component(component))
    }

    fn visit_register_array(&mut self, array: &'tree RegisterArray) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::RegisterArray(array))
    }

    fn visit_register(&mut self, register: &'tree Register) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::Register(register))
    }

    fn visit_field_array(&mut self, array: &'tree FieldArray) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::FieldArray(array))
    }

    fn visit_field(&mut self, field: &'tree Field) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::Field(field))
    }

    fn visit_enum(&mut self, value: &'tree Enum) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::Enum(value))
    }

    fn visit_memory_map(&mut self, map: &'tree MemoryMap) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::MemoryMap(map))
    }

    fn visit_instance_array(&mut self, array: &'tree InstanceArray) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::InstanceArray(array))
    }

    fn visit_instance(&mut self, instance: &'tree Instance) -> VisitResult<Self::Output> {
        self.default_visit(ElementRef::Instance(instance))
    }
}

/// A visitor with setup and teardown around a whole-tree visit.
pub trait Traversal<'tree>: Visitor<'tree> {
    /// What the traversal produces once the tree has been visited.
    type Artifact;

    /// Called once with the root before it is visited.
    fn begin(&mut self, root: ElementRef<'tree>) -> VisitResult<()> {
        let _ = root;
        Ok(())
    }

    /// Called once with the output of the root's handler.
    fn finish(self, output: Self::Output) -> VisitResult<Self::Artifact>
    where
        Self: Sized;
}

// Walk Functions

/// Dispatch `element` to the handler for its kind.
pub fn visit<'tree, V: Visitor<'tree> + ?Sized>(
    visitor: &mut V,
    element: ElementRef<'tree>,
) -> VisitResult<V::Output> {
    match element {
        ElementRef::Component(e) => visitor.visit_component(e),
        ElementRef::RegisterArray(e) => visitor.visit_register_array(e),
        ElementRef::Register(e) => visitor.visit_register(e),
        ElementRef::FieldArray(e) => visitor.visit_field_array(e),
        ElementRef::Field(e) => visitor.visit_field(e),
        ElementRef::Enum(e) => visitor.visit_enum(e),
        ElementRef::MemoryMap(e) => visitor.visit_memory_map(e),
        ElementRef::InstanceArray(e) => visitor.visit_instance_array(e),
        ElementRef::Instance(e) => visitor.visit_instance(e),
    }
}

/// Visit the direct children of `element` in address order, collecting
/// their outputs. Stops at the first error.
pub fn visit_children<'tree, V: Visitor<'tree> + ?Sized>(
    visitor: &mut V,
    element: ElementRef<'tree>,
) -> VisitResult<Vec<V::Output>> {
    element
        .children()
        .into_iter()
        .map(|child| visit(visitor, child))
        .collect()
}

/// As [`visit_children`], from the highest address down.
///
/// Register descriptions are conventionally drawn MSB first.
pub fn visit_children_reversed<'tree, V: Visitor<'tree> + ?Sized>(
    visitor: &mut V,
    element: ElementRef<'tree>,
) -> VisitResult<Vec<V::Output>> {
    element
        .children()
        .into_iter()
        .rev()
        .map(|child| visit(visitor, child))
        .collect()
}

/// Visit the component bound to `instance`.
pub fn visit_binding<'tree, V: Visitor<'tree> + ?Sized>(
    visitor: &mut V,
    instance: &'tree Instance,
) -> VisitResult<V::Output> {
    visitor.visit_component(&instance.binding)
}

/// Run `traversal` over the tree rooted at `root`: begin, visit, finish.
#[tracing::instrument(level = "debug", skip_all, fields(root = %root.path()))]
pub fn execute<'tree, T: Traversal<'tree>>(
    mut traversal: T,
    root: ElementRef<'tree>,
) -> VisitResult<T::Artifact> {
    traversal.begin(root)?;
    let output = visit(&mut traversal, root)?;
    traversal.finish(output)
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
