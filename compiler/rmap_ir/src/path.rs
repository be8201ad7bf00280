//! Ancestor-qualified element paths.

use std::fmt;

/// The chain of names from a root element down to an element.
///
/// Displayed dot-separated, e.g. `DIO.CTRL.ENABLE`.
#[derive(Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Default)]
pub struct ElementPath {
    segments: Vec<String>,
}

impl ElementPath {
    /// Path of a root element.
    pub fn root(name: impl Into<String>) -> Self {
        ElementPath {
            segments: vec![name.into()],
        }
    }

    /// Path of a child of this element.
    #[must_use]
    pub fn child(&self, name: impl Into<String>) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend(self.segments.iter().cloned());
        segments.push(name.into());
        ElementPath { segments }
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The element's own name, empty for the empty path.
    pub fn leaf(&self) -> &str {
        self.segments.last().map_or("", String::as_str)
    }

    /// Path of the parent element, `None` at a root.
    pub fn parent(&self) -> Option<ElementPath> {
        let (_, ancestors) = self.segments.split_last()?;
        if ancestors.is_empty() {
            return None;
        }
        Some(ElementPath {
            segments: ancestors.to_vec(),
        })
    }

    pub fn depth(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

impl fmt::Display for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        f.write_str(&self.segments.join("."))
    }
}

impl fmt::Debug for ElementPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ElementPath({self})")
    }
}
