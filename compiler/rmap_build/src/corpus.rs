//! The fully-resolved set of components and memory maps.

use std::sync::Arc;

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Component, Decl, DeclKind, ElementPath, ElementRef, MemoryMap};

use crate::binder::Binder;
use crate::component::build_component;
use crate::config::BuildConfig;
use crate::layout::Siblings;
use crate::memory_map::build_memory_map;

/// Every root of one compilation, immutable once built.
#[derive(Debug)]
pub struct Corpus {
    components: Vec<Arc<Component>>,
    memory_maps: Vec<MemoryMap>,
    binder: Binder,
}

/// A corpus construction error, with the index of the root declaration
/// that raised it.
#[derive(Clone, Debug)]
pub struct RootError {
    pub index: usize,
    pub error: BuildError,
}

impl RootError {
    fn at(index: usize) -> impl FnOnce(BuildError) -> RootError {
        move |error| RootError { index, error }
    }
}

impl Corpus {
    /// Build a corpus from root declarations.
    ///
    /// All components are built first, in source order, then the memory
    /// maps, whose instances may name any component regardless of where
    /// it was declared. Components and memory maps share one namespace.
    ///
    /// # Errors
    ///
    /// Returns the first construction, placement or binding error.
    pub fn build(decls: &[Decl], config: &BuildConfig) -> BuildResult<Corpus> {
        Corpus::build_roots(decls, config).map_err(|err| err.error)
    }

    /// As [`Corpus::build`], also reporting which root failed.
    ///
    /// # Errors
    ///
    /// Returns the first error, tagged with the index into `decls` of the
    /// root it came from.
    #[tracing::instrument(level = "debug", skip_all, fields(roots = decls.len()))]
    pub fn build_roots(decls: &[Decl], config: &BuildConfig) -> Result<Corpus, RootError> {
        let mut root_names = Siblings::default();
        let mut binder = Binder::new();
        let mut components = Vec::new();
        for (index, decl) in decls.iter().enumerate() {
            match decl.kind {
                DeclKind::Component => {
                    let component = build_component(decl).map_err(RootError::at(index))?;
                    root_names
                        .insert(&component.common.path)
                        .map_err(RootError::at(index))?;
                    let component = Arc::new(component);
                    binder
                        .register(Arc::clone(&component))
                        .map_err(RootError::at(index))?;
                    components.push(component);
                }
                DeclKind::MemoryMap => {}
                kind => {
                    return Err(RootError::at(index)(BuildError::invalid_structure(
                        &ElementPath::root(decl.name().unwrap_or(kind.as_str())),
                        format!("a {kind} cannot be a root; only components and memory maps can"),
                    )))
                }
            }
        }

        let mut memory_maps = Vec::new();
        let maps = decls
            .iter()
            .enumerate()
            .filter(|(_, d)| d.kind == DeclKind::MemoryMap);
        for (index, decl) in maps {
            let map = build_memory_map(decl, &binder, config).map_err(RootError::at(index))?;
            root_names.insert(&map.common.path).map_err(RootError::at(index))?;
            memory_maps.push(map);
        }

        tracing::debug!(
            components = components.len(),
            memory_maps = memory_maps.len(),
            "corpus built"
        );
        Ok(Corpus {
            components,
            memory_maps,
            binder,
        })
    }

    /// Components in source order.
    pub fn components(&self) -> &[Arc<Component>] {
        &self.components
    }

    /// Memory maps in source order.
    pub fn memory_maps(&self) -> &[MemoryMap] {
        &self.memory_maps
    }

    pub fn component(&self, name: &str) -> Option<&Component> {
        self.binder.lookup(name).map(Arc::as_ref)
    }

    pub fn memory_map(&self, name: &str) -> Option<&MemoryMap> {
        self.memory_maps.iter().find(|m| m.common.name == name)
    }

    /// Every root, components first, each in source order.
    pub fn roots(&self) -> impl Iterator<Item = ElementRef<'_>> {
        self.components
            .iter()
            .map(|c| ElementRef::Component(c.as_ref()))
            .chain(self.memory_maps.iter().map(ElementRef::MemoryMap))
    }

    pub fn binder(&self) -> &Binder {
        &self.binder
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty() && self.memory_maps.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
