//! Resolution of instance `extern` names to components.

use std::sync::Arc;

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Component, ElementPath};
use rustc_hash::FxHashMap;

/// Registry of built components, consulted while memory maps are built.
///
/// Components are shared: every instance bound to one holds the same
/// `Arc`.
#[derive(Debug, Default, Clone)]
pub struct Binder {
    components: FxHashMap<String, Arc<Component>>,
}

impl Binder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `component` available for binding.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::DuplicateName`] if a component of the same name
    /// is already registered.
    pub fn register(&mut self, component: Arc<Component>) -> BuildResult<()> {
        let name = component.common.name.clone();
        if self.components.contains_key(&name) {
            return Err(BuildError::DuplicateName {
                path: component.common.path.clone(),
                name,
            });
        }
        self.components.insert(name, component);
        Ok(())
    }

    pub fn lookup(&self, name: &str) -> Option<&Arc<Component>> {
        self.components.get(name)
    }

    /// Bind the instance at `instance` to the component called `name`.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::UnknownComponent`] naming both the instance and
    /// the missing component.
    pub fn bind(&self, instance: &ElementPath, name: &str) -> BuildResult<Arc<Component>> {
        self.lookup(name)
            .cloned()
            .ok_or_else(|| BuildError::UnknownComponent {
                path: instance.clone(),
                name: name.to_string(),
            })
    }

    pub fn len(&self) -> usize {
        self.components.len()
    }

    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests {
    use rmap_diagnostic::ErrorCode;
    use rmap_ir::{Common, Format};
    use rmap_space::Space;

    use super::*;

    fn component(name: &str) -> Arc<Component> {
        Arc::new(Component {
            common: Common {
                name: name.to_string(),
                path: ElementPath::root(name),
                description: Vec::new(),
                read_only: false,
                write_only: false,
                format: Format::Bits,
            },
            width: 32,
            size: 4,
            space: Space::default(),
        })
    }

    #[test]
    fn test_bind_shares_component() {
        let mut binder = Binder::new();
        binder.register(component("DIO")).unwrap();
        let instance = ElementPath::root("SYS").child("dio0");
        let a = binder.bind(&instance, "DIO").unwrap();
        let b = binder.bind(&instance, "DIO").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(binder.len(), 1);
    }

    #[test]
    fn test_missing_component() {
        let binder = Binder::new();
        let err = binder
            .bind(&ElementPath::root("SYS").child("x"), "Missing")
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::E3001);
        assert_eq!(err.to_string(), "`SYS.x` binds unknown component `Missing`");
    }

    #[test]
    fn test_duplicate_component() {
        let mut binder = Binder::new();
        binder.register(component("DIO")).unwrap();
        let err = binder.register(component("DIO")).unwrap_err();
        assert_eq!(err.code(), ErrorCode::E2003);
    }
}
