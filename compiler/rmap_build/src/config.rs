//! Build configuration.

/// Defaults applied where a declaration leaves a root attribute out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BuildConfig {
    /// Memory-map `base` when none is given.
    pub default_base: u64,
    /// Memory-map `width` in bits when none is given.
    pub default_bus_width: u32,
}

impl BuildConfig {
    pub const DEFAULT_BASE: u64 = 0x8000_0000;
    pub const DEFAULT_BUS_WIDTH: u32 = 32;

    #[must_use]
    pub fn with_default_base(mut self, base: u64) -> Self {
        self.default_base = base;
        self
    }

    #[must_use]
    pub fn with_default_bus_width(mut self, width: u32) -> Self {
        self.default_bus_width = width;
        self
    }
}

impl Default for BuildConfig {
    fn default() -> Self {
        BuildConfig {
            default_base: Self::DEFAULT_BASE,
            default_bus_width: Self::DEFAULT_BUS_WIDTH,
        }
    }
}
