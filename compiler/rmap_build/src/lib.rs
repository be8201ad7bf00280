//! rmap build - Element Tree Construction
//!
//! Turns declarations ([`Decl`](rmap_ir::Decl)) into a fully-resolved
//! [`Corpus`]: every attribute parsed and inherited, every child placed,
//! every size known and every instance bound to its component.
//!
//! # Pipeline
//!
//! ```text
//! Vec<Decl>
//!   ├─ components ──► build_component ──► Binder
//!   └─ memory maps ─► build_memory_map (binds through the Binder)
//!                                  │
//!                                  ▼
//!                               Corpus
//! ```
//!
//! Construction is a single recursive descent. Each node resolves its own
//! attributes (inheriting `readOnly`, `writeOnly` and `format` from its
//! parent) before building its children, then places the children in its
//! space and reports its size upward.
//!
//! The first error aborts the whole corpus.

mod array;
mod attrs;
mod binder;
mod component;
mod config;
mod corpus;
mod inherit;
mod layout;
mod memory_map;
mod register;

pub use attrs::{parse_bool, parse_int};
pub use binder::Binder;
pub use component::build_component;
pub use config::BuildConfig;
pub use corpus::{Corpus, RootError};
pub use memory_map::build_memory_map;
pub use rmap_diagnostic::{BuildError, BuildResult};
