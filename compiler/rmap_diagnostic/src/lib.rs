//! Diagnostics for the register-map compiler.
//!
//! - [`BuildError`]: everything that can go wrong while building a corpus
//! - [`ErrorCode`]: stable, searchable codes for every error kind
//! - [`Diagnostic`]: the rendered form shown to users
//!
//! Build errors are fatal to the whole corpus; traversal errors
//! ([`VisitError`](rmap_ir::visitor::VisitError)) only to their traversal.
//! Both render through [`Diagnostic`].

mod diagnostic;
mod error;
mod error_code;

pub use diagnostic::Diagnostic;
pub use error::{BuildError, BuildResult};
pub use error_code::ErrorCode;
