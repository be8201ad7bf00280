//! Rendered diagnostics.

use std::fmt;

use rmap_ir::visitor::VisitError;
use rmap_ir::ElementPath;

use crate::{BuildError, ErrorCode};

/// An error message with location and context.
#[derive(Clone, Eq, PartialEq, Debug)]
pub struct Diagnostic {
    /// Error code for searchability.
    pub code: ErrorCode,
    /// Main message.
    pub message: String,
    /// The element the diagnostic is about.
    pub path: Option<ElementPath>,
    /// Source file the element came from, when known.
    pub source: Option<String>,
    /// Additional notes providing context.
    pub notes: Vec<String>,
}

impl Diagnostic {
    #[cold]
    pub fn error(code: ErrorCode) -> Self {
        Diagnostic {
            code,
            message: String::new(),
            path: None,
            source: None,
            notes: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    #[must_use]
    pub fn with_path(mut self, path: ElementPath) -> Self {
        self.path = Some(path);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

impl From<&BuildError> for Diagnostic {
    fn from(err: &BuildError) -> Self {
        let diagnostic = Diagnostic::error(err.code())
            .with_message(err.to_string())
            .with_path(err.path().clone());
        match err {
            BuildError::Overlap { .. } | BuildError::FieldRange { .. } => {
                diagnostic.with_note("give the element an offset in free space, or omit it")
            }
            BuildError::Undersized { .. } => {
                diagnostic.with_note("omit `size` to have it inferred from the contents")
            }
            BuildError::UnknownComponent { name, .. } => diagnostic.with_note(format!(
                "set `extern` to the name of a loaded component; `{name}` was not found"
            )),
            BuildError::ArraySize { expected, .. } => {
                diagnostic.with_note(format!("omit `size` or set it to {expected}"))
            }
            _ => diagnostic,
        }
    }
}

impl From<&VisitError> for Diagnostic {
    fn from(err: &VisitError) -> Self {
        let code = match err {
            VisitError::UnhandledElementKind { .. } => ErrorCode::E4001,
            VisitError::Emit { .. } => ErrorCode::E4002,
        };
        Diagnostic::error(code)
            .with_message(err.to_string())
            .with_path(err.path().clone())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "error [{}]: {}", self.code, self.message)?;

        match (&self.source, &self.path) {
            (Some(source), Some(path)) => write!(f, "\n  --> {source}: {path}")?,
            (Some(source), None) => write!(f, "\n  --> {source}")?,
            (None, Some(path)) => write!(f, "\n  --> {path}")?,
            (None, None) => {}
        }

        for note in &self.notes {
            write!(f, "\n  = note: {note}")?;
        }

        Ok(())
    }
}
