//! Errors raised while building a corpus.

use rmap_ir::ElementPath;
use rmap_space::SpaceError;
use thiserror::Error;

use crate::ErrorCode;

/// A fatal construction, placement or binding error.
///
/// Every variant carries the ancestor-qualified path of the offending
/// element.
#[derive(Error, Clone, Debug, PartialEq, Eq)]
pub enum BuildError {
    #[error(
        "`{path}` at {start:#x} (size {size}) overlaps the element at {blocker_start:#x} (size {blocker_size})"
    )]
    Overlap {
        path: ElementPath,
        start: u64,
        size: u64,
        blocker_start: u64,
        blocker_size: u64,
    },

    #[error("`{path}` is declared with size {declared} but its contents need {required}")]
    Undersized {
        path: ElementPath,
        declared: u64,
        required: u64,
    },

    #[error("cannot determine an offset for `{path}`: {reason}")]
    UnresolvableOffset { path: ElementPath, reason: String },

    #[error("`{path}` has invalid width {width}: {reason}")]
    InvalidWidth {
        path: ElementPath,
        width: u64,
        reason: String,
    },

    #[error("`{path}` is out of range: {reason}")]
    FieldRange { path: ElementPath, reason: String },

    #[error("`{path}` reuses the name `{name}`")]
    DuplicateName { path: ElementPath, name: String },

    #[error("`{path}` binds unknown component `{name}`")]
    UnknownComponent { path: ElementPath, name: String },

    #[error(
        "`{path}` declares size {declared} but framesize {framesize} times count {count} is {expected}"
    )]
    ArraySize {
        path: ElementPath,
        declared: u64,
        framesize: u64,
        count: u64,
        expected: u64,
    },

    #[error("`{path}` attribute `{attribute}`: {reason}")]
    InvalidAttribute {
        path: ElementPath,
        attribute: String,
        reason: String,
    },

    #[error("`{path}`: {reason}")]
    InvalidStructure { path: ElementPath, reason: String },
}

pub type BuildResult<T> = Result<T, BuildError>;

impl BuildError {
    /// Attach the path of the element being placed to a space error.
    pub fn placement(path: &ElementPath, err: SpaceError) -> Self {
        let path = path.clone();
        match err {
            SpaceError::Overlap {
                start,
                size,
                blocker_start,
                blocker_size,
            } => BuildError::Overlap {
                path,
                start,
                size,
                blocker_start,
                blocker_size,
            },
            SpaceError::Undersized { declared, required } => BuildError::Undersized {
                path,
                declared,
                required,
            },
            SpaceError::UnresolvableOffset { .. } | SpaceError::AddressOverflow { .. } => {
                BuildError::UnresolvableOffset {
                    path,
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn invalid_attribute(
        path: &ElementPath,
        attribute: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        BuildError::InvalidAttribute {
            path: path.clone(),
            attribute: attribute.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_structure(path: &ElementPath, reason: impl Into<String>) -> Self {
        BuildError::InvalidStructure {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn field_range(path: &ElementPath, reason: impl Into<String>) -> Self {
        BuildError::FieldRange {
            path: path.clone(),
            reason: reason.into(),
        }
    }

    pub fn path(&self) -> &ElementPath {
        match self {
            BuildError::Overlap { path, .. }
            | BuildError::Undersized { path, .. }
            | BuildError::UnresolvableOffset { path, .. }
            | BuildError::InvalidWidth { path, .. }
            | BuildError::FieldRange { path, .. }
            | BuildError::DuplicateName { path, .. }
            | BuildError::UnknownComponent { path, .. }
            | BuildError::ArraySize { path, .. }
            | BuildError::InvalidAttribute { path, .. }
            | BuildError::InvalidStructure { path, .. } => path,
        }
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            BuildError::Overlap { .. } => ErrorCode::E1001,
            BuildError::Undersized { .. } => ErrorCode::E1002,
            BuildError::UnresolvableOffset { .. } => ErrorCode::E1003,
            BuildError::InvalidWidth { .. } => ErrorCode::E2001,
            BuildError::FieldRange { .. } => ErrorCode::E2002,
            BuildError::DuplicateName { .. } => ErrorCode::E2003,
            BuildError::ArraySize { .. } => ErrorCode::E2004,
            BuildError::InvalidAttribute { .. } => ErrorCode::E2005,
            BuildError::InvalidStructure { .. } => ErrorCode::E2006,
            BuildError::UnknownComponent { .. } => ErrorCode::E3001,
        }
    }
}
