//! Raw attribute access and value parsing.

use rmap_diagnostic::{BuildError, BuildResult};
use rmap_ir::{Decl, ElementPath, Format};

/// Attributes every element kind accepts.
pub(crate) const COMMON_ATTRS: [&str; 4] = ["name", "readOnly", "writeOnly", "format"];

/// Parse an unsigned integer attribute.
///
/// Accepts decimal and `0x`, `0o`, `0b` prefixed forms, with `_` allowed
/// between digits.
pub fn parse_int(text: &str) -> Option<u64> {
    let text = text.trim();
    let (digits, radix) = match text.get(..2) {
        Some("0x" | "0X") => (&text[2..], 16),
        Some("0o" | "0O") => (&text[2..], 8),
        Some("0b" | "0B") => (&text[2..], 2),
        _ => (text, 10),
    };
    if digits.starts_with('_') || digits.ends_with('_') {
        return None;
    }
    let digits: String = digits.chars().filter(|c| *c != '_').collect();
    if digits.is_empty() || digits.starts_with(['+', '-']) {
        return None;
    }
    u64::from_str_radix(&digits, radix).ok()
}

/// Parse a boolean attribute: `1/0`, `true/false`, `yes/no`, any case.
pub fn parse_bool(text: &str) -> Option<bool> {
    let text = text.trim();
    if ["1", "true", "yes"].iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Some(true)
    } else if ["0", "false", "no"].iter().any(|t| t.eq_ignore_ascii_case(text)) {
        Some(false)
    } else {
        None
    }
}

/// Typed view of one declaration's attributes.
///
/// Construction rejects any attribute outside the common set and `extra`.
pub(crate) struct Attrs<'d> {
    decl: &'d Decl,
    path: &'d ElementPath,
}

impl<'d> Attrs<'d> {
    pub(crate) fn new(decl: &'d Decl, path: &'d ElementPath, extra: &[&str]) -> BuildResult<Self> {
        if let Some(unknown) = decl
            .attrs
            .keys()
            .find(|key| !COMMON_ATTRS.contains(&key.as_str()) && !extra.contains(&key.as_str()))
        {
            return Err(BuildError::invalid_attribute(
                path,
                unknown,
                format!("not an attribute of a {}", decl.kind),
            ));
        }
        Ok(Attrs { decl, path })
    }

    pub(crate) fn path(&self) -> &'d ElementPath {
        self.path
    }

    pub(crate) fn string(&self, key: &str) -> Option<&'d str> {
        self.decl.get(key)
    }

    pub(crate) fn required(&self, key: &str) -> BuildResult<&'d str> {
        self.string(key).ok_or_else(|| {
            BuildError::invalid_structure(
                self.path,
                format!("a {} requires the `{key}` attribute", self.decl.kind),
            )
        })
    }

    pub(crate) fn int(&self, key: &str) -> BuildResult<Option<u64>> {
        self.string(key)
            .map(|text| {
                parse_int(text).ok_or_else(|| {
                    BuildError::invalid_attribute(
                        self.path,
                        key,
                        format!("`{text}` is not an unsigned integer"),
                    )
                })
            })
            .transpose()
    }

    /// An integer that must not be zero.
    pub(crate) fn positive(&self, key: &str) -> BuildResult<Option<u64>> {
        match self.int(key)? {
            Some(0) => Err(BuildError::invalid_attribute(
                self.path,
                key,
                "must be at least 1",
            )),
            value => Ok(value),
        }
    }

    pub(crate) fn bool(&self, key: &str) -> BuildResult<Option<bool>> {
        self.string(key)
            .map(|text| {
                parse_bool(text).ok_or_else(|| {
                    BuildError::invalid_attribute(
                        self.path,
                        key,
                        format!("`{text}` is not a boolean"),
                    )
                })
            })
            .transpose()
    }

    pub(crate) fn format(&self) -> BuildResult<Option<Format>> {
        self.string("format")
            .map(|text| {
                Format::parse(text).ok_or_else(|| {
                    BuildError::invalid_attribute(
                        self.path,
                        "format",
                        format!("`{text}` is not one of bits, signed, unsigned"),
                    )
                })
            })
            .transpose()
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    reason = "tests use unwrap to panic on unexpected state"
)]
mod tests;
