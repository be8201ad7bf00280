use std::fmt;

/// Error codes for all compiler diagnostics.
///
/// Format: E#### where first digit indicates phase:
/// - E1xxx: Placement errors
/// - E2xxx: Construction errors
/// - E3xxx: Binding errors
/// - E4xxx: Traversal errors
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum ErrorCode {
    // Placement Errors (E1xxx)
    /// Two children claim the same addresses
    E1001,
    /// Declared size smaller than the occupied range
    E1002,
    /// No position can be determined for a child
    E1003,

    // Construction Errors (E2xxx)
    /// Width not allowed for the element
    E2001,
    /// Field or enum value outside its register or field
    E2002,
    /// Name used twice in one scope
    E2003,
    /// Array size disagrees with framesize times count
    E2004,
    /// Attribute unknown, unparsable or out of range
    E2005,
    /// Required attribute or child missing, or child not allowed
    E2006,

    // Binding Errors (E3xxx)
    /// Instance names a component that does not exist
    E3001,

    // Traversal Errors (E4xxx)
    /// Traversal has no handler for an element kind
    E4001,
    /// Output could not be written
    E4002,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 12] = [
        ErrorCode::E1001,
        ErrorCode::E1002,
        ErrorCode::E1003,
        ErrorCode::E2001,
        ErrorCode::E2002,
        ErrorCode::E2003,
        ErrorCode::E2004,
        ErrorCode::E2005,
        ErrorCode::E2006,
        ErrorCode::E3001,
        ErrorCode::E4001,
        ErrorCode::E4002,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            // Placement
            ErrorCode::E1001 => "E1001",
            ErrorCode::E1002 => "E1002",
            ErrorCode::E1003 => "E1003",
            // Construction
            ErrorCode::E2001 => "E2001",
            ErrorCode::E2002 => "E2002",
            ErrorCode::E2003 => "E2003",
            ErrorCode::E2004 => "E2004",
            ErrorCode::E2005 => "E2005",
            ErrorCode::E2006 => "E2006",
            // Binding
            ErrorCode::E3001 => "E3001",
            // Traversal
            ErrorCode::E4001 => "E4001",
            ErrorCode::E4002 => "E4002",
        }
    }

    /// Short title, used as the first line of `--explain`-style output.
    pub fn title(&self) -> &'static str {
        match self {
            ErrorCode::E1001 => "overlapping elements",
            ErrorCode::E1002 => "declared size too small",
            ErrorCode::E1003 => "unresolvable offset",
            ErrorCode::E2001 => "invalid width",
            ErrorCode::E2002 => "value out of field range",
            ErrorCode::E2003 => "duplicate name",
            ErrorCode::E2004 => "array size mismatch",
            ErrorCode::E2005 => "invalid attribute",
            ErrorCode::E2006 => "invalid structure",
            ErrorCode::E3001 => "unknown component",
            ErrorCode::E4001 => "unhandled element kind",
            ErrorCode::E4002 => "output failure",
        }
    }

    pub fn is_placement_error(&self) -> bool {
        self.as_str().starts_with("E1")
    }

    pub fn is_construction_error(&self) -> bool {
        self.as_str().starts_with("E2")
    }

    pub fn is_binding_error(&self) -> bool {
        self.as_str().starts_with("E3")
    }

    pub fn is_traversal_error(&self) -> bool {
        self.as_str().starts_with("E4")
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
