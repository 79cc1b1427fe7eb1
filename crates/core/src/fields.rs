// Platform field-type codes: the ignore set, the code-to-label table and the
// renderer dispatch kinds. All tables are fixed at compile time.

/// Type codes that are never renderable (attachments, internal formula
/// subtypes and the like). Controls carrying one of these are excluded from
/// every catalog.
pub const IGNORED_TYPES: [i64; 10] = [14, 21, 22, 34, 42, 43, 45, 47, 49, 10010];

/// Type code of the indirect/lookup control, re-typed from its
/// `sourceControl` before any other rule applies.
pub const LOOKUP_TYPE: i64 = 30;

/// Codes whose controls carry an inline option list.
pub const CHOICE_TYPES: [i64; 3] = [9, 10, 11];

pub fn is_ignored(type_code: i64) -> bool {
    IGNORED_TYPES.contains(&type_code)
}

pub fn is_choice(type_code: i64) -> bool {
    CHOICE_TYPES.contains(&type_code)
}

/// Semantic label for a platform type code. Unknown codes map to an empty
/// string, never an error.
pub fn type_label(type_code: i64) -> &'static str {
    match type_code {
        2 => "Text",
        3 => "Text-Phone",
        4 => "Text-Phone",
        5 => "Text-Email",
        6 => "Number",
        7 => "Text",
        8 => "Number",
        9 => "Option-Single Choice",
        10 => "Option-Multiple Choices",
        11 => "Option-Single Choice",
        15 => "Date",
        16 => "Date",
        24 => "Option-Region",
        25 => "Text",
        26 => "Option-Member",
        27 => "Option-Department",
        28 => "Number",
        29 => "Option-Linked Record",
        30 => "Unknown Type",
        31 => "Number",
        32 => "Text",
        33 => "Text",
        35 => "Option-Linked Record",
        36 => "Number-Yes1/No0",
        37 => "Number",
        38 => "Date",
        40 => "Location",
        41 => "Text",
        46 => "Time",
        48 => "Option-Organizational Role",
        50 => "Text",
        51 => "Query Record",
        _ => "",
    }
}

/// Decoding strategy families for stored row values. Every type code maps to
/// exactly one kind; codes the table does not know fall through to `Scalar`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Multi-choice (10): array of selected labels.
    MultiChoice,
    /// Progress / yes-no style numerics (28, 36): raw code resolved through
    /// the field's option map.
    CodedOption,
    /// Member, department, organizational-role and file references
    /// (26, 27, 48, 14): JSON-array strings tagged by a leading
    /// discriminator.
    Reference,
    /// Cascade and linked records (29, 35): JSON-array strings where only
    /// the first element's name matters.
    Linked,
    /// Geolocation blob (40).
    Location,
    /// Everything else passes through as a plain scalar.
    Scalar,
}

impl FieldKind {
    pub fn of(type_code: i64) -> Self {
        match type_code {
            10 => Self::MultiChoice,
            28 | 36 => Self::CodedOption,
            14 | 26 | 27 | 48 => Self::Reference,
            29 | 35 => Self::Linked,
            40 => Self::Location,
            _ => Self::Scalar,
        }
    }
}
