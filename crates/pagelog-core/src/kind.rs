//! Page severity tags.

use std::fmt;

/// Severity classification attached to a page.
///
/// The tag is pure metadata: it is used by downstream filtering and
/// printing and never changes how writes are accounted. Discriminants
/// are ABI-stable and match the codes stored in the arena page record.
#[repr(i32)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum PageType {
    /// Error level records.
    Error = -1,
    /// Untagged records. Every page starts here and returns here on clear.
    #[default]
    Default = 0,
    /// Informational records.
    Info = 1,
    /// Debug-level informational records.
    InfoDebug = 2,
    /// Warning level records.
    Warning = 3,
}

impl PageType {
    /// All tags in discriminant order.
    pub const ALL: [PageType; 5] = [
        PageType::Error,
        PageType::Default,
        PageType::Info,
        PageType::InfoDebug,
        PageType::Warning,
    ];

    /// The stored integer code for this tag.
    pub fn code(self) -> i32 {
        self as i32
    }

    /// Decode a stored integer code. Returns `None` for unknown codes.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            -1 => Some(Self::Error),
            0 => Some(Self::Default),
            1 => Some(Self::Info),
            2 => Some(Self::InfoDebug),
            3 => Some(Self::Warning),
            _ => None,
        }
    }

    /// Upper-case label used by the dump renderers.
    pub fn label(self) -> &'static str {
        match self {
            Self::Error => "ERROR",
            Self::Default => "DEFAULT",
            Self::Info => "INFO",
            Self::InfoDebug => "INFO_DEBUG",
            Self::Warning => "WARNING",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
