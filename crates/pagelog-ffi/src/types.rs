//! C-compatible mirrors of the page tag and print command.

use pagelog::types::PageType;
use pagelog::PrintCommand;

/// Page severity tag as seen from C. Values match the stored codes.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagelogPageType {
    /// Error level records.
    Error = -1,
    /// Untagged records.
    Default = 0,
    /// Informational records.
    Info = 1,
    /// Debug-level informational records.
    InfoDebug = 2,
    /// Warning level records.
    Warning = 3,
}

impl From<PageType> for PagelogPageType {
    fn from(kind: PageType) -> Self {
        match kind {
            PageType::Error => Self::Error,
            PageType::Default => Self::Default,
            PageType::Info => Self::Info,
            PageType::InfoDebug => Self::InfoDebug,
            PageType::Warning => Self::Warning,
        }
    }
}

/// Print behaviour as seen from C.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PagelogPrintCommand {
    /// Print only.
    Default = 0,
    /// Print, then clear the page.
    Flush = 1,
}

/// Decode a raw print command; unknown values are `None`.
pub(crate) fn print_command(raw: i32) -> Option<PrintCommand> {
    match raw {
        0 => Some(PrintCommand::Default),
        1 => Some(PrintCommand::Flush),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_type_codes_match_core() {
        for kind in PageType::ALL {
            assert_eq!(PagelogPageType::from(kind) as i32, kind.code());
        }
    }

    #[test]
    fn print_command_decoding() {
        assert_eq!(
            print_command(PagelogPrintCommand::Default as i32),
            Some(PrintCommand::Default)
        );
        assert_eq!(
            print_command(PagelogPrintCommand::Flush as i32),
            Some(PrintCommand::Flush)
        );
        assert_eq!(print_command(7), None);
    }
}
