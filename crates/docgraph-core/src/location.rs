//! Source location tracking for documented entities and diagnostics

use std::fmt;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// A position in a source or documentation file
///
/// Every node carries up to two of these: the location of its declaration
/// (usually a header) and the location of its documentation comment (usually
/// an implementation or markup file).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    /// Path of the file, as given by the front end
    pub file_path: String,
    /// 1-indexed line number, 0 if unknown
    pub line: u32,
    /// 1-indexed column number, 0 if unknown
    pub column: u32,
}

impl Location {
    /// Create a new location
    #[must_use]
    pub fn new(file_path: impl Into<String>, line: u32, column: u32) -> Self {
        Self {
            file_path: file_path.into(),
            line,
            column,
        }
    }

    /// An empty location for synthesized nodes
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Returns true if no file has been recorded
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.file_path.is_empty()
    }

    /// The file name without any leading directories
    #[must_use]
    pub fn file_name(&self) -> &str {
        Path::new(&self.file_path)
            .file_name()
            .and_then(|f| f.to_str())
            .unwrap_or(&self.file_path)
    }

    /// The file name suffix after the last dot, if any
    #[must_use]
    pub fn file_suffix(&self) -> &str {
        Path::new(&self.file_path)
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            return write!(f, "<unknown>");
        }
        write!(f, "{}:{}", self.file_path, self.line)?;
        if self.column > 0 {
            write!(f, ":{}", self.column)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn file_name_and_suffix() {
        let loc = Location::new("src/corelib/tools/qstring.cpp", 42, 1);
        assert_eq!(loc.file_name(), "qstring.cpp");
        assert_eq!(loc.file_suffix(), "cpp");
    }

    #[test]
    fn display_forms() {
        assert_eq!(Location::empty().to_string(), "<unknown>");
        assert_eq!(Location::new("a.h", 7, 0).to_string(), "a.h:7");
        assert_eq!(Location::new("a.h", 7, 3).to_string(), "a.h:7:3");
    }
}
