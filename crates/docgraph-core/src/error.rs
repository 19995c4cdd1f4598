//! Error and diagnostic types for the docgraph engine
//!
//! Hard failures (I/O, malformed index files) are reported through [`Error`].
//! Everything the resolution passes complain about is a [`Diagnostic`]: the
//! passes never abort, they record what they found and keep going, and the
//! caller decides what to print.

use thiserror::Error;

use crate::location::Location;

/// A hard error crossing the crate boundary
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed index file: {0}")]
    Index(#[from] serde_json::Error),

    #[error("index file has no module name")]
    IndexMissingModule,
}

/// A warning produced while building or resolving the node graph
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// The kind of problem
    pub kind: DiagnosticKind,
    /// Where it was detected
    pub location: Location,
    /// Optional hint for fixing the problem
    pub hint: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic
    #[must_use]
    pub fn new(kind: DiagnosticKind, location: Location) -> Self {
        Self {
            kind,
            location,
            hint: None,
        }
    }

    /// Add a hint to this diagnostic
    #[must_use]
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.location, self.kind)?;
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {hint})")?;
        }
        Ok(())
    }
}

/// The kind of diagnostic
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DiagnosticKind {
    #[error("'{name}' is documented more than once; also at {other}")]
    DuplicateDocumentation { name: String, other: Location },

    #[error("namespace '{0}' is documented in more than one module")]
    NamespaceDocumentedTwice(String),

    #[error("cannot parse parameter list '{0}'")]
    InvalidParameterList(String),

    #[error("QML type '{0}' inherits itself")]
    SelfQmlInheritance(String),

    #[error("unresolved base class '{base}' of {class}")]
    UnresolvedBaseClass { class: String, base: String },

    #[error("no declaration matches documented function '{0}'")]
    NoMatchingDeclaration(String),

    #[error("cannot find '{target}' specified with \\relates in '{name}'")]
    UnresolvedRelates { name: String, target: String },

    #[error("ignored duplicate topic command \\{0}")]
    DuplicateTopicCommand(String),

    #[error("cannot find qdoc comment target '{0}'")]
    UnresolvedDocTarget(String),

    #[error("no documentation for '{0}'")]
    Undocumented(String),
}

/// An append-only sink of diagnostics
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create an empty sink
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a diagnostic
    pub fn report(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    /// Record a diagnostic without a hint
    pub fn warn(&mut self, kind: DiagnosticKind, location: Location) {
        self.items.push(Diagnostic::new(kind, location));
    }

    /// All diagnostics recorded so far, in order
    #[must_use]
    pub fn items(&self) -> &[Diagnostic] {
        &self.items
    }

    /// Returns true if nothing has been reported
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of diagnostics recorded
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Drain all recorded diagnostics
    pub fn take(&mut self) -> Vec<Diagnostic> {
        std::mem::take(&mut self.items)
    }
}
