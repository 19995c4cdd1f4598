//! Incremental builder for type and default-value text
//!
//! Joins lexemes back into readable C++ text, deciding token by token whether
//! a separating space is wanted. `QList < int >` becomes `QList<int>`,
//! `const QString &` keeps its spaces.

/// Accumulates lexemes into a normalized code string
#[derive(Debug, Clone, Default)]
pub struct CodeChunk {
    text: String,
}

impl CodeChunk {
    /// Create an empty chunk
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one lexeme, inserting a space where C++ style wants one
    pub fn append(&mut self, lexeme: &str) {
        if lexeme.is_empty() {
            return;
        }
        if !self.text.is_empty() && Self::wants_space(&self.text, lexeme) {
            self.text.push(' ');
        }
        self.text.push_str(lexeme);
    }

    fn wants_space(before: &str, lexeme: &str) -> bool {
        // Tokens that attach to whatever precedes them
        if matches!(lexeme, "::" | "<" | ">" | "," | "(" | ")" | "[" | "]") {
            return false;
        }
        // Openers and qualifiers that swallow the following token
        !matches!(
            before.chars().last(),
            Some('<' | '(' | '[' | '~' | ':')
        )
    }

    /// Returns true if nothing has been appended
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Discard the accumulated text
    pub fn clear(&mut self) {
        self.text.clear();
    }

    /// The accumulated text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Consume the chunk, yielding its text
    #[must_use]
    pub fn into_string(self) -> String {
        self.text
    }
}
