//! Parameter-list parsing and matching
//!
//! Functions arrive from several directions (headers, translation units,
//! documentation comments, index files) and must be unified by signature.
//! [`Parameters`] parses the raw text between a function's parentheses into an
//! ordered list of typed parameters and provides the structural comparison
//! used for overload matching.
//!
//! Parsing is all-or-nothing: any structural failure clears the list and
//! marks the whole value invalid, so callers never act on a half-parsed
//! signature.

mod chunk;
mod lexer;

use std::sync::OnceLock;

use regex::Regex;

pub use chunk::CodeChunk;
use lexer::{lex, Lexeme, ParamToken};

/// A single formal parameter: type, optional name, optional default value
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameter {
    ty: String,
    name: String,
    default_value: String,
}

impl Parameter {
    /// Create a parameter from its parts
    #[must_use]
    pub fn new(ty: impl Into<String>, name: impl Into<String>, default_value: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            name: name.into(),
            default_value: default_value.into(),
        }
    }

    /// The parameter's type text
    #[must_use]
    pub fn ty(&self) -> &str {
        &self.ty
    }

    /// The parameter's name, possibly empty
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The default value text, possibly empty
    #[must_use]
    pub fn default_value(&self) -> &str {
        &self.default_value
    }

    /// Render the parameter as it would appear in a signature
    #[must_use]
    pub fn signature(&self, include_value: bool) -> String {
        let mut text = self.ty.clone();
        if !text.is_empty()
            && !text.ends_with('*')
            && !text.ends_with('&')
            && !text.ends_with(' ')
            && !self.name.is_empty()
        {
            text.push(' ');
        }
        text.push_str(&self.name);
        if include_value && !self.default_value.is_empty() {
            text.push_str(" = ");
            text.push_str(&self.default_value);
        }
        text
    }
}

/// An ordered parameter list with a validity flag
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Parameters {
    parameters: Vec<Parameter>,
    private_signal: bool,
    valid: bool,
}

impl Parameters {
    /// An empty, valid parameter list
    #[must_use]
    pub fn new() -> Self {
        Self {
            parameters: Vec::new(),
            private_signal: false,
            valid: true,
        }
    }

    /// Parse the text between a function's parentheses
    ///
    /// An empty or whitespace-only signature yields a valid empty list. On
    /// any structural failure the result is invalid and empty.
    #[must_use]
    pub fn parse(signature: &str) -> Self {
        let mut parameters = Self::new();
        let trimmed = signature.trim();
        if !trimmed.is_empty() {
            parameters.run_parser(trimmed);
        }
        parameters
    }

    /// Build a parameter list from bare type strings, as delivered by an
    /// external declaration front end
    #[must_use]
    pub fn from_types<S: AsRef<str>>(types: &[S]) -> Self {
        let mut parameters = Self::new();
        for ty in types {
            parameters.parameters.push(Parameter::new(ty.as_ref(), "", ""));
        }
        parameters
    }

    /// Returns false when parsing failed; the list is empty in that case
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns true if there are no parameters
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Number of parameters
    #[must_use]
    pub fn count(&self) -> usize {
        self.parameters.len()
    }

    /// The parameter at `index`
    #[must_use]
    pub fn at(&self, index: usize) -> &Parameter {
        &self.parameters[index]
    }

    /// The last parameter, if any
    #[must_use]
    pub fn last(&self) -> Option<&Parameter> {
        self.parameters.last()
    }

    /// Iterate over the parameters in order
    pub fn iter(&self) -> std::slice::Iter<'_, Parameter> {
        self.parameters.iter()
    }

    /// True if a trailing `QPrivateSignal` parameter was seen and dropped
    #[must_use]
    pub fn is_private_signal(&self) -> bool {
        self.private_signal
    }

    /// Append a parameter
    pub fn append(&mut self, ty: impl Into<String>, name: impl Into<String>, value: impl Into<String>) {
        self.parameters.push(Parameter::new(ty, name, value));
    }

    /// Record that a trailing `QPrivateSignal` parameter was dropped by the
    /// front end before the list was built
    pub fn set_private_signal(&mut self) {
        self.private_signal = true;
    }

    /// Structural equality: same count and pairwise-equal types
    ///
    /// Names and default values are ignored. This is the key used to unify
    /// the same function seen from two different parse passes.
    #[must_use]
    pub fn matches(&self, other: &Parameters) -> bool {
        self.parameters.len() == other.parameters.len()
            && self
                .parameters
                .iter()
                .zip(&other.parameters)
                .all(|(a, b)| a.ty == b.ty)
    }

    /// Comma-joined signature text
    #[must_use]
    pub fn signature(&self, include_values: bool) -> String {
        let parts: Vec<String> = self
            .parameters
            .iter()
            .map(|p| p.signature(include_values))
            .collect();
        parts.join(", ")
    }

    /// Signature text with all spaces and commas removed
    ///
    /// Stable across formatting differences, used as a map key for "have we
    /// already created a node for this exact overload" checks.
    #[must_use]
    pub fn raw_signature(&self, include_names: bool, include_values: bool) -> String {
        let mut raw = String::new();
        for parameter in &self.parameters {
            let text = if include_names {
                parameter.signature(include_values)
            } else {
                parameter.ty.clone()
            };
            raw.extend(text.chars().filter(|c| *c != ' ' && *c != ','));
        }
        raw
    }

    /// The parameter types in order
    #[must_use]
    pub fn types(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.ty.as_str()).collect()
    }

    fn run_parser(&mut self, signature: &str) {
        let Some(tokens) = lex(signature) else {
            self.fail();
            return;
        };
        let mut parser = ParamParser::new(tokens);
        loop {
            if !parser.match_parameter(self) {
                self.fail();
                return;
            }
            if !parser.eat(ParamToken::Comma) {
                break;
            }
        }
        // Anything left over means the signature was not a parameter list
        if !parser.at_end() {
            self.fail();
        }
    }

    fn fail(&mut self) {
        self.parameters.clear();
        self.private_signal = false;
        self.valid = false;
    }
}

impl<'a> IntoIterator for &'a Parameters {
    type Item = &'a Parameter;
    type IntoIter = std::slice::Iter<'a, Parameter>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn commented_name(comment: &str) -> Option<&str> {
    static NAME_RE: OnceLock<Regex> = OnceLock::new();
    let re = NAME_RE.get_or_init(|| {
        Regex::new(r"/\*\s*([a-zA-Z_0-9]+)\s*\*/").expect("valid regex")
    });
    re.captures(comment).map(|c| c.get(1).expect("group 1").as_str())
}

/// Recursive-descent matcher over the lexed parameter list
struct ParamParser {
    tokens: Vec<Lexeme>,
    pos: usize,
    paren_depth: i32,
}

impl ParamParser {
    fn new(tokens: Vec<Lexeme>) -> Self {
        Self {
            tokens,
            pos: 0,
            paren_depth: 0,
        }
    }

    fn peek(&self) -> Option<ParamToken> {
        self.tokens.get(self.pos).map(|t| t.kind)
    }

    fn at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn advance(&mut self) -> String {
        let lexeme = &self.tokens[self.pos];
        match lexeme.kind {
            ParamToken::LeftParen | ParamToken::LeftParenAster => self.paren_depth += 1,
            ParamToken::RightParen => self.paren_depth -= 1,
            _ => {}
        }
        self.pos += 1;
        lexeme.text.clone()
    }

    /// Consume the next token if it has the given kind
    fn eat(&mut self, kind: ParamToken) -> bool {
        if self.peek() == Some(kind) {
            self.advance();
            return true;
        }
        false
    }

    /// Consume the next token if it matches, returning its text
    fn eat_text(&mut self, kind: ParamToken) -> Option<String> {
        if self.peek() == Some(kind) {
            return Some(self.advance());
        }
        None
    }

    fn eat_into(&mut self, kind: ParamToken, chunk: &mut CodeChunk) -> bool {
        if let Some(text) = self.eat_text(kind) {
            chunk.append(&text);
            return true;
        }
        false
    }

    fn match_parameter(&mut self, out: &mut Parameters) -> bool {
        if self.eat(ParamToken::PrivateSignal) {
            out.private_signal = true;
            return true;
        }

        let mut ty = CodeChunk::new();
        let mut name = String::new();
        if !self.match_type_and_name(&mut ty, &mut name) {
            return false;
        }
        self.eat(ParamToken::Comment);

        let mut default_value = CodeChunk::new();
        if self.eat(ParamToken::Equal) {
            // Everything up to the next top-level comma is the default value
            let base_depth = self.paren_depth;
            while !self.at_end()
                && !(self.peek() == Some(ParamToken::Comma) && self.paren_depth == base_depth)
            {
                let text = self.advance();
                default_value.append(&text);
            }
        }

        out.append(ty.into_string(), name, default_value.into_string());
        true
    }

    /// Match `Alpha::Beta::...::Omega` with cv-qualifiers, builtin-type
    /// combinations, template arguments, and an optional declarator name
    fn match_type_and_name(&mut self, ty: &mut CodeChunk, name: &mut String) -> bool {
        loop {
            let mut virgin = true;
            if self.peek() != Some(ParamToken::Ident) {
                while self.eat_into(ParamToken::Const, ty) || self.eat_into(ParamToken::Volatile, ty)
                {
                }
                // Fold signed/unsigned/short/long/int combinations in any
                // order into a single type; a lone "signed" stays pending
                // until we know nothing follows it
                let mut pending = String::new();
                while matches!(
                    self.peek(),
                    Some(
                        ParamToken::Signed
                            | ParamToken::Unsigned
                            | ParamToken::Short
                            | ParamToken::Long
                            | ParamToken::Int
                    )
                ) {
                    if self.peek() == Some(ParamToken::Signed) {
                        pending = self.advance();
                    } else {
                        if self.peek() == Some(ParamToken::Unsigned) && !pending.is_empty() {
                            ty.append(&pending);
                        }
                        pending.clear();
                        let text = self.advance();
                        ty.append(&text);
                    }
                    virgin = false;
                }
                if !pending.is_empty() {
                    ty.append(&pending);
                }
                while self.eat_into(ParamToken::Const, ty) || self.eat_into(ParamToken::Volatile, ty)
                {
                }
                self.eat_into(ParamToken::Tilde, ty);
            }

            if virgin {
                if !(self.eat_into(ParamToken::Ident, ty)
                    || self.eat_into(ParamToken::Void, ty)
                    || self.eat_into(ParamToken::Int, ty)
                    || self.eat_into(ParamToken::Char, ty)
                    || self.eat_into(ParamToken::Double, ty)
                    || self.eat_into(ParamToken::Ellipsis, ty))
                {
                    return false;
                }
            } else {
                let _ = self.eat_into(ParamToken::Int, ty)
                    || self.eat_into(ParamToken::Char, ty)
                    || self.eat_into(ParamToken::Double, ty);
            }

            if !self.match_template_angles(ty) {
                return false;
            }

            while self.eat_into(ParamToken::Const, ty) || self.eat_into(ParamToken::Volatile, ty) {}

            if !self.eat_into(ParamToken::Scope, ty) {
                break;
            }
        }

        while self.eat_into(ParamToken::Ampersand, ty)
            || self.eat_into(ParamToken::Aster, ty)
            || self.eat_into(ParamToken::Const, ty)
            || self.eat_into(ParamToken::Caret, ty)
            || self.eat_into(ParamToken::Ellipsis, ty)
        {}

        if self.eat_into(ParamToken::LeftParenAster, ty) {
            // Function pointer: the name sits inside the declarator and the
            // inner parameter list is swallowed into the type
            if let Some(inner) = self.eat_text(ParamToken::Ident) {
                *name = inner;
            }
            if !self.eat_into(ParamToken::RightParen, ty) {
                return false;
            }
            if !self.eat_into(ParamToken::LeftParen, ty) {
                return false;
            }
            let base_depth = self.paren_depth;
            while self.paren_depth >= base_depth {
                if self.at_end() {
                    return false;
                }
                let text = self.advance();
                ty.append(&text);
            }
        } else {
            if let Some(ident) = self.eat_text(ParamToken::Ident) {
                *name = ident;
            } else if let Some(comment) = self.eat_text(ParamToken::Comment) {
                if let Some(inner) = commented_name(&comment) {
                    *name = inner.to_string();
                }
            }
            // Array declarator suffix goes into the type
            while self.eat_into(ParamToken::LeftBracket, ty) {
                while !self.at_end() && self.peek() != Some(ParamToken::RightBracket) {
                    let text = self.advance();
                    ty.append(&text);
                }
                if !self.eat_into(ParamToken::RightBracket, ty) {
                    return false;
                }
            }
        }
        true
    }

    /// Consume a balanced `<...>` template-argument run into the type
    fn match_template_angles(&mut self, ty: &mut CodeChunk) -> bool {
        if self.peek() != Some(ParamToken::LeftAngle) {
            return true;
        }
        let mut depth = 0i32;
        loop {
            if self.at_end() {
                return false;
            }
            match self.peek() {
                Some(ParamToken::LeftAngle) => depth += 1,
                Some(ParamToken::RightAngle) => depth -= 1,
                _ => {}
            }
            let text = self.advance();
            ty.append(&text);
            if depth == 0 {
                return true;
            }
        }
    }
}
