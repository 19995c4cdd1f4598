//! Token types for the parameter-list lexer

use logos::Logos;

/// The kind of token produced when lexing a C-like parameter list
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
pub enum ParamToken {
    // ========== Type keywords ==========
    #[token("const")]
    Const,
    #[token("volatile")]
    Volatile,
    #[token("signed")]
    Signed,
    #[token("unsigned")]
    Unsigned,
    #[token("short")]
    Short,
    #[token("long")]
    Long,
    #[token("int")]
    Int,
    #[token("char")]
    Char,
    #[token("double")]
    Double,
    #[token("void")]
    Void,

    /// The Qt signal-emission marker parameter
    #[token("QPrivateSignal")]
    PrivateSignal,

    // ========== Identifiers and literals ==========
    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,

    #[regex(r"[0-9][0-9a-fA-FxXuUlL.]*([eE][+-]?[0-9]+)?")]
    Number,

    #[regex(r#""([^"\\]|\\.)*""#)]
    String,

    #[regex(r"'([^'\\]|\\.)*'")]
    CharLit,

    /// A block comment, which may carry a commented-out parameter name
    #[regex(r"/\*([^*]|\*+[^*/])*\*+/")]
    Comment,

    // ========== Punctuation ==========
    #[token("::")]
    Scope,
    #[token("<")]
    LeftAngle,
    #[token(">")]
    RightAngle,
    /// Start of a function-pointer declarator; must outrank `(`
    #[token("(*")]
    LeftParenAster,
    #[token("(")]
    LeftParen,
    #[token(")")]
    RightParen,
    #[token("[")]
    LeftBracket,
    #[token("]")]
    RightBracket,
    #[token("{")]
    LeftBrace,
    #[token("}")]
    RightBrace,
    #[token(",")]
    Comma,
    #[token("=")]
    Equal,
    #[token("*")]
    Aster,
    #[token("&")]
    Ampersand,
    #[token("^")]
    Caret,
    #[token("...")]
    Ellipsis,
    #[token("~")]
    Tilde,
    #[token("-")]
    Minus,
    #[token("+")]
    Plus,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("|")]
    Pipe,
    #[token(":")]
    Colon,
    #[token(".")]
    Dot,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
}

/// A token together with its source text
#[derive(Debug, Clone)]
pub struct Lexeme {
    pub kind: ParamToken,
    pub text: String,
}

/// Lex a parameter-list string into tokens
///
/// Returns `None` when the text contains a character no token matches; the
/// caller treats that as a malformed parameter list.
pub fn lex(signature: &str) -> Option<Vec<Lexeme>> {
    let mut lexer = ParamToken::lexer(signature);
    let mut tokens = Vec::new();
    while let Some(result) = lexer.next() {
        match result {
            Ok(kind) => tokens.push(Lexeme {
                kind,
                text: lexer.slice().to_string(),
            }),
            Err(()) => return None,
        }
    }
    Some(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<ParamToken> {
        lex(text).unwrap().into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn keywords_and_idents() {
        assert_eq!(
            kinds("const QString &name"),
            vec![
                ParamToken::Const,
                ParamToken::Ident,
                ParamToken::Ampersand,
                ParamToken::Ident
            ]
        );
    }

    #[test]
    fn function_pointer_open_is_one_token() {
        assert_eq!(
            kinds("int (*f)(int)"),
            vec![
                ParamToken::Int,
                ParamToken::LeftParenAster,
                ParamToken::Ident,
                ParamToken::RightParen,
                ParamToken::LeftParen,
                ParamToken::Int,
                ParamToken::RightParen
            ]
        );
    }

    #[test]
    fn ellipsis_outranks_dot() {
        assert_eq!(kinds("..."), vec![ParamToken::Ellipsis]);
    }

    #[test]
    fn commented_name_is_single_token() {
        assert_eq!(
            kinds("int /* count */"),
            vec![ParamToken::Int, ParamToken::Comment]
        );
    }

    #[test]
    fn unknown_character_fails() {
        assert!(lex("int x @ 3").is_none());
    }
}
