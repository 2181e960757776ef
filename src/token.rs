use std::fmt::{self, Display, Formatter};
use strum_macros::Display;

#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TokenKind {
    // Literals
    Int,
    String,

    // Operators
    Plus,
    Minus,
    Asterisk,
    Slash,
    Assign,
    Neg,
    LT,
    GT,
    Eq,
    NEq,
    LTEq,
    GTEq,
    Increment,
    Decrement,

    // Delimiters
    LParen,
    RParen,
    LSquare,
    RSquare,
    LBrace,
    RBrace,
    Comma,

    // Keywords
    Let,
    Function,
    If,
    Else,
    True,
    False,
    Return,
    While,

    Identifier,
    Eof,
    Illegal,
}

impl From<&str> for TokenKind {
    fn from(text: &str) -> Self {
        match text {
            "let" => Self::Let,
            "fn" => Self::Function,
            "if" => Self::If,
            "else" => Self::Else,
            "true" => Self::True,
            "false" => Self::False,
            "return" => Self::Return,
            "while" => Self::While,
            _ => Self::Identifier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
        }
    }

    /// Identifier or keyword, depending on the lexeme.
    pub fn word(lexeme: String) -> Self {
        Self {
            kind: lexeme.as_str().into(),
            lexeme,
        }
    }

    pub fn eof() -> Self {
        Self::new(TokenKind::Eof, "")
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl Display for Token {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        write!(f, "({}, '{}')", self.kind, self.lexeme)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_kind_names() {
        let cases = [
            (TokenKind::Int, "INT"),
            (TokenKind::NEq, "NEQ"),
            (TokenKind::LTEq, "LTEQ"),
            (TokenKind::GTEq, "GTEQ"),
            (TokenKind::LSquare, "LSQUARE"),
            (TokenKind::Identifier, "IDENTIFIER"),
            (TokenKind::Increment, "INCREMENT"),
            (TokenKind::Eof, "EOF"),
        ];

        for (kind, name) in cases.iter() {
            assert_eq!(kind.to_string(), *name);
        }
    }

    #[test]
    fn test_keywords() {
        assert_eq!(Token::word("while".to_owned()).kind, TokenKind::While);
        assert_eq!(Token::word("fn".to_owned()).kind, TokenKind::Function);
        assert_eq!(Token::word("whiles".to_owned()).kind, TokenKind::Identifier);
    }

    #[test]
    fn test_display() {
        assert_eq!(Token::new(TokenKind::Plus, "+").to_string(), "(PLUS, '+')");
        assert_eq!(
            Token::new(TokenKind::String, "hi there").to_string(),
            "(STRING, 'hi there')"
        );
    }
}
