use crate::token::{Token, TokenKind};
use custom_error::custom_error;

custom_error! {
    #[derive(Clone, PartialEq)]
    pub LexerError

    EmptySequence = "already reached EOF",
}

pub struct Lexer {
    input: Vec<char>,
    position: usize,
}

fn is_letter(c: char) -> bool {
    c.is_alphabetic() || c == '_'
}

impl Iterator for Lexer {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_token().ok()
    }
}

impl Lexer {
    pub fn new(input: impl AsRef<str>) -> Self {
        Self {
            input: input.as_ref().trim().chars().collect(),
            position: 0,
        }
    }

    pub fn has_next(&self) -> bool {
        self.position < self.input.len()
    }

    fn read_char(&mut self) -> Option<char> {
        let ch = self.peek_char();
        if ch.is_some() {
            self.position += 1;
        }
        ch
    }

    fn peek_char(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn next_token(&mut self) -> Result<Token, LexerError> {
        self.skip_whitespace();

        let ch = self.read_char().ok_or(LexerError::EmptySequence)?;

        let token = match ch {
            '=' => self.one_or_two(ch, '=', TokenKind::Assign, TokenKind::Eq),
            '!' => self.one_or_two(ch, '=', TokenKind::Neg, TokenKind::NEq),
            '<' => self.one_or_two(ch, '=', TokenKind::LT, TokenKind::LTEq),
            '>' => self.one_or_two(ch, '=', TokenKind::GT, TokenKind::GTEq),
            '+' => self.one_or_two(ch, '+', TokenKind::Plus, TokenKind::Increment),
            '-' => self.one_or_two(ch, '-', TokenKind::Minus, TokenKind::Decrement),
            '*' => Token::new(TokenKind::Asterisk, ch),
            '/' => Token::new(TokenKind::Slash, ch),
            '(' => Token::new(TokenKind::LParen, ch),
            ')' => Token::new(TokenKind::RParen, ch),
            '[' => Token::new(TokenKind::LSquare, ch),
            ']' => Token::new(TokenKind::RSquare, ch),
            '{' => Token::new(TokenKind::LBrace, ch),
            '}' => Token::new(TokenKind::RBrace, ch),
            ',' => Token::new(TokenKind::Comma, ch),
            '"' => self.read_string(),
            c if is_letter(c) => Token::word(self.read_while(c, |c| is_letter(c) || c.is_ascii_digit())),
            c if c.is_ascii_digit() => Token::new(TokenKind::Int, self.read_while(c, |c| c.is_ascii_digit())),
            c => Token::new(TokenKind::Illegal, c),
        };
        Ok(token)
    }

    fn one_or_two(&mut self, ch: char, second: char, one: TokenKind, two: TokenKind) -> Token {
        if self.peek_char() == Some(second) {
            self.position += 1;
            Token::new(two, [ch, second].iter().collect::<String>())
        } else {
            Token::new(one, ch)
        }
    }

    fn read_while(&mut self, first: char, accept: impl Fn(char) -> bool) -> String {
        let mut lexeme = first.to_string();
        while let Some(c) = self.peek_char().filter(|c| accept(*c)) {
            lexeme.push(c);
            self.position += 1;
        }
        lexeme
    }

    fn read_string(&mut self) -> Token {
        let mut content = String::new();
        loop {
            match self.read_char() {
                Some('"') => return Token::new(TokenKind::String, content),
                Some(c) => content.push(c),
                None => return Token::new(TokenKind::Illegal, content),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_char().map_or(false, char::is_whitespace) {
            self.position += 1;
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn collect(input: &str) -> Vec<(TokenKind, String)> {
        Lexer::new(input).map(|t| (t.kind, t.lexeme)).collect()
    }

    #[test]
    fn test_next_token() {
        let input = r#"let five = 5
let add = fn(x, y) {
  x + y
}
let result = add(five, 10)
!-/*5
5 < 10 > 5 <= 6 >= 7
if (5 < 10) { return true } else { return false }
10 == 10 10 != 9
while (i < 3) { i++ j-- }
"foo bar" [1, 2][0]
"#;

        let cases = [
            (TokenKind::Let, "let"),
            (TokenKind::Identifier, "five"),
            (TokenKind::Assign, "="),
            (TokenKind::Int, "5"),
            (TokenKind::Let, "let"),
            (TokenKind::Identifier, "add"),
            (TokenKind::Assign, "="),
            (TokenKind::Function, "fn"),
            (TokenKind::LParen, "("),
            (TokenKind::Identifier, "x"),
            (TokenKind::Comma, ","),
            (TokenKind::Identifier, "y"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Identifier, "x"),
            (TokenKind::Plus, "+"),
            (TokenKind::Identifier, "y"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Let, "let"),
            (TokenKind::Identifier, "result"),
            (TokenKind::Assign, "="),
            (TokenKind::Identifier, "add"),
            (TokenKind::LParen, "("),
            (TokenKind::Identifier, "five"),
            (TokenKind::Comma, ","),
            (TokenKind::Int, "10"),
            (TokenKind::RParen, ")"),
            (TokenKind::Neg, "!"),
            (TokenKind::Minus, "-"),
            (TokenKind::Slash, "/"),
            (TokenKind::Asterisk, "*"),
            (TokenKind::Int, "5"),
            (TokenKind::Int, "5"),
            (TokenKind::LT, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::GT, ">"),
            (TokenKind::Int, "5"),
            (TokenKind::LTEq, "<="),
            (TokenKind::Int, "6"),
            (TokenKind::GTEq, ">="),
            (TokenKind::Int, "7"),
            (TokenKind::If, "if"),
            (TokenKind::LParen, "("),
            (TokenKind::Int, "5"),
            (TokenKind::LT, "<"),
            (TokenKind::Int, "10"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::True, "true"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Else, "else"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Return, "return"),
            (TokenKind::False, "false"),
            (TokenKind::RBrace, "}"),
            (TokenKind::Int, "10"),
            (TokenKind::Eq, "=="),
            (TokenKind::Int, "10"),
            (TokenKind::Int, "10"),
            (TokenKind::NEq, "!="),
            (TokenKind::Int, "9"),
            (TokenKind::While, "while"),
            (TokenKind::LParen, "("),
            (TokenKind::Identifier, "i"),
            (TokenKind::LT, "<"),
            (TokenKind::Int, "3"),
            (TokenKind::RParen, ")"),
            (TokenKind::LBrace, "{"),
            (TokenKind::Identifier, "i"),
            (TokenKind::Increment, "++"),
            (TokenKind::Identifier, "j"),
            (TokenKind::Decrement, "--"),
            (TokenKind::RBrace, "}"),
            (TokenKind::String, "foo bar"),
            (TokenKind::LSquare, "["),
            (TokenKind::Int, "1"),
            (TokenKind::Comma, ","),
            (TokenKind::Int, "2"),
            (TokenKind::RSquare, "]"),
            (TokenKind::LSquare, "["),
            (TokenKind::Int, "0"),
            (TokenKind::RSquare, "]"),
        ]
        .iter()
        .map(|(kind, lexeme)| (*kind, (*lexeme).to_owned()))
        .collect::<Vec<_>>();

        assert_eq!(collect(input), cases);
    }

    #[test]
    fn test_arithmetic_sequence() {
        let tokens = collect("1+2*4/6");
        assert_eq!(tokens.len(), 7);
        assert_eq!(
            tokens.iter().map(|(kind, _)| *kind).collect::<Vec<_>>(),
            vec![
                TokenKind::Int,
                TokenKind::Plus,
                TokenKind::Int,
                TokenKind::Asterisk,
                TokenKind::Int,
                TokenKind::Slash,
                TokenKind::Int,
            ]
        );
        assert_eq!(
            tokens.iter().map(|(_, lexeme)| lexeme.as_str()).collect::<Vec<_>>(),
            vec!["1", "+", "2", "*", "4", "/", "6"]
        );
    }

    #[test]
    fn test_identifiers() {
        assert_eq!(
            collect("_tmp x1 removeLast"),
            vec![
                (TokenKind::Identifier, "_tmp".to_owned()),
                (TokenKind::Identifier, "x1".to_owned()),
                (TokenKind::Identifier, "removeLast".to_owned()),
            ]
        );
    }

    #[test]
    fn test_illegal_tokens() {
        assert_eq!(
            collect("a; \"open"),
            vec![
                (TokenKind::Identifier, "a".to_owned()),
                (TokenKind::Illegal, ";".to_owned()),
                (TokenKind::Illegal, "open".to_owned()),
            ]
        );
    }

    #[test]
    fn test_string_keeps_whitespace() {
        assert_eq!(
            collect("\"  a  b \""),
            vec![(TokenKind::String, "  a  b ".to_owned())]
        );
    }

    #[test]
    fn test_exhaustion() {
        let mut lexer = Lexer::new("  42  ");
        assert!(lexer.has_next());
        assert_eq!(lexer.next_token(), Ok(Token::new(TokenKind::Int, "42")));
        assert!(!lexer.has_next());
        assert_eq!(lexer.next_token(), Err(LexerError::EmptySequence));
        assert_eq!(
            LexerError::EmptySequence.to_string(),
            "already reached EOF"
        );
    }

    #[test]
    fn test_empty_input() {
        let mut lexer = Lexer::new("   \n\t ");
        assert!(!lexer.has_next());
        assert_eq!(lexer.next(), None);
    }
}
