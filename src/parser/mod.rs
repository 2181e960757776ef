use crate::ast::{
    self, Expression, InfixOperator, PostfixOperator, PrefixOperator, Statement,
};
use crate::lexer::Lexer;
use crate::token::{Token, TokenKind};
use custom_error::custom_error;
use std::mem;
use std::rc::Rc;
use tracing::{debug, trace};


custom_error! {
    #[derive(Clone, PartialEq)]
    pub ParseError

    UnexpectedToken{found: Token, expected: String} = "Unexpected token {found}, expected {expected}",
    NoPrefixParser{token: Token} = "Unknown prefix function for expression: {token}",
    InvalidInteger{token: Token} = "not valid integer in current token: {token}",
    NotCallable{expression: String} = "Expected callable expression in left-hand side of call expression, got '{expression}'",
    NotIndexable{expression: String} = "Expected indexable expression in left-hand side of index expression, got '{expression}'",
    Incomplete{current: Token, peek: Token} = "An error occurred while parsing program: current token is {current}, peek token is {peek}",
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Precedence {
    Lowest,
    Comparison,
    Summation,
    Multiplication,
    Prefix,
    Postfix,
    Call,
    Index,
}

impl From<TokenKind> for Precedence {
    fn from(kind: TokenKind) -> Self {
        match kind {
            TokenKind::LT
            | TokenKind::GT
            | TokenKind::Eq
            | TokenKind::NEq
            | TokenKind::LTEq
            | TokenKind::GTEq => Self::Comparison,
            TokenKind::Plus | TokenKind::Minus => Self::Summation,
            TokenKind::Asterisk | TokenKind::Slash => Self::Multiplication,
            TokenKind::Increment | TokenKind::Decrement => Self::Postfix,
            TokenKind::LParen => Self::Call,
            TokenKind::LSquare => Self::Index,
            _ => Self::Lowest,
        }
    }
}

pub struct Parser {
    lexer: Lexer,
    cur_token: Token,
    peek_token: Token,
    errors: Vec<ParseError>,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Self {
        let cur_token = lexer.next().unwrap_or_else(Token::eof);
        let peek_token = lexer.next().unwrap_or_else(Token::eof);

        Self {
            lexer,
            cur_token,
            peek_token,
            errors: vec![],
        }
    }

    fn next_token(&mut self) {
        let peek = self.lexer.next().unwrap_or_else(Token::eof);
        self.cur_token = mem::replace(&mut self.peek_token, peek);
    }

    /// Parses the whole input. Returns `None` when any error was recorded;
    /// the messages are then available through [`Parser::errors`].
    pub fn parse(&mut self) -> Option<ast::Program> {
        let mut program = ast::Program::default();

        while !self.cur_token.is(TokenKind::Eof) {
            match self.parse_statement() {
                Some(stmt) => program.statements.push(stmt),
                None => {
                    if !self.peek_token.is(TokenKind::Eof) {
                        self.errors.push(ParseError::Incomplete {
                            current: self.cur_token.clone(),
                            peek: self.peek_token.clone(),
                        });
                    }
                    debug!(errors = self.errors.len(), "parsing stopped");
                    return None;
                }
            }
            self.next_token();
        }

        if self.errors.is_empty() {
            Some(program)
        } else {
            None
        }
    }

    pub fn errors(&self) -> &[ParseError] {
        &self.errors
    }

    pub fn parse_program(mut self) -> Result<ast::Program, Vec<ParseError>> {
        match self.parse() {
            Some(program) => Ok(program),
            None => Err(self.errors),
        }
    }

    fn parse_statement(&mut self) -> Option<Statement> {
        trace!(token = %self.cur_token, "statement");
        match self.cur_token.kind {
            TokenKind::Let => self.parse_let_statement().map(Statement::Let),
            TokenKind::Return => self.parse_return_statement().map(Statement::Return),
            TokenKind::While => self.parse_while_statement().map(Statement::While),
            _ => self
                .parse_expression_statement()
                .map(Statement::Expression),
        }
    }

    fn parse_let_statement(&mut self) -> Option<ast::LetStatement> {
        if !self.expect_peek(TokenKind::Identifier) {
            return None;
        }

        let name = ast::Identifier::from(self.cur_token.lexeme.clone());

        if !self.expect_peek(TokenKind::Assign) {
            return None;
        }
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        Some(ast::LetStatement { name, value })
    }

    fn parse_return_statement(&mut self) -> Option<ast::ReturnStatement> {
        self.next_token();

        let value = self.parse_expression(Precedence::Lowest)?;
        Some(ast::ReturnStatement { value })
    }

    fn parse_while_statement(&mut self) -> Option<ast::WhileStatement> {
        let condition = self.parse_condition()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;
        Some(ast::WhileStatement { condition, body })
    }

    fn parse_expression_statement(&mut self) -> Option<ast::ExpressionStatement> {
        let expression = self.parse_expression(Precedence::Lowest)?;
        Some(ast::ExpressionStatement { expression })
    }

    /// Expects the current token to be the opening brace.
    fn parse_block_statement(&mut self) -> Option<ast::BlockStatement> {
        self.next_token();

        let mut statements = vec![];
        while !self.cur_token.is(TokenKind::RBrace) && !self.cur_token.is(TokenKind::Eof) {
            statements.push(self.parse_statement()?);
            self.next_token();
        }

        if !self.cur_token.is(TokenKind::RBrace) {
            self.errors.push(ParseError::UnexpectedToken {
                found: self.cur_token.clone(),
                expected: TokenKind::RBrace.to_string(),
            });
            return None;
        }

        Some(ast::BlockStatement { statements })
    }

    fn parse_expression(&mut self, precedence: Precedence) -> Option<Expression> {
        let mut left = self.parse_prefix()?;

        while precedence < Precedence::from(self.peek_token.kind) {
            self.next_token();

            left = match PostfixOperator::from_token(self.cur_token.kind) {
                Some(operator) => Expression::Postfix(ast::PostfixExpression {
                    left: Box::new(left),
                    operator,
                }),
                None => match self.cur_token.kind {
                    TokenKind::LParen => self.parse_call_expression(left)?,
                    TokenKind::LSquare => self.parse_index_expression(left)?,
                    _ => self.parse_infix_expression(left)?,
                },
            };
        }

        Some(left)
    }

    fn parse_prefix(&mut self) -> Option<Expression> {
        match self.cur_token.kind {
            TokenKind::Int => self.parse_integer_literal(),
            TokenKind::True => Some(Expression::Boolean(true)),
            TokenKind::False => Some(Expression::Boolean(false)),
            TokenKind::Identifier => Some(Expression::Identifier(
                self.cur_token.lexeme.clone().into(),
            )),
            TokenKind::String => Some(Expression::String(self.cur_token.lexeme.clone())),
            TokenKind::LParen => self.parse_grouped_expression(),
            TokenKind::If => self.parse_conditional_expression(),
            TokenKind::Function => self.parse_function_literal(),
            TokenKind::LSquare => self
                .parse_expression_list(TokenKind::RSquare)
                .map(|elements| Expression::Array(elements.into())),
            kind => match PrefixOperator::from_token(kind) {
                Some(operator) => self.parse_prefix_expression(operator),
                None => {
                    self.errors.push(ParseError::NoPrefixParser {
                        token: self.cur_token.clone(),
                    });
                    None
                }
            },
        }
    }

    fn parse_integer_literal(&mut self) -> Option<Expression> {
        match self.cur_token.lexeme.parse() {
            Ok(value) => Some(Expression::Integer(value)),
            Err(_) => {
                self.errors.push(ParseError::InvalidInteger {
                    token: self.cur_token.clone(),
                });
                None
            }
        }
    }

    fn parse_prefix_expression(&mut self, operator: PrefixOperator) -> Option<Expression> {
        self.next_token();

        let right = self.parse_expression(Precedence::Prefix)?;
        Some(Expression::Prefix(ast::PrefixExpression {
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_infix_expression(&mut self, left: Expression) -> Option<Expression> {
        let operator = InfixOperator::from_token(self.cur_token.kind)?;
        let precedence = Precedence::from(self.cur_token.kind);
        self.next_token();

        let right = self.parse_expression(precedence)?;
        Some(Expression::Infix(ast::InfixExpression {
            left: Box::new(left),
            operator,
            right: Box::new(right),
        }))
    }

    fn parse_grouped_expression(&mut self) -> Option<Expression> {
        self.next_token();

        let expression = self.parse_expression(Precedence::Lowest)?;
        if self.expect_peek(TokenKind::RParen) {
            Some(expression)
        } else {
            None
        }
    }

    /// `( <expression> )` after `if` or `while`.
    fn parse_condition(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }
        self.next_token();

        let condition = self.parse_expression(Precedence::Lowest)?;
        if self.expect_peek(TokenKind::RParen) {
            Some(condition)
        } else {
            None
        }
    }

    fn parse_conditional_expression(&mut self) -> Option<Expression> {
        let condition = self.parse_condition()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }
        let consequence = self.parse_block_statement()?;

        let alternative = if self.peek_token.is(TokenKind::Else) {
            self.next_token();
            if !self.expect_peek(TokenKind::LBrace) {
                return None;
            }
            Some(self.parse_block_statement()?)
        } else {
            None
        };

        Some(Expression::Conditional(ast::ConditionalExpression {
            condition: Box::new(condition),
            consequence,
            alternative,
        }))
    }

    fn parse_function_literal(&mut self) -> Option<Expression> {
        if !self.expect_peek(TokenKind::LParen) {
            return None;
        }

        let parameters = self.parse_function_parameters()?;

        if !self.expect_peek(TokenKind::LBrace) {
            return None;
        }

        let body = self.parse_block_statement()?;
        Some(Expression::Function(ast::FunctionLiteral {
            parameters,
            body: Rc::new(body),
        }))
    }

    fn parse_function_parameters(&mut self) -> Option<Vec<ast::Identifier>> {
        let mut identifiers = vec![];

        if self.peek_token.is(TokenKind::RParen) {
            self.next_token();
            return Some(identifiers);
        }

        loop {
            if !self.expect_peek(TokenKind::Identifier) {
                return None;
            }
            identifiers.push(self.cur_token.lexeme.clone().into());

            if self.peek_token.is(TokenKind::Comma) {
                self.next_token();
            } else {
                break;
            }
        }

        if self.expect_list_end(TokenKind::RParen) {
            Some(identifiers)
        } else {
            None
        }
    }

    fn parse_call_expression(&mut self, function: Expression) -> Option<Expression> {
        if !function.is_callable() {
            self.errors.push(ParseError::NotCallable {
                expression: function.to_string(),
            });
            return None;
        }

        let arguments = self.parse_expression_list(TokenKind::RParen)?;
        Some(Expression::Call(ast::CallExpression {
            function: Box::new(function),
            arguments,
        }))
    }

    fn parse_index_expression(&mut self, left: Expression) -> Option<Expression> {
        if !left.is_indexable() {
            self.errors.push(ParseError::NotIndexable {
                expression: left.to_string(),
            });
            return None;
        }
        self.next_token();

        let index = self.parse_expression(Precedence::Lowest)?;
        if !self.expect_peek(TokenKind::RSquare) {
            return None;
        }

        Some(Expression::Index(ast::IndexExpression {
            left: Box::new(left),
            index: Box::new(index),
        }))
    }

    /// Comma separated expressions, starting on the opening delimiter.
    fn parse_expression_list(&mut self, end: TokenKind) -> Option<Vec<Expression>> {
        let mut list = vec![];

        if self.peek_token.is(end) {
            self.next_token();
            return Some(list);
        }

        self.next_token();
        list.push(self.parse_expression(Precedence::Lowest)?);

        while self.peek_token.is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            list.push(self.parse_expression(Precedence::Lowest)?);
        }

        if self.expect_list_end(end) {
            Some(list)
        } else {
            None
        }
    }

    fn expect_peek(&mut self, expected: TokenKind) -> bool {
        if self.peek_token.is(expected) {
            self.next_token();
            true
        } else {
            self.peek_error(&[expected]);
            false
        }
    }

    fn expect_list_end(&mut self, end: TokenKind) -> bool {
        if self.peek_token.is(end) {
            self.next_token();
            true
        } else {
            self.peek_error(&[TokenKind::Comma, end]);
            false
        }
    }

    fn peek_error(&mut self, expected: &[TokenKind]) {
        let expected = expected
            .iter()
            .map(TokenKind::to_string)
            .collect::<Vec<_>>()
            .join(" or ");

        self.errors.push(ParseError::UnexpectedToken {
            found: self.peek_token.clone(),
            expected,
        });
    }
}
