use std::mem;

use crate::ast::{Expression, InfixOperator, PrefixOperator};
use crate::lexer::{LexError, Lexer};
use crate::token::Token;

type Result<T> = std::result::Result<T, ParseError>;

/// Deepest expression tree the parser will build. Parentheses, unary minus, `if`, assignment and
/// each further operand of a binary operator chain all add a level.
pub const MAX_NESTING_DEPTH: usize = 256;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum ParseError {
    #[error("Unexpected token '{found}', expected {expected}")]
    UnexpectedToken { expected: &'static str, found: Token },
    #[error("Unexpected end of input, expected {expected}")]
    UnexpectedEndOfInput { expected: &'static str },
    #[error("Expression nests deeper than {} levels", MAX_NESTING_DEPTH)]
    NestingTooDeep,
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Parser is a recursive descent parser with one method per precedence level, from `if` down to
/// primary expressions. `cur_token` is always the next token that has not been consumed yet.
pub struct Parser<'a> {
    lexer: Lexer<'a>,
    cur_token: Token,
    peek_token: Option<Token>,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(lexer: Lexer<'a>) -> Result<Self> {
        let mut p = Parser {
            lexer,
            cur_token: Token::Eof,
            peek_token: None,
            depth: 0,
        };

        p.cur_token = p.lexer.next_token()?;

        Ok(p)
    }

    /// Consumes the current token and returns it. The lexer is never read past the end of input.
    fn next_token(&mut self) -> Result<Token> {
        if self.cur_token == Token::Eof {
            return Ok(Token::Eof);
        }

        let next = match self.peek_token.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };

        Ok(mem::replace(&mut self.cur_token, next))
    }

    fn peek_token(&mut self) -> Result<&Token> {
        if self.peek_token.is_none() {
            let token = if self.cur_token == Token::Eof {
                Token::Eof
            } else {
                self.lexer.next_token()?
            };
            self.peek_token = Some(token);
        }

        Ok(self.peek_token.get_or_insert(Token::Eof))
    }

    /// Enters one more level of nesting, returning the depth to restore on the way out.
    fn descend(&mut self) -> Result<usize> {
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(ParseError::NestingTooDeep);
        }
        self.depth += 1;

        Ok(self.depth - 1)
    }

    /// parse reads a single expression and requires that it spans the whole input.
    pub fn parse(&mut self) -> Result<Expression> {
        let expression = self.parse_conditional()?;
        self.expect(Token::Eof, "end of input")?;

        Ok(expression)
    }

    fn parse_conditional(&mut self) -> Result<Expression> {
        if self.cur_token != Token::If {
            return self.parse_assignment();
        }
        self.next_token()?;
        let depth = self.descend()?;

        let condition = self.parse_comparison()?;
        self.expect(Token::Then, "then")?;
        let consequence = self.parse_conditional()?;
        self.expect(Token::Else, "else")?;
        let alternative = self.parse_conditional()?;
        self.depth = depth;

        Ok(Expression::If(
            Box::new(condition),
            Box::new(consequence),
            Box::new(alternative),
        ))
    }

    fn parse_assignment(&mut self) -> Result<Expression> {
        let name = match &self.cur_token {
            Token::Ident(name) => name.clone(),
            _ => return self.parse_comparison(),
        };

        if *self.peek_token()? != Token::Assign {
            return self.parse_comparison();
        }
        self.next_token()?;
        self.next_token()?;
        let depth = self.descend()?;

        // Right-associative: `a = b = 3` binds b first.
        let value = self.parse_assignment()?;
        self.depth = depth;

        Ok(Expression::Assign(name, Box::new(value)))
    }

    fn parse_comparison(&mut self) -> Result<Expression> {
        let mut left = self.parse_additive()?;
        let depth = self.depth;

        loop {
            let operator = match self.cur_token {
                Token::Eq => InfixOperator::Eq,
                Token::Ne => InfixOperator::NotEq,
                Token::Gt => InfixOperator::Gt,
                Token::Lt => InfixOperator::Lt,
                _ => break,
            };
            self.next_token()?;
            // A left-leaning chain grows one level deeper per operator.
            self.descend()?;

            let right = self.parse_additive()?;
            left = Expression::Infix(operator, Box::new(left), Box::new(right));
        }
        self.depth = depth;

        Ok(left)
    }

    fn parse_additive(&mut self) -> Result<Expression> {
        let mut left = self.parse_multiplicative()?;
        let depth = self.depth;

        loop {
            let operator = match self.cur_token {
                Token::Plus => InfixOperator::Plus,
                Token::Minus => InfixOperator::Minus,
                _ => break,
            };
            self.next_token()?;
            self.descend()?;

            let right = self.parse_multiplicative()?;
            left = Expression::Infix(operator, Box::new(left), Box::new(right));
        }
        self.depth = depth;

        Ok(left)
    }

    fn parse_multiplicative(&mut self) -> Result<Expression> {
        let mut left = self.parse_unary()?;
        let depth = self.depth;

        loop {
            let operator = match self.cur_token {
                Token::Asterisk => InfixOperator::Asterisk,
                Token::Slash => InfixOperator::Slash,
                _ => break,
            };
            self.next_token()?;
            self.descend()?;

            let right = self.parse_unary()?;
            left = Expression::Infix(operator, Box::new(left), Box::new(right));
        }
        self.depth = depth;

        Ok(left)
    }

    fn parse_unary(&mut self) -> Result<Expression> {
        if self.cur_token != Token::Minus {
            return self.parse_primary();
        }
        self.next_token()?;
        let depth = self.descend()?;

        let right = self.parse_unary()?;
        self.depth = depth;

        Ok(Expression::Prefix(PrefixOperator::Minus, Box::new(right)))
    }

    fn parse_primary(&mut self) -> Result<Expression> {
        match self.cur_token {
            Token::Eof => {
                return Err(ParseError::UnexpectedEndOfInput {
                    expected: "expression",
                })
            }
            Token::Int(_) | Token::Str(_) | Token::Ident(_) | Token::OpenParen => {}
            _ => {
                return Err(ParseError::UnexpectedToken {
                    expected: "expression",
                    found: self.cur_token.clone(),
                })
            }
        }

        match self.next_token()? {
            Token::Int(v) => Ok(Expression::Integer(v)),
            Token::Str(s) => Ok(Expression::Str(s)),
            Token::Ident(name) => Ok(Expression::Identifier(name)),
            _ => {
                let depth = self.descend()?;
                let expression = self.parse_conditional()?;
                self.expect(Token::CloseParen, ")")?;
                self.depth = depth;

                Ok(expression)
            }
        }
    }

    fn expect(&mut self, token: Token, expected: &'static str) -> Result<()> {
        if self.cur_token == token {
            self.next_token()?;
            return Ok(());
        }

        match self.cur_token {
            Token::Eof => Err(ParseError::UnexpectedEndOfInput { expected }),
            _ => Err(ParseError::UnexpectedToken {
                expected,
                found: self.cur_token.clone(),
            }),
        }
    }
}

/// parse lexes and parses `input` into a single expression tree.
pub fn parse(input: &str) -> Result<Expression> {
    Parser::new(Lexer::new(input))?.parse()
}
