use std::iter::Peekable;
use std::str::Chars;

use crate::token;
use crate::token::Token;

type Result<T> = std::result::Result<T, LexError>;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum LexError {
    #[error("Unterminated string literal")]
    UnterminatedString,
    #[error("Unrecognized character '{0}'")]
    UnrecognizedCharacter(char),
    #[error("Integer literal {0} is out of range")]
    IntegerOutOfRange(String),
}

/// Lexer turns source text into tokens on demand. It makes a single forward pass over the input
/// and cannot be rewound; once it has produced `Token::Eof` or an error, it is exhausted.
pub struct Lexer<'a> {
    input: Peekable<Chars<'a>>,
    finished: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Lexer<'a> {
        Lexer {
            input: input.chars().peekable(),
            finished: false,
        }
    }

    fn read_char(&mut self) -> Option<char> {
        self.input.next()
    }

    fn peek_char(&mut self) -> Option<char> {
        self.input.peek().copied()
    }

    fn peek_if<F>(&mut self, mut predicate: F) -> bool
    where
        F: FnMut(char) -> bool,
    {
        match self.peek_char() {
            Some(ch) => predicate(ch),
            None => false,
        }
    }

    fn read_while<F>(&mut self, first: char, predicate: F) -> String
    where
        F: Fn(char) -> bool,
    {
        let mut res = String::new();
        res.push(first);

        while let Some(c) = self.input.next_if(|&c| predicate(c)) {
            res.push(c);
        }

        res
    }

    fn read_number(&mut self, first: char) -> Result<i64> {
        let number = self.read_while(first, |c| c.is_ascii_digit());

        number
            .parse()
            .map_err(|_| LexError::IntegerOutOfRange(number))
    }

    fn read_string(&mut self) -> Result<String> {
        let mut res = String::new();

        loop {
            match self.read_char() {
                Some('"') => return Ok(res),
                Some(c) => res.push(c),
                None => return Err(LexError::UnterminatedString),
            }
        }
    }

    fn skip_whitespace(&mut self) {
        while self.peek_if(|c| c.is_whitespace()) {
            self.read_char();
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_whitespace();

        let token = match self.read_char() {
            Some('=') => {
                if let Some('=') = self.peek_char() {
                    self.read_char();
                    Token::Eq
                } else {
                    Token::Assign
                }
            }
            Some('!') => {
                if let Some('=') = self.peek_char() {
                    self.read_char();
                    Token::Ne
                } else {
                    return Err(LexError::UnrecognizedCharacter('!'));
                }
            }
            Some('+') => Token::Plus,
            Some('-') => Token::Minus,
            Some('*') => Token::Asterisk,
            Some('/') => Token::Slash,
            Some('<') => Token::Lt,
            Some('>') => Token::Gt,
            Some('(') => Token::OpenParen,
            Some(')') => Token::CloseParen,
            Some('"') => Token::Str(self.read_string()?),
            Some(c) => {
                if is_id_start(c) {
                    token::lookup_ident(&self.read_while(c, is_id_continue))
                } else if c.is_ascii_digit() {
                    Token::Int(self.read_number(c)?)
                } else {
                    return Err(LexError::UnrecognizedCharacter(c));
                }
            }
            None => Token::Eof,
        };

        Ok(token)
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Result<Token>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let res = self.next_token();
        if matches!(res, Ok(Token::Eof) | Err(_)) {
            self.finished = true;
        }

        Some(res)
    }
}

fn is_id_start(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_uppercase() || c == '_'
}

fn is_id_continue(c: char) -> bool {
    is_id_start(c) || c.is_ascii_digit()
}
