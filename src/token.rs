use std::fmt;

/// Enum representing common lexeme types.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum Token {
    Eof,

    Ident(String),
    Int(i64),
    Str(String),

    /// "="
    Assign,
    /// "+"
    Plus,
    /// "-"
    Minus,
    /// "*"
    Asterisk,
    /// "/"
    Slash,
    /// "=="
    Eq,
    /// "!="
    Ne,
    /// "<"
    Lt,
    /// ">"
    Gt,
    /// "("
    OpenParen,
    /// ")"
    CloseParen,

    // Keywords
    /// "if"
    If,
    /// "then"
    Then,
    /// "else"
    Else,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "end of input"),
            Token::Ident(name) => write!(f, "{}", name),
            Token::Int(v) => write!(f, "{}", v),
            Token::Str(s) => write!(f, "\"{}\"", s),
            Token::Assign => write!(f, "="),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Asterisk => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Eq => write!(f, "=="),
            Token::Ne => write!(f, "!="),
            Token::Lt => write!(f, "<"),
            Token::Gt => write!(f, ">"),
            Token::OpenParen => write!(f, "("),
            Token::CloseParen => write!(f, ")"),
            Token::If => write!(f, "if"),
            Token::Then => write!(f, "then"),
            Token::Else => write!(f, "else"),
        }
    }
}

pub fn lookup_ident(ident: &str) -> Token {
    keyword_to_token(ident).unwrap_or_else(|| Token::Ident(ident.to_owned()))
}

fn keyword_to_token(keyword: &str) -> Option<Token> {
    match keyword {
        "if" => Some(Token::If),
        "then" => Some(Token::Then),
        "else" => Some(Token::Else),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{lookup_ident, Token};

    #[test]
    fn keywords_are_reserved() {
        let tests = vec![
            ("if", Token::If),
            ("then", Token::Then),
            ("else", Token::Else),
            ("iff", Token::Ident("iff".to_owned())),
            ("Then", Token::Ident("Then".to_owned())),
            ("x", Token::Ident("x".to_owned())),
        ];

        for (input, expected) in tests {
            assert_eq!(expected, lookup_ident(input), "for `{}`", input);
        }
    }
}
