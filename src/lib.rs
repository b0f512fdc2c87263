pub mod ast;
pub mod evaluator;
pub mod lexer;
pub mod parser;
pub mod repl;
pub mod token;
pub mod value;

use crate::evaluator::RuntimeError;
use crate::lexer::LexError;
use crate::parser::ParseError;
pub use crate::value::{Environment, Value};

/// Error is the first failure of any stage of [`evaluate`].
#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum Error {
    #[error(transparent)]
    Lex(#[from] LexError),
    #[error(transparent)]
    Parse(ParseError),
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl From<ParseError> for Error {
    fn from(err: ParseError) -> Self {
        match err {
            ParseError::Lex(err) => Error::Lex(err),
            err => Error::Parse(err),
        }
    }
}

/// evaluate lexes, parses and evaluates `input` against `env`, stopping at the first error.
/// Bindings made by assignments stay in `env` for later calls.
pub fn evaluate(input: &str, env: &mut Environment) -> Result<Value, Error> {
    let expression = parser::parse(input)?;

    Ok(evaluator::eval(&expression, env)?)
}
