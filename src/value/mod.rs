pub use crate::value::environment::Environment;
use std::fmt;

pub mod environment;

/// Value is the result of evaluating an expression. There is no boolean type; comparisons produce
/// `Integer(1)` or `Integer(0)`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Value {
    Integer(i64),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Integer(v) => write!(f, "{}", v),
            Value::Str(s) => write!(f, "{}", s),
        }
    }
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::Integer(_) => "INTEGER",
            Value::Str(_) => "STRING",
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Integer(i64::from(b))
    }
}
