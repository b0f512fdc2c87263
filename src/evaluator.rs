use crate::ast::{Expression, InfixOperator, PrefixOperator};
use crate::value::{Environment, Value};
use std::fmt;

pub type EvalResult = std::result::Result<Value, RuntimeError>;

#[derive(thiserror::Error, Clone, Debug, PartialEq, Eq)]
pub enum RuntimeError {
    #[error("Identifier not found: {0}")]
    UndefinedVariable(String),
    #[error("Type mismatch: {0}")]
    TypeMismatch(Mismatch),
    #[error("Division by zero")]
    DivisionByZero,
    #[error("Integer overflow")]
    IntegerOverflow,
    #[error("String result is longer than {} bytes", MAX_STRING_LENGTH)]
    StringTooLong,
}

/// Longest string, in bytes, that concatenation or repetition may produce.
pub const MAX_STRING_LENGTH: usize = 1 << 24;

/// Mismatch records the operation that was applied to operands of the wrong type.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    Infix(InfixOperator, Value, Value),
    Prefix(PrefixOperator, Value),
    Condition(Value),
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Mismatch::Infix(operator, left, right) => write!(
                f,
                "{} {} {}",
                left.type_name(),
                operator,
                right.type_name()
            ),
            Mismatch::Prefix(operator, right) => write!(f, "{}{}", operator, right.type_name()),
            Mismatch::Condition(condition) => {
                write!(f, "if condition must be INTEGER, got {}", condition.type_name())
            }
        }
    }
}

/// eval walks `expression` against `env`. Assignment is the only way evaluation changes `env`.
pub fn eval(expression: &Expression, env: &mut Environment) -> EvalResult {
    match expression {
        Expression::Integer(v) => Ok(Value::Integer(*v)),
        Expression::Str(s) => Ok(Value::Str(s.clone())),
        Expression::Identifier(name) => env
            .get(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable(name.clone())),
        Expression::Assign(name, value) => {
            let value = eval(value, env)?;
            env.set(name, value.clone());
            Ok(value)
        }
        Expression::Prefix(operator, right) => {
            let right = eval(right, env)?;
            eval_prefix_expression(*operator, right)
        }
        Expression::Infix(operator, left, right) => {
            // Left is fully evaluated first, so its assignments are visible to the right.
            let left = eval(left, env)?;
            let right = eval(right, env)?;
            eval_infix_expression(*operator, left, right)
        }
        Expression::If(condition, consequence, alternative) => {
            eval_if_expression(condition, consequence, alternative, env)
        }
    }
}

fn eval_prefix_expression(operator: PrefixOperator, right: Value) -> EvalResult {
    match (operator, right) {
        (PrefixOperator::Minus, Value::Integer(v)) => v
            .checked_neg()
            .map(Value::Integer)
            .ok_or(RuntimeError::IntegerOverflow),
        (operator, right) => Err(RuntimeError::TypeMismatch(Mismatch::Prefix(operator, right))),
    }
}

fn eval_infix_expression(operator: InfixOperator, left: Value, right: Value) -> EvalResult {
    match (operator, left, right) {
        // Values of different types are never equal.
        (InfixOperator::Eq, left, right) => Ok(Value::from(left == right)),
        (InfixOperator::NotEq, left, right) => Ok(Value::from(left != right)),
        (InfixOperator::Gt, Value::Integer(left), Value::Integer(right)) => {
            Ok(Value::from(left > right))
        }
        (InfixOperator::Lt, Value::Integer(left), Value::Integer(right)) => {
            Ok(Value::from(left < right))
        }
        // `str` ordering is byte-wise over UTF-8, which matches ordering by code point.
        (InfixOperator::Gt, Value::Str(left), Value::Str(right)) => Ok(Value::from(left > right)),
        (InfixOperator::Lt, Value::Str(left), Value::Str(right)) => Ok(Value::from(left < right)),
        (InfixOperator::Plus, Value::Integer(left), Value::Integer(right)) => {
            checked_integer(left.checked_add(right))
        }
        (InfixOperator::Minus, Value::Integer(left), Value::Integer(right)) => {
            checked_integer(left.checked_sub(right))
        }
        (InfixOperator::Asterisk, Value::Integer(left), Value::Integer(right)) => {
            checked_integer(left.checked_mul(right))
        }
        (InfixOperator::Slash, Value::Integer(_), Value::Integer(0)) => {
            Err(RuntimeError::DivisionByZero)
        }
        // Truncates toward zero.
        (InfixOperator::Slash, Value::Integer(left), Value::Integer(right)) => {
            checked_integer(left.checked_div(right))
        }
        (InfixOperator::Plus, Value::Str(left), Value::Str(right)) => concat_strings(left, &right),
        (InfixOperator::Asterisk, Value::Str(s), Value::Integer(n))
        | (InfixOperator::Asterisk, Value::Integer(n), Value::Str(s)) => repeat_string(&s, n),
        (operator, left, right) => Err(RuntimeError::TypeMismatch(Mismatch::Infix(
            operator, left, right,
        ))),
    }
}

fn checked_integer(res: Option<i64>) -> EvalResult {
    res.map(Value::Integer).ok_or(RuntimeError::IntegerOverflow)
}

fn concat_strings(mut left: String, right: &str) -> EvalResult {
    if left.len() + right.len() > MAX_STRING_LENGTH {
        return Err(RuntimeError::StringTooLong);
    }
    left.push_str(right);

    Ok(Value::Str(left))
}

fn repeat_string(s: &str, times: i64) -> EvalResult {
    if times <= 0 {
        return Ok(Value::Str(String::new()));
    }

    let times = usize::try_from(times).map_err(|_| RuntimeError::StringTooLong)?;
    match s.len().checked_mul(times) {
        Some(len) if len <= MAX_STRING_LENGTH => Ok(Value::Str(s.repeat(times))),
        _ => Err(RuntimeError::StringTooLong),
    }
}

fn eval_if_expression(
    condition: &Expression,
    consequence: &Expression,
    alternative: &Expression,
    env: &mut Environment,
) -> EvalResult {
    // Only the selected branch is evaluated.
    match eval(condition, env)? {
        Value::Integer(0) => eval(alternative, env),
        Value::Integer(_) => eval(consequence, env),
        condition => Err(RuntimeError::TypeMismatch(Mismatch::Condition(condition))),
    }
}
