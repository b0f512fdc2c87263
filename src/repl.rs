use crate::value::{Environment, Value};
use crate::{evaluate, Error};
use std::io;
use std::io::{BufRead, Write};

pub const PROMPT: &str = "calc > ";

#[derive(thiserror::Error, Debug)]
pub enum ReplError {
    #[error("line {line}: {source}")]
    Eval { line: usize, source: Error },
    #[error(transparent)]
    Io(#[from] io::Error),
}

/// run reads lines from `input` until end of input and evaluates each one against a single
/// session environment. Errors are reported and the session carries on.
pub fn run<R: BufRead, W: Write>(mut input: R, mut output: W, prompt: &str) -> io::Result<()> {
    let mut env = Environment::new();

    writeln!(output, "Press Ctrl-D to exit.")?;

    loop {
        write!(output, "{}", prompt)?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            return Ok(());
        }

        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match evaluate(line, &mut env) {
            Ok(value) => writeln!(output, "{}", format_value(&value))?,
            Err(err) => writeln!(output, "Error: {}", err)?,
        }
    }
}

/// run_script evaluates every non-empty line of `source` in order against `env`, printing each
/// result. It stops at the first error.
pub fn run_script<W: Write>(
    source: &str,
    env: &mut Environment,
    mut output: W,
) -> Result<(), ReplError> {
    for (index, line) in source.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value = evaluate(line, env).map_err(|source| ReplError::Eval {
            line: index + 1,
            source,
        })?;
        writeln!(output, "{}", format_value(&value))?;
    }

    Ok(())
}

/// format_value renders strings in single quotes so they can be told apart from integers.
pub fn format_value(value: &Value) -> String {
    match value {
        Value::Integer(v) => v.to_string(),
        Value::Str(s) => format!("'{}'", s),
    }
}

#[cfg(test)]
mod tests {
    use super::{format_value, run, run_script, ReplError};
    use crate::evaluator::RuntimeError;
    use crate::value::{Environment, Value};
    use crate::Error;
    use std::io::Cursor;

    fn run_session(input: &str) -> String {
        let mut output = Vec::new();
        run(Cursor::new(input), &mut output, "> ").unwrap();

        String::from_utf8(output).unwrap()
    }

    #[test]
    fn session_keeps_bindings_between_lines() {
        let output = run_session("x = 5\n\n   \nx + 1\n\"a\" * x\n");

        assert_eq!(
            "Press Ctrl-D to exit.\n> 5\n> > > 6\n> 'aaaaa'\n> \n",
            output
        );
    }

    #[test]
    fn session_reports_errors_and_continues() {
        let output = run_session("z + 1\n1 +\nz = 2\nz + 1");

        assert_eq!(
            "Press Ctrl-D to exit.\n\
             > Error: Identifier not found: z\n\
             > Error: Unexpected end of input, expected expression\n\
             > 2\n\
             > 3\n\
             > \n",
            output
        );
    }

    #[test]
    fn session_survives_deeply_nested_input() {
        let input = format!("{}1\n\"ab\" * 5000000000000000000\n2\n", "(".repeat(100000));
        let output = run_session(&input);

        assert_eq!(
            "Press Ctrl-D to exit.\n\
             > Error: Expression nests deeper than 256 levels\n\
             > Error: String result is longer than 16777216 bytes\n\
             > 2\n\
             > \n",
            output
        );
    }

    #[test]
    fn script_stops_at_first_error() {
        let mut env = Environment::new();
        let mut output = Vec::new();

        let res = run_script("a = 1\n\nb = a / 0\nc = 3\n", &mut env, &mut output);

        match res {
            Err(ReplError::Eval { line, source }) => {
                assert_eq!(3, line);
                assert_eq!(Error::Runtime(RuntimeError::DivisionByZero), source);
            }
            other => panic!("expected an evaluation error, got {:?}", other),
        }
        assert_eq!("1\n", String::from_utf8(output).unwrap());
        assert!(!env.contains("c"));
    }

    #[test]
    fn values_are_formatted_by_type() {
        assert_eq!("42", format_value(&Value::Integer(42)));
        assert_eq!("'42'", format_value(&Value::Str("42".to_owned())));
    }
}
