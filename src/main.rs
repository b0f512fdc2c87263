use std::fs;
use std::io;
use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use rcalc::repl;
use rcalc::Environment;

/// rcalc evaluates arithmetic, string, assignment and if-then-else expressions.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Evaluate every non-empty line of this file in one session.
    file: Option<PathBuf>,

    /// Evaluate a single expression and print the result.
    #[arg(short, long, conflicts_with = "file")]
    eval: Option<String>,

    /// Prompt shown by the interactive session.
    #[arg(long, default_value = repl::PROMPT)]
    prompt: String,
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if let Some(input) = args.eval {
        let mut env = Environment::new();
        let value = rcalc::evaluate(&input, &mut env)?;
        println!("{}", repl::format_value(&value));
        return Ok(());
    }

    if let Some(path) = args.file {
        let source = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read the input file '{}'", path.display()))?;
        let mut env = Environment::new();
        repl::run_script(&source, &mut env, io::stdout().lock())?;
        return Ok(());
    }

    repl::run(io::stdin().lock(), io::stdout().lock(), &args.prompt)?;

    Ok(())
}
