// Terminal confirmation for record writes.
//
// The question goes to stderr so stdout carries only the run report.

use ddns_core::Confirm;
use std::io::{self, BufRead, Write};

/// Asks on the terminal, accepting only `y` or `Y`
#[derive(Debug, Clone, Copy, Default)]
pub struct StdinConfirm;

impl Confirm for StdinConfirm {
    fn confirm(&self, question: &str) -> bool {
        ask(&mut io::stdin().lock(), &mut io::stderr(), question)
    }
}

/// Write the question, read one line, and interpret it
///
/// A read failure or end of input counts as "no".
fn ask(input: &mut impl BufRead, output: &mut impl Write, question: &str) -> bool {
    if write!(output, "{} [y/N] ", question)
        .and_then(|_| output.flush())
        .is_err()
    {
        return false;
    }

    let mut answer = String::new();
    match input.read_line(&mut answer) {
        Ok(0) | Err(_) => false,
        Ok(_) => is_affirmative(&answer),
    }
}

fn is_affirmative(answer: &str) -> bool {
    matches!(answer.trim(), "y" | "Y")
}
