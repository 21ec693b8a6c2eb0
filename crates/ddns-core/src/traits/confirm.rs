// # Confirmation Trait
//
// The engine asks before every record write unless the run assumes yes.
// Keeping the question behind a trait lets the engine run without a
// terminal; the binary supplies a stdin-backed implementation.

/// Yes/no gate consulted before mutating a record
pub trait Confirm: Send + Sync {
    /// Ask `question`; `true` only on an affirmative answer
    fn confirm(&self, question: &str) -> bool;
}

/// Answers every question the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedAnswer(pub bool);

impl Confirm for FixedAnswer {
    fn confirm(&self, _question: &str) -> bool {
        self.0
    }
}
