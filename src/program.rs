use std::ops::Deref;

use crate::{tokenize, validate, Instruction};

/// Errors that make a program unrunnable. All are detected before execution starts.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProgramError {
    /// A character outside the instruction set `><+-.,[]` reached the tokenizer.
    #[error("Character '{symbol}' at position {position} is not inside the list of characters")]
    UnrecognizedSymbol { symbol: char, position: usize },

    /// A `]` was found with no `[` before it.
    #[error("The loop ended at position {position} does not have a beginning")]
    UnmatchedLoopClose { position: usize },

    /// One or more `[` were still open at the end of the program.
    #[error("Expected all loops to be closed, but {count} loops are not closed")]
    UnmatchedLoopOpen { count: usize },
}

impl ProgramError {
    /// Position in the cleaned source the error points at, if it has one.
    pub fn position(&self) -> Option<usize> {
        match self {
            ProgramError::UnrecognizedSymbol { position, .. }
            | ProgramError::UnmatchedLoopClose { position } => Some(*position),
            ProgramError::UnmatchedLoopOpen { .. } => None,
        }
    }
}

/// An instruction sequence that has passed [`validate`].
///
/// The interpreter only accepts a `Program` through its checked constructors, so a
/// value of this type is proof that the loops are balanced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Program {
    instructions: Vec<Instruction>,
}

impl Program {
    /// Tokenize and validate cleaned source symbols.
    pub fn parse(symbols: &str) -> Result<Self, ProgramError> {
        let instructions = tokenize(symbols)?;
        Self::from_instructions(instructions)
    }

    /// Validate an already tokenized sequence.
    pub fn from_instructions(instructions: Vec<Instruction>) -> Result<Self, ProgramError> {
        validate(&instructions)?;
        Ok(Self { instructions })
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn into_instructions(self) -> Vec<Instruction> {
        self.instructions
    }
}

impl Deref for Program {
    type Target = [Instruction];

    fn deref(&self) -> &[Instruction] {
        &self.instructions
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_accepts_balanced_code() {
        let program = Program::parse("+[->+<]").unwrap();
        assert_eq!(program.len(), 7);
        assert_eq!(program[1], Instruction::LoopOpen);
    }

    #[test]
    fn parse_reports_tokenizer_errors_first() {
        let err = Program::parse("]x").unwrap_err();
        assert_eq!(err, ProgramError::UnrecognizedSymbol { symbol: 'x', position: 1 });
    }

    #[test]
    fn parse_reports_validation_errors() {
        assert_eq!(
            Program::parse("[[").unwrap_err(),
            ProgramError::UnmatchedLoopOpen { count: 2 }
        );
    }

    #[test]
    fn error_positions() {
        assert_eq!(ProgramError::UnmatchedLoopClose { position: 4 }.position(), Some(4));
        assert_eq!(ProgramError::UnmatchedLoopOpen { count: 1 }.position(), None);
    }

    #[test]
    fn messages_name_the_problem() {
        let msg = ProgramError::UnmatchedLoopOpen { count: 3 }.to_string();
        assert!(msg.contains("3 loops are not closed"));
    }
}
