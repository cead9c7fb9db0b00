use crate::{Instruction, ProgramError};

/// Check that every `[` has a matching `]` and vice versa.
///
/// A single left-to-right pass with a nesting counter: a `]` that drives the counter
/// below zero is reported at its position, and a nonzero counter at the end is
/// reported as the number of loops left open.
pub fn validate(instructions: &[Instruction]) -> Result<(), ProgramError> {
    let mut depth: isize = 0;

    for (position, instruction) in instructions.iter().enumerate() {
        match instruction {
            Instruction::LoopOpen => depth += 1,
            Instruction::LoopClose => depth -= 1,
            _ => {}
        }

        if depth < 0 {
            return Err(ProgramError::UnmatchedLoopClose { position });
        }
    }

    if depth != 0 {
        return Err(ProgramError::UnmatchedLoopOpen { count: depth as usize });
    }

    Ok(())
}
