//! Instruction tags and the tokenizer that produces them.

use std::fmt;

use crate::ProgramError;

/// One of the eight Brainfuck instructions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Instruction {
    /// `>`
    MoveRight,
    /// `<`
    MoveLeft,
    /// `+`
    Increment,
    /// `-`
    Decrement,
    /// `.`
    Output,
    /// `,`
    Input,
    /// `[`
    LoopOpen,
    /// `]`
    LoopClose,
}

impl Instruction {
    /// Map a source symbol to its instruction, or `None` for anything outside `><+-.,[]`.
    pub fn from_symbol(symbol: char) -> Option<Self> {
        Some(match symbol {
            '>' => Instruction::MoveRight,
            '<' => Instruction::MoveLeft,
            '+' => Instruction::Increment,
            '-' => Instruction::Decrement,
            '.' => Instruction::Output,
            ',' => Instruction::Input,
            '[' => Instruction::LoopOpen,
            ']' => Instruction::LoopClose,
            _ => return None,
        })
    }

    /// The source symbol for this instruction.
    pub fn symbol(self) -> char {
        match self {
            Instruction::MoveRight => '>',
            Instruction::MoveLeft => '<',
            Instruction::Increment => '+',
            Instruction::Decrement => '-',
            Instruction::Output => '.',
            Instruction::Input => ',',
            Instruction::LoopOpen => '[',
            Instruction::LoopClose => ']',
        }
    }

    /// Tag name shown in trace tables.
    pub fn name(self) -> &'static str {
        match self {
            Instruction::MoveRight => "PTR_RIGHT",
            Instruction::MoveLeft => "PTR_LEFT",
            Instruction::Increment => "INCR",
            Instruction::Decrement => "DECR",
            Instruction::Output => "OUTP",
            Instruction::Input => "INP",
            Instruction::LoopOpen => "LOOP_BEG",
            Instruction::LoopClose => "LOOP_END",
        }
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Convert cleaned source symbols into an instruction sequence.
///
/// Every character must be one of `><+-.,[]`; callers are expected to run the text
/// through [`filter_source`](crate::filter_source) first. The first character outside
/// the alphabet aborts tokenizing with [`ProgramError::UnrecognizedSymbol`] and no
/// partial sequence is returned.
pub fn tokenize(symbols: &str) -> Result<Vec<Instruction>, ProgramError> {
    symbols
        .chars()
        .enumerate()
        .map(|(position, symbol)| {
            Instruction::from_symbol(symbol)
                .ok_or(ProgramError::UnrecognizedSymbol { symbol, position })
        })
        .collect()
}
