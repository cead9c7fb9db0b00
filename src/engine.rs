//! The execution engine.
//!
//! Behaviours:
//! - Memory tape of fixed length (30,000 cells by default) initialized to 0.
//! - The data pointer wraps around: moving left of cell 0 lands on the last cell and
//!   moving right of the last cell lands on cell 0.
//! - Cells are bytes and wrap on overflow/underflow.
//! - Input `,` reads a single byte; at end of input the current cell is left as is.
//! - Output `.` writes the current cell as a single raw byte.
//! - Loops are resolved while running: a `[` on a zero cell scans forward to its
//!   matching `]`, and a `]` on a nonzero cell jumps back to the `[` that opened it.
//!
//! Quick start:
//!
//! ```no_run
//! use tape_bf::{Interpreter, Program};
//!
//! let program = Program::parse("++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.").unwrap();
//! let mut bf = Interpreter::new(program);
//! bf.run().expect("program should run");
//! ```

use std::collections::TryReserveError;
use std::io::{self, Read, Write};

use crate::{Instruction, Program};

/// Default number of cells on the tape.
pub const DEFAULT_TAPE_LENGTH: usize = 30_000;

/// Snapshot of the machine taken just before an instruction executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    /// Position of the instruction in the sequence.
    pub position: usize,
    pub instruction: Instruction,
    /// Data pointer before the instruction ran.
    pub pointer: usize,
    /// Value of the cell under the pointer before the instruction ran.
    pub cell: u8,
}

/// A Brainfuck interpreter.
///
/// The interpreter owns:
/// - the instruction sequence,
/// - a fixed-length memory tape of zeroed cells,
/// - the data pointer and the instruction cursor,
/// - the stack of positions of the loops currently being executed.
pub struct Interpreter {
    instructions: Vec<Instruction>,
    memory: Vec<u8>,
    pointer: usize,
    cursor: usize,
    loop_entries: Vec<usize>,
}

impl Interpreter {
    /// Create an interpreter for `program` with a tape of [`DEFAULT_TAPE_LENGTH`] cells.
    pub fn new(program: Program) -> Self {
        Self::with_tape_length(program, DEFAULT_TAPE_LENGTH)
    }

    /// Create an interpreter for `program` with a custom tape length.
    pub fn with_tape_length(program: Program, tape_length: usize) -> Self {
        Self::from_instructions(program.into_instructions(), tape_length)
    }

    /// Like [`with_tape_length`](Self::with_tape_length), but reports a tape that cannot
    /// be allocated instead of aborting.
    pub fn try_with_tape_length(program: Program, tape_length: usize) -> Result<Self, TryReserveError> {
        let cells = tape_length.max(1);
        let mut memory = Vec::new();
        memory.try_reserve_exact(cells)?;
        memory.resize(cells, 0);
        Ok(Self {
            instructions: program.into_instructions(),
            memory,
            pointer: 0,
            cursor: 0,
            loop_entries: Vec::new(),
        })
    }

    /// Create an interpreter from an instruction sequence that has not gone through
    /// [`Program`].
    ///
    /// The caller is responsible for loop balance. On an unbalanced sequence the run
    /// still terminates without panicking, but what it computes is unspecified.
    /// A tape length of 0 is raised to a single cell.
    pub fn from_instructions(instructions: Vec<Instruction>, tape_length: usize) -> Self {
        Self {
            instructions,
            memory: vec![0; tape_length.max(1)],
            pointer: 0,
            cursor: 0,
            loop_entries: Vec::new(),
        }
    }

    pub fn pointer(&self) -> usize {
        self.pointer
    }

    /// Position of the next instruction to execute.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn tape(&self) -> &[u8] {
        &self.memory
    }

    pub fn current_cell(&self) -> u8 {
        self.memory[self.pointer]
    }

    /// Number of loops entered and not yet left.
    pub fn loop_depth(&self) -> usize {
        self.loop_entries.len()
    }

    /// True once the cursor has run off the end of the program.
    pub fn is_halted(&self) -> bool {
        self.cursor >= self.instructions.len()
    }

    /// Execute the program on stdin/stdout until completion.
    ///
    /// The handles are not held locked for the whole run, so other threads (a signal
    /// handler, say) can still flush stdout.
    pub fn run(&mut self) -> io::Result<()> {
        self.run_with(&mut io::stdin(), &mut io::stdout())
    }

    /// Execute the program until completion, reading `,` bytes from `input` and
    /// writing `.` bytes to `output`.
    ///
    /// Only I/O errors from the two streams are reported; everything else the program
    /// can do is defined behaviour.
    pub fn run_with<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<()> {
        while self.step(input, output)?.is_some() {}
        output.flush()
    }

    /// Execute a single instruction.
    ///
    /// Returns a snapshot of the state before the instruction ran, or `None` if the
    /// program has already finished.
    pub fn step<R: Read, W: Write>(&mut self, input: &mut R, output: &mut W) -> io::Result<Option<Step>> {
        let Some(&instruction) = self.instructions.get(self.cursor) else {
            return Ok(None);
        };

        let step = Step {
            position: self.cursor,
            instruction,
            pointer: self.pointer,
            cell: self.memory[self.pointer],
        };

        match instruction {
            Instruction::MoveRight => {
                self.pointer = wrap(self.pointer as isize + 1, self.memory.len());
            }
            Instruction::MoveLeft => {
                self.pointer = wrap(self.pointer as isize - 1, self.memory.len());
            }
            Instruction::Increment => {
                self.memory[self.pointer] = self.memory[self.pointer].wrapping_add(1);
            }
            Instruction::Decrement => {
                self.memory[self.pointer] = self.memory[self.pointer].wrapping_sub(1);
            }
            Instruction::Output => {
                output.write_all(&[self.memory[self.pointer]])?;
            }
            Instruction::Input => {
                // Anything printed so far may be a prompt for this read.
                output.flush()?;
                if let Some(byte) = read_byte(input)? {
                    self.memory[self.pointer] = byte;
                }
            }
            Instruction::LoopOpen => {
                if self.memory[self.pointer] == 0 {
                    self.skip_loop();
                } else {
                    self.loop_entries.push(self.cursor);
                }
            }
            Instruction::LoopClose => {
                let open = self.loop_entries.pop();
                if self.memory[self.pointer] != 0 {
                    if let Some(open) = open {
                        // Land on the `[` itself; it re-checks the cell and re-enters.
                        self.cursor = open;
                        return Ok(Some(step));
                    }
                }
            }
        }

        self.cursor += 1;
        Ok(Some(step))
    }

    /// Move the cursor from a `[` onto its matching `]`, counting nested loops on the way.
    fn skip_loop(&mut self) {
        let mut depth = 1usize;
        while depth != 0 && self.cursor < self.instructions.len() {
            self.cursor += 1;
            match self.instructions.get(self.cursor) {
                Some(Instruction::LoopOpen) => depth += 1,
                Some(Instruction::LoopClose) => depth -= 1,
                _ => {}
            }
        }
    }
}

/// Wrap `value` into `[0, len)`.
fn wrap(value: isize, len: usize) -> usize {
    value.rem_euclid(len as isize) as usize
}

/// Read one byte, returning `None` at end of input.
fn read_byte<R: Read>(input: &mut R) -> io::Result<Option<u8>> {
    let mut buf = [0u8; 1];
    loop {
        match input.read(&mut buf) {
            Ok(0) => return Ok(None),
            Ok(_) => return Ok(Some(buf[0])),
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Instruction::*;

    fn interpreter(code: &str, tape_length: usize) -> Interpreter {
        Interpreter::with_tape_length(Program::parse(code).unwrap(), tape_length)
    }

    fn run(bf: &mut Interpreter, input: &[u8]) -> Vec<u8> {
        let mut output = Vec::new();
        bf.run_with(&mut &input[..], &mut output).unwrap();
        output
    }

    #[test]
    fn empty_program_is_a_no_op() {
        let mut bf = interpreter("", 10);
        assert!(bf.is_halted());
        assert!(run(&mut bf, b"").is_empty());
        assert_eq!(bf.pointer(), 0);
        assert!(bf.tape().iter().all(|&c| c == 0));
    }

    #[test]
    fn default_tape_has_thirty_thousand_cells() {
        let bf = Interpreter::new(Program::default());
        assert_eq!(bf.tape().len(), DEFAULT_TAPE_LENGTH);
    }

    #[test]
    fn move_left_from_zero_wraps_to_last_cell() {
        let mut bf = interpreter("<", 10);
        run(&mut bf, b"");
        assert_eq!(bf.pointer(), 9);
    }

    #[test]
    fn move_right_from_last_cell_wraps_to_zero() {
        let mut bf = interpreter(&">".repeat(3), 3);
        run(&mut bf, b"");
        assert_eq!(bf.pointer(), 0);

        let mut bf = interpreter("<>", 5);
        run(&mut bf, b"");
        assert_eq!(bf.pointer(), 0);
    }

    #[test]
    fn wraparound_cell_is_addressable() {
        let mut bf = interpreter("<+++", 4);
        run(&mut bf, b"");
        assert_eq!(bf.tape(), &[0, 0, 0, 3]);
    }

    #[test]
    fn wrapping_addition() {
        let mut bf = interpreter(&"+".repeat(255), 1);
        run(&mut bf, b"");
        assert_eq!(bf.current_cell(), 255);

        let mut bf = interpreter(&"+".repeat(256), 1);
        run(&mut bf, b"");
        assert_eq!(bf.current_cell(), 0);
    }

    #[test]
    fn wrapping_subtraction() {
        let mut bf = interpreter("-", 1);
        run(&mut bf, b"");
        assert_eq!(bf.memory[0], 255);
    }

    #[test]
    fn zero_tape_length_is_raised_to_one_cell() {
        let mut bf = Interpreter::from_instructions(vec![MoveRight, Increment], 0);
        run(&mut bf, b"");
        assert_eq!(bf.tape(), &[1]);
    }

    #[test]
    fn impossible_tape_is_an_error() {
        assert!(Interpreter::try_with_tape_length(Program::default(), usize::MAX).is_err());
        let bf = Interpreter::try_with_tape_length(Program::default(), 16).unwrap();
        assert_eq!(bf.tape(), &[0; 16]);
    }

    #[test]
    fn output_writes_raw_bytes() {
        let mut bf = interpreter(&format!("{}.-.", "+".repeat(72)), 10);
        assert_eq!(run(&mut bf, b""), b"HG");

        let mut bf = interpreter("-.", 10);
        assert_eq!(run(&mut bf, b""), vec![255]);
    }

    #[test]
    fn input_echoes_bytes() {
        // End of input leaves the last byte in place, so a NUL terminates the loop.
        let mut bf = interpreter(",[.,]", 10);
        assert_eq!(run(&mut bf, b"hello\0"), b"hello");
    }

    #[test]
    fn input_at_end_of_stream_leaves_cell_unchanged() {
        let mut bf = interpreter("+++++,", 10);
        run(&mut bf, b"");
        assert_eq!(bf.current_cell(), 5);
    }

    #[test]
    fn skip_mode_never_runs_the_body() {
        let mut bf = Interpreter::from_instructions(vec![LoopOpen, Increment, LoopClose], 10);
        run(&mut bf, b"");
        assert_eq!(bf.current_cell(), 0);
        assert!(bf.is_halted());
        assert_eq!(bf.loop_depth(), 0);
    }

    #[test]
    fn nested_skip_passes_both_closes() {
        let mut bf = interpreter("[[+]]", 10);
        let mut executed = Vec::new();
        let mut output = Vec::new();
        while let Some(step) = bf.step(&mut &b""[..], &mut output).unwrap() {
            executed.push(step.position);
        }
        // Only the outer `[` runs; the skip lands past the outer `]`.
        assert_eq!(executed, vec![0]);
        assert_eq!(bf.cursor(), 5);
        assert_eq!(bf.current_cell(), 0);
    }

    #[test]
    fn skip_then_continue_after_loop() {
        let mut bf = interpreter("[>+<[-]]+", 10);
        run(&mut bf, b"");
        assert_eq!(bf.tape()[..2], [1, 0]);
    }

    #[test]
    fn loop_body_runs_once_per_count() {
        let mut bf = Interpreter::from_instructions(vec![LoopOpen, Decrement, LoopClose], 10);
        bf.memory[0] = 3;
        let mut body_runs = 0;
        let mut output = Vec::new();
        while let Some(step) = bf.step(&mut &b""[..], &mut output).unwrap() {
            if step.instruction == Decrement {
                body_runs += 1;
            }
        }
        assert_eq!(body_runs, 3);
        assert_eq!(bf.current_cell(), 0);
        assert_eq!(bf.loop_depth(), 0);
    }

    #[test]
    fn simple_countdown_loop_clears_cell() {
        let mut bf = interpreter("+++[-]", 10);
        run(&mut bf, b"");
        assert_eq!(bf.current_cell(), 0);
    }

    #[test]
    fn loop_close_jumps_back_to_the_open_itself() {
        let mut bf = interpreter("++[-]", 10);
        let mut input = &b""[..];
        let mut output = Vec::new();
        // ++ [ -
        for _ in 0..4 {
            bf.step(&mut input, &mut output).unwrap();
        }
        let close = bf.step(&mut input, &mut output).unwrap().unwrap();
        assert_eq!(close.instruction, LoopClose);
        assert_eq!(bf.cursor(), 2);
        assert_eq!(bf.loop_depth(), 0);

        let reopen = bf.step(&mut input, &mut output).unwrap().unwrap();
        assert_eq!(reopen.instruction, LoopOpen);
        assert_eq!(bf.loop_depth(), 1);
    }

    #[test]
    fn nested_loops_multiply() {
        // 4 * 3 into cell 2
        let mut bf = interpreter("++++[>+++[>+<-]<-]", 10);
        run(&mut bf, b"");
        assert_eq!(bf.tape()[..3], [0, 0, 12]);
    }

    #[test]
    fn hello_world() {
        let code = "++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";
        let mut bf = interpreter(code, DEFAULT_TAPE_LENGTH);
        assert_eq!(run(&mut bf, b""), b"Hello World!\n");
    }

    #[test]
    fn step_reports_state_before_execution() {
        let mut bf = interpreter("+>", 10);
        let mut output = Vec::new();
        let first = bf.step(&mut &b""[..], &mut output).unwrap().unwrap();
        assert_eq!(first, Step { position: 0, instruction: Increment, pointer: 0, cell: 0 });
        let second = bf.step(&mut &b""[..], &mut output).unwrap().unwrap();
        assert_eq!(second, Step { position: 1, instruction: MoveRight, pointer: 0, cell: 1 });
        assert!(bf.step(&mut &b""[..], &mut output).unwrap().is_none());
    }

    #[test]
    fn unbalanced_sequences_do_not_panic() {
        let mut bf = Interpreter::from_instructions(vec![Increment, LoopClose, Increment], 10);
        run(&mut bf, b"");
        assert_eq!(bf.current_cell(), 2);

        let mut bf = Interpreter::from_instructions(vec![LoopOpen, LoopOpen, LoopClose], 10);
        run(&mut bf, b"");
        assert!(bf.is_halted());
    }

    #[test]
    fn wrap_handles_both_directions() {
        assert_eq!(wrap(-1, 30_000), 29_999);
        assert_eq!(wrap(30_000, 30_000), 0);
        assert_eq!(wrap(7, 30_000), 7);
    }
}
