use std::fmt::Write as _;
use std::io::{self, IsTerminal, Write};

use nu_ansi_term::{Color, Style};

use crate::config::colors;
use crate::{Instruction, ProgramError, Step};

/// Paint `text` only when the destination is a terminal.
fn paint(style: Style, text: &str, styled: bool) -> String {
    if styled {
        style.paint(text).to_string()
    } else {
        text.to_string()
    }
}

/// Print `ERROR: <message>` to stderr.
pub fn print_error(message: &str) {
    let styled = io::stderr().is_terminal();
    let label = paint(colors().error.bold(), "ERROR:", styled);
    eprintln!("{label} {message}");
    let _ = io::stderr().flush();
}

/// Print a program error, with a caret under the offending symbol when it has a position.
pub fn print_program_error(code: &str, err: &ProgramError) {
    print_error(&err.to_string());
    if let Some(pos) = err.position() {
        eprint!("{}", error_context(code, pos));
        let _ = io::stderr().flush();
    }
}

/// A short window of `code` around char index `pos` with a caret underneath.
pub fn error_context(code: &str, pos: usize) -> String {
    const WINDOW_CHARS: usize = 32;

    let total_chars = code.chars().count();
    let start_char = pos.saturating_sub(WINDOW_CHARS);
    let end_char = (pos + WINDOW_CHARS + 1).min(total_chars);

    let start_byte = char_to_byte_index(code, start_char);
    let end_byte = char_to_byte_index(code, end_char);

    let caret_offset = pos.saturating_sub(start_char);
    format!("  {}\n  {}^\n", &code[start_byte..end_byte], " ".repeat(caret_offset))
}

/// Convert a char index into a byte index in the given UTF-8 string.
fn char_to_byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}

/// Pipeline progress lines shown with `--debug`.
pub struct Progress {
    enabled: bool,
    styled: bool,
}

impl Progress {
    pub fn new(enabled: bool) -> Self {
        Self { enabled, styled: io::stdout().is_terminal() }
    }

    pub fn report(&self, percentage: u8, message: &str) {
        if !self.enabled {
            return;
        }
        let color = if percentage >= 100 { colors().done } else { colors().progress };
        println!("{}", self.line(percentage, message, color));
        let _ = io::stdout().flush();
    }

    fn line(&self, percentage: u8, message: &str, color: Color) -> String {
        let percent = paint(Style::new().fg(colors().percent), &format!("[{percentage:>3}%]"), self.styled);
        format!("{percent} {}", paint(Style::new().fg(color), message, self.styled))
    }
}

/// Header of the `--trace` table.
pub fn trace_header() -> String {
    "STEP | IP    | PTR   | CELL | INSTR    | AFTER\n\
     -----+-------+-------+------+----------+------------------------------"
        .to_string()
}

/// One `--trace` row: the state before `step` and what the instruction left behind.
pub fn trace_row(count: usize, step: &Step, pointer_after: usize, cell_after: u8, cursor_after: usize) -> String {
    let mut after = String::new();
    let _ = match step.instruction {
        Instruction::MoveRight | Instruction::MoveLeft => write!(after, "ptr -> {pointer_after}"),
        Instruction::Increment | Instruction::Decrement | Instruction::Input => {
            write!(after, "cell[{}] {} -> {}", step.pointer, step.cell, cell_after)
        }
        Instruction::Output => write!(after, "wrote byte {}", step.cell),
        Instruction::LoopOpen if step.cell == 0 => write!(after, "skip to ip {cursor_after}"),
        Instruction::LoopOpen => write!(after, "enter loop"),
        Instruction::LoopClose if cursor_after == step.position + 1 => write!(after, "exit loop"),
        Instruction::LoopClose => write!(after, "jump back to ip {cursor_after}"),
    };
    format!(
        "{:<4} | {:<5} | {:<5} | {:<4} | {} {:<6} | {}",
        count,
        step.position,
        step.pointer,
        step.cell,
        step.instruction,
        step.instruction.name(),
        after
    )
}

/// The `--help` screen.
pub fn help_text(program: &str, styled: bool) -> String {
    let c = colors();
    let bold = Style::new().bold();
    let dim = Style::new().dimmed();
    let mut out = String::new();

    let _ = writeln!(out, "{}", paint(c.help_title.bold(), "========= BRAINFUCK INTERPRETER =========", styled));
    let _ = writeln!(out);
    let _ = writeln!(out, "{}", paint(bold, "COMMANDS:", styled));
    let _ = writeln!(out, "   - {program} {}: Shows this menu", paint(dim, "--help ", styled));
    let _ = writeln!(
        out,
        "   - {program} {}: Interprets a brainfuck file",
        paint(dim, "<file-path> [--debug] [--trace] [--tape-length <CELLS>] ", styled)
    );
    let _ = writeln!(out, "{}", paint(dim, "      - <file-path>            : the brainfuck file (must end in .bf)", styled));
    let _ = writeln!(out, "{}", paint(dim, "      - --debug, -d            : shows progress info", styled));
    let _ = writeln!(out, "{}", paint(dim, "      - --trace, -t            : prints every executed instruction to stderr", styled));
    let _ = writeln!(out, "{}", paint(dim, "      - --tape-length <CELLS>  : number of memory cells (default 30000)", styled));
    let _ = writeln!(out);
    let _ = writeln!(out, "{} The flags and <file-path> are interchangeable.", paint(bold, "Note:", styled));
    let _ = writeln!(
        out,
        "{} Input (`,`) reads one byte from stdin; at end of input the cell is left unchanged.",
        paint(bold, "Note:", styled)
    );
    out
}
