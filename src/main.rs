use clap::Parser;
use std::env;
use std::io::{self, IsTerminal, Write};
use std::path::PathBuf;
use tape_bf::cli_util::{help_text, print_error, print_program_error, trace_header, trace_row, Progress};
use tape_bf::{config, load_source, tokenize, Interpreter, Program};

#[derive(Parser, Debug)]
#[command(name = "brainfuck", disable_help_flag = true)]
struct Cli {
    /// Path to a `.bf` source file
    #[arg(value_name = "FILE")]
    file: Option<PathBuf>,

    /// Show progress while loading, validating and running
    #[arg(short = 'd', long = "debug", alias = "d")]
    debug: bool,

    /// Print every executed instruction to stderr
    #[arg(short = 't', long = "trace")]
    trace: bool,

    /// Number of memory cells (fallback BF_TAPE_LENGTH, then config file; default 30000)
    #[arg(long = "tape-length", value_name = "CELLS")]
    tape_length: Option<usize>,

    /// Show this help
    #[arg(short = 'h', long = "help", alias = "h", action = clap::ArgAction::SetTrue)]
    help: bool,
}

fn run(program: &str, cli: Cli) -> i32 {
    if cli.help {
        print!("{}", help_text(program, io::stdout().is_terminal()));
        let _ = io::stdout().flush();
        return 0;
    }

    let Some(file) = cli.file else {
        eprint!("{}", help_text(program, io::stderr().is_terminal()));
        let _ = io::stderr().flush();
        return 2;
    };

    let tape_length = match config::resolve_tape_length(cli.tape_length) {
        Ok(cells) => cells,
        Err(e) => {
            print_error(&e.to_string());
            return 1;
        }
    };

    let progress = Progress::new(cli.debug);

    progress.report(0, &format!("Reading contents from file {}", file.display()));
    let code = match load_source(&file) {
        Ok(code) => code,
        Err(e) => {
            print_error(&e.to_string());
            return 1;
        }
    };

    progress.report(25, "Converting input to tokens");
    let instructions = match tokenize(&code) {
        Ok(instructions) => instructions,
        Err(e) => {
            print_program_error(&code, &e);
            return 1;
        }
    };

    progress.report(50, "Validating code");
    let program = match Program::from_instructions(instructions) {
        Ok(program) => program,
        Err(e) => {
            print_program_error(&code, &e);
            return 1;
        }
    };

    progress.report(75, "Running interpreter on tokens");
    let mut bf = match Interpreter::try_with_tape_length(program, tape_length) {
        Ok(bf) => bf,
        Err(e) => {
            print_error(&format!("Could not allocate a tape of {tape_length} cells: {e}"));
            return 1;
        }
    };
    let result = if cli.trace { run_traced(&mut bf) } else { bf.run() };
    if let Err(e) = result {
        print_error(&format!("I/O error at instruction {}: {e}", bf.cursor()));
        return 1;
    }

    progress.report(100, "Program interpreted, exiting...");
    0
}

/// Run to completion, writing a table row to stderr after every instruction.
fn run_traced(bf: &mut Interpreter) -> io::Result<()> {
    // Streams stay unlocked between calls so the ctrl+c handler can still flush them.
    let (mut input, mut output, mut trace) = (io::stdin(), io::stdout(), io::stderr());

    writeln!(trace, "{}", trace_header())?;
    let mut count = 0usize;
    while let Some(step) = bf.step(&mut input, &mut output)? {
        writeln!(trace, "{}", trace_row(count, &step, bf.pointer(), bf.current_cell(), bf.cursor()))?;
        count += 1;
    }
    output.flush()
}

fn main() {
    // We still pull the program name for help rendering consistency
    let program = env::args().next().unwrap_or_else(|| String::from("brainfuck"));

    let cli = Cli::parse();

    // Ctrl+C: keep whatever the program printed so far
    if let Err(e) = ctrlc::set_handler(|| {
        let _ = io::stdout().flush();
        let _ = io::stderr().flush();
        std::process::exit(130);
    }) {
        print_error(&format!("failed to set ctrl+c handler: {e}"));
    }

    std::process::exit(run(&program, cli));
}
