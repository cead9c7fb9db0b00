use std::io;

use tape_bf::{filter_source, Interpreter, Program};

fn main() {
    // Classic Brainfuck "Hello World!" program, with a comment the filter drops
    let source = "Hello: ++++++++[>++++[>++>+++>+++>+<<<<-]>+>+>->>+[<]<-]>>.>---.+++++++..+++.>>.<-.<.+++.------.--------.>>+.>++.";

    let program = match Program::parse(&filter_source(source)) {
        Ok(program) => program,
        Err(err) => {
            eprintln!("Brainfuck program error: {err}");
            std::process::exit(1);
        }
    };

    // Collect output in memory instead of writing to stdout
    let mut output = Vec::new();
    let mut bf = Interpreter::with_tape_length(program, 64);
    if let Err(err) = bf.run_with(&mut io::empty(), &mut output) {
        eprintln!("Brainfuck interpreter error: {err}");
        std::process::exit(1);
    }

    print!("{}", String::from_utf8_lossy(&output));
    println!("pointer finished at cell {}", bf.pointer());
}
