use std::fs;

use clap::Parser;
use ratcalc::EvalState;

/// ratcalc is a line-oriented calculator with exact rational arithmetic,
/// units, and time handling. Each line's result is printed next to it,
/// gutter-style.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the input as a file path instead of an inline script.
    #[arg(short, long)]
    file: bool,

    /// The script text, or a file path with --file.
    contents: String,
}

fn main() {
    let args = Args::parse();

    let script = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents
    };

    let lines: Vec<&str> = script.lines().collect();
    let width = lines.iter().map(|l| l.len()).max().unwrap_or(0);

    let mut state = EvalState::new();
    for (line, result) in lines.iter().zip(state.eval_all(&lines, false)) {
        if result.text.is_empty() {
            println!("{line}");
        } else {
            println!("{line:width$}  | {}", result.text);
        }
    }
}
