use std::fs;

use clap::Parser;
use moonlet::{EvalOptions, ParseOptions, PrintOptions};

/// moonlet runs, checks and reformats scripts written in a
/// Lua-flavoured scripting language.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Treat the input as a file path instead of inline script text.
    #[arg(short, long)]
    file: bool,

    /// Pretty-print the parsed source instead of running it.
    #[arg(long)]
    format: bool,

    /// Dump the parsed AST instead of running it.
    #[arg(long)]
    ast: bool,

    /// Error on reads of undefined variables.
    #[arg(long)]
    strict: bool,

    contents: String,
}

fn main() {
    let args = Args::parse();

    let source = if args.file {
        fs::read_to_string(&args.contents).unwrap_or_else(|_| {
            eprintln!("Failed to read the input file '{}'. Perhaps this file does not exist?",
                      &args.contents);
            std::process::exit(1);
        })
    } else {
        args.contents.clone()
    };

    let program = match moonlet::parse(&source, &ParseOptions::default()) {
        Ok(program) => program,
        Err(diagnostics) => {
            eprint!("{}", diagnostics.render_all(&source));
            std::process::exit(1);
        },
    };

    if args.ast {
        println!("{program:#?}");
        return;
    }

    if args.format {
        match moonlet::print(&program, &PrintOptions::default()) {
            Ok(text) => println!("{text}"),
            Err(error) => {
                eprintln!("{error}");
                std::process::exit(1);
            },
        }
        return;
    }

    let options = EvalOptions { strict: args.strict,
                                ..EvalOptions::default() };
    match moonlet::evaluate(&program, &options) {
        Ok(results) => {
            if !results.is_empty() {
                let line = results.iter()
                                  .map(std::string::ToString::to_string)
                                  .collect::<Vec<_>>()
                                  .join("\t");
                println!("{line}");
            }
        },
        Err(error) => {
            eprintln!("{error}");
            std::process::exit(1);
        },
    }
}
