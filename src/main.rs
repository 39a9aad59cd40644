mod codegen;
mod compiler;
mod errors;
mod lexer;
mod parser;

use std::fs;
use std::io::Read;
use std::process;

use clap::{Arg, ArgAction, Command};

use errors::{CompileError, SourceFile};

fn cli() -> Command {
    Command::new("longhand")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Compile Longhand (narrative English code) to Python")
        .arg(
            Arg::new("input")
                .help("Longhand source file, or '-' for stdin")
                .default_value("-"),
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Write the generated Python here instead of stdout"),
        )
        .arg(
            Arg::new("emit-tokens")
                .long("emit-tokens")
                .action(ArgAction::SetTrue)
                .help("Dump the token stream instead of compiling"),
        )
        .arg(
            Arg::new("emit-tree")
                .long("emit-tree")
                .action(ArgAction::SetTrue)
                .help("Dump the parsed program tree instead of compiling"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(ArgAction::SetTrue)
                .help("Report progress on stderr"),
        )
}

fn read_source(input: &str) -> std::io::Result<(String, String)> {
    if input == "-" {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        Ok(("<stdin>".to_string(), source))
    } else {
        let source = fs::read_to_string(input)?;
        Ok((input.to_string(), source))
    }
}

fn fail(error: &CompileError, source: &SourceFile) -> ! {
    eprint!("{}", error.render(source));
    process::exit(1);
}

fn main() {
    let matches = cli().get_matches();

    let input = matches
        .get_one::<String>("input")
        .map(String::as_str)
        .unwrap_or("-");
    let verbose = matches.get_flag("verbose");

    let (display_name, source) = match read_source(input) {
        Ok(pair) => pair,
        Err(e) => {
            eprintln!("error: could not read '{}': {}", input, e);
            process::exit(1);
        }
    };
    let source_file = SourceFile::new(&display_name, &source);

    if verbose {
        eprintln!("Compiling {}...", display_name);
    }

    if matches.get_flag("emit-tokens") {
        match compiler::tokenize_source(&source) {
            Ok(tokens) => {
                for token in &tokens {
                    println!("{:?}", token);
                }
            }
            Err(e) => fail(&e, &source_file),
        }
        return;
    }

    if matches.get_flag("emit-tree") {
        match compiler::parse_source(&source) {
            Ok(program) => println!("{:#?}", program),
            Err(e) => fail(&e, &source_file),
        }
        return;
    }

    let python = match compiler::compile(&source) {
        Ok(python) => python,
        Err(e) => fail(&e, &source_file),
    };

    match matches.get_one::<String>("output") {
        Some(path) => {
            if let Err(e) = fs::write(path, &python) {
                eprintln!("error: could not write '{}': {}", path, e);
                process::exit(1);
            }
            if verbose {
                eprintln!("Wrote {}", path);
            }
        }
        None => print!("{}", python),
    }
}
