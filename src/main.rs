use std::{fs::read_to_string, path::PathBuf, process, time::Instant};

use clap::{Parser, ValueEnum};
use mypl::{
    display_error,
    errors::errors::Error,
    interpreter::interpreter::interpret,
    lexer::lexer::tokenize,
    load_program,
    parser::parser::parse,
};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mypl", version, about = "Interpreter for the MyPL language")]
struct Cli {
    /// How far to take the program through the pipeline
    #[arg(long, value_enum, default_value_t = Mode::Run)]
    mode: Mode,

    /// Log phase timings and calls to stderr
    #[arg(short, long)]
    verbose: bool,

    /// Source file to run
    file: PathBuf,
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Tokenize and dump tokens
    Lex,
    /// Parse and dump the AST
    Parse,
    /// Parse and type check
    Check,
    /// Type check and execute
    Run,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let source = match read_to_string(&cli.file) {
        Ok(source) => source,
        Err(error) => {
            eprintln!("Error: cannot read {}: {}", cli.file.display(), error);
            process::exit(1);
        }
    };

    let file_name = cli
        .file
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| cli.file.display().to_string());

    let start = Instant::now();
    let result = execute(cli.mode, source.clone(), file_name);
    debug!("Finished in {:?}", start.elapsed());

    match result {
        Ok(code) => process::exit(code),
        Err(error) => {
            display_error(&error, &source);
            process::exit(1);
        }
    }
}

fn execute(mode: Mode, source: String, file_name: String) -> Result<i32, Error> {
    match mode {
        Mode::Lex => {
            for token in tokenize(source, Some(file_name))? {
                token.debug();
            }
            Ok(0)
        }
        Mode::Parse => {
            let program = parse(source, Some(file_name))?;
            println!("{:#?}", program);
            Ok(0)
        }
        Mode::Check => {
            load_program(source, Some(file_name))?;
            Ok(0)
        }
        Mode::Run => {
            let program = load_program(source, Some(file_name))?;

            let run_start = Instant::now();
            let code = interpret(&program)?;
            debug!("Ran in {:?}", run_start.elapsed());

            Ok(code)
        }
    }
}

/// `RUST_LOG` wins when set; otherwise only warnings, or debug output with
/// `--verbose`.
fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .without_time()
        .init();
}
