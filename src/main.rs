use std::fs;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};

use robolang::catalog::{CommandCatalog, HostCatalog};
use robolang::diagnostics::{render_error, render_error_json};
use robolang::CompileError;

#[derive(Parser)]
#[command(name = "roboc", version, about = "Compile automation scripts to the intermediate robot notation")]
struct Cli {
    /// Extra command catalog definitions, merged over the built-ins
    #[arg(long, global = true, value_name = "FILE")]
    commands: Option<PathBuf>,

    /// How compile errors are reported on stderr
    #[arg(long, global = true, value_enum, default_value_t = ErrorFormat::Pretty)]
    error_format: ErrorFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compile a script and write the output notation
    Compile {
        file: PathBuf,
        /// Output file; stdout when omitted
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Parse and type-check without emitting output
    Check { file: PathBuf },
    /// Dump the token stream of a script
    Tokens { file: PathBuf },
}

#[derive(Clone, Copy, ValueEnum)]
enum ErrorFormat {
    Pretty,
    Json,
}

enum Failure {
    Io(std::io::Error),
    Compile { source: String, err: CompileError },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(Failure::Io(err)) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
        Err(Failure::Compile { source, err }) => {
            match cli.error_format {
                ErrorFormat::Pretty => render_error(&source, &err),
                ErrorFormat::Json => eprintln!("{}", render_error_json(&source, &err)),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), Failure> {
    let host = HostCatalog::builtin();
    let mut commands = CommandCatalog::builtin();
    if let Some(path) = &cli.commands {
        commands
            .merge_file(path)
            .map_err(|err| Failure::Compile { source: String::new(), err })?;
    }

    match &cli.command {
        Command::Compile { file, output } => {
            let source = fs::read_to_string(file).map_err(Failure::Io)?;
            let compiled = robolang::compile_with(&source, &host, &commands)
                .map_err(|err| Failure::Compile { source, err })?;
            match output {
                Some(path) => {
                    fs::write(path, format!("{compiled}\n")).map_err(Failure::Io)?;
                }
                None => println!("{compiled}"),
            }
        }
        Command::Check { file } => {
            let source = fs::read_to_string(file).map_err(Failure::Io)?;
            robolang::compile_with(&source, &host, &commands)
                .map_err(|err| Failure::Compile { source, err })?;
            println!("ok");
        }
        Command::Tokens { file } => {
            let source = fs::read_to_string(file).map_err(Failure::Io)?;
            let source = source.replace("\r\n", "\n");
            let tokens = robolang::lexer::lex(&source)
                .map_err(|err| Failure::Compile { source: source.clone(), err })?;
            for tok in tokens {
                println!("{:>4}..{:<4} {:?}", tok.span.start, tok.span.end, tok.node);
            }
        }
    }
    Ok(())
}
