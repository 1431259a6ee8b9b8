//! Compiler front end for a small automation scripting language.
//!
//! Source text is tokenized, parsed through operator-claiming passes
//! into statement trees, type-checked against a static host type
//! catalog, and emitted as a line-oriented intermediate automation
//! script. See the `lexer`, `parser`, and `compiler` modules for the
//! three stages; `catalog` holds the static descriptions they consult.

pub mod catalog;
pub mod compiler;
pub mod diagnostics;
pub mod lexer;
pub mod parser;
pub mod span;

pub use compiler::Compiler;
pub use diagnostics::CompileError;

use catalog::{CommandCatalog, HostCatalog};

/// Compile a source buffer against the built-in catalogs.
pub fn compile(source: &str) -> Result<String, CompileError> {
    let host = HostCatalog::builtin();
    let commands = CommandCatalog::builtin();
    compile_with(source, &host, &commands)
}

/// Compile a source buffer against caller-supplied catalogs.
pub fn compile_with(
    source: &str,
    host: &HostCatalog,
    commands: &CommandCatalog,
) -> Result<String, CompileError> {
    let source = normalize_newlines(source);
    let tokens = lexer::lex(&source)?;
    let roots = parser::parse(&source, tokens)?;
    let mut compiler = Compiler::new(host, commands);
    let lines = compiler.compile(&roots)?;
    Ok(lines.join("\n"))
}

fn normalize_newlines(source: &str) -> String {
    source.replace("\r\n", "\n")
}
