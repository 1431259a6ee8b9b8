use crate::span::Span;
use std::path::PathBuf;
use thiserror::Error;

/// Every way a compilation unit can fail. The first error aborts the
/// remaining passes; there is no partial output.
#[derive(Debug, Error)]
pub enum CompileError {
    // ===== Lexical errors =====
    #[error("unterminated string literal")]
    UnterminatedString { span: Span },

    #[error("unterminated block comment")]
    UnterminatedComment { span: Span },

    #[error("identifier cannot start with digit '{ch}'")]
    InvalidIdentifierStart { ch: char, span: Span },

    #[error("unexpected character '{ch}'")]
    UnrecognizedCharacter { ch: char, span: Span },

    #[error("invalid number format: {msg}")]
    InvalidNumber { msg: String, span: Span },

    // ===== Parse errors =====
    #[error("operator '{op}' is missing its left operand")]
    MissingLeftOperand { op: String, span: Span },

    #[error("operator '{op}' is missing its right operand")]
    MissingRightOperand { op: String, span: Span },

    #[error("parenthesis group must contain exactly one expression, found {count}")]
    ParenGroupCount { count: usize, span: Span },

    #[error("unexpected separator ',' with no following argument")]
    DanglingSeparator { span: Span },

    #[error("positional argument cannot follow a named argument")]
    PositionalAfterNamed { span: Span },

    #[error("unexpected token: {msg}")]
    UnexpectedToken { msg: String, span: Span },

    // ===== Name-resolution errors =====
    #[error("variable '{name}' is used before assignment")]
    UnassignedVariable { name: String, span: Span },

    #[error("command family '{name}' does not exist")]
    UnknownCommandFamily { name: String, span: Span },

    #[error("command '{name}' does not exist{}", family.as_deref().map(|f| format!(" in family '{f}'")).unwrap_or_default())]
    UnknownCommand { name: String, family: Option<String>, span: Span },

    #[error("command '{command}' does not have an argument named '{name}'")]
    UnknownArgument { command: String, name: String, span: Span },

    #[error("command '{command}' requires argument {wanted}")]
    MissingArgument { command: String, wanted: String, span: Span },

    #[error("command '{command}' accepts a single value among arguments {group}")]
    ConflictingArguments { command: String, group: String, span: Span },

    #[error("command '{command}' takes at most {max} positional arguments")]
    TooManyArguments { command: String, max: usize, span: Span },

    #[error("multi-level command family names are not supported")]
    MultiLevelFamily { span: Span },

    // ===== Type errors =====
    #[error("cannot implicitly convert '{from}' to '{to}'")]
    ImplicitConversion { from: String, to: String, span: Span },

    #[error("operator '{op}' cannot be applied to {operands}")]
    InvalidOperation { op: String, operands: String, span: Span },

    #[error("type '{type_name}' has no member '{member}'")]
    MissingMember { type_name: String, member: String, span: Span },

    #[error("member '{member}' of '{type_name}' has no getter")]
    MemberNotReadable { type_name: String, member: String, span: Span },

    #[error("member '{member}' of '{type_name}' has no setter")]
    MemberNotWritable { type_name: String, member: String, span: Span },

    #[error("'{name}' is read-only and cannot be reassigned")]
    ReadOnlyAssignment { name: String, span: Span },

    #[error("no overload of '{type_name}.{method}' matches the given arguments")]
    NoMatchingOverload { type_name: String, method: String, span: Span },

    #[error("argument of '{method}' cannot convert '{from}' to '{to}'")]
    ParameterConversion { method: String, from: String, to: String, span: Span },

    #[error("expression produces no usable value")]
    ValueOfVoid { span: Span },

    #[error("expression cannot be assigned to")]
    CannotAssignTo { span: Span },

    #[error("cannot infer a type for '{name}' from a null value")]
    NullInference { name: String, span: Span },

    // ===== Collaborator errors =====
    #[error("catalog error: {msg}")]
    Catalog { msg: String, path: PathBuf },
}

impl CompileError {
    pub fn unexpected(msg: impl Into<String>, span: Span) -> Self {
        Self::UnexpectedToken { msg: msg.into(), span }
    }

    pub fn catalog(msg: impl Into<String>, path: PathBuf) -> Self {
        Self::Catalog { msg: msg.into(), path }
    }

    /// Source span of the offending token, if the error points into source.
    pub fn span(&self) -> Option<Span> {
        use CompileError::*;
        match self {
            UnterminatedString { span }
            | UnterminatedComment { span }
            | InvalidIdentifierStart { span, .. }
            | UnrecognizedCharacter { span, .. }
            | InvalidNumber { span, .. }
            | MissingLeftOperand { span, .. }
            | MissingRightOperand { span, .. }
            | ParenGroupCount { span, .. }
            | DanglingSeparator { span }
            | PositionalAfterNamed { span }
            | UnexpectedToken { span, .. }
            | UnassignedVariable { span, .. }
            | UnknownCommandFamily { span, .. }
            | UnknownCommand { span, .. }
            | UnknownArgument { span, .. }
            | MissingArgument { span, .. }
            | ConflictingArguments { span, .. }
            | TooManyArguments { span, .. }
            | MultiLevelFamily { span }
            | ImplicitConversion { span, .. }
            | InvalidOperation { span, .. }
            | MissingMember { span, .. }
            | MemberNotReadable { span, .. }
            | MemberNotWritable { span, .. }
            | ReadOnlyAssignment { span, .. }
            | NoMatchingOverload { span, .. }
            | ParameterConversion { span, .. }
            | ValueOfVoid { span }
            | CannotAssignTo { span }
            | NullInference { span, .. } => Some(*span),
            Catalog { .. } => None,
        }
    }

    /// Stable machine-readable tag for the error kind.
    pub fn kind(&self) -> &'static str {
        use CompileError::*;
        match self {
            UnterminatedString { .. } => "unterminated-string",
            UnterminatedComment { .. } => "unterminated-comment",
            InvalidIdentifierStart { .. } => "invalid-identifier-start",
            UnrecognizedCharacter { .. } => "unrecognized-character",
            InvalidNumber { .. } => "invalid-number",
            MissingLeftOperand { .. } => "missing-left-operand",
            MissingRightOperand { .. } => "missing-right-operand",
            ParenGroupCount { .. } => "paren-group-count",
            DanglingSeparator { .. } => "dangling-separator",
            PositionalAfterNamed { .. } => "positional-after-named",
            UnexpectedToken { .. } => "unexpected-token",
            UnassignedVariable { .. } => "unassigned-variable",
            UnknownCommandFamily { .. } => "unknown-command-family",
            UnknownCommand { .. } => "unknown-command",
            UnknownArgument { .. } => "unknown-argument",
            MissingArgument { .. } => "missing-argument",
            ConflictingArguments { .. } => "conflicting-arguments",
            TooManyArguments { .. } => "too-many-arguments",
            MultiLevelFamily { .. } => "multi-level-family",
            ImplicitConversion { .. } => "implicit-conversion",
            InvalidOperation { .. } => "invalid-operation",
            MissingMember { .. } => "missing-member",
            MemberNotReadable { .. } => "member-not-readable",
            MemberNotWritable { .. } => "member-not-writable",
            ReadOnlyAssignment { .. } => "read-only-assignment",
            NoMatchingOverload { .. } => "no-matching-overload",
            ParameterConversion { .. } => "parameter-conversion",
            ValueOfVoid { .. } => "value-of-void",
            CannotAssignTo { .. } => "cannot-assign-to",
            NullInference { .. } => "null-inference",
            Catalog { .. } => "catalog",
        }
    }
}

/// Render a CompileError with ariadne for nice terminal output.
pub fn render_error(source: &str, err: &CompileError) {
    use ariadne::{Label, Report, ReportKind, Source};

    match err.span() {
        Some(span) => {
            let _ = Report::build(ReportKind::Error, (), span.start)
                .with_message("compile error")
                .with_label(Label::new(span.start..span.end).with_message(err.to_string()))
                .finish()
                .eprint(Source::from(source));
        }
        None => {
            eprintln!("error: {err}");
            if let CompileError::Catalog { path, .. } = err {
                eprintln!("  --> {}", path.display());
            }
        }
    }
}

/// Render a CompileError as a single-line JSON record.
pub fn render_error_json(source: &str, err: &CompileError) -> String {
    let (line, col) = err
        .span()
        .map(|s| s.line_col(source))
        .unwrap_or((0, 0));
    serde_json::json!({
        "kind": err.kind(),
        "message": err.to_string(),
        "line": line,
        "column": col,
    })
    .to_string()
}
