pub mod token;

pub use token::{StrLit, Token};

use crate::diagnostics::CompileError;
use crate::span::{Span, Spanned};
use logos::Logos;

/// Tokenize a full source text. The returned stream includes whitespace
/// and comment tokens; spans are contiguous and cover every input byte.
pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, CompileError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = Span::new(lexer.span().start, lexer.span().end);
        match result {
            Ok(tok) => tokens.push(Spanned::new(tok, span)),
            Err(()) => return Err(classify_error(source, span)),
        }
    }

    validate_adjacency(source, &tokens)?;
    Ok(tokens)
}

/// Logos reports a bare error slice; recover the most useful diagnostic
/// from what starts at that position.
fn classify_error(source: &str, span: Span) -> CompileError {
    let rest = &source[span.start..];
    if rest.starts_with('"') || rest.starts_with('\'') {
        let end = rest
            .find('\n')
            .map(|i| span.start + i)
            .unwrap_or(source.len());
        CompileError::UnterminatedString { span: Span::new(span.start, end) }
    } else if rest.starts_with("/*") {
        CompileError::UnterminatedComment { span: Span::new(span.start, source.len()) }
    } else if rest.starts_with(|c: char| c.is_ascii_digit()) {
        // the number lexed but its callback rejected the value
        CompileError::InvalidNumber { msg: "integer out of range".into(), span }
    } else {
        let ch = rest.chars().next().unwrap_or('\u{fffd}');
        CompileError::UnrecognizedCharacter { ch, span }
    }
}

/// Catch token pairs that lex individually but cannot legally touch.
fn validate_adjacency(source: &str, tokens: &[Spanned<Token>]) -> Result<(), CompileError> {
    for pair in tokens.windows(2) {
        let (a, b) = (&pair[0], &pair[1]);
        if a.span.end != b.span.start {
            continue;
        }
        let a_numeric = matches!(a.node, Token::Int(_) | Token::Float(_));
        match (&a.node, &b.node) {
            // 123abc: an identifier cannot begin with a digit
            (_, Token::Ident) if a_numeric => {
                let ch = source[a.span.start..].chars().next().unwrap_or('0');
                return Err(CompileError::InvalidIdentifierStart {
                    ch,
                    span: Span::merge(a.span, b.span),
                });
            }
            // 1.2.3 or 1.2. split into adjacent numeric pieces
            (Token::Float(_), Token::Dot)
            | (Token::Float(_), Token::Float(_))
            | (Token::Float(_), Token::Int(_)) => {
                return Err(CompileError::InvalidNumber {
                    msg: "multiple decimal points".into(),
                    span: Span::merge(a.span, b.span),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
