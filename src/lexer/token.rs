use logos::Logos;

/// Raw lexical classes. Whitespace and comments are kept as tokens so
/// the token stream concatenates back to the source text; the parser
/// filters them out before claiming passes.
#[derive(Logos, Debug, Clone, PartialEq)]
pub enum Token {
    #[regex(r"[ \t\r]+")]
    Whitespace,

    #[regex(r"\n+")]
    Newline,

    #[regex(r"//[^\n]*")]
    LineComment,

    #[regex(r"/\*(?:[^*]|\*+[^*/])*\*+/")]
    BlockComment,

    #[regex(r"[0-9][0-9_]*", parse_int)]
    Int(i64),

    #[regex(r"[0-9][0-9_]*\.[0-9]*[fF]?|[0-9][0-9_]*[fF]|\.[0-9]+[fF]?", parse_float)]
    Float(f64),

    #[regex(r#""([^"\\\n]|\\.)*""#, parse_string)]
    #[regex(r"'([^'\\\n]|\\.)*'", parse_string)]
    Str(StrLit),

    #[token("if")]
    If,
    #[token("else")]
    Else,
    #[token("while")]
    While,

    #[token("true")]
    True,
    #[token("false")]
    False,
    #[token("null")]
    Null,

    // The identifier text is sliced from the source by span when needed.
    #[regex(r"[\p{L}_][\p{L}\p{N}_]*")]
    Ident,

    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,

    #[token("+=")]
    PlusAssign,
    #[token("-=")]
    MinusAssign,
    #[token("*=")]
    StarAssign,
    #[token("/=")]
    SlashAssign,
    #[token("%=")]
    PercentAssign,
    #[token("&=")]
    AmpAssign,
    #[token("^=")]
    CaretAssign,
    #[token("|=")]
    PipeAssign,
    #[token("<<=")]
    ShlAssign,
    #[token(">>=")]
    ShrAssign,

    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("==")]
    EqEq,
    #[token("!=")]
    NotEq,
    #[token("&&")]
    AmpAmp,
    #[token("||")]
    PipePipe,

    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("!")]
    Bang,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("=")]
    Assign,

    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token(",")]
    Comma,
    #[token(":")]
    Colon,
    #[token(";")]
    Semicolon,
    #[token(".")]
    Dot,
}

/// A string literal with its unescaped value. `needs_escaping` records
/// whether the literal cannot be reproduced verbatim in the output
/// script and must be emitted through the escaped form.
#[derive(Debug, Clone, PartialEq)]
pub struct StrLit {
    pub value: String,
    pub needs_escaping: bool,
}

fn parse_int(lex: &mut logos::Lexer<Token>) -> Option<i64> {
    lex.slice().replace('_', "").parse().ok()
}

fn parse_float(lex: &mut logos::Lexer<Token>) -> Option<f64> {
    let mut text = lex.slice().replace('_', "");
    if text.ends_with(['f', 'F']) {
        text.pop();
    }
    if text.starts_with('.') {
        text.insert(0, '0');
    }
    if text.ends_with('.') || !text.contains('.') {
        // "1." and the suffix-only form "1f" both mean 1.0
        if text.ends_with('.') {
            text.push('0');
        } else {
            text.push_str(".0");
        }
    }
    text.parse().ok()
}

fn parse_string(lex: &mut logos::Lexer<Token>) -> StrLit {
    let raw = lex.slice();
    let body = &raw[1..raw.len() - 1];

    let mut value = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            value.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => value.push('\n'),
            Some('r') => value.push('\r'),
            Some('t') => value.push('\t'),
            Some('\\') => value.push('\\'),
            Some('"') => value.push('"'),
            Some('\'') => value.push('\''),
            Some(other) => {
                value.push('\\');
                value.push(other);
            }
            None => {}
        }
    }
    // A value holding quote marks, backslashes, or control characters
    // cannot ride in the raw output form and must be emitted escaped.
    let needs_escaping = value
        .chars()
        .any(|c| matches!(c, '"' | '\\' | '\n' | '\r' | '\t'));
    StrLit { value, needs_escaping }
}

impl Token {
    /// True for tokens the parser discards before its claiming passes.
    pub fn is_trivia(&self) -> bool {
        matches!(
            self,
            Token::Whitespace | Token::Newline | Token::LineComment | Token::BlockComment
        )
    }
}
