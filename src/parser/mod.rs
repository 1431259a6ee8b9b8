pub mod tree;

pub use tree::{Arg, BinOp, IncrOp, Tree, UnaryOp};

use crate::diagnostics::CompileError;
use crate::lexer::Token;
use crate::span::{Span, Spanned};

/// Parse a token stream into statement roots.
///
/// Parsing is a series of claiming passes over a flat work list. Each
/// pass walks the list looking for the tokens it owns, claims the
/// neighbouring items those tokens bind to, and replaces the claimed
/// range with a single finished node. Precedence falls out of pass
/// ordering rather than grammar recursion.
pub fn parse(source: &str, tokens: Vec<Spanned<Token>>) -> Result<Vec<Spanned<Tree>>, CompileError> {
    let parser = Parser { source };
    let items = parser.group(tokens)?;
    parser.parse_sequence(items)
}

struct Parser<'a> {
    source: &'a str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GroupKind {
    Paren,
    Brace,
}

/// Token stream after bracket matching. Nested groups hold their own
/// item lists, so later passes never track depth.
#[derive(Debug, Clone)]
enum Item {
    Tok(Spanned<Token>),
    Group { kind: GroupKind, items: Vec<Item>, span: Span },
}

impl Item {
    fn span(&self) -> Span {
        match self {
            Item::Tok(t) => t.span,
            Item::Group { span, .. } => *span,
        }
    }
}

/// One cell of the claiming work list.
#[derive(Debug, Clone)]
enum Slot {
    Raw(Spanned<Token>),
    Group { kind: GroupKind, items: Vec<Item>, span: Span },
    Node(Spanned<Tree>),
}

impl<'a> Parser<'a> {
    fn text(&self, span: Span) -> String {
        self.source[span.start..span.end].to_string()
    }

    /// Match brackets into nested groups.
    fn group(&self, tokens: Vec<Spanned<Token>>) -> Result<Vec<Item>, CompileError> {
        let mut stack: Vec<(GroupKind, Span, Vec<Item>)> = Vec::new();
        let mut current: Vec<Item> = Vec::new();

        for tok in tokens {
            if tok.node.is_trivia() {
                continue;
            }
            match tok.node {
                Token::LParen => {
                    stack.push((GroupKind::Paren, tok.span, std::mem::take(&mut current)));
                }
                Token::LBrace => {
                    stack.push((GroupKind::Brace, tok.span, std::mem::take(&mut current)));
                }
                Token::RParen | Token::RBrace => {
                    let kind = if tok.node == Token::RParen {
                        GroupKind::Paren
                    } else {
                        GroupKind::Brace
                    };
                    match stack.pop() {
                        Some((open_kind, open_span, outer)) if open_kind == kind => {
                            let span = Span::merge(open_span, tok.span);
                            let items = std::mem::replace(&mut current, outer);
                            current.push(Item::Group { kind, items, span });
                        }
                        Some((_, open_span, _)) => {
                            return Err(CompileError::unexpected(
                                format!(
                                    "'{}' does not close the group opened by '{}'",
                                    self.text(tok.span),
                                    self.text(open_span)
                                ),
                                tok.span,
                            ));
                        }
                        None => {
                            return Err(CompileError::unexpected(
                                format!("unmatched '{}'", self.text(tok.span)),
                                tok.span,
                            ));
                        }
                    }
                }
                _ => current.push(Item::Tok(tok)),
            }
        }

        if let Some((_, open_span, _)) = stack.pop() {
            return Err(CompileError::unexpected(
                format!("unclosed '{}'", self.text(open_span)),
                open_span,
            ));
        }
        Ok(current)
    }

    /// Run every claiming pass over one item sequence and return its roots.
    fn parse_sequence(&self, items: Vec<Item>) -> Result<Vec<Spanned<Tree>>, CompileError> {
        let mut slots = self.leaf_pass(items);
        self.postfix_pass(&mut slots)?;
        self.step_pass(&mut slots)?;
        self.unary_pass(&mut slots)?;
        self.binary_pass(&mut slots)?;
        self.assignment_pass(&mut slots)?;
        self.statement_pass(&mut slots)?;

        let mut roots = Vec::with_capacity(slots.len());
        for slot in slots {
            match slot {
                Slot::Node(node) => roots.push(node),
                Slot::Raw(tok) => {
                    return Err(CompileError::unexpected(
                        format!("stray '{}'", self.text(tok.span)),
                        tok.span,
                    ));
                }
                Slot::Group { span, .. } => {
                    return Err(CompileError::unexpected("stray group", span));
                }
            }
        }
        Ok(roots)
    }

    /// Literals, identifiers, and terminators become nodes immediately.
    fn leaf_pass(&self, items: Vec<Item>) -> Vec<Slot> {
        items
            .into_iter()
            .map(|item| match item {
                Item::Group { kind, items, span } => Slot::Group { kind, items, span },
                Item::Tok(tok) => {
                    let tree = match &tok.node {
                        Token::Int(v) => Some(Tree::Int(*v)),
                        Token::Float(v) => Some(Tree::Float(*v)),
                        Token::True => Some(Tree::Bool(true)),
                        Token::False => Some(Tree::Bool(false)),
                        Token::Null => Some(Tree::Null),
                        Token::Str(lit) => Some(Tree::Str {
                            value: lit.value.clone(),
                            needs_escaping: lit.needs_escaping,
                        }),
                        Token::Ident => Some(Tree::Ident(self.text(tok.span))),
                        Token::Semicolon => Some(Tree::Terminator),
                        _ => None,
                    };
                    match tree {
                        Some(tree) => Slot::Node(Spanned::new(tree, tok.span)),
                        None => Slot::Raw(tok),
                    }
                }
            })
            .collect()
    }

    /// Claims groups and member access, left to right. A parenthesis
    /// group fuses with a preceding identifier or member chain into a
    /// call; any other parenthesis group must wrap exactly one
    /// expression. Brace groups become blocks.
    fn postfix_pass(&self, slots: &mut Vec<Slot>) -> Result<(), CompileError> {
        let mut i = 0;
        while i < slots.len() {
            match &slots[i] {
                Slot::Group { kind: GroupKind::Paren, .. } => {
                    let callee_before = i > 0
                        && matches!(
                            &slots[i - 1],
                            Slot::Node(n) if matches!(n.node, Tree::Ident(_) | Tree::Dot { .. })
                        );
                    let Slot::Group { items, span, .. } = slots.remove(i) else {
                        unreachable!()
                    };
                    if callee_before {
                        let args = self.parse_args(items, span)?;
                        let Slot::Node(callee) = slots.remove(i - 1) else {
                            unreachable!()
                        };
                        let full = Span::merge(callee.span, span);
                        slots.insert(
                            i - 1,
                            Slot::Node(Spanned::new(
                                Tree::Call { callee: Box::new(callee), args },
                                full,
                            )),
                        );
                        // stay at i: it now holds the next unseen slot
                    } else {
                        let mut roots = self.parse_sequence(items)?;
                        if roots.len() != 1 {
                            return Err(CompileError::ParenGroupCount {
                                count: roots.len(),
                                span,
                            });
                        }
                        let inner = roots.swap_remove(0);
                        slots.insert(
                            i,
                            Slot::Node(Spanned::new(Tree::Paren(Box::new(inner)), span)),
                        );
                        i += 1;
                    }
                }
                Slot::Group { kind: GroupKind::Brace, .. } => {
                    let Slot::Group { items, span, .. } = slots.remove(i) else {
                        unreachable!()
                    };
                    let roots = self.parse_sequence(items)?;
                    slots.insert(i, Slot::Node(Spanned::new(Tree::Block(roots), span)));
                    i += 1;
                }
                Slot::Raw(tok) if tok.node == Token::Dot => {
                    let dot_span = tok.span;
                    let prev_ok = i > 0
                        && matches!(&slots[i - 1], Slot::Node(n) if n.node.is_value_bearing());
                    let member = match slots.get(i + 1) {
                        Some(Slot::Node(n)) => match &n.node {
                            Tree::Ident(name) => Some(Spanned::new(name.clone(), n.span)),
                            _ => None,
                        },
                        _ => None,
                    };
                    let (true, Some(member)) = (prev_ok, member) else {
                        return Err(CompileError::unexpected(
                            "'.' must join a value to a member name",
                            dot_span,
                        ));
                    };
                    slots.remove(i + 1);
                    slots.remove(i);
                    let Slot::Node(lhs) = slots.remove(i - 1) else {
                        unreachable!()
                    };
                    let full = Span::merge(lhs.span, member.span);
                    slots.insert(
                        i - 1,
                        Slot::Node(Spanned::new(
                            Tree::Dot { lhs: Box::new(lhs), member },
                            full,
                        )),
                    );
                    // stay at i - 1's successor, which is index i
                }
                _ => i += 1,
            }
        }
        Ok(())
    }

    /// Claims `++` and `--`. Postfix wins when a variable sits on both
    /// sides, matching left-to-right claiming order.
    fn step_pass(&self, slots: &mut Vec<Slot>) -> Result<(), CompileError> {
        let mut i = 0;
        while i < slots.len() {
            let op = match &slots[i] {
                Slot::Raw(tok) if tok.node == Token::PlusPlus => Some((IncrOp::Incr, tok.span)),
                Slot::Raw(tok) if tok.node == Token::MinusMinus => Some((IncrOp::Decr, tok.span)),
                _ => None,
            };
            let Some((op, op_span)) = op else {
                i += 1;
                continue;
            };

            let prev_ident = i > 0
                && matches!(&slots[i - 1], Slot::Node(n) if matches!(n.node, Tree::Ident(_)));
            if prev_ident {
                let Slot::Node(target) = slots.remove(i - 1) else {
                    unreachable!()
                };
                let Tree::Ident(name) = target.node else { unreachable!() };
                slots.remove(i - 1); // the operator token
                let full = Span::merge(target.span, op_span);
                slots.insert(
                    i - 1,
                    Slot::Node(Spanned::new(
                        Tree::Incr {
                            op,
                            prefix: false,
                            target: Spanned::new(name, target.span),
                        },
                        full,
                    )),
                );
                continue;
            }

            let next_ident = matches!(
                slots.get(i + 1),
                Some(Slot::Node(n)) if matches!(n.node, Tree::Ident(_))
            );
            if next_ident {
                let Slot::Node(target) = slots.remove(i + 1) else {
                    unreachable!()
                };
                let Tree::Ident(name) = target.node else { unreachable!() };
                slots.remove(i);
                let full = Span::merge(op_span, target.span);
                slots.insert(
                    i,
                    Slot::Node(Spanned::new(
                        Tree::Incr {
                            op,
                            prefix: true,
                            target: Spanned::new(name, target.span),
                        },
                        full,
                    )),
                );
                i += 1;
                continue;
            }

            let sym = if op == IncrOp::Incr { "++" } else { "--" };
            return Err(CompileError::unexpected(
                format!("'{sym}' must be adjacent to a variable"),
                op_span,
            ));
        }
        Ok(())
    }

    /// Claims prefix operators, right to left so chains like `!!x` and
    /// `- -x` nest naturally. `+` and `-` are only unary when nothing
    /// usable sits to their left.
    fn unary_pass(&self, slots: &mut Vec<Slot>) -> Result<(), CompileError> {
        let mut i = slots.len();
        while i > 0 {
            i -= 1;
            let op = match &slots[i] {
                Slot::Raw(tok) => match tok.node {
                    Token::Bang => Some(UnaryOp::Not),
                    Token::Tilde => Some(UnaryOp::BitNot),
                    Token::Minus => Some(UnaryOp::Neg),
                    Token::Plus => Some(UnaryOp::Plus),
                    _ => None,
                },
                _ => None,
            };
            let Some(op) = op else { continue };

            if matches!(op, UnaryOp::Neg | UnaryOp::Plus) {
                let binary_position = i > 0
                    && matches!(&slots[i - 1], Slot::Node(n) if n.node.is_value_bearing());
                if binary_position {
                    continue;
                }
            }

            let Slot::Raw(tok) = slots.remove(i) else { unreachable!() };
            match slots.get(i) {
                Some(Slot::Node(n)) if n.node.is_value_bearing() => {}
                _ => {
                    return Err(CompileError::MissingRightOperand {
                        op: op.symbol().into(),
                        span: tok.span,
                    });
                }
            }
            let Slot::Node(operand) = slots.remove(i) else { unreachable!() };
            let full = Span::merge(tok.span, operand.span);
            slots.insert(
                i,
                Slot::Node(Spanned::new(
                    Tree::Unary { op, operand: Box::new(operand) },
                    full,
                )),
            );
        }
        Ok(())
    }

    /// Claims infix operators one precedence tier at a time, tightest
    /// first, left to right within each tier.
    fn binary_pass(&self, slots: &mut Vec<Slot>) -> Result<(), CompileError> {
        for prec in (1..=10u8).rev() {
            let mut i = 0;
            while i < slots.len() {
                let op = match &slots[i] {
                    Slot::Raw(tok) => infix_op(&tok.node).filter(|op| op.precedence() == prec),
                    _ => None,
                };
                let Some(op) = op else {
                    i += 1;
                    continue;
                };
                let Slot::Raw(tok) = slots[i].clone() else { unreachable!() };

                let lhs_ok = i > 0
                    && matches!(&slots[i - 1], Slot::Node(n) if n.node.is_value_bearing());
                if !lhs_ok {
                    return Err(CompileError::MissingLeftOperand {
                        op: op.symbol().into(),
                        span: tok.span,
                    });
                }
                let rhs_ok = matches!(
                    slots.get(i + 1),
                    Some(Slot::Node(n)) if n.node.is_value_bearing()
                );
                if !rhs_ok {
                    return Err(CompileError::MissingRightOperand {
                        op: op.symbol().into(),
                        span: tok.span,
                    });
                }

                let Slot::Node(rhs) = slots.remove(i + 1) else { unreachable!() };
                slots.remove(i);
                let Slot::Node(lhs) = slots.remove(i - 1) else { unreachable!() };
                let full = Span::merge(lhs.span, rhs.span);
                slots.insert(
                    i - 1,
                    Slot::Node(Spanned::new(
                        Tree::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs) },
                        full,
                    )),
                );
                // the fused node may be the left operand of the next op
            }
        }
        Ok(())
    }

    /// Claims `=` and the compound forms, right to left for right
    /// associativity. Compound assignment desugars to a plain write of
    /// the matching binary operation.
    fn assignment_pass(&self, slots: &mut Vec<Slot>) -> Result<(), CompileError> {
        let mut i = slots.len();
        while i > 0 {
            i -= 1;
            let op = match &slots[i] {
                Slot::Raw(tok) => assign_op(&tok.node).map(|op| (op, tok.span)),
                _ => None,
            };
            let Some((compound, op_span)) = op else { continue };

            let target_ok = i > 0
                && matches!(&slots[i - 1], Slot::Node(n) if n.node.is_write_target());
            if !target_ok {
                return Err(CompileError::unexpected(
                    "left side of assignment must be a variable or member",
                    op_span,
                ));
            }
            let value_ok = matches!(
                slots.get(i + 1),
                Some(Slot::Node(n)) if n.node.is_value_bearing()
            );
            if !value_ok {
                return Err(CompileError::MissingRightOperand {
                    op: self.text(op_span),
                    span: op_span,
                });
            }

            let Slot::Node(rhs) = slots.remove(i + 1) else { unreachable!() };
            slots.remove(i);
            let Slot::Node(target) = slots.remove(i - 1) else { unreachable!() };

            let value = match compound {
                None => rhs,
                Some(op) => {
                    let span = Span::merge(target.span, rhs.span);
                    Spanned::new(
                        Tree::Binary {
                            op,
                            lhs: Box::new(target.clone()),
                            rhs: Box::new(rhs),
                        },
                        span,
                    )
                }
            };
            let full = Span::merge(target.span, value.span);
            slots.insert(
                i - 1,
                Slot::Node(Spanned::new(
                    Tree::Assign { target: Box::new(target), value: Box::new(value) },
                    full,
                )),
            );
        }
        Ok(())
    }

    /// Claims `if`/`else` and `while`, right to left so an `else if`
    /// chain folds from its tail.
    fn statement_pass(&self, slots: &mut Vec<Slot>) -> Result<(), CompileError> {
        let mut i = slots.len();
        while i > 0 {
            i -= 1;
            let keyword = match &slots[i] {
                Slot::Raw(tok) if tok.node == Token::If => Some((Token::If, tok.span)),
                Slot::Raw(tok) if tok.node == Token::While => Some((Token::While, tok.span)),
                _ => None,
            };
            let Some((kw, kw_span)) = keyword else { continue };
            let name = if kw == Token::If { "if" } else { "while" };

            let cond_ok = matches!(
                slots.get(i + 1),
                Some(Slot::Node(n)) if n.node.is_value_bearing()
            );
            if !cond_ok {
                return Err(CompileError::unexpected(
                    format!("'{name}' requires a condition"),
                    kw_span,
                ));
            }
            let body_ok = matches!(
                slots.get(i + 2),
                Some(Slot::Node(n)) if matches!(n.node, Tree::Block(_))
            );
            if !body_ok {
                return Err(CompileError::unexpected(
                    format!("'{name}' requires a block"),
                    kw_span,
                ));
            }

            let else_block = if kw == Token::If
                && matches!(slots.get(i + 3), Some(Slot::Raw(tok)) if tok.node == Token::Else)
            {
                let chained = matches!(
                    slots.get(i + 4),
                    Some(Slot::Node(n)) if matches!(n.node, Tree::Block(_) | Tree::If { .. })
                );
                if !chained {
                    let Some(Slot::Raw(else_tok)) = slots.get(i + 3) else {
                        unreachable!()
                    };
                    return Err(CompileError::unexpected(
                        "'else' requires a block or another 'if'",
                        else_tok.span,
                    ));
                }
                let Slot::Node(alt) = slots.remove(i + 4) else { unreachable!() };
                slots.remove(i + 3);
                Some(alt)
            } else {
                None
            };

            let Slot::Node(body) = slots.remove(i + 2) else { unreachable!() };
            let Slot::Node(cond) = slots.remove(i + 1) else { unreachable!() };
            slots.remove(i);

            let end = else_block
                .as_ref()
                .map(|b| b.span)
                .unwrap_or(body.span);
            let full = Span::merge(kw_span, end);
            let tree = if kw == Token::If {
                Tree::If {
                    cond: Box::new(cond),
                    then_block: Box::new(body),
                    else_block: else_block.map(Box::new),
                }
            } else {
                Tree::While { cond: Box::new(cond), body: Box::new(body) }
            };
            slots.insert(i, Slot::Node(Spanned::new(tree, full)));
        }
        Ok(())
    }

    /// Parse the contents of a call's parenthesis group.
    fn parse_args(&self, items: Vec<Item>, group_span: Span) -> Result<Vec<Arg>, CompileError> {
        if items.is_empty() {
            return Ok(Vec::new());
        }

        let mut segments: Vec<(Vec<Item>, Span)> = Vec::new();
        let mut current: Vec<Item> = Vec::new();
        let mut sep_span = group_span;
        for item in items {
            if matches!(&item, Item::Tok(tok) if tok.node == Token::Comma) {
                segments.push((std::mem::take(&mut current), sep_span));
                sep_span = item.span();
            } else {
                current.push(item);
            }
        }
        segments.push((current, sep_span));

        let mut args = Vec::with_capacity(segments.len());
        let mut seen_named = false;
        for (segment, sep_span) in segments {
            if segment.is_empty() {
                return Err(CompileError::DanglingSeparator { span: sep_span });
            }

            let named = matches!(
                (segment.first(), segment.get(1)),
                (Some(Item::Tok(a)), Some(Item::Tok(b)))
                    if a.node == Token::Ident && b.node == Token::Colon
            );
            if named {
                let Some(Item::Tok(name_tok)) = segment.first() else { unreachable!() };
                let name = Spanned::new(self.text(name_tok.span), name_tok.span);
                let colon_span = segment[1].span();
                let value_items: Vec<Item> = segment[2..].to_vec();
                if value_items.is_empty() {
                    return Err(CompileError::unexpected(
                        format!("named argument '{}' is missing a value", name.node),
                        colon_span,
                    ));
                }
                let value = self.single_root(value_items)?;
                args.push(Arg::Named { name, value });
                seen_named = true;
            } else {
                if seen_named {
                    return Err(CompileError::PositionalAfterNamed {
                        span: segment[0].span(),
                    });
                }
                let value = self.single_root(segment)?;
                args.push(Arg::Positional(value));
            }
        }
        Ok(args)
    }

    fn single_root(&self, items: Vec<Item>) -> Result<Spanned<Tree>, CompileError> {
        let span = items
            .first()
            .map(|f| Span::merge(f.span(), items[items.len() - 1].span()))
            .unwrap_or(Span::dummy());
        let mut roots = self.parse_sequence(items)?;
        if roots.len() != 1 {
            return Err(CompileError::unexpected(
                "argument must be a single expression",
                span,
            ));
        }
        Ok(roots.swap_remove(0))
    }
}

fn infix_op(tok: &Token) -> Option<BinOp> {
    Some(match tok {
        Token::Star => BinOp::Mul,
        Token::Slash => BinOp::Div,
        Token::Percent => BinOp::Mod,
        Token::Plus => BinOp::Add,
        Token::Minus => BinOp::Sub,
        Token::Shl => BinOp::Shl,
        Token::Shr => BinOp::Shr,
        Token::Lt => BinOp::Lt,
        Token::Gt => BinOp::Gt,
        Token::LtEq => BinOp::LtEq,
        Token::GtEq => BinOp::GtEq,
        Token::EqEq => BinOp::Eq,
        Token::NotEq => BinOp::Neq,
        Token::Amp => BinOp::BitAnd,
        Token::Caret => BinOp::BitXor,
        Token::Pipe => BinOp::BitOr,
        Token::AmpAmp => BinOp::And,
        Token::PipePipe => BinOp::Or,
        _ => return None,
    })
}

/// `None` inside `Some` means plain `=`; `Some(op)` is the compound form.
#[allow(clippy::option_option)]
fn assign_op(tok: &Token) -> Option<Option<BinOp>> {
    Some(match tok {
        Token::Assign => None,
        Token::PlusAssign => Some(BinOp::Add),
        Token::MinusAssign => Some(BinOp::Sub),
        Token::StarAssign => Some(BinOp::Mul),
        Token::SlashAssign => Some(BinOp::Div),
        Token::PercentAssign => Some(BinOp::Mod),
        Token::AmpAssign => Some(BinOp::BitAnd),
        Token::CaretAssign => Some(BinOp::BitXor),
        Token::PipeAssign => Some(BinOp::BitOr),
        Token::ShlAssign => Some(BinOp::Shl),
        Token::ShrAssign => Some(BinOp::Shr),
        _ => return None,
    })
}
