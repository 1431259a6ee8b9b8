use crate::diagnostics::CompileError;
use crate::parser::{Arg, Tree, UnaryOp};
use crate::span::Spanned;

use super::Compiler;

/// Rebuild a tree with `f` applied to every direct child.
fn map_children(node: Tree, f: fn(Spanned<Tree>) -> Spanned<Tree>) -> Tree {
    match node {
        Tree::Unary { op, operand } => Tree::Unary { op, operand: Box::new(f(*operand)) },
        Tree::Binary { op, lhs, rhs } => Tree::Binary {
            op,
            lhs: Box::new(f(*lhs)),
            rhs: Box::new(f(*rhs)),
        },
        Tree::Assign { target, value } => Tree::Assign {
            target: Box::new(f(*target)),
            value: Box::new(f(*value)),
        },
        Tree::Dot { lhs, member } => Tree::Dot { lhs: Box::new(f(*lhs)), member },
        Tree::Call { callee, args } => Tree::Call {
            callee: Box::new(f(*callee)),
            args: args
                .into_iter()
                .map(|a| match a {
                    Arg::Positional(v) => Arg::Positional(f(v)),
                    Arg::Named { name, value } => Arg::Named { name, value: f(value) },
                })
                .collect(),
        },
        Tree::Paren(inner) => Tree::Paren(Box::new(f(*inner))),
        Tree::Block(items) => Tree::Block(items.into_iter().map(f).collect()),
        Tree::If { cond, then_block, else_block } => Tree::If {
            cond: Box::new(f(*cond)),
            then_block: Box::new(f(*then_block)),
            else_block: else_block.map(|b| Box::new(f(*b))),
        },
        Tree::While { cond, body } => Tree::While {
            cond: Box::new(f(*cond)),
            body: Box::new(f(*body)),
        },
        leaf => leaf,
    }
}

/// Strip grouping nodes. Rendering re-derives parentheses from
/// precedence, so explicit groups carry no information past parsing.
pub fn remove_parens(tree: Spanned<Tree>) -> Spanned<Tree> {
    let node = map_children(tree.node, remove_parens);
    match node {
        Tree::Paren(inner) => *inner,
        other => Spanned::new(other, tree.span),
    }
}

/// Drop unary plus and collapse doubled applications of the same
/// unary operator.
pub fn remove_unaries(tree: Spanned<Tree>) -> Spanned<Tree> {
    let node = map_children(tree.node, remove_unaries);
    match node {
        Tree::Unary { op: UnaryOp::Plus, operand } => *operand,
        Tree::Unary { op, operand } => match operand.node {
            Tree::Unary { op: inner_op, operand: inner } if inner_op == op => *inner,
            other => Spanned::new(
                Tree::Unary { op, operand: Box::new(Spanned::new(other, operand.span)) },
                tree.span,
            ),
        },
        other => Spanned::new(other, tree.span),
    }
}

/// An expression readied for evaluation: statement-like subtrees have
/// been pulled out into lines that run before or after the owning
/// statement, leaving a pure value tree.
pub(crate) struct Prepared {
    pub tree: Spanned<Tree>,
    pub pre: Vec<String>,
    pub post: Vec<String>,
}

impl Compiler<'_> {
    /// Normalize and extract. With `keep_root_call`, a command call at
    /// the very root is left in place for the caller to compile
    /// directly instead of being routed through a temporary.
    pub(crate) fn prepare(
        &mut self,
        tree: &Spanned<Tree>,
        keep_root_call: bool,
    ) -> Result<Prepared, CompileError> {
        let normalized = remove_unaries(remove_parens(tree.clone()));
        let mut pre = Vec::new();
        let mut post = Vec::new();
        let tree = self.extract(normalized, keep_root_call, &mut pre, &mut post)?;
        Ok(Prepared { tree, pre, post })
    }

    fn extract(
        &mut self,
        tree: Spanned<Tree>,
        keep_root: bool,
        pre: &mut Vec<String>,
        post: &mut Vec<String>,
    ) -> Result<Spanned<Tree>, CompileError> {
        let span = tree.span;
        let node = match tree.node {
            Tree::Unary { op, operand } => Tree::Unary {
                op,
                operand: Box::new(self.extract(*operand, false, pre, post)?),
            },
            Tree::Binary { op, lhs, rhs } => Tree::Binary {
                op,
                lhs: Box::new(self.extract(*lhs, false, pre, post)?),
                rhs: Box::new(self.extract(*rhs, false, pre, post)?),
            },
            Tree::Dot { lhs, member } => Tree::Dot {
                lhs: Box::new(self.extract(*lhs, false, pre, post)?),
                member,
            },
            Tree::Call { callee, args } => {
                let callee = Box::new(self.extract(*callee, false, pre, post)?);
                let args = args
                    .into_iter()
                    .map(|a| {
                        Ok(match a {
                            Arg::Positional(v) => {
                                Arg::Positional(self.extract(v, false, pre, post)?)
                            }
                            Arg::Named { name, value } => Arg::Named {
                                name,
                                value: self.extract(value, false, pre, post)?,
                            },
                        })
                    })
                    .collect::<Result<Vec<_>, CompileError>>()?;

                match self.classify_call(&callee)? {
                    super::command::CallKind::Host => Tree::Call { callee, args },
                    _ if keep_root => Tree::Call { callee, args },
                    super::command::CallKind::Command { family, name } => {
                        let (line, result_ty) =
                            self.compile_command_call(span, family.as_deref(), &name, &args)?;
                        let Some(result_ty) = result_ty else {
                            return Err(CompileError::ValueOfVoid { span });
                        };
                        let tmp = self.scope.next_temp(result_ty);
                        pre.push(format!("{line} result ♥{tmp}"));
                        Tree::Ident(tmp)
                    }
                }
            }
            Tree::Assign { target, value } => match &target.node {
                Tree::Ident(name) => {
                    let name = name.clone();
                    let lines = self.compile_assign(&target, &value)?;
                    pre.extend(lines);
                    Tree::Ident(name)
                }
                _ => return Err(CompileError::CannotAssignTo { span }),
            },
            Tree::Incr { op, prefix, target } => {
                let line = self.compile_step(&target, op)?;
                if prefix {
                    pre.push(line);
                } else {
                    post.push(line);
                }
                Tree::Ident(target.node)
            }
            leaf => leaf,
        };
        Ok(Spanned::new(node, span))
    }
}
