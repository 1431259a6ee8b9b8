use crate::catalog::host::{self, TypeId};
use crate::diagnostics::CompileError;
use crate::parser::{Arg, Tree};
use crate::span::{Span, Spanned};

use super::types::{binary_result, unary_result, Value};
use super::Compiler;

/// Position an expression is evaluated in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Usage {
    Read,
    Write,
}

/// Result of evaluating one tree: its type plus the flags that decide
/// how the expression must be rendered. `snippet` is set whenever any
/// part can only exist inside a native block; a string mixed with any
/// operator forces the same.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Eval {
    pub value: Value,
    pub snippet: bool,
    pub has_str: bool,
    pub has_op: bool,
}

impl Eval {
    fn plain(value: Value) -> Self {
        Eval { value, snippet: false, has_str: false, has_op: false }
    }

    pub fn needs_native(&self) -> bool {
        self.snippet || (self.has_str && self.has_op)
    }
}

impl Compiler<'_> {
    /// Type-check a tree and compute its rendering flags. Evaluation
    /// never emits output and never mutates the scope.
    pub(crate) fn eval(&self, tree: &Spanned<Tree>, usage: Usage) -> Result<Eval, CompileError> {
        let span = tree.span;
        match &tree.node {
            Tree::Int(_) | Tree::Float(_) | Tree::Bool(_) | Tree::Null | Tree::Str { .. }
                if usage == Usage::Write =>
            {
                Err(CompileError::CannotAssignTo { span })
            }
            Tree::Int(_) => Ok(Eval::plain(Value::Host(host::INT))),
            Tree::Float(_) => Ok(Eval::plain(Value::Host(host::FLOAT))),
            Tree::Bool(_) => Ok(Eval::plain(Value::Host(host::BOOL))),
            Tree::Null => Ok(Eval::plain(Value::Null)),
            Tree::Str { needs_escaping, .. } => Ok(Eval {
                value: Value::Host(host::STRING),
                snippet: *needs_escaping,
                has_str: true,
                has_op: false,
            }),
            Tree::Ident(name) => match self.scope.get(name) {
                Some(var) if var.is_static_type => Err(CompileError::unexpected(
                    format!("'{name}' is a type name, not a value"),
                    span,
                )),
                Some(var) => {
                    if usage == Usage::Write && var.read_only {
                        return Err(CompileError::ReadOnlyAssignment {
                            name: name.clone(),
                            span,
                        });
                    }
                    Ok(Eval {
                        value: Value::Host(var.ty),
                        snippet: false,
                        has_str: var.ty == host::STRING,
                        has_op: false,
                    })
                }
                None => Err(CompileError::UnassignedVariable { name: name.clone(), span }),
            },
            Tree::Dot { lhs, member } => self.eval_dot(span, lhs, member, usage),
            Tree::Unary { op, operand } => {
                if usage == Usage::Write {
                    return Err(CompileError::CannotAssignTo { span });
                }
                let e = self.eval(operand, Usage::Read)?;
                let result = match e.value {
                    Value::Host(t) => unary_result(*op, t),
                    _ => None,
                };
                let Some(result) = result else {
                    return Err(CompileError::InvalidOperation {
                        op: op.symbol().into(),
                        operands: e.value.describe(self.host),
                        span,
                    });
                };
                Ok(Eval {
                    value: Value::Host(result),
                    snippet: e.snippet,
                    has_str: e.has_str,
                    has_op: true,
                })
            }
            Tree::Binary { op, lhs, rhs } => {
                if usage == Usage::Write {
                    return Err(CompileError::CannotAssignTo { span });
                }
                let a = self.eval(lhs, Usage::Read)?;
                let b = self.eval(rhs, Usage::Read)?;
                let result = match (a.value, b.value) {
                    (Value::Host(l), Value::Host(r)) => binary_result(*op, l, r),
                    _ => None,
                };
                let Some(result) = result else {
                    return Err(CompileError::InvalidOperation {
                        op: op.symbol().into(),
                        operands: format!(
                            "{} and {}",
                            a.value.describe(self.host),
                            b.value.describe(self.host)
                        ),
                        span,
                    });
                };
                Ok(Eval {
                    value: Value::Host(result),
                    snippet: a.snippet || b.snippet,
                    has_str: a.has_str || b.has_str,
                    has_op: true,
                })
            }
            Tree::Call { callee, args } => self.eval_call(span, callee, args, usage),
            Tree::Paren(inner) => self.eval(inner, usage),
            Tree::Assign { .. }
            | Tree::Incr { .. }
            | Tree::Block(_)
            | Tree::If { .. }
            | Tree::While { .. }
            | Tree::Terminator => Err(CompileError::unexpected(
                "statement cannot be used as a value",
                span,
            )),
        }
    }

    fn eval_dot(
        &self,
        span: Span,
        lhs: &Spanned<Tree>,
        member: &Spanned<String>,
        usage: Usage,
    ) -> Result<Eval, CompileError> {
        // Static member search applies only when the left side is
        // directly a type name.
        if let Some(recv) = self.static_receiver(lhs) {
            let ty = self.host.get(recv);
            let prop = ty.property(&member.node).filter(|p| p.is_static);
            let Some(prop) = prop else {
                return Err(CompileError::MissingMember {
                    type_name: ty.name.clone(),
                    member: member.node.clone(),
                    span: member.span,
                });
            };
            if usage == Usage::Write && !prop.writable {
                return Err(CompileError::MemberNotWritable {
                    type_name: ty.name.clone(),
                    member: member.node.clone(),
                    span,
                });
            }
            return Ok(Eval {
                value: Value::Host(prop.ty),
                snippet: true,
                has_str: prop.ty == host::STRING,
                has_op: false,
            });
        }

        let base = self.eval(lhs, Usage::Read)?;
        let Value::Host(tid) = base.value else {
            return Err(CompileError::MissingMember {
                type_name: base.value.describe(self.host),
                member: member.node.clone(),
                span: member.span,
            });
        };
        let ty = self.host.get(tid);
        let prop = ty.property(&member.node).filter(|p| !p.is_static);
        let Some(prop) = prop else {
            return Err(CompileError::MissingMember {
                type_name: ty.name.clone(),
                member: member.node.clone(),
                span: member.span,
            });
        };
        match usage {
            Usage::Read if !prop.readable => Err(CompileError::MemberNotReadable {
                type_name: ty.name.clone(),
                member: member.node.clone(),
                span,
            }),
            Usage::Write if !prop.writable => Err(CompileError::MemberNotWritable {
                type_name: ty.name.clone(),
                member: member.node.clone(),
                span,
            }),
            _ => Ok(Eval {
                value: Value::Host(prop.ty),
                snippet: true,
                has_str: base.has_str || prop.ty == host::STRING,
                has_op: base.has_op,
            }),
        }
    }

    fn eval_call(
        &self,
        span: Span,
        callee: &Spanned<Tree>,
        args: &[Arg],
        usage: Usage,
    ) -> Result<Eval, CompileError> {
        if usage == Usage::Write {
            return Err(CompileError::CannotAssignTo { span });
        }
        let Tree::Dot { lhs, member } = &callee.node else {
            return Err(CompileError::unexpected(
                "only type and value members can be called",
                callee.span,
            ));
        };
        for arg in args {
            if let Arg::Named { name, .. } = arg {
                return Err(CompileError::unexpected(
                    "method calls take positional arguments only",
                    name.span,
                ));
            }
        }

        let (recv, is_static, base_eval) = match self.static_receiver(lhs) {
            Some(recv) => (recv, true, None),
            None => {
                let e = self.eval(lhs, Usage::Read)?;
                let Value::Host(tid) = e.value else {
                    return Err(CompileError::MissingMember {
                        type_name: e.value.describe(self.host),
                        member: member.node.clone(),
                        span: member.span,
                    });
                };
                (tid, false, Some(e))
            }
        };

        let mut arg_evals = Vec::with_capacity(args.len());
        for arg in args {
            arg_evals.push(self.eval(arg.value(), Usage::Read)?);
        }
        let (_, ret) = self.resolve_method(recv, is_static, member, &arg_evals)?;

        let mut has_str = base_eval.map(|e| e.has_str).unwrap_or(false);
        let mut has_op = base_eval.map(|e| e.has_op).unwrap_or(false);
        for e in &arg_evals {
            has_str |= e.has_str;
            has_op |= e.has_op;
        }
        if ret == Some(host::STRING) {
            has_str = true;
        }
        Ok(Eval {
            value: ret.map(Value::Host).unwrap_or(Value::Void),
            snippet: true,
            has_str,
            has_op,
        })
    }

    /// When `tree` is directly a type-name identifier, its type id.
    pub(crate) fn static_receiver(&self, tree: &Spanned<Tree>) -> Option<TypeId> {
        if let Tree::Ident(name) = &tree.node {
            if let Some(var) = self.scope.get(name) {
                if var.is_static_type {
                    return Some(var.ty);
                }
            }
        }
        None
    }

    /// Overload selection: a candidate matches when arities agree and
    /// every argument implicitly converts.
    pub(crate) fn resolve_method(
        &self,
        recv: TypeId,
        is_static: bool,
        member: &Spanned<String>,
        arg_evals: &[Eval],
    ) -> Result<(Vec<TypeId>, Option<TypeId>), CompileError> {
        let ty = self.host.get(recv);
        let candidates: Vec<_> = ty
            .methods_named(&member.node)
            .into_iter()
            .filter(|m| m.is_static == is_static)
            .collect();
        if candidates.is_empty() {
            return Err(CompileError::MissingMember {
                type_name: ty.name.clone(),
                member: member.node.clone(),
                span: member.span,
            });
        }

        for m in &candidates {
            if m.params.len() == arg_evals.len()
                && m.params
                    .iter()
                    .zip(arg_evals)
                    .all(|(p, a)| a.value.converts_to(*p, self.host))
            {
                return Ok((m.params.clone(), m.ret));
            }
        }

        if let [only] = candidates.as_slice() {
            if only.params.len() == arg_evals.len() {
                for (p, a) in only.params.iter().zip(arg_evals) {
                    if !a.value.converts_to(*p, self.host) {
                        return Err(CompileError::ParameterConversion {
                            method: member.node.clone(),
                            from: a.value.describe(self.host),
                            to: self.host.name_of(*p).into(),
                            span: member.span,
                        });
                    }
                }
            }
        }
        Err(CompileError::NoMatchingOverload {
            type_name: ty.name.clone(),
            method: member.node.clone(),
            span: member.span,
        })
    }

    /// Render a finished tree as output text. With `native` set, the
    /// text is destined for the inside of a native block: strings use
    /// escaped quoting and type references use their full names.
    pub(crate) fn render(&self, tree: &Spanned<Tree>, native: bool) -> String {
        match &tree.node {
            Tree::Int(v) => v.to_string(),
            Tree::Float(v) => render_float(*v),
            Tree::Bool(v) => v.to_string(),
            Tree::Null => "null".into(),
            Tree::Str { value, .. } => {
                if native {
                    format!("\"{}\"", escape(value))
                } else {
                    format!("‴{value}‴")
                }
            }
            // evaluation runs first and rejects unregistered names, so
            // the identifier is always in scope here
            Tree::Ident(name) => match self.scope.get(name) {
                Some(var) if var.is_static_type => self.host.get(var.ty).full_name.clone(),
                Some(var) => format!("♥{}", var.generated),
                None => unreachable!("identifier '{name}' rendered without evaluation"),
            },
            Tree::Dot { lhs, member } => {
                format!("{}.{}", self.render(lhs, native), member.node)
            }
            Tree::Call { callee, args } => {
                let rendered: Vec<String> = args
                    .iter()
                    .map(|a| self.render(a.value(), native))
                    .collect();
                format!("{}({})", self.render(callee, native), rendered.join(", "))
            }
            Tree::Unary { op, operand } => {
                let inner = self.render(operand, native);
                if matches!(operand.node, Tree::Binary { .. }) {
                    format!("{}({inner})", op.symbol())
                } else {
                    format!("{}{inner}", op.symbol())
                }
            }
            Tree::Binary { op, lhs, rhs } => {
                let prec = op.precedence();
                let l = self.render_operand(lhs, prec, false, native);
                let r = self.render_operand(rhs, prec, true, native);
                format!("{l}{}{r}", op.symbol())
            }
            Tree::Paren(inner) => self.render(inner, native),
            // statement trees never reach rendering
            Tree::Assign { .. }
            | Tree::Incr { .. }
            | Tree::Block(_)
            | Tree::If { .. }
            | Tree::While { .. }
            | Tree::Terminator => String::new(),
        }
    }

    fn render_operand(
        &self,
        child: &Spanned<Tree>,
        parent_prec: u8,
        is_rhs: bool,
        native: bool,
    ) -> String {
        let rendered = self.render(child, native);
        let needs_parens = match &child.node {
            Tree::Binary { op, .. } => {
                let p = op.precedence();
                p < parent_prec || (is_rhs && p == parent_prec)
            }
            _ => false,
        };
        if needs_parens {
            format!("({rendered})")
        } else {
            rendered
        }
    }

    /// Full rendering of an expression, wrapped as a native block when
    /// its evaluation demands one.
    pub(crate) fn wrapped(&self, tree: &Spanned<Tree>, needs_native: bool) -> String {
        if needs_native {
            format!("⊂{}⊃", self.render(tree, true))
        } else {
            self.render(tree, false)
        }
    }
}

fn render_float(v: f64) -> String {
    if v.is_finite() && v.fract() == 0.0 {
        format!("{v:.1}")
    } else {
        v.to_string()
    }
}

fn escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}
