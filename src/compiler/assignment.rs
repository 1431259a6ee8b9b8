use crate::diagnostics::CompileError;
use crate::parser::{IncrOp, Tree};
use crate::span::{Span, Spanned};

use super::command::CallKind;
use super::expression::Usage;
use super::normalize::Prepared;
use super::types::Value;
use super::Compiler;

impl Compiler<'_> {
    /// Compile one assignment statement. The value side is prepared
    /// first, so reading the target before its first write fails the
    /// natural way.
    pub(crate) fn compile_assign(
        &mut self,
        target: &Spanned<Tree>,
        value: &Spanned<Tree>,
    ) -> Result<Vec<String>, CompileError> {
        let Prepared { tree: value_tree, pre, post } = self.prepare(value, true)?;
        let mut lines = pre;

        // A command call as the whole value feeds the target through
        // the command's result argument instead of an expression line.
        if let Tree::Call { callee, args } = &value_tree.node {
            if let CallKind::Command { family, name } = self.classify_call(callee)? {
                let (line, result_ty) =
                    self.compile_command_call(value_tree.span, family.as_deref(), &name, args)?;
                let Some(result_ty) = result_ty else {
                    return Err(CompileError::ValueOfVoid { span: value_tree.span });
                };
                match &target.node {
                    Tree::Ident(name) => {
                        let gen = self.bind_target(
                            name,
                            Value::Host(result_ty),
                            target.span,
                            value_tree.span,
                        )?;
                        lines.push(format!("{line} result ♥{gen}"));
                    }
                    Tree::Dot { .. } => {
                        let tmp = self.scope.next_temp(result_ty);
                        lines.push(format!("{line} result ♥{tmp}"));
                        let tmp_ref = Spanned::new(Tree::Ident(tmp), value_tree.span);
                        lines.push(self.compile_member_assign(target, &tmp_ref)?);
                    }
                    _ => return Err(CompileError::CannotAssignTo { span: target.span }),
                }
                lines.extend(post);
                return Ok(lines);
            }
        }

        match &target.node {
            Tree::Ident(name) => {
                let ev = self.eval(&value_tree, Usage::Read)?;
                let gen = self.bind_target(name, ev.value, target.span, value_tree.span)?;
                lines.push(format!(
                    "♥{gen}={}",
                    self.wrapped(&value_tree, ev.needs_native())
                ));
            }
            Tree::Dot { .. } => lines.push(self.compile_member_assign(target, &value_tree)?),
            _ => return Err(CompileError::CannotAssignTo { span: target.span }),
        }
        lines.extend(post);
        Ok(lines)
    }

    /// Check or register the target variable and return its output name.
    fn bind_target(
        &mut self,
        name: &str,
        value: Value,
        target_span: Span,
        value_span: Span,
    ) -> Result<String, CompileError> {
        if value == Value::Void {
            return Err(CompileError::ValueOfVoid { span: value_span });
        }
        if let Some(var) = self.scope.get(name) {
            if var.is_static_type || var.read_only {
                return Err(CompileError::ReadOnlyAssignment {
                    name: name.to_string(),
                    span: target_span,
                });
            }
            if !value.converts_to(var.ty, self.host) {
                return Err(CompileError::ImplicitConversion {
                    from: value.describe(self.host),
                    to: self.host.name_of(var.ty).into(),
                    span: value_span,
                });
            }
            return Ok(var.generated.clone());
        }
        let ty = match value {
            Value::Host(ty) => ty,
            _ => {
                return Err(CompileError::NullInference {
                    name: name.to_string(),
                    span: value_span,
                })
            }
        };
        Ok(self.scope.register(name, ty).generated.clone())
    }

    /// `x++` and `--x` compile as the equivalent read-modify-write.
    pub(crate) fn compile_step(
        &mut self,
        target: &Spanned<String>,
        op: IncrOp,
    ) -> Result<String, CompileError> {
        let ident = Spanned::new(Tree::Ident(target.node.clone()), target.span);
        let one = Spanned::new(Tree::Int(1), target.span);
        let value = Spanned::new(
            Tree::Binary {
                op: op.bin_op(),
                lhs: Box::new(ident.clone()),
                rhs: Box::new(one),
            },
            target.span,
        );
        let mut lines = self.compile_assign(&ident, &value)?;
        lines
            .pop()
            .ok_or_else(|| CompileError::unexpected("step produced no output", target.span))
    }

    /// Writing through a member copies the base out, mutates the copy
    /// inside a synthesized function, and writes the copy back.
    pub(crate) fn compile_member_assign(
        &mut self,
        target: &Spanned<Tree>,
        value: &Spanned<Tree>,
    ) -> Result<String, CompileError> {
        let member_eval = self.eval(target, Usage::Write)?;
        let val_eval = self.eval(value, Usage::Read)?;
        let Value::Host(member_ty) = member_eval.value else {
            return Err(CompileError::CannotAssignTo { span: target.span });
        };
        match val_eval.value {
            Value::Void => return Err(CompileError::ValueOfVoid { span: value.span }),
            v if !v.converts_to(member_ty, self.host) => {
                return Err(CompileError::ImplicitConversion {
                    from: v.describe(self.host),
                    to: self.host.name_of(member_ty).into(),
                    span: value.span,
                });
            }
            _ => {}
        }

        let (base_name, path) = dot_path(target)?;
        let var = self
            .scope
            .get(&base_name)
            .ok_or_else(|| CompileError::UnassignedVariable {
                name: base_name.clone(),
                span: target.span,
            })?;
        if var.is_static_type || var.read_only {
            return Err(CompileError::ReadOnlyAssignment {
                name: base_name,
                span: target.span,
            });
        }
        let gen = var.generated.clone();
        let full = self.host.get(var.ty).full_name.clone();
        let path = path.join(".");
        let val = self.render(value, true);
        Ok(format!(
            "♥{gen}=⊂new Func<{full}, {full}>(({full} _)=>{{_.{path}={val};return _;}})(♥{gen})⊃"
        ))
    }
}

/// Split a member chain into its base variable name and member path.
pub(crate) fn dot_path(target: &Spanned<Tree>) -> Result<(String, Vec<String>), CompileError> {
    let mut members = Vec::new();
    let mut cur = target;
    while let Tree::Dot { lhs, member } = &cur.node {
        members.push(member.node.clone());
        cur = lhs;
    }
    let Tree::Ident(base) = &cur.node else {
        return Err(CompileError::CannotAssignTo { span: target.span });
    };
    members.reverse();
    Ok((base.clone(), members))
}
