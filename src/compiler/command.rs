use std::collections::BTreeMap;

use crate::catalog::host::TypeId;
use crate::diagnostics::CompileError;
use crate::parser::{Arg, Tree};
use crate::span::{Span, Spanned};

use super::assignment::dot_path;
use super::expression::Usage;
use super::types::Value;
use super::Compiler;

/// How a call statement resolves: a method on a host value or type, or
/// an automation command from the catalog.
pub(crate) enum CallKind {
    Host,
    Command { family: Option<String>, name: String },
}

impl Compiler<'_> {
    /// Decide whether a callee names a host method or a command. A dot
    /// chain rooted in a known variable or type is always a host call;
    /// otherwise the root must name a command family.
    pub(crate) fn classify_call(
        &self,
        callee: &Spanned<Tree>,
    ) -> Result<CallKind, CompileError> {
        match &callee.node {
            Tree::Ident(name) => {
                if self.scope.get(name).is_some() {
                    return Err(CompileError::unexpected(
                        format!("'{name}' is not callable"),
                        callee.span,
                    ));
                }
                if self.commands.find(None, name).is_some() {
                    Ok(CallKind::Command { family: None, name: name.clone() })
                } else {
                    Err(CompileError::UnknownCommand {
                        name: name.clone(),
                        family: None,
                        span: callee.span,
                    })
                }
            }
            Tree::Dot { lhs, member } => match &lhs.node {
                Tree::Ident(base) => {
                    if self.scope.get(base).is_some() {
                        Ok(CallKind::Host)
                    } else if self.commands.has_family(base) {
                        Ok(CallKind::Command {
                            family: Some(base.clone()),
                            name: member.node.clone(),
                        })
                    } else {
                        Err(CompileError::UnknownCommandFamily {
                            name: base.clone(),
                            span: lhs.span,
                        })
                    }
                }
                Tree::Dot { .. } => {
                    let rooted = dot_path(lhs)
                        .ok()
                        .map(|(base, _)| self.scope.get(&base).is_some())
                        .unwrap_or(false);
                    if rooted {
                        Ok(CallKind::Host)
                    } else {
                        Err(CompileError::MultiLevelFamily { span: callee.span })
                    }
                }
                _ => Ok(CallKind::Host),
            },
            _ => Err(CompileError::unexpected(
                "expression is not callable",
                callee.span,
            )),
        }
    }

    /// Assemble a command invocation line, without any result clause.
    /// Returns the line and the command's result type, if it has one.
    pub(crate) fn compile_command_call(
        &self,
        span: Span,
        family: Option<&str>,
        name: &str,
        args: &[Arg],
    ) -> Result<(String, Option<TypeId>), CompileError> {
        let command = self.commands.find(family, name).ok_or_else(|| {
            CompileError::UnknownCommand {
                name: name.to_string(),
                family: family.map(str::to_string),
                span,
            }
        })?;
        let full = match family {
            Some(f) => format!("{f}.{name}"),
            None => name.to_string(),
        };

        let mut supplied: Vec<Option<&Spanned<Tree>>> = vec![None; command.args.len()];
        for (i, arg) in args.iter().enumerate() {
            match arg {
                Arg::Positional(value) => {
                    if i >= command.args.len() {
                        return Err(CompileError::TooManyArguments {
                            command: full,
                            max: command.args.len(),
                            span: value.span,
                        });
                    }
                    supplied[i] = Some(value);
                }
                Arg::Named { name: arg_name, value } => {
                    let idx = command
                        .args
                        .iter()
                        .position(|d| d.name == arg_name.node)
                        .ok_or_else(|| CompileError::UnknownArgument {
                            command: full.clone(),
                            name: arg_name.node.clone(),
                            span: arg_name.span,
                        })?;
                    if supplied[idx].is_some() {
                        return Err(CompileError::unexpected(
                            format!("argument '{}' supplied more than once", arg_name.node),
                            arg_name.span,
                        ));
                    }
                    supplied[idx] = Some(value);
                }
            }
        }

        let mut groups: BTreeMap<u32, Vec<usize>> = BTreeMap::new();
        for (idx, descriptor) in command.args.iter().enumerate() {
            if let Some(group) = descriptor.required_group {
                groups.entry(group).or_default().push(idx);
            }
        }
        for members in groups.into_values() {
            let given = members.iter().filter(|i| supplied[**i].is_some()).count();
            let names = || {
                members
                    .iter()
                    .map(|i| command.args[*i].name.as_str())
                    .collect::<Vec<_>>()
            };
            if given == 0 {
                return Err(CompileError::MissingArgument {
                    command: full,
                    wanted: names().join(" or "),
                    span,
                });
            }
            if given > 1 {
                return Err(CompileError::ConflictingArguments {
                    command: full,
                    group: names().join(", "),
                    span,
                });
            }
        }

        let mut line = full.clone();
        for (idx, descriptor) in command.args.iter().enumerate() {
            if let Some(value) = supplied[idx] {
                let ev = self.eval(value, Usage::Read)?;
                if ev.value == Value::Void {
                    return Err(CompileError::ValueOfVoid { span: value.span });
                }
                line.push(' ');
                line.push_str(&descriptor.name);
                line.push(' ');
                line.push_str(&self.wrapped(value, ev.needs_native()));
            }
        }

        let result_ty = match &command.result {
            Some(type_name) => Some(self.host.lookup(type_name).ok_or_else(|| {
                CompileError::unexpected(
                    format!("command '{full}' declares unknown result type '{type_name}'"),
                    span,
                )
            })?),
            None => None,
        };
        Ok((line, result_ty))
    }

    /// A host method call standing alone as a statement. Void methods
    /// on a variable receiver write the mutated copy back; everything
    /// else parks its value in a temporary.
    pub(crate) fn compile_host_call_statement(
        &mut self,
        tree: &Spanned<Tree>,
    ) -> Result<Vec<String>, CompileError> {
        let ev = self.eval(tree, Usage::Read)?;
        let Tree::Call { callee, args } = &tree.node else {
            return Err(CompileError::unexpected("expected a call", tree.span));
        };
        let Tree::Dot { lhs, member } = &callee.node else {
            return Err(CompileError::unexpected(
                "only type and value members can be called",
                callee.span,
            ));
        };

        if let Value::Host(ty) = ev.value {
            let tmp = self.scope.next_temp(ty);
            return Ok(vec![format!("♥{tmp}={}", self.wrapped(tree, ev.needs_native()))]);
        }

        // Void static calls have nothing to write back.
        if self.static_receiver(lhs).is_some() {
            return Ok(vec![format!("⊂{}⊃", self.render(tree, true))]);
        }

        let base_eval = self.eval(lhs, Usage::Read)?;
        let Value::Host(recv) = base_eval.value else {
            return Err(CompileError::MissingMember {
                type_name: base_eval.value.describe(self.host),
                member: member.node.clone(),
                span: member.span,
            });
        };
        let mut arg_evals = Vec::with_capacity(args.len());
        for arg in args {
            arg_evals.push(self.eval(arg.value(), Usage::Read)?);
        }
        let (params, _) = self.resolve_method(recv, false, member, &arg_evals)?;

        let Ok((base_name, path)) = dot_path(lhs) else {
            return Err(CompileError::unexpected(
                "method receiver must be a variable",
                lhs.span,
            ));
        };
        let var = self.scope.get(&base_name).ok_or_else(|| {
            CompileError::UnassignedVariable { name: base_name.clone(), span: lhs.span }
        })?;
        let gen = var.generated.clone();
        let base_full = self.host.get(var.ty).full_name.clone();

        let param_fulls: Vec<String> = params
            .iter()
            .map(|p| self.host.get(*p).full_name.clone())
            .collect();
        let mut generics = Vec::with_capacity(param_fulls.len() + 2);
        generics.push(base_full.clone());
        generics.extend(param_fulls.iter().cloned());
        generics.push(base_full.clone());

        let mut lambda = vec![format!("{base_full} _")];
        for (i, p) in param_fulls.iter().enumerate() {
            lambda.push(format!("{p} a{}", i + 1));
        }
        let inner_args: Vec<String> = (1..=params.len()).map(|i| format!("a{i}")).collect();
        let rel = if path.is_empty() {
            String::new()
        } else {
            format!(".{}", path.join("."))
        };
        let mut outer = vec![format!("♥{gen}")];
        for arg in args {
            outer.push(self.render(arg.value(), true));
        }

        Ok(vec![format!(
            "♥{gen}=⊂new Func<{generics}>(({lambda})=>{{_{rel}.{method}({inner});return _;}})({outer})⊃",
            generics = generics.join(", "),
            lambda = lambda.join(", "),
            method = member.node,
            inner = inner_args.join(", "),
            outer = outer.join(", "),
        )])
    }
}
