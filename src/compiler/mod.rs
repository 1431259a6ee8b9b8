//! Type evaluation and code generation. The compiler walks parsed
//! statement roots, checks types against the host catalog, resolves
//! commands against the command catalog, and emits the output script
//! line by line.

mod assignment;
mod command;
mod context;
mod expression;
mod flow;
mod normalize;
mod types;

pub use context::{Scope, Variable};
pub use types::Value;

use crate::catalog::{CommandCatalog, HostCatalog};
use crate::diagnostics::CompileError;
use crate::parser::Tree;
use crate::span::Spanned;

pub struct Compiler<'a> {
    pub(crate) scope: Scope,
    pub(crate) host: &'a HostCatalog,
    pub(crate) commands: &'a CommandCatalog,
}

impl<'a> Compiler<'a> {
    pub fn new(host: &'a HostCatalog, commands: &'a CommandCatalog) -> Self {
        Compiler { scope: Scope::seeded(host), host, commands }
    }

    /// Compile every statement root into output lines, in order. The
    /// first error aborts the compilation.
    pub fn compile(&mut self, roots: &[Spanned<Tree>]) -> Result<Vec<String>, CompileError> {
        let mut lines = Vec::new();
        for root in roots {
            lines.extend(self.compile_root(root)?);
        }
        Ok(lines)
    }

    pub(crate) fn compile_root(
        &mut self,
        root: &Spanned<Tree>,
    ) -> Result<Vec<String>, CompileError> {
        match &root.node {
            Tree::Terminator => Ok(Vec::new()),
            Tree::Assign { target, value } => self.compile_assign(target, value),
            Tree::Incr { op, target, .. } => Ok(vec![self.compile_step(target, *op)?]),
            Tree::Call { .. } => {
                let prepared = self.prepare(root, true)?;
                let mut lines = prepared.pre;
                if let Tree::Call { callee, args } = &prepared.tree.node {
                    match self.classify_call(callee)? {
                        command::CallKind::Command { family, name } => {
                            let (line, _) = self.compile_command_call(
                                prepared.tree.span,
                                family.as_deref(),
                                &name,
                                args,
                            )?;
                            lines.push(line);
                        }
                        command::CallKind::Host => {
                            lines.extend(self.compile_host_call_statement(&prepared.tree)?);
                        }
                    }
                }
                lines.extend(prepared.post);
                Ok(lines)
            }
            Tree::If { cond, then_block, else_block } => {
                self.compile_if(cond, then_block, else_block.as_deref())
            }
            Tree::While { cond, body } => self.compile_while(cond, body),
            _ => Err(CompileError::unexpected(
                "statement has no effect",
                root.span,
            )),
        }
    }
}
