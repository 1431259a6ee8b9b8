use crate::catalog::host;
use crate::diagnostics::CompileError;
use crate::parser::Tree;
use crate::span::Spanned;

use super::expression::Usage;
use super::types::Value;
use super::Compiler;

impl Compiler<'_> {
    /// `if` lowers to a conditional jump past the body, with an extra
    /// unconditional jump when an else branch exists.
    pub(crate) fn compile_if(
        &mut self,
        cond: &Spanned<Tree>,
        then_block: &Spanned<Tree>,
        else_block: Option<&Spanned<Tree>>,
    ) -> Result<Vec<String>, CompileError> {
        let (mut lines, cond_text, post) = self.compile_condition(cond)?;
        match else_block {
            None => {
                let end = self.scope.next_label("ifend");
                lines.push(format!("jump label ➜{end} if {cond_text}"));
                lines.extend(post);
                lines.extend(self.compile_block(then_block)?);
                lines.push(format!("➜{end}"));
            }
            Some(alt) => {
                let alt_label = self.scope.next_label("ifelse");
                let end = self.scope.next_label("ifend");
                lines.push(format!("jump label ➜{alt_label} if {cond_text}"));
                lines.extend(post);
                lines.extend(self.compile_block(then_block)?);
                lines.push(format!("jump label ➜{end}"));
                lines.push(format!("➜{alt_label}"));
                lines.extend(self.compile_block(alt)?);
                lines.push(format!("➜{end}"));
            }
        }
        Ok(lines)
    }

    /// `while` re-evaluates its condition each pass, so any lines the
    /// condition needs sit inside the loop, after the entry label.
    pub(crate) fn compile_while(
        &mut self,
        cond: &Spanned<Tree>,
        body: &Spanned<Tree>,
    ) -> Result<Vec<String>, CompileError> {
        let start = self.scope.next_label("while");
        let end = self.scope.next_label("whileend");
        let (pre, cond_text, post) = self.compile_condition(cond)?;

        let mut lines = vec![format!("➜{start}")];
        lines.extend(pre);
        lines.push(format!("jump label ➜{end} if {cond_text}"));
        lines.extend(post);
        lines.extend(self.compile_block(body)?);
        lines.push(format!("jump label ➜{start}"));
        lines.push(format!("➜{end}"));
        Ok(lines)
    }

    fn compile_condition(
        &mut self,
        cond: &Spanned<Tree>,
    ) -> Result<(Vec<String>, String, Vec<String>), CompileError> {
        let prepared = self.prepare(cond, false)?;
        let ev = self.eval(&prepared.tree, Usage::Read)?;
        if !ev.value.converts_to(host::BOOL, self.host) {
            return Err(CompileError::ImplicitConversion {
                from: ev.value.describe(self.host),
                to: "bool".into(),
                span: cond.span,
            });
        }
        let text = self.wrapped(&prepared.tree, ev.needs_native());
        Ok((prepared.pre, text, prepared.post))
    }

    /// Compile the statements of a claimed block. An `if` in else
    /// position arrives here directly instead of wrapped in a block.
    pub(crate) fn compile_block(
        &mut self,
        block: &Spanned<Tree>,
    ) -> Result<Vec<String>, CompileError> {
        match &block.node {
            Tree::Block(stmts) => {
                let mut lines = Vec::new();
                for stmt in stmts {
                    lines.extend(self.compile_root(stmt)?);
                }
                Ok(lines)
            }
            _ => self.compile_root(block),
        }
    }
}
