use crate::error::{ErrorKind, EvalResult, RuntimeError};
use crate::expr::Expr;
use crate::scope::{Scope, ScopeRef};
use crate::stmt::{AssignTarget, CatchClause, Stmt};
use crate::val::Val;

use super::{Interp, ensure_sufficient_stack};

impl Interp {
    pub(crate) fn exec_stmt(&mut self, stmt: &Stmt, scope: &ScopeRef) -> EvalResult<()> {
        self.poll_interrupt()?;
        ensure_sufficient_stack(|| self.exec_stmt_inner(stmt, scope))
    }

    fn exec_stmt_inner(&mut self, stmt: &Stmt, scope: &ScopeRef) -> EvalResult<()> {
        match stmt {
            Stmt::Var { name, init } => {
                let value = match init {
                    Some(init) => self.eval_expr(init, scope)?,
                    None => Val::Nil,
                };
                scope.declare(name, value)
            }
            Stmt::Assign { target, value } => self.exec_assign(target, value, scope),
            Stmt::If {
                condition,
                then_stmt,
                else_stmt,
            } => {
                if self.eval_condition(condition, scope)? {
                    self.exec_stmt(then_stmt, scope)
                } else if let Some(else_stmt) = else_stmt {
                    self.exec_stmt(else_stmt, scope)
                } else {
                    Ok(())
                }
            }
            Stmt::While { condition, body } => self.exec_while(condition, body, scope),
            Stmt::For {
                init,
                condition,
                update,
                body,
            } => self.exec_for(
                init.as_deref(),
                condition.as_deref(),
                update.as_deref(),
                body,
                scope,
            ),
            Stmt::Block(stmts) => {
                let frame = Scope::child(scope);
                for stmt in stmts {
                    self.exec_stmt(stmt, &frame)?;
                }
                Ok(())
            }
            Stmt::Break => Err(RuntimeError::brk()),
            Stmt::Continue => Err(RuntimeError::cont()),
            Stmt::Return { value } => {
                let value = match value {
                    Some(value) => self.eval_expr(value, scope)?,
                    None => Val::Nil,
                };
                Err(RuntimeError::ret(value))
            }
            Stmt::Try { body, catch, finally } => {
                self.exec_try(body, catch.as_ref(), finally.as_deref(), scope)
            }
            Stmt::Throw { value } => {
                let value = self.eval_expr(value, scope)?;
                Err(RuntimeError::thrown(value))
            }
            Stmt::Expr(expr) => {
                self.eval_expr(expr, scope)?;
                Ok(())
            }
        }
    }

    /// Loop and branch conditions must resolve to Bool.
    fn eval_condition(&mut self, condition: &Expr, scope: &ScopeRef) -> EvalResult<bool> {
        let value = self.eval_expr(condition, scope)?;
        value.as_bool().ok_or_else(|| {
            RuntimeError::unsupported_op(format!(
                "condition must be Bool, got {}",
                value.type_name()
            ))
        })
    }

    fn exec_assign(&mut self, target: &AssignTarget, value: &Expr, scope: &ScopeRef) -> EvalResult<()> {
        match target {
            AssignTarget::Var(name) => {
                let value = self.eval_expr(value, scope)?;
                scope.set(name, value)
            }
            AssignTarget::Field(recv, name) => {
                let recv = self.eval_expr(recv, scope)?;
                let value = self.eval_expr(value, scope)?;
                recv.set_field(name, value)
            }
            AssignTarget::Index(recv, index) => {
                let recv = self.eval_expr(recv, scope)?;
                let index = self.eval_expr(index, scope)?;
                let value = self.eval_expr(value, scope)?;
                recv.set_index(&index, value)
            }
        }
    }

    fn exec_while(&mut self, condition: &Expr, body: &Stmt, scope: &ScopeRef) -> EvalResult<()> {
        loop {
            if !self.eval_condition(condition, scope)? {
                return Ok(());
            }
            // fresh frame per iteration: body declarations do not leak
            let frame = Scope::child(scope);
            match self.exec_stmt(body, &frame) {
                Ok(()) => {}
                Err(err) => match err.kind {
                    ErrorKind::Break => return Ok(()),
                    ErrorKind::Continue => {}
                    _ => return Err(err),
                },
            }
        }
    }

    fn exec_for(
        &mut self,
        init: Option<&Stmt>,
        condition: Option<&Expr>,
        update: Option<&Stmt>,
        body: &Stmt,
        scope: &ScopeRef,
    ) -> EvalResult<()> {
        // header frame holds the induction variable for cond/update/body
        let header = Scope::child(scope);
        if let Some(init) = init {
            self.exec_stmt(init, &header)?;
        }
        loop {
            let keep_going = match condition {
                Some(condition) => self.eval_condition(condition, &header)?,
                None => true,
            };
            if !keep_going {
                return Ok(());
            }
            let frame = Scope::child(&header);
            match self.exec_stmt(body, &frame) {
                Ok(()) => {}
                Err(err) => match err.kind {
                    ErrorKind::Break => return Ok(()),
                    // continue still runs the update step below
                    ErrorKind::Continue => {}
                    _ => return Err(err),
                },
            }
            if let Some(update) = update {
                self.exec_stmt(update, &header)?;
            }
        }
    }

    fn exec_try(
        &mut self,
        body: &Stmt,
        catch: Option<&CatchClause>,
        finally: Option<&Stmt>,
        scope: &ScopeRef,
    ) -> EvalResult<()> {
        let result = match self.exec_stmt(body, scope) {
            Err(err) if err.is_catchable() => match catch {
                Some(clause) => {
                    let frame = Scope::child(scope);
                    frame.declare(&clause.name, err.into_catch_value())?;
                    self.exec_stmt(&clause.body, &frame)
                }
                None => Err(err),
            },
            other => other,
        };
        // finally runs exactly once on every exit path; an abrupt
        // completion inside it replaces the pending one
        match finally {
            Some(finally) => match self.exec_stmt(finally, scope) {
                Ok(()) => result,
                Err(err) => Err(err),
            },
            None => result,
        }
    }
}
