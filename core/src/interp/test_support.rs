//! AST builders and run helpers shared by the evaluator tests. The parser
//! is a separate component, so tests assemble the trees it would produce.

use std::rc::Rc;

use crate::error::EvalResult;
use crate::expr::Expr;
use crate::interp::Interp;
use crate::op::{BinOp, UnaryOp};
use crate::scope::{Scope, ScopeRef};
use crate::stmt::{AssignTarget, CatchClause, Program, Stmt};
use crate::val::Val;

pub(crate) fn lit(value: impl Into<Val>) -> Expr {
    Expr::Lit(value.into())
}

pub(crate) fn nil() -> Expr {
    Expr::Lit(Val::Nil)
}

pub(crate) fn var(name: &str) -> Expr {
    Expr::Var(name.to_string())
}

pub(crate) fn bin(left: Expr, op: BinOp, right: Expr) -> Expr {
    Expr::Bin(Box::new(left), op, Box::new(right))
}

pub(crate) fn unary(op: UnaryOp, operand: Expr) -> Expr {
    Expr::Unary(op, Box::new(operand))
}

pub(crate) fn field(recv: Expr, name: &str) -> Expr {
    Expr::Field(Box::new(recv), name.to_string())
}

pub(crate) fn index(recv: Expr, idx: Expr) -> Expr {
    Expr::Index(Box::new(recv), Box::new(idx))
}

pub(crate) fn call(callee: Expr, args: Vec<Expr>) -> Expr {
    Expr::Call(Box::new(callee), args)
}

pub(crate) fn list(items: Vec<Expr>) -> Expr {
    Expr::List(items)
}

pub(crate) fn object(fields: Vec<(&str, Expr)>) -> Expr {
    Expr::Object(fields.into_iter().map(|(k, v)| (k.to_string(), v)).collect())
}

pub(crate) fn fn_lit(params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Fn {
        params: params.iter().map(|p| p.to_string()).collect(),
        body: Rc::new(Stmt::Block(body)),
        name: None,
    }
}

pub(crate) fn named_fn(name: &str, params: &[&str], body: Vec<Stmt>) -> Expr {
    Expr::Fn {
        params: params.iter().map(|p| p.to_string()).collect(),
        body: Rc::new(Stmt::Block(body)),
        name: Some(name.to_string()),
    }
}

pub(crate) fn declare(name: &str, init: Expr) -> Stmt {
    Stmt::Var {
        name: name.to_string(),
        init: Some(Box::new(init)),
    }
}

pub(crate) fn declare_nil(name: &str) -> Stmt {
    Stmt::Var {
        name: name.to_string(),
        init: None,
    }
}

pub(crate) fn assign(name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        target: AssignTarget::Var(name.to_string()),
        value: Box::new(value),
    }
}

pub(crate) fn assign_field(recv: Expr, name: &str, value: Expr) -> Stmt {
    Stmt::Assign {
        target: AssignTarget::Field(Box::new(recv), name.to_string()),
        value: Box::new(value),
    }
}

pub(crate) fn assign_index(recv: Expr, idx: Expr, value: Expr) -> Stmt {
    Stmt::Assign {
        target: AssignTarget::Index(Box::new(recv), Box::new(idx)),
        value: Box::new(value),
    }
}

/// name = name + 1;
pub(crate) fn incr(name: &str) -> Stmt {
    assign(name, bin(var(name), BinOp::Add, lit(1)))
}

pub(crate) fn block(stmts: Vec<Stmt>) -> Stmt {
    Stmt::Block(stmts)
}

pub(crate) fn expr_stmt(expr: Expr) -> Stmt {
    Stmt::Expr(Box::new(expr))
}

pub(crate) fn ret(value: Expr) -> Stmt {
    Stmt::Return {
        value: Some(Box::new(value)),
    }
}

pub(crate) fn ret_nil() -> Stmt {
    Stmt::Return { value: None }
}

pub(crate) fn iff(condition: Expr, then_stmt: Stmt) -> Stmt {
    Stmt::If {
        condition: Box::new(condition),
        then_stmt: Box::new(then_stmt),
        else_stmt: None,
    }
}

pub(crate) fn if_else(condition: Expr, then_stmt: Stmt, else_stmt: Stmt) -> Stmt {
    Stmt::If {
        condition: Box::new(condition),
        then_stmt: Box::new(then_stmt),
        else_stmt: Some(Box::new(else_stmt)),
    }
}

pub(crate) fn while_loop(condition: Expr, body: Vec<Stmt>) -> Stmt {
    Stmt::While {
        condition: Box::new(condition),
        body: Box::new(Stmt::Block(body)),
    }
}

pub(crate) fn for_loop(init: Stmt, condition: Expr, update: Stmt, body: Vec<Stmt>) -> Stmt {
    Stmt::For {
        init: Some(Box::new(init)),
        condition: Some(Box::new(condition)),
        update: Some(Box::new(update)),
        body: Box::new(Stmt::Block(body)),
    }
}

pub(crate) fn try_catch(body: Vec<Stmt>, name: &str, catch_body: Vec<Stmt>) -> Stmt {
    Stmt::Try {
        body: Box::new(Stmt::Block(body)),
        catch: Some(CatchClause {
            name: name.to_string(),
            body: Box::new(Stmt::Block(catch_body)),
        }),
        finally: None,
    }
}

pub(crate) fn try_catch_finally(
    body: Vec<Stmt>,
    name: &str,
    catch_body: Vec<Stmt>,
    finally: Vec<Stmt>,
) -> Stmt {
    Stmt::Try {
        body: Box::new(Stmt::Block(body)),
        catch: Some(CatchClause {
            name: name.to_string(),
            body: Box::new(Stmt::Block(catch_body)),
        }),
        finally: Some(Box::new(Stmt::Block(finally))),
    }
}

pub(crate) fn try_finally(body: Vec<Stmt>, finally: Vec<Stmt>) -> Stmt {
    Stmt::Try {
        body: Box::new(Stmt::Block(body)),
        catch: None,
        finally: Some(Box::new(Stmt::Block(finally))),
    }
}

pub(crate) fn throw(value: Expr) -> Stmt {
    Stmt::Throw {
        value: Box::new(value),
    }
}

/// Run statements against a fresh root scope.
pub(crate) fn run(stmts: Vec<Stmt>) -> EvalResult {
    run_in(stmts, &Scope::root())
}

pub(crate) fn run_in(stmts: Vec<Stmt>, scope: &ScopeRef) -> EvalResult {
    let mut interp = Interp::new();
    interp.execute(&Program::new(stmts), scope)
}

/// Run statements, then read a top-level variable out of the scope.
pub(crate) fn run_get(stmts: Vec<Stmt>, name: &str) -> EvalResult {
    let scope = Scope::root();
    run_in(stmts, &scope)?;
    scope.get(name)
}
