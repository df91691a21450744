use serde::{Deserialize, Serialize};

use crate::expr::Expr;

/// Assignment target, resolved by the parser. Anything else on the left
/// of `=` is a parse error upstream, so invalid targets are
/// unrepresentable here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum AssignTarget {
    /// name = value
    Var(String),
    /// expr.field = value
    Field(Box<Expr>, String),
    /// expr[index] = value
    Index(Box<Expr>, Box<Expr>),
}

/// `catch (name) body` clause of a try statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatchClause {
    pub name: String,
    pub body: Box<Stmt>,
}

/// Statement AST node.
///
/// Grammar (abridged):
/// program   ::= statement*
/// statement ::= var_stmt | assign_stmt | if_stmt | for_stmt | while_stmt
///             | block_stmt | break_stmt | continue_stmt | return_stmt
///             | try_stmt | throw_stmt | expr_stmt
/// var_stmt  ::= 'var' id ['=' expr] ';'
/// if_stmt   ::= 'if' '(' expr ')' statement ['else' statement]
/// for_stmt  ::= 'for' '(' [stmt] ';' [expr] ';' [stmt] ')' statement
/// while_stmt ::= 'while' '(' expr ')' statement
/// try_stmt  ::= 'try' block ['catch' '(' id ')' block] ['finally' block]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Stmt {
    /// var name [= init]; — missing initializer binds nil
    Var {
        name: String,
        init: Option<Box<Expr>>,
    },
    /// target = value;
    Assign {
        target: AssignTarget,
        value: Box<Expr>,
    },
    /// if (condition) then_stmt [else else_stmt]
    If {
        condition: Box<Expr>,
        then_stmt: Box<Stmt>,
        else_stmt: Option<Box<Stmt>>,
    },
    /// while (condition) body
    While {
        condition: Box<Expr>,
        body: Box<Stmt>,
    },
    /// for (init; condition; update) body — each header slot optional
    For {
        init: Option<Box<Stmt>>,
        condition: Option<Box<Expr>>,
        update: Option<Box<Stmt>>,
        body: Box<Stmt>,
    },
    /// { statement* } — runs in a fresh scope frame
    Block(Vec<Stmt>),
    /// break;
    Break,
    /// continue;
    Continue,
    /// return [expr];
    Return { value: Option<Box<Expr>> },
    /// try block [catch (name) block] [finally block]
    Try {
        body: Box<Stmt>,
        catch: Option<CatchClause>,
        finally: Option<Box<Stmt>>,
    },
    /// throw expr;
    Throw { value: Box<Expr> },
    /// expr; — evaluated for its side effects, result discarded
    Expr(Box<Expr>),
}

/// A parsed program: the statement list of one source unit.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Program {
    pub statements: Vec<Stmt>,
}

impl Program {
    pub fn new(statements: Vec<Stmt>) -> Self {
        Self { statements }
    }
}
