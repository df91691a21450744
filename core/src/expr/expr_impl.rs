use std::fmt::{self, Display};
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::op::{BinOp, UnaryOp};
use crate::stmt::Stmt;
use crate::val::Val;

/// Expression AST node.
///
/// The node set is closed: the evaluator handles each kind exactly once and
/// the parser (an external collaborator) produces nothing else. Children
/// arrive fully resolved; no name resolution happens past the scope chain.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Expr {
    /// Literal value produced by the parser (nil, bool, number, string)
    Lit(Val),
    /// [expr, expr, ...] — elements evaluate in declaration order
    List(Vec<Expr>),
    /// {name: expr, ...} — fields evaluate in declaration order
    Object(Vec<(String, Expr)>),
    /// Function literal; captures the live scope chain when evaluated.
    /// `name` is carried for call-frame diagnostics only.
    Fn {
        params: Vec<String>,
        body: Rc<Stmt>,
        name: Option<String>,
    },
    /// Variable reference
    Var(String),
    /// op expr
    Unary(UnaryOp, Box<Expr>),
    /// expr op expr — the logic ops short-circuit
    Bin(Box<Expr>, BinOp, Box<Expr>),
    /// expr.field
    Field(Box<Expr>, String),
    /// expr[expr]
    Index(Box<Expr>, Box<Expr>),
    /// expr(arg, ...)
    Call(Box<Expr>, Vec<Expr>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Lit(Val::Str(s)) => write!(f, "{:?}", s.as_ref()),
            Expr::Lit(v) => write!(f, "{v}"),
            Expr::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "]")
            }
            Expr::Object(fields) => {
                write!(f, "{{")?;
                for (i, (name, value)) in fields.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{name}: {value}")?;
                }
                write!(f, "}}")
            }
            Expr::Fn { params, .. } => {
                write!(f, "(")?;
                for (i, p) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{p}")?;
                }
                write!(f, ") => {{ ... }}")
            }
            Expr::Var(name) => write!(f, "{name}"),
            Expr::Unary(op, e) => write!(f, "{op}{e}"),
            Expr::Bin(l, op, r) => write!(f, "({l} {op} {r})"),
            Expr::Field(e, name) => write!(f, "{e}.{name}"),
            Expr::Index(e, idx) => write!(f, "{e}[{idx}]"),
            Expr::Call(callee, args) => {
                write!(f, "{callee}(")?;
                for (i, a) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{a}")?;
                }
                write!(f, ")")
            }
        }
    }
}
