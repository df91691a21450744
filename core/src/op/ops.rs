use core::cmp::Ordering;
use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::error::{EvalResult, RuntimeError};
use crate::val::Val;

pub(crate) fn err_op<T: Display, R>(l: &Val, op: T, r: &Val) -> EvalResult<R> {
    Err(RuntimeError::unsupported_op(format!(
        "invalid op: {} {op} {}",
        l.type_name(),
        r.type_name()
    )))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryOp {
    Not,
    Neg,
}

impl UnaryOp {
    pub(crate) fn eval_val(&self, val: &Val) -> EvalResult {
        match self {
            UnaryOp::Not => match val {
                Val::Bool(b) => Ok(Val::Bool(!b)),
                _ => Err(RuntimeError::unsupported_op(format!(
                    "invalid operand: !{}",
                    val.type_name()
                ))),
            },
            UnaryOp::Neg => match val {
                Val::Int(i) => Ok(Val::Int(-i)),
                Val::Float(f) => Ok(Val::Float(-f)),
                _ => Err(RuntimeError::unsupported_op(format!(
                    "invalid operand: -{}",
                    val.type_name()
                ))),
            },
        }
    }
}

impl Display for UnaryOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UnaryOp::Not => write!(f, "!"),
            UnaryOp::Neg => write!(f, "-"),
        }
    }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Mod,
    Eq,
    Ne,
    Gt,
    Lt,
    Ge,
    Le,
    And,
    Or,
}

impl BinOp {
    pub(crate) fn is_arith(&self) -> bool {
        matches!(self, BinOp::Add | BinOp::Sub | BinOp::Mul | BinOp::Div | BinOp::Mod)
    }

    pub(crate) fn is_cmp(&self) -> bool {
        matches!(
            self,
            BinOp::Eq | BinOp::Ne | BinOp::Gt | BinOp::Lt | BinOp::Ge | BinOp::Le
        )
    }

    /// The logic operators short-circuit and are dispatched by the
    /// evaluator before operands are resolved.
    pub(crate) fn is_logic(&self) -> bool {
        matches!(self, BinOp::And | BinOp::Or)
    }

    fn arith(&self, l: &Val, r: &Val) -> EvalResult {
        match self {
            BinOp::Add => l + r,
            BinOp::Sub => l - r,
            BinOp::Mul => l * r,
            BinOp::Div => l / r,
            BinOp::Mod => l % r,
            _ => err_op(l, self, r),
        }
    }

    pub(crate) fn cmp(&self, l: &Val, r: &Val) -> EvalResult<bool> {
        match self {
            BinOp::Eq => Ok(l == r),
            BinOp::Ne => Ok(l != r),
            _ => {
                let ord = match l.partial_cmp(r) {
                    Some(ord) => ord,
                    None => return err_op(l, self, r),
                };

                match self {
                    BinOp::Gt => Ok(ord == Ordering::Greater),
                    BinOp::Lt => Ok(ord == Ordering::Less),
                    BinOp::Ge => Ok(ord != Ordering::Less),
                    BinOp::Le => Ok(ord != Ordering::Greater),
                    _ => err_op(l, self, r),
                }
            }
        }
    }

    /// Apply the operator to two already-resolved operands.
    pub(crate) fn eval_vals(&self, l_val: &Val, r_val: &Val) -> EvalResult {
        if self.is_arith() {
            self.arith(l_val, r_val)
        } else if self.is_cmp() {
            Ok(Val::Bool(self.cmp(l_val, r_val)?))
        } else {
            err_op(l_val, self, r_val)
        }
    }
}

impl Display for BinOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BinOp::Add => write!(f, "+"),
            BinOp::Sub => write!(f, "-"),
            BinOp::Mul => write!(f, "*"),
            BinOp::Div => write!(f, "/"),
            BinOp::Mod => write!(f, "%"),
            BinOp::Eq => write!(f, "=="),
            BinOp::Ne => write!(f, "!="),
            BinOp::Gt => write!(f, ">"),
            BinOp::Lt => write!(f, "<"),
            BinOp::Ge => write!(f, ">="),
            BinOp::Le => write!(f, "<="),
            BinOp::And => write!(f, "&&"),
            BinOp::Or => write!(f, "||"),
        }
    }
}
