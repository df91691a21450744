use std::ops::{Add, Div, Mul, Rem, Sub};

use crate::error::{EvalResult, RuntimeError};
use crate::op::{BinOp, err_op};

use super::Val;

impl Add for &Val {
    type Output = EvalResult;

    /// - Str + Int/Float (and the reverse) concatenates the printed number.
    /// - List + List builds a new list; neither operand is mutated.
    #[inline]
    fn add(self, other: Self) -> Self::Output {
        match (self, other) {
            (Val::Int(a), Val::Int(b)) => Ok(Val::Int(a + b)),
            (Val::Float(a), Val::Float(b)) => Ok(Val::Float(a + b)),
            (Val::Float(a), Val::Int(b)) => Ok(Val::Float(a + *b as f64)),
            (Val::Int(a), Val::Float(b)) => Ok(Val::Float(*a as f64 + b)),
            (Val::Str(a), Val::Str(b)) => {
                if a.is_empty() {
                    return Ok(Val::Str(b.clone()));
                }
                if b.is_empty() {
                    return Ok(Val::Str(a.clone()));
                }
                Ok(Val::concat_strings(a.as_ref(), b.as_ref()))
            }
            (Val::Str(a), Val::Int(b)) => {
                let mut buf = itoa::Buffer::new();
                Ok(Val::concat_strings(a.as_ref(), buf.format(*b)))
            }
            (Val::Str(a), Val::Float(b)) => {
                let mut buf = ryu::Buffer::new();
                Ok(Val::concat_strings(a.as_ref(), buf.format(*b)))
            }
            (Val::Int(a), Val::Str(b)) => {
                let mut buf = itoa::Buffer::new();
                Ok(Val::concat_strings(buf.format(*a), b.as_ref()))
            }
            (Val::Float(a), Val::Str(b)) => {
                let mut buf = ryu::Buffer::new();
                Ok(Val::concat_strings(buf.format(*a), b.as_ref()))
            }
            (Val::List(l), Val::List(r)) => {
                let mut merged = Vec::with_capacity(l.borrow().len() + r.borrow().len());
                merged.extend(l.borrow().iter().cloned());
                merged.extend(r.borrow().iter().cloned());
                Ok(Val::list(merged))
            }
            _ => err_op(self, BinOp::Add, other),
        }
    }
}

impl Sub for &Val {
    type Output = EvalResult;

    #[inline]
    fn sub(self, other: Self) -> Self::Output {
        match (self, other) {
            (Val::Int(a), Val::Int(b)) => Ok(Val::Int(a - b)),
            (Val::Float(a), Val::Float(b)) => Ok(Val::Float(a - b)),
            (Val::Float(a), Val::Int(b)) => Ok(Val::Float(a - *b as f64)),
            (Val::Int(a), Val::Float(b)) => Ok(Val::Float(*a as f64 - b)),
            _ => err_op(self, BinOp::Sub, other),
        }
    }
}

impl Mul for &Val {
    type Output = EvalResult;

    #[inline]
    fn mul(self, other: Self) -> Self::Output {
        match (self, other) {
            (Val::Int(a), Val::Int(b)) => Ok(Val::Int(a * b)),
            (Val::Float(a), Val::Float(b)) => Ok(Val::Float(a * b)),
            (Val::Float(a), Val::Int(b)) => Ok(Val::Float(a * *b as f64)),
            (Val::Int(a), Val::Float(b)) => Ok(Val::Float(*a as f64 * b)),
            _ => err_op(self, BinOp::Mul, other),
        }
    }
}

impl Div for &Val {
    type Output = EvalResult;

    /// Int / Int stays Int when the division is exact, otherwise Float.
    #[inline]
    fn div(self, other: Self) -> Self::Output {
        match (self, other) {
            (Val::Int(_), Val::Int(0)) => Err(RuntimeError::division_by_zero()),
            (Val::Int(a), Val::Int(b)) => {
                let res = (*a as f64) / (*b as f64);
                if res.fract() == 0.0 {
                    Ok(Val::Int(res as i64))
                } else {
                    Ok(Val::Float(res))
                }
            }
            (Val::Float(a), Val::Float(b)) => Ok(Val::Float(a / b)),
            (Val::Float(a), Val::Int(b)) => Ok(Val::Float(a / *b as f64)),
            (Val::Int(a), Val::Float(b)) => Ok(Val::Float(*a as f64 / b)),
            _ => err_op(self, BinOp::Div, other),
        }
    }
}

impl Rem for &Val {
    type Output = EvalResult;

    #[inline]
    fn rem(self, other: Self) -> Self::Output {
        match (self, other) {
            (Val::Int(_), Val::Int(0)) => Err(RuntimeError::division_by_zero()),
            (Val::Int(a), Val::Int(b)) => Ok(Val::Int(a % b)),
            (Val::Float(a), Val::Float(b)) => Ok(Val::Float(a % b)),
            (Val::Float(a), Val::Int(b)) => Ok(Val::Float(a % *b as f64)),
            (Val::Int(a), Val::Float(b)) => Ok(Val::Float(*a as f64 % b)),
            _ => err_op(self, BinOp::Mod, other),
        }
    }
}
