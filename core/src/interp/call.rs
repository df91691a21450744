use std::rc::Rc;

use tracing::trace;

use crate::error::{ErrorKind, EvalResult, RuntimeError};
use crate::op::BinOp;
use crate::scope::Scope;
use crate::val::{ClosureValue, Val};

use super::Interp;

/// Reserved object field names checked before default operator dispatch.
fn meta_name(op: BinOp) -> Option<&'static str> {
    match op {
        BinOp::Eq | BinOp::Ne => Some("_equal"),
        BinOp::Add => Some("_add"),
        BinOp::Sub => Some("_sub"),
        BinOp::Mul => Some("_mul"),
        BinOp::Div => Some("_div"),
        _ => None,
    }
}

impl Interp {
    /// Binary operator with object overloading: a left operand exposing a
    /// callable reserved field handles the operation itself, as a
    /// one-argument call with the right operand.
    pub(crate) fn binary_op(&mut self, left: &Val, op: BinOp, right: &Val) -> EvalResult {
        if let Some(name) = meta_name(op) {
            if let Some(handler) = left.meta_method(name) {
                let result = self.call_value(&handler, vec![right.clone()])?;
                if op == BinOp::Ne {
                    let equal = result.as_bool().ok_or_else(|| {
                        RuntimeError::unsupported_op(format!(
                            "_equal must return Bool for {op}, got {}",
                            result.type_name()
                        ))
                    })?;
                    return Ok(Val::Bool(!equal));
                }
                return Ok(result);
            }
        }
        op.eval_vals(left, right)
    }

    /// Call any callable value with already-resolved arguments.
    pub fn call_value(&mut self, callee: &Val, args: Vec<Val>) -> EvalResult {
        match callee {
            Val::Closure(closure) => self.call_closure(closure, args),
            Val::RustFunction(func) => func(&args, self),
            Val::Method(method) => {
                let mut full = Vec::with_capacity(args.len() + 1);
                full.push(method.recv.clone());
                full.extend(args);
                (method.func)(&full, self)
            }
            other => Err(RuntimeError::not_callable(other.type_name())),
        }
    }

    fn call_closure(&mut self, closure: &Rc<ClosureValue>, args: Vec<Val>) -> EvalResult {
        if self.call_depth >= self.max_call_depth() {
            return Err(RuntimeError::recursion_limit(self.max_call_depth()));
        }
        self.call_depth += 1;
        self.frames.push(closure.display_name().to_string());
        trace!(name = closure.display_name(), depth = self.call_depth, "call");

        // parameters bind in a fresh child of the captured scope;
        // missing trailing arguments bind nil, surplus ones are dropped
        let scope = Scope::child(&closure.scope);
        let mut bound = Ok(());
        for (i, param) in closure.params.iter().enumerate() {
            let arg = args.get(i).cloned().unwrap_or(Val::Nil);
            if let Err(err) = scope.declare(param, arg) {
                bound = Err(err);
                break;
            }
        }
        let result = bound.and_then(|()| self.exec_stmt(&closure.body, &scope));

        self.call_depth -= 1;
        let out = match result {
            // falling off the end returns nil
            Ok(()) => Ok(Val::Nil),
            Err(err) => match err.kind {
                ErrorKind::Return(value) => Ok(*value),
                // loop signals never cross a call boundary
                ErrorKind::Break => Err(RuntimeError::break_outside_loop()),
                ErrorKind::Continue => Err(RuntimeError::continue_outside_loop()),
                ErrorKind::Thrown(_) => Err(err),
                _ => Err(err.with_frame(closure.display_name())),
            },
        };
        self.frames.pop();
        out
    }
}
