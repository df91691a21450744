use std::rc::Rc;

use crate::error::{EvalResult, RuntimeError};
use crate::expr::Expr;
use crate::op::BinOp;
use crate::scope::ScopeRef;
use crate::util::fast_map::fast_hash_map_with_capacity;
use crate::val::{BoundMethod, ObjectValue, Val, methods::find_method_for_val};

use super::{Interp, ensure_sufficient_stack};

impl Interp {
    pub(crate) fn eval_expr(&mut self, expr: &Expr, scope: &ScopeRef) -> EvalResult {
        self.poll_interrupt()?;
        ensure_sufficient_stack(|| self.eval_expr_inner(expr, scope))
    }

    fn eval_expr_inner(&mut self, expr: &Expr, scope: &ScopeRef) -> EvalResult {
        match expr {
            Expr::Lit(value) => Ok(value.clone()),
            Expr::List(items) => {
                // elements resolve left to right into the builder
                let mut out = Vec::with_capacity(items.len());
                for item in items {
                    out.push(self.eval_expr(item, scope)?);
                }
                Ok(Val::list(out))
            }
            Expr::Object(fields) => {
                let mut map = fast_hash_map_with_capacity(fields.len());
                for (name, value) in fields {
                    let value = self.eval_expr(value, scope)?;
                    map.insert(Rc::<str>::from(name.as_str()), value);
                }
                Ok(Val::Object(Rc::new(ObjectValue::new(map))))
            }
            Expr::Fn { params, body, name } => Ok(Val::closure(
                params.clone(),
                body.clone(),
                scope.clone(),
                name.clone(),
            )),
            Expr::Var(name) => scope.get(name),
            Expr::Unary(op, operand) => {
                let value = self.eval_expr(operand, scope)?;
                op.eval_val(&value)
            }
            Expr::Bin(left, op, right) if op.is_logic() => {
                self.eval_logic(left, *op, right, scope)
            }
            Expr::Bin(left, op, right) => {
                let left = self.eval_expr(left, scope)?;
                let right = self.eval_expr(right, scope)?;
                self.binary_op(&left, *op, &right)
            }
            Expr::Field(recv, name) => {
                let recv = self.eval_expr(recv, scope)?;
                self.field_access(&recv, name)
            }
            Expr::Index(recv, index) => {
                let recv = self.eval_expr(recv, scope)?;
                let index = self.eval_expr(index, scope)?;
                recv.index(&index)
            }
            Expr::Call(callee, args) => {
                let callee = self.eval_expr(callee, scope)?;
                let mut argv = Vec::with_capacity(args.len());
                for arg in args {
                    argv.push(self.eval_expr(arg, scope)?);
                }
                self.call_value(&callee, argv)
            }
        }
    }

    /// `&&`/`||`: when the left operand alone decides the result, the
    /// right operand is never evaluated.
    fn eval_logic(&mut self, left: &Expr, op: BinOp, right: &Expr, scope: &ScopeRef) -> EvalResult {
        let left = self.eval_expr(left, scope)?;
        let decided = logic_operand(&left, op)?;
        match (op, decided) {
            (BinOp::And, false) => Ok(Val::Bool(false)),
            (BinOp::Or, true) => Ok(Val::Bool(true)),
            _ => {
                let right = self.eval_expr(right, scope)?;
                Ok(Val::Bool(logic_operand(&right, op)?))
            }
        }
    }

    /// Uniform field-lookup-then-call dispatch: object fields shadow
    /// builtin methods; strings and lists only have builtin methods.
    fn field_access(&mut self, recv: &Val, name: &str) -> EvalResult {
        if let Some(value) = recv.get_field(name) {
            return Ok(value);
        }
        if let Some(func) = find_method_for_val(recv, name) {
            return Ok(Val::Method(Rc::new(BoundMethod {
                recv: recv.clone(),
                func,
                name: Rc::from(name),
            })));
        }
        Err(RuntimeError::field_not_found(recv.type_name(), name))
    }
}

fn logic_operand(value: &Val, op: BinOp) -> EvalResult<bool> {
    value.as_bool().ok_or_else(|| {
        RuntimeError::unsupported_op(format!(
            "operands of {op} must be Bool, got {}",
            value.type_name()
        ))
    })
}
