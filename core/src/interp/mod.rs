//! The tree-walking evaluator.
//!
//! `Interp` owns all per-run bookkeeping (call depth, interrupt flag,
//! diagnostic frame names) as an explicit context object, so concurrent
//! runs in one host just use separate `Interp` instances. Control flow
//! (`break`/`continue`/`return`/`throw`) travels the error channel as
//! typed signals and is consumed by the matching construct; whatever
//! escapes the run is converted to the structural error it represents.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tracing::debug;

use crate::error::{ErrorKind, EvalResult, RuntimeError};
use crate::scope::ScopeRef;
use crate::stmt::Program;
use crate::val::Val;

mod call;
mod exec;
mod expr;

#[cfg(test)]
pub(crate) mod test_support;

/// Default per-run call-depth budget.
pub const DEFAULT_MAX_CALL_DEPTH: usize = 100_000;

// Stack-growth guard: when less than RED_ZONE of native stack remains,
// allocate another STACK_CHUNK before recursing. Handles both deep script
// recursion and deep host-supplied ASTs.
const RED_ZONE: usize = 100 * 1024;
const STACK_CHUNK: usize = 1024 * 1024;

#[inline]
pub(crate) fn ensure_sufficient_stack<R>(f: impl FnOnce() -> R) -> R {
    stacker::maybe_grow(RED_ZONE, STACK_CHUNK, f)
}

/// Cooperative cancellation flag for one interpreter. Cloneable and
/// shareable with a watchdog thread; the evaluator polls it on every
/// statement and expression step.
#[derive(Clone, Debug)]
pub struct InterruptHandle(Arc<AtomicBool>);

impl InterruptHandle {
    /// Ask the run to stop at the next evaluation step.
    pub fn interrupt(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Re-arm the interpreter for another run.
    pub fn clear(&self) {
        self.0.store(false, Ordering::Relaxed);
    }

    pub fn is_interrupted(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Evaluator with its per-run state.
pub struct Interp {
    max_call_depth: usize,
    pub(crate) call_depth: usize,
    /// Display names of active script calls, outermost first.
    pub(crate) frames: Vec<String>,
    interrupt: Arc<AtomicBool>,
}

impl Default for Interp {
    fn default() -> Self {
        Self::new()
    }
}

impl Interp {
    pub fn new() -> Self {
        Self {
            max_call_depth: DEFAULT_MAX_CALL_DEPTH,
            call_depth: 0,
            frames: Vec::new(),
            interrupt: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Lower (or raise) the call-depth budget. Mostly useful for hosts
    /// sandboxing untrusted scripts tighter than the default.
    pub fn with_max_call_depth(mut self, depth: usize) -> Self {
        self.max_call_depth = depth;
        self
    }

    pub fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle(self.interrupt.clone())
    }

    /// Run a program against a host-prepared scope. The scope's root frame
    /// is used directly, so top-level declarations stay visible to the
    /// host afterwards. Completes with `Nil`, an uncaught-exception error,
    /// or whatever fatal error ended the run.
    pub fn execute(&mut self, program: &Program, scope: &ScopeRef) -> EvalResult {
        debug!(statements = program.statements.len(), "executing program");
        self.run_program(program, scope)
    }

    pub(crate) fn run_program(&mut self, program: &Program, scope: &ScopeRef) -> EvalResult {
        for stmt in &program.statements {
            self.exec_stmt(stmt, scope).map_err(escalate)?;
        }
        Ok(Val::Nil)
    }

    #[inline]
    pub(crate) fn poll_interrupt(&self) -> EvalResult<()> {
        if self.interrupt.load(Ordering::Relaxed) {
            Err(RuntimeError::interrupted())
        } else {
            Ok(())
        }
    }

    pub(crate) fn max_call_depth(&self) -> usize {
        self.max_call_depth
    }
}

/// A control-flow signal that escaped the whole run is a structural error.
fn escalate(err: RuntimeError) -> RuntimeError {
    match err.kind {
        ErrorKind::Break => RuntimeError::break_outside_loop(),
        ErrorKind::Continue => RuntimeError::continue_outside_loop(),
        ErrorKind::Return(_) => RuntimeError::return_outside_function(),
        ErrorKind::Thrown(value) => RuntimeError::uncaught_exception(*value),
        _ => err,
    }
}
