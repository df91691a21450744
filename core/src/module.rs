//! Module execution.
//!
//! Import resolution, cycle detection and dependency ordering happen in
//! the host's loader; the evaluator receives the already-ordered module
//! list and runs each one against the top-level scope before the main
//! program, so later modules (and the program) see earlier modules'
//! top-level bindings.

use tracing::debug;

use crate::error::EvalResult;
use crate::interp::Interp;
use crate::scope::ScopeRef;
use crate::stmt::Program;

/// One imported source unit, already parsed and dependency-ordered.
#[derive(Debug, Clone, PartialEq)]
pub struct Module {
    pub name: String,
    pub program: Program,
}

impl Module {
    pub fn new(name: impl Into<String>, program: Program) -> Self {
        Self {
            name: name.into(),
            program,
        }
    }
}

impl Interp {
    /// Execute the modules in order, then the program body, all against
    /// the same top-level scope. The first failure aborts the run, tagged
    /// with the module it came from.
    pub fn execute_with_modules(
        &mut self,
        modules: &[Module],
        program: &Program,
        scope: &ScopeRef,
    ) -> EvalResult {
        for module in modules {
            debug!(module = %module.name, "loading module");
            self.run_program(&module.program, scope)
                .map_err(|err| err.in_module(&module.name))?;
        }
        self.execute(program, scope)
    }
}

#[cfg(test)]
mod tests {
    use super::Module;
    use crate::error::ErrorKind;
    use crate::interp::Interp;
    use crate::interp::test_support::*;
    use crate::op::BinOp;
    use crate::scope::Scope;
    use crate::stmt::{Program, Stmt};
    use crate::val::Val;

    fn run_with_modules(modules: &[Module], stmts: Vec<Stmt>) -> (crate::error::EvalResult, crate::scope::ScopeRef) {
        let mut interp = Interp::new();
        let scope = Scope::root();
        let result = interp.execute_with_modules(modules, &Program::new(stmts), &scope);
        (result, scope)
    }

    #[test]
    fn modules_run_in_order_against_the_top_scope() {
        let modules = [
            Module::new("base", Program::new(vec![declare("base", lit(1))])),
            // later modules see earlier bindings
            Module::new(
                "derived",
                Program::new(vec![declare("derived", bin(var("base"), BinOp::Add, lit(1)))]),
            ),
        ];
        let (result, scope) = run_with_modules(
            &modules,
            vec![declare("r", bin(var("derived"), BinOp::Add, lit(1)))],
        );
        result.unwrap();
        assert_eq!(scope.get("r").unwrap(), Val::Int(3));
    }

    #[test]
    fn programs_call_module_functions() {
        let modules = [Module::new(
            "lib",
            Program::new(vec![declare(
                "twice",
                named_fn("twice", &["n"], vec![ret(bin(var("n"), BinOp::Mul, lit(2)))]),
            )]),
        )];
        let (result, scope) =
            run_with_modules(&modules, vec![declare("r", call(var("twice"), vec![lit(21)]))]);
        result.unwrap();
        assert_eq!(scope.get("r").unwrap(), Val::Int(42));
    }

    #[test]
    fn failing_module_aborts_and_is_named() {
        let modules = [
            Module::new("bad", Program::new(vec![expr_stmt(var("missing"))])),
            Module::new("after", Program::new(vec![declare("late", lit(1))])),
        ];
        let (result, scope) = run_with_modules(&modules, vec![]);
        let err = result.unwrap_err();
        assert_eq!(err.kind, ErrorKind::UndefinedVariable);
        assert!(err.message.contains("module 'bad'"), "{}", err.message);
        // nothing after the failing module ran
        assert!(scope.get("late").is_err());
    }

    #[test]
    fn module_top_level_signals_are_structural_errors() {
        let modules = [Module::new("odd", Program::new(vec![Stmt::Break]))];
        let (result, _) = run_with_modules(&modules, vec![]);
        assert_eq!(result.unwrap_err().kind, ErrorKind::BreakOutsideLoop);
    }
}
