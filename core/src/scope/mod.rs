//! Lexical scope chain.
//!
//! A scope is one frame in a parent-linked chain of name → value maps.
//! Closures hold an `Rc` to the frame that was live at their creation, so
//! a frame stays alive exactly as long as the longest-lived closure (or
//! pending call) that can still see it. Chains are shared, not copied:
//! two closures created in the same frame alias the same bindings.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::{EvalResult, RuntimeError};
use crate::util::fast_map::{FastHashMap, fast_hash_map_new};
use crate::val::Val;


pub type ScopeRef = Rc<Scope>;

pub struct Scope {
    vars: RefCell<FastHashMap<String, Val>>,
    parent: Option<ScopeRef>,
}

impl Scope {
    /// Outermost frame of a run. The host declares its builtins here
    /// before handing the scope to the evaluator.
    pub fn root() -> ScopeRef {
        Rc::new(Scope {
            vars: RefCell::new(fast_hash_map_new()),
            parent: None,
        })
    }

    /// Fresh frame chained under `parent`.
    pub fn child(parent: &ScopeRef) -> ScopeRef {
        Rc::new(Scope {
            vars: RefCell::new(fast_hash_map_new()),
            parent: Some(parent.clone()),
        })
    }

    /// Bind a new name in this frame only. Shadowing an outer binding is
    /// fine; re-declaring within the same frame is not.
    pub fn declare(&self, name: &str, value: Val) -> EvalResult<()> {
        let mut vars = self.vars.borrow_mut();
        if vars.contains_key(name) {
            return Err(RuntimeError::duplicate_declaration(name));
        }
        vars.insert(name.to_string(), value);
        Ok(())
    }

    /// Read a name, searching outward from this frame.
    pub fn get(&self, name: &str) -> EvalResult {
        if let Some(value) = self.vars.borrow().get(name) {
            return Ok(value.clone());
        }
        let mut frame = self.parent.as_ref();
        while let Some(scope) = frame {
            if let Some(value) = scope.vars.borrow().get(name) {
                return Ok(value.clone());
            }
            frame = scope.parent.as_ref();
        }
        Err(RuntimeError::undefined_variable(name))
    }

    /// Overwrite the nearest existing binding of `name`.
    pub fn set(&self, name: &str, value: Val) -> EvalResult<()> {
        if let Some(slot) = self.vars.borrow_mut().get_mut(name) {
            *slot = value;
            return Ok(());
        }
        let mut frame = self.parent.as_ref();
        while let Some(scope) = frame {
            if let Some(slot) = scope.vars.borrow_mut().get_mut(name) {
                *slot = value;
                return Ok(());
            }
            frame = scope.parent.as_ref();
        }
        Err(RuntimeError::undefined_variable(name))
    }
}

// Scope chains are routinely cyclic through captured closures; print only
// this frame's names.
impl fmt::Debug for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let vars = self.vars.borrow();
        let mut names: Vec<_> = vars.keys().cloned().collect();
        names.sort();
        f.debug_struct("Scope")
            .field("names", &names)
            .field("has_parent", &self.parent.is_some())
            .finish()
    }
}
