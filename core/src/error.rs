use std::fmt;

use crate::val::Val;

/// Result of evaluating a statement or expression.
pub type EvalResult<T = Val> = Result<T, RuntimeError>;

/// Kinds of runtime errors.
///
/// `Break`/`Continue`/`Return`/`Thrown` are not real errors but control-flow
/// signals riding the error channel; they are consumed by the loop, call and
/// `try` handlers and never reach the host (`Interp` converts any survivor
/// into the matching structural error at the top of a run).
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorKind {
    /// Name not found in any scope frame
    UndefinedVariable,
    /// Name already declared in the current scope frame
    DuplicateDeclaration,
    /// `break` with no enclosing loop in the current function
    BreakOutsideLoop,
    /// `continue` with no enclosing loop in the current function
    ContinueOutsideLoop,
    /// `return` at top level
    ReturnOutsideFunction,
    /// Operator not defined for the operand tags
    UnsupportedOperation,
    /// Field access on a value that has no such field or method
    FieldNotFound,
    /// Subscript with a non-integer index
    InvalidSubscript,
    /// Subscript on a receiver that is not a list or string
    SubscriptUnsupported,
    /// Subscript outside the receiver's bounds
    IndexOutOfBounds,
    /// Call on a value that is not callable
    NotCallable,
    /// Integer division or modulo by zero
    DivisionByZero,
    /// A builtin function failed with a host error
    NativeError,
    /// A thrown value reached the top of the run uncaught
    UncaughtException(Box<Val>),
    /// The host raised the interrupt flag
    Interrupted,
    /// The per-run call-depth budget was exhausted
    RecursionLimit,
    /// Control flow: break out of the innermost loop
    Break,
    /// Control flow: skip to the next loop iteration
    Continue,
    /// Control flow: early return carrying the function result
    Return(Box<Val>),
    /// Control flow: a thrown value looking for its `catch`
    Thrown(Box<Val>),
}

/// Runtime error surfaced by the evaluator.
///
/// `frames` collects the display names of the script calls that were active
/// when a fatal error was raised, innermost first.
#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeError {
    pub kind: ErrorKind,
    pub message: String,
    pub frames: Vec<String>,
}

impl RuntimeError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            frames: Vec::new(),
        }
    }

    pub fn undefined_variable(name: &str) -> Self {
        Self::new(ErrorKind::UndefinedVariable, format!("undefined variable: {name}"))
    }

    pub fn duplicate_declaration(name: &str) -> Self {
        Self::new(
            ErrorKind::DuplicateDeclaration,
            format!("'{name}' is already declared in this scope"),
        )
    }

    pub fn break_outside_loop() -> Self {
        Self::new(ErrorKind::BreakOutsideLoop, "break outside of a loop")
    }

    pub fn continue_outside_loop() -> Self {
        Self::new(ErrorKind::ContinueOutsideLoop, "continue outside of a loop")
    }

    pub fn return_outside_function() -> Self {
        Self::new(ErrorKind::ReturnOutsideFunction, "return outside of a function")
    }

    pub fn unsupported_op(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::UnsupportedOperation, message)
    }

    pub fn field_not_found(type_name: &str, field: &str) -> Self {
        Self::new(ErrorKind::FieldNotFound, format!("no field '{field}' on {type_name}"))
    }

    pub fn invalid_subscript(type_name: &str) -> Self {
        Self::new(
            ErrorKind::InvalidSubscript,
            format!("subscript index must be Int, got {type_name}"),
        )
    }

    pub fn subscript_unsupported(type_name: &str) -> Self {
        Self::new(
            ErrorKind::SubscriptUnsupported,
            format!("{type_name} does not support subscripting"),
        )
    }

    pub fn index_out_of_bounds(index: i64, len: usize) -> Self {
        Self::new(
            ErrorKind::IndexOutOfBounds,
            format!("index {index} out of bounds (len {len})"),
        )
    }

    pub fn not_callable(type_name: &str) -> Self {
        Self::new(ErrorKind::NotCallable, format!("{type_name} is not callable"))
    }

    pub fn division_by_zero() -> Self {
        Self::new(ErrorKind::DivisionByZero, "integer division or modulo by zero")
    }

    pub fn native(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NativeError, message)
    }

    pub fn uncaught_exception(value: Val) -> Self {
        let message = format!("uncaught exception: {value}");
        Self::new(ErrorKind::UncaughtException(Box::new(value)), message)
    }

    pub fn interrupted() -> Self {
        Self::new(ErrorKind::Interrupted, "execution interrupted by host")
    }

    pub fn recursion_limit(limit: usize) -> Self {
        Self::new(ErrorKind::RecursionLimit, format!("call depth limit of {limit} exceeded"))
    }

    pub fn brk() -> Self {
        Self::new(ErrorKind::Break, "break")
    }

    pub fn cont() -> Self {
        Self::new(ErrorKind::Continue, "continue")
    }

    pub fn ret(value: Val) -> Self {
        Self::new(ErrorKind::Return(Box::new(value)), "return")
    }

    pub fn thrown(value: Val) -> Self {
        let message = format!("uncaught exception: {value}");
        Self::new(ErrorKind::Thrown(Box::new(value)), message)
    }

    /// True when a script `try` may consume this error: user throws and
    /// type errors. Structural misuse, interrupts and the recursion limit
    /// always escalate to the host.
    pub fn is_catchable(&self) -> bool {
        matches!(
            self.kind,
            ErrorKind::Thrown(_)
                | ErrorKind::UnsupportedOperation
                | ErrorKind::FieldNotFound
                | ErrorKind::InvalidSubscript
                | ErrorKind::SubscriptUnsupported
                | ErrorKind::IndexOutOfBounds
                | ErrorKind::NotCallable
                | ErrorKind::DivisionByZero
                | ErrorKind::NativeError
        )
    }

    /// The value the catch variable binds to: the thrown value itself for a
    /// user `throw`, the error message as a string for a type error.
    pub fn into_catch_value(self) -> Val {
        match self.kind {
            ErrorKind::Thrown(v) => *v,
            _ => Val::from(self.message),
        }
    }

    /// Record a script call frame the error unwound through.
    pub fn with_frame(mut self, name: &str) -> Self {
        self.frames.push(name.to_string());
        self
    }

    /// Tag an error with the module it was raised in.
    pub fn in_module(mut self, name: &str) -> Self {
        self.message = format!("module '{name}': {}", self.message);
        self
    }
}

impl fmt::Display for RuntimeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        if !self.frames.is_empty() {
            write!(f, " (in {})", self.frames.join(" < "))?;
        }
        Ok(())
    }
}

impl std::error::Error for RuntimeError {}

/// Builtins are free to use `anyhow` internally; anything they propagate
/// surfaces as a catchable native error.
impl From<anyhow::Error> for RuntimeError {
    fn from(err: anyhow::Error) -> Self {
        RuntimeError::native(format!("{err:#}"))
    }
}
