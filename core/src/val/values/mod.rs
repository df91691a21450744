use std::{
    cell::RefCell,
    fmt::{self, Debug},
    rc::Rc,
};

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::error::{EvalResult, RuntimeError};
use crate::interp::Interp;
use crate::scope::ScopeRef;
use crate::stmt::Stmt;
use crate::util::fast_map::{FastHashMap, fast_hash_map_with_capacity};

mod convert;
mod ops;
mod types;

pub use types::Type;

/// Builtin function callable from scripts.
///
/// `args` are the resolved call arguments (for a bound method, the receiver
/// is `args[0]`). The interpreter handle allows re-entering the evaluator,
/// e.g. to invoke a script callback. A builtin either returns a value,
/// raises a script-visible exception with [`RuntimeError::thrown`], or
/// propagates a host error (anything convertible via `anyhow`), which
/// surfaces as a catchable native error.
pub type RustFunction = fn(args: &[Val], interp: &mut Interp) -> EvalResult;

/// Script function value: parameter list and body, closed over the scope
/// chain that was live where the literal was evaluated.
#[derive(Clone)]
pub struct ClosureValue {
    pub params: Vec<String>,
    pub body: Rc<Stmt>,
    pub scope: ScopeRef,
    name: Option<String>,
}

// Non-recursive Debug: the captured scope routinely forms cycles
// (a closure stored in a scope it captures), and printing it would
// recurse forever.
impl Debug for ClosureValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClosureValue")
            .field("name", &self.name.as_deref().unwrap_or("<fn>"))
            .field("params", &self.params)
            .field("body", &"<body>")
            .finish()
    }
}

impl ClosureValue {
    pub fn new(params: Vec<String>, body: Rc<Stmt>, scope: ScopeRef, name: Option<String>) -> Self {
        Self {
            params,
            body,
            scope,
            name,
        }
    }

    /// Name shown in call-frame diagnostics.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or("<fn>")
    }
}

/// Mutable string-keyed record. Shared by reference: every `Val` clone of
/// an object aliases the same fields.
#[derive(Debug, Default)]
pub struct ObjectValue {
    pub fields: RefCell<FastHashMap<Rc<str>, Val>>,
}

impl ObjectValue {
    pub fn new(fields: FastHashMap<Rc<str>, Val>) -> Self {
        Self {
            fields: RefCell::new(fields),
        }
    }
}

/// A builtin method already bound to its receiver, produced by field
/// lookup on a value (`"ab".len`, `list.push`). Calling it prepends the
/// receiver to the argument list.
pub struct BoundMethod {
    pub recv: Val,
    pub func: RustFunction,
    pub name: Rc<str>,
}

impl Debug for BoundMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BoundMethod")
            .field("name", &self.name)
            .field("recv", &self.recv.type_name())
            .finish()
    }
}

#[derive(Debug, Default, Clone)]
pub enum Val {
    /// UTF-8 string, wrapped in Rc<str> for cheap cloning
    Str(Rc<str>),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Ordered mutable list; clones alias the same storage
    List(Rc<RefCell<Vec<Val>>>),
    /// Mutable record; clones alias the same storage, equality is identity
    Object(Rc<ObjectValue>),
    /// Script function with captured environment; equality is identity
    Closure(Rc<ClosureValue>),
    /// Builtin function pointer
    RustFunction(RustFunction),
    /// Builtin method bound to its receiver
    Method(Rc<BoundMethod>),
    #[default]
    Nil,
}

impl Val {
    pub fn list(items: Vec<Val>) -> Val {
        Val::List(Rc::new(RefCell::new(items)))
    }

    pub fn object<K: Into<Rc<str>>>(fields: impl IntoIterator<Item = (K, Val)>) -> Val {
        let iter = fields.into_iter();
        let mut map = fast_hash_map_with_capacity(iter.size_hint().0);
        for (k, v) in iter {
            map.insert(k.into(), v);
        }
        Val::Object(Rc::new(ObjectValue::new(map)))
    }

    pub fn closure(params: Vec<String>, body: Rc<Stmt>, scope: ScopeRef, name: Option<String>) -> Val {
        Val::Closure(Rc::new(ClosureValue::new(params, body, scope, name)))
    }

    pub(crate) fn concat_strings(a: &str, b: &str) -> Val {
        let mut out = String::with_capacity(a.len() + b.len());
        out.push_str(a);
        out.push_str(b);
        Val::Str(Rc::from(out))
    }

    /// Static tag name used by every diagnostic.
    pub fn type_name(&self) -> &'static str {
        self.type_of().name()
    }

    pub fn type_of(&self) -> Type {
        match self {
            Val::Str(_) => Type::Str,
            Val::Int(_) => Type::Int,
            Val::Float(_) => Type::Float,
            Val::Bool(_) => Type::Bool,
            Val::List(_) => Type::List,
            Val::Object(_) => Type::Object,
            Val::Closure(_) | Val::RustFunction(_) | Val::Method(_) => Type::Function,
            Val::Nil => Type::Nil,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Val::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Val::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn is_callable(&self) -> bool {
        matches!(self, Val::Closure(_) | Val::RustFunction(_) | Val::Method(_))
    }

    /// Own field of an object. Builtin method lookup is layered on top by
    /// the evaluator.
    pub fn get_field(&self, name: &str) -> Option<Val> {
        match self {
            Val::Object(o) => o.fields.borrow().get(name).cloned(),
            _ => None,
        }
    }

    pub fn set_field(&self, name: &str, value: Val) -> EvalResult<()> {
        match self {
            Val::Object(o) => {
                o.fields.borrow_mut().insert(Rc::from(name), value);
                Ok(())
            }
            other => Err(RuntimeError::unsupported_op(format!(
                "cannot assign field '{name}' on {}",
                other.type_name()
            ))),
        }
    }

    /// Callable object field with a reserved operator name (`_add`, ...).
    pub fn meta_method(&self, name: &str) -> Option<Val> {
        match self {
            Val::Object(o) => o.fields.borrow().get(name).filter(|v| v.is_callable()).cloned(),
            _ => None,
        }
    }

    pub fn index(&self, idx: &Val) -> EvalResult {
        match self {
            Val::List(items) => {
                let Val::Int(i) = idx else {
                    return Err(RuntimeError::invalid_subscript(idx.type_name()));
                };
                let items = items.borrow();
                let pos = usize::try_from(*i)
                    .ok()
                    .filter(|p| *p < items.len())
                    .ok_or_else(|| RuntimeError::index_out_of_bounds(*i, items.len()))?;
                Ok(items[pos].clone())
            }
            Val::Str(s) => {
                let Val::Int(i) = idx else {
                    return Err(RuntimeError::invalid_subscript(idx.type_name()));
                };
                let count = s.chars().count();
                let pos = usize::try_from(*i)
                    .ok()
                    .filter(|p| *p < count)
                    .ok_or_else(|| RuntimeError::index_out_of_bounds(*i, count))?;
                let ch = s.chars().nth(pos).unwrap_or_default();
                Ok(Val::Str(Rc::from(ch.to_string())))
            }
            other => Err(RuntimeError::subscript_unsupported(other.type_name())),
        }
    }

    pub fn set_index(&self, idx: &Val, value: Val) -> EvalResult<()> {
        match self {
            Val::List(items) => {
                let Val::Int(i) = idx else {
                    return Err(RuntimeError::invalid_subscript(idx.type_name()));
                };
                let mut items = items.borrow_mut();
                let len = items.len();
                let pos = usize::try_from(*i)
                    .ok()
                    .filter(|p| *p < len)
                    .ok_or_else(|| RuntimeError::index_out_of_bounds(*i, len))?;
                items[pos] = value;
                Ok(())
            }
            other => Err(RuntimeError::subscript_unsupported(other.type_name())),
        }
    }
}

impl PartialEq for Val {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Val::Str(a), Val::Str(b)) => a == b,
            (Val::Int(a), Val::Int(b)) => a == b,
            (Val::Float(a), Val::Float(b)) => a == b,
            (Val::Int(a), Val::Float(b)) => (*a as f64) == *b,
            (Val::Float(a), Val::Int(b)) => *a == (*b as f64),
            (Val::Bool(a), Val::Bool(b)) => a == b,
            (Val::List(a), Val::List(b)) => Rc::ptr_eq(a, b) || *a.borrow() == *b.borrow(),
            // Objects and functions compare by identity; structural object
            // equality is opt-in through the `_equal` meta method.
            (Val::Object(a), Val::Object(b)) => Rc::ptr_eq(a, b),
            (Val::Closure(a), Val::Closure(b)) => Rc::ptr_eq(a, b),
            (Val::RustFunction(a), Val::RustFunction(b)) => std::ptr::fn_addr_eq(*a, *b),
            (Val::Method(a), Val::Method(b)) => {
                std::ptr::fn_addr_eq(a.func, b.func) && a.name == b.name && a.recv == b.recv
            }
            (Val::Nil, Val::Nil) => true,
            _ => false,
        }
    }
}

impl PartialOrd for Val {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self, other) {
            (Val::Int(a), Val::Int(b)) => a.partial_cmp(b),
            (Val::Float(a), Val::Float(b)) => a.partial_cmp(b),
            (Val::Int(a), Val::Float(b)) => (*a as f64).partial_cmp(b),
            (Val::Float(a), Val::Int(b)) => a.partial_cmp(&(*b as f64)),
            (Val::Str(a), Val::Str(b)) => a.partial_cmp(b),
            _ => None,
        }
    }
}

// Strings display bare at top level but quoted inside aggregates.
fn fmt_nested(val: &Val, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match val {
        Val::Str(s) => write!(f, "{:?}", s.as_ref()),
        other => write!(f, "{other}"),
    }
}

impl fmt::Display for Val {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Val::Str(s) => write!(f, "{s}"),
            Val::Int(i) => write!(f, "{i}"),
            Val::Float(x) => {
                let mut buf = ryu::Buffer::new();
                f.write_str(buf.format(*x))
            }
            Val::Bool(b) => write!(f, "{b}"),
            Val::List(items) => {
                write!(f, "[")?;
                for (i, item) in items.borrow().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    fmt_nested(item, f)?;
                }
                write!(f, "]")
            }
            Val::Object(o) => {
                let fields = o.fields.borrow();
                let mut keys: Vec<_> = fields.keys().cloned().collect();
                keys.sort();
                write!(f, "{{")?;
                for (i, k) in keys.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{k}: ")?;
                    if let Some(v) = fields.get(k.as_ref()) {
                        fmt_nested(v, f)?;
                    }
                }
                write!(f, "}}")
            }
            Val::Closure(c) => write!(f, "<fn {}>", c.display_name()),
            Val::RustFunction(_) => write!(f, "<native fn>"),
            Val::Method(m) => write!(f, "<method {}>", m.name),
            Val::Nil => write!(f, "nil"),
        }
    }
}

impl Serialize for Val {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Val::Str(s) => serializer.serialize_str(s.as_ref()),
            Val::Int(i) => serializer.serialize_i64(*i),
            Val::Float(x) => serializer.serialize_f64(*x),
            Val::Bool(b) => serializer.serialize_bool(*b),
            Val::List(items) => items.borrow().serialize(serializer),
            Val::Object(o) => {
                let fields = o.fields.borrow();
                let mut map = serializer.serialize_map(Some(fields.len()))?;
                for (k, v) in fields.iter() {
                    map.serialize_entry(k.as_ref(), v)?;
                }
                map.end()
            }
            // Functions can't be serialized, use a placeholder
            Val::Closure(_) | Val::RustFunction(_) | Val::Method(_) => {
                serializer.serialize_str("<function>")
            }
            Val::Nil => serializer.serialize_unit(),
        }
    }
}
