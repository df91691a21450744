//! Builtin methods on `String`, `List` and `Object` receivers.
//!
//! Methods are plain [`RustFunction`]s looked up by receiver tag name, so
//! `value.method` is an ordinary field access producing a bound callable
//! and `value.method(...)` is an ordinary call. The receiver is `args[0]`.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use once_cell::sync::Lazy;

use crate::error::{EvalResult, RuntimeError};
use crate::interp::Interp;
use crate::val::{ObjectValue, RustFunction, Val};

type MethodTable = HashMap<&'static str, HashMap<&'static str, RustFunction>>;

static METHOD_REGISTRY: Lazy<MethodTable> = Lazy::new(|| {
    let mut registry: MethodTable = HashMap::new();

    let str_methods = registry.entry("String").or_default();
    str_methods.insert("len", str_len as RustFunction);
    str_methods.insert("upper", str_upper);
    str_methods.insert("lower", str_lower);
    str_methods.insert("trim", str_trim);
    str_methods.insert("contains", str_contains);
    str_methods.insert("split", str_split);

    let list_methods = registry.entry("List").or_default();
    list_methods.insert("len", list_len as RustFunction);
    list_methods.insert("push", list_push);
    list_methods.insert("pop", list_pop);
    list_methods.insert("insert", list_insert);
    list_methods.insert("remove", list_remove);
    list_methods.insert("contains", list_contains);
    list_methods.insert("join", list_join);

    let object_methods = registry.entry("Object").or_default();
    object_methods.insert("keys", object_keys as RustFunction);
    object_methods.insert("values", object_values);
    object_methods.insert("has", object_has);
    object_methods.insert("remove", object_remove);

    registry
});

/// Find a builtin method for the given receiver.
pub fn find_method_for_val(receiver: &Val, method: &str) -> Option<RustFunction> {
    METHOD_REGISTRY
        .get(receiver.type_name())
        .and_then(|methods| methods.get(method).copied())
}

fn recv_str<'a>(args: &'a [Val], method: &str) -> EvalResult<&'a Rc<str>> {
    match args.first() {
        Some(Val::Str(s)) => Ok(s),
        _ => Err(RuntimeError::native(format!("{method}: String receiver expected"))),
    }
}

fn recv_list<'a>(args: &'a [Val], method: &str) -> EvalResult<&'a Rc<RefCell<Vec<Val>>>> {
    match args.first() {
        Some(Val::List(items)) => Ok(items),
        _ => Err(RuntimeError::native(format!("{method}: List receiver expected"))),
    }
}

fn arg<'a>(args: &'a [Val], idx: usize, method: &str) -> EvalResult<&'a Val> {
    // idx is past the receiver slot
    args.get(idx + 1)
        .ok_or_else(|| RuntimeError::native(format!("{method}: missing argument {idx}")))
}

fn str_arg<'a>(args: &'a [Val], idx: usize, method: &str) -> EvalResult<&'a str> {
    match arg(args, idx, method)? {
        Val::Str(s) => Ok(s.as_ref()),
        other => Err(RuntimeError::native(format!(
            "{method}: String argument expected, got {}",
            other.type_name()
        ))),
    }
}

fn int_arg(args: &[Val], idx: usize, method: &str) -> EvalResult<i64> {
    match arg(args, idx, method)? {
        Val::Int(i) => Ok(*i),
        other => Err(RuntimeError::native(format!(
            "{method}: Int argument expected, got {}",
            other.type_name()
        ))),
    }
}

fn str_len(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let s = recv_str(args, "len")?;
    Ok(Val::Int(s.chars().count() as i64))
}

fn str_upper(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let s = recv_str(args, "upper")?;
    Ok(Val::from(s.to_uppercase()))
}

fn str_lower(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let s = recv_str(args, "lower")?;
    Ok(Val::from(s.to_lowercase()))
}

fn str_trim(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let s = recv_str(args, "trim")?;
    Ok(Val::from(s.trim()))
}

fn str_contains(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let s = recv_str(args, "contains")?.clone();
    let needle = str_arg(args, 0, "contains")?;
    Ok(Val::Bool(s.contains(needle)))
}

fn str_split(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let s = recv_str(args, "split")?.clone();
    let sep = str_arg(args, 0, "split")?;
    Ok(Val::list(s.split(sep).map(Val::from).collect()))
}

fn list_len(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "len")?;
    let len = items.borrow().len();
    Ok(Val::Int(len as i64))
}

fn list_push(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "push")?;
    let value = arg(args, 0, "push")?.clone();
    items.borrow_mut().push(value);
    Ok(Val::Nil)
}

fn list_pop(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "pop")?;
    let popped = items.borrow_mut().pop();
    Ok(popped.unwrap_or(Val::Nil))
}

fn list_insert(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "insert")?;
    let idx = int_arg(args, 0, "insert")?;
    let value = arg(args, 1, "insert")?.clone();
    let mut items = items.borrow_mut();
    let len = items.len();
    let pos = usize::try_from(idx)
        .ok()
        .filter(|p| *p <= len)
        .ok_or_else(|| RuntimeError::index_out_of_bounds(idx, len))?;
    items.insert(pos, value);
    Ok(Val::Nil)
}

fn list_remove(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "remove")?;
    let idx = int_arg(args, 0, "remove")?;
    let mut items = items.borrow_mut();
    let len = items.len();
    let pos = usize::try_from(idx)
        .ok()
        .filter(|p| *p < len)
        .ok_or_else(|| RuntimeError::index_out_of_bounds(idx, len))?;
    Ok(items.remove(pos))
}

fn list_contains(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "contains")?;
    let needle = arg(args, 0, "contains")?;
    let found = items.borrow().iter().any(|item| item == needle);
    Ok(Val::Bool(found))
}

fn list_join(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let items = recv_list(args, "join")?;
    let sep = str_arg(args, 0, "join")?;
    let joined = items
        .borrow()
        .iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(sep);
    Ok(Val::from(joined))
}

fn recv_object<'a>(args: &'a [Val], method: &str) -> EvalResult<&'a ObjectValue> {
    match args.first() {
        Some(Val::Object(o)) => Ok(o),
        _ => Err(RuntimeError::native(format!("{method}: Object receiver expected"))),
    }
}

fn sorted_keys(obj: &ObjectValue) -> Vec<Rc<str>> {
    let mut keys: Vec<_> = obj.fields.borrow().keys().cloned().collect();
    keys.sort();
    keys
}

fn object_keys(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let obj = recv_object(args, "keys")?;
    Ok(Val::list(sorted_keys(obj).into_iter().map(Val::from).collect()))
}

fn object_values(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let obj = recv_object(args, "values")?;
    let keys = sorted_keys(obj);
    let fields = obj.fields.borrow();
    Ok(Val::list(
        keys.iter().filter_map(|k| fields.get(k.as_ref()).cloned()).collect(),
    ))
}

fn object_has(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let obj = recv_object(args, "has")?;
    let name = str_arg(args, 0, "has")?;
    let found = obj.fields.borrow().contains_key(name);
    Ok(Val::Bool(found))
}

fn object_remove(args: &[Val], _interp: &mut Interp) -> EvalResult {
    let obj = recv_object(args, "remove")?;
    let name = str_arg(args, 0, "remove")?;
    let removed = obj.fields.borrow_mut().remove(name);
    Ok(removed.unwrap_or(Val::Nil))
}
