use std::collections::HashMap;
use std::rc::Rc;

use super::Val;

impl From<i64> for Val {
    fn from(v: i64) -> Self {
        Val::Int(v)
    }
}

impl From<i32> for Val {
    fn from(v: i32) -> Self {
        Val::Int(v as i64)
    }
}

impl From<f64> for Val {
    fn from(v: f64) -> Self {
        Val::Float(v)
    }
}

impl From<bool> for Val {
    fn from(v: bool) -> Self {
        Val::Bool(v)
    }
}

impl From<&str> for Val {
    fn from(v: &str) -> Self {
        Val::Str(Rc::from(v))
    }
}

impl From<String> for Val {
    fn from(v: String) -> Self {
        Val::Str(Rc::from(v))
    }
}

impl From<Rc<str>> for Val {
    fn from(v: Rc<str>) -> Self {
        Val::Str(v)
    }
}

impl From<()> for Val {
    fn from((): ()) -> Self {
        Val::Nil
    }
}

impl<T: Into<Val>> From<Option<T>> for Val {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => Val::Nil,
        }
    }
}

impl<T: Into<Val>> From<Vec<T>> for Val {
    fn from(items: Vec<T>) -> Self {
        Val::list(items.into_iter().map(Into::into).collect())
    }
}

impl<V: Into<Val>> From<HashMap<String, V>> for Val {
    fn from(fields: HashMap<String, V>) -> Self {
        Val::object(fields.into_iter().map(|(k, v)| (Rc::<str>::from(k), v.into())))
    }
}

impl<V: Into<Val>> From<HashMap<&str, V>> for Val {
    fn from(fields: HashMap<&str, V>) -> Self {
        Val::object(fields.into_iter().map(|(k, v)| (Rc::<str>::from(k), v.into())))
    }
}
