use std::fmt;

use serde::{Deserialize, Serialize};

/// Runtime type tag of a [`super::Val`], used for operator dispatch
/// tables and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Type {
    Nil,
    Bool,
    Int,
    Float,
    Str,
    List,
    Object,
    Function,
}

impl Type {
    pub fn name(&self) -> &'static str {
        match self {
            Type::Nil => "Nil",
            Type::Bool => "Bool",
            Type::Int => "Int",
            Type::Float => "Float",
            Type::Str => "String",
            Type::List => "List",
            Type::Object => "Object",
            Type::Function => "Function",
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
