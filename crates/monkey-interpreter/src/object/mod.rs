mod function;

pub use crate::object::function::Function;

use gc::{Finalize, Trace};

use std::fmt::{self, Display, Formatter};

#[derive(Clone, Debug, Finalize, Trace)]
pub enum Object {
    Bool(bool),
    Function(Function),
    Int(i64),
    Null,
    /// A value on its way out of a function body. Blocks stop at the first
    /// statement that yields one; calls and the top level unwrap it.
    Return(Box<Object>),
}

impl Object {
    /// Everything except `null` and `false` is truthy. A returned value is
    /// as truthy as the value it carries.
    pub fn bool(&self) -> bool {
        match self {
            Object::Return(object) => object.bool(),
            object => !matches!(object, Object::Null | Object::Bool(false)),
        }
    }

    pub fn type_(&self) -> &'static str {
        match self {
            Object::Bool(_) => "bool",
            Object::Function(_) => "function",
            Object::Int(_) => "int",
            Object::Null => "null",
            Object::Return(_) => "return",
        }
    }
}

impl Display for Object {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Object::Bool(bool) => write!(f, "{bool}"),
            Object::Function(function) => write!(f, "{function}"),
            Object::Int(int) => write!(f, "{int}"),
            Object::Null => write!(f, "null"),
            Object::Return(object) => write!(f, "{object}"),
        }
    }
}

impl PartialEq for Object {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Object::Bool(a), Object::Bool(b)) => a == b,
            (Object::Function(a), Object::Function(b)) => a == b,
            (Object::Int(a), Object::Int(b)) => a == b,
            (Object::Null, Object::Null) => true,
            (Object::Return(a), Object::Return(b)) => a == b,
            _ => false,
        }
    }
}
