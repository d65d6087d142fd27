mod env;
mod interpreter;
pub mod object;

pub use crate::interpreter::Interpreter;
pub use crate::object::Object;
