use std::fmt::{self, Display, Formatter};
use std::ops::Deref;

use gc::{Finalize, Gc, Trace};
use monkey_common::error::{Result, TypeError};
use monkey_common::types::Span;
use monkey_syntax::ast::{ExprFunction, StmtBlock};

use crate::env::Env;
use crate::interpreter::Interpreter;
use crate::object::Object;

/// A function literal closed over the scope it was evaluated in.
#[derive(Clone, Debug, Finalize, Trace)]
pub struct Function(Gc<FunctionImpl>);

impl Function {
    pub fn new(decl: &ExprFunction, env: &Env) -> Self {
        Self(Gc::new(FunctionImpl { decl: decl.clone(), env: env.clone() }))
    }

    pub fn arity(&self) -> usize {
        self.decl.params.len()
    }

    pub fn params(&self) -> &[String] {
        &self.decl.params
    }

    pub fn body(&self) -> &StmtBlock {
        &self.decl.body
    }

    /// Binds `args` in a fresh scope whose parent is the captured scope and
    /// runs the body. A returned value is unwrapped here.
    pub(crate) fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Object>,
        span: &Span,
    ) -> Result<Object> {
        let exp_args = self.arity();
        let got_args = args.len();
        if exp_args != got_args {
            return Err((TypeError::ArityMismatch { exp_args, got_args }.into(), span.clone()));
        }

        let env = &mut Env::with_parent(&self.env);
        for (param, arg) in self.params().iter().zip(args) {
            env.define(param, arg);
        }

        match interpreter.run_frame(env, self.body(), span)? {
            Object::Return(ref object) => Ok(Object::clone(object)),
            object => Ok(object),
        }
    }
}

impl Deref for Function {
    type Target = FunctionImpl;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Display for Function {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.decl)
    }
}

impl PartialEq for Function {
    fn eq(&self, other: &Self) -> bool {
        Gc::ptr_eq(&self.0, &other.0)
    }
}

#[derive(Debug, Finalize, Trace)]
pub struct FunctionImpl {
    #[unsafe_ignore_trace]
    pub decl: ExprFunction,
    pub env: Env,
}
