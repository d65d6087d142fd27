use crate::env::Env;
use crate::object::{Function, Object};

use monkey_common::error::{
    Error, ErrorS, NameError, OverflowError, Result, TypeError, ZeroDivisionError,
};
use monkey_common::types::Span;
use monkey_syntax::ast::{
    Expr, ExprLiteral, ExprS, OpInfix, OpPrefix, Program, Stmt, StmtBlock, StmtS,
};

/// Maximum number of nested function calls.
const MAX_FRAMES: usize = 64;

/// Evaluates an operand. A pending `return` is handed straight back to the
/// caller of the enclosing `run_*` method instead of being used as a value.
macro_rules! operand {
    ($self:ident, $env:ident, $expr:expr) => {
        match $self.run_expr($env, $expr)? {
            object @ Object::Return(_) => return Ok(object),
            object => object,
        }
    };
}

#[derive(Debug, Default)]
pub struct Interpreter {
    globals: Env,
    frames: usize,
}

impl Interpreter {
    /// Parses and runs `source` against the global scope, which persists
    /// across calls.
    pub fn eval(&mut self, source: &str) -> Result<Object, Vec<ErrorS>> {
        let program = monkey_syntax::parse(source)?;
        self.run(&program).map_err(|e| vec![e])
    }

    /// Runs every statement in order and yields the value of the last one,
    /// or the value of the first `return`.
    pub fn run(&mut self, program: &Program) -> Result<Object> {
        let globals = &mut self.globals.clone();
        let mut value = Object::Null;
        for stmt_s in &program.stmts {
            match self.run_stmt(globals, stmt_s)? {
                Object::Return(ref object) => return Ok(Object::clone(object)),
                object => value = object,
            }
        }
        Ok(value)
    }

    /// Blocks share the scope they appear in. A `return` stays wrapped so
    /// that enclosing blocks stop as well.
    fn run_block(&mut self, env: &mut Env, block: &StmtBlock) -> Result<Object> {
        let mut value = Object::Null;
        for stmt_s in &block.stmts {
            value = self.run_stmt(env, stmt_s)?;
            if let Object::Return(_) = value {
                break;
            }
        }
        Ok(value)
    }

    /// Runs a function body, refusing to go deeper than [`MAX_FRAMES`].
    pub(crate) fn run_frame(
        &mut self,
        env: &mut Env,
        body: &StmtBlock,
        span: &Span,
    ) -> Result<Object> {
        if self.frames >= MAX_FRAMES {
            return Err((OverflowError::StackOverflow.into(), span.clone()));
        }
        self.frames += 1;
        let result = self.run_block(env, body);
        self.frames -= 1;
        result
    }

    fn run_stmt(&mut self, env: &mut Env, stmt_s: &StmtS) -> Result<Object> {
        let (stmt, _) = stmt_s;
        match stmt {
            Stmt::Block(block) => self.run_block(env, block),
            Stmt::Expr(expr) => self.run_expr(env, &expr.value),
            Stmt::Let(let_) => {
                let value = operand!(self, env, &let_.value);
                env.define(&let_.name, value);
                Ok(Object::Null)
            }
            Stmt::Return(return_) => {
                let value = operand!(self, env, &return_.value);
                Ok(Object::Return(Box::new(value)))
            }
        }
    }

    fn run_expr(&mut self, env: &mut Env, expr_s: &ExprS) -> Result<Object> {
        let (expr, span) = expr_s;
        if cfg!(feature = "eval-trace") {
            eprintln!("[eval] {span:?} {expr}");
        }

        match expr {
            Expr::Call(call) => {
                let callee = operand!(self, env, &call.callee);
                let mut args = Vec::with_capacity(call.args.len());
                for arg in &call.args {
                    args.push(operand!(self, env, arg));
                }
                match callee {
                    Object::Function(ref function) => function.call(self, args, span),
                    object => Err((
                        TypeError::NotCallable { type_: object.type_().to_string() }.into(),
                        span.clone(),
                    )),
                }
            }
            Expr::Function(function) => Ok(Object::Function(Function::new(function, env))),
            Expr::Identifier(identifier) => env.get(&identifier.name).ok_or_else(|| {
                (NameError::NotDefined { name: identifier.name.clone() }.into(), span.clone())
            }),
            Expr::If(if_) => {
                let cond = operand!(self, env, &if_.cond);
                if cond.bool() {
                    self.run_block(env, &if_.then)
                } else if let Some(else_) = &if_.else_ {
                    self.run_block(env, else_)
                } else {
                    Ok(Object::Null)
                }
            }
            Expr::Infix(infix) => {
                let lt = operand!(self, env, &infix.lt);
                let rt = operand!(self, env, &infix.rt);
                run_infix(infix.op, lt, rt).map_err(|e| (e, span.clone()))
            }
            Expr::Literal(literal) => Ok(match literal {
                ExprLiteral::Bool(bool) => Object::Bool(*bool),
                ExprLiteral::Int(int) => Object::Int(*int),
            }),
            Expr::Prefix(prefix) => {
                let rt = operand!(self, env, &prefix.rt);
                run_prefix(prefix.op, rt).map_err(|e| (e, span.clone()))
            }
        }
    }
}

fn run_prefix(op: OpPrefix, rt: Object) -> Result<Object, Error> {
    match (op, rt) {
        (OpPrefix::Not, rt) => Ok(Object::Bool(!rt.bool())),
        (OpPrefix::Negate, Object::Int(int)) => checked(op, int.checked_neg()),
        (op, rt) => Err(TypeError::UnsupportedOperandPrefix {
            op: op.to_string(),
            rt_type: rt.type_().to_string(),
        }
        .into()),
    }
}

fn run_infix(op: OpInfix, lt: Object, rt: Object) -> Result<Object, Error> {
    match (op, lt, rt) {
        (OpInfix::Add, Object::Int(a), Object::Int(b)) => checked(op, a.checked_add(b)),
        (OpInfix::Subtract, Object::Int(a), Object::Int(b)) => checked(op, a.checked_sub(b)),
        (OpInfix::Multiply, Object::Int(a), Object::Int(b)) => checked(op, a.checked_mul(b)),
        (OpInfix::Divide, Object::Int(_), Object::Int(0)) => {
            Err(ZeroDivisionError::DivisionByZero.into())
        }
        (OpInfix::Divide, Object::Int(a), Object::Int(b)) => checked(op, a.checked_div(b)),

        (OpInfix::Less, Object::Int(a), Object::Int(b)) => Ok(Object::Bool(a < b)),
        (OpInfix::LessEqual, Object::Int(a), Object::Int(b)) => Ok(Object::Bool(a <= b)),
        (OpInfix::Greater, Object::Int(a), Object::Int(b)) => Ok(Object::Bool(a > b)),
        (OpInfix::GreaterEqual, Object::Int(a), Object::Int(b)) => Ok(Object::Bool(a >= b)),

        (OpInfix::Equal, Object::Int(a), Object::Int(b)) => Ok(Object::Bool(a == b)),
        (OpInfix::Equal, Object::Bool(a), Object::Bool(b)) => Ok(Object::Bool(a == b)),
        (OpInfix::Equal, Object::Null, Object::Null) => Ok(Object::Bool(true)),
        (OpInfix::NotEqual, Object::Int(a), Object::Int(b)) => Ok(Object::Bool(a != b)),
        (OpInfix::NotEqual, Object::Bool(a), Object::Bool(b)) => Ok(Object::Bool(a != b)),
        (OpInfix::NotEqual, Object::Null, Object::Null) => Ok(Object::Bool(false)),

        (op, lt, rt) => Err(TypeError::UnsupportedOperandInfix {
            op: op.to_string(),
            lt_type: lt.type_().to_string(),
            rt_type: rt.type_().to_string(),
        }
        .into()),
    }
}

fn checked(op: impl ToString, value: Option<i64>) -> Result<Object, Error> {
    value
        .map(Object::Int)
        .ok_or_else(|| OverflowError::IntegerOverflow { op: op.to_string() }.into())
}
