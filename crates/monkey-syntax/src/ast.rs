use monkey_common::types::Spanned;

use std::fmt::{self, Display, Formatter};

pub type StmtS = Spanned<Stmt>;
pub type ExprS = Spanned<Expr>;

#[derive(Debug, Default)]
pub struct Program {
    pub stmts: Vec<StmtS>,
}

impl Display for Program {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write_joined(f, self.stmts.iter().map(|(stmt, _)| stmt), " ")
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Stmt {
    Block(StmtBlock),
    Expr(StmtExpr),
    Let(StmtLet),
    Return(StmtReturn),
}

impl Display for Stmt {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Block(block) => write!(f, "{block}"),
            Stmt::Expr(expr) => write!(f, "{};", expr.value.0),
            Stmt::Let(let_) => write!(f, "let {} = {};", let_.name, let_.value.0),
            Stmt::Return(return_) => write!(f, "return {};", return_.value.0),
        }
    }
}

/// A brace-delimited sequence of statements. Blocks only appear as the
/// branches of an `if` and as function bodies.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StmtBlock {
    pub stmts: Vec<StmtS>,
}

impl Display for StmtBlock {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.stmts.is_empty() {
            return write!(f, "{{ }}");
        }
        write!(f, "{{ ")?;
        write_joined(f, self.stmts.iter().map(|(stmt, _)| stmt), " ")?;
        write!(f, " }}")
    }
}

/// An expression statement evaluates to the value of its expression.
#[derive(Clone, Debug, PartialEq)]
pub struct StmtExpr {
    pub value: ExprS,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtLet {
    pub name: String,
    pub value: ExprS,
}

#[derive(Clone, Debug, PartialEq)]
pub struct StmtReturn {
    pub value: ExprS,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Expr {
    Call(Box<ExprCall>),
    Function(Box<ExprFunction>),
    Identifier(ExprIdentifier),
    If(Box<ExprIf>),
    Infix(Box<ExprInfix>),
    Literal(ExprLiteral),
    Prefix(Box<ExprPrefix>),
}

impl Display for Expr {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Call(call) => {
                write!(f, "{}(", call.callee.0)?;
                write_joined(f, call.args.iter().map(|(arg, _)| arg), ", ")?;
                write!(f, ")")
            }
            Expr::Function(function) => write!(f, "{function}"),
            Expr::Identifier(identifier) => write!(f, "{}", identifier.name),
            Expr::If(if_) => {
                write!(f, "if ({}) {}", if_.cond.0, if_.then)?;
                match &if_.else_ {
                    Some(else_) => write!(f, " else {else_}"),
                    None => Ok(()),
                }
            }
            Expr::Infix(infix) => write!(f, "({} {} {})", infix.lt.0, infix.op, infix.rt.0),
            Expr::Literal(literal) => write!(f, "{literal}"),
            Expr::Prefix(prefix) => write!(f, "({}{})", prefix.op, prefix.rt.0),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprCall {
    pub callee: ExprS,
    pub args: Vec<ExprS>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprFunction {
    pub params: Vec<String>,
    pub body: StmtBlock,
}

impl Display for ExprFunction {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {}", self.params.join(", "), self.body)
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ExprIdentifier {
    pub name: String,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprIf {
    pub cond: ExprS,
    pub then: StmtBlock,
    pub else_: Option<StmtBlock>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprInfix {
    pub lt: ExprS,
    pub op: OpInfix,
    pub rt: ExprS,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpInfix {
    Add,
    Subtract,
    Multiply,
    Divide,
    Equal,
    NotEqual,
    Greater,
    GreaterEqual,
    Less,
    LessEqual,
}

impl Display for OpInfix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        let op = match self {
            OpInfix::Add => "+",
            OpInfix::Subtract => "-",
            OpInfix::Multiply => "*",
            OpInfix::Divide => "/",
            OpInfix::Equal => "==",
            OpInfix::NotEqual => "!=",
            OpInfix::Greater => ">",
            OpInfix::GreaterEqual => ">=",
            OpInfix::Less => "<",
            OpInfix::LessEqual => "<=",
        };
        write!(f, "{op}")
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ExprLiteral {
    Bool(bool),
    Int(i64),
}

impl Display for ExprLiteral {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ExprLiteral::Bool(bool) => write!(f, "{bool}"),
            ExprLiteral::Int(int) => write!(f, "{int}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ExprPrefix {
    pub op: OpPrefix,
    pub rt: ExprS,
}

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum OpPrefix {
    Negate,
    Not,
}

impl Display for OpPrefix {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            OpPrefix::Negate => write!(f, "-"),
            OpPrefix::Not => write!(f, "!"),
        }
    }
}

fn write_joined<T: Display>(
    f: &mut Formatter<'_>,
    items: impl IntoIterator<Item = T>,
    sep: &str,
) -> fmt::Result {
    for (idx, item) in items.into_iter().enumerate() {
        if idx != 0 {
            f.write_str(sep)?;
        }
        write!(f, "{item}")?;
    }
    Ok(())
}
