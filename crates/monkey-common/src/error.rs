use crate::types::{Span, Spanned};

use codespan_reporting::diagnostic::{Diagnostic, Label};
use codespan_reporting::files::{self, SimpleFile};
use codespan_reporting::term;
use termcolor::WriteColor;
use thiserror::Error;

use std::io;

pub type Result<T, E = ErrorS> = std::result::Result<T, E>;
pub type ErrorS = Spanned<Error>;

#[remain::sorted]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum Error {
    #[error("NameError: {0}")]
    NameError(NameError),
    #[error("OverflowError: {0}")]
    OverflowError(OverflowError),
    #[error("SyntaxError: {0}")]
    SyntaxError(SyntaxError),
    #[error("TypeError: {0}")]
    TypeError(TypeError),
    #[error("ZeroDivisionError: {0}")]
    ZeroDivisionError(ZeroDivisionError),
}

impl Error {
    fn code(&self) -> &'static str {
        match self {
            Error::NameError(_) => "NameError",
            Error::OverflowError(_) => "OverflowError",
            Error::SyntaxError(_) => "SyntaxError",
            Error::TypeError(_) => "TypeError",
            Error::ZeroDivisionError(_) => "ZeroDivisionError",
        }
    }

    /// The message without the error category prefix.
    fn message(&self) -> String {
        match self {
            Error::NameError(e) => e.to_string(),
            Error::OverflowError(e) => e.to_string(),
            Error::SyntaxError(e) => e.to_string(),
            Error::TypeError(e) => e.to_string(),
            Error::ZeroDivisionError(e) => e.to_string(),
        }
    }

    fn notes(&self) -> Vec<String> {
        match self {
            Error::OverflowError(OverflowError::NestingTooDeep { .. }) => {
                vec!["split the expression into smaller `let` bindings".to_string()]
            }
            Error::SyntaxError(SyntaxError::UnexpectedToken { expected, .. }) => {
                vec![format!("expected: {expected}")]
            }
            _ => Vec::new(),
        }
    }

    pub fn as_diagnostic(&self, span: &Span) -> Diagnostic<()> {
        Diagnostic::error()
            .with_code(self.code())
            .with_message(self.message())
            .with_labels(vec![Label::primary((), span.clone())])
            .with_notes(self.notes())
    }
}

macro_rules! impl_from_error {
    ($($error:ident),+) => {$(
        impl From<$error> for Error {
            fn from(e: $error) -> Self {
                Error::$error(e)
            }
        }
    )+};
}

impl_from_error!(NameError, OverflowError, SyntaxError, TypeError, ZeroDivisionError);

#[remain::sorted]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum NameError {
    #[error("name {name:?} is not defined")]
    NotDefined { name: String },
}

#[remain::sorted]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum OverflowError {
    #[error("integer overflow in {op}")]
    IntegerOverflow { op: String },
    #[error("expression nested deeper than {max} levels")]
    NestingTooDeep { max: usize },
    #[error("stack overflow")]
    StackOverflow,
}

#[remain::sorted]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum SyntaxError {
    #[error("could not parse {literal:?} as an integer")]
    InvalidInteger { literal: String },
    #[error("no prefix parse function for {token} found")]
    NoPrefixParseFn { token: String },
    #[error("unexpected input {token:?}")]
    UnexpectedInput { token: String },
    #[error("expected next token to be {expected}, got {got} instead")]
    UnexpectedToken { expected: String, got: String },
}

#[remain::sorted]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum TypeError {
    #[error("function takes {exp_args} arguments but {got_args} were given")]
    ArityMismatch { exp_args: usize, got_args: usize },
    #[error("{type_:?} object is not callable")]
    NotCallable { type_: String },
    #[error("unsupported operand type(s) for {op}: {lt_type:?} and {rt_type:?}")]
    UnsupportedOperandInfix { op: String, lt_type: String, rt_type: String },
    #[error("unsupported operand type for {op}: {rt_type:?}")]
    UnsupportedOperandPrefix { op: String, rt_type: String },
}

#[remain::sorted]
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ZeroDivisionError {
    #[error("integer division by zero")]
    DivisionByZero,
}

/// Renders `errors` against `source`, ordered by their position in the file.
pub fn report_errors(
    writer: &mut dyn WriteColor,
    name: &str,
    source: &str,
    errors: &[ErrorS],
) -> io::Result<()> {
    let mut errors = errors.iter().collect::<Vec<_>>();
    errors.sort_by_key(|(_, span)| (span.start, span.end));

    let file = SimpleFile::new(name, source);
    let config = term::Config::default();
    for (e, span) in errors {
        term::emit(writer, &config, &file, &e.as_diagnostic(span)).map_err(|e| match e {
            files::Error::Io(e) => e,
            e => io::Error::new(io::ErrorKind::Other, e.to_string()),
        })?;
    }
    Ok(())
}
