pub mod ast;
pub mod lexer;
pub mod parser;
pub mod token;

use crate::ast::Program;
use crate::lexer::Lexer;
use crate::parser::Parser;

use monkey_common::error::ErrorS;

/// Lexes and parses `source`. The program is only returned if no diagnostics
/// were recorded; otherwise every diagnostic is returned in source order.
pub fn parse(source: &str) -> Result<Program, Vec<ErrorS>> {
    let mut parser = Parser::new(Lexer::new(source));
    let program = parser.parse_program();
    let errors = parser.into_errors();
    if errors.is_empty() {
        Ok(program)
    } else {
        Err(errors)
    }
}
