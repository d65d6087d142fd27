use crate::ast::{
    Expr, ExprCall, ExprFunction, ExprIdentifier, ExprIf, ExprInfix, ExprLiteral, ExprPrefix,
    ExprS, OpInfix, OpPrefix, Program, Stmt, StmtBlock, StmtExpr, StmtLet, StmtReturn, StmtS,
};
use crate::lexer::TokenStream;
use crate::token::{Token, TokenKind};

use monkey_common::error::{Error, ErrorS, OverflowError, SyntaxError};
use monkey_common::types::{span_join, Span};
use rustc_hash::FxHashMap;

use std::mem;

/// Maximum depth of nested expressions before the parser gives up.
const MAX_NESTING: usize = 128;

/// Binding power of an operator token. Infix parsing keeps consuming
/// operators only while they bind tighter than the current minimum.
#[derive(Clone, Copy, Debug, Eq, Ord, PartialEq, PartialOrd)]
pub enum Precedence {
    Lowest,
    /// `==` `!=`
    Equals,
    /// `<` `>` `<=` `>=`
    LessGreater,
    /// `+` `-`
    Sum,
    /// `*` `/`
    Product,
    /// `-x` `!x`
    Prefix,
    /// `f(x)`
    Call,
}

impl Precedence {
    pub fn of(kind: TokenKind) -> Self {
        match kind {
            TokenKind::EqualEqual | TokenKind::BangEqual => Precedence::Equals,
            TokenKind::Less
            | TokenKind::Greater
            | TokenKind::LessEqual
            | TokenKind::GreaterEqual => Precedence::LessGreater,
            TokenKind::Plus | TokenKind::Minus => Precedence::Sum,
            TokenKind::Asterisk | TokenKind::Slash => Precedence::Product,
            TokenKind::LtParen => Precedence::Call,
            _ => Precedence::Lowest,
        }
    }
}

type PrefixFn<T> = fn(&mut Parser<T>) -> Option<ExprS>;
type InfixFn<T> = fn(&mut Parser<T>, ExprS) -> Option<ExprS>;

pub struct Parser<T> {
    tokens: T,
    cur: Token,
    peek: Token,
    errors: Vec<ErrorS>,
    prefix_fns: FxHashMap<TokenKind, PrefixFn<T>>,
    infix_fns: FxHashMap<TokenKind, InfixFn<T>>,
    depth: usize,
}

impl<T: TokenStream> Parser<T> {
    pub fn new(tokens: T) -> Self {
        let mut parser = Self {
            tokens,
            cur: Token::eof(0),
            peek: Token::eof(0),
            errors: Vec::new(),
            prefix_fns: FxHashMap::default(),
            infix_fns: FxHashMap::default(),
            depth: 0,
        };
        parser.next_token();
        parser.next_token();

        parser.register_prefix(TokenKind::Identifier, Self::parse_identifier);
        parser.register_prefix(TokenKind::Int, Self::parse_integer);
        parser.register_prefix(TokenKind::Bang, Self::parse_prefix);
        parser.register_prefix(TokenKind::Minus, Self::parse_prefix);
        parser.register_prefix(TokenKind::True, Self::parse_boolean);
        parser.register_prefix(TokenKind::False, Self::parse_boolean);
        parser.register_prefix(TokenKind::LtParen, Self::parse_grouped);
        parser.register_prefix(TokenKind::If, Self::parse_if);
        parser.register_prefix(TokenKind::Function, Self::parse_function);

        for kind in [
            TokenKind::Plus,
            TokenKind::Minus,
            TokenKind::Asterisk,
            TokenKind::Slash,
            TokenKind::EqualEqual,
            TokenKind::BangEqual,
            TokenKind::Less,
            TokenKind::Greater,
            TokenKind::LessEqual,
            TokenKind::GreaterEqual,
        ] {
            parser.register_infix(kind, Self::parse_infix);
        }
        parser.register_infix(TokenKind::LtParen, Self::parse_call);

        parser
    }

    /// Diagnostics recorded so far, in the order they were found.
    pub fn errors(&self) -> &[ErrorS] {
        &self.errors
    }

    pub fn into_errors(self) -> Vec<ErrorS> {
        self.errors
    }

    pub fn parse_program(&mut self) -> Program {
        let mut program = Program::default();
        while !self.cur_is(TokenKind::Eof) {
            match self.parse_statement() {
                Some(stmt_s) => {
                    if cfg!(feature = "parse-trace") {
                        eprintln!("[parse] {:?} {}", stmt_s.1, stmt_s.0);
                    }
                    program.stmts.push(stmt_s);
                }
                None => self.synchronize(),
            }
            self.next_token();
        }
        program
    }

    pub fn parse_statement(&mut self) -> Option<StmtS> {
        match self.cur.kind {
            TokenKind::Let => self.parse_let(),
            TokenKind::Return => self.parse_return(),
            _ => self.parse_expression_statement(),
        }
    }

    pub fn parse_expression(&mut self, precedence: Precedence) -> Option<ExprS> {
        let depth = self.depth;
        let expr = self.parse_expression_unguarded(precedence);
        self.depth = depth;
        expr
    }

    fn parse_expression_unguarded(&mut self, precedence: Precedence) -> Option<ExprS> {
        self.nest(self.cur.span.clone())?;
        let prefix = match self.prefix_fns.get(&self.cur.kind) {
            Some(&prefix) => prefix,
            None => {
                self.no_prefix_fn_error();
                return None;
            }
        };
        let mut lt = prefix(self)?;

        while !self.peek_is(TokenKind::Semicolon) && precedence < self.peek_precedence() {
            let infix = match self.infix_fns.get(&self.peek.kind) {
                Some(&infix) => infix,
                None => return Some(lt),
            };
            // Each infix or call node wraps `lt` one level deeper.
            self.nest(self.peek.span.clone())?;
            self.next_token();
            lt = infix(self, lt)?;
        }

        Some(lt)
    }

    fn parse_let(&mut self) -> Option<StmtS> {
        let start = self.cur.span.start;
        self.expect_peek(TokenKind::Identifier)?;
        let name = self.cur.literal.clone();
        self.expect_peek(TokenKind::Assign)?;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some((Stmt::Let(StmtLet { name, value }), start..self.cur.span.end))
    }

    fn parse_return(&mut self) -> Option<StmtS> {
        let start = self.cur.span.start;
        self.next_token();
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        Some((Stmt::Return(StmtReturn { value }), start..self.cur.span.end))
    }

    fn parse_expression_statement(&mut self) -> Option<StmtS> {
        let value = self.parse_expression(Precedence::Lowest)?;
        if self.peek_is(TokenKind::Semicolon) {
            self.next_token();
        }
        let span = span_join(&value.1, &self.cur.span);
        Some((Stmt::Expr(StmtExpr { value }), span))
    }

    /// Parses statements up to the closing brace. Expects the current token
    /// to be `{` and leaves the parser on the matching `}`.
    fn parse_block(&mut self) -> Option<StmtBlock> {
        self.next_token();
        let mut stmts = Vec::new();
        while !self.cur_is(TokenKind::RtBrace) {
            if self.cur_is(TokenKind::Eof) {
                self.error(
                    SyntaxError::UnexpectedToken {
                        expected: TokenKind::RtBrace.to_string(),
                        got: TokenKind::Eof.to_string(),
                    },
                    self.cur.span.clone(),
                );
                return None;
            }
            match self.parse_statement() {
                Some(stmt_s) => stmts.push(stmt_s),
                None => {
                    self.synchronize();
                    if self.cur_is(TokenKind::RtBrace) {
                        break;
                    }
                }
            }
            self.next_token();
        }
        Some(StmtBlock { stmts })
    }

    fn parse_identifier(&mut self) -> Option<ExprS> {
        let name = self.cur.literal.clone();
        Some((Expr::Identifier(ExprIdentifier { name }), self.cur.span.clone()))
    }

    fn parse_integer(&mut self) -> Option<ExprS> {
        match self.cur.literal.parse::<i64>() {
            Ok(int) => Some((Expr::Literal(ExprLiteral::Int(int)), self.cur.span.clone())),
            Err(_) => {
                let literal = self.cur.literal.clone();
                self.error(SyntaxError::InvalidInteger { literal }, self.cur.span.clone());
                None
            }
        }
    }

    fn parse_boolean(&mut self) -> Option<ExprS> {
        let bool = self.cur_is(TokenKind::True);
        Some((Expr::Literal(ExprLiteral::Bool(bool)), self.cur.span.clone()))
    }

    fn parse_prefix(&mut self) -> Option<ExprS> {
        let op = match self.cur.kind {
            TokenKind::Bang => OpPrefix::Not,
            TokenKind::Minus => OpPrefix::Negate,
            kind => unreachable!("prefix handler registered for {kind:?}"),
        };
        let start = self.cur.span.start;
        self.next_token();
        let rt = self.parse_expression(Precedence::Prefix)?;
        let span = start..rt.1.end;
        Some((Expr::Prefix(Box::new(ExprPrefix { op, rt })), span))
    }

    fn parse_grouped(&mut self) -> Option<ExprS> {
        let start = self.cur.span.start;
        self.next_token();
        let (expr, _) = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RtParen)?;
        Some((expr, start..self.cur.span.end))
    }

    fn parse_if(&mut self) -> Option<ExprS> {
        let start = self.cur.span.start;
        self.expect_peek(TokenKind::LtParen)?;
        self.next_token();
        let cond = self.parse_expression(Precedence::Lowest)?;
        self.expect_peek(TokenKind::RtParen)?;

        self.expect_peek(TokenKind::LtBrace)?;
        let then = self.parse_block()?;

        let else_ = if self.peek_is(TokenKind::Else) {
            self.next_token();
            self.expect_peek(TokenKind::LtBrace)?;
            Some(self.parse_block()?)
        } else {
            None
        };

        Some((Expr::If(Box::new(ExprIf { cond, then, else_ })), start..self.cur.span.end))
    }

    fn parse_function(&mut self) -> Option<ExprS> {
        let start = self.cur.span.start;
        self.expect_peek(TokenKind::LtParen)?;
        let params = self.parse_params()?;
        self.expect_peek(TokenKind::LtBrace)?;
        let body = self.parse_block()?;
        Some((Expr::Function(Box::new(ExprFunction { params, body })), start..self.cur.span.end))
    }

    fn parse_params(&mut self) -> Option<Vec<String>> {
        let mut params = Vec::new();
        if self.peek_is(TokenKind::RtParen) {
            self.next_token();
            return Some(params);
        }

        self.expect_peek(TokenKind::Identifier)?;
        params.push(self.cur.literal.clone());
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.expect_peek(TokenKind::Identifier)?;
            params.push(self.cur.literal.clone());
        }

        self.expect_peek(TokenKind::RtParen)?;
        Some(params)
    }

    fn parse_infix(&mut self, lt: ExprS) -> Option<ExprS> {
        let op = match self.cur.kind {
            TokenKind::Plus => OpInfix::Add,
            TokenKind::Minus => OpInfix::Subtract,
            TokenKind::Asterisk => OpInfix::Multiply,
            TokenKind::Slash => OpInfix::Divide,
            TokenKind::EqualEqual => OpInfix::Equal,
            TokenKind::BangEqual => OpInfix::NotEqual,
            TokenKind::Less => OpInfix::Less,
            TokenKind::Greater => OpInfix::Greater,
            TokenKind::LessEqual => OpInfix::LessEqual,
            TokenKind::GreaterEqual => OpInfix::GreaterEqual,
            kind => unreachable!("infix handler registered for {kind:?}"),
        };
        let precedence = Precedence::of(self.cur.kind);
        self.next_token();
        let rt = self.parse_expression(precedence)?;
        let span = span_join(&lt.1, &rt.1);
        Some((Expr::Infix(Box::new(ExprInfix { lt, op, rt })), span))
    }

    fn parse_call(&mut self, callee: ExprS) -> Option<ExprS> {
        let args = self.parse_args()?;
        let span = callee.1.start..self.cur.span.end;
        Some((Expr::Call(Box::new(ExprCall { callee, args })), span))
    }

    fn parse_args(&mut self) -> Option<Vec<ExprS>> {
        let mut args = Vec::new();
        if self.peek_is(TokenKind::RtParen) {
            self.next_token();
            return Some(args);
        }

        self.next_token();
        args.push(self.parse_expression(Precedence::Lowest)?);
        while self.peek_is(TokenKind::Comma) {
            self.next_token();
            self.next_token();
            args.push(self.parse_expression(Precedence::Lowest)?);
        }

        self.expect_peek(TokenKind::RtParen)?;
        Some(args)
    }

    fn register_prefix(&mut self, kind: TokenKind, prefix: PrefixFn<T>) {
        self.prefix_fns.insert(kind, prefix);
    }

    fn register_infix(&mut self, kind: TokenKind, infix: InfixFn<T>) {
        self.infix_fns.insert(kind, infix);
    }

    fn next_token(&mut self) {
        self.cur = mem::replace(&mut self.peek, self.tokens.next_token());
    }

    fn cur_is(&self, kind: TokenKind) -> bool {
        self.cur.kind == kind
    }

    fn peek_is(&self, kind: TokenKind) -> bool {
        self.peek.kind == kind
    }

    fn peek_precedence(&self) -> Precedence {
        Precedence::of(self.peek.kind)
    }

    /// Advances if the next token is of the given kind, otherwise records a
    /// diagnostic and leaves the parser where it is.
    fn expect_peek(&mut self, kind: TokenKind) -> Option<()> {
        if self.peek_is(kind) {
            self.next_token();
            Some(())
        } else {
            self.error(
                SyntaxError::UnexpectedToken {
                    expected: kind.to_string(),
                    got: self.peek.kind.to_string(),
                },
                self.peek.span.clone(),
            );
            None
        }
    }

    /// Skips the rest of a malformed statement, stopping on its `;` or just
    /// before the end of the enclosing block or input.
    fn synchronize(&mut self) {
        while !self.cur_is(TokenKind::Semicolon)
            && !self.cur_is(TokenKind::RtBrace)
            && !self.cur_is(TokenKind::Eof)
            && !self.peek_is(TokenKind::RtBrace)
            && !self.peek_is(TokenKind::Eof)
        {
            self.next_token();
        }
    }

    /// Counts one more level of the expression being built, failing once it
    /// passes [`MAX_NESTING`]. [`Parser::parse_expression`] restores the
    /// count on the way out.
    fn nest(&mut self, span: Span) -> Option<()> {
        if self.depth >= MAX_NESTING {
            self.error(OverflowError::NestingTooDeep { max: MAX_NESTING }, span);
            return None;
        }
        self.depth += 1;
        Some(())
    }

    fn no_prefix_fn_error(&mut self) {
        let span = self.cur.span.clone();
        match self.cur.kind {
            TokenKind::Error => {
                let token = self.cur.literal.clone();
                self.error(SyntaxError::UnexpectedInput { token }, span);
            }
            kind => self.error(SyntaxError::NoPrefixParseFn { token: kind.to_string() }, span),
        }
    }

    fn error(&mut self, error: impl Into<Error>, span: Span) {
        self.errors.push((error.into(), span));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::Lexer;

    use pretty_assertions::assert_eq;

    fn parse(source: &str) -> (Program, Vec<ErrorS>) {
        let mut parser = Parser::new(Lexer::new(source));
        let program = parser.parse_program();
        (program, parser.into_errors())
    }

    fn parse_ok(source: &str) -> Program {
        let (program, errors) = parse(source);
        assert_eq!(errors, Vec::new(), "unexpected errors for {source:?}");
        program
    }

    /// Parses a single expression statement and returns its expression.
    fn parse_expr(source: &str) -> Expr {
        let mut program = parse_ok(source);
        assert_eq!(program.stmts.len(), 1, "expected one statement in {source:?}");
        match program.stmts.remove(0).0 {
            Stmt::Expr(StmtExpr { value: (expr, _) }) => expr,
            stmt => panic!("expected an expression statement, got {stmt:?}"),
        }
    }

    fn messages(errors: &[ErrorS]) -> Vec<String> {
        errors.iter().map(|(e, _)| e.to_string()).collect()
    }

    #[test]
    fn parse_let_statements() {
        let program = parse_ok("let x = 5; let y = true; let foobar = y;");
        let got = program
            .stmts
            .iter()
            .map(|(stmt, _)| match stmt {
                Stmt::Let(let_) => (let_.name.as_str(), let_.value.0.to_string()),
                stmt => panic!("expected a let statement, got {stmt:?}"),
            })
            .collect::<Vec<_>>();
        let exp =
            vec![("x", "5".to_string()), ("y", "true".to_string()), ("foobar", "y".to_string())];
        assert_eq!(exp, got);
    }

    #[test]
    fn parse_let_renders_canonically() {
        let program = parse_ok("let total = a + b * -c;");
        assert_eq!(program.stmts[0].0.to_string(), "let total = (a + (b * (-c)));");
    }

    #[test]
    fn parse_return_statements() {
        let program = parse_ok("return 5; return 10; return add(1, 2);");
        let got = program.stmts.iter().map(|(stmt, _)| stmt.to_string()).collect::<Vec<_>>();
        assert_eq!(got, vec!["return 5;", "return 10;", "return add(1, 2);"]);
    }

    #[test]
    fn parse_literals() {
        assert_eq!(
            parse_expr("foobar;"),
            Expr::Identifier(ExprIdentifier { name: "foobar".to_string() })
        );
        assert_eq!(parse_expr("5;"), Expr::Literal(ExprLiteral::Int(5)));
        assert_eq!(parse_expr("true;"), Expr::Literal(ExprLiteral::Bool(true)));
        assert_eq!(parse_expr("false"), Expr::Literal(ExprLiteral::Bool(false)));
    }

    #[test]
    fn parse_prefix_expressions() {
        for (source, op, value) in [("!5;", OpPrefix::Not, 5), ("-15;", OpPrefix::Negate, 15)] {
            let exp = Expr::Prefix(Box::new(ExprPrefix {
                op,
                rt: (Expr::Literal(ExprLiteral::Int(value)), 1..source.len() - 1),
            }));
            assert_eq!(parse_expr(source), exp);
        }
    }

    #[test]
    fn parse_infix_spans() {
        let program = parse_ok("1 + 22;");
        let (stmt, span) = &program.stmts[0];
        assert_eq!(span, &(0..7));
        match stmt {
            Stmt::Expr(StmtExpr { value: (Expr::Infix(infix), span) }) => {
                assert_eq!(span, &(0..6));
                assert_eq!(infix.lt.1, 0..1);
                assert_eq!(infix.rt.1, 4..6);
            }
            stmt => panic!("expected an infix expression, got {stmt:?}"),
        }
    }

    #[test]
    fn parse_operator_precedence() {
        let cases = [
            ("1 + 2 * 3;", "(1 + (2 * 3))"),
            ("(1 + 2) * 3;", "((1 + 2) * 3)"),
            ("-a * b", "((-a) * b)"),
            ("!-a", "(!(-a))"),
            ("a + b + c", "((a + b) + c)"),
            ("a + b - c", "((a + b) - c)"),
            ("a * b * c", "((a * b) * c)"),
            ("a * b / c", "((a * b) / c)"),
            ("a + b / c", "(a + (b / c))"),
            ("a + b * c + d / e - f", "(((a + (b * c)) + (d / e)) - f)"),
            ("5 > 4 == 3 < 4", "((5 > 4) == (3 < 4))"),
            ("5 < 4 != 3 > 4", "((5 < 4) != (3 > 4))"),
            ("a <= b >= c", "((a <= b) >= c)"),
            ("3 + 4 * 5 == 3 * 1 + 4 * 5", "((3 + (4 * 5)) == ((3 * 1) + (4 * 5)))"),
            ("3 > 5 == false", "((3 > 5) == false)"),
            ("1 + (2 + 3) + 4", "((1 + (2 + 3)) + 4)"),
            ("-(5 + 5)", "(-(5 + 5))"),
            ("!(true == true)", "(!(true == true))"),
            ("a + add(b * c) + d", "((a + add((b * c))) + d)"),
            (
                "add(a, b, 1, 2 * 3, 4 + 5, add(6, 7 * 8))",
                "add(a, b, 1, (2 * 3), (4 + 5), add(6, (7 * 8)))",
            ),
            ("add(a + b + c * d / f + g)", "add((((a + b) + ((c * d) / f)) + g))"),
        ];
        for (source, exp) in cases {
            assert_eq!(parse_expr(source).to_string(), exp, "source: {source:?}");
        }
    }

    #[test]
    fn parse_if_expression() {
        match parse_expr("if (x < y) { x }") {
            Expr::If(if_) => {
                assert_eq!(if_.cond.0.to_string(), "(x < y)");
                assert_eq!(if_.then.to_string(), "{ x; }");
                assert_eq!(if_.else_, None);
            }
            expr => panic!("expected an if expression, got {expr:?}"),
        }
    }

    #[test]
    fn parse_if_else_expression() {
        let expr = parse_expr("if (x < y) { x } else { y; z }");
        assert_eq!(expr.to_string(), "if ((x < y)) { x; } else { y; z; }");
    }

    #[test]
    fn parse_function_literal() {
        match parse_expr("fn(x, y) { x + y; }") {
            Expr::Function(function) => {
                assert_eq!(function.params, vec!["x".to_string(), "y".to_string()]);
                assert_eq!(function.body.to_string(), "{ (x + y); }");
            }
            expr => panic!("expected a function literal, got {expr:?}"),
        }
    }

    #[test]
    fn parse_function_params() {
        for (source, exp) in [
            ("fn() {};", vec![]),
            ("fn(x) {};", vec!["x"]),
            ("fn(x, y, z) {};", vec!["x", "y", "z"]),
        ] {
            match parse_expr(source) {
                Expr::Function(function) => assert_eq!(function.params, exp),
                expr => panic!("expected a function literal, got {expr:?}"),
            }
        }
    }

    #[test]
    fn parse_call_expression() {
        match parse_expr("add(1, 2 * 3, 4 + 5);") {
            Expr::Call(call) => {
                assert_eq!(call.callee.0.to_string(), "add");
                let args = call.args.iter().map(|(arg, _)| arg.to_string()).collect::<Vec<_>>();
                assert_eq!(args, vec!["1", "(2 * 3)", "(4 + 5)"]);
            }
            expr => panic!("expected a call, got {expr:?}"),
        }
    }

    #[test]
    fn parse_immediately_invoked_function() {
        assert_eq!(parse_expr("fn(x) { x; }(5)").to_string(), "fn(x) { x; }(5)");
    }

    #[test]
    fn parse_from_token_vec() {
        let tokens = vec![
            Token::new(TokenKind::Int, "1", 0..1),
            Token::new(TokenKind::Plus, "+", 2..3),
            Token::new(TokenKind::Int, "2", 4..5),
            Token::new(TokenKind::Asterisk, "*", 6..7),
            Token::new(TokenKind::Int, "3", 8..9),
            Token::eof(9),
        ];
        let mut parser = Parser::new(tokens.into_iter());
        let program = parser.parse_program();
        assert!(parser.errors().is_empty());
        assert_eq!(program.to_string(), "(1 + (2 * 3));");
    }

    #[test]
    fn missing_assign_recovers() {
        let (program, errors) = parse("let x 5; let y = 10;");
        assert_eq!(messages(&errors), vec![
            "SyntaxError: expected next token to be `=`, got integer instead"
        ]);
        assert_eq!(errors[0].1, 6..7);
        assert_eq!(program.to_string(), "let y = 10;");
    }

    #[test]
    fn errors_accumulate_across_statements() {
        let (program, errors) = parse("let = 5; let y 1; return 3;");
        assert_eq!(messages(&errors), vec![
            "SyntaxError: expected next token to be identifier, got `=` instead",
            "SyntaxError: expected next token to be `=`, got integer instead",
        ]);
        assert_eq!(program.to_string(), "return 3;");
    }

    #[test]
    fn no_prefix_parse_fn() {
        let (program, errors) = parse("+5; 6;");
        assert_eq!(messages(&errors), vec!["SyntaxError: no prefix parse function for `+` found"]);
        assert_eq!(program.to_string(), "6;");
    }

    #[test]
    fn illegal_input() {
        let (_, errors) = parse("let x = @foo;");
        assert_eq!(messages(&errors), vec![r#"SyntaxError: unexpected input "@foo""#]);
        assert_eq!(errors[0].1, 8..12);
    }

    #[test]
    fn integer_out_of_range() {
        let (_, errors) = parse("99999999999999999999;");
        assert_eq!(messages(&errors), vec![
            r#"SyntaxError: could not parse "99999999999999999999" as an integer"#
        ]);
    }

    #[test]
    fn missing_closing_paren() {
        let (_, errors) = parse("(1 + 2; 3;");
        assert_eq!(messages(&errors), vec![
            "SyntaxError: expected next token to be `)`, got `;` instead"
        ]);
    }

    #[test]
    fn unterminated_block() {
        let (_, errors) = parse("if (true) { 1;");
        assert_eq!(messages(&errors), vec![
            "SyntaxError: expected next token to be `}`, got end of input instead"
        ]);
    }

    #[test]
    fn error_inside_block_keeps_block() {
        let (program, errors) = parse("if (x) { 1 + } 5;");
        assert_eq!(messages(&errors), vec!["SyntaxError: no prefix parse function for `}` found"]);
        assert_eq!(program.to_string(), "if (x) { }; 5;");
    }

    #[test]
    fn deep_nesting_is_reported() {
        let source = format!("{}1{};", "(".repeat(1000), ")".repeat(1000));
        let (_, errors) = parse(&source);
        assert_eq!(messages(&errors), vec![format!(
            "OverflowError: expression nested deeper than {MAX_NESTING} levels"
        )]);
    }

    #[test]
    fn long_infix_chain_is_reported() {
        let source = format!("{}1;", "1 + ".repeat(100_000));
        let (program, errors) = parse(&source);
        assert_eq!(program.stmts.len(), 0);
        assert_eq!(messages(&errors), vec![format!(
            "OverflowError: expression nested deeper than {MAX_NESTING} levels"
        )]);
    }

    #[test]
    fn long_call_chain_is_reported() {
        let source = format!("f{}; 5;", "()".repeat(100_000));
        let (program, errors) = parse(&source);
        assert_eq!(program.to_string(), "5;");
        assert_eq!(messages(&errors), vec![format!(
            "OverflowError: expression nested deeper than {MAX_NESTING} levels"
        )]);
    }

    #[test]
    fn chain_below_limit_parses() {
        let source = format!("{}1;", "1 + ".repeat(MAX_NESTING / 2));
        let program = parse_ok(&source);
        assert_eq!(program.stmts.len(), 1);
    }

    #[test]
    fn canonical_rendering_is_a_fixed_point() {
        let sources = [
            "a + b * c - -d / e",
            "!(a == b) != (c <= d)",
            "if (a > b) { let c = a; return c; } else { b }",
            "let f = fn(x, y) { if (x) { y } }; f(1, 2 * 3)(4)",
            "fn() { }()",
        ];
        for source in sources {
            let once = parse_ok(source).to_string();
            let twice = parse_ok(&once).to_string();
            assert_eq!(once, twice, "source: {source:?}");
        }
    }
}
