//! Recursive-descent parser: token stream to AST.
//!
//! Grounded on `seq-compiler::parser::Parser`'s token-cursor style
//! (`tokens: Vec<Token>`, `pos: usize`, `advance`/`check`/`consume` helpers)
//! but built as a classic precedence-climbing expression parser rather than
//! the teacher's line-oriented stack-word grammar, since BMinor is a
//! conventional curly-brace imperative language.
//!
//! Error recovery is deliberately unsophisticated per spec §4.4: on a syntax
//! error we report once (offending token + line) through the shared
//! [`Diagnostics`] handle and skip past the bad token, rather than trying to
//! resynchronize to a statement boundary.

use crate::ast::{
    ArrayDecl, Block, Decl, Expr, ExprKind, FuncDecl, Item, Param, Program, Stmt, VarDecl,
};
use crate::diagnostics::Diagnostics;
use crate::lexer::{Lexer, Token, TokenKind};
use crate::types::{BinOp, Type, UnOp};

pub struct Parser<'d> {
    tokens: Vec<Token>,
    pos: usize,
    diags: &'d mut Diagnostics,
}

impl<'d> Parser<'d> {
    pub fn new(source: &str, diags: &'d mut Diagnostics) -> Self {
        let tokens = Lexer::new(source).tokenize(diags);
        Parser {
            tokens,
            pos: 0,
            diags,
        }
    }

    pub fn parse_program(&mut self) -> Program {
        let mut items = Vec::new();
        while !self.is_at_end() {
            items.push(self.parse_item());
        }
        Program { items }
    }

    // ---- token cursor helpers ----------------------------------------

    fn current(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn current_line(&self) -> u32 {
        self.current().line
    }

    fn is_at_end(&self) -> bool {
        matches!(self.current().kind, TokenKind::Eof)
    }

    fn advance(&mut self) -> Token {
        let tok = self.current().clone();
        if !self.is_at_end() {
            self.pos += 1;
        }
        tok
    }

    fn check_kind(&self, kind: &TokenKind) -> bool {
        std::mem::discriminant(&self.current().kind) == std::mem::discriminant(kind)
    }

    fn check_at(&self, offset: usize, kind: &TokenKind) -> bool {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        std::mem::discriminant(&self.tokens[idx].kind) == std::mem::discriminant(kind)
    }

    /// Consume the current token if it matches `kind`; otherwise report one
    /// diagnostic naming the offending token and skip past it.
    fn consume(&mut self, kind: TokenKind) -> bool {
        if self.check_kind(&kind) {
            self.advance();
            true
        } else {
            let tok = self.current().clone();
            self.diags.report_at(
                format!("unexpected token '{}'", describe(&tok.kind)),
                tok.line,
            );
            self.advance();
            false
        }
    }

    fn advance_ident(&mut self) -> String {
        if let TokenKind::Ident(name) = self.current().kind.clone() {
            self.advance();
            name
        } else {
            let tok = self.current().clone();
            self.diags
                .report_at("expected an identifier".to_string(), tok.line);
            self.advance();
            String::from("<error>")
        }
    }

    // ---- top level -----------------------------------------------------

    fn is_decl_start(&self) -> bool {
        matches!(self.current().kind, TokenKind::Ident(_))
            && self.check_at(1, &TokenKind::Colon)
    }

    fn parse_item(&mut self) -> Item {
        if self.is_decl_start() {
            Item::Decl(self.parse_decl())
        } else {
            Item::Stmt(self.parse_stmt())
        }
    }

    fn parse_decl(&mut self) -> Decl {
        let line = self.current_line();
        let name = self.advance_ident();
        self.consume(TokenKind::Colon);
        match self.current().kind {
            TokenKind::Array => Decl::Array(self.parse_array_decl(name, line)),
            TokenKind::Function => Decl::Func(self.parse_func_decl(name, line)),
            _ => Decl::Var(self.parse_var_decl(name, line)),
        }
    }

    fn parse_var_decl(&mut self, name: String, line: u32) -> VarDecl {
        let ty = self.parse_primitive_type();
        let init = if self.check_kind(&TokenKind::Assign) {
            self.advance();
            Some(self.parse_expr())
        } else {
            None
        };
        self.consume(TokenKind::Semi);
        VarDecl {
            name,
            ty,
            init,
            line,
        }
    }

    fn parse_array_decl(&mut self, name: String, line: u32) -> ArrayDecl {
        self.consume(TokenKind::Array);
        self.consume(TokenKind::LBracket);
        let dim_expr = self.parse_expr();
        self.consume(TokenKind::RBracket);
        let mut dims_written = 1usize;
        // The grammar tolerates additional dimension groups; the checker
        // rejects anything beyond one (spec §4.6 item 2).
        while self.check_kind(&TokenKind::LBracket) {
            self.advance();
            let _ = self.parse_expr();
            self.consume(TokenKind::RBracket);
            dims_written += 1;
        }
        let elem_ty = self.parse_primitive_type();
        let (size, size_is_positive_literal) = match *dim_expr.kind {
            ExprKind::IntLit(v) if v > 0 => (v as u32, true),
            _ => (0, false),
        };
        let init = if self.check_kind(&TokenKind::Assign) {
            self.advance();
            self.consume(TokenKind::LBrace);
            let elems = self.parse_expr_list(&TokenKind::RBrace);
            self.consume(TokenKind::RBrace);
            Some(elems)
        } else {
            None
        };
        self.consume(TokenKind::Semi);
        ArrayDecl {
            name,
            elem_ty,
            dims_written,
            size,
            size_is_positive_literal,
            init,
            line,
        }
    }

    fn parse_func_decl(&mut self, name: String, line: u32) -> FuncDecl {
        self.consume(TokenKind::Function);
        let ret_ty = self.parse_primitive_type();
        self.consume(TokenKind::LParen);
        let params = self.parse_param_list();
        self.consume(TokenKind::RParen);
        self.consume(TokenKind::Assign);
        let body = self.parse_block();
        FuncDecl {
            name,
            ret_ty,
            params,
            body,
            line,
        }
    }

    fn parse_param_list(&mut self) -> Vec<Param> {
        let mut params = Vec::new();
        if self.check_kind(&TokenKind::RParen) {
            return params;
        }
        loop {
            params.push(self.parse_param());
            if self.check_kind(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        params
    }

    fn parse_param(&mut self) -> Param {
        let line = self.current_line();
        let name = self.advance_ident();
        self.consume(TokenKind::Colon);
        if self.check_kind(&TokenKind::Array) {
            self.advance();
            self.consume(TokenKind::LBracket);
            let mut dims_written = 1usize;
            if !self.check_kind(&TokenKind::RBracket) {
                let _ = self.parse_expr();
            }
            self.consume(TokenKind::RBracket);
            while self.check_kind(&TokenKind::LBracket) {
                self.advance();
                if !self.check_kind(&TokenKind::RBracket) {
                    let _ = self.parse_expr();
                }
                self.consume(TokenKind::RBracket);
                dims_written += 1;
            }
            let elem_ty = self.parse_primitive_type();
            Param::Array {
                name,
                elem_ty,
                dims_written,
                line,
            }
        } else {
            let ty = self.parse_primitive_type();
            Param::Var { name, ty, line }
        }
    }

    fn parse_primitive_type(&mut self) -> Type {
        match self.current().kind {
            TokenKind::Integer => {
                self.advance();
                Type::Integer
            }
            TokenKind::Boolean => {
                self.advance();
                Type::Boolean
            }
            TokenKind::Float => {
                self.advance();
                Type::Float
            }
            TokenKind::Char => {
                self.advance();
                Type::Char
            }
            TokenKind::StringKw => {
                self.advance();
                Type::String
            }
            TokenKind::Void => {
                self.advance();
                Type::Void
            }
            _ => {
                let tok = self.current().clone();
                self.diags
                    .report_at(format!("expected a type, found '{}'", describe(&tok.kind)), tok.line);
                self.advance();
                Type::Void
            }
        }
    }

    fn parse_expr_list(&mut self, terminator: &TokenKind) -> Vec<Expr> {
        let mut out = Vec::new();
        if self.check_kind(terminator) {
            return out;
        }
        loop {
            out.push(self.parse_expr());
            if self.check_kind(&TokenKind::Comma) {
                self.advance();
                continue;
            }
            break;
        }
        out
    }

    // ---- statements ------------------------------------------------------

    fn parse_block(&mut self) -> Block {
        self.consume(TokenKind::LBrace);
        let mut stmts = Vec::new();
        while !self.check_kind(&TokenKind::RBrace) && !self.is_at_end() {
            stmts.push(self.parse_stmt());
        }
        self.consume(TokenKind::RBrace);
        Block::new(stmts)
    }

    /// Normalize a single statement or a `{ ... }` block to a `Block`, per
    /// the parse-time normalization invariant in spec §3.2/§4.4.
    fn parse_body_as_block(&mut self) -> Block {
        if self.check_kind(&TokenKind::LBrace) {
            self.parse_block()
        } else {
            let stmt = self.parse_stmt();
            Block::new(vec![stmt])
        }
    }

    fn parse_stmt(&mut self) -> Stmt {
        match self.current().kind {
            TokenKind::LBrace => Stmt::Block(self.parse_block()),
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Do => self.parse_do_while(),
            TokenKind::For => self.parse_for(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Print => self.parse_print(),
            _ if self.is_decl_start() => match self.parse_decl() {
                Decl::Var(v) => Stmt::VarDecl(v),
                Decl::Array(a) => Stmt::ArrayDecl(a),
                Decl::Func(f) => {
                    self.diags.report_at(
                        format!("nested function declaration '{}' is not supported", f.name),
                        f.line,
                    );
                    Stmt::Block(Block::default())
                }
            },
            _ => self.parse_simple_stmt_with_semi(),
        }
    }

    fn parse_if(&mut self) -> Stmt {
        let line = self.current_line();
        self.consume(TokenKind::If);
        self.consume(TokenKind::LParen);
        let cond = self.parse_expr();
        self.consume(TokenKind::RParen);
        let then_block = self.parse_body_as_block();
        let else_block = if self.check_kind(&TokenKind::Else) {
            self.advance();
            Some(self.parse_body_as_block())
        } else {
            None
        };
        Stmt::If {
            cond,
            then_block,
            else_block,
            line,
        }
    }

    fn parse_while(&mut self) -> Stmt {
        let line = self.current_line();
        self.consume(TokenKind::While);
        self.consume(TokenKind::LParen);
        let cond = self.parse_expr();
        self.consume(TokenKind::RParen);
        let body = self.parse_body_as_block();
        Stmt::While { cond, body, line }
    }

    fn parse_do_while(&mut self) -> Stmt {
        let line = self.current_line();
        self.consume(TokenKind::Do);
        let body = self.parse_body_as_block();
        self.consume(TokenKind::While);
        self.consume(TokenKind::LParen);
        let cond = self.parse_expr();
        self.consume(TokenKind::RParen);
        self.consume(TokenKind::Semi);
        Stmt::DoWhile { body, cond, line }
    }

    /// Handles both the canonical `for (init; cond; update) body` form and
    /// the `for i in range(a, b) { ... }` sugar, desugared here to the
    /// canonical form (spec §4.4, Open Question resolved in DESIGN.md).
    fn parse_for(&mut self) -> Stmt {
        let line = self.current_line();
        self.consume(TokenKind::For);

        if matches!(self.current().kind, TokenKind::Ident(_)) && self.check_at(1, &TokenKind::In) {
            return self.parse_for_range_sugar(line);
        }

        self.consume(TokenKind::LParen);
        let init = if self.check_kind(&TokenKind::Semi) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()))
        };
        self.consume(TokenKind::Semi);
        let cond = if self.check_kind(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.consume(TokenKind::Semi);
        let update = if self.check_kind(&TokenKind::RParen) {
            None
        } else {
            Some(Box::new(self.parse_simple_stmt()))
        };
        self.consume(TokenKind::RParen);
        let body = self.parse_body_as_block();
        Stmt::For {
            init,
            cond,
            update,
            body,
            line,
        }
    }

    fn parse_for_range_sugar(&mut self, line: u32) -> Stmt {
        let var_name = self.advance_ident();
        self.consume(TokenKind::In);
        self.consume(TokenKind::Range);
        self.consume(TokenKind::LParen);
        let lo = self.parse_expr();
        self.consume(TokenKind::Comma);
        let hi = self.parse_expr();
        self.consume(TokenKind::RParen);
        let body = self.parse_body_as_block();

        let init = Stmt::Assign {
            location: Expr::new(ExprKind::VarLoc(var_name.clone()), line),
            expr: lo,
            line,
        };
        let cond = Expr::new(
            ExprKind::BinOp {
                op: BinOp::Lt,
                l: Expr::new(ExprKind::VarLoc(var_name.clone()), line),
                r: hi,
            },
            line,
        );
        let update = Stmt::ExprStmt {
            expr: Expr::new(
                ExprKind::PreInc(Expr::new(ExprKind::VarLoc(var_name), line)),
                line,
            ),
            line,
        };
        Stmt::For {
            init: Some(Box::new(init)),
            cond: Some(cond),
            update: Some(Box::new(update)),
            body,
            line,
        }
    }

    fn parse_return(&mut self) -> Stmt {
        let line = self.current_line();
        self.consume(TokenKind::Return);
        let expr = if self.check_kind(&TokenKind::Semi) {
            None
        } else {
            Some(self.parse_expr())
        };
        self.consume(TokenKind::Semi);
        Stmt::Return { expr, line }
    }

    fn parse_print(&mut self) -> Stmt {
        let line = self.current_line();
        self.consume(TokenKind::Print);
        let expr = self.parse_expr();
        self.consume(TokenKind::Semi);
        Stmt::Print { expr, line }
    }

    fn parse_simple_stmt_with_semi(&mut self) -> Stmt {
        let stmt = self.parse_simple_stmt();
        self.consume(TokenKind::Semi);
        stmt
    }

    /// An assignment or a bare expression statement, without consuming a
    /// trailing `;` -- used directly for `for` loop init/update clauses and
    /// wrapped with a `;` for ordinary statements.
    fn parse_simple_stmt(&mut self) -> Stmt {
        let line = self.current_line();
        let expr = self.parse_expr();
        if self.check_kind(&TokenKind::Assign) {
            self.advance();
            let rhs = self.parse_expr();
            Stmt::Assign {
                location: expr,
                expr: rhs,
                line,
            }
        } else {
            Stmt::ExprStmt { expr, line }
        }
    }

    // ---- expressions: precedence climbing -------------------------------
    // lowest -> highest: || ; && ; == != ; < <= > >= ; + - ; * / % ; unary ; postfix

    fn parse_expr(&mut self) -> Expr {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Expr {
        let mut left = self.parse_and();
        while self.check_kind(&TokenKind::OrOr) {
            let line = self.current_line();
            self.advance();
            let right = self.parse_and();
            left = Expr::new(
                ExprKind::BinOp {
                    op: BinOp::Or,
                    l: left,
                    r: right,
                },
                line,
            );
        }
        left
    }

    fn parse_and(&mut self) -> Expr {
        let mut left = self.parse_equality();
        while self.check_kind(&TokenKind::AndAnd) {
            let line = self.current_line();
            self.advance();
            let right = self.parse_equality();
            left = Expr::new(
                ExprKind::BinOp {
                    op: BinOp::And,
                    l: left,
                    r: right,
                },
                line,
            );
        }
        left
    }

    fn parse_equality(&mut self) -> Expr {
        let mut left = self.parse_relational();
        loop {
            let op = match self.current().kind {
                TokenKind::EqEq => BinOp::Eq,
                TokenKind::Ne => BinOp::Ne,
                _ => break,
            };
            let line = self.current_line();
            self.advance();
            let right = self.parse_relational();
            left = Expr::new(ExprKind::BinOp { op, l: left, r: right }, line);
        }
        left
    }

    fn parse_relational(&mut self) -> Expr {
        let mut left = self.parse_additive();
        loop {
            let op = match self.current().kind {
                TokenKind::Lt => BinOp::Lt,
                TokenKind::Le => BinOp::Le,
                TokenKind::Gt => BinOp::Gt,
                TokenKind::Ge => BinOp::Ge,
                _ => break,
            };
            let line = self.current_line();
            self.advance();
            let right = self.parse_additive();
            left = Expr::new(ExprKind::BinOp { op, l: left, r: right }, line);
        }
        left
    }

    fn parse_additive(&mut self) -> Expr {
        let mut left = self.parse_multiplicative();
        loop {
            let op = match self.current().kind {
                TokenKind::Plus => BinOp::Add,
                TokenKind::Minus => BinOp::Sub,
                _ => break,
            };
            let line = self.current_line();
            self.advance();
            let right = self.parse_multiplicative();
            left = Expr::new(ExprKind::BinOp { op, l: left, r: right }, line);
        }
        left
    }

    fn parse_multiplicative(&mut self) -> Expr {
        let mut left = self.parse_unary();
        loop {
            let op = match self.current().kind {
                TokenKind::Star => BinOp::Mul,
                TokenKind::Slash => BinOp::Div,
                TokenKind::Percent => BinOp::Mod,
                _ => break,
            };
            let line = self.current_line();
            self.advance();
            let right = self.parse_unary();
            left = Expr::new(ExprKind::BinOp { op, l: left, r: right }, line);
        }
        left
    }

    fn parse_unary(&mut self) -> Expr {
        let line = self.current_line();
        match self.current().kind {
            TokenKind::Bang => {
                self.advance();
                let x = self.parse_unary();
                Expr::new(ExprKind::UnaryOp { op: UnOp::Not, x }, line)
            }
            TokenKind::Minus => {
                self.advance();
                let x = self.parse_unary();
                Expr::new(ExprKind::UnaryOp { op: UnOp::Neg, x }, line)
            }
            TokenKind::Plus => {
                self.advance();
                let x = self.parse_unary();
                Expr::new(ExprKind::UnaryOp { op: UnOp::Plus, x }, line)
            }
            TokenKind::Caret => {
                self.advance();
                let x = self.parse_unary();
                Expr::new(ExprKind::UnaryOp { op: UnOp::Caret, x }, line)
            }
            TokenKind::PlusPlus => {
                self.advance();
                let x = self.parse_unary();
                Expr::new(ExprKind::PreInc(x), line)
            }
            TokenKind::MinusMinus => {
                self.advance();
                let x = self.parse_unary();
                Expr::new(ExprKind::PreDec(x), line)
            }
            _ => self.parse_postfix(),
        }
    }

    fn parse_postfix(&mut self) -> Expr {
        let mut expr = self.parse_primary();
        loop {
            let line = self.current_line();
            match self.current().kind {
                TokenKind::PlusPlus => {
                    self.advance();
                    expr = Expr::new(ExprKind::PostInc(expr), line);
                }
                TokenKind::MinusMinus => {
                    self.advance();
                    expr = Expr::new(ExprKind::PostDec(expr), line);
                }
                _ => break,
            }
        }
        expr
    }

    fn parse_primary(&mut self) -> Expr {
        let line = self.current_line();
        match self.current().kind.clone() {
            TokenKind::IntLit(v) => {
                self.advance();
                Expr::new(ExprKind::IntLit(v), line)
            }
            TokenKind::FloatLit(v) => {
                self.advance();
                Expr::new(ExprKind::FloatLit(v), line)
            }
            TokenKind::CharLit(v) => {
                self.advance();
                Expr::new(ExprKind::CharLit(v), line)
            }
            TokenKind::StringLit(s) => {
                self.advance();
                Expr::new(ExprKind::StringLit(s), line)
            }
            TokenKind::BoolLit(b) => {
                self.advance();
                Expr::new(ExprKind::BoolLit(b), line)
            }
            TokenKind::LParen => {
                self.advance();
                let inner = self.parse_expr();
                self.consume(TokenKind::RParen);
                inner
            }
            TokenKind::LBrace => {
                self.advance();
                let elems = self.parse_expr_list(&TokenKind::RBrace);
                self.consume(TokenKind::RBrace);
                Expr::new(ExprKind::ArrayLit(elems), line)
            }
            TokenKind::Ident(name) => {
                self.advance();
                if self.check_kind(&TokenKind::LParen) {
                    self.advance();
                    let args = self.parse_expr_list(&TokenKind::RParen);
                    self.consume(TokenKind::RParen);
                    Expr::new(ExprKind::Call { name, args }, line)
                } else if self.check_kind(&TokenKind::LBracket) {
                    let mut indices = Vec::new();
                    while self.check_kind(&TokenKind::LBracket) {
                        self.advance();
                        indices.push(self.parse_expr());
                        self.consume(TokenKind::RBracket);
                    }
                    Expr::new(ExprKind::ArrayLoc { name, indices }, line)
                } else {
                    Expr::new(ExprKind::VarLoc(name), line)
                }
            }
            ref other => {
                let kind = other.clone();
                self.diags
                    .report_at(format!("unexpected token '{}' in expression", describe(&kind)), line);
                self.advance();
                Expr::new(ExprKind::IntLit(0), line)
            }
        }
    }
}

fn describe(kind: &TokenKind) -> String {
    match kind {
        TokenKind::Ident(s) => s.clone(),
        TokenKind::IntLit(v) => v.to_string(),
        TokenKind::FloatLit(v) => v.to_string(),
        TokenKind::StringLit(s) => format!("\"{}\"", s),
        TokenKind::CharLit(c) => format!("'{}'", *c as char),
        TokenKind::Eof => "<end of input>".to_string(),
        other => format!("{:?}", other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(src: &str) -> (Program, Diagnostics) {
        let mut diags = Diagnostics::new();
        let program = Parser::new(src, &mut diags).parse_program();
        (program, diags)
    }

    #[test]
    fn parses_var_decl_with_initializer() {
        let (program, diags) = parse("a: integer = 0;");
        assert_eq!(diags.count(), 0);
        assert_eq!(program.items.len(), 1);
        match &program.items[0] {
            Item::Decl(Decl::Var(v)) => {
                assert_eq!(v.name, "a");
                assert_eq!(v.ty, Type::Integer);
                assert!(v.init.is_some());
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn parses_function_with_params_and_return() {
        let (program, diags) = parse("add: function integer (x: integer, y: integer) = { return x + y; }");
        assert_eq!(diags.count(), 0);
        match &program.items[0] {
            Item::Decl(Decl::Func(f)) => {
                assert_eq!(f.name, "add");
                assert_eq!(f.params.len(), 2);
                assert_eq!(f.body.stmts.len(), 1);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn if_without_else_normalizes_branches_to_blocks() {
        let (program, diags) = parse("if (true) x = 1;");
        assert_eq!(diags.count(), 0);
        match &program.items[0] {
            Item::Stmt(Stmt::If { then_block, else_block, .. }) => {
                assert_eq!(then_block.stmts.len(), 1);
                assert!(else_block.is_none());
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn classic_for_loop_parses_all_three_clauses() {
        let (program, diags) = parse("for (i=0; i<3; ++i) sum = sum + i;");
        assert_eq!(diags.count(), 0);
        match &program.items[0] {
            Item::Stmt(Stmt::For { init, cond, update, body, .. }) => {
                assert!(init.is_some());
                assert!(cond.is_some());
                assert!(update.is_some());
                assert_eq!(body.stmts.len(), 1);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn range_sugar_desugars_to_classic_for() {
        let (program, diags) = parse("for i in range(0, 3) { print i; }");
        assert_eq!(diags.count(), 0);
        match &program.items[0] {
            Item::Stmt(Stmt::For { init, cond, update, .. }) => {
                assert!(matches!(init.as_deref(), Some(Stmt::Assign { .. })));
                assert!(matches!(
                    cond.as_ref().map(|c| &*c.kind),
                    Some(ExprKind::BinOp { op: BinOp::Lt, .. })
                ));
                assert!(matches!(update.as_deref(), Some(Stmt::ExprStmt { .. })));
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn array_decl_with_literal_size_and_initializer() {
        let (program, diags) = parse("arr: array[5] integer = {1,2,3,4,5};");
        assert_eq!(diags.count(), 0);
        match &program.items[0] {
            Item::Decl(Decl::Array(a)) => {
                assert_eq!(a.size, 5);
                assert!(a.size_is_positive_literal);
                assert_eq!(a.init.as_ref().unwrap().len(), 5);
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn expression_precedence_matches_spec_table() {
        // `&&` binds tighter than `||`, `+` binds tighter than `<`.
        let (program, diags) = parse("print a || b && c < d + e;");
        assert_eq!(diags.count(), 0);
        match &program.items[0] {
            Item::Stmt(Stmt::Print { expr, .. }) => {
                assert!(matches!(&*expr.kind, ExprKind::BinOp { op: BinOp::Or, .. }));
            }
            other => panic!("unexpected item: {other:?}"),
        }
    }

    #[test]
    fn syntax_error_reports_once_and_parser_keeps_going() {
        let (program, diags) = parse("a: integer = ;\nb: integer = 2;");
        assert!(diags.count() >= 1);
        // Still produced two top-level items despite the error.
        assert_eq!(program.items.len(), 2);
    }
}
