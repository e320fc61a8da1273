//! Hand-rolled scanner: source text to a token stream with line info.
//!
//! Grounded on `seq-compiler::parser::tokenize` -- a plain char-cursor
//! scanner, no external lexer-generator crate. Whitespace and comments are
//! discarded here rather than produced as tokens; the parser never sees them.

use crate::diagnostics::Diagnostics;

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    // Literals
    IntLit(i32),
    FloatLit(f64),
    CharLit(u8),
    StringLit(String),
    BoolLit(bool),

    // Identifier / keywords
    Ident(String),
    If,
    Else,
    While,
    Do,
    For,
    Return,
    Print,
    Function,
    Integer,
    Boolean,
    Float,
    Char,
    StringKw,
    Void,
    Array,
    In,
    Range,

    // Operators / punctuation
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    EqEq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    AndAnd,
    OrOr,
    Bang,
    PlusPlus,
    MinusMinus,
    Caret,
    Assign,
    Semi,
    Comma,
    LParen,
    RParen,
    LBrace,
    RBrace,
    LBracket,
    RBracket,
    Colon,
    FatArrow,

    Eof,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub line: u32,
}

const KEYWORDS: &[(&str, TokenKind)] = &[
    ("if", TokenKind::If),
    ("else", TokenKind::Else),
    ("while", TokenKind::While),
    ("do", TokenKind::Do),
    ("for", TokenKind::For),
    ("return", TokenKind::Return),
    ("print", TokenKind::Print),
    ("function", TokenKind::Function),
    ("integer", TokenKind::Integer),
    ("boolean", TokenKind::Boolean),
    ("float", TokenKind::Float),
    ("char", TokenKind::Char),
    ("string", TokenKind::StringKw),
    ("void", TokenKind::Void),
    ("array", TokenKind::Array),
    ("true", TokenKind::BoolLit(true)),
    ("false", TokenKind::BoolLit(false)),
    ("in", TokenKind::In),
    ("range", TokenKind::Range),
];

pub struct Lexer<'a> {
    source: &'a [u8],
    pos: usize,
    line: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str) -> Self {
        Lexer {
            source: source.as_bytes(),
            pos: 0,
            line: 1,
        }
    }

    /// Scan the entire source into a token stream terminated by `Eof`.
    /// Illegal characters are reported through `diags` and skipped one byte
    /// at a time, per spec §4.3.
    pub fn tokenize(mut self, diags: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            self.skip_whitespace_and_comments();
            let line = self.line;
            let Some(c) = self.peek() else {
                tokens.push(Token { kind: TokenKind::Eof, line });
                break;
            };

            let kind = if c.is_ascii_digit() {
                self.scan_number()
            } else if c == b'.' && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                self.scan_number()
            } else if is_ident_start(c) {
                self.scan_ident_or_keyword()
            } else if c == b'"' {
                match self.scan_string() {
                    Some(s) => TokenKind::StringLit(s),
                    None => {
                        diags.report_at("unterminated string literal", line);
                        continue;
                    }
                }
            } else if c == b'\'' {
                match self.scan_char() {
                    Some(ch) => TokenKind::CharLit(ch),
                    None => {
                        diags.report_at("unterminated character literal", line);
                        continue;
                    }
                }
            } else {
                match self.scan_operator() {
                    Some(kind) => kind,
                    None => {
                        diags.report_at(format!("Illegal character '{}'", c as char), line);
                        self.advance();
                        continue;
                    }
                }
            };

            tokens.push(Token { kind, line });
        }
        tokens
    }

    fn peek(&self) -> Option<u8> {
        self.source.get(self.pos).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<u8> {
        self.source.get(self.pos + offset).copied()
    }

    fn advance(&mut self) -> Option<u8> {
        let c = self.peek()?;
        self.pos += 1;
        if c == b'\n' {
            self.line += 1;
        }
        Some(c)
    }

    fn matches(&mut self, expect: u8) -> bool {
        if self.peek() == Some(expect) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn skip_whitespace_and_comments(&mut self) {
        loop {
            match self.peek() {
                Some(b' ') | Some(b'\t') | Some(b'\r') | Some(b'\n') => {
                    self.advance();
                }
                Some(b'/') if self.peek_at(1) == Some(b'/') => {
                    while let Some(c) = self.peek() {
                        if c == b'\n' {
                            break;
                        }
                        self.advance();
                    }
                }
                Some(b'/') if self.peek_at(1) == Some(b'*') => {
                    self.advance();
                    self.advance();
                    loop {
                        match self.peek() {
                            None => break,
                            Some(b'*') if self.peek_at(1) == Some(b'/') => {
                                self.advance();
                                self.advance();
                                break;
                            }
                            _ => {
                                self.advance();
                            }
                        }
                    }
                }
                _ => break,
            }
        }
    }

    /// Float literals MUST be attempted before integer literals, so that
    /// `3.14` is not split into `3`, `.`, `14` (spec §4.3).
    fn scan_number(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            self.advance();
        }
        let mut is_float = false;
        if self.peek() == Some(b'.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            is_float = true;
            self.advance();
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                self.advance();
            }
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
        if is_float {
            TokenKind::FloatLit(text.parse().unwrap_or(0.0))
        } else {
            TokenKind::IntLit(text.parse().unwrap_or(0))
        }
    }

    fn scan_ident_or_keyword(&mut self) -> TokenKind {
        let start = self.pos;
        while self.peek().is_some_and(is_ident_continue) {
            self.advance();
        }
        let text = std::str::from_utf8(&self.source[start..self.pos]).unwrap();
        for (kw, kind) in KEYWORDS {
            if *kw == text {
                return kind.clone();
            }
        }
        TokenKind::Ident(text.to_string())
    }

    fn scan_escape(&mut self) -> Option<u8> {
        let c = self.advance()?;
        Some(match c {
            b'n' => b'\n',
            b't' => b'\t',
            b'r' => b'\r',
            b'\\' => b'\\',
            b'\'' => b'\'',
            b'"' => b'"',
            other => other,
        })
    }

    fn scan_string(&mut self) -> Option<String> {
        self.advance(); // opening quote
        let mut out = Vec::new();
        loop {
            match self.peek() {
                None | Some(b'\n') => return None,
                Some(b'"') => {
                    self.advance();
                    break;
                }
                Some(b'\\') => {
                    self.advance();
                    out.push(self.scan_escape()?);
                }
                Some(c) => {
                    out.push(c);
                    self.advance();
                }
            }
        }
        Some(String::from_utf8_lossy(&out).into_owned())
    }

    fn scan_char(&mut self) -> Option<u8> {
        self.advance(); // opening quote
        let c = match self.peek() {
            Some(b'\\') => {
                self.advance();
                self.scan_escape()?
            }
            Some(c) => {
                self.advance();
                c
            }
            None => return None,
        };
        if self.peek() != Some(b'\'') {
            return None;
        }
        self.advance();
        Some(c)
    }

    fn scan_operator(&mut self) -> Option<TokenKind> {
        let c = self.advance()?;
        Some(match c {
            b'+' => {
                if self.matches(b'+') {
                    TokenKind::PlusPlus
                } else {
                    TokenKind::Plus
                }
            }
            b'-' => {
                if self.matches(b'-') {
                    TokenKind::MinusMinus
                } else {
                    TokenKind::Minus
                }
            }
            b'*' => TokenKind::Star,
            b'/' => TokenKind::Slash,
            b'%' => TokenKind::Percent,
            b'^' => TokenKind::Caret,
            b'=' => {
                if self.matches(b'=') {
                    TokenKind::EqEq
                } else if self.matches(b'>') {
                    TokenKind::FatArrow
                } else {
                    TokenKind::Assign
                }
            }
            b'!' => {
                if self.matches(b'=') {
                    TokenKind::Ne
                } else {
                    TokenKind::Bang
                }
            }
            b'<' => {
                if self.matches(b'=') {
                    TokenKind::Le
                } else {
                    TokenKind::Lt
                }
            }
            b'>' => {
                if self.matches(b'=') {
                    TokenKind::Ge
                } else {
                    TokenKind::Gt
                }
            }
            b'&' if self.matches(b'&') => TokenKind::AndAnd,
            b'|' if self.matches(b'|') => TokenKind::OrOr,
            b';' => TokenKind::Semi,
            b',' => TokenKind::Comma,
            b'(' => TokenKind::LParen,
            b')' => TokenKind::RParen,
            b'{' => TokenKind::LBrace,
            b'}' => TokenKind::RBrace,
            b'[' => TokenKind::LBracket,
            b']' => TokenKind::RBracket,
            b':' => TokenKind::Colon,
            _ => return None,
        })
    }
}

fn is_ident_start(c: u8) -> bool {
    c.is_ascii_alphabetic() || c == b'_'
}

fn is_ident_continue(c: u8) -> bool {
    c.is_ascii_alphanumeric() || c == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(src: &str) -> Vec<TokenKind> {
        let mut diags = Diagnostics::new();
        let toks = Lexer::new(src).tokenize(&mut diags);
        assert!(!diags.has_errors(), "unexpected diagnostics: {diags}");
        toks.into_iter().map(|t| t.kind).collect()
    }

    #[test]
    fn float_literal_not_split_by_integer_scan() {
        let kinds = kinds("3.14;");
        assert_eq!(kinds[0], TokenKind::FloatLit(3.14));
        assert_eq!(kinds[1], TokenKind::Semi);
    }

    #[test]
    fn integer_literal() {
        assert_eq!(kinds("42")[0], TokenKind::IntLit(42));
    }

    #[test]
    fn keywords_vs_identifiers() {
        assert_eq!(kinds("integer")[0], TokenKind::Integer);
        assert_eq!(kinds("integerish")[0], TokenKind::Ident("integerish".to_string()));
    }

    #[test]
    fn string_escapes() {
        let kinds = kinds(r#""a\nb\"c""#);
        assert_eq!(kinds[0], TokenKind::StringLit("a\nb\"c".to_string()));
    }

    #[test]
    fn char_escape() {
        assert_eq!(kinds(r"'\n'")[0], TokenKind::CharLit(b'\n'));
        assert_eq!(kinds("'x'")[0], TokenKind::CharLit(b'x'));
    }

    #[test]
    fn line_comments_and_block_comments_are_discarded() {
        let kinds = kinds("1 // comment\n/* block */ 2");
        assert_eq!(kinds[0], TokenKind::IntLit(1));
        assert_eq!(kinds[1], TokenKind::IntLit(2));
    }

    #[test]
    fn illegal_character_reports_and_advances() {
        let mut diags = Diagnostics::new();
        let toks = Lexer::new("1 @ 2").tokenize(&mut diags);
        assert_eq!(diags.count(), 1);
        let kinds: Vec<_> = toks.into_iter().map(|t| t.kind).collect();
        assert_eq!(kinds[0], TokenKind::IntLit(1));
        assert_eq!(kinds[1], TokenKind::IntLit(2));
    }

    #[test]
    fn operator_set() {
        let kinds = kinds("+ - * / % == != < <= > >= && || ! ++ -- = ; , ( ) { } [ ] : =>");
        assert_eq!(
            kinds,
            vec![
                TokenKind::Plus,
                TokenKind::Minus,
                TokenKind::Star,
                TokenKind::Slash,
                TokenKind::Percent,
                TokenKind::EqEq,
                TokenKind::Ne,
                TokenKind::Lt,
                TokenKind::Le,
                TokenKind::Gt,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Bang,
                TokenKind::PlusPlus,
                TokenKind::MinusMinus,
                TokenKind::Assign,
                TokenKind::Semi,
                TokenKind::Comma,
                TokenKind::LParen,
                TokenKind::RParen,
                TokenKind::LBrace,
                TokenKind::RBrace,
                TokenKind::LBracket,
                TokenKind::RBracket,
                TokenKind::Colon,
                TokenKind::FatArrow,
                TokenKind::Eof,
            ]
        );
    }
}
