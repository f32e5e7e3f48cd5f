use std::str::Chars;
use crate::FoamError;

mod scanner;
mod tokenizer;

#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    // --- literals ---
    Word(String),
    Number(String),
    Quoted(String),
    Macro(String),

    // --- directives & verbatim blocks ---
    Directive(String),
    Code(String),
    Expr { directive: String, body: String },

    // --- structure ---
    LBrace,
    RBrace,
    LParen,
    RParen,
    LBracket,
    RBracket,
    Semicolon,
    Comma,
    Equals,

    // --- layout ---
    Newline,
    Eof,
}

/// A token together with where it starts (1-based line/column) and its byte range.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    pub token: Token,
    pub line: usize,
    pub column: usize,
    pub start: usize,
    pub end: usize,
}

impl Spanned {
    /// Source text a leaf token stands for, used for keys and names.
    pub fn text(&self) -> String {
        match &self.token {
            Token::Word(s) | Token::Number(s) | Token::Macro(s) | Token::Directive(s) => s.clone(),
            Token::Quoted(s) => format!("\"{}\"", s),
            Token::Code(s) => format!("#{{{}#}}", s),
            Token::Expr { directive, body } => format!("{}{}", directive, body),
            other => format!("{:?}", other),
        }
    }
}

pub struct Lexer<'a> {
    src: &'a str,
    input: Chars<'a>,
    peek: Option<char>,
    offset: usize,
    line: usize,
    column: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        let mut lexer = Lexer {
            src: input,
            input: input.chars(),
            peek: None,
            offset: 0,
            line: 1,
            column: 0,
        };
        lexer.peek = lexer.input.next();
        lexer
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn column(&self) -> usize {
        self.column
    }

    /// Captures a `/* ... */` banner if it is the first thing in the input.
    ///
    /// Must be called before the first `next_token`.
    pub fn take_banner(&mut self) -> Result<Option<String>, FoamError> {
        tokenizer::take_banner(self)
    }

    /// Next token; newlines are reported, other whitespace and comments are skipped.
    pub fn next_token(&mut self) -> Result<Spanned, FoamError> {
        tokenizer::next_token(self)
    }
}

#[cfg(test)]
mod tests;
