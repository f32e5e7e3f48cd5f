use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::FoamError;
use crate::ast::{FoamInputFile, Node};
use crate::lexer::{Lexer, Spanned, Token};
use crate::transformer;

pub mod cst;
mod directive;
mod document;
mod value;

pub use cst::{CstFile, DictBlock, Item, Statement};

/// Grammar profile. `Advanced` accepts everything `Simple` does, with the same result,
/// plus rarer directive and macro forms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Grammar {
    #[default]
    Simple,
    Advanced,
}

impl FromStr for Grammar {
    type Err = FoamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simple" => Ok(Grammar::Simple),
            "advanced" => Ok(Grammar::Advanced),
            other => Err(FoamError::type_error(format!("Unknown grammar profile '{}'", other), 402)
                .with_hint("Expected 'simple' or 'advanced'")),
        }
    }
}

impl fmt::Display for Grammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Grammar::Simple => write!(f, "simple"),
            Grammar::Advanced => write!(f, "advanced"),
        }
    }
}

pub struct Parser<'a> {
    src: &'a str,
    lexer: Lexer<'a>,
    peek: Option<Spanned>,
    grammar: Grammar,
    banner: Option<String>,
}

impl<'a> Parser<'a> {
    /// Parser for a whole file; a leading `/* ... */` banner is kept aside.
    pub fn for_file(input: &'a str, grammar: Grammar) -> Result<Self, FoamError> {
        let mut lexer = Lexer::new(input);
        let banner = lexer.take_banner()?;
        Self::build(input, lexer, grammar, banner)
    }

    /// Parser for a value fragment such as `uniform (1 0 0)`.
    pub fn for_value(input: &'a str, grammar: Grammar) -> Result<Self, FoamError> {
        Self::build(input, Lexer::new(input), grammar, None)
    }

    fn build(src: &'a str, mut lexer: Lexer<'a>, grammar: Grammar, banner: Option<String>) -> Result<Self, FoamError> {
        let peek = Some(lexer.next_token()?);
        Ok(Parser {
            src,
            lexer,
            peek,
            grammar,
            banner,
        })
    }

    pub fn grammar(&self) -> Grammar {
        self.grammar
    }

    pub(crate) fn bump(&mut self) -> Result<Spanned, FoamError> {
        let curr = self.peek.take().ok_or_else(|| {
            FoamError::grammar("Unexpected end of input", self.lexer.line(), self.lexer.column(), 201)
        })?;
        self.peek = Some(self.lexer.next_token()?);
        Ok(curr)
    }

    pub(crate) fn peek(&self) -> Option<&Token> {
        self.peek.as_ref().map(|s| &s.token)
    }

    pub(crate) fn peek_spanned(&self) -> Option<&Spanned> {
        self.peek.as_ref()
    }

    pub(crate) fn expect(&mut self, expected: Token) -> Result<Spanned, FoamError> {
        if self.peek() != Some(&expected) {
            let found = self.peek().cloned().unwrap_or(Token::Eof);
            return Err(self.error(format!("Expected {:?}, got {:?}", expected, found), 202));
        }
        self.bump()
    }

    pub(crate) fn skip_newlines(&mut self) -> Result<(), FoamError> {
        while self.peek() == Some(&Token::Newline) {
            self.bump()?;
        }
        Ok(())
    }

    /// Grammar error located at the token under the cursor.
    pub(crate) fn error(&self, message: impl Into<String>, code: u32) -> FoamError {
        let (line, column) = self.position();
        FoamError::grammar(message, line, column, code)
    }

    pub(crate) fn position(&self) -> (usize, usize) {
        match &self.peek {
            Some(s) => (s.line, s.column),
            None => (self.lexer.line(), self.lexer.column()),
        }
    }

    /// Gate for productions only the advanced profile accepts.
    pub(crate) fn require_advanced(&self, what: &str) -> Result<(), FoamError> {
        match self.grammar {
            Grammar::Advanced => Ok(()),
            Grammar::Simple => Err(self
                .error(format!("{} is not part of the simple grammar", what), 209)
                .with_hint("Parse with the advanced grammar")),
        }
    }

    /// Source text between two tokens, both included.
    pub(crate) fn slice(&self, first: &Spanned, last: &Spanned) -> &'a str {
        &self.src[first.start..last.end]
    }

    pub fn parse_file(&mut self) -> Result<CstFile, FoamError> {
        document::parse_file(self)
    }

    pub fn parse_fragment(&mut self) -> Result<Vec<Item>, FoamError> {
        value::parse_fragment(self)
    }
}

/// Parses a file, trying the simple grammar first and the advanced one if that fails.
pub fn parse(text: &str) -> Result<FoamInputFile, FoamError> {
    match parse_with(text, Grammar::Simple) {
        Ok(tree) => Ok(tree),
        Err(simple_err) => {
            log::debug!("simple grammar rejected input ({}), retrying with advanced", simple_err);
            parse_with(text, Grammar::Advanced)
        }
    }
}

/// Parses a file with one grammar profile.
pub fn parse_with(text: &str, grammar: Grammar) -> Result<FoamInputFile, FoamError> {
    let cst = Parser::for_file(text, grammar)?.parse_file()?;
    transformer::transform_file(cst)
}

/// Parses a single value such as `uniform (1 0 0)` or `[0 2 -1 0 0 0 0] 1e-06`.
pub fn parse_value(text: &str, grammar: Grammar) -> Result<Node, FoamError> {
    let items = Parser::for_value(text, grammar)?.parse_fragment()?;
    transformer::fold_items(items, None)
}
