use crate::utils::{dedent, format_float};

mod dict;
mod dimension;

pub use dict::{Dict, List};
pub use dimension::{DimensionSet, UNIT_SYMBOLS};

/// Leaf values. Integers and floats stay distinct so that `2` and `2.0` survive a round trip.
#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Int(i64),
    Float(f64),
    Word(String),
    /// Contents of a double-quoted string, without the quotes.
    Quoted(String),
    /// `$name`, `${...}` or `${{ ... }}`, kept verbatim.
    Macro(String),
}

impl Scalar {
    pub fn as_text(&self) -> String {
        match self {
            Scalar::Int(n) => n.to_string(),
            Scalar::Float(x) => format_float(*x),
            Scalar::Word(s) | Scalar::Macro(s) => s.clone(),
            Scalar::Quoted(s) => format!("\"{}\"", s),
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Scalar::Int(n) => Some(*n as f64),
            Scalar::Float(x) => Some(*x),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Scalar(Scalar),
    Dict(Dict),
    CodeStream(CodeStream),
    List(List),
    Value(Value),
    Dimensions(DimensionSet),
    Code(Code),
    Directive(Directive),
    /// A bare `key;` entry.
    Empty,
}

impl Node {
    pub fn word(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Word(text.into()))
    }

    pub fn quoted(text: impl Into<String>) -> Self {
        Node::Scalar(Scalar::Quoted(text.into()))
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Node::Scalar(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Node::Dict(d) => Some(d),
            Node::CodeStream(c) => Some(&c.dict),
            _ => None,
        }
    }

    pub fn as_dict_mut(&mut self) -> Option<&mut Dict> {
        match self {
            Node::Dict(d) => Some(d),
            Node::CodeStream(c) => Some(&mut c.dict),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Node::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Node::Value(v) => Some(v),
            _ => None,
        }
    }

    pub fn is_empty_entry(&self) -> bool {
        matches!(self, Node::Empty)
    }
}

impl From<Scalar> for Node {
    fn from(s: Scalar) -> Self {
        Node::Scalar(s)
    }
}

impl From<i64> for Node {
    fn from(n: i64) -> Self {
        Node::Scalar(Scalar::Int(n))
    }
}

impl From<i32> for Node {
    fn from(n: i32) -> Self {
        Node::Scalar(Scalar::Int(n as i64))
    }
}

impl From<f64> for Node {
    fn from(x: f64) -> Self {
        Node::Scalar(Scalar::Float(x))
    }
}

impl From<&str> for Node {
    fn from(s: &str) -> Self {
        Node::word(s)
    }
}

impl From<String> for Node {
    fn from(s: String) -> Self {
        Node::word(s)
    }
}

impl From<Dict> for Node {
    fn from(d: Dict) -> Self {
        Node::Dict(d)
    }
}

impl From<List> for Node {
    fn from(l: List) -> Self {
        Node::List(l)
    }
}

impl From<Value> for Node {
    fn from(v: Value) -> Self {
        Node::Value(v)
    }
}

impl From<DimensionSet> for Node {
    fn from(d: DimensionSet) -> Self {
        Node::Dimensions(d)
    }
}

impl From<Code> for Node {
    fn from(c: Code) -> Self {
        Node::Code(c)
    }
}

impl From<CodeStream> for Node {
    fn from(c: CodeStream) -> Self {
        Node::CodeStream(c)
    }
}

impl From<Directive> for Node {
    fn from(d: Directive) -> Self {
        Node::Directive(d)
    }
}

/// A payload with an optional leading name (`uniform`, `nu`) and dimension set.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    pub name: Option<String>,
    pub dimension: Option<DimensionSet>,
    pub value: Box<Node>,
}

impl Value {
    pub fn new(value: impl Into<Node>) -> Self {
        Value {
            name: None,
            dimension: None,
            value: Box::new(value.into()),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_dimension(mut self, dimension: DimensionSet) -> Self {
        self.dimension = Some(dimension);
        self
    }

    /// Attaches a dimension set given as a unit string such as `m^2/s`.
    pub fn with_units(self, units: &str) -> Result<Self, crate::FoamError> {
        Ok(self.with_dimension(DimensionSet::from_units(units)?))
    }

    /// Canonical unit string of the dimension set, if any.
    pub fn units(&self) -> Option<String> {
        self.dimension.map(|d| d.units())
    }
}

/// Verbatim `#{ ... #}` block.
#[derive(Debug, Clone, PartialEq)]
pub struct Code {
    pub name: String,
    pub directive: Option<String>,
    pub code: String,
}

impl Code {
    /// The code is dedented once; nothing else is touched.
    pub fn new(name: impl Into<String>, code: &str) -> Self {
        Code {
            name: name.into(),
            directive: None,
            code: dedent(code),
        }
    }

    pub fn with_directive(mut self, directive: impl Into<String>) -> Self {
        self.directive = Some(directive.into());
        self
    }
}

/// A `name #codeStream { ... }` dictionary whose entries are code blocks.
#[derive(Debug, Clone, PartialEq)]
pub struct CodeStream {
    pub dict: Dict,
}

impl CodeStream {
    pub const DIRECTIVE: &'static str = "#codeStream";

    pub fn new(name: impl Into<String>) -> Self {
        let mut dict = Dict::named(name);
        dict.directive = Some(Self::DIRECTIVE.to_string());
        CodeStream { dict }
    }

    fn code_entry(&self, key: &str) -> Option<&str> {
        match self.dict.get(key) {
            Some(Node::Code(c)) => Some(c.code.as_str()),
            _ => None,
        }
    }

    fn set_code_entry(&mut self, key: &str, code: &str) {
        self.dict.insert(key, Code::new(key, code));
    }

    pub fn code(&self) -> Option<&str> {
        self.code_entry("code")
    }

    pub fn code_include(&self) -> Option<&str> {
        self.code_entry("codeInclude")
    }

    pub fn code_options(&self) -> Option<&str> {
        self.code_entry("codeOptions")
    }

    pub fn code_libs(&self) -> Option<&str> {
        self.code_entry("codeLibs")
    }

    pub fn set_code(&mut self, code: &str) {
        self.set_code_entry("code", code)
    }

    pub fn set_code_include(&mut self, code: &str) {
        self.set_code_entry("codeInclude", code)
    }

    pub fn set_code_options(&mut self, code: &str) {
        self.set_code_entry("codeOptions", code)
    }

    pub fn set_code_libs(&mut self, code: &str) {
        self.set_code_entry("codeLibs", code)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DirectiveBody {
    /// Rest of the directive line, e.g. `"initialConditions"` or `patchAverage(field=T)`.
    Text(String),
    /// Braced expression of `#eval{ ... }` / `#calc{ ... }`, braces included.
    Expr(String),
    /// Argument list of a multi-line `#remove`.
    List(List),
    Conditional {
        condition: String,
        then: Dict,
        otherwise: Option<Dict>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Directive {
    pub directive: String,
    pub body: DirectiveBody,
}

impl Directive {
    pub fn text(directive: impl Into<String>, content: impl Into<String>) -> Self {
        Directive {
            directive: directive.into(),
            body: DirectiveBody::Text(content.into()),
        }
    }

    /// Key under which the directive is stored in its parent container.
    pub fn key(&self) -> String {
        let content = match &self.body {
            DirectiveBody::Text(text) => text.clone(),
            DirectiveBody::Expr(body) => body.clone(),
            DirectiveBody::List(list) => Node::List(list.clone()).render(0),
            DirectiveBody::Conditional { condition, .. } => condition.clone(),
        };
        if content.is_empty() {
            self.directive.clone()
        } else {
            format!("{} {}", self.directive, content)
        }
    }
}

/// Key/value pair threading a statement into its parent container.
#[derive(Debug, Clone, PartialEq)]
pub struct Assignment {
    pub key: String,
    pub value: Node,
}

/// A parsed file: optional banner, optional `FoamFile` metadata, and the remaining entries.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FoamInputFile {
    pub header: Option<String>,
    pub info: Option<Dict>,
    pub children: Dict,
}

impl FoamInputFile {
    pub fn new(info: Option<Dict>) -> Self {
        FoamInputFile {
            header: None,
            info,
            children: Dict::default(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.children.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.children.get_mut(key)
    }

    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.children.insert(key, node)
    }

    /// Value of a metadata entry such as `class` or `format`, unquoted.
    pub fn info_value(&self, key: &str) -> Option<String> {
        match self.info.as_ref()?.get(key)? {
            Node::Scalar(Scalar::Quoted(s)) => Some(s.clone()),
            Node::Scalar(s) => Some(s.as_text()),
            _ => None,
        }
    }
}
