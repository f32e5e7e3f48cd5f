use crate::FoamError;
use crate::ast::{
    Assignment, Code, CodeStream, Dict, DimensionSet, Directive, DirectiveBody, FoamInputFile, List, Node,
    Scalar, Value,
};
use crate::lexer::{Spanned, Token};
use crate::parser::{CstFile, DictBlock, Item, Statement};

/// Name of the metadata block every well-formed file starts with.
pub const INFO_KEY: &str = "FoamFile";

pub fn transform_file(cst: CstFile) -> Result<FoamInputFile, FoamError> {
    let mut file = FoamInputFile {
        header: cst.banner,
        ..FoamInputFile::default()
    };

    for (index, statement) in cst.statements.into_iter().enumerate() {
        let Assignment { key, value } = transform_statement(statement)?;
        match value {
            Node::Dict(mut info) if index == 0 && key == INFO_KEY => {
                info.name = None;
                file.info = Some(info);
            }
            value => store(&mut file.children, key, value),
        }
    }

    Ok(file)
}

pub fn transform_statement(statement: Statement) -> Result<Assignment, FoamError> {
    match statement {
        Statement::Assign { key, items } => {
            let key = key.text();
            let value = fold_items(items, Some(&key))?;
            Ok(Assignment { key, value })
        }
        Statement::Dict(block) => {
            let (key, value) = transform_dict(block)?;
            Ok(Assignment { key, value })
        }
        Statement::Code { key, directive, code } => {
            let key = key.text();
            let interior = match &code.token {
                Token::Code(interior) => interior.as_str(),
                _ => "",
            };
            let mut node = Code::new(key.clone(), &trim_code(interior));
            node.directive = directive.map(|d| d.text());
            Ok(Assignment { key, value: Node::Code(node) })
        }
        Statement::Macro(token) => Ok(Assignment {
            key: token.text(),
            value: Node::Empty,
        }),
        Statement::IsolatedList(item) => Ok(Assignment {
            key: String::new(),
            value: transform_item(item)?,
        }),
        Statement::Directive { directive, content } => directive_assignment(Directive::text(directive.text(), content)),
        Statement::Call { directive, name, args } => {
            let args = args
                .into_iter()
                .map(render_arg)
                .collect::<Result<Vec<_>, _>>()?;
            let content = format!("{}({})", name.text(), args.join(", "));
            directive_assignment(Directive::text(directive.text(), content))
        }
        Statement::Remove { directive, list } => {
            let list = match transform_item(list)? {
                Node::List(list) => list,
                other => List::new(vec![other]),
            };
            directive_assignment(Directive {
                directive: directive.text(),
                body: DirectiveBody::List(list),
            })
        }
        Statement::Conditional {
            directive,
            condition,
            then_body,
            else_body,
        } => {
            let then = transform_body(then_body)?;
            let otherwise = else_body.map(transform_body).transpose()?;
            directive_assignment(Directive {
                directive: directive.text(),
                body: DirectiveBody::Conditional {
                    condition,
                    then,
                    otherwise,
                },
            })
        }
    }
}

fn directive_assignment(directive: Directive) -> Result<Assignment, FoamError> {
    Ok(Assignment {
        key: directive.key(),
        value: Node::Directive(directive),
    })
}

fn transform_body(statements: Vec<Statement>) -> Result<Dict, FoamError> {
    let mut dict = Dict::new();
    for statement in statements {
        let Assignment { key, value } = transform_statement(statement)?;
        store(&mut dict, key, value);
    }
    Ok(dict)
}

/// Inserts a statement. A directive repeated verbatim gets a numbered key so both stay.
fn store(dict: &mut Dict, mut key: String, value: Node) {
    if matches!(value, Node::Directive(_)) {
        let base = key.clone();
        let mut n = 2;
        while dict.contains_key(&key) {
            key = format!("{} #{}", base, n);
            n += 1;
        }
    }
    dict.insert(key, value);
}

/// `name [qualifier...] { body }`. Qualifiers are kept, space-joined, as the directive.
fn transform_dict(block: DictBlock) -> Result<(String, Node), FoamError> {
    let mut head = block.head.into_iter();
    let name = match head.next() {
        Some(first) => Some(item_text(first)?),
        None => None,
    };
    let qualifiers = head.map(item_text).collect::<Result<Vec<_>, _>>()?;

    let mut dict = transform_body(block.body)?;
    dict.name = name.clone();
    if !qualifiers.is_empty() {
        dict.directive = Some(qualifiers.join(" "));
    }

    let node = if dict.directive.as_deref() == Some(CodeStream::DIRECTIVE) {
        Node::CodeStream(CodeStream { dict })
    } else {
        Node::Dict(dict)
    };
    Ok((name.unwrap_or_default(), node))
}

/// Folds the values of an entry.
///
/// One item stands for itself. A dimension set among several items decorates the
/// last one, and anything before the last item becomes the value's name. Runs of
/// plain words collapse into one space-joined word.
pub fn fold_items(items: Vec<Item>, key: Option<&str>) -> Result<Node, FoamError> {
    let mut nodes = items
        .into_iter()
        .map(transform_item)
        .collect::<Result<Vec<_>, _>>()?;

    if nodes.len() <= 1 {
        return Ok(match nodes.pop() {
            None => Node::Empty,
            Some(Node::List(mut list)) => {
                list.name = key.map(str::to_string);
                Node::List(list)
            }
            Some(node) => node,
        });
    }

    let dimension = match nodes.iter().position(|n| matches!(n, Node::Dimensions(_))) {
        Some(index) => match nodes.remove(index) {
            Node::Dimensions(d) => Some(d),
            _ => None,
        },
        None => None,
    };

    if nodes.len() > 1 && nodes.iter().all(is_text) {
        let joined = nodes.iter().map(node_text).collect::<Vec<_>>().join(" ");
        nodes = vec![Node::word(joined)];
    }

    let Some(last) = nodes.pop() else {
        return Ok(Node::Empty);
    };
    if nodes.is_empty() && dimension.is_none() {
        return Ok(last);
    }

    let name = if nodes.is_empty() {
        None
    } else {
        Some(nodes.iter().map(node_text).collect::<Vec<_>>().join(" "))
    };
    Ok(Node::Value(Value {
        name,
        dimension,
        value: Box::new(last),
    }))
}

fn is_text(node: &Node) -> bool {
    matches!(
        node,
        Node::Scalar(Scalar::Word(_)) | Node::Scalar(Scalar::Quoted(_)) | Node::Scalar(Scalar::Macro(_))
    )
}

fn node_text(node: &Node) -> String {
    match node {
        Node::Scalar(s) => s.as_text(),
        other => other.render(0),
    }
}

fn item_text(item: Item) -> Result<String, FoamError> {
    match item {
        Item::Leaf(token) => Ok(token.text()),
        other => Ok(node_text(&transform_item(other)?)),
    }
}

fn render_arg(arg: Vec<Item>) -> Result<String, FoamError> {
    let parts = arg
        .into_iter()
        .map(|item| match item {
            Item::KeyValue { key, value } => Ok(format!("{}={}", key.text(), node_text(&transform_item(*value)?))),
            other => item_text(other),
        })
        .collect::<Result<Vec<_>, FoamError>>()?;
    Ok(parts.join(" "))
}

pub fn transform_item(item: Item) -> Result<Node, FoamError> {
    match item {
        Item::Leaf(token) => transform_leaf(token),
        Item::List { count, items } => {
            let items = items
                .into_iter()
                .map(transform_item)
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Node::List(List {
                name: None,
                counted: count.is_some(),
                items,
            }))
        }
        Item::Dimensions(tokens) => {
            let mut exponents = [0i32; 7];
            for (slot, token) in exponents.iter_mut().zip(&tokens) {
                *slot = token.text().parse().map_err(|_| {
                    FoamError::grammar(
                        format!("Dimension exponent '{}' is out of range", token.text()),
                        token.line,
                        token.column,
                        213,
                    )
                })?;
            }
            Ok(Node::Dimensions(DimensionSet(exponents)))
        }
        Item::Dict(block) => Ok(transform_dict(block)?.1),
        Item::KeyValue { key, value } => Ok(Node::word(format!(
            "{}={}",
            key.text(),
            node_text(&transform_item(*value)?)
        ))),
    }
}

fn transform_leaf(token: Spanned) -> Result<Node, FoamError> {
    match token.token {
        Token::Number(raw) => parse_number(&raw, token.line, token.column).map(Node::Scalar),
        Token::Word(word) | Token::Directive(word) => Ok(Node::Scalar(Scalar::Word(word))),
        Token::Quoted(text) => Ok(Node::Scalar(Scalar::Quoted(text))),
        Token::Macro(text) => Ok(Node::Scalar(Scalar::Macro(text))),
        Token::Expr { directive, body } => Ok(Node::Directive(Directive {
            directive,
            body: DirectiveBody::Expr(body),
        })),
        other => Err(FoamError::grammar(
            format!("Token {:?} cannot be used as a value", other),
            token.line,
            token.column,
            210,
        )),
    }
}

/// Integer if the literal has no point or exponent, float otherwise. Never coerced.
fn parse_number(raw: &str, line: usize, column: usize) -> Result<Scalar, FoamError> {
    let is_float = raw.contains(['.', 'e', 'E']);
    if is_float {
        raw.parse::<f64>().map(Scalar::Float).map_err(|_| {
            FoamError::grammar(format!("Invalid number '{}'", raw), line, column, 208)
        })
    } else {
        raw.parse::<i64>().map(Scalar::Int).map_err(|_| {
            FoamError::grammar(format!("Integer '{}' does not fit in 64 bits", raw), line, column, 208)
                .with_hint("Write it as a float if precision loss is acceptable")
        })
    }
}

/// Drops the blank line after `#{` and the blank line before `#}` of a multi-line block;
/// a one-line block is trimmed.
fn trim_code(interior: &str) -> String {
    match interior.split_once('\n') {
        Some((first, rest)) if first.trim().is_empty() => match rest.rsplit_once('\n') {
            Some((body, last)) if last.trim().is_empty() => body.to_string(),
            _ if rest.trim().is_empty() => String::new(),
            _ => rest.to_string(),
        },
        _ => interior.trim().to_string(),
    }
}
