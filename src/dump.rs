use crate::ast::{Code, Dict, Directive, DirectiveBody, FoamInputFile, List, Node, Value};
use crate::transformer::INFO_KEY;
use crate::utils::display_width;

/// Banner written at the top of generated files.
pub const DEFAULT_HEADER: &str = r"/*--------------------------------*- C++ -*----------------------------------*\
| =========                 |                                                 |
| \\      /  F ield         | OpenFOAM: The Open Source CFD Toolbox           |
|  \\    /   O peration     | Version:  v2206                                 |
|   \\  /    A nd           | Website:  www.openfoam.com                      |
|    \\/     M anipulation  |                                                 |
\*---------------------------------------------------------------------------*/";

const INDENT: usize = 4;
const INFO_COLUMN: usize = 12;
const ALIGN_CAP: usize = 20;
const ALIGN_PAD: usize = 4;
const ROOT_GAP: usize = 2;
/// Counted lists longer than this are written one element per line.
const INLINE_LIMIT: usize = 10;

const GROUPED_LISTS: [(&str, &[&str]); 2] = [
    ("blocks", &["hex"]),
    ("edges", &["spline", "arc", "polyLine", "BSpline", "line"]),
];

#[derive(Debug, Clone, Copy)]
enum Spacing {
    Fixed(usize),
    Aligned(usize),
}

impl Spacing {
    fn gap(self, key: &str) -> usize {
        match self {
            Spacing::Fixed(n) => n,
            Spacing::Aligned(width) => width.saturating_sub(display_width(key)).max(2),
        }
    }
}

/// Renders a whole file: banner, metadata block, then one blank line between entries.
pub fn dump(file: &FoamInputFile) -> String {
    let mut parts = Vec::new();
    if let Some(info) = &file.info {
        parts.push(render_info(info));
    }
    parts.extend(render_entries(&file.children, 0, Spacing::Fixed(ROOT_GAP)));

    let mut out = parts.join("\n\n");
    if let Some(header) = &file.header {
        out = format!("{}\n{}", header, out);
    }
    if !out.ends_with('\n') {
        out.push('\n');
    }
    out
}

impl FoamInputFile {
    pub fn dump(&self) -> String {
        dump(self)
    }
}

impl Node {
    /// Text of the node on its own, without the key it may be stored under.
    ///
    /// Block-shaped nodes (dicts, named lists, code, directive lines) start with
    /// `indent` spaces; inline values use `indent` only for continuation lines.
    pub fn render(&self, indent: usize) -> String {
        match self {
            Node::Scalar(s) => s.as_text(),
            Node::Dict(d) => render_dict(d, d.name.as_deref(), indent, false),
            Node::CodeStream(cs) => render_dict(&cs.dict, cs.dict.name.as_deref(), indent, true),
            Node::List(list) => match &list.name {
                Some(name) => render_named_list(name, list, indent),
                None => render_inline_list(list, indent),
            },
            Node::Value(v) => render_value(v, indent),
            Node::Dimensions(d) => d.to_string(),
            Node::Code(c) => render_code(&c.name, c, indent),
            Node::Directive(d) => render_directive(d, indent),
            Node::Empty => String::new(),
        }
    }

    fn is_block(&self) -> bool {
        match self {
            Node::Dict(_) | Node::CodeStream(_) | Node::Code(_) => true,
            Node::List(list) => list.name.is_some(),
            Node::Directive(d) => !matches!(d.body, DirectiveBody::Expr(_)),
            _ => false,
        }
    }
}

fn render_info(info: &Dict) -> String {
    let mut lines = vec![INFO_KEY.to_string(), "{".to_string()];
    for (key, node) in info.iter() {
        let pad = INFO_COLUMN.saturating_sub(display_width(key)).max(1);
        lines.push(format!("{}{}{}{};", " ".repeat(INDENT), key, " ".repeat(pad), node.render(INDENT)));
    }
    lines.push("}".to_string());
    lines.join("\n")
}

/// Column at which values start inside a dict: longest inline key, capped, plus padding.
fn alignment_width(dict: &Dict) -> usize {
    let longest = dict
        .iter()
        .filter(|(_, node)| !matches!(node, Node::Dict(_) | Node::CodeStream(_) | Node::List(_) | Node::Empty))
        .map(|(key, _)| display_width(key))
        .max()
        .unwrap_or(0);
    longest.min(ALIGN_CAP) + ALIGN_PAD
}

fn render_entries(dict: &Dict, indent: usize, spacing: Spacing) -> Vec<String> {
    let ind = " ".repeat(indent);
    dict.iter()
        .map(|(key, node)| {
            let entry = render_entry(key, node, indent, spacing);
            match dict.comment(key) {
                Some(comment) => {
                    let mut lines: Vec<String> = comment.lines().map(|line| format!("{}// {}", ind, line)).collect();
                    lines.push(entry);
                    lines.join("\n")
                }
                None => entry,
            }
        })
        .collect()
}

fn render_entry(key: &str, node: &Node, indent: usize, spacing: Spacing) -> String {
    let ind = " ".repeat(indent);
    match node {
        Node::Dict(d) => render_dict(d, Some(key), indent, false),
        Node::CodeStream(cs) => render_dict(&cs.dict, Some(key), indent, true),
        Node::List(list) if key.is_empty() => render_isolated_list(list, indent),
        Node::List(list) if list.name.is_some() => format!("{};", render_named_list(key, list, indent)),
        Node::Code(c) => render_code(key, c, indent),
        Node::Directive(d) if node.is_block() => render_directive(d, indent),
        Node::Empty => format!("{}{};", ind, key),
        _ => {
            let value = node.render(indent);
            if value.is_empty() {
                format!("{}{};", ind, key)
            } else {
                format!("{}{}{}{};", ind, key, " ".repeat(spacing.gap(key)), value)
            }
        }
    }
}

fn render_dict(dict: &Dict, name: Option<&str>, indent: usize, codestream: bool) -> String {
    let ind = " ".repeat(indent);
    let mut lines = Vec::new();
    if let Some(name) = name {
        match &dict.directive {
            Some(directive) => lines.push(format!("{}{}  {}", ind, name, directive)),
            None => lines.push(format!("{}{}", ind, name)),
        }
    }
    lines.push(format!("{}{{", ind));
    let width = alignment_width(dict);
    lines.extend(render_entries(dict, indent + INDENT, Spacing::Aligned(width)));
    lines.push(format!("{}}}{}", ind, if codestream { ";" } else { "" }));
    lines.join("\n")
}

/// Element of a multi-line list; block-shaped nodes indent themselves.
fn render_item(node: &Node, indent: usize) -> String {
    if node.is_block() {
        node.render(indent)
    } else {
        format!("{}{}", " ".repeat(indent), node.render(indent))
    }
}

fn render_named_list(name: &str, list: &List, indent: usize) -> String {
    let ind = " ".repeat(indent);
    let mut lines = vec![format!("{}{}", ind, name)];
    if list.counted {
        lines.push(format!("{}{}", ind, list.len()));
    }
    lines.push(format!("{}(", ind));
    match grouped_lines(name, list) {
        Some(groups) => {
            let inner = " ".repeat(indent + INDENT);
            lines.extend(groups.into_iter().map(|group| format!("{}{}", inner, group)));
        }
        None => lines.extend(list.iter().map(|item| render_item(item, indent + INDENT))),
    }
    lines.push(format!("{})", ind));
    lines.join("\n")
}

/// blockMesh `blocks`/`edges` lists: one line per `hex`/edge keyword.
fn grouped_lines(name: &str, list: &List) -> Option<Vec<String>> {
    let (_, keywords) = GROUPED_LISTS.iter().find(|(list_name, _)| *list_name == name)?;
    let is_keyword = |node: &Node| matches!(node.as_scalar(), Some(s) if keywords.contains(&s.as_text().as_str()));
    if !list.items.first().is_some_and(is_keyword) {
        return None;
    }

    let mut groups: Vec<Vec<String>> = Vec::new();
    for item in list.iter() {
        if is_keyword(item) {
            groups.push(Vec::new());
        }
        if let Some(group) = groups.last_mut() {
            group.push(item.render(0));
        }
    }
    Some(groups.into_iter().map(|group| group.join(" ")).collect())
}

fn render_inline_list(list: &List, indent: usize) -> String {
    let count = if list.counted { list.len().to_string() } else { String::new() };
    if list.counted && list.len() > INLINE_LIMIT {
        let ind = " ".repeat(indent);
        let mut lines = vec![count, format!("{}(", ind)];
        lines.extend(list.iter().map(|item| render_item(item, indent)));
        lines.push(format!("{})", ind));
        return lines.join("\n");
    }
    let items: Vec<String> = list.iter().map(|item| item.render(indent)).collect();
    format!("{}({})", count, items.join(" "))
}

/// A list with no key, as in `polyMesh/points`: elements one per line at the list's own indent.
fn render_isolated_list(list: &List, indent: usize) -> String {
    let ind = " ".repeat(indent);
    let mut lines = Vec::new();
    if list.counted {
        lines.push(format!("{}{}", ind, list.len()));
    }
    lines.push(format!("{}(", ind));
    lines.extend(list.iter().map(|item| render_item(item, indent)));
    lines.push(format!("{}){}", ind, if list.counted { "" } else { ";" }));
    lines.join("\n")
}

fn render_value(value: &Value, indent: usize) -> String {
    let payload = value.value.render(indent);
    match (&value.name, &value.dimension) {
        (Some(name), Some(dimension)) => format!("{} {} {}", name, dimension, payload),
        (Some(name), None) => format!("{} {}", name, payload),
        (None, Some(dimension)) => format!("{} {}", dimension, payload),
        (None, None) => payload,
    }
}

fn render_code(name: &str, code: &Code, indent: usize) -> String {
    let ind = " ".repeat(indent);
    let inner = " ".repeat(indent + INDENT);
    let mut head = format!("{}{}", ind, name);
    if let Some(directive) = &code.directive {
        head.push(' ');
        head.push_str(directive);
    }

    let mut lines = vec![head, format!("{}#{{", ind)];
    for line in code.code.split('\n') {
        if line.is_empty() {
            lines.push(String::new());
        } else {
            lines.push(format!("{}{}", inner, line));
        }
    }
    lines.push(format!("{}#}};", ind));
    lines.join("\n")
}

fn render_directive(directive: &Directive, indent: usize) -> String {
    let ind = " ".repeat(indent);
    match &directive.body {
        DirectiveBody::Text(text) if text.is_empty() => format!("{}{}", ind, directive.directive),
        DirectiveBody::Text(text) => format!("{}{}  {}", ind, directive.directive, text),
        DirectiveBody::Expr(body) => format!("{}{}", directive.directive, body),
        DirectiveBody::List(list) => format!("{}{} {}", ind, directive.directive, render_inline_list(list, indent)),
        DirectiveBody::Conditional {
            condition,
            then,
            otherwise,
        } => {
            let mut lines = vec![format!("{}{} {}", ind, directive.directive, condition)];
            lines.extend(render_entries(then, indent, Spacing::Aligned(alignment_width(then))));
            if let Some(otherwise) = otherwise {
                lines.push(format!("{}#else", ind));
                lines.extend(render_entries(otherwise, indent, Spacing::Aligned(alignment_width(otherwise))));
            }
            lines.push(format!("{}#endif", ind));
            lines.join("\n")
        }
    }
}
