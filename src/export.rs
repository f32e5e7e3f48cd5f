use serde_json::json;

use crate::ast::{Dict, DirectiveBody, FoamInputFile, Node, Scalar};
use crate::{FoamError, parse};

/// Export a parsed file to JSON.
///
/// - Numbers, words and strings map directly (quoted strings keep their quotes
///   so they stay distinguishable from words).
/// - Dicts become objects in file order, lists become arrays.
/// - Dimensioned values become `{"name", "dimensions", "value"}` objects.
/// - Code blocks and directives are exported as text, unevaluated.
///
/// # Examples
/// ```
/// use foam_dict::{export, parse};
///
/// let file = parse("nu  [0 2 -1 0 0 0 0] 1e-05;\n").unwrap();
/// let json = export::export_to_json(&file).unwrap();
/// assert!(json.contains("\"dimensions\""));
/// ```
pub fn export_to_json(file: &FoamInputFile) -> Result<String, FoamError> {
    fn node_to_json(node: &Node) -> serde_json::Value {
        match node {
            Node::Scalar(Scalar::Int(n)) => json!(n),
            Node::Scalar(Scalar::Float(x)) => json!(x),
            Node::Scalar(s) => json!(s.as_text()),
            Node::Dict(d) => dict_to_json(d),
            Node::CodeStream(cs) => json!({ "codeStream": dict_to_json(&cs.dict) }),
            Node::List(list) => json!(list.iter().map(node_to_json).collect::<Vec<_>>()),
            Node::Value(v) => json!({
                "name": v.name,
                "dimensions": v.dimension.map(|d| d.0.to_vec()),
                "value": node_to_json(&v.value),
            }),
            Node::Dimensions(d) => json!(d.0.to_vec()),
            Node::Code(c) => json!({ "code": c.code, "directive": c.directive }),
            Node::Directive(d) => match &d.body {
                DirectiveBody::Conditional {
                    condition,
                    then,
                    otherwise,
                } => json!({
                    "directive": d.directive,
                    "condition": condition,
                    "then": dict_to_json(then),
                    "else": otherwise.as_ref().map(dict_to_json),
                }),
                _ => json!({ "directive": d.key() }),
            },
            Node::Empty => serde_json::Value::Null,
        }
    }

    fn dict_to_json(dict: &Dict) -> serde_json::Value {
        let entries = dict
            .iter()
            .map(|(k, v)| (k.clone(), node_to_json(v)))
            .collect::<serde_json::Map<_, _>>();
        serde_json::Value::Object(entries)
    }

    let mut top = serde_json::Map::new();
    if let Some(info) = &file.info {
        top.insert("FoamFile".into(), dict_to_json(info));
    }
    top.insert("entries".into(), dict_to_json(&file.children));

    serde_json::to_string_pretty(&serde_json::Value::Object(top)).map_err(|e| FoamError::Format {
        message: format!("JSON export failed: {}", e),
        diff: String::new(),
    })
}

/// Reads, parses and exports a dictionary file in one call.
pub fn export_file(path: &str) -> Result<String, FoamError> {
    export_to_json(&FoamInputFile::from_file(path)?)
}

/// Parses text and exports it.
pub fn export_str(text: &str) -> Result<String, FoamError> {
    export_to_json(&parse(text)?)
}
