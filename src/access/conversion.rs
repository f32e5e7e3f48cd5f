use crate::FoamError;
use crate::ast::{DimensionSet, Node, Scalar, Value};

/// Payload of a dimensioned or named value; other nodes convert as they are.
fn payload(node: Node) -> Node {
    match node {
        Node::Value(value) => payload(*value.value),
        other => other,
    }
}

fn mismatch(expected: &str, node: &Node, hint: &str, code: u32) -> FoamError {
    FoamError::type_error(format!("Expected {}, got {}", expected, node.render(0)), code).with_hint(hint)
}

fn out_of_range(n: i64, target: &str) -> FoamError {
    FoamError::type_error(format!("Number {} out of range for {}", n, target), 407)
}

impl TryFrom<Node> for String {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match payload(node) {
            Node::Scalar(Scalar::Word(s) | Scalar::Quoted(s) | Scalar::Macro(s)) => Ok(s),
            other => Err(mismatch("a word or string", &other, "Use a word or quoted string", 403)),
        }
    }
}

impl TryFrom<Node> for f64 {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        let node = payload(node);
        node.as_scalar()
            .and_then(Scalar::as_f64)
            .ok_or_else(|| mismatch("a number", &node, "Use a numeric value", 404))
    }
}

impl TryFrom<Node> for f32 {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        f64::try_from(node).map(|x| x as f32)
    }
}

impl TryFrom<Node> for i64 {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match payload(node) {
            Node::Scalar(Scalar::Int(n)) => Ok(n),
            other => Err(mismatch("an integer", &other, "Floats are not truncated; write an integer", 405)),
        }
    }
}

impl TryFrom<Node> for i32 {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        let n = i64::try_from(node)?;
        i32::try_from(n).map_err(|_| out_of_range(n, "i32"))
    }
}

impl TryFrom<Node> for u32 {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        let n = i64::try_from(node)?;
        u32::try_from(n).map_err(|_| out_of_range(n, "u32"))
    }
}

impl TryFrom<Node> for usize {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        let n = i64::try_from(node)?;
        usize::try_from(n).map_err(|_| out_of_range(n, "usize"))
    }
}

/// OpenFOAM switches: `on/off`, `true/false`, `yes/no`, `y/n`.
impl TryFrom<Node> for bool {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match payload(node) {
            Node::Scalar(Scalar::Word(w)) => match w.as_str() {
                "on" | "true" | "yes" | "y" => Ok(true),
                "off" | "false" | "no" | "n" | "none" => Ok(false),
                _ => Err(FoamError::type_error(format!("'{}' is not a switch", w), 406)
                    .with_hint("Use on/off, true/false or yes/no")),
            },
            other => Err(mismatch("a switch", &other, "Use on/off, true/false or yes/no", 406)),
        }
    }
}

impl<T> TryFrom<Node> for Vec<T>
where
    T: TryFrom<Node, Error = FoamError>,
{
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match payload(node) {
            Node::List(list) => list.items.into_iter().map(T::try_from).collect(),
            other => Err(mismatch("a list", &other, "Use a parenthesized list", 408)),
        }
    }
}

impl TryFrom<Node> for DimensionSet {
    type Error = FoamError;

    fn try_from(node: Node) -> Result<Self, Self::Error> {
        match node {
            Node::Dimensions(d) => Ok(d),
            Node::Value(Value { dimension: Some(d), .. }) => Ok(d),
            other => Err(mismatch("a dimension set", &other, "Write the dimensions as [0 2 -1 0 0 0 0]", 409)),
        }
    }
}
