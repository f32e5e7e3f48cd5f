use indexmap::IndexMap;

use super::{DimensionSet, Node, Value};
use crate::FoamError;

/// Ordered key/node mapping. Insertion order is what gets dumped.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
    pub name: Option<String>,
    /// Qualifier between the name and the body, e.g. `#codeStream` or `Gauss multivariateSelection`.
    pub directive: Option<String>,
    entries: IndexMap<String, Node>,
    comments: IndexMap<String, String>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn named(name: impl Into<String>) -> Self {
        Dict {
            name: Some(name.into()),
            ..Self::default()
        }
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key)
    }

    /// Inserts or replaces; a replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, node: impl Into<Node>) -> Option<Node> {
        self.entries.insert(key.into(), node.into())
    }

    pub fn remove(&mut self, key: &str) -> Option<Node> {
        self.comments.shift_remove(key);
        self.entries.shift_remove(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Node)> {
        self.entries.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&String, &mut Node)> {
        self.entries.iter_mut()
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.entries.keys()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Stores `value` as a dimensioned `Value` named after the key (`nu  nu [0 2 -1 0 0 0 0] 1e-06;`).
    pub fn set_value(&mut self, key: &str, value: impl Into<Node>, units: &str) -> Result<(), FoamError> {
        let dimension = DimensionSet::from_units(units)?;
        let value = Value::new(value).with_name(key).with_dimension(dimension);
        self.insert(key, value);
        Ok(())
    }

    /// Attaches a `// ...` comment rendered above the entry.
    pub fn set_comment(&mut self, key: impl Into<String>, comment: impl Into<String>) {
        self.comments.insert(key.into(), comment.into());
    }

    pub fn comment(&self, key: &str) -> Option<&str> {
        self.comments.get(key).map(String::as_str)
    }
}

impl<K: Into<String>, N: Into<Node>> FromIterator<(K, N)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, N)>>(iter: I) -> Self {
        let mut dict = Dict::new();
        for (key, node) in iter {
            dict.insert(key, node);
        }
        dict
    }
}

/// Parenthesized sequence. A name is present only when the list is the value of an entry.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct List {
    pub name: Option<String>,
    /// Whether the element count is written before the opening parenthesis.
    pub counted: bool,
    pub items: Vec<Node>,
}

impl List {
    pub fn new(items: Vec<Node>) -> Self {
        List {
            name: None,
            counted: false,
            items,
        }
    }

    pub fn counted(items: Vec<Node>) -> Self {
        List {
            counted: true,
            ..List::new(items)
        }
    }

    pub fn named(name: impl Into<String>, items: Vec<Node>) -> Self {
        List {
            name: Some(name.into()),
            ..List::new(items)
        }
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index)
    }

    pub fn push(&mut self, node: impl Into<Node>) {
        self.items.push(node.into());
    }

    pub fn iter(&self) -> impl Iterator<Item = &Node> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl<N: Into<Node>> FromIterator<N> for List {
    fn from_iter<I: IntoIterator<Item = N>>(iter: I) -> Self {
        List::new(iter.into_iter().map(Into::into).collect())
    }
}
