use std::fs;
use std::path::Path;

use crate::ast::{Dict, FoamInputFile, Node};
use crate::transformer::INFO_KEY;
use crate::{FoamError, parse};

mod conversion;

impl FoamInputFile {
    /// Reads and parses a dictionary file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FoamError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| FoamError::File {
            message: format!("Failed to read file: {}", e),
            path: path.display().to_string(),
            hint: Some("Check that the file exists and is readable".into()),
            code: Some(301),
        })?;
        parse(&content)
    }

    pub fn write_file<P: AsRef<Path>>(&self, path: P) -> Result<(), FoamError> {
        let path = path.as_ref();
        fs::write(path, self.dump()).map_err(|e| FoamError::File {
            message: format!("Failed to write file: {}", e),
            path: path.display().to_string(),
            hint: Some("Check that the parent directory exists and is writable".into()),
            code: Some(302),
        })
    }

    /// Looks up a node by a `/`-separated path such as `boundaryField/inlet/type`.
    ///
    /// A leading `FoamFile` segment addresses the metadata block. Numeric segments
    /// index lists, and a dimensioned value is looked through to its payload.
    pub fn get_node(&self, path: &str) -> Result<&Node, FoamError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let (dict, rest) = match segments.split_first() {
            Some((&INFO_KEY, rest)) if self.info.is_some() => (self.info.as_ref(), rest),
            _ => (Some(&self.children), segments.as_slice()),
        };
        let dict = dict.ok_or_else(|| not_found(path))?;

        let (first, rest) = rest.split_first().ok_or_else(|| {
            FoamError::type_error("Empty path", 303)
                .with_hint("Use a path such as boundaryField/inlet/type")
                .at(path)
        })?;
        let mut node = dict.get(first).ok_or_else(|| not_found(path))?;
        for segment in rest {
            node = child(node, segment).ok_or_else(|| not_found(path))?;
        }
        Ok(node)
    }

    /// Gets a typed value.
    ///
    /// # Examples
    /// ```
    /// # use foam_dict::parse;
    /// let file = parse("solver  PCG;\nnCorrectors  2;\n").unwrap();
    /// let solver: String = file.get_as("solver").unwrap();
    /// let correctors: u32 = file.get_as("nCorrectors").unwrap();
    /// assert_eq!((solver.as_str(), correctors), ("PCG", 2));
    /// ```
    pub fn get_as<T>(&self, path: &str) -> Result<T, FoamError>
    where
        T: TryFrom<Node, Error = FoamError>,
    {
        let node = self.get_node(path)?.clone();
        T::try_from(node).map_err(|e| e.at(path))
    }

    /// `None` when the path does not exist; conversion errors are still reported.
    pub fn get_optional<T>(&self, path: &str) -> Result<Option<T>, FoamError>
    where
        T: TryFrom<Node, Error = FoamError>,
    {
        match self.get_as(path) {
            Ok(value) => Ok(Some(value)),
            Err(FoamError::Type { code: Some(304), .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub fn get_or<T>(&self, path: &str, default: T) -> T
    where
        T: TryFrom<Node, Error = FoamError>,
    {
        self.get_as(path).unwrap_or(default)
    }

    pub fn has(&self, path: &str) -> bool {
        self.get_node(path).is_ok()
    }

    /// Keys of the dict at `path`; an empty path lists the top-level entries.
    pub fn keys(&self, path: &str) -> Result<Vec<String>, FoamError> {
        let dict = if path.trim_matches('/').is_empty() {
            &self.children
        } else {
            self.get_node(path)?.as_dict().ok_or_else(|| {
                FoamError::type_error(format!("Path '{}' is not a dictionary", path), 306)
                    .with_hint("Only dictionaries have keys")
                    .at(path)
            })?
        };
        Ok(dict.keys().cloned().collect())
    }

    /// Inserts or replaces the entry at `path`, creating missing dictionaries on the way.
    pub fn set(&mut self, path: &str, node: impl Into<Node>) -> Result<(), FoamError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        let Some((last, parents)) = segments.split_last() else {
            return Err(FoamError::type_error("Empty path", 303).at(path));
        };

        let mut dict = &mut self.children;
        for segment in parents {
            if !matches!(dict.get(segment), Some(Node::Dict(_) | Node::CodeStream(_))) {
                if dict.contains_key(segment) {
                    return Err(FoamError::type_error(
                        format!("'{}' is not a dictionary", segment),
                        306,
                    )
                    .at(path));
                }
                log::trace!("creating dictionary '{}' for '{}'", segment, path);
                dict.insert(*segment, Dict::named(*segment));
            }
            dict = match dict.get_mut(segment).and_then(Node::as_dict_mut) {
                Some(next) => next,
                None => return Err(not_found(path)),
            };
        }
        dict.insert(*last, node);
        Ok(())
    }
}

fn child<'a>(node: &'a Node, segment: &str) -> Option<&'a Node> {
    match node {
        Node::Dict(_) | Node::CodeStream(_) => node.as_dict()?.get(segment),
        Node::List(list) => list.get(segment.parse().ok()?),
        Node::Value(value) => child(&value.value, segment),
        _ => None,
    }
}

fn not_found(path: &str) -> FoamError {
    FoamError::type_error(format!("Path '{}' not found", path), 304)
        .with_hint("Check that the path exists in the file")
        .at(path)
}

impl FoamError {
    /// Attaches the access path to a type error.
    pub(crate) fn at(mut self, path: &str) -> Self {
        if let FoamError::Type { path: p, .. } = &mut self {
            if p.is_empty() {
                *p = path.to_string();
            }
        }
        self
    }
}
