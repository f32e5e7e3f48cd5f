use std::fmt;
use std::str::FromStr;

use crate::FoamError;
use crate::ast::{CodeStream, Dict, DimensionSet, FoamInputFile, List, Node, Scalar, Value};
use crate::utils::dedent;

mod codec;

pub use codec::Arch;

pub const DEFAULT_CODE_INCLUDE: &str = "#include \"fvCFD.H\"";
pub const DEFAULT_CODE_OPTIONS: &str = "-I$(LIB_SRC)/finiteVolume/lnInclude \\\n-I$(LIB_SRC)/meshTools/lnInclude";
pub const DEFAULT_CODE_LIBS: &str = "-lmeshTools \\\n-lfiniteVolume";

const INTERNAL_FIELD: &str = "internalField";
const BOUNDARY_FIELD: &str = "boundaryField";
const PLACEHOLDER: &[u8] = b"0()";

/// Element type of a field, which fixes the number of components per cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FieldClass {
    Scalar,
    Vector,
    SymmTensor,
    Tensor,
}

impl FieldClass {
    pub fn arity(self) -> usize {
        match self {
            FieldClass::Scalar => 1,
            FieldClass::Vector => 3,
            FieldClass::SymmTensor => 6,
            FieldClass::Tensor => 9,
        }
    }

    /// Element type name as written in `List<...>`.
    pub fn dtype(self) -> &'static str {
        match self {
            FieldClass::Scalar => "scalar",
            FieldClass::Vector => "vector",
            FieldClass::SymmTensor => "symmTensor",
            FieldClass::Tensor => "tensor",
        }
    }

    /// Header class of a cell field, e.g. `volVectorField`.
    pub fn class_name(self) -> String {
        let dtype = self.dtype();
        let mut chars = dtype.chars();
        let capitalized: String = match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        };
        format!("vol{}Field", capitalized)
    }

    pub fn from_dtype(dtype: &str) -> Option<Self> {
        match dtype {
            "scalar" => Some(FieldClass::Scalar),
            "vector" => Some(FieldClass::Vector),
            "symmTensor" => Some(FieldClass::SymmTensor),
            "tensor" => Some(FieldClass::Tensor),
            _ => None,
        }
    }

    /// Reads a header class such as `volScalarField`, `surfaceVectorField` or `pointTensorField`.
    pub fn from_class(class: &str) -> Result<Self, FoamError> {
        let unknown = || FoamError::FieldClass {
            class: class.to_string(),
            hint: Some("Expected vol|surface|point followed by Scalar|Vector|SymmTensor|Tensor and Field".into()),
            code: Some(501),
        };

        let rest = ["vol", "surface", "point"]
            .iter()
            .find_map(|prefix| class.strip_prefix(prefix))
            .and_then(|rest| rest.strip_suffix("Field"))
            .ok_or_else(unknown)?;

        let mut chars = rest.chars();
        let dtype: String = match chars.next() {
            Some(first) => first.to_lowercase().chain(chars).collect(),
            None => return Err(unknown()),
        };
        FieldClass::from_dtype(&dtype).ok_or_else(unknown)
    }
}

impl FromStr for FieldClass {
    type Err = FoamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldClass::from_class(s)
    }
}

impl fmt::Display for FieldClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.class_name())
    }
}

/// Row-major `(rows, arity)` array of cell values.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldArray {
    values: Vec<f64>,
    arity: usize,
}

impl FieldArray {
    /// Fails when the number of values is not a multiple of `arity`.
    pub fn new(values: Vec<f64>, arity: usize) -> Result<Self, FoamError> {
        let arity = arity.max(1);
        if values.len() % arity != 0 {
            return Err(FoamError::PayloadSize {
                expected: values.len().div_ceil(arity) * arity,
                found: values.len(),
                unit: "values",
                code: Some(508),
            });
        }
        Ok(FieldArray { values, arity })
    }

    pub fn scalars(values: Vec<f64>) -> Self {
        FieldArray { values, arity: 1 }
    }

    pub fn from_rows<const N: usize>(rows: &[[f64; N]]) -> Self {
        FieldArray {
            values: rows.iter().flatten().copied().collect(),
            arity: N.max(1),
        }
    }

    /// `(rows, arity)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.values.len() / self.arity, self.arity)
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn len(&self) -> usize {
        self.values.len() / self.arity
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.values.get(index * self.arity..(index + 1) * self.arity)
    }

    pub fn rows(&self) -> impl Iterator<Item = &[f64]> {
        self.values.chunks_exact(self.arity)
    }

    pub fn column(&self, index: usize) -> Vec<f64> {
        if index >= self.arity {
            return Vec::new();
        }
        self.rows().map(|row| row[index]).collect()
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.values
    }

    /// Counted ascii list as written after `nonuniform List<type>`.
    fn to_list(&self, label: bool) -> List {
        let items = self
            .rows()
            .map(|row| {
                if self.arity == 1 {
                    element(row[0], label)
                } else {
                    Node::List(row.iter().map(|x| element(*x, label)).collect())
                }
            })
            .collect();
        List::counted(items)
    }
}

fn element(value: f64, label: bool) -> Node {
    if label {
        Node::Scalar(Scalar::Int(value as i64))
    } else {
        Node::Scalar(Scalar::Float(value))
    }
}

/// One decoded `nonuniform List<type> N (...)` block.
#[derive(Debug, Clone)]
struct Block {
    dtype: String,
    label: bool,
    array: FieldArray,
}

/// A field file: its parsed tree plus the decoded internal field, when nonuniform.
///
/// The bulk numeric block never goes through the dictionary grammar; it is located
/// by byte offsets and decoded directly, and the tree keeps an empty placeholder list.
#[derive(Debug, Clone, PartialEq)]
pub struct FoamField {
    pub tree: FoamInputFile,
    class: FieldClass,
    internal: Option<FieldArray>,
}

impl FoamField {
    /// A fresh field with an empty `internalField` and no boundary patches.
    pub fn new(name: &str, class: FieldClass, units: &str) -> Result<Self, FoamError> {
        let mut info = Dict::new();
        info.insert("version", 2.0);
        info.insert("format", "ascii");
        info.insert("class", class.class_name());
        info.insert("object", name);

        let mut tree = FoamInputFile::new(Some(info));
        tree.insert("dimensions", DimensionSet::from_units(units)?);
        tree.insert(INTERNAL_FIELD, Node::Empty);
        tree.insert(BOUNDARY_FIELD, Dict::named(BOUNDARY_FIELD));

        Ok(FoamField {
            tree,
            class,
            internal: None,
        })
    }

    pub fn from_text(text: &str) -> Result<Self, FoamError> {
        Self::from_bytes(text.as_bytes())
    }

    /// Decodes a complete field file, ascii or binary.
    ///
    /// The header is read first, so a bad class or a missing `arch` is reported
    /// before any payload is touched.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, FoamError> {
        let (header_start, header_end) = codec::find_header(bytes).ok_or_else(|| FoamError::Header {
            message: "No FoamFile block found".into(),
            hint: Some("Field files start with a FoamFile { ... } header".into()),
            code: Some(504),
        })?;
        let header = crate::parse(&String::from_utf8_lossy(&bytes[header_start..header_end]))?;
        let class_name = header
            .info_value("class")
            .ok_or_else(|| FoamError::header("Missing 'class' entry").with_hint("Add class volScalarField; (or similar) to FoamFile"))?;
        let class = FieldClass::from_class(&class_name)?;
        let binary = header.info_value("format").is_some_and(|f| f == "binary");
        let arch = match header.info_value("arch") {
            Some(arch) => Some(arch.parse::<Arch>()?),
            None => None,
        };
        log::trace!("field header spans bytes {}..{}", header_start, header_end);

        if codec::find_payload(bytes, header_end).is_none() {
            let tree = crate::parse(&String::from_utf8_lossy(bytes))?;
            return Ok(FoamField {
                tree,
                class,
                internal: None,
            });
        }

        let arch = match (binary, arch) {
            (true, None) => {
                return Err(FoamError::header("Binary field without an 'arch' entry")
                    .with_hint("Add arch \"LSB;label=32;scalar=64\"; to FoamFile"));
            }
            (_, arch) => arch,
        };

        let mut blocks = Vec::new();
        let mut skeleton = Vec::with_capacity(bytes.len().min(1 << 16));
        let mut cursor = header_end;
        skeleton.extend_from_slice(&bytes[..header_end]);

        while let Some(payload) = codec::find_payload(bytes, cursor) {
            let (arity, label) = codec::element_layout(&payload.dtype, class);
            // Every value takes at least one byte, so the remaining bytes bound the count.
            let expected = payload.count.checked_mul(arity).ok_or_else(|| {
                codec::oversized(payload.count, arity, bytes.len().saturating_sub(payload.data_start), "values")
            })?;
            let (values, close) = match arch {
                Some(arch) if binary => codec::decode_binary(bytes, payload.data_start, expected, arch, label)?,
                _ => codec::decode_ascii(bytes, payload.data_start)?,
            };
            if values.len() != expected {
                return Err(FoamError::PayloadSize {
                    expected,
                    found: values.len(),
                    unit: "values",
                    code: Some(508),
                });
            }
            log::debug!(
                "decoded {} {} elements ({}) at byte {}",
                payload.count,
                payload.dtype,
                if binary { "binary" } else { "ascii" },
                payload.data_start
            );

            skeleton.extend_from_slice(&bytes[cursor..payload.count_start]);
            skeleton.extend_from_slice(PLACEHOLDER);
            cursor = close + 1;
            blocks.push(Block {
                dtype: payload.dtype,
                label,
                array: FieldArray::new(values, arity)?,
            });
        }
        skeleton.extend_from_slice(&bytes[cursor..]);

        let mut tree = crate::parse(&String::from_utf8_lossy(&skeleton))?;
        let mut blocks = blocks.into_iter();
        let mut internal = None;

        if let Some(Node::Value(value)) = tree.get(INTERNAL_FIELD) {
            if is_placeholder(value) {
                internal = blocks.next().map(|block| block.array);
            }
        }
        for (key, node) in tree.children.iter_mut() {
            if key == INTERNAL_FIELD && internal.is_some() {
                continue;
            }
            fill_placeholders(node, &mut blocks);
        }

        Ok(FoamField { tree, class, internal })
    }

    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self, FoamError> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|e| FoamError::File {
            message: e.to_string(),
            path: path.display().to_string(),
            hint: None,
            code: Some(301),
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn class(&self) -> FieldClass {
        self.class
    }

    /// Decoded `internalField` values, present only for a nonuniform field.
    pub fn values(&self) -> Option<&FieldArray> {
        self.internal.as_ref()
    }

    /// `internalField uniform <value>;`
    pub fn set_uniform(&mut self, value: impl Into<Node>) {
        self.internal = None;
        self.tree
            .insert(INTERNAL_FIELD, Value::new(value).with_name("uniform"));
    }

    /// Replaces the internal field with a nonuniform list, written as ascii.
    pub fn set_values(&mut self, values: FieldArray) -> Result<(), FoamError> {
        if values.arity() != self.class.arity() {
            return Err(FoamError::PayloadSize {
                expected: self.class.arity(),
                found: values.arity(),
                unit: "components per element",
                code: Some(509),
            });
        }
        self.tree.insert(
            INTERNAL_FIELD,
            Value::new(List::counted(Vec::new())).with_name(self.list_name()),
        );
        self.internal = Some(values);
        Ok(())
    }

    /// Adds or replaces the patch `name` in `boundaryField`.
    pub fn set_boundary(&mut self, name: &str, patch_type: &str, value: Option<Node>) {
        let mut patch = Dict::named(name);
        patch.insert("type", patch_type);
        if let Some(value) = value {
            patch.insert("value", value);
        }

        if !matches!(self.tree.get(BOUNDARY_FIELD), Some(Node::Dict(_))) {
            self.tree.insert(BOUNDARY_FIELD, Dict::named(BOUNDARY_FIELD));
        }
        if let Some(boundaries) = self.tree.get_mut(BOUNDARY_FIELD).and_then(Node::as_dict_mut) {
            boundaries.insert(name, patch);
        }
    }

    /// Computes the internal field with a `#codeStream` using the usual include and link flags.
    pub fn set_codestream(&mut self, code: &str) {
        self.set_codestream_with(code, DEFAULT_CODE_INCLUDE, DEFAULT_CODE_OPTIONS, DEFAULT_CODE_LIBS)
    }

    pub fn set_codestream_with(&mut self, code: &str, include: &str, options: &str, libs: &str) {
        let mut stream = CodeStream::new(INTERNAL_FIELD);
        stream.set_code_include(dedent(include).trim());
        stream.set_code_options(dedent(options).trim());
        stream.set_code_libs(dedent(libs).trim());
        stream.set_code(dedent(code).trim());
        self.internal = None;
        self.tree.insert(INTERNAL_FIELD, stream);
    }

    /// Tree with the internal values written back as an ascii counted list.
    ///
    /// Decoded lists are always written as ascii, so a binary header is rewritten too.
    pub fn to_tree(&self) -> FoamInputFile {
        let mut tree = self.tree.clone();
        if let Some(values) = &self.internal {
            tree.insert(
                INTERNAL_FIELD,
                Value::new(values.to_list(false)).with_name(self.list_name()),
            );
        }
        if let Some(info) = tree.info.as_mut() {
            if info.get("format").is_some_and(|f| matches!(f.as_scalar(), Some(Scalar::Word(w)) if w == "binary")) {
                info.insert("format", "ascii");
                info.remove("arch");
            }
        }
        tree
    }

    pub fn dump(&self) -> String {
        self.to_tree().dump()
    }

    fn list_name(&self) -> String {
        format!("nonuniform List<{}>", self.class.dtype())
    }
}

fn is_placeholder(value: &Value) -> bool {
    value.name.as_deref().is_some_and(|name| name.starts_with("nonuniform"))
        && matches!(&*value.value, Node::List(list) if list.counted && list.is_empty())
}

/// Depth-first, in document order, so placeholders meet their blocks in file order.
fn fill_placeholders(node: &mut Node, blocks: &mut impl Iterator<Item = Block>) {
    match node {
        Node::Value(value) if is_placeholder(value) => {
            if let Some(block) = blocks.next() {
                log::trace!("restoring {} {} values into the tree", block.array.len(), block.dtype);
                value.value = Box::new(Node::List(block.array.to_list(block.label)));
            }
        }
        Node::Dict(dict) => {
            for (_, child) in dict.iter_mut() {
                fill_placeholders(child, blocks);
            }
        }
        Node::CodeStream(stream) => {
            for (_, child) in stream.dict.iter_mut() {
                fill_placeholders(child, blocks);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests;
