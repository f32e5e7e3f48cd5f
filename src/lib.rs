//! Parser, AST, serializer and numeric field codec for OpenFOAM dictionary files.
//!
//! ```
//! use foam_dict::{Node, parse};
//!
//! let file = parse("application  icoFoam;\nendTime  0.5;\n").unwrap();
//! assert_eq!(file.get("application"), Some(&Node::word("icoFoam")));
//! assert_eq!(file.dump(), "application  icoFoam;\n\nendTime  0.5;\n");
//! ```

mod access;
pub mod ast;
pub mod dump;
pub mod error;
pub mod export;
pub mod field;
pub mod format;
pub mod lexer;
pub mod parser;
pub mod transformer;
pub mod utils;

pub use ast::{Dict, DimensionSet, FoamInputFile, List, Node, Scalar, Value};
pub use dump::dump;
pub use error::FoamError;
pub use field::{FieldArray, FieldClass, FoamField};
pub use format::format_code;
pub use parser::{Grammar, parse, parse_value, parse_with};
