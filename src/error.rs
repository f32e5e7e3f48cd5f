use thiserror::Error;

/// The main error type for OpenFOAM dictionary parsing, dumping and field decoding.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FoamError {
    /// Malformed dictionary text. The whole parse is aborted.
    #[error("[FOAM] Grammar error at {line}:{column}: {message}{}", suffix(.hint, .code))]
    Grammar {
        message: String,
        line: usize,
        column: usize,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// The `class` entry of a field header names no known field type.
    #[error("[FOAM] Unknown field class '{class}'{}", suffix(.hint, .code))]
    FieldClass {
        class: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// Missing or unusable metadata in a field header.
    #[error("[FOAM] Header error: {message}{}", suffix(.hint, .code))]
    Header {
        message: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// Decoded payload length disagrees with the declared element count.
    #[error("[FOAM] Payload size mismatch: expected {expected} {unit}, found {found}{}", suffix(&None, .code))]
    PayloadSize {
        expected: usize,
        found: usize,
        unit: &'static str,
        code: Option<u32>,
    },

    /// Raised for unit strings such as `m^2/s` containing an unknown symbol.
    #[error("[FOAM] Unknown unit '{unit}' in '{units}'{}", suffix(.hint, .code))]
    Unit {
        unit: String,
        units: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    /// Formatting is not idempotent for the given text.
    #[error("[FOAM] Format error: {message}")]
    Format { message: String, diff: String },

    #[error("[FOAM] Type error at '{path}': {message}{}", suffix(.hint, .code))]
    Type {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },

    #[error("[FOAM] File error '{path}': {message}{}", suffix(.hint, .code))]
    File {
        message: String,
        path: String,
        hint: Option<String>,
        code: Option<u32>,
    },
}

fn suffix(hint: &Option<String>, code: &Option<u32>) -> String {
    format!(
        "{}{}",
        hint.as_ref().map_or(String::new(), |h| format!(" Hint: {}", h)),
        code.map_or(String::new(), |c| format!(" Code: {}", c))
    )
}

impl FoamError {
    pub(crate) fn grammar(message: impl Into<String>, line: usize, column: usize, code: u32) -> Self {
        FoamError::Grammar {
            message: message.into(),
            line,
            column,
            hint: None,
            code: Some(code),
        }
    }

    pub(crate) fn with_hint(mut self, text: impl Into<String>) -> Self {
        match &mut self {
            FoamError::Grammar { hint, .. }
            | FoamError::FieldClass { hint, .. }
            | FoamError::Header { hint, .. }
            | FoamError::Unit { hint, .. }
            | FoamError::Type { hint, .. }
            | FoamError::File { hint, .. } => *hint = Some(text.into()),
            FoamError::PayloadSize { .. } | FoamError::Format { .. } => {}
        }
        self
    }

    pub(crate) fn header(message: impl Into<String>) -> Self {
        FoamError::Header {
            message: message.into(),
            hint: None,
            code: Some(502),
        }
    }

    pub(crate) fn type_error(message: impl Into<String>, code: u32) -> Self {
        FoamError::Type {
            message: message.into(),
            path: String::new(),
            hint: None,
            code: Some(code),
        }
    }

    /// Position of a grammar error, if this is one.
    pub fn position(&self) -> Option<(usize, usize)> {
        match self {
            FoamError::Grammar { line, column, .. } => Some((*line, *column)),
            _ => None,
        }
    }
}
