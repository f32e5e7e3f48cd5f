use std::fmt;
use std::str::FromStr;

use once_cell::sync::Lazy;
use regex::Regex;
use regex::bytes::Regex as BytesRegex;

use super::FieldClass;
use crate::FoamError;

static HEADER_RE: Lazy<BytesRegex> = Lazy::new(|| BytesRegex::new(r"FoamFile\s*\{[^}]*\}").unwrap());

static NONUNIFORM_RE: Lazy<BytesRegex> =
    Lazy::new(|| BytesRegex::new(r"nonuniform\s+List<(\w+)>\s*(\d+)\s*\(").unwrap());

static ARCH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\s*(LSB|MSB)\s*;\s*label\s*=\s*(32|64)\s*;\s*scalar\s*=\s*(32|64)\s*$").unwrap()
});

/// Binary layout descriptor from the header `arch` entry, e.g. `LSB;label=32;scalar=64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arch {
    pub big_endian: bool,
    pub label_bits: u32,
    pub scalar_bits: u32,
}

impl FromStr for Arch {
    type Err = FoamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let caps = ARCH_RE.captures(s).ok_or_else(|| FoamError::Header {
            message: format!("Malformed arch descriptor '{}'", s),
            hint: Some("Expected <LSB|MSB>;label=<32|64>;scalar=<32|64>".into()),
            code: Some(503),
        })?;
        Ok(Arch {
            big_endian: &caps[1] == "MSB",
            label_bits: caps[2].parse().unwrap_or(32),
            scalar_bits: caps[3].parse().unwrap_or(64),
        })
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{};label={};scalar={}",
            if self.big_endian { "MSB" } else { "LSB" },
            self.label_bits,
            self.scalar_bits
        )
    }
}

/// Byte range of the `FoamFile { ... }` block.
pub(super) fn find_header(bytes: &[u8]) -> Option<(usize, usize)> {
    HEADER_RE.find(bytes).map(|m| (m.start(), m.end()))
}

/// One `nonuniform List<type> N ( ... )` block.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct Payload {
    pub dtype: String,
    pub count: usize,
    /// Offset of the element count.
    pub count_start: usize,
    /// Offset of the first byte after the opening parenthesis.
    pub data_start: usize,
}

pub(super) fn find_payload(bytes: &[u8], from: usize) -> Option<Payload> {
    let caps = NONUNIFORM_RE.captures_at(bytes, from)?;
    let whole = caps.get(0)?;
    let dtype = caps.get(1)?;
    let count = caps.get(2)?;
    Some(Payload {
        dtype: String::from_utf8_lossy(dtype.as_bytes()).into_owned(),
        count: std::str::from_utf8(count.as_bytes()).ok()?.parse().unwrap_or(usize::MAX),
        count_start: count.start(),
        data_start: whole.end(),
    })
}

/// Layout of one list element: number of components and whether they are integer labels.
pub(super) fn element_layout(dtype: &str, class: FieldClass) -> (usize, bool) {
    if dtype == "label" {
        return (1, true);
    }
    match FieldClass::from_dtype(dtype) {
        Some(declared) => {
            if declared != class {
                log::warn!("list of {} inside a {} field", dtype, class.dtype());
            }
            (declared.arity(), false)
        }
        None => (class.arity(), false),
    }
}

/// Parses whitespace-separated numbers up to the closing parenthesis of the block.
/// Row parentheses of vectors and tensors are skipped.
///
/// Returns the values and the offset of the closing parenthesis.
pub(super) fn decode_ascii(bytes: &[u8], start: usize) -> Result<(Vec<f64>, usize), FoamError> {
    let mut depth = 1usize;
    let mut values = Vec::new();
    let mut token_start: Option<usize> = None;

    let flush = |token_start: &mut Option<usize>, end: usize, values: &mut Vec<f64>| -> Result<(), FoamError> {
        if let Some(begin) = token_start.take() {
            let text = std::str::from_utf8(&bytes[begin..end]).unwrap_or("");
            let value = text.parse::<f64>().map_err(|_| {
                let (line, column) = line_column(bytes, begin);
                FoamError::grammar(format!("Invalid number '{}' in field data", text), line, column, 505)
            })?;
            values.push(value);
        }
        Ok(())
    };

    for (offset, byte) in bytes.iter().enumerate().skip(start) {
        match byte {
            b'(' => {
                flush(&mut token_start, offset, &mut values)?;
                depth += 1;
            }
            b')' => {
                flush(&mut token_start, offset, &mut values)?;
                depth -= 1;
                if depth == 0 {
                    return Ok((values, offset));
                }
            }
            b if b.is_ascii_whitespace() => flush(&mut token_start, offset, &mut values)?,
            _ => {
                if token_start.is_none() {
                    token_start = Some(offset);
                }
            }
        }
    }

    let (line, column) = line_column(bytes, start.saturating_sub(1));
    Err(FoamError::grammar("Unterminated field data list", line, column, 506).with_hint("Missing ')'"))
}

/// 1-based line and column of a byte offset, counted the way the lexer counts them.
fn line_column(bytes: &[u8], offset: usize) -> (usize, usize) {
    let before = &bytes[..offset.min(bytes.len())];
    let line = before.iter().filter(|b| **b == b'\n').count() + 1;
    let line_start = before.iter().rposition(|b| *b == b'\n').map_or(0, |i| i + 1);
    let column = String::from_utf8_lossy(&before[line_start..]).chars().count() + 1;
    (line, column)
}

/// Reads `count` raw elements of `width` bytes and checks the closing parenthesis follows.
///
/// Returns the values and the offset of the closing parenthesis.
pub(super) fn decode_binary(
    bytes: &[u8],
    start: usize,
    count: usize,
    arch: Arch,
    label: bool,
) -> Result<(Vec<f64>, usize), FoamError> {
    let bits = if label { arch.label_bits } else { arch.scalar_bits };
    let width = (bits / 8) as usize;
    let available = bytes.len().saturating_sub(start);
    let expected = count
        .checked_mul(width)
        .ok_or_else(|| oversized(count, width, available, "bytes"))?;
    let end = start
        .checked_add(expected)
        .ok_or_else(|| oversized(count, width, available, "bytes"))?;

    if bytes.get(end) != Some(&b')') {
        return Err(FoamError::PayloadSize {
            expected,
            found: list_end(bytes, start).unwrap_or(bytes.len()) - start,
            unit: "bytes",
            code: Some(507),
        });
    }

    let mut values = Vec::with_capacity(count);
    let mut buf4 = [0u8; 4];
    let mut buf8 = [0u8; 8];
    for chunk in bytes[start..end].chunks_exact(width) {
        let value = match (width, label) {
            (4, false) => {
                buf4.copy_from_slice(chunk);
                (if arch.big_endian { f32::from_be_bytes(buf4) } else { f32::from_le_bytes(buf4) }) as f64
            }
            (8, false) => {
                buf8.copy_from_slice(chunk);
                if arch.big_endian { f64::from_be_bytes(buf8) } else { f64::from_le_bytes(buf8) }
            }
            (4, true) => {
                buf4.copy_from_slice(chunk);
                (if arch.big_endian { i32::from_be_bytes(buf4) } else { i32::from_le_bytes(buf4) }) as f64
            }
            _ => {
                buf8.copy_from_slice(chunk);
                (if arch.big_endian { i64::from_be_bytes(buf8) } else { i64::from_le_bytes(buf8) }) as f64
            }
        };
        values.push(value);
    }

    Ok((values, end))
}

/// A declared element count whose size does not fit in `usize`.
pub(super) fn oversized(count: usize, width: usize, available: usize, unit: &'static str) -> FoamError {
    FoamError::PayloadSize {
        expected: count.saturating_mul(width),
        found: available,
        unit,
        code: Some(507),
    }
}

/// First `)` followed by `;`, the usual end of a list entry.
fn list_end(bytes: &[u8], start: usize) -> Option<usize> {
    (start..bytes.len()).find(|&i| {
        bytes[i] == b')'
            && bytes[i + 1..]
                .iter()
                .find(|b| !b.is_ascii_whitespace())
                .is_some_and(|b| *b == b';')
    })
}
