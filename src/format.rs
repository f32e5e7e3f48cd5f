use crate::{FoamError, FoamField, dump, parse};

/// Normalizes dictionary text.
///
/// The output is parsed and dumped once more; text that does not reach a fixed
/// point in one pass is rejected with the differing lines.
pub fn format_code(code: &str) -> Result<String, FoamError> {
    let result = dump(&parse(code)?);
    let reparsed = parse(&result).map_err(|e| FoamError::Format {
        message: format!("Formatted text no longer parses: {}", e),
        diff: String::new(),
    })?;
    let again = dump(&reparsed);

    if result != again {
        let diff = line_diff(&result, &again);
        log::debug!("formatting is not idempotent:\n{}", diff);
        return Err(FoamError::Format {
            message: "Not able to correctly parse this code".into(),
            diff,
        });
    }
    Ok(result)
}

/// Formats a field file, decoding its numeric payload through the field codec.
pub fn format_field_code(bytes: &[u8]) -> Result<String, FoamError> {
    Ok(FoamField::from_bytes(bytes)?.dump())
}

/// `-`/`+` pairs for every line that differs, with its line number.
fn line_diff(expected: &str, actual: &str) -> String {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    let mut out = Vec::new();

    for index in 0..expected.len().max(actual.len()) {
        let (left, right) = (expected.get(index), actual.get(index));
        if left == right {
            continue;
        }
        out.push(format!("@@ line {} @@", index + 1));
        if let Some(line) = left {
            out.push(format!("-{}", line));
        }
        if let Some(line) = right {
            out.push(format!("+{}", line));
        }
    }
    out.join("\n")
}
