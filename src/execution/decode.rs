//! Result envelope decoding.
//!
//! A runner prints one JSON array as its final line: `["ok"]`,
//! `["ok", value]` or `["err", message]`.

use serde_json::Value;
use tracing::trace;

use crate::error::{Error, Result};

const OK: &str = "ok";

/// Decode raw stdout into an empty success (`None`), a value, or an error.
pub fn decode(output: &str) -> Result<Option<Value>> {
    let line = envelope_line(output)?;
    trace!(line = %line, "decoding result envelope");

    let items: Vec<Value> = serde_json::from_str(line).map_err(|e| Error::Decode {
        reason: format!("envelope is not a JSON array: {}", e),
        line: line.to_string(),
    })?;

    let mut items = items.into_iter();
    let status = items.next().ok_or_else(|| Error::Decode {
        reason: "envelope is empty".into(),
        line: line.to_string(),
    })?;

    if status.as_str() == Some(OK) {
        return Ok(items.next());
    }

    let message = items.next().map(|m| match m {
        Value::String(s) => s,
        other => other.to_string(),
    });
    Err(Error::Program { message })
}

/// The line before the trailing blank left by the runner's final newline.
fn envelope_line(output: &str) -> Result<&str> {
    let lines: Vec<&str> = output.split('\n').collect();
    if lines.len() < 2 {
        return Err(Error::Decode {
            reason: "output is not newline-terminated".into(),
            line: output.to_string(),
        });
    }
    let line = lines[lines.len() - 2];
    Ok(line.strip_suffix('\r').unwrap_or(line))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_only_ok_is_empty() {
        assert_eq!(decode("[\"ok\"]\n").unwrap(), None);
    }

    #[test]
    fn test_value_keeps_json_type() {
        assert_eq!(decode("[\"ok\",2]\n").unwrap(), Some(json!(2)));
        assert_eq!(decode("[\"ok\",\"\"]\n").unwrap(), Some(json!("")));
        assert_eq!(decode("[\"ok\",true]\n").unwrap(), Some(json!(true)));
        assert_eq!(
            decode("[\"ok\",{\"a\":[1,2]}]\n").unwrap(),
            Some(json!({"a": [1, 2]}))
        );
        assert_eq!(decode("[\"ok\",null]\n").unwrap(), Some(Value::Null));
    }

    #[test]
    fn test_earlier_output_is_ignored() {
        let out = "debug line\nanother\n[\"ok\",[1,2,3]]\n";
        assert_eq!(decode(out).unwrap(), Some(json!([1, 2, 3])));
    }

    #[test]
    fn test_crlf_line_ending() {
        assert_eq!(decode("[\"ok\",1]\r\n").unwrap(), Some(json!(1)));
    }

    #[test]
    fn test_faceless_error() {
        match decode("[\"err\"]\n") {
            Err(Error::Program { message }) => assert_eq!(message, None),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_error_with_message() {
        match decode("[\"err\",\"Error: boom\",\"stack\"]\n") {
            Err(Error::Program { message }) => assert_eq!(message.as_deref(), Some("Error: boom")),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_missing_envelope_is_a_decode_error() {
        assert!(matches!(decode(""), Err(Error::Decode { .. })));
        assert!(matches!(decode("[\"ok\",1]"), Err(Error::Decode { .. })));
        assert!(matches!(decode("hello\n"), Err(Error::Decode { .. })));
        assert!(matches!(decode("[]\n"), Err(Error::Decode { .. })));
        // An extra blank line shifts the window off the envelope.
        assert!(matches!(decode("[\"ok\",1]\n\n"), Err(Error::Decode { .. })));
    }
}
