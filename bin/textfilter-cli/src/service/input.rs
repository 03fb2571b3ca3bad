use std::io::Read;

use anyhow::{Context, Result};
use serde_json::{Deserializer, Value};

/// Reads records from either a single JSON array or a stream of JSON values (e.g. NDJSON).
pub fn read_records<R: Read>(mut reader: R) -> Result<Vec<Value>> {
    let mut buf = String::new();
    reader
        .read_to_string(&mut buf)
        .context("failed to read input")?;

    parse_records(&buf)
}

fn parse_records(input: &str) -> Result<Vec<Value>> {
    if input.trim_start().starts_with('[') {
        return serde_json::from_str(input).context("invalid JSON array");
    }

    Deserializer::from_str(input)
        .into_iter::<Value>()
        .enumerate()
        .map(|(idx, record)| record.with_context(|| format!("invalid JSON record #{}", idx + 1)))
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_array() {
        let records = parse_records(r#" [{"a": 1}, {"a": 2}] "#).unwrap();
        assert_eq!(records, vec![json!({"a": 1}), json!({"a": 2})]);
    }

    #[test]
    fn parse_ndjson() {
        let records = parse_records("{\"a\": 1}\n{\"a\": 2}\n\n").unwrap();
        assert_eq!(records.len(), 2);
    }

    #[test]
    fn parse_empty_input() {
        assert!(parse_records("").unwrap().is_empty());
    }

    #[test]
    fn reject_malformed_record() {
        let err = parse_records("{\"a\": 1}\n{\"a\":").unwrap_err();
        assert!(err.to_string().contains("#2"));
    }
}
