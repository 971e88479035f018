use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind};
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;
use tracing::{debug, warn};

use crate::utils::validate_file_size;

/// Records parsed from one JSON-lines file
#[derive(Debug, Default, Clone)]
pub struct JsonLines {
    pub records: Vec<Value>,
    /// Lines that were not valid JSON (or not valid UTF-8)
    pub skipped: usize,
}

/// Parse a JSON-lines transcript, one record per non-blank line
///
/// Malformed lines are logged and dropped; they never fail the file. Only
/// opening or reading the file itself can return an error.
/// The `type` field of a raw record, or `"unknown"` when missing
pub fn record_type(value: &Value) -> &str {
    value.get("type").and_then(Value::as_str).unwrap_or("unknown")
}

pub fn read_json_lines(path: &Path) -> Result<JsonLines> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    validate_file_size(&file, path)?;

    let reader = BufReader::new(file);
    let mut parsed = JsonLines::default();

    for (line_num, line) in reader.lines().enumerate() {
        let line = match line {
            Ok(line) => line,
            Err(e) if e.kind() == ErrorKind::InvalidData => {
                warn!("Skipping non UTF-8 line {} in {}", line_num + 1, path.display());
                parsed.skipped += 1;
                continue;
            }
            Err(e) => {
                return Err(e).with_context(|| format!("Failed to read {}", path.display()));
            }
        };

        push_line(&mut parsed, &line, line_num, path);
    }

    if parsed.skipped > 0 {
        debug!(
            "Parsed {}: {} records ({} skipped)",
            path.display(),
            parsed.records.len(),
            parsed.skipped
        );
    }

    Ok(parsed)
}

/// Parse JSON-lines content already held in memory
pub fn parse_json_lines(content: &str, origin: &Path) -> JsonLines {
    let mut parsed = JsonLines::default();
    for (line_num, line) in content.lines().enumerate() {
        push_line(&mut parsed, line, line_num, origin);
    }
    parsed
}

fn push_line(parsed: &mut JsonLines, line: &str, line_num: usize, origin: &Path) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }

    match serde_json::from_str::<Value>(line) {
        Ok(value) => parsed.records.push(value),
        Err(e) => {
            warn!("Failed to parse JSON on line {} in {}: {}", line_num + 1, origin.display(), e);
            parsed.skipped += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn create_test_file(content: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content).expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_parse_valid_lines() {
        let file = create_test_file(
            br#"{"type":"user","message":{"role":"user","content":"Hello"}}
{"type":"assistant","message":{"role":"assistant","content":[{"type":"text","text":"Hi"}]}}"#,
        );

        let parsed = read_json_lines(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records[1]["type"], "assistant");
    }

    #[test]
    fn test_empty_file() {
        let file = create_test_file(b"");
        let parsed = read_json_lines(file.path()).unwrap();
        assert!(parsed.records.is_empty());
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_blank_lines_are_not_counted() {
        let file = create_test_file(b"\n   \n{\"a\":1}\n\n\t\n{\"a\":2}\n");
        let parsed = read_json_lines(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 0);
    }

    #[test]
    fn test_malformed_lines_are_skipped_not_fatal() {
        // Mostly garbage still yields the good records
        let file = create_test_file(b"invalid 1\n{\"a\":1}\ninvalid 2\ninvalid 3\n{broken\n");
        let parsed = read_json_lines(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 4);
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let file = create_test_file(b"{\"a\":1}\n\xff\xfe\n{\"a\":2}\n");
        let parsed = read_json_lines(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.skipped, 1);
    }

    #[test]
    fn test_crlf_line_endings() {
        let file = create_test_file(b"{\"a\":1}\r\n{\"a\":2}\r\n");
        let parsed = read_json_lines(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 2);
    }

    #[test]
    fn test_nonexistent_file() {
        let result = read_json_lines(Path::new("/nonexistent/session.jsonl"));
        assert!(result.unwrap_err().to_string().contains("Failed to open"));
    }

    #[test]
    fn test_parse_in_memory_content() {
        let parsed = parse_json_lines("{\"a\":1}\nnope\n", Path::new("inline"));
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.skipped, 1);
    }
}
