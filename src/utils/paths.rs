use std::borrow::Cow;
use std::env;
use std::fs::{self, File};
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use percent_encoding::percent_decode_str;

use crate::models::UNKNOWN_PROJECT;

// Maximum transcript size: 256MB
const MAX_FILE_SIZE_BYTES: u64 = 256 * 1024 * 1024;

/// Decodes Claude's project directory format back to a file system path
///
/// # Examples
///
/// ```
/// use std::path::PathBuf;
/// use agent_log_analytics::decode_path;
///
/// let encoded = "-Users%2Ffoo%2Fbar";
/// assert_eq!(decode_path(encoded), PathBuf::from("/Users/foo/bar"));
/// ```
pub fn decode_path(encoded: &str) -> PathBuf {
    let without_prefix = encoded.strip_prefix('-').unwrap_or(encoded);

    let decoded = percent_decode_str(without_prefix).decode_utf8_lossy();
    let decoded_str = match decoded {
        Cow::Borrowed(s) => s,
        Cow::Owned(ref s) => s.as_str(),
    };

    PathBuf::from(format!("/{}", decoded_str))
}

/// Validates that a decoded path is safe and doesn't contain path traversal sequences
///
/// # Errors
///
/// Returns an error if:
/// - The path contains '..' components (path traversal)
/// - The path is not absolute
pub fn validate_decoded_path(path: &Path) -> Result<()> {
    for component in path.components() {
        if component == std::path::Component::ParentDir {
            bail!("Path contains '..' component: {}", path.display());
        }
    }

    if !path.is_absolute() {
        bail!("Path must be absolute: {}", path.display());
    }

    Ok(())
}

/// Decodes and validates a path in one operation
///
/// Convenience function that combines [`decode_path`] and [`validate_decoded_path`].
pub fn decode_and_validate_path(encoded: &str) -> Result<PathBuf> {
    let decoded = decode_path(encoded);
    validate_decoded_path(&decoded)?;
    Ok(decoded)
}

/// Rejects symlinks so discovery never follows links out of a source root
pub fn validate_path_not_symlink(path: &Path) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Failed to read metadata: {}", path.display()))?;
    if metadata.file_type().is_symlink() {
        bail!("Path is a symlink: {}", path.display());
    }
    Ok(())
}

/// Validates that a file's size is within acceptable limits (256MB)
///
/// Takes an open file handle to avoid TOCTOU (time-of-check-time-of-use)
/// race conditions where the file could be modified between the size check
/// and subsequent file operations.
pub fn validate_file_size(file: &File, path: &Path) -> Result<()> {
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;

    let file_size = metadata.len();
    if file_size > MAX_FILE_SIZE_BYTES {
        bail!(
            "File too large: {} ({} bytes, max {} bytes)",
            path.display(),
            file_size,
            MAX_FILE_SIZE_BYTES
        );
    }

    Ok(())
}

/// Reads a transcript to a string after the size check
///
/// Invalid UTF-8 sequences are replaced with U+FFFD rather than failing the file.
pub fn read_transcript(path: &Path) -> Result<String> {
    let mut file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    validate_file_size(&file, path)?;
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes)
        .with_context(|| format!("Failed to read file: {}", path.display()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Modification time of a file, or the Unix epoch when the platform cannot report it
pub fn file_modified_time(path: &Path) -> DateTime<Utc> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|_| DateTime::<Utc>::from(SystemTime::UNIX_EPOCH))
}

/// Last non-empty segment of a working-directory path, used as the project name
///
/// ```
/// use agent_log_analytics::utils::project_name;
///
/// assert_eq!(project_name("/Users/alice/code/webapp/"), "webapp");
/// assert_eq!(project_name(""), "unknown");
/// ```
pub fn project_name(path: &str) -> String {
    path.trim()
        .split(['/', '\\'])
        .rev()
        .find(|segment| !segment.is_empty())
        .map(str::to_string)
        .unwrap_or_else(|| UNKNOWN_PROJECT.to_string())
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home {
        if path_str.starts_with(home) {
            return path_str.replacen(home, "~", 1);
        }
    }

    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("-Users%2Ffoo%2Fbar"), PathBuf::from("/Users/foo/bar"));
    }

    #[test]
    fn test_decode_dash_encoded_directory() {
        // Current Claude Code releases replace separators with dashes
        assert_eq!(decode_path("-Users-foo-bar"), PathBuf::from("/Users-foo-bar"));
    }

    #[test]
    fn test_validate_path_with_parent_dir() {
        let unsafe_path = PathBuf::from("/Users/foo/../etc/passwd");
        assert!(validate_decoded_path(&unsafe_path).is_err());
    }

    #[test]
    fn test_validate_relative_path() {
        assert!(validate_decoded_path(&PathBuf::from("Users/foo/bar")).is_err());
    }

    #[test]
    fn test_decode_and_validate_traversal() {
        assert!(decode_and_validate_path("-Users%2Ffoo%2F..%2Fetc%2Fpasswd").is_err());
        assert!(decode_and_validate_path("-Users%2Ffoo%2Fbar").is_ok());
    }

    #[test]
    fn test_project_name_variants() {
        assert_eq!(project_name("/Users/alice/code/webapp"), "webapp");
        assert_eq!(project_name("C:\\work\\api"), "api");
        assert_eq!(project_name("webapp"), "webapp");
        assert_eq!(project_name("/"), UNKNOWN_PROJECT);
        assert_eq!(project_name("   "), UNKNOWN_PROJECT);
    }

    #[test]
    fn test_read_transcript_missing_file() {
        let result = read_transcript(Path::new("/nonexistent/session.jsonl"));
        assert!(result.unwrap_err().to_string().contains("Failed to open"));
    }

    #[test]
    fn test_read_transcript_contents() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"user:\nhello\n").unwrap();
        assert_eq!(read_transcript(file.path()).unwrap(), "user:\nhello\n");
    }

    #[test]
    fn test_read_transcript_invalid_utf8_is_replaced() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"user:\nbad \xff byte\nassistant:\nfine\n").unwrap();
        assert_eq!(
            read_transcript(file.path()).unwrap(),
            "user:\nbad \u{FFFD} byte\nassistant:\nfine\n"
        );
    }

    #[test]
    #[cfg(unix)]
    fn test_symlink_rejected() {
        let dir = tempfile::TempDir::new().unwrap();
        let target = dir.path().join("target.jsonl");
        fs::write(&target, "").unwrap();
        let link = dir.path().join("link.jsonl");
        std::os::unix::fs::symlink(&target, &link).unwrap();

        assert!(validate_path_not_symlink(&target).is_ok());
        assert!(validate_path_not_symlink(&link).is_err());
    }

    #[test]
    fn test_format_path_with_tilde() {
        let path = PathBuf::from("/Users/testuser/Documents/project");
        let formatted = format_path_with_tilde_internal(&path, Some("/Users/testuser"));
        assert_eq!(formatted, "~/Documents/project");

        let path2 = PathBuf::from("/opt/local/bin");
        let formatted2 = format_path_with_tilde_internal(&path2, Some("/Users/testuser"));
        assert_eq!(formatted2, "/opt/local/bin");
    }
}
