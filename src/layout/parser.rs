// SPDX-License-Identifier: GPL-3.0-only

//! Keyset parsing from JSON definitions.
//!
//! Keysets are defined as JSON documents and deserialized into
//! [`KeysetConfig`] with serde. After deserialization the configuration is
//! validated: fatal issues fail the load, non-fatal ones are returned as
//! warnings next to the configuration so a host can surface them without
//! refusing the keyset.

use std::fs;

use crate::layout::types::{KeysetConfig, LayoutError, ParseResult};
use crate::layout::validation::validate_config;

/// Parses a keyset definition from a JSON file.
///
/// Distinguishes I/O errors (file missing, unreadable) from JSON errors
/// (syntax, wrong shape), and attaches the file path to either.
///
/// # Errors
///
/// Returns [`LayoutError::Io`], [`LayoutError::Json`] or
/// [`LayoutError::Validation`], each carrying the file path.
///
/// # Example
///
/// ```rust,ignore
/// use keyview::layout::parse_keyset_file;
///
/// match parse_keyset_file("keysets/us_compact.json") {
///     Ok(result) => {
///         println!("Loaded keyset: {}", result.config.name);
///         for warning in &result.warnings {
///             eprintln!("  {}", warning);
///         }
///     }
///     Err(e) => eprintln!("Failed to load keyset: {}", e),
/// }
/// ```
pub fn parse_keyset_file(path: &str) -> Result<ParseResult<KeysetConfig>, LayoutError> {
    let json = fs::read_to_string(path).map_err(|e| LayoutError::io_with_path(e, path))?;

    let config: KeysetConfig =
        serde_json::from_str(&json).map_err(|e| LayoutError::json_with_path(e, path))?;

    finish(config, Some(path))
}

/// Parses a keyset definition from a JSON string.
///
/// Use this when the definition is already in memory, or in tests.
///
/// # Errors
///
/// Returns [`LayoutError::Json`] for malformed JSON and
/// [`LayoutError::Validation`] when fatal issues are found.
pub fn parse_keyset_from_string(json: &str) -> Result<ParseResult<KeysetConfig>, LayoutError> {
    let config: KeysetConfig = serde_json::from_str(json).map_err(LayoutError::json)?;
    finish(config, None)
}

/// Validates a parsed configuration and splits issues into fatal and not.
fn finish(
    config: KeysetConfig,
    file_path: Option<&str>,
) -> Result<ParseResult<KeysetConfig>, LayoutError> {
    let issues = validate_config(&config);

    if issues.iter().any(|issue| issue.is_error()) {
        return Err(LayoutError::Validation {
            issues,
            file_path: file_path.map(str::to_string),
        });
    }

    if !issues.is_empty() {
        tracing::debug!(
            keyset = %config.name,
            warnings = issues.len(),
            "keyset parsed with warnings"
        );
    }
    Ok(ParseResult::with_warnings(config, issues))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::types::ElementConfig;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_KEYSET: &str = r#"{
        "name": "compact",
        "root": {
            "type": "linear_layout",
            "children": [
                {"type": "soft_key", "label": "a"},
                {"type": "soft_key", "id": "shift", "modifier": "shift", "label": "Shift"}
            ]
        }
    }"#;

    /// Test 1: Parse a valid JSON string
    #[test]
    fn test_parse_valid_string() {
        let result = parse_keyset_from_string(VALID_KEYSET).expect("should parse");

        assert_eq!(result.config.name, "compact");
        assert!(!result.has_warnings());
        let ElementConfig::LinearLayout(row) = &result.config.root else {
            panic!("Expected linear layout root");
        };
        assert_eq!(row.children.len(), 2);
    }

    /// Test 2: Missing file surfaces an I/O error with the path
    #[test]
    fn test_parse_missing_file() {
        let err = parse_keyset_file("/nonexistent/path/keyset.json").unwrap_err();

        match &err {
            LayoutError::Io {
                file_path,
                suggestion,
                ..
            } => {
                assert_eq!(file_path.as_deref(), Some("/nonexistent/path/keyset.json"));
                assert!(suggestion.is_some(), "Error should include suggestion");
            }
            other => panic!("Expected Io, got {:?}", other),
        }
        assert!(format!("{}", err).contains("I/O error"));
    }

    /// Test 3: Malformed JSON surfaces line numbers
    #[test]
    fn test_parse_malformed_json() {
        let json = r#"{
            "name": "broken",
            "root":
        }"#;

        let err = parse_keyset_from_string(json).unwrap_err();
        match &err {
            LayoutError::Json { line_number, .. } => {
                assert!(line_number.is_some(), "Should include line number");
            }
            other => panic!("Expected Json, got {:?}", other),
        }
    }

    /// Test 4: Fatal validation issues fail the load
    #[test]
    fn test_parse_fatal_validation() {
        let json = r#"{
            "name": "broken",
            "root": {
                "type": "linear_layout",
                "children": [
                    {"type": "repeat", "count": 0, "key": {"label": "x"}}
                ]
            }
        }"#;

        let err = parse_keyset_from_string(json).unwrap_err();
        match &err {
            LayoutError::Validation { issues, .. } => {
                assert!(issues.iter().any(|i| i.is_error()));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    /// Test 5: Non-fatal issues come back as warnings
    #[test]
    fn test_parse_with_warnings() {
        let json = r#"{
            "name": "warned",
            "root": {"type": "vertical_layout", "icon_class": "ignored", "children": [
                {"type": "soft_key", "label": "a"}
            ]}
        }"#;

        let result = parse_keyset_from_string(json).expect("warnings do not block");
        assert!(result.has_warnings());
        assert_eq!(result.warning_count(), 1);
        assert!(result.warnings[0].message.contains("icon_class is ignored"));
    }

    /// Test 6: Parse from a file on disk
    #[test]
    fn test_parse_file() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(VALID_KEYSET.as_bytes())
            .expect("Failed to write temp file");
        let path = temp_file.path().to_str().unwrap();

        let result = parse_keyset_file(path).expect("should parse file");
        assert_eq!(result.config.name, "compact");
    }

    /// Test 7: Validation failures from files carry the file path
    #[test]
    fn test_parse_file_validation_has_path() {
        let json = r#"{
            "name": "",
            "root": {"type": "soft_key", "label": "a"}
        }"#;
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        temp_file
            .write_all(json.as_bytes())
            .expect("Failed to write temp file");
        let path = temp_file.path().to_str().unwrap().to_string();

        let err = parse_keyset_file(&path).unwrap_err();
        match &err {
            LayoutError::Validation { file_path, .. } => {
                assert_eq!(file_path.as_deref(), Some(path.as_str()));
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }
}
