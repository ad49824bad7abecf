//! Serialization utilities with robust error handling.
//!
//! JSON and TOML helpers shared by config files, presets and exports.

use crate::error::{IoError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Serializes data to compact JSON.
pub fn to_json<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Serializes data to pretty-printed JSON.
pub fn to_json_pretty<T>(data: &T) -> Result<String>
where
    T: Serialize,
{
    serde_json::to_string_pretty(data)
        .map_err(|e| IoError::serialization(format!("JSON serialization failed: {}", e)))
}

/// Deserializes data from a JSON string. Blank input is rejected up front.
pub fn from_json<T>(json: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if json.trim().is_empty() {
        return Err(IoError::validation("Empty JSON string"));
    }

    serde_json::from_str(json)
        .map_err(|e| IoError::serialization(format!("JSON deserialization failed: {}", e)))
}

/// Deserializes data from a TOML string.
pub fn from_toml<T>(content: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    if content.trim().is_empty() {
        return Err(IoError::validation("Empty TOML string"));
    }
    Ok(toml::from_str(content)?)
}

/// Writes pretty JSON to a file.
pub fn write_json_file<T, P>(data: &T, path: P) -> Result<()>
where
    T: Serialize,
    P: AsRef<Path>,
{
    let json = to_json_pretty(data)?;
    std::fs::write(&path, json).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("writing JSON to {:?}", path.as_ref()))
    })?;
    Ok(())
}

/// Reads and deserializes a JSON file.
pub fn read_json_file<T, P>(path: P) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
    P: AsRef<Path>,
{
    let json = std::fs::read_to_string(&path).map_err(|e| {
        IoError::FileSystem(e).with_context(format!("reading JSON from {:?}", path.as_ref()))
    })?;
    from_json(&json)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct TestData {
        name: String,
        value: i32,
    }

    #[test]
    fn test_empty_json_fails() {
        let result: Result<TestData> = from_json("   ");
        assert!(matches!(result, Err(IoError::Validation(_))));
    }

    #[test]
    fn test_invalid_json_fails() {
        let result: Result<TestData> = from_json("{ invalid json");
        assert!(matches!(result, Err(IoError::Serialization(_))));
    }

    #[test]
    fn test_toml() {
        let data: TestData = from_toml("name = \"t\"\nvalue = 7\n").unwrap();
        assert_eq!(data.value, 7);
        assert!(from_toml::<TestData>("value = ").is_err());
    }

    #[test]
    fn test_missing_file_has_context() {
        let err = read_json_file::<TestData, _>("/nonexistent/particula/test.json").unwrap_err();
        assert!(err.to_string().contains("reading JSON"));
    }
}
