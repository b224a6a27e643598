use std::io::Read;

use anyhow::{Context, Result};
use serde_json::Value;
use typed_path::Utf8NativePathBuf;

// For argp::FromArgs
pub fn native_path(value: &str) -> Result<Utf8NativePathBuf, String> {
    Ok(Utf8NativePathBuf::from(value))
}

/// Reads a JSON document from a file, or from stdin when the path is `-`.
pub fn read_json(path: &Utf8NativePathBuf) -> Result<Value> {
    let data = if path.as_str() == "-" {
        let mut data = String::new();
        std::io::stdin().read_to_string(&mut data).context("Failed to read stdin")?;
        data
    } else {
        std::fs::read_to_string(path.with_platform_encoding())
            .with_context(|| format!("Failed to read {}", path))?
    };
    serde_json::from_str(&data).with_context(|| format!("Failed to parse {}", path))
}
