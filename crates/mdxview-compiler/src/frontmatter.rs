//! YAML front matter.

use serde_json::Value;

use crate::error::CompileError;

/// Front matter block at the start of a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct FrontMatter<'a> {
    /// YAML between the `---` delimiter lines.
    pub yaml: &'a str,
    /// Byte offset where the document body starts (after the closing line).
    pub body_start: usize,
}

/// Locate a `---` delimited front matter block at the very start of `text`.
pub(crate) fn locate(text: &str) -> Option<FrontMatter<'_>> {
    let first_end = text.find('\n')?;
    if text[..first_end].trim_end() != "---" {
        return None;
    }

    let yaml_start = first_end + 1;
    let mut offset = yaml_start;
    for line in text[yaml_start..].split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        if line.trim_end() == "---" {
            return Some(FrontMatter {
                yaml: &text[yaml_start..line_start],
                body_start: offset,
            });
        }
    }
    None
}

/// Parse front matter YAML into a JSON value.
///
/// Empty front matter becomes an empty object.
pub(crate) fn parse(yaml: &str) -> Result<Value, CompileError> {
    if yaml.trim().is_empty() {
        return Ok(Value::Object(serde_json::Map::new()));
    }
    match serde_yaml::from_str::<Value>(yaml) {
        Ok(Value::Null) => Ok(Value::Object(serde_json::Map::new())),
        Ok(value) => Ok(value),
        Err(e) => Err(CompileError::FrontMatter(e.to_string())),
    }
}
