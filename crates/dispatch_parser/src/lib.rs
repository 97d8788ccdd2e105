//! Parser for tool and component declaration files (YAML/TOML/JSON formats).
//!
//! This module parses declaration files into the strongly-typed
//! [`DeclarationList`] consumed by the engine's registry loader. Parsing only
//! checks the file's structure; kind-specific completeness, duplicate names and
//! handler references are checked when the registry is built.
//!
//! # Example
//!
//! ```rust
//! use dispatch_parser::parse_yaml;
//!
//! let yaml = r#"
//! version: "1"
//! contracts:
//!   - name: getPantryIngredients
//!     kind: tool
//!     handler: pantry.list
//!     inputSchema:
//!       type: object
//!     outputSchema:
//!       type: array
//!       items:
//!         type: object
//!         fields:
//!           - name: name
//!             type: string
//!           - name: category
//!             type: string
//! "#;
//!
//! let list = parse_yaml(yaml).expect("Failed to parse declarations");
//! assert_eq!(list.contracts[0].name, "getPantryIngredients");
//! ```

use dispatch_core::DeclarationList;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during declaration parsing.
#[derive(Debug, Error)]
pub enum ParserError {
    /// YAML parsing or deserialization failed
    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml_ng::Error),

    /// TOML parsing or deserialization failed
    #[error("Failed to parse TOML: {0}")]
    TomlError(String),

    /// JSON parsing or deserialization failed
    #[error("Failed to parse JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    /// File I/O error
    #[error("File I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Unsupported file format
    #[error("Unsupported file format: {0}")]
    UnsupportedFormat(String),

    /// Invalid file extension
    #[error("Invalid or missing file extension")]
    InvalidExtension,
}

/// Result type alias for parser operations.
pub type Result<T> = std::result::Result<T, ParserError>;

/// Supported declaration file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeclarationFormat {
    /// YAML format (.yml, .yaml)
    Yaml,
    /// TOML format (.toml)
    Toml,
    /// JSON format (.json)
    Json,
}

/// Parse a declaration list from a YAML string.
pub fn parse_yaml(content: &str) -> Result<DeclarationList> {
    let list: DeclarationList = serde_yaml_ng::from_str(content)?;
    Ok(list)
}

/// Parse a declaration list from a TOML string.
///
/// # Example
///
/// ```rust
/// use dispatch_parser::parse_toml;
///
/// let toml = r#"
/// [[contracts]]
/// name = "PantrySelector"
/// kind = "component"
///
/// [contracts.propsSchema]
/// type = "object"
/// fields = [{ name = "title", type = "string", optional = true }]
/// "#;
///
/// let list = parse_toml(toml).unwrap();
/// assert_eq!(list.contracts[0].name, "PantrySelector");
/// ```
pub fn parse_toml(content: &str) -> Result<DeclarationList> {
    let list: DeclarationList =
        toml::from_str(content).map_err(|e| ParserError::TomlError(e.to_string()))?;
    Ok(list)
}

/// Parse a declaration list from a JSON string.
pub fn parse_json(content: &str) -> Result<DeclarationList> {
    let list: DeclarationList = serde_json::from_str(content)?;
    Ok(list)
}

/// Detect the declaration format from a file path based on its extension.
///
/// # Supported Extensions
///
/// * `.yaml`, `.yml` → `DeclarationFormat::Yaml`
/// * `.toml` → `DeclarationFormat::Toml`
/// * `.json` → `DeclarationFormat::Json`
///
/// # Errors
///
/// Returns `ParserError::InvalidExtension` if the file has no extension.
/// Returns `ParserError::UnsupportedFormat` if the extension is not recognized.
pub fn detect_format(path: &Path) -> Result<DeclarationFormat> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .ok_or(ParserError::InvalidExtension)?;

    match extension.to_lowercase().as_str() {
        "yaml" | "yml" => Ok(DeclarationFormat::Yaml),
        "toml" => Ok(DeclarationFormat::Toml),
        "json" => Ok(DeclarationFormat::Json),
        other => Err(ParserError::UnsupportedFormat(other.to_string())),
    }
}

/// Parse a string in the given format.
pub fn parse_str(content: &str, format: DeclarationFormat) -> Result<DeclarationList> {
    match format {
        DeclarationFormat::Yaml => parse_yaml(content),
        DeclarationFormat::Toml => parse_toml(content),
        DeclarationFormat::Json => parse_json(content),
    }
}

/// Parse a declaration file with automatic format detection.
///
/// ```no_run
/// use dispatch_parser::parse_file;
/// use std::path::Path;
///
/// let list = parse_file(Path::new("declarations/kitchen.yml")).unwrap();
/// println!("Loaded {} declarations", list.len());
/// ```
pub fn parse_file(path: &Path) -> Result<DeclarationList> {
    let format = detect_format(path)?;
    let content = std::fs::read_to_string(path)?;
    parse_str(&content, format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dispatch_core::{ContractKind, FieldSchema, RetryPolicy, Schema};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::io::Write;

    const HEALTH_TOOL_YAML: &str = r#"
version: "1"
contracts:
  - name: analyzeHealthReport
    kind: tool
    description: Analyze a lab report image
    handler: health.analyze
    timeoutMs: 15000
    retry:
      maxRetries: 1
      backoffMs: 250
    inputSchema:
      type: object
      fields:
        - name: imageBase64
          type: string
          description: Base64 encoded medical report image
    outputSchema:
      type: object
      fields:
        - name: summary
          type: string
        - name: urgency
          type: enum
          values: [routine, monitor, consult_doctor]
    fallback:
      summary: Analysis temporarily unavailable. Using sample data.
      urgency: monitor
"#;

    #[test]
    fn test_parse_yaml_tool() {
        let list = parse_yaml(HEALTH_TOOL_YAML).expect("Failed to parse valid YAML");

        assert_eq!(list.version.as_deref(), Some("1"));
        assert_eq!(list.len(), 1);

        let tool = &list.contracts[0];
        assert_eq!(tool.name, "analyzeHealthReport");
        assert_eq!(tool.kind, ContractKind::Tool);
        assert_eq!(tool.handler.as_deref(), Some("health.analyze"));
        assert_eq!(tool.timeout_ms, Some(15000));
        assert_eq!(tool.retry, Some(RetryPolicy::new(1, 250)));
        assert_eq!(
            tool.fallback,
            Some(json!({
                "summary": "Analysis temporarily unavailable. Using sample data.",
                "urgency": "monitor"
            }))
        );

        let input = tool.input_schema.as_ref().unwrap();
        let image = input.field("imageBase64").unwrap();
        assert_eq!(image.schema, Schema::String);
        assert_eq!(
            image.description.as_deref(),
            Some("Base64 encoded medical report image")
        );
        assert!(tool.check().is_ok());
    }

    #[test]
    fn test_parse_yaml_component_with_nested_arrays() {
        let yaml = r#"
contracts:
  - name: MealPlanCalendar
    kind: component
    propsSchema:
      type: object
      fields:
        - name: weekPlan
          type: array
          items:
            type: object
            fields:
              - name: day
                type: enum
                values: [Monday, Tuesday, Wednesday, Thursday, Friday, Saturday, Sunday]
              - name: breakfast
                type: string
                optional: true
        - name: title
          type: string
          optional: true
"#;

        let list = parse_yaml(yaml).expect("Failed to parse component YAML");
        let component = &list.contracts[0];
        assert_eq!(component.kind, ContractKind::Component);
        assert!(list.version.is_none());

        let props = component.props_schema.as_ref().unwrap();
        let week_plan = props.field("weekPlan").unwrap();
        match &week_plan.schema {
            Schema::Array { items } => {
                assert_eq!(items.fields().len(), 2);
                assert!(items.field("breakfast").unwrap().optional);
            }
            other => panic!("Expected array schema, got {other:?}"),
        }
        assert_eq!(
            props.field("title"),
            Some(&FieldSchema::optional("title", Schema::String))
        );
    }

    #[test]
    fn test_parse_toml() {
        let toml = r#"
version = "1"

[[contracts]]
name = "searchIngredients"
kind = "tool"
handler = "pantry.search"

[contracts.inputSchema]
type = "object"
fields = [{ name = "query", type = "string" }]

[contracts.outputSchema]
type = "array"
items = { type = "object", fields = [{ name = "name", type = "string" }] }
"#;

        let list = parse_toml(toml).expect("Failed to parse TOML");
        let tool = &list.contracts[0];
        assert_eq!(tool.name, "searchIngredients");
        assert_eq!(
            tool.input_schema.as_ref().unwrap().field("query").unwrap().schema,
            Schema::String
        );
        assert!(tool.check().is_ok());
    }

    #[test]
    fn test_parse_json() {
        let content = json!({
            "contracts": [{
                "name": "DataCard",
                "kind": "component",
                "renderer": "data-card",
                "propsSchema": { "type": "object", "fields": [{ "name": "title", "type": "string" }] }
            }]
        })
        .to_string();

        let list = parse_json(&content).expect("Failed to parse JSON");
        assert_eq!(list.contracts[0].renderer.as_deref(), Some("data-card"));
    }

    #[test]
    fn test_parse_yaml_unknown_kind() {
        let yaml = r#"
contracts:
  - name: weird
    kind: widget
"#;
        assert!(matches!(parse_yaml(yaml), Err(ParserError::YamlError(_))));
    }

    #[test]
    fn test_parse_yaml_unknown_schema_type() {
        let yaml = r#"
contracts:
  - name: weird
    kind: component
    propsSchema:
      type: date
"#;
        assert!(parse_yaml(yaml).is_err());
    }

    #[test]
    fn test_parse_toml_invalid() {
        let result = parse_toml("[[contracts]\nname = ");
        assert!(matches!(result, Err(ParserError::TomlError(_))));
    }

    #[test]
    fn test_detect_format() {
        assert_eq!(
            detect_format(Path::new("a/b.yml")).unwrap(),
            DeclarationFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("b.YAML")).unwrap(),
            DeclarationFormat::Yaml
        );
        assert_eq!(
            detect_format(Path::new("b.toml")).unwrap(),
            DeclarationFormat::Toml
        );
        assert_eq!(
            detect_format(Path::new("b.json")).unwrap(),
            DeclarationFormat::Json
        );
        assert!(matches!(
            detect_format(Path::new("b")),
            Err(ParserError::InvalidExtension)
        ));
        assert!(matches!(
            detect_format(Path::new("b.xml")),
            Err(ParserError::UnsupportedFormat(ext)) if ext == "xml"
        ));
    }

    #[test]
    fn test_parse_file_yaml() {
        let mut file = tempfile::Builder::new()
            .suffix(".yaml")
            .tempfile()
            .unwrap();
        file.write_all(HEALTH_TOOL_YAML.as_bytes()).unwrap();

        let list = parse_file(file.path()).expect("Failed to parse file");
        assert_eq!(list.contracts[0].name, "analyzeHealthReport");
    }

    #[test]
    fn test_parse_file_missing() {
        let result = parse_file(Path::new("does/not/exist.yml"));
        assert!(matches!(result, Err(ParserError::IoError(_))));
    }

    #[test]
    fn test_formats_agree() {
        let from_yaml = parse_yaml(HEALTH_TOOL_YAML).unwrap();
        let as_json = serde_json::to_string(&from_yaml).unwrap();
        let from_json = parse_json(&as_json).unwrap();
        assert_eq!(from_yaml, from_json);
    }
}
