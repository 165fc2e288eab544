//! Tool argument extraction and pre-flight validation
//!
//! Validation runs before any handler so that malformed calls are answered
//! locally without a network round trip.

use std::fmt;

use jsonschema::JSONSchema;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{McpError, McpResult};

/// Argument bag of a tool call
pub type Arguments = Map<String, Value>;

/// Turn the raw `arguments` member of a tool call into an argument bag.
/// Absent or null arguments are an empty bag.
pub fn into_arguments(raw: Value) -> McpResult<Arguments> {
    match raw {
        Value::Null => Ok(Arguments::new()),
        Value::Object(map) => Ok(map),
        other => Err(McpError::InvalidArgument(format!(
            "arguments must be an object, got {}",
            json_type(&other)
        ))),
    }
}

/// Deserialize a validated argument bag into a typed input
pub fn parse<T: DeserializeOwned>(args: Arguments) -> McpResult<T> {
    serde_json::from_value(Value::Object(args)).map_err(|e| McpError::InvalidArgument(e.to_string()))
}

/// Numeric default where `0` counts as absent
pub fn default_when_falsy(value: Option<u64>, default: u64) -> u64 {
    match value {
        Some(v) if v != 0 => v,
        _ => default,
    }
}

/// Compiled input schema of one tool
pub struct ArgumentValidator {
    required: Vec<String>,
    schema: JSONSchema,
}

impl ArgumentValidator {
    pub fn compile(schema: &Value) -> McpResult<Self> {
        let required = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|fields| {
                fields
                    .iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();

        let schema = JSONSchema::compile(schema)
            .map_err(|e| McpError::Internal(format!("invalid tool schema: {}", e)))?;

        Ok(Self { required, schema })
    }

    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Check presence of required fields, then the schema.
    ///
    /// Null members are dropped first so that an explicit `null` behaves like
    /// an absent argument.
    pub fn validate(&self, mut args: Arguments) -> McpResult<Arguments> {
        args.retain(|_, value| !value.is_null());

        if let Some(missing) = self.required.iter().find(|field| !args.contains_key(*field)) {
            return Err(McpError::MissingArgument(missing.clone()));
        }

        let instance = Value::Object(args);
        if let Err(errors) = self.schema.validate(&instance) {
            let messages: Vec<String> = errors.map(|e| e.to_string()).collect();
            return Err(McpError::InvalidArgument(messages.join("; ")));
        }

        match instance {
            Value::Object(args) => Ok(args),
            _ => Err(McpError::Internal("argument bag is not an object".to_string())),
        }
    }
}

impl fmt::Debug for ArgumentValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ArgumentValidator")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validator() -> ArgumentValidator {
        ArgumentValidator::compile(&json!({
            "type": "object",
            "required": ["query"],
            "properties": {
                "query": {"type": "string"},
                "limit": {"type": "integer", "minimum": 0}
            }
        }))
        .unwrap()
    }

    fn bag(value: Value) -> Arguments {
        into_arguments(value).unwrap()
    }

    #[test]
    fn test_required_presence() {
        let err = validator().validate(bag(json!({}))).unwrap_err();
        assert!(matches!(err, McpError::MissingArgument(ref f) if f == "query"));
    }

    #[test]
    fn test_null_counts_as_missing() {
        let err = validator().validate(bag(json!({"query": null}))).unwrap_err();
        assert!(matches!(err, McpError::MissingArgument(_)));
    }

    #[test]
    fn test_type_mismatch() {
        let err = validator()
            .validate(bag(json!({"query": "Acme", "limit": "ten"})))
            .unwrap_err();
        assert!(matches!(err, McpError::InvalidArgument(_)));
    }

    #[test]
    fn test_valid_arguments_pass_through() {
        let args = validator()
            .validate(bag(json!({"query": "Acme", "limit": 5, "extra": null})))
            .unwrap();
        assert_eq!(args.get("query"), Some(&json!("Acme")));
        assert!(!args.contains_key("extra"));
    }

    #[test]
    fn test_non_object_arguments() {
        assert!(into_arguments(Value::Null).unwrap().is_empty());
        assert!(matches!(
            into_arguments(json!([1, 2])),
            Err(McpError::InvalidArgument(ref m)) if m.contains("array")
        ));
    }

    #[test]
    fn test_default_when_falsy() {
        assert_eq!(default_when_falsy(None, 10), 10);
        assert_eq!(default_when_falsy(Some(0), 10), 10);
        assert_eq!(default_when_falsy(Some(3), 10), 3);
    }
}
