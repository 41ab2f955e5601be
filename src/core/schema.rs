//! Compiled input schemas for registered tools.

use jsonschema::{Draft, JSONSchema};
use serde_json::Value;

/// JSON Schema validator for one tool's arguments.
pub struct ArgumentSchema {
    compiled: JSONSchema,
}

impl ArgumentSchema {
    pub fn compile(schema: &Value) -> Result<Self, String> {
        let compiled = JSONSchema::options()
            .with_draft(Draft::Draft7)
            .compile(schema)
            .map_err(|e| e.to_string())?;
        Ok(Self { compiled })
    }

    /// Validate `value`, joining every violation into one message.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        if let Err(errors) = self.compiled.validate(value) {
            let messages: Vec<String> = errors
                .map(|e| {
                    let path = e.instance_path.to_string();
                    if path.is_empty() {
                        e.to_string()
                    } else {
                        format!("{path}: {e}")
                    }
                })
                .collect();
            return Err(messages.join("; "));
        }
        Ok(())
    }
}
