use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;

use crate::core::error::{DispatchError, RegistryError};
use crate::core::schema::ArgumentSchema;
use crate::core::tool::Tool;

struct Entry {
    tool: Arc<dyn Tool>,
    schema: ArgumentSchema,
}

/// Sealed, read-only mapping from tool name to handler.
#[derive(Clone)]
pub struct ToolRegistry {
    by_name: Arc<BTreeMap<&'static str, Entry>>,
}

/// Accumulates tools before the registry is sealed.
#[derive(Default)]
pub struct RegistryBuilder {
    by_name: BTreeMap<&'static str, Entry>,
}

impl RegistryBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<T: Tool + 'static>(self, tool: T) -> Result<Self, RegistryError> {
        self.register_arc(Arc::new(tool))
    }

    pub fn register_arc(mut self, tool: Arc<dyn Tool>) -> Result<Self, RegistryError> {
        let name = tool.name();
        if self.by_name.contains_key(name) {
            return Err(RegistryError::DuplicateTool(name));
        }
        let schema = ArgumentSchema::compile(&tool.input_schema())
            .map_err(|message| RegistryError::InvalidSchema { tool: name, message })?;
        tracing::debug!(tool = name, "registered tool");
        self.by_name.insert(name, Entry { tool, schema });
        Ok(self)
    }

    pub fn build(self) -> ToolRegistry {
        ToolRegistry { by_name: Arc::new(self.by_name) }
    }
}

impl ToolRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::new()
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.by_name.keys().copied().collect()
    }

    /// Ordered by name.
    pub fn list(&self) -> Vec<ToolMeta> {
        self.by_name
            .values()
            .map(|e| ToolMeta {
                name: e.tool.name(),
                description: e.tool.description(),
                input_schema: e.tool.input_schema(),
                output_schema: e.tool.output_schema(),
            })
            .collect()
    }

    /// Look up, validate, then run. Arguments that fail the declared schema
    /// never reach the handler. `Null` arguments count as `{}`.
    pub async fn dispatch(
        &self,
        name: &str,
        arguments: &serde_json::Value,
    ) -> Result<serde_json::Value, DispatchError> {
        let entry = self.by_name.get(name).ok_or_else(|| {
            crate::infra::logging::log_metric(name, "unknown_tool_total", 1.0);
            DispatchError::UnknownTool(name.to_owned())
        })?;

        let empty = serde_json::Value::Object(serde_json::Map::new());
        let arguments = if arguments.is_null() { &empty } else { arguments };

        entry.schema.validate(arguments).map_err(|message| {
            crate::infra::logging::log_metric(name, "invalid_argument_total", 1.0);
            DispatchError::InvalidArgument { tool: name.to_owned(), message }
        })?;

        tracing::debug!(tool = name, "dispatching tool call");
        let start = Instant::now();
        let res = entry.tool.call(arguments).await;
        crate::infra::logging::log_metric(name, "latency_ms", start.elapsed().as_millis() as f64);
        res.map_err(|e| {
            crate::infra::logging::log_metric(name, "error_total", 1.0);
            let err = DispatchError::from_tool(name, e);
            tracing::warn!(tool = name, error = %err, "tool call failed");
            err
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ToolMeta {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: serde_json::Value,
    pub output_schema: Option<serde_json::Value>,
}
