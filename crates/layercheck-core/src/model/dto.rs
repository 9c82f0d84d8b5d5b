//! JSON deserialization types (DTO layer) for the symbol model.
//!
//! These types mirror the front end's wire format and exist solely for
//! serde. They are converted to domain model types via the loader.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Raw representation of a whole model (or one shard of it).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SymbolModelDto {
    /// Module id -> module.
    #[serde(default)]
    pub modules: BTreeMap<String, ModuleDto>,
}

impl SymbolModelDto {
    /// Parses a model from JSON text.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or does not match the schema.
    pub fn from_json(content: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(content)
    }
}

/// Raw representation of a module.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModuleDto {
    /// Layer tag (`domain`, `application`, `infrastructure`, `api`).
    pub layer: String,
    /// Whether the front end considers this a test module.
    #[serde(default)]
    pub test: bool,
    /// Declared symbols.
    #[serde(default)]
    pub symbols: Vec<SymbolDto>,
}

/// Raw representation of a symbol.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SymbolDto {
    /// Globally unique id.
    pub id: String,
    /// Name as written in source.
    pub name: String,
    /// Kind tag (`type`, `interface`, `method`, `property`).
    pub kind: String,
    /// Outgoing references.
    #[serde(default)]
    pub references: Vec<ReferenceDto>,
    /// Structural metrics.
    #[serde(default)]
    pub metrics: MetricsDto,
    /// Parameter names.
    #[serde(default)]
    pub parameters: Vec<String>,
    /// Local variable names.
    #[serde(default)]
    pub locals: Vec<String>,
    /// Blocking-wait call shapes (`result`, `wait`, `get-result`, `wait-all`, `wait-any`).
    #[serde(default)]
    pub blocking_waits: Vec<String>,
    /// Rule suppressions.
    #[serde(default)]
    pub suppressions: Vec<SuppressionDto>,
}

/// Raw reference: `{"symbol": "..."}` or `{"module": "..."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReferenceDto {
    /// Reference to a symbol id.
    Symbol(String),
    /// Reference to a module id.
    Module(String),
}

/// Raw structural metrics.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct MetricsDto {
    /// Deepest nesting level.
    #[serde(default)]
    pub nesting_depth: u32,
    /// Line count.
    #[serde(default)]
    pub line_count: u32,
    /// Parameter count.
    #[serde(default)]
    pub parameter_count: u32,
}

/// Raw suppression entry.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuppressionDto {
    /// Rule id to suppress.
    pub rule: String,
    /// Justification.
    #[serde(default)]
    pub reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_empty() {
        let dto = SymbolModelDto::from_json("{}").unwrap();
        assert!(dto.modules.is_empty());
    }

    #[test]
    fn deserialize_full_module() {
        let json = r#"{
          "modules": {
            "Shop.Domain": {
              "layer": "domain",
              "symbols": [
                {
                  "id": "Shop.Domain.Order",
                  "name": "Order",
                  "kind": "type",
                  "references": [{ "symbol": "Shop.Domain.Line" }, { "module": "Shop.Shared" }],
                  "metrics": { "nesting_depth": 2, "line_count": 40 },
                  "blocking_waits": ["result"],
                  "suppressions": [{ "rule": "naming", "reason": "generated" }]
                }
              ]
            }
          }
        }"#;
        let dto = SymbolModelDto::from_json(json).unwrap();
        let module = &dto.modules["Shop.Domain"];
        assert_eq!(module.layer, "domain");
        assert!(!module.test);
        let symbol = &module.symbols[0];
        assert_eq!(
            symbol.references,
            vec![
                ReferenceDto::Symbol("Shop.Domain.Line".to_string()),
                ReferenceDto::Module("Shop.Shared".to_string())
            ]
        );
        assert_eq!(symbol.metrics.line_count, 40);
        assert_eq!(symbol.metrics.parameter_count, 0);
        assert_eq!(symbol.suppressions[0].reason.as_deref(), Some("generated"));
    }

    #[test]
    fn missing_layer_is_an_error() {
        let json = r#"{ "modules": { "A": { "symbols": [] } } }"#;
        assert!(SymbolModelDto::from_json(json).is_err());
    }
}
