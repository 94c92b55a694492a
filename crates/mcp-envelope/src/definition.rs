//! Operation definitions as advertised by `list_operations`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Name, description, and parameter documentation of one operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationDefinition {
    pub name: String,
    pub description: String,
    /// Parameter name to a human-readable description.
    #[serde(default)]
    pub parameters: BTreeMap<String, String>,
}

impl OperationDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            parameters: BTreeMap::new(),
        }
    }

    pub fn with_parameter(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        self.parameters.insert(name.into(), description.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_definition_wire_shape() {
        let def = OperationDefinition::new("getBusinessData", "Fetch business data")
            .with_parameter("period", "Reporting period");
        assert_eq!(
            serde_json::to_value(&def).unwrap(),
            json!({
                "name": "getBusinessData",
                "description": "Fetch business data",
                "parameters": { "period": "Reporting period" }
            })
        );
    }

    #[test]
    fn test_definition_without_parameters() {
        let def = OperationDefinition::new("list_operations", "List operations");
        assert_eq!(serde_json::to_value(&def).unwrap()["parameters"], json!({}));
    }
}
