//! `list_operations` operation: Advertise the operation catalog.

use serde_json::{json, Map, Value};

use crate::types::{GatewayResult, OperationDefinition, Parameters};

use super::registry::{InvocationContext, Operation, OperationFuture};

pub const NAME: &str = "list_operations";

pub fn definition() -> OperationDefinition {
    OperationDefinition::new(NAME, "Lists the operations available on this server")
}

/// Lists the registry restricted to the configured allow-list. The
/// allow-list only narrows this listing; unlisted operations stay invokable.
pub struct ListOperations;

fn list(ctx: InvocationContext<'_>) -> GatewayResult<Value> {
    let allowed = &ctx.config.allowed_operations;
    let visible = allowed.filter(ctx.registry.definitions(), |d| d.name.as_str());

    tracing::debug!(
        request_id = ctx.request_id,
        allow_list = %allowed,
        visible = visible.len(),
        total = ctx.registry.len(),
        "Listing operations"
    );

    let mut operations = Map::new();
    for definition in visible {
        operations.insert(definition.name.clone(), serde_json::to_value(definition)?);
    }

    Ok(json!({ "operations": operations }))
}

impl Operation for ListOperations {
    fn definition(&self) -> OperationDefinition {
        definition()
    }

    fn invoke<'a>(
        &'a self,
        ctx: InvocationContext<'a>,
        _params: &'a Parameters,
    ) -> OperationFuture<'a> {
        Box::pin(async move { list(ctx) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use crate::operations::OperationRegistry;

    fn run(config: &GatewayConfig) -> Value {
        let registry = OperationRegistry::standard(config).unwrap();
        let ctx = InvocationContext {
            request_id: "r1",
            registry: &registry,
            config,
        };
        list(ctx).unwrap()
    }

    #[test]
    fn test_lists_everything_without_allow_list() {
        let result = run(&GatewayConfig::default());
        let operations = result["operations"].as_object().unwrap();
        assert_eq!(operations.len(), 5);
        for name in [
            "getBusinessData",
            "triggerLogicApp",
            "callInternalApi",
            "list_operations",
            "get_openapi_spec",
        ] {
            assert_eq!(operations[name]["name"], json!(name));
        }
    }

    #[test]
    fn test_allow_list_restricts_listing() {
        let config = GatewayConfig::default().with_allowed_operations("getBusinessData,list_operations");
        let result = run(&config);
        let operations = result["operations"].as_object().unwrap();
        let keys: Vec<&String> = operations.keys().collect();
        assert_eq!(keys, vec!["getBusinessData", "list_operations"]);
        assert_eq!(
            operations["getBusinessData"],
            serde_json::to_value(crate::operations::business_data::definition()).unwrap()
        );
    }

    #[test]
    fn test_unknown_allow_list_entries_are_ignored() {
        let config = GatewayConfig::default().with_allowed_operations("ghost");
        let result = run(&config);
        assert!(result["operations"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_invoke_through_trait() {
        let registry = OperationRegistry::standard(&GatewayConfig::default()).unwrap();
        let config = GatewayConfig::default();
        let ctx = InvocationContext {
            request_id: "r1",
            registry: &registry,
            config: &config,
        };
        let params = Parameters::new();
        let result = tokio_test::block_on(ListOperations.invoke(ctx, &params)).unwrap();
        assert_eq!(result["operations"].as_object().unwrap().len(), 5);
    }
}
