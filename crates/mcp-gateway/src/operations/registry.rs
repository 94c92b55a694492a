//! Operation registration and lookup.

use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;

use crate::config::GatewayConfig;
use crate::types::{GatewayError, GatewayResult, OperationDefinition, Parameters};

use super::{business_data, internal_api, list_operations, logic_app, openapi};

/// Future returned by an operation call.
pub type OperationFuture<'a> = Pin<Box<dyn Future<Output = GatewayResult<Value>> + Send + 'a>>;

/// Everything an operation may consult besides its parameters.
#[derive(Clone, Copy)]
pub struct InvocationContext<'a> {
    pub request_id: &'a str,
    pub registry: &'a OperationRegistry,
    pub config: &'a GatewayConfig,
}

/// The contract every operation handler satisfies.
///
/// Implementations must not block the runtime: I/O (or simulated I/O) is
/// awaited inside the returned future. An `Err` is a fault and is reported
/// as an internal error by the top-level request handler.
pub trait Operation: Send + Sync {
    fn definition(&self) -> OperationDefinition;

    fn invoke<'a>(
        &'a self,
        ctx: InvocationContext<'a>,
        params: &'a Parameters,
    ) -> OperationFuture<'a>;
}

struct RegisteredOperation {
    definition: OperationDefinition,
    handler: Arc<dyn Operation>,
}

/// Immutable catalog of operations, built once at startup.
pub struct OperationRegistry {
    entries: BTreeMap<String, RegisteredOperation>,
}

impl OperationRegistry {
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// The reference catalog: three integrations plus the two standard
    /// operations every server exposes.
    pub fn standard(config: &GatewayConfig) -> GatewayResult<Self> {
        let latency = config.simulated_latency;
        Ok(Self::builder()
            .register(business_data::GetBusinessData::new(latency))?
            .register(logic_app::TriggerLogicApp::new(latency))?
            .register(internal_api::CallInternalApi::new(latency))?
            .register(list_operations::ListOperations)?
            .register(openapi::GetOpenApiSpec)?
            .build())
    }

    /// Exact, case-sensitive lookup.
    pub fn get(&self, name: &str) -> Option<&dyn Operation> {
        self.entries.get(name).map(|entry| entry.handler.as_ref())
    }

    pub fn definition(&self, name: &str) -> Option<&OperationDefinition> {
        self.entries.get(name).map(|entry| &entry.definition)
    }

    /// All definitions, ordered by name.
    pub fn definitions(&self) -> impl Iterator<Item = &OperationDefinition> {
        self.entries.values().map(|entry| &entry.definition)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Collects operations before the registry is frozen.
#[derive(Default)]
pub struct RegistryBuilder {
    entries: BTreeMap<String, RegisteredOperation>,
}

impl RegistryBuilder {
    pub fn register(self, operation: impl Operation + 'static) -> GatewayResult<Self> {
        self.register_arc(Arc::new(operation))
    }

    pub fn register_arc(mut self, handler: Arc<dyn Operation>) -> GatewayResult<Self> {
        let definition = handler.definition();
        if self.entries.contains_key(&definition.name) {
            return Err(GatewayError::DuplicateOperation(definition.name));
        }
        tracing::debug!("Registered operation {}", definition.name);
        self.entries.insert(
            definition.name.clone(),
            RegisteredOperation {
                definition,
                handler,
            },
        );
        Ok(self)
    }

    pub fn build(self) -> OperationRegistry {
        OperationRegistry {
            entries: self.entries,
        }
    }
}
