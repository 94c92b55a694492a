//! Operation implementations.

pub mod business_data;
pub mod internal_api;
pub mod list_operations;
pub mod logic_app;
pub mod openapi;
pub mod registry;

pub use registry::{
    InvocationContext, Operation, OperationFuture, OperationRegistry, RegistryBuilder,
};
