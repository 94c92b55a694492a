//! Typed access to the free-form parameter bag of an invocation.

use serde_json::{Map, Value};

use crate::types::ParameterError;

/// Parameters of an invocation: unique string keys to arbitrary JSON values.
pub type Parameters = Map<String, Value>;

/// Accessors handlers use instead of poking at raw JSON.
///
/// A key that is missing or holds `null` reads as `None`. A key holding a
/// value of the wrong JSON type is an error, except through `lenient_str`.
pub trait ParameterBag {
    fn optional_value(&self, name: &str) -> Option<&Value>;

    fn optional_str(&self, name: &str) -> Result<Option<&str>, ParameterError> {
        match self.optional_value(name) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.as_str())),
            Some(_) => Err(ParameterError::WrongType {
                name: name.to_string(),
                expected: "a string",
            }),
        }
    }

    /// Like [`ParameterBag::optional_str`], but a value of another JSON type
    /// reads as `None`. For parameters that are accepted but not acted on.
    fn lenient_str(&self, name: &str) -> Option<&str> {
        self.optional_value(name).and_then(Value::as_str)
    }
}

impl ParameterBag for Parameters {
    fn optional_value(&self, name: &str) -> Option<&Value> {
        self.get(name).filter(|v| !v.is_null())
    }
}
