use cprof_core::PayloadSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Untyped provider response plus the schema tag that tells the normalizer
/// how to read it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPayload {
    pub schema: PayloadSchema,
    pub body: Value,
}

impl RawPayload {
    #[must_use]
    pub fn new(schema: PayloadSchema, body: Value) -> Self {
        Self { schema, body }
    }
}
