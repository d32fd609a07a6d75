//! The model-provider boundary.
//!
//! Every flow in the crate talks to the language model through
//! [`ModelProvider::invoke`]: a rendered instruction plus the shape of the
//! answer it expects back. The provider returns the populated structure, no
//! structure at all (`Ok(None)`), or a [`ProviderError`].

use async_trait::async_trait;
use serde_json::{Map, Value, json};

use crate::error::ProviderError;

/// A named string field the model must fill in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaField {
    pub name: &'static str,
    pub description: &'static str,
    pub required: bool,
}

impl SchemaField {
    pub const fn required(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, description: &'static str) -> Self {
        Self {
            name,
            description,
            required: false,
        }
    }
}

/// The declared shape of a structured reply: a fixed set of string fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputSchema {
    pub name: &'static str,
    pub fields: Vec<SchemaField>,
}

impl OutputSchema {
    pub fn new(name: &'static str, fields: Vec<SchemaField>) -> Self {
        Self { name, fields }
    }

    /// Strict structured outputs need every property listed as required.
    pub fn is_strict(&self) -> bool {
        self.fields.iter().all(|field| field.required)
    }

    pub fn to_json_schema(&self) -> Value {
        let properties: Map<String, Value> = self
            .fields
            .iter()
            .map(|field| {
                (
                    field.name.to_string(),
                    json!({
                        "type": "string",
                        "description": field.description,
                    }),
                )
            })
            .collect();

        let required: Vec<&str> = self
            .fields
            .iter()
            .filter(|field| field.required)
            .map(|field| field.name)
            .collect();

        json!({
            "type": "object",
            "properties": properties,
            "required": required,
            "additionalProperties": false,
        })
    }
}

/// One call to the model: which flow is asking, what it says, what it expects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    pub flow: &'static str,
    pub prompt: String,
    pub output: OutputSchema,
}

#[async_trait]
pub trait ModelProvider: Send + Sync {
    async fn invoke(&self, request: ModelRequest) -> Result<Option<Value>, ProviderError>;
}
