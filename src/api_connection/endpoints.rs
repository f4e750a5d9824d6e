use serde::{Serialize, Deserialize};
use std::collections::BTreeMap;

pub const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GeminiAvailableModel {
    pub model_name: &'static str,
    pub description: &'static str,
}

pub const GEMINI_MODELS: &[GeminiAvailableModel] = &[
    GeminiAvailableModel {
        model_name: "gemini-2.5-flash",
        description: "fast, structured output (default)",
    },
    GeminiAvailableModel {
        model_name: "gemini-2.5-pro",
        description: "slower, more thorough estimates",
    },
    GeminiAvailableModel {
        model_name: "gemini-2.0-flash",
        description: "previous generation",
    },
];

/// A configured generative-AI backend. The credential is resolved once at
/// startup and carried here; `None` means no key was configured.
#[derive(Clone, Debug)]
pub enum Provider {
    Gemini {
        api_key: Option<String>,
        base_url: String,
        available_models: Vec<GeminiAvailableModel>,
    },
}

/// Gemini `Type` enum, serialized in the REST upper-case form.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum SchemaType {
    String,
    Number,
    Boolean,
    Array,
    Object,
}

/// Subset of the OpenAPI schema object accepted by `responseSchema`.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Schema {
    #[serde(rename = "type")]
    pub schema_type: SchemaType,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<BTreeMap<String, Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<Schema>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required: Option<Vec<String>>,
    /// Order in which the model should emit the properties.
    #[serde(rename = "propertyOrdering", skip_serializing_if = "Option::is_none")]
    pub property_ordering: Option<Vec<String>>,
}

impl Schema {
    pub fn of(schema_type: SchemaType) -> Self {
        Self {
            schema_type,
            description: None,
            properties: None,
            items: None,
            required: None,
            property_ordering: None,
        }
    }

    pub fn described(mut self, description: &str) -> Self {
        self.description = Some(description.to_string());
        self
    }

    /// Object schema where every listed property is required, emitted in the listed order.
    pub fn object(fields: Vec<(&str, Schema)>) -> Self {
        let required: Vec<String> = fields.iter().map(|(name, _)| name.to_string()).collect();
        let properties = fields
            .into_iter()
            .map(|(name, schema)| (name.to_string(), schema))
            .collect();
        Self {
            properties: Some(properties),
            property_ordering: Some(required.clone()),
            required: Some(required),
            ..Self::of(SchemaType::Object)
        }
    }

    pub fn array_of(items: Schema) -> Self {
        Self {
            items: Some(Box::new(items)),
            ..Self::of(SchemaType::Array)
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Part {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Content {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<Schema>,
}

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    #[serde(skip)]
    pub model: String,
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: Option<u32>,
    #[serde(default)]
    pub candidates_token_count: Option<u32>,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
}

impl GenerateContentResponse {
    /// Why the first candidate stopped, or `None` when there is no candidate.
    pub fn finish_reason(&self) -> Option<&str> {
        self.candidates.first()?.finish_reason.as_deref()
    }

    /// Concatenated text of the first candidate, if it produced any.
    pub fn text(&self) -> Option<String> {
        let content = self.candidates.first()?.content.as_ref()?;
        let text: String = content
            .parts
            .iter()
            .filter_map(|part| part.text.as_deref())
            .collect();
        if text.trim().is_empty() {
            None
        } else {
            Some(text)
        }
    }
}
