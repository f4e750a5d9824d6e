use std::future::Future;

use reqwest::Client;

use crate::api_connection::connection::ServiceError;
use crate::api_connection::endpoints::{
    Content, GenerateContentRequest, GenerationConfig, Part, Provider, Schema, SchemaType,
};
use crate::config::AnalysisConfig;
use crate::nutrition::NutritionRecord;

/// Anything that can turn a food description into a nutrition record.
pub trait NutritionAnalyzer: Send + Sync {
    fn analyze(&self, query: &str) -> impl Future<Output = Result<NutritionRecord, ServiceError>> + Send;
}

fn nutrition_response_schema() -> Schema {
    let grams = || Schema::of(SchemaType::Number).described("in grams");
    let milligrams = || Schema::of(SchemaType::Number).described("in milligrams");

    Schema::object(vec![
        ("isValidFood", Schema::of(SchemaType::Boolean)),
        ("foodName", Schema::of(SchemaType::String)),
        (
            "servingSize",
            Schema::of(SchemaType::String).described("e.g., '1 medium apple (182g)'"),
        ),
        ("calories", Schema::of(SchemaType::Number)),
        (
            "macros",
            Schema::object(vec![("protein", grams()), ("carbs", grams()), ("fat", grams())]),
        ),
        (
            "details",
            Schema::object(vec![
                ("fiber", grams()),
                ("sugar", grams()),
                ("sodium", milligrams()),
                ("cholesterol", milligrams()),
            ]),
        ),
        (
            "summary",
            Schema::of(SchemaType::String).described("A brief, 1-2 sentence nutritional overview."),
        ),
        (
            "healthTips",
            Schema::array_of(Schema::of(SchemaType::String))
                .described("3 short, bullet-point style health facts or tips about this food."),
        ),
    ])
}

fn analysis_prompt(query: &str) -> String {
    format!(
        "Analyze the nutritional value for a standard serving size of: \"{}\".
If the input is not a recognized food item (e.g., 'brick', 'laptop', 'anger'), set isValidFood to false.
Provide realistic estimates if exact data is variable.",
        query
    )
}

/// Strips an optional Markdown code fence around a JSON payload.
fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(inner) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let inner = inner.strip_prefix("json").unwrap_or(inner);
    inner.strip_suffix("```").unwrap_or(inner).trim()
}

/// Decodes the service's JSON text into a checked record.
pub fn decode_nutrition_payload(raw: &str) -> Result<NutritionRecord, ServiceError> {
    let content = strip_code_fence(raw);
    if content.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }
    let record: NutritionRecord = serde_json::from_str(content)?;
    record.validate().map_err(ServiceError::DecodeError)?;
    Ok(record)
}

/// Calls Gemini with a fixed response schema for each query.
#[derive(Debug, Clone)]
pub struct GeminiAnalysisClient {
    provider: Provider,
    model: String,
    credential_name: String,
    http: Client,
}

impl GeminiAnalysisClient {
    pub fn new(config: AnalysisConfig) -> Self {
        Self {
            provider: Provider::gemini(config.api_key, &config.base_url),
            model: config.model,
            credential_name: config.api_key_env_var,
            http: Client::new(),
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn provider(&self) -> &Provider {
        &self.provider
    }

    fn build_request(&self, query: &str) -> GenerateContentRequest {
        GenerateContentRequest {
            model: self.model.clone(),
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(analysis_prompt(query)),
                }],
            }],
            generation_config: Some(GenerationConfig {
                response_mime_type: Some("application/json".to_string()),
                response_schema: Some(nutrition_response_schema()),
            }),
        }
    }
}

impl NutritionAnalyzer for GeminiAnalysisClient {
    async fn analyze(&self, query: &str) -> Result<NutritionRecord, ServiceError> {
        let request = self.build_request(query);
        let response = self
            .provider
            .call_generate_content(&self.http, &self.credential_name, request)
            .await?;

        let Some(text) = response.text() else {
            tracing::warn!(
                finish_reason = response.finish_reason().unwrap_or("none"),
                candidates = response.candidates.len(),
                "generateContent returned no text"
            );
            return Err(ServiceError::EmptyResponse);
        };
        tracing::debug!(raw = %text, "received nutrition payload");

        decode_nutrition_payload(&text).inspect_err(|e| {
            tracing::debug!(error = %e, "failed to decode nutrition payload");
        })
    }
}
