//! Gemini API integration.
//!
//! Implements the DesignProvider trait over the `generateContent` REST endpoint.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::{placeholder_image_url, prompts, strip_code_fences, AIError, DesignProvider, EncodedImage};
use crate::analysis::{new_scrape_id, AnalysisData, AnalysisResult};
use crate::core::AiConfig;
use crate::generation::{AssetKind, GeneratedAsset, GeneratedSite};
use crate::preferences::UserPreferences;

const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini API provider.
pub struct GeminiProvider {
    client: Client,
    api_key: String,
    model: String,
    image_model: String,
    base_url: String,
}

impl GeminiProvider {
    /// Create a new Gemini provider.
    ///
    /// Reads API key from GEMINI_API_KEY environment variable.
    pub fn new() -> anyhow::Result<Self> {
        Self::from_config(&AiConfig::default())
    }

    /// Create from the `[ai]` config section.
    pub fn from_config(config: &AiConfig) -> anyhow::Result<Self> {
        let api_key = std::env::var(&config.api_key_env)
            .ok()
            .filter(|key| !key.is_empty())
            .ok_or_else(|| {
                AIError::ProviderNotAvailable(format!("{} not set", config.api_key_env))
            })?;

        Ok(Self {
            client: Client::new(),
            api_key,
            model: config.model.clone(),
            image_model: config.image_model.clone(),
            base_url: config.base_url.clone().unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
        })
    }

    /// Create with a specific text model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create with a specific image model.
    pub fn with_image_model(mut self, model: impl Into<String>) -> Self {
        self.image_model = model.into();
        self
    }

    /// Create with a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Make a request to the Gemini API.
    async fn request(&self, model: &str, request: &GenerateRequest) -> anyhow::Result<Vec<Part>> {
        let response = self
            .client
            .post(format!("{}/models/{}:generateContent", self.base_url, model))
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AIError::ApiError(format!("({status}): {body}")).into());
        }

        let response: GenerateResponse = response.json().await?;

        response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|c| c.parts)
            .filter(|parts| !parts.is_empty())
            .ok_or_else(|| AIError::NoResponse.into())
    }

    /// Request text output and concatenate all text parts.
    async fn request_text(&self, request: &GenerateRequest) -> anyhow::Result<String> {
        let parts = self.request(&self.model, request).await?;
        let text: String = parts.into_iter().filter_map(|p| p.text).collect();

        if text.trim().is_empty() {
            return Err(AIError::NoResponse.into());
        }
        Ok(text)
    }

    /// Request JSON output matching `schema` and deserialize it.
    async fn request_json<T: serde::de::DeserializeOwned>(
        &self,
        parts: Vec<Part>,
        schema: serde_json::Value,
    ) -> anyhow::Result<T> {
        let request = GenerateRequest {
            contents: vec![Content { parts }],
            generation_config: Some(GenerationConfig {
                response_mime_type: "application/json".to_string(),
                response_schema: schema,
            }),
            tools: None,
        };

        let text = self.request_text(&request).await?;
        serde_json::from_str(&text).map_err(|e| AIError::MalformedResponse(e.to_string()).into())
    }

    async fn request_html(&self, prompt: String) -> anyhow::Result<String> {
        let html = strip_code_fences(&self.request_text(&GenerateRequest::text(prompt)).await?);
        if html.is_empty() {
            return Err(AIError::NoResponse.into());
        }
        Ok(html)
    }

    async fn try_generate_image(&self, prompt: &str) -> anyhow::Result<String> {
        let parts = self.request(&self.image_model, &GenerateRequest::text(prompt.to_string())).await?;

        parts
            .into_iter()
            .find_map(|p| p.inline_data)
            .map(|data| format!("data:{};base64,{}", data.mime_type, data.data))
            .ok_or_else(|| anyhow::anyhow!("No image data generated"))
    }
}

#[async_trait]
impl DesignProvider for GeminiProvider {
    async fn analyze_from_images(
        &self,
        images: &[EncodedImage],
    ) -> anyhow::Result<AnalysisResult> {
        if images.is_empty() {
            anyhow::bail!("No screenshots to analyze");
        }

        let mut parts: Vec<Part> = images
            .iter()
            .map(|img| Part::inline(InlineData {
                mime_type: img.mime_type.clone(),
                data: img.data.clone(),
            }))
            .collect();
        parts.push(Part::text(prompts::SCREENSHOT_ANALYSIS));

        self.request_json(parts, analysis_schema()).await
    }

    async fn analyze_from_url(&self, url: &str) -> anyhow::Result<AnalysisResult> {
        let mut research = GenerateRequest::text(prompts::url_research(url));
        research.tools = Some(vec![json!({ "googleSearch": {} })]);
        let findings = self.request_text(&research).await?;

        tracing::debug!(url, chars = findings.len(), "URL research complete");

        self.request_json(vec![Part::text(prompts::url_structure(url, &findings))], analysis_schema())
            .await
    }

    async fn fetch_structured_analysis(&self, url: &str) -> anyhow::Result<AnalysisData> {
        let mut data: AnalysisData = self
            .request_json(vec![Part::text(prompts::structured_analysis(url))], structured_schema())
            .await?;

        if data.scrape_id.is_empty() {
            data.scrape_id = new_scrape_id();
        }
        data.original_url = url.to_string();
        Ok(data)
    }

    async fn generate_image(&self, prompt: &str, kind: AssetKind) -> GeneratedAsset {
        let url = match self.try_generate_image(prompt).await {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(error = %e, ?kind, "Image generation failed, using placeholder");
                placeholder_image_url(kind)
            }
        };

        GeneratedAsset { kind, url, prompt: prompt.to_string() }
    }

    async fn compile(
        &self,
        data: &AnalysisData,
        preferences: &UserPreferences,
    ) -> anyhow::Result<GeneratedSite> {
        let hero = self
            .generate_image(&prompts::compile_hero_image(data, preferences), AssetKind::Hero)
            .await;

        let html = self.request_html(prompts::compile_site(data, preferences, &hero.url)).await?;

        Ok(GeneratedSite { html, hero_image_url: hero.url })
    }

    async fn refine_structured(
        &self,
        html: &str,
        instruction: &str,
        data: &AnalysisData,
    ) -> anyhow::Result<String> {
        self.request_html(prompts::structured_refine(html, instruction, data)).await
    }

    async fn generate_html(
        &self,
        analysis: &AnalysisResult,
        assets: &[GeneratedAsset],
    ) -> anyhow::Result<String> {
        self.request_html(prompts::legacy_html(analysis, assets)).await
    }

    async fn refine_legacy(&self, html: &str, instruction: &str) -> anyhow::Result<String> {
        self.request_html(prompts::legacy_refine(html, instruction)).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// JSON schema for the legacy analysis shape.
fn analysis_schema() -> serde_json::Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "businessName": { "type": "STRING" },
            "businessType": { "type": "STRING" },
            "primaryColor": { "type": "STRING" },
            "secondaryColor": { "type": "STRING" },
            "accentColor": { "type": "STRING" },
            "designIssues": { "type": "ARRAY", "items": { "type": "STRING" } },
            "extractedContent": {
                "type": "OBJECT",
                "properties": {
                    "headline": { "type": "STRING" },
                    "description": { "type": "STRING" },
                    "services": { "type": "ARRAY", "items": { "type": "STRING" } },
                    "contactInfo": { "type": "STRING" }
                }
            },
            "recommendedStyle": { "type": "STRING" }
        },
        "required": [
            "businessName", "businessType", "primaryColor", "secondaryColor",
            "designIssues", "extractedContent", "recommendedStyle"
        ]
    })
}

/// JSON schema for the structured analysis shape.
fn structured_schema() -> serde_json::Value {
    let strings = json!({ "type": "ARRAY", "items": { "type": "STRING" } });
    json!({
        "type": "OBJECT",
        "properties": {
            "textContent": {
                "type": "OBJECT",
                "properties": {
                    "headings": strings,
                    "paragraphs": strings,
                    "ctas": strings,
                    "contactInfo": {
                        "type": "OBJECT",
                        "properties": {
                            "phone": { "type": "STRING" },
                            "email": { "type": "STRING" },
                            "address": { "type": "STRING" }
                        }
                    }
                }
            },
            "designTokens": {
                "type": "OBJECT",
                "properties": { "colors": strings, "fonts": strings }
            },
            "scrapedImages": {
                "type": "OBJECT",
                "properties": {
                    "logoUrl": { "type": "STRING" },
                    "heroUrl": { "type": "STRING" },
                    "galleryUrls": strings
                }
            }
        },
        "required": ["textContent", "designTokens"]
    })
}

/// Gemini generateContent request.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<serde_json::Value>>,
}

impl GenerateRequest {
    fn text(prompt: String) -> Self {
        Self {
            contents: vec![Content { parts: vec![Part { text: Some(prompt), inline_data: None }] }],
            generation_config: None,
            tools: None,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_mime_type: String,
    response_schema: serde_json::Value,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

/// A text or inline-data part of a message.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    inline_data: Option<InlineData>,
}

impl Part {
    fn text(text: impl Into<String>) -> Self {
        Self { text: Some(text.into()), inline_data: None }
    }

    fn inline(data: InlineData) -> Self {
        Self { text: None, inline_data: Some(data) }
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

/// Gemini generateContent response.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}
