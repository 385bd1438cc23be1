//! AI backend integration.
//!
//! Everything the pipeline asks of the generative backend goes through the
//! [`DesignProvider`] trait: screenshot/URL analysis, image synthesis, HTML
//! synthesis and refinement. The pipeline only sequences these calls and
//! reconciles their results; it never looks inside them.

#[cfg(feature = "ai")]
mod gemini;
#[cfg(test)]
pub(crate) mod mock;
pub mod prompts;

#[cfg(feature = "ai")]
pub use gemini::GeminiProvider;

use std::path::Path;

use async_trait::async_trait;
use base64::Engine as _;

use crate::analysis::{AnalysisData, AnalysisResult};
use crate::generation::{AssetKind, GeneratedAsset, GeneratedSite};
use crate::preferences::UserPreferences;

/// Trait for design backends.
#[async_trait]
pub trait DesignProvider: Send + Sync {
    /// Extract a legacy analysis from one or more screenshots.
    async fn analyze_from_images(&self, images: &[EncodedImage])
        -> anyhow::Result<AnalysisResult>;

    /// Research a URL and extract a legacy analysis.
    async fn analyze_from_url(&self, url: &str) -> anyhow::Result<AnalysisResult>;

    /// Fetch the structured analysis of a URL.
    async fn fetch_structured_analysis(&self, url: &str) -> anyhow::Result<AnalysisData>;

    /// Generate an image.
    ///
    /// Never fails: implementations fall back to a placeholder URL when the
    /// upstream request does not produce an image.
    async fn generate_image(&self, prompt: &str, kind: AssetKind) -> GeneratedAsset;

    /// Compile a full site from structured analysis and user preferences.
    async fn compile(
        &self,
        data: &AnalysisData,
        preferences: &UserPreferences,
    ) -> anyhow::Result<GeneratedSite>;

    /// Apply an instruction to a compiled site.
    async fn refine_structured(
        &self,
        html: &str,
        instruction: &str,
        data: &AnalysisData,
    ) -> anyhow::Result<String>;

    /// Synthesize HTML from a legacy analysis and already generated assets.
    async fn generate_html(
        &self,
        analysis: &AnalysisResult,
        assets: &[GeneratedAsset],
    ) -> anyhow::Result<String>;

    /// Apply an instruction to a legacy-generated site.
    async fn refine_legacy(&self, html: &str, instruction: &str) -> anyhow::Result<String>;

    /// Get the provider name.
    fn name(&self) -> &str;
}

/// AI error types.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    #[error("Provider not available: {0}")]
    ProviderNotAvailable(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("No response from AI")]
    NoResponse,

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

/// A base64-encoded image ready to be sent inline to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedImage {
    /// MIME type, e.g. `image/png`
    pub mime_type: String,
    /// Base64 payload without any `data:` prefix
    pub data: String,
}

impl EncodedImage {
    /// Create from a base64 payload or a `data:<mime>;base64,<payload>` URL.
    pub fn from_data_url(input: &str) -> Self {
        match input.split_once(',') {
            Some((header, payload)) => {
                let mime_type = header
                    .strip_prefix("data:")
                    .and_then(|rest| rest.split(';').next())
                    .filter(|mime| !mime.is_empty())
                    .unwrap_or("image/png");
                Self { mime_type: mime_type.to_string(), data: payload.to_string() }
            }
            None => Self { mime_type: "image/png".to_string(), data: input.to_string() },
        }
    }

    /// Encode raw bytes.
    pub fn from_bytes(bytes: &[u8], mime_type: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        }
    }

    /// Read and encode an image file, guessing the MIME type from its extension.
    pub fn from_path(path: &Path) -> anyhow::Result<Self> {
        let bytes = std::fs::read(path)
            .map_err(|e| anyhow::anyhow!("Failed to read {}: {e}", path.display()))?;
        Ok(Self::from_bytes(&bytes, mime_for_path(path)))
    }

    /// Render as a `data:` URL.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

fn mime_for_path(path: &Path) -> &'static str {
    let ext = path.extension().and_then(|e| e.to_str()).map(str::to_ascii_lowercase);
    match ext.as_deref() {
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("webp") => "image/webp",
        Some("gif") => "image/gif",
        _ => "image/png",
    }
}

/// Placeholder image used when image synthesis fails.
pub fn placeholder_image_url(kind: AssetKind) -> String {
    let size = match kind {
        AssetKind::Hero => "1200/800",
        AssetKind::Feature | AssetKind::Mood => "600/400",
    };
    let seed = uuid::Uuid::new_v4().as_u128() % 1000;
    format!("https://picsum.photos/{size}?random={seed}")
}

/// Remove Markdown code fences the backend likes to wrap HTML in.
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```html", "").replace("```", "").trim().to_string()
}
