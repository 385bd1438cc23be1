//! Generation orchestrator.
//!
//! Sequences backend calls for both generation protocols and narrates them
//! into the progress log.

use std::sync::Arc;

use super::{AssetKind, GeneratedAsset, GeneratedSite, GenerationError, ProgressLog};
use crate::ai::DesignProvider;
use crate::analysis::{AnalysisData, AnalysisResult};
use crate::core::Pacing;
use crate::preferences::UserPreferences;

/// Output of the legacy protocol.
#[derive(Debug, Clone)]
pub struct LegacyOutput {
    pub html: String,
    /// Hero first, then feature
    pub assets: Vec<GeneratedAsset>,
}

/// Runs the structured and legacy generation protocols.
pub struct Orchestrator {
    provider: Arc<dyn DesignProvider>,
    pacing: Pacing,
    log: ProgressLog,
}

impl Orchestrator {
    pub fn new(provider: Arc<dyn DesignProvider>, pacing: Pacing, log: ProgressLog) -> Self {
        Self { provider, pacing, log }
    }

    /// Compile a site from structured analysis and preferences.
    pub async fn generate_structured(
        &self,
        data: &AnalysisData,
        preferences: &UserPreferences,
    ) -> Result<GeneratedSite, GenerationError> {
        let vibe = preferences.dominant_vibe().unwrap_or("balanced");

        self.log.push("Initializing Design Compiler...");
        self.log.push(format!(
            "Applying {vibe} vibe with {} palette...",
            preferences.color_palette
        ));
        self.log.push("Generating hero imagery...");

        tokio::time::sleep(self.pacing.compile_delay).await;

        self.log.push("Compiling design tokens...");
        self.log.push(format!("Setting {} typography...", preferences.typography));
        self.log.push(format!("Structuring {} layout...", preferences.layout_focus));

        let site = match self.provider.compile(data, preferences).await {
            Ok(site) if site.html.trim().is_empty() => {
                self.log.push("Compilation failed. Please try again.");
                return Err(GenerationError::EmptyDocument);
            }
            Ok(site) => site,
            Err(e) => {
                tracing::error!(error = %e, "Design compilation failed");
                self.log.push("Compilation failed. Please try again.");
                return Err(GenerationError::Backend(format!("{e:#}")));
            }
        };

        self.log.push("Validating HTML output...");
        self.log.push("Design compilation complete!");

        Ok(site)
    }

    /// Generate a site from the legacy analysis.
    ///
    /// The hero and feature images are requested concurrently and joined
    /// before HTML synthesis starts.
    pub async fn generate_legacy(
        &self,
        analysis: &AnalysisResult,
    ) -> Result<LegacyOutput, GenerationError> {
        let hero_prompt = hero_image_prompt(analysis);
        let feature_prompt = feature_image_prompt(analysis);

        let hero = async {
            self.log.push("Generating hero assets...");
            let asset = self.provider.generate_image(&hero_prompt, AssetKind::Hero).await;
            self.log.push("Hero image ready");
            asset
        };
        let feature = async {
            self.log.push("Creating feature photography...");
            let asset = self.provider.generate_image(&feature_prompt, AssetKind::Feature).await;
            self.log.push("Feature image ready");
            asset
        };

        let (hero, feature) = tokio::join!(hero, feature);
        let assets = vec![hero, feature];
        self.log.push("Images generated successfully");

        self.log.push("Architecting modern HTML structure...");
        let html = match self.provider.generate_html(analysis, &assets).await {
            Ok(html) if html.trim().is_empty() => {
                self.log.push("Generation failed. Please try again.");
                return Err(GenerationError::EmptyDocument);
            }
            Ok(html) => html,
            Err(e) => {
                tracing::error!(error = %e, "HTML synthesis failed");
                self.log.push("Generation failed. Please try again.");
                return Err(GenerationError::Backend(format!("{e:#}")));
            }
        };

        self.log.push("Finalizing design...");

        Ok(LegacyOutput { html, assets })
    }
}

/// Image prompt for the legacy hero banner.
pub fn hero_image_prompt(analysis: &AnalysisResult) -> String {
    format!(
        "Professional hero website banner for {}, {}. {}. High quality, 4k, cinematic lighting.",
        analysis.business_name, analysis.business_type, analysis.recommended_style
    )
}

/// Image prompt for the legacy feature photo, built around the first service.
pub fn feature_image_prompt(analysis: &AnalysisResult) -> String {
    let service = analysis
        .extracted_content
        .services
        .first()
        .map_or(analysis.business_type.as_str(), String::as_str);

    format!(
        "Detailed photo representing {} services: {}. Professional photography, {}.",
        analysis.business_type, service, analysis.recommended_style
    )
}
