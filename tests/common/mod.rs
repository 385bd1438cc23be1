//! Shared scripted design provider for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use siteforge::ai::prompts;
use siteforge::analysis::{
    AnalysisData, AnalysisResult, ContactInfo, DesignTokens, ExtractedContent, TextContent,
};
use siteforge::generation::{AssetKind, GeneratedAsset, GeneratedSite};
use siteforge::{DesignProvider, EncodedImage, Pacing, Pipeline, UserPreferences};

pub const SITE_HTML: &str = "<!DOCTYPE html><html><body><h1>Joe's Café & Bar</h1></body></html>";

/// One call received by the provider.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    AnalyzeImages(usize),
    AnalyzeUrl(String),
    Structured(String),
    Image { kind: AssetKind, prompt: String, url: String },
    Compile(UserPreferences),
    /// Asset URLs handed over, and the synthesis prompt built from them
    GenerateHtml { urls: Vec<String>, prompt: String },
    RefineStructured(String),
    RefineLegacy(String),
}

/// Provider whose behaviour is set per test.
pub struct ScriptedProvider {
    pub fail_analysis: bool,
    pub fail_compile: bool,
    pub fail_html: bool,
    pub fail_refine: bool,
    pub html: String,
    pub image_delay: Duration,
    pub calls: Mutex<Vec<Call>>,
}

impl Default for ScriptedProvider {
    fn default() -> Self {
        Self {
            fail_analysis: false,
            fail_compile: false,
            fail_html: false,
            fail_refine: false,
            html: SITE_HTML.to_string(),
            image_delay: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl ScriptedProvider {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

pub fn analysis() -> AnalysisResult {
    AnalysisResult {
        business_name: "Joe's Café & Bar".to_string(),
        business_type: "Restaurant".to_string(),
        primary_color: "#8b0000".to_string(),
        secondary_color: "#f5f5dc".to_string(),
        accent_color: "#daa520".to_string(),
        design_issues: vec!["Table layout".to_string(), "Clip art".to_string()],
        extracted_content: ExtractedContent {
            headline: "Best coffee in town".to_string(),
            description: "Neighbourhood café since 1998".to_string(),
            services: vec!["Espresso".to_string(), "Brunch".to_string()],
            contact_info: "555-0199".to_string(),
        },
        recommended_style: "Warm rustic".to_string(),
    }
}

pub fn analysis_data() -> AnalysisData {
    AnalysisData {
        scrape_id: "scrape-1700000000000-abcd1234".to_string(),
        original_url: "https://joes.test".to_string(),
        text_content: TextContent {
            headings: vec!["Joe's Café & Bar".to_string(), "Menu".to_string()],
            paragraphs: vec!["Neighbourhood café since 1998".to_string()],
            ctas: vec!["Book a table".to_string()],
            contact_info: ContactInfo { phone: Some("555-0199".to_string()), ..Default::default() },
        },
        design_tokens: DesignTokens {
            colors: vec!["#8b0000".to_string(), "#f5f5dc".to_string()],
            fonts: vec!["Georgia".to_string()],
        },
        ..Default::default()
    }
}

pub fn pipeline(provider: &Arc<ScriptedProvider>) -> Pipeline {
    Pipeline::new(provider.clone(), Pacing::immediate())
}

#[async_trait]
impl DesignProvider for ScriptedProvider {
    async fn analyze_from_images(
        &self,
        images: &[EncodedImage],
    ) -> anyhow::Result<AnalysisResult> {
        self.record(Call::AnalyzeImages(images.len()));
        if self.fail_analysis {
            anyhow::bail!("vision model unavailable");
        }
        Ok(analysis())
    }

    async fn analyze_from_url(&self, url: &str) -> anyhow::Result<AnalysisResult> {
        self.record(Call::AnalyzeUrl(url.to_string()));
        if self.fail_analysis {
            anyhow::bail!("research model unavailable");
        }
        Ok(analysis())
    }

    async fn fetch_structured_analysis(&self, url: &str) -> anyhow::Result<AnalysisData> {
        self.record(Call::Structured(url.to_string()));
        Ok(analysis_data())
    }

    async fn generate_image(&self, prompt: &str, kind: AssetKind) -> GeneratedAsset {
        let url = format!("https://cdn.test/{kind}-{}.png", prompt.len());
        self.record(Call::Image { kind, prompt: prompt.to_string(), url: url.clone() });
        tokio::time::sleep(self.image_delay).await;
        GeneratedAsset { kind, url, prompt: prompt.to_string() }
    }

    async fn compile(
        &self,
        _data: &AnalysisData,
        preferences: &UserPreferences,
    ) -> anyhow::Result<GeneratedSite> {
        self.record(Call::Compile(preferences.clone()));
        if self.fail_compile {
            anyhow::bail!("compiler overloaded");
        }
        Ok(GeneratedSite {
            html: self.html.clone(),
            hero_image_url: "https://cdn.test/hero.png".to_string(),
        })
    }

    async fn refine_structured(
        &self,
        html: &str,
        instruction: &str,
        _data: &AnalysisData,
    ) -> anyhow::Result<String> {
        self.record(Call::RefineStructured(instruction.to_string()));
        if self.fail_refine {
            anyhow::bail!("refiner overloaded");
        }
        Ok(html.replace("</body>", &format!("<p>{instruction}</p></body>")))
    }

    async fn generate_html(
        &self,
        analysis: &AnalysisResult,
        assets: &[GeneratedAsset],
    ) -> anyhow::Result<String> {
        self.record(Call::GenerateHtml {
            urls: assets.iter().map(|a| a.url.clone()).collect(),
            prompt: prompts::legacy_html(analysis, assets),
        });
        if self.fail_html {
            anyhow::bail!("synthesis overloaded");
        }
        Ok(self.html.clone())
    }

    async fn refine_legacy(&self, html: &str, instruction: &str) -> anyhow::Result<String> {
        self.record(Call::RefineLegacy(instruction.to_string()));
        if self.fail_refine {
            anyhow::bail!("refiner overloaded");
        }
        Ok(html.replace("</body>", &format!("<p>{instruction}</p></body>")))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}
