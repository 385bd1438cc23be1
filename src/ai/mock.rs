//! In-memory design provider for unit tests.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::{DesignProvider, EncodedImage};
use crate::analysis::{AnalysisData, AnalysisResult, TextContent};
use crate::generation::{AssetKind, GeneratedAsset, GeneratedSite};
use crate::preferences::UserPreferences;

pub(crate) const MOCK_HTML: &str = "<html><body><h1>Acme</h1></body></html>";

/// Scripted provider that records every call it receives.
pub(crate) struct MockProvider {
    pub fail_analysis: bool,
    pub fail_generation: bool,
    pub fail_refine: bool,
    pub image_delay: Duration,
    /// Delays for the next image calls, in order, before `image_delay` applies
    pub image_delays: Mutex<VecDeque<Duration>>,
    pub html: String,
    /// Fixed refinement result instead of echoing the instruction
    pub refined: Option<String>,
    pub calls: Mutex<Vec<String>>,
}

impl Default for MockProvider {
    fn default() -> Self {
        Self {
            fail_analysis: false,
            fail_generation: false,
            fail_refine: false,
            image_delay: Duration::ZERO,
            image_delays: Mutex::new(VecDeque::new()),
            html: MOCK_HTML.to_string(),
            refined: None,
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl MockProvider {
    /// Per-call image delays, consumed in call order.
    pub fn with_image_delays(self, delays: impl IntoIterator<Item = Duration>) -> Self {
        self.image_delays.lock().extend(delays);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().clone()
    }

    fn refined_html(&self, html: &str, instruction: &str) -> anyhow::Result<String> {
        if self.fail_refine {
            anyhow::bail!("refinement unavailable");
        }
        Ok(self.refined.clone().unwrap_or_else(|| format!("{html}<!-- {instruction} -->")))
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().push(call.into());
    }

    pub fn analysis() -> AnalysisResult {
        AnalysisResult {
            business_name: "Acme".to_string(),
            business_type: "Plumbing".to_string(),
            primary_color: "#112233".to_string(),
            secondary_color: "#445566".to_string(),
            accent_color: "#778899".to_string(),
            recommended_style: "Clean".to_string(),
            ..Default::default()
        }
    }

    pub fn data() -> AnalysisData {
        AnalysisData {
            scrape_id: "scrape-1".to_string(),
            original_url: "https://acme.test".to_string(),
            text_content: TextContent {
                headings: vec!["Acme Plumbing".to_string()],
                ..Default::default()
            },
            ..Default::default()
        }
    }
}

#[async_trait]
impl DesignProvider for MockProvider {
    async fn analyze_from_images(
        &self,
        images: &[EncodedImage],
    ) -> anyhow::Result<AnalysisResult> {
        self.record(format!("analyze_images:{}", images.len()));
        if self.fail_analysis {
            anyhow::bail!("analysis unavailable");
        }
        Ok(Self::analysis())
    }

    async fn analyze_from_url(&self, url: &str) -> anyhow::Result<AnalysisResult> {
        self.record(format!("analyze_url:{url}"));
        if self.fail_analysis {
            anyhow::bail!("analysis unavailable");
        }
        Ok(Self::analysis())
    }

    async fn fetch_structured_analysis(&self, url: &str) -> anyhow::Result<AnalysisData> {
        self.record(format!("structured:{url}"));
        Ok(Self::data())
    }

    async fn generate_image(&self, prompt: &str, kind: AssetKind) -> GeneratedAsset {
        self.record(format!("image:{kind}"));
        let n = self.calls.lock().iter().filter(|c| c.starts_with("image:")).count();
        let delay = self.image_delays.lock().pop_front().unwrap_or(self.image_delay);
        tokio::time::sleep(delay).await;
        GeneratedAsset {
            kind,
            url: format!("https://img.test/{kind}-{n}.png"),
            prompt: prompt.to_string(),
        }
    }

    async fn compile(
        &self,
        _data: &AnalysisData,
        preferences: &UserPreferences,
    ) -> anyhow::Result<GeneratedSite> {
        self.record(format!("compile:{}", preferences.color_palette));
        if self.fail_generation {
            anyhow::bail!("compiler unavailable");
        }
        Ok(GeneratedSite {
            html: self.html.clone(),
            hero_image_url: "https://img.test/hero.png".to_string(),
        })
    }

    async fn refine_structured(
        &self,
        html: &str,
        instruction: &str,
        _data: &AnalysisData,
    ) -> anyhow::Result<String> {
        self.record("refine_structured");
        self.refined_html(html, instruction)
    }

    async fn generate_html(
        &self,
        _analysis: &AnalysisResult,
        assets: &[GeneratedAsset],
    ) -> anyhow::Result<String> {
        self.record(format!("html:{}", assets.len()));
        if self.fail_generation {
            anyhow::bail!("synthesis unavailable");
        }
        Ok(self.html.clone())
    }

    async fn refine_legacy(&self, html: &str, instruction: &str) -> anyhow::Result<String> {
        self.record("refine_legacy");
        self.refined_html(html, instruction)
    }

    fn name(&self) -> &str {
        "mock"
    }
}
