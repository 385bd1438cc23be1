//! Pipeline state machine.
//!
//! Owns the current [`Step`] and every artifact produced along the way, enforces
//! legal transitions, and routes data between the analyzer, the preference
//! compiler, the generation orchestrator and the refinement loop.
//!
//! ```text
//! INPUT → ANALYZING → ANALYSIS_RESULT ─┬→ PREFERENCES → GENERATING → PREVIEW
//!                                      └────────────→ GENERATING (legacy)
//! ```
//!
//! Failures always step backward to the nearest stable step.

mod events;
mod export;
mod step;

pub use events::{event_channel, EventSink, PipelineEvent};
pub use export::{export_filename, export_stem, write_export, PreviewDocument, PREVIEW_SANDBOX};
pub use step::Step;

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::ai::{DesignProvider, EncodedImage};
use crate::analysis::{normalize, AnalysisData, AnalysisResult};
use crate::core::Pacing;
use crate::generation::{
    GeneratedAsset, GeneratedSite, GenerationError, Orchestrator, ProgressLog,
};
use crate::preferences::{PreferenceCompiler, UserPreferences};
use crate::refine::{ChatMessage, RefineProtocol, RefinementError, RefinementLoop};

/// What to analyze.
#[derive(Debug, Clone)]
pub enum AnalysisInput {
    /// Screenshots of the existing site.
    Images(Vec<EncodedImage>),
    /// Address of the existing site.
    Url(String),
    /// An analysis produced earlier; no backend call is made.
    Saved { analysis: AnalysisResult, data: Option<AnalysisData> },
}

impl AnalysisInput {
    fn statuses(&self) -> [&'static str; 5] {
        let first = match self {
            Self::Images(_) => "Capturing screenshots...",
            Self::Url(_) => "Accessing URL...",
            Self::Saved { .. } => "Loading saved analysis...",
        };
        [
            first,
            "Analyzing design and structure...",
            "Identifying brand palette...",
            "Extracting content...",
            "Generating improvement plan...",
        ]
    }
}

/// Analysis failures. Terminal to the attempt.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("Analysis failed: {0}")]
    Backend(String),

    #[error("No screenshots to analyze")]
    NoInput,
}

/// Pipeline errors.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error(transparent)]
    Refinement(#[from] RefinementError),

    #[error("Cannot move from {from} to {to}")]
    InvalidTransition { from: Step, to: Step },

    #[error("{0} is not available yet")]
    MissingArtifact(&'static str),

    #[error("Export failed: {0}")]
    Export(#[from] std::io::Error),
}

/// The website rebuild pipeline.
pub struct Pipeline {
    provider: Arc<dyn DesignProvider>,
    pacing: Pacing,
    step: Step,
    analysis: Option<AnalysisResult>,
    analysis_data: Option<AnalysisData>,
    preferences: Option<UserPreferences>,
    assets: Vec<GeneratedAsset>,
    progress: ProgressLog,
    chat: Option<RefinementLoop>,
    sink: EventSink,
}

impl Pipeline {
    /// Create a pipeline on the input step.
    pub fn new(provider: Arc<dyn DesignProvider>, pacing: Pacing) -> Self {
        Self {
            provider,
            pacing,
            step: Step::Input,
            analysis: None,
            analysis_data: None,
            preferences: None,
            assets: Vec::new(),
            progress: ProgressLog::default(),
            chat: None,
            sink: EventSink::default(),
        }
    }

    /// Stream events to `sink`.
    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.progress = ProgressLog::new(sink.clone());
        self.sink = sink;
        self
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn analysis(&self) -> Option<&AnalysisResult> {
        self.analysis.as_ref()
    }

    pub fn analysis_data(&self) -> Option<&AnalysisData> {
        self.analysis_data.as_ref()
    }

    pub fn preferences(&self) -> Option<&UserPreferences> {
        self.preferences.as_ref()
    }

    /// Images produced by the legacy protocol, kept for display.
    pub fn assets(&self) -> &[GeneratedAsset] {
        &self.assets
    }

    pub fn progress(&self) -> &ProgressLog {
        &self.progress
    }

    /// Conversation so far. Empty before the preview step.
    pub fn messages(&self) -> &[ChatMessage] {
        self.chat.as_ref().map_or(&[], |chat| chat.history())
    }

    /// The latest successfully produced document.
    pub fn html(&self) -> Option<&str> {
        self.chat.as_ref().map(|chat| chat.html())
    }

    /// The compiled site, when the structured protocol was used.
    pub fn generated_site(&self) -> Option<&GeneratedSite> {
        self.chat.as_ref().and_then(|chat| chat.site())
    }

    /// What the live preview should render.
    pub fn preview(&self) -> Option<PreviewDocument> {
        self.html().map(PreviewDocument::new)
    }

    /// Business identifier used for display and export naming.
    pub fn business_name(&self) -> Option<&str> {
        self.analysis_data
            .as_ref()
            .and_then(|data| data.business_name())
            .or_else(|| {
                self.analysis
                    .as_ref()
                    .map(|a| a.business_name.as_str())
                    .filter(|name| !name.is_empty())
            })
    }

    /// Discard everything and return to the input step for a fresh run.
    pub fn reset(&mut self) {
        self.analysis = None;
        self.analysis_data = None;
        self.preferences = None;
        self.assets.clear();
        self.progress.clear();
        self.chat = None;
        self.set_step(Step::Input);
    }

    /// Analyze the existing site.
    ///
    /// Screenshots yield a legacy analysis that is normalized into the
    /// structured shape; a URL is analyzed both ways by the backend.
    pub async fn analyze(&mut self, input: AnalysisInput) -> Result<(), PipelineError> {
        if matches!(&input, AnalysisInput::Images(images) if images.is_empty()) {
            return Err(AnalysisError::NoInput.into());
        }
        self.transition(Step::Analyzing)?;

        let provider = Arc::clone(&self.provider);
        let statuses = input.statuses();
        let work = async move {
            let out: anyhow::Result<(AnalysisResult, Option<AnalysisData>)> = match input {
                AnalysisInput::Images(images) => {
                    let analysis = provider.analyze_from_images(&images).await?;
                    let data = normalize(&analysis, "");
                    Ok((analysis, Some(data)))
                }
                AnalysisInput::Url(url) => {
                    let analysis = provider.analyze_from_url(&url).await?;
                    let data = provider.fetch_structured_analysis(&url).await?;
                    Ok((analysis, Some(data)))
                }
                AnalysisInput::Saved { analysis, data } => Ok((analysis, data)),
            };
            out
        };

        let result =
            with_status_ticker(&self.sink, self.pacing.analysis_tick, &statuses, work).await;

        match result {
            Ok((analysis, data)) => {
                tracing::info!(
                    business = %analysis.business_name,
                    structured = data.is_some(),
                    "Analysis complete"
                );
                self.sink.emit(PipelineEvent::Analysis {
                    percent: 100,
                    status: "Analysis complete".to_string(),
                });
                self.analysis = Some(analysis);
                self.analysis_data = data;
                self.transition(Step::AnalysisResult)?;
                Ok(())
            }
            Err(e) => {
                tracing::error!(error = %e, "Analysis failed");
                self.transition(Step::Input)?;
                Err(AnalysisError::Backend(format!("{e:#}")).into())
            }
        }
    }

    /// Enter preference collection.
    pub fn begin_preferences(&mut self) -> Result<PreferenceCompiler, PipelineError> {
        if self.analysis_data.is_none() {
            return Err(PipelineError::MissingArtifact("Structured analysis"));
        }
        self.transition(Step::Preferences)?;

        Ok(PreferenceCompiler::new(Arc::clone(&self.provider), self.pacing, self.business_name())
            .with_events(self.sink.clone()))
    }

    /// Generate with the structured protocol.
    ///
    /// Falls back to the legacy protocol when no structured analysis exists.
    /// On failure the pipeline returns to the step generation started from.
    pub async fn generate_with_preferences(
        &mut self,
        preferences: UserPreferences,
    ) -> Result<(), PipelineError> {
        let origin = self.step;
        self.transition(Step::Generating)?;
        self.progress.clear();
        self.assets.clear();
        self.preferences = Some(preferences.clone());

        let Some(data) = self.analysis_data.clone() else {
            tracing::warn!("No structured analysis, falling back to legacy generation");
            return self.run_legacy().await;
        };

        let orchestrator =
            Orchestrator::new(Arc::clone(&self.provider), self.pacing, self.progress.clone());

        match orchestrator.generate_structured(&data, &preferences).await {
            Ok(site) => {
                let welcome = format!(
                    "Your new {} website is ready! I've applied a {} vibe with {} colors and {} typography. Feel free to ask me to make any adjustments.",
                    self.business_name().unwrap_or("business"),
                    preferences.dominant_vibe().unwrap_or("balanced"),
                    preferences.color_palette,
                    preferences.typography,
                );
                let chat = RefinementLoop::new(
                    Arc::clone(&self.provider),
                    RefineProtocol::Structured(data),
                    site.html.clone(),
                    welcome,
                )
                .with_site(site);

                self.enter_preview(chat, origin).await
            }
            Err(e) => self.fail_generation(e, origin).await,
        }
    }

    /// Generate with the legacy protocol straight from the analysis step.
    ///
    /// On failure the pipeline returns to the analysis-result step.
    pub async fn generate_legacy(&mut self) -> Result<(), PipelineError> {
        if self.analysis.is_none() {
            return Err(PipelineError::MissingArtifact("Analysis"));
        }
        self.transition(Step::Generating)?;
        self.progress.clear();
        self.assets.clear();
        self.run_legacy().await
    }

    async fn run_legacy(&mut self) -> Result<(), PipelineError> {
        let Some(analysis) = self.analysis.clone() else {
            self.progress.push("Generation failed. Please try again.");
            return self.fail_generation(GenerationError::MissingAnalysis, Step::AnalysisResult).await;
        };

        let orchestrator =
            Orchestrator::new(Arc::clone(&self.provider), self.pacing, self.progress.clone());

        match orchestrator.generate_legacy(&analysis).await {
            Ok(output) => {
                self.assets = output.assets;
                let welcome = format!(
                    "Welcome to the new {} website! I've applied a {} style. You can ask me to make any changes.",
                    analysis.business_name, analysis.recommended_style
                );
                let chat = RefinementLoop::new(
                    Arc::clone(&self.provider),
                    RefineProtocol::Legacy,
                    output.html,
                    welcome,
                );

                self.enter_preview(chat, Step::AnalysisResult).await
            }
            Err(e) => self.fail_generation(e, Step::AnalysisResult).await,
        }
    }

    async fn enter_preview(
        &mut self,
        chat: RefinementLoop,
        fallback: Step,
    ) -> Result<(), PipelineError> {
        if chat.html().trim().is_empty() {
            return self.fail_generation(GenerationError::EmptyDocument, fallback).await;
        }

        tokio::time::sleep(self.pacing.preview_delay).await;

        let chat = chat.with_events(self.sink.clone());
        for message in chat.history() {
            self.sink.emit(PipelineEvent::Message(message.clone()));
        }
        self.chat = Some(chat);
        self.transition(Step::Preview)
    }

    async fn fail_generation(
        &mut self,
        error: GenerationError,
        back_to: Step,
    ) -> Result<(), PipelineError> {
        tracing::error!(error = %error, back_to = %back_to, "Generation failed");
        tokio::time::sleep(self.pacing.failure_delay).await;
        self.transition(back_to)?;
        Err(error.into())
    }

    /// Apply a chat instruction to the previewed document.
    ///
    /// A failed refinement is recorded in the conversation and leaves the
    /// document untouched; the pipeline stays on the preview step either way.
    pub async fn refine(&mut self, instruction: &str) -> Result<(), PipelineError> {
        if self.step != Step::Preview {
            return Err(PipelineError::MissingArtifact("Preview"));
        }
        let chat = self.chat.as_mut().ok_or(PipelineError::MissingArtifact("Preview"))?;
        chat.refine(instruction).await.map_err(Into::into)
    }

    /// File name the current document exports to.
    pub fn export_filename(&self) -> String {
        export_filename(self.business_name().unwrap_or_default())
    }

    /// Write the current document into `dir`.
    pub fn export(&self, dir: &Path) -> Result<PathBuf, PipelineError> {
        let html = self.html().ok_or(PipelineError::MissingArtifact("Generated website"))?;
        Ok(write_export(dir, self.business_name().unwrap_or_default(), html)?)
    }

    fn transition(&mut self, to: Step) -> Result<(), PipelineError> {
        if !self.step.can_transition_to(to) {
            return Err(PipelineError::InvalidTransition { from: self.step, to });
        }
        if to == Step::Preview && self.html().map_or(true, |html| html.trim().is_empty()) {
            return Err(PipelineError::MissingArtifact("Generated website"));
        }
        self.set_step(to);
        Ok(())
    }

    fn set_step(&mut self, to: Step) {
        let from = self.step;
        tracing::debug!(%from, %to, "Step transition");
        self.step = to;
        self.sink.emit(PipelineEvent::StepChanged { from, to });
    }
}

/// Await `work` while emitting cosmetic status updates every `tick`.
///
/// Progress climbs by 20% per status and stops at 95%; completion is reported
/// by the caller.
async fn with_status_ticker<F: Future>(
    sink: &EventSink,
    tick: Duration,
    statuses: &[&str],
    work: F,
) -> F::Output {
    if tick.is_zero() {
        return work.await;
    }

    tokio::pin!(work);
    let mut interval = tokio::time::interval_at(tokio::time::Instant::now() + tick, tick);
    let mut next = 0;
    let mut percent: u8 = 0;

    loop {
        tokio::select! {
            biased;
            output = &mut work => return output,
            _ = interval.tick(), if next < statuses.len() => {
                percent = percent.saturating_add(20).min(95);
                sink.emit(PipelineEvent::Analysis { percent, status: statuses[next].to_string() });
                next += 1;
            }
        }
    }
}
