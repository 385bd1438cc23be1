//! Preference compiler.
//!
//! Walks the user through a fixed sequence of selection steps and compiles the
//! answers into a [`UserPreferences`] design vector. Picking a vibe also kicks
//! off a mood-image request in the background; its result is merged whenever
//! it happens to be ready and is never waited for.

mod steps;

pub use steps::{SelectionStep, StepOption};

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::oneshot::{self, error::TryRecvError};
use tokio::task::JoinHandle;

use crate::ai::DesignProvider;
use crate::core::Pacing;
use crate::generation::AssetKind;
use crate::pipeline::{EventSink, PipelineEvent};

/// Weight given to the chosen vibe.
pub const SELECTED_VIBE_WEIGHT: f64 = 0.8;

/// Weight given to every vibe that was not chosen.
pub const UNSELECTED_VIBE_WEIGHT: f64 = 0.1;

/// Context used for the mood image when the analysis has no business name.
const DEFAULT_BUSINESS_CONTEXT: &str = "a local business";

/// The compiled design vector.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPreferences {
    /// Weight per candidate vibe, each in `[0, 1]`
    pub vibe: BTreeMap<String, f64>,
    pub color_palette: String,
    pub typography: String,
    pub layout_focus: String,
    /// Mood image derived from the chosen vibe, if it was ready in time
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mood_image_url: Option<String>,
}

impl UserPreferences {
    /// The vibe with the highest weight. Ties go to the later key.
    pub fn dominant_vibe(&self) -> Option<&str> {
        self.vibe
            .iter()
            .fold(None, |best: Option<(&String, f64)>, (name, weight)| match best {
                Some((_, best_weight)) if best_weight > *weight => best,
                _ => Some((name, *weight)),
            })
            .map(|(name, _)| name.as_str())
    }
}

/// Soft-encode a vibe choice over every candidate vibe.
pub fn compile_vibe(selected: &str) -> BTreeMap<String, f64> {
    SelectionStep::Vibe
        .options()
        .iter()
        .map(|opt| {
            let weight =
                if opt.value == selected { SELECTED_VIBE_WEIGHT } else { UNSELECTED_VIBE_WEIGHT };
            (opt.value.to_string(), weight)
        })
        .collect()
}

/// Prompt for the mood image of a vibe.
pub fn mood_image_prompt(vibe: &str, business_context: &str) -> String {
    format!(
        "An abstract, high-quality background image representing a '{vibe}' design vibe, \
         specifically tailored for {business_context}. Artistic, modern, professional."
    )
}

/// Where a selection left the walk.
#[derive(Debug, Clone, PartialEq)]
pub enum Advance {
    /// Moved on to the given step.
    Next(SelectionStep),
    /// The last step was answered; these are the final preferences.
    Complete(UserPreferences),
}

/// Result of [`PreferenceCompiler::select_option`].
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Preferences after recording the selection
    pub preferences: UserPreferences,
    pub advance: Advance,
}

/// Preference selection errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PreferenceError {
    #[error("Expected a selection for '{expected}', got '{got}'")]
    StepMismatch { expected: SelectionStep, got: SelectionStep },

    #[error("'{value}' is not an option of '{step}'")]
    UnknownOption { step: SelectionStep, value: String },
}

/// Pending mood-image request.
struct MoodRequest {
    rx: oneshot::Receiver<String>,
    handle: JoinHandle<()>,
}

/// Step-by-step preference collection.
pub struct PreferenceCompiler {
    provider: Arc<dyn DesignProvider>,
    pacing: Pacing,
    business_context: String,
    current: usize,
    preferences: UserPreferences,
    selected: BTreeMap<SelectionStep, String>,
    mood: Option<MoodRequest>,
    sink: EventSink,
}

impl PreferenceCompiler {
    /// Create a compiler positioned on the first step.
    ///
    /// `business_name` feeds the mood-image prompt.
    pub fn new(
        provider: Arc<dyn DesignProvider>,
        pacing: Pacing,
        business_name: Option<&str>,
    ) -> Self {
        Self {
            provider,
            pacing,
            business_context: business_name
                .filter(|name| !name.is_empty())
                .unwrap_or(DEFAULT_BUSINESS_CONTEXT)
                .to_string(),
            current: 0,
            preferences: UserPreferences::default(),
            selected: BTreeMap::new(),
            mood: None,
            sink: EventSink::default(),
        }
    }

    /// Forward mood-image completions to `sink`.
    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.sink = sink;
        self
    }

    /// The step awaiting a selection.
    pub fn current_step(&self) -> SelectionStep {
        SelectionStep::ALL[self.current]
    }

    /// `(position, total)`, position starting at 1.
    pub fn progress(&self) -> (usize, usize) {
        (self.current + 1, SelectionStep::ALL.len())
    }

    /// Preferences recorded so far.
    pub fn preferences(&self) -> &UserPreferences {
        &self.preferences
    }

    /// Option previously picked for `step`.
    pub fn selection(&self, step: SelectionStep) -> Option<&str> {
        self.selected.get(&step).map(String::as_str)
    }

    /// Whether a mood image is still being generated.
    pub fn is_generating_mood_image(&self) -> bool {
        self.mood.is_some()
    }

    /// Record a selection for the current step and advance.
    ///
    /// Advancing waits for the visual-feedback delay but never for the mood
    /// image.
    pub async fn select_option(
        &mut self,
        step: SelectionStep,
        value: &str,
    ) -> Result<Selection, PreferenceError> {
        let expected = self.current_step();
        if step != expected {
            return Err(PreferenceError::StepMismatch { expected, got: step });
        }
        if !step.has_option(value) {
            return Err(PreferenceError::UnknownOption { step, value: value.to_string() });
        }

        tracing::debug!(%step, value, "Preference selected");
        self.selected.insert(step, value.to_string());

        match step {
            SelectionStep::Vibe => {
                self.preferences.vibe = compile_vibe(value);
                self.request_mood_image(value);
            }
            SelectionStep::ColorPalette => self.preferences.color_palette = value.to_string(),
            SelectionStep::Typography => self.preferences.typography = value.to_string(),
            SelectionStep::LayoutFocus => self.preferences.layout_focus = value.to_string(),
        }

        tokio::time::sleep(self.pacing.advance_delay).await;
        self.poll_mood_image();

        let advance = if self.current + 1 < SelectionStep::ALL.len() {
            self.current += 1;
            Advance::Next(self.current_step())
        } else {
            Advance::Complete(self.preferences.clone())
        };

        Ok(Selection { preferences: self.preferences.clone(), advance })
    }

    /// Go back one step. Returns `false` on the first step.
    ///
    /// Earlier selections are kept.
    pub fn back(&mut self) -> bool {
        if self.current == 0 {
            return false;
        }
        self.current -= 1;
        true
    }

    /// Merge the mood image if its request has finished.
    pub fn poll_mood_image(&mut self) {
        let Some(request) = self.mood.as_mut() else {
            return;
        };

        match request.rx.try_recv() {
            Ok(url) => {
                tracing::debug!("Mood image ready");
                self.preferences.mood_image_url = Some(url);
                self.mood = None;
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Closed) => {
                tracing::warn!("Mood image generation failed");
                self.mood = None;
            }
        }
    }

    fn request_mood_image(&mut self, vibe: &str) {
        // A newer vibe makes any pending or merged image stale.
        if let Some(previous) = self.mood.take() {
            previous.handle.abort();
        }
        self.preferences.mood_image_url = None;

        let prompt = mood_image_prompt(vibe, &self.business_context);
        let provider = Arc::clone(&self.provider);
        let sink = self.sink.clone();
        let (tx, rx) = oneshot::channel();

        let handle = tokio::spawn(async move {
            let asset = provider.generate_image(&prompt, AssetKind::Mood).await;
            if asset.url.is_empty() {
                return;
            }
            sink.emit(PipelineEvent::MoodImage(asset.url.clone()));
            // The receiver is gone if the walk already finished.
            let _ = tx.send(asset.url);
        });

        self.mood = Some(MoodRequest { rx, handle });
    }
}

impl Drop for PreferenceCompiler {
    fn drop(&mut self) {
        // Nobody is left to merge the image.
        if let Some(request) = self.mood.take() {
            request.handle.abort();
        }
    }
}
