//! Site generation.
//!
//! Two interchangeable protocols produce the generated document:
//!
//! - **Structured**: analysis data + user preferences go to the design
//!   compiler in a single call.
//! - **Legacy**: a hero and a feature image are generated concurrently, then
//!   HTML is synthesized around their URLs.
//!
//! Both stream human-readable lines into a [`ProgressLog`].

mod orchestrator;
mod progress;

pub use orchestrator::{feature_image_prompt, hero_image_prompt, LegacyOutput, Orchestrator};
pub use progress::ProgressLog;

use serde::{Deserialize, Serialize};

/// The compiled site returned by the structured protocol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSite {
    pub html: String,
    pub hero_image_url: String,
}

/// What a generated image is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Hero,
    Feature,
    Mood,
}

impl std::fmt::Display for AssetKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hero => write!(f, "hero"),
            Self::Feature => write!(f, "feature"),
            Self::Mood => write!(f, "mood"),
        }
    }
}

/// An image produced during generation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratedAsset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub url: String,
    /// Prompt the image was generated from
    pub prompt: String,
}

/// Generation failures. Terminal to the attempt, never to the process.
#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("Design backend failed: {0}")]
    Backend(String),

    #[error("Backend returned an empty document")]
    EmptyDocument,

    #[error("No analysis data available")]
    MissingAnalysis,
}
