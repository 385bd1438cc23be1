#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::float_cmp)]

//! # Siteforge
//!
//! AI website rebuilder - turn an outdated website into a modern single-page site.
//!
//! Siteforge analyzes an existing website from screenshots or its URL, collects a
//! few design preferences, generates a new self-contained HTML document, and lets
//! you refine it by chatting with the design model.
//!
//! ## Pipeline
//!
//! - **Analysis**: Extract branding, content and design flaws
//! - **Preferences**: Vibe, color palette, typography and layout focus
//! - **Generation**: Structured design compilation, or the legacy
//!   image-then-HTML protocol
//! - **Refinement**: Conversational edits of the generated document
//! - **Export**: Save the result as `<business-name>.html`
//!
//! ## Quick Start
//!
//! ```bash
//! # Rebuild a site from its URL
//! siteforge build --url https://example.com
//!
//! # Or from screenshots
//! siteforge build home.png about.png --legacy
//! ```

#![forbid(unsafe_code)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
// Allow common patterns that are intentional in this codebase
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::similar_names)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_const_for_fn)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::option_if_let_else)]
#![allow(clippy::significant_drop_tightening)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::unnecessary_map_or)]
#![allow(clippy::redundant_closure_for_method_calls)]
#![allow(clippy::use_self)]

pub mod ai;
pub mod analysis;
pub mod core;
pub mod generation;
pub mod pipeline;
pub mod preferences;
pub mod refine;

#[cfg(feature = "ai")]
pub use ai::GeminiProvider;

pub use ai::{DesignProvider, EncodedImage};
pub use analysis::{normalize, AnalysisData, AnalysisResult, SavedAnalysis};
pub use core::{Config, Pacing, Theme};
pub use generation::{AssetKind, GeneratedAsset, GeneratedSite, ProgressLog};
pub use pipeline::{AnalysisInput, EventSink, Pipeline, PipelineError, PipelineEvent, Step};
pub use preferences::{PreferenceCompiler, SelectionStep, UserPreferences};
pub use refine::{ChatMessage, RefinementLoop, Role};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
pub const APP_NAME: &str = "siteforge";
