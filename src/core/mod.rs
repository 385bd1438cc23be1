//! Core types shared across the pipeline.

mod config;

pub use config::{AiConfig, Config, ExportConfig, Pacing, PacingConfig, Theme, UiConfig};
