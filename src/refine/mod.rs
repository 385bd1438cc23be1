//! Conversational refinement of the generated document.
//!
//! The loop owns the authoritative HTML and the chat history. Every request is
//! single-shot: the whole current document is sent to the backend together with
//! the instruction, and the reply replaces the document only if it succeeded.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::ai::DesignProvider;
use crate::analysis::AnalysisData;
use crate::generation::GeneratedSite;
use crate::pipeline::{EventSink, PipelineEvent};

/// Reply recorded after a successful refinement.
pub const ACK_MESSAGE: &str = "Done! I've updated the website. How does that look?";

/// Reply recorded after a failed refinement.
pub const APOLOGY_MESSAGE: &str =
    "Sorry, I had trouble making that change. Please try a different request.";

/// Who wrote a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

/// A single chat entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub text: String,
}

impl ChatMessage {
    pub fn user(text: impl Into<String>) -> Self {
        Self { role: Role::User, text: text.into() }
    }

    pub fn model(text: impl Into<String>) -> Self {
        Self { role: Role::Model, text: text.into() }
    }
}

/// How the document was generated, which decides how it is refined.
#[derive(Debug, Clone)]
pub enum RefineProtocol {
    /// Compiled from structured analysis; refinements get it as context.
    Structured(AnalysisData),
    /// Generated from the legacy analysis.
    Legacy,
}

/// Refinement failure. Recorded in the conversation, never fatal.
#[derive(Debug, thiserror::Error)]
pub enum RefinementError {
    #[error("Refinement failed: {0}")]
    Backend(String),

    #[error("Refinement returned an empty document")]
    EmptyDocument,
}

/// Chat history plus the document it edits.
pub struct RefinementLoop {
    provider: Arc<dyn DesignProvider>,
    protocol: RefineProtocol,
    html: String,
    site: Option<GeneratedSite>,
    history: Vec<ChatMessage>,
    sink: EventSink,
}

impl RefinementLoop {
    /// Start a conversation over `html`, opened by a model welcome message.
    pub fn new(
        provider: Arc<dyn DesignProvider>,
        protocol: RefineProtocol,
        html: String,
        welcome: impl Into<String>,
    ) -> Self {
        Self {
            provider,
            protocol,
            html,
            site: None,
            history: vec![ChatMessage::model(welcome)],
            sink: EventSink::default(),
        }
    }

    /// Keep a [`GeneratedSite`] wrapper in sync with the document.
    pub fn with_site(mut self, site: GeneratedSite) -> Self {
        self.html.clone_from(&site.html);
        self.site = Some(site);
        self
    }

    pub fn with_events(mut self, sink: EventSink) -> Self {
        self.sink = sink;
        self
    }

    /// The authoritative document.
    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn site(&self) -> Option<&GeneratedSite> {
        self.site.as_ref()
    }

    pub fn history(&self) -> &[ChatMessage] {
        &self.history
    }

    pub fn protocol(&self) -> &RefineProtocol {
        &self.protocol
    }

    /// Apply one instruction.
    ///
    /// The user message is recorded before the backend is called. On failure
    /// an apology is recorded, the document is left untouched and the error is
    /// returned for display.
    pub async fn refine(&mut self, instruction: &str) -> Result<(), RefinementError> {
        self.push(ChatMessage::user(instruction));

        let result = match &self.protocol {
            RefineProtocol::Structured(data) => {
                self.provider.refine_structured(&self.html, instruction, data).await
            }
            RefineProtocol::Legacy => self.provider.refine_legacy(&self.html, instruction).await,
        };

        let outcome = match result {
            Ok(html) if html.trim().is_empty() => Err(RefinementError::EmptyDocument),
            Ok(html) => Ok(html),
            Err(e) => Err(RefinementError::Backend(format!("{e:#}"))),
        };

        match outcome {
            Ok(html) => {
                self.replace_html(html);
                self.push(ChatMessage::model(ACK_MESSAGE));
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Refinement failed");
                self.push(ChatMessage::model(APOLOGY_MESSAGE));
                Err(e)
            }
        }
    }

    fn replace_html(&mut self, html: String) {
        if let Some(site) = self.site.as_mut() {
            site.html.clone_from(&html);
        }
        self.html = html;
        self.sink.emit(PipelineEvent::DocumentUpdated);
    }

    fn push(&mut self, message: ChatMessage) {
        self.sink.emit(PipelineEvent::Message(message.clone()));
        self.history.push(message);
    }
}
