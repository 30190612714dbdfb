//! Pluggable advisor backend abstraction
//!
//! Backend-agnostic interface for the LLM-backed features: statement
//! extraction, forecast review, decision analysis, and the conversational
//! advisor. All backends speak to locally reachable servers.
//!
//! # Architecture
//!
//! - `AdvisorBackend` trait: defines the interface for all AI operations
//! - `AiClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`,
//!   `MockBackend`
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod prompts;
pub mod types;

pub use mock::MockBackend;
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::{ExtractedLineItem, ExtractedStatement};

use async_trait::async_trait;

use crate::context::FinancialContext;
use crate::error::Result;
use crate::forecast::{Assumptions, ForecastRow};
use crate::models::{ChatMessage, Decision, DecisionAnalysis, ForecastReview};

/// Trait defining the interface for all advisor backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait AdvisorBackend: Send + Sync {
    /// Extract line items from raw statement text
    async fn extract_line_items(&self, statement_text: &str) -> Result<Vec<ExtractedLineItem>>;

    /// Review a computed forecast against the business's situation
    async fn review_forecast(
        &self,
        ctx: &FinancialContext,
        assumptions: &Assumptions,
        rows: &[ForecastRow],
    ) -> Result<ForecastReview>;

    /// Analyze a tracked decision
    async fn analyze_decision(
        &self,
        ctx: &FinancialContext,
        decision: &Decision,
    ) -> Result<DecisionAnalysis>;

    /// One conversational advisor turn; returns the assistant reply text
    async fn advise(
        &self,
        ctx: &FinancialContext,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name (for logging)
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete advisor client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
/// All variants implement the same AdvisorBackend operations.
#[derive(Clone)]
pub enum AiClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AiClient {
    /// Create an advisor client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        let backend = std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string());

        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(AiClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AiClient::OpenAICompatible)
            }
            "mock" => Some(AiClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AiClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AiClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AiClient::Mock(MockBackend::new())
    }
}

// Implement AdvisorBackend for AiClient by delegating to the inner backend
#[async_trait]
impl AdvisorBackend for AiClient {
    async fn extract_line_items(&self, statement_text: &str) -> Result<Vec<ExtractedLineItem>> {
        match self {
            AiClient::Ollama(b) => b.extract_line_items(statement_text).await,
            AiClient::OpenAICompatible(b) => b.extract_line_items(statement_text).await,
            AiClient::Mock(b) => b.extract_line_items(statement_text).await,
        }
    }

    async fn review_forecast(
        &self,
        ctx: &FinancialContext,
        assumptions: &Assumptions,
        rows: &[ForecastRow],
    ) -> Result<ForecastReview> {
        match self {
            AiClient::Ollama(b) => b.review_forecast(ctx, assumptions, rows).await,
            AiClient::OpenAICompatible(b) => b.review_forecast(ctx, assumptions, rows).await,
            AiClient::Mock(b) => b.review_forecast(ctx, assumptions, rows).await,
        }
    }

    async fn analyze_decision(
        &self,
        ctx: &FinancialContext,
        decision: &Decision,
    ) -> Result<DecisionAnalysis> {
        match self {
            AiClient::Ollama(b) => b.analyze_decision(ctx, decision).await,
            AiClient::OpenAICompatible(b) => b.analyze_decision(ctx, decision).await,
            AiClient::Mock(b) => b.analyze_decision(ctx, decision).await,
        }
    }

    async fn advise(
        &self,
        ctx: &FinancialContext,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String> {
        match self {
            AiClient::Ollama(b) => b.advise(ctx, history, user_message).await,
            AiClient::OpenAICompatible(b) => b.advise(ctx, history, user_message).await,
            AiClient::Mock(b) => b.advise(ctx, history, user_message).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AiClient::Ollama(b) => b.health_check().await,
            AiClient::OpenAICompatible(b) => b.health_check().await,
            AiClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AiClient::Ollama(b) => b.model(),
            AiClient::OpenAICompatible(b) => b.model(),
            AiClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AiClient::Ollama(b) => b.host(),
            AiClient::OpenAICompatible(b) => b.host(),
            AiClient::Mock(b) => b.host(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ai_client_mock() {
        let client = AiClient::mock();
        assert_eq!(client.model(), "mock");
        assert_eq!(client.host(), "mock://localhost");
    }

    #[tokio::test]
    async fn test_mock_health_check() {
        let client = AiClient::mock();
        assert!(client.health_check().await);
    }
}
