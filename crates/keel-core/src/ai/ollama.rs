//! Ollama backend implementation
//!
//! HTTP client for the Ollama generate API. Prompts come from the shared
//! `prompts` module; structured responses go through `parsing`.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::context::FinancialContext;
use crate::error::{Error, Result};
use crate::forecast::{Assumptions, ForecastRow};
use crate::models::{ChatMessage, Decision, DecisionAnalysis, ForecastReview};

use super::parsing::{parse_decision_analysis, parse_extracted_items, parse_forecast_review};
use super::types::ExtractedLineItem;
use super::{prompts, AdvisorBackend};

/// Ollama backend
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }

    /// Run one non-streaming generate call and return the raw response text
    async fn generate(&self, prompt: String) -> Result<String> {
        let request = OllamaRequest {
            model: self.model.clone(),
            prompt,
            stream: false,
        };

        let response = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama response: {}", ollama_response.response);

        Ok(ollama_response.response)
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    stream: bool,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl AdvisorBackend for OllamaBackend {
    async fn extract_line_items(&self, statement_text: &str) -> Result<Vec<ExtractedLineItem>> {
        let response = self
            .generate(prompts::extract_line_items(statement_text))
            .await?;
        parse_extracted_items(&response)
    }

    async fn review_forecast(
        &self,
        ctx: &FinancialContext,
        assumptions: &Assumptions,
        rows: &[ForecastRow],
    ) -> Result<ForecastReview> {
        let response = self
            .generate(prompts::review_forecast(ctx, assumptions, rows))
            .await?;
        parse_forecast_review(&response)
    }

    async fn analyze_decision(
        &self,
        ctx: &FinancialContext,
        decision: &Decision,
    ) -> Result<DecisionAnalysis> {
        let response = self
            .generate(prompts::analyze_decision(ctx, decision))
            .await?;
        parse_decision_analysis(&response)
    }

    async fn advise(
        &self,
        ctx: &FinancialContext,
        history: &[ChatMessage],
        user_message: &str,
    ) -> Result<String> {
        let response = self
            .generate(prompts::advise(ctx, history, user_message))
            .await?;
        Ok(response.trim().to_string())
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
            .map(|r| r.status().is_success())
            .unwrap_or(false)
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}
