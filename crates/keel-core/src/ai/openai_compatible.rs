//! OpenAI-compatible backend implementation
//!
//! Works with any server exposing the /v1/chat/completions shape: vLLM,
//! LocalAI, llama-server, Docker Model Runner, and the hosted APIs.

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

/// OpenAI-compatible backend
#[derive(Clone)]
pub struct OpenAICompatibleBackend {
    http_client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

impl OpenAICompatibleBackend {
    /// Create a new OpenAI-compatible backend
    pub fn new(base_url: &str, model: &str, api_key: Option<&str>) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_key: api_key.map(str::to_string),
        }
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OPENAI_COMPATIBLE_HOST").ok()?;
        let model = std::env::var("OPENAI_COMPATIBLE_MODEL")
            .unwrap_or_else(|_| "gpt-3.5-turbo".to_string());
        let api_key = std::env::var("OPENAI_COMPATIBLE_API_KEY").ok();
        Some(Self::new(&host, &model, api_key.as_deref()))
    }

    /// Run one chat completion with the prompt as a single user message
    async fn complete(&self, prompt: String) -> Result<String> {
        let request = CompletionRequest {
            model: self.model.clone(),
            messages: vec![RequestMessage {
                role: "user",
                content: prompt,
            }],
            stream: false,
        };

        let mut builder = self
            .http_client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .json(&request);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder.send().await?;

        if !response.status().is_success() {
            return Err(Error::Http(response.error_for_status().unwrap_err()));
        }

        let completion: CompletionResponse = response.json().await?;
        let content = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Advisor("Empty completion response".to_string()))?;
        debug!("Completion response: {}", content);

        Ok(content)
    }
}

#[derive(Debug, Serialize)]
struct RequestMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<RequestMessage>,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: String,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[async_trait]
impl AdvisorBackend for OpenAICompatibleBackend {
    async fn extract_line_items(&self, statement_text: &str) -> Result<Vec<ExtractedLineItem>> {
        let response = self
            .complete(prompts::extract_line_items(statement_text))
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
            .complete(prompts::review_forecast(ctx, assumptions, rows))
            .await?;
        parse_forecast_review(&response)
    }

    async fn analyze_decision(
        &self,
        ctx: &FinancialContext,
        decision: &Decision,
    ) -> Result<DecisionAnalysis> {
        let response = self
            .complete(prompts::analyze_decision(ctx, decision))
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
            .complete(prompts::advise(ctx, history, user_message))
            .await?;
        Ok(response.trim().to_string())
    }

    async fn health_check(&self) -> bool {
        self.http_client
            .get(format!("{}/v1/models", self.base_url))
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
