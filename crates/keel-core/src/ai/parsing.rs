//! JSON parsing helpers for advisor backend responses
//!
//! These functions extract JSON from AI model responses, which often include
//! extra text before/after the JSON payload.

use crate::error::{Error, Result};
use crate::models::{DecisionAnalysis, ForecastReview};

use super::types::{ExtractedLineItem, ExtractedStatement};

/// Slice the first JSON object out of a model response
fn json_object(response: &str) -> Result<&str> {
    let response = response.trim();
    let start = response.find('{');
    let end = response.rfind('}');

    match (start, end) {
        (Some(s), Some(e)) if s < e => Ok(&response[s..=e]),
        _ => Err(Error::Advisor(format!(
            "No JSON found in AI response | Raw: {}",
            truncate(response)
        ))),
    }
}

fn truncate(s: &str) -> String {
    if s.len() > 200 {
        let cut = s
            .char_indices()
            .take_while(|(i, _)| *i < 200)
            .last()
            .map(|(i, c)| i + c.len_utf8())
            .unwrap_or(0);
        format!("{}...", &s[..cut])
    } else {
        s.to_string()
    }
}

/// Parse extracted statement line items from an AI response
pub fn parse_extracted_items(response: &str) -> Result<Vec<ExtractedLineItem>> {
    let json_str = json_object(response)?;
    let extracted: ExtractedStatement = serde_json::from_str(json_str).map_err(|e| {
        Error::Advisor(format!(
            "Invalid extraction JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })?;
    Ok(extracted.line_items)
}

/// Parse a forecast review from an AI response
pub fn parse_forecast_review(response: &str) -> Result<ForecastReview> {
    let json_str = json_object(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        Error::Advisor(format!(
            "Invalid forecast review JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}

/// Parse a decision analysis from an AI response
pub fn parse_decision_analysis(response: &str) -> Result<DecisionAnalysis> {
    let json_str = json_object(response)?;
    serde_json::from_str(json_str).map_err(|e| {
        Error::Advisor(format!(
            "Invalid decision analysis JSON from AI: {} | Raw: {}",
            e,
            truncate(json_str)
        ))
    })
}
