//! Shared types for advisor backend responses

use serde::{Deserialize, Serialize};

/// One line item extracted from an uploaded statement, pre-categorization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLineItem {
    pub line_name: String,
    pub amount: f64,
}

/// Wrapper object the extraction prompt asks the model to produce
#[derive(Debug, Clone, Deserialize)]
pub struct ExtractedStatement {
    pub line_items: Vec<ExtractedLineItem>,
}
