//! Domain models for Keel

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A business being tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Business {
    pub id: i64,
    pub name: String,
    pub industry: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A point-in-time record of a business's core financial figures
///
/// Snapshots are immutable once created and listed newest-first by period.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Snapshot {
    pub id: i64,
    pub business_id: i64,
    /// Month the figures describe (day component normalized to the 1st)
    pub period: NaiveDate,
    pub cash_balance: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A new snapshot to be recorded (before DB insertion)
#[derive(Debug, Clone, Deserialize)]
pub struct NewSnapshot {
    pub period: NaiveDate,
    pub cash_balance: f64,
    pub revenue: f64,
    pub expenses: f64,
    pub accounts_receivable: f64,
    pub accounts_payable: f64,
    pub notes: Option<String>,
}

/// Kind of financial statement a founder can upload
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatementType {
    ProfitLoss,
    BalanceSheet,
    CashFlow,
}

impl StatementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::ProfitLoss => "profit_loss",
            Self::BalanceSheet => "balance_sheet",
            Self::CashFlow => "cash_flow",
        }
    }
}

impl std::str::FromStr for StatementType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "profit_loss" | "pnl" | "p&l" => Ok(Self::ProfitLoss),
            "balance_sheet" => Ok(Self::BalanceSheet),
            "cash_flow" => Ok(Self::CashFlow),
            _ => Err(format!("Unknown statement type: {}", s)),
        }
    }
}

impl std::fmt::Display for StatementType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// An uploaded financial statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    pub id: i64,
    pub business_id: i64,
    pub statement_type: StatementType,
    /// Month the statement covers
    pub period: NaiveDate,
    pub file_name: String,
    /// SHA-256 of the uploaded bytes, for duplicate-upload detection
    pub file_hash: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// The closed set of expense categories a line item can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Revenue")]
    Revenue,
    #[serde(rename = "Cost of Goods Sold")]
    CostOfGoodsSold,
    #[serde(rename = "Payroll")]
    Payroll,
    #[serde(rename = "Marketing")]
    Marketing,
    #[serde(rename = "Software")]
    Software,
    #[serde(rename = "Rent")]
    Rent,
    #[serde(rename = "General & Administrative")]
    GeneralAdministrative,
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Revenue => "Revenue",
            Self::CostOfGoodsSold => "Cost of Goods Sold",
            Self::Payroll => "Payroll",
            Self::Marketing => "Marketing",
            Self::Software => "Software",
            Self::Rent => "Rent",
            Self::GeneralAdministrative => "General & Administrative",
            Self::Other => "Other",
        }
    }

    /// All categories, in the order the review UI presents them
    pub fn all() -> &'static [Category] {
        &[
            Self::Revenue,
            Self::CostOfGoodsSold,
            Self::Payroll,
            Self::Marketing,
            Self::Software,
            Self::Rent,
            Self::GeneralAdministrative,
            Self::Other,
        ]
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Revenue" => Ok(Self::Revenue),
            "Cost of Goods Sold" => Ok(Self::CostOfGoodsSold),
            "Payroll" => Ok(Self::Payroll),
            "Marketing" => Ok(Self::Marketing),
            "Software" => Ok(Self::Software),
            "Rent" => Ok(Self::Rent),
            "General & Administrative" => Ok(Self::GeneralAdministrative),
            "Other" => Ok(Self::Other),
            _ => Err(format!("Unknown category: {}", s)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One categorized row of a financial statement
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub id: i64,
    pub business_id: i64,
    pub statement_id: i64,
    pub line_name: String,
    pub amount: f64,
    pub category: Category,
    /// True only when the category came from an exact historical name match
    pub is_suggested: bool,
    pub created_at: DateTime<Utc>,
}

/// A finalized line item ready for bulk insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewLineItem {
    pub line_name: String,
    pub amount: f64,
    pub category: Category,
    pub is_suggested: bool,
}

/// Where a financial decision currently stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DecisionStatus {
    #[default]
    Considering,
    DecidedYes,
    DecidedNo,
    Deferred,
}

impl DecisionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Considering => "considering",
            Self::DecidedYes => "decided_yes",
            Self::DecidedNo => "decided_no",
            Self::Deferred => "deferred",
        }
    }
}

impl std::str::FromStr for DecisionStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "considering" => Ok(Self::Considering),
            "decided_yes" => Ok(Self::DecidedYes),
            "decided_no" => Ok(Self::DecidedNo),
            "deferred" => Ok(Self::Deferred),
            _ => Err(format!("Unknown decision status: {}", s)),
        }
    }
}

impl std::fmt::Display for DecisionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A yes/no financial decision being tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    pub id: i64,
    pub business_id: i64,
    pub title: String,
    pub question: String,
    /// Dollar amount involved, when one applies
    pub amount: Option<f64>,
    pub context: Option<String>,
    pub status: DecisionStatus,
    /// Advisor analysis, parsed from its stored JSON column
    pub analysis: Option<DecisionAnalysis>,
    pub created_at: DateTime<Utc>,
}

/// A new decision to be tracked
#[derive(Debug, Clone, Deserialize)]
pub struct NewDecision {
    pub title: String,
    pub question: String,
    pub amount: Option<f64>,
    pub context: Option<String>,
}

/// Advisor verdict on a decision
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    No,
    Depends,
}

/// Advisor confidence in a recommendation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

/// Structured advisor analysis of a decision
///
/// Validated at the AI boundary; every field is required.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DecisionAnalysis {
    pub recommendation: Verdict,
    pub summary: String,
    pub considerations: Vec<String>,
    pub watch_out_for: String,
    pub confidence: Confidence,
}

/// Overall read the advisor puts on a forecast
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Cautious,
    Concerning,
}

/// Structured advisor review of a cash forecast
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastReview {
    pub health_assessment: String,
    pub key_insight: String,
    pub recommendation: String,
    pub sentiment: Sentiment,
}

/// Who authored a conversation message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One turn in an advisor conversation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// An advisor conversation thread
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Conversation {
    pub id: i64,
    pub business_id: i64,
    pub title: String,
    pub messages: Vec<ChatMessage>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derive a conversation title from its opening message
///
/// First 50 characters with an ellipsis when truncated.
pub fn conversation_title(first_message: &str) -> String {
    let trimmed = first_message.trim();
    let mut title: String = trimmed.chars().take(50).collect();
    if trimmed.chars().count() > 50 {
        title.push_str("...");
    }
    title
}

/// One entry in the audit log
#[derive(Debug, Clone, Serialize)]
pub struct AuditEntry {
    pub id: i64,
    pub user: String,
    pub action: String,
    pub resource_type: Option<String>,
    pub resource_id: Option<i64>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
}
