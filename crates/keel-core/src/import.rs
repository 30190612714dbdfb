//! Statement import pipeline
//!
//! Uploaded statements come in as raw bytes. CSV files are parsed directly;
//! anything else (PDF text, free-form exports) goes through the advisor
//! backend's structured extraction. Extracted items are then run through the
//! category suggestion engine to produce the review list the founder edits
//! before confirmation.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::ai::{AdvisorBackend, AiClient, ExtractedLineItem};
use crate::categorize;
use crate::error::{Error, Result};
use crate::models::{Category, LineItem, NewLineItem};

/// SHA-256 of uploaded bytes, hex-encoded; the duplicate-upload key
pub fn file_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}

/// One line item as presented in (and returned from) the review step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewItem {
    pub line_name: String,
    pub amount: f64,
    pub category: Category,
    pub is_suggested: bool,
}

/// Extract line items from uploaded statement bytes
///
/// CSV files (by extension, or any content the CSV parser gets items out
/// of) are handled locally; everything else needs the advisor backend.
pub async fn extract(
    bytes: &[u8],
    file_name: &str,
    ai: Option<&AiClient>,
) -> Result<Vec<ExtractedLineItem>> {
    let is_csv = file_name.to_lowercase().ends_with(".csv");

    if is_csv {
        return parse_csv_statement(bytes);
    }

    // Non-CSV uploads still sometimes parse cleanly (exports with a .txt
    // extension); try the cheap path before spending an AI call.
    if let Ok(items) = parse_csv_statement(bytes) {
        if !items.is_empty() {
            return Ok(items);
        }
    }

    let Some(ai) = ai else {
        return Err(Error::Import(format!(
            "{} is not a CSV and no AI backend is configured for extraction",
            file_name
        )));
    };

    let text = String::from_utf8_lossy(bytes);
    ai.extract_line_items(&text).await
}

/// Parse a CSV statement into line items
///
/// Accepts a name column and an amount column, located by header when one
/// is present ("name"/"line"/"description"/"item" and "amount"/"total"/
/// "value"), otherwise the first and last columns. Amounts tolerate `$`,
/// commas, and parenthesized negatives; rows without a parseable amount
/// are skipped.
pub fn parse_csv_statement(bytes: &[u8]) -> Result<Vec<ExtractedLineItem>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(bytes);

    let mut records: Vec<csv::StringRecord> = Vec::new();
    for record in reader.records() {
        records.push(record?);
    }

    if records.is_empty() {
        return Ok(vec![]);
    }

    let (name_col, amount_col, skip_first) = locate_columns(&records[0]);

    let mut items = Vec::new();
    for record in records.iter().skip(if skip_first { 1 } else { 0 }) {
        let Some(name) = record.get(name_col).map(str::trim) else {
            continue;
        };
        if name.is_empty() {
            continue;
        }

        let amount_col = amount_col.min(record.len().saturating_sub(1));
        let Some(amount) = record.get(amount_col).and_then(parse_amount) else {
            continue;
        };

        items.push(ExtractedLineItem {
            line_name: name.to_string(),
            amount,
        });
    }

    Ok(items)
}

/// Locate name/amount columns from the first record
///
/// Returns (name column, amount column, whether the first record is a
/// header row to skip).
fn locate_columns(first: &csv::StringRecord) -> (usize, usize, bool) {
    let mut name_col = None;
    let mut amount_col = None;

    for (i, field) in first.iter().enumerate() {
        let lower = field.trim().to_lowercase();
        if name_col.is_none()
            && ["name", "line", "description", "item"]
                .iter()
                .any(|k| lower.contains(k))
        {
            name_col = Some(i);
        }
        if amount_col.is_none()
            && ["amount", "total", "value"].iter().any(|k| lower.contains(k))
        {
            amount_col = Some(i);
        }
    }

    match (name_col, amount_col) {
        (Some(n), Some(a)) => (n, a, true),
        // No recognizable header: first column is the name, last the amount.
        _ => (0, first.len().saturating_sub(1), false),
    }
}

/// Parse a currency amount, tolerating $ signs, commas, and (123) negatives
fn parse_amount(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }

    let negative = trimmed.starts_with('(') && trimmed.ends_with(')');
    let cleaned: String = trimmed
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
        .collect();

    let value: f64 = cleaned.parse().ok()?;
    Some(if negative { -value } else { value })
}

/// Run extracted items through the suggestion engine
///
/// `history` is the business's recent categorized items, newest first
/// (`Database::recent_line_items`).
pub fn suggest_categories(items: &[ExtractedLineItem], history: &[LineItem]) -> Vec<ReviewItem> {
    items
        .iter()
        .map(|item| {
            let suggestion = categorize::suggest(&item.line_name, history);
            ReviewItem {
                line_name: item.line_name.clone(),
                amount: item.amount,
                category: suggestion.category,
                is_suggested: suggestion.is_suggested,
            }
        })
        .collect()
}

/// Turn confirmed review items into the batch to persist
///
/// The reuse flag survives only when the confirmed category still matches
/// an exact historical suggestion; any founder edit clears it.
pub fn finalize(confirmed: &[ReviewItem], history: &[LineItem]) -> Vec<NewLineItem> {
    confirmed
        .iter()
        .map(|item| {
            let suggestion = categorize::suggest(&item.line_name, history);
            let is_suggested = suggestion.is_suggested && item.category == suggestion.category;
            NewLineItem {
                line_name: item.line_name.clone(),
                amount: item.amount,
                category: item.category,
                is_suggested,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn history_item(line_name: &str, category: Category) -> LineItem {
        LineItem {
            id: 1,
            business_id: 1,
            statement_id: 1,
            line_name: line_name.to_string(),
            amount: 100.0,
            category,
            is_suggested: false,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_parse_csv_with_headers() {
        let csv = "Line Item,Amount\nRevenue - Subscriptions,\"12,000\"\nOffice Rent,$2500.50\n";
        let items = parse_csv_statement(csv.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].line_name, "Revenue - Subscriptions");
        assert_eq!(items[0].amount, 12_000.0);
        assert_eq!(items[1].amount, 2500.50);
    }

    #[test]
    fn test_parse_csv_without_headers() {
        let csv = "Stripe payouts,18000\nPayroll,(8000)\n";
        let items = parse_csv_statement(csv.as_bytes()).unwrap();

        assert_eq!(items.len(), 2);
        assert_eq!(items[1].line_name, "Payroll");
        assert_eq!(items[1].amount, -8000.0);
    }

    #[test]
    fn test_parse_csv_skips_unparseable_rows() {
        let csv = "Name,Amount\nSubtotal,\nOffice Rent,2500\n,999\n";
        let items = parse_csv_statement(csv.as_bytes()).unwrap();

        assert_eq!(items.len(), 1);
        assert_eq!(items[0].line_name, "Office Rent");
    }

    #[test]
    fn test_file_hash_is_stable() {
        let a = file_hash(b"statement bytes");
        let b = file_hash(b"statement bytes");
        assert_eq!(a, b);
        assert_eq!(a.len(), 64);
        assert_ne!(a, file_hash(b"other bytes"));
    }

    #[test]
    fn test_suggest_categories_mixes_history_and_keywords() {
        let history = vec![history_item("stripe payouts", Category::Revenue)];
        let items = vec![
            ExtractedLineItem {
                line_name: "Stripe payouts".to_string(),
                amount: 18_000.0,
            },
            ExtractedLineItem {
                line_name: "Office Rent".to_string(),
                amount: 2_500.0,
            },
            ExtractedLineItem {
                line_name: "Mystery charge".to_string(),
                amount: 40.0,
            },
        ];

        let review = suggest_categories(&items, &history);

        assert_eq!(review[0].category, Category::Revenue);
        assert!(review[0].is_suggested);
        assert_eq!(review[1].category, Category::Rent);
        assert!(!review[1].is_suggested);
        assert_eq!(review[2].category, Category::Other);
    }

    #[test]
    fn test_finalize_clears_flag_on_edit() {
        let history = vec![history_item("hosting", Category::Software)];

        // Founder kept the historical suggestion on one item and overrode
        // the other to G&A.
        let confirmed = vec![
            ReviewItem {
                line_name: "Hosting".to_string(),
                amount: 120.0,
                category: Category::Software,
                is_suggested: true,
            },
            ReviewItem {
                line_name: "Hosting".to_string(),
                amount: 80.0,
                category: Category::GeneralAdministrative,
                is_suggested: true,
            },
        ];

        let batch = finalize(&confirmed, &history);
        assert!(batch[0].is_suggested);
        assert!(!batch[1].is_suggested);
    }

    #[test]
    fn test_finalize_keyword_items_never_flagged() {
        let confirmed = vec![ReviewItem {
            line_name: "Office Rent".to_string(),
            amount: 2500.0,
            category: Category::Rent,
            is_suggested: false,
        }];

        let batch = finalize(&confirmed, &[]);
        assert!(!batch[0].is_suggested);
    }

    #[tokio::test]
    async fn test_extract_prefers_csv_for_csv_files() {
        let csv = "Name,Amount\nOffice Rent,2500\n";
        let items = extract(csv.as_bytes(), "feb.csv", None).await.unwrap();
        assert_eq!(items.len(), 1);
    }

    #[tokio::test]
    async fn test_extract_without_ai_or_structure_fails() {
        let err = extract(b"scanned pdf gibberish", "feb.pdf", None)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Import(_)));
    }

    #[tokio::test]
    async fn test_extract_falls_back_to_ai() {
        let ai = AiClient::mock();
        let items = extract(b"%PDF-1.4 ...", "feb.pdf", Some(&ai)).await.unwrap();
        assert!(!items.is_empty());
    }
}
