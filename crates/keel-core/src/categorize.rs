//! Category suggestion engine for statement line items
//!
//! A new line item is matched against the business's prior categorized
//! items first (exact, case-insensitive) and only then against a fixed
//! keyword table. An exact historical match is flagged as reused
//! (`is_suggested`); keyword and fallback results are not.
//!
//! The keyword table is ordered and first-match-wins. The order is part of
//! the engine's observable behavior, so entries must not be reordered or
//! merged even where a later keyword looks more specific.

use serde::{Deserialize, Serialize};

use crate::models::{Category, LineItem};

/// Keyword substring to category, scanned in order
pub const KEYWORD_CATEGORIES: &[(&str, Category)] = &[
    ("revenue", Category::Revenue),
    ("sales", Category::Revenue),
    ("income", Category::Revenue),
    ("cogs", Category::CostOfGoodsSold),
    ("cost of sales", Category::CostOfGoodsSold),
    ("salary", Category::Payroll),
    ("wages", Category::Payroll),
    ("payroll", Category::Payroll),
    ("marketing", Category::Marketing),
    ("advertising", Category::Marketing),
    ("software", Category::Software),
    ("saas", Category::Software),
    ("rent", Category::Rent),
    ("lease", Category::Rent),
];

/// Engine output for one line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    pub category: Category,
    /// True only when the category was reused from an exact historical match
    pub is_suggested: bool,
}

/// Suggest a category for a line-item name
///
/// `history` is the business's prior categorized items, newest first and
/// already bounded by the caller (the storage layer caps it at the most
/// recent 100). Never fails: anything unmatched lands in `Other`.
pub fn suggest(line_name: &str, history: &[LineItem]) -> Suggestion {
    let normalized = normalize(line_name);

    if !normalized.is_empty() {
        if let Some(item) = history
            .iter()
            .find(|item| normalize(&item.line_name) == normalized)
        {
            return Suggestion {
                category: item.category,
                is_suggested: true,
            };
        }
    }

    for (keyword, category) in KEYWORD_CATEGORIES {
        if normalized.contains(keyword) {
            return Suggestion {
                category: *category,
                is_suggested: false,
            };
        }
    }

    Suggestion {
        category: Category::Other,
        is_suggested: false,
    }
}

/// Lowercase + trim, the comparison form for line-item names
fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
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
    fn test_keyword_substring_match() {
        let suggestion = suggest("Revenue - Subscriptions", &[]);
        assert_eq!(suggestion.category, Category::Revenue);
        assert!(!suggestion.is_suggested);
    }

    #[test]
    fn test_exact_history_match_wins_and_is_flagged() {
        let history = vec![history_item("office rent", Category::Rent)];

        let suggestion = suggest("Office Rent", &history);
        assert_eq!(suggestion.category, Category::Rent);
        assert!(suggestion.is_suggested);
    }

    #[test]
    fn test_history_beats_keyword() {
        // "Software licenses" contains the "software" keyword, but the
        // founder previously filed it under G&A.
        let history = vec![history_item(
            "software licenses",
            Category::GeneralAdministrative,
        )];

        let suggestion = suggest("  Software Licenses ", &history);
        assert_eq!(suggestion.category, Category::GeneralAdministrative);
        assert!(suggestion.is_suggested);
    }

    #[test]
    fn test_most_recent_history_match_is_used() {
        // History is newest-first; the first match is the one reused.
        let history = vec![
            history_item("consulting", Category::Revenue),
            history_item("consulting", Category::Other),
        ];

        let suggestion = suggest("Consulting", &history);
        assert_eq!(suggestion.category, Category::Revenue);
        assert!(suggestion.is_suggested);
    }

    #[test]
    fn test_unknown_name_falls_back_to_other() {
        let suggestion = suggest("Random Unknown Line", &[]);
        assert_eq!(suggestion.category, Category::Other);
        assert!(!suggestion.is_suggested);
    }

    #[test]
    fn test_empty_and_whitespace_names_yield_other() {
        for name in ["", "   ", "\t\n"] {
            let suggestion = suggest(name, &[]);
            assert_eq!(suggestion.category, Category::Other);
            assert!(!suggestion.is_suggested);
        }
    }

    #[test]
    fn test_keyword_order_first_match_wins() {
        // "sales" precedes "cost of sales" in the table, so a line naming
        // both resolves to Revenue. Order-dependence is intended behavior.
        let suggestion = suggest("Cost of Sales", &[]);
        assert_eq!(suggestion.category, Category::Revenue);

        // "cogs" still reaches Cost of Goods Sold on its own.
        let suggestion = suggest("COGS - materials", &[]);
        assert_eq!(suggestion.category, Category::CostOfGoodsSold);
    }

    #[test]
    fn test_remaining_keyword_families() {
        let cases = [
            ("Staff Salary", Category::Payroll),
            ("Hourly wages", Category::Payroll),
            ("Payroll taxes", Category::Payroll),
            ("Marketing retainer", Category::Marketing),
            ("Online advertising", Category::Marketing),
            ("SaaS subscriptions", Category::Software),
            ("Office rent", Category::Rent),
            ("Equipment lease", Category::Rent),
            ("Interest income", Category::Revenue),
        ];

        for (name, expected) in cases {
            let suggestion = suggest(name, &[]);
            assert_eq!(suggestion.category, expected, "for {:?}", name);
            assert!(!suggestion.is_suggested);
        }
    }

    #[test]
    fn test_suggest_is_pure() {
        let history = vec![history_item("hosting", Category::Software)];
        let first = suggest("Hosting", &history);
        let second = suggest("Hosting", &history);
        assert_eq!(first, second);
    }
}
