//! The static list of transaction categories and their display colors.
//!
//! Categories are fixed application data rather than user editable rows.
//! Transactions store the category key as a string, so lookups must
//! tolerate unknown keys and degrade to a neutral placeholder.

use crate::transaction::TransactionKind;

/// The badge color used when a transaction's category key is unknown.
pub const FALLBACK_CATEGORY_COLOR: &str = "#94a3b8";

/// The label used when a transaction has no valid category.
pub const FALLBACK_CATEGORY_NAME: &str = "Uncategorized";

/// A transaction category.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Category {
    /// The key stored on transactions.
    pub key: &'static str,
    /// The human readable name.
    pub name: &'static str,
    /// Whether the category applies to income or expenses.
    pub kind: TransactionKind,
    /// The CSS color used for the category badge.
    pub color: &'static str,
}

/// All categories, income first.
pub const CATEGORIES: &[Category] = &[
    Category {
        key: "salary",
        name: "Salary",
        kind: TransactionKind::Income,
        color: "#22c55e",
    },
    Category {
        key: "freelance",
        name: "Freelance",
        kind: TransactionKind::Income,
        color: "#06b6d4",
    },
    Category {
        key: "investments",
        name: "Investments",
        kind: TransactionKind::Income,
        color: "#6366f1",
    },
    Category {
        key: "business",
        name: "Business",
        kind: TransactionKind::Income,
        color: "#ec4899",
    },
    Category {
        key: "rental",
        name: "Rental",
        kind: TransactionKind::Income,
        color: "#f59e0b",
    },
    Category {
        key: "other-income",
        name: "Other Income",
        kind: TransactionKind::Income,
        color: "#64748b",
    },
    Category {
        key: "housing",
        name: "Housing",
        kind: TransactionKind::Expense,
        color: "#ef4444",
    },
    Category {
        key: "transportation",
        name: "Transportation",
        kind: TransactionKind::Expense,
        color: "#f97316",
    },
    Category {
        key: "groceries",
        name: "Groceries",
        kind: TransactionKind::Expense,
        color: "#84cc16",
    },
    Category {
        key: "utilities",
        name: "Utilities",
        kind: TransactionKind::Expense,
        color: "#06b6d4",
    },
    Category {
        key: "entertainment",
        name: "Entertainment",
        kind: TransactionKind::Expense,
        color: "#8b5cf6",
    },
    Category {
        key: "food",
        name: "Food",
        kind: TransactionKind::Expense,
        color: "#f43f5e",
    },
    Category {
        key: "shopping",
        name: "Shopping",
        kind: TransactionKind::Expense,
        color: "#ec4899",
    },
    Category {
        key: "healthcare",
        name: "Healthcare",
        kind: TransactionKind::Expense,
        color: "#14b8a6",
    },
    Category {
        key: "education",
        name: "Education",
        kind: TransactionKind::Expense,
        color: "#6366f1",
    },
    Category {
        key: "personal",
        name: "Personal Care",
        kind: TransactionKind::Expense,
        color: "#d946ef",
    },
    Category {
        key: "travel",
        name: "Travel",
        kind: TransactionKind::Expense,
        color: "#0ea5e9",
    },
    Category {
        key: "insurance",
        name: "Insurance",
        kind: TransactionKind::Expense,
        color: "#64748b",
    },
    Category {
        key: "gifts",
        name: "Gifts & Donations",
        kind: TransactionKind::Expense,
        color: "#f472b6",
    },
    Category {
        key: "bills",
        name: "Bills & Fees",
        kind: TransactionKind::Expense,
        color: "#fb7185",
    },
    Category {
        key: "other-expense",
        name: "Other Expenses",
        kind: TransactionKind::Expense,
        color: "#94a3b8",
    },
];

/// Look up a category by its key.
pub fn find_category(key: &str) -> Option<&'static Category> {
    CATEGORIES.iter().find(|category| category.key == key)
}

/// The categories that can be chosen for a transaction of `kind`.
pub fn categories_for(kind: TransactionKind) -> impl Iterator<Item = &'static Category> {
    CATEGORIES
        .iter()
        .filter(move |category| category.kind == kind)
}

/// The badge color for a category key, falling back to a neutral color for
/// unknown keys.
pub fn category_color(key: &str) -> &'static str {
    find_category(key).map_or(FALLBACK_CATEGORY_COLOR, |category| category.color)
}

/// The display name for a category key, falling back to a placeholder for
/// unknown keys.
pub fn category_name(key: &str) -> &'static str {
    find_category(key).map_or(FALLBACK_CATEGORY_NAME, |category| category.name)
}

#[cfg(test)]
mod tests {
    use crate::transaction::TransactionKind;

    use super::{
        FALLBACK_CATEGORY_COLOR, FALLBACK_CATEGORY_NAME, categories_for, category_color,
        category_name, find_category,
    };

    #[test]
    fn finds_known_category() {
        let category = find_category("groceries").expect("groceries should exist");

        assert_eq!(category.name, "Groceries");
        assert_eq!(category.kind, TransactionKind::Expense);
    }

    #[test]
    fn unknown_category_degrades_to_placeholder() {
        assert!(find_category("crypto-windfall").is_none());
        assert_eq!(category_color("crypto-windfall"), FALLBACK_CATEGORY_COLOR);
        assert_eq!(category_name("crypto-windfall"), FALLBACK_CATEGORY_NAME);
    }

    #[test]
    fn categories_are_partitioned_by_kind() {
        assert!(
            categories_for(TransactionKind::Income)
                .all(|category| category.kind == TransactionKind::Income)
        );
        assert!(
            categories_for(TransactionKind::Expense)
                .all(|category| category.kind == TransactionKind::Expense)
        );
        assert!(categories_for(TransactionKind::Income).count() > 0);
        assert!(categories_for(TransactionKind::Expense).count() > 0);
    }

    #[test]
    fn category_keys_are_unique() {
        use std::collections::HashSet;

        let keys: HashSet<_> = super::CATEGORIES
            .iter()
            .map(|category| category.key)
            .collect();

        assert_eq!(keys.len(), super::CATEGORIES.len());
    }
}
