//! Chart generation for the dashboard's monthly expense breakdown.
//!
//! The chart is generated as JSON configuration for the ECharts library and
//! rendered into an HTML container by JavaScript initialization code that
//! this module also produces.

use charming::{
    Chart,
    component::{Legend, Title},
    element::{JsFunction, Label, Tooltip, Trigger},
    series::Pie,
};
use maud::PreEscaped;
use time::Date;

use crate::{
    category::category_name,
    html::HeadElement,
    transaction::{Transaction, TransactionKind},
};

/// A dashboard chart with its HTML container ID and ECharts configuration.
pub(super) struct DashboardChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

/// One slice of the expense breakdown pie: a category and this month's spend
/// against it.
#[derive(Debug, Clone, PartialEq)]
pub(super) struct ExpenseSlice {
    /// The display name of the category.
    pub name: &'static str,
    /// The summed expense amount for the month.
    pub total: f64,
}

/// Sum the expenses in the calendar month containing `today`, grouped by
/// category.
///
/// Income and other months are ignored. Slices keep the order categories
/// first appear in `transactions`; unknown category keys fold into the
/// placeholder category.
pub(super) fn month_expense_slices(transactions: &[Transaction], today: Date) -> Vec<ExpenseSlice> {
    let mut slices: Vec<ExpenseSlice> = Vec::new();

    for transaction in transactions {
        if transaction.kind != TransactionKind::Expense {
            continue;
        }

        if transaction.date.month() != today.month() || transaction.date.year() != today.year() {
            continue;
        }

        let name = category_name(&transaction.category);

        match slices.iter_mut().find(|slice| slice.name == name) {
            Some(slice) => slice.total += transaction.amount,
            None => slices.push(ExpenseSlice {
                name,
                total: transaction.amount,
            }),
        }
    }

    slices
}

pub(super) fn expense_breakdown_chart(slices: &[ExpenseSlice]) -> Chart {
    let data: Vec<(f64, &str)> = slices
        .iter()
        .map(|slice| (slice.total, slice.name))
        .collect();

    Chart::new()
        .title(
            Title::new()
                .text("Monthly Expense Breakdown")
                .subtext("This month, grouped by category"),
        )
        .tooltip(
            Tooltip::new()
                .trigger(Trigger::Item)
                .value_formatter(currency_formatter()),
        )
        .legend(Legend::new().top("bottom"))
        .series(
            Pie::new()
                .name("Expenses")
                .radius(vec!["30%", "65%"])
                .label(Label::new().formatter("{b} {d}%"))
                .data(data),
        )
}

#[inline]
fn currency_formatter() -> JsFunction {
    JsFunction::new_with_args(
        "number",
        "const currencyFormatter = new Intl.NumberFormat('en-US', {
              style: 'currency',
              currency: 'USD'
            });
            return (number) ? currencyFormatter.format(number) : \"-\";",
    )
}

/// Generates JavaScript initialization code for dashboard charts.
///
/// Creates scripts that initialize ECharts instances with dark mode support
/// and responsive resizing.
pub(super) fn charts_script(charts: &[DashboardChart]) -> HeadElement {
    let script_content = charts
        .iter()
        .map(|chart| {
            format!(
                r#"(function() {{
                    const chartDom = document.getElementById("{}");
                    const chart = echarts.init(chartDom);
                    const option = {};
                    chart.setOption(option);

                    window.addEventListener('resize', chart.resize);

                    const darkModeMediaQuery = window.matchMedia('(prefers-color-scheme: dark)');
                    const updateTheme = () => {{
                        const isDarkMode = darkModeMediaQuery.matches;
                        chart.setTheme(isDarkMode ? 'dark' : 'default');
                    }}
                    darkModeMediaQuery.addEventListener('change', updateTheme);
                    updateTheme();
                }})();"#,
                chart.id, chart.options
            )
        })
        .collect::<Vec<_>>()
        .join("\n");

    let wrapped_script = format!(
        "document.addEventListener('DOMContentLoaded', function() {{\n{}\n}});",
        script_content
    );

    HeadElement::ScriptSource(PreEscaped(wrapped_script))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::transaction::{Transaction, TransactionKind};

    use super::{ExpenseSlice, expense_breakdown_chart, month_expense_slices};

    fn make_transaction(
        id: i64,
        amount: f64,
        kind: TransactionKind,
        date: time::Date,
        category: &str,
    ) -> Transaction {
        Transaction {
            id,
            account_id: 1,
            amount,
            kind,
            date,
            description: String::new(),
            category: category.to_owned(),
            is_recurring: false,
            recurring_interval: None,
            next_recurring_date: None,
        }
    }

    #[test]
    fn slices_group_expenses_by_category() {
        let today = date!(2025 - 10 - 15);
        let transactions = vec![
            make_transaction(1, 30.0, TransactionKind::Expense, today, "groceries"),
            make_transaction(2, 20.0, TransactionKind::Expense, date!(2025 - 10 - 01), "groceries"),
            make_transaction(3, 100.0, TransactionKind::Expense, today, "housing"),
        ];

        let got = month_expense_slices(&transactions, today);

        assert_eq!(
            got,
            vec![
                ExpenseSlice {
                    name: "Groceries",
                    total: 50.0,
                },
                ExpenseSlice {
                    name: "Housing",
                    total: 100.0,
                },
            ]
        );
    }

    #[test]
    fn slices_ignore_income_and_other_months() {
        let today = date!(2025 - 10 - 15);
        let transactions = vec![
            make_transaction(1, 999.0, TransactionKind::Income, today, "salary"),
            make_transaction(
                2,
                42.0,
                TransactionKind::Expense,
                date!(2025 - 09 - 30),
                "food",
            ),
            // Same month number, different year.
            make_transaction(
                3,
                42.0,
                TransactionKind::Expense,
                date!(2024 - 10 - 15),
                "food",
            ),
        ];

        let got = month_expense_slices(&transactions, today);

        assert!(got.is_empty());
    }

    #[test]
    fn unknown_categories_fold_into_placeholder() {
        let today = date!(2025 - 10 - 15);
        let transactions = vec![
            make_transaction(1, 10.0, TransactionKind::Expense, today, "crypto-windfall"),
            make_transaction(2, 5.0, TransactionKind::Expense, today, "other-unknown"),
        ];

        let got = month_expense_slices(&transactions, today);

        assert_eq!(
            got,
            vec![ExpenseSlice {
                name: "Uncategorized",
                total: 15.0,
            }]
        );
    }

    #[test]
    fn chart_options_are_valid_json() {
        let slices = vec![
            ExpenseSlice {
                name: "Groceries",
                total: 50.0,
            },
            ExpenseSlice {
                name: "Housing",
                total: 100.0,
            },
        ];

        let options = expense_breakdown_chart(&slices).to_string();

        let parsed: serde_json::Value =
            serde_json::from_str(&options).expect("chart options should be valid JSON");
        assert!(parsed.get("series").is_some());
    }
}
