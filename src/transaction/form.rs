//! The shared form for creating and editing transactions.

use maud::{Markup, html};
use serde::{Deserialize, Deserializer, de::IntoDeserializer};
use time::{Date, format_description::BorrowedFormatItem, macros::format_description};

use crate::{
    Error,
    account::Account,
    category::{categories_for, find_category},
    database_id::{AccountId, TransactionId},
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        format_currency,
    },
};

use super::{
    core::{RecurringInterval, Transaction, TransactionBuilder, TransactionKind},
    schedule::next_occurrence,
};

const DATE_INPUT_FORMAT: &[BorrowedFormatItem] = format_description!("[year]-[month]-[day]");

/// The form data for creating or updating a transaction.
#[derive(Debug, Clone, Deserialize)]
pub struct TransactionForm {
    /// The account the money moved in or out of.
    pub account_id: AccountId,
    /// The amount as a positive magnitude.
    pub amount: f64,
    /// Whether the transaction is income or an expense.
    pub kind: TransactionKind,
    /// When the transaction happened.
    pub date: Date,
    /// What the transaction was for.
    #[serde(default)]
    pub description: String,
    /// The category key.
    pub category: String,
    /// Whether the transaction repeats on a schedule.
    #[serde(default)]
    pub is_recurring: bool,
    /// How often the transaction repeats. Required when `is_recurring`.
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub recurring_interval: Option<RecurringInterval>,
}

impl TransactionForm {
    /// Validate the form and turn it into a [TransactionBuilder].
    ///
    /// The next occurrence date for recurring transactions is computed here,
    /// one interval after the transaction date. The list view only ever
    /// displays the stored date.
    ///
    /// # Errors
    /// This function will return a:
    /// - [Error::NonPositiveAmount] if the amount is zero, negative or not a number,
    /// - [Error::FutureDate] if the date is after `today`,
    /// - [Error::InvalidCategory] if the category does not exist or does not
    ///   match the transaction kind,
    /// - or [Error::MissingRecurringInterval] if the recurring box is ticked
    ///   without an interval.
    pub fn into_builder(self, today: Date) -> Result<TransactionBuilder, Error> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(Error::NonPositiveAmount);
        }

        if self.date > today {
            return Err(Error::FutureDate(self.date));
        }

        match find_category(&self.category) {
            Some(category) if category.kind == self.kind => {}
            _ => return Err(Error::InvalidCategory(self.category)),
        }

        let mut builder = Transaction::build(self.account_id, self.amount, self.kind, self.date)
            .description(&self.description)
            .category(&self.category);

        if self.is_recurring {
            let interval = self
                .recurring_interval
                .ok_or(Error::MissingRecurringInterval)?;
            builder = builder.recurring(interval, next_occurrence(self.date, interval));
        }

        Ok(builder)
    }
}

/// Deserialize select values where the placeholder option submits an empty
/// string.
pub(crate) fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let value: Option<String> = Option::deserialize(deserializer)?;

    match value.as_deref() {
        None | Some("") => Ok(None),
        Some(text) => {
            let text_deserializer: serde::de::value::StrDeserializer<serde::de::value::Error> =
                text.into_deserializer();
            T::deserialize(text_deserializer)
                .map(Some)
                .map_err(serde::de::Error::custom)
        }
    }
}

/// The values a rendered transaction form starts with.
#[derive(Debug, Clone)]
pub(crate) struct TransactionFormValues {
    pub(crate) account_id: AccountId,
    pub(crate) amount: Option<f64>,
    pub(crate) kind: TransactionKind,
    pub(crate) date: Date,
    pub(crate) description: String,
    pub(crate) category: String,
    pub(crate) is_recurring: bool,
    pub(crate) recurring_interval: Option<RecurringInterval>,
}

impl TransactionFormValues {
    /// A blank form for the account `account_id`, dated `today`.
    pub(crate) fn new(account_id: AccountId, today: Date) -> Self {
        Self {
            account_id,
            amount: None,
            kind: TransactionKind::Expense,
            date: today,
            description: String::new(),
            category: String::new(),
            is_recurring: false,
            recurring_interval: None,
        }
    }

    /// A form pre-filled with an existing transaction.
    pub(crate) fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            account_id: transaction.account_id,
            amount: Some(transaction.amount),
            kind: transaction.kind,
            date: transaction.date,
            description: transaction.description.clone(),
            category: transaction.category.clone(),
            is_recurring: transaction.is_recurring,
            recurring_interval: transaction.recurring_interval,
        }
    }
}

/// Where a rendered transaction form submits to.
pub(crate) enum FormAction {
    /// POST a new transaction.
    Create,
    /// PUT an update to an existing transaction.
    Update(TransactionId),
}

pub(crate) fn transaction_form(
    accounts: &[Account],
    values: &TransactionFormValues,
    action: FormAction,
) -> Markup {
    let date_value = values
        .date
        .format(DATE_INPUT_FORMAT)
        .unwrap_or_else(|_| values.date.to_string());

    let submit_label = match action {
        FormAction::Create => "Create Transaction",
        FormAction::Update(_) => "Update Transaction",
    };

    let kind_option = |kind: TransactionKind, title: &str| {
        html!(
            label class="flex items-center gap-2"
            {
                input
                    type="radio"
                    name="kind"
                    value=(kind.as_str())
                    checked[values.kind == kind]
                    data-kind-radio="true";
                (title)
            }
        )
    };

    let category_options = |kind: TransactionKind| {
        html!(
            @for category in categories_for(kind) {
                option
                    value=(category.key)
                    selected[values.category == category.key]
                    data-category-kind=(kind.as_str())
                {
                    (category.name)
                }
            }
        )
    };

    let fields = html!(
            div class="w-full space-y-4"
            {
                div
                {
                    span class=(FORM_LABEL_STYLE) { "Type" }

                    div class="flex gap-6"
                    {
                        (kind_option(TransactionKind::Expense, "Expense"))
                        (kind_option(TransactionKind::Income, "Income"))
                    }
                }

                div
                {
                    label for="amount" class=(FORM_LABEL_STYLE) { "Amount" }

                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="amount"
                            id="amount"
                            step="0.01"
                            min="0.01"
                            placeholder="0.00"
                            required
                            value=[values.amount]
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="account_id" class=(FORM_LABEL_STYLE) { "Account" }

                    select name="account_id" id="account_id" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for account in accounts {
                            option value=(account.id) selected[account.id == values.account_id]
                            {
                                (account.name) " (" (format_currency(account.balance)) ")"
                            }
                        }
                    }
                }

                div
                {
                    label for="category" class=(FORM_LABEL_STYLE) { "Category" }

                    select name="category" id="category" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" disabled selected[values.category.is_empty()]
                        {
                            "Select category"
                        }

                        optgroup label="Expenses"
                        {
                            (category_options(TransactionKind::Expense))
                        }

                        optgroup label="Income"
                        {
                            (category_options(TransactionKind::Income))
                        }
                    }
                }

                div
                {
                    label for="date" class=(FORM_LABEL_STYLE) { "Date" }

                    input
                        type="date"
                        name="date"
                        id="date"
                        required
                        value=(date_value)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="description" class=(FORM_LABEL_STYLE) { "Description" }

                    input
                        type="text"
                        name="description"
                        id="description"
                        placeholder="Enter a description for this transaction"
                        value=(values.description)
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label class="flex items-center gap-2 mb-2 text-sm font-medium"
                    {
                        input
                            type="checkbox"
                            name="is_recurring"
                            id="is_recurring"
                            value="true"
                            checked[values.is_recurring];
                        "Recurring transaction"
                    }

                    select
                        name="recurring_interval"
                        id="recurring_interval"
                        aria-label="Recurring interval"
                        class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value="" selected[values.recurring_interval.is_none()]
                        {
                            "Select interval"
                        }

                        @for interval in [
                            RecurringInterval::Daily,
                            RecurringInterval::Weekly,
                            RecurringInterval::Monthly,
                            RecurringInterval::Yearly,
                        ] {
                            option
                                value=(interval.as_str())
                                selected[values.recurring_interval == Some(interval)]
                            {
                                (interval.label())
                            }
                        }
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { (submit_label) }
            }
    );

    match action {
        FormAction::Create => html!(
            form
                class=(FORM_CONTAINER_STYLE)
                hx-post=(endpoints::TRANSACTIONS_API)
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
            {
                (fields)
            }
        ),
        FormAction::Update(transaction_id) => html!(
            form
                class=(FORM_CONTAINER_STYLE)
                hx-put=(endpoints::format_endpoint(endpoints::TRANSACTION_API, transaction_id))
                hx-target-error="#alert-container"
                hx-swap="innerHTML"
            {
                (fields)
            }
        ),
    }
}
