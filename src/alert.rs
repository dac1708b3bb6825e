//! Alert fragments for displaying success and error messages to users.
//!
//! Alerts are rendered as htmx out-of-band swaps targeting the alert
//! container in the base page layout, so any endpoint can surface a
//! notification regardless of which element its response is swapped into.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use maud::{Markup, html};

const SUCCESS_BOX_STYLE: &str = "flex items-start gap-3 rounded border border-green-300 \
    bg-green-50 p-4 text-sm text-green-800 shadow-lg dark:border-green-800 \
    dark:bg-gray-800 dark:text-green-300";

const ERROR_BOX_STYLE: &str = "flex items-start gap-3 rounded border border-red-300 \
    bg-red-50 p-4 text-sm text-red-800 shadow-lg dark:border-red-800 \
    dark:bg-gray-800 dark:text-red-300";

/// A user facing notification.
#[derive(Debug, Clone, PartialEq)]
pub enum Alert {
    /// Reports an action that completed successfully.
    Success {
        /// Short summary, e.g. "Transaction deleted".
        message: String,
        /// Extra context displayed below the summary.
        details: String,
    },
    /// Reports an action that completed successfully, without details.
    SuccessSimple {
        /// Short summary, e.g. "Transaction deleted".
        message: String,
    },
    /// Reports an action that failed.
    Error {
        /// Short summary of what went wrong.
        message: String,
        /// What the user can do about it.
        details: String,
    },
}

impl Alert {
    /// Create a new error alert.
    pub fn error(message: &str, details: &str) -> Self {
        Self::Error {
            message: message.to_owned(),
            details: details.to_owned(),
        }
    }

    /// Render the alert as an out-of-band swap for the alert container.
    pub fn into_markup(self) -> Markup {
        let (box_style, message, details) = match self {
            Alert::Success { message, details } => (SUCCESS_BOX_STYLE, message, details),
            Alert::SuccessSimple { message } => (SUCCESS_BOX_STYLE, message, String::new()),
            Alert::Error { message, details } => (ERROR_BOX_STYLE, message, details),
        };

        html!(
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(box_style) role="alert"
                {
                    div class="flex-1"
                    {
                        p class="font-medium" { (message) }

                        @if !details.is_empty() {
                            p class="mt-1" { (details) }
                        }
                    }

                    button
                        type="button"
                        class="font-bold cursor-pointer"
                        aria-label="Dismiss"
                        onclick="document.getElementById('alert-container').firstElementChild.remove()"
                    {
                        "✕"
                    }
                }
            }
        )
    }

    /// Render the alert with a non-200 status code.
    ///
    /// htmx only performs swaps for error status codes when the response
    /// targets extension is configured on the page, which the base layout
    /// sets up for the alert container.
    pub fn into_response_with_status(self, status_code: StatusCode) -> Response {
        (status_code, self.into_markup()).into_response()
    }
}

impl IntoResponse for Alert {
    fn into_response(self) -> Response {
        (StatusCode::OK, self.into_markup()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use scraper::{Html, Selector};

    use super::Alert;

    #[test]
    fn success_alert_renders_message() {
        let markup = Alert::SuccessSimple {
            message: "Transaction deleted".to_owned(),
        }
        .into_markup();

        let html = Html::parse_fragment(&markup.into_string());
        let container = html
            .select(&Selector::parse("#alert-container").unwrap())
            .next()
            .expect("No alert container found");

        assert!(
            container
                .text()
                .collect::<String>()
                .contains("Transaction deleted")
        );
    }

    #[test]
    fn error_alert_renders_details() {
        let markup = Alert::error("Something went wrong", "Try again later").into_markup();

        let html = Html::parse_fragment(&markup.into_string());
        let text = html.root_element().text().collect::<String>();

        assert!(text.contains("Something went wrong"));
        assert!(text.contains("Try again later"));
    }

    #[test]
    fn error_response_carries_status() {
        let response = Alert::error("Nope", "").into_response_with_status(StatusCode::BAD_REQUEST);

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
