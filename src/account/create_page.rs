//! Defines the route handler for the page for creating a new account.

use axum::response::{IntoResponse, Response};
use maud::{Markup, html};

use crate::{
    endpoints,
    html::{
        BUTTON_PRIMARY_STYLE, FORM_CONTAINER_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE,
        PAGE_CONTAINER_STYLE, base, dollar_input_styles,
    },
    navigation::NavBar,
};

use super::core::AccountKind;

fn new_account_form() -> Markup {
    html!(
        form
            class=(FORM_CONTAINER_STYLE)
            hx-post=(endpoints::ACCOUNTS_API)
            hx-target-error="#alert-container"
            hx-swap="innerHTML"
        {
            div class="w-full space-y-4"
            {
                div
                {
                    label for="name" class=(FORM_LABEL_STYLE) { "Name" }

                    input
                        type="text"
                        name="name"
                        id="name"
                        placeholder="e.g. Everyday Checking"
                        required
                        autofocus
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="kind" class=(FORM_LABEL_STYLE) { "Type" }

                    select name="kind" id="kind" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        option value=(AccountKind::Current.as_str()) { "Current" }
                        option value=(AccountKind::Savings.as_str()) { "Savings" }
                    }
                }

                div
                {
                    label for="balance" class=(FORM_LABEL_STYLE) { "Opening Balance" }

                    div class="input-wrapper w-full"
                    {
                        input
                            type="number"
                            name="balance"
                            id="balance"
                            step="0.01"
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label class="flex items-center gap-2 text-sm font-medium"
                    {
                        input type="checkbox" name="is_default" value="true";
                        "Make this the default account"
                    }
                }

                button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Create Account" }
            }
        }
    )
}

/// Render the page for creating an account.
pub async fn get_new_account_page() -> Response {
    let nav_bar = NavBar::new(endpoints::NEW_ACCOUNT_VIEW).into_html();
    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            h1 class="text-xl font-bold" { "New Account" }

            (new_account_form())
        }
    );

    base("New Account", &[dollar_input_styles()], &content).into_response()
}

#[cfg(test)]
mod tests {
    use scraper::{Html, Selector};

    use super::get_new_account_page;

    #[tokio::test]
    async fn page_renders_account_form() {
        let response = get_new_account_page().await;
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let html = Html::parse_document(&String::from_utf8_lossy(&body));

        for selector in [
            "input[name='name']",
            "select[name='kind']",
            "input[name='balance']",
            "input[name='is_default']",
        ] {
            html.select(&Selector::parse(selector).unwrap())
                .next()
                .unwrap_or_else(|| panic!("No element found for selector {selector}"));
        }
    }
}
