//! Alert system for displaying success and error messages to users.
//!
//! Alerts are rendered as out-of-band swaps targeting the `#alert-container`
//! element in the base layout, so any htmx endpoint can surface a message
//! without replacing the content it was asked for.

use maud::{Markup, html};

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertType {
    Success,
    Error,
}

/// Renders alert messages with appropriate styling
pub struct AlertTemplate<'a> {
    pub alert_type: AlertType,
    pub message: &'a str,
    pub details: &'a str,
}

impl<'a> AlertTemplate<'a> {
    /// Create a new success alert
    pub fn success(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Success,
            message,
            details,
        }
    }

    /// Create a new error alert
    pub fn error(message: &'a str, details: &'a str) -> Self {
        Self {
            alert_type: AlertType::Error,
            message,
            details,
        }
    }

    pub fn into_html(self) -> Markup {
        let container_style = match self.alert_type {
            AlertType::Success => {
                "p-4 mb-4 rounded-lg border border-green-300 bg-green-50 \
                text-green-800 dark:border-green-800 dark:bg-gray-800 \
                dark:text-green-400"
            }
            AlertType::Error => {
                "p-4 mb-4 rounded-lg border border-red-300 bg-red-50 \
                text-red-800 dark:border-red-800 dark:bg-gray-800 \
                dark:text-red-400"
            }
        };

        html!(
            // Replaces the whole container, so it must carry the positioning
            // the base layout gave the empty one.
            div
                id="alert-container"
                hx-swap-oob="true"
                class="w-full max-w-md px-4"
                style="position: fixed; bottom: 1rem; left: 50%; transform: translateX(-50%); z-index: 9999;"
            {
                div class=(container_style) role="alert"
                {
                    p class="font-medium" { (self.message) }

                    @if !self.details.is_empty() {
                        p class="text-sm" { (self.details) }
                    }

                    button
                        type="button"
                        class="mt-2 text-xs underline"
                        onclick="this.closest('[role=alert]').remove()"
                    {
                        "Dismiss"
                    }
                }
            }
        )
    }
}
