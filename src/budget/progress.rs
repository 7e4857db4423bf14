//! The budget progress widget shown on the dashboard.

use maud::{Markup, html};

use crate::{
    account::Account,
    budget::{
        core::Budget,
        threshold::{Severity, usage},
    },
    endpoints,
    html::{FORM_TEXT_INPUT_STYLE, LINK_STYLE, format_currency},
};

fn bar_color(severity: Severity) -> &'static str {
    match severity {
        Severity::Critical => "bg-red-500",
        Severity::Warning => "bg-yellow-500",
        Severity::Normal => "bg-blue-600 dark:bg-blue-500",
    }
}

/// Renders the monthly budget card for the default account: the spend so
/// far, a severity-coloured progress bar, and an inline edit form.
pub(crate) fn budget_progress(
    account: &Account,
    budget: Option<&Budget>,
    current_expenses: f64,
) -> Markup {
    html!(
        section
            id="budget-progress"
            class="w-full bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md mb-8"
        {
            div class="flex justify-between items-start flex-wrap gap-2"
            {
                div
                {
                    h3 class="text-sm font-semibold"
                    {
                        "Monthly Budget (" (account.name) ")"
                    }

                    @match budget {
                        Some(budget) => {
                            p class="text-sm text-gray-600 dark:text-gray-400"
                            {
                                (format_currency(current_expenses))
                                " of "
                                (format_currency(budget.amount))
                                " spent"
                            }
                        }
                        None => {
                            p class="text-sm text-gray-600 dark:text-gray-400"
                            {
                                "No budget set"
                            }
                        }
                    }
                }

                a href=(endpoints::SMART_BUDGET_VIEW) class=(LINK_STYLE)
                {
                    "Smart Budget Recommendation"
                }
            }

            @if let Some(budget) = budget {
                (progress_bar(current_expenses, budget.amount))
            }

            (edit_form(account, budget))
        }
    )
}

fn progress_bar(current_expenses: f64, allotted: f64) -> Markup {
    let budget_usage = usage(current_expenses, allotted);
    let clamped = budget_usage.percent_used.clamp(0.0, 100.0);

    html!(
        div class="mt-3"
        {
            div
                class="w-full bg-gray-200 dark:bg-gray-700 rounded-full h-2.5"
                role="progressbar"
                aria-valuenow=(format!("{:.1}", budget_usage.percent_used))
                aria-valuemin="0"
                aria-valuemax="100"
            {
                @if clamped > 0.0 {
                    div
                        class=(format!("{} h-2.5 rounded-full transition-all", bar_color(budget_usage.severity)))
                        style=(format!("width: {clamped:.1}%"))
                    {}
                }
            }

            p class="text-xs text-gray-600 dark:text-gray-400 text-right mt-1"
            {
                (format!("{:.1}% used", budget_usage.percent_used))
            }
        }
    )
}

fn edit_form(account: &Account, budget: Option<&Budget>) -> Markup {
    html!(
        form
            hx-post=(endpoints::UPDATE_BUDGET)
            hx-target="#budget-progress"
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class="flex items-center gap-2 mt-3"
        {
            input type="hidden" name="account_id" value=(account.id);

            div class="input-wrapper"
            {
                input
                    type="number"
                    name="amount"
                    step="0.01"
                    min="0.01"
                    value=[budget.map(|budget| budget.amount)]
                    placeholder="Enter amount"
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            button
                type="submit"
                class="px-3 py-2 text-sm bg-blue-500 hover:bg-blue-600 text-white rounded"
            {
                @if budget.is_some() { "Update Budget" } @else { "Set Budget" }
            }
        }
    )
}
