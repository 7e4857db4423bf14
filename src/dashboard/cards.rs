//! Card components for the accounts shown on the dashboard.

use maud::{Markup, html};

use crate::{
    account::Account,
    endpoints::{self, format_endpoint},
    html::format_currency,
};

/// Renders the grid of account cards.
pub(super) fn account_cards_view(accounts: &[Account]) -> Markup {
    html!(
        section class="w-full" aria-label="Accounts"
        {
            div class="grid grid-cols-1 sm:grid-cols-2 lg:grid-cols-3 gap-4"
            {
                @for account in accounts {
                    (account_card(account))
                }
            }
        }
    )
}

/// Renders a single account card: name, balance, kind, and the default
/// switch. The card links through to the account page.
fn account_card(account: &Account) -> Markup {
    let account_url = format_endpoint(endpoints::ACCOUNT_VIEW, account.id);
    let default_url = format_endpoint(endpoints::SET_DEFAULT_ACCOUNT, account.id);

    html!(
        div
            class="bg-white dark:bg-gray-800 border border-gray-200
                dark:border-gray-700 rounded-lg p-4 shadow-md
                hover:shadow-lg transition-shadow flex flex-col justify-between"
        {
            div class="flex items-center justify-between mb-3"
            {
                h3 class="text-sm font-medium text-gray-600 dark:text-gray-300"
                {
                    (account.name)
                }

                @if account.is_default {
                    span
                        class="inline-flex items-center px-2.5 py-0.5 text-xs
                            font-semibold text-blue-800 bg-blue-100 rounded-full
                            dark:bg-blue-900 dark:text-blue-300"
                    {
                        "Default"
                    }
                } @else {
                    button
                        hx-post=(default_url)
                        hx-target-error="#alert-container"
                        class="text-xs text-blue-600 hover:text-blue-500
                            dark:text-blue-400 underline"
                        title="Use this account for the budget widget"
                    {
                        "Make default"
                    }
                }
            }

            a href=(account_url) class="block"
            {
                p class="text-3xl font-bold" { (format_currency(account.balance)) }

                p class="mt-1 text-sm text-gray-600 dark:text-gray-400"
                {
                    (account.kind.label())
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use crate::account::{Account, AccountKind};

    use super::account_cards_view;

    fn account(id: i64, name: &str, is_default: bool) -> Account {
        Account {
            id,
            name: name.to_owned(),
            kind: AccountKind::Current,
            balance: 123.4,
            is_default,
        }
    }

    #[test]
    fn default_account_gets_a_badge_not_a_switch() {
        let html = account_cards_view(&[account(1, "Everyday", true)]).into_string();

        assert!(html.contains("Default"));
        assert!(!html.contains("Make default"));
    }

    #[test]
    fn other_accounts_get_the_default_switch() {
        let accounts = [account(1, "Everyday", true), account(2, "Rainy Day", false)];

        let html = account_cards_view(&accounts).into_string();

        assert!(html.contains("Make default"));
        assert!(html.contains("/api/accounts/2/default"));
    }

    #[test]
    fn cards_link_to_the_account_page() {
        let html = account_cards_view(&[account(7, "Everyday", true)]).into_string();

        assert!(html.contains("href=\"/accounts/7\""));
        assert!(html.contains("$123.40"));
    }
}
