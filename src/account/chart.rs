//! Chart generation for the account page.
//!
//! Builds the income/expense bar chart over the selected date-range bucket as
//! JSON configuration for the ECharts library, plus the HTML container and
//! JavaScript initialization code.

use charming::{
    Chart,
    component::{Axis, Grid, Legend},
    element::{
        AxisLabel, AxisPointer, AxisPointerType, AxisType, ItemStyle, JsFunction, Tooltip, Trigger,
    },
    series::Bar,
};
use maud::{Markup, PreEscaped, html};

use crate::{
    account::aggregation::{PeriodSummary, short_date_label},
    html::HeadElement,
};

const INCOME_COLOR: &str = "#22c55e";
const EXPENSE_COLOR: &str = "#ef4444";

/// The account chart with its HTML container ID and ECharts configuration.
pub(super) struct AccountChart {
    /// The HTML element ID to use for the chart (kebab-case)
    pub id: &'static str,
    /// The ECharts configuration as a JSON string
    pub options: String,
}

impl AccountChart {
    pub(super) fn new(summary: &PeriodSummary) -> Self {
        Self {
            id: "account-period-chart",
            options: period_chart(summary).to_string(),
        }
    }
}

/// Renders the HTML container the chart is mounted into.
pub(super) fn chart_container(chart: &AccountChart) -> Markup {
    html!(
        div
            id=(chart.id)
            class="min-h-[320px] rounded dark:bg-gray-100"
        {}
    )
}

/// Generates JavaScript initialization code for the account chart.
///
/// The script initializes the ECharts instance with dark mode support and
/// responsive resizing.
pub(super) fn chart_script(chart: &AccountChart) -> HeadElement {
    let script_content = format!(
        r#"document.addEventListener('DOMContentLoaded', function() {{
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
        }});"#,
        chart.id, chart.options
    );

    HeadElement::ScriptSource(PreEscaped(script_content))
}

fn period_chart(summary: &PeriodSummary) -> Chart {
    let labels: Vec<String> = summary
        .series
        .iter()
        .map(|day| short_date_label(day.date))
        .collect();
    let income: Vec<f64> = summary.series.iter().map(|day| day.income).collect();
    let expenses: Vec<f64> = summary.series.iter().map(|day| day.expense).collect();

    Chart::new()
        .tooltip(currency_tooltip())
        .legend(Legend::new().top("1%"))
        .grid(
            Grid::new()
                .left("3%")
                .right("4%")
                .bottom("3%")
                .contain_label(true),
        )
        .x_axis(Axis::new().type_(AxisType::Category).data(labels))
        .y_axis(
            Axis::new()
                .type_(AxisType::Value)
                .axis_label(AxisLabel::new().formatter(currency_formatter())),
        )
        .series(
            Bar::new()
                .name("Income")
                .item_style(ItemStyle::new().color(INCOME_COLOR))
                .data(income),
        )
        .series(
            Bar::new()
                .name("Expense")
                .item_style(ItemStyle::new().color(EXPENSE_COLOR))
                .data(expenses),
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

/// Creates a tooltip configuration for currency values
fn currency_tooltip() -> Tooltip {
    Tooltip::new()
        .trigger(Trigger::Axis)
        .value_formatter(currency_formatter())
        .axis_pointer(AxisPointer::new().type_(AxisPointerType::Shadow))
}

#[cfg(test)]
mod tests {
    use time::macros::date;

    use crate::account::aggregation::{DayTotal, PeriodSummary, PeriodTotals};

    use super::AccountChart;

    #[test]
    fn chart_options_contain_both_series_and_day_labels() {
        let summary = PeriodSummary {
            series: vec![
                DayTotal {
                    date: date!(2024-01-01),
                    income: 200.0,
                    expense: 50.0,
                },
                DayTotal {
                    date: date!(2024-01-02),
                    income: 0.0,
                    expense: 30.0,
                },
            ],
            totals: PeriodTotals {
                income: 200.0,
                expense: 80.0,
            },
        };

        let chart = AccountChart::new(&summary);

        assert!(chart.options.contains("Income"));
        assert!(chart.options.contains("Expense"));
        assert!(chart.options.contains("Jan 01"));
        assert!(chart.options.contains("Jan 02"));
    }
}
