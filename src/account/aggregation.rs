//! Transaction data aggregation for the account chart.
//!
//! Groups an account's transactions by calendar day over a named date-range
//! bucket and sums income and expenses per day, plus run totals. Pure
//! functions over in-memory data; the chart layer turns the result into
//! ECharts options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use time::{Date, Duration, Month, PrimitiveDateTime, Time};

use crate::transaction::{Transaction, TransactionKind};

/// A named date-range filter for the account chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DateRangeBucket {
    /// The last 7 days.
    #[serde(rename = "7d")]
    SevenDays,
    /// The last 30 days.
    #[default]
    #[serde(rename = "1m")]
    OneMonth,
    /// The last 90 days.
    #[serde(rename = "3m")]
    ThreeMonths,
    /// The last 180 days.
    #[serde(rename = "6m")]
    SixMonths,
    /// Every transaction on record.
    #[serde(rename = "all")]
    All,
}

impl DateRangeBucket {
    /// Every bucket, in the order the range selector lists them.
    pub(crate) fn all_buckets() -> [Self; 5] {
        [
            Self::SevenDays,
            Self::OneMonth,
            Self::ThreeMonths,
            Self::SixMonths,
            Self::All,
        ]
    }

    /// The number of days the bucket spans, or `None` for [Self::All].
    pub(crate) fn days(self) -> Option<i64> {
        match self {
            Self::SevenDays => Some(7),
            Self::OneMonth => Some(30),
            Self::ThreeMonths => Some(90),
            Self::SixMonths => Some(180),
            Self::All => None,
        }
    }

    pub(crate) fn as_query_value(self) -> &'static str {
        match self {
            Self::SevenDays => "7d",
            Self::OneMonth => "1m",
            Self::ThreeMonths => "3m",
            Self::SixMonths => "6m",
            Self::All => "all",
        }
    }

    pub(crate) fn label(self) -> &'static str {
        match self {
            Self::SevenDays => "Last 7 Days",
            Self::OneMonth => "Last Month",
            Self::ThreeMonths => "Last 3 Months",
            Self::SixMonths => "Last 6 Months",
            Self::All => "All Time",
        }
    }
}

/// The income and expense sums for one calendar day.
#[derive(Debug, PartialEq)]
pub struct DayTotal {
    /// The day the sums belong to.
    pub date: Date,
    /// The sum of income amounts on that day.
    pub income: f64,
    /// The sum of expense amounts on that day.
    pub expense: f64,
}

/// The income and expense sums across a whole period.
#[derive(Debug, PartialEq)]
pub struct PeriodTotals {
    pub income: f64,
    pub expense: f64,
}

impl PeriodTotals {
    /// Income minus expenses. Derived on demand, never stored.
    pub fn net(&self) -> f64 {
        self.income - self.expense
    }
}

/// The aggregated chart data for one account and bucket.
#[derive(Debug, PartialEq)]
pub struct PeriodSummary {
    /// Per-day sums, ascending by the underlying date.
    pub series: Vec<DayTotal>,
    /// Sums across the whole period.
    pub totals: PeriodTotals,
}

/// Group `transactions` by calendar day over `bucket`, anchored at `now`.
///
/// The window runs from the start of day (now − bucket days) through the end
/// of day now, both inclusive; [DateRangeBucket::All] has no lower bound.
/// The series is keyed and ordered by the underlying date. Sorting the
/// formatted labels instead would interleave months ("Apr 02" < "Jan 01"),
/// so labels are applied only at render time.
pub fn aggregate(
    transactions: &[Transaction],
    bucket: DateRangeBucket,
    now: PrimitiveDateTime,
) -> PeriodSummary {
    let start = bucket
        .days()
        .map(|days| (now.date() - Duration::days(days)).midnight());
    let end = now.date().with_time(Time::MAX);

    let mut days: BTreeMap<Date, (f64, f64)> = BTreeMap::new();

    for transaction in transactions {
        if transaction.date > end {
            continue;
        }

        if let Some(start) = start {
            if transaction.date < start {
                continue;
            }
        }

        let entry = days.entry(transaction.date.date()).or_insert((0.0, 0.0));
        match transaction.kind {
            TransactionKind::Income => entry.0 += transaction.amount,
            TransactionKind::Expense => entry.1 += transaction.amount,
        }
    }

    let series: Vec<DayTotal> = days
        .into_iter()
        .map(|(date, (income, expense))| DayTotal {
            date,
            income,
            expense,
        })
        .collect();

    let totals = series.iter().fold(
        PeriodTotals {
            income: 0.0,
            expense: 0.0,
        },
        |mut totals, day| {
            totals.income += day.income;
            totals.expense += day.expense;
            totals
        },
    );

    PeriodSummary { series, totals }
}

/// Format a day as the fixed short label used on the chart axis, e.g. "Jan 01".
pub fn short_date_label(date: Date) -> String {
    format!("{} {:02}", month_abbrev(date.month()), date.day())
}

pub(crate) fn month_abbrev(month: Month) -> &'static str {
    match month {
        Month::January => "Jan",
        Month::February => "Feb",
        Month::March => "Mar",
        Month::April => "Apr",
        Month::May => "May",
        Month::June => "Jun",
        Month::July => "Jul",
        Month::August => "Aug",
        Month::September => "Sep",
        Month::October => "Oct",
        Month::November => "Nov",
        Month::December => "Dec",
    }
}
