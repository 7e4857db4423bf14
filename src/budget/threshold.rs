//! Maps budget usage to a severity tier.

/// How urgently the budget widget should draw attention to itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// Comfortably within budget.
    Normal,
    /// Three quarters of the budget is gone.
    Warning,
    /// The budget is all but spent (or overspent).
    Critical,
}

/// The percentage of budget used and the tier it lands in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetUsage {
    /// Spent over allotted, as a percentage. Zero when no budget is allotted.
    pub percent_used: f64,
    /// The severity tier for `percent_used`.
    pub severity: Severity,
}

const WARNING_PERCENT: f64 = 75.0;
const CRITICAL_PERCENT: f64 = 90.0;

/// Compute how much of an allotted budget has been spent and which severity
/// tier that falls into. Both thresholds are inclusive: exactly 75% is
/// already a warning, exactly 90% is already critical.
///
/// A zero or negative allotment yields 0% at [Severity::Normal]; whether
/// that means "no budget configured" is for the caller to decide, since only
/// it knows whether a budget row exists at all.
pub fn usage(spent: f64, allotted: f64) -> BudgetUsage {
    let percent_used = if allotted > 0.0 {
        (spent / allotted) * 100.0
    } else {
        0.0
    };

    let severity = if percent_used >= CRITICAL_PERCENT {
        Severity::Critical
    } else if percent_used >= WARNING_PERCENT {
        Severity::Warning
    } else {
        Severity::Normal
    };

    BudgetUsage {
        percent_used,
        severity,
    }
}

#[cfg(test)]
mod tests {
    use super::{BudgetUsage, Severity, usage};

    #[test]
    fn well_under_budget_is_normal() {
        let BudgetUsage {
            percent_used,
            severity,
        } = usage(100.0, 400.0);

        assert_eq!(percent_used, 25.0);
        assert_eq!(severity, Severity::Normal);
    }

    #[test]
    fn warning_boundary_is_inclusive() {
        assert_eq!(usage(74.999, 100.0).severity, Severity::Normal);
        assert_eq!(usage(75.0, 100.0).severity, Severity::Warning);
    }

    #[test]
    fn critical_boundary_is_inclusive() {
        assert_eq!(usage(89.999, 100.0).severity, Severity::Warning);
        assert_eq!(usage(90.0, 100.0).severity, Severity::Critical);
    }

    #[test]
    fn overspending_is_critical() {
        let result = usage(250.0, 100.0);

        assert_eq!(result.percent_used, 250.0);
        assert_eq!(result.severity, Severity::Critical);
    }

    #[test]
    fn zero_allotment_reads_as_zero_percent() {
        let result = usage(50.0, 0.0);

        assert_eq!(result.percent_used, 0.0);
        assert_eq!(result.severity, Severity::Normal);
    }

    #[test]
    fn negative_allotment_reads_as_zero_percent() {
        assert_eq!(usage(50.0, -10.0).percent_used, 0.0);
    }
}
