use serde::{Deserialize, Serialize};

use super::Cents;

/// Monthly spending limit plus the budget window it applies to.
///
/// Every call to [`Budget::set`] opens a new window; expenses are counted
/// against the budget only when they were recorded in the current window.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Budget {
    /// Limit in cents. Zero means no budget is set.
    pub limit_cents: Cents,
    pub window: u32,
}

impl Budget {
    pub fn set(&mut self, limit_cents: Cents) {
        self.limit_cents = limit_cents;
        self.window = self.window.wrapping_add(1);
    }

    pub fn is_set(&self) -> bool {
        self.limit_cents > 0
    }

    /// Returns the overrun if spending `additional` on top of `spent` would
    /// exceed the limit.
    pub fn check(&self, spent: Cents, additional: Cents) -> Option<BudgetExceeded> {
        let total = spent.saturating_add(additional);
        (self.is_set() && total > self.limit_cents).then_some(BudgetExceeded {
            spent: total,
            budget: self.limit_cents,
        })
    }
}

/// Advisory warning: an expense pushed spending past the monthly budget.
/// The expense is still recorded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BudgetExceeded {
    pub spent: Cents,
    pub budget: Cents,
}

impl BudgetExceeded {
    pub fn overrun(&self) -> Cents {
        self.spent - self.budget
    }
}

impl std::fmt::Display for BudgetExceeded {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "monthly budget exceeded: spent {} of {}",
            super::format_cents(self.spent),
            super::format_cents(self.budget)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unset_budget_never_warns() {
        let budget = Budget::default();
        assert!(!budget.is_set());
        assert_eq!(budget.check(1_000_000, 1_000_000), None);
    }

    #[test]
    fn test_set_opens_new_window() {
        let mut budget = Budget::default();
        budget.set(10000);
        assert_eq!(budget.window, 1);
        budget.set(0);
        assert_eq!(budget.window, 2);
        assert!(!budget.is_set());
    }

    #[test]
    fn test_check_boundary() {
        let mut budget = Budget::default();
        budget.set(10000);

        assert_eq!(budget.check(5000, 2000), None);
        assert_eq!(budget.check(8000, 2000), None, "reaching the limit is fine");
        assert_eq!(
            budget.check(9000, 2000),
            Some(BudgetExceeded {
                spent: 11000,
                budget: 10000
            })
        );
    }

    #[test]
    fn test_overrun() {
        let warning = BudgetExceeded {
            spent: 11000,
            budget: 10000,
        };
        assert_eq!(warning.overrun(), 1000);
        assert_eq!(
            warning.to_string(),
            "monthly budget exceeded: spent 110.00 of 100.00"
        );
    }
}
