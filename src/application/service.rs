use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::domain::{
    BudgetExceeded, Cents, Ledger, ParseAmountError, Record, RecordId, RecordKind, parse_amount,
    parse_positive_amount,
};

use super::{AppError, reporting};

/// Application service providing the ledger operations.
/// This is the interface for any front end (terminal session, GUI, web form).
pub struct LedgerService {
    ledger: Ledger,
    settings: Settings,
}

/// Result of recording an expense
#[derive(Debug)]
pub struct ExpenseOutcome {
    pub record: Record,
    /// Set when the expense pushed spending past the monthly budget
    pub warning: Option<BudgetExceeded>,
}

/// One line of the positional listing used by selection prompts
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Entry {
    /// 1-based position: income first, then expenses
    pub position: usize,
    pub id: RecordId,
    pub text: String,
}

impl std::fmt::Display for Entry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.position, self.text)
    }
}

/// Budget usage for the current window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BudgetStatus {
    pub limit: Cents,
    pub spent: Cents,
    pub remaining: Cents,
}

impl BudgetStatus {
    pub fn is_exceeded(&self) -> bool {
        self.spent > self.limit
    }
}

impl LedgerService {
    pub fn new(settings: Settings) -> Self {
        Self {
            ledger: Ledger::new(),
            settings,
        }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn balance(&self) -> Cents {
        self.ledger.balance()
    }

    // ========================
    // Budget
    // ========================

    /// Set the monthly budget. Zero clears it. Spending tracked against the
    /// budget restarts from zero.
    pub fn set_budget(&mut self, amount: &str) -> Result<Cents, AppError> {
        let limit = parse_amount(amount).map_err(|e| reject(amount, e))?;
        self.ledger.set_budget(limit);
        info!(limit, window = self.ledger.budget().window, "budget set");
        Ok(limit)
    }

    /// Current budget usage, or `None` when no budget is set.
    pub fn budget_status(&self) -> Option<BudgetStatus> {
        let budget = self.ledger.budget();
        budget.is_set().then(|| {
            let spent = self.ledger.window_spending();
            BudgetStatus {
                limit: budget.limit_cents,
                spent,
                remaining: budget.limit_cents - spent,
            }
        })
    }

    // ========================
    // Recording
    // ========================

    pub fn add_income(
        &mut self,
        amount: &str,
        category: &str,
        comment: &str,
    ) -> Result<Record, AppError> {
        self.add_income_at(amount, category, comment, Local::now())
    }

    /// Record income with an explicit timestamp.
    pub fn add_income_at(
        &mut self,
        amount: &str,
        category: &str,
        comment: &str,
        timestamp: DateTime<Local>,
    ) -> Result<Record, AppError> {
        let amount_cents = parse_positive_amount(amount).map_err(|e| reject(amount, e))?;
        self.ensure_fits(RecordKind::Income, 0, amount_cents, amount)?;

        let record = Record::new(
            RecordKind::Income,
            amount_cents,
            category,
            timestamp,
            self.ledger.budget().window,
        )
        .with_comment(comment);

        let record = self.ledger.push(record).clone();
        info!(id = %record.id, amount_cents, category, "income recorded");
        Ok(record)
    }

    pub fn add_expense(
        &mut self,
        amount: &str,
        category: &str,
        comment: &str,
    ) -> Result<ExpenseOutcome, AppError> {
        self.add_expense_at(amount, category, comment, Local::now())
    }

    /// Record an expense with an explicit timestamp.
    ///
    /// Fails when the amount exceeds the current balance. Going over the
    /// monthly budget does not fail; it is reported in the outcome.
    pub fn add_expense_at(
        &mut self,
        amount: &str,
        category: &str,
        comment: &str,
        timestamp: DateTime<Local>,
    ) -> Result<ExpenseOutcome, AppError> {
        let amount_cents = parse_positive_amount(amount).map_err(|e| reject(amount, e))?;

        let balance = self.ledger.balance();
        if amount_cents > balance {
            debug!(balance, amount_cents, "expense rejected");
            return Err(AppError::InsufficientBalance {
                balance,
                required: amount_cents,
            });
        }
        self.ensure_fits(RecordKind::Expense, 0, amount_cents, amount)?;

        let budget = self.ledger.budget();
        let warning = budget.check(self.ledger.window_spending(), amount_cents);

        let record = Record::new(
            RecordKind::Expense,
            amount_cents,
            category,
            timestamp,
            budget.window,
        )
        .with_comment(comment);

        let record = self.ledger.push(record).clone();
        info!(id = %record.id, amount_cents, category, "expense recorded");
        if let Some(exceeded) = &warning {
            warn!(
                spent = exceeded.spent,
                budget = exceeded.budget,
                "monthly budget exceeded"
            );
        }

        Ok(ExpenseOutcome { record, warning })
    }

    // ========================
    // Listing, editing, deleting
    // ========================

    /// All records as a 1-based listing: income first, then expenses.
    pub fn list_entries(&self) -> Vec<Entry> {
        self.ledger
            .records()
            .enumerate()
            .map(|(i, record)| Entry {
                position: i + 1,
                id: record.id,
                text: record.render(&self.settings.currency),
            })
            .collect()
    }

    /// Delete the record at a 1-based position of [`LedgerService::list_entries`].
    pub fn delete_entry(&mut self, index: usize) -> Result<Record, AppError> {
        let id = self.locate(index)?;
        self.delete_record(id)
    }

    pub fn delete_record(&mut self, id: RecordId) -> Result<Record, AppError> {
        let record = self
            .ledger
            .remove(id)
            .ok_or(AppError::RecordNotFound(id))?;
        info!(id = %id, kind = %record.kind, "record deleted");
        Ok(record)
    }

    /// Replace the amount of the record at a 1-based position of
    /// [`LedgerService::list_entries`]. Category, timestamp and comment are
    /// discarded and the record is marked as edited.
    pub fn edit_entry(&mut self, index: usize, new_amount: &str) -> Result<Record, AppError> {
        let id = self.locate(index)?;
        self.edit_record(id, new_amount)
    }

    pub fn edit_record(&mut self, id: RecordId, new_amount: &str) -> Result<Record, AppError> {
        let amount_cents = parse_amount(new_amount).map_err(|e| reject(new_amount, e))?;
        let (kind, current) = self
            .ledger
            .get(id)
            .map(|r| (r.kind, r.amount_cents))
            .ok_or(AppError::RecordNotFound(id))?;
        self.ensure_fits(kind, current, amount_cents, new_amount)?;

        let record = self
            .ledger
            .get_mut(id)
            .ok_or(AppError::RecordNotFound(id))?;
        record.edit(amount_cents);
        info!(id = %id, kind = %record.kind, amount_cents, "record edited");
        Ok(record.clone())
    }

    /// Reject amounts that would push the income or expense total past what
    /// `Cents` can hold.
    fn ensure_fits(
        &self,
        kind: RecordKind,
        removed: Cents,
        added: Cents,
        input: &str,
    ) -> Result<(), AppError> {
        if self.ledger.can_hold(kind, removed, added) {
            Ok(())
        } else {
            Err(reject(input, ParseAmountError::TooLarge))
        }
    }

    fn locate(&self, index: usize) -> Result<RecordId, AppError> {
        self.ledger.locate(index).ok_or_else(|| {
            debug!(index, "position out of range");
            AppError::IndexOutOfRange {
                index,
                len: self.ledger.len(),
            }
        })
    }

    // ========================
    // Rendering
    // ========================

    pub fn render_history(&self) -> String {
        reporting::render_history(&self.ledger, &self.settings.currency)
    }

    pub fn render_balance(&self) -> String {
        reporting::render_balance(self.ledger.balance(), &self.settings.currency)
    }
}

impl Default for LedgerService {
    fn default() -> Self {
        Self::new(Settings::default())
    }
}

fn reject(input: &str, reason: ParseAmountError) -> AppError {
    debug!(input, %reason, "amount rejected");
    AppError::invalid_amount(input, reason)
}
