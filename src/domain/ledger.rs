use serde::{Deserialize, Serialize};

use super::{Budget, Cents, Record, RecordId, RecordKind};

/// Compute the balance from a set of records.
/// Balance = sum of income amounts - sum of expense amounts, saturating at the `Cents` range.
pub fn compute_balance<'a>(records: impl IntoIterator<Item = &'a Record>) -> Cents {
    records
        .into_iter()
        .fold(0, |balance: Cents, record| match record.kind {
            RecordKind::Income => balance.saturating_add(record.amount_cents),
            RecordKind::Expense => balance.saturating_sub(record.amount_cents),
        })
}

/// Sum of the expenses recorded in the given budget window.
pub fn compute_window_spending<'a>(
    records: impl IntoIterator<Item = &'a Record>,
    window: u32,
) -> Cents {
    records
        .into_iter()
        .filter(|r| r.kind == RecordKind::Expense && r.window == window)
        .fold(0, |total: Cents, r| total.saturating_add(r.amount_cents))
}

/// In-memory ledger: income and expense records in insertion order, plus the
/// monthly budget. Balance and budget usage are always derived from the records.
///
/// Callers keep the income total and the expense total within `Cents` (see
/// [`Ledger::can_hold`]), so the balance and window spending never overflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ledger {
    income: Vec<Record>,
    expenses: Vec<Record>,
    budget: Budget,
}

impl Ledger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn income(&self) -> &[Record] {
        &self.income
    }

    pub fn expenses(&self) -> &[Record] {
        &self.expenses
    }

    pub fn budget(&self) -> Budget {
        self.budget
    }

    /// Set the monthly budget and start a new budget window.
    pub fn set_budget(&mut self, limit_cents: Cents) {
        self.budget.set(limit_cents);
    }

    /// Append a record to the sequence matching its kind.
    pub fn push(&mut self, record: Record) -> &Record {
        let sequence = self.sequence_mut(record.kind);
        sequence.push(record);
        &sequence[sequence.len() - 1]
    }

    /// All records: income first, then expenses, each in insertion order.
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.income.iter().chain(self.expenses.iter())
    }

    pub fn len(&self) -> usize {
        self.income.len() + self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Resolve a 1-based position in [`Ledger::records`] order to a record id.
    pub fn locate(&self, position: usize) -> Option<RecordId> {
        position
            .checked_sub(1)
            .and_then(|index| self.records().nth(index))
            .map(|r| r.id)
    }

    pub fn get(&self, id: RecordId) -> Option<&Record> {
        self.records().find(|r| r.id == id)
    }

    pub fn get_mut(&mut self, id: RecordId) -> Option<&mut Record> {
        self.income
            .iter_mut()
            .chain(self.expenses.iter_mut())
            .find(|r| r.id == id)
    }

    pub fn remove(&mut self, id: RecordId) -> Option<Record> {
        for sequence in [&mut self.income, &mut self.expenses] {
            if let Some(index) = sequence.iter().position(|r| r.id == id) {
                return Some(sequence.remove(index));
            }
        }
        None
    }

    /// Sum of all amounts of one kind.
    pub fn total(&self, kind: RecordKind) -> Cents {
        self.sequence(kind)
            .iter()
            .fold(0, |total: Cents, r| total.saturating_add(r.amount_cents))
    }

    /// Whether the total for `kind` stays within `Cents` after `removed` cents
    /// are taken out and `added` cents put in.
    pub fn can_hold(&self, kind: RecordKind, removed: Cents, added: Cents) -> bool {
        (self.total(kind) - removed).checked_add(added).is_some()
    }

    pub fn balance(&self) -> Cents {
        compute_balance(self.records())
    }

    /// Expenses counted against the current budget window.
    pub fn window_spending(&self) -> Cents {
        compute_window_spending(&self.expenses, self.budget.window)
    }

    fn sequence(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::Income => &self.income,
            RecordKind::Expense => &self.expenses,
        }
    }

    fn sequence_mut(&mut self, kind: RecordKind) -> &mut Vec<Record> {
        match kind {
            RecordKind::Income => &mut self.income,
            RecordKind::Expense => &mut self.expenses,
        }
    }
}
