use crate::domain::{Cents, Ledger, Record, format_cents};

const SEPARATOR_WIDTH: usize = 50;

/// Render the current balance with the currency marker.
/// Example: "Total balance: 12.34 ₽"
pub fn render_balance(balance: Cents, currency: &str) -> String {
    format!("Total balance: {} {}", format_cents(balance), currency)
}

/// Render the transaction history: income lines, a separator, expense lines,
/// another separator, then budget usage when a budget is set.
pub fn render_history(ledger: &Ledger, currency: &str) -> String {
    let separator = "-".repeat(SEPARATOR_WIDTH);
    let mut history = String::from("Transaction history:\n");

    history.push_str(&render_lines(ledger.income(), currency));
    history.push('\n');
    history.push_str(&separator);
    history.push('\n');
    history.push_str(&render_lines(ledger.expenses(), currency));
    history.push('\n');
    history.push_str(&separator);
    history.push('\n');

    let budget = ledger.budget();
    if budget.is_set() {
        let spent = ledger.window_spending();
        history.push_str(&format!(
            "\nSpent this month: {} {} of {} {} budget.",
            format_cents(spent),
            currency,
            format_cents(budget.limit_cents),
            currency
        ));
        if spent > budget.limit_cents {
            history.push_str("\nWarning: monthly budget exceeded!");
        }
    }

    history
}

fn render_lines(records: &[Record], currency: &str) -> String {
    records
        .iter()
        .map(|r| r.render(currency))
        .collect::<Vec<_>>()
        .join("\n")
}
