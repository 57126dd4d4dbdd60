mod common;

use anyhow::Result;
use common::{run_script, test_service};
use finman::cli::{Flow, Session};

#[test]
fn test_session_records_and_reports() -> Result<()> {
    let mut service = test_service();

    let output = run_script(
        &mut service,
        "income 100 salary monthly pay\n\
         expense 12,5 Food \"lunch, with team\"\n\
         balance\n\
         list\n",
    )?;

    assert!(output.contains("Recorded income: 100.00 ₽ (Salary)"));
    assert!(output.contains("Recorded expense: 12.50 ₽ (Food)"));
    assert!(output.contains("Total balance: 87.50 ₽"));
    assert!(output.contains("\n1: Income: 100.00 ₽ (Salary, "));
    assert!(output.contains(") - monthly pay\n"));
    assert!(output.contains("\n2: Expense: 12.50 ₽ (Food, "));
    assert!(output.contains(") - lunch, with team\n"));

    assert_eq!(service.balance(), 8750);
    Ok(())
}

#[test]
fn test_session_reports_errors_and_continues() -> Result<()> {
    let mut service = test_service();

    let output = run_script(
        &mut service,
        "income abc Salary\n\
         income -5 Salary\n\
         expense 10 Food\n\
         income 10 Lottery\n\
         delete 1\n\
         income 5 Gift\n",
    )?;

    assert!(output.contains("Error: Invalid amount 'abc'"));
    assert!(output.contains("Error: Invalid amount '-5'"));
    assert!(output.contains("Error: Insufficient balance: balance 0.00, required 10.00"));
    assert!(output.contains("Error: unknown income category 'Lottery'"));
    assert!(output.contains("Error: No entry at position 1 (ledger has 0 entries)"));
    assert!(output.contains("Recorded income: 5.00 ₽ (Gift)"));
    assert_eq!(service.balance(), 500);
    Ok(())
}

#[test]
fn test_session_budget_warning() -> Result<()> {
    let mut service = test_service();

    let output = run_script(
        &mut service,
        "income 500 Salary\n\
         budget 100\n\
         expense 90 Food\n\
         expense 20 Transport\n\
         status\n",
    )?;

    assert!(output.contains("Monthly budget set: 100.00 ₽"));
    assert!(output.contains("Warning: monthly budget exceeded: spent 110.00 of 100.00 (10.00 over)"));
    assert!(output.contains("Recorded expense: 20.00 ₽ (Transport)"));
    assert!(output.contains("Spent 110.00 of 100.00 ₽ (-10.00 ₽ remaining)"));
    assert_eq!(service.balance(), 39000);
    Ok(())
}

#[test]
fn test_session_edit_delete_and_history() -> Result<()> {
    let mut service = test_service();

    let output = run_script(
        &mut service,
        "income 100 Salary\n\
         expense 30 Food\n\
         edit 2 25\n\
         delete 3\n\
         history\n",
    )?;

    assert!(output.contains("Updated: Expense: 25.00 ₽ (edited)"));
    assert!(output.contains("Total balance: 75.00 ₽"));
    assert!(output.contains("Error: No entry at position 3 (ledger has 2 entries)"));
    assert!(output.contains("Transaction history:\nIncome: 100.00 ₽ (Salary, "));
    assert!(output.contains("Expense: 25.00 ₽ (edited)\n"));
    Ok(())
}

#[test]
fn test_session_stops_at_quit() -> Result<()> {
    let mut service = test_service();

    let output = run_script(&mut service, "income 1 Other\nquit\nincome 1 Other\n")?;

    assert_eq!(output.matches("Recorded income").count(), 1);
    assert_eq!(service.ledger().len(), 1);
    Ok(())
}

#[test]
fn test_session_ignores_blank_lines_and_comments() -> Result<()> {
    let mut service = test_service();
    let mut out = Vec::new();
    let mut session = Session::new(&mut service, &mut out);

    assert_eq!(session.execute("")?, Flow::Continue);
    assert_eq!(session.execute("   ")?, Flow::Continue);
    assert_eq!(session.execute("# a note")?, Flow::Continue);
    assert_eq!(session.execute("exit")?, Flow::Quit);
    drop(session);

    assert!(out.is_empty());
    Ok(())
}

#[test]
fn test_session_help_and_usage_errors() -> Result<()> {
    let mut service = test_service();

    let output = run_script(&mut service, "help\nfrobnicate\nedit 1\n")?;

    assert!(output.contains("income"));
    assert!(output.contains("Record an expense"));
    assert!(output.contains("unrecognized subcommand 'frobnicate'"));
    assert!(output.contains("required arguments were not provided"));
    Ok(())
}

#[test]
fn test_session_categories_and_empty_list() -> Result<()> {
    let mut service = test_service();

    let output = run_script(&mut service, "categories\nlist\nstatus\n")?;

    assert!(output.contains("Income:  Salary, Bonus, Gift, Other"));
    assert!(output.contains("Expense: Food, Transport, Entertainment, Utilities, Other"));
    assert!(output.contains("No entries."));
    assert!(output.contains("No monthly budget set."));
    Ok(())
}

#[test]
fn test_session_export_to_stdout() -> Result<()> {
    let mut service = test_service();

    let output = run_script(&mut service, "income 10 Gift\nexport csv\n")?;

    assert!(output.contains("position,id,kind,amount,category,timestamp,comment,edited\n"));
    assert!(output.contains(",income,10.00,Gift,"));
    Ok(())
}
