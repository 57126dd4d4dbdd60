// Allow dead_code because these helpers are used across different test files
// which are compiled separately
#![allow(dead_code)]

use anyhow::Result;
use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use finman::application::LedgerService;
use finman::cli::Session;
use finman::config::Settings;

/// Helper to create a service with default settings and an empty ledger
pub fn test_service() -> LedgerService {
    LedgerService::new(Settings::default())
}

/// Helper to parse "YYYY-MM-DD HH:MM:SS" into a local timestamp
pub fn parse_timestamp(value: &str) -> DateTime<Local> {
    let naive = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S").unwrap();
    Local.from_local_datetime(&naive).earliest().unwrap()
}

/// Feed a script to a session and return everything it printed
pub fn run_script(service: &mut LedgerService, script: &str) -> Result<String> {
    let mut out = Vec::new();
    Session::new(service, &mut out).run(script.as_bytes())?;
    Ok(String::from_utf8(out)?)
}

/// Test fixture: records used across tests
pub struct Fixtures;

impl Fixtures {
    /// Record a single income so expenses have something to draw from
    pub fn fund(service: &mut LedgerService, amount: &str) -> Result<()> {
        service.add_income(amount, "Salary", "")?;
        Ok(())
    }

    /// Two income records followed by three expense records
    pub fn two_income_three_expenses(service: &mut LedgerService) -> Result<()> {
        service.add_income("1000", "Salary", "")?;
        service.add_income("200", "Bonus", "")?;
        service.add_expense("10", "Food", "first")?;
        service.add_expense("20", "Transport", "second")?;
        service.add_expense("30", "Utilities", "third")?;
        Ok(())
    }
}
