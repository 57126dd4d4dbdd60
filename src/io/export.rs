use anyhow::Result;
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::io::Write;

use crate::application::LedgerService;
use crate::domain::{Budget, Cents, Record, TIMESTAMP_FORMAT, format_cents};

/// Ledger snapshot for JSON export
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: String,
    pub exported_at: DateTime<Local>,
    pub currency: String,
    pub balance_cents: Cents,
    pub budget: Budget,
    pub budget_spent_cents: Cents,
    pub income: Vec<Record>,
    pub expenses: Vec<Record>,
}

/// Exporter for writing ledger data out in machine-readable formats
pub struct Exporter<'a> {
    service: &'a LedgerService,
}

impl<'a> Exporter<'a> {
    pub fn new(service: &'a LedgerService) -> Self {
        Self { service }
    }

    /// Export records to CSV, in listing order. Returns the number of rows.
    pub fn export_records_csv<W: Write>(&self, writer: W) -> Result<usize> {
        let mut csv_writer = csv::Writer::from_writer(writer);

        csv_writer.write_record([
            "position",
            "id",
            "kind",
            "amount",
            "category",
            "timestamp",
            "comment",
            "edited",
        ])?;

        let mut count = 0;
        for (i, record) in self.service.ledger().records().enumerate() {
            csv_writer.write_record([
                (i + 1).to_string(),
                record.id.to_string(),
                record.kind.as_str().to_string(),
                format_cents(record.amount_cents),
                record.category().unwrap_or_default().to_string(),
                record
                    .timestamp()
                    .map(|t| t.format(TIMESTAMP_FORMAT).to_string())
                    .unwrap_or_default(),
                record.comment().unwrap_or_default().to_string(),
                record.is_edited().to_string(),
            ])?;
            count += 1;
        }

        csv_writer.flush()?;
        Ok(count)
    }

    /// Export the whole ledger as a pretty-printed JSON snapshot
    pub fn export_full_json<W: Write>(&self, mut writer: W) -> Result<LedgerSnapshot> {
        let ledger = self.service.ledger();

        let snapshot = LedgerSnapshot {
            version: env!("CARGO_PKG_VERSION").to_string(),
            exported_at: Local::now(),
            currency: self.service.settings().currency.clone(),
            balance_cents: ledger.balance(),
            budget: ledger.budget(),
            budget_spent_cents: ledger.window_spending(),
            income: ledger.income().to_vec(),
            expenses: ledger.expenses().to_vec(),
        };

        let json = serde_json::to_string_pretty(&snapshot)?;
        writer.write_all(json.as_bytes())?;
        writer.flush()?;

        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_records() -> LedgerService {
        let mut service = LedgerService::default();
        service.add_income("100", "Salary", "").unwrap();
        service.add_expense("12,50", "Food", "lunch, with team").unwrap();
        service.edit_entry(1, "90").unwrap();
        service
    }

    #[test]
    fn test_export_records_csv() {
        let service = service_with_records();
        let mut out = Vec::new();

        let count = Exporter::new(&service).export_records_csv(&mut out).unwrap();
        assert_eq!(count, 2);

        let text = String::from_utf8(out).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            "position,id,kind,amount,category,timestamp,comment,edited"
        );
        assert!(lines[1].starts_with("1,"));
        assert!(lines[1].ends_with(",income,90.00,,,,true"));
        assert!(lines[2].contains(",expense,12.50,Food,"));
        assert!(lines[2].ends_with(",\"lunch, with team\",false"));
    }

    #[test]
    fn test_export_full_json() {
        let service = service_with_records();
        let mut out = Vec::new();

        let snapshot = Exporter::new(&service).export_full_json(&mut out).unwrap();
        assert_eq!(snapshot.balance_cents, 7750);
        assert_eq!(snapshot.income.len(), 1);
        assert_eq!(snapshot.expenses.len(), 1);

        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["balance_cents"], 7750);
        assert_eq!(value["currency"], "₽");
        assert_eq!(value["income"][0]["detail"]["state"], "edited");
        assert_eq!(value["expenses"][0]["detail"]["category"], "Food");
    }
}
