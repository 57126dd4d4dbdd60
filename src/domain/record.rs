use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{Cents, format_cents};

pub type RecordId = Uuid;

/// Timestamp layout used in rendered records (second precision).
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordKind {
    Income,
    Expense,
}

impl RecordKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordKind::Income => "income",
            RecordKind::Expense => "expense",
        }
    }

    /// Label shown at the start of a rendered record.
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::Income => "Income",
            RecordKind::Expense => "Expense",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Descriptive detail of a record. Editing a record discards it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordDetail {
    Original {
        category: String,
        timestamp: DateTime<Local>,
        comment: Option<String>,
    },
    Edited,
}

/// One income or expense transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub id: RecordId,
    pub kind: RecordKind,
    /// Amount in cents (never negative)
    pub amount_cents: Cents,
    pub detail: RecordDetail,
    /// Budget window that was open when the record was created
    pub window: u32,
}

impl Record {
    pub fn new(
        kind: RecordKind,
        amount_cents: Cents,
        category: impl Into<String>,
        timestamp: DateTime<Local>,
        window: u32,
    ) -> Self {
        assert!(amount_cents > 0, "Record amount must be positive");
        Self {
            id: Uuid::new_v4(),
            kind,
            amount_cents,
            detail: RecordDetail::Original {
                category: category.into(),
                timestamp,
                comment: None,
            },
            window,
        }
    }

    /// Attach a comment. Empty comments are dropped.
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        let comment = comment.into();
        if let RecordDetail::Original { comment: slot, .. } = &mut self.detail {
            *slot = (!comment.is_empty()).then_some(comment);
        }
        self
    }

    /// Replace the amount and drop category, timestamp and comment.
    pub fn edit(&mut self, amount_cents: Cents) {
        self.amount_cents = amount_cents;
        self.detail = RecordDetail::Edited;
    }

    pub fn is_edited(&self) -> bool {
        matches!(self.detail, RecordDetail::Edited)
    }

    pub fn category(&self) -> Option<&str> {
        match &self.detail {
            RecordDetail::Original { category, .. } => Some(category),
            RecordDetail::Edited => None,
        }
    }

    pub fn timestamp(&self) -> Option<DateTime<Local>> {
        match &self.detail {
            RecordDetail::Original { timestamp, .. } => Some(*timestamp),
            RecordDetail::Edited => None,
        }
    }

    pub fn comment(&self) -> Option<&str> {
        match &self.detail {
            RecordDetail::Original { comment, .. } => comment.as_deref(),
            RecordDetail::Edited => None,
        }
    }

    /// Render the record as a single history line.
    /// Example: "Income: 100.00 ₽ (Salary, 2024-01-15 09:30:00) - January pay"
    pub fn render(&self, currency: &str) -> String {
        let head = format!(
            "{}: {} {}",
            self.kind.label(),
            format_cents(self.amount_cents),
            currency
        );
        match &self.detail {
            RecordDetail::Original {
                category,
                timestamp,
                comment,
            } => {
                let mut line = format!(
                    "{} ({}, {})",
                    head,
                    category,
                    timestamp.format(TIMESTAMP_FORMAT)
                );
                if let Some(comment) = comment {
                    line.push_str(" - ");
                    line.push_str(comment);
                }
                line
            }
            RecordDetail::Edited => format!("{} (edited)", head),
        }
    }
}
