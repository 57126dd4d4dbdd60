use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::domain::RecordKind;

/// User-facing settings: currency marker and the category choices offered
/// for each record kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub currency: String,
    pub income_categories: Vec<String>,
    pub expense_categories: Vec<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            currency: "₽".into(),
            income_categories: ["Salary", "Bonus", "Gift", "Other"]
                .map(String::from)
                .into(),
            expense_categories: ["Food", "Transport", "Entertainment", "Utilities", "Other"]
                .map(String::from)
                .into(),
        }
    }
}

impl Settings {
    /// Load settings from a JSON file. Missing fields keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&data)
            .with_context(|| format!("Invalid config file {}", path.display()))
    }

    pub fn categories(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::Income => &self.income_categories,
            RecordKind::Expense => &self.expense_categories,
        }
    }

    /// Find a configured category, ignoring case, and return its canonical spelling.
    pub fn resolve_category(&self, kind: RecordKind, name: &str) -> Option<&str> {
        self.categories(kind)
            .iter()
            .find(|c| c.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}
