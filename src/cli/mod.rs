mod session;

use std::io::{self, IsTerminal};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::application::LedgerService;
use crate::config::Settings;

pub use session::{Command, ExportFormat, Flow, Session, SessionCommand};

/// Finman - personal income and expense tracker
#[derive(Parser)]
#[command(name = "finman")]
#[command(about = "Track income and expenses, see your balance, and keep a monthly budget")]
#[command(version)]
pub struct Cli {
    /// JSON settings file (currency and category lists)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Currency marker shown after amounts (overrides the settings file)
    #[arg(long, env = "FINMAN_CURRENCY")]
    pub currency: Option<String>,

    /// Monthly budget to start the session with
    #[arg(short, long)]
    pub budget: Option<String>,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    /// Resolve settings from the config file and command line overrides.
    pub fn settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load(path)?,
            None => Settings::default(),
        };
        if let Some(currency) = &self.currency {
            settings.currency = currency.clone();
        }
        Ok(settings)
    }

    pub fn run(self) -> Result<()> {
        init_tracing(self.verbose);

        let settings = self.settings()?;
        let mut service = LedgerService::new(settings);

        if let Some(budget) = &self.budget {
            service
                .set_budget(budget)
                .context("Invalid --budget value")?;
        }

        let stdin = io::stdin();
        let interactive = stdin.is_terminal();
        let mut session = Session::new(&mut service, io::stdout()).with_prompt(interactive);
        if interactive {
            session.greet()?;
        }
        session.run(stdin.lock())
    }
}

/// Install the global tracing subscriber. Logs go to stderr so they never mix
/// with session output.
fn init_tracing(verbose: bool) {
    let default = if verbose { "finman=debug" } else { "finman=warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // A subscriber may already be installed when embedded; keep it.
    let _ = fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parses_flags() {
        let cli = Cli::try_parse_from(["finman", "--currency", "EUR", "-b", "500", "-v"]).unwrap();
        assert_eq!(cli.currency.as_deref(), Some("EUR"));
        assert_eq!(cli.budget.as_deref(), Some("500"));
        assert!(cli.verbose);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_currency_override_applies_to_settings() {
        let cli = Cli::try_parse_from(["finman", "--currency", "$"]).unwrap();
        let settings = cli.settings().unwrap();
        assert_eq!(settings.currency, "$");
        assert_eq!(settings.income_categories, Settings::default().income_categories);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::try_parse_from(["finman", "--config", "/nonexistent/finman.json"]).unwrap();
        assert!(cli.settings().is_err());
    }
}
