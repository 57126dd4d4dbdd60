use std::fs::File;
use std::io::{BufRead, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use crate::application::{AppError, LedgerService};
use crate::domain::{RecordKind, format_cents};
use crate::io::Exporter;

/// A command typed at the session prompt
#[derive(Parser, Debug)]
#[command(no_binary_name = true, disable_version_flag = true)]
#[command(override_usage = "<COMMAND> [ARGS]")]
pub struct SessionCommand {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Record income
    Income {
        /// Amount, e.g. "50", "12.34" or "12,34"
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Category (see `categories`)
        category: String,

        /// Optional comment
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        comment: Vec<String>,
    },

    /// Record an expense
    Expense {
        /// Amount, e.g. "50", "12.34" or "12,34"
        #[arg(allow_hyphen_values = true)]
        amount: String,

        /// Category (see `categories`)
        category: String,

        /// Optional comment
        #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
        comment: Vec<String>,
    },

    /// Set the monthly budget (0 clears it)
    Budget {
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show budget usage
    Status,

    /// Show the current balance
    Balance,

    /// Show the transaction history
    History,

    /// List entries with their positions
    #[command(alias = "ls")]
    List,

    /// Delete the entry at a position shown by `list`
    #[command(alias = "rm")]
    Delete { position: usize },

    /// Replace the amount of the entry at a position shown by `list`
    Edit {
        position: usize,

        #[arg(allow_hyphen_values = true)]
        amount: String,
    },

    /// Show the available categories
    Categories,

    /// Export the ledger
    Export {
        /// Output format
        #[arg(value_enum)]
        format: ExportFormat,

        /// Output file (printed if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// End the session
    #[command(alias = "exit")]
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
}

/// Whether the session keeps reading after a command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end over a [`LedgerService`].
///
/// Ledger and export errors are printed and the session carries on; only
/// failures reading input or writing to the output end it.
pub struct Session<'a, W: Write> {
    service: &'a mut LedgerService,
    out: W,
    prompt: bool,
}

impl<'a, W: Write> Session<'a, W> {
    pub fn new(service: &'a mut LedgerService, out: W) -> Self {
        Self {
            service,
            out,
            prompt: false,
        }
    }

    /// Print a prompt before each line is read.
    pub fn with_prompt(mut self, prompt: bool) -> Self {
        self.prompt = prompt;
        self
    }

    pub fn greet(&mut self) -> Result<()> {
        writeln!(self.out, "finman {}", env!("CARGO_PKG_VERSION"))?;
        writeln!(self.out, "Type `help` for commands, `quit` to leave.")?;
        writeln!(self.out, "{}", self.service.render_balance())?;
        Ok(())
    }

    /// Read and execute commands until `quit` or end of input.
    pub fn run<R: BufRead>(&mut self, input: R) -> Result<()> {
        let mut lines = input.lines();
        loop {
            if self.prompt {
                write!(self.out, "> ")?;
                self.out.flush()?;
            }
            let Some(line) = lines.next() else {
                break;
            };
            let line = line.context("Failed to read input")?;
            if self.execute(&line)? == Flow::Quit {
                break;
            }
        }
        self.out.flush()?;
        Ok(())
    }

    /// Execute a single command line.
    pub fn execute(&mut self, line: &str) -> Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let words = match shell_words::split(line) {
            Ok(words) => words,
            Err(e) => {
                writeln!(self.out, "Error: {}", e)?;
                return Ok(Flow::Continue);
            }
        };

        let command = match SessionCommand::try_parse_from(words) {
            Ok(parsed) => parsed.command,
            Err(e) => {
                // Covers `help` and `--help` as well as usage errors
                write!(self.out, "{}", e.render())?;
                return Ok(Flow::Continue);
            }
        };

        match self.dispatch(command) {
            Ok(flow) => Ok(flow),
            Err(e) => match e.downcast::<AppError>() {
                Ok(app_error) => {
                    writeln!(self.out, "Error: {}", app_error)?;
                    Ok(Flow::Continue)
                }
                Err(other) => Err(other),
            },
        }
    }

    fn dispatch(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Income {
                amount,
                category,
                comment,
            } => {
                let Some(category) = self.category(RecordKind::Income, &category)? else {
                    return Ok(Flow::Continue);
                };
                let record = self
                    .service
                    .add_income(&amount, &category, &comment.join(" "))?;
                writeln!(
                    self.out,
                    "Recorded income: {} {} ({})",
                    format_cents(record.amount_cents),
                    self.service.settings().currency,
                    category
                )?;
                writeln!(self.out, "{}", self.service.render_balance())?;
            }

            Command::Expense {
                amount,
                category,
                comment,
            } => {
                let Some(category) = self.category(RecordKind::Expense, &category)? else {
                    return Ok(Flow::Continue);
                };
                let outcome = self
                    .service
                    .add_expense(&amount, &category, &comment.join(" "))?;
                if let Some(exceeded) = outcome.warning {
                    writeln!(
                        self.out,
                        "Warning: {} ({} over)",
                        exceeded,
                        format_cents(exceeded.overrun())
                    )?;
                }
                writeln!(
                    self.out,
                    "Recorded expense: {} {} ({})",
                    format_cents(outcome.record.amount_cents),
                    self.service.settings().currency,
                    category
                )?;
                writeln!(self.out, "{}", self.service.render_balance())?;
            }

            Command::Budget { amount } => {
                let limit = self.service.set_budget(&amount)?;
                if limit == 0 {
                    writeln!(self.out, "Monthly budget cleared.")?;
                } else {
                    writeln!(
                        self.out,
                        "Monthly budget set: {} {}",
                        format_cents(limit),
                        self.service.settings().currency
                    )?;
                }
            }

            Command::Status => match self.service.budget_status() {
                Some(status) => {
                    let currency = &self.service.settings().currency;
                    writeln!(
                        self.out,
                        "Spent {} of {} {} ({} {} remaining)",
                        format_cents(status.spent),
                        format_cents(status.limit),
                        currency,
                        format_cents(status.remaining),
                        currency
                    )?;
                    if status.is_exceeded() {
                        writeln!(self.out, "Warning: monthly budget exceeded!")?;
                    }
                }
                None => writeln!(self.out, "No monthly budget set.")?,
            },

            Command::Balance => {
                writeln!(self.out, "{}", self.service.render_balance())?;
            }

            Command::History => {
                writeln!(self.out, "{}", self.service.render_history())?;
            }

            Command::List => {
                if self.service.ledger().is_empty() {
                    writeln!(self.out, "No entries.")?;
                }
                for entry in self.service.list_entries() {
                    writeln!(self.out, "{}", entry)?;
                }
            }

            Command::Delete { position } => {
                let record = self.service.delete_entry(position)?;
                writeln!(
                    self.out,
                    "Deleted: {}",
                    record.render(&self.service.settings().currency)
                )?;
                writeln!(self.out, "{}", self.service.render_balance())?;
            }

            Command::Edit { position, amount } => {
                let record = self.service.edit_entry(position, &amount)?;
                writeln!(
                    self.out,
                    "Updated: {}",
                    record.render(&self.service.settings().currency)
                )?;
                writeln!(self.out, "{}", self.service.render_balance())?;
            }

            Command::Categories => {
                let settings = self.service.settings();
                writeln!(self.out, "Income:  {}", settings.income_categories.join(", "))?;
                writeln!(self.out, "Expense: {}", settings.expense_categories.join(", "))?;
            }

            Command::Export { format, output } => self.export(format, output)?,

            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Resolve a category against the configured list, printing the choices
    /// when it is unknown.
    fn category(&mut self, kind: RecordKind, name: &str) -> Result<Option<String>> {
        let settings = self.service.settings();
        if let Some(category) = settings.resolve_category(kind, name) {
            return Ok(Some(category.to_string()));
        }
        writeln!(
            self.out,
            "Error: unknown {} category '{}'. Choose one of: {}",
            kind,
            name,
            settings.categories(kind).join(", ")
        )?;
        Ok(None)
    }

    fn export(&mut self, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
        let exporter = Exporter::new(&*self.service);

        let Some(path) = output else {
            match format {
                ExportFormat::Csv => {
                    exporter.export_records_csv(&mut self.out)?;
                }
                ExportFormat::Json => {
                    exporter.export_full_json(&mut self.out)?;
                    writeln!(self.out)?;
                }
            }
            return Ok(());
        };

        // A bad path is reported like any other command error; the ledger lives on
        match export_to_file(&exporter, format, &path) {
            Ok(count) => match format {
                ExportFormat::Csv => {
                    writeln!(self.out, "Exported {} records to {}", count, path.display())?
                }
                ExportFormat::Json => writeln!(
                    self.out,
                    "Exported ledger ({} records) to {}",
                    count,
                    path.display()
                )?,
            },
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "export failed");
                writeln!(self.out, "Error: {:#}", e)?;
            }
        }

        Ok(())
    }
}

/// Write an export to `path`, returning the number of records written.
fn export_to_file(exporter: &Exporter<'_>, format: ExportFormat, path: &Path) -> Result<usize> {
    let file =
        File::create(path).with_context(|| format!("Failed to create {}", path.display()))?;
    let writer = BufWriter::new(file);
    let count = match format {
        ExportFormat::Csv => exporter.export_records_csv(writer)?,
        ExportFormat::Json => {
            let snapshot = exporter.export_full_json(writer)?;
            snapshot.income.len() + snapshot.expenses.len()
        }
    };
    Ok(count)
}
