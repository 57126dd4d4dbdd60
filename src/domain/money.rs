use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

/// Money is represented as integer cents to avoid floating-point drift.
/// 1 unit = 100 cents, so 50.00 = 5000 cents.
pub type Cents = i64;

/// Digits, optionally followed by a period and more digits. No sign, no exponent.
static AMOUNT_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([0-9]+)(?:\.([0-9]+))?$").expect("amount pattern is valid"));

/// Format cents as a human-readable amount.
/// Example: 5000 -> "50.00", -1234 -> "-12.34"
pub fn format_cents(cents: Cents) -> String {
    let sign = if cents < 0 { "-" } else { "" };
    let abs_cents = cents.unsigned_abs();
    format!("{}{}.{:02}", sign, abs_cents / 100, abs_cents % 100)
}

/// Parse a non-negative amount into cents.
///
/// Accepts `,` as the decimal separator. Fraction digits beyond the second are
/// rounded half-up, so "0.005" becomes 1 cent and "12.344" becomes 1234.
/// Example: "50" -> 5000, "12,5" -> 1250, "0.01" -> 1
pub fn parse_amount(input: &str) -> Result<Cents, ParseAmountError> {
    let normalized = input.replace(',', ".");
    let captures = AMOUNT_PATTERN
        .captures(&normalized)
        .ok_or(ParseAmountError::InvalidFormat)?;

    let units: Cents = captures[1]
        .parse()
        .map_err(|_| ParseAmountError::TooLarge)?;

    let fraction = captures.get(2).map_or("", |m| m.as_str());
    let mut digits = fraction.bytes().map(|b| Cents::from(b - b'0'));
    let tens = digits.next().unwrap_or(0);
    let ones = digits.next().unwrap_or(0);
    let round_up = digits.next().is_some_and(|d| d >= 5);

    units
        .checked_mul(100)
        .and_then(|c| c.checked_add(tens * 10 + ones + Cents::from(round_up)))
        .ok_or(ParseAmountError::TooLarge)
}

/// Parse an amount that must be strictly positive.
pub fn parse_positive_amount(input: &str) -> Result<Cents, ParseAmountError> {
    match parse_amount(input)? {
        0 => Err(ParseAmountError::NotPositive),
        cents => Ok(cents),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseAmountError {
    InvalidFormat,
    NotPositive,
    TooLarge,
}

impl fmt::Display for ParseAmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseAmountError::InvalidFormat => {
                write!(f, "expected a whole or decimal number such as 50 or 12.34")
            }
            ParseAmountError::NotPositive => write!(f, "amount must be positive"),
            ParseAmountError::TooLarge => write!(f, "amount is too large"),
        }
    }
}

impl std::error::Error for ParseAmountError {}
