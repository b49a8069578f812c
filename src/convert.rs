/*
    ALICE-SWIFT
    Copyright (C) 2026 Moroya Sakamoto
*/

//! Conversions between raw SWIFT field values and typed values.
//!
//! Field values stay raw strings in the model; these helpers interpret the
//! common formats used by the treasury and derivative confirmations:
//! dates (`6!n`, `8!n`), times (`4!n`), decimal amounts with a comma
//! separator, currency/amount pairs, BICs and a few code lists.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dates and times
// ---------------------------------------------------------------------------

/// Parse a `YYMMDD` date. Years `00`-`79` map to 20xx, `80`-`99` to 19xx.
pub fn parse_date6(value: &str) -> Option<NaiveDate> {
    if value.len() != 6 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let yy: i32 = value[..2].parse().ok()?;
    let year = if yy < 80 { 2000 + yy } else { 1900 + yy };
    NaiveDate::from_ymd_opt(year, value[2..4].parse().ok()?, value[4..6].parse().ok()?)
}

/// Parse a `YYYYMMDD` date.
pub fn parse_date8(value: &str) -> Option<NaiveDate> {
    if value.len() != 8 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveDate::from_ymd_opt(
        value[..4].parse().ok()?,
        value[4..6].parse().ok()?,
        value[6..8].parse().ok()?,
    )
}

/// Parse an `HHMM` time.
pub fn parse_time4(value: &str) -> Option<NaiveTime> {
    if value.len() != 4 || !value.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    NaiveTime::from_hms_opt(value[..2].parse().ok()?, value[2..].parse().ok()?, 0)
}

/// Format a date as `YYMMDD`.
pub fn format_date6(date: NaiveDate) -> String {
    date.format("%y%m%d").to_string()
}

/// Format a date as `YYYYMMDD`.
pub fn format_date8(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// A SWIFT decimal amount (`1234,56`), stored as an integer mantissa and a
/// number of fractional digits so no precision is lost.
///
/// Equality and hashing compare numeric values: `1,5` equals `1,50`.
/// `Display` keeps the parsed scale.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Amount {
    pub mantissa: i128,
    pub scale: u32,
}

impl Amount {
    /// Maximum number of characters (digits plus comma) SWIFT allows.
    pub const MAX_LEN: usize = 15;

    /// Parse `digits,[digits]`. A leading `N` marks a negative value (used
    /// by rate fields such as 37G). The comma is mandatory.
    pub fn parse(value: &str) -> Option<Self> {
        let (negative, body) = match value.strip_prefix('N') {
            Some(rest) => (true, rest),
            None => (false, value),
        };
        if body.is_empty() || body.len() > Self::MAX_LEN {
            return None;
        }
        let (int_part, frac_part) = body.split_once(',')?;
        if int_part.is_empty()
            || !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return None;
        }
        let mut mantissa: i128 = 0;
        for b in int_part.bytes().chain(frac_part.bytes()) {
            mantissa = mantissa.checked_mul(10)?.checked_add(i128::from(b - b'0'))?;
        }
        Some(Self {
            mantissa: if negative { -mantissa } else { mantissa },
            scale: frac_part.len() as u32,
        })
    }

    /// Approximate floating-point value.
    pub fn to_f64(&self) -> f64 {
        self.mantissa as f64 / 10f64.powi(self.scale as i32)
    }

    #[inline]
    pub fn is_negative(&self) -> bool {
        self.mantissa < 0
    }

    /// Same value with trailing fractional zeros removed.
    pub fn normalized(&self) -> Self {
        let mut out = *self;
        while out.scale > 0 && out.mantissa % 10 == 0 {
            out.mantissa /= 10;
            out.scale -= 1;
        }
        out
    }
}

impl PartialEq for Amount {
    fn eq(&self, other: &Self) -> bool {
        let (a, b) = (self.normalized(), other.normalized());
        a.mantissa == b.mantissa && a.scale == b.scale
    }
}

impl Eq for Amount {}

impl std::hash::Hash for Amount {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        let n = self.normalized();
        n.mantissa.hash(state);
        n.scale.hash(state);
    }
}

impl fmt::Display for Amount {
    /// Writes the SWIFT form: `N` prefix for negatives, comma separator,
    /// trailing comma when there are no fractional digits.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_negative() {
            f.write_str("N")?;
        }
        let digits = self.mantissa.unsigned_abs().to_string();
        let scale = self.scale as usize;
        let padded = if digits.len() <= scale {
            format!("{}{}", "0".repeat(scale + 1 - digits.len()), digits)
        } else {
            digits
        };
        let split = padded.len() - scale;
        write!(f, "{},{}", &padded[..split], &padded[split..])
    }
}

impl FromStr for Amount {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| ConvertError::InvalidAmount(s.to_string()))
    }
}

/// Split a `3!a15d` value (`EUR1000000,`) into currency and amount.
pub fn parse_currency_amount(value: &str) -> Option<(&str, Amount)> {
    if value.len() < 4 || !value.is_char_boundary(3) {
        return None;
    }
    let (ccy, amount) = value.split_at(3);
    if !is_currency(ccy) {
        return None;
    }
    Some((ccy, Amount::parse(amount)?))
}

/// `true` for three uppercase ASCII letters.
pub fn is_currency(value: &str) -> bool {
    value.len() == 3 && value.bytes().all(|b| b.is_ascii_uppercase())
}

// ---------------------------------------------------------------------------
// Parties
// ---------------------------------------------------------------------------

/// `true` for a syntactically valid BIC8 or BIC11: four letters (bank),
/// two letters (country), two alphanumerics (location) and an optional
/// three-alphanumeric branch.
pub fn is_valid_bic(value: &str) -> bool {
    let b = value.as_bytes();
    if b.len() != 8 && b.len() != 11 {
        return false;
    }
    let upper_alnum = |c: &u8| c.is_ascii_uppercase() || c.is_ascii_digit();
    b[..6].iter().all(u8::is_ascii_uppercase) && b[6..].iter().all(upper_alnum)
}

/// Identifier code of an option A party field (`[/account]\r\nBIC`): the
/// last line of the value.
pub fn party_identifier(value: &str) -> Option<&str> {
    value.rsplit("\r\n").next().filter(|s| !s.is_empty())
}

/// Account line of an option A/D party field, without the leading `/`.
pub fn party_account(value: &str) -> Option<&str> {
    let first = value.split("\r\n").next()?;
    if value.contains("\r\n") {
        first.strip_prefix('/')
    } else {
        None
    }
}

// ---------------------------------------------------------------------------
// Code lists
// ---------------------------------------------------------------------------

/// Errors from the typed conversions in this module.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConvertError {
    #[error("invalid amount: {0:?}")]
    InvalidAmount(String),
    #[error("unknown code {code:?} for field {field}")]
    UnknownCode { field: &'static str, code: String },
}

/// Field 22A — Type of Operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OperationType {
    New,
    Amendment,
    Cancellation,
    Duplicate,
}

impl FromStr for OperationType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "NEWT" => Ok(Self::New),
            "AMND" => Ok(Self::Amendment),
            "CANC" => Ok(Self::Cancellation),
            "DUPL" => Ok(Self::Duplicate),
            _ => Err(ConvertError::UnknownCode {
                field: "22A",
                code: s.to_string(),
            }),
        }
    }
}

impl OperationType {
    pub fn code(self) -> &'static str {
        match self {
            Self::New => "NEWT",
            Self::Amendment => "AMND",
            Self::Cancellation => "CANC",
            Self::Duplicate => "DUPL",
        }
    }
}

/// Field 22B — Type of Event (loan/deposit confirmations).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventType {
    /// First confirmation.
    Confirmation,
    /// Maturity without rollover.
    Maturity,
    /// Rollover or prolongation.
    Rollover,
}

impl FromStr for EventType {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "CONF" => Ok(Self::Confirmation),
            "MATU" => Ok(Self::Maturity),
            "ROLL" => Ok(Self::Rollover),
            _ => Err(ConvertError::UnknownCode {
                field: "22B",
                code: s.to_string(),
            }),
        }
    }
}

/// Field 17R — Party A's Role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PartyRole {
    Lender,
    Borrower,
}

impl FromStr for PartyRole {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "L" => Ok(Self::Lender),
            "B" => Ok(Self::Borrower),
            _ => Err(ConvertError::UnknownCode {
                field: "17R",
                code: s.to_string(),
            }),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date6_pivot() {
        assert_eq!(parse_date6("260105"), NaiveDate::from_ymd_opt(2026, 1, 5));
        assert_eq!(parse_date6("991231"), NaiveDate::from_ymd_opt(1999, 12, 31));
        assert_eq!(parse_date6("790101"), NaiveDate::from_ymd_opt(2079, 1, 1));
        assert_eq!(parse_date6("261301"), None);
        assert_eq!(parse_date6("2601"), None);
    }

    #[test]
    fn test_date8_and_format() {
        let d = parse_date8("20260407").unwrap();
        assert_eq!(format_date8(d), "20260407");
        assert_eq!(format_date6(d), "260407");
        assert_eq!(parse_date8("2026-4-7"), None);
    }

    #[test]
    fn test_time4() {
        assert_eq!(parse_time4("1201"), NaiveTime::from_hms_opt(12, 1, 0));
        assert_eq!(parse_time4("2460"), None);
    }

    #[test]
    fn test_amount_parse() {
        let a = Amount::parse("1234,56").unwrap();
        assert_eq!(a.mantissa, 123456);
        assert_eq!(a.scale, 2);
        assert!((a.to_f64() - 1234.56).abs() < 1e-9);

        let whole = Amount::parse("1000000,").unwrap();
        assert_eq!(whole.scale, 0);
        assert_eq!(whole.mantissa, 1_000_000);
    }

    #[test]
    fn test_amount_negative_rate() {
        let r: Amount = "N0,125".parse().unwrap();
        assert!(r.is_negative());
        assert_eq!(r.to_string(), "N0,125");
    }

    #[test]
    fn test_amount_rejects_bad_input() {
        assert_eq!(Amount::parse("1234"), None);
        assert_eq!(Amount::parse(",5"), None);
        assert_eq!(Amount::parse("12.5"), None);
        assert_eq!(Amount::parse("1234567890123456,"), None);
        assert!("abc".parse::<Amount>().is_err());
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(Amount::parse("3,5").unwrap().to_string(), "3,5");
        assert_eq!(Amount::parse("8750,").unwrap().to_string(), "8750,");
        assert_eq!(Amount::parse("0,05").unwrap().to_string(), "0,05");
        let a = Amount { mantissa: 5, scale: 3 };
        assert_eq!(a.to_string(), "0,005");
    }

    #[test]
    fn test_amount_equality_ignores_trailing_zeros() {
        use std::collections::HashSet;

        let short = Amount::parse("1,5").unwrap();
        let long = Amount::parse("1,50").unwrap();
        assert_eq!(short, long);
        assert_eq!(long.normalized(), Amount { mantissa: 15, scale: 1 });
        assert_eq!(Amount::parse("100,").unwrap(), Amount::parse("100,000").unwrap());
        assert_ne!(short, Amount::parse("15,").unwrap());
        assert_eq!(long.to_string(), "1,50");

        let set: HashSet<Amount> = [short, long].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_currency_amount() {
        let (ccy, amt) = parse_currency_amount("EUR1000000,").unwrap();
        assert_eq!(ccy, "EUR");
        assert_eq!(amt.mantissa, 1_000_000);
        assert_eq!(parse_currency_amount("eur1,"), None);
        assert_eq!(parse_currency_amount("EUR"), None);
    }

    #[test]
    fn test_bic_validation() {
        assert!(is_valid_bic("BANKBEBB"));
        assert!(is_valid_bic("BANKBEBBXXX"));
        assert!(is_valid_bic("BANKDE2F123"));
        assert!(!is_valid_bic("BANK1EBB"));
        assert!(!is_valid_bic("BANKBEB"));
        assert!(!is_valid_bic("bankbebb"));
    }

    #[test]
    fn test_party_fields() {
        assert_eq!(party_identifier("BANKBEBB"), Some("BANKBEBB"));
        assert_eq!(party_identifier("/12345\r\nBANKBEBB"), Some("BANKBEBB"));
        assert_eq!(party_account("/12345\r\nBANKBEBB"), Some("12345"));
        assert_eq!(party_account("BANKBEBB"), None);
    }

    #[test]
    fn test_code_lists() {
        assert_eq!("NEWT".parse::<OperationType>(), Ok(OperationType::New));
        assert_eq!(OperationType::Cancellation.code(), "CANC");
        assert_eq!("ROLL".parse::<EventType>(), Ok(EventType::Rollover));
        assert_eq!("B".parse::<PartyRole>(), Ok(PartyRole::Borrower));
        assert_eq!(
            "X".parse::<PartyRole>(),
            Err(ConvertError::UnknownCode {
                field: "17R",
                code: "X".to_string()
            })
        );
    }
}
