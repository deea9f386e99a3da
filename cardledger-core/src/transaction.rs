//! Normalized transaction record and the field names used to export it

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StatementError};

/// Date format used on statements and in exported files.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// Category used when a layout has no category column or the cell is blank.
pub const UNNAMED_CATEGORY: &str = "UN-NAMED";

/// Direction of money movement on the card
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TransactionType {
    Credit,
    Debit,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Credit => "Credit",
            TransactionType::Debit => "Debit",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionType {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "Credit" => Ok(TransactionType::Credit),
            "Debit" => Ok(TransactionType::Debit),
            other => Err(StatementError::Validation(format!(
                "invalid transaction type: {other:?}, must be 'Credit' or 'Debit'"
            ))),
        }
    }
}

/// One line item from a card statement. Immutable once built.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Transaction {
    date: NaiveDate,
    name: String,
    category: String,
    amount: f64,
    #[serde(rename = "type")]
    kind: TransactionType,
    cashback: f64,
}

impl Transaction {
    /// Build a transaction. Amount and cashback must be finite and non-negative.
    pub fn new(
        date: NaiveDate,
        name: impl Into<String>,
        category: impl Into<String>,
        amount: f64,
        kind: TransactionType,
        cashback: f64,
    ) -> Result<Self> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(StatementError::Validation(format!(
                "amount must be a non-negative number, got {amount}"
            )));
        }
        if !cashback.is_finite() || cashback < 0.0 {
            return Err(StatementError::Validation(format!(
                "cashback must be a non-negative number, got {cashback}"
            )));
        }

        let category = category.into();
        let category = if category.trim().is_empty() {
            UNNAMED_CATEGORY.to_string()
        } else {
            category
        };

        Ok(Self {
            date,
            name: name.into(),
            category,
            amount,
            kind,
            cashback,
        })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn kind(&self) -> TransactionType {
        self.kind
    }

    pub fn cashback(&self) -> f64 {
        self.cashback
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionType::Credit
    }

    /// Amount signed by direction: credits positive, debits negative.
    pub fn signed_amount(&self) -> f64 {
        match self.kind {
            TransactionType::Credit => self.amount,
            TransactionType::Debit => -self.amount,
        }
    }

    /// Render a single field the way it is written to CSV.
    pub fn field(&self, field: TransactionField) -> String {
        match field {
            TransactionField::Date => self.date.format(DATE_FORMAT).to_string(),
            TransactionField::Name => self.name.clone(),
            TransactionField::Category => self.category.clone(),
            TransactionField::Amount => format_decimal(self.amount),
            TransactionField::Type => self.kind.to_string(),
            TransactionField::Cashback => format_decimal(self.cashback),
        }
    }

    /// All six fields in canonical order.
    pub fn to_row(&self) -> Vec<String> {
        TransactionField::ALL.iter().map(|f| self.field(*f)).collect()
    }

    pub fn to_field_map(&self) -> BTreeMap<TransactionField, String> {
        TransactionField::ALL
            .iter()
            .map(|f| (*f, self.field(*f)))
            .collect()
    }

    /// Rebuild a transaction from a field map written by [`Transaction::to_field_map`].
    /// A missing CASHBACK defaults to 0; every other field is required.
    pub fn from_field_map(map: &BTreeMap<TransactionField, String>) -> Result<Self> {
        let get = |field: TransactionField| {
            map.get(&field).ok_or_else(|| {
                StatementError::Validation(format!("missing field {field}"))
            })
        };

        let date_raw = get(TransactionField::Date)?;
        let date = NaiveDate::parse_from_str(date_raw, DATE_FORMAT).map_err(|e| {
            StatementError::Validation(format!("invalid date {date_raw:?}: {e}"))
        })?;
        let amount = parse_number(get(TransactionField::Amount)?, "amount")?;
        let kind: TransactionType = get(TransactionField::Type)?.parse()?;
        let cashback = match map.get(&TransactionField::Cashback) {
            Some(raw) => parse_number(raw, "cashback")?,
            None => 0.0,
        };

        Transaction::new(
            date,
            get(TransactionField::Name)?.clone(),
            get(TransactionField::Category)?.clone(),
            amount,
            kind,
            cashback,
        )
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_row().join(", "))
    }
}

/// Money values are written with two decimals, or with as many as it takes
/// to read back the same value.
pub fn format_decimal(value: f64) -> String {
    let fixed = format!("{value:.2}");
    if fixed.parse::<f64>() == Ok(value) {
        fixed
    } else {
        value.to_string()
    }
}

fn parse_number(raw: &str, what: &str) -> Result<f64> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| StatementError::Validation(format!("invalid {what} {raw:?}: {e}")))
}

/// Per-transaction columns available for export
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionField {
    Date,
    Name,
    Category,
    Amount,
    Type,
    Cashback,
}

impl TransactionField {
    /// Canonical export order.
    pub const ALL: [TransactionField; 6] = [
        TransactionField::Date,
        TransactionField::Name,
        TransactionField::Category,
        TransactionField::Amount,
        TransactionField::Type,
        TransactionField::Cashback,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            TransactionField::Date => "DATE",
            TransactionField::Name => "NAME",
            TransactionField::Category => "CATEGORY",
            TransactionField::Amount => "AMOUNT",
            TransactionField::Type => "TYPE",
            TransactionField::Cashback => "CASHBACK",
        }
    }
}

impl fmt::Display for TransactionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for TransactionField {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_uppercase();
        TransactionField::ALL
            .into_iter()
            .find(|f| f.header() == wanted)
            .ok_or_else(|| {
                StatementError::Configuration(format!("unknown transaction field: {s:?}"))
            })
    }
}

/// Card-level columns repeated on every exported row
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CardField {
    CardName,
    CardNo,
    CardType,
    BankName,
}

impl CardField {
    pub const ALL: [CardField; 4] = [
        CardField::CardName,
        CardField::CardNo,
        CardField::CardType,
        CardField::BankName,
    ];

    pub fn header(&self) -> &'static str {
        match self {
            CardField::CardName => "CARDNAME",
            CardField::CardNo => "CARDNO",
            CardField::CardType => "CARDTYPE",
            CardField::BankName => "BANKNAME",
        }
    }
}

impl fmt::Display for CardField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.header())
    }
}

impl FromStr for CardField {
    type Err = StatementError;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim().to_uppercase();
        CardField::ALL
            .into_iter()
            .find(|f| f.header() == wanted)
            .ok_or_else(|| StatementError::Configuration(format!("unknown card field: {s:?}")))
    }
}
