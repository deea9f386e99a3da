//! Header block extraction and card identity (name, last four digits).

use cardledger_core::patterns::{find_card_number, last_four};
use cardledger_core::{Result, StatementError};

use crate::layouts::{CardNumberSource, LayoutSpec};

/// Words printed after the card name that are not part of it.
const CARD_NAME_SUFFIXES: &[&str] = &["Statement"];

/// Card display name and last four digits
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardIdentity {
    pub card_name: String,
    pub card_number_last4: String,
}

/// Text preceding the layout's header marker.
pub fn header_block<'a>(text: &'a str, spec: &LayoutSpec) -> Result<&'a str> {
    let end = text.find(spec.header_marker).ok_or_else(|| {
        StatementError::locator(
            spec.bank_name,
            format!("header marker {:?} not found", spec.header_marker),
        )
    })?;
    Ok(&text[..end])
}

pub fn card_name(header: &str, spec: &LayoutSpec) -> Result<String> {
    let line = header.lines().nth(spec.card_name_line).ok_or_else(|| {
        StatementError::identity(
            spec.bank_name,
            format!("header has no line {} for the card name", spec.card_name_line),
        )
    })?;

    let name = CARD_NAME_SUFFIXES
        .iter()
        .fold(line.to_string(), |acc, suffix| acc.replace(suffix, ""));
    Ok(name.trim().to_string())
}

pub fn card_number_last4(header: &str, spec: &LayoutSpec) -> Result<String> {
    let digits = match spec.card_number {
        CardNumberSource::Pattern => {
            let number = find_card_number(header).ok_or_else(|| {
                StatementError::identity(spec.bank_name, "no card number in header")
            })?;
            last_four(number)
        }
        CardNumberSource::Labeled { label, width } => {
            let start = header.find(label).ok_or_else(|| {
                StatementError::identity(spec.bank_name, format!("label {label:?} not in header"))
            })?;
            let value: String = header[start + label.len()..].chars().take(width).collect();
            last_four(value.trim_end())
        }
    };

    if digits.chars().count() != 4 {
        return Err(StatementError::identity(
            spec.bank_name,
            format!("card number ends in {digits:?}, expected four characters"),
        ));
    }
    Ok(digits)
}

pub fn extract_identity(header: &str, spec: &LayoutSpec) -> Result<CardIdentity> {
    Ok(CardIdentity {
        card_name: card_name(header, spec)?,
        card_number_last4: card_number_last4(header, spec)?,
    })
}
