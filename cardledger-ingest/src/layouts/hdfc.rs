//! HDFC Bank credit card statement layout
//!
//! No category column; the header carries the card number after a label:
//!   Card No: 4321 56XX XXXX 7890
//!
//! Expected table rows after extraction:
//!   Date         Transaction Description          Amount (in Rs.)   Reward Points
//!   05/04/2024   SWIGGY BANGALORE                 320.00            6
//!   12/04/2024   NETBANKING TRANSFER (Ref# 991)   5,000.00 Cr

use crate::document::RawRow;

use super::{
    CardNumberSource, CleanedRow, END_OF_STATEMENT, LayoutSpec, NoMarkerPolicy, RowError, cell,
    collapse, is_skip_row, parse_amount, parse_cashback, parse_date, resolve_kind,
};
use cardledger_core::{TransactionType, UNNAMED_CATEGORY};

pub const SPEC: LayoutSpec = LayoutSpec {
    bank_name: "HDFC BANK",
    header_marker: "Account Summary",
    card_name_line: 1,
    card_number: CardNumberSource::Labeled {
        label: "Card No: ",
        width: 19,
    },
    start_page: 1,
    start_row: 3,
    fixed_end_page: -1,
    fixed_end_row: None,
    sentinel: END_OF_STATEMENT,
    category_column: None,
    amount_column: 2,
    cashback_column: Some(3),
    // Debits are printed without a marker
    no_marker: NoMarkerPolicy::Assume(TransactionType::Debit),
};

pub fn clean_row(row: &RawRow) -> Result<Option<CleanedRow>, RowError> {
    let cells = collapse(row);
    if is_skip_row(&cells) {
        return Ok(None);
    }

    let date = parse_date(cells[0])?;
    let name = cell(&cells, 1)?.to_string();

    let amount_cell = cell(&cells, SPEC.amount_column)?;
    let amount = parse_amount(amount_cell)?;
    let kind = resolve_kind(amount_cell, SPEC.no_marker)?;
    let cashback = parse_cashback(&cells, SPEC.cashback_column);

    Ok(Some(CleanedRow {
        date,
        name,
        category: UNNAMED_CATEGORY.to_string(),
        amount,
        kind,
        cashback,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::row;
    use chrono::NaiveDate;

    #[test]
    fn test_unmarked_amount_is_debit() {
        let r = row(&[
            Some("05/04/2024"),
            None,
            Some("SWIGGY BANGALORE"),
            Some("320.00"),
            Some("6"),
        ]);
        let cleaned = clean_row(&r).unwrap().unwrap();
        assert_eq!(cleaned.date, NaiveDate::from_ymd_opt(2024, 4, 5).unwrap());
        assert_eq!(cleaned.name, "SWIGGY BANGALORE");
        assert_eq!(cleaned.category, "UN-NAMED");
        assert_eq!(cleaned.amount, 320.0);
        assert_eq!(cleaned.kind, TransactionType::Debit);
        assert_eq!(cleaned.cashback, 6.0);
    }

    #[test]
    fn test_credit_marker() {
        let r = row(&[
            Some("12/04/2024"),
            Some("NETBANKING TRANSFER (Ref# 991)"),
            Some("5,000.00 Cr"),
        ]);
        let cleaned = clean_row(&r).unwrap().unwrap();
        assert_eq!(cleaned.kind, TransactionType::Credit);
        assert_eq!(cleaned.amount, 5000.0);
        assert_eq!(cleaned.cashback, 0.0);
    }

    #[test]
    fn test_explicit_debit_marker() {
        let r = row(&[Some("13/04/2024"), Some("FUEL"), Some("1,00,000.00 Dr")]);
        let cleaned = clean_row(&r).unwrap().unwrap();
        assert_eq!(cleaned.kind, TransactionType::Debit);
        assert_eq!(cleaned.amount, 100000.0);
    }

    #[test]
    fn test_bad_date_is_error() {
        let r = row(&[Some("April 5"), Some("X"), Some("1.00")]);
        assert!(matches!(clean_row(&r).unwrap_err(), RowError::Date(_)));
    }
}
