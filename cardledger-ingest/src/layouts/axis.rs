//! Axis Bank credit card statement layout
//!
//! Expected table rows after extraction (padding cells collapsed):
//!   DATE         TRANSACTION DETAILS     MERCHANT CATEGORY   AMOUNT (Rs.)   CASHBACK EARNED
//!   05/04/2024   STARBUCKS               DINING              450.00 Dr
//!   09/04/2024   PAYMENT RECEIVED                            12,000.00 Cr

use crate::document::RawRow;

use super::{
    CardNumberSource, CleanedRow, END_OF_STATEMENT, LayoutSpec, NoMarkerPolicy, RowError, cell,
    collapse, is_skip_row, parse_amount, parse_cashback, parse_date, resolve_kind,
};
use cardledger_core::UNNAMED_CATEGORY;

pub const SPEC: LayoutSpec = LayoutSpec {
    bank_name: "AXIS BANK",
    header_marker: "Account Summary",
    card_name_line: 0,
    card_number: CardNumberSource::Pattern,
    start_page: 1,
    start_row: 3,
    fixed_end_page: -1,
    fixed_end_row: Some(-1),
    sentinel: END_OF_STATEMENT,
    category_column: Some(2),
    amount_column: 3,
    cashback_column: Some(4),
    no_marker: NoMarkerPolicy::Reject,
};

pub fn clean_row(row: &RawRow) -> Result<Option<CleanedRow>, RowError> {
    let cells = collapse(row);
    if is_skip_row(&cells) {
        return Ok(None);
    }

    let date = parse_date(cells[0])?;
    let name = cell(&cells, 1)?.to_string();

    // Collapsing drops absent cells, so only an empty-string category keeps its slot.
    let category = match SPEC.category_column {
        Some(i) => cell(&cells, i)?.trim().to_string(),
        None => String::new(),
    };
    let category = if category.is_empty() {
        UNNAMED_CATEGORY.to_string()
    } else {
        category
    };

    let amount_cell = cell(&cells, SPEC.amount_column)?;
    let amount = parse_amount(amount_cell)?;
    let kind = resolve_kind(amount_cell, SPEC.no_marker)?;
    let cashback = parse_cashback(&cells, SPEC.cashback_column);

    Ok(Some(CleanedRow {
        date,
        name,
        category,
        amount,
        kind,
        cashback,
    }))
}
