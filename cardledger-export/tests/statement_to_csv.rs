use cardledger_core::{CardField, StatementError, TransactionField, TransactionType};
use cardledger_export::CsvExporter;
use cardledger_ingest::{CreditCardStatement, ExtractedDumpLoader, Layout};
use chrono::NaiveDate;
use std::path::PathBuf;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .unwrap()
        .join("fixtures")
        .join(name)
}

fn open(name: &str, layout: Layout) -> CreditCardStatement {
    CreditCardStatement::open(&ExtractedDumpLoader, &fixture(name), "ABCD0100", layout)
        .expect("fixture should parse")
}

fn assert_close(actual: f64, expected: f64) {
    assert!((actual - expected).abs() < 1e-6, "{actual} != {expected}");
}

/// Real-layout regression: Axis statement spanning three pages of transactions.
#[test]
fn test_axis_fixture() {
    let statement = open("axis_statement.json", Layout::Axis);

    assert_eq!(statement.card_name(), "Flipkart Axis Bank Credit Card");
    assert_eq!(statement.card_number_last4(), "1234");
    assert_eq!(statement.bank_name(), "AXIS BANK");

    let txns = statement.transactions();
    assert_eq!(txns.len(), 7);

    let first = &txns[0];
    assert_eq!(first.date(), NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
    assert_eq!(first.name(), "SWIGGY INSTAMART");
    assert_eq!(first.category(), "GROCERY");
    assert_eq!(first.amount(), 1240.0);
    assert_eq!(first.kind(), TransactionType::Debit);
    assert_close(first.cashback(), 18.6);

    // padded row collapses onto the right columns
    assert_eq!(txns[1].name(), "MYNTRA DESIGNS");
    assert_eq!(txns[1].category(), "APPAREL");

    let payment = txns.iter().find(|t| t.name().contains("BBPS")).unwrap();
    assert_eq!(payment.kind(), TransactionType::Credit);
    assert_eq!(payment.category(), "UN-NAMED");

    let fuel = txns.iter().find(|t| t.name().contains("INDIAN OIL")).unwrap();
    assert_eq!(fuel.cashback(), 0.0);

    let big = txns.iter().find(|t| t.name().contains("AMAZON PAY")).unwrap();
    assert_eq!(big.amount(), 112000.0);

    // the row after the sentinel never makes it in
    assert_eq!(txns.last().unwrap().name(), "REFUND AMAZON");

    let (credits, debits) = statement.totals();
    assert_close(credits, 10981.25);
    assert_close(debits, 119339.75);
}

/// Real-layout regression: HDFC prints debits without a marker.
#[test]
fn test_hdfc_fixture() {
    let statement = open("hdfc_statement.json", Layout::Hdfc);

    assert_eq!(statement.card_name(), "Regalia Gold Credit Card");
    assert_eq!(statement.card_number_last4(), "7890");

    let txns = statement.transactions();
    assert_eq!(txns.len(), 4);
    assert!(txns.iter().all(|t| t.category() == "UN-NAMED"));
    assert_eq!(
        txns.iter().filter(|t| t.kind() == TransactionType::Credit).count(),
        1
    );
    assert_eq!(txns[0].cashback(), 12.0);
    assert_eq!(txns[1].name(), "IRCTC RAIL BOOKING");
    assert_eq!(txns[3].name(), "APOLLO PHARMACY");
}

#[test]
fn test_wrong_layout_fails_whole_statement() {
    // HDFC rows have no category column, so Axis reads reward points as an unmarked amount
    let err = CreditCardStatement::open(
        &ExtractedDumpLoader,
        &fixture("hdfc_statement.json"),
        "",
        Layout::Axis,
    )
    .unwrap_err();
    assert!(matches!(err, StatementError::Parse { .. } | StatementError::Identity { .. }));
}

#[test]
fn test_fixture_to_csv_file() {
    let statement = open("axis_statement.json", Layout::Axis);
    let dir = tempfile::tempdir().unwrap();

    let written = CsvExporter::new()
        .with_transaction_fields([TransactionField::Date, TransactionField::Amount, TransactionField::Type])
        .with_card_fields([CardField::CardNo, CardField::BankName])
        .export(&statement, Some(dir.path().join("axis-april").as_path()))
        .unwrap();

    let content = std::fs::read_to_string(&written).unwrap();
    let lines: Vec<&str> = content.lines().collect();
    assert_eq!(lines.len(), 8);
    assert_eq!(lines[0], "DATE,AMOUNT,TYPE,CARDNO,BANKNAME");
    assert_eq!(lines[1], "18/03/2024,1240.00,Debit,1234,AXIS BANK");
    assert_eq!(lines[7], "14/04/2024,981.25,Credit,1234,AXIS BANK");
    assert!(lines[1..].iter().all(|l| l.ends_with(",1234,AXIS BANK")));
}
