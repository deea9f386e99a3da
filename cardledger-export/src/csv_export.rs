//! Write a statement's transactions to CSV.
//!
//! Output columns are the selected transaction fields followed by the
//! selected card fields. Card values repeat on every row so each line stands
//! alone in a spreadsheet:
//!   DATE,NAME,CATEGORY,AMOUNT,TYPE,CASHBACK,BANKNAME
//!   05/04/2024,STARBUCKS,DINING,450.00,Debit,0.00,AXIS BANK

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use cardledger_core::{CardField, Result, TransactionField};
use cardledger_ingest::CreditCardStatement;
use tracing::info;

/// Column selection for a CSV export
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvExporter {
    transaction_fields: Vec<TransactionField>,
    card_fields: Vec<CardField>,
}

impl Default for CsvExporter {
    fn default() -> Self {
        Self::new()
    }
}

impl CsvExporter {
    /// All six transaction fields in canonical order, no card fields.
    pub fn new() -> Self {
        Self {
            transaction_fields: TransactionField::ALL.to_vec(),
            card_fields: Vec::new(),
        }
    }

    /// An empty selection falls back to all six fields.
    pub fn with_transaction_fields(
        mut self,
        fields: impl IntoIterator<Item = TransactionField>,
    ) -> Self {
        let fields: Vec<_> = fields.into_iter().collect();
        self.transaction_fields = if fields.is_empty() {
            TransactionField::ALL.to_vec()
        } else {
            fields
        };
        self
    }

    pub fn with_card_fields(mut self, fields: impl IntoIterator<Item = CardField>) -> Self {
        self.card_fields = fields.into_iter().collect();
        self
    }

    pub fn transaction_fields(&self) -> &[TransactionField] {
        &self.transaction_fields
    }

    pub fn card_fields(&self) -> &[CardField] {
        &self.card_fields
    }

    pub fn header(&self) -> Vec<&'static str> {
        self.transaction_fields
            .iter()
            .map(|f| f.header())
            .chain(self.card_fields.iter().map(|f| f.header()))
            .collect()
    }

    /// Write header and rows to `writer`.
    pub fn write<W: Write>(&self, statement: &CreditCardStatement, writer: W) -> Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.header())?;

        let card_values: Vec<String> = self
            .card_fields
            .iter()
            .map(|f| card_value(statement, *f))
            .collect();

        for txn in statement.transactions() {
            let record = self
                .transaction_fields
                .iter()
                .map(|f| txn.field(*f))
                .chain(card_values.iter().cloned());
            wtr.write_record(record)?;
        }

        wtr.flush()?;
        Ok(())
    }

    /// Write to `path`, or to the default filename in the current directory.
    /// Returns the path written.
    pub fn export(&self, statement: &CreditCardStatement, path: Option<&Path>) -> Result<PathBuf> {
        let path = match path {
            Some(p) => with_csv_extension(p),
            None => PathBuf::from(default_filename(statement)),
        };

        let file = File::create(&path)?;
        self.write(statement, file)?;
        info!(
            path = %path.display(),
            rows = statement.transactions().len(),
            "wrote CSV"
        );
        Ok(path)
    }
}

/// `"{card name}-{last four}.csv"`, path separators in the card name
/// replaced with `-`.
pub fn default_filename(statement: &CreditCardStatement) -> String {
    let card_name: String = statement
        .card_name()
        .chars()
        .map(|c| if matches!(c, '/' | '\\') { '-' } else { c })
        .collect();
    format!("{}-{}.csv", card_name, statement.card_number_last4())
}

/// Append `.csv` unless the name already ends with it (any case).
pub fn with_csv_extension(path: &Path) -> PathBuf {
    let has_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    if has_csv {
        return path.to_path_buf();
    }
    let mut name = path.as_os_str().to_os_string();
    name.push(".csv");
    PathBuf::from(name)
}

fn card_value(statement: &CreditCardStatement, field: CardField) -> String {
    match field {
        CardField::CardName => statement.card_name().to_string(),
        CardField::CardNo => statement.card_number_last4().to_string(),
        CardField::CardType => statement.card_type().to_string(),
        CardField::BankName => statement.bank_name().to_string(),
    }
}
