//! A parsed credit card statement: card identity plus its transactions.

use std::fmt;
use std::path::Path;

use cardledger_core::{Result, Transaction};
use tracing::info;

use crate::assembler::{TableRange, assemble};
use crate::boundary::locate_end;
use crate::document::{DocumentLoader, StatementDocument};
use crate::layouts::Layout;
use crate::metadata::{extract_identity, header_block};

pub const CARD_TYPE: &str = "Credit Card";

/// Built in one pass from a statement document; read-only afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CreditCardStatement {
    layout: Layout,
    bank_name: String,
    card_name: String,
    card_number_last4: String,
    metadata: String,
    transactions: Vec<Transaction>,
}

impl CreditCardStatement {
    /// Open `path` with `loader` and extract everything. Any failure aborts
    /// the whole statement.
    pub fn open<L: DocumentLoader>(
        loader: &L,
        path: &Path,
        password: &str,
        layout: Layout,
    ) -> Result<Self> {
        let doc = loader.open(path, password)?;
        Self::from_document(&doc, layout)
    }

    /// Extract from an open document, ending the table at the sentinel row.
    pub fn from_document<D: StatementDocument + ?Sized>(doc: &D, layout: Layout) -> Result<Self> {
        let mut statement = Self::identify(doc, layout)?;
        let end = locate_end(doc, layout.spec())?;
        statement.transactions = assemble(doc, layout, &TableRange::to_boundary(layout, end))?;
        statement.log_built();
        Ok(statement)
    }

    /// Extract from an open document over an explicit page/row range.
    pub fn from_document_with_range<D: StatementDocument + ?Sized>(
        doc: &D,
        layout: Layout,
        range: &TableRange,
    ) -> Result<Self> {
        let mut statement = Self::identify(doc, layout)?;
        statement.transactions = assemble(doc, layout, range)?;
        statement.log_built();
        Ok(statement)
    }

    fn identify<D: StatementDocument + ?Sized>(doc: &D, layout: Layout) -> Result<Self> {
        let spec = layout.spec();
        let raw_text = doc.full_text()?;
        let metadata = header_block(&raw_text, spec)?.to_string();
        let identity = extract_identity(&metadata, spec)?;

        Ok(Self {
            layout,
            bank_name: spec.bank_name.to_string(),
            card_name: identity.card_name,
            card_number_last4: identity.card_number_last4,
            metadata,
            transactions: Vec::new(),
        })
    }

    fn log_built(&self) {
        info!(
            bank = %self.bank_name,
            card = %self,
            transactions = self.transactions.len(),
            "statement parsed"
        );
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn bank_name(&self) -> &str {
        &self.bank_name
    }

    pub fn card_name(&self) -> &str {
        &self.card_name
    }

    pub fn card_number_last4(&self) -> &str {
        &self.card_number_last4
    }

    pub fn card_type(&self) -> &'static str {
        CARD_TYPE
    }

    /// Header text preceding the layout's section marker.
    pub fn metadata(&self) -> &str {
        &self.metadata
    }

    pub fn transactions(&self) -> &[Transaction] {
        &self.transactions
    }

    /// Sum of credits and sum of debits.
    pub fn totals(&self) -> (f64, f64) {
        self.transactions
            .iter()
            .fold((0.0, 0.0), |(credits, debits), t| {
                if t.is_credit() {
                    (credits + t.amount(), debits)
                } else {
                    (credits, debits + t.amount())
                }
            })
    }
}

impl fmt::Display for CreditCardStatement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} - {}", self.card_name, self.card_number_last4)
    }
}
