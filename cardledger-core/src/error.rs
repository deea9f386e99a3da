//! Error taxonomy for statement extraction.
//!
//! Every variant is fatal for the statement being processed. The only
//! tolerated failure (an unparsable cashback cell) never surfaces here.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StatementError {
    /// Invalid page/row bounds handed to the assembler, or an unknown
    /// field/layout name.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// A date or mandatory amount cell did not match the expected pattern.
    #[error("parse error ({bank}, page {page}, row {row}): {message}")]
    Parse {
        bank: String,
        page: usize,
        row: usize,
        message: String,
    },

    /// Card identity could not be derived from the header block.
    #[error("parse error ({bank}): {message}")]
    Identity { bank: String, message: String },

    /// A header marker or end-of-statement sentinel was not found.
    #[error("locator error ({bank}): {message}")]
    Locator { bank: String, message: String },

    /// A transaction was built from values outside its domain.
    #[error("validation error: {0}")]
    Validation(String),

    /// The PDF-access collaborator failed to open or read the document.
    #[error("document error: {0}")]
    Document(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl StatementError {
    pub fn locator(bank: impl Into<String>, message: impl Into<String>) -> Self {
        StatementError::Locator {
            bank: bank.into(),
            message: message.into(),
        }
    }

    pub fn identity(bank: impl Into<String>, message: impl Into<String>) -> Self {
        StatementError::Identity {
            bank: bank.into(),
            message: message.into(),
        }
    }

    /// True for the date/amount/identity parse failures.
    pub fn is_parse(&self) -> bool {
        matches!(
            self,
            StatementError::Parse { .. } | StatementError::Identity { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, StatementError>;
