//! cardledger-core: transaction record, export field names, error taxonomy
//! and the text patterns shared by statement layouts.

pub mod error;
pub mod patterns;
pub mod transaction;

pub use error::{Result, StatementError};
pub use transaction::{
    CardField, DATE_FORMAT, Transaction, TransactionField, TransactionType, UNNAMED_CATEGORY,
};
