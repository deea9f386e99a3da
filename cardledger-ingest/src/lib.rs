//! cardledger-ingest: reads credit card statements into transactions.
//!
//! Pipeline: header block and card identity, end-of-table boundary, then
//! row-by-row cleaning with the bank's layout.

pub mod assembler;
pub mod boundary;
pub mod document;
pub mod layouts;
pub mod metadata;
pub mod statement;

pub use assembler::{TableRange, assemble};
pub use boundary::{Boundary, locate_end};
pub use document::{
    DocumentLoader, ExtractedDocument, ExtractedDumpLoader, ExtractedPage, RawRow,
    StatementDocument,
};
pub use layouts::{Layout, LayoutSpec};
pub use statement::{CARD_TYPE, CreditCardStatement};
