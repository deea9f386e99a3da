//! PDF-access seam: what the extraction pipeline needs from a decoded statement.
//!
//! Decoding and decrypting the PDF is someone else's job. A document only has
//! to hand out page text and the table found on each page.

use std::fs;
use std::path::Path;

use cardledger_core::{Result, StatementError};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// One extracted table row. `None` cells are extraction padding.
pub type RawRow = Vec<Option<String>>;

/// An opened statement, exclusively owned by the statement being built.
pub trait StatementDocument {
    fn page_count(&self) -> usize;

    fn page_text(&self, index: usize) -> Result<String>;

    /// Table rows of page `index`, re-extracted on each call.
    fn page_table(&self, index: usize) -> Result<Vec<RawRow>>;

    /// All page texts joined by newlines.
    fn full_text(&self) -> Result<String> {
        let texts = (0..self.page_count())
            .map(|i| self.page_text(i))
            .collect::<Result<Vec<_>>>()?;
        Ok(texts.join("\n"))
    }
}

/// Opens a statement file, decrypting it with `password` when required.
pub trait DocumentLoader {
    type Document: StatementDocument;

    fn open(&self, path: &Path, password: &str) -> Result<Self::Document>;
}

/// A page as produced by an external PDF extractor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedPage {
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub table: Vec<RawRow>,
}

/// In-memory statement made of already-extracted pages
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedDocument {
    pub pages: Vec<ExtractedPage>,
}

impl ExtractedDocument {
    pub fn new(pages: Vec<ExtractedPage>) -> Self {
        Self { pages }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    fn page(&self, index: usize) -> Result<&ExtractedPage> {
        self.pages.get(index).ok_or_else(|| {
            StatementError::Document(format!(
                "page {index} out of range ({} pages)",
                self.pages.len()
            ))
        })
    }
}

impl StatementDocument for ExtractedDocument {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&self, index: usize) -> Result<String> {
        Ok(self.page(index)?.text.clone())
    }

    fn page_table(&self, index: usize) -> Result<Vec<RawRow>> {
        Ok(self.page(index)?.table.clone())
    }
}

/// Loads JSON dumps of extracted statements (`{"pages": [{"text", "table"}]}`).
///
/// Dumps are plaintext, so the password is accepted and not used.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExtractedDumpLoader;

impl DocumentLoader for ExtractedDumpLoader {
    type Document = ExtractedDocument;

    fn open(&self, path: &Path, password: &str) -> Result<ExtractedDocument> {
        let json = fs::read_to_string(path).map_err(|e| {
            StatementError::Document(format!("cannot read {}: {e}", path.display()))
        })?;
        let doc = ExtractedDocument::from_json(&json)?;
        debug!(
            path = %path.display(),
            pages = doc.page_count(),
            password_supplied = !password.is_empty(),
            "opened extracted statement"
        );
        Ok(doc)
    }
}
