//! Locating the end of the transaction table.
//!
//! The table ends at a sentinel row near the end of the statement. Pages are
//! scanned backwards from the second-to-last page (the last page holds no
//! transactions), and rows within each page are scanned backwards too.

use cardledger_core::{Result, StatementError};
use tracing::debug;

use crate::document::{RawRow, StatementDocument};
use crate::layouts::LayoutSpec;

/// End of the transaction table.
///
/// `page` is the 1-indexed page holding the sentinel (so it is also an
/// exclusive bound on 0-indexed pages) and `row` is the sentinel's row index,
/// an exclusive bound on that page's rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Boundary {
    pub page: isize,
    pub row: isize,
}

/// Space-joined non-absent cells of a row.
pub fn row_line(row: &RawRow) -> String {
    row.iter()
        .filter_map(|c| c.as_deref())
        .filter(|c| !c.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn locate_end<D: StatementDocument + ?Sized>(doc: &D, spec: &LayoutSpec) -> Result<Boundary> {
    let total_pages = doc.page_count();

    for page_offset in 0..total_pages.saturating_sub(1) {
        let page_index = total_pages - 2 - page_offset;
        let table = doc.page_table(page_index)?;
        debug!(page = page_index, rows = table.len(), "scanning for end of statement");

        for (row_offset, row) in table.iter().rev().enumerate() {
            if row_line(row).contains(spec.sentinel) {
                let boundary = Boundary {
                    page: (total_pages - page_offset - 1) as isize,
                    row: (table.len() - row_offset - 1) as isize,
                };
                debug!(?boundary, "end of statement found");
                return Ok(boundary);
            }
        }
    }

    Err(StatementError::locator(
        spec.bank_name,
        format!(
            "sentinel {:?} not found in {} pages; statement layout may have changed",
            spec.sentinel, total_pages
        ),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::fixtures::{page, row};
    use crate::document::ExtractedDocument;
    use crate::layouts::{axis, END_OF_STATEMENT};

    fn filler() -> RawRow {
        row(&[Some("05/04/2024"), Some("SHOP"), Some("1.00 Dr")])
    }

    fn sentinel_row() -> RawRow {
        row(&[None, Some(END_OF_STATEMENT), None])
    }

    #[test]
    fn test_row_line_skips_absent_cells() {
        assert_eq!(row_line(&row(&[Some("a"), None, Some("b")])), "a b");
    }

    #[test]
    fn test_sentinel_on_earlier_page() {
        // 3 pages; scanned page 1 then page 0. The sentinel sits at scan
        // offset 1 (page 0) and reverse row offset 2 of a 4-row table.
        let doc = ExtractedDocument::new(vec![
            page("p0", vec![filler(), sentinel_row(), filler(), filler()]),
            page("p1", vec![filler(), filler()]),
            page("p2", vec![]),
        ]);
        let boundary = locate_end(&doc, &axis::SPEC).unwrap();
        assert_eq!(boundary, Boundary { page: 3 - 1 - 1, row: 4 - 2 - 1 });
    }

    #[test]
    fn test_last_match_in_scan_order_wins() {
        let doc = ExtractedDocument::new(vec![
            page("p0", vec![sentinel_row()]),
            page("p1", vec![filler(), sentinel_row(), filler()]),
            page("p2", vec![sentinel_row()]),
        ]);
        // page 2 is never scanned; page 1 is scanned first
        assert_eq!(
            locate_end(&doc, &axis::SPEC).unwrap(),
            Boundary { page: 2, row: 1 }
        );
    }

    #[test]
    fn test_missing_sentinel_is_locator_error() {
        let doc = ExtractedDocument::new(vec![
            page("p0", vec![filler()]),
            page("p1", vec![filler()]),
        ]);
        let err = locate_end(&doc, &axis::SPEC).unwrap_err();
        assert!(matches!(err, StatementError::Locator { .. }));
    }

    #[test]
    fn test_single_page_document_is_locator_error() {
        let doc = ExtractedDocument::new(vec![page("p0", vec![sentinel_row()])]);
        assert!(matches!(
            locate_end(&doc, &axis::SPEC).unwrap_err(),
            StatementError::Locator { .. }
        ));
    }
}
