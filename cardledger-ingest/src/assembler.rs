//! Walks a page/row range of the statement and cleans each row into a
//! transaction.

use cardledger_core::{Result, StatementError, Transaction};
use tracing::debug;

use crate::boundary::Boundary;
use crate::document::StatementDocument;
use crate::layouts::Layout;

/// Page/row range holding the transaction table.
///
/// `start_page` is 1-indexed. A positive `end_page` is also 1-indexed (the
/// last page read); a negative one counts from the end, `-1` being the last
/// page. Rows slice like ranges: `start_row` inclusive on the first page,
/// `end_row` exclusive on the last page, negatives counting from the end and
/// `None` meaning the whole table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableRange {
    pub start_page: isize,
    pub start_row: isize,
    pub end_page: Option<isize>,
    pub end_row: Option<isize>,
}

impl TableRange {
    /// Range from the layout's fixed start to a located end boundary.
    pub fn to_boundary(layout: Layout, end: Boundary) -> Self {
        let spec = layout.spec();
        Self {
            start_page: spec.start_page,
            start_row: spec.start_row,
            end_page: Some(end.page),
            end_row: Some(end.row),
        }
    }

    /// 0-indexed first and last pages to read.
    fn resolve_pages(&self, total_pages: usize) -> Result<(usize, usize)> {
        if self.start_page < 1 {
            return Err(StatementError::Configuration(format!(
                "start page must be 1 or greater, got {}",
                self.start_page
            )));
        }
        let end_page = self.end_page.ok_or_else(|| {
            StatementError::Configuration("end page must be set".to_string())
        })?;

        let total = total_pages as isize;
        let first = self.start_page - 1;
        let last = match end_page {
            0 => {
                return Err(StatementError::Configuration(
                    "end page 0 is not a page".to_string(),
                ));
            }
            p if p > 0 => p - 1,
            p => total + p,
        };

        if first >= total || last < 0 || last >= total {
            return Err(StatementError::Configuration(format!(
                "pages {}..{} out of range for a {}-page statement",
                self.start_page, end_page, total_pages
            )));
        }
        if last < first {
            return Err(StatementError::Configuration(format!(
                "end page {end_page} comes before start page {}",
                self.start_page
            )));
        }
        Ok((first as usize, last as usize))
    }
}

/// Clamp a possibly negative index into `0..=len`, counting negatives from the end.
fn resolve_row(index: isize, len: usize) -> usize {
    let len = len as isize;
    let i = if index < 0 { len + index } else { index };
    i.clamp(0, len) as usize
}

/// Collect transactions in page order, then row order within a page.
pub fn assemble<D: StatementDocument + ?Sized>(
    doc: &D,
    layout: Layout,
    range: &TableRange,
) -> Result<Vec<Transaction>> {
    let (first, last) = range.resolve_pages(doc.page_count())?;
    let mut transactions = Vec::new();

    for page_index in first..=last {
        let table = doc.page_table(page_index)?;
        let start = if page_index == first {
            resolve_row(range.start_row, table.len())
        } else {
            0
        };
        let stop = match range.end_row {
            Some(end_row) if page_index == last => resolve_row(end_row, table.len()),
            _ => table.len(),
        };
        debug!(page = page_index, start, stop, rows = table.len(), "assembling page");
        if start >= stop {
            continue;
        }

        for (row_index, row) in table.iter().enumerate().take(stop).skip(start) {
            let cleaned = layout
                .clean_row(row)
                .map_err(|e| parse_error(layout, page_index, row_index, e))?;
            match cleaned {
                Some(cleaned) => {
                    let txn = cleaned
                        .into_transaction()
                        .map_err(|e| parse_error(layout, page_index, row_index, e))?;
                    transactions.push(txn);
                }
                None => debug!(page = page_index, row = row_index, "skipped non-data row"),
            }
        }
    }

    Ok(transactions)
}

fn parse_error(
    layout: Layout,
    page: usize,
    row: usize,
    err: impl std::fmt::Display,
) -> StatementError {
    StatementError::Parse {
        bank: layout.bank_name().to_string(),
        page,
        row,
        message: err.to_string(),
    }
}
