use scanx_core::{ColumnInfo, Cursor, Error, Result, Row, Slot, assign_row};
use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

/// Counters shared between a [`MemoryCursor`] and whoever created it.
#[derive(Debug, Clone, Default)]
pub struct CursorStats(Arc<Counters>);

#[derive(Debug, Default)]
struct Counters {
    fetched: AtomicUsize,
    pages: AtomicUsize,
    closed: AtomicUsize,
    released: AtomicUsize,
}

impl CursorStats {
    /// Rows handed out.
    pub fn fetched(&self) -> usize {
        self.0.fetched.load(Ordering::Relaxed)
    }
    /// Pages loaded.
    pub fn pages(&self) -> usize {
        self.0.pages.load(Ordering::Relaxed)
    }
    /// Calls to [`Cursor::close`].
    pub fn closed(&self) -> usize {
        self.0.closed.load(Ordering::Relaxed)
    }
    /// Calls to [`Cursor::release`].
    pub fn released(&self) -> usize {
        self.0.released.load(Ordering::Relaxed)
    }
}

/// Cursor over rows held in memory, delivered in pages.
///
/// The row count hint is the size of the current page, like a driver that
/// only knows how many rows it received so far.
#[derive(Debug)]
pub struct MemoryCursor {
    columns: Vec<ColumnInfo>,
    rows: VecDeque<Row>,
    page_size: usize,
    page_len: usize,
    page_left: usize,
    fetched: usize,
    fail_at: Option<usize>,
    close_error: Option<String>,
    closed: bool,
    stats: CursorStats,
}

impl MemoryCursor {
    pub fn new(columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self {
        Self {
            columns,
            rows: rows.into(),
            page_size: 5000,
            page_len: 0,
            page_left: 0,
            fetched: 0,
            fail_at: None,
            close_error: None,
            closed: false,
            stats: Default::default(),
        }
    }

    /// Rows delivered per page, at least one.
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Fetching the row with index `row` fails instead of returning it.
    pub fn with_failure_at(mut self, row: usize) -> Self {
        self.fail_at = Some(row);
        self
    }

    /// Closing the cursor fails with `message`.
    pub fn with_close_error(mut self, message: impl Into<String>) -> Self {
        self.close_error = Some(message.into());
        self
    }

    pub fn stats(&self) -> CursorStats {
        self.stats.clone()
    }

    fn load_page(&mut self) -> bool {
        if self.rows.is_empty() {
            return false;
        }
        self.page_len = self.page_size.min(self.rows.len());
        self.page_left = self.page_len;
        let page = self.stats.0.pages.fetch_add(1, Ordering::Relaxed) + 1;
        log::debug!("Loaded page {} with {} rows", page, self.page_len);
        true
    }
}

impl Cursor for MemoryCursor {
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn row_count_hint(&self) -> usize {
        if self.page_len == 0 {
            self.page_size.min(self.rows.len())
        } else {
            self.page_len
        }
    }

    fn fetch_into(&mut self, slots: &mut [Slot<'_>]) -> Result<bool> {
        if self.closed {
            return Ok(false);
        }
        if self.fail_at == Some(self.fetched) {
            return Err(Error::msg(format!(
                "Failure while fetching row {}",
                self.fetched
            )));
        }
        if self.page_left == 0 && !self.load_page() {
            return Ok(false);
        }
        let Some(row) = self.rows.pop_front() else {
            return Ok(false);
        };
        self.page_left -= 1;
        self.fetched += 1;
        self.stats.0.fetched.fetch_add(1, Ordering::Relaxed);
        assign_row(slots, row.into_vec())?;
        Ok(true)
    }

    fn close(&mut self) -> Result<()> {
        self.closed = true;
        self.stats.0.closed.fetch_add(1, Ordering::Relaxed);
        match self.close_error.take() {
            Some(message) => Err(Error::msg(message)),
            None => Ok(()),
        }
    }

    fn release(&mut self) {
        self.stats.0.released.fetch_add(1, Ordering::Relaxed);
    }
}
