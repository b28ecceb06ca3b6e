use crate::{Error, Result, Slot, Value};
use futures::{
    Stream,
    executor::{BlockingStream, block_on_stream},
};

/// Owned row values, aligned by index with the cursor columns.
pub type Row = Box<[Value]>;

/// Metadata of a result column.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnInfo {
    pub name: String,
    pub table: String,
    /// Empty value describing the column type.
    pub value: Value,
}

impl ColumnInfo {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    pub fn with_type(mut self, value: Value) -> Self {
        self.value = value.as_null();
        self
    }
}

/// A sequential, blocking source of rows for one executed query.
///
/// The column set is fixed for the lifetime of the cursor. Paging, retries and
/// transport belong to the implementation, the iterator only observes a row,
/// the end of the result or an error.
pub trait Cursor {
    /// Columns of the current result, in order.
    fn columns(&self) -> &[ColumnInfo];

    /// Estimate of the rows that can be fetched without waiting, used to size
    /// collections. It does not need to be exact.
    fn row_count_hint(&self) -> usize;

    /// Blocks until the next row is available and writes its values through
    /// `slots`, one per column. Returns `false` once the result is exhausted.
    fn fetch_into(&mut self, slots: &mut [Slot<'_>]) -> Result<bool>;

    /// Stops the iteration. Fetching after closing returns `false`.
    fn close(&mut self) -> Result<()>;

    /// Gives back any pooled resource held for the query, called once right
    /// after [`Cursor::close`].
    fn release(&mut self) {}
}

impl<C: Cursor + ?Sized> Cursor for Box<C> {
    fn columns(&self) -> &[ColumnInfo] {
        (**self).columns()
    }
    fn row_count_hint(&self) -> usize {
        (**self).row_count_hint()
    }
    fn fetch_into(&mut self, slots: &mut [Slot<'_>]) -> Result<bool> {
        (**self).fetch_into(slots)
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
    fn release(&mut self) {
        (**self).release()
    }
}

impl<C: Cursor + ?Sized> Cursor for &mut C {
    fn columns(&self) -> &[ColumnInfo] {
        (**self).columns()
    }
    fn row_count_hint(&self) -> usize {
        (**self).row_count_hint()
    }
    fn fetch_into(&mut self, slots: &mut [Slot<'_>]) -> Result<bool> {
        (**self).fetch_into(slots)
    }
    fn close(&mut self) -> Result<()> {
        (**self).close()
    }
    fn release(&mut self) {
        (**self).release()
    }
}

/// Writes `row` through `slots`, the usual body of [`Cursor::fetch_into`] for
/// cursors holding owned rows.
pub fn assign_row(slots: &mut [Slot<'_>], row: impl IntoIterator<Item = Value>) -> Result<()> {
    let mut values = row.into_iter();
    for (i, slot) in slots.iter_mut().enumerate() {
        let Some(value) = values.next() else {
            return Err(Error::msg(format!(
                "The row has {i} values but {} columns were expected",
                slots.len()
            )));
        };
        slot.assign(value)
            .map_err(|e| e.context(format!("While assigning column {i}")))?;
    }
    if values.next().is_some() {
        return Err(Error::msg(format!(
            "The row has more values than the {} columns expected",
            slots.len()
        )));
    }
    Ok(())
}

/// Blocking cursor over an asynchronous stream of rows, the shape produced
/// by asynchronous executors.
///
/// Each fetch drives the stream on the calling thread until it yields.
pub struct StreamCursor<S>
where
    S: Stream<Item = Result<Row>> + Unpin,
{
    columns: Vec<ColumnInfo>,
    rows: BlockingStream<S>,
    hint: usize,
    done: bool,
}

impl<S> StreamCursor<S>
where
    S: Stream<Item = Result<Row>> + Unpin,
{
    pub fn new(columns: Vec<ColumnInfo>, rows: S) -> Self {
        let rows = block_on_stream(rows);
        let hint = rows.size_hint().0;
        Self {
            columns,
            rows,
            hint,
            done: false,
        }
    }

    pub fn with_row_count_hint(mut self, hint: usize) -> Self {
        self.hint = hint;
        self
    }
}

impl<S> Cursor for StreamCursor<S>
where
    S: Stream<Item = Result<Row>> + Unpin,
{
    fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    fn row_count_hint(&self) -> usize {
        self.hint
    }

    fn fetch_into(&mut self, slots: &mut [Slot<'_>]) -> Result<bool> {
        if self.done {
            return Ok(false);
        }
        match self.rows.next() {
            Some(Ok(row)) => {
                assign_row(slots, row.into_vec())?;
                Ok(true)
            }
            Some(Err(e)) => {
                self.done = true;
                Err(e)
            }
            None => {
                self.done = true;
                Ok(false)
            }
        }
    }

    fn close(&mut self) -> Result<()> {
        self.done = true;
        Ok(())
    }
}
