use crate::{
    Cursor, DEFAULT_MAPPER, Destination, Element, Error, Kind, Mapper, Result, ScanError, Slot,
    Traversals, ValueBuffer, classify_forced,
};
use std::{any, marker::PhantomData, mem, sync::Arc};

/// Cached work of a struct scanning session.
struct Session {
    traversals: Traversals,
    buffer: ValueBuffer,
}

enum State {
    Fresh,
    /// The session holds the traversals once a record was scanned.
    Iterating(Option<Session>),
    Failed(Error),
    Closed,
}

/// Scans the rows of a [`Cursor`] into destination values.
///
/// Single rows are fetched with [`RowIter::get`], whole results with
/// [`RowIter::select`]. For results too large to be collected, records can be
/// scanned one at a time with [`RowIter::struct_scan`] or [`RowIter::records`]
/// and the error checked at the end with [`RowIter::err`].
///
/// The first error is kept, every following scan returns `false` without
/// touching the cursor. The cursor is closed and released exactly once, by
/// [`RowIter::close`], by the consuming methods or on drop.
///
/// The columns are matched to record fields on the first struct scan and the
/// result is reused for every following row, scanning different record types
/// with the same iterator is not supported.
pub struct RowIter<C: Cursor> {
    cursor: C,
    mapper: Arc<Mapper>,
    unsafe_mode: bool,
    force_struct: bool,
    rows: usize,
    state: State,
}

impl<C: Cursor> RowIter<C> {
    pub fn new(cursor: C) -> Self {
        Self::with_mapper(cursor, DEFAULT_MAPPER.clone())
    }

    pub fn with_mapper(cursor: C, mapper: Arc<Mapper>) -> Self {
        Self {
            cursor,
            mapper,
            unsafe_mode: false,
            force_struct: false,
            rows: 0,
            state: State::Fresh,
        }
    }

    /// Columns without a destination field are discarded instead of failing
    /// the scan.
    pub fn unsafe_mode(mut self) -> Self {
        self.unsafe_mode = true;
        self
    }

    /// Records are scanned field by field even when they decode themselves.
    pub fn force_struct(mut self) -> Self {
        self.force_struct = true;
        self
    }

    /// The error that ended the iteration, if any.
    pub fn err(&self) -> Option<&Error> {
        match &self.state {
            State::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Rows scanned so far.
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cursor(&self) -> &C {
        &self.cursor
    }

    /// Scans the next row, which must have a single column, into `dest`.
    ///
    /// `dest` must decode the column itself, records routed field by field
    /// fail with [`ScanError::NotScannable`] before any row is fetched.
    /// Returns `false` when the result is exhausted or on error.
    pub fn scan<T: Destination>(&mut self, dest: &mut T) -> bool {
        if !self.start() {
            return false;
        }
        let columns = self.cursor.columns().len();
        if columns > 1 {
            self.fail(
                ScanError::ScannableWithMultipleColumns {
                    type_name: any::type_name::<T>(),
                    columns,
                }
                .into(),
            );
            return false;
        }
        let Some(decoder) = dest.decoder() else {
            self.fail(
                ScanError::NotScannable {
                    type_name: any::type_name::<T>(),
                }
                .into(),
            );
            return false;
        };
        let mut slots = [Slot::Field(decoder)];
        let result = self.cursor.fetch_into(&mut slots);
        self.fetched(result)
    }

    /// Scans the next row into the fields of `dest`.
    ///
    /// Returns `false` when the result is exhausted or on error.
    pub fn struct_scan<T: Destination + 'static>(&mut self, dest: &mut T) -> bool {
        if !self.start() {
            return false;
        }
        if let State::Iterating(None) = self.state {
            match self.resolve::<T>() {
                Ok(session) => self.state = State::Iterating(Some(session)),
                Err(e) => {
                    self.fail(e);
                    return false;
                }
            }
        }
        let State::Iterating(Some(session)) = &mut self.state else {
            return false;
        };
        let cursor = &mut self.cursor;
        let result = session
            .buffer
            .with_slots(dest, &session.traversals, |slots| cursor.fetch_into(slots))
            .and_then(|fetched| fetched);
        self.fetched(result)
    }

    /// Iterator over the remaining rows scanned as records.
    ///
    /// Iteration stops at the end of the result or at the first error, which
    /// is not yielded. It stays in the iterator, unchanged, for
    /// [`RowIter::err`] and [`RowIter::close`].
    pub fn records<T>(&mut self) -> Records<'_, C, T>
    where
        T: Destination + Default + 'static,
    {
        Records {
            iter: self,
            done: false,
            _type: PhantomData,
        }
    }

    /// Scans the first row into `dest` and closes the iterator.
    ///
    /// Records are scanned field by field, any other destination receives the
    /// single column of the result. An empty result is [`ScanError::NotFound`].
    pub fn get<T: Destination + 'static>(mut self, dest: &mut T) -> Result<()> {
        self.scan_any(dest);
        self.close_inner()?;
        if self.rows == 0 {
            return Err(ScanError::NotFound.into());
        }
        Ok(())
    }

    /// Scans every row into `dest` and closes the iterator.
    ///
    /// `dest` is replaced by the rows scanned, in cursor order, an empty
    /// result leaves it empty and is not an error.
    pub fn select<E>(mut self, dest: &mut Vec<E>) -> Result<()>
    where
        E: Element,
        E::Target: Default + 'static,
    {
        self.scan_all(dest);
        self.close_inner()
    }

    /// Closes the cursor and releases it, returning the error that ended the
    /// iteration or else the one raised by the cursor while closing.
    pub fn close(mut self) -> Result<()> {
        self.close_inner()
    }

    fn scan_any<T: Destination + 'static>(&mut self, dest: &mut T) -> bool {
        if classify_forced::<T>(self.force_struct).is_structured() {
            self.struct_scan(dest)
        } else {
            self.scan(dest)
        }
    }

    fn scan_all<E>(&mut self, dest: &mut Vec<E>)
    where
        E: Element,
        E::Target: Default + 'static,
    {
        if !self.start() {
            return;
        }
        if self.force_struct && <E::Target as Destination>::KIND != Kind::Record {
            self.fail(
                ScanError::ForcedStructOnNonStruct {
                    type_name: any::type_name::<E::Target>(),
                }
                .into(),
            );
            return;
        }
        let structured = classify_forced::<E::Target>(self.force_struct).is_structured();
        let columns = self.cursor.columns().len();
        if !structured && columns > 1 {
            self.fail(
                ScanError::ScannableWithMultipleColumns {
                    type_name: any::type_name::<E::Target>(),
                    columns,
                }
                .into(),
            );
            return;
        }
        if !structured
            && <E::Target as Destination>::KIND == Kind::Record
            && !<E::Target as Destination>::SELF_DECODING
        {
            self.fail(
                ScanError::NotScannable {
                    type_name: any::type_name::<E::Target>(),
                }
                .into(),
            );
            return;
        }
        let mut result: Option<Vec<E>> = None;
        loop {
            let mut target = E::Target::default();
            let scanned = if structured {
                self.struct_scan(&mut target)
            } else {
                self.scan(&mut target)
            };
            if !scanned {
                break;
            }
            result
                .get_or_insert_with(|| Vec::with_capacity(self.cursor.row_count_hint()))
                .push(E::from_target(target));
        }
        *dest = result.unwrap_or_default();
    }

    fn resolve<T: Destination + 'static>(&self) -> Result<Session> {
        let type_name = any::type_name::<T>();
        if T::KIND != Kind::Record {
            return Err(ScanError::NotAddressable { type_name }.into());
        }
        let columns = self.cursor.columns();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        let traversals = self.mapper.traversals_by_name::<T, _>(&names);
        if let Some(i) = traversals.first_missing() {
            if !self.unsafe_mode {
                return Err(ScanError::MissingDestinationField {
                    column: columns[i].name.clone(),
                    type_name,
                }
                .into());
            }
            for i in traversals.missing() {
                log::warn!(
                    "Column `{}` has no destination field in {}, its values will be discarded",
                    columns[i].name,
                    type_name
                );
            }
        }
        log::debug!(
            "Resolved {} columns into {}: {}",
            columns.len(),
            type_name,
            names.join(", ")
        );
        Ok(Session {
            buffer: ValueBuffer::with_capacity(columns.len()),
            traversals,
        })
    }

    fn start(&mut self) -> bool {
        match self.state {
            State::Fresh => {
                self.state = State::Iterating(None);
                true
            }
            State::Iterating(..) => true,
            State::Failed(..) | State::Closed => false,
        }
    }

    fn fail(&mut self, error: Error) {
        if !matches!(self.state, State::Failed(..)) {
            self.state = State::Failed(error);
        }
    }

    fn fetched(&mut self, result: Result<bool>) -> bool {
        match result {
            Ok(true) => {
                self.rows += 1;
                true
            }
            Ok(false) => false,
            Err(e) => {
                self.fail(e.context(format!("While fetching row {}", self.rows + 1)));
                false
            }
        }
    }

    fn close_inner(&mut self) -> Result<()> {
        let state = mem::replace(&mut self.state, State::Closed);
        if let State::Closed = state {
            return Ok(());
        }
        let closed = self.cursor.close();
        self.cursor.release();
        match state {
            State::Failed(e) => {
                if let Err(close) = closed {
                    log::debug!("Error while closing a failed cursor: {close:#}");
                }
                Err(e)
            }
            _ => closed.map_err(|e| e.context("While closing the cursor")),
        }
    }
}

impl<C: Cursor> Drop for RowIter<C> {
    fn drop(&mut self) {
        if let State::Closed = self.state {
            return;
        }
        if let Err(e) = self.close_inner() {
            log::error!("Row iterator dropped with an error: {e:#}");
        }
    }
}

/// Iterator returned by [`RowIter::records`].
pub struct Records<'a, C: Cursor, T> {
    iter: &'a mut RowIter<C>,
    done: bool,
    _type: PhantomData<fn() -> T>,
}

impl<C, T> Iterator for Records<'_, C, T>
where
    C: Cursor,
    T: Destination + Default + 'static,
{
    type Item = T;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let mut record = T::default();
        if self.iter.struct_scan(&mut record) {
            return Some(record);
        }
        self.done = true;
        None
    }
}

/// Scans the first row of `cursor` into `dest` with the default mapper.
pub fn get<C: Cursor, T: Destination + 'static>(cursor: C, dest: &mut T) -> Result<()> {
    RowIter::new(cursor).get(dest)
}

/// Scans every row of `cursor` into `dest` with the default mapper.
pub fn select<C, E>(cursor: C, dest: &mut Vec<E>) -> Result<()>
where
    C: Cursor,
    E: Element,
    E::Target: Default + 'static,
{
    RowIter::new(cursor).select(dest)
}
