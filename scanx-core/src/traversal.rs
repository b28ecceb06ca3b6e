use crate::{Destination, Kind, Result, ScanError, ScanTarget, Slot};
use std::{any, mem};

/// Route of one column into the destination record: the position of its
/// field among the addresses pushed by [`Destination::field_slots`].
///
/// An empty traversal means the column has no destination field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Traversal(Option<usize>);

impl Traversal {
    pub fn new(slot: usize) -> Self {
        Self(Some(slot))
    }

    pub fn slot(&self) -> Option<usize> {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }
}

/// One traversal per result column, in column order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Traversals(Box<[Traversal]>);

impl Traversals {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Traversal> {
        self.0.iter()
    }

    pub fn get(&self, column: usize) -> Option<&Traversal> {
        self.0.get(column)
    }

    /// Index of the first column without destination field.
    pub fn first_missing(&self) -> Option<usize> {
        self.0.iter().position(Traversal::is_empty)
    }

    /// Indexes of every column without destination field.
    pub fn missing(&self) -> impl Iterator<Item = usize> {
        self.0
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.is_empty().then_some(i))
    }
}

impl FromIterator<Traversal> for Traversals {
    fn from_iter<I: IntoIterator<Item = Traversal>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Empties a vector and hands its allocation over to a vector of another
/// element type with the same layout, the case for references differing only
/// in lifetime.
fn recycle<T, U>(mut buffer: Vec<T>) -> Vec<U> {
    buffer.clear();
    buffer.into_iter().filter_map(|_| None).collect()
}

/// The per row array of slots handed to the cursor.
///
/// Only the addresses change from one row to the next. Before every fetch the
/// destination pushes the address of each of its fields, embedded and nested
/// ones included, and the cached traversals pick the ones the columns route
/// to. The allocations are kept for the whole session.
#[derive(Default)]
pub struct ValueBuffer {
    slots: Vec<Slot<'static>>,
    fields: Vec<Option<&'static mut dyn ScanTarget>>,
}

impl ValueBuffer {
    pub fn with_capacity(columns: usize) -> Self {
        Self {
            slots: Vec::with_capacity(columns),
            fields: Vec::with_capacity(columns),
        }
    }

    /// Points one slot per traversal at the fields of `dest` and runs `fill`
    /// on them.
    ///
    /// Empty traversals get a [`Slot::Discard`], so does a column reaching a
    /// field already claimed by a previous column.
    pub fn with_slots<T, R, F>(&mut self, dest: &mut T, traversals: &Traversals, fill: F) -> Result<R>
    where
        T: Destination,
        F: FnOnce(&mut [Slot<'_>]) -> R,
    {
        if T::KIND != Kind::Record {
            return Err(ScanError::NotAddressable {
                type_name: any::type_name::<T>(),
            }
            .into());
        }
        let mut fields = recycle(mem::take(&mut self.fields));
        dest.field_slots(&mut fields);
        let mut slots = recycle(mem::take(&mut self.slots));
        slots.extend(traversals.iter().map(|traversal| {
            traversal
                .slot()
                .and_then(|i| fields.get_mut(i))
                .and_then(Option::take)
                .map_or(Slot::Discard, Slot::Field)
        }));
        let result = fill(&mut slots);
        self.slots = recycle(slots);
        self.fields = recycle(fields);
        Ok(result)
    }
}
