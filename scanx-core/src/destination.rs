use crate::{AsValue, Result, Value};
use rust_decimal::Decimal;
use std::{borrow::Cow, rc::Rc, sync::Arc};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time};
use uuid::Uuid;

/// Shape of a destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Receives a single column.
    Scalar,
    /// Composite type whose named fields receive columns.
    Record,
}

/// A field registered by a record, see [`Destination::field_defs`].
#[derive(Debug)]
pub struct FieldDef {
    /// Rust identifier of the field.
    pub ident: &'static str,
    /// Column name of the field, without any prefix coming from nesting.
    pub name: &'static str,
    /// The name was given explicitly and the mapper must use it verbatim.
    pub renamed: bool,
    pub kind: FieldKind,
}

#[derive(Debug, Clone, Copy)]
pub enum FieldKind {
    /// Leaf receiving one column.
    Column,
    /// Record whose fields are promoted into the parent with unchanged names.
    Embedded(fn() -> &'static [FieldDef]),
    /// Record whose fields are reached with the `parent.child` dotted name.
    Nested(fn() -> &'static [FieldDef]),
}

/// Number of columns reachable from `fields`, counting through embedded and
/// nested records.
pub fn count_columns(fields: &[FieldDef]) -> usize {
    fields
        .iter()
        .map(|f| match f.kind {
            FieldKind::Column => 1,
            FieldKind::Embedded(inner) | FieldKind::Nested(inner) => count_columns(inner()),
        })
        .sum()
}

/// Something a single column can be assigned to.
pub trait ScanTarget {
    fn scan_value(&mut self, value: Value) -> Result<()>;
}

impl<T: AsValue> ScanTarget for T {
    fn scan_value(&mut self, value: Value) -> Result<()> {
        *self = T::try_from_value(value)?;
        Ok(())
    }
}

/// One entry of the value buffer handed to [`Cursor::fetch_into`](crate::Cursor::fetch_into).
pub enum Slot<'a> {
    /// Address of a destination field.
    Field(&'a mut dyn ScanTarget),
    /// Accepts any value and drops it.
    Discard,
}

impl Slot<'_> {
    pub fn assign(&mut self, value: Value) -> Result<()> {
        match self {
            Slot::Field(target) => target.scan_value(value),
            Slot::Discard => Ok(()),
        }
    }

    pub fn is_discard(&self) -> bool {
        matches!(self, Slot::Discard)
    }
}

/// Static description of a type rows can be scanned into.
///
/// Scalars are implemented here, records get their implementation from
/// `#[derive(Record)]`, which registers the field table consumed by the
/// [`Mapper`](crate::Mapper).
pub trait Destination {
    const KIND: Kind;
    /// The type decodes itself from one column even if it is a record.
    const SELF_DECODING: bool = false;

    /// Visible fields in declaration order, empty for scalars.
    fn field_defs() -> &'static [FieldDef] {
        &[]
    }

    /// Push the address of every column field, in the depth first order of
    /// [`Destination::field_defs`].
    fn field_slots<'a>(&'a mut self, out: &mut Vec<Option<&'a mut dyn ScanTarget>>) {
        let _ = out;
    }

    /// The single column decoder, `None` for records that do not decode themselves.
    fn decoder(&mut self) -> Option<&mut dyn ScanTarget>;
}

/// Element of a collection filled by [`RowIter::select`](crate::RowIter::select).
///
/// Value elements receive the scanned value, pointer elements (`Box`, `Rc`,
/// `Arc`) receive a new allocation holding it, one per row.
pub trait Element: Sized {
    type Target: Destination;

    fn from_target(target: Self::Target) -> Self;
}

impl<T: Destination> Element for Box<T> {
    type Target = T;
    fn from_target(target: T) -> Self {
        Box::new(target)
    }
}

impl<T: Destination> Element for Rc<T> {
    type Target = T;
    fn from_target(target: T) -> Self {
        Rc::new(target)
    }
}

impl<T: Destination> Element for Arc<T> {
    type Target = T;
    fn from_target(target: T) -> Self {
        Arc::new(target)
    }
}

macro_rules! impl_scalar_destination {
    ($($source:ty),+ $(,)?) => {
        $(
            impl Destination for $source {
                const KIND: Kind = Kind::Scalar;
                fn decoder(&mut self) -> Option<&mut dyn ScanTarget> {
                    Some(self)
                }
            }
            impl Element for $source {
                type Target = Self;
                fn from_target(target: Self) -> Self {
                    target
                }
            }
        )+
    };
}
impl_scalar_destination!(
    bool,
    i8,
    i16,
    i32,
    i64,
    i128,
    isize,
    u8,
    u16,
    u32,
    u64,
    u128,
    usize,
    f32,
    f64,
    char,
    String,
    Box<[u8]>,
    Decimal,
    Uuid,
    Date,
    Time,
    PrimitiveDateTime,
    OffsetDateTime,
);

macro_rules! impl_scalar_destination_generic {
    ($($source:ident),+ $(,)?) => {
        $(
            impl<T: AsValue> Destination for $source<T> {
                const KIND: Kind = Kind::Scalar;
                fn decoder(&mut self) -> Option<&mut dyn ScanTarget> {
                    Some(self)
                }
            }
            impl<T: AsValue> Element for $source<T> {
                type Target = Self;
                fn from_target(target: Self) -> Self {
                    target
                }
            }
        )+
    };
}
impl_scalar_destination_generic!(Option, Vec);

impl<'a> Destination for Cow<'a, str> {
    const KIND: Kind = Kind::Scalar;
    fn decoder(&mut self) -> Option<&mut dyn ScanTarget> {
        Some(self)
    }
}

impl<'a> Element for Cow<'a, str> {
    type Target = Self;
    fn from_target(target: Self) -> Self {
        target
    }
}
