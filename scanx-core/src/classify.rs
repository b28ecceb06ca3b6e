use crate::{Destination, Kind, count_columns};

/// How rows are routed into a destination type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// The destination absorbs a single column.
    Scannable,
    /// Columns are routed into named fields.
    Structured,
    /// Columns are routed into named fields because the caller asked for it.
    StructuredForced,
}

impl Classification {
    pub fn is_structured(self) -> bool {
        !matches!(self, Classification::Scannable)
    }
}

/// Classifies `T`.
///
/// Self decoding wins over everything else, then scalars and records without
/// visible fields are scannable, any other record is structured.
pub fn classify<T: Destination + ?Sized>() -> Classification {
    if T::SELF_DECODING || T::KIND != Kind::Record || count_columns(T::field_defs()) == 0 {
        Classification::Scannable
    } else {
        Classification::Structured
    }
}

/// Like [`classify`] but honoring a forced struct routing.
pub fn classify_forced<T: Destination + ?Sized>(force_struct: bool) -> Classification {
    if force_struct {
        Classification::StructuredForced
    } else {
        classify::<T>()
    }
}
