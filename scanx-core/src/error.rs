use crate::Error;
use std::fmt::{self, Display, Formatter};

/// Conditions detected by the row iterator itself.
///
/// Shape errors are raised before any row is fetched and point to a mismatch
/// between the destination and the result. `NotFound` is the expected outcome
/// of a single row fetch over an empty result. Anything else coming out of the
/// iterator is a cursor failure passed through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanError {
    /// A scannable destination can absorb exactly one column.
    ScannableWithMultipleColumns {
        type_name: &'static str,
        columns: usize,
    },
    /// A column has no matching field in the destination record.
    MissingDestinationField {
        column: String,
        type_name: &'static str,
    },
    /// The single row fetch produced no row.
    NotFound,
    /// Struct routing was forced on an element type that is not a record.
    ForcedStructOnNonStruct { type_name: &'static str },
    /// Field addresses were requested from a destination that is not a record.
    NotAddressable { type_name: &'static str },
    /// A single column was scanned into a destination that cannot decode it.
    NotScannable { type_name: &'static str },
}

impl ScanError {
    /// Whether `error` is a [`ScanError::NotFound`].
    pub fn is_not_found(error: &Error) -> bool {
        matches!(error.downcast_ref::<ScanError>(), Some(ScanError::NotFound))
    }
}

impl Display for ScanError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ScanError::ScannableWithMultipleColumns { type_name, columns } => write!(
                f,
                "Scannable destination type {type_name} cannot receive more than one column ({columns} in the result)"
            ),
            ScanError::MissingDestinationField { column, type_name } => {
                write!(f, "Missing destination name `{column}` in {type_name}")
            }
            ScanError::NotFound => f.write_str("Not found"),
            ScanError::ForcedStructOnNonStruct { type_name } => write!(
                f,
                "Struct scanning was forced but the destination type {type_name} is not a record"
            ),
            ScanError::NotAddressable { type_name } => write!(
                f,
                "Destination type {type_name} is not a record, its fields cannot be addressed"
            ),
            ScanError::NotScannable { type_name } => write!(
                f,
                "Destination type {type_name} cannot be decoded from a single column"
            ),
        }
    }
}

impl std::error::Error for ScanError {}
