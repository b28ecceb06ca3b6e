//! Scans the rows of a database cursor into scalars, records and collections.
//!
//! ```rust
//! use scanx::{ColumnInfo, Record, Value, select};
//! use scanx_memory::MemoryCursor;
//!
//! #[derive(Record, Default, Debug, PartialEq)]
//! struct User {
//!     id: i64,
//!     name: String,
//! }
//!
//! let cursor = MemoryCursor::new(
//!     vec![ColumnInfo::new("id"), ColumnInfo::new("name")],
//!     vec![
//!         vec![Value::Int64(Some(1)), Value::Varchar(Some("a".into()))].into(),
//!         vec![Value::Int64(Some(2)), Value::Varchar(Some("b".into()))].into(),
//!     ],
//! );
//! let mut users: Vec<User> = Vec::new();
//! select(cursor, &mut users).unwrap();
//! assert_eq!(users[1].name, "b");
//! ```
pub use scanx_core::*;
pub use scanx_macros::Record;
