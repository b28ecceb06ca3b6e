use crate::{CursorFactory, columns, row};
use scanx::{Record, RowIter, ScanError, Value, get, select};

#[derive(Record, Default, Debug, PartialEq)]
struct Counter {
    count: i64,
}

/// No visible field and no decoder.
#[derive(Record, Default, Debug, PartialEq)]
struct Tag {
    #[scanx(ignore)]
    label: String,
}

pub fn scalars<F: CursorFactory>(factory: &F) {
    // Select a single column
    let cursor = factory.cursor(
        columns(&["count"]),
        (1..=4).map(|i| row([Value::Int64(Some(i * 10))])).collect(),
    );
    let mut counts: Vec<i64> = Vec::new();
    select(cursor, &mut counts).expect("Failed to select the counts");
    assert_eq!(counts, [10, 20, 30, 40]);

    // Get a single column
    let cursor = factory.cursor(
        columns(&["total"]),
        vec![row([Value::Decimal(Some(42.into()), 0, 0)])],
    );
    let mut total = 0u16;
    get(cursor, &mut total).expect("Failed to get the total");
    assert_eq!(total, 42);

    // Nullable column
    let cursor = factory.cursor(
        columns(&["note"]),
        vec![
            row([Value::Varchar(Some("first".into()))]),
            row([Value::Varchar(None)]),
            row([Value::Null]),
        ],
    );
    let mut notes: Vec<Option<String>> = Vec::new();
    select(cursor, &mut notes).expect("Failed to select the notes");
    assert_eq!(notes, [Some("first".into()), None, None]);

    // Scalars cannot absorb more than one column, no row is consumed
    let cursor = factory.cursor(
        columns(&["a", "b"]),
        vec![row([Value::Int32(Some(1)), Value::Int32(Some(2))])],
    );
    let mut value = 0i32;
    let mut iter = RowIter::new(cursor);
    assert!(!iter.scan(&mut value));
    assert_eq!(iter.rows(), 0);
    assert_eq!(value, 0);
    let error = iter.close().expect_err("Scan with two columns must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::ScannableWithMultipleColumns { columns: 2, .. })
    ));

    let cursor = factory.cursor(
        columns(&["a", "b"]),
        vec![row([Value::Int32(Some(1)), Value::Int32(Some(2))])],
    );
    let mut value = 0i32;
    let error = get(cursor, &mut value).expect_err("Get with two columns must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::ScannableWithMultipleColumns { columns: 2, .. })
    ));
    assert_eq!(value, 0);

    let cursor = factory.cursor(
        columns(&["a", "b"]),
        vec![row([Value::Int32(Some(1)), Value::Int32(Some(2))])],
    );
    let mut values: Vec<i32> = vec![7];
    let error = select(cursor, &mut values).expect_err("Select with two columns must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::ScannableWithMultipleColumns { columns: 2, .. })
    ));
    assert_eq!(values, [7]);

    // Forced struct scanning needs a record
    let cursor = factory.cursor(columns(&["count"]), vec![row([Value::Int64(Some(1))])]);
    let mut values: Vec<i64> = Vec::new();
    let error = RowIter::new(cursor)
        .force_struct()
        .select(&mut values)
        .expect_err("Forced struct select into scalars must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::ForcedStructOnNonStruct { .. })
    ));

    let cursor = factory.cursor(columns(&["count"]), vec![row([Value::Int64(Some(1))])]);
    let mut value = 0i64;
    let error = RowIter::new(cursor)
        .force_struct()
        .get(&mut value)
        .expect_err("Forced struct get into a scalar must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::NotAddressable { .. })
    ));

    // A single column record is still a record
    let cursor = factory.cursor(
        columns(&["count"]),
        vec![row([Value::Int64(Some(3))]), row([Value::Int64(Some(4))])],
    );
    let mut counters: Vec<Counter> = Vec::new();
    RowIter::new(cursor)
        .force_struct()
        .select(&mut counters)
        .expect("Failed to select the counters");
    assert_eq!(counters, [Counter { count: 3 }, Counter { count: 4 }]);

    // Records without fields cannot decode a column either
    let cursor = factory.cursor(
        columns(&["label"]),
        vec![row([Value::Varchar(Some("a".into()))])],
    );
    let mut tag = Tag {
        label: "kept".into(),
    };
    let error = get(cursor, &mut tag).expect_err("Get into a record without fields must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::NotScannable { .. })
    ));
    assert!(!ScanError::is_not_found(&error));
    assert_eq!(tag.label, "kept");

    let cursor = factory.cursor(
        columns(&["label"]),
        vec![row([Value::Varchar(Some("a".into()))])],
    );
    let mut tags = vec![Tag::default()];
    let error =
        select(cursor, &mut tags).expect_err("Select into records without fields must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::NotScannable { .. })
    ));
    assert_eq!(tags.len(), 1);

    // Field routed records cannot be scanned as a single column
    let cursor = factory.cursor(columns(&["count"]), vec![row([Value::Int64(Some(9))])]);
    let mut counter = Counter::default();
    let mut iter = RowIter::new(cursor);
    assert!(!iter.scan(&mut counter));
    assert_eq!(iter.rows(), 0);
    assert_eq!(counter, Counter::default());
    let error = iter.close().expect_err("Scan into a field routed record must fail");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::NotScannable { .. })
    ));
}
