use crate::{CursorFactory, columns, row};
use scanx::{Record, RowIter, ScanError, Value};

#[derive(Record, Default, Debug, PartialEq)]
struct Account {
    id: i64,
    email: Option<String>,
}

pub fn missing<F: CursorFactory>(factory: &F) {
    let rows = || {
        vec![
            row([
                Value::Int64(Some(1)),
                Value::Varchar(Some("one@example.com".into())),
                Value::Boolean(Some(true)),
            ]),
            row([
                Value::Int64(Some(2)),
                Value::Varchar(None),
                Value::Boolean(Some(false)),
            ]),
        ]
    };

    // Detected on the first scan, before any row is consumed
    let cursor = factory.cursor(columns(&["id", "email", "active"]), rows());
    let mut iter = RowIter::new(cursor);
    let mut account = Account::default();
    assert!(!iter.struct_scan(&mut account));
    assert_eq!(iter.rows(), 0);
    assert_eq!(account, Account::default());
    let error = iter.err().expect("The missing field must be reported");
    match error.downcast_ref::<ScanError>() {
        Some(ScanError::MissingDestinationField { column, type_name }) => {
            assert_eq!(column, "active");
            assert!(type_name.ends_with("Account"), "{type_name}");
        }
        other => panic!("Unexpected error {other:?}"),
    }
    assert!(format!("{error}").contains("`active`"));

    // The error is sticky
    assert!(!iter.struct_scan(&mut account));
    assert_eq!(iter.rows(), 0);
    let error = iter.close().expect_err("Close must return the first error");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::MissingDestinationField { .. })
    ));

    // Same through select
    let cursor = factory.cursor(columns(&["id", "email", "active"]), rows());
    let mut accounts: Vec<Account> = Vec::new();
    let error = RowIter::new(cursor)
        .select(&mut accounts)
        .expect_err("Select must report the missing field");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::MissingDestinationField { .. })
    ));
    assert!(accounts.is_empty());

    // Unsafe mode discards the unmatched column
    let cursor = factory.cursor(columns(&["id", "email", "active"]), rows());
    let mut accounts: Vec<Account> = Vec::new();
    RowIter::new(cursor)
        .unsafe_mode()
        .select(&mut accounts)
        .expect("Unsafe select must ignore the unmatched column");
    assert_eq!(
        accounts,
        [
            Account {
                id: 1,
                email: Some("one@example.com".into()),
            },
            Account { id: 2, email: None },
        ]
    );

    // Unmatched column in the middle keeps the positions of the others
    let cursor = factory.cursor(
        columns(&["extra", "email", "id"]),
        vec![row([
            Value::Blob(Some([1, 2].into())),
            Value::Varchar(Some("x@example.com".into())),
            Value::Int64(Some(9)),
        ])],
    );
    let mut account = Account::default();
    RowIter::new(cursor)
        .unsafe_mode()
        .get(&mut account)
        .expect("Unsafe get must ignore the unmatched column");
    assert_eq!(account.id, 9);
    assert_eq!(account.email.as_deref(), Some("x@example.com"));

    // A conversion failure ends the iteration with the rows scanned so far
    let cursor = factory.cursor(
        columns(&["id", "email"]),
        vec![
            row([Value::Int64(Some(1)), Value::Varchar(None)]),
            row([Value::Varchar(Some("two".into())), Value::Varchar(None)]),
            row([Value::Int64(Some(3)), Value::Varchar(None)]),
        ],
    );
    let mut accounts: Vec<Account> = Vec::new();
    let error = RowIter::new(cursor)
        .select(&mut accounts)
        .expect_err("The second row cannot be converted");
    assert!(error.downcast_ref::<ScanError>().is_none());
    assert_eq!(accounts.len(), 1);
    assert_eq!(accounts[0].id, 1);
}
