use crate::{CursorFactory, columns, row};
use scanx::{Record, RowIter, ScanError, Value, get, select};

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Item {
    id: i32,
    name: String,
}

fn item_row(id: i32, name: &str) -> scanx::Row {
    row([Value::Int32(Some(id)), Value::Varchar(Some(name.into()))])
}

pub fn simple<F: CursorFactory>(factory: &F) {
    // Select, rows in cursor order
    let cursor = factory.cursor(
        columns(&["id", "name"]),
        vec![item_row(1, "a"), item_row(2, "b")],
    );
    let mut items: Vec<Item> = Vec::new();
    select(cursor, &mut items).expect("Failed to select the items");
    assert_eq!(
        items,
        [
            Item {
                id: 1,
                name: "a".into(),
            },
            Item {
                id: 2,
                name: "b".into(),
            },
        ]
    );

    // Columns in a different order than the fields
    let cursor = factory.cursor(
        columns(&["name", "id"]),
        vec![row([
            Value::Varchar(Some("c".into())),
            Value::Int32(Some(3)),
        ])],
    );
    let mut items: Vec<Item> = Vec::new();
    select(cursor, &mut items).expect("Failed to select the permuted columns");
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].id, 3);
    assert_eq!(items[0].name, "c");

    // Get, one row
    let cursor = factory.cursor(columns(&["id", "name"]), vec![item_row(1, "a")]);
    let mut item = Item::default();
    get(cursor, &mut item).expect("Failed to get the item");
    assert_eq!(
        item,
        Item {
            id: 1,
            name: "a".into(),
        }
    );

    // Get takes the first row only
    let cursor = factory.cursor(
        columns(&["id", "name"]),
        vec![item_row(5, "first"), item_row(6, "second")],
    );
    let mut item = Item::default();
    get(cursor, &mut item).expect("Failed to get the first item");
    assert_eq!(item.id, 5);

    // Get, no rows
    let cursor = factory.cursor(columns(&["id", "name"]), vec![]);
    let mut item = Item::default();
    let error = get(cursor, &mut item).expect_err("Get on an empty result must fail");
    assert!(ScanError::is_not_found(&error));
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::NotFound)
    ));

    // Select, no rows: not an error, the destination is emptied
    let cursor = factory.cursor(columns(&["id", "name"]), vec![]);
    let mut items = vec![Item::default()];
    select(cursor, &mut items).expect("Select on an empty result must succeed");
    assert!(items.is_empty());

    // Manual struct scan loop
    let cursor = factory.cursor(
        columns(&["id", "name"]),
        (0..10).map(|i| item_row(i, &format!("item{i}"))).collect(),
    );
    let mut iter = RowIter::new(cursor);
    let mut item = Item::default();
    let mut ids = Vec::new();
    while iter.struct_scan(&mut item) {
        assert_eq!(item.name, format!("item{}", item.id));
        ids.push(item.id);
    }
    assert!(iter.err().is_none());
    assert_eq!(iter.rows(), 10);
    iter.close().expect("Failed to close the iterator");
    assert_eq!(ids, (0..10).collect::<Vec<_>>());

    // Records iterator
    let cursor = factory.cursor(
        columns(&["id", "name"]),
        vec![item_row(1, "x"), item_row(2, "y"), item_row(3, "z")],
    );
    let mut iter = RowIter::new(cursor);
    let names = iter
        .records::<Item>()
        .map(|item| item.name)
        .collect::<Vec<_>>();
    assert!(iter.err().is_none());
    assert_eq!(names, ["x", "y", "z"]);
    assert_eq!(iter.records::<Item>().count(), 0);
    iter.close().expect("Failed to close the iterator");
}
