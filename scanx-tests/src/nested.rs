use crate::{CursorFactory, columns, row};
use scanx::{Record, RowIter, ScanError, Value, get, select};

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Audit {
    created_by: String,
    version: i32,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Address {
    street: String,
    city: String,
}

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Customer {
    #[scanx(name = "customer_id")]
    id: u64,
    _name: String,
    #[scanx(embed)]
    audit: Audit,
    #[scanx(nested)]
    address: Address,
    #[scanx(nested, name = "ship")]
    shipping: Address,
    #[scanx(ignore)]
    cached: Vec<String>,
}

#[derive(Record, Default, Debug, PartialEq)]
struct Versioned {
    version: i64,
    #[scanx(embed)]
    audit: Audit,
}

#[derive(Record, Default, Debug, PartialEq)]
#[scanx(rename_all = "camelCase")]
struct Camel {
    user_id: i32,
    display_name: String,
}

pub fn nested<F: CursorFactory>(factory: &F) {
    // Embedded, nested and renamed fields
    let cursor = factory.cursor(
        columns(&[
            "customer_id",
            "name",
            "created_by",
            "version",
            "address.street",
            "address.city",
        ]),
        vec![
            row([
                Value::UInt64(Some(10)),
                Value::Varchar(Some("Ada".into())),
                Value::Varchar(Some("admin".into())),
                Value::Int32(Some(3)),
                Value::Varchar(Some("Main St".into())),
                Value::Varchar(Some("Turin".into())),
            ]),
            row([
                Value::UInt64(Some(11)),
                Value::Varchar(Some("Grace".into())),
                Value::Varchar(Some("system".into())),
                Value::Int32(Some(1)),
                Value::Varchar(Some("Side St".into())),
                Value::Varchar(Some("Milan".into())),
            ]),
        ],
    );
    let mut customers: Vec<Customer> = Vec::new();
    select(cursor, &mut customers).expect("Failed to select the customers");
    assert_eq!(customers.len(), 2);
    assert_eq!(customers[0].id, 10);
    assert_eq!(customers[0]._name, "Ada");
    assert_eq!(
        customers[0].audit,
        Audit {
            created_by: "admin".into(),
            version: 3,
        }
    );
    assert_eq!(customers[1].address.city, "Milan");
    assert!(customers[1].cached.is_empty());

    // The field name of a renamed field is not a column name
    let cursor = factory.cursor(
        columns(&["id", "name"]),
        vec![row([
            Value::UInt64(Some(1)),
            Value::Varchar(Some("Ada".into())),
        ])],
    );
    let mut customer = Customer::default();
    let error = get(cursor, &mut customer).expect_err("`id` is not a column of Customer");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::MissingDestinationField { column, .. }) if column == "id"
    ));

    // Ignored fields receive no column
    let cursor = factory.cursor(
        columns(&["customer_id", "cached"]),
        vec![row([
            Value::UInt64(Some(1)),
            Value::Varchar(Some("x".into())),
        ])],
    );
    let mut customer = Customer::default();
    let error = get(cursor, &mut customer).expect_err("`cached` is ignored");
    assert!(matches!(
        error.downcast_ref::<ScanError>(),
        Some(ScanError::MissingDestinationField { column, .. }) if column == "cached"
    ));

    // Nested record with a renamed prefix
    let cursor = factory.cursor(
        columns(&["customer_id", "ship.street", "ship.city"]),
        vec![row([
            Value::UInt64(Some(2)),
            Value::Varchar(Some("Dock 4".into())),
            Value::Varchar(Some("Genoa".into())),
        ])],
    );
    let mut customer = Customer::default();
    RowIter::new(cursor)
        .get(&mut customer)
        .expect("Failed to get the shipping address");
    assert_eq!(
        customer.shipping,
        Address {
            street: "Dock 4".into(),
            city: "Genoa".into(),
        }
    );
    assert_eq!(customer.address, Address::default());

    // The shallowest field wins over the embedded one
    let cursor = factory.cursor(
        columns(&["version", "created_by"]),
        vec![row([
            Value::Int64(Some(7)),
            Value::Varchar(Some("me".into())),
        ])],
    );
    let mut versioned = Versioned::default();
    get(cursor, &mut versioned).expect("Failed to get the versioned record");
    assert_eq!(versioned.version, 7);
    assert_eq!(versioned.audit.version, 0);
    assert_eq!(versioned.audit.created_by, "me");

    // Case conversion of every field
    let cursor = factory.cursor(
        columns(&["userId", "displayName"]),
        vec![row([
            Value::Int32(Some(5)),
            Value::Varchar(Some("Five".into())),
        ])],
    );
    let mut camel = Camel::default();
    get(cursor, &mut camel).expect("Failed to get the camel case record");
    assert_eq!(
        camel,
        Camel {
            user_id: 5,
            display_name: "Five".into(),
        }
    );
}
