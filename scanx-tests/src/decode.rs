use crate::{CursorFactory, columns, row};
use scanx::{AsValue, Error, Record, Result, RowIter, Value, get, select};

/// Amount stored as text like `12.34 EUR`, or split in two columns.
#[derive(Record, Default, Debug, Clone, PartialEq)]
#[scanx(decode)]
struct Money {
    cents: i64,
    currency: String,
}

impl AsValue for Money {
    fn as_empty_value() -> Value {
        Value::Varchar(None)
    }
    fn try_from_value(value: Value) -> Result<Self> {
        match value {
            Value::Varchar(Some(v)) | Value::Unknown(Some(v)) => Self::parse(v),
            _ => Err(Error::msg(format!("Cannot convert {value:?} to Money"))),
        }
    }
    fn extract(input: &mut &str) -> Result<Self> {
        let Some((amount, currency)) = input.split_once(' ') else {
            return Err(Error::msg(format!("Missing currency in `{input}`")));
        };
        let (units, cents) = amount.split_once('.').unwrap_or((amount, "0"));
        let money = Money {
            cents: i64::parse(units)? * 100 + i64::parse(cents)?,
            currency: currency.into(),
        };
        *input = "";
        Ok(money)
    }
}

pub fn decode<F: CursorFactory>(factory: &F) {
    // Decoded from a single column
    let cursor = factory.cursor(
        columns(&["price"]),
        vec![
            row([Value::Varchar(Some("12.34 EUR".into()))]),
            row([Value::Varchar(Some("5.00 USD".into()))]),
        ],
    );
    let mut prices: Vec<Money> = Vec::new();
    select(cursor, &mut prices).expect("Failed to select the prices");
    assert_eq!(
        prices,
        [
            Money {
                cents: 1234,
                currency: "EUR".into(),
            },
            Money {
                cents: 500,
                currency: "USD".into(),
            },
        ]
    );

    let cursor = factory.cursor(
        columns(&["price"]),
        vec![row([Value::Unknown(Some("7.05 CHF".into()))])],
    );
    let mut price = Money::default();
    get(cursor, &mut price).expect("Failed to get the price");
    assert_eq!(price.cents, 705);
    assert_eq!(price.currency, "CHF");

    // Forced struct scanning uses the fields instead
    let cursor = factory.cursor(
        columns(&["currency", "cents"]),
        vec![row([
            Value::Varchar(Some("JPY".into())),
            Value::Int64(Some(100)),
        ])],
    );
    let mut price = Money::default();
    RowIter::new(cursor)
        .force_struct()
        .get(&mut price)
        .expect("Failed to get the price field by field");
    assert_eq!(
        price,
        Money {
            cents: 100,
            currency: "JPY".into(),
        }
    );

    // Still a single column destination
    let cursor = factory.cursor(
        columns(&["currency", "cents"]),
        vec![row([
            Value::Varchar(Some("JPY".into())),
            Value::Int64(Some(100)),
        ])],
    );
    let mut price = Money::default();
    assert!(get(cursor, &mut price).is_err());
}
