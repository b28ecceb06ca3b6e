use crate::{CursorFactory, columns, row};
use rust_decimal::Decimal;
use scanx::{Record, Value, get, select};
use std::borrow::Cow;
use time::{Date, Month, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};
use uuid::Uuid;

#[derive(Record, Default, Debug)]
struct SimpleFields {
    alpha: Option<u8>,
    bravo: Option<i32>,
    charlie: Option<i16>,
    delta: Option<u64>,
    echo: Option<Uuid>,
    foxtrot: Option<i128>,
    golf: Option<Time>,
    hotel: Option<Cow<'static, str>>,
    india: Box<Option<char>>,
    juliet: Option<Decimal>,
    kilo: Option<Date>,
    lima: Option<PrimitiveDateTime>,
    mike: Option<OffsetDateTime>,
    november: Vec<i32>,
    oscar: Option<Box<[u8]>>,
    papa: bool,
}

const COLUMNS: &[&str] = &[
    "alpha", "bravo", "charlie", "delta", "echo", "foxtrot", "golf", "hotel", "india", "juliet",
    "kilo", "lima", "mike", "november", "oscar", "papa",
];

pub fn types<F: CursorFactory>(factory: &F) {
    let uuid = Uuid::parse_str("5e915574-bb30-4430-98cf-c5854f61fbbd").expect("Invalid uuid");
    let date = Date::from_calendar_date(2025, Month::April, 3).expect("Invalid date");
    let time = Time::from_hms(12, 0, 10).expect("Invalid time");
    let offset = UtcOffset::from_hms(2, 0, 0).expect("Invalid offset");

    // Typed values
    let cursor = factory.cursor(
        columns(COLUMNS),
        vec![row([
            Value::UInt8(Some(255)),
            Value::Int64(Some(777)),
            Value::Int8(Some(-2)),
            Value::UInt64(Some(9876543210)),
            Value::Uuid(Some(uuid)),
            Value::Int128(Some(i128::MAX)),
            Value::Time(Some(time)),
            Value::Varchar(Some("Hello world!".into())),
            Value::Char(Some('x')),
            Value::Decimal(Some(Decimal::new(12345, 2)), 10, 2),
            Value::Date(Some(date)),
            Value::Timestamp(Some(PrimitiveDateTime::new(date, time))),
            Value::TimestampWithTimezone(Some(
                PrimitiveDateTime::new(date, time).assume_offset(offset),
            )),
            Value::List(
                Some(vec![Value::Int32(Some(1)), Value::Int32(Some(2))]),
                Box::new(Value::Int32(None)),
            ),
            Value::Blob(Some([0xCA, 0xFE].into())),
            Value::Boolean(Some(true)),
        ])],
    );
    let mut entity = SimpleFields::default();
    get(cursor, &mut entity).expect("Failed to get the typed row");
    assert_eq!(entity.alpha, Some(255));
    assert_eq!(entity.bravo, Some(777));
    assert_eq!(entity.charlie, Some(-2));
    assert_eq!(entity.delta, Some(9876543210));
    assert_eq!(entity.echo, Some(uuid));
    assert_eq!(
        entity.foxtrot,
        Some(170_141_183_460_469_231_731_687_303_715_884_105_727)
    );
    assert_eq!(entity.golf, Some(time));
    assert_eq!(entity.hotel, Some("Hello world!".into()));
    assert_eq!(*entity.india, Some('x'));
    assert_eq!(entity.juliet, Some(Decimal::new(12345, 2)));
    assert_eq!(entity.kilo, Some(date));
    assert_eq!(entity.lima, Some(PrimitiveDateTime::new(date, time)));
    assert_eq!(
        entity.mike.map(|v| v.offset()),
        Some(UtcOffset::from_hms(2, 0, 0).expect("Invalid offset"))
    );
    assert_eq!(entity.november, [1, 2]);
    assert_eq!(entity.oscar.as_deref(), Some(&[0xCA, 0xFE][..]));
    assert!(entity.papa);

    // Nulls everywhere nullable
    let cursor = factory.cursor(
        columns(COLUMNS),
        vec![row([
            Value::UInt8(None),
            Value::Int32(None),
            Value::Null,
            Value::UInt64(None),
            Value::Uuid(None),
            Value::Int128(None),
            Value::Time(None),
            Value::Varchar(None),
            Value::Char(None),
            Value::Decimal(None, 0, 0),
            Value::Date(None),
            Value::Timestamp(None),
            Value::TimestampWithTimezone(None),
            Value::List(None, Box::new(Value::Int32(None))),
            Value::Blob(None),
            Value::Boolean(Some(false)),
        ])],
    );
    let mut entity = SimpleFields::default();
    get(cursor, &mut entity).expect("Failed to get the null row");
    assert_eq!(entity.alpha, None);
    assert_eq!(entity.bravo, None);
    assert_eq!(entity.charlie, None);
    assert_eq!(entity.echo, None);
    assert_eq!(entity.hotel, None);
    assert_eq!(*entity.india, None);
    assert_eq!(entity.juliet, None);
    assert_eq!(entity.mike, None);
    assert!(entity.november.is_empty());
    assert_eq!(entity.oscar, None);
    assert!(!entity.papa);

    // Text delivered by untyped columns is parsed
    let cursor = factory.cursor(
        columns(&["when", "amount", "id"]),
        vec![row([
            Value::Unknown(Some("2025-04-03 12:00:10".into())),
            Value::Unknown(Some("-3.25".into())),
            Value::Unknown(Some(uuid.to_string())),
        ])],
    );
    #[derive(Record, Default)]
    struct Untyped {
        when: Option<PrimitiveDateTime>,
        amount: f64,
        id: Option<Uuid>,
    }
    let mut untyped: Vec<Untyped> = Vec::new();
    select(cursor, &mut untyped).expect("Failed to select untyped values");
    assert_eq!(untyped[0].when, Some(PrimitiveDateTime::new(date, time)));
    assert_eq!(untyped[0].amount, -3.25);
    assert_eq!(untyped[0].id, Some(uuid));
}
