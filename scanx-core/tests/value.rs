#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use scanx_core::{AsValue, ScanTarget, Slot, Value};
    use std::{borrow::Cow, sync::Arc};
    use time::macros::{date, datetime, time};
    use uuid::Uuid;

    #[test]
    fn value_null() {
        assert_eq!(Value::Null, Value::Null);
        assert!(Value::Null.is_null());
        assert!(Value::Int32(None).is_null());
        assert!(!Value::Int32(Some(0)).is_null());
        assert_ne!(Value::Float32(Some(1.0)), Value::Null);
        assert_eq!(Value::Varchar(Some("abc".into())).as_null(), Value::Varchar(None));
    }

    #[test]
    fn value_bool() {
        assert_eq!(bool::as_empty_value(), Value::Boolean(None));
        assert_eq!(
            bool::try_from_value(Value::Boolean(Some(true))).unwrap(),
            true
        );
        assert_eq!(bool::try_from_value(Value::Int8(Some(1))).unwrap(), true);
        assert_eq!(bool::try_from_value(Value::UInt64(Some(0))).unwrap(), false);
        assert_eq!(
            bool::try_from_value(Value::Unknown(Some("FALSE".into()))).unwrap(),
            false
        );
        assert!(bool::try_from_value(Value::Float32(Some(0.5))).is_err());
    }

    #[test]
    fn value_integers() {
        assert_eq!(i16::try_from_value(Value::Int64(Some(300))).unwrap(), 300);
        assert_eq!(i64::try_from_value(Value::UInt8(Some(255))).unwrap(), 255);
        assert_eq!(u32::try_from_value(Value::Int16(Some(7))).unwrap(), 7);
        assert_eq!(i128::try_from_value(Value::UInt128(Some(5))).unwrap(), 5);
        assert_eq!(isize::try_from_value(Value::Int32(Some(-3))).unwrap(), -3);
        assert_eq!(usize::try_from_value(Value::UInt64(Some(9))).unwrap(), 9);
        let error = i8::try_from_value(Value::Int32(Some(300))).unwrap_err();
        assert!(format!("{error}").contains("out of range"), "{error}");
        assert!(u8::try_from_value(Value::Int8(Some(-1))).is_err());
        assert!(u16::try_from_value(Value::Varchar(Some("1".into()))).is_err());
        assert!(i32::try_from_value(Value::Float64(Some(1.0))).is_err());
    }

    #[test]
    fn value_integer_from_decimal() {
        assert_eq!(
            i32::try_from_value(Value::Decimal(Some(Decimal::new(1200, 2)), 0, 2)).unwrap(),
            12
        );
        assert!(i32::try_from_value(Value::Decimal(Some(Decimal::new(1250, 2)), 0, 2)).is_err());
    }

    #[test]
    fn value_unknown_text() {
        assert_eq!(i32::try_from_value(Value::Unknown(Some("42".into()))).unwrap(), 42);
        assert_eq!(i32::try_from_value(Value::Unknown(Some("'-7'".into()))).unwrap(), -7);
        assert!(i32::try_from_value(Value::Unknown(Some("42x".into()))).is_err());
        assert!(u8::try_from_value(Value::Unknown(Some("256".into()))).is_err());
        assert_eq!(f64::try_from_value(Value::Unknown(Some("1.5".into()))).unwrap(), 1.5);
        assert_eq!(
            Decimal::try_from_value(Value::Unknown(Some("-12.50".into()))).unwrap(),
            Decimal::new(-1250, 2)
        );
        assert_eq!(
            String::try_from_value(Value::Unknown(Some("raw".into()))).unwrap(),
            "raw"
        );
    }

    #[test]
    fn value_floats() {
        assert_eq!(f32::try_from_value(Value::Float64(Some(2.5))).unwrap(), 2.5);
        assert_eq!(f64::try_from_value(Value::Int32(Some(-4))).unwrap(), -4.0);
        assert_eq!(f64::try_from_value(Value::UInt16(Some(8))).unwrap(), 8.0);
        assert!(f32::try_from_value(Value::Int64(Some(1))).is_err());
    }

    #[test]
    fn value_strings() {
        assert_eq!(
            String::try_from_value(Value::Varchar(Some("hello".into()))).unwrap(),
            "hello"
        );
        assert_eq!(String::try_from_value(Value::Char(Some('x'))).unwrap(), "x");
        assert_eq!(char::try_from_value(Value::Varchar(Some("y".into()))).unwrap(), 'y');
        assert!(char::try_from_value(Value::Varchar(Some("yz".into()))).is_err());
        assert_eq!(String::parse("'it''s'").unwrap(), "it's");
        assert_eq!(String::parse("\"quoted\"").unwrap(), "quoted");
        assert!(String::parse("'open").is_err());
        let cow: Cow<'_, str> = AsValue::try_from_value(Value::Varchar(Some("c".into()))).unwrap();
        assert_eq!(cow, "c");
    }

    #[test]
    fn value_blob() {
        let blob: Box<[u8]> = AsValue::try_from_value(Value::Blob(Some([1, 2, 3].into()))).unwrap();
        assert_eq!(&*blob, &[1, 2, 3]);
        let blob: Box<[u8]> = AsValue::try_from_value(Value::Varchar(Some("ab".into()))).unwrap();
        assert_eq!(&*blob, b"ab");
    }

    #[test]
    fn value_time() {
        assert_eq!(
            time::Date::try_from_value(Value::Varchar(Some("2024-03-01".into()))).unwrap(),
            date!(2024 - 03 - 01)
        );
        assert_eq!(
            time::Time::try_from_value(Value::Unknown(Some("10:20:30".into()))).unwrap(),
            time!(10:20:30)
        );
        assert_eq!(
            time::PrimitiveDateTime::try_from_value(Value::Varchar(Some(
                "2024-03-01 10:20:30".into()
            )))
            .unwrap(),
            datetime!(2024-03-01 10:20:30)
        );
        assert_eq!(
            time::OffsetDateTime::try_from_value(Value::Unknown(Some(
                "2024-03-01 10:20:30+02:00".into()
            )))
            .unwrap(),
            datetime!(2024-03-01 10:20:30 +2)
        );
        assert!(<time::Time as AsValue>::parse("10:20 pm").is_err());
        assert_eq!(
            <time::Date as AsValue>::parse("2024-12-31").unwrap(),
            date!(2024 - 12 - 31)
        );
        assert!(time::Date::try_from_value(Value::Varchar(Some("yesterday".into()))).is_err());
    }

    #[test]
    fn value_uuid() {
        let text = "67e55044-10b1-426f-9247-bb680e5fe0c8";
        let uuid = Uuid::parse_str(text).unwrap();
        assert_eq!(Uuid::try_from_value(Value::Uuid(Some(uuid))).unwrap(), uuid);
        assert_eq!(Uuid::try_from_value(Value::Varchar(Some(text.into()))).unwrap(), uuid);
        assert!(Uuid::try_from_value(Value::Varchar(Some("67e55044".into()))).is_err());
    }

    #[test]
    fn value_wrappers() {
        assert_eq!(Option::<i32>::try_from_value(Value::Int32(None)).unwrap(), None);
        assert_eq!(Option::<i32>::try_from_value(Value::Null).unwrap(), None);
        assert_eq!(
            Option::<i32>::try_from_value(Value::Int16(Some(3))).unwrap(),
            Some(3)
        );
        assert!(i32::try_from_value(Value::Int32(None)).is_err());
        assert_eq!(
            Vec::<i64>::try_from_value(Value::List(
                Some(vec![Value::Int32(Some(1)), Value::Int8(Some(2))]),
                Box::new(Value::Int32(None)),
            ))
            .unwrap(),
            vec![1, 2]
        );
        let shared: Arc<String> = AsValue::try_from_value(Value::Varchar(Some("s".into()))).unwrap();
        assert_eq!(*shared, "s");
        let boxed: Box<u8> = AsValue::try_from_value(Value::UInt8(Some(1))).unwrap();
        assert_eq!(*boxed, 1);
    }

    #[test]
    fn scan_target() {
        let mut number = 0i64;
        number.scan_value(Value::Int32(Some(5))).unwrap();
        assert_eq!(number, 5);
        let mut text = String::new();
        {
            let mut slot = Slot::Field(&mut text);
            assert!(!slot.is_discard());
            slot.assign(Value::Varchar(Some("abc".into()))).unwrap();
        }
        assert_eq!(text, "abc");
        let mut slot = Slot::Discard;
        assert!(slot.is_discard());
        slot.assign(Value::Blob(Some([0u8].into()))).unwrap();
        let mut flag = false;
        assert!(flag.scan_value(Value::Varchar(Some("true".into()))).is_err());
    }
}
