#[cfg(test)]
mod tests {
    use scanx::{
        AsValue, Classification, Destination, Error, FieldKind, Kind, Record, Result, Value,
        classify, classify_forced, count_columns,
    };

    #[derive(Record, Default, Debug, PartialEq)]
    struct Meta {
        created: String,
        version: i32,
    }

    #[derive(Record, Default, Debug, PartialEq)]
    struct Line {
        sku: String,
        qty: i32,
    }

    #[derive(Record, Default)]
    struct Order {
        #[scanx(name = "order_id")]
        id: i64,
        placed_by: String,
        #[scanx(embed)]
        meta: Meta,
        #[scanx(nested)]
        line: Line,
        #[scanx(ignore)]
        _note: String,
    }

    #[derive(Record, Default)]
    struct Odd {
        r#type: String,
        _private: u8,
        #[scanx(name = "Mixed.Case")]
        mixed: bool,
    }

    #[derive(Record, Default)]
    #[scanx(rename_all = "SCREAMING_SNAKE_CASE")]
    struct Loud {
        first_name: String,
        #[scanx(name = "kept")]
        last_name: String,
        #[scanx(embed)]
        meta: Meta,
    }

    #[derive(Record)]
    struct Marker;

    #[derive(Record, Default)]
    struct OnlyIgnored {
        #[scanx(ignore)]
        _cache: Vec<u8>,
    }

    #[derive(Record, Default, Debug, PartialEq)]
    #[scanx(decode)]
    struct Version {
        major: u16,
        minor: u16,
    }

    impl AsValue for Version {
        fn as_empty_value() -> Value {
            Value::Varchar(None)
        }
        fn try_from_value(value: Value) -> Result<Self> {
            match value {
                Value::Varchar(Some(v)) => Self::parse(v),
                _ => Err(Error::msg(format!("Cannot convert {value:?} to Version"))),
            }
        }
        fn extract(input: &mut &str) -> Result<Self> {
            let Some((major, minor)) = input.split_once('.') else {
                return Err(Error::msg(format!("Invalid version `{input}`")));
            };
            let version = Version {
                major: u16::parse(major)?,
                minor: u16::parse(minor)?,
            };
            *input = "";
            Ok(version)
        }
    }

    #[test]
    fn field_defs() {
        let defs = Order::field_defs();
        assert_eq!(defs.len(), 4);
        assert_eq!(defs[0].ident, "id");
        assert_eq!(defs[0].name, "order_id");
        assert!(defs[0].renamed);
        assert!(matches!(defs[0].kind, FieldKind::Column));
        assert_eq!(defs[1].name, "placed_by");
        assert!(!defs[1].renamed);
        assert_eq!(defs[2].name, "meta");
        assert!(matches!(defs[2].kind, FieldKind::Embedded(..)));
        assert_eq!(defs[3].name, "line");
        let FieldKind::Nested(inner) = defs[3].kind else {
            panic!("`line` is expected to be nested");
        };
        assert_eq!(
            inner().iter().map(|f| f.name).collect::<Vec<_>>(),
            ["sku", "qty"]
        );
        assert_eq!(count_columns(defs), 6);
        assert_eq!(Order::KIND, Kind::Record);
        assert!(!Order::SELF_DECODING);

        let defs = Odd::field_defs();
        assert_eq!(defs[0].ident, "r#type");
        assert_eq!(defs[0].name, "type");
        assert_eq!(defs[1].ident, "_private");
        assert_eq!(defs[1].name, "private");
        assert_eq!(defs[2].name, "Mixed.Case");

        assert!(Marker::field_defs().is_empty());
        assert!(OnlyIgnored::field_defs().is_empty());
    }

    #[test]
    fn rename_all() {
        let defs = Loud::field_defs();
        assert_eq!(defs[0].name, "FIRST_NAME");
        assert!(defs[0].renamed);
        assert_eq!(defs[1].name, "kept");
        // Embedded fields keep the names of the inner record
        assert!(!defs[2].renamed);
        assert_eq!(
            Meta::field_defs().iter().map(|f| f.name).collect::<Vec<_>>(),
            ["created", "version"]
        );
    }

    #[test]
    fn field_slots() {
        let mut order = Order::default();
        let mut slots = Vec::new();
        order.field_slots(&mut slots);
        assert_eq!(slots.len(), 6);
        let values = [
            Value::Int64(Some(9)),
            Value::Varchar(Some("bob".into())),
            Value::Varchar(Some("today".into())),
            Value::Int32(Some(2)),
            Value::Varchar(Some("A-1".into())),
            Value::Int16(Some(4)),
        ];
        for (slot, value) in slots.iter_mut().zip(values) {
            slot.as_mut()
                .expect("Every slot is set")
                .scan_value(value)
                .expect("Failed to assign the value");
        }
        drop(slots);
        assert_eq!(order.id, 9);
        assert_eq!(order.placed_by, "bob");
        assert_eq!(
            order.meta,
            Meta {
                created: "today".into(),
                version: 2,
            }
        );
        assert_eq!(
            order.line,
            Line {
                sku: "A-1".into(),
                qty: 4,
            }
        );
    }

    #[test]
    fn classification() {
        assert_eq!(classify::<Order>(), Classification::Structured);
        assert_eq!(classify::<Meta>(), Classification::Structured);
        assert_eq!(classify::<Marker>(), Classification::Scannable);
        assert_eq!(classify::<OnlyIgnored>(), Classification::Scannable);
        assert_eq!(classify::<Version>(), Classification::Scannable);
        assert_eq!(classify::<i32>(), Classification::Scannable);
        assert_eq!(classify::<Option<String>>(), Classification::Scannable);
        assert_eq!(classify::<Vec<i64>>(), Classification::Scannable);
        assert_eq!(
            classify_forced::<Version>(true),
            Classification::StructuredForced
        );
        assert_eq!(classify_forced::<Order>(false), Classification::Structured);
        assert!(classify_forced::<u8>(true).is_structured());
        assert!(!classify::<u8>().is_structured());
    }

    #[test]
    fn decoder() {
        let mut version = Version::default();
        version
            .decoder()
            .expect("Version decodes itself")
            .scan_value(Value::Varchar(Some("3.14".into())))
            .expect("Failed to decode the version");
        assert_eq!(version, Version { major: 3, minor: 14 });
        assert!(Version::SELF_DECODING);
        assert!(Order::default().decoder().is_none());
        let mut count = 0u32;
        assert!(count.decoder().is_some());
        assert!(
            Version::default()
                .decoder()
                .expect("Version decodes itself")
                .scan_value(Value::Varchar(Some("3".into())))
                .is_err()
        );
    }
}
