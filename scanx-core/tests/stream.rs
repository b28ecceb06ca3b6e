#[cfg(test)]
mod tests {
    use async_stream::stream;
    use scanx_core::{
        ColumnInfo, Cursor, Destination, Element, Error, FieldDef, FieldKind, Kind, Mapper, Row,
        RowIter, ScanError, ScanTarget, Slot, StreamCursor, Value, get, select, stream::iter,
    };
    use std::{
        fmt::{self, Display, Formatter},
        sync::Arc,
    };

    #[derive(Default, Debug, Clone, PartialEq)]
    struct Item {
        id: i64,
        name: String,
    }

    impl Destination for Item {
        const KIND: Kind = Kind::Record;
        fn field_defs() -> &'static [FieldDef] {
            const FIELDS: &[FieldDef] = &[
                FieldDef {
                    ident: "id",
                    name: "id",
                    renamed: false,
                    kind: FieldKind::Column,
                },
                FieldDef {
                    ident: "name",
                    name: "name",
                    renamed: false,
                    kind: FieldKind::Column,
                },
            ];
            FIELDS
        }
        fn field_slots<'a>(&'a mut self, out: &mut Vec<Option<&'a mut dyn ScanTarget>>) {
            out.push(Some(&mut self.id));
            out.push(Some(&mut self.name));
        }
        fn decoder(&mut self) -> Option<&mut dyn ScanTarget> {
            None
        }
    }

    impl Element for Item {
        type Target = Self;
        fn from_target(target: Self) -> Self {
            target
        }
    }

    #[derive(Debug)]
    struct ConnectionReset {
        host: &'static str,
    }

    impl Display for ConnectionReset {
        fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
            write!(f, "Connection to {} reset", self.host)
        }
    }

    impl std::error::Error for ConnectionReset {}

    fn columns(names: &[&str]) -> Vec<ColumnInfo> {
        names.iter().map(|n| ColumnInfo::new(*n)).collect()
    }

    fn row(id: i64, name: &str) -> Result<Row, Error> {
        Ok(Row::from([
            Value::Int64(Some(id)),
            Value::Varchar(Some(name.into())),
        ]))
    }

    #[test]
    fn select_from_async_stream() {
        let rows = Box::pin(stream! {
            for i in 1..=3 {
                yield row(i, &format!("item{i}"));
            }
        });
        let cursor = StreamCursor::new(columns(&["id", "name"]), rows);
        let mut items: Vec<Item> = Vec::new();
        select(cursor, &mut items).unwrap();
        assert_eq!(
            items,
            (1..=3)
                .map(|i| Item {
                    id: i,
                    name: format!("item{i}"),
                })
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn get_from_stream() {
        let cursor = StreamCursor::new(
            columns(&["name", "id"]),
            iter([Ok(Row::from([
                Value::Varchar(Some("a".into())),
                Value::Int32(Some(1)),
            ]))]),
        );
        let mut item = Item::default();
        get(cursor, &mut item).unwrap();
        assert_eq!(
            item,
            Item {
                id: 1,
                name: "a".into(),
            }
        );
    }

    #[test]
    fn get_empty_stream() {
        let cursor = StreamCursor::new(
            columns(&["id", "name"]),
            iter(Vec::<Result<Row, Error>>::new()),
        );
        let mut item = Item::default();
        let error = get(cursor, &mut item).unwrap_err();
        assert!(ScanError::is_not_found(&error));
        assert_eq!(item, Item::default());
    }

    #[test]
    fn stream_failure() {
        let rows = Box::pin(stream! {
            yield row(1, "first");
            yield Err(Error::msg("connection reset"));
            yield row(3, "never");
        });
        let cursor = StreamCursor::new(columns(&["id", "name"]), rows);
        let mut items: Vec<Item> = Vec::new();
        let error = select(cursor, &mut items).unwrap_err();
        assert!(format!("{error:#}").contains("connection reset"));
        assert!(!ScanError::is_not_found(&error));
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].name, "first");
    }

    #[test]
    fn records_iterator() {
        let cursor = StreamCursor::new(columns(&["id", "name"]), iter([row(1, "a"), row(2, "b")]));
        let mut rows = RowIter::with_mapper(cursor, Arc::new(Mapper::new()));
        let items = rows.records::<Item>().collect::<Vec<_>>();
        assert_eq!(items.len(), 2);
        assert_eq!(items[1].name, "b");
        assert_eq!(rows.rows(), 2);
        assert!(rows.err().is_none());
        rows.close().unwrap();
    }

    #[test]
    fn records_iterator_keeps_cursor_error() {
        let rows = Box::pin(stream! {
            yield row(1, "first");
            yield Err(Error::new(ConnectionReset { host: "db1" }));
            yield row(3, "never");
        });
        let cursor = StreamCursor::new(columns(&["id", "name"]), rows);
        let mut rows = RowIter::new(cursor);
        let names = rows.records::<Item>().map(|item| item.name).collect::<Vec<_>>();
        assert_eq!(names, ["first"]);
        assert_eq!(rows.records::<Item>().count(), 0);
        let error = rows.err().expect("The cursor error must be kept");
        let reset = error
            .downcast_ref::<ConnectionReset>()
            .expect("The cursor error type must survive");
        assert_eq!(reset.host, "db1");
        assert!(format!("{error:#}").contains("row 2"), "{error:#}");
        let error = rows.close().unwrap_err();
        assert!(error.downcast_ref::<ConnectionReset>().is_some());
    }

    #[test]
    fn scan_record_without_decoder() {
        let cursor = StreamCursor::new(
            columns(&["id"]),
            iter([Ok(Row::from([Value::Int64(Some(5))]))]),
        );
        let mut rows = RowIter::new(cursor);
        let mut item = Item::default();
        assert!(!rows.scan(&mut item));
        assert_eq!(item, Item::default());
        assert_eq!(rows.rows(), 0);
        assert!(matches!(
            rows.err().and_then(|e| e.downcast_ref::<ScanError>()),
            Some(ScanError::NotScannable { .. })
        ));
        assert!(rows.close().is_err());
    }

    #[test]
    fn select_preallocates_from_hint() {
        let rows = (1..=3).map(|i| row(i, "x")).collect::<Vec<_>>();
        let cursor =
            StreamCursor::new(columns(&["id", "name"]), iter(rows)).with_row_count_hint(64);
        let mut items: Vec<Item> = Vec::new();
        select(cursor, &mut items).unwrap();
        assert_eq!(items.len(), 3);
        assert!(items.capacity() >= 64, "capacity {}", items.capacity());

        // A short hint still collects every row
        let rows = (1..=5).map(|i| row(i, "y")).collect::<Vec<_>>();
        let cursor =
            StreamCursor::new(columns(&["id", "name"]), iter(rows)).with_row_count_hint(1);
        let mut items: Vec<Item> = Vec::new();
        select(cursor, &mut items).unwrap();
        assert_eq!(items.iter().map(|i| i.id).collect::<Vec<_>>(), [1, 2, 3, 4, 5]);
    }

    #[test]
    fn scan_scalars() {
        let cursor = StreamCursor::new(
            columns(&["count"]),
            iter([
                Ok(Row::from([Value::Int64(Some(10))])),
                Ok(Row::from([Value::Int64(Some(20))])),
            ]),
        )
        .with_row_count_hint(2);
        assert_eq!(cursor.row_count_hint(), 2);
        let mut rows = RowIter::new(cursor);
        let mut value = 0u32;
        let mut seen = Vec::new();
        while rows.scan(&mut value) {
            seen.push(value);
        }
        assert!(rows.err().is_none());
        assert_eq!(seen, [10, 20]);
    }

    #[test]
    fn row_size_mismatch() {
        let cursor = StreamCursor::new(
            columns(&["id", "name"]),
            iter([Ok(Row::from([Value::Int64(Some(1))]))]),
        );
        let mut rows = RowIter::new(cursor);
        let mut item = Item::default();
        assert!(!rows.struct_scan(&mut item));
        assert!(rows.err().is_some());
        assert!(rows.close().is_err());
    }

    #[test]
    fn assign_row_to_discard() {
        let mut slots = [Slot::Discard, Slot::Discard];
        scanx_core::assign_row(&mut slots, [Value::Null, Value::Int8(Some(1))]).unwrap();
        assert!(scanx_core::assign_row(&mut slots, [Value::Null]).is_err());
    }
}
