#[cfg(test)]
mod tests {
    use scanx::{ColumnInfo, Mapper, Record, Row, RowIter, StreamCursor, Value, stream};
    use scanx_tests::{columns, execute_tests, init_logs, row};
    use std::sync::Arc;

    #[test]
    fn stream_cursor() {
        init_logs();
        execute_tests(|columns: Vec<ColumnInfo>, rows: Vec<Row>| {
            StreamCursor::new(columns, stream::iter(rows.into_iter().map(Ok)))
        });
    }

    #[test]
    fn boxed_cursor() {
        init_logs();
        execute_tests(|columns: Vec<ColumnInfo>, rows: Vec<Row>| {
            Box::new(StreamCursor::new(
                columns,
                stream::iter(rows.into_iter().map(Ok)),
            )) as Box<dyn scanx::Cursor>
        });
    }

    #[test]
    fn shared_mapper() {
        init_logs();
        #[allow(non_snake_case)]
        #[derive(Record, Default, Debug)]
        struct Reading {
            Sensor: String,
            Value: f64,
        }
        let mapper = Arc::new(Mapper::lowercase());
        let make = || {
            StreamCursor::new(
                columns(&["sensor", "value"]),
                stream::iter(
                    (0..3)
                        .map(|i| {
                            Ok(row([
                                Value::Varchar(Some(format!("s{i}"))),
                                Value::Float64(Some(i as f64 / 2.0)),
                            ]))
                        })
                        .collect::<Vec<_>>(),
                ),
            )
        };
        let mut first: Vec<Reading> = Vec::new();
        RowIter::with_mapper(make(), mapper.clone())
            .select(&mut first)
            .expect("Failed to select the readings");
        let mut second: Vec<Reading> = Vec::new();
        RowIter::with_mapper(make(), mapper.clone())
            .select(&mut second)
            .expect("Failed to select the readings again");
        assert_eq!(first.len(), 3);
        assert_eq!(second[2].Sensor, "s2");
        assert_eq!(second[1].Value, 0.5);

        // The identity mapper does not fold names
        let mut readings: Vec<Reading> = Vec::new();
        assert!(RowIter::new(make()).select(&mut readings).is_err());
    }
}
