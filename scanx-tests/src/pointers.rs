use crate::{CursorFactory, columns, row};
use scanx::{Record, Value, select};
use std::{rc::Rc, sync::Arc};

#[derive(Record, Default, Debug, Clone, PartialEq)]
struct Point {
    x: f64,
    y: f64,
}

fn points<F: CursorFactory>(factory: &F) -> F::Cursor {
    factory.cursor(
        columns(&["x", "y"]),
        (0..3)
            .map(|i| row([Value::Float64(Some(i as f64)), Value::Float64(Some(-(i as f64)))]))
            .collect(),
    )
}

pub fn pointers<F: CursorFactory>(factory: &F) {
    // Boxed elements, one allocation per row
    let mut boxed: Vec<Box<Point>> = Vec::new();
    select(points(factory), &mut boxed).expect("Failed to select boxed points");
    assert_eq!(boxed.len(), 3);
    for (i, point) in boxed.iter().enumerate() {
        assert_eq!(point.x, i as f64);
        assert_eq!(point.y, -(i as f64));
    }
    let addresses = boxed
        .iter()
        .map(|p| &**p as *const Point)
        .collect::<Vec<_>>();
    assert!(addresses[0] != addresses[1] && addresses[1] != addresses[2]);
    boxed[0].x = 100.0;
    assert_eq!(boxed[1].x, 1.0);

    // Shared elements
    let mut shared: Vec<Arc<Point>> = Vec::new();
    select(points(factory), &mut shared).expect("Failed to select shared points");
    assert_eq!(shared.len(), 3);
    assert!(!Arc::ptr_eq(&shared[0], &shared[1]));
    assert!(shared.iter().all(|p| Arc::strong_count(p) == 1));
    let kept = shared[2].clone();
    drop(shared);
    assert_eq!(*kept, Point { x: 2.0, y: -2.0 });

    let mut local: Vec<Rc<Point>> = Vec::new();
    select(points(factory), &mut local).expect("Failed to select rc points");
    assert!(!Rc::ptr_eq(&local[1], &local[2]));
    assert_eq!(local[1].y, -1.0);

    // Value elements are independent copies
    let mut values: Vec<Point> = Vec::new();
    select(points(factory), &mut values).expect("Failed to select points");
    values[0].y = 50.0;
    assert_eq!(values[1], Point { x: 1.0, y: -1.0 });
    assert_eq!(values[0], Point { x: 0.0, y: 50.0 });

    // Boxed scalars
    let cursor = factory.cursor(
        columns(&["label"]),
        vec![
            row([Value::Varchar(Some("a".into()))]),
            row([Value::Varchar(Some("b".into()))]),
        ],
    );
    let mut labels: Vec<Box<String>> = Vec::new();
    select(cursor, &mut labels).expect("Failed to select boxed labels");
    assert_eq!(
        labels.iter().map(|v| v.as_str()).collect::<Vec<_>>(),
        ["a", "b"]
    );
}
