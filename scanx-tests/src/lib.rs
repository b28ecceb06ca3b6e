mod decode;
mod missing;
#[cfg(not(feature = "disable-nested"))]
mod nested;
mod pointers;
mod scalars;
mod simple;
mod types;

use decode::decode;
use log::LevelFilter;
use missing::missing;
#[cfg(not(feature = "disable-nested"))]
use nested::nested;
use pointers::pointers;
use scalars::scalars;
use scanx::{ColumnInfo, Cursor, Row, Value};
use simple::simple;
use std::env;
use types::types;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}

/// Builds a fresh cursor over the given columns and rows, in order.
pub trait CursorFactory {
    type Cursor: Cursor;
    fn cursor(&self, columns: Vec<ColumnInfo>, rows: Vec<Row>) -> Self::Cursor;
}

impl<F, C> CursorFactory for F
where
    F: Fn(Vec<ColumnInfo>, Vec<Row>) -> C,
    C: Cursor,
{
    type Cursor = C;
    fn cursor(&self, columns: Vec<ColumnInfo>, rows: Vec<Row>) -> C {
        self(columns, rows)
    }
}

pub fn columns(names: &[&str]) -> Vec<ColumnInfo> {
    names.iter().map(|name| ColumnInfo::new(*name)).collect()
}

pub fn row(values: impl IntoIterator<Item = Value>) -> Row {
    values.into_iter().collect()
}

pub fn execute_tests<F: CursorFactory>(factory: F) {
    simple(&factory);
    missing(&factory);
    scalars(&factory);
    pointers(&factory);
    types(&factory);
    decode(&factory);
    #[cfg(not(feature = "disable-nested"))]
    nested(&factory);
}
