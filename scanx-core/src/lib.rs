mod as_value;
mod classify;
mod cursor;
mod destination;
mod error;
mod iter;
mod mapper;
mod traversal;
mod util;
mod value;

pub use ::anyhow::Context;
pub use as_value::*;
pub use classify::*;
pub use cursor::*;
pub use destination::*;
pub use error::*;
pub use iter::*;
pub use mapper::*;
pub use traversal::*;
pub use util::*;
pub use value::*;
pub mod stream {
    pub use ::futures::stream::*;
}

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
