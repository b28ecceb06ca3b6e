mod channel;
mod cursor;

pub use channel::*;
pub use cursor::*;
