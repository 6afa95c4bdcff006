//! Connection, path and lease types carried through the chain.

mod connection;
mod id;
mod path;
mod timestamp;

pub use connection::*;
pub use id::*;
pub use path::*;
pub use timestamp::*;
