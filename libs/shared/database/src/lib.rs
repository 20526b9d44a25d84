pub mod catalog;
pub mod connection;
pub mod error;

pub use catalog::*;
pub use connection::*;
pub use error::*;
