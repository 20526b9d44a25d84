pub mod snapshot;
pub mod xlsx;

pub use snapshot::*;
pub use xlsx::*;
