pub mod indexes;
pub mod schema;
pub mod views;

pub use indexes::*;
pub use schema::*;
pub use views::*;
