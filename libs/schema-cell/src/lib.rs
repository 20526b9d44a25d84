pub mod error;
pub mod hospital;
pub mod models;
pub mod services;

pub use error::*;
pub use hospital::*;
pub use models::*;
pub use services::*;
