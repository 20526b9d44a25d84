pub mod generator;
pub mod patient;
pub mod seeding;

pub use generator::*;
pub use patient::*;
pub use seeding::*;
