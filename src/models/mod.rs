pub mod employee;
pub mod setup;
pub mod training;

pub use employee::*;
pub use setup::*;
pub use training::*;
