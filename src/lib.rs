pub mod audit;
pub mod error;
pub mod shell;

pub mod core;
pub mod highlight;
pub mod input;
pub mod path;
