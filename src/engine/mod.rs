pub mod generator;
pub mod parser;
pub mod prompt;
pub mod provider;

pub use generator::{FieldGenerator, FieldSource};
