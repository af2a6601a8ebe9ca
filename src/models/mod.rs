mod field;
mod layout;

pub use field::*;
pub use layout::*;
