mod card_operations;
mod file_operations;

pub use card_operations::*;
pub use file_operations::*;
