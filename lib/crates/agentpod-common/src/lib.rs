pub mod exit_codes;
pub mod labels;
pub mod types;

pub use labels::LabelKey;
pub use types::*;
