pub mod adjuster;
pub mod table;

pub use crate::domain::model::{AdjustOutcome, Summary};
