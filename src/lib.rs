pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

pub use crate::config::ServerConfig;
pub use crate::core::adjuster::{PriceAdjuster, PRICE_COLUMN_CANDIDATES};
pub use crate::core::table::{Cell, Table};
pub use crate::core::{AdjustOutcome, Summary};
pub use crate::http::build_router;
pub use crate::utils::error::{ProcessorError, Result};
