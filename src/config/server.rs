use crate::utils::error::Result;
use crate::utils::validation::{validate_non_empty_string, validate_positive_number, Validate};
use clap::Parser;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "csv-price-processor")]
#[command(about = "HTTP service that applies a percentage discount to a CSV price column")]
pub struct ServerConfig {
    #[arg(long, env = "PORT", default_value_t = 8080)]
    pub port: u16,

    #[arg(long, default_value = "0.0.0.0")]
    pub bind_address: String,

    #[arg(long, default_value_t = 10 * 1024 * 1024)]
    pub max_body_bytes: usize,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub log_json: bool,
}

impl Validate for ServerConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("bind_address", &self.bind_address)?;
        validate_positive_number("max_body_bytes", self.max_body_bytes, 1)?;
        Ok(())
    }
}
