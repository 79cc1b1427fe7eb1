//! # hap-api
//!
//! Client for the HAP open API. Credentials come from [`ApiConfig`]; every
//! endpoint returns the unwrapped `data` document as `serde_json::Value`
//! (the platform's documents are open-ended), with upstream failures
//! surfaced as [`HapError::Api`].
//!
//! ```rust,no_run
//! use hap_api::{ApiConfig, HapClient};
//!
//! # async fn example() -> hap_api::HapResult<()> {
//! let client = HapClient::new(ApiConfig::new("app-key", "sign"))?;
//! let app = client.app().info().await?;
//! println!("app: {}", app);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod transport;

pub use client::HapClient;
pub use config::ApiConfig;
pub use endpoints::ListRecordsQuery;
pub use error::{HapError, HapResult};
