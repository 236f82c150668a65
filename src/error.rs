//! Top-level error type.

use thiserror::Error;

use crate::config::ConfigError;
use crate::fetch::FetchError;
use crate::store::StoreError;

pub type Result<T> = std::result::Result<T, Error>;

/// Anything that ends a run.
#[derive(Debug, Error)]
pub enum Error {
    #[error("configuration: {0}")]
    Config(#[from] ConfigError),

    #[error("fetching playlist: {0}")]
    Fetch(#[from] FetchError),

    #[error("storage: {0}")]
    Store(#[from] StoreError),
}
