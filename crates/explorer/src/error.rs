use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExplorerError {
    #[error("I/O error at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Vault not found: {}", .0.display())]
    VaultNotFound(PathBuf),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
