pub mod config;
pub mod error;
pub mod explorer;
pub mod render;
pub mod vault;

pub use config::ExplorerConfig;
pub use error::{ExplorerError, Result};
pub use explorer::Explorer;
pub use vault::Vault;
