//! HTTP implementation of the attend [`Gateway`](attend_core::gateway::Gateway)
//! and file-backed token persistence.
//!
//! ```rust,ignore
//! let session = Arc::new(SessionStore::new(FileTokenStorage::new(path)));
//! let gateway = HttpGateway::new(GatewayConfig::default(), session.clone())?;
//! ```

pub mod gateway;
pub mod storage;

pub use gateway::{GatewayConfig, HttpGateway};
pub use storage::FileTokenStorage;
