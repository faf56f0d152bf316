//! Environment map loading.
//!
//! Equirectangular images are decoded off the render thread and handed back
//! through a one-shot handle. Assets are identified by a content hash of
//! their source bytes.

mod environment;
mod loader;
mod progress;

pub use environment::{DynamicRange, EnvironmentMap};
pub use loader::EnvironmentLoad;
pub use progress::LoadingProgress;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Content-addressed asset ID computed from the asset data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn of_bytes(bytes: &[u8]) -> Self {
        let digest = Sha256::digest(bytes);
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);
        Self(u64::from_le_bytes(head))
    }
}

impl std::fmt::Display for AssetId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("decode error: {0}")]
    Decode(#[from] image::ImageError),
    #[error("unsupported image format: {0}")]
    UnsupportedFormat(String),
    #[error("loader thread ended without a result")]
    Disconnected,
}

pub fn crate_info() -> &'static str {
    "prism-assets v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn asset_id_is_content_addressed() {
        assert_eq!(AssetId::of_bytes(b"sky"), AssetId::of_bytes(b"sky"));
        assert_ne!(AssetId::of_bytes(b"sky"), AssetId::of_bytes(b"sea"));
    }

    #[test]
    fn asset_id_displays_as_hex() {
        assert_eq!(AssetId(0xab).to_string(), "00000000000000ab");
    }
}
