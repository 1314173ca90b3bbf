// Stable asset identifiers

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// Unique identifier for an asset
///
/// Derived from the asset's source path so the same file always maps to the
/// same id; derived images (scaled, cropped) append a suffix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AssetId(pub(crate) u64);

impl AssetId {
    /// Create a new asset ID from a string path
    pub fn from_path(path: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        path.hash(&mut hasher);
        Self(hasher.finish())
    }

    /// Id of an image derived from this one (e.g. "scaled 115x115")
    pub fn derive(&self, suffix: &str) -> Self {
        let mut hasher = DefaultHasher::new();
        self.0.hash(&mut hasher);
        suffix.hash(&mut hasher);
        Self(hasher.finish())
    }
}
