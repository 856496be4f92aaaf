//! Lazily populated, read-once set of declared permissions.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::{debug, warn};

use crate::manifest::ManifestSource;

/// Caches the declared permission set of one [`ManifestSource`]
///
/// The source is queried on the first call to [`declared`](Self::declared)
/// and never again. A failed query caches an empty set, so every later
/// validation against a real permission fails as undeclared.
pub struct ManifestCache {
    source: Arc<dyn ManifestSource>,
    declared: OnceCell<HashSet<String>>,
}

impl ManifestCache {
    /// Wrap `source`; nothing is queried yet
    pub fn new(source: Arc<dyn ManifestSource>) -> Self {
        Self {
            source,
            declared: OnceCell::new(),
        }
    }

    /// The declared set, querying the source on first use
    pub async fn declared(&self) -> &HashSet<String> {
        self.declared
            .get_or_init(|| async {
                match self.source.declared_permissions().await {
                    Ok(permissions) => {
                        debug!("Cached {} manifest permissions", permissions.len());
                        permissions.into_iter().collect()
                    }
                    Err(e) => {
                        warn!("Manifest query failed, continuing with no declared permissions: {}", e);
                        HashSet::new()
                    }
                }
            })
            .await
    }

    /// Whether `permission` is declared
    pub async fn contains(&self, permission: &str) -> bool {
        self.declared().await.contains(permission)
    }
}
