//! Manifest declaration sources
//!
//! An application may only request permissions it declared at packaging
//! time. A [`ManifestSource`] lists those declarations; the coordinator asks
//! it once and caches the answer in a [`ManifestCache`].
//!
//! Three sources ship with the crate:
//!
//! - [`StaticManifest`] - an in-memory list
//! - [`JsonManifest`] - parsed from a JSON manifest document
//! - [`ManifestFile`] - a JSON manifest document read from disk on first query
//!
//! # Document Format
//!
//! ```json
//! {
//!   "package": "com.example.app",
//!   "uses_permissions": ["android.permission.CAMERA"]
//! }
//! ```
//!
//! # Example
//!
//! ```
//! use permission_helper::manifest::{JsonManifest, ManifestSource};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let manifest = JsonManifest::parse(
//!     r#"{ "package": "com.example", "uses_permissions": ["android.permission.CAMERA"] }"#,
//! )?;
//! assert_eq!(manifest.package(), Some("com.example"));
//! assert_eq!(manifest.declared_permissions().await?, vec!["android.permission.CAMERA"]);
//! # Ok(())
//! # }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::debug;

use crate::error::PermissionError;

mod cache;

pub use cache::ManifestCache;

/// Source of the permissions an application declared
#[async_trait]
pub trait ManifestSource: Send + Sync {
    /// List every declared permission identifier
    ///
    /// # Errors
    ///
    /// Any error means the declarations are unavailable. The coordinator logs
    /// it and proceeds with an empty set.
    async fn declared_permissions(&self) -> Result<Vec<String>, PermissionError>;
}

/// Serialized manifest document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ManifestDocument {
    /// Application package name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub package: Option<String>,
    /// Declared permission identifiers
    #[serde(default)]
    pub uses_permissions: Vec<String>,
}

/// Fixed list of declared permissions
#[derive(Debug, Clone, Default)]
pub struct StaticManifest {
    permissions: Vec<String>,
}

impl StaticManifest {
    /// Create a manifest declaring `permissions`
    pub fn new<I, S>(permissions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            permissions: permissions.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ManifestSource for StaticManifest {
    async fn declared_permissions(&self) -> Result<Vec<String>, PermissionError> {
        Ok(self.permissions.clone())
    }
}

/// Manifest parsed from a JSON document
#[derive(Debug, Clone)]
pub struct JsonManifest {
    document: ManifestDocument,
}

impl JsonManifest {
    /// Parse a JSON manifest document
    ///
    /// # Errors
    ///
    /// - [`PermissionError::JsonDecode`] if `json` is malformed
    pub fn parse(json: &str) -> Result<Self, PermissionError> {
        let document = serde_json::from_str(json)?;
        Ok(Self { document })
    }

    /// Wrap an already parsed document
    pub fn from_document(document: ManifestDocument) -> Self {
        Self { document }
    }

    /// Package name, when the document carries one
    pub fn package(&self) -> Option<&str> {
        self.document.package.as_deref()
    }
}

#[async_trait]
impl ManifestSource for JsonManifest {
    async fn declared_permissions(&self) -> Result<Vec<String>, PermissionError> {
        Ok(self.document.uses_permissions.clone())
    }
}

/// JSON manifest document on disk
///
/// The file is read each time [`declared_permissions`](ManifestSource::declared_permissions)
/// is called; wrap it in a [`ManifestCache`] (the coordinator does) to read it once.
#[derive(Debug, Clone)]
pub struct ManifestFile {
    path: PathBuf,
}

impl ManifestFile {
    /// Create a source reading `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ManifestSource for ManifestFile {
    async fn declared_permissions(&self) -> Result<Vec<String>, PermissionError> {
        let contents = tokio::fs::read_to_string(&self.path).await.map_err(|e| {
            PermissionError::Manifest(format!("{}: {}", self.path.display(), e))
        })?;
        let document: ManifestDocument = serde_json::from_str(&contents)?;
        debug!(
            "Read {} declared permissions from {}",
            document.uses_permissions.len(),
            self.path.display()
        );
        Ok(document.uses_permissions)
    }
}
