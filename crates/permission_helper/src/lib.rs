//! Permission Helper - runtime permission requests behind an outcome-based API
//!
//! Mobile platforms gate sensitive capabilities (camera, contacts, storage)
//! behind a runtime prompt. This crate wraps that flow:
//!
//! 1. **Validate** - every requested permission must be declared in the manifest
//! 2. **Check** - permissions already granted resolve immediately
//! 3. **Prompt** - otherwise the host shows its dialog and reports back later
//! 4. **Dispatch** - the result reaches the caller exactly once, as granted or denied
//!
//! # Architecture
//!
//! - `coordinator`: [`PermissionCoordinator`](coordinator::PermissionCoordinator),
//!   the pending-request table, and outcome types
//! - `host`: traits the platform binding implements
//! - `manifest`: declared-permission sources and their cache
//! - `options`: coordinator configuration
//! - `error`: error types
//!
//! # Example
//!
//! ```rust
//! use permission_helper::prelude::*;
//! use async_trait::async_trait;
//! use std::sync::{Arc, Mutex};
//!
//! struct Host;
//!
//! #[async_trait]
//! impl PermissionHost for Host {
//!     fn sdk_level(&self) -> u32 {
//!         34
//!     }
//!
//!     async fn check_self_permission(&self, _: &str) -> Result<GrantResult, PermissionError> {
//!         Ok(GrantResult::Denied)
//!     }
//! }
//!
//! // Remembers what it was asked to prompt for
//! #[derive(Default)]
//! struct Dialog(Mutex<Vec<RequestId>>);
//!
//! impl PromptRegistration for Dialog {
//!     fn request_permissions(&self, _: &[String], id: RequestId) -> Result<(), PermissionError> {
//!         self.0.lock().unwrap().push(id);
//!         Ok(())
//!     }
//! }
//!
//! struct Screen(Arc<Dialog>);
//!
//! impl HostContext for Screen {
//!     fn find_registration(&self, _: &str) -> Option<Arc<dyn PromptRegistration>> {
//!         Some(self.0.clone())
//!     }
//!
//!     fn attach_registration(&self, _: &str) -> Result<Arc<dyn PromptRegistration>, PermissionError> {
//!         Ok(self.0.clone())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), PermissionError> {
//!     let coordinator = Arc::new(PermissionCoordinator::new(
//!         Arc::new(Host),
//!         Arc::new(StaticManifest::new(["android.permission.CAMERA"])),
//!     ));
//!     let screen = Screen(Arc::new(Dialog::default()));
//!
//!     let request = coordinator.request(&screen, &["android.permission.CAMERA"]).await?;
//!     let id = request.request_id().expect("prompt was shown");
//!
//!     // Later, the platform binding forwards the user's answer
//!     coordinator
//!         .on_permission_result(id, &["android.permission.CAMERA"], &[GrantResult::Granted])
//!         .await;
//!
//!     match request.await? {
//!         PermissionOutcome::Granted => println!("camera ready"),
//!         PermissionOutcome::Denied => println!("camera unavailable"),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # License
//!
//! Licensed under MIT. See LICENSE file for details.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Permission request coordination
///
/// This module provides `PermissionCoordinator`, which validates requests,
/// checks current grants, prompts through the host, and routes results back.
/// It also defines `RequestId`, `PermissionOutcome`, `PermissionRequest`,
/// and `PermissionCallbacks`.
pub mod coordinator;

/// Host permission runtime abstraction
///
/// Traits the platform binding implements: `PermissionHost` for grant
/// queries, `HostContext` and `PromptRegistration` for showing the prompt.
pub mod host;

/// Manifest declaration sources
///
/// `ManifestSource` lists declared permissions; `ManifestCache` queries it
/// once. Ships with `StaticManifest`, `JsonManifest` and `ManifestFile`.
pub mod manifest;

/// Error types and utilities
///
/// This module defines the `PermissionError` enum:
///
/// - `EmptyPermissions` - no permissions requested
/// - `NotDeclared` - permission missing from the manifest
/// - `Manifest` - manifest source unavailable
/// - `Host` - host runtime failure
/// - `Cancelled` - request dropped without an outcome
/// - `Timeout` - request did not resolve in time
/// - `Io` - filesystem errors (auto-converts from `std::io::Error`)
/// - `JsonDecode` - manifest parsing (auto-converts from `serde_json::Error`)
pub mod error;

/// Configuration options and builder
///
/// This module provides `CoordinatorOptions`: registration tag, runtime-grant
/// SDK threshold, and the minimum-SDK permission table.
pub mod options;

#[cfg(test)]
pub(crate) mod test_support;

// Prelude module for common imports
pub mod prelude {
    //! Common imports for permission_helper users
    //!
    //! Use `use permission_helper::prelude::*;` to import commonly used types.

    pub use crate::coordinator::{
        PermissionCallbacks, PermissionCoordinator, PermissionOutcome, PermissionRequest,
        RequestId,
    };
    pub use crate::error::PermissionError;
    pub use crate::host::{GrantResult, HostContext, PermissionHost, PromptRegistration};
    pub use crate::manifest::{JsonManifest, ManifestFile, ManifestSource, StaticManifest};
    pub use crate::options::CoordinatorOptions;
}
