//! Host permission runtime abstraction
//!
//! The coordinator never talks to the operating system directly. Everything
//! platform-specific sits behind three traits:
//!
//! - [`PermissionHost`] - SDK level and the current grant status of a permission
//! - [`HostContext`] - a UI context able to host the permission prompt
//! - [`PromptRegistration`] - the per-context object that shows the prompt and
//!   later delivers its result back to the coordinator
//!
//! # Result Delivery
//!
//! A [`PromptRegistration`] only starts the prompt. When the platform reports
//! back, the binding calls
//! [`PermissionCoordinator::on_permission_result`](crate::coordinator::PermissionCoordinator::on_permission_result)
//! with the same request id it was handed. That call can come from any task.
//!
//! # Example
//!
//! ```
//! use permission_helper::error::PermissionError;
//! use permission_helper::host::{GrantResult, PermissionHost};
//! use async_trait::async_trait;
//!
//! struct InstallTimeHost;
//!
//! #[async_trait]
//! impl PermissionHost for InstallTimeHost {
//!     fn sdk_level(&self) -> u32 {
//!         21
//!     }
//!
//!     async fn check_self_permission(
//!         &self,
//!         _permission: &str,
//!     ) -> Result<GrantResult, PermissionError> {
//!         Ok(GrantResult::Granted)
//!     }
//! }
//! ```

use async_trait::async_trait;
use std::sync::Arc;

use crate::coordinator::RequestId;
use crate::error::PermissionError;

mod grant;

pub use grant::{GrantResult, PERMISSION_DENIED, PERMISSION_GRANTED};

/// Process-level view of the host permission runtime
///
/// # Thread Safety
///
/// Implementations are shared by the coordinator across tasks (`Send + Sync`).
#[async_trait]
pub trait PermissionHost: Send + Sync {
    /// API level of the running platform
    fn sdk_level(&self) -> u32;

    /// Current grant status of one permission
    ///
    /// # Errors
    ///
    /// - [`PermissionError::Host`] if the platform query fails. The coordinator
    ///   treats this as "not granted".
    async fn check_self_permission(&self, permission: &str) -> Result<GrantResult, PermissionError>;
}

/// A UI context capable of hosting the permission prompt
///
/// Each context holds at most one [`PromptRegistration`], keyed by a tag.
/// The coordinator looks it up first and only attaches a new one when none
/// exists.
pub trait HostContext: Send + Sync {
    /// Registration previously attached under `tag`, if any
    fn find_registration(&self, tag: &str) -> Option<Arc<dyn PromptRegistration>>;

    /// Attach a fresh registration under `tag` and return it
    ///
    /// # Errors
    ///
    /// - [`PermissionError::Host`] if the context cannot host one (e.g. it is finishing)
    fn attach_registration(&self, tag: &str) -> Result<Arc<dyn PromptRegistration>, PermissionError>;
}

/// Starts the platform permission prompt for one request
pub trait PromptRegistration: Send + Sync {
    /// Prompt the user for `permissions`, correlating the answer with `request_id`
    ///
    /// Fire-and-forget: the result arrives later through
    /// [`PermissionCoordinator::on_permission_result`](crate::coordinator::PermissionCoordinator::on_permission_result).
    ///
    /// # Errors
    ///
    /// - [`PermissionError::Host`] if the prompt could not be started
    fn request_permissions(
        &self,
        permissions: &[String],
        request_id: RequestId,
    ) -> Result<(), PermissionError>;
}
