//! Permission request coordination
//!
//! [`PermissionCoordinator`] owns everything a permission request needs
//! between the call site and the host prompt:
//!
//! - **Validation** - requested permissions must be declared in the manifest
//! - **Grant check** - requests already satisfied resolve immediately
//! - **Pending table** - in-flight requests keyed by [`RequestId`]
//! - **Dispatch** - host results are routed back to the right caller
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │                  PermissionCoordinator                   │
//! │                                                          │
//! │  request() ──→ validate() ──→ check_granted()            │
//! │                                   │                      │
//! │                  granted ←────────┴────────→ not granted │
//! │                     │                            │       │
//! │              resolve now          register + prompt host │
//! │                                                  │       │
//! │  on_permission_result(id, results) ←── host ─────┘       │
//! │        │                                                 │
//! │        └─→ take pending entry → run completion           │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```
//! use permission_helper::prelude::*;
//! use async_trait::async_trait;
//! use std::sync::Arc;
//!
//! struct LegacyHost;
//!
//! #[async_trait]
//! impl PermissionHost for LegacyHost {
//!     fn sdk_level(&self) -> u32 {
//!         21
//!     }
//!
//!     async fn check_self_permission(&self, _: &str) -> Result<GrantResult, PermissionError> {
//!         Ok(GrantResult::Denied)
//!     }
//! }
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), PermissionError> {
//! let coordinator = PermissionCoordinator::new(
//!     Arc::new(LegacyHost),
//!     Arc::new(StaticManifest::new(["android.permission.CAMERA"])),
//! );
//!
//! // Install-time grants: nothing to ask
//! assert!(coordinator.is_granted(&["android.permission.CAMERA"]).await?);
//!
//! // Undeclared permissions are a programming error
//! let err = coordinator.validate(&["android.permission.RECORD_AUDIO"]).await.unwrap_err();
//! assert!(err.is_invalid_argument());
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tracing::{debug, trace, warn};

use crate::error::PermissionError;
use crate::host::{GrantResult, HostContext, PermissionHost, PromptRegistration};
use crate::manifest::{ManifestCache, ManifestSource};
use crate::options::CoordinatorOptions;

mod outcome;
pub mod pending;

pub use outcome::{PermissionCallbacks, PermissionOutcome, PermissionRequest, RequestId};
use pending::{Completion, PendingRequests};

/// Tracks in-flight permission requests and dispatches their outcomes
///
/// One coordinator owns its manifest cache, request counter, and pending
/// table. Construct it once and share it (`Arc`) between the code issuing
/// requests and the host binding delivering results.
///
/// # Thread Safety
///
/// `PermissionCoordinator` is `Send + Sync`. Results may be delivered from
/// any task; the pending table is serialized behind a mutex and completions
/// run after it is released.
pub struct PermissionCoordinator {
    host: Arc<dyn PermissionHost>,
    manifest: ManifestCache,
    pending: PendingRequests,
    options: CoordinatorOptions,
}

impl PermissionCoordinator {
    /// Create a coordinator with default options
    pub fn new(host: Arc<dyn PermissionHost>, manifest: Arc<dyn ManifestSource>) -> Self {
        Self::with_options(host, manifest, CoordinatorOptions::default())
    }

    /// Create a coordinator with explicit options
    pub fn with_options(
        host: Arc<dyn PermissionHost>,
        manifest: Arc<dyn ManifestSource>,
        options: CoordinatorOptions,
    ) -> Self {
        Self {
            host,
            manifest: ManifestCache::new(manifest),
            pending: PendingRequests::default(),
            options,
        }
    }

    /// Options this coordinator was built with
    pub fn options(&self) -> &CoordinatorOptions {
        &self.options
    }

    /// Check that `permissions` is non-empty and fully declared in the manifest
    ///
    /// The manifest is queried on the first call and cached. A failed query
    /// leaves the declared set empty.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::EmptyPermissions`] if `permissions` is empty
    /// - [`PermissionError::NotDeclared`] for the first undeclared permission
    pub async fn validate<S>(&self, permissions: &[S]) -> Result<(), PermissionError>
    where
        S: AsRef<str> + Sync,
    {
        if permissions.is_empty() {
            return Err(PermissionError::EmptyPermissions);
        }

        for permission in permissions {
            let permission = permission.as_ref();
            if !self.manifest.contains(permission).await {
                return Err(PermissionError::NotDeclared {
                    permission: permission.to_string(),
                });
            }
        }
        Ok(())
    }

    /// Whether every permission in `permissions` is currently granted
    ///
    /// # Errors
    ///
    /// Same as [`validate`](Self::validate).
    pub async fn is_granted<S>(&self, permissions: &[S]) -> Result<bool, PermissionError>
    where
        S: AsRef<str> + Sync,
    {
        self.validate(permissions).await?;
        Ok(self.check_granted(permissions).await)
    }

    /// Request `permissions`, prompting the user through `context` if needed
    ///
    /// The returned [`PermissionRequest`] resolves once the host reports back.
    /// If everything is already granted it resolves to
    /// [`PermissionOutcome::Granted`] straight away and the host is never
    /// prompted.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::EmptyPermissions`] / [`PermissionError::NotDeclared`]
    ///   from validation, before any host interaction
    /// - [`PermissionError::Host`] if the prompt could not be started; nothing
    ///   is left pending in that case
    pub async fn request<S>(
        &self,
        context: &dyn HostContext,
        permissions: &[S],
    ) -> Result<PermissionRequest, PermissionError>
    where
        S: AsRef<str> + Sync,
    {
        let (tx, rx) = oneshot::channel();
        let completion: Completion = Box::new(move |outcome| {
            let _ = tx.send(outcome);
        });
        let request_id = self.dispatch(context, permissions, completion).await?;
        Ok(PermissionRequest::new(request_id, rx))
    }

    /// Callback form of [`request`](Self::request)
    ///
    /// Exactly one of the callbacks (if present) runs once the request
    /// resolves. When already granted, `on_granted` runs before this returns.
    ///
    /// Returns the request id handed to the host, or `None` when no prompt
    /// was needed.
    ///
    /// # Errors
    ///
    /// Same as [`request`](Self::request). No callback runs on error: a host
    /// that answers and then fails the prompt call gets `Ok` back.
    pub async fn request_with<S>(
        &self,
        context: &dyn HostContext,
        permissions: &[S],
        callbacks: PermissionCallbacks,
    ) -> Result<Option<RequestId>, PermissionError>
    where
        S: AsRef<str> + Sync,
    {
        let completion: Completion = Box::new(move |outcome| callbacks.dispatch(outcome));
        self.dispatch(context, permissions, completion).await
    }

    /// Deliver the host's answer for `request_id`
    ///
    /// Takes the pending entry out of the table and runs its completion with
    /// the folded outcome. The outcome is granted only if `grant_results` is
    /// non-empty and every entry is granted. Unknown or already resolved ids
    /// are logged and ignored.
    ///
    /// # Arguments
    ///
    /// * `request_id` - Correlation id the host was handed with the prompt
    /// * `permissions` - Permissions the host reports on (used for logging only)
    /// * `grant_results` - Per-permission results, in the same order
    ///
    /// # Returns
    ///
    /// * `true` - A pending request was resolved
    /// * `false` - The id is unknown, was already resolved, cancelled, or timed out
    ///
    /// # Example
    ///
    /// ```
    /// use permission_helper::prelude::*;
    /// use async_trait::async_trait;
    /// use std::sync::Arc;
    ///
    /// struct Host;
    ///
    /// #[async_trait]
    /// impl PermissionHost for Host {
    ///     fn sdk_level(&self) -> u32 {
    ///         30
    ///     }
    ///
    ///     async fn check_self_permission(&self, _: &str) -> Result<GrantResult, PermissionError> {
    ///         Ok(GrantResult::Denied)
    ///     }
    /// }
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let coordinator = PermissionCoordinator::new(
    ///     Arc::new(Host),
    ///     Arc::new(StaticManifest::new(["android.permission.CAMERA"])),
    /// );
    ///
    /// // A late or duplicate delivery resolves nothing
    /// let resolved = coordinator
    ///     .on_permission_result(RequestId::new(5), &["android.permission.CAMERA"], &[GrantResult::Granted])
    ///     .await;
    /// assert!(!resolved);
    /// # }
    /// ```
    pub async fn on_permission_result<S>(
        &self,
        request_id: RequestId,
        permissions: &[S],
        grant_results: &[GrantResult],
    ) -> bool
    where
        S: AsRef<str> + Sync,
    {
        let Some(completion) = self.pending.take(request_id).await else {
            warn!("Ignoring result for unknown or resolved request {}", request_id);
            return false;
        };

        let outcome = PermissionOutcome::from_results(grant_results);
        debug!(
            "Request {} resolved {:?} ({} permissions, {} results)",
            request_id,
            outcome,
            permissions.len(),
            grant_results.len()
        );
        completion(outcome);
        true
    }

    /// [`on_permission_result`](Self::on_permission_result) with raw platform codes
    pub async fn on_permission_result_codes<S>(
        &self,
        request_id: RequestId,
        permissions: &[S],
        grant_codes: &[i32],
    ) -> bool
    where
        S: AsRef<str> + Sync,
    {
        let grant_results: Vec<GrantResult> =
            grant_codes.iter().copied().map(GrantResult::from_code).collect();
        self.on_permission_result(request_id, permissions, &grant_results)
            .await
    }

    /// Resolve a pending request as denied, as if its context went away
    ///
    /// Returns `false` if `request_id` is not pending.
    pub async fn cancel(&self, request_id: RequestId) -> bool {
        match self.pending.take(request_id).await {
            Some(completion) => {
                debug!("Cancelled request {}", request_id);
                completion(PermissionOutcome::Denied);
                true
            }
            None => false,
        }
    }

    /// Resolve every pending request as denied and return how many there were
    ///
    /// Call this when the hosting context is torn down for good.
    pub async fn cancel_all(&self) -> usize {
        let drained = self.pending.take_all().await;
        let count = drained.len();
        for (request_id, completion) in drained {
            trace!("Cancelling request {}", request_id);
            completion(PermissionOutcome::Denied);
        }
        if count > 0 {
            debug!("Cancelled {} pending requests", count);
        }
        count
    }

    /// Wait for `request`, giving up after `timeout`
    ///
    /// On timeout the pending entry is dropped, so a late host result is
    /// ignored. If the host took the entry while the deadline was passing,
    /// its outcome wins over the timeout.
    ///
    /// # Errors
    ///
    /// - [`PermissionError::Timeout`] if no outcome arrived in time
    /// - [`PermissionError::Cancelled`] if the entry vanished without an outcome
    pub async fn await_outcome(
        &self,
        mut request: PermissionRequest,
        timeout: Duration,
    ) -> Result<PermissionOutcome, PermissionError> {
        match tokio::time::timeout(timeout, &mut request).await {
            Ok(result) => result,
            Err(_) => {
                let Some(request_id) = request.request_id() else {
                    return Err(PermissionError::Cancelled);
                };
                if self.pending.take(request_id).await.is_none() {
                    // Already taken by a delivery or cancel; its completion
                    // sends right after releasing the table.
                    debug!("Request {} resolved while timing out", request_id);
                    return request.await;
                }
                warn!("Request {} timed out after {:?}", request_id, timeout);
                Err(PermissionError::Timeout { request_id })
            }
        }
    }

    /// Number of requests still waiting for a host result
    pub async fn pending_count(&self) -> usize {
        self.pending.count().await
    }

    async fn dispatch<S>(
        &self,
        context: &dyn HostContext,
        permissions: &[S],
        completion: Completion,
    ) -> Result<Option<RequestId>, PermissionError>
    where
        S: AsRef<str> + Sync,
    {
        self.validate(permissions).await?;

        if self.check_granted(permissions).await {
            debug!("All {} permissions already granted", permissions.len());
            completion(PermissionOutcome::Granted);
            return Ok(None);
        }

        let registration = self.registration(context)?;
        let permissions: Vec<String> = permissions
            .iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        // Registered before prompting: the host may answer from another task
        // before request_permissions returns.
        let request_id = self.pending.register(completion).await;
        debug!("Prompting for {:?} as request {}", permissions, request_id);

        if let Err(e) = registration.request_permissions(&permissions, request_id) {
            if self.pending.take(request_id).await.is_none() {
                // The host answered before reporting the error; the
                // completion already ran, so the request counts as dispatched.
                warn!("Prompt for request {} reported {} after resolving", request_id, e);
                return Ok(Some(request_id));
            }
            warn!("Prompt for request {} failed: {}", request_id, e);
            return Err(e);
        }
        Ok(Some(request_id))
    }

    fn registration(
        &self,
        context: &dyn HostContext,
    ) -> Result<Arc<dyn PromptRegistration>, PermissionError> {
        let tag = self.options.registration_tag.as_str();
        match context.find_registration(tag) {
            Some(registration) => Ok(registration),
            None => {
                debug!("Attaching prompt registration under tag {}", tag);
                context.attach_registration(tag)
            }
        }
    }

    async fn check_granted<S>(&self, permissions: &[S]) -> bool
    where
        S: AsRef<str> + Sync,
    {
        let sdk_level = self.host.sdk_level();
        if !self.options.enforces_runtime_grants(sdk_level) {
            trace!("SDK {} grants permissions at install time", sdk_level);
            return true;
        }

        for permission in permissions {
            let permission = permission.as_ref();
            if !self.options.exists_on(permission, sdk_level) {
                trace!("{} does not exist on SDK {}, skipping", permission, sdk_level);
                continue;
            }
            match self.host.check_self_permission(permission).await {
                Ok(GrantResult::Granted) => trace!("{} granted", permission),
                Ok(GrantResult::Denied) => {
                    trace!("{} not granted", permission);
                    return false;
                }
                Err(e) => {
                    warn!("Grant check for {} failed, treating as denied: {}", permission, e);
                    return false;
                }
            }
        }
        true
    }
}
