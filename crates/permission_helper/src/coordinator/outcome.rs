//! Request identity, outcomes, and the two ways of receiving them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::oneshot;

use crate::error::PermissionError;
use crate::host::GrantResult;

/// Correlation token handed to the host with each prompt
///
/// Allocated from a per-coordinator counter starting at 0. Ids are never
/// reused within one coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RequestId(u64);

impl RequestId {
    /// Wrap a raw id, e.g. one echoed back by the host
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Raw numeric value
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for RequestId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Final outcome of a permission request
///
/// `Granted` only when every requested permission was granted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionOutcome {
    /// Every requested permission is granted
    Granted,
    /// At least one permission was denied, or no results came back
    Denied,
}

impl PermissionOutcome {
    /// Fold per-permission results into an outcome
    ///
    /// ```
    /// use permission_helper::coordinator::PermissionOutcome;
    /// use permission_helper::host::GrantResult;
    ///
    /// assert_eq!(PermissionOutcome::from_results(&[GrantResult::Granted]), PermissionOutcome::Granted);
    /// assert_eq!(PermissionOutcome::from_results(&[]), PermissionOutcome::Denied);
    /// ```
    pub fn from_results(results: &[GrantResult]) -> Self {
        if GrantResult::all_granted(results) {
            PermissionOutcome::Granted
        } else {
            PermissionOutcome::Denied
        }
    }

    /// Whether this is [`PermissionOutcome::Granted`]
    pub fn is_granted(self) -> bool {
        matches!(self, PermissionOutcome::Granted)
    }
}

/// Optional granted/denied callbacks for [`request_with`](super::PermissionCoordinator::request_with)
///
/// At most one of them runs per request: the one matching the outcome.
///
/// # Example
///
/// ```
/// use permission_helper::coordinator::{PermissionCallbacks, PermissionOutcome};
/// use std::sync::atomic::{AtomicBool, Ordering};
/// use std::sync::Arc;
///
/// let granted = Arc::new(AtomicBool::new(false));
/// let flag = granted.clone();
///
/// let callbacks = PermissionCallbacks::new()
///     .on_granted(move || flag.store(true, Ordering::SeqCst))
///     .on_denied(|| eprintln!("camera denied"));
///
/// callbacks.dispatch(PermissionOutcome::Granted);
/// assert!(granted.load(Ordering::SeqCst));
/// ```
#[derive(Default)]
pub struct PermissionCallbacks {
    on_granted: Option<Box<dyn FnOnce() + Send>>,
    on_denied: Option<Box<dyn FnOnce() + Send>>,
}

impl PermissionCallbacks {
    /// No callbacks
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` when every permission is granted
    pub fn on_granted(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_granted = Some(Box::new(f));
        self
    }

    /// Run `f` when any permission is denied
    pub fn on_denied(mut self, f: impl FnOnce() + Send + 'static) -> Self {
        self.on_denied = Some(Box::new(f));
        self
    }

    /// Consume the callbacks, running the one matching `outcome`
    pub fn dispatch(self, outcome: PermissionOutcome) {
        let callback = match outcome {
            PermissionOutcome::Granted => self.on_granted,
            PermissionOutcome::Denied => self.on_denied,
        };
        if let Some(callback) = callback {
            callback();
        }
    }
}

impl fmt::Debug for PermissionCallbacks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PermissionCallbacks")
            .field("on_granted", &self.on_granted.is_some())
            .field("on_denied", &self.on_denied.is_some())
            .finish()
    }
}

/// Handle to an issued permission request
///
/// Resolves to the request's [`PermissionOutcome`]. Requests satisfied by the
/// current grant state resolve immediately and carry no [`RequestId`].
///
/// # Errors
///
/// - [`PermissionError::Cancelled`] if the pending entry was dropped without
///   an outcome (for instance after a timeout elsewhere)
#[derive(Debug)]
pub struct PermissionRequest {
    request_id: Option<RequestId>,
    rx: oneshot::Receiver<PermissionOutcome>,
}

impl PermissionRequest {
    pub(crate) fn new(request_id: Option<RequestId>, rx: oneshot::Receiver<PermissionOutcome>) -> Self {
        Self { request_id, rx }
    }

    /// Correlation id handed to the host, `None` if no prompt was needed
    pub fn request_id(&self) -> Option<RequestId> {
        self.request_id
    }
}

impl Future for PermissionRequest {
    type Output = Result<PermissionOutcome, PermissionError>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        Pin::new(&mut self.get_mut().rx)
            .poll(cx)
            .map(|result| result.map_err(|_| PermissionError::Cancelled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn counting_callbacks() -> (PermissionCallbacks, Arc<AtomicUsize>, Arc<AtomicUsize>) {
        let granted = Arc::new(AtomicUsize::new(0));
        let denied = Arc::new(AtomicUsize::new(0));
        let g = granted.clone();
        let d = denied.clone();
        let callbacks = PermissionCallbacks::new()
            .on_granted(move || {
                g.fetch_add(1, Ordering::SeqCst);
            })
            .on_denied(move || {
                d.fetch_add(1, Ordering::SeqCst);
            });
        (callbacks, granted, denied)
    }

    #[test]
    fn test_dispatch_granted_runs_only_granted() {
        let (callbacks, granted, denied) = counting_callbacks();
        callbacks.dispatch(PermissionOutcome::Granted);
        assert_eq!(granted.load(Ordering::SeqCst), 1);
        assert_eq!(denied.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_dispatch_denied_runs_only_denied() {
        let (callbacks, granted, denied) = counting_callbacks();
        callbacks.dispatch(PermissionOutcome::Denied);
        assert_eq!(granted.load(Ordering::SeqCst), 0);
        assert_eq!(denied.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_with_missing_callback_is_noop() {
        let callbacks = PermissionCallbacks::new();
        callbacks.dispatch(PermissionOutcome::Granted);
        let callbacks = PermissionCallbacks::new().on_granted(|| panic!("must not run"));
        callbacks.dispatch(PermissionOutcome::Denied);
    }

    #[test]
    fn test_outcome_from_results() {
        use GrantResult::*;
        assert_eq!(
            PermissionOutcome::from_results(&[Granted, Granted]),
            PermissionOutcome::Granted
        );
        assert_eq!(
            PermissionOutcome::from_results(&[Granted, Denied]),
            PermissionOutcome::Denied
        );
        assert_eq!(PermissionOutcome::from_results(&[]), PermissionOutcome::Denied);
    }

    #[test]
    fn test_request_id_display_and_serde() {
        let id = RequestId::new(42);
        assert_eq!(id.to_string(), "42");
        assert_eq!(serde_json::to_string(&id).unwrap(), "42");
        assert_eq!(RequestId::from(3).value(), 3);
    }

    #[tokio::test]
    async fn test_request_resolves_from_channel() {
        let (tx, rx) = oneshot::channel();
        let request = PermissionRequest::new(Some(RequestId::new(0)), rx);
        assert_eq!(request.request_id(), Some(RequestId::new(0)));

        tx.send(PermissionOutcome::Denied).unwrap();
        assert_eq!(request.await.unwrap(), PermissionOutcome::Denied);
    }

    #[tokio::test]
    async fn test_request_dropped_sender_is_cancelled() {
        let (tx, rx) = oneshot::channel::<PermissionOutcome>();
        let request = PermissionRequest::new(Some(RequestId::new(1)), rx);
        drop(tx);
        assert!(matches!(request.await, Err(PermissionError::Cancelled)));
    }
}
