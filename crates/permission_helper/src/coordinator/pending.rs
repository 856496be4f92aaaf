//! Pending permission request tracking
//!
//! This module manages the lifecycle of requests handed to the host prompt,
//! tracking each by its [`RequestId`] until the host reports back.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │ register()  │ → Allocate next id, store completion
//! └──────┬──────┘
//!        │
//!        ├─ Pending: HashMap<RequestId, Completion>
//!        │
//!        ↓
//! ┌─────────────┐
//! │   take()    │ → Remove completion, caller runs it outside the lock
//! └─────────────┘
//! ```
//!
//! Id allocation and insertion happen under one lock, so concurrent callers
//! never observe a gap or a duplicate.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::coordinator::outcome::{PermissionOutcome, RequestId};

/// Consumes the outcome of one request
pub type Completion = Box<dyn FnOnce(PermissionOutcome) + Send>;

struct Table {
    next_id: u64,
    entries: HashMap<RequestId, Completion>,
}

/// Tracks permission requests awaiting a host result
///
/// # Thread Safety
///
/// The table is protected by a Tokio Mutex and can be shared across tasks
/// by cloning.
#[derive(Clone)]
pub struct PendingRequests {
    inner: Arc<Mutex<Table>>,
}

impl PendingRequests {
    /// Create an empty tracker whose first id is 0
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(Table {
                next_id: 0,
                entries: HashMap::new(),
            })),
        }
    }

    /// Store a completion under a freshly allocated id
    ///
    /// # Arguments
    ///
    /// * `completion` - Runs exactly once with the outcome, after [`take`](Self::take)
    ///
    /// # Returns
    ///
    /// The allocated id. Ids start at 0 and are never reused.
    ///
    /// # Example
    ///
    /// ```
    /// use permission_helper::coordinator::pending::PendingRequests;
    /// use permission_helper::coordinator::RequestId;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pending = PendingRequests::new();
    /// let first = pending.register(Box::new(|_| {})).await;
    /// let second = pending.register(Box::new(|_| {})).await;
    ///
    /// assert_eq!(first, RequestId::new(0));
    /// assert_eq!(second, RequestId::new(1));
    /// # }
    /// ```
    pub async fn register(&self, completion: Completion) -> RequestId {
        let mut table = self.inner.lock().await;
        let id = RequestId::new(table.next_id);
        table.next_id += 1;
        table.entries.insert(id, completion);
        id
    }

    /// Remove and return the completion for `id`
    ///
    /// Whoever gets `Some` owns the outcome for that request; every other
    /// caller sees `None`.
    ///
    /// # Arguments
    ///
    /// * `id` - Id returned by [`register`](Self::register)
    ///
    /// # Returns
    ///
    /// * `Some(completion)` - The caller must run it, outside any lock
    /// * `None` - The id is unknown or was already taken
    ///
    /// # Example
    ///
    /// ```
    /// use permission_helper::coordinator::pending::PendingRequests;
    /// use permission_helper::coordinator::PermissionOutcome;
    ///
    /// # #[tokio::main]
    /// # async fn main() {
    /// let pending = PendingRequests::new();
    /// let id = pending.register(Box::new(|outcome| {
    ///     assert_eq!(outcome, PermissionOutcome::Denied);
    /// })).await;
    ///
    /// let completion = pending.take(id).await.expect("still pending");
    /// completion(PermissionOutcome::Denied);
    ///
    /// assert!(pending.take(id).await.is_none());
    /// # }
    /// ```
    pub async fn take(&self, id: RequestId) -> Option<Completion> {
        self.inner.lock().await.entries.remove(&id)
    }

    /// Remove and return every pending completion, oldest first
    pub async fn take_all(&self) -> Vec<(RequestId, Completion)> {
        let mut drained: Vec<_> = self.inner.lock().await.entries.drain().collect();
        drained.sort_by_key(|(id, _)| *id);
        drained
    }

    /// Number of pending requests
    pub async fn count(&self) -> usize {
        self.inner.lock().await.entries.len()
    }
}

impl Default for PendingRequests {
    fn default() -> Self {
        Self::new()
    }
}
