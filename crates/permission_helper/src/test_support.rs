//! In-process fakes of the host runtime for unit tests.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use crate::coordinator::RequestId;
use crate::error::PermissionError;
use crate::host::{GrantResult, HostContext, PermissionHost, PromptRegistration};

/// Host with a fixed SDK level and a mutable grant table
pub struct FakeHost {
    sdk_level: u32,
    granted: Mutex<HashSet<String>>,
    failing: HashSet<String>,
    pub checks: Mutex<Vec<String>>,
}

impl FakeHost {
    pub fn new(sdk_level: u32) -> Self {
        Self {
            sdk_level,
            granted: Mutex::new(HashSet::new()),
            failing: HashSet::new(),
            checks: Mutex::new(Vec::new()),
        }
    }

    pub fn granting(self, permission: &str) -> Self {
        self.granted.lock().unwrap().insert(permission.to_string());
        self
    }

    pub fn failing_on(mut self, permission: &str) -> Self {
        self.failing.insert(permission.to_string());
        self
    }

    pub fn checked(&self) -> Vec<String> {
        self.checks.lock().unwrap().clone()
    }
}

#[async_trait]
impl PermissionHost for FakeHost {
    fn sdk_level(&self) -> u32 {
        self.sdk_level
    }

    async fn check_self_permission(&self, permission: &str) -> Result<GrantResult, PermissionError> {
        self.checks.lock().unwrap().push(permission.to_string());
        if self.failing.contains(permission) {
            return Err(PermissionError::Host(format!("cannot query {}", permission)));
        }
        Ok(self.granted.lock().unwrap().contains(permission).into())
    }
}

/// Registration that records every prompt it was asked to show
#[derive(Default)]
pub struct RecordingRegistration {
    pub prompts: Mutex<Vec<(Vec<String>, RequestId)>>,
    pub fail: bool,
}

impl RecordingRegistration {
    pub fn prompts(&self) -> Vec<(Vec<String>, RequestId)> {
        self.prompts.lock().unwrap().clone()
    }
}

impl PromptRegistration for RecordingRegistration {
    fn request_permissions(
        &self,
        permissions: &[String],
        request_id: RequestId,
    ) -> Result<(), PermissionError> {
        if self.fail {
            return Err(PermissionError::Host("prompt rejected".to_string()));
        }
        self.prompts
            .lock()
            .unwrap()
            .push((permissions.to_vec(), request_id));
        Ok(())
    }
}

/// Context holding registrations by tag and counting attachments
#[derive(Default)]
pub struct FakeContext {
    pub registrations: Mutex<HashMap<String, Arc<RecordingRegistration>>>,
    pub attaches: AtomicUsize,
    pub failing_prompts: bool,
    pub finishing: bool,
}

impl FakeContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn registration(&self, tag: &str) -> Option<Arc<RecordingRegistration>> {
        self.registrations.lock().unwrap().get(tag).cloned()
    }

    pub fn attach_count(&self) -> usize {
        self.attaches.load(Ordering::SeqCst)
    }
}

impl HostContext for FakeContext {
    fn find_registration(&self, tag: &str) -> Option<Arc<dyn PromptRegistration>> {
        self.registration(tag)
            .map(|r| r as Arc<dyn PromptRegistration>)
    }

    fn attach_registration(&self, tag: &str) -> Result<Arc<dyn PromptRegistration>, PermissionError> {
        if self.finishing {
            return Err(PermissionError::Host("context is finishing".to_string()));
        }
        self.attaches.fetch_add(1, Ordering::SeqCst);
        let registration = Arc::new(RecordingRegistration {
            prompts: Mutex::new(Vec::new()),
            fail: self.failing_prompts,
        });
        self.registrations
            .lock()
            .unwrap()
            .insert(tag.to_string(), registration.clone());
        Ok(registration)
    }
}
