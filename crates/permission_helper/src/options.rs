//! Configuration options and builder pattern for the permission coordinator
//!
//! This module provides [`CoordinatorOptions`], which controls how the
//! coordinator talks to the host: the tag its prompt registration is attached
//! under, the SDK level at which runtime grants start being enforced, and the
//! table of permissions that only exist from a given SDK level onwards.
//!
//! # Example
//!
//! ```
//! use permission_helper::options::CoordinatorOptions;
//!
//! let options = CoordinatorOptions::builder()
//!     .registration_tag("CameraScreen")
//!     .runtime_permissions_since(23)
//!     .min_sdk_permission("android.permission.POST_NOTIFICATIONS", 33)
//!     .build();
//!
//! assert_eq!(options.registration_tag, "CameraScreen");
//! assert_eq!(options.min_sdk_for("android.permission.POST_NOTIFICATIONS"), Some(33));
//! ```
//!
//! # Loading from JSON
//!
//! Every field has a default, so partial documents deserialize:
//!
//! ```
//! use permission_helper::options::CoordinatorOptions;
//!
//! let options: CoordinatorOptions =
//!     serde_json::from_str(r#"{ "registration_tag": "Settings" }"#).unwrap();
//! assert_eq!(options.runtime_permissions_since, 23);
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tag the prompt registration is attached under when none is configured
pub const DEFAULT_REGISTRATION_TAG: &str = "PermissionHelper";

/// First SDK level that enforces runtime grants (Android 6.0, "M")
pub const RUNTIME_PERMISSIONS_SDK: u32 = 23;

/// Permissions added in later SDK levels, with the level they appeared in
///
/// Every entry is at or below [`RUNTIME_PERMISSIONS_SDK`]. With the default
/// threshold, hosts old enough to lack one of these grant everything at
/// install time, so the table only skips a check once
/// `runtime_permissions_since` is lowered or a later permission is added.
const MIN_SDK_PERMISSIONS: &[(&str, u32)] = &[
    ("com.android.voicemail.permission.ADD_VOICEMAIL", 14),
    ("android.permission.BODY_SENSORS", 20),
    ("android.permission.READ_CALL_LOG", 16),
    ("android.permission.READ_EXTERNAL_STORAGE", 16),
    ("android.permission.USE_SIP", 9),
    ("android.permission.WRITE_CALL_LOG", 16),
    ("android.permission.SYSTEM_ALERT_WINDOW", 23),
    ("android.permission.WRITE_SETTINGS", 23),
];

/// Coordinator configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoordinatorOptions {
    /// Tag under which the prompt registration is found or attached on a host context
    pub registration_tag: String,
    /// SDK level from which grants are checked at runtime; below it everything is granted
    pub runtime_permissions_since: u32,
    /// Permission → first SDK level that knows about it
    pub min_sdk_permissions: HashMap<String, u32>,
}

impl CoordinatorOptions {
    /// Create a new builder seeded with the defaults
    pub fn builder() -> CoordinatorOptionsBuilder {
        CoordinatorOptionsBuilder::default()
    }

    /// Minimum SDK level for `permission`, if it is in the table
    pub fn min_sdk_for(&self, permission: &str) -> Option<u32> {
        self.min_sdk_permissions.get(permission).copied()
    }

    /// Whether `permission` exists at all on a host running `sdk_level`
    pub fn exists_on(&self, permission: &str, sdk_level: u32) -> bool {
        match self.min_sdk_for(permission) {
            Some(min) => sdk_level >= min,
            None => true,
        }
    }

    /// Whether a host running `sdk_level` gates permissions behind runtime grants
    pub fn enforces_runtime_grants(&self, sdk_level: u32) -> bool {
        sdk_level >= self.runtime_permissions_since
    }
}

impl Default for CoordinatorOptions {
    fn default() -> Self {
        Self {
            registration_tag: DEFAULT_REGISTRATION_TAG.to_string(),
            runtime_permissions_since: RUNTIME_PERMISSIONS_SDK,
            min_sdk_permissions: MIN_SDK_PERMISSIONS
                .iter()
                .map(|(name, level)| (name.to_string(), *level))
                .collect(),
        }
    }
}

/// Builder for [`CoordinatorOptions`]
#[derive(Debug, Default)]
pub struct CoordinatorOptionsBuilder {
    options: CoordinatorOptions,
}

impl CoordinatorOptionsBuilder {
    /// Set the registration tag
    pub fn registration_tag(mut self, tag: impl Into<String>) -> Self {
        self.options.registration_tag = tag.into();
        self
    }

    /// Set the SDK level from which runtime grants are enforced
    pub fn runtime_permissions_since(mut self, sdk_level: u32) -> Self {
        self.options.runtime_permissions_since = sdk_level;
        self
    }

    /// Replace the whole minimum-SDK table
    pub fn min_sdk_permissions(mut self, table: HashMap<String, u32>) -> Self {
        self.options.min_sdk_permissions = table;
        self
    }

    /// Add or override a single minimum-SDK entry
    pub fn min_sdk_permission(mut self, permission: impl Into<String>, sdk_level: u32) -> Self {
        self.options
            .min_sdk_permissions
            .insert(permission.into(), sdk_level);
        self
    }

    /// Build the options
    pub fn build(self) -> CoordinatorOptions {
        self.options
    }
}
