//! Per-permission grant results reported by the host.

use serde::{Deserialize, Serialize};

/// Platform code for a granted permission (`PackageManager.PERMISSION_GRANTED`)
pub const PERMISSION_GRANTED: i32 = 0;

/// Platform code for a denied permission (`PackageManager.PERMISSION_DENIED`)
pub const PERMISSION_DENIED: i32 = -1;

/// Outcome of a grant check or prompt for a single permission
///
/// # Examples
///
/// ```
/// use permission_helper::host::GrantResult;
///
/// assert_eq!(GrantResult::from_code(0), GrantResult::Granted);
/// assert_eq!(GrantResult::from_code(-1), GrantResult::Denied);
/// assert!(GrantResult::all_granted(&[GrantResult::Granted, GrantResult::Granted]));
/// assert!(!GrantResult::all_granted(&[]));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantResult {
    /// The user (or install-time policy) granted the permission
    Granted,
    /// The permission is not granted
    Denied,
}

impl GrantResult {
    /// Convert a platform result code; anything other than granted is a denial
    pub fn from_code(code: i32) -> Self {
        if code == PERMISSION_GRANTED {
            GrantResult::Granted
        } else {
            GrantResult::Denied
        }
    }

    /// Platform result code for this result
    pub fn to_code(self) -> i32 {
        match self {
            GrantResult::Granted => PERMISSION_GRANTED,
            GrantResult::Denied => PERMISSION_DENIED,
        }
    }

    /// Whether this result is a grant
    pub fn is_granted(self) -> bool {
        matches!(self, GrantResult::Granted)
    }

    /// True iff `results` is non-empty and every element is granted
    ///
    /// An empty slice is a denial: the platform delivers no results when the
    /// requesting context was replaced before the prompt completed.
    pub fn all_granted(results: &[GrantResult]) -> bool {
        !results.is_empty() && results.iter().all(|r| r.is_granted())
    }
}

impl From<i32> for GrantResult {
    fn from(code: i32) -> Self {
        GrantResult::from_code(code)
    }
}

impl From<bool> for GrantResult {
    fn from(granted: bool) -> Self {
        if granted {
            GrantResult::Granted
        } else {
            GrantResult::Denied
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_codes_are_denials() {
        assert_eq!(GrantResult::from_code(1), GrantResult::Denied);
        assert_eq!(GrantResult::from_code(i32::MIN), GrantResult::Denied);
        assert_eq!(GrantResult::from(0), GrantResult::Granted);
    }

    #[test]
    fn test_codes_match_platform() {
        assert_eq!(GrantResult::Granted.to_code(), 0);
        assert_eq!(GrantResult::Denied.to_code(), -1);
    }

    #[test]
    fn test_all_granted() {
        use GrantResult::*;

        assert!(GrantResult::all_granted(&[Granted]));
        assert!(!GrantResult::all_granted(&[Granted, Denied]));
        assert!(!GrantResult::all_granted(&[Denied, Granted]));
        assert!(!GrantResult::all_granted(&[]));
    }

    #[test]
    fn test_serde_snake_case() {
        let json = serde_json::to_string(&GrantResult::Granted).unwrap();
        assert_eq!(json, "\"granted\"");
        let parsed: GrantResult = serde_json::from_str("\"denied\"").unwrap();
        assert_eq!(parsed, GrantResult::Denied);
    }
}
