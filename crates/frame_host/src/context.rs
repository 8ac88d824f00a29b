//! Host context snapshots shared by the host adapters and the frame runtime.

use serde::{Deserialize, Serialize};

/// Opaque host-assigned identity for a user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HostUserId(pub u64);

impl std::fmt::Display for HostUserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Authenticated host user identity as reported by the host SDK.
pub struct HostUser {
    /// Host-assigned user id.
    pub id: HostUserId,
    /// Handle shown by the host.
    #[serde(default)]
    pub username: Option<String>,
    /// Display name shown by the host.
    #[serde(default)]
    pub display_name: Option<String>,
    /// Avatar URL.
    #[serde(default)]
    pub pfp_url: Option<String>,
}

impl HostUser {
    /// Creates a user with only an id populated.
    pub fn new(id: u64) -> Self {
        Self {
            id: HostUserId(id),
            username: None,
            display_name: None,
            pfp_url: None,
        }
    }

    /// Sets the handle.
    pub fn with_username(mut self, username: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self
    }

    /// Sets the display name.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = Some(display_name.into());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Read-only snapshot of the host session.
///
/// The host owns this value. The runtime keeps the latest copy and reacts to changes, it never
/// writes back.
pub struct HostContext {
    /// Whether the user has added this app to their host app list.
    #[serde(default)]
    pub added: bool,
    /// Authenticated host user, when the host shares one.
    #[serde(default)]
    pub user: Option<HostUser>,
}

impl HostContext {
    /// Context for a signed-in user.
    pub fn for_user(user: HostUser) -> Self {
        Self {
            added: false,
            user: Some(user),
        }
    }

    /// Returns a copy with the `added` flag set.
    pub fn with_added(mut self, added: bool) -> Self {
        self.added = added;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn host_context_parses_camel_case_payload() {
        let context: HostContext = serde_json::from_value(serde_json::json!({
            "added": true,
            "user": {
                "id": 42,
                "username": "alice",
                "displayName": "Alice",
                "pfpUrl": "https://example.com/a.png"
            }
        }))
        .expect("context");

        assert!(context.added);
        let user = context.user.expect("user");
        assert_eq!(user.id, HostUserId(42));
        assert_eq!(user.display_name.as_deref(), Some("Alice"));
        assert_eq!(user.pfp_url.as_deref(), Some("https://example.com/a.png"));
    }

    #[test]
    fn missing_fields_default_to_not_added_and_anonymous() {
        let context: HostContext = serde_json::from_str("{}").expect("context");
        assert_eq!(context, HostContext::default());
    }
}
