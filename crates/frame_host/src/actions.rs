//! Payload types for host-mediated actions.

use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Result returned by the host after the user adds the app.
pub struct AddToHostResult {
    /// Notification delivery URL issued by the host.
    #[serde(default)]
    pub url: Option<String>,
    /// Notification token issued by the host.
    #[serde(default)]
    pub token: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Notification request forwarded to the host.
pub struct NotificationConfig {
    /// Notification title.
    pub title: String,
    /// Notification body text.
    pub body: String,
    /// Optional icon URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Optional badge URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
    /// Optional tag used by the host to collapse notifications.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    /// Whether the host should only deliver in response to a user gesture.
    #[serde(default)]
    pub require_user_gesture: bool,
}

impl NotificationConfig {
    /// Creates a notification with title and body only.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            icon: None,
            badge: None,
            tag: None,
            require_user_gesture: false,
        }
    }

    /// Sets the collapse tag.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Configuration for the host-rendered primary action button.
pub struct PrimaryActionConfig {
    /// Button label.
    pub text: String,
    /// Whether the button renders disabled.
    #[serde(default)]
    pub disabled: bool,
    /// Whether the host hides the button.
    #[serde(default)]
    pub hidden: bool,
}

impl PrimaryActionConfig {
    /// Creates an enabled, visible button with `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: false,
            hidden: false,
        }
    }
}

/// Click handler the host invokes when the user activates the primary action button.
pub type PrimaryActionCallback = Rc<dyn Fn()>;
