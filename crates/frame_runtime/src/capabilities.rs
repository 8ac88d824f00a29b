//! Capability resolution from connection status, host context, and host entry points.

use frame_host::{HostContext, HostEntryPoints};
use serde::{Deserialize, Serialize};

use crate::connection::FrameStatus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// What the app may ask the host to do right now.
pub struct CapabilitySet {
    /// Notifications can be delivered.
    pub can_notify: bool,
    /// External URLs can be opened.
    pub can_open_url: bool,
    /// Profiles can be shown.
    pub can_view_profile: bool,
    /// The app can ask to be added to the user's host.
    pub can_add_to_host: bool,
    /// A wallet provider is exposed.
    pub has_wallet: bool,
    /// The host renders a primary action button.
    pub supports_primary_action: bool,
}

impl CapabilitySet {
    /// Every capability disabled.
    pub const fn none() -> Self {
        Self {
            can_notify: false,
            can_open_url: false,
            can_view_profile: false,
            can_add_to_host: false,
            has_wallet: false,
            supports_primary_action: false,
        }
    }
}

/// Derives the capability set. Nothing is available unless `status` is [`FrameStatus::Ready`].
pub fn resolve_capabilities(
    status: FrameStatus,
    context: Option<&HostContext>,
    entry_points: HostEntryPoints,
) -> CapabilitySet {
    if status != FrameStatus::Ready {
        return CapabilitySet::none();
    }

    CapabilitySet {
        can_notify: context.is_some_and(|context| context.added),
        can_open_url: entry_points.open_url,
        can_view_profile: entry_points.view_profile,
        can_add_to_host: entry_points.add_to_host,
        has_wallet: context.is_some() && entry_points.wallet,
        supports_primary_action: entry_points.primary_action,
    }
}

#[cfg(test)]
mod tests {
    use frame_host::HostUser;
    use pretty_assertions::assert_eq;

    use super::*;

    const NOT_READY: [FrameStatus; 4] = [
        FrameStatus::Initializing,
        FrameStatus::Connecting,
        FrameStatus::Error,
        FrameStatus::Disconnected,
    ];

    #[test]
    fn nothing_is_available_before_ready() {
        let context = HostContext::for_user(HostUser::new(1)).with_added(true);
        for status in NOT_READY {
            assert_eq!(
                resolve_capabilities(status, Some(&context), HostEntryPoints::all()),
                CapabilitySet::none()
            );
        }
    }

    #[test]
    fn toggling_added_flips_only_notify() {
        let context = HostContext::for_user(HostUser::new(1));
        let before = resolve_capabilities(FrameStatus::Ready, Some(&context), HostEntryPoints::all());
        let added = context.clone().with_added(true);
        let after = resolve_capabilities(FrameStatus::Ready, Some(&added), HostEntryPoints::all());

        assert!(!before.can_notify);
        assert_eq!(
            after,
            CapabilitySet {
                can_notify: true,
                ..before
            }
        );
    }

    #[test]
    fn entry_points_gate_host_actions() {
        let entry_points = HostEntryPoints {
            open_url: true,
            ..HostEntryPoints::none()
        };
        let caps = resolve_capabilities(FrameStatus::Ready, None, entry_points);
        assert!(caps.can_open_url);
        assert!(!caps.can_view_profile);
        assert!(!caps.can_add_to_host);
        assert!(!caps.supports_primary_action);
    }

    #[test]
    fn wallet_requires_context() {
        let without_context = resolve_capabilities(FrameStatus::Ready, None, HostEntryPoints::all());
        assert!(!without_context.has_wallet);
        assert!(!without_context.can_notify);

        let context = HostContext::default();
        let with_context =
            resolve_capabilities(FrameStatus::Ready, Some(&context), HostEntryPoints::all());
        assert!(with_context.has_wallet);
    }
}
