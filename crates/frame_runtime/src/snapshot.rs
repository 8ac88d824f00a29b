//! Read-only runtime view consumed by the presentational layer.

use frame_host::{HostContext, HostUser, PrimaryActionConfig};
use serde::{Deserialize, Serialize};

use crate::{
    capabilities::CapabilitySet,
    connection::{ConnectionState, FrameStatus},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// Coarse connection indicator for display.
pub enum ConnectionStatus {
    /// The host acknowledged the app.
    Connected,
    /// Idle or dropped by the host.
    Disconnected,
    /// An attempt is starting or in progress.
    Reconnecting,
    /// The last attempt failed.
    Failed,
}

impl From<FrameStatus> for ConnectionStatus {
    fn from(status: FrameStatus) -> Self {
        match status {
            FrameStatus::Ready => Self::Connected,
            FrameStatus::Initializing | FrameStatus::Connecting => Self::Reconnecting,
            FrameStatus::Error => Self::Failed,
            FrameStatus::Disconnected => Self::Disconnected,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
/// Session facts the runtime tracks next to the connection state.
pub(crate) struct SessionState {
    pub(crate) host_context: Option<HostContext>,
    pub(crate) added_locally: bool,
    pub(crate) last_activity: Option<u64>,
    pub(crate) primary_action: Option<PrimaryActionConfig>,
}

impl SessionState {
    /// Host context with the locally confirmed `added` flag folded in. The flag only lives until
    /// the host reports a new context.
    pub(crate) fn effective_context(&self) -> Option<HostContext> {
        self.host_context.clone().map(|context| {
            let added = context.added || self.added_locally;
            context.with_added(added)
        })
    }

    pub(crate) fn added_to_host(&self) -> bool {
        self.added_locally || self.host_context.as_ref().is_some_and(|context| context.added)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
/// Point-in-time copy of everything the UI reads from the runtime.
pub struct FrameSnapshot {
    /// Mirrors `connection.is_ready`.
    pub is_ready: bool,
    /// Mirrors `connection.status`.
    pub status: FrameStatus,
    /// Display mapping of `status`.
    pub connection_status: ConnectionStatus,
    /// Full connection state.
    pub connection: ConnectionState,
    /// Latest host context.
    pub host_context: Option<HostContext>,
    /// Capabilities at snapshot time.
    pub capabilities: CapabilitySet,
    /// Authenticated host user.
    pub user_info: Option<HostUser>,
    /// Whether the app is in the user's host app list.
    pub added_to_host: bool,
    /// Unix milliseconds of the last user-initiated action.
    pub last_activity: Option<u64>,
    /// Active primary action button.
    pub primary_action: Option<PrimaryActionConfig>,
}

impl FrameSnapshot {
    pub(crate) fn assemble(
        connection: ConnectionState,
        session: &SessionState,
        capabilities: CapabilitySet,
    ) -> Self {
        let host_context = session.effective_context();
        Self {
            is_ready: connection.is_ready,
            status: connection.status,
            connection_status: connection.status.into(),
            user_info: host_context.as_ref().and_then(|context| context.user.clone()),
            host_context,
            capabilities,
            added_to_host: session.added_to_host(),
            last_activity: session.last_activity,
            primary_action: session.primary_action.clone(),
            connection,
        }
    }
}

impl Default for FrameSnapshot {
    fn default() -> Self {
        Self::assemble(
            ConnectionState::default(),
            &SessionState::default(),
            CapabilitySet::none(),
        )
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn status_maps_to_display_indicator() {
        assert_eq!(ConnectionStatus::from(FrameStatus::Ready), ConnectionStatus::Connected);
        assert_eq!(
            ConnectionStatus::from(FrameStatus::Initializing),
            ConnectionStatus::Reconnecting
        );
        assert_eq!(
            ConnectionStatus::from(FrameStatus::Connecting),
            ConnectionStatus::Reconnecting
        );
        assert_eq!(ConnectionStatus::from(FrameStatus::Error), ConnectionStatus::Failed);
        assert_eq!(
            ConnectionStatus::from(FrameStatus::Disconnected),
            ConnectionStatus::Disconnected
        );
    }

    #[test]
    fn local_added_flag_overrides_stale_context() {
        let session = SessionState {
            host_context: Some(HostContext::for_user(HostUser::new(9))),
            added_locally: true,
            ..SessionState::default()
        };
        let snapshot =
            FrameSnapshot::assemble(ConnectionState::default(), &session, CapabilitySet::none());

        assert!(snapshot.added_to_host);
        assert!(snapshot.host_context.as_ref().is_some_and(|context| context.added));
        assert_eq!(snapshot.user_info, Some(HostUser::new(9)));
        assert_eq!(snapshot.connection_status, ConnectionStatus::Reconnecting);
    }
}
