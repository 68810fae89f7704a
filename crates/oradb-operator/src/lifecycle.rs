//! Lifecycle states reported in the status of the managed database resources.

use serde::{Deserialize, Serialize};

/// The lifecycle state a managed database reports in its status.
///
/// The variants mirror the states the cloud control plane reports for the
/// underlying database, in their wire format (`SCREAMING_SNAKE_CASE`).
#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, strum::Display, strum::EnumString,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum LifecycleState {
    Provisioning,
    Available,
    AvailableNeedsAttention,
    Updating,
    ScaleInProgress,
    Starting,
    Stopping,
    Stopped,
    Restarting,
    BackupInProgress,
    RestoreInProgress,
    RoleChangeInProgress,
    Upgrading,
    Unavailable,
    Terminating,
    Terminated,
    Failed,
}

impl LifecycleState {
    /// True while a long-running operation is still in progress on the
    /// underlying database, meaning the reported state is about to move on
    /// its own.
    ///
    /// Spec updates are rejected in these states, see
    /// [`crate::admission::validate_spec_update`].
    pub fn is_intermediate(&self) -> bool {
        matches!(
            self,
            Self::Provisioning
                | Self::Updating
                | Self::ScaleInProgress
                | Self::Starting
                | Self::Stopping
                | Self::Restarting
                | Self::BackupInProgress
                | Self::RestoreInProgress
                | Self::RoleChangeInProgress
                | Self::Upgrading
                | Self::Terminating
        )
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rstest::*;

    use super::LifecycleState;

    #[rstest]
    #[case::available(LifecycleState::Available, false)]
    #[case::stopped(LifecycleState::Stopped, false)]
    #[case::terminated(LifecycleState::Terminated, false)]
    #[case::failed(LifecycleState::Failed, false)]
    #[case::provisioning(LifecycleState::Provisioning, true)]
    #[case::updating(LifecycleState::Updating, true)]
    #[case::scale_in_progress(LifecycleState::ScaleInProgress, true)]
    #[case::terminating(LifecycleState::Terminating, true)]
    fn intermediate_classification(#[case] state: LifecycleState, #[case] expected: bool) {
        assert_eq!(state.is_intermediate(), expected);
    }

    #[test]
    fn wire_format_round_trip() {
        let state: LifecycleState = serde_json::from_str(r#""SCALE_IN_PROGRESS""#).unwrap();
        assert_eq!(state, LifecycleState::ScaleInProgress);
        assert_eq!(state.to_string(), "SCALE_IN_PROGRESS");
        assert_eq!(
            serde_json::to_string(&state).unwrap(),
            r#""SCALE_IN_PROGRESS""#
        );
    }
}
