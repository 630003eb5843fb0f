//! Atomic NPC actions
//!
//! TigerStyle: Flat command validation with explicit allow-lists.
//!
//! `perform` is intentionally a flat validator, not a state machine with
//! transition guards: every action is checked and applied independently.
//! The one cross-action constraint, that navigation and following are
//! mutually exclusive, is a contract the calling prompt enforces.

use serde::{Deserialize, Serialize};

/// Actions the dispatcher accepts
pub const ACTION_NAMES: &[&str] = &["emote", "follow", "unfollow"];

/// Emote types the game client can play
pub const EMOTE_TYPES: &[&str] = &["wave", "laugh", "dance", "cheer", "point", "sit"];

/// In-session action state shared by the action and navigation tools
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActionState {
    /// Entity currently being followed
    pub following: Option<String>,
    /// Object currently under examination
    pub examining: Option<String>,
    /// True while a navigation transition is underway
    pub navigating: bool,
}

/// Machine-checkable outcome tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReplyStatus {
    Success,
    Error,
}

/// Result of an action or navigation request
///
/// Wire shape: `{"status": "success" | "error", "message": str}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionReply {
    pub status: ReplyStatus,
    pub message: String,
}

impl ActionReply {
    /// Create a success reply
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Success,
            message: message.into(),
        }
    }

    /// Create an error reply
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: ReplyStatus::Error,
            message: message.into(),
        }
    }

    /// Check if the request was accepted
    pub fn is_success(&self) -> bool {
        self.status == ReplyStatus::Success
    }
}

/// Validates and executes atomic NPC actions
pub struct ActionDispatcher;

impl ActionDispatcher {
    /// Perform an action against the shared state
    ///
    /// Inputs are normalized first: action and emote type are lowercased
    /// and trimmed, the target is trimmed. Unknown actions and emote types
    /// are reported with the valid alternatives.
    pub fn perform(
        state: &mut ActionState,
        action: &str,
        emote_type: &str,
        target: &str,
    ) -> ActionReply {
        let action = action.trim().to_lowercase();
        let emote_type = emote_type.trim().to_lowercase();
        let target = target.trim();

        match action.as_str() {
            "emote" => {
                if emote_type.is_empty() {
                    return ActionReply::error(format!(
                        "Emote type required. Valid types are: {}",
                        EMOTE_TYPES.join(", ")
                    ));
                }
                if !EMOTE_TYPES.contains(&emote_type.as_str()) {
                    return ActionReply::error(format!(
                        "Unknown emote type: {}. Valid types are: {}",
                        emote_type,
                        EMOTE_TYPES.join(", ")
                    ));
                }
                let message = if target.is_empty() {
                    format!("Performing emote: {}", emote_type)
                } else {
                    format!("Performing emote: {} at {}", emote_type, target)
                };
                ActionReply::success(message)
            }
            "follow" => {
                if target.is_empty() {
                    return ActionReply::error("Target required for follow");
                }
                state.following = Some(target.to_string());
                ActionReply::success(format!("Following player: {}", target))
            }
            "unfollow" => {
                state.following = None;
                ActionReply::success("Stopping follow action. Now stationary.")
            }
            _ => ActionReply::error(format!(
                "Unknown action: {}. Valid actions are: {}",
                action,
                ACTION_NAMES.join(", ")
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_action_lists_valid_ones() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "teleport", "", "");

        assert!(!reply.is_success());
        assert!(reply.message.contains("teleport"));
        assert!(reply.message.contains("emote, follow, unfollow"));
    }

    #[test]
    fn test_emote_requires_type() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "emote", "", "");

        assert!(!reply.is_success());
        assert!(reply.message.contains("Emote type required"));
    }

    #[test]
    fn test_emote_rejects_unknown_type() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "emote", "backflip", "");

        assert!(!reply.is_success());
        assert!(reply.message.contains("backflip"));
        assert!(reply.message.contains("wave"));
    }

    #[test]
    fn test_emote_target_decorates_message() {
        let mut state = ActionState::default();

        let plain = ActionDispatcher::perform(&mut state, "emote", "wave", "");
        let targeted = ActionDispatcher::perform(&mut state, "emote", "wave", "Alice");

        assert_eq!(plain.message, "Performing emote: wave");
        assert_eq!(targeted.message, "Performing emote: wave at Alice");
    }

    #[test]
    fn test_follow_requires_target() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "follow", "", "");

        assert!(!reply.is_success());
        assert!(state.following.is_none());
    }

    #[test]
    fn test_follow_then_unfollow() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "follow", "", "Alice");
        assert!(reply.is_success());
        assert_eq!(state.following.as_deref(), Some("Alice"));

        let reply = ActionDispatcher::perform(&mut state, "unfollow", "", "");
        assert!(reply.is_success());
        assert!(state.following.is_none());
    }

    #[test]
    fn test_unfollow_without_follow_is_fine() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "unfollow", "", "");

        assert!(reply.is_success());
    }

    #[test]
    fn test_inputs_are_normalized() {
        let mut state = ActionState::default();

        let reply = ActionDispatcher::perform(&mut state, "  FOLLOW ", "", " Alice ");

        assert!(reply.is_success());
        assert_eq!(state.following.as_deref(), Some("Alice"));

        let reply = ActionDispatcher::perform(&mut state, "Emote", " WAVE ", "");
        assert!(reply.is_success());
    }

    #[test]
    fn test_failed_action_leaves_state_untouched() {
        let mut state = ActionState {
            following: Some("Alice".to_string()),
            ..Default::default()
        };

        ActionDispatcher::perform(&mut state, "emote", "backflip", "");
        ActionDispatcher::perform(&mut state, "follow", "", "");

        assert_eq!(state.following.as_deref(), Some("Alice"));
    }
}
