//! Movement request validation
//!
//! TigerStyle: Shape checks only, no blocking on arrival.
//!
//! The validator checks slug shape; it does not own or query the
//! known-locations reference data. A success reply means the transition
//! has started. Arrival is reported later by the game backend's status
//! updates, never by these calls.

use crate::action::{ActionReply, ActionState};

/// Validates movement requests
pub struct NavigationValidator;

impl NavigationValidator {
    /// Start navigation to a named location slug
    ///
    /// The slug is lowercased and trimmed before validation; valid slugs
    /// contain only alphanumerics and underscores, with at least one
    /// alphanumeric.
    pub fn navigate_to_slug(state: &mut ActionState, destination_slug: &str) -> ActionReply {
        let slug = destination_slug.trim().to_lowercase();

        if !Self::is_valid_slug(&slug) {
            return ActionReply::error(
                "Please use a valid slug from your locations memory block. \
                 Slugs are lowercase with underscores (e.g. 'market_district', 'petes_stand')",
            );
        }

        state.navigating = true;
        ActionReply::success(format!(
            "Beginning navigation to {}. Currently in transit; arrival is reported by a \
             separate status update.",
            slug
        ))
    }

    /// Start navigation to raw coordinates
    ///
    /// Coordinates are accepted as-is, with no range validation.
    pub fn navigate_to_coordinates(state: &mut ActionState, x: f64, y: f64, z: f64) -> ActionReply {
        state.navigating = true;
        ActionReply::success(format!(
            "Beginning navigation to coordinates ({}, {}, {}). Currently in transit; arrival \
             is reported by a separate status update.",
            x, y, z
        ))
    }

    fn is_valid_slug(slug: &str) -> bool {
        slug.chars().any(|c| c.is_ascii_alphanumeric())
            && slug.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_slug_starts_transition() {
        let mut state = ActionState::default();

        let reply = NavigationValidator::navigate_to_slug(&mut state, "market_district");

        assert!(reply.is_success());
        assert!(reply.message.contains("market_district"));
        assert!(state.navigating);
    }

    #[test]
    fn test_slug_is_normalized_before_validation() {
        let mut state = ActionState::default();

        let reply = NavigationValidator::navigate_to_slug(&mut state, "  Petes_Stand ");

        assert!(reply.is_success());
        assert!(reply.message.contains("petes_stand"));
    }

    #[test]
    fn test_slug_with_space_is_rejected() {
        let mut state = ActionState::default();

        let reply = NavigationValidator::navigate_to_slug(&mut state, "Market District");

        assert!(!reply.is_success());
        assert!(reply.message.contains("locations memory block"));
        assert!(!state.navigating);
    }

    #[test]
    fn test_slug_with_punctuation_is_rejected() {
        let mut state = ActionState::default();

        for bad in ["pete's_stand", "market-district", "market/district", ""] {
            let reply = NavigationValidator::navigate_to_slug(&mut state, bad);
            assert!(!reply.is_success(), "slug {:?} should be rejected", bad);
        }
    }

    #[test]
    fn test_underscores_alone_are_rejected() {
        let mut state = ActionState::default();

        let reply = NavigationValidator::navigate_to_slug(&mut state, "___");

        assert!(!reply.is_success());
    }

    #[test]
    fn test_coordinates_accepted_without_range_checks() {
        let mut state = ActionState::default();

        let reply =
            NavigationValidator::navigate_to_coordinates(&mut state, -1e9, 0.0, 12345.678);

        assert!(reply.is_success());
        assert!(state.navigating);
    }
}
