//! Error taxonomy for party operations.
//!
//! Validation and not-found errors are raised synchronously, before any
//! network call. Permission errors come either from the local leadership
//! check or from a remapped change-forbidden service code. Stale-revision
//! conflicts are recovered inside the patch pipeline and never reach the
//! caller; everything else propagates verbatim.

use partyline_core::{ApiError, MetaError};
use partyline_core::{MAX_PARTY_SIZE, MIN_PARTY_SIZE};

/// An error produced at the transport boundary.
///
/// `Api` wraps a structured payload the service returned; `Transport` wraps
/// an opaque I/O failure from the transport collaborator.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("party service rejected the request: {0}")]
    Api(ApiError),
    #[error("transport failure")]
    Transport(#[from] anyhow::Error),
}

/// An error surfaced to the caller of a party operation.
#[derive(Debug, thiserror::Error)]
pub enum PartyError {
    #[error("party size must be between {MIN_PARTY_SIZE} and {MAX_PARTY_SIZE}, got {0}")]
    SizeOutOfRange(u32),
    #[error("party size {requested} is below the current member count {members}")]
    SizeBelowMemberCount { requested: u32, members: u32 },
    #[error("user is already a member of this party")]
    AlreadyInParty,
    #[error("party has reached its max size")]
    MaxSizeReached,
    #[error("no party member matches {0:?}")]
    MemberNotFound(String),
    #[error("no friend matches {0:?}")]
    FriendNotFound(String),
    #[error("operation requires the party leader role")]
    Forbidden,
    #[error(transparent)]
    Meta(#[from] MetaError),
    #[error("party service rejected the request: {0}")]
    Api(ApiError),
    #[error("transport failure")]
    Transport(#[source] anyhow::Error),
}

impl From<ServiceError> for PartyError {
    /// Remaps the change-forbidden service code to the same permission error
    /// the local leadership check uses; everything else passes through.
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Api(api) if api.is_change_forbidden() => Self::Forbidden,
            ServiceError::Api(api) => Self::Api(api),
            ServiceError::Transport(source) => Self::Transport(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use partyline_core::messages::CHANGE_FORBIDDEN;

    #[test]
    fn change_forbidden_remaps_to_permission_error() {
        let err = ServiceError::Api(ApiError::from_code(CHANGE_FORBIDDEN));
        assert!(matches!(PartyError::from(err), PartyError::Forbidden));
    }

    #[test]
    fn opaque_codes_pass_through() {
        let err = ServiceError::Api(ApiError::from_code("errors.com.epicgames.social.party.ping_not_found"));
        match PartyError::from(err) {
            PartyError::Api(api) => {
                assert_eq!(api.error_code, "errors.com.epicgames.social.party.ping_not_found");
            }
            other => panic!("expected Api, got {other:?}"),
        }
    }
}
