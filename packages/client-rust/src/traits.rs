//! Boundary traits for the external collaborators.
//!
//! The HTTP/XMPP transport and the friend roster live outside this crate;
//! they are consumed as `Arc<dyn …>` trait objects. `PartyControl` is the
//! narrow capability a member receives so it can call back into leader-only
//! party operations without a concrete party type.

use async_trait::async_trait;
use partyline_core::messages::{MemberMetaPatch, PartyPatchRequest};
use partyline_core::Schema;

use crate::error::{PartyError, ServiceError};

/// The remote party service, at the granularity this crate consumes it.
///
/// Implementations own request signing, retries at the connection level, and
/// response decoding into [`ServiceError`]. Structured service rejections
/// must surface as `ServiceError::Api`; everything else as
/// `ServiceError::Transport`.
#[async_trait]
pub trait PartyService: Send + Sync {
    /// PATCH the party state (config snapshot + meta delta + revision).
    async fn update_party(
        &self,
        party_id: &str,
        patch: PartyPatchRequest,
    ) -> Result<(), ServiceError>;

    /// PATCH a member's meta document.
    async fn update_member_meta(
        &self,
        party_id: &str,
        member_id: &str,
        patch: MemberMetaPatch,
    ) -> Result<(), ServiceError>;

    /// Remove a member from the party.
    async fn kick(&self, party_id: &str, member_id: &str) -> Result<(), ServiceError>;

    /// Transfer party leadership to a member.
    async fn promote(&self, party_id: &str, member_id: &str) -> Result<(), ServiceError>;

    /// Accept a pending join confirmation.
    async fn confirm_join(&self, party_id: &str, user_id: &str) -> Result<(), ServiceError>;

    /// Reject a pending join confirmation.
    async fn reject_join(&self, party_id: &str, user_id: &str) -> Result<(), ServiceError>;

    /// Send a party invitation carrying build metadata.
    async fn invite(
        &self,
        party_id: &str,
        friend_id: &str,
        payload: Schema,
    ) -> Result<(), ServiceError>;

    /// Ping a user so their client surfaces the open party.
    async fn ping(
        &self,
        user_id: &str,
        pinger_id: &str,
        payload: Schema,
    ) -> Result<(), ServiceError>;
}

/// A friend known to the client's roster.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Friend {
    pub id: String,
    pub display_name: String,
}

/// The client's friend list, queried when resolving invite targets.
pub trait FriendRoster: Send + Sync {
    /// Finds a friend by account id or display name.
    fn find(&self, query: &str) -> Option<Friend>;
}

/// Leader-only party operations, injected into members as a capability.
///
/// A member bound to a party the client cannot mutate simply receives no
/// capability; any control attempt then fails with
/// [`PartyError::Forbidden`].
#[async_trait]
pub trait PartyControl: Send + Sync {
    async fn kick(&self, member_id: &str) -> Result<(), PartyError>;
    async fn promote(&self, member_id: &str) -> Result<(), PartyError>;
    async fn hide_member(&self, member_id: &str, hide: bool) -> Result<(), PartyError>;
}
