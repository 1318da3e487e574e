//! Pending join confirmations, held while the leader decides.

use chrono::{DateTime, Utc};
use partyline_core::messages::JoinConfirmationData;

/// A join request awaiting the leader's decision.
///
/// The party keeps one entry per requesting user; confirming or rejecting
/// removes it. A confirmation for a user who is no longer pending resolves
/// to [`crate::error::PartyError::MemberNotFound`].
#[derive(Debug, Clone, PartialEq)]
pub struct JoinConfirmation {
    pub user_id: String,
    pub display_name: Option<String>,
    pub sent: DateTime<Utc>,
}

impl From<JoinConfirmationData> for JoinConfirmation {
    fn from(data: JoinConfirmationData) -> Self {
        Self {
            user_id: data.account_id,
            display_name: data.account_dn,
            sent: data.sent,
        }
    }
}
