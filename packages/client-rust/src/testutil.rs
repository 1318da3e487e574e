//! Test doubles shared by the party and member test modules.

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use partyline_core::messages::{MemberMetaPatch, PartyPatchRequest};
use partyline_core::Schema;

use crate::error::ServiceError;
use crate::traits::{Friend, FriendRoster, PartyService};

/// One recorded service call, in arrival order.
#[derive(Debug)]
pub(crate) enum ServiceCall {
    UpdateParty {
        party_id: String,
        request: PartyPatchRequest,
    },
    UpdateMemberMeta {
        member_id: String,
        patch: MemberMetaPatch,
    },
    Kick {
        member_id: String,
    },
    Promote {
        member_id: String,
    },
    ConfirmJoin {
        user_id: String,
    },
    RejectJoin {
        user_id: String,
    },
    Invite {
        friend_id: String,
        payload: Schema,
    },
    Ping {
        user_id: String,
        payload: Schema,
    },
}

/// A scripted [`PartyService`]: records every call and pops one scripted
/// result per call, defaulting to success when the script runs dry.
#[derive(Default)]
pub(crate) struct MockService {
    pub calls: Mutex<Vec<ServiceCall>>,
    pub results: Mutex<VecDeque<Result<(), ServiceError>>>,
}

impl MockService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn script(self: &Arc<Self>, results: Vec<Result<(), ServiceError>>) {
        *self.results.lock() = results.into();
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().len()
    }

    fn next_result(&self) -> Result<(), ServiceError> {
        self.results.lock().pop_front().unwrap_or(Ok(()))
    }

    /// The patch requests recorded so far, oldest first.
    pub fn patch_requests(&self) -> Vec<PartyPatchRequest> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ServiceCall::UpdateParty { request, .. } => Some(request.clone()),
                _ => None,
            })
            .collect()
    }

    /// The member meta patches recorded so far, oldest first.
    pub fn member_patches(&self) -> Vec<MemberMetaPatch> {
        self.calls
            .lock()
            .iter()
            .filter_map(|call| match call {
                ServiceCall::UpdateMemberMeta { patch, .. } => Some(patch.clone()),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl PartyService for MockService {
    async fn update_party(
        &self,
        party_id: &str,
        patch: PartyPatchRequest,
    ) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::UpdateParty {
            party_id: party_id.to_string(),
            request: patch,
        });
        self.next_result()
    }

    async fn update_member_meta(
        &self,
        _party_id: &str,
        member_id: &str,
        patch: MemberMetaPatch,
    ) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::UpdateMemberMeta {
            member_id: member_id.to_string(),
            patch,
        });
        self.next_result()
    }

    async fn kick(&self, _party_id: &str, member_id: &str) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::Kick {
            member_id: member_id.to_string(),
        });
        self.next_result()
    }

    async fn promote(&self, _party_id: &str, member_id: &str) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::Promote {
            member_id: member_id.to_string(),
        });
        self.next_result()
    }

    async fn confirm_join(&self, _party_id: &str, user_id: &str) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::ConfirmJoin {
            user_id: user_id.to_string(),
        });
        self.next_result()
    }

    async fn reject_join(&self, _party_id: &str, user_id: &str) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::RejectJoin {
            user_id: user_id.to_string(),
        });
        self.next_result()
    }

    async fn invite(
        &self,
        _party_id: &str,
        friend_id: &str,
        payload: Schema,
    ) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::Invite {
            friend_id: friend_id.to_string(),
            payload,
        });
        self.next_result()
    }

    async fn ping(
        &self,
        user_id: &str,
        _pinger_id: &str,
        payload: Schema,
    ) -> Result<(), ServiceError> {
        self.calls.lock().push(ServiceCall::Ping {
            user_id: user_id.to_string(),
            payload,
        });
        self.next_result()
    }
}

/// A fixed friend list.
pub(crate) struct StaticRoster {
    pub friends: Vec<Friend>,
}

impl StaticRoster {
    pub fn new(friends: Vec<Friend>) -> Arc<Self> {
        Arc::new(Self { friends })
    }

    pub fn empty() -> Arc<Self> {
        Self::new(Vec::new())
    }
}

impl FriendRoster for StaticRoster {
    fn find(&self, query: &str) -> Option<Friend> {
        self.friends
            .iter()
            .find(|f| f.id == query || f.display_name == query)
            .cloned()
    }
}
