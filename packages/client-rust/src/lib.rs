//! partyline-client: the concurrency layer of the party model.
//!
//! Builds on `partyline-core`'s pure data types: the FIFO patch queue, the
//! revision-tracking patch pipeline with stale-conflict recovery, the client
//! party with its leadership-gated operations, party members (including the
//! client's own controllable member), pending join confirmations, and the
//! boundary traits the transport and roster collaborators implement.

pub mod error;
pub mod party;
pub mod pipeline;
pub mod queue;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use error::{PartyError, ServiceError};
pub use party::confirmation::JoinConfirmation;
pub use party::member::{ClientPartyMember, PartyMember};
pub use party::{ClientIdentity, ClientParty};
pub use pipeline::PatchPipeline;
pub use queue::{PatchQueue, TurnGuard};
pub use traits::{Friend, FriendRoster, PartyControl, PartyService};
