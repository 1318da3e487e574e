//! Partyline core — party meta document, per-key codecs, and wire schemas.
//!
//! This crate is the pure data layer of the party model: no async, no I/O.
//! The companion `partyline-client` crate layers the patch queue, the
//! revision pipeline, and the leadership-gated party operations on top.

pub mod config;
pub mod keys;
pub mod loadout;
pub mod messages;
pub mod meta;

pub use config::{
    Discoverability, InvitePermission, InviteRestriction, Joinability, PartyConfig, PartyPrivacy,
    Playlist, PresencePermission, PrivacyPartyType, MAX_PARTY_SIZE, MIN_PARTY_SIZE,
};
pub use messages::{ApiError, MemberRole};
pub use meta::{CodecRegistry, KeyTag, MetaError, MetaStore, MetaValue, Schema, UpdateSource};
