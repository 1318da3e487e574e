//! Party-level wire shapes: patch requests, construction snapshots, and
//! remote-pushed updates.

use serde::{Deserialize, Serialize};
use serde_json::Map as JsonMap;
use serde_json::Value as JsonValue;

use crate::config::{Discoverability, Joinability, DEFAULT_INVITE_TTL, MAX_PARTY_SIZE};
use crate::meta::Schema;
use crate::messages::member::MemberData;

// ---------------------------------------------------------------------------
// Outbound patch request
// ---------------------------------------------------------------------------

/// The config block of a patch request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PatchConfig {
    pub join_confirmation: bool,
    pub joinability: Joinability,
    pub max_size: u32,
    pub discoverability: Discoverability,
}

/// The meta delta of a patch request: updated pairs plus deleted keys.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MetaDelta {
    #[serde(default)]
    pub update: Schema,
    #[serde(default)]
    pub delete: Vec<String>,
}

/// One outbound party patch, carrying the config snapshot, the meta delta,
/// and the revision it was computed against.
///
/// `party_privacy_type` mirrors the joinability, as the service expects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyPatchRequest {
    pub config: PatchConfig,
    pub meta: MetaDelta,
    pub party_state_overridden: JsonMap<String, JsonValue>,
    pub party_privacy_type: Joinability,
    pub party_type: String,
    pub party_sub_type: String,
    pub max_number_of_members: u32,
    pub invite_ttl_seconds: u64,
    pub revision: u64,
}

// ---------------------------------------------------------------------------
// Construction snapshot
// ---------------------------------------------------------------------------

fn default_party_type() -> String {
    "DEFAULT".to_string()
}

fn default_sub_type() -> String {
    "default".to_string()
}

fn default_max_size() -> u32 {
    MAX_PARTY_SIZE
}

fn default_invite_ttl() -> u64 {
    DEFAULT_INVITE_TTL
}

/// The config block of a party snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyConfigData {
    #[serde(rename = "type", default = "default_party_type")]
    pub party_type: String,
    #[serde(default)]
    pub joinability: Joinability,
    #[serde(default)]
    pub discoverability: Discoverability,
    #[serde(default = "default_sub_type")]
    pub sub_type: String,
    #[serde(default = "default_max_size")]
    pub max_size: u32,
    #[serde(default = "default_invite_ttl")]
    pub invite_ttl_seconds: u64,
    #[serde(default)]
    pub join_confirmation: bool,
}

impl Default for PartyConfigData {
    fn default() -> Self {
        Self {
            party_type: default_party_type(),
            joinability: Joinability::default(),
            discoverability: Discoverability::default(),
            sub_type: default_sub_type(),
            max_size: default_max_size(),
            invite_ttl_seconds: default_invite_ttl(),
            join_confirmation: false,
        }
    }
}

/// A full party snapshot, used to construct the local model.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PartyData {
    pub id: String,
    #[serde(default)]
    pub revision: u64,
    #[serde(default)]
    pub config: PartyConfigData,
    #[serde(default)]
    pub meta: Schema,
    #[serde(default)]
    pub members: Vec<MemberData>,
}

// ---------------------------------------------------------------------------
// Remote-pushed update
// ---------------------------------------------------------------------------

/// A partial party update pushed by the presence/event collaborator.
///
/// Carries the new revision, the changed/removed meta keys, and echoes of
/// the config fields the service manages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartyUpdateData {
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub captain_id: Option<String>,
    #[serde(default)]
    pub party_state_updated: Schema,
    #[serde(default)]
    pub party_state_removed: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub party_privacy_type: Option<Joinability>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub discoverability: Option<Discoverability>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub max_number_of_members: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub party_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub party_sub_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub invite_ttl_seconds: Option<u64>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
