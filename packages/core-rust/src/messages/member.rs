//! Member-level wire shapes: snapshots, remote updates, the member meta
//! patch, and join-confirmation payloads.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use tracing::warn;

use crate::meta::Schema;

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// A member's role. `Captain` is the party leader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemberRole {
    #[serde(rename = "CAPTAIN")]
    Captain,
    #[default]
    #[serde(rename = "MEMBER")]
    Member,
}

// ---------------------------------------------------------------------------
// External auths
// ---------------------------------------------------------------------------

/// A linked external platform account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExternalAuth {
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_id: Option<String>,
    #[serde(rename = "type", skip_serializing_if = "Option::is_none", default)]
    pub auth_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_auth_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub external_display_name: Option<String>,
}

/// Boundary-parsing rule: the service represents "no external auths" as an
/// empty list, and present auths as a mapping keyed by auth type. Both shapes
/// must parse; the list shape normalizes to an empty map.
#[derive(Deserialize)]
#[serde(untagged)]
enum ExternalAuthsShape {
    Map(HashMap<String, ExternalAuth>),
    List(Vec<serde_json::Value>),
}

fn deserialize_external_auths<'de, D>(
    deserializer: D,
) -> Result<HashMap<String, ExternalAuth>, D::Error>
where
    D: Deserializer<'de>,
{
    match ExternalAuthsShape::deserialize(deserializer)? {
        ExternalAuthsShape::Map(map) => Ok(map),
        ExternalAuthsShape::List(entries) => {
            if !entries.is_empty() {
                warn!(
                    entries = entries.len(),
                    "discarding list-shaped external auths payload"
                );
            }
            Ok(HashMap::new())
        }
    }
}

// ---------------------------------------------------------------------------
// Snapshots and updates
// ---------------------------------------------------------------------------

/// A member construction snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberData {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_dn: Option<String>,
    #[serde(default)]
    pub role: MemberRole,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub joined_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub meta: Schema,
    #[serde(default)]
    pub revision: u64,
    #[serde(default, deserialize_with = "deserialize_external_auths")]
    pub external_auths: HashMap<String, ExternalAuth>,
}

/// A partial member update pushed by the presence/event collaborator.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberUpdateData {
    pub revision: u64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_dn: Option<String>,
    #[serde(default)]
    pub member_state_updated: Schema,
    #[serde(default)]
    pub member_state_removed: Vec<String>,
}

/// One outbound member meta patch, sent to the member meta endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MemberMetaPatch {
    pub delete: Vec<String>,
    pub revision: u64,
    pub update: Schema,
}

/// A pending join request delivered to the party leader.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JoinConfirmationData {
    pub account_id: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub account_dn: Option<String>,
    pub sent: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
