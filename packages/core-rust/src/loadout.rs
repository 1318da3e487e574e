//! Value-parsing helpers for member cosmetic and match meta.
//!
//! Member meta values embed dotted-path asset identifiers
//! (`AthenaCharacter:CID_028_Athena_Commando_F.CID_028_Athena_Commando_F`),
//! lower-camel-cased variant channels, and a handful of small JSON shapes.
//! These helpers parse the decoded JSON values; they never touch the store
//! itself.

use std::sync::OnceLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Sentinel asset value meaning "nothing equipped" (used by the emote slot).
pub const NONE_ASSET: &str = "None";

// ---------------------------------------------------------------------------
// Asset paths and variant channels
// ---------------------------------------------------------------------------

fn asset_id_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    // Last dotted path segment.
    PATTERN.get_or_init(|| Regex::new(r"\.([0-9A-Za-z_]+)$").expect("asset id pattern is valid"))
}

/// Extracts the last path segment of a dotted asset path.
///
/// Returns `None` when the value has no dot, including the [`NONE_ASSET`]
/// sentinel. Callers that distinguish "nothing equipped" from "absent" must
/// check the sentinel before calling.
#[must_use]
pub fn asset_id(path: &str) -> Option<&str> {
    asset_id_pattern()
        .captures(path)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Normalizes a lower-camel-cased variant channel name to PascalCase.
#[must_use]
pub fn pascal_case_channel(channel: &str) -> String {
    let mut chars = channel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// Re-keys the `vL` variant channel map of a decoded
/// `Default:AthenaCosmeticLoadoutVariants_j` value to PascalCase channels.
///
/// Returns an empty map when the value carries no variants.
#[must_use]
pub fn pascal_case_variants(value: &JsonValue) -> serde_json::Map<String, JsonValue> {
    let mut normalized = serde_json::Map::new();
    if let Some(channels) = value.get("vL").and_then(JsonValue::as_object) {
        for (channel, payload) in channels {
            normalized.insert(pascal_case_channel(channel), payload.clone());
        }
    }
    normalized
}

// ---------------------------------------------------------------------------
// Map marker
// ---------------------------------------------------------------------------

/// A decoded `Default:FrontEndMapMarker_j` value.
///
/// The location tuple swaps the stored axes: index 0 is the stored `y`,
/// index 1 the stored `x`. An unset marker reads as `[0.0, 0.0]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapMarker {
    pub is_set: bool,
    pub location: [f64; 2],
}

impl Default for MapMarker {
    fn default() -> Self {
        Self {
            is_set: false,
            location: [0.0, 0.0],
        }
    }
}

impl MapMarker {
    /// Parses the decoded meta value. Missing or partial payloads degrade to
    /// the unset marker.
    #[must_use]
    pub fn from_meta(value: &JsonValue) -> Self {
        let Some(marker) = value.get("FrontEndMapMarker") else {
            return Self::default();
        };
        let is_set = marker
            .get("bIsSet")
            .and_then(JsonValue::as_bool)
            .unwrap_or(false);
        let location = marker.get("markerLocation").map_or([0.0, 0.0], |loc| {
            let x = loc.get("x").and_then(JsonValue::as_f64).unwrap_or(0.0);
            let y = loc.get("y").and_then(JsonValue::as_f64).unwrap_or(0.0);
            [y, x]
        });
        Self { is_set, location }
    }
}

// ---------------------------------------------------------------------------
// Match info
// ---------------------------------------------------------------------------

/// Match state assembled from five sibling member meta keys.
///
/// Absent keys are tolerated; each field is independently optional.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchInfo {
    pub location: Option<String>,
    pub has_preloaded: Option<bool>,
    pub is_spectatable: Option<bool>,
    pub players_left: Option<i64>,
    pub started_at: Option<DateTime<Utc>>,
}

// ---------------------------------------------------------------------------
// Banner / battle pass / assisted challenge
// ---------------------------------------------------------------------------

/// The `AthenaBannerInfo` payload of `Default:AthenaBannerInfo_j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Banner {
    #[serde(rename = "bannerIconId")]
    pub icon_id: String,
    #[serde(rename = "bannerColorId")]
    pub color_id: String,
    #[serde(rename = "seasonLevel")]
    pub season_level: i64,
}

/// The `BattlePassInfo` payload of `Default:BattlePassInfo_j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BattlePass {
    #[serde(rename = "bHasPurchasedPass")]
    pub purchased: bool,
    #[serde(rename = "passLevel")]
    pub level: i64,
    #[serde(rename = "selfBoostXp")]
    pub self_boost_xp: i64,
    #[serde(rename = "friendBoostXp")]
    pub friend_boost_xp: i64,
}

/// The `AssistedChallengeInfo` payload of `Default:AssistedChallengeInfo_j`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssistedChallenge {
    pub quest_item_def: String,
    pub objectives_completed: i64,
}

impl AssistedChallenge {
    /// Parses the decoded meta value; `None` when no challenge is set.
    #[must_use]
    pub fn from_meta(value: &JsonValue) -> Option<Self> {
        let challenge = value.get("AssistedChallengeInfo")?;
        serde_json::from_value(challenge.clone()).ok()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    // ---- Asset paths ----

    #[test]
    fn asset_id_extracts_last_segment() {
        assert_eq!(
            asset_id("AthenaCharacter:CID_028_Athena_Commando_F.CID_028_Athena_Commando_F"),
            Some("CID_028_Athena_Commando_F")
        );
        assert_eq!(asset_id("a.b.c"), Some("c"));
    }

    #[test]
    fn asset_id_without_dot_is_absent() {
        assert_eq!(asset_id("NoDotsHere"), None);
        assert_eq!(asset_id(NONE_ASSET), None);
        assert_eq!(asset_id(""), None);
    }

    // ---- Variant casing ----

    #[test]
    fn channel_names_upcase_first_letter() {
        assert_eq!(pascal_case_channel("material"), "Material");
        assert_eq!(pascal_case_channel("Parts"), "Parts");
        assert_eq!(pascal_case_channel(""), "");
    }

    #[test]
    fn variants_rekeyed_to_pascal_case() {
        let value = json!({
            "vL": {
                "athenaCharacter": { "i": [{ "v": "Mtl", "c": "Material" }] },
                "athenaBackpack": { "i": [] },
            }
        });
        let variants = pascal_case_variants(&value);
        assert!(variants.contains_key("AthenaCharacter"));
        assert!(variants.contains_key("AthenaBackpack"));
        assert!(!variants.contains_key("athenaCharacter"));
    }

    #[test]
    fn missing_variant_list_is_empty() {
        assert!(pascal_case_variants(&json!({})).is_empty());
    }

    // ---- Map marker ----

    #[test]
    fn marker_swaps_axes() {
        let value = json!({
            "FrontEndMapMarker": {
                "bIsSet": true,
                "markerLocation": { "x": 120.5, "y": -45.0 },
            }
        });
        let marker = MapMarker::from_meta(&value);
        assert!(marker.is_set);
        assert_eq!(marker.location, [-45.0, 120.5]);
    }

    #[test]
    fn unset_marker_reads_origin() {
        let marker = MapMarker::from_meta(&json!({}));
        assert!(!marker.is_set);
        assert_eq!(marker.location, [0.0, 0.0]);

        let partial = MapMarker::from_meta(&json!({ "FrontEndMapMarker": { "bIsSet": false } }));
        assert_eq!(partial.location, [0.0, 0.0]);
    }

    // ---- Assisted challenge ----

    #[test]
    fn assisted_challenge_extraction() {
        let value = json!({
            "AssistedChallengeInfo": {
                "questItemDef": "Quest:Q_123.Q_123",
                "objectivesCompleted": 3,
            }
        });
        let challenge = AssistedChallenge::from_meta(&value).unwrap();
        assert_eq!(challenge.quest_item_def, "Quest:Q_123.Q_123");
        assert_eq!(challenge.objectives_completed, 3);
    }

    #[test]
    fn assisted_challenge_absent() {
        assert_eq!(AssistedChallenge::from_meta(&json!({})), None);
    }
}
