//! Party members: read accessors over member meta, the control capability,
//! and the client's own controllable member.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use chrono::{DateTime, Utc};
use futures_util::FutureExt;
use parking_lot::RwLock;
use partyline_core::keys;
use partyline_core::loadout::{
    self, AssistedChallenge, Banner, BattlePass, MapMarker, MatchInfo,
};
use partyline_core::messages::{MemberData, MemberMetaPatch, MemberRole, MemberUpdateData};
use partyline_core::{MetaError, MetaStore, MetaValue, Schema, UpdateSource};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::trace;

use crate::error::PartyError;
use crate::pipeline::PatchPipeline;
use crate::traits::{PartyControl, PartyService};

// ---------------------------------------------------------------------------
// PartyMember
// ---------------------------------------------------------------------------

/// A member of the party the client observes.
///
/// Owns the member's meta document and revision. Control operations (kick,
/// promote, hide) go through the injected [`PartyControl`] capability; a
/// member constructed without one fails such attempts with
/// [`PartyError::Forbidden`].
pub struct PartyMember {
    id: String,
    display_name: RwLock<Option<String>>,
    role: RwLock<MemberRole>,
    joined_at: DateTime<Utc>,
    revision: Arc<AtomicU64>,
    meta: RwLock<MetaStore>,
    control: Option<Weak<dyn PartyControl>>,
}

impl PartyMember {
    /// Builds a member from a construction snapshot.
    #[must_use]
    pub fn new(data: MemberData, control: Option<Weak<dyn PartyControl>>) -> Self {
        Self {
            id: data.account_id,
            display_name: RwLock::new(data.account_dn),
            role: RwLock::new(data.role),
            joined_at: data.joined_at.unwrap_or_else(Utc::now),
            revision: Arc::new(AtomicU64::new(data.revision)),
            meta: RwLock::new(MetaStore::from_schema(data.meta)),
            control,
        }
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    #[must_use]
    pub fn display_name(&self) -> Option<String> {
        self.display_name.read().clone()
    }

    #[must_use]
    pub fn role(&self) -> MemberRole {
        *self.role.read()
    }

    /// Whether this member is the party leader.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.role() == MemberRole::Captain
    }

    #[must_use]
    pub fn joined_at(&self) -> DateTime<Utc> {
        self.joined_at
    }

    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision.load(Ordering::SeqCst)
    }

    pub(crate) fn set_role(&self, role: MemberRole) {
        *self.role.write() = role;
    }

    pub(crate) fn revision_counter(&self) -> Arc<AtomicU64> {
        Arc::clone(&self.revision)
    }

    pub(crate) fn with_meta<R>(&self, f: impl FnOnce(&MetaStore) -> R) -> R {
        f(&self.meta.read())
    }

    pub(crate) fn with_meta_mut<R>(&self, f: impl FnOnce(&mut MetaStore) -> R) -> R {
        f(&mut self.meta.write())
    }

    /// Snapshot of the member's encoded meta document.
    #[must_use]
    pub fn meta_schema(&self) -> Schema {
        self.meta.read().schema()
    }

    /// Applies a remote-pushed member update. The revision only moves
    /// forward; a lagging echo is applied to the meta but never regresses
    /// the counter.
    pub fn apply_update(&self, data: MemberUpdateData) {
        self.revision.fetch_max(data.revision, Ordering::SeqCst);
        if let Some(name) = data.account_dn {
            *self.display_name.write() = Some(name);
        }
        let mut meta = self.meta.write();
        meta.update(data.member_state_updated, UpdateSource::Remote);
        meta.remove(&data.member_state_removed);
        trace!(member = %self.id, revision = data.revision, "member update applied");
    }

    /// Serializes this member back into its snapshot shape.
    #[must_use]
    pub fn to_member_data(&self) -> MemberData {
        MemberData {
            account_id: self.id.clone(),
            account_dn: self.display_name(),
            role: self.role(),
            joined_at: Some(self.joined_at),
            updated_at: Some(Utc::now()),
            meta: self.meta_schema(),
            revision: self.revision(),
            external_auths: std::collections::HashMap::new(),
        }
    }

    // ---- Control capability ----

    fn control(&self) -> Result<Arc<dyn PartyControl>, PartyError> {
        self.control
            .as_ref()
            .and_then(Weak::upgrade)
            .ok_or(PartyError::Forbidden)
    }

    /// Kicks this member from the party.
    ///
    /// # Errors
    ///
    /// [`PartyError::Forbidden`] when no control capability is bound or the
    /// caller is not the leader; otherwise whatever the party operation
    /// surfaces.
    pub async fn kick(&self) -> Result<(), PartyError> {
        self.control()?.kick(&self.id).await
    }

    /// Promotes this member to party leader.
    ///
    /// # Errors
    ///
    /// Same contract as [`PartyMember::kick`].
    pub async fn promote(&self) -> Result<(), PartyError> {
        self.control()?.promote(&self.id).await
    }

    /// Hides or unhides this member in the squad assignments.
    ///
    /// # Errors
    ///
    /// Same contract as [`PartyMember::kick`].
    pub async fn hide(&self, hide: bool) -> Result<(), PartyError> {
        self.control()?.hide_member(&self.id, hide).await
    }

    // ---- Meta read accessors ----

    fn meta_json(&self, key: &str) -> Result<Option<JsonValue>, MetaError> {
        Ok(self.meta.read().get(key)?.and_then(MetaValue::into_json))
    }

    fn meta_text(&self, key: &str) -> Result<Option<String>, MetaError> {
        match self.meta.read().get(key)? {
            Some(MetaValue::Text(s)) => Ok(Some(s)),
            _ => Ok(None),
        }
    }

    fn loadout_asset(&self, field: &str) -> Result<Option<String>, MetaError> {
        let Some(value) = self.meta_json(keys::COSMETIC_LOADOUT)? else {
            return Ok(None);
        };
        Ok(value
            .pointer(&format!("/AthenaCosmeticLoadout/{field}"))
            .and_then(JsonValue::as_str)
            .and_then(loadout::asset_id)
            .map(str::to_owned))
    }

    /// The equipped outfit id.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored loadout value is malformed.
    pub fn outfit(&self) -> Result<Option<String>, MetaError> {
        self.loadout_asset("characterDef")
    }

    /// The equipped backpack id.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored loadout value is malformed.
    pub fn backpack(&self) -> Result<Option<String>, MetaError> {
        self.loadout_asset("backpackDef")
    }

    /// The equipped pickaxe id.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored loadout value is malformed.
    pub fn pickaxe(&self) -> Result<Option<String>, MetaError> {
        self.loadout_asset("pickaxeDef")
    }

    /// The playing emote id. The `"None"` sentinel reads as absent.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored emote value is malformed.
    pub fn emote(&self) -> Result<Option<String>, MetaError> {
        let Some(value) = self.meta_json(keys::FRONTEND_EMOTE)? else {
            return Ok(None);
        };
        let Some(def) = value
            .pointer("/FrontendEmote/emoteItemDef")
            .and_then(JsonValue::as_str)
        else {
            return Ok(None);
        };
        if def == loadout::NONE_ASSET {
            return Ok(None);
        }
        Ok(loadout::asset_id(def).map(str::to_owned))
    }

    /// Whether the member has readied up in the lobby.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored lobby state is malformed.
    pub fn is_ready(&self) -> Result<bool, MetaError> {
        Ok(self
            .meta_json(keys::LOBBY_STATE)?
            .and_then(|v| {
                v.pointer("/LobbyState/gameReadiness")
                    .and_then(JsonValue::as_str)
                    .map(|readiness| readiness == "Ready")
            })
            .unwrap_or(false))
    }

    /// The current input method.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored value is malformed.
    pub fn input(&self) -> Result<Option<String>, MetaError> {
        self.meta_text(keys::CURRENT_INPUT)
    }

    /// Cosmetic variant channels, re-keyed to PascalCase.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored variants value is malformed.
    pub fn variants(&self) -> Result<JsonMap<String, JsonValue>, MetaError> {
        Ok(self
            .meta_json(keys::COSMETIC_VARIANTS)?
            .map(|v| loadout::pascal_case_variants(&v))
            .unwrap_or_default())
    }

    /// The member's arbitrary custom data store entries.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored value is malformed.
    pub fn custom_data_store(&self) -> Result<Vec<String>, MetaError> {
        Ok(self
            .meta_json(keys::CUSTOM_DATA_STORE)?
            .and_then(|v| v.get("ArbitraryCustomDataStore").cloned())
            .and_then(|v| serde_json::from_value(v).ok())
            .unwrap_or_default())
    }

    /// The banner selection.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored banner value is malformed.
    pub fn banner(&self) -> Result<Option<Banner>, MetaError> {
        let Some(value) = self.meta_json(keys::BANNER_INFO)? else {
            return Ok(None);
        };
        let Some(info) = value.get("AthenaBannerInfo") else {
            return Ok(None);
        };
        serde_json::from_value(info.clone())
            .map(Some)
            .map_err(|source| MetaError::Json {
                key: keys::BANNER_INFO.to_string(),
                source,
            })
    }

    /// The battle pass state.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored value is malformed.
    pub fn battle_pass(&self) -> Result<Option<BattlePass>, MetaError> {
        let Some(value) = self.meta_json(keys::BATTLE_PASS_INFO)? else {
            return Ok(None);
        };
        let Some(info) = value.get("BattlePassInfo") else {
            return Ok(None);
        };
        serde_json::from_value(info.clone())
            .map(Some)
            .map_err(|source| MetaError::Json {
                key: keys::BATTLE_PASS_INFO.to_string(),
                source,
            })
    }

    /// The platform the member plays on.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored platform value is malformed.
    pub fn platform(&self) -> Result<Option<String>, MetaError> {
        Ok(self.meta_json(keys::PLATFORM_DATA)?.and_then(|v| {
            v.pointer("/PlatformData/platform/platformDescription/name")
                .and_then(JsonValue::as_str)
                .map(str::to_owned)
        }))
    }

    /// Match state assembled from five sibling keys; absent keys tolerated.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when a present key holds a malformed value.
    pub fn match_info(&self) -> Result<MatchInfo, MetaError> {
        let meta = self.meta.read();
        let location = match meta.get(keys::LOCATION)? {
            Some(MetaValue::Text(s)) => Some(s),
            _ => None,
        };
        let has_preloaded = meta.get(keys::HAS_PRELOADED)?.and_then(|v| v.as_bool());
        let is_spectatable = meta
            .get(keys::SPECTATE_AVAILABLE)?
            .and_then(|v| v.as_bool());
        let players_left = meta.get(keys::PLAYERS_LEFT)?.and_then(|v| v.as_int());
        let started_at = match meta.get(keys::MATCH_STARTED_AT)? {
            Some(MetaValue::Text(s)) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(|t| t.with_timezone(&Utc)),
            _ => None,
        };
        Ok(MatchInfo {
            location,
            has_preloaded,
            is_spectatable,
            players_left,
            started_at,
        })
    }

    /// The map marker; unset reads as the origin.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored marker value is malformed.
    pub fn marker(&self) -> Result<MapMarker, MetaError> {
        Ok(self
            .meta_json(keys::MAP_MARKER)?
            .map(|v| MapMarker::from_meta(&v))
            .unwrap_or_default())
    }

    /// The assisted challenge, if one is pinned.
    ///
    /// # Errors
    ///
    /// Surfaces [`MetaError`] when the stored value is malformed.
    pub fn assisted_challenge(&self) -> Result<Option<AssistedChallenge>, MetaError> {
        Ok(self
            .meta_json(keys::ASSISTED_CHALLENGE)?
            .as_ref()
            .and_then(AssistedChallenge::from_meta))
    }
}

// ---------------------------------------------------------------------------
// ClientPartyMember
// ---------------------------------------------------------------------------

/// The client's own member, whose meta it may mutate.
///
/// The member meta endpoint is revisioned independently of the party, so
/// this handle owns its own [`PatchPipeline`], sharing the member's revision
/// counter so remote member updates and patch acknowledgements converge.
pub struct ClientPartyMember {
    member: Arc<PartyMember>,
    party_id: String,
    service: Arc<dyn PartyService>,
    pipeline: PatchPipeline,
}

impl ClientPartyMember {
    pub(crate) fn new(
        member: Arc<PartyMember>,
        party_id: String,
        service: Arc<dyn PartyService>,
    ) -> Self {
        let pipeline = PatchPipeline::with_counter(member.revision_counter());
        Self {
            member,
            party_id,
            service,
            pipeline,
        }
    }

    /// The underlying member record.
    #[must_use]
    pub fn member(&self) -> &Arc<PartyMember> {
        &self.member
    }

    /// Submits a member meta patch through the member pipeline.
    ///
    /// # Errors
    ///
    /// Follows the pipeline contract: stale revisions are recovered
    /// transparently, change-forbidden maps to [`PartyError::Forbidden`],
    /// everything else propagates verbatim.
    pub async fn send_patch(&self, updated: Schema) -> Result<(), PartyError> {
        let member_id = self.member.id().to_string();
        self.pipeline
            .submit(move |revision| {
                let patch = MemberMetaPatch {
                    delete: Vec::new(),
                    revision,
                    update: updated.clone(),
                };
                let service = Arc::clone(&self.service);
                let party_id = self.party_id.clone();
                let member_id = member_id.clone();
                async move {
                    service
                        .update_member_meta(&party_id, &member_id, patch)
                        .await
                }
                .boxed()
            })
            .await
    }

    /// Merges fields into the wrapper object of a `_j` meta key and returns
    /// the single-entry updated set.
    fn merge_json_key(
        &self,
        key: &str,
        wrapper: &str,
        apply: impl FnOnce(&mut JsonMap<String, JsonValue>),
    ) -> Result<Schema, MetaError> {
        self.member.with_meta_mut(|meta| {
            let mut root = match meta.get(key)? {
                Some(MetaValue::Json(JsonValue::Object(map))) => map,
                _ => JsonMap::new(),
            };
            let inner = root
                .entry(wrapper.to_string())
                .or_insert_with(|| JsonValue::Object(JsonMap::new()));
            if !inner.is_object() {
                *inner = JsonValue::Object(JsonMap::new());
            }
            if let Some(obj) = inner.as_object_mut() {
                apply(obj);
            }
            let encoded = meta.set(key, JsonValue::Object(root));
            let mut updated = Schema::new();
            updated.insert(key.to_string(), encoded);
            Ok(updated)
        })
    }

    /// Readies or unreadies the client in the lobby.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_ready(&self, ready: bool) -> Result<(), PartyError> {
        let updated = self.merge_json_key(keys::LOBBY_STATE, "LobbyState", |state| {
            state.insert(
                "gameReadiness".to_string(),
                json!(if ready { "Ready" } else { "NotReady" }),
            );
        })?;
        self.send_patch(updated).await
    }

    /// Equips an outfit by id.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_outfit(&self, outfit_id: &str) -> Result<(), PartyError> {
        let def = format!("AthenaCharacter:{outfit_id}.{outfit_id}");
        let updated =
            self.merge_json_key(keys::COSMETIC_LOADOUT, "AthenaCosmeticLoadout", |loadout| {
                loadout.insert("characterDef".to_string(), json!(def));
            })?;
        self.send_patch(updated).await
    }

    /// Equips a backpack by id.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_backpack(&self, backpack_id: &str) -> Result<(), PartyError> {
        let def = format!("AthenaBackpack:{backpack_id}.{backpack_id}");
        let updated =
            self.merge_json_key(keys::COSMETIC_LOADOUT, "AthenaCosmeticLoadout", |loadout| {
                loadout.insert("backpackDef".to_string(), json!(def));
            })?;
        self.send_patch(updated).await
    }

    /// Equips a pickaxe by id.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_pickaxe(&self, pickaxe_id: &str) -> Result<(), PartyError> {
        let def = format!("AthenaPickaxe:{pickaxe_id}.{pickaxe_id}");
        let updated =
            self.merge_json_key(keys::COSMETIC_LOADOUT, "AthenaCosmeticLoadout", |loadout| {
                loadout.insert("pickaxeDef".to_string(), json!(def));
            })?;
        self.send_patch(updated).await
    }

    /// Plays an emote by id.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_emote(&self, emote_id: &str) -> Result<(), PartyError> {
        let def = format!("AthenaDance:{emote_id}.{emote_id}");
        let updated = self.merge_json_key(keys::FRONTEND_EMOTE, "FrontendEmote", |emote| {
            emote.insert("emoteItemDef".to_string(), json!(def));
            emote.insert("emoteSection".to_string(), json!(-2));
        })?;
        self.send_patch(updated).await
    }

    /// Stops the playing emote.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn clear_emote(&self) -> Result<(), PartyError> {
        let updated = self.merge_json_key(keys::FRONTEND_EMOTE, "FrontendEmote", |emote| {
            emote.insert("emoteItemDef".to_string(), json!(loadout::NONE_ASSET));
            emote.insert("emoteSection".to_string(), json!(-1));
        })?;
        self.send_patch(updated).await
    }

    /// Sets the banner selection.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_banner(&self, banner: Banner) -> Result<(), PartyError> {
        let updated = self.merge_json_key(keys::BANNER_INFO, "AthenaBannerInfo", |info| {
            info.insert("bannerIconId".to_string(), json!(banner.icon_id));
            info.insert("bannerColorId".to_string(), json!(banner.color_id));
            info.insert("seasonLevel".to_string(), json!(banner.season_level));
        })?;
        self.send_patch(updated).await
    }

    /// Sets the battle pass state.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_battle_pass(&self, pass: BattlePass) -> Result<(), PartyError> {
        let updated = self.merge_json_key(keys::BATTLE_PASS_INFO, "BattlePassInfo", |info| {
            info.insert("bHasPurchasedPass".to_string(), json!(pass.purchased));
            info.insert("passLevel".to_string(), json!(pass.level));
            info.insert("selfBoostXp".to_string(), json!(pass.self_boost_xp));
            info.insert("friendBoostXp".to_string(), json!(pass.friend_boost_xp));
        })?;
        self.send_patch(updated).await
    }

    /// Places or clears the map marker. The location tuple uses the same
    /// axis order the [`PartyMember::marker`] accessor returns.
    ///
    /// # Errors
    ///
    /// Follows the [`ClientPartyMember::send_patch`] contract.
    pub async fn set_marker(&self, location: Option<[f64; 2]>) -> Result<(), PartyError> {
        let updated = self.merge_json_key(keys::MAP_MARKER, "FrontEndMapMarker", |marker| {
            match location {
                Some([y, x]) => {
                    marker.insert("bIsSet".to_string(), json!(true));
                    marker.insert("markerLocation".to_string(), json!({ "x": x, "y": y }));
                }
                None => {
                    marker.insert("bIsSet".to_string(), json!(false));
                    marker.insert("markerLocation".to_string(), json!({ "x": 0.0, "y": 0.0 }));
                }
            }
        })?;
        self.send_patch(updated).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use partyline_core::messages::{ApiError, STALE_REVISION};

    use super::*;
    use crate::error::ServiceError;
    use crate::testutil::MockService;

    fn member_with_meta(meta: Schema) -> PartyMember {
        PartyMember::new(
            MemberData {
                account_id: "acc-1".to_string(),
                account_dn: Some("Player One".to_string()),
                meta,
                ..MemberData::default()
            },
            None,
        )
    }

    fn schema_of(entries: &[(&str, &str)]) -> Schema {
        entries
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    // ---- Capability gate ----

    struct RecordingControl {
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl PartyControl for RecordingControl {
        async fn kick(&self, member_id: &str) -> Result<(), PartyError> {
            self.calls.lock().push(format!("kick:{member_id}"));
            Ok(())
        }

        async fn promote(&self, member_id: &str) -> Result<(), PartyError> {
            self.calls.lock().push(format!("promote:{member_id}"));
            Ok(())
        }

        async fn hide_member(&self, member_id: &str, hide: bool) -> Result<(), PartyError> {
            self.calls.lock().push(format!("hide:{member_id}:{hide}"));
            Ok(())
        }
    }

    #[tokio::test]
    async fn member_without_capability_is_forbidden() {
        let member = member_with_meta(Schema::new());
        assert!(matches!(member.kick().await, Err(PartyError::Forbidden)));
        assert!(matches!(member.promote().await, Err(PartyError::Forbidden)));
        assert!(matches!(
            member.hide(true).await,
            Err(PartyError::Forbidden)
        ));
    }

    #[tokio::test]
    async fn member_with_dropped_party_is_forbidden() {
        let control: Arc<dyn PartyControl> = Arc::new(RecordingControl {
            calls: Mutex::new(Vec::new()),
        });
        let weak = Arc::downgrade(&control);
        drop(control);

        let member = PartyMember::new(
            MemberData {
                account_id: "acc-1".to_string(),
                ..MemberData::default()
            },
            Some(weak),
        );
        assert!(matches!(member.kick().await, Err(PartyError::Forbidden)));
    }

    #[tokio::test]
    async fn capability_delegates_to_the_party() {
        let control = Arc::new(RecordingControl {
            calls: Mutex::new(Vec::new()),
        });
        let as_dyn: Arc<dyn PartyControl> = control.clone();
        let member = PartyMember::new(
            MemberData {
                account_id: "acc-1".to_string(),
                ..MemberData::default()
            },
            Some(Arc::downgrade(&as_dyn)),
        );

        member.kick().await.unwrap();
        member.hide(true).await.unwrap();
        assert_eq!(*control.calls.lock(), vec!["kick:acc-1", "hide:acc-1:true"]);
    }

    // ---- Read accessors ----

    #[test]
    fn outfit_extracts_last_path_segment() {
        let member = member_with_meta(schema_of(&[(
            keys::COSMETIC_LOADOUT,
            r#"{"AthenaCosmeticLoadout":{"characterDef":"AthenaCharacter:CID_028_Athena_Commando_F.CID_028_Athena_Commando_F"}}"#,
        )]));
        assert_eq!(
            member.outfit().unwrap().as_deref(),
            Some("CID_028_Athena_Commando_F")
        );
        assert_eq!(member.backpack().unwrap(), None);
    }

    #[test]
    fn emote_none_sentinel_reads_absent() {
        let member = member_with_meta(schema_of(&[(
            keys::FRONTEND_EMOTE,
            r#"{"FrontendEmote":{"emoteItemDef":"None","emoteSection":-1}}"#,
        )]));
        assert_eq!(member.emote().unwrap(), None);
    }

    #[test]
    fn emote_asset_path_extraction() {
        let member = member_with_meta(schema_of(&[(
            keys::FRONTEND_EMOTE,
            r#"{"FrontendEmote":{"emoteItemDef":"AthenaDance:EID_Floss.EID_Floss","emoteSection":-2}}"#,
        )]));
        assert_eq!(member.emote().unwrap().as_deref(), Some("EID_Floss"));
    }

    #[test]
    fn readiness_defaults_to_not_ready() {
        let member = member_with_meta(Schema::new());
        assert!(!member.is_ready().unwrap());

        let ready = member_with_meta(schema_of(&[(
            keys::LOBBY_STATE,
            r#"{"LobbyState":{"gameReadiness":"Ready"}}"#,
        )]));
        assert!(ready.is_ready().unwrap());
    }

    #[test]
    fn malformed_loadout_surfaces_meta_error() {
        let member = member_with_meta(schema_of(&[(keys::COSMETIC_LOADOUT, "{broken")]));
        assert!(member.outfit().is_err());
    }

    #[test]
    fn match_info_tolerates_absent_keys() {
        let member = member_with_meta(schema_of(&[
            (keys::LOCATION, "InGame"),
            (keys::PLAYERS_LEFT, "42"),
        ]));
        let info = member.match_info().unwrap();
        assert_eq!(info.location.as_deref(), Some("InGame"));
        assert_eq!(info.players_left, Some(42));
        assert_eq!(info.has_preloaded, None);
        assert_eq!(info.started_at, None);
    }

    #[test]
    fn marker_defaults_when_absent() {
        let member = member_with_meta(Schema::new());
        let marker = member.marker().unwrap();
        assert!(!marker.is_set);
        assert_eq!(marker.location, [0.0, 0.0]);
    }

    #[test]
    fn variants_rekeyed_pascal_case() {
        let member = member_with_meta(schema_of(&[(
            keys::COSMETIC_VARIANTS,
            r#"{"vL":{"athenaCharacter":{"i":[]}}}"#,
        )]));
        let variants = member.variants().unwrap();
        assert!(variants.contains_key("AthenaCharacter"));
    }

    #[test]
    fn remote_update_applies_forward_only() {
        let member = member_with_meta(Schema::new());
        member.apply_update(MemberUpdateData {
            revision: 5,
            account_dn: Some("Renamed".to_string()),
            member_state_updated: schema_of(&[(keys::CURRENT_INPUT, "KBM")]),
            member_state_removed: vec![],
        });
        assert_eq!(member.revision(), 5);
        assert_eq!(member.display_name().as_deref(), Some("Renamed"));
        assert_eq!(member.input().unwrap().as_deref(), Some("KBM"));

        // A lagging echo never regresses the revision.
        member.apply_update(MemberUpdateData {
            revision: 3,
            account_dn: None,
            member_state_updated: Schema::new(),
            member_state_removed: vec![keys::CURRENT_INPUT.to_string()],
        });
        assert_eq!(member.revision(), 5);
        assert_eq!(member.input().unwrap(), None);
    }

    // ---- Client member patches ----

    fn client_member(service: Arc<MockService>) -> ClientPartyMember {
        let member = Arc::new(member_with_meta(Schema::new()));
        ClientPartyMember::new(member, "party-1".to_string(), service)
    }

    #[tokio::test]
    async fn set_outfit_patches_the_member_meta_endpoint() {
        let service = MockService::new();
        let me = client_member(Arc::clone(&service));

        me.set_outfit("CID_028_Athena_Commando_F").await.unwrap();

        let patches = service.member_patches();
        assert_eq!(patches.len(), 1);
        assert!(patches[0].delete.is_empty());
        assert_eq!(patches[0].revision, 0);
        let encoded = &patches[0].update[keys::COSMETIC_LOADOUT];
        assert!(encoded.contains(
            "AthenaCharacter:CID_028_Athena_Commando_F.CID_028_Athena_Commando_F"
        ));
        // Acknowledged patch advanced the member revision.
        assert_eq!(me.member().revision(), 1);
        // The read accessor sees exactly what the setter wrote.
        assert_eq!(
            me.member().outfit().unwrap().as_deref(),
            Some("CID_028_Athena_Commando_F")
        );
    }

    #[tokio::test]
    async fn loadout_merge_preserves_sibling_fields() {
        let service = MockService::new();
        let me = client_member(Arc::clone(&service));

        me.set_outfit("CID_001").await.unwrap();
        me.set_backpack("BID_002").await.unwrap();

        assert_eq!(me.member().outfit().unwrap().as_deref(), Some("CID_001"));
        assert_eq!(me.member().backpack().unwrap().as_deref(), Some("BID_002"));
    }

    #[tokio::test]
    async fn ready_toggle_round_trips() {
        let service = MockService::new();
        let me = client_member(Arc::clone(&service));

        me.set_ready(true).await.unwrap();
        assert!(me.member().is_ready().unwrap());
        me.set_ready(false).await.unwrap();
        assert!(!me.member().is_ready().unwrap());
        assert_eq!(service.member_patches().len(), 2);
    }

    #[tokio::test]
    async fn emote_set_and_clear() {
        let service = MockService::new();
        let me = client_member(Arc::clone(&service));

        me.set_emote("EID_Floss").await.unwrap();
        assert_eq!(me.member().emote().unwrap().as_deref(), Some("EID_Floss"));
        me.clear_emote().await.unwrap();
        assert_eq!(me.member().emote().unwrap(), None);
    }

    #[tokio::test]
    async fn marker_round_trips_through_setter_and_accessor() {
        let service = MockService::new();
        let me = client_member(Arc::clone(&service));

        me.set_marker(Some([-45.0, 120.5])).await.unwrap();
        let marker = me.member().marker().unwrap();
        assert!(marker.is_set);
        assert_eq!(marker.location, [-45.0, 120.5]);

        me.set_marker(None).await.unwrap();
        assert!(!me.member().marker().unwrap().is_set);
    }

    #[tokio::test]
    async fn member_patch_recovers_stale_revision() {
        let service = MockService::new();
        service.script(vec![
            Err(ServiceError::Api(ApiError {
                error_code: STALE_REVISION.to_string(),
                error_message: None,
                message_vars: vec!["acc-1".to_string(), "4".to_string()],
                numeric_error_code: None,
            })),
            Ok(()),
        ]);
        let me = client_member(Arc::clone(&service));

        me.set_ready(true).await.unwrap();

        let patches = service.member_patches();
        assert_eq!(patches.len(), 2);
        assert_eq!(patches[0].revision, 0);
        assert_eq!(patches[1].revision, 4);
        assert_eq!(me.member().revision(), 5);
    }
}
