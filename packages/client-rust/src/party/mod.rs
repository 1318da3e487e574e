//! The client-side party model and its leadership-gated operations.
//!
//! Every mutating party operation follows one template: leader precondition
//! (fail [`PartyError::Forbidden`] with zero network calls), target
//! resolution where applicable, meta delta through the store, then either a
//! pipeline submission (revisioned patches) or a direct one-shot request
//! with the forbidden-code remap.

pub mod confirmation;
pub mod member;

use std::sync::{Arc, Weak};

use dashmap::DashMap;
use futures_util::FutureExt;
use indexmap::IndexMap;
use parking_lot::RwLock;
use partyline_core::config::{
    Discoverability, Joinability, PartyConfig, PartyPrivacy, Playlist, MAX_PARTY_SIZE,
    MIN_PARTY_SIZE,
};
use partyline_core::keys;
use partyline_core::messages::{
    JoinConfirmationData, MemberData, MemberRole, MetaDelta, PartyData, PartyPatchRequest,
    PartyUpdateData, PatchConfig,
};
use partyline_core::{MetaError, MetaStore, MetaValue, Schema, UpdateSource};
use serde_json::{json, Map as JsonMap, Value as JsonValue};
use tracing::{debug, trace};

use crate::error::PartyError;
use crate::party::confirmation::JoinConfirmation;
use crate::party::member::{ClientPartyMember, PartyMember};
use crate::pipeline::PatchPipeline;
use crate::traits::{FriendRoster, PartyControl, PartyService};

use async_trait::async_trait;

// ---------------------------------------------------------------------------
// ClientIdentity
// ---------------------------------------------------------------------------

/// The local account the party is observed through.
#[derive(Debug, Clone)]
pub struct ClientIdentity {
    pub account_id: String,
    pub display_name: String,
    pub platform: String,
    pub build_id: String,
}

// ---------------------------------------------------------------------------
// ClientParty
// ---------------------------------------------------------------------------

/// The party the client currently belongs to.
///
/// Holds the shared meta document, the member registry in join order, the
/// pending join confirmations, and the patch pipeline all party-level
/// mutations flow through. Constructed as an `Arc` so members can hold a
/// `Weak` control capability back into it.
pub struct ClientParty {
    id: String,
    identity: ClientIdentity,
    service: Arc<dyn PartyService>,
    roster: Arc<dyn FriendRoster>,
    pipeline: PatchPipeline,
    config: RwLock<PartyConfig>,
    meta: RwLock<MetaStore>,
    // Join order, which squad assignment rebuilds depend on.
    members: RwLock<IndexMap<String, Arc<PartyMember>>>,
    me: RwLock<Option<Arc<ClientPartyMember>>>,
    confirmations: DashMap<String, JoinConfirmation>,
    hidden: RwLock<Vec<String>>,
}

impl ClientParty {
    /// Builds the party model from a remote snapshot.
    #[must_use]
    pub fn new(
        data: PartyData,
        identity: ClientIdentity,
        service: Arc<dyn PartyService>,
        roster: Arc<dyn FriendRoster>,
    ) -> Arc<Self> {
        let meta = MetaStore::from_schema(data.meta);
        let privacy = deduce_privacy(&meta).unwrap_or_default();
        let config = PartyConfig {
            join_confirmation: data.config.join_confirmation,
            joinability: data.config.joinability,
            discoverability: data.config.discoverability,
            max_size: data.config.max_size,
            privacy,
            party_type: data.config.party_type,
            sub_type: data.config.sub_type,
            invite_ttl: data.config.invite_ttl_seconds,
        };
        let party = Arc::new(Self {
            id: data.id,
            identity,
            service,
            roster,
            pipeline: PatchPipeline::new(data.revision),
            config: RwLock::new(config),
            meta: RwLock::new(meta),
            members: RwLock::new(IndexMap::new()),
            me: RwLock::new(None),
            confirmations: DashMap::new(),
            hidden: RwLock::new(Vec::new()),
        });
        for member in data.members {
            party.add_member(member);
        }
        party
    }

    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// The revision held by the party pipeline.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.pipeline.revision()
    }

    /// Snapshot of the current config.
    #[must_use]
    pub fn config(&self) -> PartyConfig {
        self.config.read().clone()
    }

    /// Snapshot of the party meta document.
    #[must_use]
    pub fn meta_schema(&self) -> Schema {
        self.meta.read().schema()
    }

    // ---- Membership ----

    /// Registers a member from its snapshot, wiring the control capability.
    /// If the snapshot is the client's own account, the controllable member
    /// handle is (re)built as well.
    pub fn add_member(self: &Arc<Self>, data: MemberData) -> Arc<PartyMember> {
        let control: Weak<dyn PartyControl> =
            Arc::downgrade(&(Arc::clone(self) as Arc<dyn PartyControl>));
        let is_me = data.account_id == self.identity.account_id;
        let member = Arc::new(PartyMember::new(data, Some(control)));
        self.members
            .write()
            .insert(member.id().to_string(), Arc::clone(&member));
        if is_me {
            *self.me.write() = Some(Arc::new(ClientPartyMember::new(
                Arc::clone(&member),
                self.id.clone(),
                Arc::clone(&self.service),
            )));
        }
        trace!(member = %member.id(), "member added");
        member
    }

    /// Drops a member from the registry (and the hidden list).
    pub fn remove_member(&self, member_id: &str) -> Option<Arc<PartyMember>> {
        self.hidden.write().retain(|id| id != member_id);
        let removed = self.members.write().shift_remove(member_id);
        if removed.is_some() {
            trace!(member = %member_id, "member removed");
        }
        removed
    }

    /// Looks a member up by account id.
    #[must_use]
    pub fn member(&self, member_id: &str) -> Option<Arc<PartyMember>> {
        self.members.read().get(member_id).cloned()
    }

    /// Looks a member up by account id or display name.
    #[must_use]
    pub fn member_by_query(&self, query: &str) -> Option<Arc<PartyMember>> {
        let members = self.members.read();
        members.get(query).cloned().or_else(|| {
            members
                .values()
                .find(|m| m.display_name().as_deref() == Some(query))
                .cloned()
        })
    }

    /// All members, in join order.
    #[must_use]
    pub fn members(&self) -> Vec<Arc<PartyMember>> {
        self.members.read().values().cloned().collect()
    }

    #[must_use]
    pub fn member_count(&self) -> usize {
        self.members.read().len()
    }

    /// The current party leader.
    #[must_use]
    pub fn leader(&self) -> Option<Arc<PartyMember>> {
        self.members
            .read()
            .values()
            .find(|m| m.is_leader())
            .cloned()
    }

    /// The client's own controllable member, once its snapshot has arrived.
    #[must_use]
    pub fn me(&self) -> Option<Arc<ClientPartyMember>> {
        self.me.read().clone()
    }

    /// Whether the local account currently holds the leader role.
    #[must_use]
    pub fn is_leader(&self) -> bool {
        self.leader()
            .is_some_and(|leader| leader.id() == self.identity.account_id)
    }

    /// Member ids currently hidden from squad assignments.
    #[must_use]
    pub fn hidden_member_ids(&self) -> Vec<String> {
        self.hidden.read().clone()
    }

    fn require_leader(&self) -> Result<(), PartyError> {
        if self.is_leader() {
            Ok(())
        } else {
            Err(PartyError::Forbidden)
        }
    }

    // ---- Patch plumbing ----

    fn build_patch_request(
        &self,
        updated: Option<Schema>,
        deleted: Vec<String>,
        revision: u64,
    ) -> PartyPatchRequest {
        let config = self.config.read().clone();
        let update = updated.unwrap_or_else(|| self.meta.read().schema());
        PartyPatchRequest {
            config: PatchConfig {
                join_confirmation: config.join_confirmation,
                joinability: config.joinability,
                max_size: config.max_size,
                discoverability: config.discoverability,
            },
            meta: MetaDelta {
                update,
                delete: deleted,
            },
            party_state_overridden: JsonMap::new(),
            party_privacy_type: config.joinability,
            party_type: config.party_type,
            party_sub_type: config.sub_type,
            max_number_of_members: config.max_size,
            invite_ttl_seconds: config.invite_ttl,
            revision,
        }
    }

    /// Submits one party patch through the pipeline.
    ///
    /// `updated` carries the changed pairs, or `None` to resend the full
    /// current schema. The config snapshot and revision are captured fresh
    /// per attempt, so a stale-revision resubmission carries the same
    /// logical patch at the corrected revision.
    ///
    /// # Errors
    ///
    /// Follows the pipeline contract: stale revisions recovered, forbidden
    /// remapped, everything else verbatim.
    pub async fn send_patch(
        &self,
        updated: Option<Schema>,
        deleted: Vec<String>,
    ) -> Result<(), PartyError> {
        self.pipeline
            .submit(move |revision| {
                let request = self.build_patch_request(updated.clone(), deleted.clone(), revision);
                let service = Arc::clone(&self.service);
                let party_id = self.id.clone();
                async move { service.update_party(&party_id, request).await }.boxed()
            })
            .await
    }

    /// Merges fields into the wrapper object of a `_j` party meta key and
    /// returns the single-entry updated set.
    fn merge_json_key(
        &self,
        key: &str,
        wrapper: &str,
        apply: impl FnOnce(&mut JsonMap<String, JsonValue>),
    ) -> Result<Schema, MetaError> {
        let mut meta = self.meta.write();
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
    }

    // ---- Leadership-gated operations ----

    /// Kicks a member, resolved by id or display name.
    ///
    /// Direct request, not through the pipeline.
    ///
    /// # Errors
    ///
    /// `Forbidden` when the client is not the leader (zero network calls),
    /// `MemberNotFound` when no member matches, otherwise the service
    /// outcome with the forbidden-code remap.
    pub async fn kick(&self, member_query: &str) -> Result<(), PartyError> {
        self.require_leader()?;
        let member = self
            .member_by_query(member_query)
            .ok_or_else(|| PartyError::MemberNotFound(member_query.to_string()))?;
        debug!(member = %member.id(), "kicking member");
        self.service.kick(&self.id, member.id()).await?;
        Ok(())
    }

    /// Transfers leadership to a member, resolved by id or display name.
    ///
    /// # Errors
    ///
    /// Same contract as [`ClientParty::kick`].
    pub async fn promote(&self, member_query: &str) -> Result<(), PartyError> {
        self.require_leader()?;
        let member = self
            .member_by_query(member_query)
            .ok_or_else(|| PartyError::MemberNotFound(member_query.to_string()))?;
        debug!(member = %member.id(), "promoting member");
        self.service.promote(&self.id, member.id()).await?;
        Ok(())
    }

    /// Invites a friend, resolved by id or display name through the roster.
    ///
    /// Private parties send a build-metadata invite; open parties ping the
    /// target so their client surfaces the joinable party.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders, `FriendNotFound` when the roster has no
    /// match, `AlreadyInParty` when the friend is a current member,
    /// `MaxSizeReached` when the party is full — all with zero network
    /// calls. Otherwise the service outcome.
    pub async fn invite(&self, friend_query: &str) -> Result<(), PartyError> {
        self.require_leader()?;
        let friend = self
            .roster
            .find(friend_query)
            .ok_or_else(|| PartyError::FriendNotFound(friend_query.to_string()))?;
        if self.members.read().contains_key(&friend.id) {
            return Err(PartyError::AlreadyInParty);
        }
        let (max_size, restrictive) = {
            let config = self.config.read();
            (config.max_size, config.privacy.is_restrictive())
        };
        if self.members.read().len() >= max_size as usize {
            return Err(PartyError::MaxSizeReached);
        }

        let mut payload = Schema::new();
        if restrictive {
            payload.insert(keys::BUILD_ID.to_string(), self.identity.build_id.clone());
            payload.insert(
                keys::CONN_PLATFORM.to_string(),
                self.identity.platform.clone(),
            );
            payload.insert(keys::CONN_TYPE.to_string(), "game".to_string());
            payload.insert(keys::INVITE_PLATFORM_DATA.to_string(), String::new());
            payload.insert(
                keys::MEMBER_DN.to_string(),
                self.identity.display_name.clone(),
            );
            debug!(friend = %friend.id, "sending party invite");
            self.service.invite(&self.id, &friend.id, payload).await?;
        } else {
            payload.insert(keys::INVITE_PLATFORM_DATA.to_string(), String::new());
            debug!(friend = %friend.id, "pinging friend into open party");
            self.service
                .ping(&friend.id, &self.identity.account_id, payload)
                .await?;
        }
        Ok(())
    }

    /// Switches the party privacy, applying the coupled config rules in the
    /// same patch: a restrictive privacy forces `INVITED_ONLY` +
    /// `INVITE_AND_FORMER`, deletes the accepting-members key and sets the
    /// not-accepting reason; an open privacy restores `ALL` + `OPEN` and
    /// deletes the reason key.
    ///
    /// Returns the updated/deleted sets the patch carried.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders with zero network calls; otherwise the
    /// pipeline contract.
    pub async fn set_privacy(
        &self,
        privacy: PartyPrivacy,
    ) -> Result<(Schema, Vec<String>), PartyError> {
        self.require_leader()?;
        let mut updated = Schema::new();
        let mut deleted = Vec::new();
        {
            let mut meta = self.meta.write();
            let mut root = match meta.get(keys::PRIVACY_SETTINGS)? {
                Some(MetaValue::Json(JsonValue::Object(map))) => map,
                _ => JsonMap::new(),
            };
            let inner = root
                .entry("PrivacySettings".to_string())
                .or_insert_with(|| JsonValue::Object(JsonMap::new()));
            if !inner.is_object() {
                *inner = JsonValue::Object(JsonMap::new());
            }
            if let Some(settings) = inner.as_object_mut() {
                settings.insert("partyType".to_string(), json!(privacy.party_type.as_str()));
                settings.insert(
                    "partyInviteRestriction".to_string(),
                    json!(privacy.invite_restriction.as_str()),
                );
                settings.insert(
                    "bOnlyLeaderFriendsCanJoin".to_string(),
                    json!(privacy.only_leader_friends_can_join),
                );
            }
            updated.insert(
                keys::PRIVACY_SETTINGS.to_string(),
                meta.set(keys::PRIVACY_SETTINGS, JsonValue::Object(root)),
            );
            updated.insert(
                keys::PRESENCE_PERM.to_string(),
                meta.set(keys::PRESENCE_PERM, privacy.presence_permission.as_str()),
            );
            updated.insert(
                keys::ACCEPTING_MEMBERS.to_string(),
                meta.set(keys::ACCEPTING_MEMBERS, privacy.accepting_members),
            );
            updated.insert(
                keys::INVITE_PERM.to_string(),
                meta.set(keys::INVITE_PERM, privacy.invite_permission.as_str()),
            );
            if privacy.is_restrictive() {
                deleted.push(keys::NOT_ACCEPTING_MEMBERS.to_string());
                updated.insert(
                    keys::NOT_ACCEPTING_MEMBERS_REASON.to_string(),
                    meta.set(keys::NOT_ACCEPTING_MEMBERS_REASON, 7_i64),
                );
            } else {
                deleted.push(keys::NOT_ACCEPTING_MEMBERS_REASON.to_string());
            }
            meta.remove(&deleted);
        }
        {
            let mut config = self.config.write();
            config.privacy = privacy;
            if privacy.is_restrictive() {
                config.discoverability = Discoverability::InvitedOnly;
                config.joinability = Joinability::InviteAndFormer;
            } else {
                config.discoverability = Discoverability::All;
                config.joinability = Joinability::Open;
            }
        }
        self.send_patch(Some(updated.clone()), deleted.clone())
            .await?;
        Ok((updated, deleted))
    }

    /// Selects the matchmaking playlist, merging over the current selection.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders; otherwise the pipeline contract.
    pub async fn set_playlist(&self, playlist: &Playlist) -> Result<(), PartyError> {
        self.require_leader()?;
        let patch =
            serde_json::to_value(playlist).map_err(|source| MetaError::Json {
                key: keys::PLAYLIST_DATA.to_string(),
                source,
            })?;
        let updated = self.merge_json_key(keys::PLAYLIST_DATA, "PlaylistData", |data| {
            if let JsonValue::Object(fields) = patch {
                for (field, value) in fields {
                    data.insert(field, value);
                }
            }
        })?;
        self.send_patch(Some(updated), Vec::new()).await
    }

    /// Toggles automatic squad filling.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders; otherwise the pipeline contract.
    pub async fn set_squad_fill(&self, fill: bool) -> Result<(), PartyError> {
        self.require_leader()?;
        let encoded = self.meta.write().set(keys::SQUAD_FILL, fill);
        let mut updated = Schema::new();
        updated.insert(keys::SQUAD_FILL.to_string(), encoded);
        self.send_patch(Some(updated), Vec::new()).await
    }

    /// Sets the custom matchmaking key; `None` clears it (empty string on
    /// the wire).
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders; otherwise the pipeline contract.
    pub async fn set_custom_matchmaking_key(
        &self,
        key: Option<&str>,
    ) -> Result<(), PartyError> {
        self.require_leader()?;
        let encoded = self
            .meta
            .write()
            .set(keys::CUSTOM_MATCH_KEY, key.unwrap_or_default());
        let mut updated = Schema::new();
        updated.insert(keys::CUSTOM_MATCH_KEY.to_string(), encoded);
        self.send_patch(Some(updated), Vec::new()).await
    }

    /// Resizes the party. Valid sizes update the config and resend the full
    /// schema as one patch.
    ///
    /// # Errors
    ///
    /// `SizeOutOfRange` outside 1..=16, `SizeBelowMemberCount` when the
    /// party already holds more members — both local, zero network calls.
    /// `Forbidden` for non-leaders; otherwise the pipeline contract.
    pub async fn set_max_size(&self, size: u32) -> Result<(), PartyError> {
        self.require_leader()?;
        if !(MIN_PARTY_SIZE..=MAX_PARTY_SIZE).contains(&size) {
            return Err(PartyError::SizeOutOfRange(size));
        }
        let members = self.members.read().len();
        if (size as usize) < members {
            return Err(PartyError::SizeBelowMemberCount {
                requested: size,
                members: members as u32,
            });
        }
        self.config.write().max_size = size;
        self.send_patch(None, Vec::new()).await
    }

    /// Hides or unhides one member in the squad assignments, resolved by id
    /// or display name, then rebuilds and patches the assignments.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders, `MemberNotFound` when no member
    /// matches; otherwise the pipeline contract.
    pub async fn hide_member(&self, member_query: &str, hide: bool) -> Result<(), PartyError> {
        self.require_leader()?;
        let member = self
            .member_by_query(member_query)
            .ok_or_else(|| PartyError::MemberNotFound(member_query.to_string()))?;
        {
            let mut hidden = self.hidden.write();
            if hide {
                if !hidden.iter().any(|id| id == member.id()) {
                    hidden.push(member.id().to_string());
                }
            } else {
                hidden.retain(|id| id != member.id());
            }
        }
        self.refresh_squad_assignments().await
    }

    /// Hides (or unhides) every member except the client itself, then
    /// rebuilds and patches the assignments.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders; otherwise the pipeline contract.
    pub async fn hide_members(&self, hide: bool) -> Result<(), PartyError> {
        self.require_leader()?;
        {
            let mut hidden = self.hidden.write();
            hidden.clear();
            if hide {
                hidden.extend(
                    self.members
                        .read()
                        .keys()
                        .filter(|id| **id != self.identity.account_id)
                        .cloned(),
                );
            }
        }
        self.refresh_squad_assignments().await
    }

    /// Rebuilds `Default:RawSquadAssignments_j` from the member list in
    /// join order, skipping hidden members, and patches it.
    ///
    /// # Errors
    ///
    /// `Forbidden` for non-leaders; otherwise the pipeline contract.
    pub async fn refresh_squad_assignments(&self) -> Result<(), PartyError> {
        self.require_leader()?;
        let assignments: Vec<JsonValue> = {
            let members = self.members.read();
            let hidden = self.hidden.read();
            members
                .keys()
                .filter(|id| !hidden.contains(id))
                .enumerate()
                .map(|(index, id)| {
                    json!({ "memberId": id, "absoluteMemberIdx": index })
                })
                .collect()
        };
        let encoded = self.meta.write().set(
            keys::RAW_SQUAD_ASSIGNMENTS,
            json!({ "RawSquadAssignments": assignments }),
        );
        let mut updated = Schema::new();
        updated.insert(keys::RAW_SQUAD_ASSIGNMENTS.to_string(), encoded);
        self.send_patch(Some(updated), Vec::new()).await
    }

    // ---- Join confirmations ----

    /// Records a pending join request delivered to the leader.
    pub fn handle_confirmation(&self, data: JoinConfirmationData) {
        let confirmation = JoinConfirmation::from(data);
        debug!(user = %confirmation.user_id, "join confirmation pending");
        self.confirmations
            .insert(confirmation.user_id.clone(), confirmation);
    }

    /// Whether a join request from this user is still awaiting a decision.
    #[must_use]
    pub fn is_confirmation_active(&self, user_id: &str) -> bool {
        self.confirmations.contains_key(user_id)
    }

    /// All pending join requests.
    #[must_use]
    pub fn pending_confirmations(&self) -> Vec<JoinConfirmation> {
        self.confirmations
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Accepts a pending join request, removing it on success.
    ///
    /// # Errors
    ///
    /// `MemberNotFound` when no request from this user is pending (zero
    /// network calls); otherwise the service outcome with the forbidden
    /// remap.
    pub async fn confirm_join(&self, user_id: &str) -> Result<(), PartyError> {
        if !self.confirmations.contains_key(user_id) {
            return Err(PartyError::MemberNotFound(user_id.to_string()));
        }
        self.service.confirm_join(&self.id, user_id).await?;
        self.confirmations.remove(user_id);
        Ok(())
    }

    /// Rejects a pending join request, removing it on success.
    ///
    /// # Errors
    ///
    /// Same contract as [`ClientParty::confirm_join`].
    pub async fn reject_join(&self, user_id: &str) -> Result<(), PartyError> {
        if !self.confirmations.contains_key(user_id) {
            return Err(PartyError::MemberNotFound(user_id.to_string()));
        }
        self.service.reject_join(&self.id, user_id).await?;
        self.confirmations.remove(user_id);
        Ok(())
    }

    // ---- Remote update application ----

    /// Applies a remote-pushed party update: forward-only revision bump,
    /// captain reassignment, meta merge/removal, config echoes, and privacy
    /// deduction when the settings object matches a known preset.
    pub fn apply_update(&self, data: PartyUpdateData) {
        self.pipeline.observe_remote(data.revision);

        if let Some(captain_id) = &data.captain_id {
            let members = self.members.read();
            for (id, member) in members.iter() {
                member.set_role(if id == captain_id {
                    MemberRole::Captain
                } else {
                    MemberRole::Member
                });
            }
        }

        {
            let mut meta = self.meta.write();
            meta.update(data.party_state_updated, UpdateSource::Remote);
            meta.remove(&data.party_state_removed);
        }

        {
            let mut config = self.config.write();
            if let Some(joinability) = data.party_privacy_type {
                config.joinability = joinability;
            }
            if let Some(discoverability) = data.discoverability {
                config.discoverability = discoverability;
            }
            if let Some(max_size) = data.max_number_of_members {
                config.max_size = max_size;
            }
            if let Some(party_type) = data.party_type {
                config.party_type = party_type;
            }
            if let Some(sub_type) = data.party_sub_type {
                config.sub_type = sub_type;
            }
            if let Some(ttl) = data.invite_ttl_seconds {
                config.invite_ttl = ttl;
            }
        }

        let privacy = deduce_privacy(&self.meta.read());
        if let Some(privacy) = privacy {
            self.config.write().privacy = privacy;
        }
        debug!(revision = data.revision, "party update applied");
    }
}

/// Deduces the privacy preset from `Default:PrivacySettings_j`, if the
/// stored object matches one.
fn deduce_privacy(meta: &MetaStore) -> Option<PartyPrivacy> {
    let value = meta.get(keys::PRIVACY_SETTINGS).ok()??.into_json()?;
    let settings = value.get("PrivacySettings")?;
    let party_type = settings.get("partyType")?.as_str()?;
    let restriction = settings.get("partyInviteRestriction")?.as_str()?;
    let leader_only = settings.get("bOnlyLeaderFriendsCanJoin")?.as_bool()?;
    PartyPrivacy::match_settings(party_type, restriction, leader_only)
}

// ---------------------------------------------------------------------------
// Control capability
// ---------------------------------------------------------------------------

#[async_trait]
impl PartyControl for ClientParty {
    async fn kick(&self, member_id: &str) -> Result<(), PartyError> {
        ClientParty::kick(self, member_id).await
    }

    async fn promote(&self, member_id: &str) -> Result<(), PartyError> {
        ClientParty::promote(self, member_id).await
    }

    async fn hide_member(&self, member_id: &str, hide: bool) -> Result<(), PartyError> {
        ClientParty::hide_member(self, member_id, hide).await
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
