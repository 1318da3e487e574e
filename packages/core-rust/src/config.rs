//! Party configuration: joinability, discoverability, privacy presets.
//!
//! The two config enums are never set independently of the privacy type:
//! switching to a restrictive privacy forces `INVITED_ONLY` discoverability
//! and `INVITE_AND_FORMER` joinability, switching to an open privacy restores
//! `ALL` and `OPEN`. The coupling lives in the party operation itself; this
//! module only defines the vocabulary and the preset table.

use serde::{Deserialize, Serialize};

/// Smallest allowed party size.
pub const MIN_PARTY_SIZE: u32 = 1;
/// Largest allowed party size.
pub const MAX_PARTY_SIZE: u32 = 16;
/// Default invite time-to-live, in seconds.
pub const DEFAULT_INVITE_TTL: u64 = 14400;

// ---------------------------------------------------------------------------
// Config enums
// ---------------------------------------------------------------------------

/// Who may join the party without an invite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Joinability {
    #[default]
    #[serde(rename = "OPEN")]
    Open,
    #[serde(rename = "INVITE_AND_FORMER")]
    InviteAndFormer,
}

impl Joinability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InviteAndFormer => "INVITE_AND_FORMER",
        }
    }
}

/// Who can discover the party through search and presence.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Discoverability {
    #[default]
    #[serde(rename = "ALL")]
    All,
    #[serde(rename = "INVITED_ONLY")]
    InvitedOnly,
}

impl Discoverability {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "ALL",
            Self::InvitedOnly => "INVITED_ONLY",
        }
    }
}

// ---------------------------------------------------------------------------
// Privacy
// ---------------------------------------------------------------------------

/// The party type carried inside `Default:PrivacySettings_j`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PrivacyPartyType {
    Public,
    FriendsOnly,
    Private,
}

impl PrivacyPartyType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "Public",
            Self::FriendsOnly => "FriendsOnly",
            Self::Private => "Private",
        }
    }
}

/// Which members may send invites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InviteRestriction {
    AnyMember,
    LeaderOnly,
}

impl InviteRestriction {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::AnyMember => "AnyMember",
            Self::LeaderOnly => "LeaderOnly",
        }
    }
}

/// Who sees the party through member presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PresencePermission {
    Anyone,
    Leader,
    Noone,
}

impl PresencePermission {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anyone => "Anyone",
            Self::Leader => "Leader",
            Self::Noone => "Noone",
        }
    }
}

/// Who may issue invites at the config level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InvitePermission {
    Anyone,
    AnyMember,
    Leader,
}

impl InvitePermission {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Anyone => "Anyone",
            Self::AnyMember => "AnyMember",
            Self::Leader => "Leader",
        }
    }
}

/// A full privacy configuration, as stored in the party meta and config.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartyPrivacy {
    pub party_type: PrivacyPartyType,
    pub invite_restriction: InviteRestriction,
    pub only_leader_friends_can_join: bool,
    pub presence_permission: PresencePermission,
    pub accepting_members: bool,
    pub invite_permission: InvitePermission,
}

impl PartyPrivacy {
    /// Anyone can join and discover the party.
    #[must_use]
    pub fn public() -> Self {
        Self {
            party_type: PrivacyPartyType::Public,
            invite_restriction: InviteRestriction::AnyMember,
            only_leader_friends_can_join: false,
            presence_permission: PresencePermission::Anyone,
            accepting_members: true,
            invite_permission: InvitePermission::Anyone,
        }
    }

    /// Friends of any member may join.
    #[must_use]
    pub fn friends_allow_friends_of_friends() -> Self {
        Self {
            party_type: PrivacyPartyType::FriendsOnly,
            invite_restriction: InviteRestriction::AnyMember,
            only_leader_friends_can_join: false,
            presence_permission: PresencePermission::Anyone,
            accepting_members: true,
            invite_permission: InvitePermission::AnyMember,
        }
    }

    /// Only friends of the leader may join.
    #[must_use]
    pub fn friends() -> Self {
        Self {
            party_type: PrivacyPartyType::FriendsOnly,
            invite_restriction: InviteRestriction::LeaderOnly,
            only_leader_friends_can_join: true,
            presence_permission: PresencePermission::Leader,
            accepting_members: false,
            invite_permission: InvitePermission::Leader,
        }
    }

    /// Invite only, any member may invite.
    #[must_use]
    pub fn private_allow_friends_of_friends() -> Self {
        Self {
            party_type: PrivacyPartyType::Private,
            invite_restriction: InviteRestriction::AnyMember,
            only_leader_friends_can_join: false,
            presence_permission: PresencePermission::Noone,
            accepting_members: false,
            invite_permission: InvitePermission::AnyMember,
        }
    }

    /// Invite only, leader invites only.
    #[must_use]
    pub fn private() -> Self {
        Self {
            party_type: PrivacyPartyType::Private,
            invite_restriction: InviteRestriction::LeaderOnly,
            only_leader_friends_can_join: true,
            presence_permission: PresencePermission::Noone,
            accepting_members: false,
            invite_permission: InvitePermission::Leader,
        }
    }

    /// All known presets, used to deduce the privacy from a remote
    /// `Default:PrivacySettings_j` payload.
    #[must_use]
    pub fn presets() -> [Self; 5] {
        [
            Self::public(),
            Self::friends_allow_friends_of_friends(),
            Self::friends(),
            Self::private_allow_friends_of_friends(),
            Self::private(),
        ]
    }

    /// Finds the preset matching the three fields echoed in the privacy
    /// settings meta object, if any.
    #[must_use]
    pub fn match_settings(
        party_type: &str,
        invite_restriction: &str,
        only_leader_friends_can_join: bool,
    ) -> Option<Self> {
        Self::presets().into_iter().find(|p| {
            p.party_type.as_str() == party_type
                && p.invite_restriction.as_str() == invite_restriction
                && p.only_leader_friends_can_join == only_leader_friends_can_join
        })
    }

    /// Whether this privacy is a restrictive (invite-only) mode.
    #[must_use]
    pub fn is_restrictive(&self) -> bool {
        self.party_type == PrivacyPartyType::Private
    }
}

impl Default for PartyPrivacy {
    fn default() -> Self {
        Self::public()
    }
}

// ---------------------------------------------------------------------------
// PartyConfig
// ---------------------------------------------------------------------------

/// The party configuration snapshot carried in every patch request.
#[derive(Debug, Clone, PartialEq)]
pub struct PartyConfig {
    pub join_confirmation: bool,
    pub joinability: Joinability,
    pub discoverability: Discoverability,
    pub max_size: u32,
    pub privacy: PartyPrivacy,
    pub party_type: String,
    pub sub_type: String,
    pub invite_ttl: u64,
}

impl Default for PartyConfig {
    fn default() -> Self {
        Self {
            join_confirmation: false,
            joinability: Joinability::Open,
            discoverability: Discoverability::All,
            max_size: MAX_PARTY_SIZE,
            privacy: PartyPrivacy::public(),
            party_type: "DEFAULT".to_string(),
            sub_type: "default".to_string(),
            invite_ttl: DEFAULT_INVITE_TTL,
        }
    }
}

/// A matchmaking playlist selection, merged into `Default:PlaylistData_j`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Playlist {
    pub playlist_name: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub tournament_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub event_window_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub region_id: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn restrictive_presets_are_private_only() {
        assert!(PartyPrivacy::private().is_restrictive());
        assert!(PartyPrivacy::private_allow_friends_of_friends().is_restrictive());
        assert!(!PartyPrivacy::public().is_restrictive());
        assert!(!PartyPrivacy::friends().is_restrictive());
    }

    #[test]
    fn match_settings_finds_each_preset() {
        for preset in PartyPrivacy::presets() {
            let found = PartyPrivacy::match_settings(
                preset.party_type.as_str(),
                preset.invite_restriction.as_str(),
                preset.only_leader_friends_can_join,
            );
            assert_eq!(found, Some(preset));
        }
    }

    #[test]
    fn match_settings_unknown_combination() {
        assert_eq!(PartyPrivacy::match_settings("Public", "LeaderOnly", true), None);
    }

    #[test]
    fn joinability_wire_names() {
        assert_eq!(
            serde_json::to_string(&Joinability::InviteAndFormer).unwrap(),
            "\"INVITE_AND_FORMER\""
        );
        assert_eq!(
            serde_json::from_str::<Discoverability>("\"INVITED_ONLY\"").unwrap(),
            Discoverability::InvitedOnly
        );
    }

    #[test]
    fn default_config_is_open_sixteen() {
        let config = PartyConfig::default();
        assert_eq!(config.max_size, 16);
        assert_eq!(config.joinability, Joinability::Open);
        assert_eq!(config.discoverability, Discoverability::All);
        assert_eq!(config.invite_ttl, 14400);
    }
}
