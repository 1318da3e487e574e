//! Well-known meta key names.
//!
//! The suffix of each key carries its type tag (see [`crate::meta`]).

// ---- Party-level keys ----

pub const SQUAD_FILL: &str = "Default:AthenaSquadFill_b";
pub const PLAYLIST_DATA: &str = "Default:PlaylistData_j";
pub const CUSTOM_MATCH_KEY: &str = "Default:CustomMatchKey_s";
pub const RAW_SQUAD_ASSIGNMENTS: &str = "Default:RawSquadAssignments_j";
pub const PRIVACY_SETTINGS: &str = "Default:PrivacySettings_j";
pub const PRESENCE_PERM: &str = "urn:epic:cfg:presence-perm_s";
pub const ACCEPTING_MEMBERS: &str = "urn:epic:cfg:accepting-members_b";
pub const INVITE_PERM: &str = "urn:epic:cfg:invite-perm_s";
pub const NOT_ACCEPTING_MEMBERS: &str = "urn:epic:cfg:not-accepting-members";
pub const NOT_ACCEPTING_MEMBERS_REASON: &str = "urn:epic:cfg:not-accepting-members-reason_i";

// ---- Member-level keys ----

pub const COSMETIC_LOADOUT: &str = "Default:AthenaCosmeticLoadout_j";
pub const COSMETIC_VARIANTS: &str = "Default:AthenaCosmeticLoadoutVariants_j";
pub const FRONTEND_EMOTE: &str = "Default:FrontendEmote_j";
pub const LOBBY_STATE: &str = "Default:LobbyState_j";
pub const CURRENT_INPUT: &str = "Default:CurrentInputType_s";
pub const CUSTOM_DATA_STORE: &str = "Default:ArbitraryCustomDataStore_j";
pub const BANNER_INFO: &str = "Default:AthenaBannerInfo_j";
pub const BATTLE_PASS_INFO: &str = "Default:BattlePassInfo_j";
pub const PLATFORM_DATA: &str = "Default:PlatformData_j";
pub const MAP_MARKER: &str = "Default:FrontEndMapMarker_j";
pub const ASSISTED_CHALLENGE: &str = "Default:AssistedChallengeInfo_j";

// ---- Match info keys ----

pub const LOCATION: &str = "Default:Location_s";
pub const HAS_PRELOADED: &str = "Default:HasPreloadedAthena_b";
pub const SPECTATE_AVAILABLE: &str = "Default:SpectateAPartyMemberAvailable_b";
pub const PLAYERS_LEFT: &str = "Default:NumAthenaPlayersLeft_U";
pub const MATCH_STARTED_AT: &str = "Default:UtcTimeStartedMatchAthena_s";

// ---- Invite payload keys ----

pub const BUILD_ID: &str = "urn:epic:cfg:build-id_s";
pub const CONN_PLATFORM: &str = "urn:epic:conn:platform_s";
pub const CONN_TYPE: &str = "urn:epic:conn:type_s";
pub const INVITE_PLATFORM_DATA: &str = "urn:epic:invite:platformdata_s";
pub const MEMBER_DN: &str = "urn:epic:member:dn_s";
