//! Wire message schemas consumed and produced at the party service boundary.
//!
//! The party service speaks JSON. Request and construction-snapshot shapes
//! use the service's snake_case field names; the structured error payload and
//! external auth records use camelCase, matching what the service actually
//! emits.

pub mod error;
pub mod member;
pub mod party;

pub use error::{ApiError, CHANGE_FORBIDDEN, STALE_REVISION};
pub use member::{
    ExternalAuth, JoinConfirmationData, MemberData, MemberMetaPatch, MemberRole, MemberUpdateData,
};
pub use party::{
    MetaDelta, PartyConfigData, PartyData, PartyPatchRequest, PartyUpdateData, PatchConfig,
};
