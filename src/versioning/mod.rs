//! Version-key validation for node updates.
//!
//! The [`UpdateGate`] resolves the object type's [`CheckMode`], derives the
//! store's canonical version key and compares it with the key the client
//! sent, optionally accepting a passport key instead.

mod gate;
mod mode;
mod passport;
mod resolver;
pub mod timestamp;
mod types;


pub use gate::UpdateGate;
pub use mode::{CheckMode, resolve_check_mode};
pub use passport::{ConfiguredPassport, PassportKeyRing, PassportVerifier, hash_passport_key};
pub use resolver::canonical_version_key;
pub use types::{
    Decision, LAST_UPDATED_ON, NODE_UPDATE_STATUS, NodeType, Record, STALE_DATA_UPDATED,
    SYS_INTERNAL_LAST_UPDATED_ON, StoreSnapshot, VERSION_CHECK_MODE, VERSION_KEY,
};
