//! # WebAuthn RP Types
//!
//! Type definitions for the two data structures a WebAuthn Relying Party
//! receives from a client during a credential ceremony: the binary
//! [authenticator data] produced by the authenticator, and the JSON
//! [client data] collected by the browser.
//!
//! Both decoders are pure: they check shape only, never semantics. Matching
//! the RP ID hash, origins, flags or counters against Relying Party
//! configuration is left to the consumers of these types.
//!
//! [authenticator data]: https://w3c.github.io/webauthn/#sctn-authenticator-data
//! [client data]: https://w3c.github.io/webauthn/#dictionary-client-data

pub mod authenticator_data;
pub mod client_data;
mod flags;
mod utils;

// Re-exports
pub use authenticator_data::{rp_id_hash, AuthenticatorData, MalformedAuthenticatorData};
pub use client_data::{ClientDataType, CollectedClientData, MalformedClientData};
pub use flags::Flags;
pub use utils::{crypto, encoding};
