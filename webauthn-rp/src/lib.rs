//! # WebAuthn RP
//!
//! Server-side verification of WebAuthn authentication assertions. This
//! crate implements the Relying Party half of the ceremony: given the raw
//! authenticator data, the raw client data JSON and the signature from a
//! `navigator.credentials.get()` response, it checks the signature with the
//! credential's public key and only then parses and validates the contents.
//!
//! The ordering is the point. Both buffers are attacker-controlled until
//! the signature over them has been verified, so [`AssertionVerifier`]
//! refuses to interpret a single field before the cryptographic check has
//! passed.
//!
//! A full verification is three collaborating pieces:
//!
//! * [`algorithms`] resolves a COSE algorithm identifier to one of the
//!   supported signature schemes (RS256, ES256, EdDSA) over a resolved
//!   [`PublicKey`].
//! * [`verifier`] runs the verify-then-parse procedure and asserts the
//!   structural invariants of the assertion itself.
//! * [`policy`] checks the parsed structures against Relying Party
//!   configuration: RP ID hash, user presence and verification, origins and
//!   the anti-clone signature counter.
//!
//! Challenge generation and comparison, credential storage, COSE key
//! decoding and attestation are out of scope; callers bring resolved keys
//! and stored counters and take typed errors back.

pub mod algorithms;
pub mod policy;
pub mod verifier;

// Re-exports
pub use algorithms::{AlgorithmError, CoseAlgorithm, PublicKey};
pub use policy::{Ceremony, PolicyError, RpPolicy};
pub use verifier::{AssertionDefect, AssertionError, AssertionVerifier};
pub use webauthn_rp_types as types;
