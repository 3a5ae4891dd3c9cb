//! Assertion verification: signature first, parsing second.

use std::fmt;

use log::debug;
use webauthn_rp_types::{
    crypto::sha256, rp_id_hash, AuthenticatorData, ClientDataType, CollectedClientData,
    MalformedAuthenticatorData, MalformedClientData,
};

use crate::algorithms::{AlgorithmError, CoseAlgorithm, PublicKey};

/// Verifies assertion responses produced with one credential's key.
///
/// A verifier is constructed once per credential, from the public key and
/// COSE algorithm value recorded at registration, and is immutable: it can
/// be reused for any number of assertions and shared freely across threads.
///
/// When an RP ID is supplied at construction its SHA-256 hash is computed
/// once and asserted against the authenticator data of every assertion.
///
/// Warning: further checks must be performed aside from verification of
/// signatures — challenge comparison, sign count bookkeeping and origin
/// policy remain with the caller, typically via
/// [`RpPolicy`](crate::RpPolicy).
#[derive(Debug, Clone)]
pub struct AssertionVerifier {
    alg: CoseAlgorithm,
    key: PublicKey,
    rp_id_hash: Option<[u8; 32]>,
}

impl AssertionVerifier {
    /// Create a verifier for the provided public key and identified COSE
    /// algorithm.
    ///
    /// Fails when the algorithm value is not implemented or the key is the
    /// wrong type for it.
    pub fn new(
        key: PublicKey,
        algorithm_identifier: i64,
        rp_id: Option<&str>,
    ) -> Result<Self, AssertionError> {
        let alg = CoseAlgorithm::from_identifier(algorithm_identifier)
            .ok_or(AssertionError::UnsupportedAlgorithm(algorithm_identifier))?;
        alg.check_key_type(&key)
            .map_err(|_| AssertionError::UnsupportedKeyType)?;
        Ok(Self {
            alg,
            key,
            rp_id_hash: rp_id.map(rp_id_hash),
        })
    }

    /// The COSE registry value of the algorithm in use.
    pub fn algorithm(&self) -> i64 {
        self.alg.identifier()
    }

    /// Verify the assertion signature over
    /// `authenticator_data || sha256(client_data_json)`.
    fn verify_assertion_response(
        &self,
        authenticator_data: &[u8],
        client_data_json: &[u8],
        signature: &[u8],
    ) -> Result<(), AlgorithmError> {
        let mut message = authenticator_data.to_vec();
        message.extend_from_slice(&sha256(client_data_json));
        self.alg.verify(&self.key, &message, signature)
    }

    /// Verify, then parse, an assertion response.
    ///
    /// The signature is checked before either buffer is interpreted; until
    /// it passes, both buffers are attacker-controlled and no field in them
    /// can be trusted. After parsing, the invariants of an assertion are
    /// asserted: the client data type is `webauthn.get`, the RP ID hash
    /// matches the one held by this verifier (when one was supplied) and
    /// the user was present.
    ///
    /// On success the decoded structures are returned for the remaining
    /// checks that need stored state: challenge comparison, sign count
    /// bookkeeping and origin policy.
    ///
    /// (W3C webauthn spec section 7.2; steps 11, 15, 16 and 19-20.)
    pub fn verify_parse_assertion<'a>(
        &self,
        authenticator_data: &'a [u8],
        client_data_json: &[u8],
        signature: &[u8],
    ) -> Result<(AuthenticatorData<'a>, CollectedClientData), AssertionError> {
        if let Err(err) =
            self.verify_assertion_response(authenticator_data, client_data_json, signature)
        {
            debug!("assertion signature did not verify: {err}");
            return Err(match err {
                AlgorithmError::UnsupportedKeyType => AssertionError::UnsupportedKeyType,
                AlgorithmError::VerificationFailed(_) => AssertionError::SignatureInvalid,
            });
        }

        let authenticator_data = AuthenticatorData::from_slice(authenticator_data)?;
        let client_data = CollectedClientData::from_json(client_data_json)?;

        if client_data.ty != ClientDataType::Get {
            debug!("client data type is '{}', expected 'webauthn.get'", client_data.ty);
            return Err(AssertionError::InvalidAssertion(
                AssertionDefect::ClientDataType,
            ));
        }
        if let Some(expected) = &self.rp_id_hash {
            if authenticator_data.rp_id_hash() != *expected {
                debug!("authenticator data carries another RP's ID hash");
                return Err(AssertionError::InvalidAssertion(AssertionDefect::RpIdHash));
            }
        }
        if !authenticator_data.user_present() {
            debug!("authenticator data UP bit not set");
            return Err(AssertionError::InvalidAssertion(
                AssertionDefect::UserNotPresent,
            ));
        }

        Ok((authenticator_data, client_data))
    }
}

/// Errors from constructing an [`AssertionVerifier`] or verifying an
/// assertion.
#[derive(Debug)]
pub enum AssertionError {
    /// The COSE algorithm value is not implemented.
    UnsupportedAlgorithm(i64),

    /// The public key is not the type the algorithm operates on.
    UnsupportedKeyType,

    /// The signature does not verify over the presented data. Nothing was
    /// parsed.
    SignatureInvalid,

    /// The authenticator data failed to decode after its signature
    /// verified.
    MalformedAuthenticatorData(MalformedAuthenticatorData),

    /// The client data JSON failed to decode after its signature verified.
    MalformedClientData(MalformedClientData),

    /// A structural invariant of the verified assertion does not hold.
    InvalidAssertion(AssertionDefect),
}

/// The structural mismatches an otherwise authentic assertion can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssertionDefect {
    /// The client data type is not `webauthn.get`.
    ClientDataType,

    /// The authenticator data RP ID hash is not the configured RP's.
    RpIdHash,

    /// The user presence bit is not set.
    UserNotPresent,
}

impl fmt::Display for AssertionDefect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AssertionDefect::ClientDataType => "invalid type in client data",
            AssertionDefect::RpIdHash => "incorrect RP",
            AssertionDefect::UserNotPresent => "user is not present",
        })
    }
}

impl fmt::Display for AssertionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssertionError::UnsupportedAlgorithm(identifier) => {
                write!(f, "unsupported COSE algorithm {identifier}")
            }
            AssertionError::UnsupportedKeyType => {
                f.write_str("the type of key provided is not supported by the algorithm")
            }
            AssertionError::SignatureInvalid => f.write_str("signature is invalid"),
            AssertionError::MalformedAuthenticatorData(err) => err.fmt(f),
            AssertionError::MalformedClientData(err) => err.fmt(f),
            AssertionError::InvalidAssertion(defect) => {
                write!(f, "assertion is invalid: {defect}")
            }
        }
    }
}

impl std::error::Error for AssertionError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AssertionError::MalformedAuthenticatorData(err) => Some(err),
            AssertionError::MalformedClientData(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MalformedAuthenticatorData> for AssertionError {
    fn from(err: MalformedAuthenticatorData) -> Self {
        AssertionError::MalformedAuthenticatorData(err)
    }
}

impl From<MalformedClientData> for AssertionError {
    fn from(err: MalformedClientData) -> Self {
        AssertionError::MalformedClientData(err)
    }
}
