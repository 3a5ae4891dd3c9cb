//! COSE signature algorithms usable for webauthn assertion signatures.
//!
//! The supported set is deliberately closed: a [`CoseAlgorithm`] value can
//! only name a scheme this crate knows how to verify, and dispatch is an
//! exhaustive match the compiler checks when a variant is added.
//!
//! See the algorithm definitions:
//! <https://www.iana.org/assignments/cose/cose.xhtml#algorithms>

use std::fmt;

mod eddsa;
mod es256;
mod rs256;

/// A credential public key, already resolved from COSE key material into a
/// native key type.
///
/// Decoding COSE keys happens during registration and is out of scope here;
/// the Relying Party stores whatever native form it resolved and hands it
/// back for every assertion.
#[derive(Debug, Clone)]
pub enum PublicKey {
    /// An RSA public key, used by [`CoseAlgorithm::RS256`].
    Rsa(rsa::RsaPublicKey),

    /// An ECDSA public key on P-256, used by [`CoseAlgorithm::ES256`].
    P256(p256::ecdsa::VerifyingKey),

    /// An Ed25519 public key, used by [`CoseAlgorithm::EdDSA`].
    Ed25519(ed25519_dalek::VerifyingKey),
}

/// The COSE algorithms implemented for assertion verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CoseAlgorithm {
    /// RSASSA-PKCS1-v1_5 using SHA-256, COSE value -257.
    RS256,

    /// ECDSA using P-256 and SHA-256, COSE value -7.
    ES256,

    /// EdDSA over Ed25519, COSE value -8.
    EdDSA,
}

impl CoseAlgorithm {
    /// Every implemented algorithm, in registry preference order.
    pub const ALL: [CoseAlgorithm; 3] = [
        CoseAlgorithm::RS256,
        CoseAlgorithm::ES256,
        CoseAlgorithm::EdDSA,
    ];

    /// Look up an algorithm by its COSE registry value.
    pub fn from_identifier(identifier: i64) -> Option<Self> {
        match identifier {
            -257 => Some(CoseAlgorithm::RS256),
            -7 => Some(CoseAlgorithm::ES256),
            -8 => Some(CoseAlgorithm::EdDSA),
            _ => None,
        }
    }

    /// The COSE registry value for the algorithm.
    pub fn identifier(&self) -> i64 {
        match self {
            CoseAlgorithm::RS256 => -257,
            CoseAlgorithm::ES256 => -7,
            CoseAlgorithm::EdDSA => -8,
        }
    }

    /// Check that the public key is the correct type for the algorithm.
    pub fn check_key_type(&self, key: &PublicKey) -> Result<(), AlgorithmError> {
        match (self, key) {
            (CoseAlgorithm::RS256, PublicKey::Rsa(_))
            | (CoseAlgorithm::ES256, PublicKey::P256(_))
            | (CoseAlgorithm::EdDSA, PublicKey::Ed25519(_)) => Ok(()),
            _ => Err(AlgorithmError::UnsupportedKeyType),
        }
    }

    /// Verify `signature` over `message` using the public key.
    ///
    /// A key of the wrong type for the algorithm is reported as
    /// [`AlgorithmError::UnsupportedKeyType`], keeping configuration
    /// mistakes distinguishable from forged signatures.
    pub fn verify(
        &self,
        key: &PublicKey,
        message: &[u8],
        signature: &[u8],
    ) -> Result<(), AlgorithmError> {
        match (self, key) {
            (CoseAlgorithm::RS256, PublicKey::Rsa(key)) => rs256::verify(key, message, signature),
            (CoseAlgorithm::ES256, PublicKey::P256(key)) => es256::verify(key, message, signature),
            (CoseAlgorithm::EdDSA, PublicKey::Ed25519(key)) => {
                eddsa::verify(key, message, signature)
            }
            _ => Err(AlgorithmError::UnsupportedKeyType),
        }
    }
}

/// Errors produced while checking key types or verifying signatures.
#[derive(Debug)]
pub enum AlgorithmError {
    /// The type of key provided is not supported by the algorithm.
    UnsupportedKeyType,

    /// The signature did not verify. A malformed signature and a signature
    /// that simply does not match collapse into the same failure; the
    /// underlying library error is kept as the cause for local diagnostics.
    VerificationFailed(signature::Error),
}

impl fmt::Display for AlgorithmError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AlgorithmError::UnsupportedKeyType => {
                f.write_str("the type of key provided is not supported by the algorithm")
            }
            AlgorithmError::VerificationFailed(err) => {
                write!(f, "signature verification failed: {err}")
            }
        }
    }
}

impl std::error::Error for AlgorithmError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AlgorithmError::UnsupportedKeyType => None,
            AlgorithmError::VerificationFailed(err) => Some(err),
        }
    }
}
