//! ES256 uses ECDSA keys over P-256 to verify ASN.1 DER signatures of
//! SHA-256 hashes.
//!
//! Webauthn carries ECDSA assertion signatures DER-encoded rather than as
//! the fixed-size `r || s` concatenation COSE itself uses. The key is
//! expected to be on P-256 by registry convention; the curve is fixed by the
//! key type and not re-validated here.

use p256::ecdsa::{Signature, VerifyingKey};
use signature::Verifier;

use super::AlgorithmError;

pub(super) fn verify(
    key: &VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), AlgorithmError> {
    let signature = Signature::from_der(signature).map_err(AlgorithmError::VerificationFailed)?;
    key.verify(message, &signature)
        .map_err(AlgorithmError::VerificationFailed)
}
