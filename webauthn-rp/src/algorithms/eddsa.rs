//! EdDSA uses Ed25519 keys to verify signatures over the raw, unhashed
//! message.

use ed25519_dalek::{Signature, Verifier, VerifyingKey};

use super::AlgorithmError;

pub(super) fn verify(
    key: &VerifyingKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), AlgorithmError> {
    let signature = Signature::from_slice(signature).map_err(AlgorithmError::VerificationFailed)?;
    key.verify(message, &signature)
        .map_err(AlgorithmError::VerificationFailed)
}
