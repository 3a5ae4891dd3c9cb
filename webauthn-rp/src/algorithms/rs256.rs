//! RS256 uses RSA keys to verify PKCS#1 v1.5 signatures generated using
//! SHA-256.

use rsa::pkcs1v15::{Signature, VerifyingKey};
use rsa::RsaPublicKey;
use sha2::Sha256;
use signature::Verifier;

use super::AlgorithmError;

pub(super) fn verify(
    key: &RsaPublicKey,
    message: &[u8],
    signature: &[u8],
) -> Result<(), AlgorithmError> {
    let signature = Signature::try_from(signature).map_err(AlgorithmError::VerificationFailed)?;
    VerifyingKey::<Sha256>::new(key.clone())
        .verify(message, &signature)
        .map_err(AlgorithmError::VerificationFailed)
}

#[cfg(test)]
mod tests {
    use rand::rngs::OsRng;
    use rsa::pkcs1v15::SigningKey;
    use rsa::RsaPrivateKey;
    use signature::{SignatureEncoding, Signer};

    use super::*;
    use crate::algorithms::{CoseAlgorithm, PublicKey};

    #[test]
    fn verifies_a_pkcs1_v15_signature() {
        let private = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let key = PublicKey::Rsa(private.to_public_key());
        let message = b"authenticator data || sha256(client data)";
        let signature = SigningKey::<Sha256>::new(private).sign(message).to_bytes();

        assert!(CoseAlgorithm::RS256.verify(&key, message, &signature).is_ok());

        let tampered = CoseAlgorithm::RS256.verify(&key, b"other message", &signature);
        assert!(matches!(
            tampered,
            Err(AlgorithmError::VerificationFailed(_))
        ));
    }

    #[test]
    fn rejects_signatures_from_another_key() {
        let private = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let other = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let key = PublicKey::Rsa(private.to_public_key());
        let message = b"signed with the wrong key";
        let signature = SigningKey::<Sha256>::new(other).sign(message).to_bytes();

        assert!(matches!(
            CoseAlgorithm::RS256.verify(&key, message, &signature),
            Err(AlgorithmError::VerificationFailed(_))
        ));
    }

    #[test]
    fn rejects_malformed_signature_bytes() {
        let private = RsaPrivateKey::new(&mut OsRng, 2048).unwrap();
        let key = PublicKey::Rsa(private.to_public_key());

        assert!(matches!(
            CoseAlgorithm::RS256.verify(&key, b"message", b"not a signature"),
            Err(AlgorithmError::VerificationFailed(_))
        ));
    }
}
