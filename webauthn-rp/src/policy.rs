//! Relying Party policy checks over verified ceremony data.
//!
//! An [`RpPolicy`] holds the Relying Party's configuration and answers
//! whether parsed authenticator data and client data are acceptable under
//! it. The checks are independent so callers can compose the subset a given
//! endpoint needs.
//!
//! These checks assume authenticity: verify the assertion signature with an
//! [`AssertionVerifier`](crate::AssertionVerifier) before consulting the
//! policy, and compare the challenge against the one issued for the
//! ceremony yourself.

use std::collections::HashSet;
use std::fmt;

use log::debug;
use webauthn_rp_types::{rp_id_hash, AuthenticatorData, ClientDataType, CollectedClientData};

/// A credential ID can be a maximum of 1023 bytes.
const MAX_CREDENTIAL_ID_LEN: usize = 1023;

/// Which webauthn ceremony produced the client data under scrutiny.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ceremony {
    /// Credential creation; the client data type must be `webauthn.create`.
    Registration,

    /// Credential assertion; the client data type must be `webauthn.get`.
    Authentication,
}

impl Ceremony {
    fn expected_client_data_type(self) -> ClientDataType {
        match self {
            Ceremony::Registration => ClientDataType::Create,
            Ceremony::Authentication => ClientDataType::Get,
        }
    }
}

/// Validates authenticator data and client data against Relying Party
/// configuration.
///
/// The RP ID hash and the origin lookup sets are derived once during
/// construction, so a built policy is immutable and may be shared across
/// threads for any number of checks.
///
/// ```
/// use webauthn_rp::RpPolicy;
///
/// let policy = RpPolicy::new("example.com")
///     .permit_origins(["https://example.com", "https://www.example.com"])
///     .require_user_verification(true);
/// ```
#[derive(Debug, Clone)]
pub struct RpPolicy {
    rp_id_hash: [u8; 32],
    permitted_origins: HashSet<String>,
    permitted_top_origins: HashSet<String>,
    permit_cross_origin: bool,
    require_user_verification: bool,
}

impl RpPolicy {
    /// Create a policy for the given RP ID.
    ///
    /// No origins are permitted until [`RpPolicy::permit_origins`] is
    /// called, cross-origin ceremonies are refused and user verification is
    /// not required.
    pub fn new(rp_id: &str) -> Self {
        Self {
            rp_id_hash: rp_id_hash(rp_id),
            permitted_origins: HashSet::new(),
            permitted_top_origins: HashSet::new(),
            permit_cross_origin: false,
            require_user_verification: false,
        }
    }

    /// Add origins clients are permitted to report.
    pub fn permit_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted_origins
            .extend(origins.into_iter().map(Into::into));
        self
    }

    /// Add top-level origins permitted for cross-origin ceremonies.
    ///
    /// Has no effect unless [`RpPolicy::permit_cross_origin`] is also set.
    pub fn permit_top_origins<I, S>(mut self, origins: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.permitted_top_origins
            .extend(origins.into_iter().map(Into::into));
        self
    }

    /// Allow ceremonies performed from a cross-origin context.
    pub fn permit_cross_origin(mut self, permit: bool) -> Self {
        self.permit_cross_origin = permit;
        self
    }

    /// Require the UV flag: the authenticator must have verified the user,
    /// not merely observed presence.
    pub fn require_user_verification(mut self, require: bool) -> Self {
        self.require_user_verification = require;
        self
    }

    /// Confirm that the credential ID is within the permitted size.
    pub fn check_credential_id(&self, credential_id: &[u8]) -> Result<(), PolicyError> {
        if credential_id.len() > MAX_CREDENTIAL_ID_LEN {
            debug!(
                "credential ID of {} bytes exceeds the {MAX_CREDENTIAL_ID_LEN} byte limit",
                credential_id.len()
            );
            return Err(PolicyError::CredentialIdTooLong);
        }
        Ok(())
    }

    /// Check verified authenticator data against the RP configuration.
    ///
    /// `last_sign_count` is the counter stored for the credential after its
    /// previous use; pass 0 when checking a registration.
    ///
    /// Authenticators that do not implement a counter always report zero,
    /// which is accepted when the stored value is also zero. This means a
    /// counter that legitimately reset to zero after a nonzero value cannot
    /// be told apart from a counter-less authenticator; such a credential
    /// keeps failing the strict-increase check on the stored nonzero value
    /// instead.
    pub fn check_authenticator_data(
        &self,
        authenticator_data: &AuthenticatorData<'_>,
        last_sign_count: u32,
    ) -> Result<(), PolicyError> {
        if authenticator_data.rp_id_hash() != self.rp_id_hash {
            debug!("authenticator data carries another RP's ID hash");
            return Err(PolicyError::RpIdMismatch);
        }
        if !authenticator_data.user_present() {
            debug!("authenticator data UP bit not set");
            return Err(PolicyError::UserNotPresent);
        }
        if self.require_user_verification && !authenticator_data.user_verified() {
            debug!("authenticator data UV bit not set but user verification is required");
            return Err(PolicyError::UserNotVerified);
        }

        let current = authenticator_data.sign_count();
        if last_sign_count == 0 && current == 0 {
            // Authenticator without a signature counter.
            return Ok(());
        }
        if current <= last_sign_count {
            debug!(
                "sign count went from {last_sign_count} to {current}; possible cloned authenticator"
            );
            return Err(PolicyError::SignCountNotIncreased {
                last: last_sign_count,
                current,
            });
        }
        Ok(())
    }

    /// Check verified client data against the RP configuration.
    ///
    /// Comparing the challenge against the one issued for this ceremony is
    /// still the caller's responsibility.
    pub fn check_client_data(
        &self,
        client_data: &CollectedClientData,
        ceremony: Ceremony,
    ) -> Result<(), PolicyError> {
        let expected = ceremony.expected_client_data_type();
        if client_data.ty != expected {
            debug!("client data type is '{}', expected '{expected}'", client_data.ty);
            return Err(PolicyError::UnexpectedClientDataType {
                expected,
                got: client_data.ty,
            });
        }
        if !self.permitted_origins.contains(&client_data.origin) {
            debug!("client data origin {:?} is not a permitted origin", client_data.origin);
            return Err(PolicyError::OriginNotPermitted);
        }

        let top_origin = client_data.top_origin.as_deref().unwrap_or("");
        if top_origin.is_empty() && !client_data.is_cross_origin() {
            return Ok(());
        }
        if !self.permit_cross_origin {
            debug!("cross-origin ceremonies are not permitted for this RP");
            return Err(PolicyError::CrossOriginNotPermitted);
        }
        if !self.permitted_top_origins.contains(top_origin) {
            debug!("client data top origin {top_origin:?} is not a permitted top origin");
            return Err(PolicyError::TopOriginNotPermitted);
        }
        Ok(())
    }
}

/// A policy check rejected the ceremony data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyError {
    /// The credential ID exceeds 1023 bytes.
    CredentialIdTooLong,

    /// The authenticator data RP ID hash does not match this RP.
    RpIdMismatch,

    /// The authenticator data UP bit is not set.
    UserNotPresent,

    /// User verification is required but the UV bit is not set.
    UserNotVerified,

    /// The signature counter did not strictly increase, indicating a
    /// possibly cloned authenticator.
    SignCountNotIncreased {
        /// The counter value stored from the previous use.
        last: u32,
        /// The counter value the authenticator reported now.
        current: u32,
    },

    /// The client data type does not match the ceremony being checked.
    UnexpectedClientDataType {
        /// The type the ceremony calls for.
        expected: ClientDataType,
        /// The type the client reported.
        got: ClientDataType,
    },

    /// The client data origin is not a permitted origin.
    OriginNotPermitted,

    /// A cross-origin ceremony was reported but cross-origin is not
    /// permitted.
    CrossOriginNotPermitted,

    /// The client data top origin is not a permitted top origin.
    TopOriginNotPermitted,
}

impl fmt::Display for PolicyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyError::CredentialIdTooLong => {
                write!(f, "credential ID exceeds {MAX_CREDENTIAL_ID_LEN} bytes")
            }
            PolicyError::RpIdMismatch => {
                f.write_str("authenticator data is for the wrong RP (incorrect RP ID hash)")
            }
            PolicyError::UserNotPresent => {
                f.write_str("authenticator data UP bit not set (no user present)")
            }
            PolicyError::UserNotVerified => {
                f.write_str("authenticator data UV bit not set (user not verified)")
            }
            PolicyError::SignCountNotIncreased { last, current } => write!(
                f,
                "sign count went from {last} to {current} without increasing, indicating a cloned key"
            ),
            PolicyError::UnexpectedClientDataType { expected, got } => {
                write!(f, "client data type is '{got}', expected '{expected}'")
            }
            PolicyError::OriginNotPermitted => {
                f.write_str("client data origin is not a permitted origin")
            }
            PolicyError::CrossOriginNotPermitted => {
                f.write_str("cross-origin registration / assertion is not permitted")
            }
            PolicyError::TopOriginNotPermitted => {
                f.write_str("client data top origin is not a permitted top origin")
            }
        }
    }
}

impl std::error::Error for PolicyError {}

#[cfg(test)]
mod tests {
    use webauthn_rp_types::encoding;

    use super::*;

    fn policy() -> RpPolicy {
        RpPolicy::new("example.com").permit_origins(["https://example.com"])
    }

    fn authenticator_data_bytes(rp_id: &str, flags: u8, sign_count: u32) -> Vec<u8> {
        let mut data = rp_id_hash(rp_id).to_vec();
        data.push(flags);
        data.extend_from_slice(&sign_count.to_be_bytes());
        data
    }

    fn client_data(json: &str) -> CollectedClientData {
        CollectedClientData::from_json(json.as_bytes()).unwrap()
    }

    fn assertion_client_data(origin: &str) -> CollectedClientData {
        client_data(&format!(
            r#"{{"type": "webauthn.get", "challenge": "{}", "origin": "{origin}"}}"#,
            encoding::base64url(b"challenge")
        ))
    }

    #[test]
    fn credential_id_boundary() {
        let policy = policy();
        assert!(policy.check_credential_id(&[0; 1023]).is_ok());
        assert_eq!(
            policy.check_credential_id(&[0; 1024]),
            Err(PolicyError::CredentialIdTooLong)
        );
    }

    #[test]
    fn rejects_the_wrong_rp() {
        let data = authenticator_data_bytes("example.org", 0x01, 1);
        let ad = AuthenticatorData::from_slice(&data).unwrap();
        assert_eq!(
            policy().check_authenticator_data(&ad, 0),
            Err(PolicyError::RpIdMismatch)
        );
    }

    #[test]
    fn rejects_missing_user_presence() {
        let data = authenticator_data_bytes("example.com", 0x04, 1);
        let ad = AuthenticatorData::from_slice(&data).unwrap();
        assert_eq!(
            policy().check_authenticator_data(&ad, 0),
            Err(PolicyError::UserNotPresent)
        );
    }

    #[test]
    fn requires_user_verification_only_when_configured() {
        let data = authenticator_data_bytes("example.com", 0x01, 1);
        let ad = AuthenticatorData::from_slice(&data).unwrap();
        assert!(policy().check_authenticator_data(&ad, 0).is_ok());

        let strict = policy().require_user_verification(true);
        assert_eq!(
            strict.check_authenticator_data(&ad, 0),
            Err(PolicyError::UserNotVerified)
        );

        let verified = authenticator_data_bytes("example.com", 0x05, 1);
        let ad = AuthenticatorData::from_slice(&verified).unwrap();
        assert!(strict.check_authenticator_data(&ad, 0).is_ok());
    }

    #[test]
    fn sign_count_must_strictly_increase_unless_both_zero() {
        let policy = policy();
        for (last, current, accepted) in [
            (0, 0, true), // authenticator without a counter
            (0, 1, true),
            (1, 2, true),
            (5, 6, true),
            (5, 1_000_000, true),
            (1, 1, false),
            (5, 5, false),
            (5, 4, false),
            (1, 0, false),
            (u32::MAX, u32::MAX, false),
            (u32::MAX - 1, u32::MAX, true),
        ] {
            let data = authenticator_data_bytes("example.com", 0x01, current);
            let ad = AuthenticatorData::from_slice(&data).unwrap();
            let result = policy.check_authenticator_data(&ad, last);
            if accepted {
                assert!(result.is_ok(), "last={last} current={current}");
            } else {
                assert_eq!(
                    result,
                    Err(PolicyError::SignCountNotIncreased { last, current }),
                    "last={last} current={current}"
                );
            }
        }
    }

    #[test]
    fn client_data_type_must_match_the_ceremony() {
        let policy = policy();
        let cd = assertion_client_data("https://example.com");
        assert!(policy.check_client_data(&cd, Ceremony::Authentication).is_ok());
        assert_eq!(
            policy.check_client_data(&cd, Ceremony::Registration),
            Err(PolicyError::UnexpectedClientDataType {
                expected: ClientDataType::Create,
                got: ClientDataType::Get,
            })
        );
    }

    #[test]
    fn origin_must_be_permitted() {
        let cd = assertion_client_data("https://evil.example.net");
        assert_eq!(
            policy().check_client_data(&cd, Ceremony::Authentication),
            Err(PolicyError::OriginNotPermitted)
        );
    }

    #[test]
    fn cross_origin_requires_opt_in_and_a_permitted_top_origin() {
        let cross = client_data(
            r#"{"type": "webauthn.get", "challenge": "AAEC", "origin": "https://example.com",
                "topOrigin": "https://embedder.example.net", "crossOrigin": true}"#,
        );

        assert_eq!(
            policy().check_client_data(&cross, Ceremony::Authentication),
            Err(PolicyError::CrossOriginNotPermitted)
        );

        let opted_in = policy().permit_cross_origin(true);
        assert_eq!(
            opted_in.check_client_data(&cross, Ceremony::Authentication),
            Err(PolicyError::TopOriginNotPermitted)
        );

        let trusted = policy()
            .permit_cross_origin(true)
            .permit_top_origins(["https://embedder.example.net"]);
        assert!(trusted.check_client_data(&cross, Ceremony::Authentication).is_ok());
    }

    #[test]
    fn cross_origin_flag_without_top_origin_still_needs_opt_in() {
        let cross = client_data(
            r#"{"type": "webauthn.get", "challenge": "AAEC", "origin": "https://example.com",
                "crossOrigin": true}"#,
        );
        assert_eq!(
            policy().check_client_data(&cross, Ceremony::Authentication),
            Err(PolicyError::CrossOriginNotPermitted)
        );
        // Even with the opt-in, an absent top origin is never in the
        // permitted set.
        assert_eq!(
            policy()
                .permit_cross_origin(true)
                .check_client_data(&cross, Ceremony::Authentication),
            Err(PolicyError::TopOriginNotPermitted)
        );
    }
}
