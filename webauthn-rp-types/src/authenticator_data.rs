//! Read-only access to the fixed-size portion of authenticator data.

use std::fmt;

use crate::{utils::crypto::sha256, Flags};

/// Length of the fixed-size portion: RP ID hash (32) + flags (1) + signature
/// counter (4).
const FIXED_LEN: usize = 37;

/// A borrowed view of the authenticator data structure, the contextual
/// bindings made by the authenticator and covered by its signature.
///
/// Every accessor is a pure projection of a fixed byte range; nothing is
/// copied out of the buffer and nothing is validated beyond the minimum
/// length. Whether the RP ID hash, flags or counter are acceptable is a
/// policy decision that belongs to the caller.
///
/// The variable-length tail beyond byte 37 (attested credential data when
/// [`Flags::AT`] is set, extension data when [`Flags::ED`] is set) is left
/// opaque by this view.
///
/// <https://w3c.github.io/webauthn/#sctn-authenticator-data>
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatorData<'a> {
    data: &'a [u8],
}

impl<'a> AuthenticatorData<'a> {
    /// Create a view over raw authenticator data bytes.
    ///
    /// Fails when the buffer is shorter than the 37 byte fixed-size portion.
    pub fn from_slice(data: &'a [u8]) -> Result<Self, MalformedAuthenticatorData> {
        if data.len() < FIXED_LEN {
            return Err(MalformedAuthenticatorData { len: data.len() });
        }
        Ok(Self { data })
    }

    /// SHA-256 hash of the RP ID the credential is scoped to.
    pub fn rp_id_hash(&self) -> &'a [u8] {
        &self.data[0..32]
    }

    /// The flags byte. Reserved bits are retained.
    pub fn flags(&self) -> Flags {
        Flags::from(self.data[32])
    }

    /// UP: a test of user presence was completed.
    pub fn user_present(&self) -> bool {
        self.flags().contains(Flags::UP)
    }

    /// UV: the authenticator verified the user (PIN, biometric, ...).
    pub fn user_verified(&self) -> bool {
        self.flags().contains(Flags::UV)
    }

    /// BE: the credential source is backup eligible.
    pub fn backup_eligible(&self) -> bool {
        self.flags().contains(Flags::BE)
    }

    /// BS: the credential source is currently backed up.
    pub fn backed_up(&self) -> bool {
        self.flags().contains(Flags::BS)
    }

    /// AT: attested credential data follows the fixed-size portion.
    pub fn attested_credential_data_included(&self) -> bool {
        self.flags().contains(Flags::AT)
    }

    /// ED: extension data is included in the tail.
    pub fn extension_data_included(&self) -> bool {
        self.flags().contains(Flags::ED)
    }

    /// Signature counter, a 32-bit unsigned big-endian integer.
    pub fn sign_count(&self) -> u32 {
        // SAFETY: the constructor guarantees at least 37 bytes.
        u32::from_be_bytes(self.data[33..37].try_into().unwrap())
    }

    /// The underlying buffer, including any attested credential data and
    /// extension data past the fixed-size portion.
    pub fn raw(&self) -> &'a [u8] {
        self.data
    }
}

impl fmt::Display for AuthenticatorData<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "AuthenticatorData {{")?;
        write!(f, "    rp_id_hash: ")?;
        for byte in self.rp_id_hash() {
            write!(f, "{byte:02x}")?;
        }
        writeln!(f)?;
        writeln!(f, "    flags:")?;
        writeln!(f, "        0 (UP): {}", self.user_present())?;
        writeln!(f, "        2 (UV): {}", self.user_verified())?;
        writeln!(f, "        3 (BE): {}", self.backup_eligible())?;
        writeln!(f, "        4 (BS): {}", self.backed_up())?;
        writeln!(f, "        6 (AT): {}", self.attested_credential_data_included())?;
        writeln!(f, "        7 (ED): {}", self.extension_data_included())?;
        writeln!(f, "    sign_count: {}", self.sign_count())?;
        write!(f, "}}")
    }
}

/// Compute the RP ID hash for a known RP ID, for comparison against
/// [`AuthenticatorData::rp_id_hash`].
pub fn rp_id_hash(rp_id: &str) -> [u8; 32] {
    sha256(rp_id.as_bytes())
}

/// The authenticator data buffer is shorter than the fixed-size portion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MalformedAuthenticatorData {
    /// Length of the rejected buffer.
    pub len: usize,
}

impl fmt::Display for MalformedAuthenticatorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "authenticator data is {} bytes, shorter than the {FIXED_LEN} byte fixed-size portion",
            self.len
        )
    }
}

impl std::error::Error for MalformedAuthenticatorData {}

#[cfg(test)]
mod tests {
    use super::*;

    fn fixed_portion(flags: u8, sign_count: u32) -> Vec<u8> {
        let mut data = rp_id_hash("example.com").to_vec();
        data.push(flags);
        data.extend_from_slice(&sign_count.to_be_bytes());
        data
    }

    #[test]
    fn rejects_short_buffers() {
        for len in 0..37 {
            let data = vec![0; len];
            let err = AuthenticatorData::from_slice(&data).unwrap_err();
            assert_eq!(err.len, len);
        }
    }

    #[test]
    fn accepts_the_fixed_portion_and_longer() {
        let data = fixed_portion(0x01, 0);
        assert!(AuthenticatorData::from_slice(&data).is_ok());

        let mut longer = data.clone();
        longer.extend_from_slice(b"opaque trailing bytes");
        let ad = AuthenticatorData::from_slice(&longer).unwrap();
        assert_eq!(ad.raw(), longer.as_slice());
    }

    #[test]
    fn projects_every_flag_byte_exactly() {
        for byte in u8::MIN..=u8::MAX {
            let data = fixed_portion(byte, 0);
            let ad = AuthenticatorData::from_slice(&data).unwrap();
            assert_eq!(u8::from(ad.flags()), byte);
            assert_eq!(ad.user_present(), byte & 0x01 != 0);
            assert_eq!(ad.user_verified(), byte & 0x04 != 0);
            assert_eq!(ad.backup_eligible(), byte & 0x08 != 0);
            assert_eq!(ad.backed_up(), byte & 0x10 != 0);
            assert_eq!(ad.attested_credential_data_included(), byte & 0x40 != 0);
            assert_eq!(ad.extension_data_included(), byte & 0x80 != 0);
        }
    }

    #[test]
    fn sign_count_is_big_endian() {
        let data = fixed_portion(0x01, 0x0102_0304);
        let ad = AuthenticatorData::from_slice(&data).unwrap();
        assert_eq!(ad.sign_count(), 0x0102_0304);
        assert_eq!(&data[33..37], &[0x01, 0x02, 0x03, 0x04]);
    }

    #[test]
    fn rp_id_hash_projects_the_first_32_bytes() {
        let data = fixed_portion(0x05, 9);
        let ad = AuthenticatorData::from_slice(&data).unwrap();
        assert_eq!(ad.rp_id_hash(), rp_id_hash("example.com"));
        assert_ne!(ad.rp_id_hash(), rp_id_hash("example.org"));
    }

    #[test]
    fn display_renders_flags_and_counter() {
        let data = fixed_portion(0x05, 41);
        let rendered = AuthenticatorData::from_slice(&data).unwrap().to_string();
        assert!(rendered.contains("0 (UP): true"));
        assert!(rendered.contains("2 (UV): true"));
        assert!(rendered.contains("3 (BE): false"));
        assert!(rendered.contains("sign_count: 41"));
    }
}
