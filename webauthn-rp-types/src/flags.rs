use bitflags::bitflags;

bitflags! {
    /// The flags byte of authenticator data.
    ///
    /// <https://w3c.github.io/webauthn/#authdata-flags>
    #[repr(transparent)]
    #[derive(Debug, PartialEq, Eq, Clone, Copy)]
    pub struct Flags: u8 {
        /// User Present, bit 0.
        const UP = 1 << 0;
        /// User Verified, bit 2.
        const UV = 1 << 2;
        /// Backup Eligibility, bit 3.
        const BE = 1 << 3;
        /// Backup State, bit 4.
        const BS = 1 << 4;
        /// Attested Credential Data included, bit 6.
        const AT = 1 << 6;
        /// Extension Data included, bit 7.
        const ED = 1 << 7;
    }
}

impl From<u8> for Flags {
    /// Bits 1 and 5 are reserved for future use. They are retained rather
    /// than rejected so that every flag byte an authenticator can produce
    /// round-trips exactly.
    fn from(byte: u8) -> Self {
        Flags::from_bits_retain(byte)
    }
}

impl From<Flags> for u8 {
    fn from(src: Flags) -> Self {
        src.bits()
    }
}
