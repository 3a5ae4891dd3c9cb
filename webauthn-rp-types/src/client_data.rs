//! Decoding of the JSON-serialized client data.

use std::fmt;

use serde::Deserialize;

use crate::utils::encoding;

/// The ceremony type carried in the `type` member of the client data. Its
/// purpose is to prevent signature confusion attacks where a signature
/// produced for one ceremony is replayed for the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum ClientDataType {
    /// `webauthn.create`, collected while registering a new credential.
    #[serde(rename = "webauthn.create")]
    Create,

    /// `webauthn.get`, collected while asserting an existing credential.
    #[serde(rename = "webauthn.get")]
    Get,
}

impl fmt::Display for ClientDataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ClientDataType::Create => "webauthn.create",
            ClientDataType::Get => "webauthn.get",
        })
    }
}

/// The client data represents the contextual bindings of both the Relying
/// Party and the client.
///
/// > Note: The client data may be extended in the future. Therefore it's
/// > critical when parsing to be tolerant of unknown keys and of any
/// > reordering of the keys.
///
/// Decoding checks shape only: the JSON must parse and the challenge must be
/// valid unpadded base64url. Whether the type, origin or top origin are the
/// ones this Relying Party expects is deliberately not decided here.
///
/// <https://w3c.github.io/webauthn/#dictionary-client-data>
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectedClientData {
    /// Which ceremony the client collected this data for.
    #[serde(rename = "type")]
    pub ty: ClientDataType,

    /// The base64url (unpadded) encoding of the challenge provided by the
    /// Relying Party.
    pub challenge: String,

    /// The fully qualified origin of the requester, as provided to the
    /// authenticator by the client.
    pub origin: String,

    /// The fully qualified top-level origin of the requester, present when
    /// the ceremony ran inside an embedded context.
    #[serde(default)]
    pub top_origin: Option<String>,

    /// Whether the ceremony was performed within a cross-origin iframe.
    /// Absent means false.
    #[serde(default)]
    pub cross_origin: Option<bool>,

    #[serde(skip)]
    challenge_bytes: Vec<u8>,
}

impl CollectedClientData {
    /// Decode client data from its JSON byte serialization.
    ///
    /// The challenge field is base64url-decoded as part of parsing so that
    /// consumers can compare raw challenge bytes directly.
    pub fn from_json(json: &[u8]) -> Result<Self, MalformedClientData> {
        let mut client_data: Self =
            serde_json::from_slice(json).map_err(MalformedClientData::Json)?;
        client_data.challenge_bytes = encoding::try_from_base64url(&client_data.challenge)
            .map_err(MalformedClientData::Challenge)?;
        Ok(client_data)
    }

    /// The decoded challenge bytes.
    pub fn challenge_bytes(&self) -> &[u8] {
        &self.challenge_bytes
    }

    /// Whether the client reported a cross-origin ceremony.
    pub fn is_cross_origin(&self) -> bool {
        self.cross_origin.unwrap_or(false)
    }
}

/// The client data JSON could not be decoded.
#[derive(Debug)]
pub enum MalformedClientData {
    /// The bytes are not a JSON object of the expected shape.
    Json(serde_json::Error),

    /// The challenge field is not valid unpadded base64url.
    Challenge(data_encoding::DecodeError),
}

impl fmt::Display for MalformedClientData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedClientData::Json(err) => write!(f, "invalid JSON in client data: {err}"),
            MalformedClientData::Challenge(err) => {
                write!(f, "invalid base64url challenge in client data: {err}")
            }
        }
    }
}

impl std::error::Error for MalformedClientData {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MalformedClientData::Json(err) => Some(err),
            MalformedClientData::Challenge(err) => Some(err),
        }
    }
}
