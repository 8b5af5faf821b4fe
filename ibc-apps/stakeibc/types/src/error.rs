//! Defines the stakeibc codec error type

use displaydoc::Display;

#[derive(Debug, Display)]
pub enum CodecError {
    /// unknown message type URL `{type_url}`
    UnknownTypeUrl { type_url: String },
    /// unknown legacy message type `{tag}`
    UnknownLegacyType { tag: String },
    /// message `{type_url}` is not registered for the legacy encoding
    NotLegacyRegistered { type_url: &'static str },
    /// malformed message bytes: `{0}`
    MalformedBytes(prost::DecodeError),
    /// malformed legacy JSON message: `{description}`
    MalformedJson { description: String },
}

impl From<prost::DecodeError> for CodecError {
    fn from(e: prost::DecodeError) -> Self {
        Self::MalformedBytes(e)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(e: serde_json::Error) -> Self {
        Self::MalformedJson {
            description: e.to_string(),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CodecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self {
            Self::MalformedBytes(e) => Some(e),
            _ => None,
        }
    }
}
