//! Decoders for the binary session files the recorder writes

use prost::Message;

/// Protobuf messages written by the recorder
pub mod proto {
    /// Written once per session as `<ts>-SessionEnd.bin`
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct SessionMetadata {
        #[prost(string, tag = "1")]
        pub session_id: String,
        #[prost(string, tag = "2")]
        pub timezone: String,
    }

    /// Contents of a `<ts>-Keypresses.protobuf` file
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct KeyPresses {
        #[prost(message, repeated, tag = "1")]
        pub key_presses: Vec<KeyPress>,
    }

    /// One key press; only counted, so its fields are left undecoded
    #[derive(Clone, PartialEq, prost::Message)]
    pub struct KeyPress {}
}

/// Parses the two binary formats aggregation depends on
pub trait Decoders: Send + Sync {
    /// Human-readable time zone name stored in a session-end marker
    fn session_timezone(&self, bytes: &[u8]) -> Result<Option<String>, prost::DecodeError>;

    /// Number of key press records in a keypress log
    fn count_keypresses(&self, bytes: &[u8]) -> Result<usize, prost::DecodeError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProtobufDecoders;

impl Decoders for ProtobufDecoders {
    fn session_timezone(&self, bytes: &[u8]) -> Result<Option<String>, prost::DecodeError> {
        let metadata = proto::SessionMetadata::decode(bytes)?;
        let timezone = metadata.timezone.trim();
        Ok((!timezone.is_empty()).then(|| timezone.to_string()))
    }

    fn count_keypresses(&self, bytes: &[u8]) -> Result<usize, prost::DecodeError> {
        Ok(proto::KeyPresses::decode(bytes)?.key_presses.len())
    }
}
