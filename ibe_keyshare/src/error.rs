use crate::serde_utils::ArkSerializationError;
use ark_serialize::SerializationError;
use serde::Serialize;

#[derive(Debug, Serialize)]
pub enum KeyshareError {
    /// Bytes are not a canonical encoding of a point on the expected group.
    /// A syntactic defect, distinct from a cryptographic mismatch.
    #[serde(with = "ArkSerializationError")]
    Serialization(SerializationError),
    /// The consistency check during decryption failed, i.e. the ephemeral key
    /// recomputed from the recovered randomness does not match the ciphertext.
    InvalidCiphertext,
    /// Ciphertext components have an impossible shape
    MalformedCiphertext,
    /// Message longer than the mask that can be derived for it
    MessageTooLong(usize),
}

impl From<SerializationError> for KeyshareError {
    fn from(e: SerializationError) -> Self {
        Self::Serialization(e)
    }
}
