//! Serializing documents to and from cache bytes.
//!
//! JSON encoding keeps cache values human-readable for debugging.

use thiserror::Error;

use crate::store::Document;

/// Errors that can occur during cache serialization/deserialization.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SerializationError {
    #[error("Failed to serialize: {0}")]
    SerializeFailed(String),
    #[error("Failed to deserialize: {0}")]
    DeserializeFailed(String),
}

/// Result type for serialization operations.
pub type Result<T> = std::result::Result<T, SerializationError>;

/// Serializes a single document to JSON bytes.
pub fn serialize_document(doc: &Document) -> Result<Vec<u8>> {
    serde_json::to_vec(doc).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a single document.
pub fn deserialize_document(bytes: &[u8]) -> Result<Document> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}

/// Serializes a collection snapshot to JSON bytes.
pub fn serialize_documents(docs: &[Document]) -> Result<Vec<u8>> {
    serde_json::to_vec(docs).map_err(|e| SerializationError::SerializeFailed(e.to_string()))
}

/// Deserializes JSON bytes to a collection snapshot.
pub fn deserialize_documents(bytes: &[u8]) -> Result<Vec<Document>> {
    serde_json::from_slice(bytes).map_err(|e| SerializationError::DeserializeFailed(e.to_string()))
}
