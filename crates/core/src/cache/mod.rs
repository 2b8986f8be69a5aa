mod error;
mod keys;
mod serialization;
mod traits;

pub use error::{CacheError, Result};
pub use keys::{collection_key, collection_of_key, document_key};
pub use serialization::{
    deserialize_document, deserialize_documents, serialize_document, serialize_documents,
    SerializationError,
};
pub use traits::Cache;
