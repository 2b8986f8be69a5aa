mod error;
mod traits;
mod types;

pub use error::{Result, StoreError};
pub use traits::{DocumentStore, SnapshotReceiver};
pub use types::{BatchOperation, DocPath, Document, Filter, FilterOp};
