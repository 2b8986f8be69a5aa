use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

use super::{Result, StoreError};

/// An opaque record read from or written to a named collection.
///
/// The cache, reader, and subscription layers treat documents as opaque
/// JSON; typed shapes are imposed at the service boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    pub id: String,
    pub data: Value,
}

impl Document {
    /// Creates a new document with the given id and JSON payload.
    pub fn new(id: impl Into<String>, data: Value) -> Self {
        Self {
            id: id.into(),
            data,
        }
    }

    /// Returns a top-level field of the payload, if present.
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.data.get(name)
    }
}

/// A validated `collection/id` document path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DocPath {
    collection: String,
    id: String,
}

impl DocPath {
    /// Creates a path from its parts, validating both are non-empty and
    /// contain no separator.
    pub fn new(collection: impl Into<String>, id: impl Into<String>) -> Result<Self> {
        let collection = collection.into();
        let id = id.into();
        if collection.is_empty()
            || id.is_empty()
            || collection.contains('/')
            || id.contains('/')
        {
            return Err(StoreError::InvalidPath(format!("{collection}/{id}")));
        }
        Ok(Self { collection, id })
    }

    /// Parses a `collection/id` string. Exactly two non-empty segments.
    pub fn parse(path: &str) -> Result<Self> {
        let mut segments = path.split('/');
        match (segments.next(), segments.next(), segments.next()) {
            (Some(collection), Some(id), None) if !collection.is_empty() && !id.is_empty() => {
                Ok(Self {
                    collection: collection.to_string(),
                    id: id.to_string(),
                })
            }
            _ => Err(StoreError::InvalidPath(path.to_string())),
        }
    }

    pub fn collection(&self) -> &str {
        &self.collection
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for DocPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.collection, self.id)
    }
}

/// Comparison operator for a query filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FilterOp {
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    ArrayContains,
}

impl FilterOp {
    /// Short symbol used in cache key signatures.
    pub fn symbol(&self) -> &'static str {
        match self {
            FilterOp::Eq => "==",
            FilterOp::Ne => "!=",
            FilterOp::Lt => "<",
            FilterOp::Le => "<=",
            FilterOp::Gt => ">",
            FilterOp::Ge => ">=",
            FilterOp::ArrayContains => "array-contains",
        }
    }
}

/// A single field predicate applied server-side to a collection query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    pub field: String,
    pub op: FilterOp,
    pub value: Value,
}

impl Filter {
    pub fn new(field: impl Into<String>, op: FilterOp, value: Value) -> Self {
        Self {
            field: field.into(),
            op,
            value,
        }
    }

    /// Equality filter shorthand.
    pub fn eq(field: impl Into<String>, value: Value) -> Self {
        Self::new(field, FilterOp::Eq, value)
    }

    /// Evaluates this filter against a document.
    ///
    /// Ordering comparisons apply to numbers and strings; mixed or missing
    /// types never match, matching how document databases skip documents
    /// whose field type differs from the operand.
    pub fn matches(&self, doc: &Document) -> bool {
        let Some(actual) = doc.field(&self.field) else {
            return false;
        };
        match self.op {
            FilterOp::Eq => actual == &self.value,
            FilterOp::Ne => actual != &self.value,
            FilterOp::Lt => compare(actual, &self.value)
                .is_some_and(|ord| ord == std::cmp::Ordering::Less),
            FilterOp::Le => compare(actual, &self.value)
                .is_some_and(|ord| ord != std::cmp::Ordering::Greater),
            FilterOp::Gt => compare(actual, &self.value)
                .is_some_and(|ord| ord == std::cmp::Ordering::Greater),
            FilterOp::Ge => compare(actual, &self.value)
                .is_some_and(|ord| ord != std::cmp::Ordering::Less),
            FilterOp::ArrayContains => actual
                .as_array()
                .is_some_and(|items| items.contains(&self.value)),
        }
    }
}

fn compare(a: &Value, b: &Value) -> Option<std::cmp::Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.as_str().cmp(y.as_str())),
        _ => None,
    }
}

/// A single write in an atomic batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOperation {
    /// Creates or fully replaces the document at `path`.
    Set { path: DocPath, data: Value },
    /// Merges `data` into an existing document. Fails if the document
    /// does not exist.
    Update { path: DocPath, data: Value },
    /// Removes the document at `path`. Deleting a missing document is a
    /// no-op.
    Delete { path: DocPath },
}

impl BatchOperation {
    pub fn set(path: DocPath, data: Value) -> Self {
        BatchOperation::Set { path, data }
    }

    pub fn update(path: DocPath, data: Value) -> Self {
        BatchOperation::Update { path, data }
    }

    pub fn delete(path: DocPath) -> Self {
        BatchOperation::Delete { path }
    }

    /// The document path this operation touches.
    pub fn path(&self) -> &DocPath {
        match self {
            BatchOperation::Set { path, .. }
            | BatchOperation::Update { path, .. }
            | BatchOperation::Delete { path } => path,
        }
    }
}
