//! Identifier types shared by budgeting primitives.

use std::{borrow::Borrow, fmt};

use serde::{Deserialize, Serialize};

/// Stable identifier of a bucket within a roster (`rent`, `daily`, ...).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketId(String);

impl BucketId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BucketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for BucketId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for BucketId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl Borrow<str> for BucketId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for BucketId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for BucketId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}
