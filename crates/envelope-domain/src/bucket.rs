//! Envelopes holding money, and the fixed roster that groups them.

use serde::{Deserialize, Serialize};

use crate::{common::*, money::Money};

/// A named envelope holding a balance and an optional cap.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Bucket {
    pub id: BucketId,
    pub name: String,
    pub current: Money,
    /// `None` marks the uncapped accumulation bucket.
    pub target: Option<Money>,
    #[serde(default)]
    pub is_paid: bool,
    /// Display ordering only; allocation order comes from the policy table.
    #[serde(default)]
    pub priority: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Bucket {
    pub fn new(
        id: impl Into<BucketId>,
        name: impl Into<String>,
        target: Option<Money>,
        priority: u32,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            current: Money::ZERO,
            target,
            is_paid: false,
            priority,
            icon: None,
            color: None,
        }
    }

    pub fn with_current(mut self, current: Money) -> Self {
        self.current = current;
        self
    }

    pub fn with_style(mut self, icon: impl Into<String>, color: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self.color = Some(color.into());
        self
    }

    pub fn is_uncapped(&self) -> bool {
        self.target.is_none()
    }

    /// Unmet part of the target; `None` for an uncapped bucket.
    pub fn headroom(&self) -> Option<Money> {
        self.target
            .map(|target| target.saturating_sub(self.current))
    }

    /// Returns `true` once a capped bucket has reached its target.
    pub fn is_full(&self) -> bool {
        matches!(self.headroom(), Some(room) if room.is_zero())
    }
}

/// Ordered, fixed set of buckets addressed by id.
///
/// The set exposes no insertion or removal once built: allocation code can only
/// reach existing buckets through [`BucketSet::get_mut`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(transparent)]
pub struct BucketSet(Vec<Bucket>);

impl BucketSet {
    pub fn new(buckets: Vec<Bucket>) -> Self {
        Self(buckets)
    }

    pub fn get(&self, id: &str) -> Option<&Bucket> {
        self.0.iter().find(|bucket| bucket.id == id)
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Bucket> {
        self.0.iter_mut().find(|bucket| bucket.id == id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Bucket> {
        self.0.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Bucket> {
        self.0.iter_mut()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &BucketId> {
        self.0.iter().map(|bucket| &bucket.id)
    }

    /// Sum of every bucket's `current`, saturating at the representable limit.
    pub fn total(&self) -> Money {
        self.0
            .iter()
            .fold(Money::ZERO, |total, bucket| total.saturating_add(bucket.current))
    }

    /// Exact sum of every bucket's `current`; `None` on overflow.
    pub fn checked_total(&self) -> Option<Money> {
        self.0
            .iter()
            .try_fold(Money::ZERO, |total, bucket| total.checked_add(bucket.current))
    }

    /// Buckets sorted by their display priority.
    pub fn by_priority(&self) -> Vec<&Bucket> {
        let mut sorted: Vec<&Bucket> = self.0.iter().collect();
        sorted.sort_by_key(|bucket| bucket.priority);
        sorted
    }
}

impl<'a> IntoIterator for &'a BucketSet {
    type Item = &'a Bucket;
    type IntoIter = std::slice::Iter<'a, Bucket>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
